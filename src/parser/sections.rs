use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::markup;
use super::options::Format;

static LIST_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<(/?)(ul|ol)\b[^>]*>").unwrap());
static BLOCK_CLOSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^</(p|h[1-6]|div|strong|b|span|em)\s*>$").unwrap());
static BLOCK_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<(p|h[1-6]|div|strong|b|span|em)\b[^>]*>").unwrap());

/// Publication-status categories, in dedup priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Published,
    Working,
    InProgress,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Published, Section::Working, Section::InProgress];

    pub fn label(self) -> &'static str {
        match self {
            Section::Published => "Publications",
            Section::Working => "Working Papers",
            Section::InProgress => "Work in Progress",
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    /// A plain-text header line: the bare label, any case, optional colon.
    pub fn from_header_line(line: &str) -> Option<Section> {
        let text = line.trim();
        let text = text.strip_suffix(':').unwrap_or(text).trim_end();
        Section::ALL
            .into_iter()
            .find(|s| s.label().eq_ignore_ascii_case(text))
    }

    fn named_in(self, header_text: &str) -> bool {
        header_text
            .to_lowercase()
            .contains(&self.label().to_lowercase())
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The raw text belonging to each section. Missing sections are empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SectionSpans<'a> {
    spans: [&'a str; 3],
}

impl<'a> SectionSpans<'a> {
    pub fn get(&self, section: Section) -> &'a str {
        self.spans[section.index()]
    }
}

pub fn locate(content: &str, format: Format) -> SectionSpans<'_> {
    let spans = match format {
        Format::Markup => locate_markup(content),
        Format::PlainText => locate_plain(content),
    };
    for section in Section::ALL {
        debug!(
            section = section.label(),
            bytes = spans.get(section).len(),
            "located section"
        );
    }
    spans
}

/// Header lines split the text; each section runs to the next header of any kind.
fn locate_plain(content: &str) -> SectionSpans<'_> {
    // (section, header line start, body start)
    let mut headers: Vec<(Section, usize, usize)> = Vec::new();
    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        if let Some(section) = Section::from_header_line(line) {
            headers.push((section, offset, offset + line.len()));
        }
        offset += line.len();
    }

    let mut found: [Option<&str>; 3] = [None; 3];
    for (i, &(section, _, body_start)) in headers.iter().enumerate() {
        let slot = &mut found[section.index()];
        if slot.is_some() {
            continue;
        }
        let end = headers.get(i + 1).map_or(content.len(), |h| h.1);
        *slot = Some(&content[body_start..end]);
    }

    SectionSpans {
        spans: found.map(|s| s.unwrap_or("")),
    }
}

/// A labelled block element directly followed by a `<ul>`/`<ol>`; the section is
/// that list's body.
fn locate_markup(content: &str) -> SectionSpans<'_> {
    let mut found: [Option<&str>; 3] = [None; 3];

    for caps in LIST_TAG_RE.captures_iter(content) {
        if !caps[1].is_empty() {
            continue;
        }
        let Some(whole) = caps.get(0) else { continue };
        let Some(header) = preceding_header(&content[..whole.start()]) else {
            continue;
        };

        for section in Section::ALL {
            let slot = &mut found[section.index()];
            if slot.is_none() && section.named_in(&header) {
                *slot = Some(list_body(content, whole.end(), &caps[2]));
            }
        }

        if found.iter().all(Option::is_some) {
            break;
        }
    }

    SectionSpans {
        spans: found.map(|s| s.unwrap_or("")),
    }
}

/// Visible text of the block element that `before` ends with, if any.
fn preceding_header(before: &str) -> Option<String> {
    let trimmed = before.trim_end();
    let close_start = trimmed.rfind("</")?;
    let close = BLOCK_CLOSE_RE.captures(&trimmed[close_start..])?;
    let head = &trimmed[..close_start];

    let open = BLOCK_OPEN_RE
        .captures_iter(head)
        .filter(|c| c[1].eq_ignore_ascii_case(&close[1]))
        .last()?;
    let inner_start = open.get(0)?.end();
    Some(markup::visible_text(&head[inner_start..]))
}

/// Body of a list opened just before `start`, up to its matching close tag.
fn list_body<'a>(content: &'a str, start: usize, kind: &str) -> &'a str {
    let rest = &content[start..];
    let mut depth = 1usize;
    for caps in LIST_TAG_RE.captures_iter(rest) {
        if !caps[2].eq_ignore_ascii_case(kind) {
            continue;
        }
        if caps[1].is_empty() {
            depth += 1;
            continue;
        }
        depth -= 1;
        if depth == 0 {
            if let Some(m) = caps.get(0) {
                return &rest[..m.start()];
            }
        }
    }
    rest
}

// ── Tests ──
