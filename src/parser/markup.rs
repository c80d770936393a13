use std::sync::LazyLock;

use regex::{Captures, Regex};

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());
static ANCHOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<a\b[^>]*>(.*?)</a\s*>").unwrap());
static ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|[a-zA-Z]+);").unwrap());
static STRUCTURE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<(ul|ol|li|p|div|h[1-6])\b[^>]*>").unwrap());
static BRACKET_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[[^\]]*\]").unwrap());
static ANCHOR_MARK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("\u{E000}([0-9]+)\u{E001}").unwrap());

/// An entry with every anchor replaced by a numbered placeholder and all other
/// markup flattened to visible text.
#[derive(Debug, Clone, Default)]
pub struct MaskedEntry {
    pub text: String,
    pub anchors: Vec<String>,
}

impl MaskedEntry {
    /// Plain text carries no anchors; only whitespace is normalized.
    pub fn plain(text: &str) -> Self {
        MaskedEntry {
            text: collapse_whitespace(text),
            anchors: Vec::new(),
        }
    }

    /// Anchor texts referenced by placeholders inside `segment`, in order.
    pub fn anchors_in<'a>(&'a self, segment: &str) -> Vec<&'a str> {
        ANCHOR_MARK_RE
            .captures_iter(segment)
            .filter_map(|c| c[1].parse::<usize>().ok())
            .filter_map(|i| self.anchors.get(i))
            .map(String::as_str)
            .collect()
    }
}

/// Drop anchor placeholders from a piece of masked text.
pub fn unmask(segment: &str) -> String {
    collapse_whitespace(&ANCHOR_MARK_RE.replace_all(segment, " "))
}

/// True when the content holds block or list markup rather than rendered text.
pub fn looks_like_markup(content: &str) -> bool {
    STRUCTURE_RE.is_match(content)
}

/// Replace each `<a ...>text</a>` with a placeholder and keep its visible text.
///
/// Anchor text has nested tags, entities and bracketed annotations removed, so
/// a `<a href="x.pdf">[pdf]</a>` link yields an empty string and is ignored
/// downstream.
pub fn mask_anchors(entry: &str) -> MaskedEntry {
    let mut anchors = Vec::new();
    let masked = ANCHOR_RE.replace_all(entry, |caps: &Captures| {
        let text = strip_annotations(&visible_text(&caps[1]));
        anchors.push(text);
        format!(" \u{E000}{}\u{E001} ", anchors.len() - 1)
    });

    MaskedEntry {
        text: visible_text(&masked),
        anchors,
    }
}

/// Drop tags, decode entities and collapse whitespace.
pub fn visible_text(fragment: &str) -> String {
    let stripped = TAG_RE.replace_all(fragment, " ");
    collapse_whitespace(&decode_entities(&stripped))
}

/// Remove `[pdf]`, `[link]` and similar bracketed annotations.
pub fn strip_annotations(text: &str) -> String {
    collapse_whitespace(&BRACKET_RE.replace_all(text, " "))
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn decode_entities(text: &str) -> String {
    ENTITY_RE
        .replace_all(text, |caps: &Captures| {
            let body = &caps[1];
            let decoded = match body {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some(' '),
                _ if body.starts_with("#x") || body.starts_with("#X") => {
                    u32::from_str_radix(&body[2..], 16).ok().and_then(char::from_u32)
                }
                _ if body.starts_with('#') => body[1..].parse().ok().and_then(char::from_u32),
                _ => None,
            };
            decoded
                .map(String::from)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
