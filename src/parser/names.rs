use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use super::markup::{self, MaskedEntry};
use super::options::{Format, ParenScope};

static MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:joint\s+)?with\b").unwrap());
static JOINT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bjoint\s+with\b").unwrap());
static DELIMITER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bjoint\s+with\b|\bwith\b|\band\b|,").unwrap());
static PAREN_GROUP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(([^()]*)\)").unwrap());
static NAME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z .\-]*$").unwrap());

/// Unique names in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameSet {
    names: Vec<String>,
    seen: HashSet<String>,
}

impl NameSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the name was already present.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.seen.contains(&name) {
            return false;
        }
        self.seen.insert(name.clone());
        self.names.push(name);
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.seen.contains(name)
    }

    pub fn merge(&mut self, other: NameSet) {
        for name in other.names {
            self.insert(name);
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.names
    }
}

impl<S: Into<String>> FromIterator<S> for NameSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = NameSet::new();
        for name in iter {
            set.insert(name);
        }
        set
    }
}

/// Coauthor names mentioned in one entry.
///
/// Everything up to the first "joint with" (or, failing that, "with") is the
/// title and is skipped. The rest is cut on "joint with", "with", "and" and
/// commas; each piece is one candidate. In markup, a piece holding an anchor
/// contributes the anchor text as-is; other pieces must look like a name.
pub fn parse_entry(entry: &str, format: Format, parens: ParenScope) -> NameSet {
    let masked = match format {
        Format::Markup => markup::mask_anchors(entry),
        Format::PlainText => MaskedEntry::plain(entry),
    };
    let text = markup::strip_annotations(&masked.text);
    let narrowed;
    let text: &str = if parens.narrows(format) {
        narrowed = narrow_to_clause(&text);
        &narrowed
    } else {
        &text
    };

    let mut names = NameSet::new();
    let Some(clause) = coauthor_clause(text) else {
        return names;
    };

    for segment in DELIMITER_RE.split(clause) {
        let anchors: Vec<&str> = masked
            .anchors_in(segment)
            .into_iter()
            .filter(|a| !a.is_empty())
            .collect();
        if !anchors.is_empty() {
            for anchor in anchors {
                names.insert(anchor);
            }
            continue;
        }
        if let Some(name) = clean_candidate(&markup::unmask(segment)) {
            names.insert(name);
        }
    }

    names
}

/// The innermost parenthesized group that names coauthors. Without one, the
/// whole text minus its parenthetical asides ("(2019)", "(forthcoming)").
fn narrow_to_clause(text: &str) -> Cow<'_, str> {
    let clause = PAREN_GROUP_RE
        .captures_iter(text)
        .filter_map(|c| c.get(1))
        .find(|group| MARKER_RE.is_match(group.as_str()));
    match clause {
        Some(group) => Cow::Borrowed(group.as_str()),
        None => Cow::Owned(markup::collapse_whitespace(
            &PAREN_GROUP_RE.replace_all(text, " "),
        )),
    }
}

fn coauthor_clause(text: &str) -> Option<&str> {
    let marker = JOINT_RE.find(text).or_else(|| MARKER_RE.find(text))?;
    Some(&text[marker.end()..])
}

fn clean_candidate(segment: &str) -> Option<String> {
    let candidate = drop_sentence_period(segment.trim());
    if candidate.is_empty() {
        return None;
    }
    if NAME_RE.is_match(candidate) {
        Some(candidate.to_string())
    } else {
        trace!(candidate, "rejected name candidate");
        None
    }
}

/// "with Bob." ends a sentence; "with A. J." ends on an initial.
fn drop_sentence_period(candidate: &str) -> &str {
    match candidate.strip_suffix('.') {
        Some(rest) if rest.rsplit(' ').next().is_some_and(|last| last.len() > 1) => rest,
        _ => candidate,
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(entry: &str) -> Vec<String> {
        parse_entry(entry, Format::PlainText, ParenScope::Auto).into_vec()
    }

    fn html(entry: &str) -> Vec<String> {
        parse_entry(entry, Format::Markup, ParenScope::Auto).into_vec()
    }

    #[test]
    fn name_set_keeps_first_seen_order() {
        let mut set: NameSet = ["Bob", "Alice"].into_iter().collect();
        assert!(!set.insert("Bob"));
        assert!(set.insert("Charlie"));
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["Bob", "Alice", "Charlie"]);
        assert!(set.contains("Alice"));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn no_marker_no_names() {
        assert!(plain("Paper 1, by Alice and Bob").is_empty());
        assert!(html("<li>Paper 1, <a href=\"#\">Alice</a> and Bob</li>").is_empty());
    }

    #[test]
    fn marker_is_a_whole_word() {
        assert!(plain("Paper without coauthors, and Bob").is_empty());
        assert_eq!(plain("Paper, WITH Alexander Sandberg"), vec!["Alexander Sandberg"]);
    }

    #[test]
    fn title_words_not_taken_as_names() {
        assert_eq!(
            plain("Trade and Growth, joint with Alice and Bob"),
            vec!["Alice", "Bob"]
        );
        assert_eq!(
            plain("Matching with Transfers, joint with Li Wei"),
            vec!["Li Wei"]
        );
    }

    #[test]
    fn serial_comma_list() {
        assert_eq!(
            plain("Paper, with Alice, Bob, and Charlie"),
            vec!["Alice", "Bob", "Charlie"]
        );
    }

    #[test]
    fn invalid_candidates_rejected() {
        assert_eq!(
            plain("Paper, with Alice and Bob, Journal of Finance 75 (2020)"),
            vec!["Alice", "Bob"]
        );
        assert_eq!(plain("Paper, with .Alice and )Bob and Carol"), vec!["Carol"]);
        assert_eq!(plain("Paper, with J. R. Smith-Jones"), vec!["J. R. Smith-Jones"]);
    }

    #[test]
    fn sentence_period_dropped_initials_kept() {
        assert_eq!(plain("Paper, with Bob."), vec!["Bob"]);
        assert_eq!(plain("Paper, with Alice and Bob Smith."), vec!["Alice", "Bob Smith"]);
        assert_eq!(plain("Paper, with Mary J."), vec!["Mary J."]);
        assert_eq!(plain("Paper, with Ann, A. J."), vec!["Ann", "A. J."]);
    }

    #[test]
    fn bracket_annotations_stripped() {
        assert_eq!(plain("Paper, with Alice [pdf] and Bob [link]"), vec!["Alice", "Bob"]);
    }

    #[test]
    fn duplicates_within_entry_collapse() {
        assert_eq!(plain("Paper, with Alice and Alice"), vec!["Alice"]);
    }

    #[test]
    fn plain_text_narrowed_to_parentheses() {
        assert_eq!(
            plain("Title (joint with Alice and Bob), Review of Studies, 2020"),
            vec!["Alice", "Bob"]
        );
        // Asides without a marker are dropped instead.
        assert_eq!(plain("Title, with Alice (forthcoming)"), vec!["Alice"]);
        assert_eq!(plain("Title (2019), with Alice"), vec!["Alice"]);
    }

    #[test]
    fn whole_entry_scope_skips_narrowing() {
        let names = parse_entry(
            "Title (joint with Alice and Bob), Review of Studies",
            Format::PlainText,
            ParenScope::WholeEntry,
        );
        assert_eq!(names.into_vec(), vec!["Alice", "Review of Studies"]);
    }

    #[test]
    fn markup_parens_need_innermost_scope() {
        let entry = "Title (joint with <a>Alice</a> and Bob), Review</li>";
        // Parsed whole, "Bob)" fails the name filter and the journal gets in.
        assert_eq!(html(entry), vec!["Alice", "Review"]);
        assert_eq!(
            parse_entry(entry, Format::Markup, ParenScope::Innermost).into_vec(),
            vec!["Alice", "Bob"]
        );
    }

    #[test]
    fn anchors_trusted() {
        assert_eq!(
            html(r##"Paper 1, joint with <a href="#">Alice</a> and <a href="#">Bob</a></li>"##),
            vec!["Alice", "Bob"]
        );
        assert_eq!(
            html(r#"Paper, with <a href="/x">Jean-Luc O'Neil</a></li>"#),
            vec!["Jean-Luc O'Neil"]
        );
    }

    #[test]
    fn anchors_combined_with_plain_names() {
        assert_eq!(
            html(r#"Paper, joint with <a href="/a">Alice</a>, Tom Baker and <em>Carol</em></li>"#),
            vec!["Alice", "Tom Baker", "Carol"]
        );
    }

    #[test]
    fn title_and_annotation_anchors_ignored() {
        assert_eq!(
            html(r#"<a href="p.pdf">Trade and Growth</a>, with Bob [<a href="p.pdf">pdf</a>]</li>"#),
            vec!["Bob"]
        );
        assert_eq!(
            html(r#"Paper, with Bob <a href="p.pdf">[slides]</a></li>"#),
            vec!["Bob"]
        );
    }

    #[test]
    fn markup_residue_removed_from_plain_names() {
        assert_eq!(html("Paper, with <b>Alice</b> and Bob&lt;br&gt;</li>"), vec!["Alice"]);
        assert_eq!(html("Paper, with Alice&nbsp;Smith</li>"), vec!["Alice Smith"]);
    }
}
