use std::sync::LazyLock;

use regex::Regex;

use super::options::Format;
use super::sections::Section;

static LIST_ITEM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<li\b[^>]*>").unwrap());
static BLANK_LINE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n").unwrap());

/// Split a section span into entries, in document order.
pub fn split_entries(span: &str, format: Format) -> Vec<&str> {
    match format {
        // Anything before the first <li> is boilerplate.
        Format::Markup => LIST_ITEM_RE.split(span).skip(1).collect(),
        Format::PlainText => BLANK_LINE_RE
            .split(span)
            .map(str::trim)
            .filter(|block| !block.is_empty() && Section::from_header_line(block).is_none())
            .collect(),
    }
}
