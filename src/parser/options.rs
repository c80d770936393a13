use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::markup;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum OptionError {
    #[error("unknown content mode `{0}` (expected auto, markup or plain)")]
    UnknownMode(String),
    #[error("unknown parenthesis scope `{0}` (expected auto, innermost or whole-entry)")]
    UnknownParenScope(String),
}

/// How the caller's content should be read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentMode {
    /// Sniff for block/list tags.
    #[default]
    Auto,
    Markup,
    Plain,
}

/// A resolved content format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Markup,
    PlainText,
}

impl ContentMode {
    pub fn resolve(self, content: &str) -> Format {
        match self {
            ContentMode::Markup => Format::Markup,
            ContentMode::Plain => Format::PlainText,
            ContentMode::Auto if markup::looks_like_markup(content) => Format::Markup,
            ContentMode::Auto => Format::PlainText,
        }
    }
}

impl FromStr for ContentMode {
    type Err = OptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(ContentMode::Auto),
            "markup" | "html" => Ok(ContentMode::Markup),
            "plain" | "text" => Ok(ContentMode::Plain),
            _ => Err(OptionError::UnknownMode(s.to_string())),
        }
    }
}

impl fmt::Display for ContentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ContentMode::Auto => "auto",
            ContentMode::Markup => "markup",
            ContentMode::Plain => "plain",
        })
    }
}

/// Whether an entry is narrowed to a parenthesized coauthor clause before
/// splitting, e.g. `Title (joint with A and B), Journal, 2020`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParenScope {
    /// Narrow plain text, parse markup entries whole. A markup entry whose
    /// coauthors sit inside parentheses then loses the name next to `)` and may
    /// pick up trailing citation text; `Innermost` handles those pages.
    #[default]
    Auto,
    Innermost,
    WholeEntry,
}

impl ParenScope {
    pub fn narrows(self, format: Format) -> bool {
        match self {
            ParenScope::Auto => format == Format::PlainText,
            ParenScope::Innermost => true,
            ParenScope::WholeEntry => false,
        }
    }
}

impl FromStr for ParenScope {
    type Err = OptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(ParenScope::Auto),
            "innermost" => Ok(ParenScope::Innermost),
            "whole-entry" | "whole" => Ok(ParenScope::WholeEntry),
            _ => Err(OptionError::UnknownParenScope(s.to_string())),
        }
    }
}

impl fmt::Display for ParenScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ParenScope::Auto => "auto",
            ParenScope::Innermost => "innermost",
            ParenScope::WholeEntry => "whole-entry",
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    pub mode: ContentMode,
    pub parens: ParenScope,
}
