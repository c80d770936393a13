pub mod entries;
pub mod markup;
pub mod names;
pub mod options;
pub mod report;
pub mod sections;

use tracing::debug;

use names::NameSet;
use options::Format;
pub use options::{ContentMode, OptionError, ParenScope, ParseOptions};
pub use report::Report;
pub use sections::Section;

/// Count coauthors with the default options.
pub fn extract(content: &str) -> Report {
    extract_with(content, &ParseOptions::default())
}

/// Four-stage pipeline: content → section spans → entries → names → report.
pub fn extract_with(content: &str, options: &ParseOptions) -> Report {
    let format = options.mode.resolve(content);
    let spans = sections::locate(content, format);

    let [published, working, in_progress] =
        Section::ALL.map(|section| collect_names(spans.get(section), section, format, options));

    report::aggregate(published, working, in_progress)
}

fn collect_names(span: &str, section: Section, format: Format, options: &ParseOptions) -> NameSet {
    let entries = entries::split_entries(span, format);
    let mut names = NameSet::new();
    for entry in &entries {
        names.merge(names::parse_entry(entry, format, options.parens));
    }
    debug!(
        section = section.label(),
        entries = entries.len(),
        names = names.len(),
        "collected section names"
    );
    names
}
