pub mod parser;
pub mod settings;

pub use parser::{
    extract, extract_with, ContentMode, OptionError, ParenScope, ParseOptions, Report, Section,
};
