use config::{Config, ConfigError, Environment, Source};
use serde::Deserialize;
use tracing::warn;

use crate::parser::{ContentMode, ParenScope, ParseOptions};

const ENV_PREFIX: &str = "COAUTHORS";

/// Runtime settings, read from `COAUTHORS_*` environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub mode: ContentMode,
    pub parens: ParenScope,
    /// URL prefixes the counter may run on. Empty admits everything.
    pub allowed_urls: Vec<String>,
}

impl Settings {
    /// Environment settings, falling back to defaults when they don't parse.
    pub fn load() -> Self {
        let env = Environment::with_prefix(ENV_PREFIX)
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("allowed_urls");
        Self::from_source(env).unwrap_or_else(|e| {
            warn!(error = %e, "invalid settings, using defaults");
            Settings::default()
        })
    }

    pub fn from_source<S>(source: S) -> Result<Self, ConfigError>
    where
        S: Source + Send + Sync + 'static,
    {
        Config::builder()
            .add_source(source)
            .build()?
            .try_deserialize()
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            mode: self.mode,
            parens: self.parens,
        }
    }

    pub fn url_allowed(&self, url: &str) -> bool {
        self.allowed_urls.is_empty()
            || self
                .allowed_urls
                .iter()
                .any(|prefix| url.starts_with(prefix.as_str()))
    }
}
