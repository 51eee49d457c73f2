use crate::consts::{
    DEFAULT_EXPLORER_URL, DEFAULT_MIN_LINE_LENGTH, DEFAULT_OUTPUT_DIR, DEFAULT_OUTPUT_EXTENSION,
    DEFAULT_SOURCE_SELECTOR,
};
use anyhow::anyhow;
use config::{Config, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use url::Url;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub explorer: ExplorerSettings,
    pub listing: ListingSettings,
    pub output: OutputSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExplorerSettings {
    /// Base url of the explorer. `address/<address>` is joined onto it,
    /// so a base with a path component must end with a slash.
    pub url: Url,
    pub source_selector: String,
    /// Request timeout in seconds. No timeout if not set.
    pub request_timeout: Option<u64>,
}

impl Default for ExplorerSettings {
    fn default() -> Self {
        Self {
            url: Url::try_from(DEFAULT_EXPLORER_URL).expect("valid url"),
            source_selector: DEFAULT_SOURCE_SELECTOR.to_string(),
            request_timeout: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ListingSettings {
    pub min_line_length: usize,
}

impl Default for ListingSettings {
    fn default() -> Self {
        Self {
            min_line_length: DEFAULT_MIN_LINE_LENGTH,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSettings {
    pub dir: PathBuf,
    pub extension: String,
    pub create_dir: bool,
    pub on_duplicate: DuplicatePolicy,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            extension: DEFAULT_OUTPUT_EXTENSION.to_string(),
            create_dir: false,
            on_duplicate: DuplicatePolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    #[default]
    Overwrite,
    KeepExisting,
}

impl Settings {
    pub fn new(config_path: Option<&Path>) -> anyhow::Result<Self> {
        let mut builder = Config::builder();
        if let Some(config_path) = config_path {
            if config_path.exists() {
                builder = builder.add_source(File::from(config_path.to_path_buf()));
            }
        }
        builder = builder
            .add_source(config::Environment::with_prefix("SOURCES_SCRAPER").separator("__"));

        builder
            .build()?
            .try_deserialize()
            .map_err(|err| anyhow!(err))
    }
}
