//! Run configuration.
//!
//! A [`RunConfig`] is validated before any file is opened: it needs an input
//! path, at least one tag, and an output path different from the input.
//!
//! Defaults can come from a TOML file passed with `--config`:
//!
//! ```toml
//! input = "holochain.influx"
//! output = "holochain.tagged.influx"
//!
//! [tags]
//! env = "production"
//! region = "europe"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use thiserror::Error;

use crate::tags::{TagError, TagSet};

/// Extension given to the derived output path when none is configured.
pub const DEFAULT_OUTPUT_EXTENSION: &str = "tmp.influx";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("input file not specified")]
    MissingInput,

    #[error("no tags specified; at least one tag in 'key=value' form is required")]
    NoTags,

    #[error("input and output files must be different: {}", .0.display())]
    SamePath(PathBuf),

    #[error(transparent)]
    Tag(#[from] TagError),
}

/// Validated settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub tags: TagSet,
}

impl RunConfig {
    /// Validate a run.
    ///
    /// Without an explicit `output`, the input path with its extension
    /// replaced by [`DEFAULT_OUTPUT_EXTENSION`] is used.
    pub fn new(
        input: impl Into<PathBuf>,
        output: Option<PathBuf>,
        tags: TagSet,
    ) -> Result<Self, ConfigError> {
        let input = input.into();
        if input.as_os_str().is_empty() {
            return Err(ConfigError::MissingInput);
        }
        if tags.is_empty() {
            return Err(ConfigError::NoTags);
        }

        let output = match output {
            Some(path) if !path.as_os_str().is_empty() => path,
            _ => default_output(&input),
        };
        if output == input {
            return Err(ConfigError::SamePath(output));
        }

        Ok(Self {
            input,
            output,
            tags,
        })
    }
}

/// `holochain.influx` and `holochain` both become `holochain.tmp.influx`.
pub fn default_output(input: &Path) -> PathBuf {
    input.with_extension(DEFAULT_OUTPUT_EXTENSION)
}

/// Contents of a `--config` file. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

impl ConfigFile {
    /// Load and parse a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("invalid TOML in {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Add file tags whose keys are not already in `tags`.
    ///
    /// File tags go through the same validation as command-line tags. A key
    /// containing `=` cannot be told apart from its value and is rejected.
    pub fn merge_tags_into(&self, tags: &mut TagSet) -> Result<(), TagError> {
        for (key, value) in &self.tags {
            if key.contains('=') {
                return Err(TagError::MalformedPair(format!("{key}={value}")));
            }
            if tags.contains_key(key.trim()) {
                continue;
            }
            tags.add(&format!("{key}={value}"))?;
        }
        Ok(())
    }
}
