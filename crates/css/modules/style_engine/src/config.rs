//! Engine configuration.

use std::fs;
use std::path::Path;

use anyhow::{Context as _, Result};
use css_cascade::{DEFAULT_PRIORITY, PriorityMode};
use css_media_queries::MediaQueryTable;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Default prefix of emitted `<style>` element ids.
pub const DEFAULT_STYLE_TAG_PREFIX: &str = "et-builder-module-design";

/// Tunables of one [`crate::StyleRegistry`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Base priority when neither the request nor a preset context provides one.
    pub default_priority: i64,
    /// How stored priorities are compared when serializing a bucket.
    pub priority_mode: PriorityMode,
    /// Breakpoint overrides applied on top of the built-in table. Empty queries remove.
    pub media_queries: IndexMap<String, String>,
    /// Prefix of the `id` attribute of `<style>` elements produced by `enqueue`.
    pub style_tag_prefix: String,
}

impl Default for EngineConfig {
    #[inline]
    fn default() -> Self {
        Self {
            default_priority: DEFAULT_PRIORITY,
            priority_mode: PriorityMode::default(),
            media_queries: IndexMap::new(),
            style_tag_prefix: DEFAULT_STYLE_TAG_PREFIX.to_owned(),
        }
    }
}

impl EngineConfig {
    /// Parse a JSON configuration document. Missing fields keep their defaults.
    ///
    /// # Errors
    /// Returns an error if `text` is not valid JSON or contains unknown fields.
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("invalid style engine configuration")
    }

    /// Read and parse a JSON configuration file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or its contents are invalid.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading style engine configuration {}", path.display()))?;
        Self::from_json_str(&text)
            .with_context(|| format!("parsing style engine configuration {}", path.display()))
    }

    /// Breakpoint table with this configuration's overrides applied.
    pub fn media_query_table(&self) -> MediaQueryTable {
        MediaQueryTable::with_overrides(
            self.media_queries
                .iter()
                .map(|(name, query)| (name.as_str(), query.as_str())),
        )
    }
}
