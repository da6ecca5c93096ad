//! Shared configuration loader for the rich-value tools.
//!
//! `defaults/rich-value.default.toml` is embedded into every binary so that
//! docs and runtime behavior stay in sync. Applications layer user-specific
//! files on top of those defaults via [`Loader`] before deserializing into
//! [`RichValueConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use rich_value::filters::{attribute_prefix, strip_padding};
use rich_value::{BuildOptions, Filters, MarkupNode};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/rich-value.default.toml");

/// Name of the per-project file picked up from the working directory.
pub const PROJECT_CONFIG_FILE: &str = "rich-value.toml";

/// Top-level configuration consumed by rich-value applications.
#[derive(Debug, Clone, Deserialize)]
pub struct RichValueConfig {
    pub build: BuildConfig,
    pub filters: FilterConfig,
    pub serialize: SerializeConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

/// Mirrors [`BuildOptions`].
#[derive(Debug, Clone, Deserialize)]
pub struct BuildConfig {
    pub line_tag: String,
    pub object_tags: Vec<String>,
    pub preserve_whitespace_tags: Vec<String>,
    pub coalesce_adjacent: bool,
}

impl BuildConfig {
    pub fn line_tag(&self) -> Option<&str> {
        non_empty(&self.line_tag)
    }
}

impl From<&BuildConfig> for BuildOptions {
    fn from(config: &BuildConfig) -> Self {
        BuildOptions {
            line_tag: config.line_tag().map(str::to_string),
            object_tags: config.object_tags.clone(),
            preserve_whitespace_tags: config.preserve_whitespace_tags.clone(),
            coalesce_adjacent: config.coalesce_adjacent,
        }
    }
}

impl From<BuildConfig> for BuildOptions {
    fn from(config: BuildConfig) -> Self {
        BuildOptions::from(&config)
    }
}

/// Ready-made filters applied while building.
#[derive(Debug, Clone, Deserialize)]
pub struct FilterConfig {
    pub strip_padding: bool,
    pub private_attribute_prefix: String,
    #[serde(default)]
    pub remove_tags: Vec<String>,
    #[serde(default)]
    pub unwrap_tags: Vec<String>,
}

impl FilterConfig {
    /// Filters borrowing the configured tag lists.
    pub fn to_filters<N: MarkupNode>(&self) -> Filters<'_, N> {
        let mut filters = Filters::new();
        if !self.remove_tags.is_empty() {
            filters = filters.with_remove_node(|node: &N| tag_in(node, &self.remove_tags));
        }
        if !self.unwrap_tags.is_empty() {
            filters = filters.with_unwrap_node(|node: &N| tag_in(node, &self.unwrap_tags));
        }
        if let Some(prefix) = non_empty(&self.private_attribute_prefix) {
            filters = filters.with_remove_attribute(attribute_prefix(prefix));
        }
        if self.strip_padding {
            filters = filters.with_filter_string(strip_padding);
        }
        filters
    }
}

fn tag_in<N: MarkupNode>(node: &N, tags: &[String]) -> bool {
    node.tag_name()
        .is_some_and(|tag| tags.iter().any(|candidate| *candidate == tag))
}

#[derive(Debug, Clone, Deserialize)]
pub struct SerializeConfig {
    pub line_tag: String,
}

impl SerializeConfig {
    pub fn line_tag(&self) -> Option<&str> {
        non_empty(&self.line_tag)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub pretty: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl RichValueConfig {
    /// Line tag for writing markup: the serialize setting, else the build one.
    pub fn serialize_line_tag(&self) -> Option<&str> {
        self.serialize.line_tag().or_else(|| self.build.line_tag())
    }
}

fn non_empty(value: &str) -> Option<&str> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<RichValueConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<RichValueConfig, ConfigError> {
    Loader::new().build()
}
