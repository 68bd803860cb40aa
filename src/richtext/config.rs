//! Layered configuration for richtext tools.
//!
//! `defaults/richtext.default.toml` is embedded so the documented defaults and the
//! runtime defaults cannot drift apart. Callers layer their own files and
//! overrides on top through [`Loader`] and deserialize into [`RichtextConfig`].

use crate::richtext::pipeline::ProcessOptions;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../../defaults/richtext.default.toml");

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RichtextConfig {
    pub parsing: ParsingConfig,
    pub output: OutputConfig,
}

/// Options shared by the tokenizer, parser and layout resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ParsingConfig {
    pub case_insensitive_commands: bool,
    pub utf8: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OutputConfig {
    pub format: String,
    pub show_offsets: bool,
}

impl From<ParsingConfig> for ProcessOptions {
    fn from(parsing: ParsingConfig) -> Self {
        ProcessOptions {
            case_insensitive_commands: parsing.case_insensitive_commands,
            utf8: parsing.utf8,
        }
    }
}

/// Layers user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files are an error at build time.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer a configuration file that may be absent.
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override, e.g. from a command line flag.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<RichtextConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

pub fn load_defaults() -> Result<RichtextConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert!(config.parsing.case_insensitive_commands);
        assert!(config.parsing.utf8);
        assert_eq!(config.output.format, "treeviz");
        assert!(!config.output.show_offsets);
    }

    #[test]
    fn overrides_win_over_defaults() {
        let config = Loader::new()
            .set_override("parsing.utf8", false)
            .expect("override to apply")
            .set_override("output.format", "json")
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert!(!config.parsing.utf8);
        assert_eq!(config.output.format, "json");
        assert!(config.parsing.case_insensitive_commands);
    }

    #[test]
    fn missing_optional_file_is_ignored() {
        let config = Loader::new()
            .with_optional_file("does-not-exist/richtext.toml")
            .build()
            .expect("config to build");
        assert_eq!(config.output.format, "treeviz");
    }

    #[test]
    fn missing_required_file_fails() {
        let result = Loader::new()
            .with_file("does-not-exist/richtext.toml")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn parsing_config_converts_to_process_options() {
        let options: ProcessOptions = ParsingConfig {
            case_insensitive_commands: false,
            utf8: false,
        }
        .into();
        assert!(!options.case_insensitive_commands);
        assert!(!options.utf8);
    }
}
