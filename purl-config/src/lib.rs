//! Shared configuration loader for the purl toolchain.
//!
//! `defaults/purl.default.toml` is embedded into every binary so that docs
//! and runtime behavior stay in sync. Applications layer user-specific
//! files on top of those defaults via [`Loader`] before deserializing into
//! [`PurlConfig`], then hand [`PurlConfig::into_options`] to the engine —
//! the engine itself takes its configuration explicitly and keeps no
//! global state.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use purl_parser::{CleanupRules, ResolveOptions, StitchVocabulary};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/purl.default.toml");

/// Top-level configuration consumed by purl applications.
#[derive(Debug, Clone, Deserialize)]
pub struct PurlConfig {
    pub sizing: SizingConfig,
    pub stitches: StitchesConfig,
    pub cleanup: CleanupConfig,
}

/// Size-variant selection knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct SizingConfig {
    pub variant_index: usize,
}

/// Stitch taxonomy: which stitch types add or remove a stitch.
#[derive(Debug, Clone, Deserialize)]
pub struct StitchesConfig {
    pub increases: Vec<String>,
    pub decreases: Vec<String>,
}

/// OCR cleanup rules.
#[derive(Debug, Clone, Deserialize)]
pub struct CleanupConfig {
    pub terms: Vec<TermRule>,
}

/// One literal replacement for OCR-garbled vocabulary.
#[derive(Debug, Clone, Deserialize)]
pub struct TermRule {
    pub wrong: String,
    pub right: String,
}

impl PurlConfig {
    /// Convert the loaded configuration into engine options.
    pub fn into_options(self) -> ResolveOptions {
        ResolveOptions {
            variant_index: self.sizing.variant_index,
            vocabulary: StitchVocabulary::from_lists(
                self.stitches.increases,
                self.stitches.decreases,
            ),
            cleanup: CleanupRules::new(
                self.cleanup
                    .terms
                    .into_iter()
                    .map(|rule| (rule.wrong, rule.right))
                    .collect(),
            ),
        }
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
    pub fn build(self) -> Result<PurlConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<PurlConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.sizing.variant_index, 0);
        assert!(config.stitches.decreases.contains(&"k2tog".to_string()));
        assert!(config.cleanup.terms.is_empty());
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("sizing.variant_index", 3i64)
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.sizing.variant_index, 3);
    }

    #[test]
    fn converts_into_engine_options() {
        let options = load_defaults()
            .expect("defaults to deserialize")
            .into_options();
        assert_eq!(options.variant_index, 0);
        assert_eq!(options.vocabulary.delta("ssk"), -1);
        assert_eq!(options.vocabulary.delta("yo"), 1);
        assert!(options.cleanup.is_empty());
    }
}
