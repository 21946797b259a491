//! Error types for configuration loading

use std::path::PathBuf;
use thiserror::Error;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file
    #[error("failed to read file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse YAML
    #[error("failed to parse YAML in {path}: {source}")]
    ParseYaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A tag that is not one of the Home Assistant tags
    #[error("unknown tag '{tag}' in {path}")]
    UnknownTag { path: PathBuf, tag: String },

    /// A Home Assistant tag applied to a mapping or sequence
    #[error("tag '!{tag}' in {path} must be applied to a scalar")]
    InvalidTagPayload { path: PathBuf, tag: String },

    /// Failed to read the validator settings file
    #[error("failed to read settings {path}: {source}")]
    ReadSettings {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Settings file does not match the expected shape
    #[error("invalid settings in {path}: {source}")]
    ParseSettings {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

impl ConfigError {
    /// Whether the file was simply not there
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ConfigError::ReadFile { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }
}
