use std::path::PathBuf;
use thiserror::Error;

use crate::gateway::GatewayError;
use crate::mapper::MapError;

/// Failure of a single mail API operation.
#[derive(Error, Debug)]
pub enum HarvestError {
    #[error("Mail API error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Mapping error: {0}")]
    Map(#[from] MapError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("No config file found (searched: {searched})")]
    NotFound { searched: String },
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Destination '{0}' is not a directory")]
    NotADirectory(PathBuf),

    #[error("Attachment name '{0}' does not yield a usable file name")]
    UnusableName(String),

    #[error("Failed to write file '{path}': {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, HarvestError>;
