use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("Required field '{field}' must not be empty")]
    EmptyField { field: &'static str },

    #[error("Group '{group}' has no programs (call .add_program() before rendering)")]
    EmptyGroup { group: String },

    #[error("Invalid autorestart value '{0}' (expected true, false or unexpected)")]
    InvalidAutoRestart(String),

    #[error("Unknown key '{key}' in {path} (line {line})")]
    UnknownKey {
        key: String,
        path: PathBuf,
        line: usize,
    },

    #[error("Unknown keys in manifest")]
    UnknownKeys(Vec<SupervisorError>),

    #[error("Manifest {path} declares no [[program]] entries")]
    EmptyManifest { path: PathBuf },

    #[error("Failed to parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to read {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid settings: {reason}")]
    InvalidSetting { reason: String },

    #[error("Settings error: {0}")]
    SettingsError(#[from] confique::Error),
}
