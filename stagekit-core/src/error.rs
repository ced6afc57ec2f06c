//! Error types and result aliases.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to {op} {}: {source}", .path.display())]
    Fs {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error in {}: {error}", .path.display())]
    Toml {
        error: toml::de::Error,
        path: PathBuf,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("No public folder found for project: {project}. Expected {}", .path.display())]
    MissingPublicDir { project: String, path: PathBuf },

    #[error("Required file not found: {}", .0.display())]
    MissingEntry(PathBuf),

    #[error("Projects {first} and {second} would both be staged as '{name}'")]
    DuplicateStageName {
        name: String,
        first: String,
        second: String,
    },

    #[error("Refusing to publish into {}: {reason}", .path.display())]
    UnsafeDistRoot { path: PathBuf, reason: String },

    #[error("Failed to launch {tool}: {source}")]
    ToolSpawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} exited with {status}: {command}")]
    ToolFailed {
        tool: String,
        status: String,
        command: String,
    },

    #[error("Runtime script {} is missing anchor lines: {}", .script.display(), .anchors.join(", "))]
    MissingAnchors {
        script: PathBuf,
        anchors: Vec<String>,
    },

    #[error("Interrupted")]
    Interrupted,
}

impl Error {
    /// Wraps an IO error with the operation and the path it failed on.
    pub fn fs(op: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Fs {
            op,
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
