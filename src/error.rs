//! Error types shared by collectors and the application shell.

use std::io;

use thiserror::Error;

/// Why a single collector call could not produce its value.
///
/// Callers decide whether to degrade (placeholder, empty list) or surface it.
#[derive(Error, Debug)]
pub enum CollectError {
    #[error("access denied: {0}")]
    AccessDenied(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl CollectError {
    /// Classify an I/O error raised while reading `context`.
    pub fn from_io(context: impl Into<String>, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::PermissionDenied => CollectError::AccessDenied(context.into()),
            io::ErrorKind::NotFound => CollectError::NotFound(context.into()),
            _ => CollectError::Io(err),
        }
    }
}

/// Failure of an external helper program.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("{0} is not installed")]
    Missing(String),

    #[error("{0} timed out after {1}s")]
    Timeout(String, u64),

    #[error("{0} exited with status {1:?}")]
    Failed(String, Option<i32>),

    #[error("failed to spawn helper: {0}")]
    Spawn(io::Error),
}

/// Application-level error.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid config file: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_io_classifies_permission_denied() {
        let err = io::Error::from(io::ErrorKind::PermissionDenied);
        let classified = CollectError::from_io("/proc/1/fd", err);
        assert!(matches!(classified, CollectError::AccessDenied(_)));
        assert_eq!(classified.to_string(), "access denied: /proc/1/fd");
    }

    #[test]
    fn from_io_classifies_not_found() {
        let err = io::Error::from(io::ErrorKind::NotFound);
        assert!(matches!(
            CollectError::from_io("/nope", err),
            CollectError::NotFound(p) if p == "/nope"
        ));
    }

    #[test]
    fn from_io_keeps_other_errors() {
        let err = io::Error::other("boom");
        assert!(matches!(CollectError::from_io("x", err), CollectError::Io(_)));
    }

    #[test]
    fn tool_error_messages() {
        assert_eq!(
            ToolError::Timeout("dmidecode".into(), 5).to_string(),
            "dmidecode timed out after 5s"
        );
        assert_eq!(
            ToolError::Missing("brew".into()).to_string(),
            "brew is not installed"
        );
    }
}
