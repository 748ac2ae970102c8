//! Error types shared across trackpad crates.

use std::path::PathBuf;

/// Top-level error type for trackpad operations.
#[derive(Debug, thiserror::Error)]
pub enum TrackpadError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("No touchscreen detected")]
    DeviceNotFound,

    #[error("Device error: {message}")]
    Device { message: String },

    #[error("Touch source failed: {message}")]
    Source { message: String },

    #[error("Pointer emitter error: {message}")]
    Emitter { message: String },

    #[error("Input routing error: {message}")]
    Routing { message: String },

    #[error("Trace error: {message}")]
    Trace { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Permission denied: {message}")]
    PermissionDenied { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using TrackpadError.
pub type TrackpadResult<T> = Result<T, TrackpadError>;

impl TrackpadError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn device(msg: impl Into<String>) -> Self {
        Self::Device {
            message: msg.into(),
        }
    }

    pub fn source(msg: impl Into<String>) -> Self {
        Self::Source {
            message: msg.into(),
        }
    }

    pub fn emitter(msg: impl Into<String>) -> Self {
        Self::Emitter {
            message: msg.into(),
        }
    }

    pub fn routing(msg: impl Into<String>) -> Self {
        Self::Routing {
            message: msg.into(),
        }
    }

    pub fn trace(msg: impl Into<String>) -> Self {
        Self::Trace {
            message: msg.into(),
        }
    }

    /// Whether this error should stop the process at startup.
    pub fn is_fatal_at_startup(&self) -> bool {
        matches!(
            self,
            Self::Config { .. } | Self::DeviceNotFound | Self::PermissionDenied { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_message() {
        let err = TrackpadError::config("invalid orientation 45");
        assert_eq!(err.to_string(), "Configuration error: invalid orientation 45");
        assert!(err.is_fatal_at_startup());
    }

    #[test]
    fn test_source_error_is_not_startup_fatal() {
        let err = TrackpadError::source("device unplugged");
        assert!(!err.is_fatal_at_startup());
    }

    #[test]
    fn test_io_error_converts() {
        fn open() -> TrackpadResult<()> {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"))?;
            Ok(())
        }
        assert!(matches!(open(), Err(TrackpadError::Io(_))));
    }
}
