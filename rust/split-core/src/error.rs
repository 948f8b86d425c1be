// rust/split-core/src/error.rs

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SplitError {

    #[error("No input found")]
    NoInput,

    #[error("Path '{path}' does not exist")]
    NotFound {
        path: PathBuf,
    },

    #[error("Storage error at '{path}': {message}")]
    Storage {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Descriptor '{reference}' error: {message}")]
    Descriptor {
        reference: String,
        message: String,
    },

    #[error("Corrupt split record: {message}")]
    CorruptRecord {
        message: String,
    },

    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Serialization error: {message}")]
    Serialization {
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, SplitError>;

// Convenience constructors
impl SplitError {

    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    pub fn storage(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Storage {
            path: path.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Wraps an I/O error, mapping `NotFound` to [`SplitError::NotFound`].
    pub fn storage_with_source(
        path: impl Into<PathBuf>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            return Self::NotFound { path };
        }
        Self::Storage {
            path,
            message: message.into(),
            source: Some(source),
        }
    }

    pub fn descriptor(reference: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Descriptor {
            reference: reference.into(),
            message: message.into(),
        }
    }

    pub fn corrupt_record(message: impl Into<String>) -> Self {
        Self::CorruptRecord {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    pub fn config_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Returns true if this error reports a missing storage location.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_not_found_maps_to_not_found() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = SplitError::storage_with_source("/a/b", "failed to open file", io);
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Path '/a/b' does not exist");
    }

    #[test]
    fn test_other_io_error_stays_storage() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = SplitError::storage_with_source("/a/b", "failed to open file", io);
        assert!(matches!(err, SplitError::Storage { .. }));
        assert!(err.to_string().contains("failed to open file"));
    }
}
