//! Error type shared by the filters, the image I/O layer and the pipeline.
//!
//! Every failure maps onto one of four kinds (see [`ErrorKind`]). The
//! variants themselves carry the offending path and the underlying source
//! error so callers can log something useful.

use std::path::PathBuf;

use thiserror::Error;

/// Coarse classification of a [`PreprocessError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A parameter (kernel size, bin count, array shape) is out of range.
    InvalidParameter,
    /// The input path does not exist.
    FileNotFound,
    /// The input exists but could not be decoded as an image.
    Decode,
    /// An output directory or file could not be created or written.
    Io,
}

#[derive(Error, Debug)]
pub enum PreprocessError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("file not found: {}", .path.display())]
    FileNotFound { path: PathBuf },

    #[error("could not decode image {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to create or read directory {}: {source}", .path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write image {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Unreadable, malformed or inconsistent configuration file.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl PreprocessError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidParameter(_) | Self::Configuration(_) => ErrorKind::InvalidParameter,
            Self::FileNotFound { .. } => ErrorKind::FileNotFound,
            Self::Decode { .. } => ErrorKind::Decode,
            Self::Directory { .. } | Self::Write { .. } => ErrorKind::Io,
        }
    }
}

pub type Result<T> = std::result::Result<T, PreprocessError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        let err = PreprocessError::InvalidParameter("kernel size must be odd".into());
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
        assert_eq!(err.to_string(), "invalid parameter: kernel size must be odd");

        let err = PreprocessError::FileNotFound { path: PathBuf::from("missing.png") };
        assert_eq!(err.kind(), ErrorKind::FileNotFound);
        assert!(err.to_string().contains("missing.png"));

        let err = PreprocessError::Directory {
            path: PathBuf::from("out"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.kind(), ErrorKind::Io);
    }
}
