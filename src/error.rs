//! Error taxonomy shared by the panels.

use std::path::PathBuf;

use thiserror::Error;

use crate::ocr::OcrError;

/// Errors surfaced to the user as non-fatal panel messages.
#[derive(Debug, Error)]
pub enum AppError {
    /// The upload could not be decoded as an image.
    #[error("Could not read image {filename}: {reason}")]
    Decode { filename: String, reason: String },

    /// The OCR engine failed.
    #[error("Text extraction failed")]
    Extraction(#[from] OcrError),

    /// Filesystem read/write failure.
    #[error("I/O error on {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Missing artifact, log, or documentation file.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::Io {
            path: path.into(),
            source,
        }
    }

    /// Map an I/O error, turning `NotFound` into [`AppError::NotFound`].
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            AppError::NotFound(path.display().to_string())
        } else {
            AppError::Io { path, source }
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
