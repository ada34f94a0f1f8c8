//! OCR backend abstraction.
//!
//! A backend wraps one external recognition engine and reports what it found
//! as an ordered list of [`Detection`]s. Everything above this trait only
//! consumes the detection text.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors from OCR backends.
#[derive(Debug, Error)]
pub enum OcrError {
    #[error("Backend not available: {0}")]
    BackendNotAvailable(String),

    #[error("OCR failed: {0}")]
    OcrFailed(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("I/O error")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    ImageError(String),
}

/// Axis-aligned box around a detection, in image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    /// Smallest box containing both `self` and `other`.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        let left = self.left.min(other.left);
        let top = self.top.min(other.top);
        let right = (self.left + self.width).max(other.left + other.width);
        let bottom = (self.top + self.height).max(other.top + other.height);
        BoundingBox {
            left,
            top,
            width: right - left,
            height: bottom - top,
        }
    }
}

/// One piece of recognized text as reported by the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// Where the text was found, if the engine reports it.
    pub bbox: Option<BoundingBox>,
    /// Recognized text.
    pub text: String,
    /// Confidence score (0.0 - 1.0), if available.
    pub confidence: Option<f32>,
}

impl Detection {
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            bbox: None,
            text: text.into(),
            confidence: None,
        }
    }
}

/// Available OCR backend types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OcrBackendType {
    /// Tesseract OCR via command-line.
    Tesseract,
    /// Pure Rust OCR engine (ocrs crate).
    Ocrs,
}

impl OcrBackendType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OcrBackendType::Tesseract => "tesseract",
            OcrBackendType::Ocrs => "ocrs",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "tesseract" => Some(OcrBackendType::Tesseract),
            "ocrs" => Some(OcrBackendType::Ocrs),
            _ => None,
        }
    }
}

impl std::fmt::Display for OcrBackendType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Trait for OCR backends.
///
/// Backends are constructed once and shared for the whole process, so any
/// expensive setup belongs in the constructor rather than in `detect`.
pub trait OcrBackend: Send + Sync {
    /// Get the backend type.
    fn backend_type(&self) -> OcrBackendType;

    /// Check if this backend is available (dependencies installed, models present).
    fn is_available(&self) -> bool;

    /// Get a description of what's needed to make this backend available.
    fn availability_hint(&self) -> String;

    /// Recognize text in an image file, in reading order.
    fn detect(&self, image_path: &Path) -> Result<Vec<Detection>, OcrError>;
}

/// Configuration for OCR backends (language, model paths).
#[derive(Debug, Clone)]
pub struct OcrConfig {
    /// Language for OCR (e.g., "eng", "chi_sim").
    pub language: String,
    /// Path to model files (for backends that need them).
    pub model_path: Option<PathBuf>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            language: "eng".to_string(),
            model_path: None,
        }
    }
}
