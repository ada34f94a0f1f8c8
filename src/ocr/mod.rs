//! OCR and text extraction module.
//!
//! Extracts text from images using:
//! - Tesseract OCR via its command-line binary (default)
//! - OCRS for pure-Rust OCR (feature: ocr-ocrs)
//!
//! The engine is picked from configuration and built once by
//! [`build_backend`]; callers share the resulting [`TextExtractor`].

mod backend;
mod extractor;
mod model_utils;
mod tesseract;

#[cfg(feature = "ocr-ocrs")]
mod ocrs_backend;

pub use backend::{BoundingBox, Detection, OcrBackend, OcrBackendType, OcrConfig, OcrError};
pub use extractor::TextExtractor;
pub use tesseract::{parse_tsv_lines, TesseractBackend};

#[cfg(feature = "ocr-ocrs")]
pub use ocrs_backend::OcrsBackend;

/// Construct the configured backend.
///
/// Expensive setup (model loading for OCRS) happens here, once, at startup.
pub fn build_backend(
    backend_type: OcrBackendType,
    config: OcrConfig,
) -> Result<Box<dyn OcrBackend>, OcrError> {
    match backend_type {
        OcrBackendType::Tesseract => {
            let backend = TesseractBackend::with_config(config);
            if !backend.is_available() {
                tracing::warn!("{}", backend.availability_hint());
            }
            Ok(Box::new(backend))
        }
        #[cfg(feature = "ocr-ocrs")]
        OcrBackendType::Ocrs => Ok(Box::new(OcrsBackend::new(&config)?)),
        #[cfg(not(feature = "ocr-ocrs"))]
        OcrBackendType::Ocrs => {
            let _ = config;
            Err(OcrError::BackendNotAvailable(
                "ocrs support not compiled in (rebuild with --features ocr-ocrs)".to_string(),
            ))
        }
    }
}
