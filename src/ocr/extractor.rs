//! Text extraction from image bytes.

use std::io::Write;

use super::backend::{Detection, OcrBackend, OcrError};

/// Turns image bytes into recognized text lines using one shared backend.
pub struct TextExtractor {
    backend: Box<dyn OcrBackend>,
}

impl TextExtractor {
    pub fn new(backend: Box<dyn OcrBackend>) -> Self {
        Self { backend }
    }

    /// The backend doing the recognition.
    pub fn backend(&self) -> &dyn OcrBackend {
        self.backend.as_ref()
    }

    /// Run the backend on raw image bytes and return its detections.
    ///
    /// Backends read from disk, so the bytes are staged in a temp file that
    /// is removed when this returns.
    pub fn detections(&self, image_bytes: &[u8]) -> Result<Vec<Detection>, OcrError> {
        let suffix = image::guess_format(image_bytes)
            .ok()
            .and_then(|f| f.extensions_str().first().copied())
            .map(|ext| format!(".{}", ext))
            .unwrap_or_else(|| ".img".to_string());

        let mut tmp = tempfile::Builder::new()
            .prefix("ocrdesk-")
            .suffix(&suffix)
            .tempfile()?;
        tmp.write_all(image_bytes)?;
        tmp.flush()?;

        self.backend.detect(tmp.path())
    }

    /// Recognized text lines, in the order the engine reported them.
    pub fn extract(&self, image_bytes: &[u8]) -> Result<Vec<String>, OcrError> {
        Ok(self
            .detections(image_bytes)?
            .into_iter()
            .map(|d| d.text)
            .collect())
    }

    /// Recognized text lines joined with newlines.
    pub fn extract_text(&self, image_bytes: &[u8]) -> Result<String, OcrError> {
        Ok(self.extract(image_bytes)?.join("\n"))
    }
}
