//! Upload processing: decode, extract, cache, persist.

use std::io::Cursor;

use base64::Engine as _;
use image::ImageFormat;

use crate::error::{AppError, AppResult};
use crate::logging::error_chain;
use crate::ocr::TextExtractor;
use crate::session::SessionTextCache;
use crate::storage::{output_name_for, ResultStore};

/// Upload extensions accepted by the OCR panel.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Whether `filename` has one of the accepted image extensions.
pub fn is_supported_upload(filename: &str) -> bool {
    std::path::Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}

/// One uploaded file, alive for a single request.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }
}

/// Outcome of processing one upload.
///
/// The text itself lives in the session cache under `key`, so edits made
/// after processing show up when the item is rendered again.
#[derive(Debug, Clone)]
pub struct BatchItem {
    pub filename: String,
    pub index: usize,
    pub key: String,
    /// Artifact the text was saved to, when extraction and saving worked.
    pub artifact: Option<String>,
    /// `data:` URL of the decoded image for display.
    pub preview: Option<String>,
    pub error: Option<String>,
}

/// Cache key of the text extracted from the `index`-th upload of a batch.
pub fn upload_text_key(filename: &str, index: usize) -> String {
    format!("text_{}_{}", filename, index)
}

/// Runs uploads through extraction and storage.
pub struct UploadOrchestrator<'a> {
    extractor: &'a TextExtractor,
    store: &'a ResultStore,
}

impl<'a> UploadOrchestrator<'a> {
    pub fn new(extractor: &'a TextExtractor, store: &'a ResultStore) -> Self {
        Self { extractor, store }
    }

    /// Process every upload in order. A failing item never stops the rest.
    ///
    /// Runs without touching session state; call [`ProcessedBatch::record`]
    /// afterwards to publish the texts to the session.
    pub fn process_batch(&self, uploads: Vec<ImageUpload>) -> ProcessedBatch {
        tracing::info!("Processing {} uploaded files", uploads.len());
        let mut batch = ProcessedBatch::default();
        for (index, upload) in uploads.into_iter().enumerate() {
            let (item, text) = self.process_one(index, upload);
            if let Some(text) = text {
                batch.texts.push((item.key.clone(), text));
            }
            batch.items.push(item);
        }
        batch
    }

    fn process_one(&self, index: usize, upload: ImageUpload) -> (BatchItem, Option<String>) {
        let span = tracing::info_span!("upload", file = %upload.filename, index);
        let _guard = span.enter();

        let mut item = BatchItem {
            key: upload_text_key(&upload.filename, index),
            filename: upload.filename.clone(),
            index,
            artifact: None,
            preview: None,
            error: None,
        };

        let decoded = match decode_upload(&upload) {
            Ok(decoded) => decoded,
            Err(e) => {
                tracing::error!(
                    error = %error_chain(&e),
                    "Error displaying image {}",
                    upload.filename
                );
                item.error = Some(error_chain(&e));
                return (item, None);
            }
        };
        item.preview = Some(decoded.preview_url());

        match self.extract_and_save(&upload.filename, &decoded) {
            Ok((artifact, text)) => {
                item.artifact = Some(artifact);
                (item, Some(text))
            }
            Err(e) => {
                tracing::error!(error = %error_chain(&e), "Error processing {}", upload.filename);
                item.error = Some(format!(
                    "Error processing {}: {}",
                    upload.filename,
                    error_chain(&e)
                ));
                (item, None)
            }
        }
    }

    fn extract_and_save(
        &self,
        filename: &str,
        decoded: &DecodedImage,
    ) -> AppResult<(String, String)> {
        tracing::info!("Processing image: {}", filename);
        tracing::debug!("Performing OCR on image");
        let text = self.extractor.extract_text(&decoded.bytes)?;
        tracing::info!("Successfully extracted text from {}", filename);

        let artifact = output_name_for(filename);
        self.store.write(&artifact, &text)?;
        Ok((artifact, text))
    }
}

/// Items of a processed batch plus the texts extracted for them.
#[derive(Debug, Default)]
pub struct ProcessedBatch {
    pub items: Vec<BatchItem>,
    texts: Vec<(String, String)>,
}

impl ProcessedBatch {
    /// Store the fresh texts in the session cache, replacing what an earlier
    /// batch left under the same keys, and hand back the items.
    pub fn record(self, cache: &mut SessionTextCache) -> Vec<BatchItem> {
        for (key, text) in self.texts {
            cache.set(&key, text);
        }
        self.items
    }
}

/// Store edited text: update the session cache and rewrite the artifact.
pub fn save_edit(
    store: &ResultStore,
    texts: &mut SessionTextCache,
    key: &str,
    artifact: &str,
    text: &str,
) -> AppResult<()> {
    texts.set(key, text);
    match store.write(artifact, text) {
        Ok(path) => {
            tracing::info!("Saved edited text to {}", path.display());
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %error_chain(&e), "Error saving changes to {}", artifact);
            Err(e)
        }
    }
}

/// An upload that decoded as an image, re-encoded in its own format.
#[derive(Debug)]
struct DecodedImage {
    format: ImageFormat,
    bytes: Vec<u8>,
}

impl DecodedImage {
    fn preview_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.format.to_mime_type(),
            base64::engine::general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

/// Verify the upload is a displayable image and re-encode it.
fn decode_upload(upload: &ImageUpload) -> AppResult<DecodedImage> {
    let decode_err = |reason: String| AppError::Decode {
        filename: upload.filename.clone(),
        reason,
    };

    if !is_supported_upload(&upload.filename) {
        return Err(decode_err(format!(
            "unsupported file type (expected one of: {})",
            SUPPORTED_EXTENSIONS.join(", ")
        )));
    }

    let format = image::guess_format(&upload.bytes).map_err(|e| decode_err(e.to_string()))?;
    let img = image::load_from_memory_with_format(&upload.bytes, format)
        .map_err(|e| decode_err(e.to_string()))?;

    let mut encoded = Vec::new();
    let written = img.write_to(&mut Cursor::new(&mut encoded), format);
    let bytes = match written {
        Ok(()) => encoded,
        Err(e) => {
            tracing::warn!(
                "Could not re-encode {} as {:?}, using original bytes: {}",
                upload.filename,
                format,
                e
            );
            upload.bytes.clone()
        }
    };

    Ok(DecodedImage { format, bytes })
}
