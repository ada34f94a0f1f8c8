//! OCRS OCR backend implementation.
//!
//! Uses the ocrs crate for pure-Rust OCR without external binaries.
//! Models are downloaded on construction if they are not found locally, from:
//! https://ocrs-models.s3-accelerate.amazonaws.com/

use std::path::{Path, PathBuf};

use super::backend::{Detection, OcrBackend, OcrBackendType, OcrConfig, OcrError};
use super::model_utils::{ensure_model_file, ModelDirConfig, ModelSpec};

/// Model directory configuration for OCRS.
const MODEL_CONFIG: ModelDirConfig = ModelDirConfig {
    subdir: "ocrs",
    required_files: &["text-detection.rten", "text-recognition.rten"],
};

const DETECTION_MODEL: ModelSpec = ModelSpec {
    url: "https://ocrs-models.s3-accelerate.amazonaws.com/text-detection.rten",
    filename: "text-detection.rten",
    size_hint: "2.5 MB",
};

const RECOGNITION_MODEL: ModelSpec = ModelSpec {
    url: "https://ocrs-models.s3-accelerate.amazonaws.com/text-recognition.rten",
    filename: "text-recognition.rten",
    size_hint: "10 MB",
};

/// OCRS OCR backend (pure Rust).
///
/// Owns a loaded engine. OcrEngine is Send+Sync and its methods take &self.
pub struct OcrsBackend {
    engine: ocrs::OcrEngine,
    model_dir: PathBuf,
}

impl OcrsBackend {
    /// Load models (downloading them if needed) and build the engine.
    pub fn new(config: &OcrConfig) -> Result<Self, OcrError> {
        let model_dir = ensure_models(config)?;

        let detection_model = rten::Model::load_file(model_dir.join(DETECTION_MODEL.filename))
            .map_err(|e| OcrError::ModelNotFound(format!("detection model: {}", e)))?;
        let recognition_model = rten::Model::load_file(model_dir.join(RECOGNITION_MODEL.filename))
            .map_err(|e| OcrError::ModelNotFound(format!("recognition model: {}", e)))?;

        let engine = ocrs::OcrEngine::new(ocrs::OcrEngineParams {
            detection_model: Some(detection_model),
            recognition_model: Some(recognition_model),
            ..Default::default()
        })
        .map_err(|e| OcrError::OcrFailed(format!("Failed to create OCR engine: {}", e)))?;

        tracing::info!("OCRS engine loaded from {}", model_dir.display());
        Ok(Self { engine, model_dir })
    }
}

/// Find the model directory, checking config path and standard locations,
/// downloading into the default location when nothing is found.
fn ensure_models(config: &OcrConfig) -> Result<PathBuf, OcrError> {
    if let Some(ref path) = config.model_path {
        if MODEL_CONFIG.has_required_files(path) {
            return Ok(path.clone());
        }
    }

    if let Some(dir) = MODEL_CONFIG
        .candidate_dirs()
        .into_iter()
        .find(|dir| MODEL_CONFIG.has_required_files(dir))
    {
        return Ok(dir);
    }

    let model_dir = MODEL_CONFIG.default_dir();
    std::fs::create_dir_all(&model_dir)?;
    ensure_model_file(&DETECTION_MODEL, &model_dir)?;
    ensure_model_file(&RECOGNITION_MODEL, &model_dir)?;
    Ok(model_dir)
}

impl OcrBackend for OcrsBackend {
    fn backend_type(&self) -> OcrBackendType {
        OcrBackendType::Ocrs
    }

    fn is_available(&self) -> bool {
        MODEL_CONFIG.has_required_files(&self.model_dir)
    }

    fn availability_hint(&self) -> String {
        format!("OCRS models loaded from {:?}", self.model_dir)
    }

    fn detect(&self, image_path: &Path) -> Result<Vec<Detection>, OcrError> {
        let img = image::open(image_path)
            .map_err(|e| OcrError::ImageError(format!("Failed to load image: {}", e)))?;
        let rgb_img = img.to_rgb8();
        let (width, height) = rgb_img.dimensions();

        let img_source = ocrs::ImageSource::from_bytes(rgb_img.as_raw(), (width, height))
            .map_err(|e| OcrError::ImageError(format!("Failed to convert image: {}", e)))?;

        let input = self
            .engine
            .prepare_input(img_source)
            .map_err(|e| OcrError::OcrFailed(format!("Failed to prepare input: {}", e)))?;

        let text = self
            .engine
            .get_text(&input)
            .map_err(|e| OcrError::OcrFailed(format!("Failed to extract text: {}", e)))?;

        Ok(text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(Detection::text_only)
            .collect())
    }
}
