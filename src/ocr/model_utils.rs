//! Shared utilities for OCR backends.
//!
//! Provides common functionality for:
//! - Checking for CLI tool availability
//! - Downloading and locating OCR models

// Model helpers are only used when the ocr-ocrs feature is enabled
#![cfg_attr(not(feature = "ocr-ocrs"), allow(dead_code))]

use std::path::{Path, PathBuf};
use std::process::Command;

use super::backend::OcrError;

/// Check if a binary is available in PATH.
pub fn check_binary(name: &str) -> bool {
    which::which(name).is_ok()
}

/// Model file specification for downloading.
pub struct ModelSpec {
    /// URL to download from.
    pub url: &'static str,
    /// Filename to save as.
    pub filename: &'static str,
    /// Human-readable size for progress messages.
    pub size_hint: &'static str,
}

/// Configuration for model directory management.
pub struct ModelDirConfig {
    /// Subdirectory name under data_dir (e.g., "ocrs").
    pub subdir: &'static str,
    /// Required model files to check for presence.
    pub required_files: &'static [&'static str],
}

impl ModelDirConfig {
    /// Get the default model directory for this backend.
    pub fn default_dir(&self) -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join(self.subdir)
            .join("models")
    }

    /// Get standard candidate directories to search for models.
    pub fn candidate_dirs(&self) -> Vec<PathBuf> {
        [
            dirs::data_dir().map(|d| d.join(self.subdir).join("models")),
            dirs::home_dir().map(|d| d.join(format!(".{}", self.subdir)).join("models")),
            Some(PathBuf::from(format!("./models/{}", self.subdir))),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Check if a directory contains all required model files.
    pub fn has_required_files(&self, dir: &Path) -> bool {
        self.required_files
            .iter()
            .all(|file| dir.join(file).exists())
    }
}

/// Download a file from a URL to a local path using curl.
pub fn download_file(url: &str, dest: &Path) -> Result<(), OcrError> {
    let status = Command::new("curl")
        .args(["-fSL", "--progress-bar", "-o"])
        .arg(dest)
        .arg(url)
        .status();

    match status {
        Ok(status) if status.success() => Ok(()),
        Ok(_) => {
            let _ = std::fs::remove_file(dest);
            Err(OcrError::OcrFailed(format!("Failed to download {}", url)))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(OcrError::BackendNotAvailable(
            "curl not found. Install it to download models.".to_string(),
        )),
        Err(e) => Err(OcrError::Io(e)),
    }
}

/// Download a model file if it doesn't exist.
pub fn ensure_model_file(spec: &ModelSpec, model_dir: &Path) -> Result<(), OcrError> {
    let dest = model_dir.join(spec.filename);
    if !dest.exists() {
        tracing::info!("Downloading {} (~{})", spec.filename, spec.size_hint);
        download_file(spec.url, &dest)?;
        tracing::info!("Downloaded {}", spec.filename);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: ModelDirConfig = ModelDirConfig {
        subdir: "ocrs",
        required_files: &["a.rten", "b.rten"],
    };

    #[test]
    fn test_has_required_files() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!CONFIG.has_required_files(dir.path()));

        std::fs::write(dir.path().join("a.rten"), b"").unwrap();
        assert!(!CONFIG.has_required_files(dir.path()));

        std::fs::write(dir.path().join("b.rten"), b"").unwrap();
        assert!(CONFIG.has_required_files(dir.path()));
    }

    #[test]
    fn test_check_binary_missing() {
        assert!(!check_binary("definitely-not-a-real-binary-ocrdesk"));
    }
}
