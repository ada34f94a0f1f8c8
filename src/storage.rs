//! Flat-file storage for extracted text.
//!
//! Each processed image gets one `.txt` artifact in the output directory.
//! Artifact names are derived from the source file's base name only, so two
//! sources with the same base name share (and overwrite) one artifact.

use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Extension of artifacts managed by the store.
pub const ARTIFACT_EXTENSION: &str = "txt";

/// Suffix appended to a source base name to form its artifact name.
const OUTPUT_SUFFIX: &str = "_output";

/// Artifact name for a source filename: `<base_name>_output.txt`.
pub fn output_name_for(filename: &str) -> String {
    let stem = Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("upload");
    format!("{}{}.{}", stem, OUTPUT_SUFFIX, ARTIFACT_EXTENSION)
}

/// Reads and writes text artifacts under one directory.
#[derive(Debug, Clone)]
pub struct ResultStore {
    dir: PathBuf,
}

impl ResultStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of an artifact, rejecting names that would escape the directory
    /// or that are not `.txt` files.
    pub fn path_for(&self, name: &str) -> AppResult<PathBuf> {
        let is_artifact = Path::new(name)
            .extension()
            .is_some_and(|ext| ext == ARTIFACT_EXTENSION);
        if !is_artifact
            || name.contains("..")
            || name.contains('/')
            || name.contains('\\')
        {
            return Err(AppError::NotFound(name.to_string()));
        }
        Ok(self.dir.join(name))
    }

    /// Persist text under `name`, replacing any previous content.
    pub fn write(&self, name: &str, text: &str) -> AppResult<PathBuf> {
        let path = self.path_for(name)?;
        std::fs::create_dir_all(&self.dir).map_err(|e| AppError::io(&self.dir, e))?;
        std::fs::write(&path, text).map_err(|e| AppError::io(&path, e))?;
        tracing::info!("Saved text to {}", path.display());
        Ok(path)
    }

    /// Read the artifact stored under `name`.
    pub fn read(&self, name: &str) -> AppResult<String> {
        let path = self.path_for(name)?;
        std::fs::read_to_string(&path).map_err(|e| AppError::from_io(&path, e))
    }

    /// Names of all artifacts, sorted.
    ///
    /// A missing directory is reported as [`AppError::NotFound`].
    pub fn list(&self) -> AppResult<Vec<String>> {
        let entries = std::fs::read_dir(&self.dir).map_err(|e| AppError::from_io(&self.dir, e))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| AppError::io(&self.dir, e))?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let is_artifact = path
                .extension()
                .is_some_and(|ext| ext == ARTIFACT_EXTENSION);
            if let (true, Some(name)) = (is_artifact, path.file_name().and_then(|n| n.to_str())) {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}
