//! Configuration management for ocrdesk using the prefer crate.
//!
//! `Config` is what the user writes (`ocrdesk.toml`); `Settings` is the
//! resolved view with absolute paths that the rest of the program uses.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ocr::{OcrBackendType, OcrConfig};

/// Default address the web server binds to.
pub const DEFAULT_BIND: &str = "127.0.0.1:8501";

/// A file shown on the source panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceFile {
    /// Path relative to the config base directory.
    pub path: String,
    /// One-line description shown next to the file name.
    #[serde(default)]
    pub description: String,
}

impl SourceFile {
    fn new(path: &str, description: &str) -> Self {
        Self {
            path: path.to_string(),
            description: description.to_string(),
        }
    }
}

fn default_source_files() -> Vec<SourceFile> {
    vec![
        SourceFile::new("src/main.rs", "Main application file"),
        SourceFile::new("Cargo.toml", "Project dependencies"),
        SourceFile::new(".gitignore", "Git ignore rules"),
        SourceFile::new("LICENSE", "MIT License"),
    ]
}

/// OCR engine section of the config file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OcrSection {
    /// Backend name: "tesseract" (default) or "ocrs".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,
    /// Recognition language (Tesseract language code).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Directory holding model files for backends that need them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_path: Option<String>,
}

/// Configuration file contents. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub samples_dir: Option<String>,
    /// Markdown file rendered on the documentation panel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docs_file: Option<String>,
    /// Address for `ocrdesk serve` when none is given on the command line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind: Option<String>,
    #[serde(default)]
    pub ocr: OcrSection,
    /// Files listed on the source panel (defaults to the main sources).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_files: Option<Vec<SourceFile>>,

    /// Path this config was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration using prefer crate for discovery.
    /// Automatically discovers ocrdesk config files in standard locations.
    pub async fn load() -> Self {
        match prefer::load("ocrdesk").await {
            Ok(pref_config) => {
                if let Some(path) = pref_config.source_path() {
                    match Self::load_from_path(path).await {
                        Ok(config) => config,
                        Err(e) => {
                            tracing::warn!("{}", e);
                            Self::default()
                        }
                    }
                } else {
                    Self::default()
                }
            }
            Err(_) => Self::default(),
        }
    }

    /// Load configuration from a specific TOML file.
    pub async fn load_from_path(path: &Path) -> Result<Self, String> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| format!("Failed to read config file {}: {}", path.display(), e))?;

        let mut config = Self::parse_toml(&contents)?;
        config.source_path = Some(path.to_path_buf());
        Ok(config)
    }

    pub fn parse_toml(contents: &str) -> Result<Self, String> {
        toml::from_str(contents).map_err(|e| format!("Failed to parse TOML config: {}", e))
    }

    /// Get the base directory for resolving relative paths.
    /// Returns the config file's parent directory if available, otherwise None.
    pub fn base_dir(&self) -> Option<PathBuf> {
        self.source_path
            .as_ref()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    /// Resolve a path that may be relative to the config file.
    /// - Absolute paths are returned as-is
    /// - Paths starting with ~ are expanded
    /// - Relative paths are resolved relative to `base_dir`
    pub fn resolve_path(&self, path_str: &str, base_dir: &Path) -> PathBuf {
        let expanded = shellexpand::tilde(path_str);
        let path = Path::new(expanded.as_ref());

        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base_dir.join(path)
        }
    }

    /// Apply configuration to settings.
    pub fn apply_to_settings(&self, settings: &mut Settings, base_dir: &Path) {
        settings.base_dir = base_dir.to_path_buf();
        settings.output_dir = self.resolve_path(self.output_dir.as_deref().unwrap_or("output"), base_dir);
        settings.log_dir = self.resolve_path(self.log_dir.as_deref().unwrap_or("logs"), base_dir);
        settings.samples_dir =
            self.resolve_path(self.samples_dir.as_deref().unwrap_or("sample_images"), base_dir);
        settings.docs_file =
            self.resolve_path(self.docs_file.as_deref().unwrap_or("README.md"), base_dir);
        if let Some(ref bind) = self.bind {
            settings.bind = bind.clone();
        }
        if let Some(ref files) = self.source_files {
            settings.source_files = files.clone();
        }
        if let Some(ref backend) = self.ocr.backend {
            match OcrBackendType::parse(backend) {
                Some(backend_type) => settings.ocr_backend = backend_type,
                None => tracing::warn!("Unknown OCR backend {:?}, using tesseract", backend),
            }
        }
        if let Some(ref language) = self.ocr.language {
            settings.ocr.language = language.clone();
        }
        if let Some(ref model_path) = self.ocr.model_path {
            settings.ocr.model_path = Some(self.resolve_path(model_path, base_dir));
        }
    }
}

/// Application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Directory relative paths were resolved against.
    pub base_dir: PathBuf,
    /// Where text artifacts are written.
    pub output_dir: PathBuf,
    /// Where per-process log files are written.
    pub log_dir: PathBuf,
    /// Read-only example images.
    pub samples_dir: PathBuf,
    /// Markdown documentation file.
    pub docs_file: PathBuf,
    /// Files shown on the source panel.
    pub source_files: Vec<SourceFile>,
    /// Default bind address for the server.
    pub bind: String,
    /// OCR engine to construct at startup.
    pub ocr_backend: OcrBackendType,
    pub ocr: OcrConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self::with_base_dir(PathBuf::from("."))
    }
}

impl Settings {
    /// Default settings with every directory under `base_dir`.
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self {
            output_dir: base_dir.join("output"),
            log_dir: base_dir.join("logs"),
            samples_dir: base_dir.join("sample_images"),
            docs_file: base_dir.join("README.md"),
            source_files: default_source_files(),
            bind: DEFAULT_BIND.to_string(),
            ocr_backend: OcrBackendType::Tesseract,
            ocr: OcrConfig::default(),
            base_dir,
        }
    }

    /// Create the output and log directories.
    pub fn ensure_directories(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.output_dir)?;
        std::fs::create_dir_all(&self.log_dir)?;
        Ok(())
    }

    /// Apply `OCRDESK_*` environment overrides.
    fn apply_env_overrides(&mut self) {
        if let Some(backend) = std::env::var("OCRDESK_OCR_BACKEND")
            .ok()
            .filter(|s| !s.is_empty())
        {
            match OcrBackendType::parse(&backend) {
                Some(backend_type) => self.ocr_backend = backend_type,
                None => tracing::warn!("Ignoring unknown OCRDESK_OCR_BACKEND={}", backend),
            }
        }
        if let Some(language) = std::env::var("OCRDESK_OCR_LANGUAGE")
            .ok()
            .filter(|s| !s.is_empty())
        {
            self.ocr.language = language;
        }
    }
}

/// Options for loading settings.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Explicit config file path (overrides auto-discovery).
    pub config_path: Option<PathBuf>,
    /// Use CWD for relative paths instead of config file directory.
    pub use_cwd: bool,
}

/// Load config from file sources.
///
/// A file named with `--config` must load; a discovered one that fails
/// falls back to defaults with a warning.
async fn load_file_config(options: &LoadOptions) -> Result<Config, String> {
    // Priority 1: Explicit --config flag
    if let Some(ref config_path) = options.config_path {
        return Config::load_from_path(config_path).await;
    }

    // Priority 2: Auto-discover via prefer
    Ok(Config::load().await)
}

/// Resolve settings from a config, without touching the environment.
pub fn resolve_settings(config: &Config, use_cwd: bool) -> Settings {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let base_dir = if use_cwd {
        cwd
    } else {
        config.base_dir().unwrap_or(cwd)
    };

    let mut settings = Settings::with_base_dir(base_dir.clone());
    config.apply_to_settings(&mut settings, &base_dir);
    settings
}

/// Load settings with explicit options.
/// Returns (Settings, Config) tuple.
pub async fn load_settings_with_options(
    options: LoadOptions,
) -> Result<(Settings, Config), String> {
    let config = load_file_config(&options).await?;
    let mut settings = resolve_settings(&config, options.use_cwd);
    settings.apply_env_overrides();
    Ok((settings, config))
}
