//! Askama template structs for the web interface.
//!
//! Each struct corresponds to an HTML template in the templates/ directory.
//! Askama provides compile-time verification that templates are valid.

use askama::Template;

use crate::services::BatchItem;

/// Status message shown at the top of a panel or card.
pub struct Notice {
    /// One of `success`, `info`, `warning`, `error` (CSS class).
    pub kind: &'static str,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: "success",
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: "info",
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: "warning",
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: "error",
            message: message.into(),
        }
    }
}

/// An editable text card (uploads and saved outputs).
pub struct TextCard {
    pub title: String,
    pub key: String,
    /// Artifact the save button rewrites; no form is shown without one.
    pub artifact: Option<String>,
    pub text: String,
    pub preview: Option<String>,
    pub error: Option<String>,
    /// Panel the edit form returns to.
    pub return_to: &'static str,
}

impl TextCard {
    /// Card for one processed upload, reading its text from the session.
    pub fn from_batch_item(item: &BatchItem, text: Option<&str>) -> Self {
        Self {
            title: format!("Results for {}", item.filename),
            key: item.key.clone(),
            artifact: item.artifact.clone(),
            text: text.unwrap_or_default().to_string(),
            preview: item.preview.clone(),
            error: item.error.clone(),
            return_to: "/ocr",
        }
    }
}

/// Sample image in the gallery.
pub struct SampleImage {
    pub name: String,
    pub url: String,
    pub size_str: String,
}

/// A configured source file with its contents.
pub struct SourceView {
    pub path: String,
    pub description: String,
    pub language: &'static str,
    pub download_url: String,
    pub content: Option<String>,
    pub error: Option<String>,
}

/// Option in a `<select>`.
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// OCR panel.
#[derive(Template)]
#[template(path = "ocr.html")]
pub struct OcrTemplate<'a> {
    pub title: &'a str,
    pub active: &'a str,
    pub notices: Vec<Notice>,
    pub backend: String,
    pub samples: Vec<SampleImage>,
    pub cards: Vec<TextCard>,
    pub max_upload_mb: usize,
}

/// Saved outputs panel.
#[derive(Template)]
#[template(path = "outputs.html")]
pub struct OutputsTemplate<'a> {
    pub title: &'a str,
    pub active: &'a str,
    pub notices: Vec<Notice>,
    pub output_dir: String,
    pub cards: Vec<TextCard>,
}

/// Documentation panel.
#[derive(Template)]
#[template(path = "docs.html")]
pub struct DocsTemplate<'a> {
    pub title: &'a str,
    pub active: &'a str,
    pub notices: Vec<Notice>,
    pub body_html: String,
}

/// Source files panel.
#[derive(Template)]
#[template(path = "source.html")]
pub struct SourceTemplate<'a> {
    pub title: &'a str,
    pub active: &'a str,
    pub files: Vec<SourceView>,
}

/// Logs panel.
#[derive(Template)]
#[template(path = "logs.html")]
pub struct LogsTemplate<'a> {
    pub title: &'a str,
    pub active: &'a str,
    pub notices: Vec<Notice>,
    pub files: Vec<SelectOption>,
    pub levels: Vec<SelectOption>,
    pub query: String,
    pub selected_file: Option<String>,
    pub download_url: String,
    /// Filtered lines, newline-joined.
    pub log_text: String,
    pub shown_lines: usize,
    pub total_lines: usize,
}

/// Error page template.
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate<'a> {
    pub title: &'a str,
    pub active: &'a str,
    pub message: &'a str,
}
