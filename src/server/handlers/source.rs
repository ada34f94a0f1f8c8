//! Source files panel.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Response,
};
use serde::Deserialize;

use super::super::template_structs::{SourceTemplate, SourceView};
use super::super::AppState;
use super::helpers::{error_page, render, text_download};
use crate::config::SourceFile;
use crate::logging::error_chain;
use crate::utils::source_language;

#[derive(Debug, Deserialize)]
pub struct SourceParams {
    pub file: String,
}

/// Show every configured source file verbatim.
pub async fn show_source(State(state): State<AppState>) -> Response {
    let mut files = Vec::with_capacity(state.settings.source_files.len());
    for file in &state.settings.source_files {
        files.push(load_view(&state, file).await);
    }

    render(&SourceTemplate {
        title: "Source Code",
        active: "source",
        files,
    })
}

async fn load_view(state: &AppState, file: &SourceFile) -> SourceView {
    let path = state.settings.base_dir.join(&file.path);
    let (content, error) = match tokio::fs::read_to_string(&path).await {
        Ok(content) => (Some(content), None),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            (None, Some(format!("File not found: {}", file.path)))
        }
        Err(e) => {
            let reason = error_chain(&e);
            tracing::error!(error = %reason, "Error reading {}", path.display());
            (None, Some(format!("Error reading {}: {}", file.path, reason)))
        }
    };

    SourceView {
        path: file.path.clone(),
        description: file.description.clone(),
        language: source_language(&file.path),
        download_url: format!("/source/download?file={}", urlencoding::encode(&file.path)),
        content,
        error,
    }
}

/// Download one of the configured source files.
pub async fn download_source(
    State(state): State<AppState>,
    Query(params): Query<SourceParams>,
) -> Response {
    let Some(file) = state
        .settings
        .source_files
        .iter()
        .find(|f| f.path == params.file)
    else {
        return error_page(StatusCode::NOT_FOUND, "Not Found", "Unknown source file");
    };

    let path = state.settings.base_dir.join(&file.path);
    match tokio::fs::read_to_string(&path).await {
        Ok(content) => {
            let name = std::path::Path::new(&file.path)
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| file.path.clone());
            text_download(&name, content)
        }
        Err(_) => error_page(
            StatusCode::NOT_FOUND,
            "Not Found",
            &format!("File not found: {}", file.path),
        ),
    }
}
