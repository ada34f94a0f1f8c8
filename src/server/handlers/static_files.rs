//! Static file serving handlers.

use std::path::Path as FsPath;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use super::super::assets;
use super::super::template_structs::SampleImage;
use super::super::AppState;
use super::helpers::error_page;
use crate::logging::error_chain;
use crate::services::upload::is_supported_upload;
use crate::utils::format_size;

/// Sample images in `dir`, sorted by name. A missing directory has none.
pub async fn list_samples(dir: &FsPath) -> Vec<SampleImage> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    let mut samples = Vec::new();
    while let Ok(Some(entry)) = entries.next_entry().await {
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        if !is_supported_upload(&name) {
            continue;
        }
        let Ok(meta) = entry.metadata().await else {
            continue;
        };
        if !meta.is_file() {
            continue;
        }
        samples.push(SampleImage {
            url: format!("/samples/{}", urlencoding::encode(&name)),
            size_str: format_size(meta.len()),
            name,
        });
    }
    samples.sort_by(|a, b| a.name.cmp(&b.name));
    samples
}

/// Serve a sample image as a download.
pub async fn serve_sample(State(state): State<AppState>, Path(name): Path<String>) -> Response {
    let dir = &state.settings.samples_dir;
    let known = list_samples(dir).await.into_iter().any(|s| s.name == name);
    if !known {
        return error_page(StatusCode::NOT_FOUND, "Not Found", "Sample image not found");
    }

    let path = dir.join(&name);
    match tokio::fs::read(&path).await {
        Ok(content) => {
            let mime = mime_guess::from_path(&path)
                .first_or_octet_stream()
                .to_string();
            let disposition = format!("inline; filename=\"{}\"", name);
            (
                [
                    (header::CONTENT_TYPE, mime),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                content,
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!(error = %error_chain(&e), "Error reading sample {}", path.display());
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to read file").into_response()
        }
    }
}

/// Serve CSS.
pub async fn serve_css() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/css")], assets::CSS)
}
