//! OCR panel: samples, uploads and the session's latest results.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::{CookieJar, Multipart};

use super::super::template_structs::{Notice, OcrTemplate, TextCard};
use super::super::{AppState, MAX_UPLOAD_BYTES};
use super::helpers::{render, session_id, FlashParams};
use super::static_files::list_samples;
use crate::logging::error_chain;
use crate::services::{ImageUpload, UploadOrchestrator};

/// Form field carrying the uploaded images.
const FILES_FIELD: &str = "files";

/// Render the OCR panel with the session's last batch.
pub async fn ocr_panel(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(flash): Query<FlashParams>,
) -> Response {
    let (jar, id) = session_id(jar);
    let cards: Vec<TextCard> = state.sessions.with_session(&id, |session| {
        session
            .last_batch
            .iter()
            .map(|item| TextCard::from_batch_item(item, session.texts.get(&item.key)))
            .collect()
    });

    (jar, render_panel(&state, flash.notices(), cards).await).into_response()
}

/// Accept a multipart upload and process every image in it.
pub async fn upload_images(
    State(state): State<AppState>,
    jar: CookieJar,
    mut multipart: Multipart,
) -> Response {
    let (jar, id) = session_id(jar);
    let mut notices = Vec::new();
    let mut uploads = Vec::new();

    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                if field.name() != Some(FILES_FIELD) {
                    continue;
                }
                let filename = match field.file_name() {
                    Some(name) if !name.is_empty() => name.to_string(),
                    _ => continue,
                };
                match field.bytes().await {
                    Ok(bytes) => uploads.push(ImageUpload::new(filename, bytes.to_vec())),
                    Err(e) => {
                        let reason = error_chain(&e);
                        tracing::error!(error = %reason, "Error reading upload {}", filename);
                        notices.push(Notice::error(format!("Could not read {}: {}", filename, reason)));
                    }
                }
            }
            Ok(None) => break,
            Err(e) => {
                let reason = error_chain(&e);
                tracing::error!(error = %reason, "Malformed upload request");
                notices.push(Notice::error(format!("Upload failed: {}", reason)));
                break;
            }
        }
    }

    if uploads.is_empty() {
        if notices.is_empty() {
            notices.push(Notice::warning("No files were uploaded"));
        }
        return (jar, render_panel(&state, notices, Vec::new()).await).into_response();
    }

    let extractor = state.extractor.clone();
    let store = state.store.clone();
    let processed = tokio::task::spawn_blocking(move || {
        UploadOrchestrator::new(&extractor, &store).process_batch(uploads)
    })
    .await;

    let cards: Vec<TextCard> = match processed {
        Ok(batch) => state.sessions.with_session(&id, |session| {
            let items = batch.record(&mut session.texts);
            let cards: Vec<TextCard> = items
                .iter()
                .map(|item| TextCard::from_batch_item(item, session.texts.get(&item.key)))
                .collect();
            session.last_batch = items;
            cards
        }),
        Err(e) => {
            tracing::error!(error = %error_chain(&e), "Upload processing task failed");
            notices.push(Notice::error("Processing failed unexpectedly"));
            Vec::new()
        }
    };

    let saved = cards.iter().filter(|c| c.error.is_none()).count();
    if saved > 0 {
        notices.push(Notice::success(format!(
            "Processed {} of {} image(s)",
            saved,
            cards.len()
        )));
    }

    (jar, render_panel(&state, notices, cards).await).into_response()
}

async fn render_panel(state: &AppState, notices: Vec<Notice>, cards: Vec<TextCard>) -> Response {
    let samples = list_samples(&state.settings.samples_dir).await;
    let template = OcrTemplate {
        title: "OCR Processing",
        active: "ocr",
        notices,
        backend: state.extractor.backend().backend_type().to_string(),
        samples,
        cards,
        max_upload_mb: MAX_UPLOAD_BYTES / (1024 * 1024),
    };
    render(&template)
}
