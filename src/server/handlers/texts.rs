//! Edit form shared by the OCR and outputs panels.

use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use super::super::AppState;
use super::helpers::{session_id, text_download};
use crate::services::save_edit;

/// Panels an edit form may return to.
const RETURN_TARGETS: &[&str] = &["/ocr", "/outputs"];

#[derive(Debug, Deserialize)]
pub struct TextForm {
    pub key: String,
    pub artifact: String,
    pub text: String,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub return_to: Option<String>,
}

/// Browsers submit textarea content with CRLF line breaks.
fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n")
}

/// Save the edited text or send it back as a download.
pub async fn submit_text(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<TextForm>,
) -> Response {
    let (jar, id) = session_id(jar);
    let text = normalize_newlines(&form.text);

    if form.action.as_deref() == Some("download") {
        state
            .sessions
            .with_session(&id, |session| session.texts.set(&form.key, text.as_str()));
        tracing::debug!("Download requested for {}", form.artifact);
        return (jar, text_download(&form.artifact, text)).into_response();
    }

    let result = state.sessions.with_session(&id, |session| {
        save_edit(&state.store, &mut session.texts, &form.key, &form.artifact, &text)
    });

    let target = form
        .return_to
        .as_deref()
        .filter(|t| RETURN_TARGETS.contains(t))
        .unwrap_or("/ocr");
    let flash = match result {
        Ok(()) => "saved",
        Err(_) => "failed",
    };
    let location = format!(
        "{}?{}={}",
        target,
        flash,
        urlencoding::encode(&form.artifact)
    );

    (jar, Redirect::to(&location)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_newlines() {
        assert_eq!(normalize_newlines("a\r\nb\r\n"), "a\nb\n");
        assert_eq!(normalize_newlines("a\nb"), "a\nb");
    }
}
