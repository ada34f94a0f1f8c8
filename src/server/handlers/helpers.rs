//! Helper types and utility functions for handlers.

use askama::Template;
use axum::{
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;

use super::super::template_structs::{ErrorTemplate, Notice};
use crate::error::AppError;
use crate::logging::error_chain;
use crate::session::SESSION_COOKIE;

/// Flash parameters set by the edit form redirect.
#[derive(Debug, Default, Deserialize)]
pub struct FlashParams {
    pub saved: Option<String>,
    pub failed: Option<String>,
}

impl FlashParams {
    pub fn notices(&self) -> Vec<Notice> {
        let mut notices = Vec::new();
        if let Some(ref name) = self.saved {
            notices.push(Notice::success(format!("Changes saved successfully to {}", name)));
        }
        if let Some(ref name) = self.failed {
            notices.push(Notice::error(format!("Error saving changes to {}", name)));
        }
        notices
    }
}

/// Session id from the cookie jar, minting a new one if absent.
pub fn session_id(jar: CookieJar) -> (CookieJar, String) {
    if let Some(id) = jar
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
    {
        return (jar, id);
    }

    let id = uuid::Uuid::new_v4().to_string();
    let cookie = Cookie::build((SESSION_COOKIE, id.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);
    (jar.add(cookie), id)
}

/// Render a template, falling back to a plain error body.
pub fn render<T: Template>(template: &T) -> Response {
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!(error = %error_chain(&e), "Template error");
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Template error: {}", e)).into_response()
        }
    }
}

/// Error page with the given status.
pub fn error_page(status: StatusCode, title: &str, message: &str) -> Response {
    let template = ErrorTemplate {
        title,
        active: "",
        message,
    };
    (status, render(&template)).into_response()
}

/// Map a panel error to an error page.
pub fn app_error_page(err: &AppError) -> Response {
    let status = match err {
        AppError::NotFound(_) => StatusCode::NOT_FOUND,
        AppError::Decode { .. } => StatusCode::BAD_REQUEST,
        AppError::Extraction(_) | AppError::Io { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let title = if status == StatusCode::NOT_FOUND {
        "Not Found"
    } else {
        "Error"
    };
    error_page(status, title, &error_chain(err))
}

/// Plain-text download with an attachment disposition.
pub fn text_download(filename: &str, text: impl Into<String>) -> Response {
    let disposition = format!(
        "attachment; filename=\"{}\"",
        filename.replace(['"', '\\', '\r', '\n'], "_")
    );
    (
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        text.into(),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_download_headers() {
        let response = text_download("a\"b.txt", "hello");
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"a_b.txt\""
        );
    }

    #[test]
    fn test_session_id_reuses_cookie() {
        let jar = CookieJar::new().add(Cookie::new(SESSION_COOKIE, "abc"));
        let (_, id) = session_id(jar);
        assert_eq!(id, "abc");

        let (jar, id) = session_id(CookieJar::new());
        assert_eq!(jar.get(SESSION_COOKIE).map(|c| c.value()), Some(id.as_str()));
    }

    #[tokio::test]
    async fn test_error_page_shows_cause() {
        let err = AppError::io(
            "a.txt",
            std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        );
        let response = app_error_page(&err);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = String::from_utf8_lossy(&body);
        assert!(body.contains("error on a.txt: disk full"), "{}", body);
    }

    #[test]
    fn test_flash_notices() {
        let flash = FlashParams {
            saved: Some("a_output.txt".into()),
            failed: None,
        };
        let notices = flash.notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].kind, "success");
    }
}
