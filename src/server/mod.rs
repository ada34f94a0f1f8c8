//! Web interface.
//!
//! Five panels share one router:
//! - OCR: sample images, uploads, editable results
//! - Documentation rendered from Markdown
//! - Saved outputs with the same edit/save/download cards
//! - Source files shown verbatim
//! - Logs with level and text filters

mod assets;
mod handlers;
mod routes;
mod template_structs;

pub use routes::create_router;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::config::Settings;
use crate::logging::LogContext;
use crate::ocr::{build_backend, TextExtractor};
use crate::session::SessionStore;
use crate::storage::ResultStore;

/// Largest accepted upload request.
pub const MAX_UPLOAD_BYTES: usize = 200 * 1024 * 1024;

/// Shared state for the web server.
#[derive(Clone)]
pub struct AppState {
    /// OCR engine, built once at startup.
    pub extractor: Arc<TextExtractor>,
    pub store: ResultStore,
    pub sessions: Arc<SessionStore>,
    pub logs: LogContext,
    pub settings: Arc<Settings>,
}

impl AppState {
    /// Build the state, constructing the configured OCR backend.
    pub fn new(settings: &Settings, logs: LogContext) -> anyhow::Result<Self> {
        let backend = build_backend(settings.ocr_backend, settings.ocr.clone())?;
        tracing::info!("Using OCR backend {}", backend.backend_type());
        Ok(Self::with_extractor(
            settings,
            logs,
            TextExtractor::new(backend),
        ))
    }

    /// Build the state around an existing extractor.
    pub fn with_extractor(settings: &Settings, logs: LogContext, extractor: TextExtractor) -> Self {
        Self {
            extractor: Arc::new(extractor),
            store: ResultStore::new(&settings.output_dir),
            sessions: Arc::new(SessionStore::new()),
            logs,
            settings: Arc::new(settings.clone()),
        }
    }
}

/// Start the web server.
pub async fn serve(
    settings: &Settings,
    logs: LogContext,
    host: &str,
    port: u16,
) -> anyhow::Result<()> {
    let state = AppState::new(settings, logs)?;
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use std::path::Path;
    use tempfile::tempdir;
    use tower::ServiceExt;

    use crate::ocr::{Detection, OcrBackend, OcrBackendType, OcrError};

    struct EchoBackend;

    impl OcrBackend for EchoBackend {
        fn backend_type(&self) -> OcrBackendType {
            OcrBackendType::Tesseract
        }
        fn is_available(&self) -> bool {
            true
        }
        fn availability_hint(&self) -> String {
            String::new()
        }
        fn detect(&self, _image: &Path) -> Result<Vec<Detection>, OcrError> {
            Ok(vec![Detection::text_only("hello")])
        }
    }

    fn setup_test_app() -> (axum::Router, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let settings = Settings::with_base_dir(dir.path().to_path_buf());
        std::fs::create_dir_all(&settings.log_dir).unwrap();

        let state = AppState::with_extractor(
            &settings,
            LogContext::detached(&settings.log_dir),
            TextExtractor::new(Box::new(EchoBackend)),
        );
        (create_router(state), dir)
    }

    async fn get(app: axum::Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8_lossy(&body).into_owned())
    }

    #[tokio::test]
    async fn test_ocr_panel_shows_instructions() {
        let (app, _dir) = setup_test_app();
        let (status, body) = get(app, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("How to use"));
        assert!(body.contains("name=\"files\""));
    }

    #[tokio::test]
    async fn test_ocr_panel_sets_session_cookie() {
        let (app, _dir) = setup_test_app();
        let response = app
            .oneshot(Request::builder().uri("/ocr").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        assert!(cookie.starts_with("ocrdesk_session="), "{}", cookie);
    }

    #[tokio::test]
    async fn test_outputs_missing_directory() {
        let (app, _dir) = setup_test_app();
        let (status, body) = get(app, "/outputs").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Output directory not found"));
    }

    #[tokio::test]
    async fn test_outputs_empty_directory() {
        let (app, dir) = setup_test_app();
        std::fs::create_dir_all(dir.path().join("output")).unwrap();
        let (_, body) = get(app, "/outputs").await;
        assert!(body.contains("No output files found"));
    }

    #[tokio::test]
    async fn test_outputs_lists_artifacts() {
        let (app, dir) = setup_test_app();
        let output = dir.path().join("output");
        std::fs::create_dir_all(&output).unwrap();
        std::fs::write(output.join("scan_output.txt"), "Line <one>").unwrap();

        let (_, body) = get(app, "/outputs").await;
        assert!(body.contains("scan_output.txt"));
        assert!(body.contains("Line &lt;one&gt;"));
        assert!(body.contains("name=\"key\" value=\"output_scan_output.txt_0\""));
    }

    #[tokio::test]
    async fn test_docs_renders_markdown() {
        let (app, dir) = setup_test_app();
        std::fs::write(dir.path().join("README.md"), "# Desk\n\nSome *text*.").unwrap();
        let (status, body) = get(app, "/docs").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<h1>Desk</h1>"));
        assert!(body.contains("<em>text</em>"));
    }

    #[tokio::test]
    async fn test_docs_missing_file() {
        let (app, _dir) = setup_test_app();
        let (status, body) = get(app, "/docs").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Documentation file not found"));
    }

    #[tokio::test]
    async fn test_source_panel_and_download() {
        let (app, dir) = setup_test_app();
        std::fs::write(dir.path().join("Cargo.toml"), "[package]\nedition = 2021\n").unwrap();

        let (status, body) = get(app.clone(), "/source").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Project dependencies"));
        assert!(body.contains("edition = 2021"));
        assert!(body.contains("File not found"));

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/source/download?file=Cargo.toml")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );

        let (status, _) = get(app, "/source/download?file=..%2Fsecret").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_logs_empty_directory() {
        let (app, _dir) = setup_test_app();
        let (status, body) = get(app, "/logs").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("No log files found"));
    }

    #[tokio::test]
    async fn test_log_download_unknown_file() {
        let (app, _dir) = setup_test_app();
        let (status, _) = get(app, "/logs/download?file=nope.log").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_serve_css() {
        let (app, _dir) = setup_test_app();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/static/style.css")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/css");
    }

    #[tokio::test]
    async fn test_sample_download() {
        let (app, dir) = setup_test_app();
        let samples = dir.path().join("sample_images");
        std::fs::create_dir_all(&samples).unwrap();
        std::fs::write(samples.join("sample1.png"), b"\x89PNG").unwrap();

        let (_, body) = get(app.clone(), "/ocr").await;
        assert!(body.contains("sample1.png (4 B)"));

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/samples/sample1.png")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");

        let (status, _) = get(app, "/samples/other.png").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
