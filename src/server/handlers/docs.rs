//! Documentation panel.

use axum::{extract::State, response::Response};
use pulldown_cmark::{html, Options, Parser};

use super::super::template_structs::{DocsTemplate, Notice};
use super::super::AppState;
use super::helpers::render;
use crate::logging::error_chain;

/// Render Markdown to HTML.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(markdown, options);
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// Show the configured documentation file.
pub async fn show_docs(State(state): State<AppState>) -> Response {
    let path = &state.settings.docs_file;
    let (notices, body_html) = match tokio::fs::read_to_string(path).await {
        Ok(markdown) => (Vec::new(), markdown_to_html(&markdown)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!("Documentation file not found: {}", path.display());
            (vec![Notice::error("Documentation file not found")], String::new())
        }
        Err(e) => {
            let reason = error_chain(&e);
            tracing::error!(error = %reason, "Error reading documentation {}", path.display());
            (
                vec![Notice::error(format!("Error reading documentation: {}", reason))],
                String::new(),
            )
        }
    };

    render(&DocsTemplate {
        title: "Documentation",
        active: "docs",
        notices,
        body_html,
    })
}
