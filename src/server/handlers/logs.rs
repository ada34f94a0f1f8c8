//! Logs panel.

use axum::{
    extract::{Query, State},
    response::Response,
};
use serde::Deserialize;

use super::super::template_structs::{LogsTemplate, Notice, SelectOption};
use super::super::AppState;
use super::helpers::{app_error_page, render, text_download};
use crate::error::AppError;
use crate::logging::error_chain;
use crate::services::{filter_lines, line_count, LevelFilter};

#[derive(Debug, Default, Deserialize)]
pub struct LogParams {
    pub file: Option<String>,
    pub level: Option<String>,
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LogDownloadParams {
    pub file: String,
}

/// Show one log file filtered by level and search text.
pub async fn show_logs(State(state): State<AppState>, Query(params): Query<LogParams>) -> Response {
    let browser = state.logs.browser();
    let level = LevelFilter::parse(params.level.as_deref().unwrap_or_default());
    let query = params.q.unwrap_or_default();
    let mut notices = Vec::new();

    let names = match browser.list() {
        Ok(names) => names,
        Err(AppError::NotFound(_)) => Vec::new(),
        Err(e) => {
            let reason = error_chain(&e);
            tracing::error!(error = %reason, "Error listing log files");
            notices.push(Notice::error(format!("Error listing log files: {}", reason)));
            Vec::new()
        }
    };
    if names.is_empty() && notices.is_empty() {
        notices.push(Notice::warning("No log files found"));
    }

    let selected = params
        .file
        .filter(|f| !f.is_empty())
        .or_else(|| names.first().cloned());

    let mut template = LogsTemplate {
        title: "Logs",
        active: "logs",
        notices,
        files: names
            .iter()
            .map(|name| {
                let current = state
                    .logs
                    .current_file()
                    .and_then(|p| p.file_name())
                    .is_some_and(|f| f == name.as_str());
                SelectOption {
                    value: name.clone(),
                    label: if current {
                        format!("{} (current)", name)
                    } else {
                        name.clone()
                    },
                    selected: selected.as_deref() == Some(name.as_str()),
                }
            })
            .collect(),
        levels: LevelFilter::ALL
            .iter()
            .map(|l| SelectOption {
                value: l.as_str().to_string(),
                label: l.as_str().to_string(),
                selected: *l == level,
            })
            .collect(),
        query,
        selected_file: None,
        download_url: String::new(),
        log_text: String::new(),
        shown_lines: 0,
        total_lines: 0,
    };

    if let Some(name) = selected.filter(|_| !names.is_empty()) {
        match browser.read(&name) {
            Ok(content) => {
                let lines = filter_lines(&content, level, &template.query);
                template.total_lines = line_count(&content);
                template.shown_lines = lines.len();
                template.log_text = lines.join("\n");
                template.download_url =
                    format!("/logs/download?file={}", urlencoding::encode(&name));
                template.selected_file = Some(name);
            }
            Err(e) => {
                let reason = error_chain(&e);
                tracing::warn!(error = %reason, "Error reading log file {}", name);
                template
                    .notices
                    .push(Notice::error(format!("Error reading log file: {}", reason)));
            }
        }
    }

    render(&template)
}

/// Download a log file unfiltered.
pub async fn download_log(
    State(state): State<AppState>,
    Query(params): Query<LogDownloadParams>,
) -> Response {
    match state.logs.browser().read(&params.file) {
        Ok(content) => text_download(&params.file, content),
        Err(e) => app_error_page(&e),
    }
}
