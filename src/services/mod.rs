//! Service layer for ocrdesk business logic.
//!
//! This module contains domain logic separated from UI concerns.
//! Services are used by both the CLI and the web server.

pub mod logs;
pub mod upload;

pub use logs::{filter_lines, line_count, LevelFilter, LogBrowser};
pub use upload::{save_edit, BatchItem, ImageUpload, ProcessedBatch, UploadOrchestrator};
