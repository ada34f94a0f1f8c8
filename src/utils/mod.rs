//! Shared utility functions.
//!
//! - `format`: human-readable sizes and source-language labels

mod format;

pub use format::{format_size, source_language};
