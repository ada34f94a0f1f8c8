//! HTTP request handlers for the web server.
//!
//! One module per panel; shared helpers live in `helpers`.

mod docs;
mod helpers;
mod logs;
mod ocr;
mod outputs;
mod source;
mod static_files;
mod texts;

pub use docs::show_docs;
pub use logs::{download_log, show_logs};
pub use ocr::{ocr_panel, upload_images};
pub use outputs::browse_outputs;
pub use source::{download_source, show_source};
pub use static_files::{serve_css, serve_sample};
pub use texts::submit_text;
