//! ocrdesk - browser-based OCR desk.
//!
//! Upload images, extract their text with an external OCR engine, review and
//! edit the result, and keep it as plain-text files. Side panels browse saved
//! outputs, render the documentation, show source files, and filter logs.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod ocr;
pub mod server;
pub mod services;
pub mod session;
pub mod storage;
pub mod utils;
