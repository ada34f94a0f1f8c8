//! Static assets embedded at compile time.

/// Stylesheet shared by every panel.
pub const CSS: &str = include_str!("styles.css");
