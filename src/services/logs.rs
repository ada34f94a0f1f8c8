//! Log file browsing and filtering for the logs panel.

use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

/// Level filter offered by the logs panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LevelFilter {
    #[default]
    All,
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl LevelFilter {
    pub const ALL: [LevelFilter; 6] = [
        LevelFilter::All,
        LevelFilter::Debug,
        LevelFilter::Info,
        LevelFilter::Warning,
        LevelFilter::Error,
        LevelFilter::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LevelFilter::All => "ALL",
            LevelFilter::Debug => "DEBUG",
            LevelFilter::Info => "INFO",
            LevelFilter::Warning => "WARNING",
            LevelFilter::Error => "ERROR",
            LevelFilter::Critical => "CRITICAL",
        }
    }

    /// Parse a level name; unknown names fall back to `All`.
    pub fn parse(s: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
            .unwrap_or_default()
    }

    /// Whether `line` passes this level filter.
    ///
    /// Matches the literal level tag anywhere in the line, like the log
    /// format `timestamp - LEVEL - message` makes possible.
    pub fn matches(&self, line: &str) -> bool {
        match self {
            LevelFilter::All => true,
            level => line.contains(level.as_str()),
        }
    }
}

/// Case-insensitive substring filter; an empty query matches everything.
pub fn matches_query(line: &str, query: &str) -> bool {
    query.is_empty() || line.to_lowercase().contains(&query.to_lowercase())
}

/// Number of lines in a log file; a final newline does not start another.
pub fn line_count(content: &str) -> usize {
    content.lines().count()
}

/// Lines of `content` passing both filters, in their original order.
pub fn filter_lines<'a>(content: &'a str, level: LevelFilter, query: &str) -> Vec<&'a str> {
    content
        .lines()
        .filter(|line| level.matches(line))
        .filter(|line| matches_query(line, query))
        .collect()
}

/// Read access to the log directory.
#[derive(Debug, Clone)]
pub struct LogBrowser {
    dir: PathBuf,
}

impl LogBrowser {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Log file names, newest first.
    ///
    /// Names embed their start timestamp, so reverse name order is newest
    /// first.
    pub fn list(&self) -> AppResult<Vec<String>> {
        let entries = std::fs::read_dir(&self.dir).map_err(|e| AppError::from_io(&self.dir, e))?;

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
            .filter(|name| name.ends_with(".log"))
            .collect();
        names.sort_by(|a, b| b.cmp(a));
        Ok(names)
    }

    /// Contents of log file `name`, which must be one of [`list`](Self::list).
    pub fn read(&self, name: &str) -> AppResult<String> {
        if !self.list()?.iter().any(|n| n == name) {
            return Err(AppError::NotFound(format!("log file {}", name)));
        }
        let path = self.dir.join(name);
        let bytes = std::fs::read(&path).map_err(|e| AppError::from_io(&path, e))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
