//! Process logging setup.
//!
//! Every process start gets its own log file, `app_YYYYMMDD_HHMMSS.log`, in
//! the log directory. File lines use the `timestamp - LEVEL - message` layout
//! the logs panel filters on; the console gets the regular `fmt` output.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields, FormattedFields};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::services::LogBrowser;

/// Where this process logs, handed to whatever needs to show the logs.
#[derive(Debug, Clone)]
pub struct LogContext {
    dir: PathBuf,
    current_file: Option<PathBuf>,
}

impl LogContext {
    /// Context for a log directory without an active file (tests, tools).
    pub fn detached(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            current_file: None,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File this process is writing to, if logging was initialized.
    pub fn current_file(&self) -> Option<&Path> {
        self.current_file.as_deref()
    }

    pub fn browser(&self) -> LogBrowser {
        LogBrowser::new(&self.dir)
    }
}

/// Log file name for a process started at `started`.
pub fn log_file_name(started: chrono::DateTime<chrono::Local>) -> String {
    format!("app_{}.log", started.format("%Y%m%d_%H%M%S"))
}

/// Level names as written to log files.
pub fn level_name(level: &Level) -> &'static str {
    match *level {
        Level::ERROR => "ERROR",
        Level::WARN => "WARNING",
        Level::INFO => "INFO",
        Level::DEBUG => "DEBUG",
        Level::TRACE => "TRACE",
    }
}

/// `2024-01-01 10:00:00,123 - LEVEL - span{fields}: message key=value`
pub struct LineFormat;

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let now = chrono::Local::now();
        write!(
            writer,
            "{} - {} - ",
            now.format("%Y-%m-%d %H:%M:%S,%3f"),
            level_name(event.metadata().level())
        )?;

        if let Some(scope) = ctx.event_scope() {
            for span in scope.from_root() {
                write!(writer, "{}", span.name())?;
                let extensions = span.extensions();
                if let Some(fields) = extensions.get::<FormattedFields<N>>() {
                    if !fields.is_empty() {
                        write!(writer, "{{{}}}", fields)?;
                    }
                }
                write!(writer, ": ")?;
            }
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn console_layer<S>(verbose: bool) -> impl Layer<S> + Send + Sync
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let console_default = if verbose { "ocrdesk=info" } else { "ocrdesk=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(console_default));

    fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(false)
        .with_filter(filter)
}

/// Console-only subscriber for work that runs before [`init`], such as
/// loading the config that names the log directory.
pub fn console_subscriber(verbose: bool) -> impl Subscriber + Send + Sync + 'static {
    tracing_subscriber::registry().with(console_layer(verbose))
}

/// Install the global subscriber: console plus a fresh per-process log file.
pub fn init(log_dir: &Path, verbose: bool) -> anyhow::Result<LogContext> {
    std::fs::create_dir_all(log_dir)?;
    let file_name = log_file_name(chrono::Local::now());
    let current_file = log_dir.join(&file_name);

    let file_filter = EnvFilter::new("ocrdesk=debug,tower_http=info");
    let file_appender = tracing_appender::rolling::never(log_dir, &file_name);

    let file_layer = fmt::layer()
        .event_format(LineFormat)
        .with_writer(file_appender)
        .with_ansi(false)
        .with_filter(file_filter);

    tracing_subscriber::registry()
        .with(console_layer(verbose))
        .with(file_layer)
        .try_init()?;

    Ok(LogContext {
        dir: log_dir.to_path_buf(),
        current_file: Some(current_file),
    })
}

/// Render an error with its whole source chain on one line.
pub fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let _ = write!(out, ": {}", cause);
        source = cause.source();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_log_file_name() {
        let started = chrono::Local
            .with_ymd_and_hms(2024, 3, 2, 9, 5, 7)
            .single()
            .unwrap();
        assert_eq!(log_file_name(started), "app_20240302_090507.log");
    }

    #[test]
    fn test_level_names_match_panel_filters() {
        use crate::services::LevelFilter;
        for level in [Level::ERROR, Level::WARN, Level::INFO, Level::DEBUG] {
            let name = level_name(&level);
            assert_eq!(LevelFilter::parse(name).as_str(), name);
        }
    }

    #[test]
    fn test_line_format_output() {
        use std::sync::{Arc, Mutex};

        #[derive(Clone, Default)]
        struct Buf(Arc<Mutex<Vec<u8>>>);

        impl std::io::Write for Buf {
            fn write(&mut self, data: &[u8]) -> std::io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(data);
                Ok(data.len())
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let buf = Buf::default();
        let writer = buf.clone();
        let subscriber = tracing_subscriber::registry().with(
            fmt::layer()
                .event_format(LineFormat)
                .with_writer(move || writer.clone())
                .with_ansi(false),
        );

        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!("Output directory not found");
        });

        let out = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        assert!(out.ends_with(" - WARNING - Output directory not found\n"), "{}", out);
    }

    #[test]
    fn test_error_chain_nested() {
        let inner = std::io::Error::new(std::io::ErrorKind::Other, "pipe closed");
        let err = crate::error::AppError::from(crate::ocr::OcrError::from(inner));
        assert_eq!(
            error_chain(&err),
            "Text extraction failed: I/O error: pipe closed"
        );
    }

    #[test]
    fn test_error_chain() {
        let inner = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        let err = crate::error::AppError::io("output/a.txt", inner);
        assert_eq!(
            error_chain(&err),
            "I/O error on output/a.txt: disk full"
        );
    }
}
