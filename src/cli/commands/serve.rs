//! Web server command.

use console::style;

use crate::config::Settings;
use crate::logging::LogContext;

/// Port used when the bind address names only a host.
const DEFAULT_PORT: u16 = 8501;

/// Start the web server.
pub async fn cmd_serve(settings: &Settings, log: LogContext, bind: &str) -> anyhow::Result<()> {
    let (host, port) = parse_bind_address(bind);

    println!("{} Preparing directories...", style("→").cyan());
    if let Err(e) = settings.ensure_directories() {
        eprintln!("  {} Could not create directories: {}", style("✗").red(), e);
        return Err(e.into());
    }
    println!(
        "  {} Saving text to {}",
        style("✓").green(),
        settings.output_dir.display()
    );
    if let Some(file) = log.current_file() {
        println!("  {} Logging to {}", style("✓").green(), file.display());
    }

    println!(
        "{} Starting ocrdesk at http://{}:{}",
        style("→").cyan(),
        host,
        port
    );
    println!("  Press Ctrl+C to stop");

    crate::server::serve(settings, log, &host, port).await
}

/// Parse a bind address that can be:
/// - Just a port: "8080" -> 127.0.0.1:8080
/// - Just a host: "0.0.0.0" -> 0.0.0.0:8501
/// - Host and port: "0.0.0.0:8080" -> 0.0.0.0:8080
fn parse_bind_address(bind: &str) -> (String, u16) {
    if let Ok(port) = bind.parse::<u16>() {
        return ("127.0.0.1".to_string(), port);
    }

    if let Some((host, port_str)) = bind.rsplit_once(':') {
        if let Ok(port) = port_str.parse::<u16>() {
            return (host.to_string(), port);
        }
    }

    (bind.to_string(), DEFAULT_PORT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bind_address() {
        assert_eq!(parse_bind_address("9000"), ("127.0.0.1".to_string(), 9000));
        assert_eq!(parse_bind_address("0.0.0.0"), ("0.0.0.0".to_string(), 8501));
        assert_eq!(
            parse_bind_address("0.0.0.0:8080"),
            ("0.0.0.0".to_string(), 8080)
        );
    }
}
