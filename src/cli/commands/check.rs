//! Backend availability report.

use console::style;

use crate::config::Settings;
use crate::ocr::{build_backend, OcrBackendType};

/// Report which OCR backends can run here.
pub async fn cmd_check(settings: &Settings) -> anyhow::Result<()> {
    println!("{} OCR backends", style("→").cyan());

    for backend_type in [OcrBackendType::Tesseract, OcrBackendType::Ocrs] {
        let marker = if backend_type == settings.ocr_backend {
            " (configured)"
        } else {
            ""
        };
        match build_backend(backend_type, settings.ocr.clone()) {
            Ok(backend) if backend.is_available() => {
                println!("  {} {}{}", style("✓").green(), backend_type, marker);
            }
            Ok(backend) => {
                println!("  {} {}{}", style("✗").red(), backend_type, marker);
                println!("      {}", style(backend.availability_hint()).dim());
            }
            Err(e) => {
                println!("  {} {}{}", style("✗").red(), backend_type, marker);
                println!("      {}", style(e).dim());
            }
        }
    }

    println!();
    println!("  Output directory: {}", settings.output_dir.display());
    println!("  Log directory:    {}", settings.log_dir.display());
    println!("  Language:         {}", settings.ocr.language);
    Ok(())
}
