//! Batch extraction from the command line.

use std::path::PathBuf;

use console::style;

use crate::config::Settings;
use crate::ocr::{build_backend, TextExtractor};
use crate::services::{ImageUpload, UploadOrchestrator};
use crate::storage::ResultStore;

/// Extract text from each file and save it next to the web uploads.
pub async fn cmd_extract(settings: &Settings, files: &[PathBuf]) -> anyhow::Result<()> {
    let backend = build_backend(settings.ocr_backend, settings.ocr.clone())?;
    let extractor = TextExtractor::new(backend);
    let store = ResultStore::new(&settings.output_dir);

    let mut uploads = Vec::with_capacity(files.len());
    for path in files {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        match tokio::fs::read(path).await {
            Ok(bytes) => uploads.push(ImageUpload::new(filename, bytes)),
            Err(e) => {
                tracing::error!("Could not read {}: {}", path.display(), e);
                println!("  {} {}: {}", style("✗").red(), path.display(), e);
            }
        }
    }

    println!(
        "{} Extracting text from {} file(s) with {}",
        style("→").cyan(),
        uploads.len(),
        extractor.backend().backend_type()
    );

    let items = tokio::task::spawn_blocking(move || {
        UploadOrchestrator::new(&extractor, &store)
            .process_batch(uploads)
            .items
    })
    .await?;

    let mut failed = 0;
    for item in &items {
        match (&item.artifact, &item.error) {
            (Some(artifact), None) => println!(
                "  {} {} -> {}",
                style("✓").green(),
                item.filename,
                settings.output_dir.join(artifact).display()
            ),
            (_, Some(error)) => {
                failed += 1;
                println!("  {} {}", style("✗").red(), error);
            }
            (None, None) => {}
        }
    }

    if failed > 0 || items.len() < files.len() {
        anyhow::bail!("{} file(s) could not be processed", files.len() - (items.len() - failed));
    }
    Ok(())
}
