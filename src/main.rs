//! ocrdesk command-line entry point.

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (before anything else)
    let _ = dotenvy::dotenv();

    // Logging is set up by the CLI once the log directory is known
    ocrdesk::cli::run().await
}
