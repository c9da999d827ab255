//! CLI application for bill and tax-invoice OCR extraction.

mod extract;
mod settings;

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Extract structured data from a photographed bill
#[derive(Parser)]
#[command(name = "billex")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Bill or invoice image
    #[arg(default_value = "data/good-hand-written-bill.jpg")]
    image: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // stdout carries only the JSON document
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to set up logging: {}", e))?;

    let config = settings::load_config()?;
    extract::run(&cli.image, config)
}
