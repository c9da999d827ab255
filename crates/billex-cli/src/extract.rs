//! Run one image through the pipeline and persist the record.

use std::path::Path;
use std::time::{Duration, Instant};

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use billex_core::{BillexConfig, ExtractionPipeline, PipelineOutcome};

pub fn run(image: &Path, config: BillexConfig) -> anyhow::Result<()> {
    let start = Instant::now();
    let pipeline = ExtractionPipeline::new(config);

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")?,
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Extracting {}", image.display()));

    let outcome = pipeline.run_native(image);
    pb.finish_and_clear();

    match &outcome {
        PipelineOutcome::Record(record) => {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            let path = pipeline.write_output(record)?;
            eprintln!("{} Output written to {}", style("✓").green(), path.display());
        }
        PipelineOutcome::Error(report) => {
            println!("{}", serde_json::to_string_pretty(report)?);
            eprintln!("{} {}", style("✗").red(), report.error);
        }
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}
