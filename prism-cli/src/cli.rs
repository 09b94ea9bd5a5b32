use anyhow::{Context, bail};
use chrono::Local;
use clap::Parser;
use prism_core::{
    Config, ResultWriter, RetrievalSummary,
    coordinates::{find_coordinate_files, load_coordinates},
    provider_from_config, retrieve,
};
use tracing::info;

use crate::prompt;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "prism",
    version,
    about = "Download daily PRISM max/min temperature and precipitation for a list of coordinates",
    long_about = "Reads the CSV in the coordinates directory (columns id, lat, lon), asks for a \
                  date range between 01-01-1981 and today, queries RCC ACIS for each coordinate \
                  and writes the results to a timestamped CSV in the results directory."
)]
pub struct Cli {}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;

        // Inputs are validated before anything is sent over the network.
        let files = find_coordinate_files(&config.paths.coordinates_dir)?;
        let path = prompt::choose_coordinate_file(files)?;
        let coordinates = load_coordinates(&path)?;
        println!("Loaded {} coordinate(s) from {}", coordinates.len(), path.display());

        let range = prompt::prompt_date_range(Local::now().date_naive())?;

        let provider = provider_from_config(&config)?;
        let (mut writer, output_path) =
            ResultWriter::create(&config.paths.results_dir, Local::now().naive_local())
                .with_context(|| {
                    format!("Failed to open results file in {}", config.paths.results_dir.display())
                })?;
        info!(output = %output_path.display(), %range, "Starting retrieval");

        let summary = retrieve(provider.as_ref(), &coordinates, &range, &mut writer).await?;

        report(&summary);
        println!("\nResults saved to `{}`", output_path.display());

        if !summary.is_success() {
            bail!(
                "{} of {} coordinate(s) could not be retrieved",
                summary.failures.len(),
                coordinates.len()
            );
        }

        Ok(())
    }
}

fn report(summary: &RetrievalSummary) {
    println!(
        "\nFetched {} coordinate(s), wrote {} row(s).",
        summary.coordinates_fetched, summary.rows_written
    );

    if !summary.incomplete.is_empty() {
        println!(
            "Incomplete data (fewer days than requested) for: {}",
            summary.incomplete.join(", ")
        );
    }

    for failure in &summary.failures {
        println!("Error for id {}: {}", failure.id, failure.error);
    }
}
