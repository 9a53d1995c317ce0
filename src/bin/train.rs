//! Training entry point: load the raw CSV, train end to end, save the
//! artifact and record the run.

use clap::Parser;
use housecast::config::TrainConfig;
use housecast::frame::io::read_csv;
use housecast::tracking::{ExperimentTracker, JsonRunTracker};
use housecast::train;
use std::error::Error;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "train", about = "Train the house price model")]
struct Args {
    /// Path to the raw training data CSV.
    #[arg(long, default_value = "data/train.csv")]
    data: PathBuf,

    /// Optional JSON training configuration; defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output path for the trained pipeline artifact.
    #[arg(long, default_value = "models/pipeline.bin")]
    output: PathBuf,

    /// Directory where run records are written.
    #[arg(long, default_value = "runs")]
    runs_dir: PathBuf,

    /// Experiment name for the run record.
    #[arg(long, default_value = "house-price")]
    experiment: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => TrainConfig::load(path)?,
        None => TrainConfig::default(),
    };

    tracing::info!(data = %args.data.display(), "loading training data");
    let frame = read_csv(&args.data)?;
    println!(
        "Loaded {} rows and {} columns from {}",
        frame.n_rows(),
        frame.n_cols(),
        args.data.display()
    );

    let mut tracker = JsonRunTracker::start(&args.runs_dir, &args.experiment, "train");
    let outcome = train::train(&frame, &config, &mut tracker)?;

    if let Some(parent) = args.output.parent() {
        std::fs::create_dir_all(parent)?;
    }
    outcome.artifact.save(&args.output)?;
    tracker.log_artifact(&args.output);
    let run_path = tracker.finish()?;

    println!("\nModel performance:");
    println!(
        "  CV RMSE:   {:.2} +/- {:.2}",
        outcome.metrics.cv_rmse_mean, outcome.metrics.cv_rmse_std
    );
    println!(
        "  CV R2:     {:.4} +/- {:.4}",
        outcome.metrics.cv_r2_mean, outcome.metrics.cv_r2_std
    );
    println!("  Test RMSE: {:.2}", outcome.metrics.test_rmse);
    println!("  Test R2:   {:.4}", outcome.metrics.test_r2);
    println!("\nArtifact saved to {}", args.output.display());
    println!("Run recorded at {}", run_path.display());

    Ok(())
}
