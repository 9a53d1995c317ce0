//! Batch scoring entry point: load the artifact, score a CSV of records and
//! write predictions with interval bounds.

use clap::Parser;
use housecast::frame::io::read_csv;
use housecast::serve::InferenceService;
use housecast::stats::quantile_sorted;
use std::error::Error;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "predict", about = "Score house records from a CSV file")]
struct Args {
    /// Path to the input CSV file.
    input: PathBuf,

    /// Path to the trained pipeline artifact.
    #[arg(long, default_value = "models/pipeline.bin")]
    artifact: PathBuf,

    /// Optional path for the predictions CSV.
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args = Args::parse();

    let service = InferenceService::load(&args.artifact)?;
    let frame = read_csv(&args.input)?;
    println!(
        "Scoring {} rows from {}",
        frame.n_rows(),
        args.input.display()
    );

    // Row-by-row so one bad record cannot abort the batch.
    let artifact = service.artifact();
    let mut rows: Vec<Result<(f64, f64, f64), String>> = Vec::with_capacity(frame.n_rows());
    for i in 0..frame.n_rows() {
        let single = frame.take_rows(&[i]);
        let outcome = artifact
            .preprocessor
            .transform(&single)
            .and_then(|matrix| artifact.model.predict(matrix.view()))
            .map(|preds| preds.first().copied().unwrap_or(f64::NAN));
        match outcome {
            Ok(price) => {
                let (lower, upper) = artifact.interval.bounds(price, artifact.residual_std_);
                rows.push(Ok((price, lower, upper)));
            }
            Err(err) => {
                tracing::warn!(row = i, error = %err, "record failed");
                rows.push(Err(err.to_string()));
            }
        }
    }

    let prices: Vec<f64> = rows.iter().filter_map(|r| r.as_ref().ok().map(|v| v.0)).collect();
    if !prices.is_empty() {
        let mut sorted = prices.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        println!("\nPredictions: {} ok, {} failed", prices.len(), rows.len() - prices.len());
        println!("  Min:    {:.2}", sorted[0]);
        println!("  Max:    {:.2}", sorted[sorted.len() - 1]);
        println!(
            "  Mean:   {:.2}",
            prices.iter().sum::<f64>() / prices.len() as f64
        );
        println!("  Median: {:.2}", quantile_sorted(&sorted, 0.5));
    } else {
        println!("No records produced predictions");
    }

    if let Some(output) = &args.output {
        let mut writer = csv::Writer::from_path(output)?;
        writer.write_record(["predicted_price", "lower", "upper", "error"])?;
        for row in &rows {
            match row {
                Ok((price, lower, upper)) => writer.write_record([
                    format!("{}", price),
                    format!("{}", lower),
                    format!("{}", upper),
                    String::new(),
                ])?,
                Err(err) => writer.write_record([
                    String::new(),
                    String::new(),
                    String::new(),
                    err.clone(),
                ])?,
            }
        }
        writer.flush()?;
        println!("\nPredictions saved to {}", output.display());
    }

    Ok(())
}
