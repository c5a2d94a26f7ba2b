//! Model artifact inspector
//!
//! Loads an artifact the same way the server does and prints what it contains:
//! pipeline steps, expected features and the scoring capabilities.
//!
//! ```sh
//! cargo run --bin inspect_model -- --model models/diabetes.json --sample
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use riskscan::application::ml::read_artifact;
use riskscan::application::prediction_service::PredictionService;
use riskscan::domain::ml::{FEATURE_COUNT, FEATURE_NAMES};
use riskscan::infrastructure::observability::Metrics;
use serde_json::json;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about = "Inspect a riskscan model artifact", long_about = None)]
struct Cli {
    /// Model artifact path
    #[arg(short, long, default_value = "model.json")]
    model: PathBuf,

    /// Score a built-in sample record after loading
    #[arg(long)]
    sample: bool,
}

fn main() -> Result<()> {
    // Setup logging
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(tracing::Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();

    let cli = Cli::parse();
    info!("Testing model at: {}", cli.model.display());

    let artifact = read_artifact(&cli.model)
        .with_context(|| format!("Failed to load {}", cli.model.display()))?;

    println!("Name:      {}", artifact.name);
    println!("Version:   {}", artifact.version);
    println!("Condition: {}", artifact.condition);

    println!("\nPipeline steps:");
    for (i, step) in artifact.steps.iter().enumerate() {
        println!("  {}. {} ({} inputs)", i + 1, step.name(), step.dimension());
    }

    match &artifact.feature_names {
        Some(names) => println!("\nExpected input features ({}): {:?}", names.len(), names),
        None => println!(
            "\nArtifact does not list features; assuming service order ({}): {:?}",
            FEATURE_COUNT, FEATURE_NAMES
        ),
    }

    let handle = artifact.into_handle()?;
    println!("\nEstimator:    {}", handle.classifier().name());
    println!("Capabilities: {:?}", handle.capabilities());
    println!("Score source: {:?}", handle.score_source());

    if cli.sample {
        let service = PredictionService::new(Some(handle), Metrics::new()?);
        let sample = json!({
            "highBP": 1, "highChol": 1, "cholCheck": 1, "bmi": 32.5, "smoker": 0,
            "stroke": 0, "heartDiseaseorAttack": 0, "physActivity": 1, "fruits": 1,
            "veggies": 1, "hvyAlcoholConsump": 0, "anyHealthcare": 1, "noDocbcCost": 0,
            "genHlth": 3, "mentHlth": 2, "physHlth": 1, "diffWalk": 0, "sex": 1,
            "age": 9, "education": 4, "income": 6
        });
        let result = service.predict_json(&sample)?;
        println!("\nSample prediction: {}", serde_json::to_string_pretty(&result)?);
    }

    Ok(())
}
