//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::cli::args::{OutputFormat, TaxonArgs};
use crate::error::Result;

/// Result structure for model training.
#[derive(Debug, Serialize, Deserialize)]
pub struct TrainResult {
    pub examples: usize,
    pub classes: Vec<String>,
    pub vocabulary_size: usize,
    pub model_path: String,
    pub holdout_accuracy: Option<f64>,
    pub duration_ms: u64,
}

/// A single prediction.
#[derive(Debug, Serialize, Deserialize)]
pub struct Prediction {
    pub label: String,
    pub probability: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probabilities: Option<Vec<(String, f64)>>,
}

/// Result structure for the predict command.
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictionResults {
    pub predictions: Vec<Prediction>,
}

/// Result structure for model evaluation.
#[derive(Debug, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub examples: usize,
    pub accuracy: f64,
}

/// Output a command result in the requested format.
pub fn output_result<T: Serialize>(message: &str, result: &T, args: &TaxonArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: Serialize>(message: &str, result: &T, args: &TaxonArgs) -> Result<()> {
    if args.verbosity() > 0 {
        println!("{message}");
    }

    let value = serde_json::to_value(result)?;
    if let Some(object) = value.as_object() {
        for (key, field) in object {
            match field {
                serde_json::Value::Null => {}
                serde_json::Value::String(s) => println!("  {key}: {s}"),
                other => println!("  {key}: {other}"),
            }
        }
    }

    Ok(())
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &TaxonArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    println!("{json}");
    Ok(())
}
