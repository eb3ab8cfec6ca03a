//! Command line argument parsing for the Taxon CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

/// Taxon - train and run text classification models
#[derive(Parser, Debug, Clone)]
#[command(name = "taxon")]
#[command(about = "A text classification engine: TF-IDF features and multinomial naive Bayes")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct TaxonArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl TaxonArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Train a classifier from a labeled corpus and save the model artifact
    #[command(name = "train")]
    Train(TrainArgs),

    /// Classify a document with a trained model
    #[command(name = "predict")]
    Predict(PredictArgs),

    /// Score a trained model against labeled holdout data
    #[command(name = "evaluate")]
    Evaluate(EvaluateArgs),
}

/// Arguments for the train command
#[derive(clap::Args, Debug, Clone)]
pub struct TrainArgs {
    /// Path to the training corpus (JSON Lines, one {"text", "label"} per line)
    #[arg(long, env = "TAXON_DATA")]
    pub data: PathBuf,

    /// Path to write the trained model artifact to
    #[arg(long, env = "TAXON_MODEL")]
    pub out: PathBuf,

    /// Additive smoothing strength for the naive Bayes classifier
    #[arg(long, default_value_t = 1.0)]
    pub alpha: f64,

    /// Minimum number of documents a term must occur in to enter the vocabulary
    #[arg(long, default_value_t = 1)]
    pub min_df: usize,

    /// Remove default English stop words before vectorization
    #[arg(long)]
    pub stop_words: bool,

    /// Hold out this fraction of the corpus and report accuracy on it
    #[arg(long)]
    pub holdout: Option<f64>,

    /// Seed for the holdout split shuffle
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

/// Arguments for the predict command
#[derive(clap::Args, Debug, Clone)]
pub struct PredictArgs {
    /// Path to a trained model artifact
    #[arg(long, env = "TAXON_MODEL")]
    pub model: PathBuf,

    /// Document text to classify
    #[arg(long, conflicts_with = "input")]
    pub text: Option<String>,

    /// File containing one document per line to classify
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Include the full probability distribution in the output
    #[arg(long)]
    pub proba: bool,
}

/// Arguments for the evaluate command
#[derive(clap::Args, Debug, Clone)]
pub struct EvaluateArgs {
    /// Path to a trained model artifact
    #[arg(long, env = "TAXON_MODEL")]
    pub model: PathBuf,

    /// Path to the labeled holdout corpus (JSON Lines)
    #[arg(long)]
    pub data: PathBuf,
}

/// Output format options
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_train_command() {
        let args = TaxonArgs::try_parse_from([
            "taxon", "train", "--data", "corpus.jsonl", "--out", "model.bin", "--alpha", "0.5",
        ])
        .unwrap();

        match args.command {
            Command::Train(train) => {
                assert_eq!(train.data, PathBuf::from("corpus.jsonl"));
                assert_eq!(train.out, PathBuf::from("model.bin"));
                assert_eq!(train.alpha, 0.5);
                assert_eq!(train.min_df, 1);
                assert!(!train.stop_words);
            }
            _ => panic!("Expected train command"),
        }
    }

    #[test]
    fn test_parse_predict_command() {
        let args = TaxonArgs::try_parse_from([
            "taxon",
            "--format",
            "json",
            "predict",
            "--model",
            "model.bin",
            "--text",
            "stocks rally",
            "--proba",
        ])
        .unwrap();

        assert_eq!(args.output_format, OutputFormat::Json);
        match args.command {
            Command::Predict(predict) => {
                assert_eq!(predict.text.as_deref(), Some("stocks rally"));
                assert!(predict.proba);
            }
            _ => panic!("Expected predict command"),
        }
    }

    #[test]
    fn test_text_conflicts_with_input() {
        let result = TaxonArgs::try_parse_from([
            "taxon", "predict", "--model", "m.bin", "--text", "a", "--input", "docs.txt",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_verbosity() {
        let args =
            TaxonArgs::try_parse_from(["taxon", "-vv", "evaluate", "--model", "m", "--data", "d"])
                .unwrap();
        assert_eq!(args.verbosity(), 2);

        let args =
            TaxonArgs::try_parse_from(["taxon", "-q", "evaluate", "--model", "m", "--data", "d"])
                .unwrap();
        assert_eq!(args.verbosity(), 0);
    }
}
