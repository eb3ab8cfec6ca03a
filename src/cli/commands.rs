//! Command implementations for the Taxon CLI.

use std::fs;
use std::time::Instant;

use crate::analysis::token_filter::stop::StopFilter;
use crate::classify::model::{TextClassifier, TextClassifierConfig};
use crate::cli::args::*;
use crate::cli::output::*;
use crate::corpus;
use crate::error::{Result, TaxonError};
use crate::feature::tfidf::VectorizerConfig;

/// Execute a CLI command.
pub fn execute_command(args: TaxonArgs) -> Result<()> {
    match &args.command {
        Command::Train(train_args) => train_model(train_args.clone(), &args),
        Command::Predict(predict_args) => predict(predict_args.clone(), &args),
        Command::Evaluate(evaluate_args) => evaluate_model(evaluate_args.clone(), &args),
    }
}

/// Train a classifier and write the model artifact.
fn train_model(args: TrainArgs, cli_args: &TaxonArgs) -> Result<()> {
    let start = Instant::now();

    log::info!("Loading training data from {}", args.data.display());
    let examples = corpus::load_jsonl(&args.data)?;

    let (examples, holdout) = match args.holdout {
        Some(fraction) => {
            let (train, test) = corpus::train_test_split(examples, fraction, args.seed)?;
            (train, Some(test))
        }
        None => (examples, None),
    };

    let config = TextClassifierConfig {
        vectorizer: VectorizerConfig {
            stop_words: args.stop_words.then(StopFilter::default_words),
            min_df: args.min_df,
            ..VectorizerConfig::default()
        },
        alpha: args.alpha,
    };

    log::info!("Training on {} examples", examples.len());
    let (texts, labels) = corpus::split_texts_labels(&examples);
    let mut model = TextClassifier::with_config(config)?;
    model.fit(&texts, &labels)?;

    let holdout_accuracy = match &holdout {
        Some(test) => {
            let (texts, labels) = corpus::split_texts_labels(test);
            let accuracy = model.score(&texts, &labels)?;
            log::info!("Holdout accuracy on {} examples: {accuracy:.4}", test.len());
            Some(accuracy)
        }
        None => None,
    };

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    model.save(&args.out)?;
    log::info!("Saved model to {}", args.out.display());

    output_result(
        "Model trained successfully",
        &TrainResult {
            examples: texts.len(),
            classes: model.classes()?.to_vec(),
            vocabulary_size: model.vocabulary_size(),
            model_path: args.out.to_string_lossy().to_string(),
            holdout_accuracy,
            duration_ms: start.elapsed().as_millis() as u64,
        },
        cli_args,
    )
}

/// Classify one document or a file of documents.
fn predict(args: PredictArgs, cli_args: &TaxonArgs) -> Result<()> {
    let model = TextClassifier::load(&args.model)?;

    let documents: Vec<String> = match (&args.text, &args.input) {
        (Some(text), None) => vec![text.clone()],
        (None, Some(path)) => fs::read_to_string(path)?
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| line.to_string())
            .collect(),
        _ => {
            return Err(TaxonError::invalid_operation(
                "Provide either --text or --input",
            ));
        }
    };

    if documents.is_empty() {
        return Err(TaxonError::data_unavailable("No documents to classify"));
    }

    let mut predictions = Vec::with_capacity(documents.len());
    for document in &documents {
        let (label, probability) = model.predict_with_confidence(document)?;
        let probabilities = if args.proba {
            Some(model.predict_proba(document)?)
        } else {
            None
        };
        predictions.push(Prediction {
            label,
            probability,
            probabilities,
        });
    }

    output_result(
        "Prediction complete",
        &PredictionResults { predictions },
        cli_args,
    )
}

/// Score a trained model against labeled holdout data.
fn evaluate_model(args: EvaluateArgs, cli_args: &TaxonArgs) -> Result<()> {
    let model = TextClassifier::load(&args.model)?;
    let examples = corpus::load_jsonl(&args.data)?;
    let (texts, labels) = corpus::split_texts_labels(&examples);

    let accuracy = model.score(&texts, &labels)?;
    log::info!("Accuracy on {} examples: {accuracy:.4}", texts.len());

    output_result(
        "Evaluation complete",
        &EvaluationResult {
            examples: texts.len(),
            accuracy,
        },
        cli_args,
    )
}
