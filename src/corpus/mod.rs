//! Training corpus loading and splitting.
//!
//! The training-input collaborator hands the engine an ordered sequence of
//! (text, label) pairs. This module loads that sequence from a JSON Lines
//! file (one `{"text": ..., "label": ...}` object per line) and provides a
//! seeded train/test split for holdout evaluation. A missing, unreadable, or
//! empty source is always surfaced as [`TaxonError::DataUnavailable`] rather
//! than silently producing an empty-trained model.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TaxonError};

/// A single training example: document text and its class label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledExample {
    /// The raw document text.
    pub text: String,
    /// The class label.
    pub label: String,
}

/// Load labeled examples from a JSON Lines file.
///
/// Blank lines are skipped. Fails with `DataUnavailable` if the file cannot
/// be opened, a line cannot be parsed, or the file contains no examples.
pub fn load_jsonl<P: AsRef<Path>>(path: P) -> Result<Vec<LabeledExample>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        TaxonError::data_unavailable(format!("Cannot open corpus {}: {e}", path.display()))
    })?;

    let mut examples = Vec::new();
    for (line_number, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| {
            TaxonError::data_unavailable(format!("Cannot read corpus {}: {e}", path.display()))
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let example: LabeledExample = serde_json::from_str(&line).map_err(|e| {
            TaxonError::data_unavailable(format!(
                "Malformed corpus line {} in {}: {e}",
                line_number + 1,
                path.display()
            ))
        })?;
        examples.push(example);
    }

    if examples.is_empty() {
        return Err(TaxonError::data_unavailable(format!(
            "Corpus {} contains no examples",
            path.display()
        )));
    }

    log::debug!("Loaded {} examples from {}", examples.len(), path.display());
    Ok(examples)
}

/// Split examples into parallel text and label sequences.
pub fn split_texts_labels(examples: &[LabeledExample]) -> (Vec<String>, Vec<String>) {
    let texts = examples.iter().map(|e| e.text.clone()).collect();
    let labels = examples.iter().map(|e| e.label.clone()).collect();
    (texts, labels)
}

/// Split examples into train and test sets with a seeded shuffle.
///
/// `test_fraction` must lie strictly between 0 and 1, and there must be
/// enough examples for both sides of the split to be non-empty. The same
/// seed always produces the same split.
pub fn train_test_split(
    mut examples: Vec<LabeledExample>,
    test_fraction: f64,
    seed: u64,
) -> Result<(Vec<LabeledExample>, Vec<LabeledExample>)> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(TaxonError::invalid_operation(format!(
            "Test fraction must be in (0, 1), got {test_fraction}"
        )));
    }

    let n_test = ((examples.len() as f64) * test_fraction).round().max(1.0) as usize;
    if n_test >= examples.len() {
        return Err(TaxonError::invalid_training_data(format!(
            "Not enough examples ({}) for a {test_fraction} test split",
            examples.len()
        )));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    examples.shuffle(&mut rng);

    let train = examples.split_off(n_test);
    Ok((train, examples))
}
