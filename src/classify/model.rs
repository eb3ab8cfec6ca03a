//! Text classifier facade composing vectorizer and classifier.
//!
//! [`TextClassifier`] is the unit the rest of the system interacts with: it
//! takes raw text in, gives labels and probabilities out, and serializes to a
//! single binary artifact. Internally it owns a
//! [`TfIdfVectorizer`](crate::feature::TfIdfVectorizer) and a
//! [`MultinomialNb`](crate::classify::MultinomialNb) and keeps them fitted as
//! one unit.
//!
//! # Examples
//!
//! ```
//! use taxon::classify::model::TextClassifier;
//!
//! let texts = vec![
//!     "stocks rally on earnings".to_string(),
//!     "election results surprise voters".to_string(),
//!     "tech stocks surge again".to_string(),
//! ];
//! let labels = vec![
//!     "business".to_string(),
//!     "politics".to_string(),
//!     "business".to_string(),
//! ];
//!
//! let mut model = TextClassifier::new().unwrap();
//! model.fit(&texts, &labels).unwrap();
//!
//! assert_eq!(model.predict("markets stocks rally").unwrap(), "business");
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::classify::naive_bayes::{DEFAULT_ALPHA, MultinomialNb};
use crate::error::{Result, TaxonError};
use crate::feature::tfidf::{TfIdfVectorizer, VectorizerConfig};

/// Configuration for a [`TextClassifier`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextClassifierConfig {
    /// Feature extraction configuration.
    pub vectorizer: VectorizerConfig,
    /// Additive smoothing strength for the naive Bayes classifier.
    pub alpha: f64,
}

impl Default for TextClassifierConfig {
    fn default() -> Self {
        TextClassifierConfig {
            vectorizer: VectorizerConfig::default(),
            alpha: DEFAULT_ALPHA,
        }
    }
}

/// A text classification model: TF-IDF features plus multinomial naive Bayes.
///
/// Once fitted, all read paths (`predict`, `predict_proba`, `score`) touch
/// only frozen state, so a shared reference can serve concurrent callers
/// without locking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextClassifier {
    vectorizer: TfIdfVectorizer,
    classifier: MultinomialNb,
}

impl TextClassifier {
    /// Create a new, unfitted text classifier with default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(TextClassifierConfig::default())
    }

    /// Create a new, unfitted text classifier with the given configuration.
    pub fn with_config(config: TextClassifierConfig) -> Result<Self> {
        Ok(TextClassifier {
            vectorizer: TfIdfVectorizer::with_config(config.vectorizer)?,
            classifier: MultinomialNb::new().with_alpha(config.alpha),
        })
    }

    /// Check whether this model has been fitted.
    pub fn is_fitted(&self) -> bool {
        self.vectorizer.is_fitted() && self.classifier.is_fitted()
    }

    /// Get the classes in their stable enumeration order.
    pub fn classes(&self) -> Result<&[String]> {
        self.classifier.classes()
    }

    /// Get the vectorizer's vocabulary size (0 before fitting).
    pub fn vocabulary_size(&self) -> usize {
        self.vectorizer.vocabulary_size()
    }

    /// Fit the model on raw texts and their labels.
    pub fn fit(&mut self, texts: &[String], labels: &[String]) -> Result<()> {
        if texts.len() != labels.len() {
            return Err(TaxonError::invalid_training_data(format!(
                "Got {} texts but {} labels",
                texts.len(),
                labels.len()
            )));
        }

        let features = self.vectorizer.fit_transform(texts)?;
        self.classifier.fit(&features, labels)
    }

    /// Predict the most likely class for a single document.
    pub fn predict(&self, text: &str) -> Result<String> {
        let feature = self.vectorizer.transform_one(text)?;
        self.classifier.predict(&feature)
    }

    /// Predict the most likely class for each document.
    pub fn predict_batch(&self, texts: &[String]) -> Result<Vec<String>> {
        let features = self.vectorizer.transform(texts)?;
        features
            .iter()
            .map(|feature| self.classifier.predict(feature))
            .collect()
    }

    /// Compute the probability distribution over classes for a single
    /// document, as `(class, probability)` pairs in stable class order.
    pub fn predict_proba(&self, text: &str) -> Result<Vec<(String, f64)>> {
        let feature = self.vectorizer.transform_one(text)?;
        self.classifier.predict_proba(&feature)
    }

    /// Compute the probability distribution over classes for each document.
    pub fn predict_proba_batch(&self, texts: &[String]) -> Result<Vec<Vec<(String, f64)>>> {
        let features = self.vectorizer.transform(texts)?;
        features
            .iter()
            .map(|feature| self.classifier.predict_proba(feature))
            .collect()
    }

    /// Predict the most likely class together with its probability.
    ///
    /// Ties break toward the class that appears earliest in the stable class
    /// order, consistent with [`Self::predict`].
    pub fn predict_with_confidence(&self, text: &str) -> Result<(String, f64)> {
        let proba = self.predict_proba(text)?;
        proba
            .into_iter()
            .reduce(|best, candidate| if candidate.1 > best.1 { candidate } else { best })
            .ok_or_else(|| TaxonError::invalid_operation("Probability distribution is empty"))
    }

    /// Compute classification accuracy against true labels.
    pub fn score(&self, texts: &[String], labels: &[String]) -> Result<f64> {
        let features = self.vectorizer.transform(texts)?;
        self.classifier.score(&features, labels)
    }

    /// Serialize this model to an opaque binary blob.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self)
            .map_err(|e| TaxonError::serialization(format!("Failed to encode model: {e}")))
    }

    /// Deserialize a model from a binary blob produced by [`Self::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        bincode::deserialize(bytes)
            .map_err(|e| TaxonError::serialization(format!("Failed to decode model: {e}")))
    }

    /// Write this model to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = self.to_bytes()?;
        fs::write(path.as_ref(), bytes)?;
        log::debug!("Saved model to {}", path.as_ref().display());
        Ok(())
    }

    /// Load a model from a file written by [`Self::save`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = fs::read(path.as_ref())?;
        Self::from_bytes(&bytes)
    }
}
