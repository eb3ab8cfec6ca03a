//! Multinomial naive Bayes classifier.
//!
//! Learns class priors and per-term log-likelihoods from sparse feature
//! vectors, with additive (Laplace/Lidstone) smoothing. All likelihood
//! arithmetic stays in log space; probabilities are recovered with the
//! log-sum-exp trick, so long documents and large vocabularies do not
//! underflow.
//!
//! # Examples
//!
//! ```
//! use taxon::classify::naive_bayes::MultinomialNb;
//! use taxon::feature::vector::SparseVector;
//!
//! let features = vec![
//!     SparseVector::from_entries(2, vec![(0, 1.0)]).unwrap(),
//!     SparseVector::from_entries(2, vec![(1, 1.0)]).unwrap(),
//! ];
//! let labels = vec!["business".to_string(), "politics".to_string()];
//!
//! let mut classifier = MultinomialNb::new();
//! classifier.fit(&features, &labels).unwrap();
//!
//! let query = SparseVector::from_entries(2, vec![(0, 1.0)]).unwrap();
//! assert_eq!(classifier.predict(&query).unwrap(), "business");
//! ```

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TaxonError};
use crate::feature::vector::SparseVector;

/// Default additive smoothing strength.
pub const DEFAULT_ALPHA: f64 = 1.0;

/// State learned by [`MultinomialNb::fit`], frozen afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Fitted {
    /// Distinct labels in first-seen order. This order is the stable class
    /// enumeration used by predict, predict_proba, and tie-breaking.
    classes: Vec<String>,
    /// Natural log of each class's document-count share.
    class_log_prior: Vec<f64>,
    /// Log-likelihood table indexed by [class][term].
    feature_log_prob: Vec<Vec<f64>>,
    /// Feature dimension the model was trained with.
    n_features: usize,
}

/// Multinomial naive Bayes classifier over sparse feature vectors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultinomialNb {
    /// Additive smoothing strength.
    alpha: f64,
    state: Option<Fitted>,
}

impl MultinomialNb {
    /// Create a new classifier with the default smoothing (alpha = 1.0).
    pub fn new() -> Self {
        MultinomialNb {
            alpha: DEFAULT_ALPHA,
            state: None,
        }
    }

    /// Set the additive smoothing strength.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Get the smoothing strength.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Check whether this classifier has been fitted.
    pub fn is_fitted(&self) -> bool {
        self.state.is_some()
    }

    /// Get the classes in their stable enumeration order.
    pub fn classes(&self) -> Result<&[String]> {
        Ok(&self.fitted_state()?.classes)
    }

    /// Fit the classifier on feature vectors and their labels.
    ///
    /// Accumulates per-class feature mass and document counts, then derives
    /// class priors and smoothed per-(class, term) log-likelihoods. A fresh
    /// call fully replaces any previously learned state.
    pub fn fit(&mut self, features: &[SparseVector], labels: &[String]) -> Result<()> {
        if features.len() != labels.len() {
            return Err(TaxonError::invalid_training_data(format!(
                "Got {} feature vectors but {} labels",
                features.len(),
                labels.len()
            )));
        }
        if features.is_empty() {
            return Err(TaxonError::invalid_training_data(
                "Cannot fit classifier on empty training data",
            ));
        }
        if !(self.alpha.is_finite() && self.alpha > 0.0) {
            return Err(TaxonError::invalid_operation(format!(
                "Smoothing alpha must be positive and finite, got {}",
                self.alpha
            )));
        }

        let n_features = features[0].dim();
        for feature in features {
            feature.validate_dim(n_features)?;
        }

        // Class set in first-seen label order
        let mut classes: Vec<String> = Vec::new();
        let mut class_index: AHashMap<&str, usize> = AHashMap::new();
        for label in labels {
            if !class_index.contains_key(label.as_str()) {
                class_index.insert(label.as_str(), classes.len());
                classes.push(label.clone());
            }
        }

        let n_classes = classes.len();
        let mut doc_counts = vec![0u64; n_classes];
        let mut feature_mass = vec![vec![0.0f64; n_features]; n_classes];
        let mut class_mass = vec![0.0f64; n_classes];

        for (feature, label) in features.iter().zip(labels.iter()) {
            let class = class_index[label.as_str()];
            doc_counts[class] += 1;
            for (idx, weight) in feature.iter() {
                feature_mass[class][idx] += weight;
                class_mass[class] += weight;
            }
        }

        let total_docs = features.len() as f64;
        let class_log_prior: Vec<f64> = doc_counts
            .iter()
            .map(|&count| (count as f64 / total_docs).ln())
            .collect();

        // Smoothed log-likelihoods: ln((mass + alpha) / (class_mass + alpha * V))
        let feature_log_prob: Vec<Vec<f64>> = feature_mass
            .iter()
            .zip(class_mass.iter())
            .map(|(masses, &total)| {
                let denominator = (total + self.alpha * n_features as f64).ln();
                masses
                    .iter()
                    .map(|&mass| (mass + self.alpha).ln() - denominator)
                    .collect()
            })
            .collect();

        log::debug!(
            "Fitted classifier: {} examples, {} classes, {} features",
            features.len(),
            n_classes,
            n_features
        );

        self.state = Some(Fitted {
            classes,
            class_log_prior,
            feature_log_prob,
            n_features,
        });

        Ok(())
    }

    /// Compute the joint log-likelihood of the feature vector for each class,
    /// in the stable class order.
    ///
    /// This is the scoring primitive both [`Self::predict`] and
    /// [`Self::predict_proba`] derive from.
    pub fn predict_log_likelihood(&self, feature: &SparseVector) -> Result<Vec<f64>> {
        let state = self.fitted_state()?;
        feature.validate_dim(state.n_features)?;

        let scores = state
            .class_log_prior
            .iter()
            .zip(state.feature_log_prob.iter())
            .map(|(&prior, log_probs)| {
                prior
                    + feature
                        .iter()
                        .map(|(idx, weight)| weight * log_probs[idx])
                        .sum::<f64>()
            })
            .collect();

        Ok(scores)
    }

    /// Predict the most likely class for a feature vector.
    ///
    /// Ties break toward the class that appears earliest in the stable class
    /// order.
    pub fn predict(&self, feature: &SparseVector) -> Result<String> {
        let scores = self.predict_log_likelihood(feature)?;
        let state = self.fitted_state()?;

        let best = argmax(&scores);
        Ok(state.classes[best].clone())
    }

    /// Compute a normalized probability distribution over classes.
    ///
    /// Returns `(class, probability)` pairs in the stable class order. Uses
    /// log-sum-exp so extreme log-likelihoods neither overflow nor underflow;
    /// the probabilities are non-negative and sum to 1.
    pub fn predict_proba(&self, feature: &SparseVector) -> Result<Vec<(String, f64)>> {
        let scores = self.predict_log_likelihood(feature)?;
        let state = self.fitted_state()?;

        let max_score = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let exp: Vec<f64> = scores.iter().map(|&s| (s - max_score).exp()).collect();
        let total: f64 = exp.iter().sum();

        Ok(state
            .classes
            .iter()
            .zip(exp.iter())
            .map(|(class, &e)| (class.clone(), e / total))
            .collect())
    }

    /// Compute classification accuracy against true labels.
    pub fn score(&self, features: &[SparseVector], labels: &[String]) -> Result<f64> {
        if features.len() != labels.len() {
            return Err(TaxonError::invalid_training_data(format!(
                "Got {} feature vectors but {} labels",
                features.len(),
                labels.len()
            )));
        }
        if features.is_empty() {
            return Err(TaxonError::invalid_training_data(
                "Cannot score on empty data",
            ));
        }

        let mut correct = 0usize;
        for (feature, label) in features.iter().zip(labels.iter()) {
            if self.predict(feature)? == *label {
                correct += 1;
            }
        }

        Ok(correct as f64 / features.len() as f64)
    }

    fn fitted_state(&self) -> Result<&Fitted> {
        self.state.as_ref().ok_or_else(|| {
            TaxonError::not_fitted("Classifier has not been fitted; call fit() first")
        })
    }
}

impl Default for MultinomialNb {
    fn default() -> Self {
        Self::new()
    }
}

/// Index of the maximum score, earliest index winning ties.
fn argmax(scores: &[f64]) -> usize {
    let mut best = 0;
    for (idx, &score) in scores.iter().enumerate().skip(1) {
        if score > scores[best] {
            best = idx;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy_training() -> (Vec<SparseVector>, Vec<String>) {
        // Term 0 is a "business" marker, term 1 a "politics" marker
        let features = vec![
            SparseVector::from_entries(3, vec![(0, 1.0), (2, 0.5)]).unwrap(),
            SparseVector::from_entries(3, vec![(1, 1.0)]).unwrap(),
            SparseVector::from_entries(3, vec![(0, 0.8), (2, 0.2)]).unwrap(),
        ];
        let labels = vec![
            "business".to_string(),
            "politics".to_string(),
            "business".to_string(),
        ];
        (features, labels)
    }

    #[test]
    fn test_fit_and_predict() {
        let (features, labels) = toy_training();
        let mut classifier = MultinomialNb::new();
        classifier.fit(&features, &labels).unwrap();

        let query = SparseVector::from_entries(3, vec![(0, 1.0)]).unwrap();
        assert_eq!(classifier.predict(&query).unwrap(), "business");

        let query = SparseVector::from_entries(3, vec![(1, 1.0)]).unwrap();
        assert_eq!(classifier.predict(&query).unwrap(), "politics");
    }

    #[test]
    fn test_classes_in_first_seen_order() {
        let (features, labels) = toy_training();
        let mut classifier = MultinomialNb::new();
        classifier.fit(&features, &labels).unwrap();

        assert_eq!(classifier.classes().unwrap(), &["business", "politics"]);
    }

    #[test]
    fn test_predict_unfitted_fails() {
        let classifier = MultinomialNb::new();
        let query = SparseVector::new(3);
        assert!(matches!(
            classifier.predict(&query),
            Err(TaxonError::NotFitted(_))
        ));
        assert!(matches!(
            classifier.predict_proba(&query),
            Err(TaxonError::NotFitted(_))
        ));
    }

    #[test]
    fn test_fit_length_mismatch_fails() {
        let (features, _) = toy_training();
        let mut classifier = MultinomialNb::new();
        let result = classifier.fit(&features, &["business".to_string()]);
        assert!(matches!(result, Err(TaxonError::InvalidTrainingData(_))));
    }

    #[test]
    fn test_fit_empty_fails() {
        let mut classifier = MultinomialNb::new();
        let result = classifier.fit(&[], &[]);
        assert!(matches!(result, Err(TaxonError::InvalidTrainingData(_))));
    }

    #[test]
    fn test_fit_dimension_mismatch_fails() {
        let features = vec![SparseVector::new(3), SparseVector::new(4)];
        let labels = vec!["a".to_string(), "b".to_string()];
        let mut classifier = MultinomialNb::new();
        assert!(matches!(
            classifier.fit(&features, &labels),
            Err(TaxonError::InvalidOperation(_))
        ));
    }

    #[test]
    fn test_invalid_alpha_fails() {
        let (features, labels) = toy_training();
        let mut classifier = MultinomialNb::new().with_alpha(0.0);
        assert!(matches!(
            classifier.fit(&features, &labels),
            Err(TaxonError::InvalidOperation(_))
        ));
    }

    #[test]
    fn test_predict_proba_sums_to_one() {
        let (features, labels) = toy_training();
        let mut classifier = MultinomialNb::new();
        classifier.fit(&features, &labels).unwrap();

        let query = SparseVector::from_entries(3, vec![(0, 0.7), (1, 0.3)]).unwrap();
        let proba = classifier.predict_proba(&query).unwrap();

        let total: f64 = proba.iter().map(|(_, p)| p).sum();
        assert!((total - 1.0).abs() < 1e-6);
        assert!(proba.iter().all(|&(_, p)| p >= 0.0));
    }

    #[test]
    fn test_predict_matches_proba_argmax() {
        let (features, labels) = toy_training();
        let mut classifier = MultinomialNb::new();
        classifier.fit(&features, &labels).unwrap();

        let query = SparseVector::from_entries(3, vec![(0, 0.5), (2, 0.5)]).unwrap();
        let predicted = classifier.predict(&query).unwrap();
        let proba = classifier.predict_proba(&query).unwrap();

        let best = proba
            .iter()
            .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap())
            .unwrap();
        assert_eq!(predicted, best.0);
    }

    #[test]
    fn test_tie_breaks_to_first_seen_class() {
        // Identical training data for both classes: every score ties
        let features = vec![
            SparseVector::from_entries(1, vec![(0, 1.0)]).unwrap(),
            SparseVector::from_entries(1, vec![(0, 1.0)]).unwrap(),
        ];
        let labels = vec!["zeta".to_string(), "alpha".to_string()];
        let mut classifier = MultinomialNb::new();
        classifier.fit(&features, &labels).unwrap();

        // "zeta" was seen first, so it wins the tie despite sorting last
        let query = SparseVector::from_entries(1, vec![(0, 1.0)]).unwrap();
        assert_eq!(classifier.predict(&query).unwrap(), "zeta");
    }

    #[test]
    fn test_zero_vector_predicts_highest_prior() {
        let (features, labels) = toy_training();
        let mut classifier = MultinomialNb::new();
        classifier.fit(&features, &labels).unwrap();

        // Two business examples vs one politics: priors favor business
        let query = SparseVector::new(3);
        assert_eq!(classifier.predict(&query).unwrap(), "business");
    }

    #[test]
    fn test_score() {
        let (features, labels) = toy_training();
        let mut classifier = MultinomialNb::new();
        classifier.fit(&features, &labels).unwrap();

        let accuracy = classifier.score(&features, &labels).unwrap();
        assert!((accuracy - 1.0).abs() < 1e-12);

        let wrong_labels = vec![
            "politics".to_string(),
            "politics".to_string(),
            "business".to_string(),
        ];
        let accuracy = classifier.score(&features, &wrong_labels).unwrap();
        assert!((accuracy - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_score_length_mismatch_fails() {
        let (features, labels) = toy_training();
        let mut classifier = MultinomialNb::new();
        classifier.fit(&features, &labels).unwrap();

        let result = classifier.score(&features, &labels[..2]);
        assert!(matches!(result, Err(TaxonError::InvalidTrainingData(_))));
    }

    #[test]
    fn test_refit_replaces_state() {
        let (features, labels) = toy_training();
        let mut classifier = MultinomialNb::new();
        classifier.fit(&features, &labels).unwrap();
        assert_eq!(classifier.classes().unwrap().len(), 2);

        let features = vec![SparseVector::from_entries(2, vec![(0, 1.0)]).unwrap()];
        let labels = vec!["sports".to_string()];
        classifier.fit(&features, &labels).unwrap();

        assert_eq!(classifier.classes().unwrap(), &["sports"]);
    }
}
