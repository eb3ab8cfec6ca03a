//! TF-IDF vectorizer for text feature extraction.
//!
//! [`TfIdfVectorizer`] learns a vocabulary and per-term inverse document
//! frequencies from a training corpus, then converts documents into sparse,
//! L2-normalized feature vectors. The tokenization behavior is part of the
//! vectorizer's configuration, so fitting and transforming are guaranteed to
//! analyze text identically, and a fitted vectorizer round-trips through
//! serialization together with its vocabulary.
//!
//! # Examples
//!
//! ```
//! use taxon::feature::tfidf::TfIdfVectorizer;
//!
//! let documents = vec![
//!     "stocks rally on earnings".to_string(),
//!     "election results surprise voters".to_string(),
//! ];
//!
//! let mut vectorizer = TfIdfVectorizer::new().unwrap();
//! let vectors = vectorizer.fit_transform(&documents).unwrap();
//!
//! assert_eq!(vectors.len(), 2);
//! assert!((vectors[0].norm() - 1.0).abs() < 1e-12);
//! ```

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use ahash::{AHashMap, AHashSet};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::Analyzer;
use crate::analysis::analyzer::pipeline::PipelineAnalyzer;
use crate::analysis::token_filter::lowercase::LowercaseFilter;
use crate::analysis::token_filter::stop::StopFilter;
use crate::analysis::tokenizer::Tokenizer;
use crate::analysis::tokenizer::regex::RegexTokenizer;
use crate::analysis::tokenizer::unicode_word::UnicodeWordTokenizer;
use crate::analysis::tokenizer::whitespace::WhitespaceTokenizer;
use crate::error::{Result, TaxonError};
use crate::feature::vector::SparseVector;

/// Tokenizer selection for a [`VectorizerConfig`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TokenizerKind {
    /// Regex tokenization with the given pattern.
    Regex {
        /// The token pattern.
        pattern: String,
    },
    /// Split on whitespace runs.
    Whitespace,
    /// Unicode word boundaries (UAX #29).
    UnicodeWord,
}

impl Default for TokenizerKind {
    fn default() -> Self {
        TokenizerKind::Regex {
            pattern: r"\w+".to_string(),
        }
    }
}

/// Configuration for a [`TfIdfVectorizer`].
///
/// Tokenizer boundaries, case folding, stop words, and the minimum document
/// frequency are explicit configuration so that vectorization behavior is
/// reproducible from the serialized model alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorizerConfig {
    /// Which tokenizer to use.
    pub tokenizer: TokenizerKind,
    /// Whether to lowercase tokens before vocabulary lookup.
    pub lowercase: bool,
    /// Optional stop word list, removed before vocabulary lookup.
    pub stop_words: Option<Vec<String>>,
    /// Minimum number of training documents a term must occur in to enter
    /// the vocabulary (default 1, i.e. no filtering).
    pub min_df: usize,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        VectorizerConfig {
            tokenizer: TokenizerKind::default(),
            lowercase: true,
            stop_words: None,
            min_df: 1,
        }
    }
}

impl VectorizerConfig {
    /// Build the analyzer this configuration describes.
    pub fn build_analyzer(&self) -> Result<Arc<dyn Analyzer>> {
        let tokenizer: Arc<dyn Tokenizer> = match &self.tokenizer {
            TokenizerKind::Regex { pattern } => Arc::new(RegexTokenizer::with_pattern(pattern)?),
            TokenizerKind::Whitespace => Arc::new(WhitespaceTokenizer::new()),
            TokenizerKind::UnicodeWord => Arc::new(UnicodeWordTokenizer::new()),
        };

        let mut analyzer = PipelineAnalyzer::new(tokenizer);
        if self.lowercase {
            analyzer = analyzer.add_filter(Arc::new(LowercaseFilter::new()));
        }
        if let Some(words) = &self.stop_words {
            analyzer = analyzer.add_filter(Arc::new(StopFilter::from_words(words.clone())));
        }

        Ok(Arc::new(analyzer))
    }
}

/// State learned by [`TfIdfVectorizer::fit`], frozen afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Fitted {
    /// Vocabulary: term -> index mapping, indices assigned in first-seen order.
    vocabulary: HashMap<String, usize>,
    /// Number of training documents each term occurred in, indexed by term.
    document_frequency: Vec<u64>,
    /// Inverse document frequency for each term.
    idf: Vec<f64>,
    /// Total number of documents seen during training.
    n_documents: usize,
}

/// TF-IDF vectorizer for text feature extraction.
///
/// `fit` learns the vocabulary, document frequencies, and IDF weights;
/// `transform` maps documents onto the frozen vocabulary. Terms not seen
/// during training contribute nothing at transform time and are not an error.
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "VectorizerState", into = "VectorizerState")]
pub struct TfIdfVectorizer {
    config: VectorizerConfig,
    analyzer: Arc<dyn Analyzer>,
    state: Option<Fitted>,
}

/// Serializable mirror of [`TfIdfVectorizer`]. The analyzer is rebuilt from
/// the config on deserialization.
#[derive(Serialize, Deserialize)]
struct VectorizerState {
    config: VectorizerConfig,
    state: Option<Fitted>,
}

impl TryFrom<VectorizerState> for TfIdfVectorizer {
    type Error = TaxonError;

    fn try_from(value: VectorizerState) -> Result<Self> {
        let mut vectorizer = TfIdfVectorizer::with_config(value.config)?;
        vectorizer.state = value.state;
        Ok(vectorizer)
    }
}

impl From<TfIdfVectorizer> for VectorizerState {
    fn from(value: TfIdfVectorizer) -> Self {
        VectorizerState {
            config: value.config,
            state: value.state,
        }
    }
}

impl std::fmt::Debug for TfIdfVectorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TfIdfVectorizer")
            .field("config", &self.config)
            .field("vocabulary_size", &self.vocabulary_size())
            .field("n_documents", &self.n_documents())
            .finish()
    }
}

impl TfIdfVectorizer {
    /// Create a new TF-IDF vectorizer with the default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(VectorizerConfig::default())
    }

    /// Create a new TF-IDF vectorizer with the given configuration.
    pub fn with_config(config: VectorizerConfig) -> Result<Self> {
        let analyzer = config.build_analyzer()?;
        Ok(TfIdfVectorizer {
            config,
            analyzer,
            state: None,
        })
    }

    /// Get the configuration of this vectorizer.
    pub fn config(&self) -> &VectorizerConfig {
        &self.config
    }

    /// Check whether this vectorizer has been fitted.
    pub fn is_fitted(&self) -> bool {
        self.state.is_some()
    }

    /// Get the size of the vocabulary (0 before fitting).
    pub fn vocabulary_size(&self) -> usize {
        self.state.as_ref().map_or(0, |s| s.vocabulary.len())
    }

    /// Get the number of documents seen during training (0 before fitting).
    pub fn n_documents(&self) -> usize {
        self.state.as_ref().map_or(0, |s| s.n_documents)
    }

    /// Look up the vocabulary index of a term.
    pub fn term_index(&self, term: &str) -> Option<usize> {
        self.state.as_ref()?.vocabulary.get(term).copied()
    }

    /// Get the document frequency of a term.
    pub fn document_frequency(&self, term: &str) -> Option<u64> {
        let state = self.state.as_ref()?;
        let idx = *state.vocabulary.get(term)?;
        Some(state.document_frequency[idx])
    }

    /// Get the inverse document frequency weight of a term.
    pub fn idf(&self, term: &str) -> Option<f64> {
        let state = self.state.as_ref()?;
        let idx = *state.vocabulary.get(term)?;
        Some(state.idf[idx])
    }

    /// Fit the vectorizer on training documents.
    ///
    /// Builds the vocabulary in first-seen term order (filtered by the
    /// configured minimum document frequency), counts document frequencies,
    /// and computes `IDF = ln((1 + N) / (1 + df)) + 1`. A fresh call fully
    /// replaces any previously learned state.
    pub fn fit(&mut self, documents: &[String]) -> Result<()> {
        if documents.is_empty() {
            return Err(TaxonError::invalid_training_data(
                "Cannot fit vectorizer on an empty corpus",
            ));
        }

        let n_documents = documents.len();
        let mut df: AHashMap<String, u64> = AHashMap::new();
        let mut term_order: Vec<String> = Vec::new();

        // Count document frequencies, remembering first-seen term order so
        // vocabulary indices are stable across runs
        for doc in documents {
            let mut seen: AHashSet<String> = AHashSet::new();
            for token in self.analyzer.analyze(doc)? {
                if !seen.insert(token.text.clone()) {
                    continue;
                }
                match df.entry(token.text.clone()) {
                    Entry::Occupied(mut entry) => *entry.get_mut() += 1,
                    Entry::Vacant(entry) => {
                        entry.insert(1);
                        term_order.push(token.text);
                    }
                }
            }
        }

        let min_df = self.config.min_df.max(1) as u64;
        let mut vocabulary = HashMap::new();
        let mut document_frequency = Vec::new();
        let mut idf = Vec::new();

        for term in term_order {
            let term_df = df[&term];
            if term_df < min_df {
                continue;
            }
            // IDF = ln((1 + N) / (1 + df)) + 1
            let weight = ((1.0 + n_documents as f64) / (1.0 + term_df as f64)).ln() + 1.0;
            vocabulary.insert(term, vocabulary.len());
            document_frequency.push(term_df);
            idf.push(weight);
        }

        log::debug!(
            "Fitted vectorizer: {} documents, {} terms",
            n_documents,
            vocabulary.len()
        );

        self.state = Some(Fitted {
            vocabulary,
            document_frequency,
            idf,
            n_documents,
        });

        Ok(())
    }

    /// Transform documents into TF-IDF feature vectors.
    ///
    /// Order-preserving; pure function of the learned state. Tokens absent
    /// from the frozen vocabulary are dropped, so a document made entirely of
    /// unseen terms transforms to the zero vector.
    pub fn transform(&self, documents: &[String]) -> Result<Vec<SparseVector>> {
        let state = self.fitted_state()?;
        documents
            .par_iter()
            .map(|doc| self.vectorize(state, doc))
            .collect()
    }

    /// Transform a single document into a TF-IDF feature vector.
    pub fn transform_one(&self, document: &str) -> Result<SparseVector> {
        let state = self.fitted_state()?;
        self.vectorize(state, document)
    }

    /// Fit on the given documents, then transform them.
    ///
    /// Produces exactly the same output as calling [`Self::fit`] followed by
    /// [`Self::transform`] on the same corpus.
    pub fn fit_transform(&mut self, documents: &[String]) -> Result<Vec<SparseVector>> {
        self.fit(documents)?;
        self.transform(documents)
    }

    fn fitted_state(&self) -> Result<&Fitted> {
        self.state.as_ref().ok_or_else(|| {
            TaxonError::not_fitted("Vectorizer has not been fitted; call fit() first")
        })
    }

    fn vectorize(&self, state: &Fitted, document: &str) -> Result<SparseVector> {
        let mut counts: AHashMap<usize, f64> = AHashMap::new();
        for token in self.analyzer.analyze(document)? {
            if let Some(&idx) = state.vocabulary.get(&token.text) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }

        let entries: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(idx, tf)| (idx, tf * state.idf[idx]))
            .collect();

        let mut vector = SparseVector::from_entries(state.idf.len(), entries)?;
        vector.l2_normalize();
        Ok(vector)
    }
}
