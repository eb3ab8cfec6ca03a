//! Stop filter implementation.
//!
//! Removes common words (stop words) that carry little class signal. Stop
//! word removal is optional for classification; when enabled it must be
//! applied identically during training and inference, which holds because the
//! filter is part of the analyzer owned by the vectorizer.
//!
//! # Examples
//!
//! ```
//! use taxon::analysis::token::Token;
//! use taxon::analysis::token_filter::Filter;
//! use taxon::analysis::token_filter::stop::StopFilter;
//!
//! let filter = StopFilter::new(); // Uses default English stop words
//! let tokens = vec![
//!     Token::new("the", 0),
//!     Token::new("quick", 1),
//!     Token::new("brown", 2)
//! ];
//!
//! let result: Vec<_> = filter.filter(Box::new(tokens.into_iter()))
//!     .unwrap()
//!     .collect();
//!
//! // "the" is removed as a stop word
//! assert_eq!(result.len(), 2);
//! assert_eq!(result[0].text, "quick");
//! assert_eq!(result[1].text, "brown");
//! ```

use std::collections::HashSet;
use std::sync::Arc;

use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// Default English stop words list.
///
/// Common English words that are typically filtered out before vectorization.
const DEFAULT_ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into", "is", "it",
    "no", "not", "of", "on", "or", "such", "that", "the", "their", "then", "there", "these",
    "they", "this", "to", "was", "will", "with",
];

/// A filter that removes stop words from the token stream.
#[derive(Clone, Debug)]
pub struct StopFilter {
    stop_words: Arc<HashSet<String>>,
}

impl StopFilter {
    /// Create a new stop filter with the default English stop words.
    pub fn new() -> Self {
        Self::from_words(DEFAULT_ENGLISH_STOP_WORDS.iter().copied())
    }

    /// Create a new stop filter from a custom word list.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let stop_words: HashSet<String> = words.into_iter().map(|w| w.into()).collect();
        StopFilter {
            stop_words: Arc::new(stop_words),
        }
    }

    /// Get the default English stop words.
    pub fn default_words() -> Vec<String> {
        DEFAULT_ENGLISH_STOP_WORDS
            .iter()
            .map(|w| w.to_string())
            .collect()
    }

    /// Check whether a word is in the stop list.
    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    /// Number of words in the stop list.
    pub fn len(&self) -> usize {
        self.stop_words.len()
    }

    /// Check if the stop list is empty.
    pub fn is_empty(&self) -> bool {
        self.stop_words.is_empty()
    }
}

impl Default for StopFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl Filter for StopFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let stop_words = Arc::clone(&self.stop_words);
        let filtered_tokens = tokens
            .filter(|token| !stop_words.contains(&token.text))
            .collect::<Vec<_>>();

        Ok(Box::new(filtered_tokens.into_iter()))
    }

    fn name(&self) -> &'static str {
        "stop"
    }
}
