//! Analyzer implementations that combine tokenizers and filters.
//!
//! Analyzers are the complete text processing pipeline:
//!
//! ```text
//! Raw Text → Tokenizer → Filter 1 → ... → Filter N → Token Stream
//! ```
//!
//! # Available Implementations
//!
//! - [`StandardAnalyzer`] - Regex tokenization + lowercasing, good defaults
//! - [`PipelineAnalyzer`] - Custom tokenizer + filter chains

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for analyzers that convert text into processed tokens.
pub trait Analyzer: Send + Sync {
    /// Analyze the given text and return a stream of processed tokens.
    fn analyze(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this analyzer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod pipeline;
pub mod standard;

pub use pipeline::PipelineAnalyzer;
pub use standard::StandardAnalyzer;
