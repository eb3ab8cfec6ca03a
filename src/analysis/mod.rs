//! Text analysis pipeline: tokenizers, token filters, and analyzers.
//!
//! Analysis turns raw document text into a stream of normalized tokens. The
//! same analyzer instance is used when fitting a vectorizer and when
//! transforming new documents, so tokenization behavior is guaranteed to be
//! identical between training and inference.
//!
//! ```text
//! Raw Text → Tokenizer → Filter 1 → ... → Filter N → Token Stream
//! ```

pub mod analyzer;
pub mod token;
pub mod token_filter;
pub mod tokenizer;

pub use analyzer::{Analyzer, PipelineAnalyzer, StandardAnalyzer};
pub use token::{Token, TokenStream};
pub use token_filter::{Filter, LowercaseFilter, StopFilter};
pub use tokenizer::{RegexTokenizer, Tokenizer, UnicodeWordTokenizer, WhitespaceTokenizer};
