//! Feature extraction: sparse vectors and TF-IDF vectorization.
//!
//! This module turns raw document text into the numeric features the
//! classifier consumes. [`SparseVector`] is the feature representation;
//! [`TfIdfVectorizer`] learns a vocabulary and IDF table from a training
//! corpus and maps documents onto it.

pub mod tfidf;
pub mod vector;

pub use tfidf::{TfIdfVectorizer, TokenizerKind, VectorizerConfig};
pub use vector::SparseVector;
