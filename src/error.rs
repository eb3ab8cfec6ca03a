//! Error types for the Taxon library.
//!
//! All errors are represented by the [`TaxonError`] enum. The variants mirror
//! the failure modes of the classification engine: calling into a model that
//! has not been fitted, handing it inconsistent training data, or failing to
//! reach the training data source at all.
//!
//! # Examples
//!
//! ```
//! use taxon::error::{Result, TaxonError};
//!
//! fn example_operation() -> Result<()> {
//!     Err(TaxonError::not_fitted("model has not been fitted"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {e}"),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Taxon operations.
#[derive(Error, Debug)]
pub enum TaxonError {
    /// Predict, transform, or score was called before fit.
    #[error("Not fitted: {0}")]
    NotFitted(String),

    /// Training input is inconsistent (mismatched lengths, empty corpus).
    #[error("Invalid training data: {0}")]
    InvalidTrainingData(String),

    /// The upstream training data source is missing, unreadable, or empty.
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    /// Analysis-related errors (tokenization, filtering, etc.)
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Model artifact encoding/decoding errors.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Invalid operation (dimension mismatch, occupied handle, bad config).
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for operations that may fail with TaxonError.
pub type Result<T> = std::result::Result<T, TaxonError>;

impl TaxonError {
    /// Create a new not-fitted error.
    pub fn not_fitted<S: Into<String>>(msg: S) -> Self {
        TaxonError::NotFitted(msg.into())
    }

    /// Create a new invalid training data error.
    pub fn invalid_training_data<S: Into<String>>(msg: S) -> Self {
        TaxonError::InvalidTrainingData(msg.into())
    }

    /// Create a new data unavailable error.
    pub fn data_unavailable<S: Into<String>>(msg: S) -> Self {
        TaxonError::DataUnavailable(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        TaxonError::Analysis(msg.into())
    }

    /// Create a new serialization error.
    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        TaxonError::SerializationError(msg.into())
    }

    /// Create a new invalid operation error.
    pub fn invalid_operation<S: Into<String>>(msg: S) -> Self {
        TaxonError::InvalidOperation(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = TaxonError::not_fitted("vectorizer has not been fitted");
        assert_eq!(
            error.to_string(),
            "Not fitted: vectorizer has not been fitted"
        );

        let error = TaxonError::invalid_training_data("texts and labels differ in length");
        assert_eq!(
            error.to_string(),
            "Invalid training data: texts and labels differ in length"
        );

        let error = TaxonError::data_unavailable("corpus file is empty");
        assert_eq!(error.to_string(), "Data unavailable: corpus file is empty");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let taxon_error = TaxonError::from(io_error);

        match taxon_error {
            TaxonError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
    }
}
