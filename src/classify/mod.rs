//! Classification: multinomial naive Bayes and the text classifier facade.
//!
//! [`MultinomialNb`] operates on pre-vectorized features; [`TextClassifier`]
//! composes it with a [`crate::feature::TfIdfVectorizer`] so callers work
//! with raw text and labels end to end. [`ModelHandle`] is a process-wide
//! set-once slot for sharing a trained model across serving threads.

pub mod handle;
pub mod model;
pub mod naive_bayes;

pub use handle::ModelHandle;
pub use model::{TextClassifier, TextClassifierConfig};
pub use naive_bayes::MultinomialNb;
