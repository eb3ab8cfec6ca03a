//! Process-wide handle for a trained model.
//!
//! Serving layers typically load one model at startup and share it across
//! request threads. [`ModelHandle`] makes the initialization explicit: the
//! model is installed at most once, and every reader afterwards gets the same
//! immutable instance without locking. Installing into an occupied handle and
//! reading from an empty handle are errors rather than races.
//!
//! # Examples
//!
//! ```
//! use taxon::classify::handle::ModelHandle;
//! use taxon::classify::model::TextClassifier;
//!
//! static MODEL: ModelHandle = ModelHandle::new();
//!
//! let mut model = TextClassifier::new().unwrap();
//! model
//!     .fit(
//!         &["stocks rally".to_string(), "voters decide".to_string()],
//!         &["business".to_string(), "politics".to_string()],
//!     )
//!     .unwrap();
//!
//! MODEL.install(model).unwrap();
//! assert_eq!(MODEL.get().unwrap().predict("stocks rally").unwrap(), "business");
//! ```

use std::sync::{Arc, OnceLock};

use crate::classify::model::TextClassifier;
use crate::error::{Result, TaxonError};

/// A set-at-most-once slot holding a fitted [`TextClassifier`].
#[derive(Debug)]
pub struct ModelHandle {
    slot: OnceLock<Arc<TextClassifier>>,
}

impl ModelHandle {
    /// Create a new, empty handle.
    pub const fn new() -> Self {
        ModelHandle {
            slot: OnceLock::new(),
        }
    }

    /// Install a fitted model into this handle.
    ///
    /// Fails with `NotFitted` if the model has not been fitted, and with
    /// `InvalidOperation` if a model was already installed.
    pub fn install(&self, model: TextClassifier) -> Result<()> {
        if !model.is_fitted() {
            return Err(TaxonError::not_fitted(
                "Cannot install an unfitted model into a handle",
            ));
        }
        self.slot.set(Arc::new(model)).map_err(|_| {
            TaxonError::invalid_operation("Model handle has already been initialized")
        })
    }

    /// Get the installed model.
    pub fn get(&self) -> Result<Arc<TextClassifier>> {
        self.slot.get().cloned().ok_or_else(|| {
            TaxonError::invalid_operation("No model has been installed into this handle")
        })
    }

    /// Check whether a model has been installed.
    pub fn is_initialized(&self) -> bool {
        self.slot.get().is_some()
    }
}

impl Default for ModelHandle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fitted_model() -> TextClassifier {
        let mut model = TextClassifier::new().unwrap();
        model
            .fit(
                &["stocks rally".to_string(), "voters decide".to_string()],
                &["business".to_string(), "politics".to_string()],
            )
            .unwrap();
        model
    }

    #[test]
    fn test_install_and_get() {
        let handle = ModelHandle::new();
        assert!(!handle.is_initialized());
        assert!(handle.get().is_err());

        handle.install(fitted_model()).unwrap();
        assert!(handle.is_initialized());
        assert_eq!(handle.get().unwrap().predict("stocks rally").unwrap(), "business");
    }

    #[test]
    fn test_install_twice_fails() {
        let handle = ModelHandle::new();
        handle.install(fitted_model()).unwrap();

        let result = handle.install(fitted_model());
        assert!(matches!(result, Err(TaxonError::InvalidOperation(_))));
    }

    #[test]
    fn test_install_unfitted_fails() {
        let handle = ModelHandle::new();
        let result = handle.install(TextClassifier::new().unwrap());
        assert!(matches!(result, Err(TaxonError::NotFitted(_))));
        assert!(!handle.is_initialized());
    }

    #[test]
    fn test_concurrent_reads() {
        let handle = ModelHandle::new();
        handle.install(fitted_model()).unwrap();

        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    let model = handle.get().unwrap();
                    assert_eq!(model.predict("stocks rally").unwrap(), "business");
                });
            }
        });
    }
}
