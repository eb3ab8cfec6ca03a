//! Sparse feature vector data structure.
//!
//! Documents vectorize to mostly-zero vectors over the vocabulary, so
//! features are stored as ordered `(term index, weight)` pairs together with
//! the logical dimension (the vocabulary size).

use serde::{Deserialize, Serialize};

use crate::error::{Result, TaxonError};

/// A sparse vector of `(index, weight)` entries, sorted by index.
///
/// # Examples
///
/// ```
/// use taxon::feature::vector::SparseVector;
///
/// let mut v = SparseVector::from_entries(4, vec![(0, 3.0), (2, 4.0)]).unwrap();
/// assert_eq!(v.norm(), 5.0);
///
/// v.l2_normalize();
/// assert!((v.norm() - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparseVector {
    /// The logical dimension of the vector.
    dim: usize,
    /// Non-zero entries as (index, weight) pairs, sorted by index.
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    /// Create a new all-zero vector with the given dimension.
    pub fn new(dim: usize) -> Self {
        SparseVector {
            dim,
            entries: Vec::new(),
        }
    }

    /// Create a vector from `(index, weight)` entries.
    ///
    /// Entries are sorted by index. Fails if an index is out of bounds or
    /// appears more than once.
    pub fn from_entries(dim: usize, mut entries: Vec<(usize, f64)>) -> Result<Self> {
        entries.sort_unstable_by_key(|&(idx, _)| idx);

        for window in entries.windows(2) {
            if window[0].0 == window[1].0 {
                return Err(TaxonError::invalid_operation(format!(
                    "Duplicate index {} in sparse vector",
                    window[0].0
                )));
            }
        }
        if let Some(&(idx, _)) = entries.last()
            && idx >= dim
        {
            return Err(TaxonError::invalid_operation(format!(
                "Index {idx} out of bounds for sparse vector of dimension {dim}"
            )));
        }

        Ok(SparseVector { dim, entries })
    }

    /// Get the logical dimension of this vector.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Get the non-zero entries, sorted by index.
    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    /// Iterate over the non-zero `(index, weight)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.entries.iter().copied()
    }

    /// Number of non-zero entries.
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    /// Check whether this is the zero vector.
    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    /// Calculate the L2 norm (magnitude) of this vector.
    pub fn norm(&self) -> f64 {
        self.entries
            .iter()
            .map(|&(_, w)| w * w)
            .sum::<f64>()
            .sqrt()
    }

    /// Normalize this vector to unit length.
    ///
    /// The zero vector stays zero; this is not an error.
    pub fn l2_normalize(&mut self) {
        let norm = self.norm();
        if norm > 0.0 {
            for (_, w) in &mut self.entries {
                *w /= norm;
            }
        }
    }

    /// Get a normalized copy of this vector.
    pub fn l2_normalized(&self) -> Self {
        let mut normalized = self.clone();
        normalized.l2_normalize();
        normalized
    }

    /// Dot product with another sparse vector of the same dimension.
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let mut sum = 0.0;
        let (mut i, mut j) = (0, 0);
        while i < self.entries.len() && j < other.entries.len() {
            let (a_idx, a_w) = self.entries[i];
            let (b_idx, b_w) = other.entries[j];
            match a_idx.cmp(&b_idx) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += a_w * b_w;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    /// Validate that this vector has the expected dimension.
    pub fn validate_dim(&self, expected_dim: usize) -> Result<()> {
        if self.dim != expected_dim {
            return Err(TaxonError::invalid_operation(format!(
                "Vector dimension mismatch: expected {expected_dim}, got {}",
                self.dim
            )));
        }
        Ok(())
    }
}
