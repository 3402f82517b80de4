// File: src/core/model.rs
use crate::core::frequency::FrequencyModel;
use crate::core::types::{CategoryId, CategorySet};
use crate::error::{ClassifierError, Result};
use serde::{Deserialize, Serialize};

/// A trained classifier: categories, their log priors and the frozen
/// frequency tables. Immutable once built; share it freely across threads
/// for prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainedModel {
    categories: CategorySet,
    /// `ln(document_count / total_documents)`, indexed by category id.
    priors: Vec<f64>,
    document_counts: Vec<u64>,
    frequencies: FrequencyModel,
}

impl TrainedModel {
    pub(crate) fn new(
        categories: CategorySet,
        priors: Vec<f64>,
        document_counts: Vec<u64>,
        frequencies: FrequencyModel,
    ) -> Self {
        Self { categories, priors, document_counts, frequencies }
    }

    /// Checks that every per-category part has one entry per category and
    /// that the frequency tables agree with the vocabulary. Snapshots are
    /// checked on load so scoring can index by category id.
    pub fn validate(&self) -> Result<()> {
        let expected = self.categories.len();
        if expected == 0 {
            return Err(ClassifierError::CorruptModel("no categories".into()));
        }
        if self.priors.len() != expected || self.document_counts.len() != expected {
            return Err(ClassifierError::CorruptModel(format!(
                "{} priors and {} document counts for {expected} categories",
                self.priors.len(),
                self.document_counts.len()
            )));
        }
        if let Some(bad) = self.priors.iter().position(|p| !p.is_finite()) {
            return Err(ClassifierError::CorruptModel(format!(
                "prior for category {bad} is not finite"
            )));
        }
        self.frequencies.validate(expected)
    }

    pub fn categories(&self) -> &CategorySet {
        &self.categories
    }

    pub fn prior(&self, category: CategoryId) -> Option<f64> {
        self.priors.get(category).copied()
    }

    pub fn priors(&self) -> &[f64] {
        &self.priors
    }

    pub fn document_counts(&self) -> &[u64] {
        &self.document_counts
    }

    pub fn training_documents(&self) -> u64 {
        self.document_counts.iter().sum()
    }

    pub fn frequencies(&self) -> &FrequencyModel {
        &self.frequencies
    }
}
