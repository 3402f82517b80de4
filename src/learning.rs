// File: src/learning.rs
use crate::core::frequency::FrequencyBuilder;
use crate::core::model::TrainedModel;
use crate::core::tokenizer::term_counts;
use crate::core::types::{CategoryId, CategorySet};
use crate::error::{ClassifierError, Result};
use std::thread;
use tracing::{debug, info};

/// Builds a `TrainedModel` from labeled documents in a single pass.
pub struct LearningEngine {
    workers: usize,
}

impl Default for LearningEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl LearningEngine {
    pub fn new() -> Self {
        Self { workers: 1 }
    }

    /// With more than one worker, documents are split into contiguous chunks,
    /// each accumulated privately and merged afterwards.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Trains on parallel `documents` / `labels` slices.
    ///
    /// Fails with an invalid-input error when the slices differ in length,
    /// the set is empty, a label is undeclared, or a declared category has no
    /// documents (its prior would be `ln(0)`).
    pub fn train<S: AsRef<str> + Sync>(
        &self,
        categories: &CategorySet,
        documents: &[S],
        labels: &[CategoryId],
    ) -> Result<TrainedModel> {
        if documents.len() != labels.len() {
            return Err(ClassifierError::LengthMismatch {
                documents: documents.len(),
                labels: labels.len(),
            });
        }
        let total = documents.len();
        if total == 0 {
            return Err(ClassifierError::EmptyTrainingSet);
        }

        let mut document_counts = vec![0u64; categories.len()];
        for &label in labels {
            if !categories.contains(label) {
                return Err(ClassifierError::UnknownCategory(label));
            }
            document_counts[label] += 1;
        }
        if let Some(empty) = document_counts.iter().position(|&n| n == 0) {
            return Err(ClassifierError::EmptyCategory {
                name: categories.name(empty).unwrap_or_default().to_string(),
            });
        }

        let priors: Vec<f64> = document_counts
            .iter()
            .map(|&n| (n as f64 / total as f64).ln())
            .collect();

        let builder = if self.workers > 1 && total > 1 {
            self.accumulate_partitioned(categories.len(), documents, labels)
        } else {
            accumulate(categories.len(), documents, labels)
        };
        let (frequencies, counted) = builder.freeze();
        debug_assert_eq!(counted, document_counts);

        info!(
            documents = total,
            categories = categories.len(),
            vocabulary = frequencies.vocabulary_len(),
            "training complete"
        );
        Ok(TrainedModel::new(categories.clone(), priors, document_counts, frequencies))
    }

    fn accumulate_partitioned<S: AsRef<str> + Sync>(
        &self,
        category_count: usize,
        documents: &[S],
        labels: &[CategoryId],
    ) -> FrequencyBuilder {
        let chunk = documents.len().div_ceil(self.workers);
        debug!(workers = self.workers, chunk, "partitioned training");

        thread::scope(|scope| {
            let handles: Vec<_> = documents
                .chunks(chunk)
                .zip(labels.chunks(chunk))
                .map(|(docs, labs)| scope.spawn(move || accumulate(category_count, docs, labs)))
                .collect();

            let mut merged = FrequencyBuilder::new(category_count);
            for handle in handles {
                let part = handle
                    .join()
                    .unwrap_or_else(|panic| std::panic::resume_unwind(panic));
                merged.merge(part);
            }
            merged
        })
    }
}

fn accumulate<S: AsRef<str>>(
    category_count: usize,
    documents: &[S],
    labels: &[CategoryId],
) -> FrequencyBuilder {
    let mut builder = FrequencyBuilder::new(category_count);
    for (document, &label) in documents.iter().zip(labels) {
        builder.add_document(label, &term_counts(document.as_ref()));
    }
    builder
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sport_weather() -> (CategorySet, Vec<&'static str>, Vec<CategoryId>) {
        let cats = CategorySet::new(["sport", "weather"]).unwrap();
        let docs = vec![
            "the game was great",
            "great game tonight",
            "rain today",
            "great rain expected",
        ];
        (cats, docs, vec![0, 0, 1, 1])
    }

    #[test]
    fn builds_per_category_tables() {
        let (cats, docs, labels) = sport_weather();
        let model = LearningEngine::new().train(&cats, &docs, &labels).unwrap();
        let freq = model.frequencies();

        assert_eq!(freq.count(0, "game"), 2.0);
        assert_eq!(freq.count(0, "great"), 2.0);
        assert_eq!(freq.count(0, "tonight"), 1.0);
        assert_eq!(freq.count(1, "rain"), 2.0);
        assert_eq!(freq.count(1, "great"), 1.0);
        assert_eq!(freq.count(1, "today"), 1.0);
        assert_eq!(freq.count(1, "expected"), 1.0);
        assert_eq!(freq.count(1, "game"), 0.0);

        let vocab: Vec<&str> = freq.vocabulary().iter().map(String::as_str).collect();
        assert_eq!(vocab, vec!["expected", "game", "great", "rain", "today", "tonight"]);
        assert_eq!(model.document_counts(), &[2, 2]);
    }

    #[test]
    fn priors_are_log_document_shares() {
        let cats = CategorySet::new(["A", "B"]).unwrap();
        let mut docs = Vec::new();
        let mut labels = Vec::new();
        for i in 0..100 {
            docs.push(format!("word{i} filler"));
            labels.push(if i < 30 { 0 } else { 1 });
        }
        let model = LearningEngine::new().train(&cats, &docs, &labels).unwrap();
        assert_eq!(model.prior(0), Some(0.3f64.ln()));
        assert_eq!(model.prior(1), Some(0.7f64.ln()));

        let mass: f64 = model.priors().iter().map(|p| p.exp()).sum();
        assert!((mass - 1.0).abs() < 1e-12);
    }

    #[test]
    fn empty_category_is_rejected() {
        let cats = CategorySet::new(["sport", "weather", "politics"]).unwrap();
        let err = LearningEngine::new()
            .train(&cats, &["great game", "rain"], &[0, 1])
            .unwrap_err();
        assert!(matches!(err, ClassifierError::EmptyCategory { ref name } if name == "politics"));
        assert!(err.is_invalid_input());
    }

    #[test]
    fn empty_and_mismatched_inputs_are_rejected() {
        let cats = CategorySet::new(["sport"]).unwrap();
        let none: [&str; 0] = [];
        assert!(matches!(
            LearningEngine::new().train(&cats, &none, &[]),
            Err(ClassifierError::EmptyTrainingSet)
        ));
        assert!(matches!(
            LearningEngine::new().train(&cats, &["a", "b"], &[0]),
            Err(ClassifierError::LengthMismatch { documents: 2, labels: 1 })
        ));
        assert!(matches!(
            LearningEngine::new().train(&cats, &["a"], &[4]),
            Err(ClassifierError::UnknownCategory(4))
        ));
    }

    #[test]
    fn training_is_deterministic() {
        let (cats, docs, labels) = sport_weather();
        let first = LearningEngine::new().train(&cats, &docs, &labels).unwrap();
        let second = LearningEngine::new().train(&cats, &docs, &labels).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn partitioned_training_matches_sequential() {
        let (cats, docs, labels) = sport_weather();
        let sequential = LearningEngine::new().train(&cats, &docs, &labels).unwrap();
        for workers in [2, 3, 8] {
            let parallel = LearningEngine::new()
                .with_workers(workers)
                .train(&cats, &docs, &labels)
                .unwrap();
            assert_eq!(sequential, parallel);
        }
    }
}
