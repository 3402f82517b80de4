// --- File: src/core/frequency.rs
use crate::core::types::{CategoryId, Term, TermCounts};
use crate::error::{ClassifierError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

// --- FrequencyBuilder: mutable accumulation, owned by the trainer ---

/// Accumulates per-category term counts, document counts and the global
/// vocabulary during a training pass. Partitioned builders can be merged,
/// so training can be split across threads without shared counters.
#[derive(Debug, Clone)]
pub struct FrequencyBuilder {
    tables: Vec<HashMap<Term, f64>>,
    document_counts: Vec<u64>,
    vocabulary: BTreeSet<Term>,
}

impl FrequencyBuilder {
    pub(crate) fn new(category_count: usize) -> Self {
        Self {
            tables: vec![HashMap::new(); category_count],
            document_counts: vec![0; category_count],
            vocabulary: BTreeSet::new(),
        }
    }

    /// Adds one document's term counts to its category.
    /// The caller guarantees `category` is in range.
    pub(crate) fn add_document(&mut self, category: CategoryId, counts: &TermCounts) {
        self.document_counts[category] += 1;
        let table = &mut self.tables[category];
        for (term, &count) in counts {
            *table.entry(term.clone()).or_insert(0.0) += count as f64;
            if !self.vocabulary.contains(term) {
                self.vocabulary.insert(term.clone());
            }
        }
    }

    /// Reduce step for partitioned training. Both builders must have been
    /// created for the same category set.
    pub(crate) fn merge(&mut self, other: FrequencyBuilder) {
        assert_eq!(
            self.tables.len(),
            other.tables.len(),
            "merging builders for different category sets"
        );
        for (mine, theirs) in self.tables.iter_mut().zip(other.tables) {
            for (term, count) in theirs {
                *mine.entry(term).or_insert(0.0) += count;
            }
        }
        for (mine, theirs) in self.document_counts.iter_mut().zip(other.document_counts) {
            *mine += theirs;
        }
        self.vocabulary.extend(other.vocabulary);
    }

    pub fn document_counts(&self) -> &[u64] {
        &self.document_counts
    }

    /// Freezes the accumulated tables. Category totals are computed once here
    /// so scoring never re-sums a table.
    pub fn freeze(self) -> (FrequencyModel, Vec<u64>) {
        let totals = self.tables.iter().map(|t| t.values().sum()).collect();
        let model = FrequencyModel {
            tables: self.tables,
            totals,
            vocabulary: self.vocabulary,
        };
        (model, self.document_counts)
    }
}

// --- FrequencyModel: the frozen, read-only result ---

/// Per-category term frequencies plus the global vocabulary.
/// Every term with a nonzero count in any table is in the vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyModel {
    tables: Vec<HashMap<Term, f64>>,
    totals: Vec<f64>,
    vocabulary: BTreeSet<Term>,
}

impl FrequencyModel {
    /// Count of `term` in `category`, 0 when absent.
    pub fn count(&self, category: CategoryId, term: &str) -> f64 {
        self.tables
            .get(category)
            .and_then(|t| t.get(term))
            .copied()
            .unwrap_or(0.0)
    }

    /// Sum of all term counts in `category`.
    pub fn total(&self, category: CategoryId) -> f64 {
        self.totals.get(category).copied().unwrap_or(0.0)
    }

    pub fn table(&self, category: CategoryId) -> Option<&HashMap<Term, f64>> {
        self.tables.get(category)
    }

    pub fn vocabulary(&self) -> &BTreeSet<Term> {
        &self.vocabulary
    }

    pub fn in_vocabulary(&self, term: &str) -> bool {
        self.vocabulary.contains(term)
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    /// Add-one smoothed normalizer: total occurrences plus one pseudo-count
    /// per vocabulary term.
    pub fn denominator(&self, category: CategoryId) -> f64 {
        self.total(category) + self.vocabulary.len() as f64
    }

    /// Checks a deserialized model: one table and one total per category,
    /// every counted term in the vocabulary, totals matching table sums.
    pub fn validate(&self, category_count: usize) -> Result<()> {
        if self.tables.len() != category_count || self.totals.len() != category_count {
            return Err(ClassifierError::CorruptModel(format!(
                "{} tables and {} totals for {category_count} categories",
                self.tables.len(),
                self.totals.len()
            )));
        }
        for (category, table) in self.tables.iter().enumerate() {
            if let Some(term) = table.keys().find(|t| !self.vocabulary.contains(*t)) {
                return Err(ClassifierError::CorruptModel(format!(
                    "term '{term}' in category {category} is not in the vocabulary"
                )));
            }
            let sum: f64 = table.values().sum();
            if sum != self.totals[category] {
                return Err(ClassifierError::CorruptModel(format!(
                    "category {category} total {} does not match its table sum {sum}",
                    self.totals[category]
                )));
            }
        }
        Ok(())
    }

    /// Table entries sorted by term, for stable export.
    pub fn sorted_table(&self, category: CategoryId) -> Vec<(&str, f64)> {
        let mut rows: Vec<(&str, f64)> = self
            .table(category)
            .map(|t| t.iter().map(|(k, &v)| (k.as_str(), v)).collect())
            .unwrap_or_default();
        rows.sort_by(|a, b| a.0.cmp(b.0));
        rows
    }
}
