// src/core/types.rs
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::error::{ClassifierError, Result};

/// Index of a category within its `CategorySet`.
pub type CategoryId = usize;

/// A normalized word produced by the tokenizer.
pub type Term = String;

/// Per-document term occurrence counts. Ordered so that iteration (and the
/// floating point sums built from it) is reproducible.
pub type TermCounts = BTreeMap<Term, u64>;

/// The closed, ordered set of categories a model can assign.
/// Enumeration order is the id order and is also the tie-break order
/// when two categories score the same.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySet {
    names: Vec<String>,
}

impl CategorySet {
    pub fn new<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(ClassifierError::EmptyCategorySet);
        }
        let mut seen = HashSet::with_capacity(names.len());
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(ClassifierError::DuplicateCategory(name.clone()));
            }
        }
        Ok(Self { names })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn name(&self, id: CategoryId) -> Option<&str> {
        self.names.get(id).map(String::as_str)
    }

    pub fn id_of(&self, name: &str) -> Option<CategoryId> {
        self.names.iter().position(|n| n == name)
    }

    pub fn contains(&self, id: CategoryId) -> bool {
        id < self.names.len()
    }

    /// Ids in enumeration order.
    pub fn ids(&self) -> std::ops::Range<CategoryId> {
        0..self.names.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CategoryId, &str)> {
        self.names.iter().enumerate().map(|(id, n)| (id, n.as_str()))
    }
}
