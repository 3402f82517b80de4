// File: src/error.rs
use std::path::PathBuf;
use thiserror::Error;

use crate::core::types::CategoryId;

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("training set is empty")]
    EmptyTrainingSet,

    /// A declared category has no training documents, so its prior would be log(0).
    #[error("category '{name}' has no training documents")]
    EmptyCategory { name: String },

    #[error("got {documents} documents but {labels} labels")]
    LengthMismatch { documents: usize, labels: usize },

    #[error("label {0} is not a declared category")]
    UnknownCategory(CategoryId),

    #[error("no categories declared")]
    EmptyCategorySet,

    #[error("category '{0}' declared twice")]
    DuplicateCategory(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("model has not been trained")]
    NotTrained,

    #[error("model is already trained; build a new engine to retrain")]
    AlreadyTrained,

    /// A loaded snapshot whose parts disagree with each other.
    #[error("corrupt model snapshot: {0}")]
    CorruptModel(String),

    #[error("corpus error at {}: {reason}", path.display())]
    Corpus { path: PathBuf, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("model snapshot: {0}")]
    Bincode(#[from] bincode::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl ClassifierError {
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Self::EmptyTrainingSet
                | Self::EmptyCategory { .. }
                | Self::LengthMismatch { .. }
                | Self::UnknownCategory(_)
                | Self::EmptyCategorySet
                | Self::DuplicateCategory(_)
                | Self::InvalidConfig(_)
        )
    }

    pub fn is_invalid_state(&self) -> bool {
        matches!(self, Self::NotTrained | Self::AlreadyTrained)
    }
}

pub type Result<T> = std::result::Result<T, ClassifierError>;
