// src/lib.rs

pub mod config;
pub mod core;
pub mod corpus;
pub mod error;
pub mod learning;
pub mod persistence;
pub mod report;
pub mod scoring;

pub use crate::config::ClassifierConfig;
pub use crate::core::engine::ClassifierEngine;
pub use crate::core::model::TrainedModel;
pub use crate::core::types::{CategoryId, CategorySet};
pub use crate::error::{ClassifierError, Result};
pub use crate::learning::LearningEngine;
pub use crate::scoring::Prediction;
