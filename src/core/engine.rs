use crate::core::model::TrainedModel;
use crate::core::types::{CategoryId, CategorySet};
use crate::error::{ClassifierError, Result};
use crate::learning::LearningEngine;
use crate::persistence::{load_model, save_model};
use crate::scoring::Prediction;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

enum ModelState {
    Untrained,
    Trained(TrainedModel),
}

/// Owns one model through its lifecycle: `Untrained` until a successful
/// `train`, then `Trained` for good. Retraining means a new engine.
pub struct ClassifierEngine {
    state: ModelState,
    learning_engine: LearningEngine,
    model_path: Option<PathBuf>,
}

impl Default for ClassifierEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ClassifierEngine {
    pub fn new() -> Self {
        Self {
            state: ModelState::Untrained,
            learning_engine: LearningEngine::new(),
            model_path: None,
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.learning_engine = LearningEngine::new().with_workers(workers);
        self
    }

    /// Where `save_model` writes.
    pub fn with_model_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.model_path = Some(path.into());
        self
    }

    /// Wraps an already trained model.
    pub fn from_model(model: TrainedModel) -> Self {
        Self { state: ModelState::Trained(model), ..Self::new() }
    }

    /// Loads the snapshot at `path`. Missing, undecodable and inconsistent
    /// snapshots are errors; `save_model` later writes back to `path`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut engine = Self::from_model(load_model(path)?);
        engine.model_path = Some(path.to_path_buf());
        Ok(engine)
    }

    /// Loads a snapshot if one is readable at `path`, otherwise starts
    /// untrained. Either way `save_model` later writes back to `path`.
    pub fn from_file_or_new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let mut engine = match load_model(path) {
            Ok(model) => Self::from_model(model),
            Err(ClassifierError::Io(e)) if e.kind() == ErrorKind::NotFound => {
                info!(path = %path.display(), "no model snapshot yet, starting untrained");
                Self::new()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring unreadable model snapshot");
                Self::new()
            }
        };
        engine.model_path = Some(path.to_path_buf());
        engine
    }

    pub fn is_trained(&self) -> bool {
        matches!(self.state, ModelState::Trained(_))
    }

    pub fn train<S: AsRef<str> + Sync>(
        &mut self,
        categories: &CategorySet,
        documents: &[S],
        labels: &[CategoryId],
    ) -> Result<&TrainedModel> {
        if self.is_trained() {
            return Err(ClassifierError::AlreadyTrained);
        }
        let model = self.learning_engine.train(categories, documents, labels)?;
        self.state = ModelState::Trained(model);
        self.model()
    }

    pub fn model(&self) -> Result<&TrainedModel> {
        match &self.state {
            ModelState::Trained(model) => Ok(model),
            ModelState::Untrained => Err(ClassifierError::NotTrained),
        }
    }

    pub fn predict(&self, document: &str) -> Result<Prediction> {
        Ok(self.model()?.predict(document))
    }

    /// Writes the trained model to the configured path. No-op without a path.
    pub fn save_model(&self) -> Result<()> {
        let Some(path) = &self.model_path else {
            return Ok(());
        };
        save_model(self.model()?, path)?;
        info!(path = %path.display(), "model saved");
        Ok(())
    }
}
