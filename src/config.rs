// File: src/config.rs
use crate::error::{ClassifierError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// One sub-directory per category.
    pub corpus_dir: PathBuf,
    /// Destination for exported tables, predictions and the summary.
    pub output_dir: PathBuf,
    /// Share of each category's files used for training.
    pub train_fraction: f64,
    /// Training threads; 1 trains sequentially.
    pub workers: usize,
    /// Optional bincode snapshot of the trained model.
    pub model_path: Option<PathBuf>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            corpus_dir: PathBuf::from("20_newsgroups"),
            output_dir: PathBuf::from("Post_Processed_Data"),
            train_fraction: 0.5,
            workers: 1,
            model_path: None,
        }
    }
}

impl ClassifierConfig {
    /// Reads a JSON config file; missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.train_fraction > 0.0 && self.train_fraction < 1.0) {
            return Err(ClassifierError::InvalidConfig(format!(
                "train_fraction must be in (0, 1), got {}",
                self.train_fraction
            )));
        }
        if self.workers == 0 {
            return Err(ClassifierError::InvalidConfig("workers must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bayes.json");
        fs::write(&path, r#"{ "corpus_dir": "data/news", "workers": 4 }"#).unwrap();

        let config = ClassifierConfig::from_file(&path).unwrap();
        assert_eq!(config.corpus_dir, PathBuf::from("data/news"));
        assert_eq!(config.workers, 4);
        assert_eq!(config.train_fraction, 0.5);
        assert_eq!(config.output_dir, PathBuf::from("Post_Processed_Data"));
        assert_eq!(config.model_path, None);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let bad_split = ClassifierConfig { train_fraction: 0.0, ..Default::default() };
        assert!(bad_split.validate().unwrap_err().is_invalid_input());
        let no_workers = ClassifierConfig { workers: 0, ..Default::default() };
        assert!(no_workers.validate().is_err());
        assert!(ClassifierConfig::default().validate().is_ok());
    }
}
