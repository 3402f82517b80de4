// File: src/report.rs
use crate::core::model::TrainedModel;
use crate::error::Result;
use crate::scoring::Prediction;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const SUMMARY_FILE: &str = "PredictionResultsSummary.txt";

/// One evaluated document, as handed to the result sink.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRecord {
    pub document_id: String,
    pub predicted: String,
    pub actual: String,
    /// Log-posterior per category, category order.
    pub scores: Vec<f64>,
}

impl PredictionRecord {
    pub fn new(
        model: &TrainedModel,
        document_id: impl Into<String>,
        prediction: Prediction,
        actual: &str,
    ) -> Self {
        let categories = model.categories();
        Self {
            document_id: document_id.into(),
            predicted: categories.name(prediction.category).unwrap_or_default().to_string(),
            actual: actual.to_string(),
            scores: prediction.scores,
        }
    }

    pub fn is_correct(&self) -> bool {
        self.predicted == self.actual
    }

    pub fn outcome(&self) -> &'static str {
        if self.is_correct() {
            "correct"
        } else {
            "incorrect"
        }
    }
}

/// Running tally of evaluation outcomes.
#[derive(Debug, Default, Clone)]
pub struct Evaluation {
    correct: usize,
    total: usize,
}

impl Evaluation {
    pub fn record(&mut self, record: &PredictionRecord) {
        self.total += 1;
        if record.is_correct() {
            self.correct += 1;
        }
    }

    pub fn finish(&self, training_documents: usize, at: DateTime<Local>) -> EvaluationSummary {
        let accuracy = if self.total == 0 {
            0.0
        } else {
            self.correct as f64 / self.total as f64 * 100.0
        };
        EvaluationSummary {
            generated_at: at.format("%Y-%m-%d %H:%M:%S").to_string(),
            training_documents,
            test_documents: self.total,
            correct: self.correct,
            incorrect: self.total - self.correct,
            accuracy_percent: accuracy,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationSummary {
    pub generated_at: String,
    pub training_documents: usize,
    pub test_documents: usize,
    pub correct: usize,
    pub incorrect: usize,
    pub accuracy_percent: f64,
}

impl EvaluationSummary {
    pub fn render(&self) -> String {
        format!(
            "Output Summary for run at {} \n\n\
             Number of Training Messages: {} \n\
             Number of Testing Messages: {} \n\
             Correct Predictions: {} \n\
             Incorrect Predictions: {} \n\
             Accuracy of classifier is: {:.2}%",
            self.generated_at,
            self.training_documents,
            self.test_documents,
            self.correct,
            self.incorrect,
            self.accuracy_percent,
        )
    }

    pub fn write(&self, output_dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(output_dir)?;
        let path = output_dir.join(SUMMARY_FILE);
        fs::write(&path, self.render())?;
        Ok(path)
    }
}
