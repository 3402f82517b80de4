// File: src/persistence.rs
use crate::core::model::TrainedModel;
use crate::error::Result;
use crate::report::PredictionRecord;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub const VOCABULARY_FILE: &str = "GlobalVocabulary.csv";
pub const WORD_COUNT_DIR: &str = "Category_Word_Counts";
pub const PREDICTIONS_FILE: &str = "PredictionResults.csv";

/// Writes `model` to `path` atomically: a temp file in the same directory is
/// filled and then renamed over the target.
pub fn save_model(model: &TrainedModel, path: &Path) -> Result<()> {
    let parent_dir = parent_or_cwd(path);
    fs::create_dir_all(parent_dir)?;

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(temp_file.as_file());
        bincode::serialize_into(&mut writer, model)?;
        writer.flush()?;
    }
    temp_file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Reads and checks a snapshot. A missing file is `Io`, undecodable bytes are
/// `Bincode`, and a decoded but inconsistent model is `CorruptModel`.
pub fn load_model(path: &Path) -> Result<TrainedModel> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let model: TrainedModel = bincode::deserialize_from(reader)?;
    model.validate()?;
    Ok(model)
}

/// Writes the global vocabulary, one sorted term per row.
pub fn export_vocabulary(model: &TrainedModel, output_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(output_dir)?;
    let path = output_dir.join(VOCABULARY_FILE);
    let mut writer = csv::Writer::from_path(&path)?;
    writer.write_record(["_Global Vocabulary Words"])?;
    for term in model.frequencies().vocabulary() {
        writer.write_record([term])?;
    }
    writer.flush()?;
    Ok(path)
}

/// Writes one `<category>_WordCount.csv` per category.
pub fn export_word_counts(model: &TrainedModel, output_dir: &Path) -> Result<Vec<PathBuf>> {
    let dir = output_dir.join(WORD_COUNT_DIR);
    fs::create_dir_all(&dir)?;

    let mut written = Vec::with_capacity(model.categories().len());
    for (id, name) in model.categories().iter() {
        let path = dir.join(format!("{name}_WordCount.csv"));
        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(["Word", "Word Count"])?;
        for (term, count) in model.frequencies().sorted_table(id) {
            writer.write_record([term, count.to_string().as_str()])?;
        }
        writer.flush()?;
        written.push(path);
    }
    Ok(written)
}

/// Streams per-document prediction rows to `PredictionResults.csv`.
pub struct PredictionWriter {
    writer: csv::Writer<File>,
    path: PathBuf,
}

impl PredictionWriter {
    /// Creates (truncating) the results file and writes its header; one score
    /// column per category name, in category order.
    pub fn create<'a>(
        output_dir: &Path,
        category_names: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self> {
        fs::create_dir_all(output_dir)?;
        let path = output_dir.join(PREDICTIONS_FILE);
        let mut writer = csv::Writer::from_path(&path)?;

        let mut header = vec![
            "File Name".to_string(),
            "Predicted Category".to_string(),
            "Actual Category".to_string(),
            "Result".to_string(),
        ];
        header.extend(category_names.into_iter().map(|n| format!("{n} Probability")));
        writer.write_record(&header)?;
        Ok(Self { writer, path })
    }

    pub fn write(&mut self, record: &PredictionRecord) -> Result<()> {
        let mut row = vec![
            record.document_id.clone(),
            record.predicted.clone(),
            record.actual.clone(),
            record.outcome().to_string(),
        ];
        row.extend(record.scores.iter().map(f64::to_string));
        self.writer.write_record(&row)?;
        Ok(())
    }

    pub fn finish(mut self) -> Result<PathBuf> {
        self.writer.flush()?;
        Ok(self.path)
    }
}

fn parent_or_cwd(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::CategorySet;
    use crate::error::ClassifierError;
    use crate::learning::LearningEngine;

    fn model() -> TrainedModel {
        let cats = CategorySet::new(["sport", "weather"]).unwrap();
        let docs = ["the game was great", "great game tonight", "rain today", "great rain expected"];
        LearningEngine::new().train(&cats, &docs, &[0, 0, 1, 1]).unwrap()
    }

    #[test]
    fn snapshot_overwrites_atomically() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.bin");
        let model = model();

        fs::write(&path, b"stale").unwrap();
        save_model(&model, &path).unwrap();
        assert_eq!(load_model(&path).unwrap(), model);

        let leftovers = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn corrupt_snapshot_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.bin");
        fs::write(&path, [0xffu8; 3]).unwrap();
        assert!(load_model(&path).is_err());
    }

    #[test]
    fn inconsistent_snapshot_is_rejected_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.bin");
        let trained = model();
        let broken = TrainedModel::new(
            trained.categories().clone(),
            vec![-0.1],
            trained.document_counts().to_vec(),
            trained.frequencies().clone(),
        );
        save_model(&broken, &path).unwrap();

        let err = load_model(&path).unwrap_err();
        assert!(matches!(err, ClassifierError::CorruptModel(_)));
        assert!(!err.is_invalid_state());
    }

    #[test]
    fn missing_snapshot_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_model(&dir.path().join("typo.bin")),
            Err(ClassifierError::Io(_))
        ));
    }

    #[test]
    fn vocabulary_export_is_sorted_with_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = export_vocabulary(&model(), dir.path()).unwrap();
        let text = fs::read_to_string(path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec!["_Global Vocabulary Words", "expected", "game", "great", "rain", "today", "tonight"]
        );
    }

    #[test]
    fn word_counts_export_per_category() {
        let dir = tempfile::tempdir().unwrap();
        let paths = export_word_counts(&model(), dir.path()).unwrap();
        assert_eq!(paths.len(), 2);
        assert!(paths[0].ends_with("Category_Word_Counts/sport_WordCount.csv"));

        let text = fs::read_to_string(&paths[0]).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["Word,Word Count", "game,2", "great,2", "tonight,1"]);
    }

    #[test]
    fn prediction_rows_carry_every_score() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = PredictionWriter::create(dir.path(), ["sport", "weather"]).unwrap();
        writer
            .write(&PredictionRecord {
                document_id: "52550".into(),
                predicted: "sport".into(),
                actual: "weather".into(),
                scores: vec![-1.5, -2.25],
            })
            .unwrap();
        let path = writer.finish().unwrap();

        let text = fs::read_to_string(path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "File Name,Predicted Category,Actual Category,Result,sport Probability,weather Probability"
        );
        assert_eq!(lines[1], "52550,sport,weather,incorrect,-1.5,-2.25");
    }
}
