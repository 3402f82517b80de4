// File: src/corpus.rs
use crate::core::types::{CategoryId, CategorySet};
use crate::error::{ClassifierError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// File name within its category directory.
    pub id: String,
    pub text: String,
    pub label: CategoryId,
}

/// Training and evaluation partitions read from a labeled directory tree:
/// one sub-directory per category, one file per document.
#[derive(Debug, Clone)]
pub struct Corpus {
    pub categories: CategorySet,
    pub training: Vec<Document>,
    pub evaluation: Vec<Document>,
}

impl Corpus {
    /// Categories are the sorted sub-directory names. Inside each, files are
    /// sorted by name and the first `floor(n * train_fraction)` go to training.
    pub fn load(root: &Path, train_fraction: f64) -> Result<Self> {
        if !(train_fraction > 0.0 && train_fraction < 1.0) {
            return Err(ClassifierError::InvalidConfig(format!(
                "train_fraction must be in (0, 1), got {train_fraction}"
            )));
        }

        let (category_dirs, _) = sorted_entries(root, |p| p.is_dir())?;
        let names = category_dirs
            .iter()
            .map(|p| file_name(p))
            .collect::<Result<Vec<_>>>()?;
        let categories = CategorySet::new(names)?;

        let mut training = Vec::new();
        let mut evaluation = Vec::new();
        for (label, dir) in category_dirs.iter().enumerate() {
            let (files, _) = sorted_entries(dir, |p| p.is_file())?;
            let split = (files.len() as f64 * train_fraction).floor() as usize;
            debug!(
                category = categories.name(label).unwrap_or_default(),
                files = files.len(),
                split,
                "reading category"
            );
            for (i, path) in files.iter().enumerate() {
                let document = Document { id: file_name(path)?, text: read_latin1(path)?, label };
                if i < split {
                    training.push(document);
                } else {
                    evaluation.push(document);
                }
            }
        }

        info!(
            categories = categories.len(),
            training = training.len(),
            evaluation = evaluation.len(),
            "corpus loaded"
        );
        Ok(Self { categories, training, evaluation })
    }

    pub fn training_texts(&self) -> Vec<&str> {
        self.training.iter().map(|d| d.text.as_str()).collect()
    }

    pub fn training_labels(&self) -> Vec<CategoryId> {
        self.training.iter().map(|d| d.label).collect()
    }
}

/// Every byte is one Latin-1 code point, so decoding cannot fail.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

fn read_latin1(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| corpus_error(path, e.to_string()))?;
    Ok(decode_latin1(&bytes))
}

/// Entries of `dir` that pass `keep`, sorted, plus the ones that were skipped.
fn sorted_entries(
    dir: &Path,
    keep: impl Fn(&Path) -> bool,
) -> Result<(Vec<PathBuf>, Vec<PathBuf>)> {
    let entries = fs::read_dir(dir).map_err(|e| corpus_error(dir, e.to_string()))?;
    let mut paths = Vec::new();
    let mut skipped = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| corpus_error(dir, e.to_string()))?.path();
        if keep(&path) {
            paths.push(path);
        } else {
            warn!(path = %path.display(), "skipping corpus entry");
            skipped.push(path);
        }
    }
    paths.sort();
    skipped.sort();
    Ok((paths, skipped))
}

fn file_name(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| corpus_error(path, "file name is not valid UTF-8".into()))
}

fn corpus_error(path: &Path, reason: String) -> ClassifierError {
    ClassifierError::Corpus { path: path.to_path_buf(), reason }
}
