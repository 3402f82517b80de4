use bayes_core::core::model::TrainedModel;
use bayes_core::corpus::Corpus;
use bayes_core::persistence::{export_vocabulary, export_word_counts, PredictionWriter};
use bayes_core::report::{Evaluation, PredictionRecord};
use bayes_core::{ClassifierConfig, ClassifierEngine, ClassifierError, Result};
use clap::{Args, Parser, Subcommand};
use crossterm::cursor::MoveToColumn;
use crossterm::style::{Print, PrintStyledContent, Stylize};
use crossterm::terminal::{Clear, ClearType};
use crossterm::execute;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "nb_classify", version, about = "Multinomial Naive Bayes text classifier")]
struct Cli {
    /// JSON config file; flags override its values
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Train on the training split, predict the evaluation split, write all reports
    Run(Overrides),
    /// Train on the training split and save a model snapshot
    Train(Overrides),
    /// Classify one document with a saved model
    Classify {
        /// Model snapshot written by `train` or `run`
        #[arg(short, long)]
        model: PathBuf,
        #[arg(short, long, conflicts_with = "file", required_unless_present = "file")]
        text: Option<String>,
        /// Read the document from a file (Latin-1)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

#[derive(Args)]
struct Overrides {
    #[arg(long)]
    corpus: Option<PathBuf>,
    #[arg(long)]
    output: Option<PathBuf>,
    #[arg(long)]
    train_fraction: Option<f64>,
    #[arg(long)]
    workers: Option<usize>,
    #[arg(long)]
    model: Option<PathBuf>,
}

impl Overrides {
    fn apply(self, mut config: ClassifierConfig) -> Result<ClassifierConfig> {
        if let Some(v) = self.corpus {
            config.corpus_dir = v;
        }
        if let Some(v) = self.output {
            config.output_dir = v;
        }
        if let Some(v) = self.train_fraction {
            config.train_fraction = v;
        }
        if let Some(v) = self.workers {
            config.workers = v;
        }
        if self.model.is_some() {
            config.model_path = self.model;
        }
        config.validate()?;
        Ok(config)
    }
}

#[derive(Serialize)]
struct ClassifyOutput<'a> {
    category: &'a str,
    scores: BTreeMap<&'a str, f64>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let _ = execute!(
                io::stderr(),
                PrintStyledContent("error: ".red().bold()),
                Print(format!("{e}\n"))
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let base = match &cli.config {
        Some(path) => ClassifierConfig::from_file(path)?,
        None => ClassifierConfig::default(),
    };

    match cli.command {
        Command::Run(overrides) => evaluate(overrides.apply(base)?),
        Command::Train(overrides) => train_only(overrides.apply(base)?),
        Command::Classify { model, text, file } => {
            let text = match (text, file) {
                (Some(text), _) => text,
                (None, Some(file)) => bayes_core::corpus::decode_latin1(&fs::read(file)?),
                (None, None) => String::new(),
            };
            classify(model, &text)
        }
    }
}

fn train_only(config: ClassifierConfig) -> Result<()> {
    let model_path = config.model_path.clone().ok_or_else(|| {
        ClassifierError::InvalidConfig("train needs --model or model_path".into())
    })?;

    info!(corpus = %config.corpus_dir.display(), "reading messages");
    let corpus = Corpus::load(&config.corpus_dir, config.train_fraction)?;

    let mut engine = ClassifierEngine::new()
        .with_workers(config.workers)
        .with_model_path(model_path);
    engine.train(&corpus.categories, &corpus.training_texts(), &corpus.training_labels())?;
    engine.save_model()
}

fn evaluate(config: ClassifierConfig) -> Result<()> {
    info!(corpus = %config.corpus_dir.display(), "reading messages");
    let corpus = Corpus::load(&config.corpus_dir, config.train_fraction)?;

    let mut engine = ClassifierEngine::new().with_workers(config.workers);
    if let Some(path) = &config.model_path {
        engine = engine.with_model_path(path);
    }
    let model = engine.train(&corpus.categories, &corpus.training_texts(), &corpus.training_labels())?;

    export_vocabulary(model, &config.output_dir)?;
    export_word_counts(model, &config.output_dir)?;

    info!(documents = corpus.evaluation.len(), "predicting message categories");
    let evaluation = predict_all(model, &corpus, &config)?;

    let summary = evaluation.finish(corpus.training.len(), chrono::Local::now());
    summary.write(&config.output_dir)?;
    engine.save_model()?;

    let mut stdout = io::stdout();
    execute!(
        stdout,
        Print(format!(
            "Correct Predictions: {} , Incorrect Predictions: {}\n",
            summary.correct, summary.incorrect
        )),
        Print("Accuracy of classifier is: "),
        PrintStyledContent(format!("{:.2}%", summary.accuracy_percent).green().bold()),
        Print("\n")
    )?;
    Ok(())
}

fn predict_all(model: &TrainedModel, corpus: &Corpus, config: &ClassifierConfig) -> Result<Evaluation> {
    let categories = model.categories();
    let mut writer = PredictionWriter::create(&config.output_dir, categories.iter().map(|(_, n)| n))?;
    let mut evaluation = Evaluation::default();
    let mut stderr = io::stderr();
    let total = corpus.evaluation.len();

    for (i, document) in corpus.evaluation.iter().enumerate() {
        execute!(
            stderr,
            MoveToColumn(0),
            Clear(ClearType::CurrentLine),
            Print(format!("Currently predicting message {}/{}...", i + 1, total))
        )?;

        let actual = categories.name(document.label).unwrap_or_default();
        let record = PredictionRecord::new(model, document.id.as_str(), model.predict(&document.text), actual);
        writer.write(&record)?;
        evaluation.record(&record);
    }
    writeln!(stderr)?;

    let path = writer.finish()?;
    info!(path = %path.display(), "prediction results written");
    Ok(evaluation)
}

fn classify(model_path: PathBuf, text: &str) -> Result<()> {
    let engine = ClassifierEngine::from_file(&model_path)?;
    let model = engine.model()?;
    let prediction = engine.predict(text)?;

    let categories = model.categories();
    let output = ClassifyOutput {
        category: categories.name(prediction.category).unwrap_or_default(),
        scores: categories
            .iter()
            .map(|(id, name)| (name, prediction.scores[id]))
            .collect(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
