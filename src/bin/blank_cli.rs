use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use blank_detector::audio::{AudioSource, WavFileSource};
use blank_detector::config::AppConfig;
use blank_detector::model::{load_examples, ModelEvaluator, ModelTrainer};
use blank_detector::{BlankDetector, ClassifierFacade, FeatureExtractor};
use clap::{Parser, Subcommand};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(
    name = "blank_cli",
    about = "Detect and classify blanks (silences) in audio recordings"
)]
struct Cli {
    /// JSON config file (defaults to config/blank_detector.json, then built-in defaults)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Override the trained model artifact location
    #[arg(long, global = true)]
    model: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Detect and classify every blank in a WAV file
    Detect {
        audio: PathBuf,
        /// Exit with code 2 when an abnormal blank is found
        #[arg(long)]
        fail_on_alert: bool,
    },
    /// Level analysis plus classified blanks for a WAV file
    Analyze { audio: PathBuf },
    /// Classify a single interval of a WAV file
    Classify {
        audio: PathBuf,
        #[arg(long)]
        start: f64,
        #[arg(long)]
        end: f64,
    },
    /// Train a model from labelled examples and write the artifact
    Train {
        /// JSON array of {audio_ref, start_time, end_time, label}
        #[arg(long)]
        examples: PathBuf,
        /// Directory audio_ref paths are relative to (defaults to the examples file's directory)
        #[arg(long)]
        audio_root: Option<PathBuf>,
    },
    /// Measure classification accuracy against labelled examples
    Evaluate {
        #[arg(long)]
        examples: PathBuf,
        #[arg(long)]
        audio_root: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from_file(path),
        None => AppConfig::load(),
    };
    if let Some(model) = cli.model {
        config.classifier.model_path = model;
    }
    let extractor = Arc::new(FeatureExtractor::new());

    match cli.command {
        Commands::Detect {
            audio,
            fail_on_alert,
        } => run_detect(&config, extractor, &audio, fail_on_alert),
        Commands::Analyze { audio } => run_analyze(&config, extractor, &audio),
        Commands::Classify { audio, start, end } => {
            run_classify(&config, extractor, &audio, start, end)
        }
        Commands::Train {
            examples,
            audio_root,
        } => run_train(&config, extractor, &examples, audio_root),
        Commands::Evaluate {
            examples,
            audio_root,
        } => run_evaluate(&config, extractor, &examples, audio_root),
    }
}

fn build_detector(config: &AppConfig, extractor: Arc<FeatureExtractor>) -> BlankDetector {
    let facade = config.classifier.build_facade(extractor);
    BlankDetector::new(&config.segmentation, Arc::new(facade))
}

fn run_detect(
    config: &AppConfig,
    extractor: Arc<FeatureExtractor>,
    audio: &Path,
    fail_on_alert: bool,
) -> Result<ExitCode> {
    let signal = WavFileSource::new().load(&audio.to_string_lossy())?;
    let silences = build_detector(config, extractor)
        .detect(&signal)
        .with_context(|| format!("detecting blanks in {}", audio.display()))?;
    emit(&silences)?;

    if fail_on_alert && silences.iter().any(|s| s.alert_needed()) {
        return Ok(ExitCode::from(2));
    }
    Ok(ExitCode::from(0))
}

fn run_analyze(config: &AppConfig, extractor: Arc<FeatureExtractor>, audio: &Path) -> Result<ExitCode> {
    let signal = WavFileSource::new().load(&audio.to_string_lossy())?;
    let report = build_detector(config, extractor)
        .report(&signal)
        .with_context(|| format!("analyzing {}", audio.display()))?;
    emit(&report)?;
    Ok(ExitCode::from(0))
}

fn run_classify(
    config: &AppConfig,
    extractor: Arc<FeatureExtractor>,
    audio: &Path,
    start: f64,
    end: f64,
) -> Result<ExitCode> {
    let facade = config.classifier.build_facade(extractor);
    let result = facade.classify_ref(&WavFileSource::new(), &audio.to_string_lossy(), start, end)?;
    emit(&result)?;
    Ok(ExitCode::from(0))
}

fn audio_source(examples: &Path, audio_root: Option<PathBuf>) -> Arc<dyn AudioSource> {
    let root = audio_root.unwrap_or_else(|| {
        examples
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default()
    });
    Arc::new(WavFileSource::with_root(root))
}

#[derive(Serialize)]
struct TrainingSummary<'a> {
    model_path: &'a Path,
    samples: usize,
    skipped: usize,
    training_accuracy: f64,
}

fn run_train(
    config: &AppConfig,
    extractor: Arc<FeatureExtractor>,
    examples_path: &Path,
    audio_root: Option<PathBuf>,
) -> Result<ExitCode> {
    let examples = load_examples(examples_path)?;
    let trainer = ModelTrainer::new(
        audio_source(examples_path, audio_root),
        extractor,
        config.training,
    )
    .with_context_secs(config.classifier.context_seconds);

    let outcome = trainer
        .train_and_persist(&examples, &config.classifier.model_path)
        .context("training blank classifier")?;

    emit(&TrainingSummary {
        model_path: &config.classifier.model_path,
        samples: outcome.samples,
        skipped: outcome.skipped.len(),
        training_accuracy: outcome.training_accuracy,
    })?;
    Ok(ExitCode::from(0))
}

fn run_evaluate(
    config: &AppConfig,
    extractor: Arc<FeatureExtractor>,
    examples_path: &Path,
    audio_root: Option<PathBuf>,
) -> Result<ExitCode> {
    let examples = load_examples(examples_path)?;
    let facade: ClassifierFacade = config.classifier.build_facade(extractor);
    let evaluator = ModelEvaluator::new(audio_source(examples_path, audio_root), Arc::new(facade));
    emit(&evaluator.evaluate(&examples))?;
    Ok(ExitCode::from(0))
}

fn emit<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
