use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use cough_triage::config::{AppConfig, FeatureSource};
use cough_triage::{decode_wav_file, TriagePipeline};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "cough_cli",
    about = "Segment cough recordings and prepare classifier-ready MFCC tensors"
)]
struct Cli {
    /// JSON configuration file (defaults are used when omitted or unreadable)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Detect peaks and extract fixed-length segments
    Segment {
        #[arg(long)]
        input: PathBuf,
        /// Directory receiving segment_<n>.wav files
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Compute normalized MFCC tensors
    Features {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, value_enum)]
        source: Option<SourceArg>,
        /// Include tensor values in the JSON output
        #[arg(long)]
        dump: bool,
    },
    /// Run segmentation and feature extraction, emitting the full report
    Analyze {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        output_dir: Option<PathBuf>,
        /// Write the JSON report here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the effective configuration
    ShowConfig,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SourceArg {
    Original,
    Segments,
}

impl From<SourceArg> for FeatureSource {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Original => FeatureSource::Original,
            SourceArg::Segments => FeatureSource::Segments,
        }
    }
}

fn main() -> ExitCode {
    init_logging();
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = cli
        .config
        .as_ref()
        .map(AppConfig::load_from_file)
        .unwrap_or_default();
    tracing::debug!(config_path = ?cli.config, command = ?cli.command, "cough_cli starting");

    match cli.command {
        Commands::Segment { input, output_dir } => run_segment(config, input, output_dir),
        Commands::Features {
            input,
            source,
            dump,
        } => run_features(config, input, source, dump),
        Commands::Analyze {
            input,
            output_dir,
            output,
        } => run_analyze(config, input, output_dir, output),
        Commands::ShowConfig => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(ExitCode::from(0))
        }
    }
}

fn run_segment(config: AppConfig, input: PathBuf, output_dir: Option<PathBuf>) -> Result<ExitCode> {
    let pipeline = TriagePipeline::new(config)?;
    let waveform = decode_wav_file(&input)?;
    let outcome = pipeline.segmenter().denoise(&waveform, output_dir.as_deref());

    let report = SegmentReportPayload {
        input: &input,
        sample_rate: outcome.sample_rate,
        threshold: outcome.threshold,
        min_distance: outcome.min_distance,
        segment_count: outcome.segments.len(),
        peaks: outcome.peaks(),
        persisted: &outcome.persisted,
        write_errors: outcome.write_errors.iter().map(|err| err.to_string()).collect(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(ExitCode::from(0))
}

fn run_features(
    mut config: AppConfig,
    input: PathBuf,
    source: Option<SourceArg>,
    dump: bool,
) -> Result<ExitCode> {
    if let Some(source) = source {
        config.features.source = source.into();
    }
    let pipeline = TriagePipeline::new(config)?;
    let waveform = decode_wav_file(&input)?;
    let report = pipeline
        .process(&waveform, None)
        .with_context(|| format!("extracting features from {}", input.display()))?;

    let summary = report.summary(dump);
    let payload = FeaturesPayload {
        input: &input,
        source: summary.source,
        tensor_count: summary.tensors.len(),
        tensors: &summary.tensors,
    };
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(ExitCode::from(0))
}

fn run_analyze(
    config: AppConfig,
    input: PathBuf,
    output_dir: Option<PathBuf>,
    output: Option<PathBuf>,
) -> Result<ExitCode> {
    let pipeline = TriagePipeline::new(config)?;
    let waveform = decode_wav_file(&input)?;
    let report = pipeline
        .process(&waveform, output_dir.as_deref())
        .with_context(|| format!("analyzing {}", input.display()))?;

    let json = serde_json::to_string_pretty(&report.summary(false))?;
    if let Some(path) = output {
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    } else {
        println!("{json}");
    }
    Ok(ExitCode::from(0))
}

#[derive(Serialize)]
struct SegmentReportPayload<'a> {
    input: &'a PathBuf,
    sample_rate: u32,
    threshold: f32,
    min_distance: usize,
    segment_count: usize,
    peaks: Vec<usize>,
    #[serde(skip_serializing_if = "slice_empty")]
    persisted: &'a [PathBuf],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    write_errors: Vec<String>,
}

#[derive(Serialize)]
struct FeaturesPayload<'a> {
    input: &'a PathBuf,
    source: FeatureSource,
    tensor_count: usize,
    tensors: &'a [cough_triage::pipeline::TensorSummary],
}

fn slice_empty(paths: &&[PathBuf]) -> bool {
    paths.is_empty()
}
