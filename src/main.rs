use clap::Parser;
use scan2text::{BatchProcessor, Config, Corrections, OcrSettings};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "scan2text")]
#[command(about = "Batch OCR of scanned document images into text files")]
#[command(version)]
pub struct Args {
    /// Folder with the images to recognize
    #[arg(long, default_value = "img")]
    pub input: PathBuf,

    /// Folder for the recognized text files
    #[arg(long, default_value = "txt")]
    pub output: PathBuf,

    /// Folder for preprocessed debug snapshots
    #[arg(long, default_value = "debug")]
    pub debug_dir: PathBuf,

    /// Recognition languages, joined with '+'
    #[arg(long, default_value = "ukr+rus+eng")]
    pub languages: String,

    /// Tesseract page segmentation mode
    #[arg(long, default_value = "4")]
    pub psm: u8,

    /// Path to tessdata directory (downloaded to the cache dir if not set)
    #[arg(long, env = "TESSDATA_PREFIX")]
    pub tessdata_path: Option<PathBuf>,

    /// JSON file with [{"from": ..., "to": ...}] corrections replacing the built-in ones
    #[arg(long)]
    pub corrections: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            input_dir: args.input,
            output_dir: args.output,
            debug_dir: args.debug_dir,
            ocr: OcrSettings {
                page_seg_mode: args.psm,
                languages: OcrSettings::parse_languages(&args.languages),
                ..OcrSettings::default()
            },
            tessdata_path: args.tessdata_path,
            corrections_path: args.corrections,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| args.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from(args);

    tracing::info!("Starting scan2text v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Reading {:?}, writing text to {:?} and snapshots to {:?}",
        config.input_dir,
        config.output_dir,
        config.debug_dir
    );

    let corrections = match &config.corrections_path {
        Some(path) => Corrections::from_json_file(path)?,
        None => Corrections::default(),
    };
    tracing::info!("Loaded {} text corrections", corrections.len());

    let engine = scan2text::engines::create(&config)?;
    tracing::info!(
        "Using {} engine ({}), languages: {}",
        engine.name(),
        engine.description(),
        engine.supported_languages().join("+")
    );

    let processor = BatchProcessor::new(config, engine, corrections);
    let report = processor.run()?;

    // Partial failure still exits 0; each failure was already logged
    if report.failed() > 0 {
        tracing::warn!("{} file(s) failed", report.failed());
    }

    Ok(())
}
