use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use std::path::PathBuf;
use std::process::ExitCode;
use subtran::config::{Config, TargetLanguage};
use subtran::detect::WhatlangDetector;
use subtran::interactive::run_interactive_wizard;
use subtran::pipeline::{derive_output_path, print_summary, translate_file, TranslationJob};
use subtran::progress::BarProgress;
use subtran::translate::GoogleTranslator;
use subtran::SubtranError;
use tracing::info;

#[derive(Parser)]
#[command(name = "subtran")]
#[command(version, about = "Machine-translate SRT subtitles")]
#[command(long_about = "Translate the dialogue of an SRT subtitle file, keeping cue numbers, timings and layout intact.")]
struct Cli {
    /// Input SRT file (omit to choose interactively)
    input: Option<PathBuf>,

    /// Output subtitle file (defaults to <input>.<lang>.srt)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Destination language: en, fa, de
    #[arg(short, long)]
    to: Option<TargetLanguage>,

    /// Source language code; detected from the dialogue when omitted
    #[arg(short, long)]
    source: Option<String>,

    /// Append-only log of translation attempts
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Choose files and language with prompts
    #[arg(short, long)]
    interactive: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn build_job(cli: &Cli, config: &Config, input: PathBuf) -> Result<TranslationJob> {
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    let target = cli.to.unwrap_or(config.target_language);
    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| derive_output_path(&input, target));

    Ok(TranslationJob {
        input,
        output,
        target,
        source: cli.source.clone().or_else(|| config.source_language.clone()),
    })
}

/// The single line shown when a run fails.
fn failure_message(error: &SubtranError) -> String {
    format!("An error occurred: {}", error)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Load and validate configuration
    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(ref path) = cli.log_file {
        config.log_file = path.clone();
    }
    config.validate().context("Configuration validation failed")?;

    subtran::logging::init(cli.verbose, &config.log_file)
        .with_context(|| format!("Failed to open log file {}", config.log_file.display()))?;

    let job = match cli.input.clone() {
        Some(input) if !cli.interactive => build_job(&cli, &config, input)?,
        _ => {
            let result = run_interactive_wizard(config.clone())?;
            config = result.config;
            result.job
        }
    };

    info!("Input:    {}", job.input.display());
    info!("Output:   {}", job.output.display());
    info!("Language: {} ({})", job.target.code(), job.target.name());

    let translator = GoogleTranslator::new().with_base_url(config.service_url.clone());
    let detector = WhatlangDetector::new();
    let progress = BarProgress::new();

    match translate_file(&job, &translator, &detector, &config.retry_policy(), &progress).await {
        Ok(result) => {
            print_summary(&result);
            println!(
                "{} Translation completed successfully and saved to {}",
                style("✓").green(),
                result.output_path.display()
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("{} {}", style("✗").red(), failure_message(&e));
            Ok(ExitCode::FAILURE)
        }
    }
}
