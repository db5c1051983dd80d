use crate::config::TargetLanguage;
use crate::detect::{LanguageDetector, DEFAULT_LANGUAGE};
use crate::error::Result;
use crate::progress::ProgressSink;
use crate::subtitle::{read_subtitles, write_subtitles, LineKind, SubtitleDocument};
use crate::translate::{
    translate_with_retry, RetryPolicy, TranslationOutcome, TranslationRequest, Translator,
};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Everything a front end hands over to start a run.
#[derive(Debug, Clone)]
pub struct TranslationJob {
    pub input: PathBuf,
    pub output: PathBuf,
    pub target: TargetLanguage,
    /// Known source language; detected from the dialogue when `None`.
    pub source: Option<String>,
}

/// Statistics from one translation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineStats {
    /// Lines read, and written.
    pub lines: usize,
    pub dialogue_lines: usize,
    pub translated: usize,
    /// Dialogue lines kept as-is after every attempt failed.
    pub fallbacks: usize,
    /// Translation calls made across all lines.
    pub attempts: u32,
    pub source_language: String,
    pub elapsed: Duration,
}

/// Result of a completed run.
#[derive(Debug)]
pub struct PipelineResult {
    pub output_path: PathBuf,
    pub target: TargetLanguage,
    pub stats: PipelineStats,
}

/// Read `job.input`, translate its dialogue, and write `job.output`.
///
/// Only file errors fail the run. Lines that cannot be translated are kept
/// as they were.
pub async fn translate_file(
    job: &TranslationJob,
    translator: &dyn Translator,
    detector: &dyn LanguageDetector,
    policy: &RetryPolicy,
    progress: &dyn ProgressSink,
) -> Result<PipelineResult> {
    info!("Reading subtitles from {:?}", job.input);
    let mut document = read_subtitles(&job.input)?;

    let stats = translate_document(
        &mut document,
        job.target.code(),
        job.source.as_deref(),
        translator,
        detector,
        policy,
        progress,
    )
    .await;

    write_subtitles(&job.output, &document)?;
    info!("Wrote {} lines to {:?}", document.len(), job.output);

    Ok(PipelineResult {
        output_path: job.output.clone(),
        target: job.target,
        stats,
    })
}

/// Translate every dialogue line of `document` in place, in order.
///
/// Index, timing and blank lines are left untouched. `progress` hears
/// about every line, translated or not.
pub async fn translate_document(
    document: &mut SubtitleDocument,
    dest_lang: &str,
    source: Option<&str>,
    translator: &dyn Translator,
    detector: &dyn LanguageDetector,
    policy: &RetryPolicy,
    progress: &dyn ProgressSink,
) -> PipelineStats {
    let start_time = Instant::now();
    let total = document.len();
    let dialogue_lines = document.dialogue_count();

    let source_language = match source {
        Some(code) => code.to_string(),
        None => detect_source_language(detector, &document.dialogue_text(), progress),
    };

    info!(
        "Translating {} dialogue lines of {} from {} to {} using {}",
        dialogue_lines,
        total,
        source_language,
        dest_lang,
        translator.name()
    );

    let mut stats = PipelineStats {
        lines: total,
        dialogue_lines,
        source_language,
        ..PipelineStats::default()
    };

    for (idx, line) in document.lines_mut().iter_mut().enumerate() {
        if line.kind() == LineKind::Dialogue {
            let request = TranslationRequest {
                text: line.content().to_string(),
                source_lang: stats.source_language.clone(),
                dest_lang: dest_lang.to_string(),
                timeout: policy.attempt_timeout,
            };

            let outcome = translate_with_retry(translator, &request, policy).await;
            stats.attempts += outcome.attempts();

            match outcome {
                TranslationOutcome::Translated { text, .. } => {
                    line.replace_text(&text);
                    stats.translated += 1;
                }
                TranslationOutcome::Fallback { last_error, .. } => {
                    debug!("Keeping line {} untranslated: {}", idx + 1, last_error);
                    stats.fallbacks += 1;
                }
            }
        }

        progress.report(idx + 1, total);
    }

    progress.finish();
    stats.elapsed = start_time.elapsed();

    info!(
        "Translated {}/{} dialogue lines ({} kept original) in {:.2}s",
        stats.translated,
        stats.dialogue_lines,
        stats.fallbacks,
        stats.elapsed.as_secs_f64()
    );

    stats
}

/// Detect the source language, falling back to English on failure.
fn detect_source_language(
    detector: &dyn LanguageDetector,
    text: &str,
    progress: &dyn ProgressSink,
) -> String {
    match detector.detect(text) {
        Ok(code) => {
            info!("Detected source language: {}", code);
            code
        }
        Err(e) => {
            warn!("{}; assuming '{}'", e, DEFAULT_LANGUAGE);
            progress.notify_error(&e.to_string());
            DEFAULT_LANGUAGE.to_string()
        }
    }
}

/// Default output path: `movie.srt` becomes `movie.fa.srt`.
pub fn derive_output_path(input: &Path, target: TargetLanguage) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default();
    let extension = input
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "srt".to_string());
    let mut output = input.to_path_buf();
    output.set_file_name(format!(
        "{}.{}.{}",
        stem.to_string_lossy(),
        target.code(),
        extension
    ));
    output
}

/// Print a summary of the pipeline results.
pub fn print_summary(result: &PipelineResult) {
    println!();
    println!("═══════════════════════════════════════════════════════════════");
    println!("                    Subtitle Translation Complete               ");
    println!("═══════════════════════════════════════════════════════════════");
    println!();
    println!("  Output:     {}", result.output_path.display());
    println!(
        "  Languages:  {} -> {} ({})",
        result.stats.source_language,
        result.target.code(),
        result.target.name()
    );
    println!("  Lines:      {}", result.stats.lines);
    println!(
        "  Dialogue:   {} translated, {} kept original",
        result.stats.translated, result.stats.fallbacks
    );
    println!("  Requests:   {}", result.stats.attempts);
    println!(
        "  Time:       {:.2}s",
        result.stats.elapsed.as_secs_f64()
    );
    println!();
    println!("═══════════════════════════════════════════════════════════════");
}
