//! Integration tests for subtran
//!
//! These tests run the whole read → translate → write flow against scripted
//! translators, without touching the network.

use async_trait::async_trait;
use std::collections::HashMap;
use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use subtran::config::TargetLanguage;
use subtran::detect::LanguageDetector;
use subtran::pipeline::{translate_document, translate_file, TranslationJob};
use subtran::progress::{NoProgress, ProgressSink, ProgressState};
use subtran::subtitle::{classify, LineKind, SubtitleDocument};
use subtran::translate::{RetryPolicy, TranslationRequest, Translator};
use subtran::{Result, SubtranError};

const SAMPLE: &str = "1\n00:00:01,000 --> 00:00:02,000\nHello\n\n";

const MULTI_CUE: &str = "1\n\
00:00:01,000 --> 00:00:02,500\n\
Good morning.\n\
How are you?\n\
\n\
2\n\
00:00:03,000 --> 00:00:05,000\n\
I'm fine, thanks.\n\
\n";

// ============================================================================
// Test doubles
// ============================================================================

/// Answers from a fixed dictionary, failing for unknown lines.
struct Dictionary {
    entries: HashMap<&'static str, &'static str>,
    requests: Mutex<Vec<TranslationRequest>>,
}

impl Dictionary {
    fn new(entries: &[(&'static str, &'static str)]) -> Self {
        Self {
            entries: entries.iter().copied().collect(),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn requests(&self) -> Vec<TranslationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Translator for Dictionary {
    async fn translate(&self, request: &TranslationRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request.clone());
        self.entries
            .get(request.text.as_str())
            .map(|t| t.to_string())
            .ok_or_else(|| SubtranError::Translation(format!("no entry for {}", request.text)))
    }

    fn name(&self) -> &'static str {
        "dictionary"
    }
}

/// Always fails.
#[derive(Default)]
struct Broken {
    calls: AtomicUsize,
}

#[async_trait]
impl Translator for Broken {
    async fn translate(&self, _request: &TranslationRequest) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(SubtranError::Api("connection reset".to_string()))
    }

    fn name(&self) -> &'static str {
        "broken"
    }
}

/// Returns a fixed code and counts calls.
struct FixedDetector {
    code: Option<&'static str>,
    calls: AtomicUsize,
    seen: Mutex<Vec<String>>,
}

impl FixedDetector {
    fn new(code: Option<&'static str>) -> Self {
        Self {
            code,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }
}

impl LanguageDetector for FixedDetector {
    fn detect(&self, text: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(text.to_string());
        self.code
            .map(str::to_string)
            .ok_or_else(|| SubtranError::Detection("no features in text".to_string()))
    }
}

/// Records every report in order.
#[derive(Default)]
struct Recorder {
    reports: Mutex<Vec<(usize, usize)>>,
}

impl ProgressSink for Recorder {
    fn report(&self, current: usize, total: usize) {
        self.reports.lock().unwrap().push((current, total));
    }
}

fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        delay: Duration::ZERO,
        attempt_timeout: Duration::from_secs(10),
    }
}

fn job(dir: &tempfile::TempDir, input: &str, target: TargetLanguage) -> TranslationJob {
    let input_path = dir.path().join("movie.srt");
    fs::write(&input_path, input).unwrap();
    TranslationJob {
        input: input_path,
        output: dir.path().join("movie.out.srt"),
        target,
        source: None,
    }
}

// ============================================================================
// File scenarios
// ============================================================================

mod file_tests {
    use super::*;

    #[tokio::test]
    async fn test_translates_dialogue_to_farsi() {
        let dir = tempfile::tempdir().unwrap();
        let job = job(&dir, SAMPLE, TargetLanguage::Farsi);
        let translator = Dictionary::new(&[("Hello", "سلام")]);
        let detector = FixedDetector::new(Some("en"));

        let result = translate_file(&job, &translator, &detector, &fast_policy(), &NoProgress)
            .await
            .unwrap();

        let output = fs::read_to_string(&job.output).unwrap();
        assert_eq!(output, "1\n00:00:01,000 --> 00:00:02,000\nسلام\n\n");
        assert_eq!(result.stats.translated, 1);
        assert_eq!(result.stats.fallbacks, 0);
        assert_eq!(result.stats.source_language, "en");

        let requests = translator.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].source_lang, "en");
        assert_eq!(requests[0].dest_lang, "fa");
        assert_eq!(requests[0].timeout, Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failing_service_keeps_input_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let job = job(&dir, SAMPLE, TargetLanguage::Farsi);
        let translator = Broken::default();
        let detector = FixedDetector::new(Some("en"));

        let result = translate_file(
            &job,
            &translator,
            &detector,
            &RetryPolicy::default(),
            &NoProgress,
        )
        .await
        .unwrap();

        assert_eq!(fs::read_to_string(&job.output).unwrap(), SAMPLE);
        assert_eq!(translator.calls.load(Ordering::SeqCst), 3);
        assert_eq!(result.stats.fallbacks, 1);
        assert_eq!(result.stats.attempts, 3);
    }

    #[tokio::test]
    async fn test_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let job = job(&dir, "", TargetLanguage::German);
        let translator = Broken::default();
        let detector = FixedDetector::new(Some("en"));
        let progress = Recorder::default();

        let result = translate_file(&job, &translator, &detector, &fast_policy(), &progress)
            .await
            .unwrap();

        assert_eq!(fs::read_to_string(&job.output).unwrap(), "");
        assert_eq!(translator.calls.load(Ordering::SeqCst), 0);
        assert!(progress.reports.lock().unwrap().is_empty());
        assert_eq!(result.stats.lines, 0);
    }

    #[tokio::test]
    async fn test_overwrites_existing_output() {
        let dir = tempfile::tempdir().unwrap();
        let job = job(&dir, SAMPLE, TargetLanguage::Farsi);
        fs::write(&job.output, "stale output from an earlier run\n").unwrap();
        let translator = Dictionary::new(&[("Hello", "سلام")]);

        translate_file(
            &job,
            &translator,
            &FixedDetector::new(Some("en")),
            &fast_policy(),
            &NoProgress,
        )
        .await
        .unwrap();

        assert!(fs::read_to_string(&job.output).unwrap().starts_with("1\n"));
    }

    #[tokio::test]
    async fn test_missing_input_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let job = TranslationJob {
            input: dir.path().join("missing.srt"),
            output: dir.path().join("out.srt"),
            target: TargetLanguage::Farsi,
            source: None,
        };

        let result = translate_file(
            &job,
            &Broken::default(),
            &FixedDetector::new(Some("en")),
            &fast_policy(),
            &NoProgress,
        )
        .await;

        assert!(matches!(result, Err(SubtranError::Io(_))));
        assert!(!job.output.exists());
    }

    #[tokio::test]
    async fn test_unwritable_output_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut job = job(&dir, SAMPLE, TargetLanguage::Farsi);
        job.output = dir.path().join("no-such-dir").join("out.srt");

        let result = translate_file(
            &job,
            &Dictionary::new(&[("Hello", "سلام")]),
            &FixedDetector::new(Some("en")),
            &fast_policy(),
            &NoProgress,
        )
        .await;

        let err = result.unwrap_err();
        assert!(err.is_fatal());
    }
}

// ============================================================================
// Document-level properties
// ============================================================================

mod document_tests {
    use super::*;

    #[tokio::test]
    async fn test_structure_lines_untouched_and_count_preserved() {
        let mut document = SubtitleDocument::parse(MULTI_CUE);
        let original = document.clone();
        let translator = Dictionary::new(&[
            ("Good morning.", "Guten Morgen."),
            ("How are you?", "Wie geht es dir?"),
            ("I'm fine, thanks.", "Mir geht's gut, danke."),
        ]);

        let stats = translate_document(
            &mut document,
            "de",
            Some("en"),
            &translator,
            &FixedDetector::new(None),
            &fast_policy(),
            &NoProgress,
        )
        .await;

        assert_eq!(document.len(), original.len());
        for (before, after) in original.lines().iter().zip(document.lines()) {
            if classify(before.raw()) == LineKind::Dialogue {
                assert_ne!(before.raw(), after.raw());
                assert_eq!(before.terminator(), after.terminator());
            } else {
                assert_eq!(before.raw(), after.raw());
            }
        }
        assert_eq!(stats.translated, 3);
        assert_eq!(stats.dialogue_lines, 3);
        assert_eq!(stats.attempts, 3);
    }

    #[tokio::test]
    async fn test_partial_failure_falls_back_per_line() {
        let mut document = SubtitleDocument::parse(MULTI_CUE);
        let translator = Dictionary::new(&[("Good morning.", "Guten Morgen.")]);

        let stats = translate_document(
            &mut document,
            "de",
            Some("en"),
            &translator,
            &FixedDetector::new(None),
            &fast_policy(),
            &NoProgress,
        )
        .await;

        let lines: Vec<&str> = document.lines().iter().map(|l| l.raw()).collect();
        assert_eq!(lines[2], "Guten Morgen.\n");
        assert_eq!(lines[3], "How are you?\n");
        assert_eq!(lines[7], "I'm fine, thanks.\n");
        assert_eq!(stats.translated, 1);
        assert_eq!(stats.fallbacks, 2);
        assert_eq!(stats.attempts, 1 + 3 + 3);
    }

    #[tokio::test]
    async fn test_persian_cue_number_is_not_translated() {
        let input = "۱\n00:00:01,000 --> 00:00:02,000\nHello\n\n";
        let mut document = SubtitleDocument::parse(input);
        let translator = Dictionary::new(&[("Hello", "سلام")]);

        translate_document(
            &mut document,
            "fa",
            Some("en"),
            &translator,
            &FixedDetector::new(None),
            &fast_policy(),
            &NoProgress,
        )
        .await;

        assert_eq!(translator.requests().len(), 1);
        assert_eq!(
            document.to_text(),
            "۱\n00:00:01,000 --> 00:00:02,000\nسلام\n\n"
        );
    }

    #[tokio::test]
    async fn test_crlf_terminators_preserved() {
        let mut document =
            SubtitleDocument::parse("1\r\n00:00:01,000 --> 00:00:02,000\r\nHello\r\n\r\n");
        let translator = Dictionary::new(&[("Hello", "Hallo")]);

        translate_document(
            &mut document,
            "de",
            Some("en"),
            &translator,
            &FixedDetector::new(None),
            &fast_policy(),
            &NoProgress,
        )
        .await;

        assert_eq!(
            document.to_text(),
            "1\r\n00:00:01,000 --> 00:00:02,000\r\nHallo\r\n\r\n"
        );
        assert_eq!(translator.requests()[0].text, "Hello");
    }

    #[tokio::test]
    async fn test_progress_reported_once_per_line() {
        let mut document = SubtitleDocument::parse(MULTI_CUE);
        let progress = Recorder::default();

        translate_document(
            &mut document,
            "de",
            Some("en"),
            &Broken::default(),
            &FixedDetector::new(None),
            &fast_policy(),
            &progress,
        )
        .await;

        let reports = progress.reports.lock().unwrap().clone();
        let total = document.len();
        let expected: Vec<(usize, usize)> = (1..=total).map(|i| (i, total)).collect();
        assert_eq!(reports, expected);
    }

    #[tokio::test]
    async fn test_progress_state_ends_at_total() {
        let mut document = SubtitleDocument::parse(SAMPLE);
        let state = ProgressState::new();

        translate_document(
            &mut document,
            "fa",
            Some("en"),
            &Dictionary::new(&[("Hello", "سلام")]),
            &FixedDetector::new(None),
            &fast_policy(),
            &state,
        )
        .await;

        assert_eq!(state.snapshot(), (4, 4));
        assert_eq!(state.label(), "Processing: 4/4 lines");
    }
}

// ============================================================================
// Source language detection
// ============================================================================

mod detection_tests {
    use super::*;

    #[tokio::test]
    async fn test_detector_runs_once_on_dialogue_only() {
        let mut document = SubtitleDocument::parse(MULTI_CUE);
        let detector = FixedDetector::new(Some("en"));

        translate_document(
            &mut document,
            "fa",
            None,
            &Dictionary::new(&[]),
            &detector,
            &fast_policy(),
            &NoProgress,
        )
        .await;

        assert_eq!(detector.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            detector.seen.lock().unwrap()[0],
            "Good morning. How are you? I'm fine, thanks."
        );
    }

    #[tokio::test]
    async fn test_detection_failure_defaults_to_english_and_notifies() {
        let mut document = SubtitleDocument::parse(SAMPLE);
        let translator = Dictionary::new(&[("Hello", "سلام")]);
        let state = ProgressState::new();

        let stats = translate_document(
            &mut document,
            "fa",
            None,
            &translator,
            &FixedDetector::new(None),
            &fast_policy(),
            &state,
        )
        .await;

        assert_eq!(stats.source_language, "en");
        assert_eq!(translator.requests()[0].source_lang, "en");
        assert_eq!(state.notices().len(), 1);
        assert!(state.notices()[0].contains("detection failed"));
        assert_eq!(stats.translated, 1);
    }

    #[tokio::test]
    async fn test_explicit_source_skips_detection() {
        let mut document = SubtitleDocument::parse(SAMPLE);
        let detector = FixedDetector::new(Some("fr"));
        let translator = Dictionary::new(&[("Hello", "Hallo")]);

        let stats = translate_document(
            &mut document,
            "de",
            Some("en"),
            &translator,
            &detector,
            &fast_policy(),
            &NoProgress,
        )
        .await;

        assert_eq!(detector.calls.load(Ordering::SeqCst), 0);
        assert_eq!(stats.source_language, "en");
    }

    #[tokio::test]
    async fn test_no_dialogue_still_detects_once_and_notifies() {
        let mut document = SubtitleDocument::parse("1\n00:00:01,000 --> 00:00:02,000\n\n");
        let detector = FixedDetector::new(None);
        let state = ProgressState::new();

        translate_document(
            &mut document,
            "de",
            None,
            &Broken::default(),
            &detector,
            &fast_policy(),
            &state,
        )
        .await;

        assert_eq!(detector.calls.load(Ordering::SeqCst), 1);
        assert_eq!(detector.seen.lock().unwrap()[0], "");
        assert_eq!(state.notices().len(), 1);
        assert_eq!(state.snapshot(), (3, 3));
    }

    #[tokio::test]
    async fn test_empty_document_detects_once_and_notifies() {
        let mut document = SubtitleDocument::parse("");
        let detector = FixedDetector::new(None);
        let translator = Broken::default();
        let state = ProgressState::new();

        let stats = translate_document(
            &mut document,
            "fa",
            None,
            &translator,
            &detector,
            &fast_policy(),
            &state,
        )
        .await;

        assert_eq!(detector.calls.load(Ordering::SeqCst), 1);
        assert_eq!(state.notices().len(), 1);
        assert_eq!(stats.source_language, "en");
        assert_eq!(translator.calls.load(Ordering::SeqCst), 0);
        assert_eq!(state.snapshot(), (0, 0));
    }
}
