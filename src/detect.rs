//! Source-language identification over the dialogue of a subtitle file.

use crate::error::{Result, SubtranError};
use isolang::Language;
use tracing::debug;
use whatlang::Lang;

/// Code used when detection fails.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Minimum detector confidence below which the guess is treated as ambiguous.
const MIN_CONFIDENCE: f64 = 0.1;

pub trait LanguageDetector: Send + Sync {
    /// Guess the ISO 639-1 code of `text`.
    fn detect(&self, text: &str) -> Result<String>;
}

/// Trigram-based detector. Same input always yields the same answer.
#[derive(Debug, Clone)]
pub struct WhatlangDetector {
    min_confidence: f64,
}

impl Default for WhatlangDetector {
    fn default() -> Self {
        Self {
            min_confidence: MIN_CONFIDENCE,
        }
    }
}

impl WhatlangDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min_confidence(mut self, min_confidence: f64) -> Self {
        self.min_confidence = min_confidence;
        self
    }
}

impl LanguageDetector for WhatlangDetector {
    fn detect(&self, text: &str) -> Result<String> {
        if text.trim().is_empty() {
            return Err(SubtranError::Detection("no text to analyse".to_string()));
        }

        let info = whatlang::detect(text)
            .ok_or_else(|| SubtranError::Detection("no language features found".to_string()))?;

        debug!(
            "Detected {} (confidence {:.2}, reliable: {})",
            info.lang().code(),
            info.confidence(),
            info.is_reliable()
        );

        if info.confidence() < self.min_confidence {
            return Err(SubtranError::Detection(format!(
                "ambiguous input, best guess {} with confidence {:.2}",
                info.lang().code(),
                info.confidence()
            )));
        }

        iso639_1_code(info.lang())
            .map(str::to_string)
            .ok_or_else(|| {
                SubtranError::Detection(format!(
                    "no two-letter code for {}",
                    info.lang().code()
                ))
            })
    }
}

/// Map a detected language to the two-letter code translation services expect.
fn iso639_1_code(lang: Lang) -> Option<&'static str> {
    // Individual languages whose macrolanguage carries the two-letter code.
    match lang {
        Lang::Pes => Some("fa"),
        Lang::Cmn => Some("zh"),
        _ => Language::from_639_3(lang.code()).and_then(|l| l.to_639_1()),
    }
}
