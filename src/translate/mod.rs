pub mod google;
pub mod retry;

pub use google::GoogleTranslator;
pub use retry::{translate_with_retry, RetryPolicy};

use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// One dialogue line to translate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    pub text: String,
    pub source_lang: String,
    pub dest_lang: String,
    pub timeout: Duration,
}

/// What ended up in the output for a dialogue line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationOutcome {
    Translated { text: String, attempts: u32 },
    /// Every attempt failed; the original line is kept.
    Fallback { attempts: u32, last_error: String },
}

impl TranslationOutcome {
    pub fn attempts(&self) -> u32 {
        match self {
            TranslationOutcome::Translated { attempts, .. } => *attempts,
            TranslationOutcome::Fallback { attempts, .. } => *attempts,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, TranslationOutcome::Fallback { .. })
    }
}

#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, request: &TranslationRequest) -> Result<String>;
    fn name(&self) -> &'static str;
}
