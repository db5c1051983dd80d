use crate::error::{Result, SubtranError};
use crate::translate::google::DEFAULT_SERVICE_URL;
use crate::translate::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Destination languages offered by the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetLanguage {
    English,
    #[default]
    Farsi,
    German,
}

impl TargetLanguage {
    pub const ALL: [TargetLanguage; 3] = [
        TargetLanguage::English,
        TargetLanguage::Farsi,
        TargetLanguage::German,
    ];

    /// ISO 639-1 code sent to the translation service.
    pub fn code(&self) -> &'static str {
        match self {
            TargetLanguage::English => "en",
            TargetLanguage::Farsi => "fa",
            TargetLanguage::German => "de",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TargetLanguage::English => "English",
            TargetLanguage::Farsi => "Farsi",
            TargetLanguage::German => "German",
        }
    }

    /// Label in Persian, as shown by the desktop forms.
    pub fn native_name(&self) -> &'static str {
        match self {
            TargetLanguage::English => "انگلیسی",
            TargetLanguage::Farsi => "فارسی",
            TargetLanguage::German => "آلمانی",
        }
    }
}

impl std::fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl std::str::FromStr for TargetLanguage {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        TargetLanguage::ALL
            .into_iter()
            .find(|lang| {
                lang.code().eq_ignore_ascii_case(trimmed)
                    || lang.name().eq_ignore_ascii_case(trimmed)
                    || lang.native_name() == trimmed
            })
            .or_else(|| match trimmed.to_lowercase().as_str() {
                "persian" => Some(TargetLanguage::Farsi),
                "deutsch" => Some(TargetLanguage::German),
                _ => None,
            })
            .ok_or_else(|| format!("Unknown language: {}. Use 'en', 'fa', or 'de'", s))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub target_language: TargetLanguage,
    /// Skip detection and use this source language.
    pub source_language: Option<String>,
    pub log_file: PathBuf,
    pub service_url: String,
    pub max_attempts: u32,
    pub retry_delay_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_language: TargetLanguage::default(),
            source_language: None,
            log_file: PathBuf::from("translator.log"),
            service_url: DEFAULT_SERVICE_URL.to_string(),
            max_attempts: 3,
            retry_delay_secs: 5,
            request_timeout_secs: 10,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        // Load from config file if it exists
        if let Some(config_path) = Self::config_file_path() {
            if config_path.exists() {
                let contents = std::fs::read_to_string(&config_path)?;
                config = toml::from_str::<Config>(&contents).map_err(|e| {
                    SubtranError::Config(format!("{}: {}", config_path.display(), e))
                })?;
            }
        }

        config.apply_env();
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(target) = std::env::var("SUBTRAN_TARGET") {
            if let Ok(t) = target.parse() {
                self.target_language = t;
            }
        }
        if let Ok(source) = std::env::var("SUBTRAN_SOURCE") {
            if !source.trim().is_empty() {
                self.source_language = Some(source.trim().to_string());
            }
        }
        if let Ok(path) = std::env::var("SUBTRAN_LOG_FILE") {
            self.log_file = PathBuf::from(path);
        }
        if let Ok(url) = std::env::var("SUBTRAN_SERVICE_URL") {
            self.service_url = url;
        }
        if let Ok(attempts) = std::env::var("SUBTRAN_MAX_ATTEMPTS") {
            if let Ok(a) = attempts.parse() {
                self.max_attempts = a;
            }
        }
        if let Ok(delay) = std::env::var("SUBTRAN_RETRY_DELAY") {
            if let Ok(d) = delay.parse() {
                self.retry_delay_secs = d;
            }
        }
        if let Ok(timeout) = std::env::var("SUBTRAN_TIMEOUT") {
            if let Ok(t) = timeout.parse() {
                self.request_timeout_secs = t;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(SubtranError::Config(
                "max_attempts must be greater than 0".to_string(),
            ));
        }

        if self.request_timeout_secs == 0 {
            return Err(SubtranError::Config(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.service_url.trim().is_empty() {
            return Err(SubtranError::Config(
                "service_url must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            delay: Duration::from_secs(self.retry_delay_secs),
            attempt_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }

    fn config_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("subtran").join("config.toml"))
    }
}
