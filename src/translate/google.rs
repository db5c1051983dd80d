//! Translation through the public Google Translate web endpoint.

use crate::error::{Result, SubtranError};
use crate::translate::{TranslationRequest, Translator};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

/// Default service root.
pub const DEFAULT_SERVICE_URL: &str = "https://translate.googleapis.com";

/// Translator backed by the `translate_a/single` endpoint.
pub struct GoogleTranslator {
    client: Client,
    base_url: String,
}

impl Default for GoogleTranslator {
    fn default() -> Self {
        Self::new()
    }
}

impl GoogleTranslator {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_SERVICE_URL.to_string(),
        }
    }

    /// Point the client at a different service root (e.g. a mock server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/translate_a/single", self.base_url)
    }
}

/// Join the translated segments of a `translate_a/single` reply.
///
/// The reply is a nested array whose first element lists sentence segments,
/// each starting with the translated text.
fn parse_response(body: &Value) -> Result<String> {
    let segments = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| SubtranError::Api(format!("Unexpected translation response: {}", body)))?;

    let text: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect();

    if text.trim().is_empty() {
        return Err(SubtranError::Translation(
            "service returned an empty translation".to_string(),
        ));
    }

    Ok(text)
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(&self, request: &TranslationRequest) -> Result<String> {
        debug!(
            "Translating {} chars {} -> {}",
            request.text.len(),
            request.source_lang,
            request.dest_lang
        );

        let response = self
            .client
            .get(self.endpoint())
            .query(&[
                ("client", "gtx"),
                ("sl", request.source_lang.as_str()),
                ("tl", request.dest_lang.as_str()),
                ("dt", "t"),
                ("q", request.text.as_str()),
            ])
            .timeout(request.timeout)
            .send()
            .await
            .map_err(|e| SubtranError::Api(format!("Translation request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SubtranError::Api(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(SubtranError::Api(format!(
                "Translation API error ({}): {}",
                status, body
            )));
        }

        let value: Value = serde_json::from_str(&body).map_err(|e| {
            SubtranError::Api(format!("Failed to parse translation response: {}", e))
        })?;

        parse_response(&value)
    }

    fn name(&self) -> &'static str {
        "google"
    }
}
