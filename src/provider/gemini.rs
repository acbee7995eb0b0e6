use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

use crate::config::Config;
use crate::errors::ForgeError;
use crate::wire::{GroundingChunk, RawGeneration};

/// Environment variables consulted for the credential, in order.
pub const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

pub fn resolve_api_key(lookup: impl Fn(&str) -> Option<String>) -> Result<String, ForgeError> {
    API_KEY_VARS
        .iter()
        .find_map(|k| lookup(k).filter(|v| !v.trim().is_empty()))
        .ok_or_else(|| {
            ForgeError::Config(format!("{} is not set", API_KEY_VARS.join(" or ")))
        })
}

/// Gemini `generateContent` with the `googleSearch` tool enabled.
pub struct GeminiProvider {
    client: Client,
    api_base: String,
    model: String,
    api_key: String,
    temperature: f64,
}

impl GeminiProvider {
    pub fn new(cfg: &Config, api_key: String) -> Result<Self, ForgeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .map_err(|e| ForgeError::Config(format!("http client: {e}")))?;
        Ok(Self {
            client,
            api_base: cfg.gemini_api_base.clone(),
            model: cfg.model.clone(),
            api_key,
            temperature: cfg.temperature,
        })
    }

    fn endpoint(&self) -> Result<Url, ForgeError> {
        let model_path = if self.model.starts_with("models/") {
            self.model.clone()
        } else {
            format!("models/{}", self.model)
        };
        let endpoint = format!("{}/{}:generateContent", self.api_base.trim_end_matches('/'), model_path);
        Url::parse(&endpoint)
            .map_err(|e| ForgeError::Config(format!("bad Gemini endpoint {endpoint}: {e}")))
    }
}

pub fn request_body(prompt: &str, temperature: f64) -> Value {
    json!({
        "contents": [
            {
                "role": "user",
                "parts": [{ "text": prompt }]
            }
        ],
        "tools": [{ "googleSearch": {} }],
        "generationConfig": { "temperature": temperature }
    })
}

#[async_trait]
impl super::Generator for GeminiProvider {
    async fn generate(&self, prompt: &str) -> Result<RawGeneration, ForgeError> {
        if self.api_key.trim().is_empty() {
            return Err(ForgeError::Config("Gemini API key is empty".into()));
        }
        let url = self.endpoint()?;
        tracing::debug!(model = %self.model, prompt_bytes = prompt.len(), "POST generateContent");

        let resp = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body(prompt, self.temperature))
            .send()
            .await
            .map_err(|e| ForgeError::Generation(format!("request failed: {e}")))?;

        let status = resp.status();
        let payload = resp
            .text()
            .await
            .map_err(|e| ForgeError::Generation(format!("reading body failed: {e}")))?;
        tracing::debug!(%status, bytes = payload.len(), "Gemini replied");

        if !status.is_success() {
            return Err(ForgeError::Generation(format!(
                "Gemini API error ({status}): {}",
                extract_api_error(&payload)
            )));
        }
        parse_response(&payload)
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

pub fn parse_response(payload: &str) -> Result<RawGeneration, ForgeError> {
    let parsed: GenerateResponse = serde_json::from_str(payload)
        .map_err(|e| ForgeError::Generation(format!("failed to decode Gemini response: {e}")))?;
    let candidate = parsed
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| ForgeError::Generation("Gemini returned no candidates".into()))?;

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    if text.trim().is_empty() {
        return Err(ForgeError::Generation("Gemini returned no text".into()));
    }

    let grounding = candidate
        .grounding_metadata
        .map(|g| g.grounding_chunks)
        .unwrap_or_default();
    Ok(RawGeneration { text, grounding })
}

fn extract_api_error(body: &str) -> String {
    #[derive(Deserialize)]
    struct Envelope {
        error: Option<ApiError>,
    }
    #[derive(Deserialize)]
    struct ApiError {
        message: Option<String>,
        status: Option<String>,
    }

    match serde_json::from_str::<Envelope>(body).ok().and_then(|e| e.error) {
        Some(err) => format!(
            "{} (status={})",
            err.message.unwrap_or_else(|| "unknown error".into()),
            err.status.unwrap_or_else(|| "unknown".into())
        ),
        None => body.to_string(),
    }
}
