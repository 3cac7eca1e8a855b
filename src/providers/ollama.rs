use async_trait::async_trait;
use log::error;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::errors::OracleError;
use crate::providers::{OracleRequest, TranslationOracle};

/// Ollama oracle for interacting with a local Ollama server
#[derive(Debug)]
pub struct OllamaOracle {
    /// Base URL of the Ollama API
    base_url: String,
    /// HTTP client for making requests
    client: Client,
    /// Model to use
    model: String,
    /// Temperature for generation
    temperature: f32,
    /// Request timeout in seconds
    timeout_secs: u64,
}

/// Generate request for the Ollama API
#[derive(Debug, Serialize)]
struct GenerationRequest {
    /// Model name to use for generation
    model: String,
    /// Prompt to generate from
    prompt: String,
    /// System message to guide the model
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    /// Additional model parameters
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerationOptions>,
    /// Whether to stream the response
    stream: bool,
}

/// Generation options for the Ollama API
#[derive(Debug, Serialize)]
struct GenerationOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Generation response from the Ollama API
#[derive(Debug, Deserialize)]
struct GenerationResponse {
    /// Generated text
    response: String,
    /// Whether the generation is complete
    #[serde(default)]
    done: bool,
}

impl OllamaOracle {
    /// Create a new Ollama oracle from a complete base URL
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        temperature: f32,
        timeout_secs: u64,
    ) -> Self {
        let endpoint = endpoint.into();
        let candidate = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.clone()
        } else {
            format!("http://{}", endpoint)
        };

        // Normalize to scheme://host[:port], dropping any trailing path
        let base_url = match Url::parse(&candidate) {
            Ok(url) => {
                let host = url.host_str().unwrap_or("localhost");
                match url.port() {
                    Some(port) => format!("{}://{}:{}", url.scheme(), host, port),
                    None => format!("{}://{}", url.scheme(), host),
                }
            }
            Err(_) => candidate.trim_end_matches('/').to_string(),
        };

        Self {
            base_url,
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                // Ollama uses HTTP/1.1
                .http1_only()
                .build()
                .unwrap_or_default(),
            model: model.into(),
            temperature,
            timeout_secs,
        }
    }

    // Some Ollama builds answer non-streaming requests with JSONL anyway.
    // Concatenate the response fragments of every parseable line.
    fn parse_jsonl_response(raw: &str) -> Option<String> {
        let mut full_response = String::new();
        let mut saw_done = false;

        for line in raw.lines() {
            if line.is_empty() {
                continue;
            }
            let value: serde_json::Value = serde_json::from_str(line).ok()?;
            if let Some(part) = value.get("response").and_then(|v| v.as_str()) {
                full_response.push_str(part);
            }
            if value.get("done").and_then(|v| v.as_bool()).unwrap_or(false) {
                saw_done = true;
            }
        }

        if saw_done || !full_response.is_empty() {
            Some(full_response)
        } else {
            None
        }
    }
}

#[async_trait]
impl TranslationOracle for OllamaOracle {
    async fn translate(&self, request: &OracleRequest) -> Result<String, OracleError> {
        let url = format!("{}/api/generate", self.base_url);

        let body = GenerationRequest {
            model: self.model.clone(),
            prompt: request.text.clone(),
            system: Some(request.system_prompt.clone()),
            options: Some(GenerationOptions {
                temperature: Some(self.temperature),
            }),
            stream: false,
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    OracleError::Timeout(self.timeout_secs)
                } else {
                    OracleError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Ollama API error ({}): {}", status, error_text);
            return Err(OracleError::Api {
                status_code: status.as_u16(),
                message: error_text,
            });
        }

        let response_text = response
            .text()
            .await
            .map_err(|e| OracleError::RequestFailed(e.to_string()))?;

        match serde_json::from_str::<GenerationResponse>(&response_text) {
            Ok(generated) => {
                if !generated.done {
                    error!("Ollama returned an incomplete generation");
                }
                Ok(generated.response)
            }
            Err(e) => Self::parse_jsonl_response(&response_text).ok_or_else(|| {
                error!(
                    "Failed to parse Ollama API response: {}. Raw response (first 500 chars): {}",
                    e,
                    response_text.chars().take(500).collect::<String>()
                );
                OracleError::ParseError(e.to_string())
            }),
        }
    }

    fn name(&self) -> &str {
        "ollama"
    }
}
