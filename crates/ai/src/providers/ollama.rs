//! Ollama local server client (`/api/generate`, non-streaming).

use super::{check_status, http_client};
use crate::error::{ProviderError, Result};
use crate::provider::{CompletionRequest, Provider};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug)]
pub struct Ollama {
    /// Base URL of the Ollama API
    base_url: String,
    client: Client,
    model: String,
}

/// Generate request for the Ollama API
#[derive(Debug, Serialize)]
struct GenerationRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    options: GenerationOptions,
    /// Ask the server to constrain output to JSON
    format: &'a str,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct GenerationOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    response: String,
}

impl Ollama {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into();
        let base_url = if base_url.starts_with("http://") || base_url.starts_with("https://") {
            base_url
        } else {
            format!("http://{base_url}")
        };

        Ok(Self {
            base_url,
            client: http_client(timeout)?,
            model: model.into(),
        })
    }

    fn url(&self) -> String {
        format!("{}/api/generate", self.base_url.trim_end_matches('/'))
    }

    fn body<'a>(&'a self, request: &'a CompletionRequest) -> GenerationRequest<'a> {
        GenerationRequest {
            model: &self.model,
            prompt: &request.prompt,
            system: request.system.as_deref(),
            options: GenerationOptions {
                temperature: request.temperature,
                num_predict: request.max_tokens,
            },
            format: "json",
            stream: false,
        }
    }
}

#[async_trait]
impl Provider for Ollama {
    fn name(&self) -> &str {
        "Ollama"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        debug!("Ollama request to {} ({})", self.base_url, self.model);

        let response = self
            .client
            .post(self.url())
            .json(&self.body(request))
            .send()
            .await?;
        let response = check_status(response, self.name()).await?;

        let parsed: GenerationResponse = response.json().await?;
        if parsed.response.trim().is_empty() {
            return Err(ProviderError::ParseError("Ollama: empty response".to_string()));
        }
        Ok(parsed.response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_without_scheme() {
        let ollama = Ollama::new("gpu-box:11434/", "llama3.1", Duration::from_secs(1)).unwrap();
        assert_eq!(ollama.url(), "http://gpu-box:11434/api/generate");
    }

    #[test]
    fn test_body_is_non_streaming_json() {
        let ollama = Ollama::new("http://localhost:11434", "llama3.1", Duration::from_secs(1)).unwrap();
        let request = CompletionRequest::new("p").temperature(0.1);
        let json = serde_json::to_value(ollama.body(&request)).unwrap();
        assert_eq!(json["stream"], false);
        assert_eq!(json["format"], "json");
        assert_eq!(json["options"]["num_predict"], 4096);
    }
}
