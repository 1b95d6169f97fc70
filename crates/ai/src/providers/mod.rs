//! Provider implementations for the supported LLM backends.
//!
//! - OpenAI-compatible chat completions: DeepSeek, Groq, Hugging Face router
//! - Anthropic messages API
//! - Gemini `generateContent`
//! - Ollama local server

use crate::config::{AiConfig, ProviderKind, ResolvedProvider};
use crate::error::{ProviderError, Result};
use crate::provider::Provider;
use log::{error, warn};
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;

pub mod anthropic;
pub mod gemini;
pub mod mock;
pub mod ollama;
pub mod openai_compat;

pub use anthropic::Anthropic;
pub use gemini::Gemini;
pub use mock::{MockBehavior, MockProvider};
pub use ollama::Ollama;
pub use openai_compat::OpenAiCompatible;

/// Build the client for one resolved backend.
pub fn build_provider(resolved: ResolvedProvider) -> Result<Box<dyn Provider>> {
    let name = resolved.kind.display_name();
    let ResolvedProvider {
        kind,
        api_key,
        model,
        endpoint,
        timeout,
    } = resolved;

    let provider: Box<dyn Provider> = match kind {
        ProviderKind::DeepSeek | ProviderKind::Groq | ProviderKind::HuggingFace => Box::new(
            OpenAiCompatible::new(name, api_key, endpoint, model, timeout)?,
        ),
        ProviderKind::Anthropic => Box::new(Anthropic::new(api_key, endpoint, model, timeout)?),
        ProviderKind::Gemini => Box::new(Gemini::new(api_key, endpoint, model, timeout)?),
        ProviderKind::Ollama => Box::new(Ollama::new(endpoint, model, timeout)?),
    };
    Ok(provider)
}

/// Build every backend in the configured order, skipping the ones that
/// cannot be set up.
pub fn providers_from_config(config: &AiConfig) -> Vec<Box<dyn Provider>> {
    config
        .provider_order()
        .into_iter()
        .filter_map(|kind| match config.resolve(kind).and_then(build_provider) {
            Ok(provider) => Some(provider),
            Err(e) => {
                warn!("Skipping provider {kind}: {e}");
                None
            }
        })
        .collect()
}

pub(crate) fn http_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ProviderError::ConnectionError(format!("failed to build HTTP client: {e}")))
}

/// Turn a non-success response into the matching error.
pub(crate) async fn check_status(response: Response, provider: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "Failed to get error response text".to_string());
    error!("{provider} API error ({status}): {message}");

    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            ProviderError::AuthenticationError(format!("{provider}: {message}"))
        }
        StatusCode::TOO_MANY_REQUESTS => {
            ProviderError::RateLimitExceeded(format!("{provider}: {message}"))
        }
        _ => ProviderError::ApiError {
            status_code: status.as_u16(),
            message,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_providers_from_config_skips_missing_keys() {
        let mut config = AiConfig::default();
        config.providers = vec![ProviderKind::Anthropic, ProviderKind::Groq, ProviderKind::Ollama];
        config.groq.api_key = Some("gsk".to_string());

        let providers = providers_from_config(&config);
        let names: Vec<&str> = providers.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["Groq", "Ollama"]);
    }

    #[test]
    fn test_build_provider_names() {
        let mut config = AiConfig::default();
        config.huggingface.api_key = Some("hf_x".to_string());
        let provider = build_provider(config.resolve(ProviderKind::HuggingFace).unwrap()).unwrap();
        assert_eq!(provider.name(), "Hugging Face");
    }
}
