//! The seam between the structuring service and concrete LLM backends.

use crate::error::Result;
use async_trait::async_trait;
use std::fmt::Debug;

/// One text-completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// System prompt to guide the model
    pub system: Option<String>,
    /// User prompt
    pub prompt: String,
    /// Maximum number of tokens to generate
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            system: None,
            prompt: prompt.into(),
            max_tokens: 4096,
            temperature: 0.3,
        }
    }

    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Common trait for all LLM backends, so the structurer can try them
/// interchangeably.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Short name used in logs and in the outline origin.
    fn name(&self) -> &str;

    /// Complete a request, returning the generated text.
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}
