//! Mock provider for tests.
//!
//! - `MockProvider::responding(text)` - always returns `text`
//! - `MockProvider::failing()` - always fails with an API error
//! - `MockProvider::empty()` - returns an empty completion

use crate::error::{ProviderError, Result};
use crate::provider::{CompletionRequest, Provider};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Behavior mode for the mock provider
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with this text
    Respond(String),
    /// Always fails with an error
    Failing,
    /// Returns an empty response
    Empty,
}

#[derive(Debug)]
pub struct MockProvider {
    name: String,
    behavior: MockBehavior,
    request_count: Arc<AtomicUsize>,
    last_prompt: Arc<Mutex<Option<String>>>,
}

impl MockProvider {
    pub fn new(name: impl Into<String>, behavior: MockBehavior) -> Self {
        Self {
            name: name.into(),
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            last_prompt: Arc::new(Mutex::new(None)),
        }
    }

    pub fn responding(text: impl Into<String>) -> Self {
        Self::new("mock", MockBehavior::Respond(text.into()))
    }

    pub fn failing() -> Self {
        Self::new("mock-failing", MockBehavior::Failing)
    }

    pub fn empty() -> Self {
        Self::new("mock-empty", MockBehavior::Empty)
    }

    /// Shared handle to the number of requests served.
    pub fn counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.request_count)
    }

    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// The prompt of the most recent request.
    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().ok().and_then(|p| p.clone())
    }

    /// Shared handle to the most recent prompt, readable after the mock is boxed.
    pub fn prompt_log(&self) -> Arc<Mutex<Option<String>>> {
        Arc::clone(&self.last_prompt)
    }
}

#[async_trait]
impl Provider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        self.request_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_prompt.lock() {
            *last = Some(request.prompt.clone());
        }

        match &self.behavior {
            MockBehavior::Respond(text) => Ok(text.clone()),
            MockBehavior::Failing => Err(ProviderError::ApiError {
                status_code: 503,
                message: "mock provider unavailable".to_string(),
            }),
            MockBehavior::Empty => Ok(String::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_counts_requests() {
        let mock = MockProvider::responding("ok");
        let request = CompletionRequest::new("prompt");

        assert_eq!(mock.complete(&request).await.unwrap(), "ok");
        assert_eq!(mock.complete(&request).await.unwrap(), "ok");
        assert_eq!(mock.request_count(), 2);
        assert_eq!(mock.last_prompt().as_deref(), Some("prompt"));
    }

    #[tokio::test]
    async fn test_failing_mock() {
        let mock = MockProvider::failing();
        let result = mock.complete(&CompletionRequest::new("x")).await;
        assert!(matches!(result, Err(ProviderError::ApiError { status_code: 503, .. })));
    }
}
