//! Mock backend for testing
//!
//! Returns predictable replies without a running LLM server.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::types::ChatRequest;
use super::AIBackend;

/// Mock AI backend for testing
///
/// By default every request succeeds with a short advisory that echoes the
/// first line of the user message. Can be configured with a fixed reply or
/// to fail every call.
#[derive(Clone)]
pub struct MockBackend {
    /// Whether health_check should return true
    pub healthy: bool,
    /// Fixed reply, if set
    pub response: Option<String>,
    /// Whether `complete` should fail
    pub fail: bool,
    calls: Arc<AtomicUsize>,
    last_request: Arc<Mutex<Option<ChatRequest>>>,
}

impl MockBackend {
    /// Create a new mock backend (healthy by default)
    pub fn new() -> Self {
        Self {
            healthy: true,
            response: None,
            fail: false,
            calls: Arc::new(AtomicUsize::new(0)),
            last_request: Arc::new(Mutex::new(None)),
        }
    }

    /// Create an unhealthy mock backend whose calls fail
    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            fail: true,
            ..Self::new()
        }
    }

    /// Create a mock that always replies with `response`
    pub fn with_response(response: impl Into<String>) -> Self {
        Self {
            response: Some(response.into()),
            ..Self::new()
        }
    }

    /// Create a new instance with a different model (no-op for mock)
    pub fn with_model(&self, _model: &str) -> Self {
        self.clone()
    }

    /// Number of `complete` calls made so far (shared between clones)
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The most recent request passed to `complete` (shared between clones)
    pub fn last_request(&self) -> Option<ChatRequest> {
        self.last_request.lock().ok().and_then(|r| r.clone())
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AIBackend for MockBackend {
    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_request.lock() {
            *last = Some(request.clone());
        }

        if self.fail {
            return Err(Error::InvalidData("mock backend configured to fail".into()));
        }

        if let Some(ref response) = self.response {
            return Ok(response.clone());
        }

        let first_line = request.user.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
        Ok(format!("Mock advisory for: {}", first_line.trim()))
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_reply_echoes_first_line() {
        let mock = MockBackend::new();
        let reply = mock
            .complete(&ChatRequest::new("\nQUESTION ABOUT: Cimento\nmore"))
            .await
            .unwrap();
        assert_eq!(reply, "Mock advisory for: QUESTION ABOUT: Cimento");
    }

    #[tokio::test]
    async fn test_fixed_response() {
        let mock = MockBackend::with_response("Use bulk purchase");
        let reply = mock.complete(&ChatRequest::new("x")).await.unwrap();
        assert_eq!(reply, "Use bulk purchase");
    }

    #[tokio::test]
    async fn test_unhealthy_fails() {
        let mock = MockBackend::unhealthy();
        assert!(!mock.health_check().await);
        assert!(mock.complete(&ChatRequest::new("x")).await.is_err());
    }

    #[tokio::test]
    async fn test_call_count_shared_between_clones() {
        let mock = MockBackend::new();
        let clone = mock.clone();
        clone.complete(&ChatRequest::new("a")).await.unwrap();
        mock.complete(&ChatRequest::new("b")).await.unwrap();
        assert_eq!(mock.call_count(), 2);
        assert_eq!(mock.last_request().unwrap().user, "b");
    }
}
