//! Pluggable AI backend abstraction
//!
//! The advisory text is produced by an external text-generation service. This
//! module provides a backend-agnostic interface for that call; the rest of the
//! crate treats the reply as opaque text.
//!
//! # Architecture
//!
//! - `AIBackend` trait: defines the interface for all AI backends
//! - `AIClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `OpenAICompatibleBackend`, `OllamaBackend`, `MockBackend`
//!
//! # Usage
//!
//! ```rust,ignore
//! let config = AppConfig::load(None)?;
//! if let Some(client) = AIClient::from_config(&config.ai) {
//!     let text = client.complete(&ChatRequest::new("Hello")).await?;
//! }
//! ```
//!
//! No retries are attempted; a failed call is reported once to the caller.

mod mock;
mod ollama;
mod openai_compatible;
pub mod types;

pub use mock::MockBackend;
pub use ollama::OllamaBackend;
pub use openai_compatible::OpenAICompatibleBackend;
pub use types::*;

use async_trait::async_trait;

use crate::config::AiConfig;
use crate::error::Result;

/// Default model for OpenAI-compatible servers
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
/// Host used when only an API key is configured
pub const DEFAULT_OPENAI_HOST: &str = "https://api.openai.com";
/// Default Ollama model
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.2";

/// Trait defining the interface for all AI backends
///
/// Backends should be Send + Sync to allow use across async tasks.
#[async_trait]
pub trait AIBackend: Send + Sync {
    /// Run a chat completion and return the reply text
    async fn complete(&self, request: &ChatRequest) -> Result<String>;

    /// Check if the backend is available
    async fn health_check(&self) -> bool;

    /// Get the model name
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete AI client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum AIClient {
    /// OpenAI API or any compatible server (vLLM, LocalAI, llama-server, etc.)
    OpenAICompatible(OpenAICompatibleBackend),
    /// Ollama backend (HTTP API)
    Ollama(OllamaBackend),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl AIClient {
    /// Create an AI client from configuration
    ///
    /// Returns None when the selected backend is missing its host (or, for
    /// OpenAI, both host and API key).
    pub fn from_config(config: &AiConfig) -> Option<Self> {
        match config.backend.to_lowercase().as_str() {
            "openai_compatible" | "openai" | "vllm" | "localai" | "llamacpp" => {
                openai_from_config(config)
            }
            "ollama" => {
                let host = config.host.as_deref()?;
                let model = config.model.as_deref().unwrap_or(DEFAULT_OLLAMA_MODEL);
                Some(AIClient::Ollama(OllamaBackend::new(host, model)))
            }
            "mock" => Some(AIClient::Mock(MockBackend::new())),
            other => {
                tracing::warn!(backend = %other, "Unknown AI backend, falling back to openai_compatible");
                openai_from_config(config)
            }
        }
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        AIClient::Mock(MockBackend::new())
    }

    /// Create a new instance with a different model
    pub fn with_model(&self, model: &str) -> Self {
        match self {
            AIClient::OpenAICompatible(b) => AIClient::OpenAICompatible(b.with_model(model)),
            AIClient::Ollama(b) => AIClient::Ollama(b.with_model(model)),
            AIClient::Mock(b) => AIClient::Mock(b.with_model(model)),
        }
    }

    pub fn info(&self) -> BackendInfo {
        let kind = match self {
            AIClient::OpenAICompatible(_) => "openai_compatible",
            AIClient::Ollama(_) => "ollama",
            AIClient::Mock(_) => "mock",
        };
        BackendInfo {
            kind,
            model: self.model().to_string(),
            host: self.host().to_string(),
        }
    }
}

fn openai_from_config(config: &AiConfig) -> Option<AIClient> {
    let host = match (&config.host, &config.api_key) {
        (Some(host), _) => host.as_str(),
        (None, Some(_)) => DEFAULT_OPENAI_HOST,
        (None, None) => return None,
    };
    let model = config.model.as_deref().unwrap_or(DEFAULT_OPENAI_MODEL);

    let backend = match &config.api_key {
        Some(key) => OpenAICompatibleBackend::with_api_key(host, model, key),
        None => OpenAICompatibleBackend::new(host, model),
    };
    Some(AIClient::OpenAICompatible(backend))
}

// Implement AIBackend for AIClient by delegating to the inner backend
#[async_trait]
impl AIBackend for AIClient {
    async fn complete(&self, request: &ChatRequest) -> Result<String> {
        match self {
            AIClient::OpenAICompatible(b) => b.complete(request).await,
            AIClient::Ollama(b) => b.complete(request).await,
            AIClient::Mock(b) => b.complete(request).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            AIClient::OpenAICompatible(b) => b.health_check().await,
            AIClient::Ollama(b) => b.health_check().await,
            AIClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            AIClient::OpenAICompatible(b) => b.model(),
            AIClient::Ollama(b) => b.model(),
            AIClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            AIClient::OpenAICompatible(b) => b.host(),
            AIClient::Ollama(b) => b.host(),
            AIClient::Mock(b) => b.host(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ai_client_mock() {
        let client = AIClient::mock();
        assert_eq!(client.model(), "mock");
        assert_eq!(client.host(), "mock://localhost");
        assert_eq!(client.info().kind, "mock");
    }

    #[tokio::test]
    async fn test_mock_health_check() {
        let client = AIClient::mock();
        assert!(client.health_check().await);
    }

    #[test]
    fn test_from_config_unconfigured_openai() {
        let config = AiConfig::default();
        assert!(AIClient::from_config(&config).is_none());
    }

    #[test]
    fn test_from_config_api_key_uses_openai_host() {
        let config = AiConfig {
            api_key: Some("sk-test".into()),
            ..AiConfig::default()
        };
        let client = AIClient::from_config(&config).unwrap();
        assert_eq!(client.host(), DEFAULT_OPENAI_HOST);
        assert_eq!(client.model(), DEFAULT_OPENAI_MODEL);
        assert_eq!(client.info().kind, "openai_compatible");
    }

    #[test]
    fn test_from_config_custom_host() {
        let config = AiConfig {
            host: Some("http://localhost:8000/".into()),
            model: Some("llama-3.2-3b".into()),
            ..AiConfig::default()
        };
        let client = AIClient::from_config(&config).unwrap();
        assert_eq!(client.host(), "http://localhost:8000");
        assert_eq!(client.model(), "llama-3.2-3b");
    }

    #[test]
    fn test_from_config_ollama() {
        let mut config = AiConfig {
            backend: "ollama".into(),
            ..AiConfig::default()
        };
        assert!(AIClient::from_config(&config).is_none());

        config.host = Some("http://localhost:11434".into());
        let client = AIClient::from_config(&config).unwrap();
        assert_eq!(client.info().kind, "ollama");
        assert_eq!(client.model(), DEFAULT_OLLAMA_MODEL);
    }

    #[test]
    fn test_from_config_mock_and_unknown() {
        let config = AiConfig {
            backend: "MOCK".into(),
            ..AiConfig::default()
        };
        assert_eq!(AIClient::from_config(&config).unwrap().info().kind, "mock");

        let config = AiConfig {
            backend: "unknown".into(),
            api_key: Some("sk".into()),
            ..AiConfig::default()
        };
        assert_eq!(
            AIClient::from_config(&config).unwrap().info().kind,
            "openai_compatible"
        );
    }

    #[test]
    fn test_with_model() {
        let config = AiConfig {
            api_key: Some("sk".into()),
            ..AiConfig::default()
        };
        let client = AIClient::from_config(&config).unwrap().with_model("gpt-4o");
        assert_eq!(client.model(), "gpt-4o");
    }
}
