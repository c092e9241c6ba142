//! AI backend request types
//!
//! These types are backend-agnostic and used across all AI implementations.

use crate::prompts::RenderedPrompt;

/// A single-turn chat request
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    /// System instructions, if the prompt has any
    pub system: Option<String>,
    /// User message
    pub user: String,
    /// Sampling temperature
    pub temperature: Option<f32>,
    /// Response length limit
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            system: None,
            user: user.into(),
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

impl From<RenderedPrompt> for ChatRequest {
    fn from(prompt: RenderedPrompt) -> Self {
        Self {
            system: prompt.system,
            user: prompt.user,
            temperature: None,
            max_tokens: None,
        }
    }
}

/// Backend information for display
#[derive(Debug, Clone, PartialEq)]
pub struct BackendInfo {
    /// Backend kind (openai_compatible, ollama, mock)
    pub kind: &'static str,
    pub model: String,
    pub host: String,
}
