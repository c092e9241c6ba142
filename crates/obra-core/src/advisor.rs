//! Advisory text generation
//!
//! The advisor renders a prompt from the catalog context, sends it to the
//! configured backend and hands back the reply untouched. Failures never touch
//! the computed [`AnalysisResult`]; they surface as
//! [`Error::AdvisoryUnavailable`] so callers can print the result without text.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::{debug, info, warn};

use crate::ai::{AIBackend, AIClient, ChatRequest};
use crate::catalog::Catalog;
use crate::config::AiConfig;
use crate::context::ContextAssembler;
use crate::error::{Error, Result};
use crate::models::{AnalysisResult, LineItem};
use crate::prompts::{PromptId, PromptLibrary};

/// Produces advisory text for budgets and single items
#[derive(Clone)]
pub struct Advisor {
    client: AIClient,
    prompts: Arc<RwLock<PromptLibrary>>,
    temperature: f32,
    max_tokens: u32,
    consult_max_tokens: u32,
}

impl Advisor {
    /// Create an advisor around an existing client
    pub fn new(client: AIClient, config: &AiConfig) -> Self {
        Self {
            client,
            prompts: Arc::new(RwLock::new(PromptLibrary::new())),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            consult_max_tokens: config.consult_max_tokens,
        }
    }

    /// Build the backend from config
    ///
    /// Fails with `AdvisoryUnavailable` when no backend is configured.
    pub fn from_config(config: &AiConfig) -> Result<Self> {
        let client = AIClient::from_config(config).ok_or_else(|| {
            Error::AdvisoryUnavailable(format!(
                "no {} backend configured (set OPENAI_API_KEY, OPENAI_COMPATIBLE_HOST or OLLAMA_HOST)",
                config.backend
            ))
        })?;
        Ok(Self::new(client, config))
    }

    /// Use a specific prompt library (e.g. embedded only)
    pub fn with_prompts(mut self, prompts: PromptLibrary) -> Self {
        self.prompts = Arc::new(RwLock::new(prompts));
        self
    }

    pub fn client(&self) -> &AIClient {
        &self.client
    }

    /// Savings advisory for an analyzed budget
    pub async fn advise_budget(
        &self,
        catalog: &Catalog,
        items: &[LineItem],
        result: &AnalysisResult,
    ) -> Result<String> {
        let context = ContextAssembler::new(catalog).budget_context(items, result);

        let mut vars = HashMap::new();
        vars.insert("budget", context.budget);
        vars.insert("total", context.total);
        vars.insert("reference", context.reference);
        vars.insert("above_market", context.above_market);

        let request = self
            .render(PromptId::AnalyzeBudget, &vars)?
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens);

        info!(
            items = items.len(),
            backend = self.client.info().kind,
            model = %self.client.model(),
            "Requesting budget advisory"
        );
        self.send(request).await
    }

    /// Market information about a single item
    ///
    /// Only the length limit is set; the backend's own sampling temperature
    /// applies.
    pub async fn consult_item(&self, catalog: &Catalog, item_name: &str) -> Result<String> {
        let reference = ContextAssembler::new(catalog).reference_context(&[item_name]);

        let mut vars = HashMap::new();
        vars.insert("item", item_name.trim().to_string());
        vars.insert("reference", reference);

        let request = self
            .render(PromptId::ConsultItem, &vars)?
            .with_max_tokens(self.consult_max_tokens);

        info!(item = %item_name, model = %self.client.model(), "Requesting item consultation");
        self.send(request).await
    }

    fn render(&self, id: PromptId, vars: &HashMap<&str, String>) -> Result<ChatRequest> {
        let mut prompts = self
            .prompts
            .write()
            .map_err(|_| Error::InvalidData("Failed to acquire prompt library lock".into()))?;
        let prompt = prompts.get(id)?;
        debug!(prompt = id.as_str(), is_override = prompt.is_override, "Rendering prompt");
        Ok(ChatRequest::from(prompt.render(vars)))
    }

    async fn send(&self, request: ChatRequest) -> Result<String> {
        match self.client.complete(&request).await {
            Ok(text) => {
                debug!(chars = text.len(), "Advisory received");
                Ok(text)
            }
            Err(e) => {
                warn!(error = %e, host = %self.client.host(), "Advisory request failed");
                Err(Error::AdvisoryUnavailable(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::MockBackend;
    use crate::analyzer::Analyzer;
    use rust_decimal::Decimal;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn catalog() -> Catalog {
        Catalog::from_json_str(
            r#"[{"name": "Cimento CPII", "referencePrice": 30, "tags": ["cimento"],
                 "savingsTips": ["Buy by the pallet"]}]"#,
        )
        .unwrap()
    }

    fn advisor(mock: MockBackend) -> Advisor {
        Advisor::new(AIClient::Mock(mock), &AiConfig::default())
            .with_prompts(PromptLibrary::embedded_only())
    }

    #[tokio::test]
    async fn test_advise_budget_returns_backend_text() {
        let catalog = catalog();
        let items = vec![LineItem::new("Cimento", d("50"), d("35.00"))];
        let result = Analyzer::new(&catalog).analyze(&items).unwrap();

        let advisor = advisor(MockBackend::new());
        let text = advisor.advise_budget(&catalog, &items, &result).await.unwrap();
        assert_eq!(text, "Mock advisory for: BUDGET:");
    }

    #[tokio::test]
    async fn test_consult_item() {
        let advisor = advisor(MockBackend::new());
        let text = advisor.consult_item(&catalog(), " Cimento ").await.unwrap();
        assert_eq!(text, "Mock advisory for: QUESTION ABOUT: Cimento");
    }

    #[tokio::test]
    async fn test_consult_item_sends_length_limit_only() {
        let mock = MockBackend::new();
        let advisor = advisor(mock.clone());
        advisor.consult_item(&catalog(), "Cimento").await.unwrap();

        let request = mock.last_request().unwrap();
        assert_eq!(request.max_tokens, Some(500));
        assert_eq!(request.temperature, None);
    }

    #[tokio::test]
    async fn test_advise_budget_sends_temperature_and_limit() {
        let catalog = catalog();
        let items = vec![LineItem::new("Cimento", d("50"), d("35.00"))];
        let result = Analyzer::new(&catalog).analyze(&items).unwrap();

        let mock = MockBackend::new();
        advisor(mock.clone())
            .advise_budget(&catalog, &items, &result)
            .await
            .unwrap();

        let request = mock.last_request().unwrap();
        assert_eq!(request.max_tokens, Some(800));
        assert_eq!(request.temperature, Some(0.3));
    }

    #[tokio::test]
    async fn test_backend_failure_is_advisory_unavailable() {
        let catalog = catalog();
        let items = vec![LineItem::new("Cimento", d("50"), d("35.00"))];
        let result = Analyzer::new(&catalog).analyze(&items).unwrap();

        let advisor = advisor(MockBackend::unhealthy());
        let err = advisor.advise_budget(&catalog, &items, &result).await.unwrap_err();
        assert!(matches!(err, Error::AdvisoryUnavailable(_)));
        assert!(err.is_recoverable());

        // the analysis is untouched
        assert_eq!(result.total_subtotal, d("1750.00"));
    }

    #[test]
    fn test_from_config_unconfigured() {
        let err = Advisor::from_config(&AiConfig::default()).err().unwrap();
        assert!(matches!(err, Error::AdvisoryUnavailable(_)));
    }

    #[test]
    fn test_from_config_mock() {
        let config = AiConfig {
            backend: "mock".into(),
            ..AiConfig::default()
        };
        let advisor = Advisor::from_config(&config).unwrap();
        assert_eq!(advisor.client().info().kind, "mock");
    }
}
