//! Capability-level entry point used by the HTTP handlers.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;

use crate::anthropic::AnthropicClient;
use crate::config::AiConfig;
use crate::error::AiError;
use crate::provider::{Completion, CompletionProvider, CompletionRequest};

const GENERATE_SYSTEM_PROMPT: &str = "You are an expert software engineer helping a user build \
their project. Write complete, working code that fits the existing project files. Put each file \
in a fenced code block preceded by its relative path, and briefly explain the changes.";

const EXPLAIN_SYSTEM_PROMPT: &str = "You are a patient senior engineer. Explain code clearly and \
accurately for a developer who is new to it. Describe the overall purpose first, then walk \
through the important parts.";

const IMPROVE_SYSTEM_PROMPT: &str = "You are a meticulous code reviewer. Suggest specific, \
actionable improvements and show revised code where it helps. Prioritise correctness issues \
over style.";

const TESTS_SYSTEM_PROMPT: &str = "You are a testing specialist. Write thorough, runnable unit \
tests using idiomatic conventions for the language and framework. Return only the test code \
with short comments.";

/// One of the four operations the gateway offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    GenerateCode,
    ExplainCode,
    SuggestImprovements,
    GenerateTests,
}

impl Capability {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GenerateCode => "generate_code",
            Self::ExplainCode => "explain_code",
            Self::SuggestImprovements => "suggest_improvements",
            Self::GenerateTests => "generate_tests",
        }
    }

    /// Output token budget for one call.
    pub fn max_tokens(self) -> u32 {
        match self {
            Self::GenerateCode => 4000,
            Self::ExplainCode => 2000,
            Self::SuggestImprovements => 3000,
            Self::GenerateTests => 3000,
        }
    }

    pub fn system_prompt(self) -> &'static str {
        match self {
            Self::GenerateCode => GENERATE_SYSTEM_PROMPT,
            Self::ExplainCode => EXPLAIN_SYSTEM_PROMPT,
            Self::SuggestImprovements => IMPROVE_SYSTEM_PROMPT,
            Self::GenerateTests => TESTS_SYSTEM_PROMPT,
        }
    }
}

/// Reported by the chat status endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AiStatus {
    pub configured: bool,
    pub model: Option<String>,
}

/// Dispatches capability calls to the configured provider, if any.
#[derive(Clone)]
pub struct AiGateway {
    provider: Option<Arc<dyn CompletionProvider>>,
}

impl AiGateway {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self {
            provider: Some(provider),
        }
    }

    /// A gateway that rejects every call with [`crate::AiErrorKind::NotConfigured`].
    pub fn disabled() -> Self {
        Self { provider: None }
    }

    /// Build the Anthropic-backed gateway, or a disabled one when no key
    /// is configured.
    pub fn from_config(config: &AiConfig) -> Result<Self, AiError> {
        let Some(api_key) = &config.api_key else {
            tracing::warn!("ANTHROPIC_API_KEY not set, AI features are disabled");
            return Ok(Self::disabled());
        };

        let client = AnthropicClient::new(
            api_key.clone(),
            config.model.clone(),
            config.base_url.clone(),
            config.timeout,
        )?;
        tracing::info!(model = %config.model, "AI gateway configured");
        Ok(Self::new(Arc::new(client)))
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_some()
    }

    pub fn status(&self) -> AiStatus {
        AiStatus {
            configured: self.is_configured(),
            model: self.provider.as_ref().map(|p| p.model().to_string()),
        }
    }

    pub async fn generate_code(&self, prompt: String) -> Result<Completion, AiError> {
        self.run(Capability::GenerateCode, prompt).await
    }

    pub async fn explain_code(&self, prompt: String) -> Result<Completion, AiError> {
        self.run(Capability::ExplainCode, prompt).await
    }

    pub async fn suggest_improvements(&self, prompt: String) -> Result<Completion, AiError> {
        self.run(Capability::SuggestImprovements, prompt).await
    }

    pub async fn generate_tests(&self, prompt: String) -> Result<Completion, AiError> {
        self.run(Capability::GenerateTests, prompt).await
    }

    async fn run(&self, capability: Capability, prompt: String) -> Result<Completion, AiError> {
        let Some(provider) = &self.provider else {
            return Err(AiError::not_configured());
        };

        let request = CompletionRequest {
            system: capability.system_prompt().to_string(),
            prompt,
            max_tokens: capability.max_tokens(),
        };

        let started = Instant::now();
        let result = provider.complete(request).await;
        let duration_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        match &result {
            Ok(completion) => tracing::info!(
                capability = capability.as_str(),
                model = %completion.model,
                input_tokens = completion.usage.input_tokens,
                output_tokens = completion.usage.output_tokens,
                duration_ms,
                "AI call completed"
            ),
            Err(err) => tracing::warn!(
                capability = capability.as_str(),
                model = provider.model(),
                kind = %err.kind,
                error = %err.message,
                duration_ms,
                "AI call failed"
            ),
        }
        result
    }
}

impl std::fmt::Debug for AiGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiGateway")
            .field("configured", &self.is_configured())
            .finish()
    }
}
