//! Contextual assistant
//!
//! Answers a free-text question from the analysis context. Deterministic
//! rules (see [`rules`]) handle the common questions; anything they do not
//! cover goes to the remote model together with the whole context as JSON.
//! `respond` never fails: missing credentials and remote errors become fixed
//! user-facing messages.

pub mod rules;

use std::collections::HashMap;

pub use rules::{answer, match_rule, RuleKind, NO_ANALYSIS_MESSAGE};

use crate::ai::{AIBackend, AIClient};
use crate::config::{AssistantSettings, PricingConfig, SiaConfig};
use crate::context::AnalysisContext;
use crate::error::{Error, Result};
use crate::prompts::{Prompt, PromptId, PromptLibrary};

/// Reply when nothing has been analyzed and no model is configured
pub const MISSING_KEY_MESSAGE: &str =
    "Configure GROQ_API_KEY (environment or .env file) to enable the assistant.";

/// Reply when nothing has been analyzed and the model call fails
pub const CONNECTION_ERROR_MESSAGE: &str = "Could not connect to the language model API.";

/// Reply to an open question when no model is configured
pub const ADVANCED_KEY_MESSAGE: &str = "Configure GROQ_API_KEY to ask advanced questions.";

/// Context handed to the model before any analysis has run
pub const EMPTY_CONTEXT_PLACEHOLDER: &str = "No analysis available";

/// Rule-based responder with a remote model fallback
#[derive(Clone)]
pub struct Assistant {
    ai: Option<AIClient>,
    prompt: Prompt,
    settings: AssistantSettings,
    pricing: PricingConfig,
}

impl Assistant {
    /// Build an assistant; `ai` is None when no credential is configured
    pub fn new(ai: Option<AIClient>, prompt: Prompt, config: &SiaConfig) -> Self {
        let settings = config.assistant.clone();
        let ai = ai.map(|client| client.with_temperature(settings.temperature));
        Self {
            ai,
            prompt,
            settings,
            pricing: config.pricing.clone(),
        }
    }

    /// Backend from the environment, prompt from the library
    pub fn from_env(config: &SiaConfig, prompts: &mut PromptLibrary) -> Result<Self> {
        let prompt = prompts.get(PromptId::AssistantAnswer)?.clone();
        Ok(Self::new(AIClient::from_env(), prompt, config))
    }

    pub fn ai(&self) -> Option<&AIClient> {
        self.ai.as_ref()
    }

    /// Answer `question` from `context`
    pub async fn respond(&self, question: &str, context: Option<&AnalysisContext>) -> String {
        let Some(ctx) = context.filter(|c| !c.is_empty()) else {
            return self.respond_without_context(question).await;
        };

        if let Some(kind) = match_rule(question, ctx) {
            if let Some(text) = answer(kind, ctx, &self.settings, &self.pricing) {
                tracing::debug!(rule = ?kind, "Answered from context");
                return text;
            }
        }

        let Some(ai) = &self.ai else {
            return ADVANCED_KEY_MESSAGE.to_string();
        };

        match self.ask_model(ai, &ctx.to_prompt_json(), question).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, model = ai.model(), "Model call failed");
                format!(
                    "Error: {}",
                    truncate_chars(&error_detail(e), self.settings.error_detail_max_chars)
                )
            }
        }
    }

    async fn respond_without_context(&self, question: &str) -> String {
        let Some(ai) = &self.ai else {
            return MISSING_KEY_MESSAGE.to_string();
        };

        match self.ask_model(ai, EMPTY_CONTEXT_PLACEHOLDER, question).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, host = ai.host(), "Model unreachable");
                CONNECTION_ERROR_MESSAGE.to_string()
            }
        }
    }

    async fn ask_model(&self, ai: &AIClient, context: &str, question: &str) -> Result<String> {
        let vars: HashMap<&str, &str> = [
            ("language", self.settings.language.as_str()),
            ("context", context),
            ("question", question),
        ]
        .into_iter()
        .collect();

        let system = self.prompt.render_system(&vars);
        let user = self.prompt.render_user(&vars);
        ai.generate(system.as_deref(), &user).await
    }
}

fn error_detail(error: Error) -> String {
    match error {
        Error::Remote(detail) => detail,
        other => other.to_string(),
    }
}

/// First `max` characters of `text`
fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
