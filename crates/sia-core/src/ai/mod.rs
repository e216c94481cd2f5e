//! Pluggable remote language model backend
//!
//! The assistant only needs one operation from a model: turn a system
//! instruction and a user prompt into text. Rules that can be answered from
//! the analysis context never reach this module.
//!
//! # Architecture
//!
//! - `AIBackend` trait: the interface every backend implements
//! - `AIClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `OpenAICompatibleBackend` (Groq and any
//!   OpenAI-compatible server), `MockBackend`
//!
//! # Configuration
//!
//! Environment variables:
//! - `AI_BACKEND`: Backend to use (groq, openai_compatible, mock). Default: groq
//! - `GROQ_API_KEY`: Groq key (required for groq)
//! - `GROQ_MODEL`: Model name (default: llama-3.3-70b-versatile)
//! - `GROQ_HOST`: API base URL (default: https://api.groq.com/openai)
//! - `OPENAI_COMPATIBLE_HOST`: Server URL (required for openai_compatible)
//! - `OPENAI_COMPATIBLE_MODEL`: Model name (default: gpt-3.5-turbo)
//! - `OPENAI_COMPATIBLE_API_KEY`: API key if required (optional)

mod mock;
mod openai_compatible;

pub use mock::{MockBackend, MockReply};
pub use openai_compatible::OpenAICompatibleBackend;

use async_trait::async_trait;

use crate::error::Result;

/// Default Groq API base (the backend appends `/v1/chat/completions`)
pub const GROQ_DEFAULT_HOST: &str = "https://api.groq.com/openai";

/// Default Groq model
pub const GROQ_DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Value shipped in the sample `.env`; treated as "no key"
pub const PLACEHOLDER_API_KEY: &str = "your_groq_api_key_here";

/// Trait defining the interface for all AI backends
///
/// Backends should be Send + Sync to allow use across async tasks.
#[async_trait]
pub trait AIBackend: Send + Sync {
    /// Generate a completion for `prompt`, optionally under a system instruction
    async fn generate(&self, system: Option<&str>, prompt: &str) -> Result<String>;

    /// Check if the backend is available
    async fn health_check(&self) -> bool;

    /// Get the model name
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete AI client enum
#[derive(Clone)]
pub enum AIClient {
    /// Groq or any other server implementing `/v1/chat/completions`
    OpenAICompatible(OpenAICompatibleBackend),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl AIClient {
    /// Create an AI client from environment variables
    ///
    /// Returns None when the selected backend has no usable credential or host.
    pub fn from_env() -> Option<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create an AI client from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Option<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = lookup("AI_BACKEND").unwrap_or_else(|| "groq".to_string());

        match backend.to_lowercase().as_str() {
            "groq" => groq_from_lookup(&lookup),
            "openai_compatible" | "openai" | "vllm" | "localai" | "llamacpp" => {
                OpenAICompatibleBackend::from_lookup(&lookup).map(AIClient::OpenAICompatible)
            }
            "mock" => Some(AIClient::Mock(MockBackend::new())),
            _ => {
                tracing::warn!(backend = %backend, "Unknown AI_BACKEND, falling back to groq");
                groq_from_lookup(&lookup)
            }
        }
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        AIClient::Mock(MockBackend::new())
    }

    /// Create a new instance with a different sampling temperature
    pub fn with_temperature(&self, temperature: f32) -> Self {
        match self {
            AIClient::OpenAICompatible(b) => {
                AIClient::OpenAICompatible(b.with_temperature(temperature))
            }
            AIClient::Mock(b) => AIClient::Mock(b.clone()),
        }
    }
}

/// Whether an API key is set to something other than blank or the placeholder
pub fn is_usable_key(key: &str) -> bool {
    let key = key.trim();
    !key.is_empty() && key != PLACEHOLDER_API_KEY
}

fn groq_from_lookup<F>(lookup: &F) -> Option<AIClient>
where
    F: Fn(&str) -> Option<String>,
{
    let api_key = lookup("GROQ_API_KEY").filter(|k| is_usable_key(k))?;
    let host = lookup("GROQ_HOST").unwrap_or_else(|| GROQ_DEFAULT_HOST.to_string());
    let model = lookup("GROQ_MODEL").unwrap_or_else(|| GROQ_DEFAULT_MODEL.to_string());

    Some(AIClient::OpenAICompatible(
        OpenAICompatibleBackend::with_api_key(&host, &model, api_key.trim()),
    ))
}

// Implement AIBackend for AIClient by delegating to the inner backend
#[async_trait]
impl AIBackend for AIClient {
    async fn generate(&self, system: Option<&str>, prompt: &str) -> Result<String> {
        match self {
            AIClient::OpenAICompatible(b) => b.generate(system, prompt).await,
            AIClient::Mock(b) => b.generate(system, prompt).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            AIClient::OpenAICompatible(b) => b.health_check().await,
            AIClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            AIClient::OpenAICompatible(b) => b.model(),
            AIClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            AIClient::OpenAICompatible(b) => b.host(),
            AIClient::Mock(b) => b.host(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_ai_client_mock() {
        let client = AIClient::mock();
        assert_eq!(client.model(), "mock");
        assert_eq!(client.host(), "mock://localhost");
    }

    #[test]
    fn test_groq_is_default_backend() {
        let client = AIClient::from_lookup(lookup_from(&[("GROQ_API_KEY", "gsk_test")])).unwrap();
        assert_eq!(client.model(), GROQ_DEFAULT_MODEL);
        assert_eq!(client.host(), GROQ_DEFAULT_HOST);
    }

    #[test]
    fn test_groq_overrides() {
        let client = AIClient::from_lookup(lookup_from(&[
            ("AI_BACKEND", "GROQ"),
            ("GROQ_API_KEY", "gsk_test"),
            ("GROQ_MODEL", "llama-3.1-8b-instant"),
            ("GROQ_HOST", "http://localhost:9000/"),
        ]))
        .unwrap();
        assert_eq!(client.model(), "llama-3.1-8b-instant");
        assert_eq!(client.host(), "http://localhost:9000");
    }

    #[test]
    fn test_missing_or_placeholder_key_means_no_client() {
        assert!(AIClient::from_lookup(lookup_from(&[])).is_none());
        assert!(AIClient::from_lookup(lookup_from(&[("GROQ_API_KEY", "  ")])).is_none());
        assert!(
            AIClient::from_lookup(lookup_from(&[("GROQ_API_KEY", PLACEHOLDER_API_KEY)])).is_none()
        );
    }

    #[test]
    fn test_openai_compatible_needs_host() {
        let lookup = lookup_from(&[("AI_BACKEND", "openai_compatible")]);
        assert!(AIClient::from_lookup(lookup).is_none());

        let client = AIClient::from_lookup(lookup_from(&[
            ("AI_BACKEND", "vllm"),
            ("OPENAI_COMPATIBLE_HOST", "http://localhost:8000"),
        ]))
        .unwrap();
        assert_eq!(client.model(), "gpt-3.5-turbo");
    }

    #[test]
    fn test_unknown_backend_falls_back_to_groq() {
        let client = AIClient::from_lookup(lookup_from(&[
            ("AI_BACKEND", "carrier-pigeon"),
            ("GROQ_API_KEY", "gsk_test"),
        ]))
        .unwrap();
        assert_eq!(client.host(), GROQ_DEFAULT_HOST);
    }

    #[test]
    fn test_is_usable_key() {
        assert!(is_usable_key("gsk_abc"));
        assert!(!is_usable_key(""));
        assert!(!is_usable_key(PLACEHOLDER_API_KEY));
    }

    #[tokio::test]
    async fn test_mock_health_check() {
        let client = AIClient::from_lookup(lookup_from(&[("AI_BACKEND", "mock")])).unwrap();
        assert!(client.health_check().await);
    }
}
