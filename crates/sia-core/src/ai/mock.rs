//! Mock backend for testing
//!
//! Useful for unit tests and development without a model server or API key.

use async_trait::async_trait;

use crate::error::{Error, Result};

use super::AIBackend;

/// What the mock answers with
#[derive(Debug, Clone, PartialEq)]
pub enum MockReply {
    /// Echo the user prompt back, prefixed with `[mock]`
    Echo,
    /// Always return this text
    Fixed(String),
    /// Always fail with this remote error
    Fail(String),
}

/// Mock AI backend for testing
#[derive(Debug, Clone)]
pub struct MockBackend {
    /// Whether health_check should return true
    pub healthy: bool,
    pub reply: MockReply,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    /// Create a new mock backend (healthy, echoing)
    pub fn new() -> Self {
        Self {
            healthy: true,
            reply: MockReply::Echo,
        }
    }

    /// Always answer with `text`
    pub fn with_reply(text: &str) -> Self {
        Self {
            healthy: true,
            reply: MockReply::Fixed(text.to_string()),
        }
    }

    /// Fail every generation with `message` (and report unhealthy)
    pub fn failing(message: &str) -> Self {
        Self {
            healthy: false,
            reply: MockReply::Fail(message.to_string()),
        }
    }
}

#[async_trait]
impl AIBackend for MockBackend {
    async fn generate(&self, _system: Option<&str>, prompt: &str) -> Result<String> {
        match &self.reply {
            MockReply::Echo => Ok(format!("[mock] {}", prompt)),
            MockReply::Fixed(text) => Ok(text.clone()),
            MockReply::Fail(message) => Err(Error::Remote(message.clone())),
        }
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
