//! Chat session: analysis context plus message history
//!
//! The CLI keeps one session in a JSON file between invocations; the server
//! keeps many in memory. Either way, the assistant only ever reads the
//! context, the history is for display.

use std::fs;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::assistant::Assistant;
use crate::context::AnalysisContext;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub context: AnalysisContext,
    #[serde(default)]
    pub history: Vec<ChatMessage>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a session file; a missing file is a fresh session
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Write the session atomically (temp file in the same dir, then rename)
    pub fn save(&self, path: &Path) -> Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let json = serde_json::to_string_pretty(self)?;
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.flush()?;
        tmp.persist(path).map_err(|e| e.error)?;

        tracing::debug!(path = %path.display(), messages = self.history.len(), "Saved session");
        Ok(())
    }

    /// Ask the assistant about the current context and record both turns
    pub async fn ask(&mut self, assistant: &Assistant, question: &str) -> &ChatMessage {
        self.history.push(ChatMessage::new(Role::User, question));
        let reply = assistant.respond(question, Some(&self.context)).await;
        self.push_reply(reply)
    }

    /// Record an assistant reply computed elsewhere
    pub fn push_reply(&mut self, reply: String) -> &ChatMessage {
        let index = self.history.len();
        self.history.push(ChatMessage::new(Role::Assistant, reply));
        &self.history[index]
    }

    /// Empty the history, keeping the analyses
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Keep only the newest `max_messages` entries
    pub fn trim_history(&mut self, max_messages: usize) {
        if self.history.len() > max_messages {
            let excess = self.history.len() - max_messages;
            self.history.drain(..excess);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{AIClient, MockBackend};
    use crate::config::SiaConfig;
    use crate::context::CattleDetectionSection;
    use crate::prompts::{Prompt, PromptId};

    fn assistant() -> Assistant {
        Assistant::new(
            Some(AIClient::Mock(MockBackend::with_reply("model answer"))),
            Prompt::embedded(PromptId::AssistantAnswer).unwrap(),
            &SiaConfig::default(),
        )
    }

    fn with_cattle() -> Session {
        let mut session = Session::new();
        session.context.set_cattle_detection(CattleDetectionSection {
            frames_processed: 5,
            mean_count: 1.2,
            max_count: 2,
            mean_fps: 30.0,
            filename: "gate.mp4".to_string(),
        });
        session
    }

    #[tokio::test]
    async fn test_ask_records_both_turns() {
        let mut session = with_cattle();
        let reply = session.ask(&assistant(), "How many cows?").await.clone();

        assert_eq!(reply.role, Role::Assistant);
        assert!(reply.content.starts_with("Herd analysis:"));
        assert_eq!(session.history.len(), 2);
        assert_eq!(session.history[0].role, Role::User);
        assert_eq!(session.history[0].content, "How many cows?");
    }

    #[tokio::test]
    async fn test_clear_history_keeps_context() {
        let mut session = with_cattle();
        session.ask(&assistant(), "Which breed is this?").await;
        session.clear_history();

        assert!(session.history.is_empty());
        assert!(session.context.cattle_detection.is_some());
    }

    #[test]
    fn test_trim_history_keeps_newest() {
        let mut session = Session::new();
        for i in 0..6 {
            session.history.push(ChatMessage::new(Role::User, i.to_string()));
        }
        session.trim_history(4);

        let contents: Vec<&str> = session.history.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["2", "3", "4", "5"]);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut session = with_cattle();
        session.push_reply("hello".to_string());
        session.save(&path).unwrap();

        let loaded = Session::load(&path).unwrap();
        assert_eq!(loaded, session);
    }

    #[test]
    fn test_load_missing_file_is_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let session = Session::load(&dir.path().join("absent.json")).unwrap();
        assert!(session.context.is_empty());
        assert!(session.history.is_empty());
    }

    #[test]
    fn test_load_corrupt_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            Session::load(&path),
            Err(crate::error::Error::Json(_))
        ));
    }
}
