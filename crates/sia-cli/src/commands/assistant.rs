//! Assistant commands: ask questions, show or clear the chat history

use std::path::Path;

use anyhow::{bail, Result};
use sia_core::{Assistant, Role};

use super::{open_session, save_session};

pub async fn cmd_ask(session_path: &Path, assistant: &Assistant, question: &str) -> Result<()> {
    let question = question.trim();
    if question.is_empty() {
        bail!("Question cannot be empty");
    }

    let mut session = open_session(session_path)?;
    if session.context.is_empty() {
        println!("💡 Tip: no analyses in this session yet (see `sia simulate`, `sia milk`, `sia cattle`)");
        println!();
    }

    let reply = session.ask(assistant, question).await.content.clone();
    save_session(session_path, &session)?;

    println!("{}", reply);
    Ok(())
}

pub fn cmd_history_show(session_path: &Path) -> Result<()> {
    let session = open_session(session_path)?;

    if session.history.is_empty() {
        println!("No messages yet.");
        return Ok(());
    }

    for message in &session.history {
        let who = match message.role {
            Role::User => "You",
            Role::Assistant => "SIA",
        };
        println!("[{}] {}:", message.at.format("%Y-%m-%d %H:%M"), who);
        println!("{}", message.content);
        println!();
    }
    Ok(())
}

pub fn cmd_history_clear(session_path: &Path) -> Result<()> {
    let mut session = open_session(session_path)?;
    let removed = session.history.len();
    session.clear_history();
    save_session(session_path, &session)?;

    println!("Cleared {} messages (analyses kept)", removed);
    Ok(())
}
