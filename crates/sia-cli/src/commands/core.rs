//! Shared utilities for command implementations
//!
//! - `load_env_files` - Pull credentials from `.env` files into the environment
//! - `load_config` - Resolve `--config`, the data dir override, or defaults
//! - `open_session` / `save_session` - Session file access
//! - `build_assistant` - Assistant from the environment and prompt library

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sia_core::ai::AIBackend;
use sia_core::{Assistant, PromptLibrary, Session, SiaConfig};

/// Load every existing `.env` file, returning the ones that were read
///
/// Earlier files take precedence since values already set are kept.
pub fn load_env_files(candidates: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut loaded = Vec::new();
    for path in candidates {
        if sia_core::config::load_env_file(path)? {
            loaded.push(path.clone());
        }
    }
    Ok(loaded)
}

pub fn load_config(path: Option<&Path>) -> Result<SiaConfig> {
    let config = match path {
        Some(path) => SiaConfig::load_from(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => SiaConfig::load().context("Failed to load config")?,
    };

    if let Some(source) = &config.source {
        tracing::debug!(path = %source.display(), "Using config override");
    }
    Ok(config)
}

pub fn open_session(path: &Path) -> Result<Session> {
    Session::load(path).with_context(|| format!("Failed to read session {}", path.display()))
}

pub fn save_session(path: &Path, session: &Session) -> Result<()> {
    session
        .save(path)
        .with_context(|| format!("Failed to write session {}", path.display()))
}

pub fn build_assistant(config: &SiaConfig) -> Result<Assistant> {
    let mut prompts = PromptLibrary::new();
    let assistant =
        Assistant::from_env(config, &mut prompts).context("Failed to load assistant prompt")?;

    match assistant.ai() {
        Some(ai) => tracing::debug!(model = ai.model(), host = ai.host(), "Remote model enabled"),
        None => tracing::debug!("No remote model configured, rules only"),
    }
    Ok(assistant)
}
