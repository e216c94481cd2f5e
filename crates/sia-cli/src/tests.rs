//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::fs;
use std::path::{Path, PathBuf};

use sia_core::{AIClient, Assistant, MockBackend, Prompt, PromptId, Role, Session, SiaConfig};
use tempfile::TempDir;

use crate::cli::SimulateArgs;
use crate::commands;

fn session_path(dir: &TempDir) -> PathBuf {
    dir.path().join("sia-session.json")
}

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn simulate_args(reference: Option<PathBuf>) -> SimulateArgs {
    SimulateArgs {
        crop: "Rice".to_string(),
        region: "North".to_string(),
        soil: "Loam".to_string(),
        weather: "Rainy".to_string(),
        temperature: 27.0,
        rainfall: 800.0,
        predicted_yield: 4.0,
        fertilizer: true,
        irrigation: false,
        reference,
    }
}

fn mock_assistant(reply: &str) -> Assistant {
    Assistant::new(
        Some(AIClient::Mock(MockBackend::with_reply(reply))),
        Prompt::embedded(PromptId::AssistantAnswer).unwrap(),
        &SiaConfig::default(),
    )
}

fn load(path: &Path) -> Session {
    Session::load(path).unwrap()
}

// ========== Config Tests ==========

#[test]
fn test_load_config_missing_explicit_path() {
    let result = commands::load_config(Some(Path::new("/nonexistent/sia.toml")));
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("Failed to load config"));
}

#[test]
fn test_load_config_explicit_path() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "sia.toml", "[costs]\nirrigation = 900.0\n");

    let config = commands::load_config(Some(&path)).unwrap();
    assert_eq!(config.pricing.irrigation_cost, 900.0);
}

#[test]
fn test_load_env_files_reads_existing_files_in_order() {
    let dir = TempDir::new().unwrap();
    let first = write_file(
        &dir,
        "first.env",
        "SIA_CLI_TEST_GROQ_KEY=gsk_from_dotenv\nSIA_CLI_TEST_SHARED=first\n",
    );
    let second = write_file(&dir, "second.env", "SIA_CLI_TEST_SHARED=second\n");
    let missing = dir.path().join("missing.env");

    let loaded =
        commands::load_env_files(&[first.clone(), missing, second.clone()]).unwrap();

    assert_eq!(loaded, vec![first, second]);
    assert_eq!(
        std::env::var("SIA_CLI_TEST_GROQ_KEY").unwrap(),
        "gsk_from_dotenv"
    );
    assert_eq!(std::env::var("SIA_CLI_TEST_SHARED").unwrap(), "first");
}

#[test]
fn test_load_env_files_rejects_malformed_file() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, ".env", "NOT A VALID LINE\n");

    assert!(commands::load_env_files(&[path]).is_err());
}

// ========== ROI Command Tests ==========

#[test]
fn test_cmd_roi() {
    let config = SiaConfig::default();
    assert!(commands::cmd_roi(&config, "Rice", 4.0, true, false, false).is_ok());
    assert!(commands::cmd_roi(&config, "Quinoa", 0.0, false, false, true).is_ok());
}

#[test]
fn test_cmd_prices() {
    assert!(commands::cmd_prices(&SiaConfig::default()).is_ok());
}

// ========== Analysis Command Tests ==========

#[test]
fn test_cmd_simulate_records_simulation_and_roi() {
    let dir = TempDir::new().unwrap();
    let session = session_path(&dir);
    let reference = write_file(&dir, "reference.csv", "2.0\n3.5\n4.5\n5.0\n");

    commands::cmd_simulate(&session, &SiaConfig::default(), &simulate_args(Some(reference)))
        .unwrap();

    let ctx = load(&session).context;
    assert_eq!(ctx.simulation.as_ref().map(|s| s.crop.as_str()), Some("Rice"));
    assert_eq!(ctx.roi.as_ref().map(|r| r.financial.net_profit), Some(1500.0));
    assert!(ctx.milk_forecast.is_none());
}

#[test]
fn test_cmd_simulate_rejects_negative_rainfall() {
    let dir = TempDir::new().unwrap();
    let session = session_path(&dir);
    let mut args = simulate_args(None);
    args.rainfall = -5.0;

    assert!(commands::cmd_simulate(&session, &SiaConfig::default(), &args).is_err());
    assert!(!session.exists());
}

#[test]
fn test_cmd_milk_keeps_simulation() {
    let dir = TempDir::new().unwrap();
    let session = session_path(&dir);
    commands::cmd_simulate(&session, &SiaConfig::default(), &simulate_args(None)).unwrap();

    let history = write_file(&dir, "history.csv", "100\n110\n120\n");
    let forecast = write_file(&dir, "forecast.csv", "130\n134\n");
    commands::cmd_milk(&session, &history, &forecast).unwrap();

    let ctx = load(&session).context;
    let milk = ctx.milk_forecast.unwrap();
    assert_eq!(milk.forecast_months, 2);
    assert_eq!(milk.historical_mean, 110.0);
    assert!(ctx.simulation.is_some());
    assert!(ctx.roi.is_some());
}

#[test]
fn test_cmd_milk_empty_forecast_fails() {
    let dir = TempDir::new().unwrap();
    let session = session_path(&dir);
    let history = write_file(&dir, "history.csv", "100\n");
    let forecast = write_file(&dir, "forecast.csv", "");

    assert!(commands::cmd_milk(&session, &history, &forecast).is_err());
}

#[test]
fn test_cmd_cattle() {
    let dir = TempDir::new().unwrap();
    let session = session_path(&dir);
    let metrics = write_file(
        &dir,
        "frames.csv",
        "frame,inference_secs,cows\n0,0.05,3\n1,0.04,5\n2,0.05,4\n",
    );

    commands::cmd_cattle(&session, &metrics, "pasture.mp4").unwrap();

    let cattle = load(&session).context.cattle_detection.unwrap();
    assert_eq!(cattle.frames_processed, 3);
    assert_eq!(cattle.max_count, 5);
    assert_eq!(cattle.filename, "pasture.mp4");
}

#[test]
fn test_cmd_cattle_missing_file() {
    let dir = TempDir::new().unwrap();
    let result = commands::cmd_cattle(
        &session_path(&dir),
        &dir.path().join("missing.csv"),
        "x.mp4",
    );
    assert!(result.unwrap_err().to_string().contains("Failed to open"));
}

// ========== Assistant Command Tests ==========

#[tokio::test]
async fn test_cmd_ask_appends_history() {
    let dir = TempDir::new().unwrap();
    let session = session_path(&dir);
    commands::cmd_simulate(&session, &SiaConfig::default(), &simulate_args(None)).unwrap();

    let assistant = mock_assistant("Check the soil pH.");
    commands::cmd_ask(&session, &assistant, "Is it worth it?")
        .await
        .unwrap();
    commands::cmd_ask(&session, &assistant, "Which pest hits rice?")
        .await
        .unwrap();

    let history = load(&session).history;
    assert_eq!(history.len(), 4);
    assert_eq!(history[0].role, Role::User);
    assert!(history[1].content.starts_with("ROI: 26.3%"));
    assert_eq!(history[3].content, "Check the soil pH.");
}

#[tokio::test]
async fn test_cmd_ask_rejects_blank_question() {
    let dir = TempDir::new().unwrap();
    let assistant = mock_assistant("unused");
    assert!(commands::cmd_ask(&session_path(&dir), &assistant, "   ")
        .await
        .is_err());
}

#[tokio::test]
async fn test_cmd_history_clear_keeps_context() {
    let dir = TempDir::new().unwrap();
    let session = session_path(&dir);
    commands::cmd_simulate(&session, &SiaConfig::default(), &simulate_args(None)).unwrap();
    commands::cmd_ask(&session, &mock_assistant("ok"), "resumo")
        .await
        .unwrap();

    assert!(commands::cmd_history_show(&session).is_ok());
    commands::cmd_history_clear(&session).unwrap();

    let loaded = load(&session);
    assert!(loaded.history.is_empty());
    assert!(loaded.context.simulation.is_some());
}

// ========== Context Command Tests ==========

#[test]
fn test_cmd_context_show_and_clear() {
    let dir = TempDir::new().unwrap();
    let session = session_path(&dir);

    assert!(commands::cmd_context_show(&session, false).is_ok());

    commands::cmd_simulate(&session, &SiaConfig::default(), &simulate_args(None)).unwrap();
    assert!(commands::cmd_context_show(&session, false).is_ok());
    assert!(commands::cmd_context_show(&session, true).is_ok());

    commands::cmd_context_clear(&session).unwrap();
    assert!(load(&session).context.is_empty());
}

#[test]
fn test_cmd_prompts_list() {
    assert!(commands::cmd_prompts_list().is_ok());
}
