//! Server command implementation

use anyhow::Result;
use sia_core::ai::AIBackend;
use sia_core::SiaConfig;

use super::build_assistant;

pub async fn cmd_serve(config: SiaConfig, host: &str, port: u16) -> Result<()> {
    let assistant = build_assistant(&config)?;

    println!("🚀 Starting SIA web server...");
    println!("   Listening: http://{}:{}", host, port);
    match &config.source {
        Some(path) => println!("   Config: {}", path.display()),
        None => println!("   Config: built-in defaults"),
    }
    match assistant.ai() {
        Some(ai) => println!("   🤖 Assistant model: {} ({})", ai.model(), ai.host()),
        None => {
            println!("   💡 Tip: Set GROQ_API_KEY to let the assistant answer open questions")
        }
    }

    let allowed_origins: Vec<String> = std::env::var("SIA_ALLOWED_ORIGINS")
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if !allowed_origins.is_empty() {
        println!("   🌐 CORS origins: {}", allowed_origins.join(", "));
    }

    println!();
    println!("   Press Ctrl+C to stop");

    let server_config = sia_server::ServerConfig { allowed_origins };
    sia_server::serve(config, assistant, host, port, server_config).await?;

    Ok(())
}
