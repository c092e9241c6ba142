//! AI consultation and backend status commands

use anyhow::Result;
use obra_core::{AIBackend, AIClient, AppConfig};

use super::core::{open_advisor, open_catalog};

/// Ask the AI backend about one item
pub async fn cmd_consult(config: &AppConfig, item: &str) -> Result<()> {
    let catalog = open_catalog(config)?;
    let Some(advisor) = open_advisor(config) else {
        return Ok(());
    };

    let text = advisor.consult_item(&catalog, item).await?;
    println!("{}", text);
    Ok(())
}

/// Show the configured backend and whether it answers
pub async fn cmd_ai(config: &AppConfig) -> Result<()> {
    println!("🔍 Checking AI backend...\n");
    println!("  Backend: {}", config.ai.backend);

    let Some(client) = AIClient::from_config(&config.ai) else {
        println!("  ⚠️  Not configured\n");
        println!("To enable AI advice, set one of:");
        println!("  export OPENAI_API_KEY=sk-...                      (OpenAI API)");
        println!("  export OPENAI_COMPATIBLE_HOST=http://localhost:8000 (vLLM, LocalAI, llama-server)");
        println!("  export AI_BACKEND=ollama OLLAMA_HOST=http://localhost:11434");
        return Ok(());
    };

    let info = client.info();
    println!("  Kind: {}", info.kind);
    println!("  Model: {}", info.model);
    println!("  Host: {}", info.host);
    println!("  Temperature: {} (analysis)", config.ai.temperature);
    println!(
        "  Max tokens: {} (analysis), {} (consultation)",
        config.ai.max_tokens, config.ai.consult_max_tokens
    );

    print!("\nChecking availability... ");
    if client.health_check().await {
        println!("✅ Connected");
    } else {
        println!("❌ Failed");
        println!("\n⚠️  Could not reach {}", info.host);
    }

    Ok(())
}
