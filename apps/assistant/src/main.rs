mod career;
mod config;
mod dialogue;
mod errors;
mod llm_client;
mod models;
mod output;
mod repl;
mod state;
mod weather;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use anyhow::Result;
use tokio::io::BufReader;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::dialogue::DialogueEngine;
use crate::llm_client::LlmClient;
use crate::output::text_fragments;
use crate::state::AppState;
use crate::weather::OpenMeteoClient;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Logs go to stderr; stdout carries the conversation.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting assistant v{}", env!("CARGO_PKG_VERSION"));

    let mut stdout = std::io::stdout();

    if !config.has_api_key() {
        warn!("No API key in OPENAI_API_KEY or LLM_API_KEY; model replies are disabled");
        repl::render(text_fragments(repl::MISSING_KEY_WARNING), &mut stdout).await?;
    }

    let llm = LlmClient::new(&config);
    info!(
        "LLM client initialized (model: {}, endpoint: {})",
        llm.model(),
        config.base_url
    );

    let state = AppState {
        llm: Arc::new(llm),
        weather: Arc::new(OpenMeteoClient::new()),
        config,
    };
    let mut engine = DialogueEngine::new(&state);

    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Could not listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    repl::run(
        &mut engine,
        BufReader::new(tokio::io::stdin()),
        &mut stdout,
        interrupt,
    )
    .await?;

    info!("Assistant stopped");
    Ok(())
}
