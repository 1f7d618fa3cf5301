use std::sync::Arc;

use crb_chai::ChaiClient;

use crb_core::{
    activation::ActivationRegistry,
    config::Config,
    conversation::{ConversationStore, Turn},
    model::ChatRequest,
};

const USAGE: &str = "usage: crb [probe]";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    crb_core::logging::init("crb")?;

    let cfg = Arc::new(Config::load()?);

    match std::env::args().nth(1).as_deref() {
        None | Some("run") => run(cfg).await,
        Some("probe") => probe(&cfg).await,
        Some(other) => anyhow::bail!("unknown subcommand {other:?}\n{USAGE}"),
    }
}

async fn run(cfg: Arc<Config>) -> anyhow::Result<()> {
    // Fail before touching the network when the token is missing.
    cfg.telegram_bot_token()?;

    let model = Arc::new(ChaiClient::from_config(&cfg)?);
    tracing::info!(endpoint = model.url(), "starting Telegram bot");

    crb_telegram::router::run_polling(
        cfg,
        model,
        Arc::new(ConversationStore::new()),
        Arc::new(ActivationRegistry::new()),
    )
    .await
}

/// Send a canned conversation to the endpoint and print the raw response.
async fn probe(cfg: &Config) -> anyhow::Result<()> {
    let client = ChaiClient::from_config(cfg)?;
    let req = ChatRequest {
        prompt: "An engaging conversation with ChatBot.".to_string(),
        bot_name: "ChatBot".to_string(),
        user_name: "User".to_string(),
        chat_history: vec![
            Turn::new("ChatBot", "Hi there! How can I help you today?"),
            Turn::new("User", "Tell me a joke!"),
        ],
    };

    tracing::info!(endpoint = client.url(), "making API request");
    let body = match client.call(&req).await {
        Ok(body) => body,
        Err(e) => serde_json::json!({ "error": e.to_string() }),
    };

    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}
