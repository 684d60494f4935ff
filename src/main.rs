use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use log::info;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

mod repl;

use rag_chat::config::{load_config, resolve_config_path, BASE_URL_ENV};
use rag_chat::{ChatController, ChatSession, HttpGateway, RequestGateway};
use repl::{spawn_input_thread, Output, PromptOutput, Repl, StdoutOutput};

#[derive(Parser)]
#[command(name = "rag-chat")]
#[command(about = "Terminal chat client for a RAG backend", long_about = None)]
struct Cli {
    /// Backend base URL, e.g. http://localhost:8080
    #[arg(long)]
    base_url: Option<String>,

    /// Config file to use instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Skip restoring earlier messages at start
    #[arg(long)]
    no_history: bool,
}

fn init_logging(level: &str) {
    // Logs go to stderr; the log facade is bridged by tracing-subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    let config_path = resolve_config_path(cli.config.as_deref())?;
    let config = load_config(&config_path)?
        .with_overrides(cli.base_url, std::env::var(BASE_URL_ENV).ok());
    info!(
        "[main] Using backend {} (config {})",
        config.base_url,
        config_path.display()
    );

    let gateway: Arc<dyn RequestGateway> = Arc::new(HttpGateway::new(config.base_url.clone()));
    let session = ChatSession::new(&config.greeting, config.initial_toggles());
    let controller = ChatController::new(session, gateway);

    println!("{}", "=== RAG Chat ===".bright_magenta().bold());
    println!(
        "{}",
        format!("Connected to {}. Type /help for commands.", config.base_url).bright_black()
    );

    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let input = spawn_input_thread(events_tx.clone());
    let output: Box<dyn Output> = match input.printer {
        Some(printer) => Box::new(PromptOutput(printer)),
        None => Box::new(StdoutOutput),
    };

    Repl::new(controller, config, config_path, events_tx, output)
        .run(events_rx, !cli.no_history)
        .await;

    let _ = input.handle.join();
    println!("{}", "Goodbye!".bright_green());
    Ok(())
}
