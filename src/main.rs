use anyhow::Result;
use clap::{Parser, Subcommand};

mod app;
mod config;
mod events;
mod llm;
mod models;
mod ui;

use app::App;
use config::Config;

#[derive(Parser)]
#[command(name = "edullama")]
#[command(version = "0.1.0")]
#[command(about = "Terminal chat for local Ollama models", long_about = None)]
struct Cli {
    /// Inference endpoint to POST prompts to
    #[arg(long)]
    endpoint: Option<String>,

    /// Model id to start with
    #[arg(long)]
    model: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available models
    Models,
}

fn list_models() {
    println!("🧠 Available models:\n");
    for entry in models::AVAILABLE_MODELS {
        println!("  • {} ({})", entry.name, entry.id);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(Commands::Models) = cli.command {
        list_models();
        return Ok(());
    }

    let mut config = Config::load()?;
    if let Some(endpoint) = cli.endpoint {
        config.endpoint = endpoint;
    }
    if let Some(model) = cli.model {
        config.default_model = model;
    }

    App::new(config).run().await
}
