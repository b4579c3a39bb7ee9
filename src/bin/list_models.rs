//! Print the Gemini models available to the configured key that support
//! `generateContent`.

use anyhow::{Context, Result};
use clap::Parser;
use std::time::Duration;
use storybook_generator::ai::gemini::GeminiHttpClient;
use storybook_generator::models::{Config, DEFAULT_STORY_MODEL};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "list_models")]
#[command(about = "List Gemini models that support generateContent")]
struct CliArgs {
    /// Print every model, not just those supporting generateContent.
    #[arg(long)]
    all: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storybook_generator=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();
    let config = Config::from_env().context("Failed to load configuration")?;

    let client = GeminiHttpClient::new(
        config.gemini_api_key,
        DEFAULT_STORY_MODEL.to_string(),
        Duration::from_secs(30),
    );
    let models = client.list_models().await.context("Failed to list models")?;

    let mut shown = 0;
    for model in &models {
        let generates = model
            .supported_generation_methods
            .iter()
            .any(|m| m == "generateContent");
        if !args.all && !generates {
            continue;
        }
        let name = model.name.strip_prefix("models/").unwrap_or(&model.name);
        match &model.display_name {
            Some(display) => println!("{:<40} {}", name, display),
            None => println!("{}", name),
        }
        shown += 1;
    }

    println!("\n{} of {} models listed", shown, models.len());
    Ok(())
}
