//! Verify the API key with one text and one image generation round-trip.

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use storybook_generator::ai::{GeminiIllustrationClient, GeminiStoryClient};
use storybook_generator::diagnostics::check_connection;
use storybook_generator::models::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "check_connection")]
#[command(about = "Check text and image generation against the configured Gemini models")]
struct CliArgs {
    /// Save the generated test image to this path.
    #[arg(long, value_name = "PATH")]
    save: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storybook_generator=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = CliArgs::parse();
    let config = Config::from_env().context("Failed to load configuration")?;

    let http_client = reqwest::Client::new();
    let story = GeminiStoryClient::new_with_client(
        config.gemini_api_key.clone(),
        config.story_model.clone(),
        http_client.clone(),
    );
    let illustrator = GeminiIllustrationClient::new_with_client(
        config.gemini_api_key,
        config.image_model.clone(),
        http_client,
    );

    let report = check_connection(&story, &illustrator).await;

    match &report.text {
        Ok(text) => println!("[ok]   text  ({}): {}", config.story_model, text.trim()),
        Err(e) => println!("[fail] text  ({}): {}", config.story_model, e),
    }
    match &report.image {
        Ok(bytes) => {
            println!(
                "[ok]   image ({}): {} bytes, {}",
                config.image_model,
                bytes.len(),
                report.image_mime().unwrap_or("unknown format")
            );
            if let Some(path) = &args.save {
                std::fs::write(path, bytes)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!("       saved to {}", path.display());
            }
        }
        Err(e) => println!("[fail] image ({}): {}", config.image_model, e),
    }

    if !report.is_success() {
        bail!("Connection check failed");
    }
    Ok(())
}
