use anyhow::Result;
use clap::Parser;
use std::io::{self, BufWriter};
use storybook_generator::app::App;
use storybook_generator::input::collect_inputs;
use storybook_generator::models::Config;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "storybook-generator", version)]
#[command(about = "Turn a family memory into an illustrated PDF storybook")]
struct CliArgs {}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storybook_generator=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let _args = CliArgs::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let inputs = {
        let stdin = io::stdin();
        let mut stdout = BufWriter::new(io::stdout());
        match collect_inputs(&mut stdin.lock(), &mut stdout) {
            Ok(inputs) => inputs,
            Err(e) => {
                error!("Failed to read story details: {}", e);
                std::process::exit(1);
            }
        }
    };

    info!("Starting storybook-generator");

    match App::new(&config).run(&inputs).await {
        Ok(path) => {
            info!("Storybook written to {}", path.display());
            Ok(())
        }
        Err(e) => {
            error!("Generation failed: {}", e);
            std::process::exit(1);
        }
    }
}
