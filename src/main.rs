// main.rs

// Module declarations
mod app;
mod client;
mod config;
mod event;
mod input;
mod logging;
mod message;
mod oneshot;
mod scroll;
mod state;
mod terminal;
mod typing;
mod ui;

use crate::app::App;
use crate::client::ChatClient;
use crate::config::{Config, DEFAULT_CONFIG_PATH};
use clap::Parser;
use log::info;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "parlor")]
#[command(about = "Terminal chat client for a JSON chat endpoint")]
#[command(version)]
struct Cli {
    /// Config file (JSON). Defaults to ./parlor.json when present.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Chat endpoint URL
    #[arg(short, long, env = "PARLOR_ENDPOINT")]
    endpoint: Option<String>,

    /// Milliseconds per typed character
    #[arg(long, value_name = "MS")]
    typing_speed: Option<u64>,

    /// Send a single message, print the reply and exit
    #[arg(long, value_name = "MESSAGE")]
    once: Option<String>,

    /// Write the effective configuration to PATH and exit
    #[arg(long, value_name = "PATH")]
    write_config: Option<PathBuf>,
}

impl Cli {
    fn resolve_config(&self) -> Result<Config, config::ConfigError> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::load_or_default(Path::new(DEFAULT_CONFIG_PATH))?,
        };
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(speed) = self.typing_speed {
            config.typing_speed_ms = speed;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    logging::init();

    let cli = Cli::parse();
    let config = cli.resolve_config()?;
    info!("config: {:?}", config);

    if let Some(path) = &cli.write_config {
        config.save(path)?;
        println!("Configuration written to {}", path.display());
        return Ok(());
    }

    let client = ChatClient::new(
        &config.endpoint,
        &config.clear_endpoint,
        config.request_timeout(),
    )?;

    if let Some(message) = &cli.once {
        if oneshot::run(&client, message).await.is_err() {
            std::process::exit(1);
        }
        return Ok(());
    }

    let mut terminal = terminal::init()?;
    let mut app = App::new(config, client);
    app.start();
    let result = app.run(&mut terminal).await;
    terminal::restore()?;
    result?;
    Ok(())
}
