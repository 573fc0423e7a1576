// config.rs

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "parlor.json";

pub const DEFAULT_WELCOME_MESSAGE: &str =
    "Hello! I'm your AI Assistant, powered by a JSON API. How can I help you today?";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot access config file: {0}")]
    Io(#[from] io::Error),

    #[error("invalid config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Represents the full configuration of the chat client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// URL the user's messages are POSTed to.
    pub endpoint: String,

    /// URL that clears the server-side conversation history.
    pub clear_endpoint: String,

    /// Whether resetting the chat also clears the server-side history.
    pub clear_remote_on_reset: bool,

    /// Delay between two typed characters, in milliseconds.
    pub typing_speed_ms: u64,

    /// Request timeout, in seconds.
    pub request_timeout_secs: u64,

    /// Text typed out on startup. `null` disables the greeting.
    pub welcome_message: Option<String>,

    /// Label of the greeting message.
    pub welcome_agent_name: String,

    /// Distance from the bottom (in lines) still treated as "at bottom".
    pub scroll_threshold: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8001/chat".to_string(),
            clear_endpoint: "http://localhost:8001/chat/clear".to_string(),
            clear_remote_on_reset: false,
            typing_speed_ms: 30,
            request_timeout_secs: 60,
            welcome_message: Some(DEFAULT_WELCOME_MESSAGE.to_string()),
            welcome_agent_name: "AI Assistant".to_string(),
            scroll_threshold: 3,
        }
    }
}

impl Config {
    pub fn typing_speed(&self) -> Duration {
        Duration::from_millis(self.typing_speed_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Loads a configuration from a JSON file.
    ///
    /// Fields missing from the file keep their default values.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        let config: Config = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Like [`Config::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::Io(e)) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            other => other,
        }
    }

    /// Saves the current configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}
