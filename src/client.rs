// client.rs
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Body of a chat request.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub user_message: &'a str,
}

/// Body of a chat reply.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatReply {
    pub role: String,
    pub content: String,
}

/// Ways a chat exchange can fail. `Display` is what ends up in the chat.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    Transport(#[source] reqwest::Error),

    #[error("{}", status_text(.status, .body))]
    Status { status: u16, body: String },

    #[error("{0}")]
    Decode(#[source] serde_json::Error),
}

fn status_text(status: &u16, body: &str) -> String {
    if body.trim().is_empty() {
        format!("API request failed with status {}", status)
    } else {
        body.to_string()
    }
}

/// Thin HTTP client for the chat endpoint.
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    endpoint: String,
    clear_endpoint: String,
}

impl ChatClient {
    pub fn new(
        endpoint: impl Into<String>,
        clear_endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ClientError::Transport)?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
            clear_endpoint: clear_endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Posts one user message and returns the assistant reply.
    pub async fn send(&self, user_message: &str) -> Result<ChatReply, ClientError> {
        info!("POST {} ({} chars)", self.endpoint, user_message.chars().count());
        let response = self
            .http
            .post(&self.endpoint)
            .json(&ChatRequest { user_message })
            .send()
            .await
            .map_err(ClientError::Transport)?;

        let status = response.status();
        let body = response.text().await.map_err(ClientError::Transport)?;
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let reply: ChatReply = serde_json::from_str(&body).map_err(ClientError::Decode)?;
        debug!("reply role={} ({} chars)", reply.role, reply.content.chars().count());
        Ok(reply)
    }

    /// Asks the server to forget its conversation history.
    pub async fn clear_history(&self) -> Result<(), ClientError> {
        info!("POST {}", self.clear_endpoint);
        let response = self
            .http
            .post(&self.clear_endpoint)
            .send()
            .await
            .map_err(ClientError::Transport)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.map_err(ClientError::Transport)?;
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}
