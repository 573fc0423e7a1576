// oneshot.rs
use crate::client::{ChatClient, ChatReply, ClientError};
use crate::message::Message;
use colored::*;

fn user_line(text: &str) -> String {
    format!("{} {}", "you:".bright_white().bold(), text)
}

fn reply_line(reply: &ChatReply) -> String {
    let label = format!("{}:", reply.role);
    format!("{} {}", label.as_str().bright_green(), reply.content)
}

fn error_line(err: &ClientError) -> String {
    let message = Message::error(&err.to_string());
    format!("{} {}", "System Error:".bright_white().on_red(), message.content)
}

/// Sends one message and prints the exchange to stdout.
pub async fn run(client: &ChatClient, text: &str) -> Result<ChatReply, ClientError> {
    println!("{}", user_line(text));
    match client.send(text).await {
        Ok(reply) => {
            println!("{}", reply_line(&reply));
            Ok(reply)
        }
        Err(e) => {
            println!("{}", error_line(&e));
            Err(e)
        }
    }
}
