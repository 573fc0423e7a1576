// typing.rs
use crate::event::{dispatch, EventSender};
use crate::message::MessageId;
use crate::state::ChatAction;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Types `full_content` into message `id` one character at a time.
///
/// Dispatches an optional `UpdateAgentName`, then one `AppendDelta` per
/// character spaced by `speed`, then `CompleteAssistantMessage`. The first
/// character goes out immediately. Stops early if the UI has gone away.
pub async fn simulate_typing(
    tx: EventSender,
    id: MessageId,
    full_content: String,
    agent_name: Option<String>,
    speed: Duration,
) {
    if let Some(agent_name) = agent_name {
        if !dispatch(
            &tx,
            ChatAction::UpdateAgentName {
                id: id.clone(),
                agent_name,
            },
        ) {
            return;
        }
    }

    for (i, ch) in full_content.chars().enumerate() {
        if i > 0 {
            tokio::time::sleep(speed).await;
        }
        let delta = ch.to_string();
        if !dispatch(
            &tx,
            ChatAction::AppendDelta {
                id: id.clone(),
                delta,
            },
        ) {
            return;
        }
    }

    if !speed.is_zero() && !full_content.is_empty() {
        tokio::time::sleep(speed).await;
    }
    dispatch(&tx, ChatAction::CompleteAssistantMessage { id });
}

/// Spawns [`simulate_typing`] on the runtime.
pub fn spawn_typing(
    tx: EventSender,
    id: MessageId,
    full_content: String,
    agent_name: Option<String>,
    speed: Duration,
) -> JoinHandle<()> {
    tokio::spawn(simulate_typing(tx, id, full_content, agent_name, speed))
}
