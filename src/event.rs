// event.rs

use crate::state::ChatAction;
use tokio::sync::mpsc;

#[derive(Debug)]
pub enum AppEvent {
    /// A reducer action produced by a typing or request task.
    Chat(ChatAction),

    /// Non-fatal notice for the status bar (e.g. a failed history clear).
    Notice(String),
}

pub type EventSender = mpsc::UnboundedSender<AppEvent>;
pub type EventReceiver = mpsc::UnboundedReceiver<AppEvent>;

pub fn channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}

/// Sends a reducer action, returning `false` once the UI is gone.
pub fn dispatch(tx: &EventSender, action: ChatAction) -> bool {
    tx.send(AppEvent::Chat(action)).is_ok()
}
