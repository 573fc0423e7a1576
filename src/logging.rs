// logging.rs
use crate::state::ChatAction;
use log::{debug, trace};

/// Starts the file logger. Enabled by `PARLOR_LOG=<level>`, writes to
/// `parlor.log` so nothing is printed over the terminal UI.
pub fn init() {
    cli_log::init_cli_log!();
}

/// Records a reducer action. Per-character deltas only show at trace level.
pub fn log_action(action: &ChatAction) {
    match action {
        ChatAction::AppendDelta { id, delta } => trace!("{} {} {:?}", action.kind(), id, delta),
        ChatAction::AddUserMessage(message) => {
            debug!("{} {} ({})", action.kind(), message.id, message.role)
        }
        ChatAction::StartAssistantMessage { id, .. }
        | ChatAction::UpdateAgentName { id, .. }
        | ChatAction::CompleteAssistantMessage { id } => debug!("{} {}", action.kind(), id),
        ChatAction::SetError { error_content } => debug!("{}: {}", action.kind(), error_content),
        ChatAction::Reset => debug!("{}", action.kind()),
    }
}
