//! Hands UI actions to the backend command queue.

use crossbeam_channel::{Sender, TrySendError};

use crate::backend_bridge::commands::BackendCommand;

pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    status: &mut String,
) {
    let cmd_name = match &cmd {
        BackendCommand::UpdateContext { .. } => "update_context",
        BackendCommand::AskQuestion { .. } => "ask_question",
    };

    match cmd_tx.try_send(cmd) {
        Ok(()) => tracing::debug!(command = cmd_name, "queued ui->backend command"),
        Err(TrySendError::Full(_)) => {
            *status = "Command queue is full; please retry".to_string();
        }
        Err(TrySendError::Disconnected(_)) => {
            *status = "Backend worker disconnected (startup may have failed); restart the app"
                .to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;

    #[test]
    fn full_queue_is_reported_in_the_status_line() {
        let (tx, _rx) = bounded(0);
        let mut status = String::new();
        dispatch_backend_command(
            &tx,
            BackendCommand::AskQuestion { question: "q".to_string() },
            &mut status,
        );
        assert!(status.contains("queue is full"));
    }

    #[test]
    fn disconnected_worker_is_reported_in_the_status_line() {
        let (tx, rx) = bounded(4);
        drop(rx);
        let mut status = String::new();
        dispatch_backend_command(
            &tx,
            BackendCommand::UpdateContext {
                mia_context: String::new(),
                luna_context: String::new(),
            },
            &mut status,
        );
        assert!(status.contains("disconnected"));
    }
}
