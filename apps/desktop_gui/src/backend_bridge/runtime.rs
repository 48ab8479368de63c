//! Backend worker: owns the tokio runtime and drives the session controller.

use std::{sync::Arc, thread};

use client_core::{HttpAnswerService, SessionController};
use crossbeam_channel::{Receiver, Sender};
use shared::domain::Subject;
use tokio::sync::broadcast;

use crate::backend_bridge::commands::BackendCommand;
use crate::config::Settings;
use crate::controller::events::{UiError, UiErrorContext, UiEvent};

pub fn spawn_backend_thread(
    settings: Settings,
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::Error(UiError::new(
                    UiErrorContext::BackendStartup,
                    format!("backend worker startup failure: failed to build runtime: {err}"),
                )));
                tracing::error!("failed to build backend runtime: {err}");
                return;
            }
        };

        runtime.block_on(async move {
            let service = Arc::new(HttpAnswerService::new(&settings.server_url));
            let controller = SessionController::with_timing(service, settings.timing());

            let mut events = controller.subscribe_events();
            let forward_tx = ui_tx.clone();
            tokio::spawn(async move {
                loop {
                    match events.recv().await {
                        Ok(event) => {
                            let _ = forward_tx.try_send(UiEvent::Session(event));
                        }
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!("ui event forwarder lagged, skipped {skipped} events");
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    }
                }
            });

            let _ = ui_tx.try_send(UiEvent::Info(format!(
                "Ready (answer service: {})",
                settings.server_url
            )));

            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::UpdateContext { mia_context, luna_context } => {
                        controller.set_subject_context(Subject::Mia, mia_context).await;
                        controller.set_subject_context(Subject::Luna, luna_context).await;
                        controller.submit_context().await;
                    }
                    BackendCommand::AskQuestion { question } => {
                        controller.set_question_text(question).await;
                        controller.submit_question().await;
                    }
                }
            }
        });
    });
}
