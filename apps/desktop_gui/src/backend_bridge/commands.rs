//! Commands queued from the UI to the backend worker.

pub enum BackendCommand {
    UpdateContext {
        mia_context: String,
        luna_context: String,
    },
    AskQuestion {
        question: String,
    },
}
