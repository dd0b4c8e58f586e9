//! # Application State
//!
//! Core business state for Prompt Pilot. Domain logic only, no TUI types.
//! Presentation state (scroll, selection, per-message edit buffers) lives in `tui`.
//!
//! ```text
//! App
//! ├── client: Arc<dyn ImprovementClient>  // backend boundary
//! ├── store: MessageStore                 // the conversation
//! ├── phase: Phase                        // Idle | Submitting | EditRegenerating
//! ├── status_message: String              // status bar text
//! └── backend_label: String               // shown in the title bar
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::sync::Arc;

use crate::client::ImprovementClient;
use crate::core::store::MessageStore;

/// Request lifecycle. At most one request is ever in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    /// Waiting on the improvement for a freshly submitted prompt.
    Submitting,
    /// Waiting on the regeneration after a user message was edited.
    EditRegenerating,
}

impl Phase {
    pub fn is_idle(self) -> bool {
        self == Phase::Idle
    }
}

pub struct App {
    pub client: Arc<dyn ImprovementClient>,
    pub store: MessageStore,
    pub phase: Phase,
    pub status_message: String,
    pub backend_label: String,
}

impl App {
    pub fn new(client: Arc<dyn ImprovementClient>, backend_label: String) -> Self {
        Self {
            client,
            store: MessageStore::new(),
            phase: Phase::Idle,
            status_message: String::from("Welcome to Prompt Pilot!"),
            backend_label,
        }
    }

    /// True while a request is in flight.
    pub fn is_loading(&self) -> bool {
        !self.phase.is_idle()
    }
}
