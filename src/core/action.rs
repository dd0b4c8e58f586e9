//! # Actions
//!
//! Everything that can happen in the conversation becomes an `Action`.
//! User presses Enter? That's `Action::Submit(text)`.
//! Backend responds? That's `Action::ImprovementSucceeded(prompt)`.
//!
//! The `update()` function takes the current state and an action, mutates
//! the state, and returns an `Effect` describing the I/O the caller must
//! perform. No I/O happens here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! ## State machine
//!
//! ```text
//!            Submit(text)                 EditSave{index, text}
//!   Idle ───────────────▶ Submitting   Idle ─────────────────▶ EditRegenerating
//!    ▲                        │          ▲                           │
//!    └── Succeeded/Failed ────┘          └──── Succeeded/Failed ─────┘
//! ```
//!
//! Anything that would start a second request while one is in flight is
//! rejected, not queued.

use log::{debug, info, warn};

use crate::client::{ImproveError, ImproveRequest, ImprovedPrompt};
use crate::core::intent;
use crate::core::state::{App, Phase};
use crate::core::store::Role;

pub const GENERIC_FAILURE_MESSAGE: &str =
    "Sorry, I couldn't improve your prompt. Please try again.";
pub const EDIT_FAILURE_MESSAGE: &str = "Something went wrong while improving the edited prompt.";
pub const TOO_SHORT_MESSAGE: &str =
    "Your prompt is too short. Please provide a prompt with at least 10 characters.";
pub const LOADING_PLACEHOLDER_TEXT: &str = "Improving your prompt...";

#[derive(Debug)]
pub enum Action {
    /// User submitted the input buffer.
    Submit(String),
    /// User saved an edit of the user message at `index`.
    EditSave { index: usize, new_text: String },
    /// Drop every message after `index`.
    TruncateAfter(usize),
    ImprovementSucceeded(ImprovedPrompt),
    ImprovementFailed(ImproveError),
    Quit,
}

/// Side effect the caller has to carry out after `update()`.
#[derive(Debug, PartialEq)]
pub enum Effect {
    None,
    SpawnRequest(ImproveRequest),
    Quit,
}

/// User-facing text for a failed request.
///
/// Precedence: backend-supplied message, then the too-short literal for a
/// 400, then `fallback`.
pub fn failure_text(err: &ImproveError, fallback: &str) -> String {
    if let Some(message) = err.server_message() {
        return message.to_string();
    }
    if err.is_bad_request() {
        return TOO_SHORT_MESSAGE.to_string();
    }
    fallback.to_string()
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Submit(text) => submit(app, &text),
        Action::EditSave { index, new_text } => edit_save(app, index, new_text),
        Action::TruncateAfter(index) => {
            if !app.phase.is_idle() {
                warn!("Truncate rejected: request in flight ({:?})", app.phase);
                return Effect::None;
            }
            let removed = app.store.truncate_after(index);
            info!("Truncated {} message(s) after index {}", removed, index);
            if removed > 0 {
                app.status_message = format!("Removed {removed} message(s)");
            }
            Effect::None
        }
        Action::ImprovementSucceeded(improved) => {
            if app.phase.is_idle() {
                warn!("Dropping improvement that arrived while idle");
                return Effect::None;
            }
            app.store.append(Role::Ai, improved.improved_text);
            finish(app, "Prompt improved");
            Effect::None
        }
        Action::ImprovementFailed(err) => {
            let fallback = match app.phase {
                Phase::Idle => {
                    warn!("Dropping failure that arrived while idle: {}", err);
                    return Effect::None;
                }
                Phase::Submitting => GENERIC_FAILURE_MESSAGE,
                Phase::EditRegenerating => EDIT_FAILURE_MESSAGE,
            };
            warn!("Improvement failed during {:?}: {}", app.phase, err);
            app.store.append(Role::Ai, failure_text(&err, fallback));
            finish(app, "Improvement failed");
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

fn submit(app: &mut App, text: &str) -> Effect {
    if !app.phase.is_idle() {
        warn!("Submit rejected: request in flight ({:?})", app.phase);
        return Effect::None;
    }
    let prompt = text.trim();
    if prompt.is_empty() {
        debug!("Ignoring blank submit");
        return Effect::None;
    }

    // Intent reflects the AI's previous turn, so compute it before the new
    // user message lands in the store.
    let intent = intent::detect(app.store.last_ai_text());

    app.store.append(Role::User, prompt.to_string());
    app.phase = Phase::Submitting;
    app.status_message = String::from("Improving...");
    info!(
        "Submit: prompt_len={}, intent={:?}, messages={}",
        prompt.chars().count(),
        intent,
        app.store.len()
    );

    Effect::SpawnRequest(ImproveRequest {
        prompt: prompt.to_string(),
        intent: Some(intent),
    })
}

fn edit_save(app: &mut App, index: usize, new_text: String) -> Effect {
    if !app.phase.is_idle() {
        warn!("Edit rejected: request in flight ({:?})", app.phase);
        return Effect::None;
    }
    let Some(original) = app.store.get(index) else {
        warn!("Edit rejected: index {} out of range", index);
        return Effect::None;
    };
    if original.role != Role::User {
        warn!("Edit rejected: index {} is not a user message", index);
        return Effect::None;
    }
    if original.text == new_text {
        debug!("Edit at index {} unchanged, nothing to do", index);
        return Effect::None;
    }

    app.store.replace_text_at(index, new_text.clone());
    app.phase = Phase::EditRegenerating;
    app.status_message = String::from("Regenerating...");
    info!(
        "Edit saved at index {}: prompt_len={}, messages={}",
        index,
        new_text.chars().count(),
        app.store.len()
    );

    // Edits never carry intent forward.
    Effect::SpawnRequest(ImproveRequest {
        prompt: new_text,
        intent: None,
    })
}

/// Shared cleanup for every response branch: always lands back in `Idle`.
fn finish(app: &mut App, status: &str) {
    app.phase = Phase::Idle;
    app.status_message = status.to_string();
}
