//! # TitleBar Component
//!
//! Top status bar showing application state and notifications.
//!
//! ## Responsibilities
//!
//! - Display which backend the chat talks to
//! - Display status messages (e.g., "Improving...", "Prompt improved")
//! - Show "↓ New" indicator when there's unseen content below scroll
//!
//! ## Design Decisions
//!
//! TitleBar is purely presentational: it receives all data as props and has
//! no internal state. The props come from different places:
//! - `backend_label`: Core App state (configuration)
//! - `status_message`: Core App state (set by `update()`)
//! - `has_unseen_content`: TUI state (scroll position indicator)
//!
//! ## Conditional Formatting
//!
//! 1. **Unseen content**: `"Prompt Pilot (backend: localhost:5000) | Improving... | ↓ New"`
//! 2. **Status message**: `"Prompt Pilot (backend: localhost:5000) | Improving..."`
//! 3. **Default**: `"Prompt Pilot (backend: localhost:5000)"`

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::Span;

pub struct TitleBar {
    pub backend_label: String,
    pub status_message: String,
    pub has_unseen_content: bool,
}

impl TitleBar {
    pub fn new(backend_label: String, status_message: String, has_unseen_content: bool) -> Self {
        Self {
            backend_label,
            status_message,
            has_unseen_content,
        }
    }

    fn text(&self) -> String {
        let base = format!("Prompt Pilot (backend: {})", self.backend_label);
        match (self.status_message.is_empty(), self.has_unseen_content) {
            (_, true) => format!("{base} | {} | ↓ New", self.status_message),
            (true, false) => base,
            (false, false) => format!("{base} | {}", self.status_message),
        }
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Span::raw(self.text()), area);
    }
}
