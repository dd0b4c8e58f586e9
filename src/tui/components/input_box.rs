//! # InputBox Component
//!
//! The prompt entry field at the bottom of the chat.
//!
//! ## Responsibilities
//!
//! - Capture text input (typing, paste, cursor movement)
//! - Emit `Submit` on Enter when the buffer has non-blank text
//! - Show a placeholder when empty and a dimmed "waiting" state while a
//!   request is in flight
//!
//! ## State Management
//!
//! The buffer is internal state. `disabled` and `dimmed` are props set by the
//! parent each frame from App/TUI state.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Wrap};

use crate::tui::component::{Component, EventHandler};
use crate::tui::components::text_buffer::{TextBuffer, wrap_line_count, wrap_options};
use crate::tui::event::TuiEvent;

/// Border (2) + padding (2) consumed horizontally by the bordered block
const HORIZONTAL_OVERHEAD: u16 = 4;
/// Top + bottom borders consumed vertically
const VERTICAL_OVERHEAD: u16 = 2;
/// Maximum visible content lines before the box scrolls internally
const MAX_VISIBLE_LINES: u16 = 5;

pub const INPUT_PLACEHOLDER: &str = "Enter a prompt to improve... (min. 10 characters)";

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// User submitted the text (Enter pressed)
    Submit(String),
    /// Text content or cursor changed
    ContentChanged,
}

pub struct InputBox {
    buffer: TextBuffer,
    /// A request is in flight: Enter is ignored and the buffer is kept (Prop)
    pub disabled: bool,
    /// Focus is elsewhere (Cursor/Edit mode) (Prop)
    pub dimmed: bool,
}

impl Default for InputBox {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBox {
    pub fn new() -> Self {
        Self {
            buffer: TextBuffer::new(),
            disabled: false,
            dimmed: false,
        }
    }

    pub fn text(&self) -> &str {
        self.buffer.as_str()
    }

    /// Required height for the current buffer, clamped to the visible line limit.
    pub fn calculate_height(&self, area_width: u16) -> u16 {
        let width = area_width.saturating_sub(HORIZONTAL_OVERHEAD);
        let lines = wrap_line_count(self.buffer.as_str(), width);
        lines.min(MAX_VISIBLE_LINES) + VERTICAL_OVERHEAD
    }

    fn title(&self) -> &'static str {
        if self.disabled {
            "Input (waiting for improvement...)"
        } else {
            "Input (Enter to send)"
        }
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let width = area.width.saturating_sub(HORIZONTAL_OVERHEAD);

        let mut border_style = Style::default().fg(Color::Green);
        if self.dimmed || self.disabled {
            border_style = border_style.add_modifier(Modifier::DIM);
        }

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(self.title())
            .padding(Padding::horizontal(1));

        let (cursor_col, cursor_line) = self.buffer.cursor_position(width);
        let scroll = cursor_line.saturating_sub(MAX_VISIBLE_LINES - 1);

        let paragraph = if self.buffer.as_str().is_empty() {
            Paragraph::new(INPUT_PLACEHOLDER).style(
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )
        } else {
            // Pre-wrap with the same options used for cursor math
            let lines = textwrap::wrap(self.buffer.as_str(), wrap_options(width.max(1)));
            let text = lines.join("\n");
            Paragraph::new(text)
                .style(Style::default().fg(Color::Green))
                .wrap(Wrap { trim: false })
                .scroll((scroll, 0))
        };

        frame.render_widget(paragraph.block(block), area);

        if !self.dimmed {
            let inner_x = area.x + 2;
            let inner_y = area.y + 1;
            frame.set_cursor_position((inner_x + cursor_col, inner_y + cursor_line - scroll));
        }
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::Submit => {
                if self.disabled || self.buffer.is_blank() {
                    return None;
                }
                Some(InputEvent::Submit(self.buffer.take()))
            }
            other => self
                .buffer
                .apply(other)
                .then_some(InputEvent::ContentChanged),
        }
    }
}
