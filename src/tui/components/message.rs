use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget, Wrap};

use crate::core::store::{Message, Role};
use crate::tui::component::Component;
use crate::tui::components::text_buffer::{wrap_line_count, wrap_options};

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;

/// Pulse intensity threshold above which the border transitions from normal to BOLD.
const PULSE_BOLD_THRESHOLD: f32 = 0.6;
/// Pulse intensity threshold above which the border transitions from DIM to normal.
const PULSE_NORMAL_THRESHOLD: f32 = 0.2;

/// A stateless component that renders one chat message.
///
/// # Design
///
/// `MessageBubble` is a **transient component**: it's created fresh each frame
/// with the data it needs. The text it shows is passed in separately from the
/// message because it is not always the stored text: AI replies are revealed
/// progressively, and a user message being edited shows its edit buffer.
///
/// # Affordances
///
/// When selected, the bottom border lists the keys that apply: every message
/// can be copied, only user messages can be edited.
#[derive(Clone, Copy)]
pub struct MessageBubble<'a> {
    pub message: &'a Message,
    /// What to draw in the body (revealed prefix, edit buffer, or full text)
    pub text: &'a str,
    pub is_selected: bool,
    pub is_editing: bool,
    /// Show "copied" feedback in the title
    pub copied: bool,
    /// Current pulse intensity (0.0 to 1.0); only the loading placeholder pulses
    pub pulse_intensity: f32,
}

impl<'a> MessageBubble<'a> {
    pub fn new(message: &'a Message, text: &'a str) -> Self {
        Self {
            message,
            text,
            is_selected: false,
            is_editing: false,
            copied: false,
            pulse_intensity: 0.0,
        }
    }

    /// Calculate the height required for `text` at a given width.
    ///
    /// Uses `textwrap` with the same options as ratatui's `Paragraph` so the
    /// parent list can lay out the scroll canvas before rendering.
    pub fn calculate_height(text: &str, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            // Degenerate case: terminal too narrow for borders + padding.
            return 1;
        }

        let content = text.trim();
        if content.is_empty() {
            return 1 + VERTICAL_OVERHEAD;
        }

        let lines = textwrap::wrap(content, wrap_options(content_width));
        (lines.len() as u16).max(1) + VERTICAL_OVERHEAD
    }

    /// Height of a bubble showing an edit buffer: raw text, newlines and
    /// surrounding whitespace included, plus a line for a trailing newline.
    pub fn calculate_edit_height(text: &str, width: u16) -> u16 {
        let content_width = Self::content_width(width);
        if content_width == 0 {
            return 1;
        }
        wrap_line_count(text, content_width) + VERTICAL_OVERHEAD
    }

    /// Width available to text inside a bubble `width` columns wide.
    pub fn content_width(width: u16) -> u16 {
        width.saturating_sub(HORIZONTAL_OVERHEAD)
    }

    /// Offset of the text area from the bubble's top-left corner.
    pub fn content_origin() -> (u16, u16) {
        (1 + CONTENT_PAD_H, 1)
    }

    fn title(&self) -> String {
        let label = role_label(self.message.role);
        if self.message.is_loading_placeholder {
            return label.to_string();
        }
        let time = self.message.created_at.format("%H:%M");
        let mut title = format!("{label} · {time}");
        if self.is_editing {
            title.push_str(" · editing (Enter save, Esc cancel)");
        } else if self.copied {
            title.push_str(" · copied");
        }
        title
    }

    fn hints(&self) -> Option<&'static str> {
        if !self.is_selected || self.is_editing || self.message.is_loading_placeholder {
            return None;
        }
        Some(match self.message.role {
            Role::User => " [c] copy  [e] edit  [x] cut after ",
            Role::Ai => " [c] copy  [x] cut after ",
        })
    }
}

pub fn role_label(role: Role) -> &'static str {
    match role {
        Role::User => "you",
        Role::Ai => "pilot",
    }
}

pub fn role_style(role: Role) -> Style {
    match role {
        Role::User => Style::default().fg(Color::Green),
        Role::Ai => Style::default().fg(Color::Blue),
    }
}

impl<'a> Widget for MessageBubble<'a> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let mut style = role_style(self.message.role);
        if self.message.is_loading_placeholder {
            style = Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC);
        }

        // Editing and selection override the default dim border
        let mut border_style = if self.is_editing {
            Style::default().fg(Color::Yellow)
        } else if self.is_selected {
            Style::default().fg(Color::Cyan)
        } else {
            style.add_modifier(Modifier::DIM)
        };

        // Three-phase breathing: DIM → normal → BOLD
        if self.pulse_intensity > PULSE_BOLD_THRESHOLD {
            border_style = border_style
                .remove_modifier(Modifier::DIM)
                .add_modifier(Modifier::BOLD);
        } else if self.pulse_intensity > PULSE_NORMAL_THRESHOLD {
            border_style = border_style.remove_modifier(Modifier::DIM);
        }

        let mut block = Block::bordered()
            .title(self.title())
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title_style(border_style)
            .padding(Padding::horizontal(CONTENT_PAD_H));
        if let Some(hints) = self.hints() {
            block = block.title_bottom(Line::from(hints).right_aligned());
        }

        let inner_area = block.inner(area);
        block.render(area, buf);

        let paragraph = if self.is_editing {
            // Pre-wrap with the same options used for cursor math
            let lines = textwrap::wrap(self.text, wrap_options(inner_area.width.max(1)));
            Paragraph::new(lines.join("\n"))
                .style(style)
                .wrap(Wrap { trim: false })
        } else {
            Paragraph::new(self.text.trim())
                .style(style)
                .wrap(Wrap { trim: true })
        };
        paragraph.render(inner_area, buf);
    }
}

/// `MessageBubble` is stateless, so the `&mut self` required by the trait is a no-op.
impl<'a> Component for MessageBubble<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(*self, area);
    }
}
