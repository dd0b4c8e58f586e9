//! # MessageList Component
//!
//! Scrollable view of the conversation.
//!
//! ## Responsibilities
//!
//! - Display the stored messages, plus a trailing "Improving your prompt..."
//!   row while a request is in flight (never stored)
//! - Reveal AI replies through the `Typewriter`
//! - Per-message view state: edit buffers and "copied" feedback
//! - Manage scrolling and selection
//! - Cache message heights between frames
//!
//! ## Architecture
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) plus the messages to draw.
//!
//! Rendering returns `Result<(), ViewError>` so the surrounding
//! `ErrorBoundary` can swap in its fallback if the layout ever disagrees
//! with the rows being drawn.

use std::collections::HashMap;
use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::action::LOADING_PLACEHOLDER_TEXT;
use crate::core::store::{Message, MessageId};
use crate::tui::component::EventHandler;
use crate::tui::components::boundary::ViewError;
use crate::tui::components::message::MessageBubble;
use crate::tui::components::text_buffer::TextBuffer;
use crate::tui::components::typewriter::Typewriter;
use crate::tui::event::TuiEvent;

/// Presentation-only state for one stored message.
#[derive(Debug, Default)]
pub struct MessageViewState {
    /// Edit buffer while the message is being edited in place
    pub editing: Option<TextBuffer>,
    /// "copied" feedback stays visible until this instant
    pub copied_until: Option<Instant>,
}

/// Layout and scroll state for the message list.
/// Must be persisted in the parent TuiState.
pub struct MessageListState {
    /// Scroll offset and view state
    pub scroll_state: ScrollViewState,
    /// Cached layout measurements
    pub layout: LayoutCache,
    /// When true, auto-scroll to bottom on new content
    pub stick_to_bottom: bool,
    /// Currently selected message index (keyboard navigation or click)
    pub selected_index: Option<usize>,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
    /// Content exists below the current viewport
    pub has_unseen_content: bool,
    views: HashMap<MessageId, MessageViewState>,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            layout: LayoutCache::new(),
            stick_to_bottom: true,
            selected_index: None,
            viewport_height: 0,
            has_unseen_content: false,
            views: HashMap::new(),
        }
    }

    fn total_height(&self) -> u16 {
        self.layout.prefix_heights.last().copied().unwrap_or(0)
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.total_height().saturating_sub(self.viewport_height);
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Re-attach to the bottom; the next render scrolls there.
    pub fn scroll_to_bottom(&mut self) {
        self.stick_to_bottom = true;
    }

    /// Scroll the viewport so the selected message is fully visible.
    /// If the message is taller than the viewport, align its top edge.
    pub fn scroll_to_selected(&mut self) {
        let Some(idx) = self.selected_index else {
            return;
        };
        if idx >= self.layout.prefix_heights.len() {
            return;
        }

        let item_top = if idx == 0 {
            0
        } else {
            self.layout.prefix_heights[idx - 1]
        };
        let item_bottom = self.layout.prefix_heights[idx];
        let offset_y = self.scroll_state.offset().y;

        if item_top < offset_y {
            self.scroll_state.set_offset(Position { x: 0, y: item_top });
            self.stick_to_bottom = false;
        } else if item_bottom > offset_y + self.viewport_height {
            let new_y = item_bottom.saturating_sub(self.viewport_height);
            self.scroll_state.set_offset(Position { x: 0, y: new_y });
            let max_y = self.total_height().saturating_sub(self.viewport_height);
            self.stick_to_bottom = new_y >= max_y;
        }
    }

    /// Clamp scroll and re-engage auto-scroll if the user has reached the bottom.
    pub fn repin_if_at_bottom(&mut self) {
        let max_y = self.total_height().saturating_sub(self.viewport_height);
        let current = self.scroll_state.offset();
        if current.y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    // --- per-message view state ---

    pub fn start_edit(&mut self, message: &Message) {
        self.views.entry(message.id).or_default().editing = Some(TextBuffer::with_text(&message.text));
    }

    pub fn edit_buffer_mut(&mut self, id: MessageId) -> Option<&mut TextBuffer> {
        self.views.get_mut(&id).and_then(|v| v.editing.as_mut())
    }

    /// Leaves edit mode for `id`, returning what was in the buffer.
    pub fn finish_edit(&mut self, id: MessageId) -> Option<String> {
        self.views
            .get_mut(&id)
            .and_then(|v| v.editing.take())
            .map(|mut buffer| buffer.take())
    }

    pub fn is_editing(&self, id: MessageId) -> bool {
        self.views.get(&id).is_some_and(|v| v.editing.is_some())
    }

    pub fn mark_copied(&mut self, id: MessageId, until: Instant) {
        self.views.entry(id).or_default().copied_until = Some(until);
    }

    pub fn is_copied(&self, id: MessageId, now: Instant) -> bool {
        self.views
            .get(&id)
            .and_then(|v| v.copied_until)
            .is_some_and(|until| now < until)
    }

    /// True while some "copied" badge is still showing.
    pub fn has_pending_feedback(&self, now: Instant) -> bool {
        self.views
            .values()
            .any(|v| v.copied_until.is_some_and(|until| now < until))
    }

    /// Forget view state for messages that left the store, and drop a
    /// selection that now points past the end.
    pub fn retain(&mut self, messages: &[Message]) {
        self.views
            .retain(|id, _| messages.iter().any(|m| m.id == *id));
        if self.selected_index.is_some_and(|i| i >= messages.len()) {
            self.selected_index = messages.len().checked_sub(1);
        }
    }
}

/// Scrollable conversation view component.
/// Created fresh each frame with references to state and data.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub messages: &'a [Message],
    /// Store revision of `messages`; keys the layout cache
    pub revision: u64,
    pub is_loading: bool,
    pub typewriter: &'a mut Typewriter,
    pub now: Instant,
    pub pulse_value: f32,
    pub spinner_frame: usize,
}

/// Placeholder text with 1-3 trailing dots cycling on `spinner_frame`.
fn animated_placeholder(spinner_frame: usize) -> String {
    let base = LOADING_PLACEHOLDER_TEXT.trim_end_matches('.');
    let dots = spinner_frame / 4 % 3 + 1;
    format!("{base}{}", ".".repeat(dots))
}

impl<'a> MessageList<'a> {
    pub fn render(&mut self, frame: &mut Frame, area: Rect) -> Result<(), ViewError> {
        let content_width = area.width.saturating_sub(1); // -1 for scrollbar

        let placeholder = self
            .is_loading
            .then(|| Message::loading_placeholder(LOADING_PLACEHOLDER_TEXT));
        let rows: Vec<&Message> = self.messages.iter().chain(placeholder.as_ref()).collect();

        // 1. Refresh the layout cache when anything that affects heights changed
        let editing = self.messages.iter().find_map(|m| {
            self.state
                .views
                .get(&m.id)
                .and_then(|v| v.editing.as_ref())
                .map(|buffer| (m.id, MessageBubble::calculate_edit_height(buffer.as_str(), content_width)))
        });
        let key = LayoutKey {
            revision: self.revision,
            width: content_width,
            loading: self.is_loading,
            editing,
        };
        if !self.state.layout.is_valid_for(&key) {
            let heights = rows
                .iter()
                .map(|m| match editing {
                    Some((id, height)) if id == m.id => height,
                    // Reserve the full reply height so the reveal never reflows the list
                    _ => MessageBubble::calculate_height(&m.text, content_width),
                })
                .collect();
            self.state.layout.rebuild(heights, key);
        }
        if self.state.layout.heights.len() != rows.len() {
            return Err(ViewError::LayoutOutOfSync {
                rows: rows.len(),
                cached: self.state.layout.heights.len(),
            });
        }

        let total_height = self.state.total_height();

        // 2. Clamp scroll offset
        self.state.viewport_height = area.height;
        if !self.state.stick_to_bottom {
            self.state.clamp_scroll();
        }

        let scroll_offset = self.state.scroll_state.offset().y;
        let visible_range = self.state.layout.visible_range(scroll_offset, area.height);

        // 3. Render visible rows into a ScrollView
        let mut scroll_view = ScrollView::new(Size::new(content_width, total_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Always)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let placeholder_text = animated_placeholder(self.spinner_frame);
        let mut y_offset: u16 = if visible_range.start > 0 {
            self.state.layout.prefix_heights[visible_range.start - 1]
        } else {
            0
        };

        // Edit cursor in canvas coordinates, if the edited message is visible
        let mut edit_cursor: Option<(u16, u16)> = None;

        for i in visible_range {
            let message = rows[i];
            let height = self.state.layout.heights[i];
            let view = self.state.views.get(&message.id);
            let edit_buffer = view.and_then(|v| v.editing.as_ref());
            if let Some(buffer) = edit_buffer {
                let (col, line) =
                    buffer.cursor_position(MessageBubble::content_width(content_width));
                let (origin_x, origin_y) = MessageBubble::content_origin();
                edit_cursor = Some((origin_x + col, y_offset + origin_y + line));
            }

            let text = if message.is_loading_placeholder {
                placeholder_text.as_str()
            } else if let Some(buffer) = edit_buffer {
                buffer.as_str()
            } else {
                self.typewriter.visible_text(message, self.now)
            };

            let mut bubble = MessageBubble::new(message, text);
            bubble.is_selected =
                self.state.selected_index == Some(i) && !message.is_loading_placeholder;
            bubble.is_editing = edit_buffer.is_some();
            bubble.copied = view
                .and_then(|v| v.copied_until)
                .is_some_and(|until| self.now < until);
            if message.is_loading_placeholder {
                bubble.pulse_intensity = self.pulse_value;
            }

            scroll_view.render_widget(bubble, Rect::new(0, y_offset, content_width, height));
            y_offset += height;
        }

        // Auto-scroll
        if self.state.stick_to_bottom {
            self.state.scroll_state.scroll_to_bottom();
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);

        if let Some((x, y)) = edit_cursor {
            let offset = self.state.scroll_state.offset().y;
            if y >= offset && y - offset < area.height && x < content_width {
                frame.set_cursor_position((area.x + x, area.y + y - offset));
            }
        }

        let max_scroll = total_height.saturating_sub(area.height);
        self.state.has_unseen_content = self.state.scroll_state.offset().y < max_scroll;

        Ok(())
    }
}

/// EventHandler lives on `MessageListState` because scroll position must
/// survive across frames while `MessageList` is rebuilt each frame.
impl EventHandler for MessageListState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            _ => {}
        }
        None
    }
}

/// Everything a cached layout depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutKey {
    pub revision: u64,
    pub width: u16,
    pub loading: bool,
    /// Message under edit and its current height
    pub editing: Option<(MessageId, u16)>,
}

/// Cached layout measurements
#[derive(Debug, Default)]
pub struct LayoutCache {
    pub heights: Vec<u16>,
    pub prefix_heights: Vec<u16>,
    key: Option<LayoutKey>,
}

impl LayoutCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid_for(&self, key: &LayoutKey) -> bool {
        self.key.as_ref() == Some(key)
    }

    pub fn rebuild(&mut self, heights: Vec<u16>, key: LayoutKey) {
        self.heights = heights;
        self.rebuild_prefix_heights();
        self.key = Some(key);
    }

    pub fn rebuild_prefix_heights(&mut self) {
        self.prefix_heights = self
            .heights
            .iter()
            .scan(0u16, |acc, &h| {
                *acc = acc.saturating_add(h);
                Some(*acc)
            })
            .collect();
    }

    pub fn visible_range(&self, scroll_offset: u16, viewport_height: u16) -> std::ops::Range<usize> {
        let buffer = viewport_height / 2;
        let buffered_start = scroll_offset.saturating_sub(buffer);
        let buffered_end = scroll_offset
            .saturating_add(viewport_height)
            .saturating_add(buffer);

        let start = self
            .prefix_heights
            .partition_point(|&end| end <= buffered_start);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < buffered_end)
            .saturating_add(1)
            .min(self.prefix_heights.len());

        start..end
    }
}
