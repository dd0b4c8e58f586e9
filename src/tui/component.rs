use ratatui::Frame;
use ratatui::layout::Rect;

use crate::tui::event::TuiEvent;

/// A reusable UI component.
///
/// Components receive data via props (struct fields), may hold `&mut State`
/// for presentation state that outlives a frame, and render into a `Rect`.
///
/// `render` takes `&mut self` so layout caches and scroll offsets can be
/// updated during the render pass, like Ratatui's `StatefulWidget`.
///
/// Views that can detect a broken invariant while drawing (the message list)
/// expose a fallible `render` of their own instead, so an `ErrorBoundary`
/// can catch it.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// A component that handles terminal events.
pub trait EventHandler {
    /// The type of high-level event this component emits.
    type Event;

    /// Handle a low-level `TuiEvent` and optionally return a high-level event.
    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event>;
}
