//! # ErrorBoundary
//!
//! Wraps the conversation view. If the wrapped render reports a `ViewError`,
//! the boundary logs it, trips, and from then on draws a static fallback
//! instead of the subtree. Tripping is sticky for the rest of the session.

use std::fmt;

use log::error;
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, BorderType, Clear, Paragraph, Wrap};

pub const FALLBACK_MESSAGE: &str = "Something went wrong. Please restart Prompt Pilot.";

/// A render-time invariant that did not hold.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewError {
    /// Layout cache row count disagrees with the rows being drawn.
    LayoutOutOfSync { rows: usize, cached: usize },
}

impl fmt::Display for ViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewError::LayoutOutOfSync { rows, cached } => {
                write!(f, "layout out of sync: {rows} rows, {cached} cached heights")
            }
        }
    }
}

impl std::error::Error for ViewError {}

#[derive(Debug, Default)]
pub struct ErrorBoundary {
    tripped: Option<ViewError>,
}

impl ErrorBoundary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_error(&self) -> bool {
        self.tripped.is_some()
    }

    /// Renders `child` into `area`, or the fallback if this boundary has tripped.
    pub fn render<F>(&mut self, frame: &mut Frame, area: Rect, child: F)
    where
        F: FnOnce(&mut Frame, Rect) -> Result<(), ViewError>,
    {
        if self.tripped.is_none()
            && let Err(e) = child(frame, area)
        {
            error!("ErrorBoundary caught a render error: {}", e);
            self.tripped = Some(e);
        }

        if self.tripped.is_some() {
            render_fallback(frame, area);
        }
    }
}

fn render_fallback(frame: &mut Frame, area: Rect) {
    let paragraph = Paragraph::new(FALLBACK_MESSAGE)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::Red))
        .block(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .title("error"),
        );
    frame.render_widget(Clear, area);
    frame.render_widget(paragraph, area);
}
