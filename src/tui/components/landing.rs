//! # Landing Page Component
//!
//! Shown in place of the message list while the conversation is empty.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use crate::tui::component::Component;

pub const WELCOME_TITLE: &str = "Welcome to PromptPilot!";
pub const WELCOME_BODY: &str = "Enter a prompt below and I'll help you improve it.";
pub const WELCOME_HINT: &str = "Try something like: \"Create an image of a sunset over the ocean\"";

pub struct LandingPage;

impl Component for LandingPage {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let lines = vec![
            Line::from(Span::styled(
                WELCOME_TITLE,
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::default(),
            Line::from(WELCOME_BODY),
            Line::default(),
            Line::from(Span::styled(
                WELCOME_HINT,
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )),
            Line::from(Span::styled(
                format!("v{}", env!("CARGO_PKG_VERSION")),
                Style::default().fg(Color::DarkGray),
            )),
        ];

        let [centered] = Layout::vertical([Constraint::Length(lines.len() as u16 + 1)])
            .flex(Flex::Center)
            .areas(area);

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, centered);
    }
}
