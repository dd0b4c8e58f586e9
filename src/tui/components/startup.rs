//! # Startup Screen
//!
//! Shown before the chat while the backend warms up. Types out a greeting,
//! then displays whatever the health check reports.

use std::time::{Duration, Instant};

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::client::HealthStatus;
use crate::tui::component::Component;

pub const STARTUP_LINE: &str = "Prompt Pilot: Your AI assistant. Loading backend...";
pub const STARTUP_TYPING_INTERVAL: Duration = Duration::from_millis(50);

pub struct StartupScreen {
    started: Instant,
    status: Option<HealthStatus>,
}

impl StartupScreen {
    pub fn new(started: Instant) -> Self {
        Self {
            started,
            status: None,
        }
    }

    fn typed_chars(&self, now: Instant) -> usize {
        let ticks = now.saturating_duration_since(self.started).as_millis()
            / STARTUP_TYPING_INTERVAL.as_millis();
        (ticks as usize).min(STARTUP_LINE.chars().count())
    }

    /// Prefix of the greeting typed so far (the line is ASCII).
    pub fn typed_text(&self, now: Instant) -> &'static str {
        &STARTUP_LINE[..self.typed_chars(now)]
    }

    pub fn typing_done(&self, now: Instant) -> bool {
        self.typed_chars(now) == STARTUP_LINE.chars().count()
    }

    pub fn set_status(&mut self, status: HealthStatus) {
        self.status = Some(status);
    }

    pub fn status_text(&self) -> Option<&'static str> {
        self.status.map(|status| match status {
            HealthStatus::Checking => "Checking backend...",
            HealthStatus::Retrying { .. } => "Backend not ready. Retrying...",
            HealthStatus::Ready => "Backend ready.",
        })
    }

    /// How many probes have failed so far, shown under the status while retrying.
    pub fn attempts_text(&self) -> Option<String> {
        match self.status {
            Some(HealthStatus::Retrying { failed_attempts: 1 }) => Some("1 failed attempt".into()),
            Some(HealthStatus::Retrying { failed_attempts }) => {
                Some(format!("{failed_attempts} failed attempts"))
            }
            _ => None,
        }
    }

    pub fn render_at(&self, frame: &mut Frame, area: Rect, now: Instant) {
        let status_style = match self.status {
            Some(HealthStatus::Retrying { .. }) => Style::default().fg(Color::Yellow),
            Some(HealthStatus::Ready) => Style::default().fg(Color::Green),
            _ => Style::default().fg(Color::DarkGray),
        };

        let lines = vec![
            Line::from(Span::styled(
                "Prompt Pilot",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::default(),
            Line::from(self.typed_text(now)),
            Line::default(),
            Line::from(Span::styled(self.status_text().unwrap_or(""), status_style)),
            Line::from(Span::styled(
                self.attempts_text().unwrap_or_default(),
                Style::default().fg(Color::DarkGray),
            )),
        ];

        let [centered] = Layout::vertical([Constraint::Length(lines.len() as u16)])
            .flex(Flex::Center)
            .areas(area);
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), centered);
    }
}

impl Component for StartupScreen {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.render_at(frame, area, Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn types_one_char_per_interval() {
        let t0 = Instant::now();
        let screen = StartupScreen::new(t0);
        assert_eq!(screen.typed_text(t0), "");
        assert_eq!(screen.typed_text(t0 + STARTUP_TYPING_INTERVAL * 6), "Prompt");
        assert!(!screen.typing_done(t0 + STARTUP_TYPING_INTERVAL * 6));
        assert!(screen.typing_done(t0 + STARTUP_TYPING_INTERVAL * 100));
        assert_eq!(screen.typed_text(t0 + STARTUP_TYPING_INTERVAL * 100), STARTUP_LINE);
    }

    #[test]
    fn status_text_follows_health() {
        let mut screen = StartupScreen::new(Instant::now());
        assert_eq!(screen.status_text(), None);
        screen.set_status(HealthStatus::Checking);
        assert_eq!(screen.status_text(), Some("Checking backend..."));
        screen.set_status(HealthStatus::Retrying { failed_attempts: 1 });
        assert_eq!(screen.status_text(), Some("Backend not ready. Retrying..."));
        assert_eq!(screen.attempts_text().as_deref(), Some("1 failed attempt"));
        screen.set_status(HealthStatus::Ready);
        assert_eq!(screen.attempts_text(), None);
    }

    #[test]
    fn renders_typed_line_and_status() {
        let t0 = Instant::now();
        let mut screen = StartupScreen::new(t0);
        screen.set_status(HealthStatus::Retrying { failed_attempts: 2 });
        let mut terminal = Terminal::new(TestBackend::new(70, 10)).unwrap();
        terminal
            .draw(|f| screen.render_at(f, f.area(), t0 + STARTUP_TYPING_INTERVAL * 100))
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("Prompt Pilot"));
        assert!(text.contains("Loading backend..."));
        assert!(text.contains("Retrying"));
        assert!(text.contains("2 failed attempts"));
    }
}
