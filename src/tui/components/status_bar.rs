//! # StatusBar Component
//!
//! Bottom line. The transient status message wins while it is live;
//! otherwise the current view's own status line shows.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::core::status::{StatusLevel, StatusMessage};
use crate::tui::component::Component;

pub struct StatusBar {
    pub status: Option<StatusMessage>,
    pub view_line: String,
}

impl StatusBar {
    pub fn new(status: Option<StatusMessage>, view_line: String) -> Self {
        Self { status, view_line }
    }
}

fn level_style(level: StatusLevel) -> Style {
    match level {
        StatusLevel::Info => Style::default().fg(Color::Green),
        StatusLevel::Warning => Style::default().fg(Color::Yellow),
        StatusLevel::Error => Style::default().fg(Color::Red),
    }
}

impl Component for StatusBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let line = match &self.status {
            Some(message) => Line::from(vec![
                Span::styled(
                    format!("{} ", message.level.label()),
                    level_style(message.level),
                ),
                Span::raw(message.text.clone()),
            ]),
            None => Line::from(vec![
                Span::styled(self.view_line.clone(), Style::default().fg(Color::Gray)),
                Span::styled(
                    "  : command  ? help",
                    Style::default().fg(Color::DarkGray),
                ),
            ]),
        };
        frame.render_widget(line, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn rendered(bar: &mut StatusBar) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 1)).unwrap();
        terminal.draw(|f| bar.render(f, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_status_message_replaces_view_line() {
        let mut bar = StatusBar::new(
            Some(StatusMessage::warning("1 of 2 regions/profiles failed")),
            "12 resources".to_string(),
        );
        let text = rendered(&mut bar);
        assert!(text.contains("WARN"));
        assert!(text.contains("1 of 2"));
        assert!(!text.contains("12 resources"));
    }

    #[test]
    fn test_view_line_when_idle() {
        let mut bar = StatusBar::new(None, "12 resources".to_string());
        assert!(rendered(&mut bar).contains("12 resources"));
    }
}
