//! Activity log: every status message shown this session, oldest first.
//! Sticks to the newest entry until the user scrolls up.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Padding, Paragraph};

use crate::core::state::App;
use crate::core::status::StatusLevel;
use crate::tui::event::TuiEvent;
use crate::tui::view::{Intent, View, ViewId, ViewKind, next_view_id};

pub struct LogView {
    id: ViewId,
    /// Lines scrolled up from the bottom.
    offset: usize,
    height: u16,
}

impl LogView {
    pub fn new() -> Self {
        Self {
            id: next_view_id(),
            offset: 0,
            height: 0,
        }
    }

    pub fn is_following(&self) -> bool {
        self.offset == 0
    }
}

impl Default for LogView {
    fn default() -> Self {
        Self::new()
    }
}

fn level_color(level: StatusLevel) -> Color {
    match level {
        StatusLevel::Info => Color::Gray,
        StatusLevel::Warning => Color::Yellow,
        StatusLevel::Error => Color::Red,
    }
}

impl View for LogView {
    fn id(&self) -> ViewId {
        self.id
    }

    fn kind(&self) -> ViewKind {
        ViewKind::Log
    }

    fn title(&self) -> String {
        "Activity".to_string()
    }

    fn init(&mut self, _app: &App) -> Vec<Intent> {
        self.offset = 0;
        Vec::new()
    }

    fn handle_event(&mut self, event: &TuiEvent, app: &App) -> Vec<Intent> {
        let len = app.status.history_len();
        let page = self.height.saturating_sub(2).max(1) as usize;
        let max = len.saturating_sub(1);
        match event {
            TuiEvent::CursorUp | TuiEvent::InputChar('k') => {
                self.offset = (self.offset + 1).min(max)
            }
            TuiEvent::CursorDown | TuiEvent::InputChar('j') => {
                self.offset = self.offset.saturating_sub(1)
            }
            TuiEvent::PageUp => self.offset = (self.offset + page).min(max),
            TuiEvent::PageDown => self.offset = self.offset.saturating_sub(page),
            TuiEvent::Home | TuiEvent::InputChar('g') => self.offset = max,
            TuiEvent::End | TuiEvent::InputChar('G') => self.offset = 0,
            _ => {}
        }
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, app: &App) {
        self.height = area.height;
        let visible = area.height.saturating_sub(2) as usize;
        let entries: Vec<_> = app.status.history().collect();
        let end = entries.len().saturating_sub(self.offset);
        let start = end.saturating_sub(visible);

        let lines: Vec<Line> = entries[start..end]
            .iter()
            .map(|entry| {
                Line::from(Span::styled(
                    entry.line(),
                    Style::default().fg(level_color(entry.message.level)),
                ))
            })
            .collect();

        let title = if self.is_following() {
            " Activity ".to_string()
        } else {
            format!(" Activity ({} newer below) ", self.offset)
        };
        let paragraph = if lines.is_empty() {
            Paragraph::new("Nothing yet.").style(Style::default().fg(Color::DarkGray))
        } else {
            Paragraph::new(lines)
        };
        frame.render_widget(
            paragraph.block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title)
                    .padding(Padding::horizontal(1)),
            ),
            area,
        );
    }

    fn resize(&mut self, _width: u16, height: u16) {
        self.height = height;
    }

    fn status_line(&self) -> String {
        "↑/↓ scroll  G newest".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::status::StatusMessage;
    use crate::test_support::test_app;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn screen(view: &mut LogView, app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 8)).unwrap();
        terminal.draw(|f| view.render(f, f.area(), app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_follows_newest_entries() {
        let mut app = test_app();
        for i in 0..10 {
            app.notify(StatusMessage::info(format!("entry-{i}")));
        }
        app.notify(StatusMessage::error("listing failed"));

        let mut view = LogView::new();
        view.init(&app);
        let text = screen(&mut view, &app);
        assert!(text.contains("listing failed"));
        assert!(text.contains("ERROR"));
        assert!(!text.contains("entry-0"));
    }

    #[test]
    fn test_scrolling_up_reveals_older_entries() {
        let mut app = test_app();
        for i in 0..10 {
            app.notify(StatusMessage::info(format!("entry-{i}")));
        }
        let mut view = LogView::new();
        view.init(&app);
        view.handle_event(&TuiEvent::Home, &app);
        assert!(!view.is_following());
        assert!(screen(&mut view, &app).contains("entry-0"));

        view.handle_event(&TuiEvent::End, &app);
        assert!(view.is_following());
    }
}
