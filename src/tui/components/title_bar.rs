//! # TitleBar Component
//!
//! Top line: where you are and what you're looking at.
//!
//! ```text
//! cloudnav | ec2/instances | prod (+1) @ us-east-1 | refreshing…
//! ```
//!
//! Stateless. All three props come from different owners: the view title
//! from the navigator, the selection summary and refresh flag from `App`.

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

pub struct TitleBar {
    pub view_title: String,
    pub selection: String,
    pub refreshing: bool,
}

impl TitleBar {
    pub fn new(view_title: String, selection: String, refreshing: bool) -> Self {
        Self {
            view_title,
            selection,
            refreshing,
        }
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let separator = Span::styled(" | ", Style::default().fg(Color::DarkGray));
        let mut spans = vec![
            Span::styled(
                "cloudnav",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            separator.clone(),
            Span::raw(self.view_title.clone()),
            separator.clone(),
            Span::styled(self.selection.clone(), Style::default().fg(Color::Yellow)),
        ];
        if self.refreshing {
            spans.push(separator);
            spans.push(Span::styled(
                "refreshing…",
                Style::default().fg(Color::DarkGray),
            ));
        }
        frame.render_widget(Line::from(spans), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn rendered(title_bar: &mut TitleBar) -> String {
        let backend = TestBackend::new(80, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                title_bar.render(f, f.area());
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_title_bar_shows_view_and_selection() {
        let mut title_bar = TitleBar::new(
            "ec2/instances".to_string(),
            "prod @ us-east-1".to_string(),
            false,
        );
        let text = rendered(&mut title_bar);

        assert!(text.contains("cloudnav"));
        assert!(text.contains("ec2/instances"));
        assert!(text.contains("prod @ us-east-1"));
        assert!(!text.contains("refreshing"));
    }

    #[test]
    fn test_title_bar_refresh_indicator() {
        let mut title_bar = TitleBar::new("Home".to_string(), "dev @ -".to_string(), true);
        assert!(rendered(&mut title_bar).contains("refreshing"));
    }
}
