//! # Startup Warnings Overlay
//!
//! Shown once, before anything else, when startup hit non-fatal problems
//! (unreadable config, unknown default resource types). Enter or Esc
//! dismisses it; nothing else gets through while it is up.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap};

use super::centered_rect;
use crate::tui::component::Component;

pub struct WarningsOverlay<'a> {
    pub warnings: &'a [String],
}

impl<'a> WarningsOverlay<'a> {
    pub fn new(warnings: &'a [String]) -> Self {
        Self { warnings }
    }
}

impl Component for WarningsOverlay<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let overlay = centered_rect(70, 50, area);
        frame.render_widget(Clear, overlay);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Startup warnings ")
            .title_alignment(Alignment::Left)
            .title_bottom(Line::from(" Enter / Esc to continue ").centered())
            .padding(Padding::horizontal(1));

        let lines: Vec<Line> = self
            .warnings
            .iter()
            .map(|w| {
                Line::from(vec![
                    Span::styled(
                        "• ",
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(w.clone()),
                ])
            })
            .collect();

        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, overlay);
    }
}
