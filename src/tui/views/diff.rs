//! Two resources of the same type side by side. Lines present on only one
//! side are highlighted; both panes scroll together.

use std::collections::HashSet;
use std::sync::Arc;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::core::state::App;
use crate::render::Renderer;
use crate::resource::{Provenance, ResourceRef, same_resource};
use crate::tui::event::TuiEvent;
use crate::tui::view::{Intent, View, ViewId, ViewKind, next_view_id};

struct Side {
    heading: String,
    lines: Vec<(String, bool)>,
}

impl Side {
    fn changed(&self) -> usize {
        self.lines.iter().filter(|(_, changed)| *changed).count()
    }
}

pub struct DiffView {
    id: ViewId,
    label: String,
    left: Side,
    right: Side,
    identical: bool,
    scroll: u16,
    height: u16,
}

impl DiffView {
    pub fn new(
        label: String,
        left: ResourceRef,
        right: ResourceRef,
        renderer: Arc<dyn Renderer>,
    ) -> Self {
        let left_text = renderer.detail(left.as_ref());
        let right_text = renderer.detail(right.as_ref());
        let left_set: HashSet<&str> = left_text.lines().collect();
        let right_set: HashSet<&str> = right_text.lines().collect();

        let side = |resource: &ResourceRef, text: &str, other: &HashSet<&str>| Side {
            heading: format!(
                "{} ({})",
                resource.id(),
                Provenance::of(resource.as_ref()).label()
            ),
            lines: text
                .lines()
                .map(|l| (l.to_string(), !other.contains(l)))
                .collect(),
        };

        Self {
            id: next_view_id(),
            label,
            left: side(&left, &left_text, &right_set),
            right: side(&right, &right_text, &left_set),
            identical: same_resource(&left, &right),
            scroll: 0,
            height: 0,
        }
    }

    /// Lines unique to (left, right).
    pub fn changed_lines(&self) -> (usize, usize) {
        (self.left.changed(), self.right.changed())
    }

    fn max_scroll(&self) -> u16 {
        let longest = self.left.lines.len().max(self.right.lines.len()) as u16;
        longest.saturating_sub(self.height.saturating_sub(2))
    }

    fn pane(side: &Side, color: Color, scroll: u16) -> Paragraph<'static> {
        let lines: Vec<Line> = side
            .lines
            .iter()
            .map(|(text, changed)| {
                if *changed {
                    Line::from(Span::styled(text.clone(), Style::default().fg(color)))
                } else {
                    Line::from(text.clone())
                }
            })
            .collect();
        Paragraph::new(lines)
            .scroll((scroll, 0))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ", side.heading)),
            )
    }
}

impl View for DiffView {
    fn id(&self) -> ViewId {
        self.id
    }

    fn kind(&self) -> ViewKind {
        ViewKind::Diff
    }

    fn title(&self) -> String {
        format!("{} diff", self.label)
    }

    fn init(&mut self, _app: &App) -> Vec<Intent> {
        Vec::new()
    }

    fn handle_event(&mut self, event: &TuiEvent, _app: &App) -> Vec<Intent> {
        let page = self.height.saturating_sub(2).max(1);
        match event {
            TuiEvent::CursorUp | TuiEvent::InputChar('k') => {
                self.scroll = self.scroll.saturating_sub(1)
            }
            TuiEvent::CursorDown | TuiEvent::InputChar('j') => {
                self.scroll = (self.scroll + 1).min(self.max_scroll())
            }
            TuiEvent::PageUp => self.scroll = self.scroll.saturating_sub(page),
            TuiEvent::PageDown => self.scroll = (self.scroll + page).min(self.max_scroll()),
            TuiEvent::Home | TuiEvent::InputChar('g') => self.scroll = 0,
            TuiEvent::End | TuiEvent::InputChar('G') => self.scroll = self.max_scroll(),
            _ => {}
        }
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, _app: &App) {
        let (panes, note) = if self.identical {
            let [note, panes] =
                Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);
            (panes, Some(note))
        } else {
            (area, None)
        };
        if let Some(note) = note {
            frame.render_widget(
                Line::from(Span::styled(
                    " Both sides are the same resource",
                    Style::default().fg(Color::Yellow),
                )),
                note,
            );
        }

        self.height = panes.height;
        let scroll = self.scroll.min(self.max_scroll());
        let [left, right] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(panes);
        frame.render_widget(Self::pane(&self.left, Color::Red, scroll), left);
        frame.render_widget(Self::pane(&self.right, Color::Green, scroll), right);
    }

    fn resize(&mut self, _width: u16, height: u16) {
        self.height = height;
    }

    fn status_line(&self) -> String {
        let (left, right) = self.changed_lines();
        format!("{left} line(s) only left · {right} only right")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::DefaultRenderer;
    use crate::resource::CloudResource;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn diff(left: CloudResource, right: CloudResource) -> DiffView {
        DiffView::new(
            "ec2/instances".to_string(),
            left.into_ref(),
            right.into_ref(),
            Arc::new(DefaultRenderer),
        )
    }

    #[test]
    fn test_counts_lines_unique_to_each_side() {
        let view = diff(
            CloudResource::new("i-1", "web").with_tag("env", "prod"),
            CloudResource::new("i-2", "web").with_tag("env", "dev"),
        );
        // ID line and the env tag differ; Name and the "Tags" heading match.
        assert_eq!(view.changed_lines(), (2, 2));
    }

    #[test]
    fn test_same_resource_is_noted() {
        let app = crate::test_support::test_app();
        let mut view = diff(CloudResource::new("i-1", "web"), CloudResource::new("i-1", "web"));
        assert_eq!(view.changed_lines(), (0, 0));

        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal.draw(|f| view.render(f, f.area(), &app)).unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("same resource"));
    }
}
