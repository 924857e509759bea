//! # Dashboard
//!
//! The root screen. Left: registered services grouped by category. Right:
//! the active selection (with any account ids the resolver found) and the
//! alias list. Enter opens the highlighted service.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Padding, Paragraph};

use crate::core::state::App;
use crate::tui::event::TuiEvent;
use crate::tui::view::{Cursor, Intent, NavTarget, View, ViewId, ViewKind, next_view_id};

enum Row {
    Category(String),
    Service(String),
}

pub struct Dashboard {
    id: ViewId,
    rows: Vec<Row>,
    /// Indices into `rows` that can be selected.
    services: Vec<usize>,
    cursor: Cursor,
    list_state: ListState,
    height: u16,
}

impl Dashboard {
    pub fn new() -> Self {
        Self {
            id: next_view_id(),
            rows: Vec::new(),
            services: Vec::new(),
            cursor: Cursor::default(),
            list_state: ListState::default(),
            height: 0,
        }
    }

    pub fn selected_service(&self) -> Option<&str> {
        let row = self.services.get(self.cursor.index)?;
        match &self.rows[*row] {
            Row::Service(service) => Some(service),
            Row::Category(_) => None,
        }
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

impl View for Dashboard {
    fn id(&self) -> ViewId {
        self.id
    }

    fn kind(&self) -> ViewKind {
        ViewKind::Dashboard
    }

    fn title(&self) -> String {
        "Home".to_string()
    }

    fn init(&mut self, app: &App) -> Vec<Intent> {
        self.rows.clear();
        self.services.clear();
        for (category, services) in app.registry.categories() {
            self.rows.push(Row::Category(category));
            for service in services {
                self.services.push(self.rows.len());
                self.rows.push(Row::Service(service));
            }
        }
        self.cursor.clamp(self.services.len());
        Vec::new()
    }

    fn handle_event(&mut self, event: &TuiEvent, _app: &App) -> Vec<Intent> {
        let page = self.height.saturating_sub(2) as usize;
        if self.cursor.handle_key(event, self.services.len(), page) {
            return Vec::new();
        }
        match event {
            TuiEvent::Submit => match self.selected_service() {
                Some(service) => vec![Intent::Open(NavTarget::Service(service.to_string()))],
                None => Vec::new(),
            },
            _ => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, app: &App) {
        let [left, right] =
            Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)])
                .areas(area);

        let selected_row = self.services.get(self.cursor.index).copied();
        let items: Vec<ListItem> = self
            .rows
            .iter()
            .map(|row| match row {
                Row::Category(name) => ListItem::new(Line::from(Span::styled(
                    name.clone(),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ))),
                Row::Service(name) => {
                    let types = app.registry.list_resources_for_service(name).len();
                    ListItem::new(Line::from(vec![
                        Span::raw(format!("  {name:<16}")),
                        Span::styled(
                            format!("{types} type(s)"),
                            Style::default().fg(Color::DarkGray),
                        ),
                    ]))
                }
            })
            .collect();
        self.list_state.select(selected_row);
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Services ")
                    .padding(Padding::horizontal(1)),
            )
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        frame.render_stateful_widget(list, left, &mut self.list_state);

        let mut lines = vec![
            Line::from(Span::styled(
                "Selection",
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(format!("  profiles: {}", app.selection.profiles.join(", "))),
            Line::from(format!("  regions:  {}", app.selection.regions.join(", "))),
        ];
        for (profile, account) in &app.selection.accounts {
            lines.push(Line::from(Span::styled(
                format!("  {profile} → {account}"),
                Style::default().fg(Color::DarkGray),
            )));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Aliases",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for (alias, target) in app.registry.aliases() {
            lines.push(Line::from(vec![
                Span::styled(format!("  {alias:<10}"), Style::default().fg(Color::Yellow)),
                Span::raw(target.to_string()),
            ]));
        }
        let info = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Context ")
                .padding(Padding::horizontal(1)),
        );
        frame.render_widget(info, right);
    }

    fn resize(&mut self, _width: u16, height: u16) {
        self.height = height;
    }

    fn status_line(&self) -> String {
        format!("{} services  Enter open  R regions  P profiles", self.services.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_app;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_services_grouped_by_category() {
        let app = test_app();
        let mut dashboard = Dashboard::new();
        dashboard.init(&app);

        // Compute comes first alphabetically: ec2, lambda
        assert_eq!(dashboard.selected_service(), Some("ec2"));
        dashboard.handle_event(&TuiEvent::CursorDown, &app);
        assert_eq!(dashboard.selected_service(), Some("lambda"));
    }

    #[test]
    fn test_enter_opens_service_browser() {
        let app = test_app();
        let mut dashboard = Dashboard::new();
        dashboard.init(&app);

        let intents = dashboard.handle_event(&TuiEvent::Submit, &app);
        assert!(matches!(
            intents.as_slice(),
            [Intent::Open(NavTarget::Service(s))] if s == "ec2"
        ));
    }

    #[test]
    fn test_render_lists_aliases() {
        let app = test_app();
        let mut dashboard = Dashboard::new();
        dashboard.init(&app);

        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal
            .draw(|f| dashboard.render(f, f.area(), &app))
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("Compute"));
        assert!(text.contains("ec2/security-groups"));
    }
}
