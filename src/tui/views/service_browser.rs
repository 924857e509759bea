//! Resource types of one service. The default type is marked and starts
//! highlighted; sub-resources don't appear (they are reached by drill-down).

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Padding};

use crate::core::state::App;
use crate::tui::event::TuiEvent;
use crate::tui::view::{Cursor, Intent, NavTarget, View, ViewId, ViewKind, next_view_id};

pub struct ServiceBrowser {
    id: ViewId,
    service: String,
    types: Vec<String>,
    default: Option<String>,
    cursor: Cursor,
    list_state: ListState,
    initialized: bool,
}

impl ServiceBrowser {
    pub fn new(service: String) -> Self {
        Self {
            id: next_view_id(),
            service,
            types: Vec::new(),
            default: None,
            cursor: Cursor::default(),
            list_state: ListState::default(),
            initialized: false,
        }
    }

    pub fn selected(&self) -> Option<&str> {
        self.types.get(self.cursor.index).map(String::as_str)
    }
}

impl View for ServiceBrowser {
    fn id(&self) -> ViewId {
        self.id
    }

    fn kind(&self) -> ViewKind {
        ViewKind::ServiceBrowser
    }

    fn title(&self) -> String {
        self.service.clone()
    }

    fn init(&mut self, app: &App) -> Vec<Intent> {
        self.types = app.registry.list_resources_for_service(&self.service);
        self.default = app.registry.default_resource_for_service(&self.service);
        if !self.initialized {
            // Land on the default the first time; keep the user's place after that.
            if let Some(default) = &self.default {
                self.cursor.index = self.types.iter().position(|t| t == default).unwrap_or(0);
            }
            self.initialized = true;
        }
        self.cursor.clamp(self.types.len());
        Vec::new()
    }

    fn handle_event(&mut self, event: &TuiEvent, _app: &App) -> Vec<Intent> {
        if self.cursor.handle_key(event, self.types.len(), 10) {
            return Vec::new();
        }
        match (event, self.selected()) {
            (TuiEvent::Submit, Some(resource_type)) => {
                vec![Intent::Open(NavTarget::Resources {
                    service: self.service.clone(),
                    resource_type: resource_type.to_string(),
                    filter: None,
                })]
            }
            _ => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, _app: &App) {
        let items: Vec<ListItem> = self
            .types
            .iter()
            .map(|t| {
                let mut spans = vec![Span::raw(t.clone())];
                if self.default.as_deref() == Some(t.as_str()) {
                    spans.push(Span::styled(
                        "  (default)",
                        Style::default().fg(Color::DarkGray),
                    ));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();
        self.list_state
            .select((!self.types.is_empty()).then_some(self.cursor.index));
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} ", self.service))
                    .padding(Padding::horizontal(1)),
            )
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        frame.render_stateful_widget(list, area, &mut self.list_state);
    }

    fn status_line(&self) -> String {
        format!("{} resource types  Enter open", self.types.len())
    }
}
