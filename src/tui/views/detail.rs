//! # Detail View
//!
//! One resource, rendered by its type's renderer. Opened either with the
//! resource in hand (drill-down from a list) or with just an id (`:ec2
//! instances i-123` or a startup path), in which case it looks the resource
//! up first.
//!
//! Lookups always `get` from a single branch: the resource's own for a
//! drill-down, the first selected region/profile for a bare id. Only a type
//! without `get` falls back to listing and picking the id out.

use log::debug;
use std::sync::Arc;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Padding, Paragraph};

use crate::adapter::{AdapterError, Operation, ParentFilter, ResourceSource};
use crate::core::error::NavError;
use crate::core::state::App;
use crate::render::Renderer;
use crate::resource::{Provenance, ResourceRef};
use crate::tui::event::TuiEvent;
use crate::tui::message::{Effect, ViewData};
use crate::tui::view::{Intent, Refreshable, View, ViewId, ViewKind, next_view_id};

enum Subject {
    Loaded(ResourceRef),
    Pending(String),
}

impl Subject {
    fn id(&self) -> &str {
        match self {
            Subject::Loaded(resource) => resource.id(),
            Subject::Pending(id) => id,
        }
    }
}

pub struct DetailView {
    id: ViewId,
    service: String,
    resource_type: String,
    filter: Option<ParentFilter>,
    renderer: Arc<dyn Renderer>,
    subject: Subject,
    generation: u64,
    loading: bool,
    error: Option<String>,
    scroll: u16,
    line_count: u16,
    height: u16,
}

impl DetailView {
    /// A resource already in hand; `init` refreshes it from its own branch.
    pub fn loaded(
        service: String,
        resource_type: String,
        filter: Option<ParentFilter>,
        resource: ResourceRef,
        renderer: Arc<dyn Renderer>,
    ) -> Self {
        Self::with_subject(service, resource_type, filter, Subject::Loaded(resource), renderer)
    }

    /// Only an id; `init` looks it up.
    pub fn lookup(
        service: String,
        resource_type: String,
        id: String,
        renderer: Arc<dyn Renderer>,
    ) -> Self {
        Self::with_subject(service, resource_type, None, Subject::Pending(id), renderer)
    }

    fn with_subject(
        service: String,
        resource_type: String,
        filter: Option<ParentFilter>,
        subject: Subject,
        renderer: Arc<dyn Renderer>,
    ) -> Self {
        Self {
            id: next_view_id(),
            service,
            resource_type,
            filter,
            renderer,
            subject,
            generation: 0,
            loading: false,
            error: None,
            scroll: 0,
            line_count: 0,
            height: 0,
        }
    }

    pub fn resource(&self) -> Option<&ResourceRef> {
        match &self.subject {
            Subject::Loaded(resource) => Some(resource),
            Subject::Pending(_) => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    fn load(&mut self, app: &App) -> Vec<Intent> {
        let source = match app.source(&self.service, &self.resource_type, self.filter.clone()) {
            Ok(source) => Arc::new(source),
            Err(e) => {
                self.error = Some(e.to_string());
                return vec![Intent::Report(e)];
            }
        };

        let target = match &self.subject {
            Subject::Loaded(resource) => Some(Provenance::of(resource.as_ref())),
            Subject::Pending(_) if source.is_fanout() => source.first_target(),
            Subject::Pending(_) => None,
        };
        let id = self.subject.id().to_string();

        let effect = if source.supports(Operation::Get) {
            Effect::Fetch {
                view: self.id,
                generation: self.generation + 1,
                source,
                id,
                target,
            }
        } else if matches!(self.subject, Subject::Pending(_)) {
            Effect::List {
                view: self.id,
                generation: self.generation + 1,
                source,
            }
        } else {
            return Vec::new();
        };

        self.generation += 1;
        self.loading = true;
        self.error = None;
        vec![Intent::Effect(effect)]
    }

    fn found(&mut self, resource: ResourceRef) {
        self.subject = Subject::Loaded(resource);
        self.error = None;
    }

    fn failed(&mut self, error: AdapterError) -> Vec<Intent> {
        let error = NavError::from(error);
        self.error = Some(error.to_string());
        vec![Intent::Report(error)]
    }

    fn max_scroll(&self) -> u16 {
        self.line_count.saturating_sub(self.height.saturating_sub(2))
    }
}

impl View for DetailView {
    fn id(&self) -> ViewId {
        self.id
    }

    fn kind(&self) -> ViewKind {
        ViewKind::Detail
    }

    fn title(&self) -> String {
        format!("{}/{}: {}", self.service, self.resource_type, self.subject.id())
    }

    fn init(&mut self, app: &App) -> Vec<Intent> {
        self.load(app)
    }

    fn handle_event(&mut self, event: &TuiEvent, app: &App) -> Vec<Intent> {
        let page = self.height.saturating_sub(2).max(1);
        match event {
            TuiEvent::CursorUp | TuiEvent::InputChar('k') => {
                self.scroll = self.scroll.saturating_sub(1);
            }
            TuiEvent::CursorDown | TuiEvent::InputChar('j') => {
                self.scroll = (self.scroll + 1).min(self.max_scroll());
            }
            TuiEvent::PageUp => self.scroll = self.scroll.saturating_sub(page),
            TuiEvent::PageDown => self.scroll = (self.scroll + page).min(self.max_scroll()),
            TuiEvent::Home | TuiEvent::InputChar('g') => self.scroll = 0,
            TuiEvent::End | TuiEvent::InputChar('G') => self.scroll = self.max_scroll(),
            TuiEvent::InputChar('r') => return self.refresh(app),
            _ => {}
        }
        Vec::new()
    }

    fn receive(&mut self, generation: u64, data: ViewData, _app: &App) -> Vec<Intent> {
        if generation != self.generation {
            debug!("{}: dropping generation {}", self.title(), generation);
            return Vec::new();
        }
        self.loading = false;

        match data {
            ViewData::Fetched(Ok(resource)) => {
                self.found(resource);
                Vec::new()
            }
            ViewData::Listed(Ok(listing)) => {
                let id = self.subject.id().to_string();
                match listing.resources.into_iter().find(|r| r.id() == id) {
                    Some(resource) => {
                        self.found(resource);
                        Vec::new()
                    }
                    None => self.failed(AdapterError::NotFound(id)),
                }
            }
            ViewData::Fetched(Err(e)) | ViewData::Listed(Err(e)) => self.failed(e),
            ViewData::Paged(_) | ViewData::Deleted { .. } => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, _app: &App) {
        self.height = area.height;
        let mut title = format!(" {} ", self.title());
        if self.loading {
            title.push_str("(loading…) ");
        }
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .padding(Padding::horizontal(1));

        let paragraph = match (&self.subject, &self.error) {
            (Subject::Loaded(resource), _) => {
                let text = self.renderer.detail(resource.as_ref());
                let lines: Vec<Line> = text.lines().map(|l| Line::from(l.to_string())).collect();
                self.line_count = lines.len() as u16;
                Paragraph::new(lines).scroll((self.scroll.min(self.max_scroll()), 0))
            }
            (Subject::Pending(_), Some(error)) => {
                Paragraph::new(error.clone()).style(Style::default().fg(Color::Red))
            }
            (Subject::Pending(id), None) => Paragraph::new(format!("Looking up {id}…"))
                .style(Style::default().fg(Color::DarkGray)),
        };
        frame.render_widget(paragraph.block(block), area);
    }

    fn resize(&mut self, _width: u16, height: u16) {
        self.height = height;
    }

    fn status_line(&self) -> String {
        match self.resource() {
            Some(resource) => {
                let provenance = Provenance::of(resource.as_ref());
                format!("{}  r reload", provenance.label())
            }
            None => "r retry".to_string(),
        }
    }

    fn refreshable(&mut self) -> Option<&mut dyn Refreshable> {
        Some(self)
    }
}

impl Refreshable for DetailView {
    fn refresh(&mut self, app: &App) -> Vec<Intent> {
        self.load(app)
    }
}
