//! # Resource Browser
//!
//! Lists every resource of one (service, resource type) across the active
//! selection.
//!
//! ```text
//! init / refresh ──► app.source() ──► Effect::List  (or Effect::Page for
//!                     generation += 1                 page-capable sources)
//!
//! receive(gen, data): gen != generation → dropped
//! ```
//!
//! Keys:
//!
//! | Key      | Action                                                   |
//! |----------|----------------------------------------------------------|
//! | `/`      | edit the filter (captures input until Enter/Esc)         |
//! | `Enter`  | open the child listing if one is linked, else the detail |
//! | `m`      | mark; marking a second resource opens the diff           |
//! | `Ctrl+D` | delete (press twice)                                     |
//! | `n`      | load the next page                                       |
//! | `r`      | reload                                                   |

use log::debug;
use std::sync::Arc;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};

use crate::adapter::{Listing, Operation, Page, ParentFilter, ResourceSource};
use crate::core::command::Command;
use crate::core::error::NavError;
use crate::core::state::App;
use crate::core::status::StatusMessage;
use crate::registry::ChildLink;
use crate::render::Renderer;
use crate::resource::{Provenance, ResourceRef, same_resource};
use crate::tui::event::TuiEvent;
use crate::tui::message::{Effect, ViewData};
use crate::tui::view::{
    Cursor, Intent, NavTarget, Refreshable, View, ViewId, ViewKind, next_view_id,
};

pub struct ResourceBrowser {
    id: ViewId,
    service: String,
    resource_type: String,
    filter: Option<ParentFilter>,
    renderer: Arc<dyn Renderer>,
    source: Option<Arc<ResourceSource>>,
    child: Option<ChildLink>,

    resources: Vec<ResourceRef>,
    /// Indices into `resources` that pass the filter.
    visible: Vec<usize>,
    query: String,
    editing: bool,
    cursor: Cursor,
    table_state: TableState,

    generation: u64,
    loading: bool,
    /// Next page arrives as a replacement (first page) or an append.
    replace_next_page: bool,
    next_token: Option<String>,
    branches: usize,
    failed_branches: usize,
    truncated: bool,
    error: Option<String>,

    marked: Option<ResourceRef>,
    pending_delete: Option<String>,
    height: u16,
}

impl ResourceBrowser {
    pub fn new(
        service: String,
        resource_type: String,
        filter: Option<ParentFilter>,
        renderer: Arc<dyn Renderer>,
    ) -> Self {
        Self {
            id: next_view_id(),
            service,
            resource_type,
            filter,
            renderer,
            source: None,
            child: None,
            resources: Vec::new(),
            visible: Vec::new(),
            query: String::new(),
            editing: false,
            cursor: Cursor::default(),
            table_state: TableState::default(),
            generation: 0,
            loading: false,
            replace_next_page: true,
            next_token: None,
            branches: 0,
            failed_branches: 0,
            truncated: false,
            error: None,
            marked: None,
            pending_delete: None,
            height: 0,
        }
    }

    pub fn resources(&self) -> &[ResourceRef] {
        &self.resources
    }

    /// Resources that pass the current filter, in display order.
    pub fn visible(&self) -> Vec<&ResourceRef> {
        self.visible.iter().map(|&i| &self.resources[i]).collect()
    }

    pub fn selected(&self) -> Option<&ResourceRef> {
        self.visible
            .get(self.cursor.index)
            .map(|&i| &self.resources[i])
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn key(&self) -> String {
        format!("{}/{}", self.service, self.resource_type)
    }

    // ========================================================================
    // Loading
    // ========================================================================

    fn load(&mut self, app: &App) -> Vec<Intent> {
        self.pending_delete = None;
        self.next_token = None;
        let source = match app.source(&self.service, &self.resource_type, self.filter.clone()) {
            Ok(source) => Arc::new(source),
            Err(e) => {
                self.source = None;
                self.loading = false;
                self.error = Some(e.to_string());
                return vec![Intent::Report(e)];
            }
        };
        self.child = app
            .registry
            .child_of(&self.service, &self.resource_type)
            .cloned();
        self.generation += 1;
        self.loading = true;
        self.error = None;
        self.branches = source.branch_count();
        self.source = Some(source.clone());

        let effect = if source.supports(Operation::ListPage) {
            self.replace_next_page = true;
            Effect::Page {
                view: self.id,
                generation: self.generation,
                source,
                token: None,
            }
        } else {
            Effect::List {
                view: self.id,
                generation: self.generation,
                source,
            }
        };
        vec![Intent::Effect(effect)]
    }

    fn next_page(&mut self) -> Vec<Intent> {
        let (Some(source), Some(token)) = (&self.source, &self.next_token) else {
            return vec![Intent::Status(StatusMessage::info("No more pages"))];
        };
        if self.loading {
            return Vec::new();
        }
        self.generation += 1;
        self.loading = true;
        self.replace_next_page = false;
        vec![Intent::Effect(Effect::Page {
            view: self.id,
            generation: self.generation,
            source: source.clone(),
            token: Some(token.clone()),
        })]
    }

    fn apply_listing(&mut self, listing: Listing) -> Vec<Intent> {
        let mut intents = Vec::new();
        self.branches = listing.branches;
        self.failed_branches = listing.failures.len();
        self.truncated = listing.truncated;
        if listing.is_partial() {
            let detail = listing
                .failures
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            intents.push(Intent::Report(NavError::PartialFanoutFailure {
                failed: listing.failures.len(),
                total: listing.branches,
                detail,
            }));
        }
        if listing.truncated {
            intents.push(Intent::Status(StatusMessage::warning(format!(
                "{}: listing stopped early at {} items",
                self.key(),
                listing.resources.len()
            ))));
        }
        self.resources = listing.resources;
        self.refilter();
        intents
    }

    fn apply_page(&mut self, page: Page) {
        if self.replace_next_page {
            self.resources = page.resources;
        } else {
            self.resources.extend(page.resources);
        }
        self.next_token = page.next_token;
        self.refilter();
    }

    // ========================================================================
    // Filtering
    // ========================================================================

    fn matches(&self, resource: &ResourceRef, needle: &str) -> bool {
        self.renderer
            .row(resource.as_ref())
            .iter()
            .chain(resource.tags().values())
            .any(|cell| cell.to_lowercase().contains(needle))
    }

    fn refilter(&mut self) {
        let needle = self.query.to_lowercase();
        self.visible = (0..self.resources.len())
            .filter(|&i| needle.is_empty() || self.matches(&self.resources[i], &needle))
            .collect();
        self.cursor.clamp(self.visible.len());
    }

    fn set_query(&mut self, query: String) {
        self.query = query;
        self.cursor.index = 0;
        self.refilter();
    }

    fn handle_filter_input(&mut self, event: &TuiEvent) -> Vec<Intent> {
        match event {
            TuiEvent::Submit => self.editing = false,
            TuiEvent::Escape => {
                self.editing = false;
                self.set_query(String::new());
            }
            TuiEvent::Backspace => {
                let mut query = self.query.clone();
                query.pop();
                self.set_query(query);
            }
            TuiEvent::InputChar(c) => {
                let mut query = self.query.clone();
                query.push(*c);
                self.set_query(query);
            }
            _ => {}
        }
        Vec::new()
    }

    // ========================================================================
    // Actions on the selected resource
    // ========================================================================

    fn drill_down(&self) -> Vec<Intent> {
        let Some(resource) = self.selected() else {
            return Vec::new();
        };
        let target = match &self.child {
            Some(child) => NavTarget::Resources {
                service: self.service.clone(),
                resource_type: child.resource_type.clone(),
                filter: Some(ParentFilter::new(child.filter_key.clone(), resource.id())),
            },
            None => NavTarget::Detail {
                service: self.service.clone(),
                resource_type: self.resource_type.clone(),
                filter: self.filter.clone(),
                resource: resource.clone(),
            },
        };
        vec![Intent::Open(target)]
    }

    fn toggle_mark(&mut self) -> Vec<Intent> {
        let Some(resource) = self.selected().cloned() else {
            return Vec::new();
        };
        match self.marked.take() {
            None => {
                let text = format!("Marked {}; mark another to diff", resource.id());
                self.marked = Some(resource);
                vec![Intent::Status(StatusMessage::info(text))]
            }
            Some(marked) if same_resource(&marked, &resource) => {
                vec![Intent::Status(StatusMessage::info("Mark cleared"))]
            }
            Some(marked) => vec![self.diff(marked, resource)],
        }
    }

    fn diff(&self, left: ResourceRef, right: ResourceRef) -> Intent {
        Intent::Open(NavTarget::Diff {
            service: self.service.clone(),
            resource_type: self.resource_type.clone(),
            left,
            right,
        })
    }

    fn delete(&mut self) -> Vec<Intent> {
        let (Some(source), Some(resource)) = (self.source.clone(), self.selected().cloned()) else {
            return Vec::new();
        };
        if !source.supports(Operation::Delete) {
            return vec![Intent::Status(StatusMessage::warning(format!(
                "{} doesn't support delete",
                self.key()
            )))];
        }
        let id = resource.id().to_string();
        if self.pending_delete.as_deref() != Some(id.as_str()) {
            let text = format!("Press Ctrl+D again to delete {id}");
            self.pending_delete = Some(id);
            return vec![Intent::Status(StatusMessage::warning(text))];
        }

        self.pending_delete = None;
        vec![
            Intent::Status(StatusMessage::info(format!("Deleting {id}…"))),
            Intent::Effect(Effect::Delete {
                view: self.id,
                generation: self.generation,
                source,
                id,
                target: Some(Provenance::of(resource.as_ref())),
            }),
        ]
    }

    fn find(&self, id: &str) -> Option<ResourceRef> {
        self.resources.iter().find(|r| r.id() == id).cloned()
    }
}

impl View for ResourceBrowser {
    fn id(&self) -> ViewId {
        self.id
    }

    fn kind(&self) -> ViewKind {
        ViewKind::ResourceBrowser
    }

    fn title(&self) -> String {
        match &self.filter {
            Some(filter) => format!("{} ({}={})", self.key(), filter.key, filter.value),
            None => self.key(),
        }
    }

    fn init(&mut self, app: &App) -> Vec<Intent> {
        self.load(app)
    }

    fn handle_event(&mut self, event: &TuiEvent, app: &App) -> Vec<Intent> {
        if self.editing {
            return self.handle_filter_input(event);
        }
        if !matches!(event, TuiEvent::Delete) {
            self.pending_delete = None;
        }

        let page = self.height.saturating_sub(3) as usize;
        if self.cursor.handle_key(event, self.visible.len(), page) {
            return Vec::new();
        }
        match event {
            TuiEvent::InputChar('/') => {
                self.editing = true;
                Vec::new()
            }
            TuiEvent::Submit => self.drill_down(),
            TuiEvent::InputChar('m') => self.toggle_mark(),
            TuiEvent::Delete => self.delete(),
            TuiEvent::InputChar('n') => self.next_page(),
            TuiEvent::InputChar('r') => self.refresh(app),
            _ => Vec::new(),
        }
    }

    fn receive(&mut self, generation: u64, data: ViewData, _app: &App) -> Vec<Intent> {
        if let ViewData::Deleted { id, target, result } = data {
            return match result {
                Ok(()) => {
                    let deleted = |r: &ResourceRef| {
                        r.id() == id
                            && target
                                .as_ref()
                                .is_none_or(|t| &Provenance::of(r.as_ref()) == t)
                    };
                    self.resources.retain(|r| !deleted(r));
                    if self.marked.as_ref().is_some_and(deleted) {
                        self.marked = None;
                    }
                    self.refilter();
                    vec![Intent::Status(StatusMessage::info(format!("Deleted {id}")))]
                }
                Err(e) => vec![Intent::Report(e.into())],
            };
        }

        if generation != self.generation {
            debug!(
                "{}: dropping generation {} (current {})",
                self.key(),
                generation,
                self.generation
            );
            return Vec::new();
        }
        self.loading = false;

        match data {
            ViewData::Listed(Ok(listing)) => self.apply_listing(listing),
            ViewData::Paged(Ok(page)) => {
                self.apply_page(page);
                Vec::new()
            }
            ViewData::Listed(Err(e)) | ViewData::Paged(Err(e)) => {
                let error = NavError::from(e);
                self.error = Some(error.to_string());
                vec![Intent::Report(error)]
            }
            ViewData::Fetched(_) | ViewData::Deleted { .. } => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, _app: &App) {
        let (table_area, filter_area) = if self.editing || !self.query.is_empty() {
            let [table, filter] =
                Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);
            (table, Some(filter))
        } else {
            (area, None)
        };

        let mut title = format!(" {} ", self.title());
        if self.loading {
            title.push_str("(loading…) ");
        }
        let block = Block::default().borders(Borders::ALL).title(title);

        if self.resources.is_empty() {
            let (text, style) = match (&self.error, self.loading) {
                (Some(error), _) => (error.clone(), Style::default().fg(Color::Red)),
                (None, true) => ("Loading…".to_string(), Style::default().fg(Color::DarkGray)),
                (None, false) => (
                    "No resources.".to_string(),
                    Style::default().fg(Color::DarkGray),
                ),
            };
            frame.render_widget(Paragraph::new(text).style(style).block(block), table_area);
        } else {
            let columns = self.renderer.columns();
            let mut widths = vec![Constraint::Length(1)];
            widths.extend(columns.iter().map(|c| Constraint::Length(c.width)));

            let header = Row::new(
                std::iter::once(Cell::from(""))
                    .chain(columns.iter().map(|c| Cell::from(c.title.clone()))),
            )
            .style(Style::default().add_modifier(Modifier::BOLD));

            let rows: Vec<Row> = self
                .visible
                .iter()
                .map(|&i| {
                    let resource = &self.resources[i];
                    let marked = self
                        .marked
                        .as_ref()
                        .is_some_and(|m| same_resource(m, resource));
                    let pending = self.pending_delete.as_deref() == Some(resource.id());
                    let marker = if marked { "*" } else { " " };
                    let row = Row::new(
                        std::iter::once(Cell::from(marker)).chain(
                            self.renderer
                                .row(resource.as_ref())
                                .into_iter()
                                .map(Cell::from),
                        ),
                    );
                    if pending {
                        row.style(Style::default().fg(Color::Red))
                    } else {
                        row
                    }
                })
                .collect();

            self.table_state
                .select((!self.visible.is_empty()).then_some(self.cursor.index));
            let table = Table::new(rows, widths)
                .header(header)
                .block(block)
                .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED));
            frame.render_stateful_widget(table, table_area, &mut self.table_state);
        }

        if let Some(filter_area) = filter_area {
            let style = if self.editing {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let line = Line::from(vec![
                Span::styled("/", style),
                Span::raw(self.query.clone()),
            ]);
            frame.render_widget(line, filter_area);
        }
    }

    fn resize(&mut self, _width: u16, height: u16) {
        self.height = height;
    }

    fn status_line(&self) -> String {
        let mut parts = vec![format!(
            "{}/{} items",
            self.visible.len(),
            self.resources.len()
        )];
        if self.branches > 1 {
            parts.push(format!("{} regions/profiles", self.branches));
        }
        if self.failed_branches > 0 {
            parts.push(format!("{} failed", self.failed_branches));
        }
        if self.truncated {
            parts.push("truncated".to_string());
        }
        if self.next_token.is_some() {
            parts.push("n: more".to_string());
        }
        if let Some(marked) = &self.marked {
            parts.push(format!("marked {}", marked.id()));
        }
        parts.join(" · ")
    }

    fn captures_input(&self) -> bool {
        self.editing
    }

    fn refreshable(&mut self) -> Option<&mut dyn Refreshable> {
        Some(self)
    }

    fn command(&mut self, command: &Command, _app: &App) -> Option<Vec<Intent>> {
        match command {
            Command::Filter(text) => {
                self.set_query(text.clone());
                Some(Vec::new())
            }
            Command::Diff(a, b) => Some(match (self.find(a), self.find(b)) {
                (Some(left), Some(right)) => vec![self.diff(left, right)],
                (None, _) => vec![Intent::Status(StatusMessage::warning(format!(
                    "{a} is not in this list"
                )))],
                (_, None) => vec![Intent::Status(StatusMessage::warning(format!(
                    "{b} is not in this list"
                )))],
            }),
            _ => None,
        }
    }
}

impl Refreshable for ResourceBrowser {
    fn refresh(&mut self, app: &App) -> Vec<Intent> {
        self.load(app)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{AdapterError, BranchFailure, Page, tag};
    use crate::render::DefaultRenderer;
    use crate::resource::{CloudResource, Resource};
    use crate::test_support::test_app;

    fn browser(service: &str, resource_type: &str) -> ResourceBrowser {
        ResourceBrowser::new(
            service.to_string(),
            resource_type.to_string(),
            None,
            Arc::new(DefaultRenderer),
        )
    }

    fn resource(id: &str, name: &str) -> ResourceRef {
        CloudResource::new(id, name).into_ref()
    }

    fn listed(resources: Vec<ResourceRef>) -> ViewData {
        ViewData::Listed(Ok(Listing {
            resources,
            failures: Vec::new(),
            branches: 1,
            truncated: false,
        }))
    }

    fn loaded(service: &str, resource_type: &str, resources: Vec<ResourceRef>) -> (ResourceBrowser, App) {
        let app = test_app();
        let mut view = browser(service, resource_type);
        view.init(&app);
        let generation = view.generation();
        view.receive(generation, listed(resources), &app);
        (view, app)
    }

    #[test]
    fn test_init_requests_page_for_paged_source() {
        let app = test_app();
        let mut view = browser("ec2", "instances");
        let intents = view.init(&app);
        assert!(matches!(
            intents.as_slice(),
            [Intent::Effect(Effect::Page { token: None, .. })]
        ));
        assert!(view.is_loading());
    }

    #[test]
    fn test_init_requests_list_for_plain_source() {
        let app = test_app();
        let mut view = browser("ec2", "security-groups");
        let intents = view.init(&app);
        assert!(matches!(
            intents.as_slice(),
            [Intent::Effect(Effect::List { .. })]
        ));
    }

    #[test]
    fn test_sub_resource_without_parent_reports() {
        let app = test_app();
        let mut view = browser("s3", "objects");
        let intents = view.init(&app);
        assert!(matches!(
            intents.as_slice(),
            [Intent::Report(NavError::MissingParent { .. })]
        ));
    }

    #[test]
    fn test_stale_generation_is_dropped() {
        let app = test_app();
        let mut view = browser("ec2", "security-groups");
        view.init(&app);
        let old = view.generation();
        view.refresh(&app);

        view.receive(old, listed(vec![resource("sg-old", "old")]), &app);
        assert!(view.resources().is_empty());

        let current = view.generation();
        view.receive(current, listed(vec![resource("sg-new", "new")]), &app);
        assert_eq!(view.resources()[0].id(), "sg-new");
    }

    #[test]
    fn test_partial_failure_keeps_results_and_warns() {
        let app = test_app();
        let mut view = browser("ec2", "security-groups");
        view.init(&app);
        let listing = Listing {
            resources: vec![resource("sg-1", "web")],
            failures: vec![BranchFailure {
                provenance: Provenance::new(Some("us-west-2".into()), None),
                message: "denied".into(),
            }],
            branches: 2,
            truncated: false,
        };

        let intents = view.receive(view.generation(), ViewData::Listed(Ok(listing)), &app);
        assert_eq!(view.resources().len(), 1);
        assert!(matches!(
            intents.as_slice(),
            [Intent::Report(NavError::PartialFanoutFailure { failed: 1, total: 2, .. })]
        ));
    }

    #[test]
    fn test_total_failure_is_blocking_report() {
        let app = test_app();
        let mut view = browser("ec2", "security-groups");
        view.init(&app);
        let error = AdapterError::AllBranchesFailed(vec![]);

        let intents = view.receive(view.generation(), ViewData::Listed(Err(error)), &app);
        match intents.as_slice() {
            [Intent::Report(e)] => assert!(e.is_blocking()),
            other => panic!("unexpected intents: {other:?}"),
        }
    }

    #[test]
    fn test_pages_append_until_reload() {
        let app = test_app();
        let mut view = browser("ec2", "instances");
        view.init(&app);
        let page = |ids: &[&str], next: Option<&str>| {
            ViewData::Paged(Ok(Page {
                resources: ids.iter().map(|id| resource(id, "x")).collect(),
                next_token: next.map(str::to_string),
            }))
        };

        view.receive(view.generation(), page(&["i-1", "i-2"], Some("2")), &app);
        let intents = view.handle_event(&TuiEvent::InputChar('n'), &app);
        assert!(matches!(
            intents.as_slice(),
            [Intent::Effect(Effect::Page { token: Some(t), .. })] if t == "2"
        ));
        view.receive(view.generation(), page(&["i-3"], None), &app);
        assert_eq!(view.resources().len(), 3);

        let intents = view.handle_event(&TuiEvent::InputChar('n'), &app);
        assert!(matches!(intents.as_slice(), [Intent::Status(_)]));
    }

    #[test]
    fn test_filter_typing_captures_input() {
        let (mut view, app) = loaded(
            "ec2",
            "security-groups",
            vec![resource("sg-1", "web-ingress"), resource("sg-2", "db-internal")],
        );

        view.handle_event(&TuiEvent::InputChar('/'), &app);
        assert!(view.captures_input());
        for c in "DB".chars() {
            view.handle_event(&TuiEvent::InputChar(c), &app);
        }
        assert_eq!(view.visible().len(), 1);
        assert_eq!(view.visible()[0].id(), "sg-2");

        view.handle_event(&TuiEvent::Submit, &app);
        assert!(!view.captures_input());
        assert_eq!(view.visible().len(), 1);
    }

    #[test]
    fn test_escape_while_filtering_clears_filter() {
        let (mut view, app) = loaded(
            "ec2",
            "security-groups",
            vec![resource("sg-1", "web"), resource("sg-2", "db")],
        );
        view.handle_event(&TuiEvent::InputChar('/'), &app);
        view.handle_event(&TuiEvent::InputChar('w'), &app);
        view.handle_event(&TuiEvent::Escape, &app);
        assert_eq!(view.visible().len(), 2);
    }

    #[test]
    fn test_filter_command() {
        let (mut view, app) = loaded(
            "ec2",
            "security-groups",
            vec![resource("sg-1", "web"), resource("sg-2", "db")],
        );
        view.command(&Command::Filter("web".into()), &app);
        assert_eq!(view.visible().len(), 1);
    }

    #[test]
    fn test_enter_opens_detail_without_child_link() {
        let (mut view, app) = loaded("ec2", "security-groups", vec![resource("sg-1", "web")]);
        let intents = view.handle_event(&TuiEvent::Submit, &app);
        assert!(matches!(
            intents.as_slice(),
            [Intent::Open(NavTarget::Detail { .. })]
        ));
    }

    #[test]
    fn test_enter_drills_into_child_listing() {
        let (mut view, app) = loaded("s3", "buckets", vec![resource("bucket-1", "assets")]);
        let intents = view.handle_event(&TuiEvent::Submit, &app);
        match intents.as_slice() {
            [Intent::Open(NavTarget::Resources {
                resource_type,
                filter: Some(filter),
                ..
            })] => {
                assert_eq!(resource_type, "objects");
                assert_eq!(filter, &ParentFilter::new("bucket", "bucket-1"));
            }
            other => panic!("unexpected intents: {other:?}"),
        }
    }

    #[test]
    fn test_second_mark_opens_diff() {
        let (mut view, app) = loaded(
            "ec2",
            "security-groups",
            vec![resource("sg-1", "web"), resource("sg-2", "db")],
        );
        view.handle_event(&TuiEvent::InputChar('m'), &app);
        view.handle_event(&TuiEvent::CursorDown, &app);
        let intents = view.handle_event(&TuiEvent::InputChar('m'), &app);
        assert!(matches!(
            intents.as_slice(),
            [Intent::Open(NavTarget::Diff { .. })]
        ));
    }

    #[test]
    fn test_diff_command_requires_both_ids() {
        let (mut view, app) = loaded("ec2", "security-groups", vec![resource("sg-1", "web")]);
        let intents = view
            .command(&Command::Diff("sg-1".into(), "sg-9".into()), &app)
            .unwrap();
        assert!(matches!(intents.as_slice(), [Intent::Status(_)]));
    }

    #[test]
    fn test_delete_needs_two_presses() {
        let (mut view, app) = loaded("ec2", "volumes", vec![resource("vol-1", "root")]);

        let first = view.handle_event(&TuiEvent::Delete, &app);
        assert!(matches!(first.as_slice(), [Intent::Status(_)]));

        let second = view.handle_event(&TuiEvent::Delete, &app);
        assert!(matches!(
            second.as_slice(),
            [Intent::Status(_), Intent::Effect(Effect::Delete { .. })]
        ));
    }

    #[test]
    fn test_other_key_cancels_pending_delete() {
        let (mut view, app) = loaded("ec2", "volumes", vec![resource("vol-1", "root")]);
        view.handle_event(&TuiEvent::Delete, &app);
        view.handle_event(&TuiEvent::CursorDown, &app);
        let again = view.handle_event(&TuiEvent::Delete, &app);
        assert!(matches!(again.as_slice(), [Intent::Status(_)]));
    }

    #[test]
    fn test_delete_unsupported_warns() {
        let (mut view, app) = loaded("ec2", "security-groups", vec![resource("sg-1", "web")]);
        let intents = view.handle_event(&TuiEvent::Delete, &app);
        match intents.as_slice() {
            [Intent::Status(message)] => assert!(message.text.contains("doesn't support delete")),
            other => panic!("unexpected intents: {other:?}"),
        }
    }

    #[test]
    fn test_deleted_resource_leaves_list() {
        let (mut view, app) = loaded(
            "ec2",
            "volumes",
            vec![resource("vol-1", "a"), resource("vol-2", "b")],
        );
        view.receive(
            0,
            ViewData::Deleted {
                id: "vol-1".into(),
                target: None,
                result: Ok(()),
            },
            &app,
        );
        assert_eq!(view.resources().len(), 1);
        assert_eq!(view.resources()[0].id(), "vol-2");
    }

    #[test]
    fn test_delete_only_removes_row_from_its_region() {
        let east = Provenance::new(Some("us-east-1".into()), Some("dev".into()));
        let west = Provenance::new(Some("us-west-2".into()), Some("dev".into()));
        let (mut view, app) = loaded(
            "ec2",
            "volumes",
            vec![
                tag(resource("vol-1", "a"), &east),
                tag(resource("vol-1", "a"), &west),
            ],
        );
        view.handle_event(&TuiEvent::InputChar('m'), &app);

        view.receive(
            0,
            ViewData::Deleted {
                id: "vol-1".into(),
                target: Some(east),
                result: Ok(()),
            },
            &app,
        );
        assert_eq!(view.resources().len(), 1);
        assert_eq!(view.resources()[0].region(), Some("us-west-2"));
        assert!(!view.status_line().contains("marked"));
    }

    #[test]
    fn test_delete_targets_selected_row_provenance() {
        let west = Provenance::new(Some("us-west-2".into()), Some("dev".into()));
        let (mut view, app) = loaded("ec2", "volumes", vec![tag(resource("vol-1", "a"), &west)]);
        view.handle_event(&TuiEvent::Delete, &app);
        let intents = view.handle_event(&TuiEvent::Delete, &app);
        match intents.as_slice() {
            [_, Intent::Effect(Effect::Delete { target, .. })] => {
                assert_eq!(target.as_ref(), Some(&west))
            }
            other => panic!("unexpected intents: {other:?}"),
        }
    }
}
