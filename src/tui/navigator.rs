//! # Navigation Controller
//!
//! The only place a view transition is committed. Owns the current view, a
//! bounded back-stack, a modal stack, and the command line.
//!
//! ```text
//!                 ┌──────────────┐
//!     start() ──► │WarningsScreen│ ── Enter/Esc ──┐
//!                 └──────────────┘                │
//!                                                 ▼
//!   ┌─────────────┐  ':'  ┌────────┐  push  ┌──────────────────┐
//!   │ CommandMode │ ◄──── │ Normal │ ─────► │ ModalActive(n)   │
//!   └─────────────┘ ────► └────────┘ ◄───── │ close key pops 1 │
//!      Enter / Esc                   n == 0 └──────────────────┘
//! ```
//!
//! Input routing, first match wins:
//!
//! 1. `Resize` goes to every live view and the command line.
//! 2. `Ctrl+C` quits from any state.
//! 3. The warnings screen swallows everything except Enter/Esc.
//! 4. Command mode owns the keyboard until Enter or Esc.
//! 5. The topmost modal gets the key. A close key pops it instead, unless
//!    the modal is capturing text input.
//! 6. Global keys (`:` `?` `R` `P` `L` `H` `q` `Esc`), unless the current
//!    view is capturing text input.
//! 7. The current view.
//!
//! The back-stack is bounded: pushing past `max_back_stack` evicts the
//! oldest entry. Views popped off the stack are re-initialized before they
//! become visible, since their data may be stale.

use log::{debug, info};
use std::collections::VecDeque;

use crate::core::command::{self, Command};
use crate::core::error::NavError;
use crate::core::refresh::RefreshKind;
use crate::core::selection::{SelectionChange, SelectionKind};
use crate::core::state::{App, StartupPath};
use crate::core::status::StatusMessage;
use crate::tui::component::EventHandler;
use crate::tui::components::command_line::{CommandLine, CommandLineEvent};
use crate::tui::event::TuiEvent;
use crate::tui::message::{Effect, ViewData};
use crate::tui::view::{Intent, NavTarget, View, ViewId, ViewKind};
use crate::tui::views;
use crate::tui::views::dashboard::Dashboard;
use crate::tui::views::help::HelpView;
use crate::tui::views::selector::SelectorView;

/// Observable controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavState {
    Normal,
    CommandMode,
    ModalActive(usize),
    WarningsScreen,
}

enum Mode {
    Normal,
    Command(CommandLine),
    Warnings(Vec<String>),
}

pub struct Navigator {
    current: Box<dyn View>,
    back_stack: VecDeque<Box<dyn View>>,
    modals: Vec<Box<dyn View>>,
    mode: Mode,
    max_back_stack: usize,
    viewport: (u16, u16),
    resized: bool,
    quit: bool,
}

impl Navigator {
    pub fn new(root: Box<dyn View>, max_back_stack: usize) -> Self {
        Self {
            current: root,
            back_stack: VecDeque::new(),
            modals: Vec::new(),
            mode: Mode::Normal,
            max_back_stack: max_back_stack.max(1),
            viewport: (0, 0),
            resized: false,
            quit: false,
        }
    }

    /// Initialize the root view, show startup warnings, follow the startup
    /// path, and kick off the initial context refresh.
    pub fn start(&mut self, app: &mut App) -> Vec<Effect> {
        if !app.startup_warnings.is_empty() && !self.resized {
            info!(
                "Showing {} startup warning(s)",
                app.startup_warnings.len()
            );
            self.mode = Mode::Warnings(app.startup_warnings.clone());
        }

        let mut intents = self.current.init(app);
        if let Some(path) = app.take_startup_path() {
            info!("Following startup path {:?}", path);
            intents.push(match startup_target(path, app) {
                Ok(target) => Intent::Open(target),
                Err(e) => Intent::Report(e),
            });
        }
        let mut effects = self.apply(app, intents);

        let request = app.begin_refresh(RefreshKind::Initial);
        effects.push(Effect::Refresh {
            request,
            selection: app.selection.clone(),
        });
        effects
    }

    // ========================================================================
    // State accessors
    // ========================================================================

    pub fn state(&self) -> NavState {
        match &self.mode {
            Mode::Warnings(_) => NavState::WarningsScreen,
            Mode::Command(_) => NavState::CommandMode,
            Mode::Normal if !self.modals.is_empty() => NavState::ModalActive(self.modals.len()),
            Mode::Normal => NavState::Normal,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn back_depth(&self) -> usize {
        self.back_stack.len()
    }

    pub fn modal_depth(&self) -> usize {
        self.modals.len()
    }

    pub fn current_title(&self) -> String {
        self.current.title()
    }

    pub fn current_kind(&self) -> ViewKind {
        self.current.kind()
    }

    pub fn current_id(&self) -> ViewId {
        self.current.id()
    }

    /// Titles on the back-stack, oldest first.
    pub fn back_titles(&self) -> Vec<String> {
        self.back_stack.iter().map(|v| v.title()).collect()
    }

    pub fn status_line(&self) -> String {
        match self.modals.last() {
            Some(modal) => modal.status_line(),
            None => self.current.status_line(),
        }
    }

    pub fn warnings(&self) -> Option<&[String]> {
        match &self.mode {
            Mode::Warnings(warnings) => Some(warnings),
            _ => None,
        }
    }

    pub fn command_line(&self) -> Option<&CommandLine> {
        match &self.mode {
            Mode::Command(line) => Some(line),
            _ => None,
        }
    }

    pub fn command_line_mut(&mut self) -> Option<&mut CommandLine> {
        match &mut self.mode {
            Mode::Command(line) => Some(line),
            _ => None,
        }
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Make `view` current. With `clear_stack` the back-stack is emptied and
    /// the old current view dropped; otherwise the old view is pushed.
    pub fn navigate(&mut self, app: &mut App, view: Box<dyn View>, clear_stack: bool) -> Vec<Effect> {
        let previous = std::mem::replace(&mut self.current, view);
        if clear_stack {
            self.back_stack.clear();
        } else {
            self.back_stack.push_back(previous);
            while self.back_stack.len() > self.max_back_stack {
                if let Some(evicted) = self.back_stack.pop_front() {
                    debug!("Back-stack full, evicting {}", evicted.title());
                }
            }
        }
        info!(
            "Navigate → {} (clear_stack={}, depth={})",
            self.current.title(),
            clear_stack,
            self.back_stack.len()
        );
        self.activate_current(app)
    }

    /// Pop the back-stack. No-op when it is empty.
    pub fn back(&mut self, app: &mut App) -> Vec<Effect> {
        let Some(previous) = self.back_stack.pop_back() else {
            debug!("Back with empty stack ignored");
            return Vec::new();
        };
        self.current = previous;
        info!(
            "Back → {} (depth={})",
            self.current.title(),
            self.back_stack.len()
        );
        self.activate_current(app)
    }

    pub fn show_modal(&mut self, app: &mut App, mut modal: Box<dyn View>) -> Vec<Effect> {
        let intents = modal.init(app);
        let (width, height) = self.viewport;
        modal.resize(width, height);
        info!("Modal opened: {} (depth={})", modal.title(), self.modals.len() + 1);
        self.modals.push(modal);
        self.apply(app, intents)
    }

    pub fn hide_modal(&mut self) {
        if let Some(modal) = self.modals.pop() {
            info!("Modal closed: {} (depth={})", modal.title(), self.modals.len());
        }
    }

    fn activate_current(&mut self, app: &mut App) -> Vec<Effect> {
        let intents = self.current.init(app);
        let (width, height) = self.viewport;
        self.current.resize(width, height);
        self.apply(app, intents)
    }

    /// Clear every modal, apply the change, reload the current view and
    /// start a context refresh.
    fn select(&mut self, app: &mut App, change: SelectionChange) -> Vec<Effect> {
        if !self.modals.is_empty() {
            debug!("Selection change clears {} modal(s)", self.modals.len());
            self.modals.clear();
        }
        if !app.change_selection(&change) {
            app.notify(StatusMessage::info(format!(
                "{} unchanged",
                change.kind.label()
            )));
            return Vec::new();
        }

        let request = app.begin_refresh(RefreshKind::SelectionChanged);
        let mut effects = vec![Effect::Refresh {
            request,
            selection: app.selection.clone(),
        }];
        let intents = match self.current.refreshable() {
            Some(view) => view.refresh(app),
            None => Vec::new(),
        };
        effects.extend(self.apply(app, intents));
        effects
    }

    /// Commit a batch of intents in order.
    pub fn apply(&mut self, app: &mut App, intents: Vec<Intent>) -> Vec<Effect> {
        let mut effects = Vec::new();
        for intent in intents {
            match intent {
                Intent::Open(target) => match views::build(target, app) {
                    Ok(view) => effects.extend(self.navigate(app, view, false)),
                    Err(e) => app.report(&e),
                },
                Intent::Home => {
                    effects.extend(self.navigate(app, Box::new(Dashboard::new()), true))
                }
                Intent::Back => effects.extend(self.back(app)),
                Intent::ShowModal(modal) => effects.extend(self.show_modal(app, modal)),
                Intent::CloseModal => self.hide_modal(),
                Intent::Effect(effect) => effects.push(effect),
                Intent::Status(message) => app.notify(message),
                Intent::Report(error) => app.report(&error),
                Intent::Select(change) => effects.extend(self.select(app, change)),
                Intent::Quit => {
                    info!("Quit requested");
                    self.quit = true;
                }
            }
        }
        effects
    }

    /// Route background data to the view that asked for it. Views that are
    /// no longer live (popped, or sitting on the back-stack) don't get it;
    /// they reload when they become current again.
    pub fn deliver(
        &mut self,
        app: &mut App,
        view: ViewId,
        generation: u64,
        data: ViewData,
    ) -> Vec<Effect> {
        let intents = if self.current.id() == view {
            self.current.receive(generation, data, app)
        } else if let Some(modal) = self.modals.iter_mut().find(|m| m.id() == view) {
            modal.receive(generation, data, app)
        } else {
            debug!("Dropping data for view {view}: not visible");
            return Vec::new();
        };
        self.apply(app, intents)
    }

    // ========================================================================
    // Input
    // ========================================================================

    pub fn handle_event(&mut self, app: &mut App, event: &TuiEvent) -> Vec<Effect> {
        if let TuiEvent::Resize(width, height) = *event {
            self.resize(width, height);
            return Vec::new();
        }
        if matches!(event, TuiEvent::ForceQuit) {
            info!("Force quit");
            self.quit = true;
            return Vec::new();
        }

        match &mut self.mode {
            Mode::Warnings(_) => {
                if matches!(event, TuiEvent::Submit | TuiEvent::Escape) {
                    info!("Startup warnings dismissed");
                    self.mode = Mode::Normal;
                }
                return Vec::new();
            }
            Mode::Command(line) => {
                let outcome = line.handle_event(event);
                return match outcome {
                    Some(CommandLineEvent::Submit(text)) => {
                        self.mode = Mode::Normal;
                        self.run_command(app, &text)
                    }
                    Some(CommandLineEvent::Cancel) => {
                        self.mode = Mode::Normal;
                        Vec::new()
                    }
                    None => Vec::new(),
                };
            }
            Mode::Normal => {}
        }

        if let Some(top) = self.modals.last_mut() {
            if is_close_key(event) && !top.captures_input() {
                self.hide_modal();
                return Vec::new();
            }
            let intents = top.handle_event(event, app);
            return self.apply(app, intents);
        }

        if !self.current.captures_input()
            && let Some(intents) = self.global_key(app, event)
        {
            return self.apply(app, intents);
        }

        let intents = self.current.handle_event(event, app);
        self.apply(app, intents)
    }

    fn resize(&mut self, width: u16, height: u16) {
        debug!("Resize to {width}x{height}");
        self.viewport = (width, height);
        self.resized = true;
        self.current.resize(width, height);
        for modal in &mut self.modals {
            modal.resize(width, height);
        }
        if let Mode::Command(line) = &mut self.mode {
            line.resize(width);
        }
    }

    fn global_key(&mut self, app: &App, event: &TuiEvent) -> Option<Vec<Intent>> {
        let intents = match event {
            TuiEvent::InputChar(':') => {
                let mut line = CommandLine::new(command_candidates(app));
                line.resize(self.viewport.0);
                self.mode = Mode::Command(line);
                Vec::new()
            }
            TuiEvent::InputChar('?') => vec![Intent::ShowModal(Box::new(HelpView::new()))],
            TuiEvent::InputChar('R') => vec![Intent::ShowModal(Box::new(SelectorView::new(
                SelectionKind::Regions,
                &app.selection,
            )))],
            TuiEvent::InputChar('P') => vec![Intent::ShowModal(Box::new(SelectorView::new(
                SelectionKind::Profiles,
                &app.selection,
            )))],
            TuiEvent::InputChar('L') => vec![Intent::Open(NavTarget::Log)],
            TuiEvent::InputChar('H') => vec![Intent::Home],
            TuiEvent::InputChar('q') if self.back_stack.is_empty() => vec![Intent::Quit],
            TuiEvent::InputChar('q') | TuiEvent::Escape => vec![Intent::Back],
            _ => return None,
        };
        Some(intents)
    }

    fn run_command(&mut self, app: &mut App, line: &str) -> Vec<Effect> {
        let command = match command::parse(line, &app.registry) {
            Ok(command) => command,
            Err(e) => {
                app.report(&NavError::from(e));
                return Vec::new();
            }
        };
        info!("Command: {:?}", command);

        let intents = match command {
            Command::Navigate {
                service,
                resource_type,
                id,
            } => match resolve_target(app, service, resource_type, id) {
                Ok(target) => vec![Intent::Open(target)],
                Err(e) => vec![Intent::Report(e)],
            },
            Command::Filter(_) | Command::Diff(..) => {
                match self.current.command(&command, app) {
                    Some(intents) => intents,
                    None => vec![Intent::Status(StatusMessage::warning(format!(
                        "{} doesn't support that command",
                        self.current.title()
                    )))],
                }
            }
            Command::Select(change) => vec![Intent::Select(change)],
            Command::Home => vec![Intent::Home],
            Command::Help => vec![Intent::ShowModal(Box::new(HelpView::new()))],
            Command::Log => vec![Intent::Open(NavTarget::Log)],
            Command::Back => vec![Intent::Back],
            Command::Quit => vec![Intent::Quit],
        };
        self.apply(app, intents)
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Draw the current view, then every modal bottom-up.
    pub fn render(&mut self, frame: &mut ratatui::Frame, area: ratatui::layout::Rect, app: &App) {
        self.current.render(frame, area, app);
        for modal in &mut self.modals {
            modal.render(frame, area, app);
        }
    }
}

fn is_close_key(event: &TuiEvent) -> bool {
    matches!(event, TuiEvent::Escape | TuiEvent::InputChar('q'))
}

/// Turn a parsed navigation into a target. A bare service opens its default
/// resource type; a service with nothing listable opens the service browser.
fn resolve_target(
    app: &App,
    service: String,
    resource_type: Option<String>,
    id: Option<String>,
) -> Result<NavTarget, NavError> {
    let resource_type = match resource_type {
        Some(resource_type) => resource_type,
        None => match app.registry.default_resource_for_service(&service) {
            Some(resource_type) => resource_type,
            None if app.registry.has_service(&service) => return Ok(NavTarget::Service(service)),
            None => return Err(NavError::not_registered(&service, "*")),
        },
    };
    Ok(match id {
        Some(id) => NavTarget::Lookup {
            service,
            resource_type,
            id,
        },
        None => NavTarget::Resources {
            service,
            resource_type,
            filter: None,
        },
    })
}

fn startup_target(path: StartupPath, app: &App) -> Result<NavTarget, NavError> {
    let (service, resource_type) = match app.registry.resolve_alias(&path.service) {
        Some((service, alias_type)) => (service, path.resource_type.or(alias_type)),
        None => (path.service, path.resource_type),
    };
    resolve_target(app, service, resource_type, path.resource_id)
}

/// Words the command line can tab-complete.
fn command_candidates(app: &App) -> Vec<String> {
    let mut candidates: Vec<String> = [
        "home", "help", "activity", "back", "quit", "filter", "diff", "region", "profile",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    for service in app.registry.services() {
        for resource_type in app.registry.list_resources_for_service(&service) {
            candidates.push(format!("{service}/{resource_type}"));
        }
        candidates.push(service);
    }
    candidates.extend(app.registry.aliases().iter().map(|(alias, _)| alias.clone()));
    candidates.sort();
    candidates.dedup();
    candidates
}
