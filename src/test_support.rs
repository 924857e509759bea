//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::widgets::Paragraph;

use crate::core::config::ResolvedConfig;
use crate::core::refresh::ConfiguredContext;
use crate::core::state::App;
use crate::registry::Registry;
use crate::registry::builtin::builtin_registry;
use crate::tui::event::TuiEvent;
use crate::tui::message::ViewData;
use crate::tui::view::{Intent, View, ViewId, ViewKind, next_view_id};

/// The built-in catalog: ec2, s3, lambda, iam, logs plus their aliases.
pub fn test_registry() -> Registry {
    builtin_registry()
}

/// Creates a test App over the built-in catalog with one profile and one region.
pub fn test_app() -> App {
    let config = ResolvedConfig {
        profiles: vec!["dev".to_string()],
        regions: vec!["us-east-1".to_string()],
        ..ResolvedConfig::default()
    };
    App::new(
        Arc::new(test_registry()),
        Arc::new(ConfiguredContext::default()),
        config,
    )
}

/// What a [`StubView`] has seen. Cloned handles share the same record.
#[derive(Clone, Default)]
pub struct Recorder {
    pub inits: Rc<Cell<usize>>,
    pub size: Rc<Cell<(u16, u16)>>,
    pub keys: Rc<RefCell<Vec<TuiEvent>>>,
    pub received: Rc<RefCell<Vec<u64>>>,
}

/// A view with no behaviour beyond recording what the navigator does to it.
pub struct StubView {
    id: ViewId,
    name: String,
    captures: bool,
    recorder: Recorder,
    on_key: Vec<Intent>,
}

impl StubView {
    pub fn new(name: &str) -> Self {
        Self {
            id: next_view_id(),
            name: name.to_string(),
            captures: false,
            recorder: Recorder::default(),
            on_key: Vec::new(),
        }
    }

    /// Report active input capture, so close keys reach the view.
    pub fn capturing(mut self) -> Self {
        self.captures = true;
        self
    }

    /// Emit these intents on the next key press.
    pub fn on_key(mut self, intents: Vec<Intent>) -> Self {
        self.on_key = intents;
        self
    }

    pub fn recorder(&self) -> Recorder {
        self.recorder.clone()
    }

    pub fn boxed(self) -> Box<dyn View> {
        Box::new(self)
    }
}

impl View for StubView {
    fn id(&self) -> ViewId {
        self.id
    }

    fn kind(&self) -> ViewKind {
        ViewKind::Help
    }

    fn title(&self) -> String {
        self.name.clone()
    }

    fn init(&mut self, _app: &App) -> Vec<Intent> {
        self.recorder.inits.set(self.recorder.inits.get() + 1);
        Vec::new()
    }

    fn handle_event(&mut self, event: &TuiEvent, _app: &App) -> Vec<Intent> {
        self.recorder.keys.borrow_mut().push(event.clone());
        std::mem::take(&mut self.on_key)
    }

    fn receive(&mut self, generation: u64, _data: ViewData, _app: &App) -> Vec<Intent> {
        self.recorder.received.borrow_mut().push(generation);
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, _app: &App) {
        frame.render_widget(Paragraph::new(self.name.as_str()), area);
    }

    fn resize(&mut self, width: u16, height: u16) {
        self.recorder.size.set((width, height));
    }

    fn captures_input(&self) -> bool {
        self.captures
    }
}
