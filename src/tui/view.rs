//! # Views
//!
//! A view is one screen (or one modal overlay). The navigator owns every
//! view: the current one, the ones on the back-stack, and the modal stack.
//! Views never touch each other or mutate [`App`]; they return [`Intent`]s
//! and the navigator commits them.
//!
//! ```text
//! key ─► Navigator ─► view.handle_event(&App) ─► Vec<Intent>
//!                                                   │
//!          Navigator::apply ◄───────────────────────┘
//!            ├── Open(target)   → views::build → navigate
//!            ├── Effect(effect) → spawned by the run loop
//!            └── Status / Report / Select / Back / Quit ...
//! ```
//!
//! Capabilities beyond the base contract are opt-in: a view that can reload
//! its data returns itself from [`View::refreshable`]; a view that is taking
//! text input reports it through [`View::captures_input`] so close keys reach
//! it instead of popping it.

use ratatui::Frame;
use ratatui::layout::Rect;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::adapter::ParentFilter;
use crate::core::command::Command;
use crate::core::error::NavError;
use crate::core::selection::SelectionChange;
use crate::core::state::App;
use crate::core::status::StatusMessage;
use crate::resource::ResourceRef;
use crate::tui::event::TuiEvent;
use crate::tui::message::{Effect, ViewData};

pub type ViewId = u64;

static NEXT_VIEW_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique view id, used to route background results back to the
/// view that asked for them.
pub fn next_view_id() -> ViewId {
    NEXT_VIEW_ID.fetch_add(1, Ordering::Relaxed)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Dashboard,
    ServiceBrowser,
    ResourceBrowser,
    Detail,
    Diff,
    Log,
    Selector,
    Help,
}

/// Where a view wants to go. Resolved against the registry by
/// [`views::build`](crate::tui::views::build).
#[derive(Debug, Clone)]
pub enum NavTarget {
    Home,
    Service(String),
    Resources {
        service: String,
        resource_type: String,
        filter: Option<ParentFilter>,
    },
    Detail {
        service: String,
        resource_type: String,
        filter: Option<ParentFilter>,
        resource: ResourceRef,
    },
    /// A detail view for a resource known only by id.
    Lookup {
        service: String,
        resource_type: String,
        id: String,
    },
    Diff {
        service: String,
        resource_type: String,
        left: ResourceRef,
        right: ResourceRef,
    },
    Log,
}

/// A request from a view to the navigator.
pub enum Intent {
    Open(NavTarget),
    Home,
    Back,
    ShowModal(Box<dyn View>),
    CloseModal,
    Effect(Effect),
    Status(StatusMessage),
    Report(NavError),
    Select(SelectionChange),
    Quit,
}

impl std::fmt::Debug for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Intent::Open(target) => f.debug_tuple("Open").field(target).finish(),
            Intent::Home => f.write_str("Home"),
            Intent::Back => f.write_str("Back"),
            Intent::ShowModal(view) => f.debug_tuple("ShowModal").field(&view.title()).finish(),
            Intent::CloseModal => f.write_str("CloseModal"),
            Intent::Effect(effect) => f.debug_tuple("Effect").field(effect).finish(),
            Intent::Status(message) => f.debug_tuple("Status").field(message).finish(),
            Intent::Report(error) => f.debug_tuple("Report").field(error).finish(),
            Intent::Select(change) => f.debug_tuple("Select").field(change).finish(),
            Intent::Quit => f.write_str("Quit"),
        }
    }
}

pub trait View {
    fn id(&self) -> ViewId;

    fn kind(&self) -> ViewKind;

    /// Shown in the title bar.
    fn title(&self) -> String;

    /// Called when the view becomes current: on first navigation and again
    /// whenever it is popped back off the back-stack.
    fn init(&mut self, app: &App) -> Vec<Intent>;

    fn handle_event(&mut self, event: &TuiEvent, app: &App) -> Vec<Intent>;

    /// Background data addressed to this view. `generation` is whatever the
    /// view stamped on the request; views drop anything but their latest.
    fn receive(&mut self, generation: u64, data: ViewData, app: &App) -> Vec<Intent> {
        let _ = (generation, data, app);
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, app: &App);

    fn resize(&mut self, _width: u16, _height: u16) {}

    /// One-line summary for the status bar.
    fn status_line(&self) -> String {
        String::new()
    }

    /// True while the view is taking text input.
    fn captures_input(&self) -> bool {
        false
    }

    fn refreshable(&mut self) -> Option<&mut dyn Refreshable> {
        None
    }

    /// Commands that act on the current view (`filter`, `diff`). `None`
    /// means the view doesn't handle it.
    fn command(&mut self, _command: &Command, _app: &App) -> Option<Vec<Intent>> {
        None
    }
}

/// A view whose data can be reloaded in place (manual refresh, selection change).
pub trait Refreshable {
    fn refresh(&mut self, app: &App) -> Vec<Intent>;
}

/// Scroll/selection cursor shared by list-shaped views.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub index: usize,
}

impl Cursor {
    /// Move by `delta` rows, clamped to `[0, len)`. Returns true if it moved.
    pub fn step(&mut self, delta: isize, len: usize) -> bool {
        if len == 0 {
            self.index = 0;
            return false;
        }
        let target = (self.index as isize + delta).clamp(0, len as isize - 1) as usize;
        let moved = target != self.index;
        self.index = target;
        moved
    }

    pub fn clamp(&mut self, len: usize) {
        self.index = self.index.min(len.saturating_sub(1));
    }

    /// Apply the navigation keys every list view shares. Returns true if the
    /// key was one of them.
    pub fn handle_key(&mut self, event: &TuiEvent, len: usize, page: usize) -> bool {
        let page = page.max(1) as isize;
        match event {
            TuiEvent::CursorUp | TuiEvent::InputChar('k') => self.step(-1, len),
            TuiEvent::CursorDown | TuiEvent::InputChar('j') => self.step(1, len),
            TuiEvent::PageUp => self.step(-page, len),
            TuiEvent::PageDown => self.step(page, len),
            TuiEvent::Home | TuiEvent::InputChar('g') => self.step(-(len as isize), len),
            TuiEvent::End | TuiEvent::InputChar('G') => self.step(len as isize, len),
            _ => return false,
        };
        true
    }
}
