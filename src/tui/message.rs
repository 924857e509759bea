//! # Messages & Effects
//!
//! Everything that re-enters the loop from a background task is a
//! [`Message`]. Everything the loop asks a background task to do is an
//! [`Effect`].
//!
//! ```text
//! Navigator ──Effect──► tasks::spawn ──(tokio)──► Message ──► update()
//!     ▲                                                          │
//!     └──────────────────────── Vec<Effect> ◄────────────────────┘
//! ```
//!
//! `update` is the only place a message touches state. It returns follow-up
//! effects instead of performing I/O.

use log::debug;
use std::sync::Arc;

use crate::adapter::{AdapterError, Listing, Page, ResourceSource};
use crate::core::refresh::{RefreshRequest, RefreshResponse, RefreshVerdict};
use crate::core::selection::Selection;
use crate::core::state::App;
use crate::resource::{Provenance, ResourceRef};
use crate::tui::navigator::Navigator;
use crate::tui::view::ViewId;

/// Background work requested by a view or by the navigator.
pub enum Effect {
    List {
        view: ViewId,
        generation: u64,
        source: Arc<ResourceSource>,
    },
    Page {
        view: ViewId,
        generation: u64,
        source: Arc<ResourceSource>,
        token: Option<String>,
    },
    Fetch {
        view: ViewId,
        generation: u64,
        source: Arc<ResourceSource>,
        id: String,
        target: Option<Provenance>,
    },
    Delete {
        view: ViewId,
        generation: u64,
        source: Arc<ResourceSource>,
        id: String,
        target: Option<Provenance>,
    },
    Refresh {
        request: RefreshRequest,
        selection: Selection,
    },
}

impl std::fmt::Debug for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Effect::List {
                view,
                generation,
                source,
            } => write!(f, "List({} → view {view} gen {generation})", source.label()),
            Effect::Page {
                view,
                generation,
                source,
                token,
            } => write!(
                f,
                "Page({} {token:?} → view {view} gen {generation})",
                source.label()
            ),
            Effect::Fetch {
                view,
                generation,
                source,
                id,
                ..
            } => write!(
                f,
                "Fetch({} {id} → view {view} gen {generation})",
                source.label()
            ),
            Effect::Delete {
                view, source, id, ..
            } => write!(f, "Delete({} {id} → view {view})", source.label()),
            Effect::Refresh { request, .. } => write!(f, "Refresh(#{})", request.id),
        }
    }
}

/// Results delivered to a view.
#[derive(Debug)]
pub enum ViewData {
    Listed(Result<Listing, AdapterError>),
    Paged(Result<Page, AdapterError>),
    Fetched(Result<ResourceRef, AdapterError>),
    Deleted {
        id: String,
        target: Option<Provenance>,
        result: Result<(), AdapterError>,
    },
}

/// Everything a background task can send back to the loop.
#[derive(Debug)]
pub enum Message {
    ViewData {
        view: ViewId,
        generation: u64,
        data: ViewData,
    },
    Refreshed(RefreshResponse),
}

/// Apply one background message.
pub fn update(navigator: &mut Navigator, app: &mut App, message: Message) -> Vec<Effect> {
    match message {
        Message::ViewData {
            view,
            generation,
            data,
        } => navigator.deliver(app, view, generation, data),
        Message::Refreshed(response) => {
            let id = response.request.id;
            if let RefreshVerdict::Apply(_) = app.complete_refresh(response) {
                debug!("Refresh #{id} applied: {}", app.selection.summary());
            }
            Vec::new()
        }
    }
}
