//! # Application State
//!
//! Core state shared by every view. Domain only: no TUI types live here.
//! Presentation state (the view stacks) lives in the `tui` module.
//!
//! ```text
//! App
//! ├── registry: Arc<Registry>            // read-only after startup
//! ├── resolver: Arc<dyn ContextResolver> // background context lookups
//! ├── config: ResolvedConfig             // collapsed settings
//! ├── selection: Selection               // active profiles/regions
//! ├── refresh: RefreshCoordinator        // latest-wins refresh ids
//! ├── status: StatusSlot                 // transient status + activity log
//! ├── startup_warnings: Vec<String>      // shown once, before anything else
//! └── startup_path: Option<StartupPath>  // consumed once at init
//! ```
//!
//! Only loop-thread handlers mutate `App`. Background tasks receive clones
//! of what they need and report back through messages.

use log::{info, warn};
use std::sync::Arc;

use crate::core::config::ResolvedConfig;
use crate::core::error::NavError;
use crate::core::refresh::{
    ContextInfo, ContextResolver, RefreshCoordinator, RefreshError, RefreshKind, RefreshRequest,
    RefreshResponse, RefreshVerdict,
};
use crate::core::selection::{Selection, SelectionChange};
use crate::core::status::{StatusMessage, StatusSlot};
use crate::registry::{Registry, SourceScope};
use crate::adapter::{ParentFilter, ResourceSource};

/// Where to land at startup: `service[/resource-type] [resource-id]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupPath {
    pub service: String,
    pub resource_type: Option<String>,
    pub resource_id: Option<String>,
}

impl StartupPath {
    pub fn parse(path: &str, resource_id: Option<String>) -> Self {
        let (service, resource_type) = match path.split_once('/') {
            Some((s, t)) => (s.to_string(), Some(t.to_string()).filter(|t| !t.is_empty())),
            None => (path.to_string(), None),
        };
        Self {
            service,
            resource_type,
            resource_id,
        }
    }
}

pub struct App {
    pub registry: Arc<Registry>,
    pub resolver: Arc<dyn ContextResolver>,
    pub config: ResolvedConfig,
    pub selection: Selection,
    pub refresh: RefreshCoordinator,
    pub status: StatusSlot,
    pub startup_warnings: Vec<String>,
    startup_path: Option<StartupPath>,
}

impl App {
    pub fn new(
        registry: Arc<Registry>,
        resolver: Arc<dyn ContextResolver>,
        config: ResolvedConfig,
    ) -> Self {
        let selection = Selection::new(config.profiles.clone(), config.regions.clone());
        let status = StatusSlot::new(config.status_ttl);
        Self {
            registry,
            resolver,
            config,
            selection,
            refresh: RefreshCoordinator::new(),
            status,
            startup_warnings: Vec::new(),
            startup_path: None,
        }
    }

    pub fn with_startup_path(mut self, path: Option<StartupPath>) -> Self {
        self.startup_path = path;
        self
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.startup_warnings = warnings;
        self
    }

    /// Hand out the startup path. Subsequent calls return `None`.
    pub fn take_startup_path(&mut self) -> Option<StartupPath> {
        self.startup_path.take()
    }

    pub fn notify(&mut self, message: StatusMessage) {
        self.status.set(message);
    }

    /// Report an error as a status message and log it.
    pub fn report(&mut self, error: &NavError) {
        warn!("{error}");
        let message = if error.is_blocking() {
            StatusMessage::error(error.to_string())
        } else {
            StatusMessage::warning(error.to_string())
        };
        self.status.set(message);
    }

    /// Build a resource source for the current selection.
    pub fn source(
        &self,
        service: &str,
        resource_type: &str,
        filter: Option<ParentFilter>,
    ) -> Result<ResourceSource, NavError> {
        let scope = SourceScope {
            selection: &self.selection,
            config: &self.config,
            filter,
        };
        self.registry.create_adapter(&scope, service, resource_type)
    }

    /// Start a context refresh; the caller dispatches the returned request.
    pub fn begin_refresh(&mut self, kind: RefreshKind) -> RefreshRequest {
        self.refresh.begin(kind)
    }

    /// Apply a selection change. Returns false if nothing changed.
    pub fn change_selection(&mut self, change: &SelectionChange) -> bool {
        let changed = self.selection.apply(change);
        if changed {
            info!(
                "Selection changed ({}): {}",
                change.kind.label(),
                self.selection.summary()
            );
        }
        changed
    }

    /// Feed a refresh completion through the coordinator and apply it if it
    /// is still current.
    pub fn complete_refresh(&mut self, response: RefreshResponse) -> RefreshVerdict {
        let verdict = self.refresh.complete(response);
        match &verdict {
            RefreshVerdict::Apply(info) => self.apply_context(info),
            RefreshVerdict::Failed(RefreshError::Timeout(timeout)) => {
                self.report(&NavError::Timeout {
                    operation: "context refresh".to_string(),
                    timeout: *timeout,
                });
            }
            RefreshVerdict::Failed(e) => {
                self.notify(StatusMessage::warning(e.to_string()));
            }
            RefreshVerdict::Stale => {}
        }
        verdict
    }

    fn apply_context(&mut self, info: &ContextInfo) {
        let accounts = self.selection.merge_accounts(&info.accounts);
        let regions = self.selection.merge_regions(&info.regions);
        info!("Context refreshed: {accounts} new account(s), {regions} new region(s)");
        self.notify(StatusMessage::info(format!(
            "Context ready: {}",
            self.selection.summary()
        )));
    }
}
