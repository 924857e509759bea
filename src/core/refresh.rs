//! # Async Refresh Coordinator
//!
//! Background context resolution runs off the loop thread and comes back as
//! a message. Triggers can overlap (switch profile twice quickly), and a slow
//! first operation may finish after a fast second one. Every trigger bumps a
//! monotonic counter; the dispatched operation carries the value it was
//! started with. On completion only the response whose id equals the live
//! counter is applied, anything else is logged and dropped.
//!
//! ```text
//! trigger ─► begin() ─► RefreshRequest{id: k} ─► run_refresh() ─► RefreshResponse{id: k}
//!                                                                  │
//!                                      complete(): k == current ? apply : discard
//! ```
//!
//! Operations are never preempted. A timeout is just a failed outcome; a late
//! completion of the abandoned call has nowhere to go.

use async_trait::async_trait;
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

use crate::core::error::NavError;
use crate::core::selection::Selection;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshKind {
    /// First context resolution at startup.
    Initial,
    /// Re-resolution after the user changed profiles or regions.
    SelectionChanged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshRequest {
    pub id: u64,
    pub kind: RefreshKind,
}

/// What the resolver learned about the selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextInfo {
    /// profile → account id
    pub accounts: BTreeMap<String, String>,
    pub regions: Vec<String>,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RefreshError {
    #[error("context refresh timed out after {0:?}")]
    Timeout(Duration),
    #[error("context refresh failed: {0}")]
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct RefreshResponse {
    pub request: RefreshRequest,
    pub outcome: Result<ContextInfo, RefreshError>,
}

/// Resolves account ids and available regions for a selection.
#[async_trait]
pub trait ContextResolver: Send + Sync {
    async fn resolve(&self, selection: &Selection) -> Result<ContextInfo, RefreshError>;
}

/// Resolver backed by the `[accounts]` and `[context]` config sections.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredContext {
    pub accounts: BTreeMap<String, String>,
    pub regions: Vec<String>,
}

#[async_trait]
impl ContextResolver for ConfiguredContext {
    async fn resolve(&self, selection: &Selection) -> Result<ContextInfo, RefreshError> {
        let accounts = selection
            .profiles
            .iter()
            .filter_map(|p| self.accounts.get(p).map(|a| (p.clone(), a.clone())))
            .collect();
        Ok(ContextInfo {
            accounts,
            regions: self.regions.clone(),
        })
    }
}

/// Run one resolution under a timeout and stamp it with its request.
pub async fn run_refresh(
    resolver: &dyn ContextResolver,
    request: RefreshRequest,
    selection: Selection,
    timeout: Duration,
) -> RefreshResponse {
    debug!("Refresh #{} ({:?}) started", request.id, request.kind);
    let outcome = match tokio::time::timeout(timeout, resolver.resolve(&selection)).await {
        Ok(result) => result,
        Err(_) => Err(RefreshError::Timeout(timeout)),
    };
    RefreshResponse { request, outcome }
}

/// What the loop should do with a completed refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshVerdict {
    Apply(ContextInfo),
    Failed(RefreshError),
    Stale,
}

#[derive(Debug, Default)]
pub struct RefreshCoordinator {
    current: u64,
    in_progress: bool,
}

impl RefreshCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new trigger. Any operation started before this one is now stale.
    pub fn begin(&mut self, kind: RefreshKind) -> RefreshRequest {
        self.current += 1;
        self.in_progress = true;
        info!("Refresh #{} ({:?}) dispatched", self.current, kind);
        RefreshRequest {
            id: self.current,
            kind,
        }
    }

    pub fn current(&self) -> u64 {
        self.current
    }

    pub fn in_progress(&self) -> bool {
        self.in_progress
    }

    pub fn is_current(&self, request: &RefreshRequest) -> bool {
        request.id == self.current
    }

    /// Judge a completion. Only the live request clears the in-progress flag.
    pub fn complete(&mut self, response: RefreshResponse) -> RefreshVerdict {
        if !self.is_current(&response.request) {
            let stale = NavError::StaleRefreshDiscarded {
                received: response.request.id,
                current: self.current,
            };
            debug!("{stale}");
            return RefreshVerdict::Stale;
        }

        self.in_progress = false;
        match response.outcome {
            Ok(info) => RefreshVerdict::Apply(info),
            Err(e) => {
                warn!("Refresh #{} failed: {}", response.request.id, e);
                RefreshVerdict::Failed(e)
            }
        }
    }
}
