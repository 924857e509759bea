//! # Adapter Wrapping Layer
//!
//! Backends are reached through raw [`Adapter`]s, one per (service, resource
//! type, region, profile). The navigation engine never calls a raw adapter
//! directly; it goes through a [`ResourceSource`], which presents every
//! resource type through one contract:
//!
//! ```text
//!                ResourceSource
//!         ┌──────────┴───────────┐
//!      Single                 Fanout
//!   (one branch)      (regions × profiles, bounded parallel)
//!         │                      │
//!     paginate::drain     paginate::drain per branch
//!         │                      │
//!     raw Adapter           raw Adapter × N
//! ```
//!
//! - `list` always returns the complete set: page-capable raw adapters are
//!   drained page by page, bounded by [`PageLimits`].
//! - `list_page` passes pages straight through for single-branch sources.
//! - `get`/`delete` target exactly one branch, chosen by provenance.
//!
//! Every raw call is bounded by the source's timeout. A timeout is an
//! ordinary [`AdapterError::Timeout`].

pub mod fanout;
pub mod memory;
pub mod paginate;

use async_trait::async_trait;
use log::{debug, info};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::resource::{Provenance, ResourceRef, Tagged};

pub use fanout::Branch;
pub use memory::StaticAdapter;

// ============================================================================
// Raw adapter contract
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    ListPage,
    Get,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::List => "list",
            Operation::ListPage => "list-page",
            Operation::Get => "get",
            Operation::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// One page of results plus the token for the next page (`None` when exhausted).
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub resources: Vec<ResourceRef>,
    pub next_token: Option<String>,
}

/// A parent-supplied filter for sub-resources (e.g. objects inside one bucket).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParentFilter {
    pub key: String,
    pub value: String,
}

impl ParentFilter {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Everything a data factory needs to build a raw adapter for one branch.
#[derive(Debug, Clone, Default)]
pub struct AdapterContext {
    pub region: Option<String>,
    pub profile: Option<String>,
    pub filter: Option<ParentFilter>,
}

impl AdapterContext {
    pub fn provenance(&self) -> Provenance {
        Provenance::new(self.region.clone(), self.profile.clone())
    }
}

/// Failure of one fan-out branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchFailure {
    pub provenance: Provenance,
    pub message: String,
}

impl fmt::Display for BranchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.provenance.label(), self.message)
    }
}

#[derive(Debug, Clone, Error)]
pub enum AdapterError {
    #[error("{0} is not supported for this resource type")]
    Unsupported(Operation),
    #[error("resource not found: {0}")]
    NotFound(String),
    #[error("{0}")]
    Backend(String),
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("no single region/profile to target for {0}")]
    AmbiguousTarget(String),
    #[error("{0} is no longer in the selected regions/profiles")]
    TargetNotSelected(String),
    #[error("all {} branches failed: {}", .0.len(), join_failures(.0))]
    AllBranchesFailed(Vec<BranchFailure>),
}

fn join_failures(failures: &[BranchFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Raw per-resource adapter, implemented by backends.
#[async_trait]
pub trait Adapter: Send + Sync {
    async fn list(&self) -> Result<Vec<ResourceRef>, AdapterError>;

    async fn list_page(
        &self,
        _page_size: usize,
        _page_token: Option<String>,
    ) -> Result<Page, AdapterError> {
        Err(AdapterError::Unsupported(Operation::ListPage))
    }

    async fn get(&self, id: &str) -> Result<ResourceRef, AdapterError>;

    async fn delete(&self, _id: &str) -> Result<(), AdapterError> {
        Err(AdapterError::Unsupported(Operation::Delete))
    }

    fn supports(&self, op: Operation) -> bool;
}

// ============================================================================
// Wrapped contract
// ============================================================================

/// Safeguards for draining paginated backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub page_size: usize,
    pub max_pages: usize,
    pub max_items: usize,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            page_size: 100,
            max_pages: 50,
            max_items: 5000,
        }
    }
}

/// Result of a wrapped `list`: merged resources plus anything that went wrong
/// without failing the whole operation.
#[derive(Debug, Clone, Default)]
pub struct Listing {
    pub resources: Vec<ResourceRef>,
    pub failures: Vec<BranchFailure>,
    /// Number of branches queried (1 for single-branch sources).
    pub branches: usize,
    /// Set when a pagination safeguard stopped draining early.
    pub truncated: bool,
}

impl Listing {
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }
}

enum Shape {
    Single(Branch),
    Fanout(Vec<Branch>),
}

/// The uniform adapter every view talks to.
pub struct ResourceSource {
    label: String,
    shape: Shape,
    limits: PageLimits,
    concurrency: usize,
    timeout: Duration,
}

impl ResourceSource {
    /// Build a source over the given branches. Branches are ordered by
    /// (region, profile) so merged listings are deterministic.
    pub fn new(
        label: impl Into<String>,
        mut branches: Vec<Branch>,
        limits: PageLimits,
        concurrency: usize,
        timeout: Duration,
    ) -> Self {
        branches.sort_by(|a, b| a.provenance.cmp(&b.provenance));
        let shape = if branches.len() == 1 {
            Shape::Single(branches.remove(0))
        } else {
            Shape::Fanout(branches)
        };
        Self {
            label: label.into(),
            shape,
            limits,
            concurrency: concurrency.max(1),
            timeout,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_fanout(&self) -> bool {
        matches!(self.shape, Shape::Fanout(_))
    }

    pub fn branch_count(&self) -> usize {
        match &self.shape {
            Shape::Single(_) => 1,
            Shape::Fanout(branches) => branches.len(),
        }
    }

    /// The first (region, profile) pair, used when a bare id has to be
    /// resolved against one context.
    pub fn first_target(&self) -> Option<Provenance> {
        match &self.shape {
            Shape::Single(branch) => Some(branch.provenance.clone()),
            Shape::Fanout(branches) => branches.first().map(|b| b.provenance.clone()),
        }
    }

    pub fn page_limits(&self) -> PageLimits {
        self.limits
    }

    /// `List` is always available; `ListPage` only for single-branch sources
    /// over page-capable adapters; `Get`/`Delete` need every branch to agree.
    pub fn supports(&self, op: Operation) -> bool {
        match (&self.shape, op) {
            (_, Operation::List) => true,
            (Shape::Single(branch), op) => branch.adapter.supports(op),
            (Shape::Fanout(_), Operation::ListPage) => false,
            (Shape::Fanout(branches), op) => {
                !branches.is_empty() && branches.iter().all(|b| b.adapter.supports(op))
            }
        }
    }

    pub async fn list(&self) -> Result<Listing, AdapterError> {
        match &self.shape {
            Shape::Single(branch) => {
                let drained =
                    with_timeout(self.timeout, paginate::drain(&*branch.adapter, &self.limits))
                        .await?;
                debug!(
                    "Listed {} resources from {} ({})",
                    drained.resources.len(),
                    self.label,
                    branch.provenance.label()
                );
                Ok(Listing {
                    resources: tag_all(drained.resources, &branch.provenance),
                    failures: Vec::new(),
                    branches: 1,
                    truncated: drained.truncated,
                })
            }
            Shape::Fanout(branches) => {
                fanout::list_all(branches, &self.limits, self.concurrency, self.timeout).await
            }
        }
    }

    pub async fn list_page(
        &self,
        page_size: usize,
        page_token: Option<String>,
    ) -> Result<Page, AdapterError> {
        match &self.shape {
            Shape::Single(branch) if branch.adapter.supports(Operation::ListPage) => {
                let page =
                    with_timeout(self.timeout, branch.adapter.list_page(page_size, page_token))
                        .await?;
                Ok(Page {
                    resources: tag_all(page.resources, &branch.provenance),
                    next_token: page.next_token.filter(|t| !t.is_empty()),
                })
            }
            _ => Err(AdapterError::Unsupported(Operation::ListPage)),
        }
    }

    pub async fn get(
        &self,
        id: &str,
        target: Option<&Provenance>,
    ) -> Result<ResourceRef, AdapterError> {
        let branch = self.target_branch(target)?;
        if !branch.adapter.supports(Operation::Get) {
            return Err(AdapterError::Unsupported(Operation::Get));
        }
        let resource = with_timeout(self.timeout, branch.adapter.get(id)).await?;
        Ok(tag(resource, &branch.provenance))
    }

    /// Deletes are issued once; a failure is reported, never retried.
    pub async fn delete(&self, id: &str, target: Option<&Provenance>) -> Result<(), AdapterError> {
        let branch = self.target_branch(target)?;
        if !branch.adapter.supports(Operation::Delete) {
            return Err(AdapterError::Unsupported(Operation::Delete));
        }
        info!(
            "Deleting {} from {} ({})",
            id,
            self.label,
            branch.provenance.label()
        );
        with_timeout(self.timeout, branch.adapter.delete(id)).await
    }

    fn target_branch(&self, target: Option<&Provenance>) -> Result<&Branch, AdapterError> {
        match &self.shape {
            Shape::Single(branch) => match target {
                Some(t) if t != &branch.provenance => {
                    Err(AdapterError::TargetNotSelected(t.label()))
                }
                _ => Ok(branch),
            },
            Shape::Fanout(branches) => target
                .and_then(|t| branches.iter().find(|b| &b.provenance == t))
                .ok_or_else(|| AdapterError::AmbiguousTarget(self.label.clone())),
        }
    }
}

pub(crate) async fn with_timeout<T, F>(timeout: Duration, fut: F) -> Result<T, AdapterError>
where
    F: Future<Output = Result<T, AdapterError>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => Err(AdapterError::Timeout(timeout)),
    }
}

pub(crate) fn tag(resource: ResourceRef, provenance: &Provenance) -> ResourceRef {
    if provenance.region.is_none() && provenance.profile.is_none() {
        resource
    } else {
        Tagged::wrap(resource, provenance.clone())
    }
}

fn tag_all(resources: Vec<ResourceRef>, provenance: &Provenance) -> Vec<ResourceRef> {
    resources
        .into_iter()
        .map(|r| tag(r, provenance))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{CloudResource, Resource};

    fn branch(region: &str, adapter: StaticAdapter) -> Branch {
        Branch::new(
            Provenance::new(Some(region.to_string()), None),
            Arc::new(adapter),
        )
    }

    fn source(branches: Vec<Branch>) -> ResourceSource {
        ResourceSource::new(
            "ec2/instances",
            branches,
            PageLimits::default(),
            4,
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn test_single_branch_list_tags_provenance() {
        let src = source(vec![branch(
            "us-east-1",
            StaticAdapter::new(vec![CloudResource::new("i-1", "web")]),
        )]);
        let listing = src.list().await.unwrap();

        assert!(!src.is_fanout());
        assert_eq!(listing.resources.len(), 1);
        assert_eq!(listing.resources[0].region(), Some("us-east-1"));
    }

    #[tokio::test]
    async fn test_list_page_passes_through_for_paged_adapter() {
        let resources = (0..5)
            .map(|i| CloudResource::new(format!("i-{i}"), "x"))
            .collect();
        let src = source(vec![branch("us-east-1", StaticAdapter::new(resources).paged())]);

        assert!(src.supports(Operation::ListPage));
        let page = src.list_page(2, None).await.unwrap();
        assert_eq!(page.resources.len(), 2);
        assert_eq!(page.next_token.as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn test_list_page_unsupported_on_fanout() {
        let src = source(vec![
            branch("us-east-1", StaticAdapter::new(vec![]).paged()),
            branch("us-west-2", StaticAdapter::new(vec![]).paged()),
        ]);
        assert!(!src.supports(Operation::ListPage));
        assert!(matches!(
            src.list_page(10, None).await,
            Err(AdapterError::Unsupported(Operation::ListPage))
        ));
    }

    #[tokio::test]
    async fn test_get_on_fanout_requires_matching_provenance() {
        let src = source(vec![
            branch("us-east-1", StaticAdapter::new(vec![CloudResource::new("i-1", "a")])),
            branch("us-west-2", StaticAdapter::new(vec![CloudResource::new("i-2", "b")])),
        ]);

        assert!(matches!(
            src.get("i-2", None).await,
            Err(AdapterError::AmbiguousTarget(_))
        ));

        let target = Provenance::new(Some("us-west-2".into()), None);
        let got = src.get("i-2", Some(&target)).await.unwrap();
        assert_eq!(got.id(), "i-2");
        assert_eq!(got.region(), Some("us-west-2"));
    }

    #[tokio::test]
    async fn test_single_branch_rejects_target_from_another_region() {
        let volumes = StaticAdapter::new(vec![CloudResource::new("vol-1", "data")]).deletable();
        let src = source(vec![branch("us-west-2", volumes)]);
        let east = Provenance::new(Some("us-east-1".into()), None);

        assert!(matches!(
            src.get("vol-1", Some(&east)).await,
            Err(AdapterError::TargetNotSelected(_))
        ));
        assert!(matches!(
            src.delete("vol-1", Some(&east)).await,
            Err(AdapterError::TargetNotSelected(_))
        ));
        // Nothing was deleted in us-west-2.
        assert_eq!(src.list().await.unwrap().resources.len(), 1);

        let west = Provenance::new(Some("us-west-2".into()), None);
        assert_eq!(src.get("vol-1", Some(&west)).await.unwrap().id(), "vol-1");
        assert_eq!(src.get("vol-1", None).await.unwrap().region(), Some("us-west-2"));
    }

    #[test]
    fn test_first_target_follows_branch_order() {
        let src = source(vec![
            branch("us-west-2", StaticAdapter::new(vec![])),
            branch("eu-west-1", StaticAdapter::new(vec![])),
        ]);
        assert_eq!(
            src.first_target(),
            Some(Provenance::new(Some("eu-west-1".into()), None))
        );
    }

    #[tokio::test]
    async fn test_delete_unsupported_is_reported() {
        let src = source(vec![branch(
            "us-east-1",
            StaticAdapter::new(vec![CloudResource::new("i-1", "a")]),
        )]);
        assert!(!src.supports(Operation::Delete));
        assert!(matches!(
            src.delete("i-1", None).await,
            Err(AdapterError::Unsupported(Operation::Delete))
        ));
    }

    #[tokio::test]
    async fn test_slow_adapter_times_out() {
        let slow = StaticAdapter::new(vec![]).with_delay(Duration::from_millis(200));
        let src = ResourceSource::new(
            "slow",
            vec![branch("us-east-1", slow)],
            PageLimits::default(),
            1,
            Duration::from_millis(20),
        );
        assert!(matches!(src.list().await, Err(AdapterError::Timeout(_))));
    }
}
