//! # Region/Profile Fan-out
//!
//! Issues one logical `list` against every selected (region, profile) pair
//! with bounded parallelism. Branches finish in any order; the merged result
//! is always in branch order (region, then profile), and within a branch in
//! the order the backend returned.
//!
//! A failed branch becomes a [`BranchFailure`] on the listing. Only when
//! every branch fails does the whole operation fail.

use futures::stream::{self, StreamExt};
use log::{debug, warn};
use std::sync::Arc;
use std::time::Duration;

use super::{
    Adapter, AdapterError, BranchFailure, Listing, PageLimits, paginate, tag, with_timeout,
};
use crate::resource::Provenance;

/// A raw adapter bound to one region/profile pair.
#[derive(Clone)]
pub struct Branch {
    pub provenance: Provenance,
    pub adapter: Arc<dyn Adapter>,
}

impl Branch {
    pub fn new(provenance: Provenance, adapter: Arc<dyn Adapter>) -> Self {
        Self {
            provenance,
            adapter,
        }
    }
}

pub async fn list_all(
    branches: &[Branch],
    limits: &PageLimits,
    concurrency: usize,
    timeout: Duration,
) -> Result<Listing, AdapterError> {
    let limits = *limits;
    let mut results: Vec<_> = stream::iter(branches.iter().cloned().enumerate())
        .map(move |(index, branch)| async move {
            let result = with_timeout(timeout, paginate::drain(&*branch.adapter, &limits)).await;
            (index, result)
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    // Completion order is arbitrary; merge order is not.
    results.sort_by_key(|(index, _)| *index);

    let mut listing = Listing {
        branches: branches.len(),
        ..Listing::default()
    };

    for (index, result) in results {
        let branch = &branches[index];
        match result {
            Ok(drained) => {
                debug!(
                    "Branch {} returned {} resources",
                    branch.provenance.label(),
                    drained.resources.len()
                );
                listing.truncated |= drained.truncated;
                listing.resources.extend(
                    drained
                        .resources
                        .into_iter()
                        .map(|r| tag(r, &branch.provenance)),
                );
            }
            Err(e) => {
                warn!("Branch {} failed: {}", branch.provenance.label(), e);
                listing.failures.push(BranchFailure {
                    provenance: branch.provenance.clone(),
                    message: e.to_string(),
                });
            }
        }
    }

    if !branches.is_empty() && listing.failures.len() == branches.len() {
        return Err(AdapterError::AllBranchesFailed(listing.failures));
    }

    Ok(listing)
}
