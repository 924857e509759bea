//! # Selection
//!
//! The active profiles and regions, plus what the context resolver has
//! discovered about them (account ids, available regions).
//!
//! The selection is owned by [`App`](crate::core::state::App) and written only
//! by loop-thread handlers: explicit selection changes, and refresh results
//! that append newly discovered regions or account ids. Background work gets
//! a cloned snapshot.

use std::collections::BTreeMap;

use crate::adapter::AdapterContext;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub profiles: Vec<String>,
    pub regions: Vec<String>,
    /// profile → account id
    pub accounts: BTreeMap<String, String>,
    /// Every region known to be selectable.
    pub available_regions: Vec<String>,
}

/// Which half of the selection a selector edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionKind {
    Profiles,
    Regions,
}

impl SelectionKind {
    pub fn label(self) -> &'static str {
        match self {
            SelectionKind::Profiles => "Profiles",
            SelectionKind::Regions => "Regions",
        }
    }
}

/// A requested change to the active selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionChange {
    pub kind: SelectionKind,
    pub values: Vec<String>,
}

impl Selection {
    pub fn new(profiles: Vec<String>, regions: Vec<String>) -> Self {
        let available_regions = regions.clone();
        Self {
            profiles,
            regions,
            accounts: BTreeMap::new(),
            available_regions,
        }
    }

    /// Number of (region, profile) branches a list will fan out to.
    pub fn branch_count(&self) -> usize {
        self.regions.len().max(1) * self.profiles.len().max(1)
    }

    /// One adapter context per (region, profile) pair. An empty half counts
    /// as a single unspecified value.
    pub fn contexts(&self) -> Vec<AdapterContext> {
        let regions: Vec<Option<String>> = if self.regions.is_empty() {
            vec![None]
        } else {
            self.regions.iter().cloned().map(Some).collect()
        };
        let profiles: Vec<Option<String>> = if self.profiles.is_empty() {
            vec![None]
        } else {
            self.profiles.iter().cloned().map(Some).collect()
        };

        regions
            .iter()
            .flat_map(|region| {
                profiles.iter().map(move |profile| AdapterContext {
                    region: region.clone(),
                    profile: profile.clone(),
                    filter: None,
                })
            })
            .collect()
    }

    /// Options a selector offers for the given half.
    pub fn options(&self, kind: SelectionKind) -> Vec<String> {
        match kind {
            SelectionKind::Profiles => {
                let mut all: Vec<String> = self.accounts.keys().cloned().collect();
                for p in &self.profiles {
                    if !all.contains(p) {
                        all.push(p.clone());
                    }
                }
                all.sort();
                all
            }
            SelectionKind::Regions => {
                let mut all = self.available_regions.clone();
                for r in &self.regions {
                    if !all.contains(r) {
                        all.push(r.clone());
                    }
                }
                all.sort();
                all
            }
        }
    }

    pub fn current(&self, kind: SelectionKind) -> &[String] {
        match kind {
            SelectionKind::Profiles => &self.profiles,
            SelectionKind::Regions => &self.regions,
        }
    }

    /// Apply a change. Returns false (and changes nothing) for an empty or
    /// identical selection.
    pub fn apply(&mut self, change: &SelectionChange) -> bool {
        if change.values.is_empty() || self.current(change.kind) == change.values.as_slice() {
            return false;
        }
        match change.kind {
            SelectionKind::Profiles => self.profiles = change.values.clone(),
            SelectionKind::Regions => {
                self.regions = change.values.clone();
                self.merge_regions(&change.values);
            }
        }
        true
    }

    /// Append regions not seen before. Returns how many were new.
    pub fn merge_regions(&mut self, regions: &[String]) -> usize {
        let mut added = 0;
        for region in regions {
            if !self.available_regions.contains(region) {
                self.available_regions.push(region.clone());
                added += 1;
            }
        }
        added
    }

    /// Record account ids for profiles that don't have one yet. Returns how
    /// many were new.
    pub fn merge_accounts(&mut self, accounts: &BTreeMap<String, String>) -> usize {
        let mut added = 0;
        for (profile, account) in accounts {
            if !self.accounts.contains_key(profile) {
                self.accounts.insert(profile.clone(), account.clone());
                added += 1;
            }
        }
        added
    }

    /// Short form for the title bar: `prod,dev @ us-east-1 (+1)`.
    pub fn summary(&self) -> String {
        fn compact(values: &[String]) -> String {
            match values {
                [] => "-".to_string(),
                [one] => one.clone(),
                [first, rest @ ..] => format!("{first} (+{})", rest.len()),
            }
        }
        format!("{} @ {}", compact(&self.profiles), compact(&self.regions))
    }
}
