//! # Resource Registry
//!
//! Maps (service, resource type) to the pair of factories that produce a raw
//! data adapter and a renderer for it.
//!
//! ```text
//! resolve(svc, type) ──► override tier ──hit──► entry
//!                             │miss
//!                             ▼
//!                         base tier ──hit──► entry
//!                             │miss
//!                             ▼
//!                        NotRegistered
//! ```
//!
//! Registration happens once at startup through `&mut Registry`; afterwards
//! the registry is shared as `Arc<Registry>` and only read, so concurrent
//! readers need no locking. Entries are never removed. Derived data (the
//! flattened alias list) is computed on first use and kept for the life of
//! the process.

pub mod builtin;

use log::debug;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::adapter::{Adapter, AdapterContext, Branch, ParentFilter, ResourceSource};
use crate::core::config::ResolvedConfig;
use crate::core::error::NavError;
use crate::core::selection::Selection;
use crate::render::Renderer;

pub type DataFactory = Arc<dyn Fn(&AdapterContext) -> Arc<dyn Adapter> + Send + Sync>;
pub type RendererFactory = Arc<dyn Fn() -> Arc<dyn Renderer> + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Checked first. Used to replace a base adapter without touching it.
    Override,
    Base,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceKey {
    pub service: String,
    pub resource_type: String,
}

impl ResourceKey {
    pub fn new(service: &str, resource_type: &str) -> Self {
        Self {
            service: service.to_string(),
            resource_type: resource_type.to_string(),
        }
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.service, self.resource_type)
    }
}

#[derive(Clone)]
pub struct RegistryEntry {
    pub data: DataFactory,
    pub renderer: RendererFactory,
    /// Needs a parent-supplied filter; reachable only by drill-down.
    pub sub_resource: bool,
}

impl RegistryEntry {
    pub fn new<D, R>(data: D, renderer: R) -> Self
    where
        D: Fn(&AdapterContext) -> Arc<dyn Adapter> + Send + Sync + 'static,
        R: Fn() -> Arc<dyn Renderer> + Send + Sync + 'static,
    {
        Self {
            data: Arc::new(data),
            renderer: Arc::new(renderer),
            sub_resource: false,
        }
    }

    pub fn sub_resource(mut self) -> Self {
        self.sub_resource = true;
        self
    }
}

impl fmt::Debug for RegistryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryEntry")
            .field("sub_resource", &self.sub_resource)
            .finish_non_exhaustive()
    }
}

/// What an alias points at: a whole service, or one of its resource types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasTarget {
    pub service: String,
    pub resource_type: Option<String>,
}

impl AliasTarget {
    /// Parse `"service"` or `"service/resource-type"`.
    pub fn parse(target: &str) -> Self {
        match target.split_once('/') {
            Some((service, resource_type)) => Self {
                service: service.to_string(),
                resource_type: Some(resource_type.to_string()).filter(|t| !t.is_empty()),
            },
            None => Self {
                service: target.to_string(),
                resource_type: None,
            },
        }
    }
}

impl fmt::Display for AliasTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.resource_type {
            Some(t) => write!(f, "{}/{}", self.service, t),
            None => f.write_str(&self.service),
        }
    }
}

/// Drill-down link: opening a parent resource lists these children,
/// filtered by the parent's id under `filter_key`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildLink {
    pub resource_type: String,
    pub filter_key: String,
}

/// Everything needed to build a [`ResourceSource`] for the active selection.
#[derive(Debug, Clone)]
pub struct SourceScope<'a> {
    pub selection: &'a Selection,
    pub config: &'a ResolvedConfig,
    pub filter: Option<ParentFilter>,
}

#[derive(Default)]
pub struct Registry {
    overrides: HashMap<ResourceKey, RegistryEntry>,
    base: HashMap<ResourceKey, RegistryEntry>,
    /// service → resource types, deduplicated and sorted
    catalog: BTreeMap<String, BTreeSet<String>>,
    aliases: HashMap<String, AliasTarget>,
    builtin_defaults: HashMap<String, String>,
    user_defaults: HashMap<String, String>,
    categories: HashMap<String, String>,
    children: HashMap<ResourceKey, ChildLink>,
    alias_list: OnceLock<Vec<(String, AliasTarget)>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------------
    // Registration (startup only)
    // ------------------------------------------------------------------------

    /// Add an entry to a tier. Registering a key a second time in the same
    /// tier keeps the first entry.
    pub fn register(
        &mut self,
        tier: Tier,
        service: &str,
        resource_type: &str,
        entry: RegistryEntry,
    ) {
        let key = ResourceKey::new(service, resource_type);
        let map = match tier {
            Tier::Override => &mut self.overrides,
            Tier::Base => &mut self.base,
        };
        if map.contains_key(&key) {
            debug!("{key} already registered in {tier:?} tier, keeping the first entry");
        } else {
            map.insert(key, entry);
        }
        self.catalog
            .entry(service.to_string())
            .or_default()
            .insert(resource_type.to_string());
    }

    pub fn register_alias(&mut self, alias: &str, target: &str) {
        self.aliases
            .insert(alias.to_string(), AliasTarget::parse(target));
        self.alias_list = OnceLock::new();
    }

    pub fn set_builtin_default(&mut self, service: &str, resource_type: &str) {
        self.builtin_defaults
            .insert(service.to_string(), resource_type.to_string());
    }

    /// Record a user's preferred default. Returns false when the resource
    /// type isn't registered for the service (the preference is ignored).
    pub fn set_user_default(&mut self, service: &str, resource_type: &str) -> bool {
        if !self.is_listable(service, resource_type) {
            return false;
        }
        self.user_defaults
            .insert(service.to_string(), resource_type.to_string());
        true
    }

    pub fn set_category(&mut self, service: &str, category: &str) {
        self.categories
            .insert(service.to_string(), category.to_string());
    }

    pub fn link_child(
        &mut self,
        service: &str,
        parent_type: &str,
        child_type: &str,
        filter_key: &str,
    ) {
        self.children.insert(
            ResourceKey::new(service, parent_type),
            ChildLink {
                resource_type: child_type.to_string(),
                filter_key: filter_key.to_string(),
            },
        );
    }

    // ------------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------------

    pub fn resolve(&self, service: &str, resource_type: &str) -> Result<&RegistryEntry, NavError> {
        let key = ResourceKey::new(service, resource_type);
        self.overrides
            .get(&key)
            .or_else(|| self.base.get(&key))
            .ok_or_else(|| NavError::not_registered(service, resource_type))
    }

    /// Exact, case-sensitive alias lookup.
    pub fn resolve_alias(&self, token: &str) -> Option<(String, Option<String>)> {
        self.aliases
            .get(token)
            .map(|t| (t.service.clone(), t.resource_type.clone()))
    }

    /// All aliases except self-referential ones, sorted by alias.
    pub fn aliases(&self) -> &[(String, AliasTarget)] {
        self.alias_list.get_or_init(|| {
            let mut list: Vec<_> = self
                .aliases
                .iter()
                .filter(|(alias, target)| *alias != &target.service)
                .map(|(alias, target)| (alias.clone(), target.clone()))
                .collect();
            list.sort_by(|a, b| a.0.cmp(&b.0));
            list
        })
    }

    pub fn services(&self) -> Vec<String> {
        self.catalog.keys().cloned().collect()
    }

    pub fn has_service(&self, service: &str) -> bool {
        self.catalog.contains_key(service)
    }

    fn is_listable(&self, service: &str, resource_type: &str) -> bool {
        self.resolve(service, resource_type)
            .map(|entry| !entry.sub_resource)
            .unwrap_or(false)
    }

    /// Sorted resource types a user can open directly (sub-resources excluded).
    pub fn list_resources_for_service(&self, service: &str) -> Vec<String> {
        self.catalog
            .get(service)
            .map(|types| {
                types
                    .iter()
                    .filter(|t| self.is_listable(service, t))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// User override → built-in default → alphabetically first.
    pub fn default_resource_for_service(&self, service: &str) -> Option<String> {
        self.user_defaults
            .get(service)
            .filter(|t| self.is_listable(service, t))
            .or_else(|| {
                self.builtin_defaults
                    .get(service)
                    .filter(|t| self.is_listable(service, t))
            })
            .cloned()
            .or_else(|| self.list_resources_for_service(service).into_iter().next())
    }

    /// Services grouped by category, both sorted. Uncategorized services land in "Other".
    pub fn categories(&self) -> Vec<(String, Vec<String>)> {
        let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for service in self.catalog.keys() {
            let category = self
                .categories
                .get(service)
                .cloned()
                .unwrap_or_else(|| "Other".to_string());
            grouped.entry(category).or_default().push(service.clone());
        }
        grouped.into_iter().collect()
    }

    pub fn child_of(&self, service: &str, resource_type: &str) -> Option<&ChildLink> {
        self.children.get(&ResourceKey::new(service, resource_type))
    }

    pub fn renderer(&self, service: &str, resource_type: &str) -> Result<Arc<dyn Renderer>, NavError> {
        self.resolve(service, resource_type)
            .map(|entry| (entry.renderer)())
    }

    /// Resolve the raw adapter for every selected (region, profile) and wrap
    /// them in a single [`ResourceSource`].
    pub fn create_adapter(
        &self,
        scope: &SourceScope<'_>,
        service: &str,
        resource_type: &str,
    ) -> Result<ResourceSource, NavError> {
        let entry = self.resolve(service, resource_type)?;
        if entry.sub_resource && scope.filter.is_none() {
            return Err(NavError::MissingParent {
                service: service.to_string(),
                resource_type: resource_type.to_string(),
            });
        }

        let branches = scope
            .selection
            .contexts()
            .into_iter()
            .map(|mut ctx| {
                ctx.filter = scope.filter.clone();
                Branch::new(ctx.provenance(), (entry.data)(&ctx))
            })
            .collect();

        Ok(ResourceSource::new(
            format!("{service}/{resource_type}"),
            branches,
            scope.config.page_limits,
            scope.config.max_concurrency,
            scope.config.adapter_timeout,
        ))
    }
}
