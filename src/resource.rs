//! # Resources
//!
//! The common shape every backend adapter produces. The navigation engine
//! never looks past this surface: it reads identity fields, tags, and the
//! provenance (region/profile) a resource came from.
//!
//! ```text
//! Tagged { region, profile }      // added by the fan-out layer
//!   └── CloudResource             // what the adapter returned
//! ```
//!
//! `Tagged` wrappers can nest. Identity comparisons always go through
//! [`unwrap_resource`] so a resource listed through a fan-out compares equal
//! to the same resource fetched directly.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Shared handle to a resource. Views, adapters and effects pass these around freely.
pub type ResourceRef = Arc<dyn Resource>;

pub trait Resource: Send + Sync + std::fmt::Debug {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn arn(&self) -> &str;
    fn tags(&self) -> &BTreeMap<String, String>;

    fn region(&self) -> Option<&str> {
        None
    }

    fn profile(&self) -> Option<&str> {
        None
    }

    /// Backend-specific fields shown in the detail view.
    fn attributes(&self) -> Option<&BTreeMap<String, serde_json::Value>> {
        None
    }

    /// The resource this one wraps, if it is a provenance wrapper.
    fn inner(&self) -> Option<&ResourceRef> {
        None
    }
}

/// Plain resource record used by in-memory adapters and fixtures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CloudResource {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub arn: String,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub profile: Option<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, serde_json::Value>,
}

impl CloudResource {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_arn(mut self, arn: impl Into<String>) -> Self {
        self.arn = arn.into();
        self
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    pub fn into_ref(self) -> ResourceRef {
        Arc::new(self)
    }
}

impl Resource for CloudResource {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn arn(&self) -> &str {
        &self.arn
    }

    fn tags(&self) -> &BTreeMap<String, String> {
        &self.tags
    }

    fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    fn profile(&self) -> Option<&str> {
        self.profile.as_deref()
    }

    fn attributes(&self) -> Option<&BTreeMap<String, serde_json::Value>> {
        Some(&self.attributes)
    }
}

/// Where a resource was listed from.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Provenance {
    pub region: Option<String>,
    pub profile: Option<String>,
}

impl Provenance {
    pub fn new(region: Option<String>, profile: Option<String>) -> Self {
        Self { region, profile }
    }

    /// Provenance recorded on a resource (outermost wrapper wins).
    pub fn of(resource: &dyn Resource) -> Self {
        Self {
            region: resource.region().map(str::to_string),
            profile: resource.profile().map(str::to_string),
        }
    }

    pub fn label(&self) -> String {
        match (&self.region, &self.profile) {
            (Some(r), Some(p)) => format!("{r}/{p}"),
            (Some(r), None) => r.clone(),
            (None, Some(p)) => p.clone(),
            (None, None) => "default".to_string(),
        }
    }
}

/// Provenance wrapper attached by the fan-out layer.
#[derive(Debug)]
pub struct Tagged {
    inner: ResourceRef,
    provenance: Provenance,
}

impl Tagged {
    pub fn wrap(inner: ResourceRef, provenance: Provenance) -> ResourceRef {
        Arc::new(Self { inner, provenance })
    }
}

impl Resource for Tagged {
    fn id(&self) -> &str {
        self.inner.id()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }

    fn arn(&self) -> &str {
        self.inner.arn()
    }

    fn tags(&self) -> &BTreeMap<String, String> {
        self.inner.tags()
    }

    fn region(&self) -> Option<&str> {
        self.provenance
            .region
            .as_deref()
            .or_else(|| self.inner.region())
    }

    fn profile(&self) -> Option<&str> {
        self.provenance
            .profile
            .as_deref()
            .or_else(|| self.inner.profile())
    }

    fn attributes(&self) -> Option<&BTreeMap<String, serde_json::Value>> {
        self.inner.attributes()
    }

    fn inner(&self) -> Option<&ResourceRef> {
        Some(&self.inner)
    }
}

/// Strip every provenance wrapper and return the resource the adapter produced.
pub fn unwrap_resource(resource: &ResourceRef) -> ResourceRef {
    let mut current = resource.clone();
    while let Some(next) = current.inner().cloned() {
        current = next;
    }
    current
}

/// Identity comparison that sees through provenance wrappers.
pub fn same_resource(a: &ResourceRef, b: &ResourceRef) -> bool {
    let (a, b) = (unwrap_resource(a), unwrap_resource(b));
    Arc::ptr_eq(&a, &b) || (a.id() == b.id() && a.arn() == b.arn())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_overrides_provenance_and_delegates_identity() {
        let raw = CloudResource::new("i-1", "web").with_arn("arn:i-1").into_ref();
        let tagged = Tagged::wrap(
            raw.clone(),
            Provenance::new(Some("us-east-1".into()), Some("prod".into())),
        );

        assert_eq!(tagged.id(), "i-1");
        assert_eq!(tagged.region(), Some("us-east-1"));
        assert_eq!(tagged.profile(), Some("prod"));
        assert!(Arc::ptr_eq(&unwrap_resource(&tagged), &raw));
    }

    #[test]
    fn test_unwrap_sees_through_nested_wrappers() {
        let raw = CloudResource::new("b-1", "bucket").into_ref();
        let once = Tagged::wrap(raw.clone(), Provenance::new(Some("eu-west-1".into()), None));
        let twice = Tagged::wrap(once, Provenance::new(None, Some("dev".into())));

        assert!(Arc::ptr_eq(&unwrap_resource(&twice), &raw));
        assert_eq!(twice.region(), Some("eu-west-1"));
        assert_eq!(twice.profile(), Some("dev"));
    }

    #[test]
    fn test_same_resource_matches_wrapped_and_plain() {
        let raw = CloudResource::new("sg-1", "default").into_ref();
        let tagged = Tagged::wrap(raw.clone(), Provenance::default());
        let other = CloudResource::new("sg-2", "default").into_ref();

        assert!(same_resource(&raw, &tagged));
        assert!(!same_resource(&raw, &other));
    }

    #[test]
    fn test_provenance_label() {
        assert_eq!(Provenance::default().label(), "default");
        assert_eq!(
            Provenance::new(Some("us-west-2".into()), Some("ops".into())).label(),
            "us-west-2/ops"
        );
    }
}
