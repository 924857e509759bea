//! # Renderers
//!
//! A renderer turns a [`Resource`] into the text a view shows: list columns,
//! a detail body, and a handful of summary fields. Views route a
//! (resource, renderer) pair to the screen without interpreting the output.

use crate::resource::Resource;

/// A list column: header text and a preferred width in cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub title: String,
    pub width: u16,
}

impl Column {
    pub fn new(title: impl Into<String>, width: u16) -> Self {
        Self {
            title: title.into(),
            width,
        }
    }
}

pub trait Renderer: Send + Sync {
    fn columns(&self) -> Vec<Column>;

    /// One cell per column, in column order.
    fn row(&self, resource: &dyn Resource) -> Vec<String>;

    fn detail(&self, resource: &dyn Resource) -> String;

    fn summary(&self, resource: &dyn Resource) -> Vec<(String, String)> {
        vec![
            ("ID".to_string(), resource.id().to_string()),
            ("Name".to_string(), resource.name().to_string()),
        ]
    }
}

/// Generic renderer: identity columns, provenance, then tags and attributes.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultRenderer;

impl Renderer for DefaultRenderer {
    fn columns(&self) -> Vec<Column> {
        vec![
            Column::new("ID", 24),
            Column::new("NAME", 28),
            Column::new("REGION", 14),
            Column::new("PROFILE", 12),
        ]
    }

    fn row(&self, resource: &dyn Resource) -> Vec<String> {
        vec![
            resource.id().to_string(),
            resource.name().to_string(),
            resource.region().unwrap_or("-").to_string(),
            resource.profile().unwrap_or("-").to_string(),
        ]
    }

    fn detail(&self, resource: &dyn Resource) -> String {
        let mut out = String::new();
        for (key, value) in self.summary(resource) {
            out.push_str(&format!("{key:<10} {value}\n"));
        }
        if !resource.arn().is_empty() {
            out.push_str(&format!("{:<10} {}\n", "ARN", resource.arn()));
        }
        if let Some(region) = resource.region() {
            out.push_str(&format!("{:<10} {region}\n", "Region"));
        }
        if let Some(profile) = resource.profile() {
            out.push_str(&format!("{:<10} {profile}\n", "Profile"));
        }

        if !resource.tags().is_empty() {
            out.push_str("\nTags\n");
            for (key, value) in resource.tags() {
                out.push_str(&format!("  {key} = {value}\n"));
            }
        }

        if let Some(attributes) = resource.attributes()
            && !attributes.is_empty()
        {
            out.push_str("\nAttributes\n");
            for (key, value) in attributes {
                let rendered = match value {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                out.push_str(&format!("  {key}: {rendered}\n"));
            }
        }

        out
    }
}
