//! # Built-in Catalog
//!
//! Registers the services the binary ships with. Real backends register the
//! same way; the entries here are backed by [`StaticAdapter`]s seeded per
//! region/profile so every navigation path (fan-out, pagination, drill-down,
//! delete) can be exercised without cloud credentials.

use std::sync::Arc;

use serde_json::json;

use super::{Registry, RegistryEntry, Tier};
use crate::adapter::{Adapter, AdapterContext, StaticAdapter};
use crate::render::{DefaultRenderer, Renderer};
use crate::resource::CloudResource;

/// How one demo resource type behaves.
#[derive(Clone, Copy)]
struct Demo {
    prefix: &'static str,
    names: &'static [&'static str],
    paged: bool,
    deletable: bool,
}

const INSTANCES: Demo = Demo {
    prefix: "i",
    names: &["web-1", "web-2", "worker-1", "bastion", "db-primary"],
    paged: true,
    deletable: true,
};

const SECURITY_GROUPS: Demo = Demo {
    prefix: "sg",
    names: &["default", "web-ingress", "db-internal"],
    paged: false,
    deletable: false,
};

const VOLUMES: Demo = Demo {
    prefix: "vol",
    names: &["root-web-1", "root-web-2", "data-db"],
    paged: false,
    deletable: true,
};

const BUCKETS: Demo = Demo {
    prefix: "bucket",
    names: &["assets", "backups", "logs-archive"],
    paged: false,
    deletable: false,
};

const OBJECTS: Demo = Demo {
    prefix: "obj",
    names: &["index.html", "app.js", "styles.css", "logo.png"],
    paged: true,
    deletable: true,
};

const FUNCTIONS: Demo = Demo {
    prefix: "fn",
    names: &["resize-image", "send-email", "nightly-report"],
    paged: false,
    deletable: false,
};

const ROLES: Demo = Demo {
    prefix: "role",
    names: &["admin", "deployer", "read-only"],
    paged: false,
    deletable: false,
};

const USERS: Demo = Demo {
    prefix: "user",
    names: &["alice", "bob", "ci-bot"],
    paged: false,
    deletable: false,
};

const LOG_GROUPS: Demo = Demo {
    prefix: "lg",
    names: &["/aws/lambda/resize-image", "/aws/lambda/send-email", "/ecs/web"],
    paged: false,
    deletable: false,
};

const LOG_STREAMS: Demo = Demo {
    prefix: "ls",
    names: &["2024/01/01/[$LATEST]a1", "2024/01/02/[$LATEST]b2"],
    paged: false,
    deletable: false,
};

fn demo_resources(service: &str, resource_type: &str, demo: Demo, ctx: &AdapterContext) -> Vec<CloudResource> {
    let region = ctx.region.as_deref().unwrap_or("global");
    let profile = ctx.profile.as_deref().unwrap_or("default");
    let parent = ctx.filter.as_ref().map(|f| f.value.as_str());

    demo.names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let id = match parent {
                Some(parent) => format!("{}-{parent}-{i}", demo.prefix),
                None => format!("{}-{region}-{profile}-{i}", demo.prefix),
            };
            let mut resource = CloudResource::new(id.clone(), *name)
                .with_arn(format!("arn:demo:{service}:{region}:{profile}:{resource_type}/{id}"))
                .with_tag("env", profile)
                .with_attribute("index", json!(i));
            if let Some(parent) = parent {
                resource = resource.with_attribute("parent", json!(parent));
            }
            resource
        })
        .collect()
}

fn demo_entry(service: &'static str, resource_type: &'static str, demo: Demo) -> RegistryEntry {
    RegistryEntry::new(
        move |ctx: &AdapterContext| {
            let mut adapter =
                StaticAdapter::new(demo_resources(service, resource_type, demo, ctx));
            if demo.paged {
                adapter = adapter.paged();
            }
            if demo.deletable {
                adapter = adapter.deletable();
            }
            Arc::new(adapter) as Arc<dyn Adapter>
        },
        || Arc::new(DefaultRenderer) as Arc<dyn Renderer>,
    )
}

/// Register the built-in catalog into `registry`.
pub fn register_builtins(registry: &mut Registry) {
    let base = [
        ("ec2", "instances", INSTANCES, false),
        ("ec2", "security-groups", SECURITY_GROUPS, false),
        ("ec2", "volumes", VOLUMES, false),
        ("s3", "buckets", BUCKETS, false),
        ("s3", "objects", OBJECTS, true),
        ("lambda", "functions", FUNCTIONS, false),
        ("iam", "roles", ROLES, false),
        ("iam", "users", USERS, false),
        ("logs", "log-groups", LOG_GROUPS, false),
        ("logs", "log-streams", LOG_STREAMS, true),
    ];
    for (service, resource_type, demo, sub_resource) in base {
        let mut entry = demo_entry(service, resource_type, demo);
        if sub_resource {
            entry = entry.sub_resource();
        }
        registry.register(Tier::Base, service, resource_type, entry);
    }

    registry.link_child("s3", "buckets", "objects", "bucket");
    registry.link_child("logs", "log-groups", "log-streams", "log-group");

    registry.set_builtin_default("ec2", "instances");
    registry.set_builtin_default("s3", "buckets");
    registry.set_builtin_default("logs", "log-groups");

    registry.set_category("ec2", "Compute");
    registry.set_category("lambda", "Compute");
    registry.set_category("s3", "Storage");
    registry.set_category("iam", "Security");
    registry.set_category("logs", "Management");

    registry.register_alias("sg", "ec2/security-groups");
    registry.register_alias("vm", "ec2/instances");
    registry.register_alias("vol", "ec2/volumes");
    registry.register_alias("fn", "lambda/functions");
    registry.register_alias("bucket", "s3/buckets");
    registry.register_alias("s3", "s3");
    registry.register_alias("compute", "ec2");
}

/// A registry holding only the built-in catalog.
pub fn builtin_registry() -> Registry {
    let mut registry = Registry::new();
    register_builtins(&mut registry);
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::ParentFilter;
    use crate::core::config::ResolvedConfig;
    use crate::core::selection::Selection;
    use crate::registry::SourceScope;
    use crate::resource::Resource;

    #[test]
    fn test_builtin_catalog_shape() {
        let registry = builtin_registry();
        assert_eq!(registry.services(), vec!["ec2", "iam", "lambda", "logs", "s3"]);
        assert_eq!(registry.list_resources_for_service("s3"), vec!["buckets"]);
        assert_eq!(registry.resolve_alias("ec2"), None);
        assert_eq!(
            registry.resolve_alias("sg"),
            Some(("ec2".to_string(), Some("security-groups".to_string())))
        );
        assert!(registry.aliases().iter().all(|(alias, _)| alias != "s3"));
    }

    #[tokio::test]
    async fn test_child_listing_uses_parent_filter() {
        let registry = builtin_registry();
        let selection = Selection::new(vec!["dev".into()], vec!["us-east-1".into()]);
        let config = ResolvedConfig::default();
        let scope = SourceScope {
            selection: &selection,
            config: &config,
            filter: Some(ParentFilter::new("bucket", "bucket-assets")),
        };

        let source = registry.create_adapter(&scope, "s3", "objects").unwrap();
        let listing = source.list().await.unwrap();
        assert_eq!(listing.resources.len(), OBJECTS.names.len());
        assert!(listing.resources[0].id().contains("bucket-assets"));
    }
}
