//! # Screens
//!
//! ```text
//! views/
//! ├── dashboard.rs         Home: categories, services, aliases
//! ├── service_browser.rs   Resource types of one service
//! ├── resource_browser.rs  List of resources (filter, drill-down, diff, delete)
//! ├── detail.rs            One resource
//! ├── diff.rs              Two resources side by side
//! ├── activity.rs          Activity log
//! ├── selector.rs          Region/profile picker (modal)
//! └── help.rs              Key bindings and aliases (modal)
//! ```
//!
//! [`build`] is the view factory: it resolves a [`NavTarget`] against the
//! registry so an unregistered target fails here, as `NotRegistered`,
//! before anything is pushed.

pub mod activity;
pub mod dashboard;
pub mod detail;
pub mod diff;
pub mod help;
pub mod resource_browser;
pub mod selector;
pub mod service_browser;

use crate::core::error::NavError;
use crate::core::state::App;
use crate::tui::view::{NavTarget, View};

use activity::LogView;
use dashboard::Dashboard;
use detail::DetailView;
use diff::DiffView;
use resource_browser::ResourceBrowser;
use service_browser::ServiceBrowser;

pub fn build(target: NavTarget, app: &App) -> Result<Box<dyn View>, NavError> {
    let view: Box<dyn View> = match target {
        NavTarget::Home => Box::new(Dashboard::new()),
        NavTarget::Service(service) => {
            if !app.registry.has_service(&service) {
                return Err(NavError::not_registered(&service, "*"));
            }
            Box::new(ServiceBrowser::new(service))
        }
        NavTarget::Resources {
            service,
            resource_type,
            filter,
        } => {
            let renderer = app.registry.renderer(&service, &resource_type)?;
            Box::new(ResourceBrowser::new(service, resource_type, filter, renderer))
        }
        NavTarget::Detail {
            service,
            resource_type,
            filter,
            resource,
        } => {
            let renderer = app.registry.renderer(&service, &resource_type)?;
            Box::new(DetailView::loaded(
                service,
                resource_type,
                filter,
                resource,
                renderer,
            ))
        }
        NavTarget::Lookup {
            service,
            resource_type,
            id,
        } => {
            let renderer = app.registry.renderer(&service, &resource_type)?;
            Box::new(DetailView::lookup(service, resource_type, id, renderer))
        }
        NavTarget::Diff {
            service,
            resource_type,
            left,
            right,
        } => {
            let renderer = app.registry.renderer(&service, &resource_type)?;
            Box::new(DiffView::new(
                format!("{service}/{resource_type}"),
                left,
                right,
                renderer,
            ))
        }
        NavTarget::Log => Box::new(LogView::new()),
    };
    Ok(view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_app;
    use crate::tui::view::ViewKind;

    #[test]
    fn test_build_resolves_registered_target() {
        let app = test_app();
        let view = build(
            NavTarget::Resources {
                service: "ec2".to_string(),
                resource_type: "instances".to_string(),
                filter: None,
            },
            &app,
        )
        .unwrap();
        assert_eq!(view.kind(), ViewKind::ResourceBrowser);
    }

    #[test]
    fn test_build_rejects_unregistered_target() {
        let app = test_app();
        let result = build(
            NavTarget::Resources {
                service: "ec2".to_string(),
                resource_type: "nope".to_string(),
                filter: None,
            },
            &app,
        );
        assert!(matches!(result, Err(NavError::NotRegistered { .. })));

        let result = build(NavTarget::Service("nope".to_string()), &app);
        assert!(matches!(result, Err(NavError::NotRegistered { .. })));
    }
}
