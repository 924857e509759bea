//! # Pagination Normalization
//!
//! Turns any raw adapter into a complete listing. Page-capable adapters are
//! driven page by page until the backend stops returning a token, or until a
//! safeguard trips: too many pages, too many items, or a token that repeats
//! (a backend that would otherwise loop forever).

use log::warn;

use super::{Adapter, AdapterError, Operation, PageLimits};
use crate::resource::ResourceRef;

#[derive(Debug, Default)]
pub struct Drained {
    pub resources: Vec<ResourceRef>,
    pub pages: usize,
    pub truncated: bool,
}

pub async fn drain(adapter: &dyn Adapter, limits: &PageLimits) -> Result<Drained, AdapterError> {
    if !adapter.supports(Operation::ListPage) {
        let resources = adapter.list().await?;
        return Ok(Drained {
            resources,
            pages: 1,
            truncated: false,
        });
    }

    let mut drained = Drained::default();
    let mut token: Option<String> = None;

    loop {
        let page = adapter
            .list_page(limits.page_size.max(1), token.clone())
            .await?;
        drained.pages += 1;
        drained.resources.extend(page.resources);

        if drained.resources.len() >= limits.max_items {
            let dropped = drained.resources.len() > limits.max_items;
            drained.resources.truncate(limits.max_items);
            drained.truncated = dropped || page.next_token.is_some();
            if drained.truncated {
                warn!("Pagination stopped at item cap ({})", limits.max_items);
            }
            break;
        }

        let next = match page.next_token.filter(|t| !t.is_empty()) {
            Some(next) => next,
            None => break,
        };

        if token.as_deref() == Some(next.as_str()) {
            warn!("Backend returned the same page token twice ({next}), stopping");
            drained.truncated = true;
            break;
        }

        if drained.pages >= limits.max_pages {
            warn!("Pagination stopped at page cap ({})", limits.max_pages);
            drained.truncated = true;
            break;
        }

        token = Some(next);
    }

    Ok(drained)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{Page, StaticAdapter};
    use crate::resource::CloudResource;
    use async_trait::async_trait;

    fn resources(n: usize) -> Vec<CloudResource> {
        (0..n)
            .map(|i| CloudResource::new(format!("r-{i}"), format!("res {i}")))
            .collect()
    }

    /// Always hands back a fresh token and one item.
    struct EndlessAdapter;

    #[async_trait]
    impl Adapter for EndlessAdapter {
        async fn list(&self) -> Result<Vec<ResourceRef>, AdapterError> {
            Err(AdapterError::Unsupported(Operation::List))
        }

        async fn list_page(
            &self,
            _page_size: usize,
            page_token: Option<String>,
        ) -> Result<Page, AdapterError> {
            let n: usize = page_token.as_deref().unwrap_or("0").parse().unwrap_or(0);
            Ok(Page {
                resources: vec![CloudResource::new(format!("e-{n}"), "e").into_ref()],
                next_token: Some((n + 1).to_string()),
            })
        }

        async fn get(&self, id: &str) -> Result<ResourceRef, AdapterError> {
            Err(AdapterError::NotFound(id.to_string()))
        }

        fn supports(&self, op: Operation) -> bool {
            op == Operation::ListPage
        }
    }

    /// Returns the same token forever.
    struct StuckAdapter;

    #[async_trait]
    impl Adapter for StuckAdapter {
        async fn list(&self) -> Result<Vec<ResourceRef>, AdapterError> {
            Ok(Vec::new())
        }

        async fn list_page(
            &self,
            _page_size: usize,
            _page_token: Option<String>,
        ) -> Result<Page, AdapterError> {
            Ok(Page {
                resources: vec![CloudResource::new("s", "s").into_ref()],
                next_token: Some("same".to_string()),
            })
        }

        async fn get(&self, id: &str) -> Result<ResourceRef, AdapterError> {
            Err(AdapterError::NotFound(id.to_string()))
        }

        fn supports(&self, op: Operation) -> bool {
            matches!(op, Operation::List | Operation::ListPage)
        }
    }

    #[tokio::test]
    async fn test_drain_non_paged_uses_list() {
        let adapter = StaticAdapter::new(resources(7));
        let drained = drain(&adapter, &PageLimits::default()).await.unwrap();
        assert_eq!(drained.resources.len(), 7);
        assert_eq!(drained.pages, 1);
        assert!(!drained.truncated);
    }

    #[tokio::test]
    async fn test_drain_paged_collects_every_page_in_order() {
        let adapter = StaticAdapter::new(resources(7)).paged();
        let limits = PageLimits {
            page_size: 3,
            ..PageLimits::default()
        };
        let drained = drain(&adapter, &limits).await.unwrap();

        assert_eq!(drained.pages, 3);
        let ids: Vec<_> = drained.resources.iter().map(|r| r.id().to_string()).collect();
        assert_eq!(ids, (0..7).map(|i| format!("r-{i}")).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_drain_stops_at_page_cap() {
        let limits = PageLimits {
            page_size: 1,
            max_pages: 4,
            max_items: 1000,
        };
        let drained = drain(&EndlessAdapter, &limits).await.unwrap();
        assert_eq!(drained.pages, 4);
        assert_eq!(drained.resources.len(), 4);
        assert!(drained.truncated);
    }

    #[tokio::test]
    async fn test_drain_stops_at_item_cap() {
        let limits = PageLimits {
            page_size: 1,
            max_pages: 1000,
            max_items: 3,
        };
        let drained = drain(&EndlessAdapter, &limits).await.unwrap();
        assert_eq!(drained.resources.len(), 3);
        assert!(drained.truncated);
    }

    #[tokio::test]
    async fn test_drain_flags_oversized_final_page() {
        let adapter = StaticAdapter::new(resources(5)).paged();
        let limits = PageLimits {
            page_size: 10,
            max_pages: 1000,
            max_items: 3,
        };
        let drained = drain(&adapter, &limits).await.unwrap();
        assert_eq!(drained.pages, 1);
        assert_eq!(drained.resources.len(), 3);
        assert!(drained.truncated);
    }

    #[tokio::test]
    async fn test_drain_exact_fit_is_not_truncated() {
        let adapter = StaticAdapter::new(resources(3)).paged();
        let limits = PageLimits {
            page_size: 10,
            max_pages: 1000,
            max_items: 3,
        };
        let drained = drain(&adapter, &limits).await.unwrap();
        assert_eq!(drained.resources.len(), 3);
        assert!(!drained.truncated);
    }

    #[tokio::test]
    async fn test_drain_stops_on_repeated_token() {
        let drained = drain(&StuckAdapter, &PageLimits::default()).await.unwrap();
        assert_eq!(drained.pages, 2);
        assert!(drained.truncated);
    }
}
