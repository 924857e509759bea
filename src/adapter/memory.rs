//! In-memory adapter backing the built-in catalog and the test suite.

use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

use super::{Adapter, AdapterError, Operation, Page};
use crate::resource::{CloudResource, ResourceRef};

/// Serves a fixed set of resources. Optionally page-capable (tokens are
/// offsets), deletable, artificially slow, or always failing.
pub struct StaticAdapter {
    resources: Mutex<Vec<CloudResource>>,
    paged: bool,
    deletable: bool,
    failure: Option<String>,
    delay: Option<Duration>,
}

impl StaticAdapter {
    pub fn new(resources: Vec<CloudResource>) -> Self {
        Self {
            resources: Mutex::new(resources),
            paged: false,
            deletable: false,
            failure: None,
            delay: None,
        }
    }

    pub fn paged(mut self) -> Self {
        self.paged = true;
        self
    }

    pub fn deletable(mut self) -> Self {
        self.deletable = true;
        self
    }

    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    async fn settle(&self) -> Result<(), AdapterError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.failure {
            Some(message) => Err(AdapterError::Backend(message.clone())),
            None => Ok(()),
        }
    }

    fn snapshot(&self) -> Vec<CloudResource> {
        self.resources
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Adapter for StaticAdapter {
    async fn list(&self) -> Result<Vec<ResourceRef>, AdapterError> {
        self.settle().await?;
        Ok(self.snapshot().into_iter().map(CloudResource::into_ref).collect())
    }

    async fn list_page(
        &self,
        page_size: usize,
        page_token: Option<String>,
    ) -> Result<Page, AdapterError> {
        if !self.paged {
            return Err(AdapterError::Unsupported(Operation::ListPage));
        }
        self.settle().await?;

        let all = self.snapshot();
        let start = match page_token {
            Some(token) => token
                .parse::<usize>()
                .map_err(|_| AdapterError::Backend(format!("invalid page token: {token}")))?,
            None => 0,
        };
        let end = (start + page_size.max(1)).min(all.len());
        let resources = all
            .get(start..end)
            .unwrap_or_default()
            .iter()
            .cloned()
            .map(CloudResource::into_ref)
            .collect();
        let next_token = (end < all.len()).then(|| end.to_string());

        Ok(Page {
            resources,
            next_token,
        })
    }

    async fn get(&self, id: &str) -> Result<ResourceRef, AdapterError> {
        self.settle().await?;
        self.snapshot()
            .into_iter()
            .find(|r| r.id == id)
            .map(CloudResource::into_ref)
            .ok_or_else(|| AdapterError::NotFound(id.to_string()))
    }

    async fn delete(&self, id: &str) -> Result<(), AdapterError> {
        if !self.deletable {
            return Err(AdapterError::Unsupported(Operation::Delete));
        }
        self.settle().await?;

        let mut resources = self
            .resources
            .lock()
            .map_err(|_| AdapterError::Backend("adapter state poisoned".to_string()))?;
        let before = resources.len();
        resources.retain(|r| r.id != id);
        if resources.len() == before {
            return Err(AdapterError::NotFound(id.to_string()));
        }
        Ok(())
    }

    fn supports(&self, op: Operation) -> bool {
        match op {
            Operation::List | Operation::Get => true,
            Operation::ListPage => self.paged,
            Operation::Delete => self.deletable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::Resource;

    #[tokio::test]
    async fn test_delete_removes_resource() {
        let adapter = StaticAdapter::new(vec![
            CloudResource::new("a", "a"),
            CloudResource::new("b", "b"),
        ])
        .deletable();

        adapter.delete("a").await.unwrap();
        let remaining = adapter.list().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id(), "b");
        assert!(matches!(adapter.delete("a").await, Err(AdapterError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_last_page_has_no_token() {
        let adapter = StaticAdapter::new(vec![
            CloudResource::new("a", "a"),
            CloudResource::new("b", "b"),
            CloudResource::new("c", "c"),
        ])
        .paged();

        let page = adapter.list_page(2, Some("2".to_string())).await.unwrap();
        assert_eq!(page.resources.len(), 1);
        assert!(page.next_token.is_none());
    }

    #[test]
    fn test_failing_adapter_reports_backend_error() {
        let adapter = StaticAdapter::new(vec![]).failing("throttled");
        let result = tokio_test::block_on(adapter.list());
        assert!(matches!(result, Err(AdapterError::Backend(m)) if m == "throttled"));
    }
}
