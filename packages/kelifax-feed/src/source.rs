//! Where the feed gets its pages from.

use std::sync::Arc;

use async_trait::async_trait;
use kelifax_client::{KelifaxClient, PageRequest, ResourcePage};

/// A pageable listing of resources.
///
/// Implemented by the API client and by the static catalog; tests use
/// [`crate::testing::MockSource`].
#[async_trait]
pub trait ResourceSource: Send + Sync {
    async fn fetch_page(&self, request: &PageRequest) -> kelifax_client::Result<ResourcePage>;

    /// Short label used in logs.
    fn name(&self) -> &'static str;
}

#[async_trait]
impl ResourceSource for KelifaxClient {
    async fn fetch_page(&self, request: &PageRequest) -> kelifax_client::Result<ResourcePage> {
        self.fetch_resource_page(request).await
    }

    fn name(&self) -> &'static str {
        "api"
    }
}

#[async_trait]
impl<T: ResourceSource + ?Sized> ResourceSource for Arc<T> {
    async fn fetch_page(&self, request: &PageRequest) -> kelifax_client::Result<ResourcePage> {
        (**self).fetch_page(request).await
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
