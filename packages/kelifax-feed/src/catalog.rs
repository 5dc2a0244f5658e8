//! Statically bundled resource list.
//!
//! Serves the feed when the API is switched off (`use_api = false`) and
//! backs the degraded-mode fallback when a remote call fails.

use std::sync::Arc;

use async_trait::async_trait;
use kelifax_client::{CategoryFilter, PageRequest, PageToken, Resource, ResourcePage};
use serde::Deserialize;
use thiserror::Error;

use crate::query;
use crate::source::ResourceSource;

const BUNDLED_JSON: &str = include_str!("../data/resources.json");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Invalid catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Either a bare array or `{"resources": [...]}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    List(Vec<Resource>),
    Wrapped { resources: Vec<Resource> },
}

/// Immutable, cheaply cloneable resource list.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    resources: Arc<Vec<Resource>>,
}

impl StaticCatalog {
    pub fn new(resources: Vec<Resource>) -> Self {
        Self {
            resources: Arc::new(resources),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let resources = match serde_json::from_str(json)? {
            CatalogFile::List(resources) => resources,
            CatalogFile::Wrapped { resources } => resources,
        };
        Ok(Self::new(resources))
    }

    /// The list compiled into the binary.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json(BUNDLED_JSON)
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Slice `batch_size` matching resources starting at `offset`.
    ///
    /// `has_more` is true when matches remain past the slice. A zero batch
    /// can never make progress, so it reports nothing more. No continuation
    /// token is issued.
    pub fn page_at(&self, filter: CategoryFilter, offset: usize, batch_size: usize) -> ResourcePage {
        let matching: Vec<&Resource> = self
            .resources
            .iter()
            .filter(|r| filter.matches(r.category))
            .collect();

        let resources: Vec<Resource> = matching
            .iter()
            .skip(offset)
            .take(batch_size)
            .map(|r| (*r).clone())
            .collect();
        let has_more = batch_size > 0 && matching.len() > offset.saturating_add(batch_size);

        ResourcePage::new(resources, has_more, None)
    }

    /// First page for `filter`.
    pub fn page(&self, filter: CategoryFilter, batch_size: usize) -> ResourcePage {
        self.page_at(filter, 0, batch_size)
    }

    pub fn featured(&self) -> Vec<Resource> {
        query::featured(&self.resources, query::FEATURED_LIMIT)
    }

    pub fn find_by_slug(&self, slug: &str) -> Option<&Resource> {
        query::find_by_slug(&self.resources, slug)
    }

    pub fn related(&self, resource: &Resource, limit: usize) -> Vec<&Resource> {
        query::related(&self.resources, resource, limit)
    }

    pub fn search(&self, query: &str) -> Vec<&Resource> {
        query::search(&self.resources, query)
    }
}

/// When read directly, the catalog pages by offset. The offset travels as the
/// page token so the controller can treat it like any other source.
#[async_trait]
impl ResourceSource for StaticCatalog {
    async fn fetch_page(&self, request: &PageRequest) -> kelifax_client::Result<ResourcePage> {
        let offset = request
            .page_token()
            .and_then(|t| t.as_str().parse::<usize>().ok())
            .unwrap_or(0);

        let mut page = self.page_at(request.category(), offset, request.batch_size());
        if page.pagination.has_more {
            page.pagination.next_page_token =
                Some(PageToken::new((offset + page.resources.len()).to_string()));
        }
        Ok(page)
    }

    fn name(&self) -> &'static str {
        "static catalog"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kelifax_client::Category;

    fn design_heavy() -> StaticCatalog {
        let mut resources: Vec<Resource> = (0..12)
            .map(|i| Resource::new(format!("Design Tool {}", i), Category::Design))
            .collect();
        resources.push(Resource::new("Notion", Category::Productivity));
        StaticCatalog::new(resources)
    }

    #[test]
    fn test_bundled_catalog_parses() {
        let catalog = StaticCatalog::bundled().unwrap();
        assert!(!catalog.is_empty());
        assert!(catalog.find_by_slug("figma").is_some());
        assert_eq!(catalog.featured().len(), query::FEATURED_LIMIT);
        assert!(catalog
            .resources()
            .iter()
            .all(|r| kelifax_client::is_valid_slug(&r.slug)));
    }

    #[test]
    fn test_from_json_accepts_wrapped_form() {
        let catalog = StaticCatalog::from_json(
            r#"{"resources": [{"slug": "figma", "title": "Figma", "category": "design"}]}"#,
        )
        .unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(StaticCatalog::from_json("{").is_err());
    }

    #[test]
    fn test_page_filters_and_slices() {
        let catalog = design_heavy();

        let page = catalog.page(CategoryFilter::Only(Category::Design), 10);
        assert_eq!(page.resources.len(), 10);
        assert!(page.pagination.has_more, "12 matches > batch of 10");
        assert_eq!(page.pagination.next_page_token, None);

        let page = catalog.page(CategoryFilter::Only(Category::Productivity), 10);
        assert_eq!(page.resources.len(), 1);
        assert!(!page.pagination.has_more);
    }

    #[test]
    fn test_page_has_more_is_strictly_greater() {
        let catalog = design_heavy();
        let page = catalog.page(CategoryFilter::Only(Category::Design), 12);
        assert_eq!(page.resources.len(), 12);
        assert!(!page.pagination.has_more);
    }

    #[test]
    fn test_zero_batch_reports_no_more() {
        let catalog = design_heavy();
        let page = catalog.page_at(CategoryFilter::All, 0, 0);
        assert!(page.resources.is_empty());
        assert!(!page.pagination.has_more);
    }

    #[tokio::test]
    async fn test_zero_batch_source_issues_no_token() {
        let catalog = design_heavy();
        let page = catalog
            .fetch_page(&PageRequest::new(CategoryFilter::All, 0))
            .await
            .unwrap();
        assert!(!page.pagination.has_more);
        assert_eq!(page.pagination.next_page_token, None);
    }

    #[test]
    fn test_page_at_offset() {
        let catalog = design_heavy();
        let page = catalog.page_at(CategoryFilter::Only(Category::Design), 10, 10);
        assert_eq!(page.resources.len(), 2);
        assert!(!page.pagination.has_more);
        assert_eq!(page.resources[0].slug, "design-tool-10");
    }

    #[tokio::test]
    async fn test_source_pages_with_offset_tokens() {
        let catalog = design_heavy();
        let first = catalog
            .fetch_page(&PageRequest::new(CategoryFilter::All, 5))
            .await
            .unwrap();
        assert_eq!(first.pagination.next_page_token, Some(PageToken::new("5")));

        let last = catalog
            .fetch_page(
                &PageRequest::new(CategoryFilter::All, 10)
                    .with_page_token(first.pagination.next_page_token.clone()),
            )
            .await
            .unwrap();
        assert_eq!(last.resources.len(), 8);
        assert!(!last.pagination.has_more);
        assert_eq!(last.pagination.next_page_token, None);
    }
}
