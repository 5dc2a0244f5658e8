//! Feed state owned by one controller.

use kelifax_client::{CategoryFilter, PageToken, Resource};

/// Derived phase of the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedPhase {
    /// Not loading and more pages may exist.
    Idle,
    /// A request is in flight.
    Loading,
    /// The server reported no more pages for the current category.
    Exhausted,
}

/// Paging and filtering state of the listing.
#[derive(Debug, Clone)]
pub struct FeedState {
    pub category: CategoryFilter,
    /// Continuation token for the next append. `None` before the first page
    /// and after a category change.
    pub page_token: Option<PageToken>,
    /// Accumulated resources for the current category, in arrival order.
    pub resources: Vec<Resource>,
    pub has_more: bool,
    pub loading: bool,
    /// Bumped on every reset; in-flight loads tagged with an older value are dropped.
    pub generation: u64,
    /// Message of the last failed load, cleared by the next load.
    pub last_error: Option<String>,
    /// The last page came from the bundled catalog.
    pub degraded: bool,
    /// `reset` flag of the load that failed, for `retry`.
    pub(crate) failed_load: Option<bool>,
}

impl FeedState {
    pub fn new(category: CategoryFilter) -> Self {
        Self {
            category,
            page_token: None,
            resources: Vec::new(),
            has_more: true,
            loading: false,
            generation: 0,
            last_error: None,
            degraded: false,
            failed_load: None,
        }
    }

    pub fn phase(&self) -> FeedPhase {
        if self.loading {
            FeedPhase::Loading
        } else if !self.has_more {
            FeedPhase::Exhausted
        } else {
            FeedPhase::Idle
        }
    }

    /// Start over for `category`, invalidating any in-flight load.
    pub(crate) fn reset(&mut self, category: CategoryFilter) {
        let generation = self.generation.wrapping_add(1);
        *self = Self {
            generation,
            ..Self::new(category)
        };
    }
}

impl Default for FeedState {
    fn default() -> Self {
        Self::new(CategoryFilter::All)
    }
}
