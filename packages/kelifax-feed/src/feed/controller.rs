//! Feed controller: incremental, filtered loading of the resource listing.
//!
//! One request is in flight at a time. The `loading` flag is checked and set
//! under the state lock before the request future is awaited, and the lock is
//! never held across an await. Every load is tagged with the state's
//! generation; a result that comes back after a reset is dropped.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use kelifax_client::config::DEFAULT_BATCH_SIZE;
use kelifax_client::{CategoryFilter, ClientError, PageRequest, PageToken, Resource, ResourcePage};
use tracing::{debug, info, warn};

use super::scroll::ScrollMetrics;
use super::state::{FeedPhase, FeedState};
use super::view::{FeedView, LoadMoreVisibility};
use crate::catalog::StaticCatalog;
use crate::query;
use crate::source::ResourceSource;

/// Shown when the first page of a category fails.
pub const LOAD_FAILED_MESSAGE: &str = "Failed to load resources. Please try again later.";

/// Shown when an append fails.
pub const LOAD_MORE_FAILED_MESSAGE: &str = "Failed to load more resources. Please try again.";

/// What to do when the source fails.
#[derive(Debug, Clone, Default)]
pub enum FallbackPolicy {
    /// Surface the error and offer a retry.
    #[default]
    Disabled,
    /// Serve the bundled catalog, filtered and sliced client-side.
    Static(StaticCatalog),
}

#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Requested page size. Clamped to [`PageRequest::MAX_BATCH_SIZE`] per request.
    pub batch_size: usize,
    pub fallback: FallbackPolicy,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            fallback: FallbackPolicy::Disabled,
        }
    }
}

impl FeedConfig {
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }
}

/// Where a merged page came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOrigin {
    Source,
    Fallback,
}

/// Why a trigger did not issue a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    AlreadyLoading,
    Exhausted,
    SameCategory,
    NotNearBottom,
    NothingToRetry,
}

/// Result of one controller operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A page was merged into the feed.
    Loaded {
        added: usize,
        total: usize,
        origin: PageOrigin,
    },
    /// No request was issued.
    Ignored(SkipReason),
    /// The response arrived after a reset and was dropped.
    Stale,
    /// The request failed; the feed is unchanged and can be retried.
    Failed(String),
}

impl LoadOutcome {
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadOutcome::Loaded { .. })
    }
}

/// A load that has claimed the `loading` flag.
struct Ticket {
    request: PageRequest,
    generation: u64,
    reset: bool,
    /// Resources already shown; where a fallback append resumes.
    offset: usize,
    /// Append while degraded: keep reading the bundled catalog.
    from_fallback: bool,
}

struct Shared {
    source: Arc<dyn ResourceSource>,
    view: Arc<dyn FeedView>,
    config: FeedConfig,
    state: Mutex<FeedState>,
}

/// Drives the listing. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct FeedController {
    shared: Arc<Shared>,
}

impl FeedController {
    pub fn new(
        source: Arc<dyn ResourceSource>,
        view: Arc<dyn FeedView>,
        config: FeedConfig,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                source,
                view,
                config,
                state: Mutex::new(FeedState::default()),
            }),
        }
    }

    pub fn snapshot(&self) -> FeedState {
        self.lock().clone()
    }

    pub fn phase(&self) -> FeedPhase {
        self.lock().phase()
    }

    pub fn category(&self) -> CategoryFilter {
        self.lock().category
    }

    pub fn resources(&self) -> Vec<Resource> {
        self.lock().resources.clone()
    }

    /// Start a fresh feed for `category` and load its first page.
    ///
    /// Any load still in flight from before is dropped when it returns.
    pub async fn initialize(&self, category: CategoryFilter) -> LoadOutcome {
        let ticket = {
            let mut state = self.lock();
            state.reset(category);
            self.begin(&mut state, true)
        };
        self.clear_view();

        match ticket {
            Some(ticket) => self.run(ticket).await,
            None => LoadOutcome::Ignored(SkipReason::AlreadyLoading),
        }
    }

    /// Load the next page, or the first page again with `reset`.
    /// A no-op while another load is in flight.
    pub async fn load_batch(&self, reset: bool) -> LoadOutcome {
        let ticket = {
            let mut state = self.lock();
            self.begin(&mut state, reset)
        };

        match ticket {
            Some(ticket) => self.run(ticket).await,
            None => {
                debug!(reset, "Feed load ignored, another load is in flight");
                LoadOutcome::Ignored(SkipReason::AlreadyLoading)
            }
        }
    }

    /// Switch the filter and reload from the first page.
    ///
    /// A no-op when `category` is already active or a load is in flight.
    pub async fn change_category(&self, category: CategoryFilter) -> LoadOutcome {
        let ticket = {
            let mut state = self.lock();
            if state.category == category {
                return LoadOutcome::Ignored(SkipReason::SameCategory);
            }
            if state.loading {
                debug!(%category, "Category change ignored while loading");
                return LoadOutcome::Ignored(SkipReason::AlreadyLoading);
            }
            state.reset(category);
            self.begin(&mut state, true)
        };

        info!(%category, "Feed category changed");
        self.clear_view();

        match ticket {
            Some(ticket) => self.run(ticket).await,
            None => LoadOutcome::Ignored(SkipReason::AlreadyLoading),
        }
    }

    pub async fn on_scroll_near_bottom(&self) -> LoadOutcome {
        self.load_more().await
    }

    pub async fn on_load_more_clicked(&self) -> LoadOutcome {
        self.load_more().await
    }

    /// Scroll handler: loads the next page once the viewport is near the end.
    pub async fn on_scroll(&self, metrics: ScrollMetrics) -> LoadOutcome {
        if !metrics.is_near_bottom() {
            return LoadOutcome::Ignored(SkipReason::NotNearBottom);
        }
        self.on_scroll_near_bottom().await
    }

    /// Re-issue the load that last failed, with the same unconsumed token.
    pub async fn retry(&self) -> LoadOutcome {
        let ticket = {
            let mut state = self.lock();
            let Some(reset) = state.failed_load else {
                return LoadOutcome::Ignored(SkipReason::NothingToRetry);
            };
            self.begin(&mut state, reset)
        };

        match ticket {
            Some(ticket) => self.run(ticket).await,
            None => LoadOutcome::Ignored(SkipReason::AlreadyLoading),
        }
    }

    /// Drop the feed, e.g. when the page is left. In-flight results are discarded.
    pub fn discard(&self) {
        let mut state = self.lock();
        let category = state.category;
        state.reset(category);
    }

    async fn load_more(&self) -> LoadOutcome {
        let ticket = {
            let mut state = self.lock();
            if !state.has_more {
                return LoadOutcome::Ignored(SkipReason::Exhausted);
            }
            match self.begin(&mut state, false) {
                Some(ticket) => ticket,
                None => return LoadOutcome::Ignored(SkipReason::AlreadyLoading),
            }
        };
        self.run(ticket).await
    }

    fn lock(&self) -> MutexGuard<'_, FeedState> {
        self.shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Claim the loading flag and build the request. `None` if already loading.
    fn begin(&self, state: &mut FeedState, reset: bool) -> Option<Ticket> {
        if state.loading {
            return None;
        }
        state.loading = true;
        state.last_error = None;
        state.failed_load = None;

        let token = if reset { None } else { state.page_token.clone() };
        let request =
            PageRequest::new(state.category, self.shared.config.batch_size).with_page_token(token);

        Some(Ticket {
            request,
            generation: state.generation,
            reset,
            offset: if reset { 0 } else { state.resources.len() },
            from_fallback: !reset && state.degraded,
        })
    }

    async fn run(&self, ticket: Ticket) -> LoadOutcome {
        let view = &self.shared.view;
        view.set_loading(true);
        view.update_load_more(LoadMoreVisibility::Hidden);

        debug!(
            source = self.shared.source.name(),
            category = %ticket.request.category(),
            batch_size = ticket.request.batch_size(),
            page_token = ticket.request.page_token().map(PageToken::as_str),
            reset = ticket.reset,
            "Loading feed batch"
        );

        if ticket.from_fallback {
            if let FallbackPolicy::Static(catalog) = &self.shared.config.fallback {
                let page = catalog.page_at(
                    ticket.request.category(),
                    ticket.offset,
                    ticket.request.batch_size(),
                );
                return self.apply(&ticket, page, PageOrigin::Fallback);
            }
        }

        match self.shared.source.fetch_page(&ticket.request).await {
            Ok(page) => self.apply(&ticket, page, PageOrigin::Source),
            Err(err) => self.recover(&ticket, err),
        }
    }

    /// Serve the bundled catalog for a failed first page. A failed append on a
    /// live feed keeps its list and token so the next trigger resumes the source.
    fn recover(&self, ticket: &Ticket, err: ClientError) -> LoadOutcome {
        let first_page = ticket.reset || ticket.offset == 0;
        let catalog = match &self.shared.config.fallback {
            FallbackPolicy::Static(catalog) if first_page && self.is_current(ticket.generation) => {
                catalog
            }
            _ => return self.fail(ticket, err),
        };

        warn!(
            source = self.shared.source.name(),
            category = %ticket.request.category(),
            error = %err,
            "Feed fetch failed, serving bundled catalog"
        );
        let page = catalog.page_at(
            ticket.request.category(),
            ticket.offset,
            ticket.request.batch_size(),
        );
        self.apply(ticket, page, PageOrigin::Fallback)
    }

    fn is_current(&self, generation: u64) -> bool {
        self.lock().generation == generation
    }

    /// Merge a page. Drops it if the feed was reset since the ticket was issued.
    fn apply(&self, ticket: &Ticket, page: ResourcePage, origin: PageOrigin) -> LoadOutcome {
        let ResourcePage {
            resources,
            pagination,
        } = page;

        let (total, has_more, featured) = {
            let mut state = self.lock();
            if state.generation != ticket.generation {
                debug!(
                    generation = ticket.generation,
                    current = state.generation,
                    "Dropping stale feed page"
                );
                return LoadOutcome::Stale;
            }

            if ticket.reset {
                state.resources = resources.clone();
            } else {
                state.resources.extend(resources.iter().cloned());
            }
            state.page_token = pagination.next_page_token;
            state.has_more = pagination.has_more;
            state.loading = false;
            state.degraded = origin == PageOrigin::Fallback;

            let featured = ticket
                .reset
                .then(|| query::featured(&state.resources, query::FEATURED_LIMIT));
            (state.resources.len(), state.has_more, featured)
        };

        let view = &self.shared.view;
        view.set_loading(false);
        view.render(&resources, !ticket.reset);
        if let Some(featured) = featured {
            view.render_featured(&featured);
        }
        if origin == PageOrigin::Fallback {
            view.show_degraded();
        }
        view.update_count(total);
        view.update_load_more(LoadMoreVisibility::from_flags(has_more, false));

        debug!(added = resources.len(), total, has_more, ?origin, "Feed batch merged");
        LoadOutcome::Loaded {
            added: resources.len(),
            total,
            origin,
        }
    }

    /// Record a failure without touching the list or the token.
    fn fail(&self, ticket: &Ticket, err: ClientError) -> LoadOutcome {
        let has_more = {
            let mut state = self.lock();
            if state.generation != ticket.generation {
                return LoadOutcome::Stale;
            }
            state.loading = false;
            state.last_error = Some(err.to_string());
            state.failed_load = Some(ticket.reset);
            state.has_more
        };

        warn!(
            source = self.shared.source.name(),
            category = %ticket.request.category(),
            reset = ticket.reset,
            error = %err,
            "Feed load failed"
        );

        let view = &self.shared.view;
        view.set_loading(false);
        view.show_error(if ticket.reset {
            LOAD_FAILED_MESSAGE
        } else {
            LOAD_MORE_FAILED_MESSAGE
        });
        view.update_load_more(LoadMoreVisibility::from_flags(has_more, false));

        LoadOutcome::Failed(err.to_string())
    }

    fn clear_view(&self) {
        self.shared.view.render(&[], false);
        self.shared.view.render_featured(&[]);
    }
}

impl std::fmt::Debug for FeedController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedController")
            .field("source", &self.shared.source.name())
            .field("state", &*self.lock())
            .finish()
    }
}
