//! Paginated, filterable resource feed.
//!
//! - [`FeedController`] owns the paging state machine
//! - [`FeedView`] is what it renders into
//! - [`ScrollMetrics`] decides when scrolling should load the next page

mod controller;
mod scroll;
mod state;
mod view;


pub use controller::{
    FallbackPolicy, FeedConfig, FeedController, LoadOutcome, PageOrigin, SkipReason,
    LOAD_FAILED_MESSAGE, LOAD_MORE_FAILED_MESSAGE,
};
pub use scroll::{ScrollMetrics, SCROLL_THRESHOLD_PX};
pub use state::{FeedPhase, FeedState};
pub use view::{count_label, FeedView, LoadMoreVisibility, NullView};
