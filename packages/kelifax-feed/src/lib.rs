//! Kelifax resource feed.
//!
//! Drives the paginated, category-filtered resource listing on top of any
//! [`ResourceSource`] (the live API or the bundled [`StaticCatalog`]) and
//! renders it into a [`FeedView`].
//!
//! Also home to the pieces that work on a list of resources locally
//! ([`query`]) and the submission form rules ([`validation`]).
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use kelifax_feed::{FeedConfig, FeedController, NullView, StaticCatalog};
//!
//! let catalog = Arc::new(StaticCatalog::bundled()?);
//! let feed = FeedController::new(catalog, Arc::new(NullView), FeedConfig::default());
//!
//! feed.initialize().await;
//! feed.on_load_more_clicked().await;
//! ```

pub mod catalog;
pub mod feed;
pub mod query;
pub mod source;
pub mod testing;
pub mod validation;

pub use catalog::{CatalogError, StaticCatalog};
pub use feed::{
    count_label, FallbackPolicy, FeedConfig, FeedController, FeedPhase, FeedState, FeedView,
    LoadMoreVisibility, LoadOutcome, NullView, PageOrigin, ScrollMetrics, SkipReason,
};
pub use source::ResourceSource;
pub use validation::{validate_draft, validate_page, PageValidation, ValidationError};
