//! Rendering seam for the feed controller.

use kelifax_client::Resource;

/// What the load-more affordance should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMoreVisibility {
    /// More pages exist and nothing is loading.
    Show,
    /// The listing is exhausted.
    NoMore,
    /// A load is in flight.
    Hidden,
}

impl LoadMoreVisibility {
    pub fn from_flags(has_more: bool, loading: bool) -> Self {
        if !has_more {
            LoadMoreVisibility::NoMore
        } else if loading {
            LoadMoreVisibility::Hidden
        } else {
            LoadMoreVisibility::Show
        }
    }
}

/// Everything the controller asks of the page it drives.
///
/// Calls are made outside the controller's state lock, so implementations
/// may call back into the controller.
pub trait FeedView: Send + Sync {
    /// Draw `resources`. With `append`, add them below what is already shown;
    /// otherwise replace the listing (an empty slice clears it).
    fn render(&self, resources: &[Resource], append: bool);

    /// Draw the featured strip. Empty hides it.
    fn render_featured(&self, featured: &[Resource]);

    fn set_loading(&self, loading: bool);

    /// Show an error with a retry affordance.
    fn show_error(&self, message: &str);

    /// The listing is being served from the bundled catalog.
    fn show_degraded(&self);

    fn update_load_more(&self, visibility: LoadMoreVisibility);

    fn update_count(&self, count: usize);
}

/// A view that draws nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullView;

impl FeedView for NullView {
    fn render(&self, _resources: &[Resource], _append: bool) {}
    fn render_featured(&self, _featured: &[Resource]) {}
    fn set_loading(&self, _loading: bool) {}
    fn show_error(&self, _message: &str) {}
    fn show_degraded(&self) {}
    fn update_load_more(&self, _visibility: LoadMoreVisibility) {}
    fn update_count(&self, _count: usize) {}
}

/// `"1 resource loaded"`, `"15 resources loaded"`.
pub fn count_label(count: usize) -> String {
    format!(
        "{} resource{} loaded",
        count,
        if count == 1 { "" } else { "s" }
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_from_flags() {
        assert_eq!(LoadMoreVisibility::from_flags(true, false), LoadMoreVisibility::Show);
        assert_eq!(LoadMoreVisibility::from_flags(true, true), LoadMoreVisibility::Hidden);
        assert_eq!(LoadMoreVisibility::from_flags(false, false), LoadMoreVisibility::NoMore);
        assert_eq!(LoadMoreVisibility::from_flags(false, true), LoadMoreVisibility::NoMore);
    }

    #[test]
    fn test_count_label() {
        assert_eq!(count_label(0), "0 resources loaded");
        assert_eq!(count_label(1), "1 resource loaded");
        assert_eq!(count_label(15), "15 resources loaded");
    }
}
