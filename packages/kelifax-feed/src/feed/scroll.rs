//! Infinite-scroll trigger geometry.

/// Distance from the bottom, in pixels, at which the next page is requested.
pub const SCROLL_THRESHOLD_PX: f64 = 200.0;

/// Scroll position of the listing's viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub viewport_height: f64,
    pub document_height: f64,
}

impl ScrollMetrics {
    pub fn new(scroll_top: f64, viewport_height: f64, document_height: f64) -> Self {
        Self {
            scroll_top,
            viewport_height,
            document_height,
        }
    }

    /// True once the bottom of the viewport is within the threshold of the
    /// end of the document.
    pub fn is_near_bottom(&self) -> bool {
        self.scroll_top + self.viewport_height >= self.document_height - SCROLL_THRESHOLD_PX
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_near_bottom_threshold() {
        // 1000px document, 600px viewport: bottom edge at scroll_top + 600
        assert!(!ScrollMetrics::new(0.0, 600.0, 1000.0).is_near_bottom());
        assert!(!ScrollMetrics::new(199.0, 600.0, 1000.0).is_near_bottom());
        assert!(ScrollMetrics::new(200.0, 600.0, 1000.0).is_near_bottom());
        assert!(ScrollMetrics::new(400.0, 600.0, 1000.0).is_near_bottom());
    }

    #[test]
    fn test_short_document_is_always_near_bottom() {
        assert!(ScrollMetrics::new(0.0, 800.0, 500.0).is_near_bottom());
    }
}
