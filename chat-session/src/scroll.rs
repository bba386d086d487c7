//! Scroll-follow decision for an appending message log
//!
//! A reader who scrolled up to re-read history is left alone when a message
//! arrives; a reader at (or near) the bottom is kept there.

/// Distance from the bottom, in CSS pixels, still treated as "at the bottom"
pub const FOLLOW_THRESHOLD: i32 = 200;

/// Viewport metrics of the scrollable message container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewportMetrics {
    pub scroll_top: i32,
    pub scroll_height: i32,
    pub client_height: i32,
}

impl ViewportMetrics {
    /// Content below the visible bottom edge. Negative when overscrolled.
    pub fn distance_to_bottom(&self) -> i32 {
        self.scroll_height - self.scroll_top - self.client_height
    }
}

/// How to bring the newest message into view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowBehavior {
    /// Jump, used for the initial population of the log
    Instant,
    Smooth,
}

/// Whether new content should scroll the viewport to the bottom
pub fn should_follow(metrics: ViewportMetrics, message_count: usize) -> bool {
    message_count <= 1 || metrics.distance_to_bottom() < FOLLOW_THRESHOLD
}

/// Like [`should_follow`], also choosing how to scroll
pub fn follow_behavior(metrics: ViewportMetrics, message_count: usize) -> Option<FollowBehavior> {
    if !should_follow(metrics, message_count) {
        None
    } else if message_count <= 1 {
        Some(FollowBehavior::Instant)
    } else {
        Some(FollowBehavior::Smooth)
    }
}
