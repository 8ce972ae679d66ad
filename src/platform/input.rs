//! Raw input to lane intents
//!
//! Keyboard, touch swipes and on-screen arrows all end up as the same
//! [`LaneIntent`], so the simulation never knows which one the player used.

use crate::sim::LaneIntent;

/// Minimum horizontal travel (px) for a touch to count as a swipe
pub const SWIPE_THRESHOLD_PX: f32 = 28.0;

/// Map a `KeyboardEvent.key` value
pub fn intent_for_key(key: &str) -> Option<LaneIntent> {
    match key {
        "ArrowLeft" | "a" | "A" => Some(LaneIntent::Left),
        "ArrowRight" | "d" | "D" => Some(LaneIntent::Right),
        _ => None,
    }
}

/// Tracks one touch from start to end
#[derive(Debug, Clone, Copy, Default)]
pub struct SwipeTracker {
    start: Option<(f32, f32)>,
    threshold: f32,
}

impl SwipeTracker {
    pub fn new() -> Self {
        Self::with_threshold(SWIPE_THRESHOLD_PX)
    }

    pub fn with_threshold(threshold: f32) -> Self {
        Self {
            start: None,
            threshold,
        }
    }

    pub fn begin(&mut self, x: f32, y: f32) {
        self.start = Some((x, y));
    }

    /// Finish the touch; a mostly-horizontal move past the threshold is a swipe
    pub fn end(&mut self, x: f32, y: f32) -> Option<LaneIntent> {
        let (sx, sy) = self.start.take()?;
        let dx = x - sx;
        let dy = y - sy;
        if dx.abs() > self.threshold && dx.abs() > dy.abs() {
            Some(if dx > 0.0 {
                LaneIntent::Right
            } else {
                LaneIntent::Left
            })
        } else {
            None
        }
    }

    /// Touch was interrupted (e.g. a second finger)
    pub fn cancel(&mut self) {
        self.start = None;
    }

    pub fn is_tracking(&self) -> bool {
        self.start.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys() {
        assert_eq!(intent_for_key("ArrowLeft"), Some(LaneIntent::Left));
        assert_eq!(intent_for_key("D"), Some(LaneIntent::Right));
        assert_eq!(intent_for_key("ArrowUp"), None);
        assert_eq!(intent_for_key(" "), None);
    }

    #[test]
    fn test_swipe_directions() {
        let mut swipe = SwipeTracker::new();
        swipe.begin(100.0, 300.0);
        assert_eq!(swipe.end(160.0, 310.0), Some(LaneIntent::Right));
        swipe.begin(100.0, 300.0);
        assert_eq!(swipe.end(40.0, 280.0), Some(LaneIntent::Left));
    }

    #[test]
    fn test_short_or_vertical_moves_are_ignored() {
        let mut swipe = SwipeTracker::new();
        swipe.begin(100.0, 300.0);
        assert_eq!(swipe.end(120.0, 300.0), None);
        assert!(!swipe.is_tracking());

        swipe.begin(100.0, 300.0);
        assert_eq!(swipe.end(140.0, 400.0), None);
    }

    #[test]
    fn test_end_without_begin() {
        let mut swipe = SwipeTracker::new();
        assert_eq!(swipe.end(500.0, 0.0), None);
        swipe.begin(0.0, 0.0);
        swipe.cancel();
        assert_eq!(swipe.end(500.0, 0.0), None);
    }
}
