//! Touch gesture recognition
//!
//! Consumes raw touch samples (point or no-touch, with a millisecond
//! timestamp) and produces the discrete events the scene layer consumes:
//! press, release, click, hold, and four-way flick. At most one of
//! click, hold, or flick fires per touch.

use knurl_core::FlickDirection;

/// A sustained touch becomes a hold after this long
pub const HOLD_MS: u32 = 600;

/// Travel along either screen axis that turns a touch into a flick
pub const FLICK_PX: i32 = 60;

/// Maximum travel for a touch to still count as a click
pub const CLICK_SLOP_PX: i32 = 10;

/// One touch sample in panel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TouchPoint {
    pub x: i32,
    pub y: i32,
}

/// Recognized touch events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GestureEvent {
    /// Finger down (emitted immediately, before the gesture resolves)
    Press,
    /// Finger up
    Release,
    /// Short touch without significant travel, at its starting point
    Click(TouchPoint),
    /// Touch held in place past the hold threshold
    Hold(TouchPoint),
    /// Fast swipe; the dominant axis of travel picks the direction
    Flick(FlickDirection),
}

#[derive(Debug, Clone, Copy)]
struct ActiveTouch {
    start: TouchPoint,
    start_ms: u32,
    last: TouchPoint,
    /// A hold or flick already fired; the eventual release is not a click
    resolved: bool,
}

impl ActiveTouch {
    fn within_slop(&self, point: TouchPoint) -> bool {
        (point.x - self.start.x).abs() <= CLICK_SLOP_PX
            && (point.y - self.start.y).abs() <= CLICK_SLOP_PX
    }
}

/// Gesture recognizer state machine
///
/// Feed every touch controller sample through `touch`, including the
/// no-touch samples; hold detection runs on the sample clock.
#[derive(Debug, Default)]
pub struct GestureRecognizer {
    active: Option<ActiveTouch>,
}

/// Events produced by one sample (press plus hold can coincide on the
/// first late sample of a touch)
pub type GestureOutput = heapless::Vec<GestureEvent, 2>;

impl GestureRecognizer {
    pub const fn new() -> Self {
        Self { active: None }
    }

    pub fn touch(&mut self, sample: Option<TouchPoint>, now_ms: u32) -> GestureOutput {
        let mut out = GestureOutput::new();
        match (self.active, sample) {
            (None, Some(point)) => {
                self.active = Some(ActiveTouch {
                    start: point,
                    start_ms: now_ms,
                    last: point,
                    resolved: false,
                });
                let _ = out.push(GestureEvent::Press);
            }
            (Some(mut touch), Some(point)) => {
                if !touch.resolved {
                    let dx = point.x - touch.start.x;
                    let dy = point.y - touch.start.y;
                    if dx.abs() >= FLICK_PX || dy.abs() >= FLICK_PX {
                        // Panel y grows downward
                        let direction = if dx.abs() >= dy.abs() {
                            if dx > 0 {
                                FlickDirection::Right
                            } else {
                                FlickDirection::Left
                            }
                        } else if dy > 0 {
                            FlickDirection::Down
                        } else {
                            FlickDirection::Up
                        };
                        let _ = out.push(GestureEvent::Flick(direction));
                        touch.resolved = true;
                    } else if now_ms.wrapping_sub(touch.start_ms) >= HOLD_MS
                        && touch.within_slop(point)
                    {
                        let _ = out.push(GestureEvent::Hold(touch.start));
                        touch.resolved = true;
                    }
                }
                touch.last = point;
                self.active = Some(touch);
            }
            (Some(touch), None) => {
                self.active = None;
                let _ = out.push(GestureEvent::Release);
                // A touch that drifted past the slop is neither a click
                // nor anything else
                if !touch.resolved && touch.within_slop(touch.last) {
                    let _ = out.push(GestureEvent::Click(touch.start));
                }
            }
            (None, None) => {}
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: i32, y: i32) -> TouchPoint {
        TouchPoint { x, y }
    }

    #[test]
    fn test_short_touch_is_click() {
        let mut recognizer = GestureRecognizer::new();
        assert_eq!(&recognizer.touch(Some(pt(100, 120)), 0)[..], &[GestureEvent::Press]);
        assert!(recognizer.touch(Some(pt(101, 121)), 50).is_empty());
        assert_eq!(
            &recognizer.touch(None, 100)[..],
            &[GestureEvent::Release, GestureEvent::Click(pt(100, 120))]
        );
    }

    #[test]
    fn test_sustained_touch_is_hold() {
        let mut recognizer = GestureRecognizer::new();
        recognizer.touch(Some(pt(40, 200)), 0);
        assert!(recognizer.touch(Some(pt(40, 200)), 599).is_empty());
        assert_eq!(
            &recognizer.touch(Some(pt(40, 200)), 600)[..],
            &[GestureEvent::Hold(pt(40, 200))]
        );
        // Hold fires once, and the release is not also a click
        assert!(recognizer.touch(Some(pt(40, 200)), 700).is_empty());
        assert_eq!(&recognizer.touch(None, 800)[..], &[GestureEvent::Release]);
    }

    #[test]
    fn test_horizontal_swipe_is_flick() {
        let mut recognizer = GestureRecognizer::new();
        recognizer.touch(Some(pt(60, 150)), 0);
        assert!(recognizer.touch(Some(pt(100, 150)), 30).is_empty());
        assert_eq!(
            &recognizer.touch(Some(pt(125, 152)), 60)[..],
            &[GestureEvent::Flick(FlickDirection::Right)]
        );
        assert_eq!(&recognizer.touch(None, 90)[..], &[GestureEvent::Release]);
    }

    #[test]
    fn test_leftward_flick_direction() {
        let mut recognizer = GestureRecognizer::new();
        recognizer.touch(Some(pt(200, 150)), 0);
        assert_eq!(
            &recognizer.touch(Some(pt(130, 150)), 40)[..],
            &[GestureEvent::Flick(FlickDirection::Left)]
        );
    }

    #[test]
    fn test_vertical_swipe_is_flick() {
        let mut recognizer = GestureRecognizer::new();
        recognizer.touch(Some(pt(120, 200)), 0);
        // Finger moving up the panel means decreasing y
        assert_eq!(
            &recognizer.touch(Some(pt(122, 130)), 40)[..],
            &[GestureEvent::Flick(FlickDirection::Up)]
        );

        let mut recognizer = GestureRecognizer::new();
        recognizer.touch(Some(pt(120, 100)), 0);
        assert_eq!(
            &recognizer.touch(Some(pt(118, 170)), 40)[..],
            &[GestureEvent::Flick(FlickDirection::Down)]
        );
    }

    #[test]
    fn test_diagonal_flick_picks_dominant_axis() {
        let mut recognizer = GestureRecognizer::new();
        recognizer.touch(Some(pt(100, 100)), 0);
        // 65 right, 80 down: the vertical travel wins
        assert_eq!(
            &recognizer.touch(Some(pt(165, 180)), 40)[..],
            &[GestureEvent::Flick(FlickDirection::Down)]
        );
    }

    #[test]
    fn test_drift_cancels_click_and_hold() {
        let mut recognizer = GestureRecognizer::new();
        recognizer.touch(Some(pt(100, 100)), 0);
        // Moved past the slop but short of a flick
        assert!(recognizer.touch(Some(pt(120, 100)), 700).is_empty());
        // Neither a click nor a hold ever fires
        assert_eq!(&recognizer.touch(None, 800)[..], &[GestureEvent::Release]);
    }

    #[test]
    fn test_no_touch_samples_are_silent() {
        let mut recognizer = GestureRecognizer::new();
        assert!(recognizer.touch(None, 0).is_empty());
        assert!(recognizer.touch(None, 100).is_empty());
    }

    #[test]
    fn test_hold_timer_survives_clock_wrap() {
        let mut recognizer = GestureRecognizer::new();
        recognizer.touch(Some(pt(10, 100)), u32::MAX - 100);
        assert_eq!(
            &recognizer.touch(Some(pt(10, 100)), 500)[..],
            &[GestureEvent::Hold(pt(10, 100))]
        );
    }
}
