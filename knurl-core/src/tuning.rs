//! Jog tuning constants and product-variant configuration
//!
//! The numeric constants are empirically tuned values carried over from
//! the shipped pendant; they have no derivation and are deliberately kept
//! as named configuration rather than re-derived.

use knurl_proto::{UnitMode, E4};

/// Feed band for pulse (encoder) jogs: travels of at least `min_travel`
/// per detent use `feed_mm_min`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FeedBand {
    pub min_travel: E4,
    pub feed_mm_min: i32,
}

/// Pulse-jog feed ladder, coarsest first: bigger steps move faster
pub const PULSE_FEED_BANDS: [FeedBand; 3] = [
    FeedBand {
        min_travel: E4::ONE, // 1.0 units per detent
        feed_mm_min: 2000,
    },
    FeedBand {
        min_travel: E4::from_raw(1_000), // 0.1
        feed_mm_min: 1200,
    },
    FeedBand {
        min_travel: E4::from_raw(100), // 0.01
        feed_mm_min: 250,
    },
];

/// Pulse-jog feed for travels finer than every band
pub const PULSE_FEED_FLOOR: i32 = 50;

/// Continuous jog: feed = selection magnitude x this scale
/// (reaches several times the highlighted step per second)
pub const CONTINUOUS_FEED_SCALE: i32 = 300;

/// Continuous multi-axis jog: per-axis travel = multiplier x this scale
pub const MULTI_AXIS_TRAVEL_SCALE: i32 = 20;

/// Continuous single-axis jog travel, metric (mm)
pub const SINGLE_AXIS_TRAVEL_MM: i32 = 5000;

/// Continuous single-axis jog travel, imperial (inches)
pub const SINGLE_AXIS_TRAVEL_IN: i32 = 200;

/// Alarm code the controller raises when it has never been homed
pub const UNHOMED_ALARM_CODE: u8 = 14;

/// Pulse-jog feed for a given per-detent travel
pub fn pulse_feed(travel: E4) -> i32 {
    let magnitude = if travel.is_negative() { -travel } else { travel };
    for band in PULSE_FEED_BANDS {
        if magnitude >= band.min_travel {
            return band.feed_mm_min;
        }
    }
    PULSE_FEED_FLOOR
}

/// Continuous single-axis travel constant for the active unit system
pub const fn single_axis_travel(units: UnitMode) -> E4 {
    match units {
        UnitMode::Mm => E4::from_int(SINGLE_AXIS_TRAVEL_MM),
        UnitMode::Inch => E4::from_int(SINGLE_AXIS_TRAVEL_IN),
    }
}

/// What a sustained touch on an axis button does
///
/// The two shipped pendant variants disagree here; it is a product
/// decision, so it is configuration rather than a hardcoded guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HoldAction {
    /// Zero the work offset of the axis mapped to the held button
    #[default]
    ZeroMappedAxis,
    /// Zero the work offset of every currently selected axis
    ZeroSelectedAxes,
    /// Toggle the held axis in and out of the selection, enabling
    /// multi-axis jogs; the sole remaining axis cannot be deselected
    ToggleAxis,
}

/// What pressing the dial button does (same variant split)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DialPressAction {
    /// Zero the work offset of the selected axes
    #[default]
    ZeroSelectedAxes,
    /// Leave the scene
    PopScene,
}

/// What a horizontal flick does (same variant split)
///
/// Vertical flicks always cycle the axis selection; the horizontal pair
/// is contested between navigation and step adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlickAction {
    /// Right opens file selection, left returns to the previous scene
    #[default]
    Navigate,
    /// Left steps the selected axes coarser, right finer
    StepAdjust,
}

/// Variant configuration for the jog scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct JogTuning {
    pub hold_action: HoldAction,
    pub dial_press: DialPressAction,
    pub flick: FlickAction,
}
