//! Per-axis step multiplier table
//!
//! Each axis carries an index into a fixed ladder of decimal step sizes.
//! Index `i` maps to a multiplier of 10^(i - display_digits), so with a
//! two-digit metric readout index 2 is 1.00 display units per detent.
//! Indices persist across sessions through the preference store.

use knurl_proto::{Axis, UnitMode, E4};

use crate::axis::AxisSet;
use crate::scene::PrefStore;

/// Lowest step index
pub const MIN_STEP_INDEX: u8 = 0;

/// Highest step index
pub const MAX_STEP_INDEX: u8 = 6;

/// Index used before a persisted value is loaded
pub const DEFAULT_STEP_INDEX: u8 = 2;

/// Preference name the table persists under (keyed by axis index)
pub const STEP_PREF_NAME: &str = "StepDigit";

/// Per-axis step index table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepTable {
    index: [u8; Axis::COUNT],
}

impl Default for StepTable {
    fn default() -> Self {
        Self::new()
    }
}

impl StepTable {
    pub const fn new() -> Self {
        Self {
            index: [DEFAULT_STEP_INDEX; Axis::COUNT],
        }
    }

    /// Load all persisted indices; missing or out-of-range entries keep
    /// the default
    pub fn load(&mut self, prefs: &mut dyn PrefStore) {
        for axis in Axis::ALL {
            if let Some(value) = prefs.get(STEP_PREF_NAME, axis.index()) {
                if (0..=i32::from(MAX_STEP_INDEX)).contains(&value) {
                    self.index[axis.index()] = value as u8;
                }
            }
        }
    }

    pub const fn get(&self, axis: Axis) -> u8 {
        self.index[axis.index()]
    }

    /// Set an axis index, clamping silently and persisting the clamped
    /// value; returns what was stored
    pub fn set(&mut self, axis: Axis, index: u8, prefs: &mut dyn PrefStore) -> u8 {
        let clamped = index.clamp(MIN_STEP_INDEX, MAX_STEP_INDEX);
        self.index[axis.index()] = clamped;
        prefs.set(STEP_PREF_NAME, axis.index(), i32::from(clamped));
        clamped
    }

    /// Step up one index; no-op at the top of the range
    pub fn increment(&mut self, axis: Axis, prefs: &mut dyn PrefStore) {
        let current = self.get(axis);
        if current < MAX_STEP_INDEX {
            self.set(axis, current + 1, prefs);
        }
    }

    /// Step down one index; no-op at the bottom of the range
    pub fn decrement(&mut self, axis: Axis, prefs: &mut dyn PrefStore) {
        let current = self.get(axis);
        if current > MIN_STEP_INDEX {
            self.set(axis, current - 1, prefs);
        }
    }

    /// Step up one index, wrapping to the minimum past the maximum
    ///
    /// The only operation allowed to wrap.
    pub fn rotate(&mut self, axis: Axis, prefs: &mut dyn PrefStore) {
        let current = self.get(axis);
        let next = if current >= MAX_STEP_INDEX {
            MIN_STEP_INDEX
        } else {
            current + 1
        };
        self.set(axis, next, prefs);
    }

    /// Step every selected axis up one index
    pub fn increment_all(&mut self, selection: &AxisSet, prefs: &mut dyn PrefStore) {
        for axis in selection.iter() {
            self.increment(axis, prefs);
        }
    }

    /// Step every selected axis down one index
    pub fn decrement_all(&mut self, selection: &AxisSet, prefs: &mut dyn PrefStore) {
        for axis in selection.iter() {
            self.decrement(axis, prefs);
        }
    }

    /// Displacement per detent for this axis in the given unit system
    pub fn multiplier(&self, axis: Axis, units: UnitMode) -> E4 {
        E4::power10(i32::from(self.get(axis)) - i32::from(units.display_digits()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::testing::MemPrefs;
    use proptest::prelude::*;

    #[test]
    fn test_set_clamps_and_persists() {
        let mut prefs = MemPrefs::default();
        let mut table = StepTable::new();

        assert_eq!(table.set(Axis::X, 9, &mut prefs), MAX_STEP_INDEX);
        assert_eq!(table.get(Axis::X), MAX_STEP_INDEX);
        assert_eq!(
            prefs.get(STEP_PREF_NAME, 0),
            Some(i32::from(MAX_STEP_INDEX))
        );
    }

    #[test]
    fn test_increment_saturates_at_max() {
        let mut prefs = MemPrefs::default();
        let mut table = StepTable::new();
        table.set(Axis::Y, MAX_STEP_INDEX, &mut prefs);

        table.increment(Axis::Y, &mut prefs);
        table.increment(Axis::Y, &mut prefs);
        assert_eq!(table.get(Axis::Y), MAX_STEP_INDEX);
    }

    #[test]
    fn test_decrement_saturates_at_min() {
        let mut prefs = MemPrefs::default();
        let mut table = StepTable::new();
        table.set(Axis::Y, MIN_STEP_INDEX, &mut prefs);

        table.decrement(Axis::Y, &mut prefs);
        table.decrement(Axis::Y, &mut prefs);
        assert_eq!(table.get(Axis::Y), MIN_STEP_INDEX);
    }

    #[test]
    fn test_rotate_wraps_exactly_once() {
        let mut prefs = MemPrefs::default();
        let mut table = StepTable::new();
        table.set(Axis::Z, MAX_STEP_INDEX, &mut prefs);

        table.rotate(Axis::Z, &mut prefs);
        assert_eq!(table.get(Axis::Z), MIN_STEP_INDEX);
        table.rotate(Axis::Z, &mut prefs);
        assert_eq!(table.get(Axis::Z), MIN_STEP_INDEX + 1);
    }

    #[test]
    fn test_load_ignores_garbage() {
        let mut prefs = MemPrefs::default();
        prefs.set(STEP_PREF_NAME, 0, 4);
        prefs.set(STEP_PREF_NAME, 1, 99);
        prefs.set(STEP_PREF_NAME, 2, -3);

        let mut table = StepTable::new();
        table.load(&mut prefs);
        assert_eq!(table.get(Axis::X), 4);
        assert_eq!(table.get(Axis::Y), DEFAULT_STEP_INDEX);
        assert_eq!(table.get(Axis::Z), DEFAULT_STEP_INDEX);
    }

    #[test]
    fn test_broadcast_touches_only_selection() {
        let mut prefs = MemPrefs::default();
        let mut table = StepTable::new();
        let mut selection = AxisSet::single(Axis::X);
        selection.select(Axis::Z);

        table.increment_all(&selection, &mut prefs);
        assert_eq!(table.get(Axis::X), DEFAULT_STEP_INDEX + 1);
        assert_eq!(table.get(Axis::Y), DEFAULT_STEP_INDEX);
        assert_eq!(table.get(Axis::Z), DEFAULT_STEP_INDEX + 1);

        table.decrement_all(&selection, &mut prefs);
        assert_eq!(table.get(Axis::X), DEFAULT_STEP_INDEX);
        assert_eq!(table.get(Axis::Z), DEFAULT_STEP_INDEX);
    }

    #[test]
    fn test_multiplier_display_units() {
        let mut prefs = MemPrefs::default();
        let mut table = StepTable::new();

        // Metric: two display digits, so index 2 is one whole unit
        table.set(Axis::X, 2, &mut prefs);
        assert_eq!(table.multiplier(Axis::X, UnitMode::Mm), E4::ONE);
        table.set(Axis::X, 0, &mut prefs);
        assert_eq!(
            table.multiplier(Axis::X, UnitMode::Mm),
            E4::from_raw(100) // 0.01
        );

        // Inch mode shifts the ladder one digit finer
        table.set(Axis::X, 2, &mut prefs);
        assert_eq!(
            table.multiplier(Axis::X, UnitMode::Inch),
            E4::from_raw(1_000) // 0.1
        );
    }

    proptest! {
        #[test]
        fn prop_mutations_stay_in_range(ops in proptest::collection::vec((0usize..3, 0u8..4), 0..64)) {
            let mut prefs = MemPrefs::default();
            let mut table = StepTable::new();
            for (idx, op) in ops {
                let axis = Axis::from_index(idx).unwrap();
                match op {
                    0 => table.increment(axis, &mut prefs),
                    1 => table.decrement(axis, &mut prefs),
                    2 => table.rotate(axis, &mut prefs),
                    _ => {
                        table.set(axis, 200, &mut prefs);
                    }
                }
                prop_assert!(table.get(axis) <= MAX_STEP_INDEX);
            }
        }

        /// Multiplier grows strictly with the index
        #[test]
        fn prop_multiplier_monotonic(start in MIN_STEP_INDEX..MAX_STEP_INDEX) {
            let mut prefs = MemPrefs::default();
            let mut table = StepTable::new();
            table.set(Axis::X, start, &mut prefs);
            let low = table.multiplier(Axis::X, UnitMode::Mm);
            table.set(Axis::X, start + 1, &mut prefs);
            let high = table.multiplier(Axis::X, UnitMode::Mm);
            prop_assert!(high > low);
        }
    }
}
