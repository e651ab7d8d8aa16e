//! Axis selection set
//!
//! A small fixed-size set over the machine's axes, stored as a bitmask but
//! only mutable through the set operations, so the width invariant cannot
//! be broken from outside.

use knurl_proto::Axis;

/// Tri-state answer to "what exactly is selected?"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Selected {
    /// No axis selected
    None,
    /// Exactly this axis selected
    One(Axis),
    /// More than one axis selected
    Many,
}

/// Set of selected axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisSet {
    mask: u8,
}

impl AxisSet {
    /// Empty set
    pub const fn new() -> Self {
        Self { mask: 0 }
    }

    /// Set containing a single axis
    pub const fn single(axis: Axis) -> Self {
        Self {
            mask: 1 << axis.index(),
        }
    }

    /// Add an axis (idempotent)
    pub fn select(&mut self, axis: Axis) {
        self.mask |= 1 << axis.index();
    }

    /// Remove an axis (idempotent)
    pub fn unselect(&mut self, axis: Axis) {
        self.mask &= !(1 << axis.index());
    }

    /// Remove all axes
    pub fn clear(&mut self) {
        self.mask = 0;
    }

    /// True if the axis is in the set
    pub const fn selected(&self, axis: Axis) -> bool {
        self.mask & (1 << axis.index()) != 0
    }

    /// True iff the set is exactly the singleton of this axis
    pub const fn only(&self, axis: Axis) -> bool {
        self.mask == 1 << axis.index()
    }

    pub const fn is_empty(&self) -> bool {
        self.mask == 0
    }

    /// Number of selected axes
    pub const fn len(&self) -> usize {
        self.mask.count_ones() as usize
    }

    /// Distinguish zero, one, or many selected axes
    pub fn exactly(&self) -> Selected {
        if self.mask == 0 {
            return Selected::None;
        }
        if self.mask & (self.mask - 1) != 0 {
            return Selected::Many;
        }
        for axis in Axis::ALL {
            if self.selected(axis) {
                return Selected::One(axis);
            }
        }
        // Unreachable: a nonzero mask within the axis width always matches
        Selected::None
    }

    /// Selected axes in index order
    pub fn iter(&self) -> impl Iterator<Item = Axis> + '_ {
        Axis::ALL.into_iter().filter(|axis| self.selected(*axis))
    }

    /// Replace the selection with the axis after the current single
    /// selection, wrapping past the last axis
    ///
    /// With nothing or several axes selected, selects the last axis.
    pub fn cycle_next(&mut self) {
        match self.exactly() {
            Selected::One(axis) => {
                self.clear();
                let next = (axis.index() + 1) % Axis::COUNT;
                // Index is always in range after the modulo
                if let Some(axis) = Axis::from_index(next) {
                    self.select(axis);
                }
            }
            _ => {
                self.clear();
                if let Some(axis) = Axis::from_index(Axis::COUNT - 1) {
                    self.select(axis);
                }
            }
        }
    }

    /// Replace the selection with the axis before the current single
    /// selection, wrapping before the first axis
    ///
    /// With nothing or several axes selected, selects the first axis.
    pub fn cycle_prev(&mut self) {
        match self.exactly() {
            Selected::One(axis) => {
                self.clear();
                let prev = (axis.index() + Axis::COUNT - 1) % Axis::COUNT;
                if let Some(axis) = Axis::from_index(prev) {
                    self.select(axis);
                }
            }
            _ => {
                self.clear();
                if let Some(axis) = Axis::from_index(0) {
                    self.select(axis);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_select_unselect_idempotent() {
        let mut set = AxisSet::new();
        set.select(Axis::X);
        set.select(Axis::X);
        assert!(set.selected(Axis::X));
        assert_eq!(set.len(), 1);

        set.unselect(Axis::X);
        set.unselect(Axis::X);
        assert!(!set.selected(Axis::X));
        assert!(set.is_empty());
    }

    #[test]
    fn test_exactly_tristate() {
        let mut set = AxisSet::new();
        assert_eq!(set.exactly(), Selected::None);

        set.select(Axis::Y);
        assert_eq!(set.exactly(), Selected::One(Axis::Y));
        assert!(set.only(Axis::Y));

        set.select(Axis::Z);
        assert_eq!(set.exactly(), Selected::Many);
        assert!(!set.only(Axis::Y));
    }

    #[test]
    fn test_iter_in_index_order() {
        let mut set = AxisSet::new();
        set.select(Axis::Z);
        set.select(Axis::X);
        let axes: heapless::Vec<Axis, 3> = set.iter().collect();
        assert_eq!(&axes[..], &[Axis::X, Axis::Z]);
    }

    #[test]
    fn test_cycle_next_wraps() {
        let mut set = AxisSet::single(Axis::Z);
        set.cycle_next();
        assert_eq!(set.exactly(), Selected::One(Axis::X));

        // From an ambiguous selection, cycling picks the last axis
        let mut many = AxisSet::new();
        many.select(Axis::X);
        many.select(Axis::Y);
        many.cycle_next();
        assert_eq!(many.exactly(), Selected::One(Axis::Z));
    }

    #[test]
    fn test_cycle_prev_wraps() {
        let mut set = AxisSet::single(Axis::X);
        set.cycle_prev();
        assert_eq!(set.exactly(), Selected::One(Axis::Z));

        let mut empty = AxisSet::new();
        empty.cycle_prev();
        assert_eq!(empty.exactly(), Selected::One(Axis::X));
    }

    proptest! {
        /// The tri-state answer depends only on the net set of bits, not on
        /// the order of the calls that produced it.
        #[test]
        fn prop_exactly_is_order_invariant(ops in proptest::collection::vec((0usize..3, any::<bool>()), 0..32)) {
            let mut set = AxisSet::new();
            let mut net = [false; 3];
            for (idx, on) in ops {
                let axis = Axis::from_index(idx).unwrap();
                if on {
                    set.select(axis);
                } else {
                    set.unselect(axis);
                }
                net[idx] = on;
            }
            let count = net.iter().filter(|b| **b).count();
            match set.exactly() {
                Selected::None => prop_assert_eq!(count, 0),
                Selected::One(axis) => {
                    prop_assert_eq!(count, 1);
                    prop_assert!(net[axis.index()]);
                }
                Selected::Many => prop_assert!(count > 1),
            }
        }
    }
}
