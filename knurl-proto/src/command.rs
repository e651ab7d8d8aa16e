//! Structured machine commands
//!
//! Commands are built as data - a feed/mode header plus ordered
//! (axis, quantity) terms - and rendered to a text line only at the
//! transport boundary. This keeps the synthesizer pure and lets tests
//! assert on structure or on the exact wire text, whichever is clearer.

use core::fmt::Write;

use crate::decimal::E4;

/// Maximum rendered command line length
pub const MAX_LINE: usize = 96;

/// One rendered, newline-free command line
pub type Line = heapless::String<MAX_LINE>;

/// Home-all-axes command
pub const HOME_ALL: &str = "$H";

/// One controllable linear axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Number of axes on this machine
    pub const COUNT: usize = 3;

    /// All axes in index order
    pub const ALL: [Axis; Axis::COUNT] = [Axis::X, Axis::Y, Axis::Z];

    /// Axis letter as used in command text
    pub const fn letter(self) -> char {
        match self {
            Axis::X => 'X',
            Axis::Y => 'Y',
            Axis::Z => 'Z',
        }
    }

    /// Zero-based axis index
    pub const fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Axis for a zero-based index
    pub const fn from_index(index: usize) -> Option<Axis> {
        match index {
            0 => Some(Axis::X),
            1 => Some(Axis::Y),
            2 => Some(Axis::Z),
            _ => None,
        }
    }
}

/// Linear unit system the controller is displaying in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UnitMode {
    #[default]
    Mm,
    Inch,
}

impl UnitMode {
    /// G-code word selecting this unit system
    pub const fn gcode(self) -> &'static str {
        match self {
            UnitMode::Mm => "G21",
            UnitMode::Inch => "G20",
        }
    }

    /// Fractional digits for jog displacements in this unit system
    pub const fn jog_decimals(self) -> u8 {
        match self {
            UnitMode::Mm => 2,
            UnitMode::Inch => 3,
        }
    }

    /// Fractional digits shown on the position readout
    ///
    /// Also the exponent offset for step multipliers: step index `i` maps
    /// to a multiplier of 10^(i - display_digits).
    pub const fn display_digits(self) -> u8 {
        match self {
            UnitMode::Mm => 2,
            UnitMode::Inch => 3,
        }
    }
}

/// One axis term of a jog command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct JogTerm {
    pub axis: Axis,
    pub travel: E4,
}

/// A `$J=G91` relative jog command
///
/// Axes not pushed are omitted from the rendered line; selection drives
/// emission. A zero travel still renders as a well-formed term (the
/// controller treats it as a no-op), so the builder stays stateless.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RelativeJog {
    feed: E4,
    feed_decimals: u8,
    units: Option<UnitMode>,
    travel_decimals: u8,
    terms: heapless::Vec<JogTerm, { Axis::COUNT }>,
}

impl RelativeJog {
    /// Start a jog command with the given feed rate
    ///
    /// `units` adds an explicit G20/G21 word; `None` leaves the
    /// controller's modal unit state untouched.
    pub fn new(feed: E4, feed_decimals: u8, units: Option<UnitMode>, travel_decimals: u8) -> Self {
        Self {
            feed,
            feed_decimals,
            units,
            travel_decimals,
            terms: heapless::Vec::new(),
        }
    }

    /// Append an axis displacement term
    ///
    /// Terms beyond the axis count are ignored; the capacity equals the
    /// number of distinct axes and callers push each axis at most once.
    pub fn push(&mut self, axis: Axis, travel: E4) {
        let _ = self.terms.push(JogTerm { axis, travel });
    }

    /// Number of axis terms
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// True if no axis terms have been pushed
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Axis terms in emission order
    pub fn terms(&self) -> &[JogTerm] {
        &self.terms
    }

    /// Render to command text
    pub fn render(&self) -> Line {
        let mut line = Line::new();
        let _ = line.push_str("$J=G91");
        if let Some(units) = self.units {
            let _ = line.push_str(units.gcode());
        }
        let _ = line.push('F');
        let _ = self.feed.write(&mut line, self.feed_decimals);
        for term in &self.terms {
            let _ = line.push(term.axis.letter());
            let _ = term.travel.write(&mut line, self.travel_decimals);
        }
        line
    }
}

/// A `G10L20P0` command zeroing the work offset of one or more axes
///
/// Sets the current position of each listed axis to zero in the active
/// work coordinate system.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ZeroOffset {
    axes: heapless::Vec<Axis, { Axis::COUNT }>,
}

impl ZeroOffset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero a single axis
    pub fn single(axis: Axis) -> Self {
        let mut cmd = Self::new();
        cmd.push(axis);
        cmd
    }

    pub fn push(&mut self, axis: Axis) {
        let _ = self.axes.push(axis);
    }

    pub fn is_empty(&self) -> bool {
        self.axes.is_empty()
    }

    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }

    pub fn render(&self) -> Line {
        let mut line = Line::new();
        let _ = line.push_str("G10L20P0");
        for axis in &self.axes {
            let _ = line.push(axis.letter());
            let _ = line.push('0');
        }
        line
    }
}

/// Render a stored-routine invocation (`$LocalFS/Run=<path>`)
pub fn run_routine(path: &str) -> Line {
    let mut line = Line::new();
    let _ = write!(line, "$LocalFS/Run={}", path);
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_jog_single_axis() {
        let mut jog = RelativeJog::new(E4::from_int(2000), 0, None, 2);
        jog.push(Axis::X, E4::from_int(3));
        assert_eq!(jog.render().as_str(), "$J=G91F2000X3.00");
    }

    #[test]
    fn test_relative_jog_with_units_and_sign() {
        let mut jog = RelativeJog::new(E4::from_raw(4_242_600), 3, Some(UnitMode::Mm), 0);
        jog.push(Axis::X, E4::from_int(-20));
        jog.push(Axis::Y, E4::from_int(-20));
        assert_eq!(jog.render().as_str(), "$J=G91G21F424.260X-20Y-20");
    }

    #[test]
    fn test_relative_jog_omits_unlisted_axes() {
        let mut jog = RelativeJog::new(E4::from_int(50), 0, None, 2);
        jog.push(Axis::Z, E4::from_raw(100));
        let line = jog.render();
        assert!(!line.as_str().contains('X'));
        assert!(!line.as_str().contains('Y'));
        assert_eq!(line.as_str(), "$J=G91F50Z0.01");
    }

    #[test]
    fn test_relative_jog_zero_travel_is_well_formed() {
        let mut jog = RelativeJog::new(E4::from_int(50), 0, None, 2);
        jog.push(Axis::X, E4::ZERO);
        assert_eq!(jog.render().as_str(), "$J=G91F50X0.00");
    }

    #[test]
    fn test_inch_mode_renders_three_digits() {
        let mut jog = RelativeJog::new(E4::from_int(400), 0, Some(UnitMode::Inch), 3);
        jog.push(Axis::X, E4::from_raw(2_500));
        assert_eq!(jog.render().as_str(), "$J=G91G20F400X0.250");
    }

    #[test]
    fn test_zero_offset() {
        assert_eq!(ZeroOffset::single(Axis::Z).render().as_str(), "G10L20P0Z0");

        let mut cmd = ZeroOffset::new();
        cmd.push(Axis::X);
        cmd.push(Axis::Y);
        assert_eq!(cmd.render().as_str(), "G10L20P0X0Y0");
    }

    #[test]
    fn test_run_routine() {
        assert_eq!(
            run_routine("macros/probe_z.g").as_str(),
            "$LocalFS/Run=macros/probe_z.g"
        );
    }

    #[test]
    fn test_axis_index_roundtrip() {
        for axis in Axis::ALL {
            assert_eq!(Axis::from_index(axis.index()), Some(axis));
        }
        assert_eq!(Axis::from_index(Axis::COUNT), None);
    }
}
