//! View-model for the display reconciler
//!
//! A plain-data projection of the jog scene, rebuilt after every
//! state-changing event and rendered by the display crate. Keeping the
//! projection here keeps rendering out of the event handlers entirely.

use knurl_proto::{Axis, MachineState, E4};

/// Maximum length of the dial-button legend ("Zero" + axis letters)
pub const LEGEND_LEN: usize = 8;

/// One axis row of the readout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AxisReadout {
    pub axis: Axis,
    /// Work position
    pub position: E4,
    /// Axis is part of the current selection
    pub selected: bool,
    /// Persisted step index for this axis
    pub step_index: u8,
}

/// Projection of the jog scene for rendering
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct JogView {
    pub state: MachineState,
    pub last_alarm: Option<u8>,
    pub axes: [AxisReadout; Axis::COUNT],
    /// Show the "Jog Canceled" banner (a cancel is pending)
    pub cancel_banner: bool,
    /// Show the "Touch to cancel jog" hint (bounded jog in flight)
    pub touch_hint: bool,
    /// Show the directional/dial button legends (no jog in flight)
    pub show_legends: bool,
    /// Dial-button legend text
    pub dial_legend: heapless::String<LEGEND_LEN>,
    pub locked: bool,
}

impl JogView {
    /// Step index highlighted in the step legend (shared across axes when
    /// they agree; otherwise the first selected axis wins)
    pub fn highlighted_step(&self) -> u8 {
        self.axes
            .iter()
            .find(|readout| readout.selected)
            .map(|readout| readout.step_index)
            .unwrap_or_else(|| self.axes[0].step_index)
    }
}
