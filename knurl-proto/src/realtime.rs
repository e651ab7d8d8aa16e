//! Out-of-band realtime control signals
//!
//! Realtime signals are single bytes the controller services immediately,
//! even mid-line on the command channel. Jog cancellation in particular
//! must never queue behind buffered command text.

/// Realtime control signals understood by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RealtimeSignal {
    /// Stop the current jog immediately, discarding queued jog motion
    JogCancel,
    /// Soft-reset the controller
    Reset,
    /// Pause motion at the next safe point
    FeedHold,
    /// Resume from hold
    CycleStart,
    /// Request a `<...>` status report
    StatusReport,
}

impl RealtimeSignal {
    /// Wire byte for this signal
    pub const fn to_byte(self) -> u8 {
        match self {
            RealtimeSignal::JogCancel => 0x85,
            RealtimeSignal::Reset => 0x18,
            RealtimeSignal::FeedHold => b'!',
            RealtimeSignal::CycleStart => b'~',
            RealtimeSignal::StatusReport => b'?',
        }
    }
}
