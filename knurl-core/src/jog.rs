//! Jog session state machine
//!
//! Tracks whether the pendant currently has motion in flight and how a
//! cancellation was requested. The externally observed machine state can
//! lag commands by one or more event cycles, so every cancel path is
//! idempotent and re-entrant: requesting cancel while one is already
//! pending is a no-op, and a cancel is emitted whenever either the session
//! or the (possibly stale) machine snapshot says motion is under way.

use knurl_proto::MachineState;

/// Phase of the current jog session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum JogPhase {
    /// No motion commanded
    #[default]
    Idle,
    /// A jog command has been sent and not yet cancelled or completed
    Jogging {
        /// True for an open-ended button jog, false for a bounded pulse
        continuous: bool,
    },
    /// Cancel signalled; waiting for the machine to leave the jog state
    Cancelling,
    /// Cancel signalled by a touch that is still held down
    ///
    /// Held separately from `Cancelling` so a maintained touch cannot race
    /// a restart: the phase only resolves on touch release.
    CancelHeld,
}

impl JogPhase {
    /// True while a jog command is believed to be executing
    pub const fn is_jogging(self) -> bool {
        matches!(self, JogPhase::Jogging { .. })
    }

    /// True while a cancel has been requested and not yet resolved
    pub const fn cancel_pending(self) -> bool {
        matches!(self, JogPhase::Cancelling | JogPhase::CancelHeld)
    }

    /// True unless the session is fully idle
    pub const fn is_active(self) -> bool {
        !matches!(self, JogPhase::Idle)
    }
}

/// The jog session state machine
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct JogSession {
    phase: JogPhase,
}

impl JogSession {
    pub const fn new() -> Self {
        Self {
            phase: JogPhase::Idle,
        }
    }

    pub const fn phase(&self) -> JogPhase {
        self.phase
    }

    /// Reset to idle (scene entry)
    pub fn reset(&mut self) {
        self.phase = JogPhase::Idle;
    }

    /// A bounded pulse jog was sent (encoder detent or button tap)
    pub fn begin_pulse(&mut self) {
        self.phase = JogPhase::Jogging { continuous: false };
    }

    /// An open-ended continuous jog was sent (sustained button press)
    pub fn begin_continuous(&mut self) {
        self.phase = JogPhase::Jogging { continuous: true };
    }

    /// Request cancellation (button release, lock, scene exit)
    ///
    /// Returns true when the caller must emit the realtime cancel signal.
    /// `machine_jogging` is the (possibly stale) snapshot's view; cancel is
    /// emitted when either side believes motion is in flight. Requesting
    /// cancel while one is pending, or while fully idle, emits nothing.
    pub fn request_cancel(&mut self, machine_jogging: bool) -> bool {
        if self.phase.cancel_pending() {
            return false;
        }
        if self.phase.is_jogging() || machine_jogging {
            self.phase = JogPhase::Cancelling;
            return true;
        }
        false
    }

    /// Request cancellation from a touch press that is still held
    ///
    /// Same emission rule as `request_cancel`, but the phase latches in
    /// `CancelHeld` until `release_hold`. An already pending plain cancel
    /// is upgraded to held without re-emitting.
    pub fn hold_cancel(&mut self, machine_jogging: bool) -> bool {
        match self.phase {
            JogPhase::CancelHeld => false,
            JogPhase::Cancelling => {
                self.phase = JogPhase::CancelHeld;
                false
            }
            JogPhase::Jogging { .. } => {
                self.phase = JogPhase::CancelHeld;
                true
            }
            JogPhase::Idle => {
                if machine_jogging {
                    self.phase = JogPhase::CancelHeld;
                    true
                } else {
                    false
                }
            }
        }
    }

    /// The holding touch was released
    ///
    /// Resolves `CancelHeld` to `Cancelling` while the machine still
    /// reports jogging, or straight to `Idle` once it has stopped.
    pub fn release_hold(&mut self, machine_jogging: bool) {
        if self.phase == JogPhase::CancelHeld {
            self.phase = if machine_jogging {
                JogPhase::Cancelling
            } else {
                JogPhase::Idle
            };
        }
    }

    /// Fold in an observed machine state change
    ///
    /// Leaving the jog state resolves `Cancelling` (and a jog that ran to
    /// completion on its own) back to `Idle`. A held touch stays held; it
    /// resolves on release.
    pub fn observe(&mut self, state: MachineState) {
        if !state.is_jogging() {
            match self.phase {
                JogPhase::Cancelling | JogPhase::Jogging { .. } => {
                    self.phase = JogPhase::Idle;
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_while_idle_emits_nothing() {
        let mut session = JogSession::new();
        assert!(!session.request_cancel(false));
        assert_eq!(session.phase(), JogPhase::Idle);
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut session = JogSession::new();
        session.begin_continuous();

        assert!(session.request_cancel(true));
        assert_eq!(session.phase(), JogPhase::Cancelling);
        // Second request is a no-op, not an error
        assert!(!session.request_cancel(true));
        assert_eq!(session.phase(), JogPhase::Cancelling);
    }

    #[test]
    fn test_cancel_trusts_stale_machine_state() {
        // Session idle but the machine still reports Jog: cancel anyway
        let mut session = JogSession::new();
        assert!(session.request_cancel(true));
        assert_eq!(session.phase(), JogPhase::Cancelling);
    }

    #[test]
    fn test_held_cancel_persists_until_release() {
        let mut session = JogSession::new();
        session.begin_pulse();

        assert!(session.hold_cancel(true));
        assert_eq!(session.phase(), JogPhase::CancelHeld);

        // Machine stops while the finger is still down
        session.observe(MachineState::Idle);
        assert_eq!(session.phase(), JogPhase::CancelHeld);

        session.release_hold(false);
        assert_eq!(session.phase(), JogPhase::Idle);
    }

    #[test]
    fn test_release_while_machine_still_jogging() {
        let mut session = JogSession::new();
        session.begin_continuous();
        session.hold_cancel(true);

        session.release_hold(true);
        assert_eq!(session.phase(), JogPhase::Cancelling);

        session.observe(MachineState::Idle);
        assert_eq!(session.phase(), JogPhase::Idle);
    }

    #[test]
    fn test_hold_upgrades_pending_cancel_without_reemitting() {
        let mut session = JogSession::new();
        session.begin_continuous();
        assert!(session.request_cancel(true));
        // Touch lands while the cancel is already in flight
        assert!(!session.hold_cancel(true));
        assert_eq!(session.phase(), JogPhase::CancelHeld);
    }

    #[test]
    fn test_observe_resolves_completed_pulse() {
        let mut session = JogSession::new();
        session.begin_pulse();
        // The bounded jog finished without any cancel
        session.observe(MachineState::Idle);
        assert_eq!(session.phase(), JogPhase::Idle);
    }

    #[test]
    fn test_observe_jog_keeps_cancelling() {
        let mut session = JogSession::new();
        session.begin_continuous();
        session.request_cancel(true);
        session.observe(MachineState::Jog);
        assert_eq!(session.phase(), JogPhase::Cancelling);
    }

    #[test]
    fn test_at_most_one_cancel_flavor() {
        // The phase enum makes Cancelling and CancelHeld mutually
        // exclusive by construction; exercise the transitions between them
        let mut session = JogSession::new();
        session.begin_continuous();
        session.hold_cancel(true);
        assert_eq!(session.phase(), JogPhase::CancelHeld);
        session.release_hold(true);
        assert_eq!(session.phase(), JogPhase::Cancelling);
        assert!(session.phase().cancel_pending());
    }
}
