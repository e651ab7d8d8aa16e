//! Controller machine state
//!
//! The state word from the controller's status reports. The pendant
//! observes this but never owns it: it is updated asynchronously by the
//! link task and may be stale by the time a handler reads it.

/// Machine state as reported by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MachineState {
    Idle,
    Run,
    Jog,
    Homing,
    Alarm,
    Hold,
    Check,
    DoorOpen,
    DoorClosed,
    Sleep,
    /// No status report received yet, or the link dropped
    #[default]
    Disconnected,
}

impl MachineState {
    /// Parse the state token of a status report
    pub fn from_name(name: &str) -> Option<Self> {
        // Hold and Door carry a sub-code after a colon (e.g. `Hold:1`)
        let (token, sub) = match name.split_once(':') {
            Some((t, s)) => (t, Some(s)),
            None => (name, None),
        };
        match token {
            "Idle" => Some(MachineState::Idle),
            "Run" => Some(MachineState::Run),
            "Jog" => Some(MachineState::Jog),
            "Home" | "Homing" => Some(MachineState::Homing),
            "Alarm" => Some(MachineState::Alarm),
            "Hold" => Some(MachineState::Hold),
            "Check" => Some(MachineState::Check),
            "Door" => match sub {
                Some("0") | Some("3") => Some(MachineState::DoorClosed),
                _ => Some(MachineState::DoorOpen),
            },
            "Sleep" => Some(MachineState::Sleep),
            _ => None,
        }
    }

    /// Display name for this state
    pub const fn name(self) -> &'static str {
        match self {
            MachineState::Idle => "Idle",
            MachineState::Run => "Run",
            MachineState::Jog => "Jog",
            MachineState::Homing => "Homing",
            MachineState::Alarm => "Alarm",
            MachineState::Hold => "Hold",
            MachineState::Check => "Check",
            MachineState::DoorOpen => "Door Open",
            MachineState::DoorClosed => "Door Closed",
            MachineState::Sleep => "Sleep",
            MachineState::Disconnected => "No Link",
        }
    }

    /// True while the controller is executing a jog
    pub const fn is_jogging(self) -> bool {
        matches!(self, MachineState::Jog)
    }

    /// True if a homing cycle may be started
    pub const fn allows_homing(self) -> bool {
        matches!(self, MachineState::Idle | MachineState::Alarm)
    }

    /// True if a stored routine may be started
    pub const fn allows_routine(self) -> bool {
        matches!(self, MachineState::Idle)
    }
}
