//! Inter-task communication channels
//!
//! Static embassy-sync primitives wiring the input, link, prefs, and
//! dispatch tasks together. The realtime channel is separate from the
//! line channel so a cancel byte can never queue behind ordinary
//! commands.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::channel::Channel;

use knurl_core::{MachineSnapshot, SceneEvent};
use knurl_proto::{Line, RealtimeSignal};

use crate::prefs::PrefWrite;

/// Capacity for input and state-change events
const EVENT_CHANNEL_SIZE: usize = 16;

/// Capacity for outbound command lines
const LINE_CHANNEL_SIZE: usize = 4;

/// Capacity for realtime bytes
const REALTIME_CHANNEL_SIZE: usize = 4;

/// Capacity for pending preference flushes
const PREF_CHANNEL_SIZE: usize = 8;

/// Scene events from the input tasks and the link rx task
pub static EVENT_CHANNEL: Channel<CriticalSectionRawMutex, SceneEvent, EVENT_CHANNEL_SIZE> =
    Channel::new();

/// Command lines awaiting transmission to the controller
pub static LINE_CHANNEL: Channel<CriticalSectionRawMutex, Line, LINE_CHANNEL_SIZE> = Channel::new();

/// Realtime bytes awaiting transmission, always sent before queued lines
pub static REALTIME_CHANNEL: Channel<CriticalSectionRawMutex, RealtimeSignal, REALTIME_CHANNEL_SIZE> =
    Channel::new();

/// Preference writes awaiting persistence to flash
pub static PREF_CHANNEL: Channel<CriticalSectionRawMutex, PrefWrite, PREF_CHANNEL_SIZE> =
    Channel::new();

/// Last machine snapshot assembled by the link rx task
///
/// Written by the rx task, read by the dispatch task just before each
/// dispatch. Last write wins.
pub static SNAPSHOT: Mutex<CriticalSectionRawMutex, Cell<MachineSnapshot>> =
    Mutex::new(Cell::new(MachineSnapshot {
        state: knurl_proto::MachineState::Disconnected,
        last_alarm: None,
        wpos: [knurl_proto::E4::ZERO; 3],
    }));

/// Read the current snapshot
pub fn snapshot() -> MachineSnapshot {
    SNAPSHOT.lock(|cell| cell.get())
}

/// Replace the current snapshot
pub fn set_snapshot(snapshot: MachineSnapshot) {
    SNAPSHOT.lock(|cell| cell.set(snapshot));
}
