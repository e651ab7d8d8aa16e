//! Preference persistence
//!
//! Scene code reads and writes preferences synchronously through
//! `CachedPrefs`; every write is also forwarded to the flash task, which
//! persists it through a `sequential-storage` map in the reserved top
//! region of flash. Reads never touch flash after boot.

use core::ops::Range;

use defmt::{info, warn};
use embassy_rp::flash::{Async, Flash};
use embassy_rp::peripherals::FLASH;
use sequential_storage::cache::NoCache;
use sequential_storage::map::{fetch_item, store_item};

use knurl_core::PrefStore;
use knurl_proto::Axis;

use crate::channels::PREF_CHANNEL;

/// Total flash size on the Pico-class boards this firmware targets
pub const FLASH_SIZE: usize = 2 * 1024 * 1024;

/// Flash offsets reserved for the preference map (see memory.x)
const PREF_RANGE: Range<u32> = (FLASH_SIZE as u32 - 64 * 1024)..(FLASH_SIZE as u32);

/// Scratch buffer size for map items
const ITEM_BUF: usize = 32;

/// Preference names with persistent slots, in key order
const PREF_NAMES: [&str; 1] = [knurl_core::step::STEP_PREF_NAME];

/// Indices per preference name
const PREF_SLOTS: usize = Axis::COUNT;

/// One write on its way to flash
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PrefWrite {
    pub key: u16,
    pub value: i32,
}

/// Map key for a (name, index) pair, if the name is registered
fn pref_key(name: &str, index: usize) -> Option<u16> {
    if index >= PREF_SLOTS {
        return None;
    }
    PREF_NAMES
        .iter()
        .position(|candidate| *candidate == name)
        .map(|id| ((id as u16) << 8) | index as u16)
}

/// RAM cache of every registered preference
///
/// The dispatch task owns one of these; writes go to the cache first and
/// to the flush channel second, so the scene sees its own writes
/// immediately regardless of flash latency.
pub struct CachedPrefs {
    values: [[Option<i32>; PREF_SLOTS]; PREF_NAMES.len()],
}

impl CachedPrefs {
    pub const fn new() -> Self {
        Self {
            values: [[None; PREF_SLOTS]; PREF_NAMES.len()],
        }
    }
}

impl PrefStore for CachedPrefs {
    fn get(&mut self, name: &str, index: usize) -> Option<i32> {
        let key = pref_key(name, index)?;
        self.values[(key >> 8) as usize][(key & 0xff) as usize]
    }

    fn set(&mut self, name: &str, index: usize, value: i32) {
        let Some(key) = pref_key(name, index) else {
            warn!("unregistered pref {}[{}]", name, index);
            return;
        };
        self.values[(key >> 8) as usize][(key & 0xff) as usize] = Some(value);
        if PREF_CHANNEL.try_send(PrefWrite { key, value }).is_err() {
            // The flush task is behind; the cache stays correct and the
            // next write of this key persists the latest value
            warn!("pref flush channel full, dropping write");
        }
    }
}

pub type PrefFlash = Flash<'static, FLASH, Async, FLASH_SIZE>;

/// Load every registered preference from flash into a fresh cache
///
/// Runs once at boot, before the dispatch task starts. Missing or
/// unreadable items simply stay unset; `StepTable::load` falls back to
/// defaults for those.
pub async fn load_prefs(flash: &mut PrefFlash) -> CachedPrefs {
    let mut prefs = CachedPrefs::new();
    let mut buffer = [0u8; ITEM_BUF];
    for (id, _) in PREF_NAMES.iter().enumerate() {
        for slot in 0..PREF_SLOTS {
            let key = ((id as u16) << 8) | slot as u16;
            match fetch_item::<u16, i32, _>(
                flash,
                PREF_RANGE,
                &mut NoCache::new(),
                &mut buffer,
                &key,
            )
            .await
            {
                Ok(Some(value)) => {
                    prefs.values[id][slot] = Some(value);
                }
                Ok(None) => {}
                Err(_) => warn!("pref load failed for key {:#x}", key),
            }
        }
    }
    info!("preferences loaded");
    prefs
}

/// Persist preference writes as they arrive
#[embassy_executor::task]
pub async fn pref_flush_task(mut flash: PrefFlash) {
    info!("pref flush task started");
    let mut buffer = [0u8; ITEM_BUF];
    loop {
        let write = PREF_CHANNEL.receive().await;
        let result = store_item(
            &mut flash,
            PREF_RANGE,
            &mut NoCache::new(),
            &mut buffer,
            &write.key,
            &write.value,
        )
        .await;
        if result.is_err() {
            warn!("pref store failed for key {:#x}", write.key);
        }
    }
}
