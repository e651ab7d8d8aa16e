//! Board-agnostic core logic for the Knurl pendant
//!
//! This crate contains all pendant logic that does not depend on specific
//! hardware or transports:
//!
//! - Axis selection set and per-axis step multiplier table
//! - Jog session state machine with safe cancellation semantics
//! - Scene capability (event enum + hook trait) and the dispatcher
//! - The jog scene itself, including command synthesis
//! - Tuning constants and product-variant configuration
//! - The view-model handed to the display reconciler
//!
//! Everything here is single-threaded and event-driven: each input event
//! runs one handler to completion, mutating state and optionally issuing
//! one outbound line or realtime signal. Nothing blocks.

#![no_std]
#![deny(unsafe_code)]

pub mod axis;
pub mod jog;
pub mod scene;
pub mod scenes;
pub mod step;
pub mod tuning;
pub mod view;

pub use axis::{AxisSet, Selected};
pub use jog::{JogPhase, JogSession};
pub use scene::{
    dispatch, ButtonId, CommandSink, FlickDirection, JogButton, MachineSnapshot, Navigator,
    PrefStore, Scene, SceneCtx, SceneEvent, SceneId, SendError,
};
pub use step::StepTable;
pub use view::JogView;
