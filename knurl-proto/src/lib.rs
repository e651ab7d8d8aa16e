//! Grbl/FluidNC wire-level types for the Knurl pendant
//!
//! This crate defines everything that crosses the serial link between the
//! pendant and the motion controller:
//!
//! - `E4` fixed-point decimal values (the controller speaks decimal text)
//! - structured command builders, rendered to text only at the transport
//!   boundary (`$J=` relative jogs, `G10L20` offset zeroing, `$H`, macros)
//! - out-of-band realtime control bytes (jog cancel, feed hold, ...)
//! - the controller state word and the `<...>` status report parser
//!
//! The pendant never awaits a reply to anything it sends. Commands are
//! line-oriented and best-effort; realtime signals are single bytes that
//! bypass the line channel entirely.

#![no_std]
#![deny(unsafe_code)]

pub mod command;
pub mod decimal;
pub mod realtime;
pub mod report;
pub mod state;

pub use command::{Axis, RelativeJog, UnitMode, ZeroOffset, Line, HOME_ALL};
pub use decimal::E4;
pub use realtime::RealtimeSignal;
pub use report::{Report, ReportParser, StatusReport};
pub use state::MachineState;
