//! Scene implementations

mod jog;

pub use jog::{JogAction, JogScene, ROUTINES};
