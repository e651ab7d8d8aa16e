//! Display and touch front end for the Knurl pendant
//!
//! - `Surface`: the drawing primitives the renderer needs, independent of
//!   any particular panel or driver crate
//! - `EgSurface`: adapter rendering a `Surface` onto any
//!   embedded-graphics `DrawTarget`
//! - `layout`: the fixed touch-button grid and its hit testing
//! - `gesture`: raw touch samples in, click/hold/flick events out
//! - `render`: draws a `JogView` onto a `Surface`
//!
//! The renderer consumes the view-model produced by `knurl-core` and
//! never reads scene state directly, so it can be exercised on the host
//! against a recording surface.

#![no_std]
#![deny(unsafe_code)]

pub mod eg;
pub mod gesture;
pub mod layout;
pub mod render;
pub mod surface;

pub use eg::EgSurface;
pub use gesture::{GestureEvent, GestureRecognizer, TouchPoint};
pub use render::render;
pub use surface::{Anchor, Font, Surface, SurfaceError};
