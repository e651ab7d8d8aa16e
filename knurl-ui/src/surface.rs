//! Drawing surface abstraction
//!
//! The renderer draws through this narrow trait so the same code runs on
//! the panel, on the embedded-graphics simulator, and against a recording
//! fake in tests. Colors are `Rgb565` throughout; panels with other pixel
//! formats convert in their `DrawTarget`.

use embedded_graphics::pixelcolor::Rgb565;

/// Text size classes available to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Font {
    Tiny,
    Small,
    Medium,
}

/// Where the given point sits relative to the rendered text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Anchor {
    TopLeft,
    TopCenter,
    TopRight,
    MiddleLeft,
    MiddleCenter,
    MiddleRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

/// A drawing operation failed at the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SurfaceError;

/// Drawing primitives the jog screen renderer needs
pub trait Surface {
    /// Fill the whole surface with one color
    fn clear(&mut self, color: Rgb565) -> Result<(), SurfaceError>;

    /// Fill a rounded rectangle
    fn fill_rect(
        &mut self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        corner: u32,
        color: Rgb565,
    ) -> Result<(), SurfaceError>;

    /// Fill a rounded rectangle and stroke its outline
    fn outlined_rect(
        &mut self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        fill: Rgb565,
        outline: Rgb565,
    ) -> Result<(), SurfaceError>;

    /// Fill a circle given its center and radius
    fn fill_circle(
        &mut self,
        cx: i32,
        cy: i32,
        radius: u32,
        color: Rgb565,
    ) -> Result<(), SurfaceError>;

    /// Draw a text run anchored at the given point
    fn text(
        &mut self,
        text: &str,
        x: i32,
        y: i32,
        color: Rgb565,
        font: Font,
        anchor: Anchor,
    ) -> Result<(), SurfaceError>;

    /// Push any buffered drawing to the panel
    fn present(&mut self) -> Result<(), SurfaceError> {
        Ok(())
    }
}

/// Named colors used by the jog screen
///
/// The handful of CSS names the original artwork used, frozen here so the
/// renderer never reaches into the color catalog directly.
pub mod palette {
    use embedded_graphics::pixelcolor::Rgb565;
    use embedded_graphics::prelude::{RgbColor, WebColors};

    pub const BLACK: Rgb565 = Rgb565::BLACK;
    pub const WHITE: Rgb565 = Rgb565::WHITE;
    pub const RED: Rgb565 = Rgb565::RED;
    pub const GREEN: Rgb565 = Rgb565::GREEN;
    pub const CYAN: Rgb565 = Rgb565::CYAN;
    pub const BLUE: Rgb565 = Rgb565::BLUE;
    pub const YELLOW: Rgb565 = Rgb565::YELLOW;
    pub const ORANGE: Rgb565 = Rgb565::CSS_ORANGE;
    pub const NAVY: Rgb565 = Rgb565::CSS_NAVY;
    pub const DARK_GREY: Rgb565 = Rgb565::CSS_DIM_GRAY;
    pub const LIGHT_GREY: Rgb565 = Rgb565::CSS_LIGHT_GRAY;
}
