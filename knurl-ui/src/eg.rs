//! embedded-graphics surface adapter
//!
//! Wraps any `DrawTarget` with `Rgb565` pixels, so the renderer runs
//! unchanged on a mipidsi panel, the simulator, or a framebuffer.

use embedded_graphics::mono_font::ascii::{FONT_5X8, FONT_6X13, FONT_9X15};
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{
    Circle, PrimitiveStyle, PrimitiveStyleBuilder, Rectangle, RoundedRectangle,
};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};

use crate::surface::{Anchor, Font, Surface, SurfaceError};

/// Corner radius used for every rounded rectangle on the jog screen
const CORNER: u32 = 5;

fn mono_font(font: Font) -> &'static MonoFont<'static> {
    match font {
        Font::Tiny => &FONT_5X8,
        Font::Small => &FONT_6X13,
        Font::Medium => &FONT_9X15,
    }
}

fn text_style(anchor: Anchor) -> (Alignment, Baseline) {
    match anchor {
        Anchor::TopLeft => (Alignment::Left, Baseline::Top),
        Anchor::TopCenter => (Alignment::Center, Baseline::Top),
        Anchor::TopRight => (Alignment::Right, Baseline::Top),
        Anchor::MiddleLeft => (Alignment::Left, Baseline::Middle),
        Anchor::MiddleCenter => (Alignment::Center, Baseline::Middle),
        Anchor::MiddleRight => (Alignment::Right, Baseline::Middle),
        Anchor::BottomLeft => (Alignment::Left, Baseline::Bottom),
        Anchor::BottomCenter => (Alignment::Center, Baseline::Bottom),
        Anchor::BottomRight => (Alignment::Right, Baseline::Bottom),
    }
}

/// `Surface` over an embedded-graphics draw target
pub struct EgSurface<D> {
    target: D,
}

impl<D> EgSurface<D>
where
    D: DrawTarget<Color = Rgb565>,
{
    pub fn new(target: D) -> Self {
        Self { target }
    }

    /// Hand the draw target back, e.g. to reconfigure the panel
    pub fn release(self) -> D {
        self.target
    }
}

impl<D> Surface for EgSurface<D>
where
    D: DrawTarget<Color = Rgb565>,
{
    fn clear(&mut self, color: Rgb565) -> Result<(), SurfaceError> {
        self.target.clear(color).map_err(|_| SurfaceError)
    }

    fn fill_rect(
        &mut self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        corner: u32,
        color: Rgb565,
    ) -> Result<(), SurfaceError> {
        let rect = Rectangle::new(Point::new(x, y), Size::new(width, height));
        RoundedRectangle::with_equal_corners(rect, Size::new(corner, corner))
            .into_styled(PrimitiveStyle::with_fill(color))
            .draw(&mut self.target)
            .map_err(|_| SurfaceError)
    }

    fn outlined_rect(
        &mut self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        fill: Rgb565,
        outline: Rgb565,
    ) -> Result<(), SurfaceError> {
        let style = PrimitiveStyleBuilder::new()
            .fill_color(fill)
            .stroke_color(outline)
            .stroke_width(1)
            .build();
        let rect = Rectangle::new(Point::new(x, y), Size::new(width, height));
        RoundedRectangle::with_equal_corners(rect, Size::new(CORNER, CORNER))
            .into_styled(style)
            .draw(&mut self.target)
            .map_err(|_| SurfaceError)
    }

    fn fill_circle(
        &mut self,
        cx: i32,
        cy: i32,
        radius: u32,
        color: Rgb565,
    ) -> Result<(), SurfaceError> {
        Circle::with_center(Point::new(cx, cy), radius * 2)
            .into_styled(PrimitiveStyle::with_fill(color))
            .draw(&mut self.target)
            .map_err(|_| SurfaceError)
    }

    fn text(
        &mut self,
        text: &str,
        x: i32,
        y: i32,
        color: Rgb565,
        font: Font,
        anchor: Anchor,
    ) -> Result<(), SurfaceError> {
        let (alignment, baseline) = text_style(anchor);
        let style = TextStyleBuilder::new()
            .alignment(alignment)
            .baseline(baseline)
            .build();
        Text::with_text_style(
            text,
            Point::new(x, y),
            MonoTextStyle::new(mono_font(font), color),
            style,
        )
        .draw(&mut self.target)
        .map_err(|_| SurfaceError)?;
        Ok(())
    }
}
