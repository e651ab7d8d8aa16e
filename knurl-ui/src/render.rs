//! Jog screen renderer
//!
//! Draws a `JogView` onto a `Surface`. Pure reconciliation: everything on
//! screen derives from the view-model, so two renders of equal views
//! produce identical output and the caller may skip renders freely.

use knurl_core::{ButtonId, JogView};
use knurl_proto::{MachineState, UnitMode};

use embedded_graphics::pixelcolor::Rgb565;

use crate::layout::{cell_center, DISPLAY_WIDTH};
use crate::surface::{palette, Anchor, Font, Surface, SurfaceError};

/// Banner rectangle
const BANNER_Y: i32 = 3;
const BANNER_HEIGHT: u32 = 38;

/// Vertical center of the state banner text
const BANNER_TEXT_Y: i32 = 22;

/// Y of the cancel/hint message line
const MESSAGE_Y: i32 = 185;

/// Y of the dial-button legend
const DIAL_LEGEND_Y: i32 = 290;

/// Y of the lock marker
const LOCK_Y: i32 = 312;

/// Step legend labels in grid order (buttons 3, 4, 5)
const STEP_LEGENDS: [(&str, u8); 3] = [("X100", 2), ("X10", 1), ("X1", 0)];

/// Routine legend labels in grid order (buttons 7 through 11)
const ROUTINE_LEGENDS: [&str; 5] = ["P RIGHT", "P LEFT", "P Z", "P FRONT", "P REAR"];

/// Banner colors for a machine state: `(background, foreground)`, with
/// `None` leaving the screen background showing through
pub fn state_colors(state: MachineState) -> (Option<Rgb565>, Rgb565) {
    match state {
        MachineState::Idle => (None, palette::LIGHT_GREY),
        MachineState::Run => (None, palette::GREEN),
        MachineState::Jog | MachineState::Homing => (None, palette::CYAN),
        MachineState::Alarm => (Some(palette::RED), palette::BLACK),
        MachineState::Hold => (Some(palette::YELLOW), palette::BLACK),
        MachineState::Check | MachineState::Sleep => (Some(palette::WHITE), palette::BLACK),
        MachineState::DoorOpen => (Some(palette::RED), palette::BLACK),
        MachineState::DoorClosed => (Some(palette::YELLOW), palette::BLACK),
        MachineState::Disconnected => (Some(palette::RED), palette::BLACK),
    }
}

/// Draw the whole jog screen
pub fn render<S: Surface>(
    view: &JogView,
    units: UnitMode,
    surface: &mut S,
) -> Result<(), SurfaceError> {
    surface.clear(palette::BLACK)?;
    draw_banner(view, surface)?;
    draw_axes(view, units, surface)?;

    if view.cancel_banner {
        surface.text(
            "Jog Canceled",
            DISPLAY_WIDTH / 2,
            MESSAGE_Y,
            palette::ORANGE,
            Font::Small,
            Anchor::MiddleCenter,
        )?;
    } else if view.touch_hint {
        surface.text(
            "Touch to cancel jog",
            DISPLAY_WIDTH / 2,
            MESSAGE_Y,
            palette::YELLOW,
            Font::Tiny,
            Anchor::MiddleCenter,
        )?;
    }

    if view.show_legends {
        draw_step_legend(view, surface)?;
        draw_command_legends(view, surface)?;
        surface.text(
            view.dial_legend.as_str(),
            DISPLAY_WIDTH / 2,
            DIAL_LEGEND_Y,
            palette::ORANGE,
            Font::Tiny,
            Anchor::MiddleCenter,
        )?;
    }

    if view.locked {
        surface.text(
            "LOCKED",
            DISPLAY_WIDTH / 2,
            LOCK_Y,
            palette::RED,
            Font::Tiny,
            Anchor::MiddleCenter,
        )?;
    }

    surface.present()
}

fn draw_banner<S: Surface>(view: &JogView, surface: &mut S) -> Result<(), SurfaceError> {
    let (bg, fg) = state_colors(view.state);
    if let Some(bg) = bg {
        surface.fill_rect(0, BANNER_Y, DISPLAY_WIDTH as u32, BANNER_HEIGHT, 5, bg)?;
    }
    if view.state == MachineState::Alarm {
        let mut label: heapless::String<16> = heapless::String::new();
        let _ = label.push_str("Alarm ");
        if let Some(code) = view.last_alarm {
            let mut digits: heapless::String<4> = heapless::String::new();
            let _ = core::fmt::write(&mut digits, format_args!("{}", code));
            let _ = label.push_str(digits.as_str());
        }
        surface.text(
            label.as_str(),
            DISPLAY_WIDTH / 2,
            BANNER_TEXT_Y,
            fg,
            Font::Small,
            Anchor::MiddleCenter,
        )
    } else {
        surface.text(
            view.state.name(),
            DISPLAY_WIDTH / 2,
            BANNER_TEXT_Y,
            fg,
            Font::Medium,
            Anchor::MiddleCenter,
        )
    }
}

/// Axis cells: letter above, position readout below, selection by color
fn draw_axes<S: Surface>(
    view: &JogView,
    units: UnitMode,
    surface: &mut S,
) -> Result<(), SurfaceError> {
    for (slot, readout) in view.axes.iter().enumerate() {
        let (cx, cy) = cell_center(ButtonId(slot as u8));
        let letter_color = if readout.selected {
            palette::GREEN
        } else {
            palette::WHITE
        };
        let mut letter: heapless::String<1> = heapless::String::new();
        let _ = letter.push(readout.axis.letter());
        surface.text(
            letter.as_str(),
            cx,
            cy - 12,
            letter_color,
            Font::Small,
            Anchor::MiddleCenter,
        )?;
        let position: heapless::String<16> =
            readout.position.to_string(units.display_digits());
        surface.text(
            position.as_str(),
            cx,
            cy + 10,
            palette::WHITE,
            Font::Tiny,
            Anchor::MiddleCenter,
        )?;
    }
    Ok(())
}

fn draw_step_legend<S: Surface>(view: &JogView, surface: &mut S) -> Result<(), SurfaceError> {
    let highlighted = view.highlighted_step();
    for (slot, (label, index)) in STEP_LEGENDS.iter().enumerate() {
        let (cx, cy) = cell_center(ButtonId(3 + slot as u8));
        let color = if *index == highlighted {
            palette::GREEN
        } else {
            palette::WHITE
        };
        surface.text(label, cx, cy, color, Font::Small, Anchor::MiddleCenter)?;
    }
    Ok(())
}

fn draw_command_legends<S: Surface>(view: &JogView, surface: &mut S) -> Result<(), SurfaceError> {
    let home_color = if view.state == MachineState::Homing {
        palette::RED
    } else {
        palette::WHITE
    };
    let (cx, cy) = cell_center(ButtonId(6));
    surface.text("HOME", cx, cy, home_color, Font::Tiny, Anchor::MiddleCenter)?;

    for (slot, label) in ROUTINE_LEGENDS.iter().enumerate() {
        let (cx, cy) = cell_center(ButtonId(7 + slot as u8));
        surface.text(label, cx, cy, palette::WHITE, Font::Tiny, Anchor::MiddleCenter)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use knurl_proto::{Axis, E4};

    /// Surface fake recording every text run it is asked to draw
    #[derive(Default)]
    struct RecordingSurface {
        cleared: bool,
        rects: usize,
        texts: heapless::Vec<(heapless::String<24>, Rgb565), 32>,
    }

    impl RecordingSurface {
        fn drew_text(&self, needle: &str) -> Option<Rgb565> {
            self.texts
                .iter()
                .find(|(text, _)| text.as_str() == needle)
                .map(|(_, color)| *color)
        }
    }

    impl Surface for RecordingSurface {
        fn clear(&mut self, _color: Rgb565) -> Result<(), SurfaceError> {
            self.cleared = true;
            Ok(())
        }

        fn fill_rect(
            &mut self,
            _x: i32,
            _y: i32,
            _width: u32,
            _height: u32,
            _corner: u32,
            _color: Rgb565,
        ) -> Result<(), SurfaceError> {
            self.rects += 1;
            Ok(())
        }

        fn outlined_rect(
            &mut self,
            _x: i32,
            _y: i32,
            _width: u32,
            _height: u32,
            _fill: Rgb565,
            _outline: Rgb565,
        ) -> Result<(), SurfaceError> {
            self.rects += 1;
            Ok(())
        }

        fn fill_circle(
            &mut self,
            _cx: i32,
            _cy: i32,
            _radius: u32,
            _color: Rgb565,
        ) -> Result<(), SurfaceError> {
            Ok(())
        }

        fn text(
            &mut self,
            text: &str,
            _x: i32,
            _y: i32,
            color: Rgb565,
            _font: Font,
            _anchor: Anchor,
        ) -> Result<(), SurfaceError> {
            let mut owned = heapless::String::new();
            let _ = owned.push_str(text);
            let _ = self.texts.push((owned, color));
            Ok(())
        }
    }

    fn idle_view() -> JogView {
        let axes = Axis::ALL.map(|axis| knurl_core::view::AxisReadout {
            axis,
            position: E4::ZERO,
            selected: axis == Axis::X,
            step_index: 2,
        });
        let mut dial_legend = heapless::String::new();
        let _ = dial_legend.push_str("ZeroX");
        JogView {
            state: MachineState::Idle,
            last_alarm: None,
            axes,
            cancel_banner: false,
            touch_hint: false,
            show_legends: true,
            dial_legend,
            locked: false,
        }
    }

    #[test]
    fn test_state_color_table() {
        assert_eq!(state_colors(MachineState::Idle).0, None);
        // A running program reads green; motion the pendant itself can
        // command or interrupt reads cyan
        assert_eq!(state_colors(MachineState::Run), (None, palette::GREEN));
        assert_eq!(state_colors(MachineState::Jog), (None, palette::CYAN));
        assert_eq!(state_colors(MachineState::Homing), (None, palette::CYAN));
        assert_eq!(
            state_colors(MachineState::Alarm),
            (Some(palette::RED), palette::BLACK)
        );
        assert_eq!(
            state_colors(MachineState::Hold),
            (Some(palette::YELLOW), palette::BLACK)
        );
        assert_eq!(
            state_colors(MachineState::Disconnected).0,
            Some(palette::RED)
        );
    }

    #[test]
    fn test_idle_screen_contents() {
        let mut surface = RecordingSurface::default();
        render(&idle_view(), UnitMode::Mm, &mut surface).unwrap();

        assert!(surface.cleared);
        assert!(surface.drew_text("Idle").is_some());
        // Selected axis letter is green, the others white
        assert_eq!(surface.drew_text("X"), Some(palette::GREEN));
        assert_eq!(surface.drew_text("Y"), Some(palette::WHITE));
        // Highlighted step index 2 lights the X100 legend
        assert_eq!(surface.drew_text("X100"), Some(palette::GREEN));
        assert_eq!(surface.drew_text("X10"), Some(palette::WHITE));
        assert!(surface.drew_text("HOME").is_some());
        assert_eq!(surface.drew_text("ZeroX"), Some(palette::ORANGE));
        // Metric positions render with two digits
        assert!(surface.drew_text("0.00").is_some());
    }

    #[test]
    fn test_alarm_banner_shows_code() {
        let mut view = idle_view();
        view.state = MachineState::Alarm;
        view.last_alarm = Some(14);

        let mut surface = RecordingSurface::default();
        render(&view, UnitMode::Mm, &mut surface).unwrap();

        assert!(surface.rects >= 1); // red banner fill
        assert!(surface.drew_text("Alarm 14").is_some());
    }

    #[test]
    fn test_cancel_banner_suppresses_legends() {
        let mut view = idle_view();
        view.state = MachineState::Jog;
        view.cancel_banner = true;
        view.show_legends = false;

        let mut surface = RecordingSurface::default();
        render(&view, UnitMode::Mm, &mut surface).unwrap();

        assert!(surface.drew_text("Jog Canceled").is_some());
        assert!(surface.drew_text("X100").is_none());
        assert!(surface.drew_text("HOME").is_none());
    }

    #[test]
    fn test_touch_hint_during_bounded_jog() {
        let mut view = idle_view();
        view.state = MachineState::Jog;
        view.touch_hint = true;
        view.show_legends = false;

        let mut surface = RecordingSurface::default();
        render(&view, UnitMode::Mm, &mut surface).unwrap();
        assert!(surface.drew_text("Touch to cancel jog").is_some());
    }

    #[test]
    fn test_lock_marker() {
        let mut view = idle_view();
        view.locked = true;

        let mut surface = RecordingSurface::default();
        render(&view, UnitMode::Mm, &mut surface).unwrap();
        assert_eq!(surface.drew_text("LOCKED"), Some(palette::RED));
    }

    #[test]
    fn test_inch_positions_render_three_digits() {
        let mut surface = RecordingSurface::default();
        render(&idle_view(), UnitMode::Inch, &mut surface).unwrap();
        assert!(surface.drew_text("0.000").is_some());
    }
}
