//! Fixed screen geometry and touch-grid hit testing
//!
//! The jog screen is a 3x4 grid of invisible touch cells below the state
//! banner. Button ids count left to right, top to bottom, matching the
//! action map in `knurl-core`.

use knurl_core::ButtonId;

/// Panel width in pixels
pub const DISPLAY_WIDTH: i32 = 240;

/// Panel height in pixels
pub const DISPLAY_HEIGHT: i32 = 320;

/// First row of the touch grid (the state banner sits above)
pub const GRID_TOP: i32 = 45;

/// Last row still inside the touch grid
pub const GRID_BOTTOM: i32 = 300;

/// Touch cell width
pub const CELL_WIDTH: i32 = 80;

/// Touch cell height
pub const CELL_HEIGHT: i32 = 64;

/// Grid columns
pub const COLS: u8 = 3;

/// Grid rows
pub const ROWS: u8 = 4;

/// Resolve a touch coordinate to a grid button
///
/// Touches above the grid (the banner) or below it map to no button.
pub fn button_at(x: i32, y: i32) -> Option<ButtonId> {
    if x < 0 || x >= DISPLAY_WIDTH {
        return None;
    }
    if y < GRID_TOP || y > GRID_BOTTOM {
        return None;
    }
    let col = (x / CELL_WIDTH) as u8;
    let row = ((y - GRID_TOP) / CELL_HEIGHT) as u8;
    if row >= ROWS {
        return None;
    }
    Some(ButtonId(row * COLS + col))
}

/// Center of a grid cell, for drawing its legend
pub fn cell_center(button: ButtonId) -> (i32, i32) {
    let col = i32::from(button.0 % COLS);
    let row = i32::from(button.0 / COLS);
    (
        col * CELL_WIDTH + CELL_WIDTH / 2,
        GRID_TOP + row * CELL_HEIGHT + CELL_HEIGHT / 2,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_is_dead_zone() {
        assert_eq!(button_at(120, 0), None);
        assert_eq!(button_at(120, 44), None);
        assert_eq!(button_at(120, 45), Some(ButtonId(1)));
    }

    #[test]
    fn test_grid_corners() {
        assert_eq!(button_at(0, GRID_TOP), Some(ButtonId(0)));
        assert_eq!(button_at(DISPLAY_WIDTH - 1, GRID_TOP), Some(ButtonId(2)));
        assert_eq!(button_at(0, GRID_BOTTOM), Some(ButtonId(9)));
        assert_eq!(button_at(DISPLAY_WIDTH - 1, GRID_BOTTOM), Some(ButtonId(11)));
    }

    #[test]
    fn test_cell_boundaries() {
        // Column boundary at x = 80
        assert_eq!(button_at(79, GRID_TOP), Some(ButtonId(0)));
        assert_eq!(button_at(80, GRID_TOP), Some(ButtonId(1)));
        // Row boundary at y = 45 + 64
        assert_eq!(button_at(0, GRID_TOP + CELL_HEIGHT - 1), Some(ButtonId(0)));
        assert_eq!(button_at(0, GRID_TOP + CELL_HEIGHT), Some(ButtonId(3)));
    }

    #[test]
    fn test_below_grid_is_dead() {
        assert_eq!(button_at(120, GRID_BOTTOM + 1), None);
        assert_eq!(button_at(120, DISPLAY_HEIGHT), None);
    }

    #[test]
    fn test_off_panel_is_dead() {
        assert_eq!(button_at(-1, 100), None);
        assert_eq!(button_at(DISPLAY_WIDTH, 100), None);
    }

    #[test]
    fn test_cell_center_within_cell() {
        for id in 0..(ROWS * COLS) {
            let (x, y) = cell_center(ButtonId(id));
            assert_eq!(button_at(x, y), Some(ButtonId(id)));
        }
    }
}
