//! What the status loop and the feature test need from a character LCD.

use core::fmt::Debug;

/// Operations of an HD44780 style character display.
///
/// Coordinates are zero based, column first.
pub trait CharDisplay {
    type Error: Debug;

    /// Initialise the controller for a `columns` x `rows` panel.
    fn begin(&mut self, columns: u8, rows: u8) -> Result<(), Self::Error>;
    fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), Self::Error>;
    /// Write text at the cursor. `'\n'` continues on the next row.
    fn message(&mut self, text: &str) -> Result<(), Self::Error>;
    fn clear(&mut self) -> Result<(), Self::Error>;
    /// Cursor back to (0, 0) and undo any display shift.
    fn home(&mut self) -> Result<(), Self::Error>;
    fn scroll_display_left(&mut self) -> Result<(), Self::Error>;
    fn scroll_display_right(&mut self) -> Result<(), Self::Error>;
    fn move_cursor_left(&mut self) -> Result<(), Self::Error>;
    fn move_cursor_right(&mut self) -> Result<(), Self::Error>;
    fn set_autoscroll(&mut self, on: bool) -> Result<(), Self::Error>;
    /// Text direction. Off writes right to left.
    fn set_left_to_right(&mut self, on: bool) -> Result<(), Self::Error>;
    fn set_cursor_visible(&mut self, on: bool) -> Result<(), Self::Error>;
    fn set_blink(&mut self, on: bool) -> Result<(), Self::Error>;
    fn set_display(&mut self, on: bool) -> Result<(), Self::Error>;
    fn backlight(&mut self, on: bool) -> Result<(), Self::Error>;
    /// Store a 5x8 glyph in one of the eight CGRAM slots.
    fn create_char(&mut self, location: u8, glyph: [u8; 8]) -> Result<(), Self::Error>;
    /// Write a raw character code, e.g. a CGRAM slot.
    fn write_byte(&mut self, code: u8) -> Result<(), Self::Error>;

    /// Columns given to the last [`begin`](CharDisplay::begin).
    fn columns(&self) -> u8;
    /// Rows given to the last [`begin`](CharDisplay::begin).
    fn rows(&self) -> u8;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub columns: u8,
    pub rows: u8,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            columns: 20,
            rows: 4,
        }
    }
}

/// Set the geometry and switch the backlight on.
pub fn power_up<L>(lcd: &mut L, geometry: Geometry) -> Result<(), L::Error>
where
    L: CharDisplay,
{
    lcd.begin(geometry.columns, geometry.rows)?;
    lcd.backlight(true)
}
