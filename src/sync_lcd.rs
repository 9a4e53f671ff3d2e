use embedded_hal::delay::DelayNs;

use ufmt_write::uWrite;

use crate::display::CharDisplay;
use crate::expander::OutputPins;
use crate::{Commands, DisplayControl, EntryMode, Lines, Mode, Shift};

/// DDRAM address of the first column of each row.
const ROW_OFFSETS: [u8; 4] = [0x00, 0x40, 0x14, 0x54];

/// Which expander lines the LCD signals are wired to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinMap {
    /// Register select, low for commands, high for data.
    pub rs: u8,
    pub enable: u8,
    /// D4 to D7.
    pub data: [u8; 4],
    pub backlight: u8,
}

impl Default for PinMap {
    /// Wiring of the common PCF8574 backpacks: RS P0, E P2, backlight P3,
    /// data P4-P7.
    fn default() -> Self {
        Self {
            rs: 0,
            enable: 2,
            data: [4, 5, 6, 7],
            backlight: 3,
        }
    }
}

/// API to write to the LCD through expander lines in 4 bit mode.
pub struct CharLcd<'a, P, D>
where
    P: OutputPins,
    D: DelayNs,
{
    pins: &'a mut P,
    delay: &'a mut D,
    pin_map: PinMap,
    columns: u8,
    rows: u8,
    row: u8,
    display_ctrl: u8,
    entry_mode: u8,
}

impl<'a, P, D> CharLcd<'a, P, D>
where
    P: OutputPins,
    D: DelayNs,
{
    /// Create new instance with only the expander and delay instance.
    pub fn new(pins: &'a mut P, delay: &'a mut D) -> Self {
        Self {
            pins,
            delay,
            pin_map: PinMap::default(),
            columns: 0,
            rows: 0,
            row: 0,
            display_ctrl: DisplayControl::DisplayOn as u8,
            entry_mode: EntryMode::LeftToRight as u8,
        }
    }

    pub fn with_pin_map(mut self, pin_map: PinMap) -> Self {
        self.pin_map = pin_map;
        self
    }

    /// Direct access to the expander, e.g. for lines the LCD doesn't use.
    pub fn expander_mut(&mut self) -> &mut P {
        &mut *self.pins
    }

    /// Initializes the hardware.
    ///
    /// The controller may power up in 8 bit mode or halfway through a 4 bit
    /// transfer, so it gets three 8 bit function sets before switching to 4 bit.
    fn init(&mut self) -> Result<(), P::Error> {
        // Initial delay to wait for init after power on.
        self.delay.delay_ms(50);

        self.pins.output_pins(&[
            (self.pin_map.rs, false),
            (self.pin_map.enable, false),
        ])?;

        self.write4bits(0x03, false)?;
        self.delay.delay_ms(5);
        self.write4bits(0x03, false)?;
        self.delay.delay_ms(5);
        self.write4bits(0x03, false)?;
        self.delay.delay_us(150);

        // Switch to 4 bit mode
        self.write4bits(0x02, false)?;

        let lines = if self.rows > 1 {
            Lines::Two as u8
        } else {
            Lines::One as u8
        };
        self.command(Mode::FunctionSet as u8 | lines)?;
        self.command(Mode::DisplayControl as u8 | self.display_ctrl)?;
        self.clear()?;
        self.command(Mode::EntrySet as u8 | self.entry_mode)
    }

    fn pulse_enable(&mut self) -> Result<(), P::Error> {
        let enable = self.pin_map.enable;
        self.pins.output(enable, true)?;
        self.delay.delay_us(1);
        self.pins.output(enable, false)?;
        // Commands need > 37us to settle.
        self.delay.delay_us(100);
        Ok(())
    }

    /// Put the low nibble of `nibble` on D4-D7 and latch it.
    fn write4bits(&mut self, nibble: u8, data_mode: bool) -> Result<(), P::Error> {
        let [d4, d5, d6, d7] = self.pin_map.data;
        self.pins.output_pins(&[
            (self.pin_map.rs, data_mode),
            (d4, nibble & 0x01 != 0),
            (d5, nibble & 0x02 != 0),
            (d6, nibble & 0x04 != 0),
            (d7, nibble & 0x08 != 0),
        ])?;
        self.pulse_enable()
    }

    fn send(&mut self, data: u8, data_mode: bool) -> Result<(), P::Error> {
        self.write4bits(data >> 4, data_mode)?;
        self.write4bits(data & 0x0f, data_mode)?;
        Ok(())
    }

    fn command(&mut self, data: u8) -> Result<(), P::Error> {
        self.send(data, false)
    }

    fn write_display_ctrl(&mut self, flag: DisplayControl, on: bool) -> Result<(), P::Error> {
        if on {
            self.display_ctrl |= flag as u8;
        } else {
            self.display_ctrl &= !(flag as u8);
        }
        self.command(Mode::DisplayControl as u8 | self.display_ctrl)
    }
}

impl<'a, P, D> CharDisplay for CharLcd<'a, P, D>
where
    P: OutputPins,
    D: DelayNs,
{
    type Error = P::Error;

    fn begin(&mut self, columns: u8, rows: u8) -> Result<(), P::Error> {
        self.columns = columns;
        self.rows = rows;
        self.init()
    }

    /// Set the cursor to (col, row). Coordinates past the panel clamp to its
    /// last column and row.
    fn set_cursor(&mut self, col: u8, row: u8) -> Result<(), P::Error> {
        let last = self.rows.clamp(1, ROW_OFFSETS.len() as u8) - 1;
        let row = row.min(last);
        let col = col.min(self.columns.saturating_sub(1));
        self.row = row;
        self.command(Mode::DDRAMAddr as u8 | (col + ROW_OFFSETS[row as usize]))
    }

    /// Write string to display.
    fn message(&mut self, text: &str) -> Result<(), P::Error> {
        for c in text.chars() {
            if c == '\n' {
                let next = self.row + 1;
                self.set_cursor(0, next)?;
            } else {
                self.send(c as u8, true)?;
            }
        }
        Ok(())
    }

    /// Clear the display
    fn clear(&mut self) -> Result<(), P::Error> {
        self.command(Commands::Clear as u8)?;
        self.row = 0;
        self.delay.delay_ms(3);
        Ok(())
    }

    /// Return cursor to upper left corner, i.e. (0,0).
    fn home(&mut self) -> Result<(), P::Error> {
        self.command(Commands::ReturnHome as u8)?;
        self.row = 0;
        self.delay.delay_ms(3);
        Ok(())
    }

    fn scroll_display_left(&mut self) -> Result<(), P::Error> {
        self.command(Mode::CursorShift as u8 | Shift::DisplayLeft as u8)
    }

    fn scroll_display_right(&mut self) -> Result<(), P::Error> {
        self.command(Mode::CursorShift as u8 | Shift::DisplayRight as u8)
    }

    fn move_cursor_left(&mut self) -> Result<(), P::Error> {
        self.command(Mode::CursorShift as u8 | Shift::CursorLeft as u8)
    }

    fn move_cursor_right(&mut self) -> Result<(), P::Error> {
        self.command(Mode::CursorShift as u8 | Shift::CursorRight as u8)
    }

    fn set_autoscroll(&mut self, on: bool) -> Result<(), P::Error> {
        if on {
            self.entry_mode |= EntryMode::ShiftIncrement as u8;
        } else {
            self.entry_mode &= !(EntryMode::ShiftIncrement as u8);
        }
        self.command(Mode::EntrySet as u8 | self.entry_mode)
    }

    fn set_left_to_right(&mut self, on: bool) -> Result<(), P::Error> {
        if on {
            self.entry_mode |= EntryMode::LeftToRight as u8;
        } else {
            self.entry_mode &= !(EntryMode::LeftToRight as u8);
        }
        self.command(Mode::EntrySet as u8 | self.entry_mode)
    }

    fn set_cursor_visible(&mut self, on: bool) -> Result<(), P::Error> {
        self.write_display_ctrl(DisplayControl::CursorOn, on)
    }

    fn set_blink(&mut self, on: bool) -> Result<(), P::Error> {
        self.write_display_ctrl(DisplayControl::CursorBlink, on)
    }

    fn set_display(&mut self, on: bool) -> Result<(), P::Error> {
        self.write_display_ctrl(DisplayControl::DisplayOn, on)
    }

    fn backlight(&mut self, on: bool) -> Result<(), P::Error> {
        self.pins.output(self.pin_map.backlight, on)
    }

    fn create_char(&mut self, location: u8, glyph: [u8; 8]) -> Result<(), P::Error> {
        self.command(Mode::CGRAMAddr as u8 | ((location & 0x07) << 3))?;
        for row in glyph {
            self.send(row, true)?;
        }
        Ok(())
    }

    fn write_byte(&mut self, code: u8) -> Result<(), P::Error> {
        self.send(code, true)
    }

    fn columns(&self) -> u8 {
        self.columns
    }

    fn rows(&self) -> u8 {
        self.rows
    }
}

impl<'a, P, D> uWrite for CharLcd<'a, P, D>
where
    P: OutputPins,
    D: DelayNs,
{
    type Error = P::Error;

    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        self.message(s)
    }
}
