/*
 * Copyright 2018 Ian Johnson
 *
 * This is free software, distributed under the MIT license.  A copy of the
 * license can be found in the LICENSE file in the project root, or at
 * https://opensource.org/licenses/MIT.
 */

//! The CHIP-8 framebuffer and the built-in hex digit sprites.

use std::default::Default;
use std::fmt;

/// The width of the display.
pub const WIDTH: usize = 64;
/// The height of the display.
pub const HEIGHT: usize = 32;

/// The height of a hex digit sprite.
pub const HEX_HEIGHT: usize = 5;

/// The hex digit sprites, installed in memory at `FONT_START`.
pub const HEX_SPRITES: [[u8; HEX_HEIGHT]; 16] = [
    [0xF0, 0x90, 0x90, 0x90, 0xF0],
    [0x20, 0x60, 0x20, 0x20, 0x70],
    [0xF0, 0x10, 0xF0, 0x80, 0xF0],
    [0xF0, 0x10, 0xF0, 0x10, 0xF0],
    [0x90, 0x90, 0xF0, 0x10, 0x10],
    [0xF0, 0x80, 0xF0, 0x10, 0xF0],
    [0xF0, 0x80, 0xF0, 0x90, 0xF0],
    [0xF0, 0x10, 0x20, 0x40, 0x40],
    [0xF0, 0x90, 0xF0, 0x90, 0xF0],
    [0xF0, 0x90, 0xF0, 0x10, 0xF0],
    [0xF0, 0x90, 0xF0, 0x90, 0x90],
    [0xE0, 0x90, 0xE0, 0x90, 0xE0],
    [0xF0, 0x80, 0x80, 0x80, 0xF0],
    [0xE0, 0x90, 0x90, 0x90, 0xE0],
    [0xF0, 0x80, 0xF0, 0x80, 0xF0],
    [0xF0, 0x80, 0xF0, 0x80, 0x80],
];

/// A copy of the framebuffer: one byte per pixel (0 or 1), row-major.
pub type Screen = [u8; WIDTH * HEIGHT];

/// The CHIP-8 display buffer.
pub struct Buffer {
    /// The pixel data, row-major.
    data: Screen,
    /// Whether the display changed since the last refresh.
    needs_refresh: bool,
}

impl Buffer {
    /// Returns a new display buffer with all pixels clear.
    pub fn new() -> Self {
        Buffer {
            data: [0; WIDTH * HEIGHT],
            needs_refresh: false,
        }
    }

    /// Clears the display.
    pub fn clear(&mut self) {
        for px in self.data.iter_mut() {
            *px = 0;
        }
        self.needs_refresh = true;
    }

    /// Clears the display and the refresh flag, as on power-up.
    pub fn reset(&mut self) {
        self.clear();
        self.needs_refresh = false;
    }

    /// Returns the pixel at the given position (0 or 1).
    pub fn pixel(&self, x: usize, y: usize) -> u8 {
        self.data[y * WIDTH + x]
    }

    /// Returns a copy of the pixel data.
    pub fn snapshot(&self) -> Screen {
        self.data
    }

    /// XORs the given sprite onto the display at the given position.
    ///
    /// Each byte of `sprite` is one row of eight pixels, most significant bit
    /// leftmost.  Coordinates wrap around both edges.  Returns whether any
    /// pixel was switched off.
    pub fn draw_sprite(&mut self, sprite: &[u8], x: usize, y: usize) -> bool {
        let mut collision = false;

        for (j, row) in sprite.iter().enumerate() {
            for i in 0..8 {
                if row & (0x80 >> i) != 0 && self.toggle(x + i, y + j) {
                    collision = true;
                }
            }
        }
        self.needs_refresh = true;

        collision
    }

    /// Returns whether the display changed since the last refresh.
    pub fn needs_refresh(&self) -> bool {
        self.needs_refresh
    }

    /// Marks the display as up to date.
    pub fn mark_refreshed(&mut self) {
        self.needs_refresh = false;
    }

    /// Refreshes the display using the given refresh function.
    ///
    /// If a refresh is unnecessary, nothing will be done.  The refresh
    /// function receives a snapshot of the display.
    pub fn refresh<F, E>(&mut self, f: F) -> Result<(), E>
    where
        F: FnOnce(&Screen) -> Result<(), E>,
    {
        if self.needs_refresh {
            f(&self.data)?;
            self.needs_refresh = false;
        }
        Ok(())
    }

    /// Flips the on/off state of the given pixel (wrapping coordinates),
    /// returning whether it was flipped off from the on state.
    fn toggle(&mut self, x: usize, y: usize) -> bool {
        let idx = (y % HEIGHT) * WIDTH + x % WIDTH;
        let old = self.data[idx];
        self.data[idx] ^= 1;

        old == 1
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Buffer::new()
    }
}

/// Renders the buffer as text, `#` for lit pixels and `.` otherwise.
impl fmt::Display for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in self.data.chunks(WIDTH) {
            for &px in row {
                write!(f, "{}", if px == 1 { '#' } else { '.' })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_sets_and_collides() {
        let mut buf = Buffer::new();
        assert!(!buf.draw_sprite(&[0xF0], 0, 0));
        assert_eq!(buf.pixel(0, 0), 1);
        assert_eq!(buf.pixel(3, 0), 1);
        assert_eq!(buf.pixel(4, 0), 0);
        assert!(buf.needs_refresh());

        // Overlapping only at (3, 0).
        assert!(buf.draw_sprite(&[0x80], 3, 0));
        assert_eq!(buf.pixel(3, 0), 0);
    }

    #[test]
    fn draw_wraps_both_axes() {
        let mut buf = Buffer::new();
        buf.draw_sprite(&[0xFF, 0xFF], 60, 31);
        for &x in [60, 61, 62, 63, 0, 1, 2, 3].iter() {
            assert_eq!(buf.pixel(x, 31), 1, "x = {}", x);
            assert_eq!(buf.pixel(x, 0), 1, "x = {}", x);
        }
        assert_eq!(buf.pixel(4, 0), 0);
        assert_eq!(buf.pixel(59, 31), 0);
    }

    #[test]
    fn refresh_only_when_dirty() {
        let mut buf = Buffer::new();
        let mut calls = 0;
        buf.refresh::<_, ()>(|_| {
            calls += 1;
            Ok(())
        }).unwrap();
        assert_eq!(calls, 0);

        buf.clear();
        buf.refresh::<_, ()>(|screen| {
            assert!(screen.iter().all(|&px| px == 0));
            calls += 1;
            Ok(())
        }).unwrap();
        assert_eq!(calls, 1);
        assert!(!buf.needs_refresh());
    }

    #[test]
    fn text_rendering() {
        let mut buf = Buffer::new();
        buf.draw_sprite(&[0xC0], 0, 0);
        let text = buf.to_string();
        let first = text.lines().next().unwrap();
        assert_eq!(first.len(), WIDTH);
        assert!(first.starts_with("##."));
        assert_eq!(text.lines().count(), HEIGHT);
    }
}
