/*
 * Copyright 2018 Ian Johnson
 *
 * This is free software, distributed under the MIT license.  A copy of the
 * license can be found in the LICENSE file in the project root, or at
 * https://opensource.org/licenses/MIT.
 */

//! The execution context shared by the instruction handlers.
//!
//! A `Context` is the complete machine state.  The interpreter owns one and
//! lends it to a handler by mutable reference for every instruction, so
//! handlers read and write fields directly and nothing has to be copied back
//! afterwards.

use std::ops::Range;

use display::{self, Screen, HEIGHT, HEX_HEIGHT, HEX_SPRITES, WIDTH};
use input;
use timer::Timer;
use {FONT_START, MEM_SIZE, PROG_START, STACK_SIZE};

/// An error resulting from a memory access past the end of memory.
#[derive(Debug, Fail, PartialEq, Eq)]
#[fail(display = "address out of bounds: {:#05X}", _0)]
pub struct AddressOutOfBoundsError(pub usize);

/// An error resulting from a `CALL` with a full call stack.
#[derive(Debug, Fail, PartialEq, Eq)]
#[fail(display = "call stack overflow ({} frames)", _0)]
pub struct StackOverflowError(pub usize);

/// An error resulting from a bad `RET` instruction.
#[derive(Debug, Fail, PartialEq, Eq)]
#[fail(display = "no subroutine to return from")]
pub struct StackUnderflowError;

/// Observer for framebuffer changes: `(snapshot, width, height)`.
pub type DrawCallback = Box<dyn FnMut(Screen, usize, usize)>;
/// Observer for the sound timer reaching zero.
pub type SoundCallback = Box<dyn FnMut()>;

/// Returns the memory range `start..start + len`, or an error naming the
/// last address if it does not fit in memory.
pub fn mem_range(start: usize, len: usize) -> Result<Range<usize>, AddressOutOfBoundsError> {
    if start + len > MEM_SIZE {
        Err(AddressOutOfBoundsError(start + len.max(1) - 1))
    } else {
        Ok(start..start + len)
    }
}

/// The complete state of a CHIP-8 machine.
pub struct Context {
    /// The internal memory.
    pub mem: [u8; MEM_SIZE],
    /// The general-purpose registers `V0`-`VF`.
    pub v: [u8; 16],
    /// The special register `I`.
    pub i: u16,
    /// The program counter.
    pub pc: u16,
    /// The display buffer, including the draw flag.
    pub display: display::Buffer,
    /// The delay timer.
    pub dt: Timer,
    /// The sound timer.
    pub st: Timer,
    /// The return addresses of active subroutine calls.
    pub stack: [u16; STACK_SIZE],
    /// The number of entries in `stack` that are in use.
    pub sp: usize,
    /// The keypad state.
    pub input: input::State,

    draw_callback: Option<DrawCallback>,
    sound_callback: Option<SoundCallback>,
}

impl Context {
    /// Returns a freshly reset context with no callbacks.
    pub fn new() -> Self {
        let mut ctx = Context {
            mem: [0; MEM_SIZE],
            v: [0; 16],
            i: 0,
            pc: PROG_START as u16,
            display: display::Buffer::new(),
            dt: Timer::new(),
            st: Timer::new(),
            stack: [0; STACK_SIZE],
            sp: 0,
            input: input::State::new(),
            draw_callback: None,
            sound_callback: None,
        };
        ctx.install_font();
        ctx
    }

    /// Zeroes all machine state and reinstalls the font.
    ///
    /// Registered callbacks are kept.
    pub fn reset(&mut self) {
        self.mem = [0; MEM_SIZE];
        self.v = [0; 16];
        self.i = 0;
        self.pc = PROG_START as u16;
        self.display.reset();
        self.dt.set(0);
        self.st.set(0);
        self.stack = [0; STACK_SIZE];
        self.sp = 0;
        self.input.clear();
        self.install_font();
    }

    /// The display width, in pixels.
    pub fn width(&self) -> usize {
        WIDTH
    }

    /// The display height, in pixels.
    pub fn height(&self) -> usize {
        HEIGHT
    }

    /// Returns the byte at the given address.
    pub fn read(&self, addr: usize) -> Result<u8, AddressOutOfBoundsError> {
        self.mem
            .get(addr)
            .cloned()
            .ok_or(AddressOutOfBoundsError(addr))
    }

    /// Returns `len` bytes of memory starting at `start`.
    pub fn slice(&self, start: usize, len: usize) -> Result<&[u8], AddressOutOfBoundsError> {
        Ok(&self.mem[mem_range(start, len)?])
    }

    /// Returns `len` bytes of mutable memory starting at `start`.
    pub fn slice_mut(
        &mut self,
        start: usize,
        len: usize,
    ) -> Result<&mut [u8], AddressOutOfBoundsError> {
        Ok(&mut self.mem[mem_range(start, len)?])
    }

    /// Skips the next instruction.
    pub fn skip(&mut self) {
        self.pc = self.pc.wrapping_add(2);
    }

    /// Pushes a return address onto the call stack.
    pub fn push(&mut self, addr: u16) -> Result<(), StackOverflowError> {
        if self.sp >= STACK_SIZE {
            return Err(StackOverflowError(self.sp));
        }
        self.stack[self.sp] = addr;
        self.sp += 1;
        Ok(())
    }

    /// Pops the most recent return address off the call stack.
    pub fn pop(&mut self) -> Result<u16, StackUnderflowError> {
        if self.sp == 0 {
            return Err(StackUnderflowError);
        }
        self.sp -= 1;
        Ok(self.stack[self.sp])
    }

    /// Registers the draw observer, replacing any previous one.
    pub fn set_draw_callback(&mut self, cb: Option<DrawCallback>) {
        self.draw_callback = cb;
    }

    /// Registers the sound observer, replacing any previous one.
    pub fn set_sound_callback(&mut self, cb: Option<SoundCallback>) {
        self.sound_callback = cb;
    }

    /// Hands a snapshot of the display to the draw observer, if there is
    /// one.  The draw flag itself is raised by the display buffer.
    pub fn notify_draw(&mut self) {
        if let Some(ref mut cb) = self.draw_callback {
            cb(self.display.snapshot(), WIDTH, HEIGHT);
        }
    }

    /// Tells the sound observer, if there is one, that the sound timer ran
    /// out.
    pub fn notify_sound(&mut self) {
        if let Some(ref mut cb) = self.sound_callback {
            cb();
        }
    }

    fn install_font(&mut self) {
        for (i, sprite) in HEX_SPRITES.iter().enumerate() {
            let start = FONT_START + i * HEX_HEIGHT;
            self.mem[start..start + HEX_HEIGHT].copy_from_slice(sprite);
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Context::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn font_installed_at_font_start() {
        let ctx = Context::new();
        assert_eq!(&ctx.mem[0x50..0x55], &[0xF0, 0x90, 0x90, 0x90, 0xF0]);
        assert_eq!(&ctx.mem[0x9B..0xA0], &[0xF0, 0x80, 0xF0, 0x80, 0x80]);
        assert_eq!(ctx.mem[0xA0], 0);
    }

    #[test]
    fn reset_keeps_callbacks() {
        let hits = Rc::new(Cell::new(0));
        let mut ctx = Context::new();
        let counter = hits.clone();
        ctx.set_sound_callback(Some(Box::new(move || counter.set(counter.get() + 1))));

        ctx.v[3] = 9;
        ctx.mem[0x300] = 1;
        ctx.push(0x234).unwrap();
        ctx.reset();

        assert_eq!(ctx.v[3], 0);
        assert_eq!(ctx.mem[0x300], 0);
        assert_eq!(ctx.sp, 0);
        assert_eq!(ctx.mem[0x50], 0xF0);
        ctx.notify_sound();
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn stack_bounds() {
        let mut ctx = Context::new();
        assert_eq!(ctx.pop(), Err(StackUnderflowError));
        for n in 0..STACK_SIZE {
            ctx.push(n as u16).unwrap();
        }
        assert_eq!(ctx.push(0xFFF), Err(StackOverflowError(STACK_SIZE)));
        assert_eq!(ctx.sp, STACK_SIZE);
        assert_eq!(ctx.pop(), Ok(STACK_SIZE as u16 - 1));
    }

    #[test]
    fn memory_bounds() {
        let ctx = Context::new();
        assert_eq!(ctx.read(0xFFF), Ok(0));
        assert_eq!(ctx.read(0x1000), Err(AddressOutOfBoundsError(0x1000)));
        assert!(ctx.slice(0xFFE, 2).is_ok());
        assert_eq!(ctx.slice(0xFFE, 3).err(), Some(AddressOutOfBoundsError(0x1000)));
        assert_eq!(mem_range(0x1000, 0), Ok(0x1000..0x1000));
    }
}
