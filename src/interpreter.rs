/*
 * Copyright 2018 Ian Johnson
 *
 * This is free software, distributed under the MIT license.  A copy of the
 * license can be found in the LICENSE file in the project root, or at
 * https://opensource.org/licenses/MIT.
 */

//! The CHIP-8 interpreter.
//!
//! The main focus of this module is the `Interpreter` struct, which owns the
//! machine state and provides the interface used by the front-end: loading
//! programs, forwarding key presses, registering observers for the display
//! and the buzzer, and stepping execution one cycle or one frame at a time.
//! Pacing is entirely up to the caller; the interpreter never sleeps or
//! blocks.

use std::default::Default;
use std::io::Read;

use failure::{Error, ResultExt};

use context::{AddressOutOfBoundsError, Context};
use dispatch::Dispatcher;
use display::{self, Screen, HEIGHT, WIDTH};
use input::Key;
use instruction::{Instruction, InvalidOpcodeError, Opcode};
use {MEM_SIZE, PROG_SIZE, PROG_START};

/// An error resulting from an input program being too large.
#[derive(Debug, Fail, PartialEq, Eq)]
#[fail(display = "input program is too large ({} bytes, at most {} allowed)", _0, _1)]
pub struct ProgramTooLargeError(pub usize, pub usize);

/// A CHIP-8 interpreter.
///
/// Callbacks run synchronously on the thread that called `cycle` or
/// `run_frame`.  They are owned by the interpreter, so they can't reach back
/// into it; anything they need to share with the host has to go through
/// shared state such as `Rc<RefCell<_>>`.
///
/// # Examples
///
/// ```
/// use chip8vm::Interpreter;
///
/// let mut interpreter = Interpreter::new();
/// // LD V0, #2A; JP #202
/// interpreter.load_program(&[0x60, 0x2A, 0x12, 0x02]).unwrap();
/// interpreter.run_frame(10).unwrap();
/// assert_eq!(interpreter.register(0), 0x2A);
/// assert_eq!(interpreter.pc(), 0x202);
/// ```
pub struct Interpreter {
    /// The machine state.
    ctx: Context,
    /// The handler table used to execute instructions.
    dispatcher: Dispatcher,
}

impl Interpreter {
    /// Returns a new interpreter for the standard instruction set.
    pub fn new() -> Self {
        Interpreter::with_dispatcher(Dispatcher::new())
    }

    /// Returns a new interpreter using the given handler table.
    pub fn with_dispatcher(dispatcher: Dispatcher) -> Self {
        Interpreter {
            ctx: Context::new(),
            dispatcher,
        }
    }

    /// Clears all machine state and reinstalls the font.
    ///
    /// The registered callbacks are kept.
    pub fn reset(&mut self) {
        self.ctx.reset();
        debug!("interpreter reset");
    }

    /// Copies the given program into memory at `PROG_START` and points the
    /// program counter at it.
    ///
    /// Registers, timers and the display are left as they are.  A program
    /// that does not fit is rejected without touching memory.
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), Error> {
        if program.len() > PROG_SIZE {
            return Err(ProgramTooLargeError(program.len(), PROG_SIZE).into());
        }
        self.ctx.mem[PROG_START..PROG_START + program.len()].copy_from_slice(program);
        self.ctx.pc = PROG_START as u16;
        debug!("loaded {} byte program", program.len());
        Ok(())
    }

    /// Loads program data from the specified source.
    pub fn load_program_from<R: Read>(&mut self, input: &mut R) -> Result<(), Error> {
        let mut program = Vec::with_capacity(PROG_SIZE);
        input
            .read_to_end(&mut program)
            .context("could not read program data")?;
        self.load_program(&program)
    }

    /// Sets the pressed state of the key with the given index.
    ///
    /// Indices outside `0..16` are ignored.
    pub fn set_key(&mut self, index: usize, pressed: bool) {
        if let Some(key) = Key::from_index(index) {
            self.ctx.input.set(key, pressed);
        }
    }

    /// Returns a copy of the display.
    pub fn screen(&self) -> Screen {
        self.ctx.display.snapshot()
    }

    /// Returns a reference to the display buffer.
    pub fn display(&self) -> &display::Buffer {
        &self.ctx.display
    }

    /// Returns whether the display changed since the draw flag was last
    /// cleared.
    pub fn draw_flag(&self) -> bool {
        self.ctx.display.needs_refresh()
    }

    /// Clears the draw flag.
    pub fn clear_draw_flag(&mut self) {
        self.ctx.display.mark_refreshed();
    }

    /// Calls `f` with a snapshot of the display if it changed since the last
    /// refresh, then clears the draw flag.
    pub fn refresh<F, E>(&mut self, f: F) -> Result<(), E>
    where
        F: FnOnce(&Screen) -> Result<(), E>,
    {
        self.ctx.display.refresh(f)
    }

    /// Registers the observer called with `(snapshot, width, height)` after
    /// every `CLS` and `DRW`.
    pub fn set_draw_callback<F>(&mut self, f: F)
    where
        F: FnMut(Screen, usize, usize) + 'static,
    {
        self.ctx.set_draw_callback(Some(Box::new(f)));
    }

    /// Removes the draw observer.
    pub fn clear_draw_callback(&mut self) {
        self.ctx.set_draw_callback(None);
    }

    /// Registers the observer called whenever the sound timer runs out.
    pub fn set_sound_callback<F>(&mut self, f: F)
    where
        F: FnMut() + 'static,
    {
        self.ctx.set_sound_callback(Some(Box::new(f)));
    }

    /// Removes the sound observer.
    pub fn clear_sound_callback(&mut self) {
        self.ctx.set_sound_callback(None);
    }

    /// Returns the display width.
    pub fn width(&self) -> usize {
        WIDTH
    }

    /// Returns the display height.
    pub fn height(&self) -> usize {
        HEIGHT
    }

    /// Returns a reference to the internal memory.
    pub fn mem(&self) -> &[u8; MEM_SIZE] {
        &self.ctx.mem
    }

    /// Returns a mutable reference to the internal memory.
    pub fn mem_mut(&mut self) -> &mut [u8; MEM_SIZE] {
        &mut self.ctx.mem
    }

    /// Returns the value in the given register (`0x0`-`0xF`).
    pub fn register(&self, reg: usize) -> u8 {
        self.ctx.v[reg & 0xF]
    }

    /// Sets the given register (`0x0`-`0xF`) to the given value.
    pub fn set_register(&mut self, reg: usize, val: u8) {
        self.ctx.v[reg & 0xF] = val;
    }

    /// Returns the value of register `I`.
    pub fn i(&self) -> u16 {
        self.ctx.i
    }

    /// Sets the value of register `I`.
    pub fn set_i(&mut self, val: u16) {
        self.ctx.i = val;
    }

    /// Returns the value of the program counter.
    pub fn pc(&self) -> u16 {
        self.ctx.pc
    }

    /// Returns the value of the delay timer.
    pub fn dt(&self) -> u8 {
        self.ctx.dt.get()
    }

    /// Sets the value of the delay timer.
    pub fn set_dt(&mut self, val: u8) {
        self.ctx.dt.set(val);
    }

    /// Returns the value of the sound timer.
    pub fn st(&self) -> u8 {
        self.ctx.st.get()
    }

    /// Sets the value of the sound timer.
    pub fn set_st(&mut self, val: u8) {
        self.ctx.st.set(val);
    }

    /// Returns the number of active subroutine calls.
    pub fn stack_depth(&self) -> usize {
        self.ctx.sp
    }

    /// Returns the opcode at the program counter.
    pub fn current_opcode(&self) -> Result<Opcode, AddressOutOfBoundsError> {
        let pc = self.ctx.pc as usize;
        Ok(Opcode::from_bytes(self.ctx.read(pc)?, self.ctx.read(pc + 1)?))
    }

    /// Returns the instruction at the program counter.
    pub fn current_instruction(&self) -> Result<Instruction, Error> {
        let op = self.current_opcode()?;
        Ok(Instruction::from_opcode(op)?)
    }

    /// Performs a single fetch-decode-execute step and ticks both timers.
    pub fn cycle(&mut self) -> Result<(), Error> {
        let pc = self.ctx.pc;
        let op = self
            .current_opcode()
            .context("could not fetch next instruction")?;
        self.ctx.pc = pc.wrapping_add(2);

        if log_enabled!(::log::Level::Trace) {
            match Instruction::from_opcode(op) {
                Ok(instr) => trace!("{:#05X}: {} {}", pc, op, instr),
                Err(InvalidOpcodeError(_)) => trace!("{:#05X}: {} ???", pc, op),
            }
        }

        self.dispatcher
            .dispatch(op, &mut self.ctx)
            .with_context(|_| format!("error executing {} at {:#05X}", op, pc))?;

        self.ctx.dt.tick();
        if self.ctx.st.tick() {
            self.ctx.notify_sound();
        }
        Ok(())
    }

    /// Runs `cycles` cycles back to back, stopping at the first error.
    pub fn run_frame(&mut self, cycles: usize) -> Result<(), Error> {
        for _ in 0..cycles {
            self.cycle()?;
        }
        Ok(())
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter::new()
    }
}
