/*
 * Copyright 2018 Ian Johnson
 *
 * This is free software, distributed under the MIT license.  A copy of the
 * license can be found in the LICENSE file in the project root, or at
 * https://opensource.org/licenses/MIT.
 */

//! A CHIP-8 virtual machine.
//!
//! The `Interpreter` type is the entry point: load a program, register the
//! draw and sound callbacks, and drive it with `run_frame` from whatever loop
//! the host uses for pacing.

#[macro_use]
extern crate enum_primitive;
extern crate failure;
#[macro_use]
extern crate failure_derive;
#[macro_use]
extern crate log;
extern crate num;
extern crate rand;

/// The size of the CHIP-8's memory, in bytes.
pub const MEM_SIZE: usize = 0x1000;
/// The address where programs should be loaded.
pub const PROG_START: usize = 0x200;
/// The maximum size of a CHIP-8 program, in bytes.
pub const PROG_SIZE: usize = MEM_SIZE - PROG_START;
/// The address of the built-in hex digit sprites.
pub const FONT_START: usize = 0x50;
/// The number of return addresses the call stack can hold.
pub const STACK_SIZE: usize = 16;

pub mod context;
pub mod dispatch;
pub mod display;
pub mod handlers;
pub mod input;
pub mod instruction;
pub mod interpreter;
pub mod timer;

pub use context::{AddressOutOfBoundsError, Context, StackOverflowError, StackUnderflowError};
pub use dispatch::{Dispatcher, Handler};
pub use display::Screen;
pub use instruction::{AluOp, Instruction, MiscOp, Opcode, Operand, Register};
pub use interpreter::{Interpreter, ProgramTooLargeError};
