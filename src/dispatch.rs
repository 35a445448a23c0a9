/*
 * Copyright 2018 Ian Johnson
 *
 * This is free software, distributed under the MIT license.  A copy of the
 * license can be found in the LICENSE file in the project root, or at
 * https://opensource.org/licenses/MIT.
 */

//! Routing opcodes to their family handlers.

use std::default::Default;

use failure::Error;

use context::Context;
use handlers;
use instruction::Opcode;

/// The signature shared by every instruction handler.
pub type Handler = fn(Opcode, &mut Context) -> Result<(), Error>;

/// A table of handlers indexed by the top nibble of the opcode.
///
/// # Examples
///
/// Families can be replaced or removed:
///
/// ```
/// use chip8vm::{Context, Dispatcher, Opcode};
///
/// let mut dispatcher = Dispatcher::new();
/// dispatcher.unregister(0x6);
///
/// let mut ctx = Context::new();
/// dispatcher.dispatch(Opcode(0x6A42), &mut ctx).unwrap();
/// assert_eq!(ctx.v[0xA], 0);
/// ```
#[derive(Clone, Copy)]
pub struct Dispatcher {
    table: [Option<Handler>; 16],
}

impl Dispatcher {
    /// Returns a dispatcher with the whole CHIP-8 instruction set installed.
    pub fn new() -> Self {
        let mut dispatcher = Dispatcher::empty();
        dispatcher.register(0x0, handlers::system);
        dispatcher.register(0x1, handlers::jump);
        dispatcher.register(0x2, handlers::call);
        dispatcher.register(0x3, handlers::skip_eq_byte);
        dispatcher.register(0x4, handlers::skip_ne_byte);
        dispatcher.register(0x5, handlers::skip_eq_reg);
        dispatcher.register(0x6, handlers::load_byte);
        dispatcher.register(0x7, handlers::add_byte);
        dispatcher.register(0x8, handlers::alu);
        dispatcher.register(0x9, handlers::skip_ne_reg);
        dispatcher.register(0xA, handlers::load_i);
        dispatcher.register(0xB, handlers::jump_v0);
        dispatcher.register(0xC, handlers::random);
        dispatcher.register(0xD, handlers::draw);
        dispatcher.register(0xE, handlers::skip_key);
        dispatcher.register(0xF, handlers::misc);
        dispatcher
    }

    /// Returns a dispatcher with no handlers at all.
    pub fn empty() -> Self {
        Dispatcher { table: [None; 16] }
    }

    /// Installs the handler for the given family (only the low four bits of
    /// `family` are used), replacing any existing one.
    pub fn register(&mut self, family: u8, handler: Handler) {
        self.table[(family & 0xF) as usize] = Some(handler);
    }

    /// Removes the handler for the given family.
    pub fn unregister(&mut self, family: u8) {
        self.table[(family & 0xF) as usize] = None;
    }

    /// Returns whether a handler is installed for the given family.
    pub fn handles(&self, family: u8) -> bool {
        self.table[(family & 0xF) as usize].is_some()
    }

    /// Executes a single opcode against the given context.
    ///
    /// Opcodes from a family without a handler are logged and skipped.
    pub fn dispatch(&self, op: Opcode, ctx: &mut Context) -> Result<(), Error> {
        match self.table[op.family() as usize] {
            Some(handler) => handler(op, ctx),
            None => {
                handlers::unimplemented(op);
                Ok(())
            }
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Dispatcher::new()
    }
}
