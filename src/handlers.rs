/*
 * Copyright 2018 Ian Johnson
 *
 * This is free software, distributed under the MIT license.  A copy of the
 * license can be found in the LICENSE file in the project root, or at
 * https://opensource.org/licenses/MIT.
 */

//! The instruction handlers, one per opcode family.
//!
//! Every handler has the `Handler` signature and runs after the program
//! counter has already been advanced past the instruction, so a skip is just
//! one more `+ 2` and a jump simply overwrites `pc`.  Families `0`, `8`, `E`
//! and `F` pick the actual instruction from the low bits themselves.
//!
//! Opcodes that are not part of the canonical instruction set are reported
//! with `unimplemented` and otherwise ignored.

use failure::Error;
use rand;

use context::{mem_range, Context};
use display::HEX_HEIGHT;
use input::Key;
use instruction::{AluOp, MiscOp, Opcode};
use FONT_START;

/// Reports an opcode that no handler implements.  Execution carries on as if
/// it were a no-op.
pub fn unimplemented(op: Opcode) {
    warn!("unimplemented opcode {}", op);
}

/// `CLS` (`00E0`), `RET` (`00EE`) and `SYS addr` (`0nnn`).
pub fn system(op: Opcode, ctx: &mut Context) -> Result<(), Error> {
    match op.0 {
        0x00E0 => {
            ctx.display.clear();
            ctx.notify_draw();
        }
        0x00EE => ctx.pc = ctx.pop()?,
        _ => debug!("ignoring SYS #{:03X}", op.addr()),
    }
    Ok(())
}

/// `JP addr` (`1nnn`).
pub fn jump(op: Opcode, ctx: &mut Context) -> Result<(), Error> {
    ctx.pc = op.addr();
    Ok(())
}

/// `CALL addr` (`2nnn`).
pub fn call(op: Opcode, ctx: &mut Context) -> Result<(), Error> {
    let ret = ctx.pc;
    ctx.push(ret)?;
    ctx.pc = op.addr();
    Ok(())
}

/// `SE Vx, byte` (`3xkk`).
pub fn skip_eq_byte(op: Opcode, ctx: &mut Context) -> Result<(), Error> {
    if ctx.v[op.x()] == op.byte() {
        ctx.skip();
    }
    Ok(())
}

/// `SNE Vx, byte` (`4xkk`).
pub fn skip_ne_byte(op: Opcode, ctx: &mut Context) -> Result<(), Error> {
    if ctx.v[op.x()] != op.byte() {
        ctx.skip();
    }
    Ok(())
}

/// `SE Vx, Vy` (`5xy0`).
pub fn skip_eq_reg(op: Opcode, ctx: &mut Context) -> Result<(), Error> {
    if op.nibble() != 0 {
        unimplemented(op);
    } else if ctx.v[op.x()] == ctx.v[op.y()] {
        ctx.skip();
    }
    Ok(())
}

/// `LD Vx, byte` (`6xkk`).
pub fn load_byte(op: Opcode, ctx: &mut Context) -> Result<(), Error> {
    ctx.v[op.x()] = op.byte();
    Ok(())
}

/// `ADD Vx, byte` (`7xkk`).  Leaves `VF` alone.
pub fn add_byte(op: Opcode, ctx: &mut Context) -> Result<(), Error> {
    let x = op.x();
    ctx.v[x] = ctx.v[x].wrapping_add(op.byte());
    Ok(())
}

/// The register-to-register ALU instructions (`8xyn`).
///
/// The flag is written before the result, so when `VF` is also the
/// destination it ends up holding the result.
pub fn alu(op: Opcode, ctx: &mut Context) -> Result<(), Error> {
    let x = op.x();
    let vx = ctx.v[x];
    let vy = ctx.v[op.y()];

    let alu = match AluOp::from_nibble(op.nibble()) {
        Some(alu) => alu,
        None => {
            unimplemented(op);
            return Ok(());
        }
    };
    let (result, flag) = match alu {
        AluOp::Load => (vy, None),
        AluOp::Or => (vx | vy, None),
        AluOp::And => (vx & vy, None),
        AluOp::Xor => (vx ^ vy, None),
        AluOp::Add => {
            let (sum, carry) = vx.overflowing_add(vy);
            (sum, Some(carry as u8))
        }
        AluOp::Sub => (vx.wrapping_sub(vy), Some((vx >= vy) as u8)),
        AluOp::Shr => (vx >> 1, Some(vx & 1)),
        AluOp::SubN => (vy.wrapping_sub(vx), Some((vy >= vx) as u8)),
        AluOp::Shl => (vx << 1, Some(vx >> 7)),
    };

    if let Some(flag) = flag {
        ctx.v[0xF] = flag;
    }
    ctx.v[x] = result;
    Ok(())
}

/// `SNE Vx, Vy` (`9xy0`).
pub fn skip_ne_reg(op: Opcode, ctx: &mut Context) -> Result<(), Error> {
    if op.nibble() != 0 {
        unimplemented(op);
    } else if ctx.v[op.x()] != ctx.v[op.y()] {
        ctx.skip();
    }
    Ok(())
}

/// `LD I, addr` (`Annn`).
pub fn load_i(op: Opcode, ctx: &mut Context) -> Result<(), Error> {
    ctx.i = op.addr();
    Ok(())
}

/// `JP V0, addr` (`Bnnn`).
pub fn jump_v0(op: Opcode, ctx: &mut Context) -> Result<(), Error> {
    ctx.pc = op.addr() + ctx.v[0] as u16;
    Ok(())
}

/// `RND Vx, byte` (`Cxkk`).
pub fn random(op: Opcode, ctx: &mut Context) -> Result<(), Error> {
    ctx.v[op.x()] = rand::random::<u8>() & op.byte();
    Ok(())
}

/// `DRW Vx, Vy, nibble` (`Dxyn`).
///
/// The sprite rows are read from `[I]`; the whole sprite must lie inside
/// memory or nothing is drawn.
pub fn draw(op: Opcode, ctx: &mut Context) -> Result<(), Error> {
    let x = ctx.v[op.x()] as usize;
    let y = ctx.v[op.y()] as usize;
    let rows = mem_range(ctx.i as usize, op.nibble() as usize)?;

    let collision = ctx.display.draw_sprite(&ctx.mem[rows], x, y);
    ctx.v[0xF] = collision as u8;
    ctx.notify_draw();
    Ok(())
}

/// `SKP Vx` (`Ex9E`) and `SKNP Vx` (`ExA1`).
pub fn skip_key(op: Opcode, ctx: &mut Context) -> Result<(), Error> {
    let pressed = ctx.input.is_pressed(Key::from_byte(ctx.v[op.x()]));
    match op.byte() {
        0x9E => if pressed {
            ctx.skip()
        },
        0xA1 => if !pressed {
            ctx.skip()
        },
        _ => unimplemented(op),
    }
    Ok(())
}

/// The timer, keypad and memory instructions (`Fxkk`).
pub fn misc(op: Opcode, ctx: &mut Context) -> Result<(), Error> {
    let x = op.x();

    let misc = match MiscOp::from_byte(op.byte()) {
        Some(misc) => misc,
        None => {
            unimplemented(op);
            return Ok(());
        }
    };
    match misc {
        MiscOp::ReadDelay => ctx.v[x] = ctx.dt.get(),
        // Waiting for a key re-runs this instruction until one is down.
        MiscOp::WaitKey => match ctx.input.lowest_pressed() {
            Some(key) => ctx.v[x] = key as u8,
            None => ctx.pc = ctx.pc.wrapping_sub(2),
        },
        MiscOp::SetDelay => ctx.dt.set(ctx.v[x]),
        MiscOp::SetSound => ctx.st.set(ctx.v[x]),
        MiscOp::AddI => ctx.i = ctx.i.wrapping_add(ctx.v[x] as u16) & 0x0FFF,
        MiscOp::Font => ctx.i = (FONT_START + HEX_HEIGHT * (ctx.v[x] & 0xF) as usize) as u16,
        MiscOp::Bcd => {
            let val = ctx.v[x];
            let start = ctx.i as usize;
            let digits = ctx.slice_mut(start, 3)?;
            digits[0] = val / 100;
            digits[1] = val % 100 / 10;
            digits[2] = val % 10;
        }
        MiscOp::Store => {
            let range = mem_range(ctx.i as usize, x + 1)?;
            ctx.mem[range].copy_from_slice(&ctx.v[..x + 1]);
        }
        MiscOp::Restore => {
            let range = mem_range(ctx.i as usize, x + 1)?;
            ctx.v[..x + 1].copy_from_slice(&ctx.mem[range]);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::RefCell;
    use std::rc::Rc;

    use context::{AddressOutOfBoundsError, StackOverflowError, StackUnderflowError};
    use display::{Screen, HEIGHT, WIDTH};
    use PROG_START;

    /// Tests `ADD Vx, Vy` against every interesting carry boundary.
    #[test]
    fn alu_add() {
        // Test cases, in the format (x, y, a, b).
        let cases = [
            (0x0, 0x1, 24u8, 67u8),
            (0x5, 0xD, 54u8, 102u8),
            (0x7, 0xE, 255u8, 255u8),
            (0x2, 0x4, 1u8, 255u8),
            (0x5, 0x6, 0u8, 78u8),
            (0x3, 0x9, 128u8, 127u8),
        ];
        let mut ctx = Context::new();

        for &(x, y, a, b) in cases.iter() {
            let case = (x, y, a, b);
            ctx.v[x] = a;
            ctx.v[y] = b;
            alu(Opcode(0x8004 | (x as u16) << 8 | (y as u16) << 4), &mut ctx).unwrap();
            assert_eq!(ctx.v[x], a.wrapping_add(b), "case {:?}", case);
            let carry = a as u32 + b as u32 > 255;
            assert_eq!(ctx.v[0xF], carry as u8, "case {:?}", case);
        }
    }

    /// Tests the `SUB` and `SUBN` operations.
    #[test]
    fn alu_sub() {
        // Test cases, in the format (x, y, a, b).
        let cases = [
            (0x9, 0x8, 70u8, 35u8),
            (0x6, 0x2, 56u8, 2u8),
            (0x0, 0x1, 0u8, 0u8),
            (0xE, 0xA, 255u8, 255u8),
            (0x3, 0x7, 1u8, 255u8),
        ];
        let mut ctx = Context::new();

        for &(x, y, a, b) in cases.iter() {
            let case = (x, y, a, b);
            let regs = (x as u16) << 8 | (y as u16) << 4;

            ctx.v[x] = a;
            ctx.v[y] = b;
            alu(Opcode(0x8005 | regs), &mut ctx).unwrap();
            assert_eq!(ctx.v[x], a.wrapping_sub(b), "case {:?}", case);
            assert_eq!(ctx.v[0xF], (a >= b) as u8, "case {:?}", case);

            ctx.v[x] = a;
            ctx.v[y] = b;
            alu(Opcode(0x8007 | regs), &mut ctx).unwrap();
            assert_eq!(ctx.v[x], b.wrapping_sub(a), "case {:?}", case);
            assert_eq!(ctx.v[0xF], (b >= a) as u8, "case {:?}", case);
        }
    }

    #[test]
    fn alu_shifts() {
        // Test cases, in the format (value, shr, shr flag, shl, shl flag).
        let cases = [
            (0b1000_0001u8, 0b0100_0000u8, 1u8, 0b0000_0010u8, 1u8),
            (0b0111_1110, 0b0011_1111, 0, 0b1111_1100, 0),
            (0xFF, 0x7F, 1, 0xFE, 1),
            (0x00, 0x00, 0, 0x00, 0),
        ];
        let mut ctx = Context::new();

        for &(val, shr, shr_flag, shl, shl_flag) in cases.iter() {
            ctx.v[0x4] = val;
            // Vy is ignored.
            ctx.v[0x5] = 0x55;
            alu(Opcode(0x8456), &mut ctx).unwrap();
            assert_eq!((ctx.v[0x4], ctx.v[0xF]), (shr, shr_flag), "SHR {:#X}", val);

            ctx.v[0x4] = val;
            alu(Opcode(0x845E), &mut ctx).unwrap();
            assert_eq!((ctx.v[0x4], ctx.v[0xF]), (shl, shl_flag), "SHL {:#X}", val);
        }
    }

    #[test]
    fn alu_bitwise_and_load() {
        let mut ctx = Context::new();
        ctx.v[0xF] = 0x42;
        for &(n, expected) in [(0x0, 0x0F), (0x1, 0xFF), (0x2, 0x00), (0x3, 0xFF)].iter() {
            ctx.v[0x1] = 0xF0;
            ctx.v[0x2] = 0x0F;
            alu(Opcode(0x8120 | n), &mut ctx).unwrap();
            assert_eq!(ctx.v[0x1], expected, "8xy{:X}", n);
        }
        // Logical operations leave the flag alone.
        assert_eq!(ctx.v[0xF], 0x42);
    }

    #[test]
    fn alu_result_wins_over_flag_in_vf() {
        // Test cases, in the format (opcode, VF, V1, expected VF).
        let cases = [
            (0x8F14, 200u8, 100u8, 44u8),
            (0x8F15, 5u8, 9u8, 252u8),
            (0x8F06, 0x81u8, 0u8, 0x40u8),
            (0x8F0E, 0x81u8, 0u8, 0x02u8),
            (0x8F17, 9u8, 5u8, 252u8),
        ];

        for &(op, vf, v1, expected) in cases.iter() {
            let mut ctx = Context::new();
            ctx.v[0xF] = vf;
            ctx.v[0x1] = v1;
            alu(Opcode(op), &mut ctx).unwrap();
            assert_eq!(ctx.v[0xF], expected, "opcode {:04X}", op);
        }
    }

    #[test]
    fn alu_unknown_is_noop() {
        let mut ctx = Context::new();
        ctx.v[0x1] = 7;
        ctx.v[0x2] = 9;
        alu(Opcode(0x8128), &mut ctx).unwrap();
        assert_eq!((ctx.v[0x1], ctx.v[0x2], ctx.v[0xF]), (7, 9, 0));
    }

    #[test]
    fn add_byte_wraps_without_flag() {
        let mut ctx = Context::new();
        ctx.v[0x3] = 0xF0;
        add_byte(Opcode(0x7320), &mut ctx).unwrap();
        assert_eq!(ctx.v[0x3], 0x10);
        assert_eq!(ctx.v[0xF], 0);
    }

    #[test]
    fn skips() {
        let mut ctx = Context::new();
        let base = ctx.pc;
        ctx.v[0x1] = 0x11;
        ctx.v[0x2] = 0x11;

        // Test cases, in the format (handler, opcode, skipped).
        let cases: [(fn(Opcode, &mut Context) -> Result<(), Error>, u16, bool); 8] = [
            (skip_eq_byte, 0x3111, true),
            (skip_eq_byte, 0x3112, false),
            (skip_ne_byte, 0x4112, true),
            (skip_ne_byte, 0x4111, false),
            (skip_eq_reg, 0x5120, true),
            (skip_eq_reg, 0x5130, false),
            (skip_ne_reg, 0x9130, true),
            (skip_ne_reg, 0x9120, false),
        ];

        for &(handler, op, skipped) in cases.iter() {
            ctx.pc = base;
            handler(Opcode(op), &mut ctx).unwrap();
            let expected = if skipped { base + 2 } else { base };
            assert_eq!(ctx.pc, expected, "opcode {:04X}", op);
        }
    }

    #[test]
    fn jumps_and_calls() {
        let mut ctx = Context::new();
        ctx.pc = 0x202;
        call(Opcode(0x2400), &mut ctx).unwrap();
        assert_eq!((ctx.pc, ctx.sp, ctx.stack[0]), (0x400, 1, 0x202));

        system(Opcode(0x00EE), &mut ctx).unwrap();
        assert_eq!((ctx.pc, ctx.sp), (0x202, 0));

        jump(Opcode(0x1ABC), &mut ctx).unwrap();
        assert_eq!(ctx.pc, 0xABC);

        ctx.v[0] = 0x10;
        jump_v0(Opcode(0xB300), &mut ctx).unwrap();
        assert_eq!(ctx.pc, 0x310);
    }

    #[test]
    fn stack_guards() {
        let mut ctx = Context::new();
        let err = system(Opcode(0x00EE), &mut ctx).unwrap_err();
        assert_eq!(err.downcast_ref::<StackUnderflowError>(), Some(&StackUnderflowError));

        for _ in 0..16 {
            call(Opcode(0x2300), &mut ctx).unwrap();
        }
        ctx.pc = 0x250;
        let err = call(Opcode(0x2300), &mut ctx).unwrap_err();
        assert_eq!(err.downcast_ref::<StackOverflowError>(), Some(&StackOverflowError(16)));
        assert_eq!(ctx.pc, 0x250);
        assert_eq!(ctx.sp, 16);
    }

    #[test]
    fn sys_is_ignored() {
        let mut ctx = Context::new();
        ctx.display.draw_sprite(&[0xFF], 0, 0);
        system(Opcode(0x0123), &mut ctx).unwrap();
        assert_eq!(ctx.pc, PROG_START as u16);
        assert_eq!(ctx.display.pixel(0, 0), 1);
    }

    #[test]
    fn clear_notifies_once() {
        let frames: Rc<RefCell<Vec<(Screen, usize, usize)>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = frames.clone();
        let mut ctx = Context::new();
        ctx.set_draw_callback(Some(Box::new(move |screen: Screen, w: usize, h: usize| {
            sink.borrow_mut().push((screen, w, h))
        })));
        ctx.display.draw_sprite(&[0xFF], 10, 10);
        ctx.display.mark_refreshed();

        system(Opcode(0x00E0), &mut ctx).unwrap();
        assert!(ctx.display.needs_refresh());
        let frames = frames.borrow();
        assert_eq!(frames.len(), 1);
        assert!(frames[0].0.iter().all(|&px| px == 0));
        assert_eq!((frames[0].1, frames[0].2), (WIDTH, HEIGHT));
    }

    #[test]
    fn draw_twice_restores() {
        let mut ctx = Context::new();
        ctx.i = 0x300;
        ctx.mem[0x300..0x303].copy_from_slice(&[0x81, 0x81, 0xFF]);
        ctx.v[0x0] = 10;
        ctx.v[0x1] = 10;

        draw(Opcode(0xD013), &mut ctx).unwrap();
        assert_eq!(ctx.v[0xF], 0);
        assert_eq!(ctx.display.pixel(10, 10), 1);
        assert_eq!(ctx.display.pixel(11, 10), 0);
        assert_eq!(ctx.display.pixel(17, 12), 1);

        draw(Opcode(0xD013), &mut ctx).unwrap();
        assert_eq!(ctx.v[0xF], 1);
        assert!(ctx.display.snapshot().iter().all(|&px| px == 0));
    }

    #[test]
    fn draw_collision_only_where_overlapping() {
        let mut ctx = Context::new();
        ctx.i = 0x300;
        ctx.mem[0x300] = 0xF0;
        ctx.v[0x0] = 0;
        ctx.v[0x1] = 0;
        draw(Opcode(0xD011), &mut ctx).unwrap();

        // Four columns to the right: no overlap.
        ctx.v[0x0] = 4;
        draw(Opcode(0xD011), &mut ctx).unwrap();
        assert_eq!(ctx.v[0xF], 0);

        // Shifted by two: overlaps columns 2..=5.
        ctx.v[0x0] = 2;
        draw(Opcode(0xD011), &mut ctx).unwrap();
        assert_eq!(ctx.v[0xF], 1);
    }

    #[test]
    fn draw_wraps_right_edge() {
        let mut ctx = Context::new();
        ctx.i = 0x300;
        ctx.mem[0x300] = 0xFF;
        ctx.v[0x2] = 60;
        ctx.v[0x3] = 5;
        draw(Opcode(0xD231), &mut ctx).unwrap();

        for x in 0..WIDTH {
            let lit = x >= 60 || x < 4;
            assert_eq!(ctx.display.pixel(x, 5), lit as u8, "x = {}", x);
        }
    }

    #[test]
    fn draw_past_memory_end_fails_cleanly() {
        let mut ctx = Context::new();
        ctx.i = 0xFFE;
        ctx.v[0xF] = 7;
        let err = draw(Opcode(0xD013), &mut ctx).unwrap_err();
        assert_eq!(
            err.downcast_ref::<AddressOutOfBoundsError>(),
            Some(&AddressOutOfBoundsError(0x1000))
        );
        assert_eq!(ctx.v[0xF], 7);
        assert!(!ctx.display.needs_refresh());
    }

    #[test]
    fn key_skips() {
        let mut ctx = Context::new();
        ctx.v[0x4] = 0xB;
        ctx.input.press(Key::KB);

        let base = ctx.pc;
        skip_key(Opcode(0xE49E), &mut ctx).unwrap();
        assert_eq!(ctx.pc, base + 2);
        skip_key(Opcode(0xE4A1), &mut ctx).unwrap();
        assert_eq!(ctx.pc, base + 2);

        ctx.input.release(Key::KB);
        skip_key(Opcode(0xE49E), &mut ctx).unwrap();
        assert_eq!(ctx.pc, base + 2);
        skip_key(Opcode(0xE4A1), &mut ctx).unwrap();
        assert_eq!(ctx.pc, base + 4);
    }

    #[test]
    fn wait_for_key() {
        let mut ctx = Context::new();
        ctx.pc = 0x202;
        misc(Opcode(0xF30A), &mut ctx).unwrap();
        assert_eq!(ctx.pc, 0x200);

        ctx.pc = 0x202;
        ctx.input.press(Key::K9);
        ctx.input.press(Key::K5);
        misc(Opcode(0xF30A), &mut ctx).unwrap();
        assert_eq!(ctx.pc, 0x202);
        assert_eq!(ctx.v[0x3], 5);
    }

    #[test]
    fn timers_load_and_read() {
        let mut ctx = Context::new();
        ctx.v[0x1] = 42;
        misc(Opcode(0xF115), &mut ctx).unwrap();
        misc(Opcode(0xF118), &mut ctx).unwrap();
        assert_eq!((ctx.dt.get(), ctx.st.get()), (42, 42));

        ctx.dt.set(17);
        misc(Opcode(0xF207), &mut ctx).unwrap();
        assert_eq!(ctx.v[0x2], 17);
    }

    #[test]
    fn add_i_wraps_at_12_bits() {
        let mut ctx = Context::new();
        ctx.i = 0xFF0;
        ctx.v[0x2] = 0x20;
        misc(Opcode(0xF21E), &mut ctx).unwrap();
        assert_eq!(ctx.i, 0x010);
        assert_eq!(ctx.v[0xF], 0);
    }

    #[test]
    fn font_addresses() {
        let mut ctx = Context::new();
        for digit in 0..16u8 {
            ctx.v[0x7] = digit;
            misc(Opcode(0xF729), &mut ctx).unwrap();
            assert_eq!(ctx.i, 0x50 + digit as u16 * 5);
        }

        // Only the low nibble picks the glyph.
        ctx.v[0x7] = 0x3C;
        misc(Opcode(0xF729), &mut ctx).unwrap();
        assert_eq!(ctx.i, 0x50 + 0xC * 5);
    }

    /// Tests the `LD B, Vx` operation.
    #[test]
    fn bcd() {
        // Test cases, in the format (value, hundreds, tens, ones).
        let cases = [
            (234u8, 2u8, 3u8, 4u8),
            (7, 0, 0, 7),
            (100, 1, 0, 0),
            (255, 2, 5, 5),
            (0, 0, 0, 0),
            (64, 0, 6, 4),
        ];
        let mut ctx = Context::new();
        ctx.i = 0x400;

        for &(val, h, t, o) in cases.iter() {
            ctx.v[0x5] = val;
            misc(Opcode(0xF533), &mut ctx).unwrap();
            assert_eq!(&ctx.mem[0x400..0x403], &[h, t, o], "value {}", val);
        }
        assert_eq!(ctx.i, 0x400);
    }

    #[test]
    fn bcd_out_of_bounds() {
        let mut ctx = Context::new();
        ctx.i = 0xFFE;
        ctx.v[0x0] = 123;
        assert!(misc(Opcode(0xF033), &mut ctx).is_err());
        assert_eq!(&ctx.mem[0xFFE..], &[0, 0]);
    }

    #[test]
    fn register_block_copies() {
        let mut ctx = Context::new();
        ctx.i = 0x500;
        for r in 0..16 {
            ctx.v[r] = r as u8 + 1;
        }

        misc(Opcode(0xF355), &mut ctx).unwrap();
        assert_eq!(&ctx.mem[0x500..0x505], &[1, 2, 3, 4, 0]);
        assert_eq!(ctx.i, 0x500);

        ctx.mem[0x500..0x510].copy_from_slice(&[0xA0; 16]);
        misc(Opcode(0xF165), &mut ctx).unwrap();
        assert_eq!(&ctx.v[..3], &[0xA0, 0xA0, 3]);
    }

    #[test]
    fn register_block_copy_out_of_bounds() {
        let mut ctx = Context::new();
        ctx.i = 0xFFF;
        ctx.v[0x0] = 1;
        ctx.v[0x1] = 2;
        assert!(misc(Opcode(0xF155), &mut ctx).is_err());
        assert_eq!(ctx.mem[0xFFF], 0);
        assert!(misc(Opcode(0xF055), &mut ctx).is_ok());
        assert_eq!(ctx.mem[0xFFF], 1);
    }

    #[test]
    fn random_respects_mask() {
        let mut ctx = Context::new();
        for _ in 0..64 {
            random(Opcode(0xC00F), &mut ctx).unwrap();
            assert_eq!(ctx.v[0x0] & 0xF0, 0);
        }
        ctx.v[0x1] = 0xFF;
        random(Opcode(0xC100), &mut ctx).unwrap();
        assert_eq!(ctx.v[0x1], 0);
    }
}
