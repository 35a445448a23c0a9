/*
 * Copyright 2018 Ian Johnson
 *
 * This is free software, distributed under the MIT license.  A copy of the
 * license can be found in the LICENSE file in the project root, or at
 * https://opensource.org/licenses/MIT.
 */

//! CHIP-8 opcodes, registers and instruction mnemonics.
//!
//! Execution never goes through the `Instruction` type: the dispatcher hands
//! raw `Opcode`s straight to the family handlers.  `Instruction` exists so
//! that diagnostics (trace logs, debuggers, the headless runner) can show
//! what an opcode means without duplicating the decoding tables everywhere.

use std::fmt;

use num::FromPrimitive;

/// An error resulting from an opcode that is not a canonical CHIP-8
/// instruction.
#[derive(Debug, Fail, PartialEq, Eq)]
#[fail(display = "invalid opcode: {}", _0)]
pub struct InvalidOpcodeError(pub Opcode);

enum_from_primitive! {
/// A CHIP-8 register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    V0 = 0,
    V1,
    V2,
    V3,
    V4,
    V5,
    V6,
    V7,
    V8,
    V9,
    VA,
    VB,
    VC,
    VD,
    VE,
    VF,
}
}

impl Register {
    /// Returns the register named by the lowest four bits of the given value.
    pub fn from_nibble(n: u8) -> Register {
        Register::from_u8(n & 0xF).unwrap()
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", *self)
    }
}

/// A CHIP-8 opcode.
///
/// The accessors pull out the fixed bit fields of the encoding.  None of
/// them check whether the field is meaningful for the opcode's instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode(pub u16);

impl Opcode {
    /// Builds an opcode from its big-endian byte pair.
    pub fn from_bytes(high: u8, low: u8) -> Self {
        Opcode((high as u16) << 8 | low as u16)
    }

    /// The top nibble, selecting the instruction family.
    pub fn family(&self) -> u8 {
        (self.0 >> 12) as u8
    }

    /// The `x` register index (`_x__`).
    pub fn x(&self) -> usize {
        ((self.0 & 0x0F00) >> 8) as usize
    }

    /// The `y` register index (`__y_`).
    pub fn y(&self) -> usize {
        ((self.0 & 0x00F0) >> 4) as usize
    }

    /// The lowest nibble (`___n`).
    pub fn nibble(&self) -> u8 {
        self.0 as u8 & 0xF
    }

    /// The low byte (`__kk`).
    pub fn byte(&self) -> u8 {
        self.0 as u8
    }

    /// The 12-bit address (`_nnn`).
    pub fn addr(&self) -> u16 {
        self.0 & 0x0FFF
    }

    fn rx(&self) -> Register {
        Register::from_nibble(self.x() as u8)
    }

    fn ry(&self) -> Register {
        Register::from_nibble(self.y() as u8)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{:04X}", self.0)
    }
}

/// The right-hand side of a conditional skip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    /// Compare against another register.
    Reg(Register),
    /// Compare against an immediate byte.
    Byte(u8),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Operand::Reg(r) => write!(f, "{}", r),
            Operand::Byte(b) => write!(f, "#{:02X}", b),
        }
    }
}

/// A register-to-register operation from the `8xyn` family, keyed by `n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AluOp {
    Load,
    Or,
    And,
    Xor,
    Add,
    Sub,
    Shr,
    SubN,
    Shl,
}

impl AluOp {
    /// Returns the operation selected by the low nibble of an `8xyn` opcode.
    pub fn from_nibble(n: u8) -> Option<AluOp> {
        Some(match n {
            0x0 => AluOp::Load,
            0x1 => AluOp::Or,
            0x2 => AluOp::And,
            0x3 => AluOp::Xor,
            0x4 => AluOp::Add,
            0x5 => AluOp::Sub,
            0x6 => AluOp::Shr,
            0x7 => AluOp::SubN,
            0xE => AluOp::Shl,
            _ => return None,
        })
    }

    fn mnemonic(&self) -> &'static str {
        match *self {
            AluOp::Load => "LD",
            AluOp::Or => "OR",
            AluOp::And => "AND",
            AluOp::Xor => "XOR",
            AluOp::Add => "ADD",
            AluOp::Sub => "SUB",
            AluOp::Shr => "SHR",
            AluOp::SubN => "SUBN",
            AluOp::Shl => "SHL",
        }
    }

    /// Whether the assembly form names `Vy` at all.
    fn uses_y(&self) -> bool {
        *self != AluOp::Shr && *self != AluOp::Shl
    }
}

/// A timer, key, font, BCD or register block operation from the `Fxkk`
/// family, keyed by `kk`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MiscOp {
    ReadDelay,
    WaitKey,
    SetDelay,
    SetSound,
    AddI,
    Font,
    Bcd,
    Store,
    Restore,
}

impl MiscOp {
    /// Returns the operation selected by the low byte of an `Fxkk` opcode.
    pub fn from_byte(b: u8) -> Option<MiscOp> {
        Some(match b {
            0x07 => MiscOp::ReadDelay,
            0x0A => MiscOp::WaitKey,
            0x15 => MiscOp::SetDelay,
            0x18 => MiscOp::SetSound,
            0x1E => MiscOp::AddI,
            0x29 => MiscOp::Font,
            0x33 => MiscOp::Bcd,
            0x55 => MiscOp::Store,
            0x65 => MiscOp::Restore,
            _ => return None,
        })
    }
}

/// A decoded CHIP-8 instruction.
///
/// The variants follow the opcode families, so the grouping matches the way
/// the handlers are organized.
///
/// # Examples
///
/// ```
/// use chip8vm::{AluOp, Instruction, Opcode, Register};
///
/// let instr = Instruction::from_opcode(Opcode(0x8125)).unwrap();
/// assert_eq!(instr, Instruction::Alu(AluOp::Sub, Register::V1, Register::V2));
/// assert_eq!(instr.to_string(), "SUB V1, V2");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// `0nnn`, other than `CLS` and `RET`.
    Sys(u16),
    /// `00E0`.
    Cls,
    /// `00EE`.
    Ret,
    /// `1nnn`.
    Jump(u16),
    /// `2nnn`.
    Call(u16),
    /// `3xkk` and `5xy0`.
    SkipEq(Register, Operand),
    /// `4xkk` and `9xy0`.
    SkipNe(Register, Operand),
    /// `6xkk`.
    Load(Register, u8),
    /// `7xkk`.
    AddByte(Register, u8),
    /// `8xyn`.
    Alu(AluOp, Register, Register),
    /// `Annn`.
    LoadI(u16),
    /// `Bnnn`.
    JumpV0(u16),
    /// `Cxkk`.
    Random(Register, u8),
    /// `Dxyn`.
    Draw(Register, Register, u8),
    /// `Ex9E` when `true`, `ExA1` when `false`.
    SkipKey(Register, bool),
    /// `Fxkk`.
    Misc(MiscOp, Register),
}

impl Instruction {
    /// Returns the instruction corresponding to the given opcode, or an error
    /// if the opcode is not part of the canonical CHIP-8 instruction set.
    pub fn from_opcode(op: Opcode) -> Result<Self, InvalidOpcodeError> {
        let invalid = InvalidOpcodeError(op);
        let (x, y) = (op.rx(), op.ry());
        Ok(match op.family() {
            0x0 if op.0 == 0x00E0 => Instruction::Cls,
            0x0 if op.0 == 0x00EE => Instruction::Ret,
            0x0 => Instruction::Sys(op.addr()),
            0x1 => Instruction::Jump(op.addr()),
            0x2 => Instruction::Call(op.addr()),
            0x3 => Instruction::SkipEq(x, Operand::Byte(op.byte())),
            0x4 => Instruction::SkipNe(x, Operand::Byte(op.byte())),
            0x5 if op.nibble() == 0 => Instruction::SkipEq(x, Operand::Reg(y)),
            0x6 => Instruction::Load(x, op.byte()),
            0x7 => Instruction::AddByte(x, op.byte()),
            0x8 => Instruction::Alu(AluOp::from_nibble(op.nibble()).ok_or(invalid)?, x, y),
            0x9 if op.nibble() == 0 => Instruction::SkipNe(x, Operand::Reg(y)),
            0xA => Instruction::LoadI(op.addr()),
            0xB => Instruction::JumpV0(op.addr()),
            0xC => Instruction::Random(x, op.byte()),
            0xD => Instruction::Draw(x, y, op.nibble()),
            0xE if op.byte() == 0x9E => Instruction::SkipKey(x, true),
            0xE if op.byte() == 0xA1 => Instruction::SkipKey(x, false),
            0xF => Instruction::Misc(MiscOp::from_byte(op.byte()).ok_or(invalid)?, x),
            _ => return Err(invalid),
        })
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Instruction::Sys(a) => write!(f, "SYS #{:03X}", a),
            Instruction::Cls => f.write_str("CLS"),
            Instruction::Ret => f.write_str("RET"),
            Instruction::Jump(a) => write!(f, "JP #{:03X}", a),
            Instruction::Call(a) => write!(f, "CALL #{:03X}", a),
            Instruction::SkipEq(x, rhs) => write!(f, "SE {}, {}", x, rhs),
            Instruction::SkipNe(x, rhs) => write!(f, "SNE {}, {}", x, rhs),
            Instruction::Load(x, kk) => write!(f, "LD {}, {}", x, Operand::Byte(kk)),
            Instruction::AddByte(x, kk) => write!(f, "ADD {}, {}", x, Operand::Byte(kk)),
            Instruction::Alu(alu, x, y) if alu.uses_y() => {
                write!(f, "{} {}, {}", alu.mnemonic(), x, y)
            }
            Instruction::Alu(alu, x, _) => write!(f, "{} {}", alu.mnemonic(), x),
            Instruction::LoadI(a) => write!(f, "LD I, #{:03X}", a),
            Instruction::JumpV0(a) => write!(f, "JP V0, #{:03X}", a),
            Instruction::Random(x, kk) => write!(f, "RND {}, {}", x, Operand::Byte(kk)),
            Instruction::Draw(x, y, n) => write!(f, "DRW {}, {}, {}", x, y, n),
            Instruction::SkipKey(x, true) => write!(f, "SKP {}", x),
            Instruction::SkipKey(x, false) => write!(f, "SKNP {}", x),
            Instruction::Misc(misc, x) => match misc {
                MiscOp::ReadDelay => write!(f, "LD {}, DT", x),
                MiscOp::WaitKey => write!(f, "LD {}, K", x),
                MiscOp::SetDelay => write!(f, "LD DT, {}", x),
                MiscOp::SetSound => write!(f, "LD ST, {}", x),
                MiscOp::AddI => write!(f, "ADD I, {}", x),
                MiscOp::Font => write!(f, "LD F, {}", x),
                MiscOp::Bcd => write!(f, "LD B, {}", x),
                MiscOp::Store => write!(f, "LD [I], {}", x),
                MiscOp::Restore => write!(f, "LD {}, [I]", x),
            },
        }
    }
}
