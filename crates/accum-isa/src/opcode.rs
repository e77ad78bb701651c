//! The instruction set of the Accum machine.
//!
//! Seventeen opcodes over an accumulator architecture. Every opcode belongs
//! to exactly one operand class, which is what the control unit dispatches
//! on; the class is derived from the opcode rather than kept as a separate
//! table.

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operand class of an opcode.
///
/// `IN` takes no operand semantically but is classed with the
/// operand-bearing instructions so decoding stays uniform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpClass {
    /// Instructions whose cell value is (or addresses) an operand.
    Operand,
    /// Instructions that operate on machine state alone.
    NonOperand,
    /// Conditional and unconditional jumps.
    Branch,
    /// The no-operation filler every uninitialized cell holds.
    Nop,
}

/// One instruction of the Accum ISA.
///
/// Serialized as the upper-case mnemonic string. Deserialization is lenient:
/// a string that names no known instruction decodes as [`Opcode::Nop`],
/// mirroring the assembler's unknown-mnemonic demotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Opcode {
    /// Load: AC ← mem[operand].
    Ld,
    /// Store: mem[operand] ← AC.
    St,
    /// Add: AC ← AC + mem[operand].
    Add,
    /// Compare: flags from AC − mem[operand]; AC unchanged.
    Cmp,
    /// Bitwise conjunction: flags from AC & mem[operand]; AC unchanged.
    And,
    /// Increment the accumulator.
    Inc,
    /// Decrement the accumulator.
    Dec,
    /// Push the accumulator onto the stack.
    Push,
    /// Pop the top of the stack into the accumulator.
    Pop,
    /// Read one character from the input stream into AC.
    In,
    /// Write AC to the output port selected by the operand cell.
    Out,
    /// Unconditional jump.
    Jmp,
    /// Jump if the zero flag is set.
    Jz,
    /// Jump if the zero flag is clear.
    Jnz,
    /// Jump if the negative flag is clear.
    Jg,
    /// Halt the machine.
    Hlt,
    /// No operation.
    #[default]
    Nop,
}

impl Opcode {
    /// The operand class this opcode belongs to.
    pub const fn class(self) -> OpClass {
        match self {
            Self::Ld | Self::St | Self::Add | Self::Cmp | Self::And | Self::In | Self::Out => {
                OpClass::Operand
            }
            Self::Inc | Self::Dec | Self::Push | Self::Pop | Self::Hlt => OpClass::NonOperand,
            Self::Jmp | Self::Jz | Self::Jnz | Self::Jg => OpClass::Branch,
            Self::Nop => OpClass::Nop,
        }
    }

    /// Upper-case mnemonic, as written into image files.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Ld => "LD",
            Self::St => "ST",
            Self::Add => "ADD",
            Self::Cmp => "CMP",
            Self::And => "AND",
            Self::Inc => "INC",
            Self::Dec => "DEC",
            Self::Push => "PUSH",
            Self::Pop => "POP",
            Self::In => "IN",
            Self::Out => "OUT",
            Self::Jmp => "JMP",
            Self::Jz => "JZ",
            Self::Jnz => "JNZ",
            Self::Jg => "JG",
            Self::Hlt => "HLT",
            Self::Nop => "NOP",
        }
    }

    /// Looks up a mnemonic, case-insensitively.
    ///
    /// Returns `None` for text that names no instruction; callers decide
    /// whether that demotes to [`Opcode::Nop`] (both the assembler and the
    /// image reader do).
    pub fn lookup(mnemonic: &str) -> Option<Self> {
        const ALL: [Opcode; 17] = [
            Opcode::Ld,
            Opcode::St,
            Opcode::Add,
            Opcode::Cmp,
            Opcode::And,
            Opcode::Inc,
            Opcode::Dec,
            Opcode::Push,
            Opcode::Pop,
            Opcode::In,
            Opcode::Out,
            Opcode::Jmp,
            Opcode::Jz,
            Opcode::Jnz,
            Opcode::Jg,
            Opcode::Hlt,
            Opcode::Nop,
        ];
        ALL.into_iter()
            .find(|op| op.mnemonic().eq_ignore_ascii_case(mnemonic))
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

impl Serialize for Opcode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.mnemonic())
    }
}

impl<'de> Deserialize<'de> for Opcode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Ok(Self::lookup(&text).unwrap_or(Self::Nop))
    }
}
