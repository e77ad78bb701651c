//! The instruction cell: one addressable word of Accum memory.

use crate::opcode::Opcode;
use serde::de::Deserializer;
use serde::{Deserialize, Serialize};

/// One memory word.
///
/// Every cell is an instruction cell; data words are `NOP` cells whose
/// `value` holds the datum. Uninitialized memory holds `NOP`/`0`/direct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Address of the cell in `[0, capacity)`.
    pub index: usize,
    /// The instruction, or `NOP` for data words.
    pub opcode: Opcode,
    /// Operand, datum, or zero for non-operand instructions.
    #[serde(default, deserialize_with = "lenient_value")]
    pub value: i64,
    /// When set, the operand is the address of the address of the datum.
    #[serde(default)]
    pub is_indirect: bool,
}

impl Cell {
    /// A `NOP`/`0`/direct filler cell at the given address.
    pub const fn empty(index: usize) -> Self {
        Self {
            index,
            opcode: Opcode::Nop,
            value: 0,
            is_indirect: false,
        }
    }

    /// A data word: a `NOP` cell whose value carries the datum.
    pub const fn data(index: usize, value: i64) -> Self {
        Self {
            index,
            opcode: Opcode::Nop,
            value,
            is_indirect: false,
        }
    }
}

/// Accepts the legacy wire format where `value` may be a string.
///
/// Numeric strings decode as their integer value; any other string decodes
/// as 0 (older images filled the value slot of non-operand cells with the
/// mnemonic text, for which zero is the modern encoding).
fn lenient_value<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Text(String),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Int(value) => value,
        Raw::Text(text) => text.trim().parse().unwrap_or(0),
    })
}
