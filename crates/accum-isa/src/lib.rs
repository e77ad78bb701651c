//! Shared ISA definition for the Accum machine.
//!
//! This crate is the vocabulary both halves of the system speak: the
//! assembler emits an *instruction image* (a JSON array of [`Cell`]s) and
//! the simulator loads it into memory. It contains:
//!
//! - [`Opcode`] - the closed instruction set, with its operand-class split
//! - [`AluOp`] and [`Mux`] - the micro-architecture vocabulary (ALU
//!   micro-operations and register taps into the datapath multiplexers)
//! - [`Cell`] - the unit of memory: one addressable word carrying an
//!   opcode, a value, and an indirection flag
//! - [`read_image`] / [`write_image`] - the image file format
//!
//! # Example
//!
//! ```
//! use accum_isa::{Cell, Opcode, parse_image};
//!
//! let image = parse_image(r#"[{"index": 0, "opcode": "JMP", "value": 10, "is_indirect": false}]"#)?;
//! assert_eq!(image[0].opcode, Opcode::Jmp);
//! assert_eq!(image[0].value, 10);
//! # Ok::<(), accum_isa::ImageError>(())
//! ```

mod cell;
mod image;
mod microcode;
mod opcode;

pub use cell::Cell;
pub use image::{parse_image, read_image, render_image, write_image};
pub use microcode::{AluOp, Mux};
pub use opcode::{OpClass, Opcode};

/// Errors produced while reading or writing an instruction image.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    /// The image file could not be read or written.
    #[error("image I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The image is not a well-formed JSON array of cells.
    #[error("malformed image: {0}")]
    Malformed(#[from] serde_json::Error),
}
