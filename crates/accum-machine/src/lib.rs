//! Tick-accurate simulator for the Accum machine.
//!
//! The machine is an accumulator-based computer built from an explicit
//! micro-architectural datapath:
//!
//! - [`Alu`] - nine micro-operations over two input routes, raising the
//!   Z and N flag outputs
//! - [`DataPath`] - memory, registers (AC, PC, SP, ADDR, DR, IR, MR),
//!   program status flags, the input queue, and two output ports
//! - [`ControlUnit`] - decomposes each instruction into latch/ALU
//!   micro-steps, counting ticks
//! - [`simulate`] - the harness owning the instruction-budget loop
//!
//! # Example
//!
//! ```
//! use accum_isa::{Cell, Opcode};
//! use accum_machine::simulate;
//!
//! // OUT through port 1 (the numeric port), then halt.
//! let image = [
//!     Cell { index: 0, opcode: Opcode::Out, value: 2, is_indirect: false },
//!     Cell { index: 1, opcode: Opcode::Hlt, value: 0, is_indirect: false },
//!     Cell::data(2, 1),
//! ];
//! let outcome = simulate(&image, "", 16, 100)?;
//! assert_eq!(outcome.numbers, vec![0]);
//! assert_eq!(outcome.instructions, 2);
//! # Ok::<(), accum_machine::MachineError>(())
//! ```

mod alu;
mod control;
mod datapath;
mod flags;
mod simulator;

pub use alu::Alu;
pub use control::{ControlUnit, Step};
pub use datapath::DataPath;
pub use flags::PsFlags;
pub use simulator::{Outcome, simulate};

/// Errors raised while preparing a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MachineError {
    /// An image cell addresses memory the machine does not have.
    #[error("image cell at index {index} does not fit memory of {capacity} cells")]
    CellOutOfRange {
        /// The offending cell's address.
        index: usize,
        /// Configured memory size.
        capacity: usize,
    },
}
