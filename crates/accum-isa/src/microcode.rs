//! Micro-architecture vocabulary: ALU micro-operations and mux taps.

/// ALU micro-operations.
///
/// The `_A`/`_B` suffix names the input route the operation consumes.
/// Two quirks of the reference datapath are part of the contract:
///
/// - [`AluOp::DecB`] does not decrement; it passes route B through.
/// - [`AluOp::Cmp`] and [`AluOp::And`] drive the flag outputs from a shadow
///   buffer and leave the published result untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AluOp {
    /// result ← A + 1.
    IncA,
    /// result ← B + 1.
    IncB,
    /// result ← A − 1.
    DecA,
    /// result ← B (pass-through; the decrement was never wired up).
    DecB,
    /// result ← A + B.
    Add,
    /// flags from A − B; result unchanged.
    Cmp,
    /// flags from A & B; result unchanged.
    And,
    /// result ← A.
    NextInA,
    /// result ← B.
    NextInB,
}

/// Register taps selectable by the datapath multiplexers.
///
/// Admission is per mux: the left ALU input admits [`Mux::FromAcc`] and
/// [`Mux::FromPs`], the right ALU input admits [`Mux::FromDr`],
/// [`Mux::FromPc`] and [`Mux::FromSp`], and the accumulator latch admits
/// [`Mux::FromAcc`] (meaning the ALU result) and [`Mux::FromInput`].
/// Selecting a tap a mux does not admit is a programming error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mux {
    /// The accumulator (left input), or the ALU result (accumulator latch).
    FromAcc,
    /// The data register.
    FromDr,
    /// The ALU result. Part of the vocabulary; wired to no mux input.
    FromAlu,
    /// The program counter.
    FromPc,
    /// The stack pointer.
    FromSp,
    /// The head of the input character queue.
    FromInput,
    /// The program status flags, encoded as the decimal literal `N·10 + Z`.
    FromPs,
}
