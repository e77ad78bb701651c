//! The control unit: fetch and per-opcode micro-sequences.
//!
//! The unit runs a two-phase loop (fetch, execute) and accounts time in
//! ticks, one per latch/ALU micro-step grouping. Every completed
//! instruction ends by latching the program status flags from the last ALU
//! micro-operation of its sequence; HLT terminates mid-instruction and
//! skips the latch.

use crate::datapath::DataPath;
use crate::flags::PsFlags;
use accum_isa::{AluOp, Mux, OpClass, Opcode};

/// Outcome of executing one instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The instruction completed; fetch the next one.
    Continue,
    /// HLT was executed; the machine is done.
    Halt,
}

/// Drives the datapath through instructions, counting ticks.
///
/// The unit owns no machine state beyond the tick counter; it borrows the
/// datapath for the duration of each [`ControlUnit::step`].
#[derive(Debug, Default)]
pub struct ControlUnit {
    ticks: u64,
}

impl ControlUnit {
    /// A control unit with the tick counter at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ticks consumed so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    fn tick(&mut self) {
        self.ticks += 1;
    }

    /// Fetches and executes one instruction.
    ///
    /// Returns [`Step::Halt`] when the instruction was HLT; the program
    /// status flags are then left as the previous instruction latched them.
    pub fn step(&mut self, dp: &mut DataPath) -> Step {
        self.fetch(dp);
        if self.execute(dp) == Step::Halt {
            return Step::Halt;
        }
        dp.latch_flags();
        log::trace!("{}", self.snapshot(dp));
        Step::Continue
    }

    /// Instruction fetch, 2 ticks: ADDR takes PC, then PC advances while
    /// IR and DR load from the addressed cell.
    fn fetch(&mut self, dp: &mut DataPath) {
        dp.alu_execute(AluOp::NextInB, None, Some(Mux::FromPc));
        dp.latch_address();
        self.tick();

        dp.alu_execute(AluOp::IncB, None, Some(Mux::FromPc));
        dp.latch_pc();
        dp.latch_instr();
        dp.latch_dr();
        self.tick();
    }

    /// Dispatches the fetched instruction by operand class.
    fn execute(&mut self, dp: &mut DataPath) -> Step {
        let opcode = dp.ir.opcode;

        if opcode == Opcode::Nop {
            self.tick();
            return Step::Continue;
        }

        // Indirection prefix: one more memory round turns the operand into
        // the address of the datum.
        if dp.ir.is_indirect {
            dp.alu_execute(AluOp::NextInB, None, Some(Mux::FromDr));
            dp.latch_address();
            self.tick();
            dp.latch_dr();
            self.tick();
        }

        match opcode.class() {
            OpClass::Operand => self.execute_operand(dp, opcode),
            OpClass::NonOperand => return self.execute_non_operand(dp, opcode),
            OpClass::Branch => self.execute_branch(dp, opcode),
            OpClass::Nop => unreachable!("NOP dispatched before classification"),
        }
        Step::Continue
    }

    fn execute_operand(&mut self, dp: &mut DataPath, opcode: Opcode) {
        match opcode {
            Opcode::Ld => {
                dp.alu_execute(AluOp::NextInB, None, Some(Mux::FromDr));
                dp.latch_address();
                self.tick();

                dp.latch_dr();
                dp.alu_execute(AluOp::NextInB, None, Some(Mux::FromDr));
                dp.latch_acc(Mux::FromAcc);
                self.tick();
            }
            Opcode::St => {
                dp.alu_execute(AluOp::NextInB, None, Some(Mux::FromDr));
                dp.latch_address();
                self.tick();

                dp.latch_dr();
                dp.alu_execute(AluOp::NextInA, Some(Mux::FromAcc), None);
                dp.latch_mr();
                dp.latch_wr();
                self.tick();
            }
            Opcode::Add => {
                dp.alu_execute(AluOp::NextInB, None, Some(Mux::FromDr));
                dp.latch_address();
                dp.latch_dr();
                self.tick();

                dp.alu_execute(AluOp::Add, Some(Mux::FromAcc), Some(Mux::FromDr));
                dp.latch_acc(Mux::FromAcc);
                self.tick();
            }
            Opcode::Cmp => {
                dp.alu_execute(AluOp::NextInB, None, Some(Mux::FromDr));
                dp.latch_address();
                self.tick();

                dp.latch_dr();
                dp.alu_execute(AluOp::Cmp, Some(Mux::FromAcc), Some(Mux::FromDr));
                self.tick();
            }
            Opcode::And => {
                dp.alu_execute(AluOp::NextInB, None, Some(Mux::FromDr));
                dp.latch_address();
                self.tick();

                dp.latch_dr();
                dp.alu_execute(AluOp::And, Some(Mux::FromAcc), Some(Mux::FromDr));
                self.tick();
            }
            Opcode::In => {
                dp.latch_acc(Mux::FromInput);
                self.tick();
            }
            Opcode::Out => {
                dp.alu_execute(AluOp::NextInB, None, Some(Mux::FromDr));
                dp.latch_address();
                self.tick();

                // Same tick: the port write rides the data-register load.
                dp.latch_dr();
                dp.latch_output();
            }
            _ => unreachable!("{opcode} is not an operand instruction"),
        }
    }

    fn execute_non_operand(&mut self, dp: &mut DataPath, opcode: Opcode) -> Step {
        match opcode {
            Opcode::Hlt => return Step::Halt,
            Opcode::Inc => {
                dp.alu_execute(AluOp::IncA, Some(Mux::FromAcc), None);
                dp.latch_acc(Mux::FromAcc);
                self.tick();
            }
            Opcode::Dec => {
                dp.alu_execute(AluOp::DecA, Some(Mux::FromAcc), None);
                dp.latch_acc(Mux::FromAcc);
                self.tick();
            }
            Opcode::Push => {
                // The "SP-1" rides DEC_B, which passes SP through; together
                // with the stack-pointer latch this pins the stack to the
                // cell at SP.
                dp.alu_execute(AluOp::DecB, None, Some(Mux::FromSp));
                dp.latch_sp();
                dp.latch_address();
                self.tick();

                dp.alu_execute(AluOp::NextInA, Some(Mux::FromAcc), None);
                dp.latch_mr();
                dp.latch_wr();
                self.tick();
            }
            Opcode::Pop => {
                dp.alu_execute(AluOp::NextInB, None, Some(Mux::FromSp));
                dp.latch_address();
                self.tick();

                dp.alu_execute(AluOp::DecB, None, Some(Mux::FromSp));
                dp.latch_dr();
                dp.latch_sp();
                self.tick();

                dp.alu_execute(AluOp::NextInB, None, Some(Mux::FromDr));
                dp.latch_acc(Mux::FromAcc);
                self.tick();
            }
            _ => unreachable!("{opcode} is not a non-operand instruction"),
        }
        Step::Continue
    }

    /// Branches test the flags the previous instruction committed.
    fn execute_branch(&mut self, dp: &mut DataPath, opcode: Opcode) {
        let ps = dp.ps;
        let taken = match opcode {
            Opcode::Jmp => true,
            Opcode::Jz => ps.contains(PsFlags::Z),
            Opcode::Jnz => !ps.contains(PsFlags::Z),
            // Non-negative, not strictly greater; contractual.
            Opcode::Jg => !ps.contains(PsFlags::N),
            _ => unreachable!("{opcode} is not a branch"),
        };
        if taken {
            dp.alu_execute(AluOp::NextInB, None, Some(Mux::FromDr));
            dp.latch_pc();
            self.tick();
        }
    }

    /// One-line state snapshot, logged at trace level after every
    /// completed instruction.
    fn snapshot(&self, dp: &DataPath) -> String {
        format!(
            "TICK: {:4} | AC: {:7} | IR: {:4} | ADDR: {:4} | PC: {:3} | DR: {:7} | SP: {:4} | mem[ADDR]: {:7} | MR: {:3}",
            self.ticks,
            dp.acc,
            dp.ir.opcode.mnemonic(),
            dp.addr,
            dp.pc,
            dp.dr,
            dp.sp,
            dp.peek(dp.addr).value,
            dp.mr,
        )
    }
}
