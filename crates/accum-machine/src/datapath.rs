//! The datapath: memory, registers, flags, I/O buffers, and the latch
//! primitives the control unit drives.
//!
//! Latches themselves take zero ticks; the control unit accounts time.
//! Memory addressing reduces into `[0, capacity)` by euclidean remainder,
//! so the small negative addresses the quirky stack sequences can produce
//! wrap from the top of memory.

use crate::alu::Alu;
use crate::flags::PsFlags;
use crate::MachineError;
use accum_isa::{AluOp, Cell, Mux};
use std::collections::VecDeque;

/// Registers, memory, and I/O state of the machine.
#[derive(Debug)]
pub struct DataPath {
    alu: Alu,
    capacity: usize,
    mem: Vec<Cell>,
    /// Accumulator.
    pub acc: i64,
    /// Next instruction address; reduced modulo capacity on every write.
    pub pc: i64,
    /// Stack pointer.
    pub sp: i64,
    /// Address register.
    pub addr: i64,
    /// Data register, loaded from `mem[ADDR].value`.
    pub dr: i64,
    /// Memory-write buffer.
    pub mr: i64,
    /// Instruction register, loaded as a whole cell.
    pub ir: Cell,
    /// Program status flags.
    pub ps: PsFlags,
    input: VecDeque<char>,
    symbols: String,
    numbers: Vec<i64>,
}

impl DataPath {
    /// A powered-on datapath: empty registers, `NOP`-filled memory, the
    /// input stream queued front-to-back.
    pub fn new(capacity: usize, input: &str) -> Self {
        let alu = Alu::new();
        let ps = PsFlags::from_outputs(alu.flag_z, alu.flag_n);
        Self {
            alu,
            capacity,
            mem: (0..capacity).map(Cell::empty).collect(),
            acc: 0,
            pc: 0,
            sp: 0,
            addr: 0,
            dr: 0,
            mr: 0,
            ir: Cell::empty(0),
            ps,
            input: input.chars().collect(),
            symbols: String::new(),
            numbers: Vec::new(),
        }
    }

    /// Places image cells at their addresses.
    ///
    /// # Errors
    ///
    /// Rejects a cell whose index lies outside memory.
    pub fn load_program(&mut self, image: &[Cell]) -> Result<(), MachineError> {
        for cell in image {
            if cell.index >= self.capacity {
                return Err(MachineError::CellOutOfRange {
                    index: cell.index,
                    capacity: self.capacity,
                });
            }
            self.mem[cell.index] = cell.clone();
        }
        Ok(())
    }

    /// Memory size in cells.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The cell an address (possibly negative) resolves to.
    pub fn peek(&self, addr: i64) -> &Cell {
        &self.mem[self.wrap(addr)]
    }

    /// Characters written to output port 0.
    pub fn symbols(&self) -> &str {
        &self.symbols
    }

    /// Integers written to output port 1.
    pub fn numbers(&self) -> &[i64] {
        &self.numbers
    }

    fn wrap(&self, addr: i64) -> usize {
        addr.rem_euclid(self.capacity as i64) as usize
    }

    /// ADDR ← ALU result.
    pub fn latch_address(&mut self) {
        self.addr = self.alu.result;
    }

    /// MR ← ALU result.
    pub fn latch_mr(&mut self) {
        self.mr = self.alu.result;
    }

    /// IR ← mem[ADDR], the whole cell.
    pub fn latch_instr(&mut self) {
        self.ir = self.peek(self.addr).clone();
    }

    /// DR ← mem[ADDR].value.
    pub fn latch_dr(&mut self) {
        self.dr = self.peek(self.addr).value;
    }

    /// PC ← ALU result, reduced modulo capacity.
    pub fn latch_pc(&mut self) {
        self.pc = self.alu.result.rem_euclid(self.capacity as i64);
    }

    /// SP ← ALU result times capacity.
    ///
    /// The multiplication is contractual; the stack sequences in the
    /// control unit are built around it.
    pub fn latch_sp(&mut self) {
        self.sp = self.alu.result * self.capacity as i64;
    }

    /// PS ← ALU flag outputs.
    pub fn latch_flags(&mut self) {
        self.ps = PsFlags::from_outputs(self.alu.flag_z, self.alu.flag_n);
    }

    /// AC ← ALU result (`FromAcc`) or the next input character
    /// (`FromInput`).
    ///
    /// An exhausted input stream is not an error: AC loads 0 and the ALU
    /// flag outputs are driven to Z so the instruction-final flags latch
    /// publishes the condition.
    ///
    /// # Panics
    ///
    /// Panics on a tap the accumulator latch does not admit.
    pub fn latch_acc(&mut self, mux: Mux) {
        match mux {
            Mux::FromAcc => self.acc = self.alu.result,
            Mux::FromInput => match self.input.pop_front() {
                Some(ch) => {
                    log::debug!("input: {ch:?}");
                    self.acc = i64::from(u32::from(ch));
                }
                None => {
                    log::debug!("input exhausted");
                    self.acc = 0;
                    self.alu.flag_z = true;
                    self.alu.flag_n = false;
                }
            },
            other => panic!("{other:?} is not wired to the accumulator latch"),
        }
    }

    /// Appends AC to the output port selected by DR: 0 takes AC as a code
    /// point, 1 takes it as an integer. Other selectors drop the write.
    pub fn latch_output(&mut self) {
        match self.dr {
            0 => match u32::try_from(self.acc).ok().and_then(char::from_u32) {
                Some(ch) => {
                    log::debug!("symbol buffer: {:?} << {ch:?}", self.symbols);
                    self.symbols.push(ch);
                }
                None => log::warn!("AC {} is not a code point, output dropped", self.acc),
            },
            1 => {
                log::debug!("numeric buffer: {:?} << {}", self.numbers, self.acc);
                self.numbers.push(self.acc);
            }
            _ => {}
        }
    }

    /// mem[ADDR] ← a data word carrying MR.
    pub fn latch_wr(&mut self) {
        let index = self.wrap(self.addr);
        self.mem[index] = Cell::data(index, self.mr);
    }

    /// Gates the selected taps through the input muxes and runs the ALU.
    ///
    /// Routes without a selected tap are driven to zero.
    ///
    /// # Panics
    ///
    /// Panics on a tap the addressed mux does not admit.
    pub fn alu_execute(&mut self, op: AluOp, mux_a: Option<Mux>, mux_b: Option<Mux>) {
        let route_a = mux_a.map_or(0, |mux| match mux {
            Mux::FromAcc => self.acc,
            Mux::FromPs => self.ps.encode(),
            other => panic!("{other:?} is not wired to the left ALU input"),
        });
        let route_b = mux_b.map_or(0, |mux| match mux {
            Mux::FromDr => self.dr,
            Mux::FromPc => self.pc,
            Mux::FromSp => self.sp,
            other => panic!("{other:?} is not wired to the right ALU input"),
        });
        self.alu.set(route_a, route_b, op);
        self.alu.calc();
    }

    /// The ALU result, for latches driven by the control unit's sequences.
    pub fn alu_result(&self) -> i64 {
        self.alu.result
    }

    /// The ALU flag outputs.
    pub fn alu_flags(&self) -> (bool, bool) {
        (self.alu.flag_z, self.alu.flag_n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use accum_isa::Opcode;
    use proptest::prelude::*;

    #[test]
    fn test_memory_starts_as_nop_fill() {
        let dp = DataPath::new(8, "");
        assert_eq!(dp.capacity(), 8);
        for addr in 0..8 {
            assert_eq!(dp.peek(addr), &Cell::empty(addr as usize));
        }
    }

    #[test]
    fn test_power_on_zero_flag() {
        let dp = DataPath::new(8, "");
        assert!(dp.ps.contains(PsFlags::Z));
        assert!(!dp.ps.contains(PsFlags::N));
    }

    #[test]
    fn test_load_program_rejects_out_of_range_cells() {
        let mut dp = DataPath::new(4, "");
        let err = dp.load_program(&[Cell::data(4, 1)]).unwrap_err();
        assert_eq!(
            err,
            MachineError::CellOutOfRange {
                index: 4,
                capacity: 4
            }
        );
    }

    #[test]
    fn test_latch_pc_reduces_modulo_capacity() {
        let mut dp = DataPath::new(8, "");
        dp.dr = 11;
        dp.alu_execute(AluOp::NextInB, None, Some(Mux::FromDr));
        dp.latch_pc();
        assert_eq!(dp.pc, 3);
    }

    #[test]
    fn test_latch_sp_multiplies_by_capacity() {
        let mut dp = DataPath::new(8, "");
        dp.dr = 3;
        dp.alu_execute(AluOp::NextInB, None, Some(Mux::FromDr));
        dp.latch_sp();
        assert_eq!(dp.sp, 24);
    }

    #[test]
    fn test_latch_wr_writes_a_data_word() {
        let mut dp = DataPath::new(8, "");
        dp.mr = 42;
        dp.addr = 5;
        dp.latch_wr();
        assert_eq!(dp.peek(5), &Cell::data(5, 42));
        assert_eq!(dp.peek(5).opcode, Opcode::Nop);
    }

    #[test]
    fn test_negative_addresses_wrap_from_the_top() {
        let mut dp = DataPath::new(8, "");
        dp.mr = 9;
        dp.addr = -1;
        dp.latch_wr();
        assert_eq!(dp.peek(7).value, 9);
        assert_eq!(dp.peek(-1).value, 9);
    }

    #[test]
    fn test_input_queue_pops_front_to_back() {
        let mut dp = DataPath::new(8, "AB");
        dp.latch_acc(Mux::FromInput);
        assert_eq!(dp.acc, i64::from(u32::from('A')));
        dp.latch_acc(Mux::FromInput);
        assert_eq!(dp.acc, i64::from(u32::from('B')));
    }

    #[test]
    fn test_input_underflow_loads_zero_and_drives_z() {
        let mut dp = DataPath::new(8, "");
        dp.acc = 17;
        dp.latch_acc(Mux::FromInput);
        assert_eq!(dp.acc, 0);
        dp.latch_flags();
        assert!(dp.ps.contains(PsFlags::Z));
        assert!(!dp.ps.contains(PsFlags::N));
    }

    #[test]
    fn test_output_port_selection() {
        let mut dp = DataPath::new(8, "");
        dp.acc = i64::from(u32::from('H'));
        dp.dr = 0;
        dp.latch_output();
        dp.acc = 42;
        dp.dr = 1;
        dp.latch_output();
        dp.dr = 2;
        dp.latch_output();
        assert_eq!(dp.symbols(), "H");
        assert_eq!(dp.numbers(), &[42]);
    }

    #[test]
    fn test_output_port_zero_appends_nul_for_zero_acc() {
        let mut dp = DataPath::new(8, "");
        dp.acc = 0;
        dp.dr = 0;
        dp.latch_output();
        assert_eq!(dp.symbols(), "\0");
    }

    #[test]
    fn test_from_ps_tap_encodes_flags() {
        let mut dp = DataPath::new(8, "");
        dp.ps = PsFlags::Z | PsFlags::N;
        dp.alu_execute(AluOp::NextInA, Some(Mux::FromPs), None);
        assert_eq!(dp.alu_result(), 11);
    }

    #[test]
    #[should_panic(expected = "not wired to the left ALU input")]
    fn test_left_mux_rejects_unwired_taps() {
        let mut dp = DataPath::new(8, "");
        dp.alu_execute(AluOp::NextInA, Some(Mux::FromSp), None);
    }

    #[test]
    #[should_panic(expected = "not wired to the accumulator latch")]
    fn test_acc_latch_rejects_unwired_taps() {
        let mut dp = DataPath::new(8, "");
        dp.latch_acc(Mux::FromPc);
    }

    proptest! {
        #[test]
        fn latch_pc_lands_in_memory(value in -100_000i64..100_000, capacity in 1usize..512) {
            let mut dp = DataPath::new(capacity, "");
            dp.dr = value;
            dp.alu_execute(AluOp::NextInB, None, Some(Mux::FromDr));
            dp.latch_pc();
            prop_assert!(dp.pc >= 0);
            prop_assert!(dp.pc < capacity as i64);
        }
    }
}
