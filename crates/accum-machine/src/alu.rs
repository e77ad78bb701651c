//! The arithmetic-logic unit.
//!
//! Combinational: [`Alu::set`] loads the two input routes and the
//! micro-operation, [`Alu::calc`] produces the result and the flag outputs.
//! CMP and AND probe a shadow buffer for the flags and leave the published
//! result untouched; DEC_B copies route B through without decrementing.
//! Both behaviors are contractual (see the ISA crate docs).

use accum_isa::AluOp;

/// The ALU: two input routes, one result, two flag outputs.
#[derive(Debug)]
pub struct Alu {
    route_a: i64,
    route_b: i64,
    op: Option<AluOp>,
    /// Published result of the last computed micro-operation.
    pub result: i64,
    /// Zero flag output.
    pub flag_z: bool,
    /// Negative flag output.
    pub flag_n: bool,
}

impl Alu {
    /// A fresh ALU. The result starts at zero with the flags probed from
    /// it, so the machine powers on with Z set.
    pub fn new() -> Self {
        Self {
            route_a: 0,
            route_b: 0,
            op: None,
            result: 0,
            flag_z: true,
            flag_n: false,
        }
    }

    /// Loads the input routes and the micro-operation for the next `calc`.
    pub fn set(&mut self, route_a: i64, route_b: i64, op: AluOp) {
        self.route_a = route_a;
        self.route_b = route_b;
        self.op = Some(op);
    }

    /// Computes the loaded micro-operation and raises the flags.
    ///
    /// # Panics
    ///
    /// Panics when called before any [`Alu::set`]; that is a control-unit
    /// programming error, not a machine condition.
    pub fn calc(&mut self) {
        let op = self.op.expect("ALU operation must be set before calc");
        let mut buf = None;
        match op {
            AluOp::IncA => self.result = self.route_a + 1,
            AluOp::IncB => self.result = self.route_b + 1,
            AluOp::DecA => self.result = self.route_a - 1,
            // The decrement was never wired up; route B passes through.
            AluOp::DecB => self.result = self.route_b,
            AluOp::Add => self.result = self.route_a + self.route_b,
            AluOp::Cmp => buf = Some(self.route_a - self.route_b),
            AluOp::And => buf = Some(self.route_a & self.route_b),
            AluOp::NextInA => self.result = self.route_a,
            AluOp::NextInB => self.result = self.route_b,
        }
        let probe = buf.unwrap_or(self.result);
        self.flag_z = probe == 0;
        self.flag_n = probe < 0;
    }
}

impl Default for Alu {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn run(route_a: i64, route_b: i64, op: AluOp) -> Alu {
        let mut alu = Alu::new();
        alu.set(route_a, route_b, op);
        alu.calc();
        alu
    }

    #[test]
    fn test_power_on_flags() {
        let alu = Alu::new();
        assert_eq!(alu.result, 0);
        assert!(alu.flag_z);
        assert!(!alu.flag_n);
    }

    #[test]
    fn test_inc_dec() {
        assert_eq!(run(4, 0, AluOp::IncA).result, 5);
        assert_eq!(run(0, 4, AluOp::IncB).result, 5);
        assert_eq!(run(4, 0, AluOp::DecA).result, 3);
    }

    #[test]
    fn test_dec_b_passes_through() {
        assert_eq!(run(0, 4, AluOp::DecB).result, 4);
    }

    #[test]
    fn test_pass_through_routes() {
        assert_eq!(run(7, 9, AluOp::NextInA).result, 7);
        assert_eq!(run(7, 9, AluOp::NextInB).result, 9);
    }

    #[test]
    fn test_cmp_keeps_result_and_raises_flags() {
        let mut alu = Alu::new();
        alu.set(1, 2, AluOp::Add);
        alu.calc();
        alu.set(5, 5, AluOp::Cmp);
        alu.calc();
        assert_eq!(alu.result, 3, "CMP must not publish the difference");
        assert!(alu.flag_z);
        assert!(!alu.flag_n);

        alu.set(3, 5, AluOp::Cmp);
        alu.calc();
        assert!(!alu.flag_z);
        assert!(alu.flag_n);
    }

    #[test]
    fn test_and_keeps_result_and_raises_flags() {
        let mut alu = Alu::new();
        alu.set(6, 1, AluOp::Add);
        alu.calc();
        alu.set(0b1100, 0b0011, AluOp::And);
        alu.calc();
        assert_eq!(alu.result, 7, "AND must not publish the conjunction");
        assert!(alu.flag_z);

        alu.set(0b1100, 0b0100, AluOp::And);
        alu.calc();
        assert!(!alu.flag_z);
        assert!(!alu.flag_n);
    }

    #[test]
    fn test_zero_and_negative_flags_from_result() {
        let alu = run(-1, 0, AluOp::IncA);
        assert!(alu.flag_z);
        assert!(!alu.flag_n);

        let alu = run(0, 0, AluOp::DecA);
        assert!(!alu.flag_z);
        assert!(alu.flag_n);
    }

    proptest! {
        #[test]
        fn add_publishes_sum_and_flags(a in -10_000i64..10_000, b in -10_000i64..10_000) {
            let alu = run(a, b, AluOp::Add);
            prop_assert_eq!(alu.result, a + b);
            prop_assert_eq!(alu.flag_z, a + b == 0);
            prop_assert_eq!(alu.flag_n, a + b < 0);
        }

        #[test]
        fn cmp_flags_order_the_routes(a in -10_000i64..10_000, b in -10_000i64..10_000) {
            let alu = run(a, b, AluOp::Cmp);
            prop_assert_eq!(alu.flag_z, a == b);
            prop_assert_eq!(alu.flag_n, a < b);
        }
    }
}
