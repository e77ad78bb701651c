//! Program status flags.

use bitflags::bitflags;

bitflags! {
    /// Program status register.
    ///
    /// Updated after every executed instruction from the flag outputs of
    /// the last ALU micro-operation of that instruction's sequence.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PsFlags: u8 {
        /// Zero flag - set when the probed ALU value was zero.
        const Z = 1 << 0;

        /// Negative flag - set when the probed ALU value was negative.
        const N = 1 << 1;
    }
}

impl PsFlags {
    /// Builds the register from raw flag outputs.
    pub fn from_outputs(z: bool, n: bool) -> Self {
        let mut ps = Self::empty();
        ps.set(Self::Z, z);
        ps.set(Self::N, n);
        ps
    }

    /// Encodes the pair as the decimal literal `N*10 + Z`, the form the
    /// `FROM_PS` tap feeds into the left ALU input.
    pub fn encode(self) -> i64 {
        let n = i64::from(self.contains(Self::N));
        let z = i64::from(self.contains(Self::Z));
        n * 10 + z
    }
}
