//! The simulation harness: instruction-budget loop and result collection.

use crate::MachineError;
use crate::control::{ControlUnit, Step};
use crate::datapath::DataPath;
use accum_isa::Cell;

/// What a finished simulation hands back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// Characters written to output port 0.
    pub symbols: String,
    /// Integers written to output port 1.
    pub numbers: Vec<i64>,
    /// Instructions executed, the halting one included.
    pub instructions: u64,
    /// Ticks consumed.
    pub ticks: u64,
}

/// Runs an image to completion: HLT, or `bound` instructions, whichever
/// comes first.
///
/// The simulation is a pure function of its four inputs; all machine state
/// is created here and dropped on return.
///
/// # Errors
///
/// Returns an error when an image cell does not fit the requested memory.
pub fn simulate(
    image: &[Cell],
    input: &str,
    capacity: usize,
    bound: u64,
) -> Result<Outcome, MachineError> {
    let mut dp = DataPath::new(capacity, input);
    dp.load_program(image)?;

    let mut cu = ControlUnit::new();
    let mut instructions = 0;
    let mut halted = false;
    while instructions < bound {
        let step = cu.step(&mut dp);
        instructions += 1;
        if step == Step::Halt {
            halted = true;
            break;
        }
    }
    if !halted {
        log::warn!("instruction budget of {bound} exhausted before HLT");
    }

    log::info!("symbol buffer: {:?}", dp.symbols());
    log::info!("numeric buffer: {:?}", dp.numbers());
    Ok(Outcome {
        symbols: dp.symbols().to_owned(),
        numbers: dp.numbers().to_vec(),
        instructions,
        ticks: cu.ticks(),
    })
}
