//! `accum-run` - execute an instruction image against an input stream.

use clap::Parser;
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

/// Tick-accurate simulator for the Accum machine.
#[derive(Debug, Parser)]
#[command(name = "accum-run", version)]
struct Args {
    /// Instruction image file.
    image: PathBuf,
    /// Input file, consumed character by character.
    input: PathBuf,
    /// Memory size in cells.
    #[arg(long, default_value_t = 300)]
    capacity: usize,
    /// Instruction budget; the run stops once it is spent.
    #[arg(long, default_value_t = 5000)]
    bound: u64,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let image = accum_isa::read_image(&args.image)?;
    let input = fs::read_to_string(&args.input)?;
    let outcome = accum_machine::simulate(&image, &input, args.capacity, args.bound)?;

    println!("{}", outcome.symbols);
    println!("{:?}", outcome.numbers);
    println!("instructions: {}", outcome.instructions);
    println!("ticks: {}", outcome.ticks);
    Ok(())
}
