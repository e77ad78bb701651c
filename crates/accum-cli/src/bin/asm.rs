//! `accum-asm` - translate assembly source into an instruction image.

use clap::Parser;
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

/// Two-pass assembler for the Accum machine.
#[derive(Debug, Parser)]
#[command(name = "accum-asm", version)]
struct Args {
    /// Assembly source file.
    source: PathBuf,
    /// Instruction image file to write.
    target: PathBuf,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    match run(&args) {
        Ok(cells) => {
            log::info!(
                "wrote {cells} cells to {}",
                args.target.display()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<usize, Box<dyn Error>> {
    let source = fs::read_to_string(&args.source)?;
    let image = accum_asm::translate(&source)?;
    accum_isa::write_image(&args.target, &image)?;
    Ok(image.len())
}
