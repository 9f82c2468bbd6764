//! LS-8 Emulator - CLI Entry Point
//!
//! Commands:
//! - `ls8-emu run <program.ls8>` - Run a program until it halts
//! - `ls8-emu disasm <program.ls8>` - Print a mnemonic listing

use clap::{Parser, Subcommand};
use ls8::{disassemble, load_source, Cpu};

#[derive(Parser)]
#[command(name = "ls8-emu")]
#[command(version = "0.1.0")]
#[command(about = "An emulator of the LS-8, a minimal 8-bit register-and-stack machine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a program until it halts
    Run {
        /// Path to the .ls8 source file to execute
        program: String,
        /// Maximum number of cycles to run (default: 10000)
        #[arg(short, long, default_value = "10000")]
        max_cycles: u64,
        /// Show a trace line before each instruction
        #[arg(short, long)]
        trace: bool,
    },
    /// Disassemble a program to readable text
    Disasm {
        /// Path to the .ls8 source file
        program: String,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            program,
            max_cycles,
            trace,
        } => {
            run_program(&program, max_cycles, trace);
        }
        Commands::Disasm { program } => {
            disassemble_file(&program);
        }
    }
}

fn load_image(path: &str) -> Vec<u8> {
    match load_source(path) {
        Ok(image) => image,
        Err(e) => {
            eprintln!("failed to load {}: {}", path, e);
            std::process::exit(1);
        }
    }
}

fn run_program(path: &str, max_cycles: u64, trace: bool) {
    let image = load_image(path);

    if image.is_empty() {
        eprintln!("no instructions to execute");
        std::process::exit(1);
    }

    let mut cpu = Cpu::new();
    if let Err(e) = cpu.load_program(&image) {
        eprintln!("failed to load program: {}", e);
        std::process::exit(1);
    }

    // One instruction per bounded run, so PRN output and trace lines
    // appear as the program produces them.
    let mut executed = 0u64;
    while cpu.is_running() && executed < max_cycles {
        if trace {
            eprintln!("{}", cpu.trace());
        }

        let pc = cpu.pc;
        match cpu.run_limited(1) {
            Ok(n) => executed += n,
            Err(e) => {
                eprintln!("CPU error at PC={:#04X}: {}", pc, e);
                std::process::exit(1);
            }
        }

        for value in cpu.take_output() {
            println!("{}", value);
        }
    }

    eprintln!();
    eprintln!("Cycles: {}", executed);
    eprintln!("State: {:?}", cpu.state);
    eprintln!("PC: {:#04X}", cpu.pc);

    if executed >= max_cycles && cpu.is_running() {
        eprintln!(
            "reached max cycles limit ({}); use --max-cycles to increase",
            max_cycles
        );
        std::process::exit(1);
    }
}

fn disassemble_file(path: &str) {
    let image = load_image(path);
    print!("{}", disassemble(&image));
}
