//! # LS-8 Emulator
//!
//! An emulator of the LS-8, a minimal 8-bit register-and-stack machine:
//! 256 bytes of memory, eight general-purpose registers, and a small
//! instruction set covering arithmetic, stack operations, subroutine
//! call/return, comparison, and conditional branching.

pub mod cpu;
pub mod program;

// Re-export commonly used types
pub use cpu::{Cpu, CpuError, CpuState, Instruction, Memory, Registers};
pub use program::{disassemble, load_source, parse_source, LoadError};
