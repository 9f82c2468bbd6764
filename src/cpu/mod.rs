//! CPU emulation for the LS-8.
//!
//! This module implements the complete LS-8 architecture:
//! - 256 byte-addressable memory cells
//! - 8 general-purpose registers (R7 = stack pointer, R6 = flags)
//! - a 13-instruction set with register-and-stack addressing

pub mod decode;
pub mod execute;
pub mod memory;
pub mod registers;

pub use decode::{DecodeError, Instruction};
pub use execute::{Cpu, CpuError, CpuState, Flow};
pub use memory::Memory;
pub use registers::Registers;
