//! Program I/O for LS-8 sources.
//!
//! This module provides:
//! - The `.ls8` source loader (text → memory image)
//! - A disassembler (memory image → readable listing)

pub mod disasm;
pub mod loader;

pub use disasm::{disassemble, disassemble_instruction};
pub use loader::{load_source, parse_source, LoadError};
