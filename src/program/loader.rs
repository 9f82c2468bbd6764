//! Loader for `.ls8` program sources.
//!
//! The `.ls8` format is line-oriented text:
//! - One instruction byte per non-blank line
//! - The byte is written as an 8-bit binary literal (e.g. `10000010`)
//! - `#` introduces a trailing comment
//! - Blank and comment-only lines are skipped without consuming an address

use std::path::Path;
use thiserror::Error;

/// Parse `.ls8` source text into a memory image.
///
/// Bytes appear in the image in file order, starting at address 0.
pub fn parse_source(source: &str) -> Result<Vec<u8>, LoadError> {
    let mut image = Vec::new();

    for (line_num, line) in source.lines().enumerate() {
        let code = line.split('#').next().unwrap_or("").trim();

        if code.is_empty() {
            continue;
        }

        let byte = u8::from_str_radix(code, 2).map_err(|_| LoadError::ParseError {
            line: line_num + 1,
            message: format!("expected an 8-bit binary literal, found {:?}", code),
        })?;

        image.push(byte);
    }

    if image.len() > crate::cpu::memory::MEMORY_SIZE {
        return Err(LoadError::ProgramTooLarge { size: image.len() });
    }

    Ok(image)
}

/// Load a `.ls8` source file from disk into a memory image.
pub fn load_source<P: AsRef<Path>>(path: P) -> Result<Vec<u8>, LoadError> {
    let source = std::fs::read_to_string(path.as_ref())
        .map_err(|e| LoadError::Io(e.to_string()))?;
    parse_source(&source)
}

/// Errors that can occur while loading a program source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("parse error on line {line}: {message}")]
    ParseError { line: usize, message: String },

    #[error("program of {size} bytes does not fit in 256 cells")]
    ProgramTooLarge { size: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let source = "10000010\n00000000\n00101010\n00000001\n";

        let image = parse_source(source).unwrap();

        assert_eq!(image, vec![0b1000_0010, 0, 42, 1]);
    }

    #[test]
    fn test_parse_skips_comments_and_blank_lines() {
        let source = r#"
# Load 42 into R0 and halt.

10000010  # LDI R0,42
00000000
00101010
   # comment-only line
00000001  # HLT
"#;

        let image = parse_source(source).unwrap();

        assert_eq!(image, vec![0b1000_0010, 0, 42, 1]);
    }

    #[test]
    fn test_parse_rejects_bad_literal() {
        let err = parse_source("10000010\nnot-binary\n").unwrap_err();

        assert_eq!(
            err,
            LoadError::ParseError {
                line: 2,
                message: "expected an 8-bit binary literal, found \"not-binary\"".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_rejects_nine_bit_literal() {
        let err = parse_source("100000000\n").unwrap_err();

        assert!(matches!(err, LoadError::ParseError { line: 1, .. }));
    }

    #[test]
    fn test_parse_too_large() {
        let source = "00000000\n".repeat(257);

        let err = parse_source(&source).unwrap_err();

        assert_eq!(err, LoadError::ProgramTooLarge { size: 257 });
    }

    #[test]
    fn test_demo_program_end_to_end() {
        use crate::cpu::Cpu;

        let source = include_str!("../../demos/sctest.ls8");
        let image = parse_source(source).unwrap();
        let mut cpu = Cpu::new();
        cpu.load_program(&image).unwrap();

        cpu.run().unwrap();

        assert!(cpu.is_halted());
        assert_eq!(cpu.take_output(), vec![8]);
    }

    #[test]
    fn test_loaded_image_leaves_high_addresses_zero() {
        use crate::cpu::Cpu;

        let image = parse_source("10000010\n00000000\n00101010\n00000001\n").unwrap();
        let mut cpu = Cpu::new();
        cpu.load_program(&image).unwrap();

        assert_eq!(cpu.mem.read(0), 0b1000_0010);
        assert_eq!(cpu.mem.read(3), 1);
        for addr in 4..=255u8 {
            assert_eq!(cpu.mem.read(addr), 0);
        }
    }
}
