//! Instruction decoder for the LS-8.
//!
//! An LS-8 instruction is one opcode byte followed by up to two operand
//! bytes. Bits 6-7 of the opcode encode the operand count (0, 1, or 2);
//! bits 0-5 encode the variant. The operand bytes are always fetched from
//! PC+1 and PC+2 whether or not the variant uses them.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Opcode byte values, as encoded by the original machine.
#[derive(Debug, Clone, Copy)]
pub struct Opcode;

impl Opcode {
    pub const HLT: u8 = 0b0000_0001;
    pub const RET: u8 = 0b0001_0001;
    pub const PUSH: u8 = 0b0100_0101;
    pub const POP: u8 = 0b0100_0110;
    pub const PRN: u8 = 0b0100_0111;
    pub const CALL: u8 = 0b0101_0000;
    pub const JMP: u8 = 0b0101_0100;
    pub const JEQ: u8 = 0b0101_0101;
    pub const JNE: u8 = 0b0101_0110;
    pub const LDI: u8 = 0b1000_0010;
    pub const ADD: u8 = 0b1010_0000;
    pub const MUL: u8 = 0b1010_0010;
    pub const CMP: u8 = 0b1010_0111;
}

/// The number of operand bytes an opcode carries, from its top two bits.
#[inline]
pub const fn operand_count(opcode: u8) -> u8 {
    opcode >> 6
}

/// The total instruction length in bytes: the opcode byte plus its
/// operands. This is the sole auto-advance rule of the machine.
#[inline]
pub const fn instruction_size(opcode: u8) -> u8 {
    (opcode >> 6) + 1
}

/// Decoded LS-8 instruction.
///
/// Register operands are raw operand bytes; the register file selects a
/// slot by the low three bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instruction {
    /// Load immediate: reg := value
    Ldi { reg: u8, value: u8 },

    /// Add registers: dst += src
    Add { dst: u8, src: u8 },

    /// Multiply registers: dst *= src
    Mul { dst: u8, src: u8 },

    /// Compare registers, storing exactly one of the result codes
    /// (1 = equal, 2 = greater, 4 = less) in the flags register.
    Cmp { a: u8, b: u8 },

    /// Push a register's value onto the stack.
    Push { reg: u8 },

    /// Pop the top of the stack into a register.
    Pop { reg: u8 },

    /// Call the subroutine at the address held in a register.
    Call { reg: u8 },

    /// Return from a subroutine.
    Ret,

    /// Unconditional jump to the address held in a register.
    Jmp { reg: u8 },

    /// Jump if the flags register holds the equal code.
    Jeq { reg: u8 },

    /// Jump if the flags register holds a not-equal code.
    Jne { reg: u8 },

    /// Print a register's value.
    Prn { reg: u8 },

    /// Halt execution.
    Hlt,
}

impl Instruction {
    /// The opcode byte this instruction encodes to.
    pub const fn opcode(&self) -> u8 {
        match self {
            Instruction::Ldi { .. } => Opcode::LDI,
            Instruction::Add { .. } => Opcode::ADD,
            Instruction::Mul { .. } => Opcode::MUL,
            Instruction::Cmp { .. } => Opcode::CMP,
            Instruction::Push { .. } => Opcode::PUSH,
            Instruction::Pop { .. } => Opcode::POP,
            Instruction::Call { .. } => Opcode::CALL,
            Instruction::Ret => Opcode::RET,
            Instruction::Jmp { .. } => Opcode::JMP,
            Instruction::Jeq { .. } => Opcode::JEQ,
            Instruction::Jne { .. } => Opcode::JNE,
            Instruction::Prn { .. } => Opcode::PRN,
            Instruction::Hlt => Opcode::HLT,
        }
    }

    /// The instruction length in bytes (opcode plus operands).
    pub const fn size(&self) -> u8 {
        instruction_size(self.opcode())
    }

    /// The assembly mnemonic.
    pub const fn mnemonic(&self) -> &'static str {
        match self {
            Instruction::Ldi { .. } => "LDI",
            Instruction::Add { .. } => "ADD",
            Instruction::Mul { .. } => "MUL",
            Instruction::Cmp { .. } => "CMP",
            Instruction::Push { .. } => "PUSH",
            Instruction::Pop { .. } => "POP",
            Instruction::Call { .. } => "CALL",
            Instruction::Ret => "RET",
            Instruction::Jmp { .. } => "JMP",
            Instruction::Jeq { .. } => "JEQ",
            Instruction::Jne { .. } => "JNE",
            Instruction::Prn { .. } => "PRN",
            Instruction::Hlt => "HLT",
        }
    }
}

/// Decode an opcode byte and its two positionally-fetched operand bytes.
///
/// Operands an instruction does not use are ignored here, mirroring the
/// unconditional operand fetch in the execution loop.
pub fn decode(opcode: u8, op_a: u8, op_b: u8) -> Result<Instruction, DecodeError> {
    let instruction = match opcode {
        Opcode::LDI => Instruction::Ldi {
            reg: op_a,
            value: op_b,
        },
        Opcode::ADD => Instruction::Add {
            dst: op_a,
            src: op_b,
        },
        Opcode::MUL => Instruction::Mul {
            dst: op_a,
            src: op_b,
        },
        Opcode::CMP => Instruction::Cmp { a: op_a, b: op_b },
        Opcode::PUSH => Instruction::Push { reg: op_a },
        Opcode::POP => Instruction::Pop { reg: op_a },
        Opcode::CALL => Instruction::Call { reg: op_a },
        Opcode::RET => Instruction::Ret,
        Opcode::JMP => Instruction::Jmp { reg: op_a },
        Opcode::JEQ => Instruction::Jeq { reg: op_a },
        Opcode::JNE => Instruction::Jne { reg: op_a },
        Opcode::PRN => Instruction::Prn { reg: op_a },
        Opcode::HLT => Instruction::Hlt,
        _ => return Err(DecodeError::UnknownOpcode(opcode)),
    };

    Ok(instruction)
}

/// Encode an instruction back to its byte form: the opcode byte followed
/// by exactly as many operand bytes as the opcode carries.
pub fn encode(instr: &Instruction) -> Vec<u8> {
    let mut bytes = vec![instr.opcode()];

    match *instr {
        Instruction::Ldi { reg, value } => bytes.extend([reg, value]),
        Instruction::Add { dst, src } => bytes.extend([dst, src]),
        Instruction::Mul { dst, src } => bytes.extend([dst, src]),
        Instruction::Cmp { a, b } => bytes.extend([a, b]),
        Instruction::Push { reg }
        | Instruction::Pop { reg }
        | Instruction::Call { reg }
        | Instruction::Jmp { reg }
        | Instruction::Jeq { reg }
        | Instruction::Jne { reg }
        | Instruction::Prn { reg } => bytes.push(reg),
        Instruction::Ret | Instruction::Hlt => {}
    }

    bytes
}

/// Errors that can occur during instruction decoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("unknown opcode: {0:#010b}")]
    UnknownOpcode(u8),
}
