//! Disassembler for LS-8 memory images.
//!
//! Walks a byte image from address 0, decoding instructions and rendering
//! one listing line per instruction: address, raw bytes, mnemonic, and
//! operands. Bytes that do not decode are listed as data.

use crate::cpu::decode::{decode, instruction_size, Instruction};

/// Disassemble a single instruction for display.
pub fn disassemble_instruction(instr: &Instruction) -> String {
    match *instr {
        Instruction::Ldi { reg, value } => format!("LDI R{},{}", reg & 0x07, value),
        Instruction::Add { dst, src } => format!("ADD R{},R{}", dst & 0x07, src & 0x07),
        Instruction::Mul { dst, src } => format!("MUL R{},R{}", dst & 0x07, src & 0x07),
        Instruction::Cmp { a, b } => format!("CMP R{},R{}", a & 0x07, b & 0x07),
        Instruction::Push { reg }
        | Instruction::Pop { reg }
        | Instruction::Call { reg }
        | Instruction::Jmp { reg }
        | Instruction::Jeq { reg }
        | Instruction::Jne { reg }
        | Instruction::Prn { reg } => format!("{} R{}", instr.mnemonic(), reg & 0x07),
        Instruction::Ret | Instruction::Hlt => instr.mnemonic().to_string(),
    }
}

/// Disassemble a full memory image into a listing.
pub fn disassemble(image: &[u8]) -> String {
    let mut listing = String::new();
    let mut addr = 0usize;

    while addr < image.len() {
        let opcode = image[addr];
        let op_a = image.get(addr + 1).copied().unwrap_or(0);
        let op_b = image.get(addr + 2).copied().unwrap_or(0);

        match decode(opcode, op_a, op_b) {
            Ok(instr) => {
                let size = instruction_size(opcode) as usize;
                let raw: Vec<String> = image[addr..(addr + size).min(image.len())]
                    .iter()
                    .map(|b| format!("{:08b}", b))
                    .collect();
                listing.push_str(&format!(
                    "{:03}: {:<28} {}\n",
                    addr,
                    raw.join(" "),
                    disassemble_instruction(&instr)
                ));
                addr += size;
            }
            Err(_) => {
                listing.push_str(&format!(
                    "{:03}: {:<28} DATA {}\n",
                    addr,
                    format!("{:08b}", opcode),
                    opcode
                ));
                addr += 1;
            }
        }
    }

    listing
}
