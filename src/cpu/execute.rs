//! CPU execution engine for the LS-8.
//!
//! Implements the fetch-decode-execute cycle and all instruction behaviors.

use crate::cpu::decode::{self, DecodeError, Instruction};
use crate::cpu::memory::MemoryError;
use crate::cpu::registers::{FLAG_EQUAL, FLAG_GREATER, FLAG_LESS};
use crate::cpu::{Memory, Registers};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// CPU execution state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CpuState {
    /// CPU is running normally.
    Running,
    /// CPU has halted (executed HLT instruction).
    Halted,
}

/// How a handler directed the program counter.
///
/// `Advance` lets the loop apply the auto-advance rule; `Jump` carries the
/// address the handler already chose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Advance PC past the instruction and its operands.
    Advance,
    /// Set PC to the given address.
    Jump(u8),
}

/// The LS-8 CPU.
#[derive(Clone, Serialize, Deserialize)]
pub struct Cpu {
    /// CPU registers.
    pub regs: Registers,
    /// Main memory.
    pub mem: Memory,
    /// Program counter.
    pub pc: u8,
    /// Current execution state.
    pub state: CpuState,
    /// Instruction count (for profiling).
    pub cycles: u64,
    /// Values emitted by PRN, drained by the front end.
    output: Vec<i64>,
    /// Last executed instruction (for debugging).
    last_instr: Option<Instruction>,
}

impl Cpu {
    /// Create a new CPU with zeroed memory and initial registers.
    pub fn new() -> Self {
        Self {
            regs: Registers::new(),
            mem: Memory::new(),
            pc: 0,
            state: CpuState::Running,
            cycles: 0,
            output: Vec::new(),
            last_instr: None,
        }
    }

    /// Reset the CPU to initial state.
    pub fn reset(&mut self) {
        self.regs.reset();
        self.mem.clear();
        self.pc = 0;
        self.state = CpuState::Running;
        self.cycles = 0;
        self.output.clear();
        self.last_instr = None;
    }

    /// Load a program image into memory at address 0.
    pub fn load_program(&mut self, program: &[u8]) -> Result<(), CpuError> {
        self.mem.load_program(program)?;
        Ok(())
    }

    /// Execute a single instruction.
    ///
    /// Returns the instruction that was executed, or an error.
    pub fn step(&mut self) -> Result<Instruction, CpuError> {
        if self.state != CpuState::Running {
            return Err(CpuError::NotRunning(self.state));
        }

        // Fetch: the opcode and, unconditionally, the next two cells.
        let pc = self.pc;
        let opcode = self.mem.read(pc);
        let op_a = self.mem.read(pc.wrapping_add(1));
        let op_b = self.mem.read(pc.wrapping_add(2));

        // Decode
        let instr = decode::decode(opcode, op_a, op_b).map_err(|e| match e {
            DecodeError::UnknownOpcode(opcode) => CpuError::InvalidOpcode { pc, opcode },
        })?;

        // Execute
        let flow = self.execute(instr)?;

        // The top two opcode bits encode the operand count, plus one for
        // the opcode byte itself. This is the sole auto-advance rule.
        match flow {
            Flow::Advance => self.pc = pc.wrapping_add(decode::instruction_size(opcode)),
            Flow::Jump(addr) => self.pc = addr,
        }

        self.cycles += 1;
        self.last_instr = Some(instr);

        Ok(instr)
    }

    /// Run until halt or error.
    ///
    /// Returns the number of instructions executed.
    pub fn run(&mut self) -> Result<u64, CpuError> {
        let start_cycles = self.cycles;

        while self.state == CpuState::Running {
            self.step()?;
        }

        Ok(self.cycles - start_cycles)
    }

    /// Run for at most `max_cycles` instructions.
    pub fn run_limited(&mut self, max_cycles: u64) -> Result<u64, CpuError> {
        let start_cycles = self.cycles;
        let limit = self.cycles.saturating_add(max_cycles);

        while self.state == CpuState::Running && self.cycles < limit {
            self.step()?;
        }

        Ok(self.cycles - start_cycles)
    }

    /// Execute a decoded instruction, reporting how it directed the PC.
    fn execute(&mut self, instr: Instruction) -> Result<Flow, CpuError> {
        match instr {
            // ==================== ALU ====================
            Instruction::Ldi { reg, value } => {
                self.regs.set(reg, value as i64);
            }

            Instruction::Add { dst, src } => {
                let result = self.regs.get(dst).wrapping_add(self.regs.get(src));
                self.regs.set(dst, result);
            }

            Instruction::Mul { dst, src } => {
                let result = self.regs.get(dst).wrapping_mul(self.regs.get(src));
                self.regs.set(dst, result);
            }

            // ==================== Compare & Branch ====================
            Instruction::Cmp { a, b } => {
                let value_a = self.regs.get(a);
                let value_b = self.regs.get(b);

                let code = if value_a == value_b {
                    FLAG_EQUAL
                } else if value_a > value_b {
                    FLAG_GREATER
                } else {
                    FLAG_LESS
                };
                self.regs.set_flags(code);
            }

            Instruction::Jmp { reg } => {
                return Ok(Flow::Jump(self.regs.get(reg) as u8));
            }

            Instruction::Jeq { reg } => {
                if self.regs.flags() == FLAG_EQUAL {
                    return Ok(Flow::Jump(self.regs.get(reg) as u8));
                }
            }

            Instruction::Jne { reg } => {
                let flags = self.regs.flags();
                if flags == FLAG_GREATER || flags == FLAG_LESS {
                    return Ok(Flow::Jump(self.regs.get(reg) as u8));
                }
            }

            // ==================== Stack ====================
            Instruction::Push { reg } => {
                let value = self.regs.get(reg) as u8;
                let addr = self.regs.push_addr();
                self.mem.write(addr, value);
            }

            Instruction::Pop { reg } => {
                let addr = self.regs.pop_addr();
                let value = self.mem.read(addr);
                self.regs.set(reg, value as i64);
            }

            // ==================== Call / Return ====================
            Instruction::Call { reg } => {
                // Return address: past this instruction and its operand.
                let ret_addr = self.pc.wrapping_add(2);
                let addr = self.regs.push_addr();
                self.mem.write(addr, ret_addr);
                return Ok(Flow::Jump(self.regs.get(reg) as u8));
            }

            Instruction::Ret => {
                // The return address pops directly into the PC; no
                // register is clobbered on the way.
                let addr = self.regs.pop_addr();
                let ret_addr = self.mem.read(addr);
                return Ok(Flow::Jump(ret_addr));
            }

            // ==================== Output & Halt ====================
            Instruction::Prn { reg } => {
                self.output.push(self.regs.get(reg));
            }

            Instruction::Hlt => {
                self.state = CpuState::Halted;
            }
        }

        Ok(Flow::Advance)
    }

    /// Named ALU entry point: perform `op` on two registers, storing the
    /// result in the first.
    ///
    /// Same arithmetic semantics as the dispatched instructions, plus
    /// subtraction and integer division. An unrecognized name is fatal.
    pub fn alu(&mut self, op: &str, reg_a: u8, reg_b: u8) -> Result<(), CpuError> {
        let a = self.regs.get(reg_a);
        let b = self.regs.get(reg_b);

        let result = match op {
            "ADD" => a.wrapping_add(b),
            "SUB" => a.wrapping_sub(b),
            "MUL" => a.wrapping_mul(b),
            "DIV" => {
                if b == 0 {
                    return Err(CpuError::DivisionByZero);
                }
                a.wrapping_div(b)
            }
            _ => return Err(CpuError::UnsupportedOperation(op.to_string())),
        };

        self.regs.set(reg_a, result);
        Ok(())
    }

    /// Drain the values emitted by PRN since the last drain.
    pub fn take_output(&mut self) -> Vec<i64> {
        std::mem::take(&mut self.output)
    }

    /// The values emitted by PRN and not yet drained.
    pub fn output(&self) -> &[i64] {
        &self.output
    }

    /// Format the current CPU state as a one-line trace:
    /// PC, the three bytes at PC..PC+2, and all eight registers.
    pub fn trace(&self) -> String {
        let mut line = format!(
            "TRACE: {:02X} | {:02X} {:02X} {:02X} |",
            self.pc,
            self.mem.read(self.pc),
            self.mem.read(self.pc.wrapping_add(1)),
            self.mem.read(self.pc.wrapping_add(2)),
        );

        for value in self.regs.slots() {
            line.push_str(&format!(" {:02X}", value));
        }

        line
    }

    /// Get the last executed instruction.
    pub fn last_instruction(&self) -> Option<Instruction> {
        self.last_instr
    }

    /// Check if the CPU is halted.
    pub fn is_halted(&self) -> bool {
        self.state == CpuState::Halted
    }

    /// Check if the CPU is running.
    pub fn is_running(&self) -> bool {
        self.state == CpuState::Running
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Cpu {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cpu")
            .field("state", &self.state)
            .field("pc", &self.pc)
            .field("cycles", &self.cycles)
            .field("regs", &self.regs)
            .finish()
    }
}

/// Errors that can occur during CPU execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CpuError {
    #[error("CPU not running: {0:?}")]
    NotRunning(CpuState),

    #[error("invalid opcode {opcode:#010b} at PC {pc:#04X}")]
    InvalidOpcode { pc: u8, opcode: u8 },

    #[error("unsupported ALU operation: {0}")]
    UnsupportedOperation(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("memory error: {0}")]
    Memory(#[from] MemoryError),
}
