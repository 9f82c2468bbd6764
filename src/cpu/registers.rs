//! LS-8 register file.
//!
//! Eight general-purpose slots with two conventional assignments:
//! - R7 is the stack pointer, initialized to 0xF4; the stack grows
//!   toward lower addresses and R7 addresses the next free slot.
//! - R6 is the flags register, holding the single most recent
//!   comparison result code (1 = equal, 2 = greater, 4 = less).
//!
//! Register values are `i64` and are never masked to 8 bits; arithmetic
//! grows freely and values are truncated to a byte only when written to
//! memory or used as an address.

use serde::{Deserialize, Serialize};

/// Index of the stack-pointer register.
pub const SP: u8 = 7;

/// Index of the flags register.
pub const FL: u8 = 6;

/// Initial stack-pointer value: the byte just past the top of the stack
/// region, so the first push writes to 0xF3.
pub const STACK_INIT: i64 = 0xF4;

/// Comparison result: the two compared registers were equal.
pub const FLAG_EQUAL: i64 = 1;

/// Comparison result: the first register was greater.
pub const FLAG_GREATER: i64 = 2;

/// Comparison result: the first register was less.
pub const FLAG_LESS: i64 = 4;

/// The LS-8 register file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registers {
    slots: [i64; 8],
}

impl Registers {
    /// Create a new register file: all slots zero except the stack
    /// pointer, which starts at `STACK_INIT`.
    pub fn new() -> Self {
        let mut slots = [0; 8];
        slots[SP as usize] = STACK_INIT;
        Self { slots }
    }

    /// Reset all registers to their initial values.
    pub fn reset(&mut self) {
        self.slots = [0; 8];
        self.slots[SP as usize] = STACK_INIT;
    }

    /// Read a register. The index uses the low three bits of `reg`.
    #[inline]
    pub fn get(&self, reg: u8) -> i64 {
        self.slots[(reg & 0x07) as usize]
    }

    /// Write a register. The index uses the low three bits of `reg`.
    #[inline]
    pub fn set(&mut self, reg: u8, value: i64) {
        self.slots[(reg & 0x07) as usize] = value;
    }

    /// The current stack-pointer value as a memory address.
    #[inline]
    pub fn sp(&self) -> u8 {
        self.slots[SP as usize] as u8
    }

    /// The current flags value.
    #[inline]
    pub fn flags(&self) -> i64 {
        self.slots[FL as usize]
    }

    /// Store a comparison result code in the flags register.
    #[inline]
    pub fn set_flags(&mut self, code: i64) {
        self.slots[FL as usize] = code;
    }

    /// Decrement the stack pointer, returning the new address.
    ///
    /// No bounds checking: a full stack silently wraps into other memory,
    /// matching the original machine.
    #[inline]
    pub fn push_addr(&mut self) -> u8 {
        let new = self.slots[SP as usize].wrapping_sub(1);
        self.slots[SP as usize] = new;
        new as u8
    }

    /// Return the current stack-pointer address and increment the stack
    /// pointer. No bounds checking, as with `push_addr`.
    #[inline]
    pub fn pop_addr(&mut self) -> u8 {
        let old = self.slots[SP as usize];
        self.slots[SP as usize] = old.wrapping_add(1);
        old as u8
    }

    /// All eight slots in order (for trace output).
    pub fn slots(&self) -> &[i64; 8] {
        &self.slots
    }
}

impl Default for Registers {
    fn default() -> Self {
        Self::new()
    }
}
