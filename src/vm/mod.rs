//! Stack virtual machine targeted by the code generator.
//!
//! This module holds the instruction set contract and a reference
//! implementation of the machine:
//!
//! - instructions: The `Instruction` enum and its textual assembly form
//! - assembler: Parsing assembly text and resolving labels to code addresses
//! - vm: The interpreter, used by the command line driver and by tests

pub mod assembler;
pub mod instructions;
pub mod vm;

/// Number of memory cells. The stack grows down from here, the heap up from 0.
pub const MEMSIZE: i32 = 10000;

#[cfg(test)]
mod tests;
