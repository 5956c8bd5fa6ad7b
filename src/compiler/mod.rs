//! Code generation module for the compiler.
//!
//! This module lowers a resolved, type-checked AST to instructions for the
//! stack machine in [`crate::vm`]. It handles:
//!
//! - Expressions, including short-circuit logic and comparisons
//! - Functions and methods, emitted out of line after the main body
//! - Classes, whose value is a dispatch table built on the heap
//! - Object instantiation and dispatch through the object's table
//!
//! Labels and the out-of-line code live in a [`CodeBuffer`](compiler::CodeBuffer)
//! created per run, so separate runs never share state.

pub mod compiler;
pub mod decl;
pub mod expr;

#[cfg(test)]
mod tests;
