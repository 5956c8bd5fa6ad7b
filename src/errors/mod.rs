//! Error types and error handling for the compiler.
//!
//! This module defines the single diagnostic type shared by every phase:
//!
//! - Error structures with the source line they refer to
//! - Specific error variants for lexing, parsing, resolution and type checking
//! - The phase each error belongs to, used for per-phase tallies
//! - Helpful error messages and suggestions

pub mod errors;

#[cfg(test)]
mod tests;
