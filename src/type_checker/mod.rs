//! Type checking and semantic analysis module.
//!
//! This module checks a resolved AST against the subtype relation of
//! [`Type`](crate::ast::types::Type). It:
//!
//! - Computes the type of every expression from the bindings left by the resolver
//! - Verifies initializers, return values and call arguments
//! - Rejects misuse of function and class identifiers as plain values
//! - Recovers at every declaration, so one run reports all failing declarations
//!
//! The tree is only read, never modified.

pub mod type_checker;
