//! Scope resolution.
//!
//! This module walks the AST once, maintaining a stack of lexical frames
//! and a class table, and:
//!
//! - Assigns every declaration its nesting level and storage offset
//! - Builds one virtual table per class (fields and dispatch slots)
//! - Decorates identifiers, calls, instantiations and method calls with
//!   the binding they refer to
//! - Collects every resolution error instead of stopping at the first one

pub mod resolver;
