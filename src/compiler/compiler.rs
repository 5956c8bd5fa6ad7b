//! Main code generation module.
//!
//! This module contains the per-run [`CodeBuffer`] and the program-level
//! entry point. Straight-line top-level code is returned directly, while
//! function and method bodies are collected in the buffer and appended
//! after the final `halt`.

use std::collections::HashMap;

use crate::{
    ast::ast::Program,
    errors::errors::Error,
    vm::instructions::Instruction,
};

use super::{
    decl::{gen_class, gen_declaration},
    expr::gen_expression,
};

/// Label generators and the out-of-line code segment of one compilation run.
///
/// The entry label of every method is kept here, keyed by class and method
/// name, instead of on the tree.
#[derive(Debug, Default)]
pub struct CodeBuffer {
    label_count: usize,
    function_label_count: usize,
    function_code: Vec<Instruction>,
    method_labels: HashMap<(String, String), String>,
}

impl CodeBuffer {
    pub fn new() -> Self {
        CodeBuffer::default()
    }

    /// Label for a jump target inside an expression.
    pub fn fresh_label(&mut self) -> String {
        let label = format!("label{}", self.label_count);
        self.label_count += 1;
        label
    }

    /// Label for the entry point of a function or method.
    pub fn fresh_function_label(&mut self) -> String {
        let label = format!("function{}", self.function_label_count);
        self.function_label_count += 1;
        label
    }

    /// Appends a complete function body to the code segment.
    pub fn put_code(&mut self, code: Vec<Instruction>) {
        self.function_code.extend(code);
    }

    pub fn record_method_label(&mut self, class: &str, method: &str, label: &str) {
        self.method_labels
            .insert((class.to_string(), method.to_string()), label.to_string());
    }

    pub fn method_label(&self, class: &str, method: &str) -> Option<&str> {
        self.method_labels
            .get(&(class.to_string(), method.to_string()))
            .map(String::as_str)
    }

    pub fn take_code(&mut self) -> Vec<Instruction> {
        std::mem::take(&mut self.function_code)
    }
}

/// Lowers a resolved and type-checked program to stack machine code.
///
/// The only possible error is an undecorated node, which means an earlier
/// phase let an invalid tree through.
pub fn generate(program: &Program) -> Result<Vec<Instruction>, Error> {
    let mut buffer = CodeBuffer::new();
    let mut code = vec![];

    match program {
        Program::LetIn {
            classes,
            declarations,
            body,
        } => {
            // Slot -1 of the global frame, mirroring the return address slot of a call frame.
            code.push(Instruction::Push(0));
            for class in classes {
                code.extend(gen_class(&mut buffer, class)?);
            }
            for declaration in declarations {
                code.extend(gen_declaration(&mut buffer, declaration)?);
            }
            code.extend(gen_expression(&mut buffer, body)?);
        }
        Program::Body(body) => code.extend(gen_expression(&mut buffer, body)?),
    }

    code.push(Instruction::Halt);
    code.extend(buffer.take_code());

    Ok(code)
}
