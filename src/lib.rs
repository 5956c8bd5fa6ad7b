#![allow(clippy::module_inception)]

use std::rc::Rc;

use thiserror::Error;

use crate::{
    errors::errors::{Error, ErrorPhase, ErrorTip},
    lexer::lexer::tokenize,
    parser::parser::parse,
    resolver::resolver::resolve,
    type_checker::type_checker::type_check,
    vm::{
        instructions::Instruction,
        vm::{ExecutionResult, VirtualMachine, VmError},
    },
};

pub mod ast;
pub mod compiler;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod resolver;
pub mod type_checker;
pub mod vm;

extern crate regex;

#[derive(Error, Debug)]
pub enum RunError {
    #[error("compilation failed with {} error(s)", .0.len())]
    Compile(Vec<Error>),
    #[error("runtime error: {0}")]
    Vm(#[from] VmError),
}

/// Runs the front end and the semantic phases over `source` and, if no
/// phase reported anything, generates code for it.
///
/// Resolution and type errors are returned together, in phase order. The
/// type checker still runs after resolution errors so that declarations not
/// touched by them are checked too.
pub fn compile(source: &str, file: Option<String>) -> Result<Vec<Instruction>, Vec<Error>> {
    let file_name = Rc::new(file.clone().unwrap_or_else(|| String::from("<input>")));

    let tokens = tokenize(source.to_string(), file).map_err(|error| vec![error])?;
    let (_, program) = parse(tokens, file_name);
    let mut program = program.map_err(|error| vec![error])?;

    let (_, mut errors) = resolve(&mut program);
    errors.extend(type_check(&program));

    if !errors.is_empty() {
        return Err(errors);
    }

    compiler::compiler::generate(&program).map_err(|error| vec![error])
}

/// Compiles `source` and executes it on the reference machine.
pub fn run(source: &str, file: Option<String>) -> Result<ExecutionResult, RunError> {
    let code = compile(source, file).map_err(RunError::Compile)?;
    let mut machine = VirtualMachine::load(&code)?;

    Ok(machine.run()?)
}

/// Number of errors a given phase reported.
pub fn phase_tally(errors: &[Error], phase: ErrorPhase) -> usize {
    errors
        .iter()
        .filter(|error| error.get_phase() == phase)
        .count()
}

/// Text of the 1-based `line` of `source`, without its line terminator.
pub fn get_line_text(source: &str, line: u32) -> Option<&str> {
    let index = (line as usize).checked_sub(1)?;
    source.lines().nth(index)
}

pub fn display_error(error: &Error, file: &str, source: &str) {
    /*
        Error: name (tip)
        -> prog.fool
           |
         3 | var x: int = true;
           | ^^^^^^^^^^^^^^^^^^
    */

    let line = error.get_line();
    let line_string = line.to_string();
    let padding = line_string.len() + 2;

    if let ErrorTip::None = error.get_tip() {
        println!("Error: {}", error.get_error_name());
    } else {
        println!("Error: {} ({})", error.get_error_name(), error.get_tip());
    }
    println!("-> {}", file);
    println!("{:>padding$}", "|");

    match get_line_text(source, line) {
        Some(text) => {
            let text = text.trim();
            println!("{} | {}", line_string, text);
            println!("{:>padding$} {}", "|", "^".repeat(text.len().max(1)));
        }
        None => println!("{} | {}", line_string, error),
    }
}
