use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;

use crate::errors::errors::{Error, ErrorImpl};

use super::{instructions::Instruction, vm::VmError};

lazy_static! {
    static ref LABEL: Regex = Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*):$").unwrap();
    static ref INSTRUCTION: Regex =
        Regex::new(r"^([a-z]+)(?:\s+(-?[0-9]+|[A-Za-z_][A-Za-z0-9_]*))?$").unwrap();
    static ref NUMBER: Regex = Regex::new(r"^-?[0-9]+$").unwrap();
}

/// Executable form of an instruction: labels are gone and every jump
/// target is a code address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Push(i32),
    Pop,
    Add,
    Sub,
    Mult,
    Div,
    StoreWord,
    LoadWord,
    Branch(usize),
    BranchEqual(usize),
    BranchLessEqual(usize),
    JumpSubroutine,
    LoadRa,
    StoreRa,
    LoadTm,
    StoreTm,
    LoadFp,
    StoreFp,
    CopyFp,
    LoadHp,
    StoreHp,
    Print,
    Halt,
}

/// Parses assembly text, one instruction or label definition per line.
pub fn parse_assembly(source: &str) -> Result<Vec<Instruction>, Error> {
    let mut instructions = vec![];

    for (index, line) in source.lines().enumerate() {
        let line_number = index as u32 + 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(captures) = LABEL.captures(line) {
            instructions.push(Instruction::Label(captures[1].to_string()));
            continue;
        }

        let captures = INSTRUCTION.captures(line).ok_or_else(|| {
            Error::new(
                ErrorImpl::UnrecognisedToken {
                    token: line.to_string(),
                },
                line_number,
            )
        })?;
        let mnemonic = &captures[1];
        let operand = captures.get(2).map(|operand| operand.as_str());

        instructions.push(parse_instruction(mnemonic, operand, line_number)?);
    }

    Ok(instructions)
}

fn parse_instruction(mnemonic: &str, operand: Option<&str>, line: u32) -> Result<Instruction, Error> {
    let malformed = |message: &str| {
        Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: mnemonic.to_string(),
                message: message.to_string(),
            },
            line,
        )
    };

    let instruction = match (mnemonic, operand) {
        ("push", Some(operand)) if NUMBER.is_match(operand) => Instruction::Push(
            operand.parse().map_err(|_| {
                Error::new(
                    ErrorImpl::NumberParseError {
                        token: operand.to_string(),
                    },
                    line,
                )
            })?,
        ),
        ("push", Some(label)) => Instruction::PushLabel(label.to_string()),
        ("b", Some(label)) if !NUMBER.is_match(label) => Instruction::Branch(label.to_string()),
        ("beq", Some(label)) if !NUMBER.is_match(label) => Instruction::BranchEqual(label.to_string()),
        ("bleq", Some(label)) if !NUMBER.is_match(label) => {
            Instruction::BranchLessEqual(label.to_string())
        }
        ("push", None) => return Err(malformed("expected a number or a label")),
        ("b" | "beq" | "bleq", _) => return Err(malformed("expected a label")),
        (_, Some(_)) => return Err(malformed("this instruction takes no operand")),
        ("pop", None) => Instruction::Pop,
        ("add", None) => Instruction::Add,
        ("sub", None) => Instruction::Sub,
        ("mult", None) => Instruction::Mult,
        ("div", None) => Instruction::Div,
        ("sw", None) => Instruction::StoreWord,
        ("lw", None) => Instruction::LoadWord,
        ("js", None) => Instruction::JumpSubroutine,
        ("lra", None) => Instruction::LoadRa,
        ("sra", None) => Instruction::StoreRa,
        ("ltm", None) => Instruction::LoadTm,
        ("stm", None) => Instruction::StoreTm,
        ("lfp", None) => Instruction::LoadFp,
        ("sfp", None) => Instruction::StoreFp,
        ("cfp", None) => Instruction::CopyFp,
        ("lhp", None) => Instruction::LoadHp,
        ("shp", None) => Instruction::StoreHp,
        ("print", None) => Instruction::Print,
        ("halt", None) => Instruction::Halt,
        (_, None) => {
            return Err(Error::new(
                ErrorImpl::UnrecognisedToken {
                    token: mnemonic.to_string(),
                },
                line,
            ))
        }
    };

    Ok(instruction)
}

/// Resolves labels to code addresses.
///
/// A label's address is the index of the first instruction after it.
pub fn assemble(instructions: &[Instruction]) -> Result<Vec<Op>, VmError> {
    let mut labels = HashMap::new();
    let mut address = 0;
    for instruction in instructions {
        match instruction {
            Instruction::Label(label) => {
                if labels.insert(label.as_str(), address).is_some() {
                    return Err(VmError::DuplicateLabel {
                        label: label.clone(),
                    });
                }
            }
            _ => address += 1,
        }
    }

    let target = |label: &String| -> Result<usize, VmError> {
        labels
            .get(label.as_str())
            .copied()
            .ok_or_else(|| VmError::UnknownLabel {
                label: label.clone(),
            })
    };

    let mut code = Vec::with_capacity(address);
    for instruction in instructions {
        let op = match instruction {
            Instruction::Label(_) => continue,
            Instruction::Push(value) => Op::Push(*value),
            Instruction::PushLabel(label) => Op::Push(target(label)? as i32),
            Instruction::Pop => Op::Pop,
            Instruction::Add => Op::Add,
            Instruction::Sub => Op::Sub,
            Instruction::Mult => Op::Mult,
            Instruction::Div => Op::Div,
            Instruction::StoreWord => Op::StoreWord,
            Instruction::LoadWord => Op::LoadWord,
            Instruction::Branch(label) => Op::Branch(target(label)?),
            Instruction::BranchEqual(label) => Op::BranchEqual(target(label)?),
            Instruction::BranchLessEqual(label) => Op::BranchLessEqual(target(label)?),
            Instruction::JumpSubroutine => Op::JumpSubroutine,
            Instruction::LoadRa => Op::LoadRa,
            Instruction::StoreRa => Op::StoreRa,
            Instruction::LoadTm => Op::LoadTm,
            Instruction::StoreTm => Op::StoreTm,
            Instruction::LoadFp => Op::LoadFp,
            Instruction::StoreFp => Op::StoreFp,
            Instruction::CopyFp => Op::CopyFp,
            Instruction::LoadHp => Op::LoadHp,
            Instruction::StoreHp => Op::StoreHp,
            Instruction::Print => Op::Print,
            Instruction::Halt => Op::Halt,
        };
        code.push(op);
    }

    Ok(code)
}
