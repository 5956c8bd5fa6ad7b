use thiserror::Error;

use super::{
    assembler::{assemble, Op},
    instructions::Instruction,
    MEMSIZE,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VmError {
    #[error("stack overflow: stack pointer {sp} reached the heap at {hp}")]
    StackOverflow { sp: i32, hp: i32 },
    #[error("memory access out of bounds at address {address}")]
    OutOfBounds { address: i32 },
    #[error("division by zero at code address {ip}")]
    DivisionByZero { ip: usize },
    #[error("unknown label {label}")]
    UnknownLabel { label: String },
    #[error("label {label} defined twice")]
    DuplicateLabel { label: String },
    #[error("jump to {address}, outside of the code")]
    InvalidJump { address: i32 },
    #[error("execution ran past the end of the code without halting")]
    EndOfCode,
}

/// What a halted program leaves behind: every value recorded by `print`,
/// in order, and the top of the stack if the stack is not empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExecutionResult {
    pub output: Vec<i32>,
    pub top: Option<i32>,
}

#[derive(Debug)]
pub struct VirtualMachine {
    code: Vec<Op>,
    memory: Vec<i32>,
    ip: usize,
    sp: i32,
    fp: i32,
    hp: i32,
    ra: i32,
    tm: i32,
    output: Vec<i32>,
}

impl VirtualMachine {
    pub fn new(code: Vec<Op>) -> Self {
        VirtualMachine {
            code,
            memory: vec![0; MEMSIZE as usize],
            ip: 0,
            sp: MEMSIZE,
            fp: MEMSIZE,
            hp: 0,
            ra: 0,
            tm: 0,
            output: vec![],
        }
    }

    /// Assembles and loads a program.
    pub fn load(instructions: &[Instruction]) -> Result<Self, VmError> {
        Ok(Self::new(assemble(instructions)?))
    }

    fn read(&self, address: i32) -> Result<i32, VmError> {
        if (0..MEMSIZE).contains(&address) {
            Ok(self.memory[address as usize])
        } else {
            Err(VmError::OutOfBounds { address })
        }
    }

    fn write(&mut self, address: i32, value: i32) -> Result<(), VmError> {
        if (0..MEMSIZE).contains(&address) {
            self.memory[address as usize] = value;
            Ok(())
        } else {
            Err(VmError::OutOfBounds { address })
        }
    }

    fn push(&mut self, value: i32) -> Result<(), VmError> {
        if self.sp - 1 < self.hp {
            return Err(VmError::StackOverflow {
                sp: self.sp,
                hp: self.hp,
            });
        }
        self.sp -= 1;
        self.write(self.sp, value)
    }

    fn pop(&mut self) -> Result<i32, VmError> {
        let value = self.read(self.sp)?;
        self.sp += 1;
        Ok(value)
    }

    fn jump(&mut self, address: i32) -> Result<(), VmError> {
        match usize::try_from(address) {
            Ok(target) if target < self.code.len() => {
                self.ip = target;
                Ok(())
            }
            _ => Err(VmError::InvalidJump { address }),
        }
    }

    /// Pops `b` then `a` and returns `(a, b)`.
    fn pop_operands(&mut self) -> Result<(i32, i32), VmError> {
        let b = self.pop()?;
        let a = self.pop()?;
        Ok((a, b))
    }

    /// Runs until `halt`.
    pub fn run(&mut self) -> Result<ExecutionResult, VmError> {
        loop {
            let op = *self.code.get(self.ip).ok_or(VmError::EndOfCode)?;
            let current = self.ip;
            self.ip += 1;

            match op {
                Op::Push(value) => self.push(value)?,
                Op::Pop => {
                    self.pop()?;
                }
                Op::Add => {
                    let (a, b) = self.pop_operands()?;
                    self.push(a.wrapping_add(b))?;
                }
                Op::Sub => {
                    let (a, b) = self.pop_operands()?;
                    self.push(a.wrapping_sub(b))?;
                }
                Op::Mult => {
                    let (a, b) = self.pop_operands()?;
                    self.push(a.wrapping_mul(b))?;
                }
                Op::Div => {
                    let (a, b) = self.pop_operands()?;
                    if b == 0 {
                        return Err(VmError::DivisionByZero { ip: current });
                    }
                    self.push(a.wrapping_div(b))?;
                }
                Op::StoreWord => {
                    let address = self.pop()?;
                    let value = self.pop()?;
                    self.write(address, value)?;
                }
                Op::LoadWord => {
                    let address = self.pop()?;
                    let value = self.read(address)?;
                    self.push(value)?;
                }
                Op::Branch(target) => self.ip = target,
                Op::BranchEqual(target) => {
                    let (a, b) = self.pop_operands()?;
                    if a == b {
                        self.ip = target;
                    }
                }
                Op::BranchLessEqual(target) => {
                    let (a, b) = self.pop_operands()?;
                    if a <= b {
                        self.ip = target;
                    }
                }
                Op::JumpSubroutine => {
                    let address = self.pop()?;
                    self.ra = self.ip as i32;
                    self.jump(address)?;
                }
                Op::LoadRa => self.push(self.ra)?,
                Op::StoreRa => self.ra = self.pop()?,
                Op::LoadTm => self.push(self.tm)?,
                Op::StoreTm => self.tm = self.pop()?,
                Op::LoadFp => self.push(self.fp)?,
                Op::StoreFp => self.fp = self.pop()?,
                Op::CopyFp => self.fp = self.sp,
                Op::LoadHp => self.push(self.hp)?,
                Op::StoreHp => self.hp = self.pop()?,
                Op::Print => {
                    let value = self.read(self.sp)?;
                    self.output.push(value);
                }
                Op::Halt => {
                    let top = if self.sp < MEMSIZE {
                        Some(self.memory[self.sp as usize])
                    } else {
                        None
                    };
                    return Ok(ExecutionResult {
                        output: std::mem::take(&mut self.output),
                        top,
                    });
                }
            }
        }
    }
}
