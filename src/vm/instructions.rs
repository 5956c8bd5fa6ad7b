use std::fmt::Display;

/// One line of stack machine assembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    Push(i32),
    /// Pushes the code address of a label.
    PushLabel(String),
    Pop,
    Add,
    Sub,
    Mult,
    Div,
    /// Pops an address, then a value, and stores the value at the address.
    StoreWord,
    /// Pops an address and pushes the value stored there.
    LoadWord,
    Branch(String),
    /// Pops `b` then `a`, jumps if `a == b`.
    BranchEqual(String),
    /// Pops `b` then `a`, jumps if `a <= b`.
    BranchLessEqual(String),
    /// Pops a code address, saves the next instruction in `ra` and jumps.
    JumpSubroutine,
    LoadRa,
    StoreRa,
    LoadTm,
    StoreTm,
    LoadFp,
    StoreFp,
    /// Sets `fp` to `sp`.
    CopyFp,
    LoadHp,
    StoreHp,
    /// Records the top of the stack without popping it.
    Print,
    Halt,
    Label(String),
}

impl Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Instruction::Push(value) => write!(f, "push {}", value),
            Instruction::PushLabel(label) => write!(f, "push {}", label),
            Instruction::Pop => write!(f, "pop"),
            Instruction::Add => write!(f, "add"),
            Instruction::Sub => write!(f, "sub"),
            Instruction::Mult => write!(f, "mult"),
            Instruction::Div => write!(f, "div"),
            Instruction::StoreWord => write!(f, "sw"),
            Instruction::LoadWord => write!(f, "lw"),
            Instruction::Branch(label) => write!(f, "b {}", label),
            Instruction::BranchEqual(label) => write!(f, "beq {}", label),
            Instruction::BranchLessEqual(label) => write!(f, "bleq {}", label),
            Instruction::JumpSubroutine => write!(f, "js"),
            Instruction::LoadRa => write!(f, "lra"),
            Instruction::StoreRa => write!(f, "sra"),
            Instruction::LoadTm => write!(f, "ltm"),
            Instruction::StoreTm => write!(f, "stm"),
            Instruction::LoadFp => write!(f, "lfp"),
            Instruction::StoreFp => write!(f, "sfp"),
            Instruction::CopyFp => write!(f, "cfp"),
            Instruction::LoadHp => write!(f, "lhp"),
            Instruction::StoreHp => write!(f, "shp"),
            Instruction::Print => write!(f, "print"),
            Instruction::Halt => write!(f, "halt"),
            Instruction::Label(label) => write!(f, "{}:", label),
        }
    }
}

/// Renders a program one instruction per line.
pub fn to_assembly(instructions: &[Instruction]) -> String {
    instructions
        .iter()
        .map(|instruction| format!("{}\n", instruction))
        .collect()
}
