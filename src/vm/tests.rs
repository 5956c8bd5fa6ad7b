use super::{
    assembler::{assemble, parse_assembly, Op},
    instructions::{to_assembly, Instruction},
    vm::{ExecutionResult, VirtualMachine, VmError},
    MEMSIZE,
};
use crate::errors::errors::ErrorImpl;

fn run(source: &str) -> Result<ExecutionResult, VmError> {
    let instructions = parse_assembly(source).unwrap();
    VirtualMachine::load(&instructions)?.run()
}

#[test]
fn test_display() {
    assert_eq!(Instruction::Push(-4).to_string(), "push -4");
    assert_eq!(Instruction::PushLabel("function0".to_string()).to_string(), "push function0");
    assert_eq!(Instruction::BranchLessEqual("label3".to_string()).to_string(), "bleq label3");
    assert_eq!(Instruction::Label("label3".to_string()).to_string(), "label3:");
    assert_eq!(Instruction::CopyFp.to_string(), "cfp");
}

#[test]
fn test_to_assembly() {
    let code = vec![
        Instruction::Push(1),
        Instruction::Label("end".to_string()),
        Instruction::Halt,
    ];
    assert_eq!(to_assembly(&code), "push 1\nend:\nhalt\n");
}

#[test]
fn test_parse_assembly() {
    let source = "
        push 3
        push loop
        loop:
          beq done
        done:
        halt
    ";

    assert_eq!(
        parse_assembly(source).unwrap(),
        vec![
            Instruction::Push(3),
            Instruction::PushLabel("loop".to_string()),
            Instruction::Label("loop".to_string()),
            Instruction::BranchEqual("done".to_string()),
            Instruction::Label("done".to_string()),
            Instruction::Halt,
        ]
    );
}

#[test]
fn test_parse_assembly_reads_back_rendered_code() {
    let code = vec![
        Instruction::LoadFp,
        Instruction::Push(-2),
        Instruction::Branch("label0".to_string()),
        Instruction::Label("label0".to_string()),
        Instruction::StoreTm,
        Instruction::Halt,
    ];
    assert_eq!(parse_assembly(&to_assembly(&code)).unwrap(), code);
}

#[test]
fn test_parse_assembly_errors() {
    let error = parse_assembly("push 1\njump\n").unwrap_err();
    assert!(matches!(error.get_impl(), ErrorImpl::UnrecognisedToken { .. }));
    assert_eq!(error.get_line(), 2);

    let error = parse_assembly("add 4").unwrap_err();
    assert!(matches!(error.get_impl(), ErrorImpl::UnexpectedTokenDetailed { .. }));

    let error = parse_assembly("beq 12").unwrap_err();
    assert!(matches!(error.get_impl(), ErrorImpl::UnexpectedTokenDetailed { .. }));

    let error = parse_assembly("push").unwrap_err();
    assert!(matches!(error.get_impl(), ErrorImpl::UnexpectedTokenDetailed { .. }));

    let error = parse_assembly("push 99999999999").unwrap_err();
    assert!(matches!(error.get_impl(), ErrorImpl::NumberParseError { .. }));
}

#[test]
fn test_assemble_resolves_labels() {
    let code = parse_assembly("start:\npush start\nb end\npush 5\nend:\nhalt").unwrap();

    assert_eq!(
        assemble(&code).unwrap(),
        vec![Op::Push(0), Op::Branch(3), Op::Push(5), Op::Halt]
    );
}

#[test]
fn test_assemble_errors() {
    let code = vec![Instruction::Branch("nowhere".to_string())];
    assert_eq!(
        assemble(&code),
        Err(VmError::UnknownLabel {
            label: "nowhere".to_string()
        })
    );

    let code = vec![
        Instruction::Label("twice".to_string()),
        Instruction::Label("twice".to_string()),
    ];
    assert_eq!(
        assemble(&code),
        Err(VmError::DuplicateLabel {
            label: "twice".to_string()
        })
    );
}

#[test]
fn test_arithmetic() {
    let result = run("push 7\npush 3\nsub\npush 6\nmult\npush 5\ndiv\nhalt").unwrap();
    assert_eq!(result.top, Some(4));
    assert!(result.output.is_empty());
}

#[test]
fn test_branches_compare_second_against_top() {
    // 2 <= 5 holds, so the jump skips the push of 0
    let result = run("push 2\npush 5\nbleq yes\npush 0\nhalt\nyes:\npush 1\nhalt").unwrap();
    assert_eq!(result.top, Some(1));

    let result = run("push 5\npush 2\nbleq yes\npush 0\nhalt\nyes:\npush 1\nhalt").unwrap();
    assert_eq!(result.top, Some(0));

    let result = run("push 4\npush 4\nbeq yes\npush 0\nhalt\nyes:\npush 1\nhalt").unwrap();
    assert_eq!(result.top, Some(1));
}

#[test]
fn test_memory_and_heap() {
    // store 9 at the current heap pointer, bump it, then read the cell back
    let result = run("push 9\nlhp\nsw\nlhp\npush 1\nadd\nshp\npush 0\nlw\nhalt").unwrap();
    assert_eq!(result.top, Some(9));
}

#[test]
fn test_subroutine_returns_through_ra() {
    let source = "
        push body
        js
        halt
        body:
        push 42
        lra
        js
    ";
    assert_eq!(run(source).unwrap().top, Some(42));
}

#[test]
fn test_print_does_not_pop() {
    let result = run("push 3\nprint\npush 4\nprint\nadd\nhalt").unwrap();
    assert_eq!(
        result,
        ExecutionResult {
            output: vec![3, 4],
            top: Some(7),
        }
    );
}

#[test]
fn test_empty_stack_on_halt() {
    assert_eq!(run("halt").unwrap().top, None);
}

#[test]
fn test_division_by_zero() {
    assert_eq!(
        run("push 1\npush 0\ndiv\nhalt"),
        Err(VmError::DivisionByZero { ip: 2 })
    );
}

#[test]
fn test_pop_from_empty_stack() {
    assert_eq!(run("pop\nhalt"), Err(VmError::OutOfBounds { address: MEMSIZE }));
}

#[test]
fn test_missing_halt() {
    assert_eq!(run("push 1"), Err(VmError::EndOfCode));
}

#[test]
fn test_invalid_jump() {
    assert_eq!(run("push 100\njs\nhalt"), Err(VmError::InvalidJump { address: 100 }));
}

#[test]
fn test_stack_meets_heap() {
    // move the heap pointer up to the stack base, then push once more
    let source = format!("push {}\nshp\npush 1\nhalt", MEMSIZE);
    assert!(matches!(run(&source), Err(VmError::StackOverflow { .. })));
}
