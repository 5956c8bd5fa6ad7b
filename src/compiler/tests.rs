//! Unit tests for code generation.
//!
//! These check the emitted instruction shapes; running the code is covered
//! by the integration tests.

use std::{collections::HashSet, rc::Rc};

use super::{
    compiler::{generate, CodeBuffer},
    decl::gen_class,
};
use crate::{
    ast::{ast::Program, expressions::Expr},
    errors::errors::ErrorImpl,
    lexer::lexer::tokenize,
    parser::parser::parse,
    resolver::resolver::resolve,
    vm::{instructions::Instruction, MEMSIZE},
};

fn generate_source(source: &str) -> Vec<Instruction> {
    let tokens = tokenize(source.to_string(), None).unwrap();
    let (_, program) = parse(tokens, Rc::new("test.fool".to_string()));
    let mut program = program.unwrap();
    let (_, errors) = resolve(&mut program);
    assert!(errors.is_empty(), "{:?}", errors);
    generate(&program).unwrap()
}

fn labels(code: &[Instruction]) -> Vec<String> {
    code.iter()
        .filter_map(|instruction| match instruction {
            Instruction::Label(label) => Some(label.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn test_fresh_labels() {
    let mut buffer = CodeBuffer::new();

    assert_eq!(buffer.fresh_label(), "label0");
    assert_eq!(buffer.fresh_label(), "label1");
    assert_eq!(buffer.fresh_function_label(), "function0");
    assert_eq!(buffer.fresh_label(), "label2");
}

#[test]
fn test_bare_expression() {
    assert_eq!(
        generate_source("1 + 2 * 3;"),
        vec![
            Instruction::Push(1),
            Instruction::Push(2),
            Instruction::Push(3),
            Instruction::Mult,
            Instruction::Add,
            Instruction::Halt,
        ]
    );
}

#[test]
fn test_global_variable_access() {
    assert_eq!(
        generate_source("let var x: int = 5; in x;"),
        vec![
            Instruction::Push(0),
            Instruction::Push(5),
            Instruction::Push(MEMSIZE - 2),
            Instruction::LoadWord,
            Instruction::Halt,
        ]
    );
}

#[test]
fn test_literals() {
    assert_eq!(
        generate_source("print(true);"),
        vec![Instruction::Push(1), Instruction::Print, Instruction::Halt]
    );
    assert_eq!(generate_source("null;")[0], Instruction::Push(-1));
}

#[test]
fn test_function_layout() {
    let code = generate_source("let fun f: int(a: int, b: int) let var c: int = a; in c; in f(1, 2);");

    let halt = code
        .iter()
        .position(|instruction| *instruction == Instruction::Halt)
        .unwrap();
    // The function body comes after the main program
    assert_eq!(code[halt + 1], Instruction::Label("function0".to_string()));
    assert_eq!(code[1], Instruction::PushLabel("function0".to_string()));

    let epilogue = &code[code.len() - 10..];
    assert_eq!(
        epilogue,
        &[
            Instruction::StoreTm,
            Instruction::Pop,
            Instruction::StoreRa,
            Instruction::Pop,
            Instruction::Pop,
            Instruction::Pop,
            Instruction::StoreFp,
            Instruction::LoadTm,
            Instruction::LoadRa,
            Instruction::JumpSubroutine,
        ]
    );
}

#[test]
fn test_call_pushes_arguments_in_reverse() {
    let code = generate_source("let fun f: int(a: int, b: int) a; in f(1, 2);");

    assert_eq!(
        &code[2..13],
        &[
            Instruction::LoadFp,
            Instruction::Push(2),
            Instruction::Push(1),
            Instruction::Push(MEMSIZE),
            Instruction::StoreTm,
            Instruction::LoadTm,
            Instruction::LoadTm,
            Instruction::Push(-2),
            Instruction::Add,
            Instruction::LoadWord,
            Instruction::JumpSubroutine,
        ]
    );
}

#[test]
fn test_nested_access_follows_static_chain() {
    let code = generate_source(
        "let fun outer: int(a: int) let fun inner: int() a; in inner(); in outer(1);",
    );

    // `a` inside `inner` is one hop away
    let window = [
        Instruction::LoadFp,
        Instruction::LoadWord,
        Instruction::Push(1),
        Instruction::Add,
        Instruction::LoadWord,
    ];
    assert!(code.windows(window.len()).any(|slice| slice == window));
}

#[test]
fn test_class_builds_dispatch_table() {
    let code = generate_source(
        "let class C() { fun m0: int() 0; fun m1: int() 1; } in 1;",
    );

    assert_eq!(
        &code[1..16],
        &[
            Instruction::LoadHp,
            Instruction::PushLabel("function0".to_string()),
            Instruction::LoadHp,
            Instruction::StoreWord,
            Instruction::LoadHp,
            Instruction::Push(1),
            Instruction::Add,
            Instruction::StoreHp,
            Instruction::PushLabel("function1".to_string()),
            Instruction::LoadHp,
            Instruction::StoreWord,
            Instruction::LoadHp,
            Instruction::Push(1),
            Instruction::Add,
            Instruction::StoreHp,
        ]
    );
}

#[test]
fn test_new_reads_dispatch_table_from_global_slot() {
    let code = generate_source("let class P(x: int) { } in new P(7);");

    let window = [
        Instruction::Push(MEMSIZE - 2),
        Instruction::LoadWord,
        Instruction::LoadHp,
        Instruction::StoreWord,
    ];
    assert!(code.windows(window.len()).any(|slice| slice == window));
}

#[test]
fn test_method_call_dispatches_through_object() {
    let code = generate_source(
        "let class P() { fun a: int() 0; fun b: int() 1; } var p: P = new P(); in p.b();",
    );

    let window = [
        Instruction::StoreTm,
        Instruction::LoadTm,
        Instruction::LoadTm,
        Instruction::LoadWord,
        Instruction::Push(1),
        Instruction::Add,
        Instruction::LoadWord,
        Instruction::JumpSubroutine,
    ];
    assert!(code.windows(window.len()).any(|slice| slice == window));
}

#[test]
fn test_labels_are_unique() {
    let code = generate_source(
        "let fun f: bool(a: int) if a >= 1 && a <= 5 || a == 9 then { true } else { !false }; in f(1) == f(2);",
    );

    let all = labels(&code);
    let unique: HashSet<&String> = all.iter().collect();
    assert_eq!(all.len(), unique.len());
}

#[test]
fn test_runs_are_independent() {
    let source = "let fun f: int(a: int) if a == 0 then { 1 } else { 2 }; in f(0);";
    assert_eq!(generate_source(source), generate_source(source));
}

#[test]
fn test_undecorated_node_is_rejected() {
    let program = Program::Body(Expr::id("x", 3));
    let error = generate(&program).unwrap_err();

    assert!(matches!(error.get_impl(), ErrorImpl::UndecoratedNode { .. }));
    assert_eq!(error.get_line(), 3);
}

#[test]
fn test_greater_equal_swaps_operands_without_subtracting() {
    assert_eq!(
        generate_source("4 >= 3;"),
        vec![
            Instruction::Push(4),
            Instruction::Push(3),
            Instruction::StoreTm,
            Instruction::LoadHp,
            Instruction::StoreWord,
            Instruction::LoadTm,
            Instruction::LoadHp,
            Instruction::LoadWord,
            Instruction::BranchLessEqual("label0".to_string()),
            Instruction::Push(0),
            Instruction::Branch("label1".to_string()),
            Instruction::Label("label0".to_string()),
            Instruction::Push(1),
            Instruction::Label("label1".to_string()),
            Instruction::Halt,
        ]
    );
}

#[test]
fn test_method_labels_are_recorded() {
    let source = "let class C() { fun m0: int() 0; fun m1: int() 1; } in 1;";
    let tokens = tokenize(source.to_string(), None).unwrap();
    let (_, program) = parse(tokens, Rc::new("test.fool".to_string()));
    let mut program = program.unwrap();
    let (_, errors) = resolve(&mut program);
    assert!(errors.is_empty(), "{:?}", errors);

    let class = match &program {
        Program::LetIn { classes, .. } => &classes[0],
        Program::Body(_) => panic!("expected a let block"),
    };

    let mut buffer = CodeBuffer::new();
    let code = gen_class(&mut buffer, class).unwrap();

    assert_eq!(buffer.method_label("C", "m0"), Some("function0"));
    assert_eq!(buffer.method_label("C", "m1"), Some("function1"));
    assert_eq!(buffer.method_label("C", "m2"), None);
    assert_eq!(code[1], Instruction::PushLabel("function0".to_string()));
}
