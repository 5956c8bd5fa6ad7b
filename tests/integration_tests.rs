//! Integration tests for end-to-end compilation.
//!
//! These tests drive FOOL source through the whole pipeline (tokenization,
//! parsing, scope resolution, type checking, code generation) and execute
//! the result on the reference stack machine.

use fool::{
    compile,
    errors::errors::{Error, ErrorImpl, ErrorPhase},
    phase_tally, run,
    vm::{
        assembler::parse_assembly,
        instructions::to_assembly,
        vm::{ExecutionResult, VirtualMachine, VmError},
    },
    RunError,
};

fn top(source: &str) -> i32 {
    match run(source, Some("test.fool".to_string())) {
        Ok(ExecutionResult { top: Some(value), .. }) => value,
        Ok(result) => panic!("program left an empty stack: {:?}", result),
        Err(RunError::Compile(errors)) => panic!("compilation failed: {:?}", errors),
        Err(error) => panic!("{}", error),
    }
}

fn errors(source: &str) -> Vec<Error> {
    match compile(source, Some("test.fool".to_string())) {
        Ok(_) => panic!("expected compilation to fail"),
        Err(errors) => errors,
    }
}

#[test]
fn test_global_variable() {
    assert_eq!(top("let var x: int = 5; in x + 3;"), 8);
}

#[test]
fn test_conditional() {
    assert_eq!(top("let var b: bool = true; in if b then { 1 } else { 2 };"), 1);
    assert_eq!(top("let var b: bool = false; in if b then { 1 } else { 2 };"), 2);
}

#[test]
fn test_method_call_on_new_object() {
    let source = "
        let
          class Point(x: int, y: int) {
            fun getX: int() x;
          }
        in new Point(3, 4).getX();
    ";
    assert_eq!(top(source), 3);
}

#[test]
fn test_duplicate_declaration() {
    let errors = errors("let var y: int = 1; var y: int = true; in y;");

    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0].get_impl(), ErrorImpl::AlreadyDeclared { .. }));
    assert_eq!(errors[0].get_phase(), ErrorPhase::Resolution);
}

#[test]
fn test_incompatible_initializer() {
    let errors = errors("let var y: bool = 5; in y;");

    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0].get_impl(), ErrorImpl::IncompatibleValue { .. }));
}

#[test]
fn test_wrong_arity_generates_no_code() {
    let errors = errors("let fun f: int(a: int) a; in f(1, 2);");

    assert_eq!(phase_tally(&errors, ErrorPhase::Type), 1);
    assert!(matches!(
        errors[0].get_impl(),
        ErrorImpl::WrongArgumentCount {
            expected: 1,
            received: 2,
            ..
        }
    ));
}

#[test]
fn test_unknown_class() {
    let errors = errors("new Unknown();");

    // the type checker sees an incomplete tree and stays silent
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0].get_impl(), ErrorImpl::ClassNotDeclared { .. }));
}

#[test]
fn test_argument_coercion() {
    assert_eq!(top("let fun f: int(a: int) a + 1; in f(true);"), 2);

    let errors = errors("let class A() { } fun f: int(a: int) a; in f(new A());");
    assert!(matches!(
        errors[0].get_impl(),
        ErrorImpl::ArgumentTypeMatchError { position: 1, .. }
    ));
}

#[test]
fn test_dispatch_to_second_slot() {
    let source = "
        let
          class C() {
            fun m0: int() 10;
            fun m1: int() 20;
          }
          var c: C = new C();
        in c.m1();
    ";
    assert_eq!(top(source), 20);
}

#[test]
fn test_shadowing_at_runtime() {
    let source = "
        let
          var x: int = 1;
          fun f: int(x: int) x * 10;
        in f(5) + x;
    ";
    assert_eq!(top(source), 51);
}

#[test]
fn test_recursion() {
    let source = "
        let
          fun fact: int(n: int)
            if n <= 1 then { 1 } else { n * fact(n - 1) };
        in fact(5);
    ";
    assert_eq!(top(source), 120);
}

#[test]
fn test_nested_functions_use_static_link() {
    let source = "
        let
          fun outer: int(a: int, b: int)
            let
              var c: int = a * 2;
              fun inner: int(d: int) a + b + c + d;
            in inner(100);
        in outer(1, 10);
    ";
    assert_eq!(top(source), 113);
}

#[test]
fn test_fields_and_locals_inside_methods() {
    let source = "
        let
          class Rect(w: int, h: int) {
            fun area: int()
              let var scale: int = 2;
              in w * h * scale;
          }
          var r: Rect = new Rect(3, 5);
        in r.area();
    ";
    assert_eq!(top(source), 30);
}

#[test]
fn test_sibling_method_call() {
    let source = "
        let
          class Counter(start: int) {
            fun next: int(step: int) twice() + step;
            fun twice: int() start + start;
          }
        in new Counter(4).next(1);
    ";
    assert_eq!(top(source), 9);
}

#[test]
fn test_objects_as_fields_and_return_values() {
    let source = "
        let
          class Point(x: int, y: int) {
            fun getY: int() y;
          }
          class Box(p: Point) {
            fun peek: int() p.getY();
          }
          class Factory() {
            fun make: Point() new Point(7, 8);
          }
        in new Box(new Factory().make()).peek();
    ";
    assert_eq!(top(source), 8);
}

#[test]
fn test_chained_method_calls() {
    let source = "
        let
          class Point(x: int, y: int) {
            fun getX: int() x;
          }
          class Factory() {
            fun make: Point() new Point(7, 8);
          }
        in new Factory().make().getX();
    ";
    assert_eq!(top(source), 7);
}

#[test]
fn test_null_comparison() {
    let source = "
        let
          class A() { }
          var a: A = null;
          var b: A = new A();
        in if a == null then { if b == null then { 0 } else { 2 } } else { 1 };
    ";
    assert_eq!(top(source), 2);
}

#[test]
fn test_short_circuit() {
    // the right operands would divide by zero
    assert_eq!(top("false && (1 / 0 == 0);"), 0);
    assert_eq!(top("true || (1 / 0 == 0);"), 1);
    assert_eq!(top("true && !false;"), 1);
    assert_eq!(top("false || false;"), 0);
}

#[test]
fn test_comparisons() {
    assert_eq!(top("5 >= 3;"), 1);
    assert_eq!(top("3 >= 5;"), 0);
    assert_eq!(top("4 >= 4;"), 1);
    assert_eq!(top("4 <= -4;"), 0);
    assert_eq!(top("(2 == 2) == true;"), 1);

    // operands whose difference does not fit in an int
    assert_eq!(top("2000000000 >= -2000000000;"), 1);
    assert_eq!(top("-2000000000 >= 2000000000;"), 0);
    assert_eq!(top("-2000000000 <= 2000000000;"), 1);
    assert_eq!(top("-2147483648 >= 2147483647;"), 0);
}

#[test]
fn test_comparison_leaves_objects_intact() {
    let source = "
        let
          class P(a: int, b: int) {
            fun sum: int() a + b;
          }
          var p: P = new P(7, 9);
          var q: P = new P(3 >= 2, 10 >= 20);
        in if p.sum() >= 16 then { p.sum() * 10 + q.sum() } else { 0 };
    ";
    assert_eq!(top(source), 161);
}

#[test]
fn test_print_output() {
    let result = run("let var x: int = print(7); in print(x + 1);", None).unwrap();

    assert_eq!(
        result,
        ExecutionResult {
            output: vec![7, 8],
            top: Some(8),
        }
    );
}

#[test]
fn test_runtime_error() {
    let error = run("1 / 0;", None).unwrap_err();
    assert!(matches!(error, RunError::Vm(VmError::DivisionByZero { .. })));
}

#[test]
fn test_all_errors_are_reported() {
    let source = "
        let
          var a: int = missing;
          var b: bool = 3;
          fun f: bool() 1;
        in a;
    ";
    let errors = errors(source);

    assert_eq!(phase_tally(&errors, ErrorPhase::Resolution), 1);
    assert_eq!(phase_tally(&errors, ErrorPhase::Type), 2);
    assert_eq!(errors[1].get_line(), 4);
    assert_eq!(errors[2].get_line(), 5);
}

#[test]
fn test_assembly_text_runs_the_same() {
    let source = "
        let
          class C(v: int) {
            fun get: int() v;
          }
          fun g: int(c: C) c.get() * 2;
        in g(new C(21));
    ";
    let code = compile(source, None).unwrap();
    let reparsed = parse_assembly(&to_assembly(&code)).unwrap();
    assert_eq!(reparsed, code);

    let result = VirtualMachine::load(&reparsed).unwrap().run().unwrap();
    assert_eq!(result.top, Some(42));
}
