//! Unit tests for error handling.
//!
//! This module contains tests for error types and error reporting.

use crate::errors::errors::{Error, ErrorImpl, ErrorPhase, ErrorTip};

#[test]
fn test_error_creation() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "@".to_string(),
        },
        10,
    );

    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert_eq!(error.get_phase(), ErrorPhase::Syntax);
}

#[test]
fn test_error_line() {
    let error = Error::new(
        ErrorImpl::UnexpectedToken {
            token: "identifier".to_string(),
        },
        42,
    );

    assert_eq!(error.get_line(), 42);
}

#[test]
fn test_error_display_mentions_identifier_and_line() {
    let error = Error::new(
        ErrorImpl::NotDeclared {
            kind: "Var or Par".to_string(),
            identifier: "foo".to_string(),
        },
        7,
    );

    assert_eq!(error.to_string(), "Var or Par id foo not declared at line 7");
}

#[test]
fn test_already_declared_error() {
    let error = Error::new(
        ErrorImpl::AlreadyDeclared {
            kind: "Var".to_string(),
            identifier: "y".to_string(),
        },
        2,
    );

    assert_eq!(error.get_error_name(), "AlreadyDeclared");
    assert_eq!(error.get_phase(), ErrorPhase::Resolution);
    assert_eq!(error.to_string(), "Var id y already declared at line 2");
}

#[test]
fn test_resolution_phase_errors() {
    let errors = [
        ErrorImpl::ClassNotDeclared {
            class: "Unknown".to_string(),
        },
        ErrorImpl::NotAClassVariable {
            receiver: "x".to_string(),
        },
        ErrorImpl::MethodNotDeclared {
            class: "Point".to_string(),
            method: "getZ".to_string(),
        },
        ErrorImpl::DuplicateField {
            class: "Point".to_string(),
            field: "x".to_string(),
        },
        ErrorImpl::DuplicateMethod {
            class: "Point".to_string(),
            method: "getX".to_string(),
        },
    ];

    for error in errors {
        assert_eq!(Error::new(error, 1).get_phase(), ErrorPhase::Resolution);
    }
}

#[test]
fn test_type_phase_errors() {
    let errors = [
        ErrorImpl::NonIntegerOperands {
            operation: "sum".to_string(),
        },
        ErrorImpl::NonBooleanCondition,
        ErrorImpl::WrongArgumentCount {
            callee: "f".to_string(),
            expected: 1,
            received: 2,
        },
        ErrorImpl::FunctionAsValue {
            identifier: "f".to_string(),
        },
    ];

    for error in errors {
        assert_eq!(Error::new(error, 1).get_phase(), ErrorPhase::Type);
    }
}

#[test]
fn test_argument_type_error_reports_position() {
    let error = Error::new(
        ErrorImpl::ArgumentTypeMatchError {
            callee: "f".to_string(),
            position: 2,
            expected: "int".to_string(),
            received: "Point".to_string(),
        },
        4,
    );

    assert_eq!(
        error.to_string(),
        "wrong type for 2-th parameter in the invocation of f at line 4"
    );
    assert_eq!(
        error.get_tip().to_string(),
        "Expected argument type `int`, received `Point`"
    );
}

#[test]
fn test_undecorated_node_is_internal() {
    let error = Error::new(
        ErrorImpl::UndecoratedNode {
            node: "identifier x".to_string(),
        },
        0,
    );

    assert_eq!(error.get_phase(), ErrorPhase::Internal);
}

#[test]
fn test_error_tip_none() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "@".to_string(),
        },
        0,
    );

    assert!(matches!(error.get_tip(), ErrorTip::None));
}

#[test]
fn test_error_tip_suggestion() {
    let error = Error::new(
        ErrorImpl::UnexpectedToken {
            token: "}".to_string(),
        },
        0,
    );

    match error.get_tip() {
        ErrorTip::Suggestion(_) => (),
        _ => panic!("Expected suggestion tip"),
    }
}

#[test]
fn test_error_tip_display() {
    let tip = ErrorTip::Suggestion("Try this instead".to_string());
    assert_eq!(tip.to_string(), "Try this instead");

    let tip = ErrorTip::None;
    assert_eq!(tip.to_string(), "");
}
