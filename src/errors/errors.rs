use std::fmt::Display;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    internal_error: ErrorImpl,
    line: u32,
}

/// The compilation phase that produced an error.
///
/// Each phase keeps its own tally; a run with any resolution or type
/// error never reaches code generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPhase {
    Syntax,
    Resolution,
    Type,
    Internal,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, line: u32) -> Self {
        Error {
            internal_error: error_impl,
            line,
        }
    }

    pub fn get_line(&self) -> u32 {
        self.line
    }

    pub fn get_impl(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::AlreadyDeclared { .. } => "AlreadyDeclared",
            ErrorImpl::NotDeclared { .. } => "NotDeclared",
            ErrorImpl::ClassNotDeclared { .. } => "ClassNotDeclared",
            ErrorImpl::NotAClassVariable { .. } => "NotAClassVariable",
            ErrorImpl::MethodNotDeclared { .. } => "MethodNotDeclared",
            ErrorImpl::DuplicateField { .. } => "DuplicateField",
            ErrorImpl::DuplicateMethod { .. } => "DuplicateMethod",
            ErrorImpl::NonIntegerOperands { .. } => "NonIntegerOperands",
            ErrorImpl::NonBooleanOperands { .. } => "NonBooleanOperands",
            ErrorImpl::IncompatibleComparison { .. } => "IncompatibleComparison",
            ErrorImpl::NonBooleanCondition => "NonBooleanCondition",
            ErrorImpl::IncompatibleBranches { .. } => "IncompatibleBranches",
            ErrorImpl::IncompatibleValue { .. } => "IncompatibleValue",
            ErrorImpl::WrongReturnType { .. } => "WrongReturnType",
            ErrorImpl::NotAFunction { .. } => "NotAFunction",
            ErrorImpl::NotAClass { .. } => "NotAClass",
            ErrorImpl::NotAnObject { .. } => "NotAnObject",
            ErrorImpl::WrongArgumentCount { .. } => "WrongArgumentCount",
            ErrorImpl::ArgumentTypeMatchError { .. } => "ArgumentTypeMatchError",
            ErrorImpl::FunctionAsValue { .. } => "FunctionAsValue",
            ErrorImpl::ClassAsValue { .. } => "ClassAsValue",
            ErrorImpl::UndecoratedNode { .. } => "UndecoratedNode",
        }
    }

    pub fn get_phase(&self) -> ErrorPhase {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. }
            | ErrorImpl::UnexpectedToken { .. }
            | ErrorImpl::UnexpectedTokenDetailed { .. }
            | ErrorImpl::NumberParseError { .. } => ErrorPhase::Syntax,
            ErrorImpl::AlreadyDeclared { .. }
            | ErrorImpl::NotDeclared { .. }
            | ErrorImpl::ClassNotDeclared { .. }
            | ErrorImpl::NotAClassVariable { .. }
            | ErrorImpl::MethodNotDeclared { .. }
            | ErrorImpl::DuplicateField { .. }
            | ErrorImpl::DuplicateMethod { .. } => ErrorPhase::Resolution,
            ErrorImpl::UndecoratedNode { .. } => ErrorPhase::Internal,
            _ => ErrorPhase::Type,
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnexpectedToken { token } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, did you miss a semicolon?",
                token
            )),
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::AlreadyDeclared { kind, identifier } => ErrorTip::Suggestion(format!(
                "{} `{}` is already declared in this scope, the later declaration wins",
                kind, identifier
            )),
            ErrorImpl::NotDeclared { kind, identifier } => ErrorTip::Suggestion(format!(
                "{} `{}` is not visible from here, declare it in this or an enclosing scope",
                kind, identifier
            )),
            ErrorImpl::ClassNotDeclared { class } => ErrorTip::Suggestion(format!(
                "Classes must be declared right after the outermost `let`, `{}` is not one of them",
                class
            )),
            ErrorImpl::NotAClassVariable { receiver } => ErrorTip::Suggestion(format!(
                "`{}` does not have a class type, methods can only be invoked on objects",
                receiver
            )),
            ErrorImpl::MethodNotDeclared { class, method } => ErrorTip::Suggestion(format!(
                "Class `{}` has no method `{}`",
                class, method
            )),
            ErrorImpl::DuplicateField { class, field } => ErrorTip::Suggestion(format!(
                "Field `{}` appears twice in class `{}`",
                field, class
            )),
            ErrorImpl::DuplicateMethod { class, method } => ErrorTip::Suggestion(format!(
                "Method `{}` appears twice in class `{}`",
                method, class
            )),
            ErrorImpl::WrongArgumentCount { expected, received, .. } => ErrorTip::Suggestion(
                format!("Expected {} arguments, received {}", expected, received),
            ),
            ErrorImpl::ArgumentTypeMatchError { expected, received, .. } => {
                ErrorTip::Suggestion(format!(
                    "Expected argument type `{}`, received `{}`",
                    expected, received
                ))
            }
            ErrorImpl::IncompatibleValue { expected, received, .. }
            | ErrorImpl::WrongReturnType { expected, received, .. } => ErrorTip::Suggestion(
                format!("Expected type `{}`, received `{}`", expected, received),
            ),
            ErrorImpl::IncompatibleBranches { then_type, else_type } => {
                ErrorTip::Suggestion(format!(
                    "Branches have types `{}` and `{}`, neither is a subtype of the other",
                    then_type, else_type
                ))
            }
            ErrorImpl::FunctionAsValue { identifier } => ErrorTip::Suggestion(format!(
                "`{}` is a function, call it with `{}(...)`",
                identifier, identifier
            )),
            ErrorImpl::ClassAsValue { identifier } => ErrorTip::Suggestion(format!(
                "`{}` is a class, instantiate it with `new {}(...)`",
                identifier, identifier
            )),
            ErrorImpl::UndecoratedNode { .. } => ErrorTip::Suggestion(String::from(
                "Code generation reached a node that the earlier phases did not resolve",
            )),
            _ => ErrorTip::None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at line {}", self.internal_error, self.line)
    }
}

impl std::error::Error for Error {}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    // Syntax
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },

    // Resolution
    #[error("{kind} id {identifier} already declared")]
    AlreadyDeclared { kind: String, identifier: String },
    #[error("{kind} id {identifier} not declared")]
    NotDeclared { kind: String, identifier: String },
    #[error("class {class} not declared")]
    ClassNotDeclared { class: String },
    #[error("invocation of a method on non-class value {receiver}")]
    NotAClassVariable { receiver: String },
    #[error("method {method} not declared in class {class}")]
    MethodNotDeclared { class: String, method: String },
    #[error("field {field} of class {class} already declared")]
    DuplicateField { class: String, field: String },
    #[error("method {method} of class {class} already declared")]
    DuplicateMethod { class: String, method: String },

    // Type
    #[error("non integers in {operation}")]
    NonIntegerOperands { operation: String },
    #[error("non booleans in {operation}")]
    NonBooleanOperands { operation: String },
    #[error("incompatible types in {operation}")]
    IncompatibleComparison { operation: String },
    #[error("non boolean condition in if")]
    NonBooleanCondition,
    #[error("incompatible types in then-else branches")]
    IncompatibleBranches { then_type: String, else_type: String },
    #[error("incompatible value for variable {variable}")]
    IncompatibleValue {
        variable: String,
        expected: String,
        received: String,
    },
    #[error("wrong return type for {kind} {function}")]
    WrongReturnType {
        kind: String,
        function: String,
        expected: String,
        received: String,
    },
    #[error("invocation of a non-function {identifier}")]
    NotAFunction { identifier: String },
    #[error("instantiation of a non-class {identifier}")]
    NotAClass { identifier: String },
    #[error("invocation of method {method} on a non-object value")]
    NotAnObject { method: String },
    #[error("wrong number of parameters in the invocation of {callee}")]
    WrongArgumentCount {
        callee: String,
        expected: usize,
        received: usize,
    },
    #[error("wrong type for {position}-th parameter in the invocation of {callee}")]
    ArgumentTypeMatchError {
        callee: String,
        position: usize,
        expected: String,
        received: String,
    },
    #[error("wrong usage of function identifier {identifier}")]
    FunctionAsValue { identifier: String },
    #[error("wrong usage of class identifier {identifier}")]
    ClassAsValue { identifier: String },

    // Internal
    #[error("undecorated {node} reached code generation")]
    UndecoratedNode { node: String },
}
