use std::rc::Rc;

use super::ast::{Binding, Resolution};

/// Expression node. Every node carries the source line of its defining token.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Int(i32),
    Bool(bool),
    Null,
    Binary(BinaryExpr),
    Not(Box<Expr>),
    If(IfExpr),
    Print(Box<Expr>),
    Id(IdExpr),
    Call(CallExpr),
    New(NewExpr),
    MethodCall(MethodCallExpr),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Plus,
    Minus,
    Times,
    Div,
    Equal,
    LessEqual,
    GreaterEqual,
    And,
    Or,
}

impl BinaryOperator {
    /// Name of the operation as used in diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            BinaryOperator::Plus => "sum",
            BinaryOperator::Minus => "minus",
            BinaryOperator::Times => "multiplication",
            BinaryOperator::Div => "division",
            BinaryOperator::Equal => "equal",
            BinaryOperator::LessEqual => "lesser-equal",
            BinaryOperator::GreaterEqual => "greater-equal",
            BinaryOperator::And => "AND",
            BinaryOperator::Or => "OR",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub operator: BinaryOperator,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfExpr {
    pub condition: Box<Expr>,
    pub then_branch: Box<Expr>,
    pub else_branch: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IdExpr {
    pub name: String,
    pub resolution: Option<Resolution>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub name: String,
    pub arguments: Vec<Expr>,
    pub resolution: Option<Resolution>,
}

/// `new C(args)`. The resolution points at the class entry in the global frame.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpr {
    pub class_name: String,
    pub arguments: Vec<Expr>,
    pub resolution: Option<Resolution>,
}

/// `receiver.method(args)`.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodCallExpr {
    pub receiver: Box<Expr>,
    pub method: String,
    pub arguments: Vec<Expr>,
    /// Entry of the method in the receiver class's virtual table.
    pub method_entry: Option<Rc<Binding>>,
}

impl Expr {
    pub fn new(kind: ExprKind, line: u32) -> Self {
        Expr { kind, line }
    }

    pub fn int(value: i32, line: u32) -> Self {
        Expr::new(ExprKind::Int(value), line)
    }

    pub fn bool(value: bool, line: u32) -> Self {
        Expr::new(ExprKind::Bool(value), line)
    }

    pub fn id(name: &str, line: u32) -> Self {
        Expr::new(
            ExprKind::Id(IdExpr {
                name: name.to_string(),
                resolution: None,
            }),
            line,
        )
    }

    pub fn binary(operator: BinaryOperator, left: Expr, right: Expr, line: u32) -> Self {
        Expr::new(
            ExprKind::Binary(BinaryExpr {
                operator,
                left: Box::new(left),
                right: Box::new(right),
            }),
            line,
        )
    }

    pub fn call(name: &str, arguments: Vec<Expr>, line: u32) -> Self {
        Expr::new(
            ExprKind::Call(CallExpr {
                name: name.to_string(),
                arguments,
                resolution: None,
            }),
            line,
        )
    }

    pub fn new_object(class_name: &str, arguments: Vec<Expr>, line: u32) -> Self {
        Expr::new(
            ExprKind::New(NewExpr {
                class_name: class_name.to_string(),
                arguments,
                resolution: None,
            }),
            line,
        )
    }

    pub fn method_call(receiver: Expr, method: &str, arguments: Vec<Expr>, line: u32) -> Self {
        Expr::new(
            ExprKind::MethodCall(MethodCallExpr {
                receiver: Box::new(receiver),
                method: method.to_string(),
                arguments,
                method_entry: None,
            }),
            line,
        )
    }
}
