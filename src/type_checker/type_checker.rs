use crate::{
    ast::{
        ast::Program,
        declarations::{ClassDecl, Decl, FunDecl, MethodDecl, VarDecl},
        expressions::{BinaryExpr, BinaryOperator, Expr, ExprKind, IfExpr, MethodCallExpr},
        types::{is_subtype, Type},
    },
    errors::errors::{Error, ErrorImpl},
};

/// Why checking a declaration stopped.
///
/// `Incomplete` means the tree still has an unresolved use site. The
/// resolver has already reported it, so it is dropped at the declaration
/// boundary without a diagnostic of its own.
#[derive(Debug)]
pub enum TypeCheckError {
    Incomplete,
    Type(Error),
}

impl From<Error> for TypeCheckError {
    fn from(error: Error) -> Self {
        TypeCheckError::Type(error)
    }
}

pub type TypeResult<T> = Result<T, TypeCheckError>;

#[derive(Debug, Default)]
pub struct TypeChecker {
    pub errors: Vec<Error>,
}

impl TypeChecker {
    pub fn new() -> Self {
        TypeChecker { errors: vec![] }
    }

    /// Declaration-level recovery boundary.
    fn absorb(&mut self, result: TypeResult<()>) {
        if let Err(TypeCheckError::Type(error)) = result {
            self.errors.push(error);
        }
    }
}

fn fail<T>(error: ErrorImpl, line: u32) -> TypeResult<T> {
    Err(TypeCheckError::Type(Error::new(error, line)))
}

/// Checks a resolved program and returns every type error found.
///
/// A failing declaration never stops the check of its siblings.
pub fn type_check(program: &Program) -> Vec<Error> {
    let mut type_checker = TypeChecker::new();

    match program {
        Program::LetIn {
            classes,
            declarations,
            body,
        } => {
            for class in classes {
                type_check_class(&mut type_checker, class);
            }
            type_check_decls(&mut type_checker, declarations);
            let result = type_check_expr(body).map(|_| ());
            type_checker.absorb(result);
        }
        Program::Body(body) => {
            let result = type_check_expr(body).map(|_| ());
            type_checker.absorb(result);
        }
    }

    type_checker.errors
}

fn type_check_decls(type_checker: &mut TypeChecker, declarations: &[Decl]) {
    for declaration in declarations {
        let result = match declaration {
            Decl::Var(var) => type_check_var(var),
            Decl::Fun(fun) => type_check_fun(type_checker, fun),
        };
        type_checker.absorb(result);
    }
}

fn type_check_var(var: &VarDecl) -> TypeResult<()> {
    let value = type_check_expr(&var.value)?;
    if !is_subtype(&value, &var.ty) {
        return fail(
            ErrorImpl::IncompatibleValue {
                variable: var.name.clone(),
                expected: var.ty.to_string(),
                received: value.to_string(),
            },
            var.line,
        );
    }

    Ok(())
}

fn type_check_fun(type_checker: &mut TypeChecker, fun: &FunDecl) -> TypeResult<()> {
    type_check_decls(type_checker, &fun.declarations);
    check_return("function", &fun.name, &fun.return_type, &fun.body, fun.line)
}

fn type_check_class(type_checker: &mut TypeChecker, class: &ClassDecl) {
    for method in &class.methods {
        let result = type_check_method(type_checker, method);
        type_checker.absorb(result);
    }
}

fn type_check_method(type_checker: &mut TypeChecker, method: &MethodDecl) -> TypeResult<()> {
    type_check_decls(type_checker, &method.declarations);
    check_return("method", &method.name, &method.return_type, &method.body, method.line)
}

fn check_return(kind: &str, name: &str, expected: &Type, body: &Expr, line: u32) -> TypeResult<()> {
    let received = type_check_expr(body)?;
    if !is_subtype(&received, expected) {
        return fail(
            ErrorImpl::WrongReturnType {
                kind: kind.to_string(),
                function: name.to_string(),
                expected: expected.to_string(),
                received: received.to_string(),
            },
            line,
        );
    }

    Ok(())
}

pub fn type_check_expr(expr: &Expr) -> TypeResult<Type> {
    let line = expr.line;
    match &expr.kind {
        ExprKind::Int(_) => Ok(Type::Int),
        ExprKind::Bool(_) => Ok(Type::Bool),
        ExprKind::Null => Ok(Type::Empty),
        ExprKind::Binary(binary) => type_check_binary(binary, line),
        ExprKind::Not(inner) => {
            if !is_subtype(&type_check_expr(inner)?, &Type::Bool) {
                return fail(
                    ErrorImpl::NonBooleanOperands {
                        operation: String::from("not"),
                    },
                    line,
                );
            }
            Ok(Type::Bool)
        }
        ExprKind::If(conditional) => type_check_if(conditional, line),
        ExprKind::Print(inner) => type_check_expr(inner),
        ExprKind::Id(id) => {
            let resolution = id.resolution.as_ref().ok_or(TypeCheckError::Incomplete)?;
            match &resolution.entry.ty {
                Type::Arrow(_) => fail(
                    ErrorImpl::FunctionAsValue {
                        identifier: id.name.clone(),
                    },
                    line,
                ),
                Type::Class(_) => fail(
                    ErrorImpl::ClassAsValue {
                        identifier: id.name.clone(),
                    },
                    line,
                ),
                ty => Ok(ty.clone()),
            }
        }
        ExprKind::Call(call) => {
            let resolution = call.resolution.as_ref().ok_or(TypeCheckError::Incomplete)?;
            match &resolution.entry.ty {
                Type::Arrow(arrow) => {
                    check_arguments(&call.name, &arrow.parameters, &call.arguments, line)?;
                    Ok(arrow.ret.as_ref().clone())
                }
                _ => fail(
                    ErrorImpl::NotAFunction {
                        identifier: call.name.clone(),
                    },
                    line,
                ),
            }
        }
        ExprKind::New(new) => {
            let resolution = new.resolution.as_ref().ok_or(TypeCheckError::Incomplete)?;
            match &resolution.entry.ty {
                Type::Class(class) => {
                    check_arguments(&new.class_name, &class.fields, &new.arguments, line)?;
                    Ok(Type::Ref(new.class_name.clone()))
                }
                _ => fail(
                    ErrorImpl::NotAClass {
                        identifier: new.class_name.clone(),
                    },
                    line,
                ),
            }
        }
        ExprKind::MethodCall(call) => type_check_method_call(call, line),
    }
}

fn type_check_binary(binary: &BinaryExpr, line: u32) -> TypeResult<Type> {
    let left = type_check_expr(&binary.left)?;
    let right = type_check_expr(&binary.right)?;
    let operation = binary.operator.describe().to_string();

    match binary.operator {
        BinaryOperator::Plus
        | BinaryOperator::Minus
        | BinaryOperator::Times
        | BinaryOperator::Div => {
            if !(is_subtype(&left, &Type::Int) && is_subtype(&right, &Type::Int)) {
                return fail(ErrorImpl::NonIntegerOperands { operation }, line);
            }
            Ok(Type::Int)
        }
        BinaryOperator::Equal | BinaryOperator::LessEqual | BinaryOperator::GreaterEqual => {
            if !(is_subtype(&left, &right) || is_subtype(&right, &left)) {
                return fail(ErrorImpl::IncompatibleComparison { operation }, line);
            }
            Ok(Type::Bool)
        }
        BinaryOperator::And | BinaryOperator::Or => {
            if !(is_subtype(&left, &Type::Bool) && is_subtype(&right, &Type::Bool)) {
                return fail(ErrorImpl::NonBooleanOperands { operation }, line);
            }
            Ok(Type::Bool)
        }
    }
}

/// The result is the more general branch type; unrelated branches are an error.
fn type_check_if(conditional: &IfExpr, line: u32) -> TypeResult<Type> {
    if !is_subtype(&type_check_expr(&conditional.condition)?, &Type::Bool) {
        return fail(ErrorImpl::NonBooleanCondition, line);
    }

    let then_type = type_check_expr(&conditional.then_branch)?;
    let else_type = type_check_expr(&conditional.else_branch)?;

    if is_subtype(&then_type, &else_type) {
        Ok(else_type)
    } else if is_subtype(&else_type, &then_type) {
        Ok(then_type)
    } else {
        fail(
            ErrorImpl::IncompatibleBranches {
                then_type: then_type.to_string(),
                else_type: else_type.to_string(),
            },
            line,
        )
    }
}

fn type_check_method_call(call: &MethodCallExpr, line: u32) -> TypeResult<Type> {
    match type_check_expr(&call.receiver)? {
        Type::Ref(_) => {}
        _ => {
            return fail(
                ErrorImpl::NotAnObject {
                    method: call.method.clone(),
                },
                line,
            )
        }
    }

    let entry = call.method_entry.as_ref().ok_or(TypeCheckError::Incomplete)?;
    match &entry.ty {
        Type::Arrow(arrow) => {
            check_arguments(&call.method, &arrow.parameters, &call.arguments, line)?;
            Ok(arrow.ret.as_ref().clone())
        }
        _ => fail(
            ErrorImpl::NotAFunction {
                identifier: call.method.clone(),
            },
            line,
        ),
    }
}

/// Arity first, then each actual against its formal, stopping at the first mismatch.
fn check_arguments(callee: &str, formals: &[Type], arguments: &[Expr], line: u32) -> TypeResult<()> {
    if formals.len() != arguments.len() {
        return fail(
            ErrorImpl::WrongArgumentCount {
                callee: callee.to_string(),
                expected: formals.len(),
                received: arguments.len(),
            },
            line,
        );
    }

    for (index, (formal, argument)) in formals.iter().zip(arguments).enumerate() {
        let actual = type_check_expr(argument)?;
        if !is_subtype(&actual, formal) {
            return fail(
                ErrorImpl::ArgumentTypeMatchError {
                    callee: callee.to_string(),
                    position: index + 1,
                    expected: formal.to_string(),
                    received: actual.to_string(),
                },
                line,
            );
        }
    }

    Ok(())
}
