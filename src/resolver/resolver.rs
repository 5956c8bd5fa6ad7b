use std::{collections::HashMap, rc::Rc};

use crate::{
    ast::{
        ast::{Binding, Program, Resolution},
        declarations::{ClassDecl, Decl, FunDecl, MethodDecl, ParDecl},
        expressions::{Expr, ExprKind, MethodCallExpr},
        types::{ArrowType, ClassType, Type},
    },
    errors::errors::{Error, ErrorImpl},
};

/// A frame of the scope stack, or the virtual table of a class.
pub type Frame = HashMap<String, Rc<Binding>>;

/// State of one resolution run.
///
/// `symbol_table[n]` is the frame of nesting level `n`; the global frame is
/// always at index 0. The class table maps each class name to its frozen
/// virtual table.
#[derive(Debug)]
pub struct ScopeResolver {
    pub symbol_table: Vec<Frame>,
    pub nesting_level: usize,
    pub decl_offset: i32,
    pub class_table: HashMap<String, Frame>,
    pub errors: Vec<Error>,
}

impl ScopeResolver {
    pub fn new() -> Self {
        ScopeResolver {
            symbol_table: vec![],
            nesting_level: 0,
            decl_offset: -2,
            class_table: HashMap::new(),
            errors: vec![],
        }
    }

    fn error(&mut self, error: ErrorImpl, line: u32) {
        self.errors.push(Error::new(error, line));
    }

    /// Walks the scope stack from the current level outward.
    pub fn lookup(&self, identifier: &str) -> Option<Rc<Binding>> {
        self.symbol_table
            .iter()
            .rev()
            .find_map(|frame| frame.get(identifier))
            .map(Rc::clone)
    }

    /// Binds `identifier` in the current frame. A name already bound in the
    /// same frame is reported and then overwritten.
    fn declare(&mut self, kind: &str, identifier: &str, binding: Binding, line: u32) -> Rc<Binding> {
        let binding = Rc::new(binding);
        let previous = match self.symbol_table.last_mut() {
            Some(frame) => frame.insert(identifier.to_string(), Rc::clone(&binding)),
            None => None,
        };

        if previous.is_some() {
            self.error(
                ErrorImpl::AlreadyDeclared {
                    kind: kind.to_string(),
                    identifier: identifier.to_string(),
                },
                line,
            );
        }

        binding
    }

    fn open_scope(&mut self, frame: Frame) -> i32 {
        self.symbol_table.push(frame);
        self.nesting_level += 1;
        std::mem::replace(&mut self.decl_offset, -2)
    }

    fn close_scope(&mut self, previous_offset: i32) -> Option<Frame> {
        self.nesting_level -= 1;
        self.decl_offset = previous_offset;
        self.symbol_table.pop()
    }

    fn resolution(&self, entry: Rc<Binding>) -> Resolution {
        Resolution {
            entry,
            nesting_level: self.nesting_level,
        }
    }
}

impl Default for ScopeResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves every identifier of `program` in place.
///
/// All resolution errors are collected; the traversal never stops early.
pub fn resolve(program: &mut Program) -> (ScopeResolver, Vec<Error>) {
    let mut resolver = ScopeResolver::new();
    resolver.symbol_table.push(HashMap::new());

    match program {
        Program::LetIn {
            classes,
            declarations,
            body,
        } => {
            // Classes first, so every declaration and expression can see them.
            for class in classes.iter_mut() {
                resolve_class(&mut resolver, class);
            }
            for declaration in declarations.iter_mut() {
                resolve_decl(&mut resolver, declaration);
            }
            resolve_expr(&mut resolver, body);
        }
        Program::Body(body) => resolve_expr(&mut resolver, body),
    }

    let errors = std::mem::take(&mut resolver.errors);
    (resolver, errors)
}

pub fn resolve_decl(resolver: &mut ScopeResolver, declaration: &mut Decl) {
    match declaration {
        Decl::Var(var) => {
            // The initializer cannot see the variable it initializes.
            resolve_expr(resolver, &mut var.value);

            let binding = Binding::new(resolver.nesting_level, var.ty.clone(), resolver.decl_offset);
            resolver.decl_offset -= 1;
            resolver.declare("Var", &var.name, binding, var.line);
        }
        Decl::Fun(fun) => resolve_fun(resolver, fun),
    }
}

fn resolve_fun(resolver: &mut ScopeResolver, fun: &mut FunDecl) {
    let binding = Binding::new(
        resolver.nesting_level,
        Type::Arrow(fun.arrow_type()),
        resolver.decl_offset,
    );
    resolver.decl_offset -= 1;
    resolver.declare("Fun", &fun.name, binding, fun.line);

    let previous_offset = resolver.open_scope(HashMap::new());
    declare_parameters(resolver, &fun.parameters);
    for declaration in fun.declarations.iter_mut() {
        resolve_decl(resolver, declaration);
    }
    resolve_expr(resolver, &mut fun.body);
    resolver.close_scope(previous_offset);
}

fn declare_parameters(resolver: &mut ScopeResolver, parameters: &[ParDecl]) {
    for (index, parameter) in parameters.iter().enumerate() {
        let binding = Binding::new(resolver.nesting_level, parameter.ty.clone(), index as i32 + 1);
        resolver.declare("Par", &parameter.name, binding, parameter.line);
    }
}

/// Classes live in the global frame. Their members are bound in a dedicated
/// frame at level 1 (the virtual table), method bodies one level deeper.
fn resolve_class(resolver: &mut ScopeResolver, class: &mut ClassDecl) {
    let class_offset = resolver.decl_offset;
    resolver.decl_offset -= 1;

    let previous_offset = resolver.open_scope(HashMap::new());
    let mut signature = ClassType::default();

    let mut field_offset = -1;
    for (index, field) in class.fields.iter().enumerate() {
        let duplicate = class.fields[..index]
            .iter()
            .any(|other| other.name == field.name && other.ty == field.ty);
        if duplicate {
            resolver.error(
                ErrorImpl::DuplicateField {
                    class: class.name.clone(),
                    field: field.name.clone(),
                },
                field.line,
            );
            continue;
        }

        let binding = Binding::new(resolver.nesting_level, field.ty.clone(), field_offset);
        resolver.declare("Field", &field.name, binding, field.line);
        signature.fields.push(field.ty.clone());
        field_offset -= 1;
    }

    let mut method_offset = 0;
    for index in 0..class.methods.len() {
        let duplicate = {
            let method = &class.methods[index];
            class.methods[..index].iter().any(|other| {
                other.name == method.name && other.arrow_type() == method.arrow_type()
            })
        };
        let method = &mut class.methods[index];
        if duplicate {
            resolver.error(
                ErrorImpl::DuplicateMethod {
                    class: class.name.clone(),
                    method: method.name.clone(),
                },
                method.line,
            );
            continue;
        }

        let arrow = method.arrow_type();
        let binding = Binding::method(resolver.nesting_level, Type::Arrow(arrow.clone()), method_offset);
        resolver.declare("Method", &method.name, binding, method.line);
        method.offset = Some(method_offset);
        signature.methods.push(arrow);
        method_offset += 1;
    }

    // The virtual table is frozen before any method body is looked at, so
    // methods see each other regardless of declaration order.
    let virtual_table = resolver.symbol_table.last().cloned().unwrap_or_default();
    resolver.class_table.insert(class.name.clone(), virtual_table);

    let class_binding = Rc::new(Binding::new(0, Type::Class(signature), class_offset));
    if resolver.symbol_table[0]
        .insert(class.name.clone(), class_binding)
        .is_some()
    {
        resolver.error(
            ErrorImpl::AlreadyDeclared {
                kind: "Class".to_string(),
                identifier: class.name.clone(),
            },
            class.line,
        );
    }

    for method in class.methods.iter_mut().filter(|method| method.offset.is_some()) {
        resolve_method(resolver, method);
    }

    resolver.close_scope(previous_offset);
}

fn resolve_method(resolver: &mut ScopeResolver, method: &mut MethodDecl) {
    let previous_offset = resolver.open_scope(HashMap::new());
    declare_parameters(resolver, &method.parameters);
    for declaration in method.declarations.iter_mut() {
        resolve_decl(resolver, declaration);
    }
    resolve_expr(resolver, &mut method.body);
    resolver.close_scope(previous_offset);
}

pub fn resolve_expr(resolver: &mut ScopeResolver, expr: &mut Expr) {
    let line = expr.line;
    match &mut expr.kind {
        ExprKind::Int(_) | ExprKind::Bool(_) | ExprKind::Null => {}
        ExprKind::Binary(binary) => {
            resolve_expr(resolver, &mut binary.left);
            resolve_expr(resolver, &mut binary.right);
        }
        ExprKind::Not(inner) | ExprKind::Print(inner) => resolve_expr(resolver, inner),
        ExprKind::If(conditional) => {
            resolve_expr(resolver, &mut conditional.condition);
            resolve_expr(resolver, &mut conditional.then_branch);
            resolve_expr(resolver, &mut conditional.else_branch);
        }
        ExprKind::Id(id) => match resolver.lookup(&id.name) {
            Some(entry) => id.resolution = Some(resolver.resolution(entry)),
            None => resolver.error(
                ErrorImpl::NotDeclared {
                    kind: "Var or Par".to_string(),
                    identifier: id.name.clone(),
                },
                line,
            ),
        },
        ExprKind::Call(call) => {
            match resolver.lookup(&call.name) {
                Some(entry) => call.resolution = Some(resolver.resolution(entry)),
                None => resolver.error(
                    ErrorImpl::NotDeclared {
                        kind: "Fun".to_string(),
                        identifier: call.name.clone(),
                    },
                    line,
                ),
            }
            for argument in call.arguments.iter_mut() {
                resolve_expr(resolver, argument);
            }
        }
        ExprKind::New(new) => {
            if resolver.class_table.contains_key(&new.class_name) {
                let entry = resolver.symbol_table[0].get(&new.class_name).map(Rc::clone);
                new.resolution = entry.map(|entry| resolver.resolution(entry));
            } else {
                resolver.error(
                    ErrorImpl::ClassNotDeclared {
                        class: new.class_name.clone(),
                    },
                    line,
                );
            }
            for argument in new.arguments.iter_mut() {
                resolve_expr(resolver, argument);
            }
        }
        ExprKind::MethodCall(call) => resolve_method_call(resolver, call, line),
    }
}

fn resolve_method_call(resolver: &mut ScopeResolver, call: &mut MethodCallExpr, line: u32) {
    resolve_expr(resolver, &mut call.receiver);

    match receiver_class(resolver, &call.receiver) {
        Ok(Some(class)) => match resolver.class_table.get(&class) {
            Some(virtual_table) => {
                let entry = virtual_table
                    .get(&call.method)
                    .filter(|entry| entry.is_method)
                    .map(Rc::clone);
                match entry {
                    Some(entry) => call.method_entry = Some(entry),
                    None => resolver.error(
                        ErrorImpl::MethodNotDeclared {
                            class,
                            method: call.method.clone(),
                        },
                        line,
                    ),
                }
            }
            None => resolver.error(ErrorImpl::ClassNotDeclared { class }, line),
        },
        // The receiver itself failed to resolve and has been reported already.
        Ok(None) => {}
        Err(error) => resolver.error(error, line),
    }

    for argument in call.arguments.iter_mut() {
        resolve_expr(resolver, argument);
    }
}

/// Statically derives the class of a method-call receiver.
fn receiver_class(resolver: &ScopeResolver, receiver: &Expr) -> Result<Option<String>, ErrorImpl> {
    let not_a_class = || ErrorImpl::NotAClassVariable {
        receiver: describe_receiver(receiver),
    };

    match &receiver.kind {
        ExprKind::Id(id) => match &id.resolution {
            Some(resolution) => match &resolution.entry.ty {
                Type::Ref(class) => Ok(Some(class.clone())),
                _ => Err(not_a_class()),
            },
            None => Ok(None),
        },
        ExprKind::New(new) => {
            if resolver.class_table.contains_key(&new.class_name) {
                Ok(Some(new.class_name.clone()))
            } else {
                Ok(None)
            }
        }
        ExprKind::Call(call) => match &call.resolution {
            Some(resolution) => returned_class(&resolution.entry.ty).ok_or_else(not_a_class).map(Some),
            None => Ok(None),
        },
        ExprKind::MethodCall(inner) => match &inner.method_entry {
            Some(entry) => returned_class(&entry.ty).ok_or_else(not_a_class).map(Some),
            None => Ok(None),
        },
        _ => Err(not_a_class()),
    }
}

fn returned_class(ty: &Type) -> Option<String> {
    match ty {
        Type::Arrow(ArrowType { ret, .. }) => match ret.as_ref() {
            Type::Ref(class) => Some(class.clone()),
            _ => None,
        },
        _ => None,
    }
}

fn describe_receiver(receiver: &Expr) -> String {
    match &receiver.kind {
        ExprKind::Id(id) => id.name.clone(),
        ExprKind::Call(call) => format!("{}(...)", call.name),
        ExprKind::MethodCall(call) => format!("{}(...)", call.method),
        ExprKind::Int(value) => value.to_string(),
        ExprKind::Bool(value) => value.to_string(),
        ExprKind::Null => String::from("null"),
        _ => String::from("expression"),
    }
}
