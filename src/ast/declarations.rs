use super::{
    expressions::Expr,
    types::{ArrowType, Type},
};

/// Declarations that may appear in any `let ... in` block.
#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Var(VarDecl),
    Fun(FunDecl),
}

impl Decl {
    pub fn line(&self) -> u32 {
        match self {
            Decl::Var(var) => var.line,
            Decl::Fun(fun) => fun.line,
        }
    }
}

/// `var name: ty = value;`
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub name: String,
    pub ty: Type,
    pub value: Expr,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParDecl {
    pub name: String,
    pub ty: Type,
    pub line: u32,
}

/// `fun name: ret(params) let declarations in body;`
#[derive(Debug, Clone, PartialEq)]
pub struct FunDecl {
    pub name: String,
    pub return_type: Type,
    pub parameters: Vec<ParDecl>,
    pub declarations: Vec<Decl>,
    pub body: Expr,
    pub line: u32,
}

impl FunDecl {
    pub fn arrow_type(&self) -> ArrowType {
        signature(&self.parameters, &self.return_type)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub name: String,
    pub ty: Type,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl {
    pub name: String,
    pub return_type: Type,
    pub parameters: Vec<ParDecl>,
    pub declarations: Vec<Decl>,
    pub body: Expr,
    pub line: u32,
    /// Dispatch-table slot, filled in by the resolver.
    pub offset: Option<i32>,
}

impl MethodDecl {
    pub fn arrow_type(&self) -> ArrowType {
        signature(&self.parameters, &self.return_type)
    }
}

/// `class Name(fields) { methods }`. Classes only appear in the global scope.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub name: String,
    pub fields: Vec<FieldDecl>,
    pub methods: Vec<MethodDecl>,
    pub line: u32,
}

fn signature(parameters: &[ParDecl], return_type: &Type) -> ArrowType {
    ArrowType::new(
        parameters.iter().map(|parameter| parameter.ty.clone()).collect(),
        return_type.clone(),
    )
}
