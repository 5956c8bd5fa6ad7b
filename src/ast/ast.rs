use std::rc::Rc;

use super::{
    declarations::{ClassDecl, Decl},
    expressions::Expr,
    types::Type,
};

/// Root of the tree.
///
/// A program either opens the global scope with `let ... in` (classes first,
/// then ordinary declarations) or is a single expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Program {
    LetIn {
        classes: Vec<ClassDecl>,
        declarations: Vec<Decl>,
        body: Expr,
    },
    Body(Expr),
}

/// Symbol table entry.
///
/// Created exactly once per declaration and shared by every use site that
/// resolves to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub nesting_level: usize,
    pub ty: Type,
    pub offset: i32,
    /// Methods are reached through the dispatch table, never through a frame slot.
    pub is_method: bool,
}

impl Binding {
    pub fn new(nesting_level: usize, ty: Type, offset: i32) -> Self {
        Binding {
            nesting_level,
            ty,
            offset,
            is_method: false,
        }
    }

    pub fn method(nesting_level: usize, ty: Type, offset: i32) -> Self {
        Binding {
            nesting_level,
            ty,
            offset,
            is_method: true,
        }
    }
}

/// Decoration attached to a use site by the resolver: the binding it refers
/// to and the nesting level of the use, whose difference is the number of
/// static-chain hops.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub entry: Rc<Binding>,
    pub nesting_level: usize,
}

impl Resolution {
    pub fn hops(&self) -> usize {
        self.nesting_level.saturating_sub(self.entry.nesting_level)
    }
}
