/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: Program root, symbol table entries and use-site decorations
/// - expressions: Definitions for the expression forms
/// - declarations: Definitions for variable, function, parameter, field, method and class declarations
/// - types: The static types and the subtype relation
pub mod ast;
pub mod declarations;
pub mod expressions;
pub mod types;

#[cfg(test)]
mod tests;
