use std::fmt::Display;

/// Static types of the language.
///
/// `Class` is only ever the type of a class name's own declaration entry;
/// values of a class are typed `Ref`. `Empty` is the type of `null`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Int,
    Bool,
    Arrow(ArrowType),
    Class(ClassType),
    Ref(String),
    Empty,
}

/// Function and method signatures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrowType {
    pub parameters: Vec<Type>,
    pub ret: Box<Type>,
}

impl ArrowType {
    pub fn new(parameters: Vec<Type>, ret: Type) -> Self {
        ArrowType {
            parameters,
            ret: Box::new(ret),
        }
    }
}

/// Full signature of a class: field types in field-offset order and method
/// signatures in dispatch-slot order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClassType {
    pub fields: Vec<Type>,
    pub methods: Vec<ArrowType>,
}

impl Type {
    /// Checks whether a value of this type may be used where `other` is expected.
    ///
    /// The lattice is deliberately small:
    /// - every type is a subtype of itself
    /// - `bool <: int`, truth values coerce to 0 and 1
    /// - `null <: C` for every class `C`
    ///
    /// Distinct classes are never related, there is no inheritance.
    pub fn is_subtype_of(&self, other: &Type) -> bool {
        match (self, other) {
            (Type::Bool, Type::Int) => true,
            (Type::Empty, Type::Ref(_)) => true,
            (Type::Ref(left), Type::Ref(right)) => left == right,
            (left, right) => left == right,
        }
    }
}

/// Free-function form of [`Type::is_subtype_of`].
pub fn is_subtype(a: &Type, b: &Type) -> bool {
    a.is_subtype_of(b)
}

impl Display for ArrowType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parameters = self
            .parameters
            .iter()
            .map(|parameter| parameter.to_string())
            .collect::<Vec<String>>()
            .join(", ");
        write!(f, "({}) -> {}", parameters, self.ret)
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Bool => write!(f, "bool"),
            Type::Arrow(arrow) => write!(f, "{}", arrow),
            Type::Class(class) => {
                let fields = class
                    .fields
                    .iter()
                    .map(|field| field.to_string())
                    .collect::<Vec<String>>()
                    .join(", ");
                let methods = class
                    .methods
                    .iter()
                    .map(|method| method.to_string())
                    .collect::<Vec<String>>()
                    .join(", ");
                write!(f, "class({}) {{{}}}", fields, methods)
            }
            Type::Ref(class) => write!(f, "{}", class),
            Type::Empty => write!(f, "null"),
        }
    }
}
