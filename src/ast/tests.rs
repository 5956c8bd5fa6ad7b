//! Unit tests for the type lattice.

use super::types::{is_subtype, ArrowType, ClassType, Type};

fn all_types() -> Vec<Type> {
    vec![
        Type::Int,
        Type::Bool,
        Type::Empty,
        Type::Ref("A".to_string()),
        Type::Ref("B".to_string()),
        Type::Arrow(ArrowType::new(vec![Type::Int], Type::Bool)),
        Type::Class(ClassType {
            fields: vec![Type::Int],
            methods: vec![ArrowType::new(vec![], Type::Int)],
        }),
    ]
}

#[test]
fn test_subtype_is_reflexive() {
    for ty in all_types() {
        assert!(is_subtype(&ty, &ty), "{} should be a subtype of itself", ty);
    }
}

#[test]
fn test_bool_coerces_to_int_only() {
    assert!(is_subtype(&Type::Bool, &Type::Int));
    assert!(!is_subtype(&Type::Int, &Type::Bool));
}

#[test]
fn test_null_is_bottom_for_references() {
    assert!(is_subtype(&Type::Empty, &Type::Ref("A".to_string())));
    assert!(is_subtype(&Type::Empty, &Type::Ref("B".to_string())));
    assert!(!is_subtype(&Type::Ref("A".to_string()), &Type::Empty));
    assert!(!is_subtype(&Type::Empty, &Type::Int));
}

#[test]
fn test_references_are_nominal() {
    let a = Type::Ref("A".to_string());
    let b = Type::Ref("B".to_string());

    assert!(is_subtype(&a, &Type::Ref("A".to_string())));
    assert!(!is_subtype(&a, &b));
    assert!(!is_subtype(&b, &a));
    assert!(!is_subtype(&a, &Type::Int));
}

#[test]
fn test_arrow_types_must_match_exactly() {
    let f = Type::Arrow(ArrowType::new(vec![Type::Int], Type::Int));
    let g = Type::Arrow(ArrowType::new(vec![Type::Bool], Type::Int));

    assert!(!is_subtype(&f, &g));
}

#[test]
fn test_type_display() {
    assert_eq!(Type::Int.to_string(), "int");
    assert_eq!(Type::Empty.to_string(), "null");
    assert_eq!(Type::Ref("Point".to_string()).to_string(), "Point");
    assert_eq!(
        Type::Arrow(ArrowType::new(vec![Type::Int, Type::Bool], Type::Int)).to_string(),
        "(int, bool) -> int"
    );
}
