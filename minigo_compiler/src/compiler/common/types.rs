//! The closed set of types a symbol can be declared with

use std::fmt::Display;

/// Every type the language knows about. Comparison is strict: no implicit
/// widening or narrowing anywhere, two types are compatible only when equal.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Int,
    Float64,
    Bool,
    String,
    /// Functions are a single opaque tag, signatures are not tracked
    Function,
    /// The `fmt` print builtins produce no value
    Void,
    Struct(Vec<(String, Type)>),
    Array(Box<Type>, usize),
    Slice(Box<Type>),
    /// A user-declared type name, compared nominally
    Named(String),
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Float64 => write!(f, "float64"),
            Type::Bool => write!(f, "bool"),
            Type::String => write!(f, "string"),
            Type::Function => write!(f, "function"),
            Type::Void => write!(f, "void"),
            Type::Struct(fields) => {
                let fields = fields
                    .iter()
                    .map(|(name, ty)| format!("{} {}", name, ty))
                    .collect::<Vec<String>>()
                    .join("; ");
                write!(f, "struct {{ {} }}", fields)
            }
            Type::Array(elem, size) => write!(f, "[{}]{}", size, elem),
            Type::Slice(elem) => write!(f, "[]{}", elem),
            Type::Named(name) => write!(f, "{}", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_equality_on_primitives() {
        assert_eq!(Type::Int, Type::Int);
        assert_ne!(Type::Int, Type::Float64);
        assert_ne!(Type::String, Type::Bool);
        assert_ne!(Type::Named("celsius".to_string()), Type::Int);
    }

    #[test]
    fn displays_compound_types() {
        assert_eq!(Type::Slice(Box::new(Type::Int)).to_string(), "[]int");
        assert_eq!(Type::Array(Box::new(Type::Float64), 3).to_string(), "[3]float64");
        assert_eq!(
            Type::Struct(vec![("x".to_string(), Type::Int), ("y".to_string(), Type::Int)]).to_string(),
            "struct { x int; y int }"
        );
    }
}
