//! The typed term algebra the translator compiles into.

use z3::ast::{Array, Bool, Int};

/// A solver term of one of the three sorts this fragment uses.
#[derive(Debug, Clone)]
pub enum Term<'ctx> {
    Bool(Bool<'ctx>),
    Int(Int<'ctx>),
    Array(Array<'ctx>),
}

impl<'ctx> Term<'ctx> {
    /// Human-readable sort name for diagnostics.
    pub fn sort_name(&self) -> &'static str {
        match self {
            Term::Bool(_) => "bool",
            Term::Int(_) => "int",
            Term::Array(_) => "array",
        }
    }

    pub fn as_bool(&self) -> Option<&Bool<'ctx>> {
        match self {
            Term::Bool(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<&Int<'ctx>> {
        match self {
            Term::Int(i) => Some(i),
            _ => None,
        }
    }
}
