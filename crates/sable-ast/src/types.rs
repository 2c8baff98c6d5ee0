//! Syntactic type expressions.
//!
//! These are the types as written in source. The checker lowers them into
//! the semantic algebra (`sable-solver`) before doing any reasoning; nominal
//! references stay symbolic here and are resolved through their `DeclIndex`
//! link during lowering.

use crate::DeclIndex;
use sable_common::{Atom, CallableKind, Lifetime};

/// A type as written in source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeExpr {
    Void,
    Any,
    Null,
    Bool,
    Byte,
    Int,
    /// A reference to a declared type, resolved by name resolution.
    Nominal(DeclIndex),
    Array(Box<TypeExpr>),
    Reference {
        elem: Box<TypeExpr>,
        /// Omitted lifetimes read as `*`.
        lifetime: Option<Lifetime>,
    },
    Record {
        /// `true` means additional fields may exist (`{int f, ...}`).
        open: bool,
        /// Declaration order is preserved.
        fields: Vec<(Atom, TypeExpr)>,
    },
    Callable {
        kind: CallableKind,
        params: Vec<TypeExpr>,
        returns: Vec<TypeExpr>,
        /// Lifetime parameters declared on a method type.
        lifetimes: Vec<Atom>,
    },
    Union(Vec<TypeExpr>),
    Intersection(Vec<TypeExpr>),
    Negation(Box<TypeExpr>),
}

impl TypeExpr {
    /// `a - b` is sugar for `a & !b`.
    pub fn difference(a: TypeExpr, b: TypeExpr) -> TypeExpr {
        TypeExpr::Intersection(vec![a, TypeExpr::Negation(Box::new(b))])
    }

    pub fn array(elem: TypeExpr) -> TypeExpr {
        TypeExpr::Array(Box::new(elem))
    }

    pub fn reference(elem: TypeExpr, lifetime: Option<Lifetime>) -> TypeExpr {
        TypeExpr::Reference {
            elem: Box::new(elem),
            lifetime,
        }
    }

    pub fn union(children: Vec<TypeExpr>) -> TypeExpr {
        TypeExpr::Union(children)
    }
}
