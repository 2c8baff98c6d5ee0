//! Shared enums used by both the AST and the semantic type algebra.
//!
//! These live in sable-common to break what would otherwise be a circular
//! dependency between sable-ast and sable-solver.

use crate::interner::Atom;

/// The kind of a callable type or declaration.
///
/// Functions are pure; methods may read and write the heap. The two kinds
/// have different calling contracts and do not subsume one another; in the
/// type algebra their intersection meets as `Method` and their union joins
/// as `Function`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CallableKind {
    Function,
    Method,
}

impl CallableKind {
    /// The kind of the intersection of two callables.
    pub fn meet(self, other: CallableKind) -> CallableKind {
        if self == other {
            self
        } else {
            CallableKind::Method
        }
    }

    /// The kind of the union of two callables.
    pub fn join(self, other: CallableKind) -> CallableKind {
        if self == other {
            self
        } else {
            CallableKind::Function
        }
    }
}

/// A lifetime annotation on a reference type or allocation.
///
/// `Static` is the unbounded lifetime written `*`; `This` is the implicit
/// lifetime of the enclosing method; `Named` lifetimes are introduced by
/// named blocks and method lifetime parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Lifetime {
    Static,
    This,
    Named(Atom),
}

impl Lifetime {
    pub const fn is_static(self) -> bool {
        matches!(self, Lifetime::Static)
    }
}
