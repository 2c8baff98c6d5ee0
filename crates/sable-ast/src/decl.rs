//! Declarations: compilation units, type declarations, static variables,
//! functions, methods, and properties.

use crate::expr::Expr;
use crate::stmt::Block;
use crate::types::TypeExpr;
use crate::VarId;
use bitflags::bitflags;
use sable_common::{Atom, CallableKind, Span};

bitflags! {
    /// Declaration modifiers.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Modifiers: u8 {
        /// Implemented outside the language; bodies are absent and
        /// missing-return analysis does not apply.
        const NATIVE = 1 << 0;
        const EXPORT = 1 << 1;
        const PUBLIC = 1 << 2;
    }
}

/// A compilation unit: one source file's worth of declarations.
#[derive(Clone, Debug)]
pub struct Unit {
    pub name: Atom,
    pub decls: Vec<Decl>,
}

/// A top-level declaration.
#[derive(Clone, Debug)]
pub enum Decl {
    /// Imports are resolved upstream; the checker ignores them.
    Import(ImportDecl),
    StaticVariable(StaticVarDecl),
    Type(TypeDecl),
    FunctionOrMethod(CallableDecl),
    Property(PropertyDecl),
}

impl Decl {
    /// The name this declaration binds, if any.
    pub fn name(&self) -> Option<Atom> {
        match self {
            Decl::Import(_) => None,
            Decl::StaticVariable(d) => Some(d.name),
            Decl::Type(d) => Some(d.name),
            Decl::FunctionOrMethod(d) => Some(d.name),
            Decl::Property(d) => Some(d.name),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ImportDecl {
    pub path: Vec<Atom>,
    pub span: Span,
}

/// `int x = 0` at unit level.
#[derive(Clone, Debug)]
pub struct StaticVarDecl {
    pub name: Atom,
    pub modifiers: Modifiers,
    pub declared: TypeExpr,
    pub initialiser: Expr,
    pub span: Span,
}

/// `type nat is (int n) where n >= 0`
///
/// The `where` clauses make the declaration refinement-bearing; a bare
/// `type t is T` is a plain alias.
#[derive(Clone, Debug)]
pub struct TypeDecl {
    pub name: Atom,
    pub modifiers: Modifiers,
    /// The bound variable `(int n)` that invariant clauses range over.
    pub var: VarId,
    pub var_name: Atom,
    pub body: TypeExpr,
    pub invariants: Vec<Expr>,
    pub span: Span,
}

impl TypeDecl {
    /// True if this declaration constrains its body with invariant clauses.
    pub fn has_invariant(&self) -> bool {
        !self.invariants.is_empty()
    }
}

/// A function or method declaration.
#[derive(Clone, Debug)]
pub struct CallableDecl {
    pub kind: CallableKind,
    pub name: Atom,
    pub modifiers: Modifiers,
    /// Lifetime parameters (methods only).
    pub lifetimes: Vec<Atom>,
    pub parameters: Vec<Parameter>,
    pub returns: Vec<Parameter>,
    /// Precondition clauses. Verification is downstream; the checker only
    /// types them as booleans.
    pub requires: Vec<Expr>,
    /// Postcondition clauses, typed with return parameters in scope.
    pub ensures: Vec<Expr>,
    /// Absent for native declarations.
    pub body: Option<Block>,
    pub span: Span,
}

impl CallableDecl {
    pub fn is_native(&self) -> bool {
        self.modifiers.contains(Modifiers::NATIVE)
    }
}

/// A named parameter or return in a callable signature.
#[derive(Clone, Debug)]
pub struct Parameter {
    pub var: VarId,
    pub name: Atom,
    pub declared: TypeExpr,
    pub span: Span,
}

/// `property nonEmpty(int[] xs) where |xs| > 0`
///
/// A named boolean predicate usable in specification positions.
#[derive(Clone, Debug)]
pub struct PropertyDecl {
    pub name: Atom,
    pub modifiers: Modifiers,
    pub parameters: Vec<Parameter>,
    /// Clauses, each of boolean type.
    pub clauses: Vec<Expr>,
    pub span: Span,
}
