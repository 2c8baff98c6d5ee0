//! Abstract syntax tree for the sable language.
//!
//! The checker consumes this tree as produced by the (external) parser and
//! name resolver: variable accesses carry resolved `VarId`s, invocations
//! carry candidate sets of `DeclIndex`es, and nominal type references carry
//! the `DeclIndex` of the type declaration they name. The checker never
//! mutates the tree; inferred types are recorded in side tables keyed by
//! `NodeId`.
//!
//! Module layout:
//! - `decl` - declarations (units, types, statics, functions and methods)
//! - `stmt` - statements and blocks
//! - `expr` - expressions and l-values
//! - `types` - syntactic type expressions
//! - `build` - programmatic construction with automatic id assignment

pub mod build;
pub mod decl;
pub mod expr;
pub mod stmt;
pub mod types;

pub use build::Builder;
pub use decl::{
    CallableDecl, Decl, ImportDecl, Modifiers, Parameter, PropertyDecl, StaticVarDecl, TypeDecl,
    Unit,
};
pub use expr::{CalleeLink, Expr, ExprKind, LambdaDecl, QuantifiedVar, QuantifierKind, Value};
pub use stmt::{
    AssertStmt, AssignStmt, Block, DebugStmt, DoWhileStmt, IfElseStmt, NamedBlockStmt, ReturnStmt,
    Stmt, SwitchCase, SwitchStmt, VariableDecl, WhileStmt,
};
pub use types::TypeExpr;

/// Identifies an expression node within a unit.
///
/// Node ids are dense and assigned by the builder; the checker uses them to
/// key its annotation side tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// Identifies a variable declaration (parameter, local, quantifier binding,
/// or type-invariant binding) within a unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(pub u32);

/// Index of a declaration within its unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclIndex(pub u32);

impl DeclIndex {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}
