//! Statements and blocks.

use crate::expr::Expr;
use crate::types::TypeExpr;
use crate::VarId;
use sable_common::{Atom, Span};

/// A sequence of statements.
#[derive(Clone, Debug, Default)]
pub struct Block {
    pub stmts: Vec<Stmt>,
}

impl Block {
    pub fn new(stmts: Vec<Stmt>) -> Self {
        Block { stmts }
    }
}

/// A statement.
#[derive(Clone, Debug)]
pub enum Stmt {
    VariableDecl(VariableDecl),
    Assign(AssignStmt),
    Return(ReturnStmt),
    IfElse(IfElseStmt),
    NamedBlock(NamedBlockStmt),
    While(WhileStmt),
    DoWhile(DoWhileStmt),
    Switch(SwitchStmt),
    Break(Span),
    Continue(Span),
    /// Aborts execution; like return, exits with no continuation.
    Fail(Span),
    Skip(Span),
    Assert(AssertStmt),
    Assume(AssertStmt),
    Debug(DebugStmt),
    /// An invocation in statement position.
    Expr(Expr),
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::VariableDecl(s) => s.span,
            Stmt::Assign(s) => s.span,
            Stmt::Return(s) => s.span,
            Stmt::IfElse(s) => s.span,
            Stmt::NamedBlock(s) => s.span,
            Stmt::While(s) => s.span,
            Stmt::DoWhile(s) => s.span,
            Stmt::Switch(s) => s.span,
            Stmt::Break(span)
            | Stmt::Continue(span)
            | Stmt::Fail(span)
            | Stmt::Skip(span) => *span,
            Stmt::Assert(s) => s.span,
            Stmt::Assume(s) => s.span,
            Stmt::Debug(s) => s.span,
            Stmt::Expr(e) => e.span,
        }
    }
}

/// `int x = e` / `int x`
#[derive(Clone, Debug)]
pub struct VariableDecl {
    pub var: VarId,
    pub name: Atom,
    pub declared: TypeExpr,
    pub initialiser: Option<Expr>,
    pub span: Span,
}

/// `lv1, lv2 = e1, e2`
///
/// L-values and right-hand sides are matched component-wise.
#[derive(Clone, Debug)]
pub struct AssignStmt {
    pub lhs: Vec<Expr>,
    pub rhs: Vec<Expr>,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub struct ReturnStmt {
    pub values: Vec<Expr>,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub struct IfElseStmt {
    pub condition: Expr,
    pub true_branch: Block,
    pub false_branch: Option<Block>,
    pub span: Span,
}

/// `myblock: ...` - introduces a lifetime covering the enclosing scope's
/// currently declared lifetimes.
#[derive(Clone, Debug)]
pub struct NamedBlockStmt {
    pub name: Atom,
    pub body: Block,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub struct WhileStmt {
    pub condition: Expr,
    pub invariants: Vec<Expr>,
    pub body: Block,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub struct DoWhileStmt {
    pub body: Block,
    pub condition: Expr,
    pub invariants: Vec<Expr>,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub struct SwitchStmt {
    pub condition: Expr,
    pub cases: Vec<SwitchCase>,
    pub span: Span,
}

/// A switch arm. An empty value list is the default case.
#[derive(Clone, Debug)]
pub struct SwitchCase {
    pub values: Vec<Expr>,
    pub body: Block,
    pub span: Span,
}

impl SwitchCase {
    pub fn is_default(&self) -> bool {
        self.values.is_empty()
    }
}

/// `assert c` / `assume c` - both refine the following state with the
/// condition known true.
#[derive(Clone, Debug)]
pub struct AssertStmt {
    pub condition: Expr,
    pub span: Span,
}

/// `debug e` - e must be a byte string (`int[]`).
#[derive(Clone, Debug)]
pub struct DebugStmt {
    pub operand: Expr,
    pub span: Span,
}
