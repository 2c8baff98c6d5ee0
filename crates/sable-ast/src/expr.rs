//! Expressions and l-values.
//!
//! Every expression carries a `NodeId` so the checker can record its inferred
//! concrete type in a side table, and a `Span` for diagnostics.

use crate::decl::Parameter;
use crate::types::TypeExpr;
use crate::{DeclIndex, NodeId, VarId};
use sable_common::{Atom, CallableKind, Lifetime, Span};
use smallvec::SmallVec;

/// An expression node.
#[derive(Clone, Debug)]
pub struct Expr {
    pub id: NodeId,
    pub span: Span,
    pub kind: ExprKind,
}

/// A constant value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    Null,
    Bool(bool),
    Byte(u8),
    Int(i64),
    /// String literals are arrays of code points (`int[]`).
    String(String),
}

/// The callee link of a direct invocation or lambda access: the candidate
/// set left by name resolution, narrowed to one candidate by the checker.
#[derive(Clone, Debug)]
pub struct CalleeLink {
    pub name: Atom,
    pub candidates: SmallVec<[DeclIndex; 2]>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuantifierKind {
    Universal,
    Existential,
}

/// An iteration binding `i in lo..hi` of a quantifier.
#[derive(Clone, Debug)]
pub struct QuantifiedVar {
    pub var: VarId,
    pub name: Atom,
    pub start: Expr,
    pub end: Expr,
}

/// An anonymous callable `&(int x -> x + 1)`.
#[derive(Clone, Debug)]
pub struct LambdaDecl {
    pub kind: CallableKind,
    pub parameters: Vec<Parameter>,
    pub body: Expr,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub enum ExprKind {
    Constant(Value),
    VariableAccess {
        var: VarId,
    },
    StaticVariableAccess {
        decl: DeclIndex,
    },
    Cast {
        target: TypeExpr,
        operand: Box<Expr>,
    },
    Invoke {
        link: CalleeLink,
        args: Vec<Expr>,
    },
    IndirectInvoke {
        source: Box<Expr>,
        args: Vec<Expr>,
    },

    // Logical operators. And/Or are n-ary, as in the surface syntax.
    LogicalNot(Box<Expr>),
    LogicalAnd(Vec<Expr>),
    LogicalOr(Vec<Expr>),
    LogicalIff(Box<Expr>, Box<Expr>),
    LogicalImplication(Box<Expr>, Box<Expr>),

    /// Runtime type test `e is T`.
    Is {
        operand: Box<Expr>,
        test: TypeExpr,
    },
    Quantifier {
        kind: QuantifierKind,
        params: Vec<QuantifiedVar>,
        body: Box<Expr>,
    },

    Equal(Box<Expr>, Box<Expr>),
    NotEqual(Box<Expr>, Box<Expr>),

    IntegerLessThan(Box<Expr>, Box<Expr>),
    IntegerLessOrEqual(Box<Expr>, Box<Expr>),
    IntegerGreaterThan(Box<Expr>, Box<Expr>),
    IntegerGreaterOrEqual(Box<Expr>, Box<Expr>),
    IntegerNegation(Box<Expr>),
    IntegerAddition(Box<Expr>, Box<Expr>),
    IntegerSubtraction(Box<Expr>, Box<Expr>),
    IntegerMultiplication(Box<Expr>, Box<Expr>),
    IntegerDivision(Box<Expr>, Box<Expr>),
    IntegerRemainder(Box<Expr>, Box<Expr>),

    BitwiseComplement(Box<Expr>),
    BitwiseAnd(Vec<Expr>),
    BitwiseOr(Vec<Expr>),
    BitwiseXor(Vec<Expr>),
    BitwiseShiftLeft(Box<Expr>, Box<Expr>),
    BitwiseShiftRight(Box<Expr>, Box<Expr>),

    RecordInitialiser {
        fields: Vec<(Atom, Expr)>,
    },
    RecordAccess {
        source: Box<Expr>,
        field: Atom,
    },
    /// Borrow of a field through a reference: `&(r.f)`.
    RecordBorrow {
        source: Box<Expr>,
        field: Atom,
    },
    /// Functional field update `r with { f: e }`.
    RecordUpdate {
        source: Box<Expr>,
        field: Atom,
        value: Box<Expr>,
    },

    ArrayLength(Box<Expr>),
    ArrayInitialiser(Vec<Expr>),
    /// `[v; n]` - n copies of v.
    ArrayGenerator {
        value: Box<Expr>,
        length: Box<Expr>,
    },
    ArrayAccess {
        source: Box<Expr>,
        index: Box<Expr>,
    },
    /// Borrow of an element through a reference: `&(xs[i])`.
    ArrayBorrow {
        source: Box<Expr>,
        index: Box<Expr>,
    },
    /// `lo..hi` - an `int[]` of the values lo, lo+1, ..., hi-1.
    ArrayRange {
        start: Box<Expr>,
        end: Box<Expr>,
    },
    /// Functional element update `xs with [i: e]`.
    ArrayUpdate {
        source: Box<Expr>,
        index: Box<Expr>,
        value: Box<Expr>,
    },

    /// Read through a reference: `*e`.
    Dereference(Box<Expr>),
    /// Heap allocation `new e` / `new:l e`.
    New {
        operand: Box<Expr>,
        lifetime: Option<Lifetime>,
    },
    /// Taking the address of a named callable: `&f`.
    LambdaAccess {
        link: CalleeLink,
    },
    LambdaDecl(Box<LambdaDecl>),
}

impl Expr {
    /// True if this expression is a bare variable access (the only shape a
    /// type test refines).
    pub fn as_variable_access(&self) -> Option<VarId> {
        match &self.kind {
            ExprKind::VariableAccess { var } => Some(*var),
            _ => None,
        }
    }
}
