//! Programmatic AST construction.
//!
//! Parsing is an external collaborator; hosts and tests assemble units
//! through this builder, which hands out `NodeId`s, `VarId`s, and distinct
//! synthetic spans. Distinct spans matter: diagnostics deduplicate by
//! (span, code), so two different nodes must never share a span.

use crate::decl::{CallableDecl, Modifiers, Parameter, TypeDecl};
use crate::expr::{CalleeLink, Expr, ExprKind, Value};
use crate::stmt::*;
use crate::types::TypeExpr;
use crate::{DeclIndex, NodeId, VarId};
use sable_common::{Atom, CallableKind, Interner, Span};
use smallvec::SmallVec;
use std::cell::Cell;

/// Builds AST nodes with automatically assigned ids and spans.
pub struct Builder<'a> {
    interner: &'a Interner,
    next_node: Cell<u32>,
    next_var: Cell<u32>,
    next_pos: Cell<u32>,
}

impl<'a> Builder<'a> {
    pub fn new(interner: &'a Interner) -> Self {
        Builder {
            interner,
            next_node: Cell::new(0),
            next_var: Cell::new(0),
            next_pos: Cell::new(0),
        }
    }

    pub fn atom(&self, s: &str) -> Atom {
        self.interner.intern(s)
    }

    pub fn fresh_var(&self) -> VarId {
        let v = self.next_var.get();
        self.next_var.set(v + 1);
        VarId(v)
    }

    /// A fresh one-byte span. Every node gets its own.
    pub fn span(&self) -> Span {
        let p = self.next_pos.get();
        self.next_pos.set(p + 1);
        Span::new(p, p + 1)
    }

    pub fn expr(&self, kind: ExprKind) -> Expr {
        let n = self.next_node.get();
        self.next_node.set(n + 1);
        Expr {
            id: NodeId(n),
            span: self.span(),
            kind,
        }
    }

    // =========================================================================
    // Constants and accesses
    // =========================================================================

    pub fn int(&self, v: i64) -> Expr {
        self.expr(ExprKind::Constant(Value::Int(v)))
    }

    pub fn byte(&self, v: u8) -> Expr {
        self.expr(ExprKind::Constant(Value::Byte(v)))
    }

    pub fn bool(&self, v: bool) -> Expr {
        self.expr(ExprKind::Constant(Value::Bool(v)))
    }

    pub fn null(&self) -> Expr {
        self.expr(ExprKind::Constant(Value::Null))
    }

    pub fn string(&self, s: &str) -> Expr {
        self.expr(ExprKind::Constant(Value::String(s.to_string())))
    }

    pub fn var(&self, var: VarId) -> Expr {
        self.expr(ExprKind::VariableAccess { var })
    }

    // =========================================================================
    // Operators
    // =========================================================================

    pub fn not(&self, e: Expr) -> Expr {
        self.expr(ExprKind::LogicalNot(Box::new(e)))
    }

    pub fn and(&self, operands: Vec<Expr>) -> Expr {
        self.expr(ExprKind::LogicalAnd(operands))
    }

    pub fn or(&self, operands: Vec<Expr>) -> Expr {
        self.expr(ExprKind::LogicalOr(operands))
    }

    pub fn implies(&self, lhs: Expr, rhs: Expr) -> Expr {
        self.expr(ExprKind::LogicalImplication(Box::new(lhs), Box::new(rhs)))
    }

    pub fn is_type(&self, operand: Expr, test: TypeExpr) -> Expr {
        self.expr(ExprKind::Is {
            operand: Box::new(operand),
            test,
        })
    }

    pub fn add(&self, lhs: Expr, rhs: Expr) -> Expr {
        self.expr(ExprKind::IntegerAddition(Box::new(lhs), Box::new(rhs)))
    }

    pub fn lt(&self, lhs: Expr, rhs: Expr) -> Expr {
        self.expr(ExprKind::IntegerLessThan(Box::new(lhs), Box::new(rhs)))
    }

    pub fn ge(&self, lhs: Expr, rhs: Expr) -> Expr {
        self.expr(ExprKind::IntegerGreaterOrEqual(Box::new(lhs), Box::new(rhs)))
    }

    pub fn eq(&self, lhs: Expr, rhs: Expr) -> Expr {
        self.expr(ExprKind::Equal(Box::new(lhs), Box::new(rhs)))
    }

    pub fn record_access(&self, source: Expr, field: &str) -> Expr {
        self.expr(ExprKind::RecordAccess {
            source: Box::new(source),
            field: self.atom(field),
        })
    }

    pub fn record_init(&self, fields: Vec<(&str, Expr)>) -> Expr {
        let fields = fields
            .into_iter()
            .map(|(name, e)| (self.atom(name), e))
            .collect();
        self.expr(ExprKind::RecordInitialiser { fields })
    }

    pub fn array_init(&self, elements: Vec<Expr>) -> Expr {
        self.expr(ExprKind::ArrayInitialiser(elements))
    }

    pub fn array_access(&self, source: Expr, index: Expr) -> Expr {
        self.expr(ExprKind::ArrayAccess {
            source: Box::new(source),
            index: Box::new(index),
        })
    }

    pub fn invoke(&self, name: &str, candidates: Vec<DeclIndex>, args: Vec<Expr>) -> Expr {
        self.expr(ExprKind::Invoke {
            link: CalleeLink {
                name: self.atom(name),
                candidates: SmallVec::from_vec(candidates),
            },
            args,
        })
    }

    // =========================================================================
    // Statements
    // =========================================================================

    pub fn var_decl(&self, var: VarId, name: &str, declared: TypeExpr, init: Option<Expr>) -> Stmt {
        Stmt::VariableDecl(VariableDecl {
            var,
            name: self.atom(name),
            declared,
            initialiser: init,
            span: self.span(),
        })
    }

    pub fn assign(&self, lhs: Vec<Expr>, rhs: Vec<Expr>) -> Stmt {
        Stmt::Assign(AssignStmt {
            lhs,
            rhs,
            span: self.span(),
        })
    }

    pub fn ret(&self, values: Vec<Expr>) -> Stmt {
        Stmt::Return(ReturnStmt {
            values,
            span: self.span(),
        })
    }

    pub fn if_else(&self, condition: Expr, true_branch: Block, false_branch: Option<Block>) -> Stmt {
        Stmt::IfElse(IfElseStmt {
            condition,
            true_branch,
            false_branch,
            span: self.span(),
        })
    }

    pub fn while_loop(&self, condition: Expr, invariants: Vec<Expr>, body: Block) -> Stmt {
        Stmt::While(WhileStmt {
            condition,
            invariants,
            body,
            span: self.span(),
        })
    }

    pub fn switch(&self, condition: Expr, cases: Vec<SwitchCase>) -> Stmt {
        Stmt::Switch(SwitchStmt {
            condition,
            cases,
            span: self.span(),
        })
    }

    pub fn case(&self, values: Vec<Expr>, body: Block) -> SwitchCase {
        SwitchCase {
            values,
            body,
            span: self.span(),
        }
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    pub fn param(&self, name: &str, declared: TypeExpr) -> Parameter {
        Parameter {
            var: self.fresh_var(),
            name: self.atom(name),
            declared,
            span: self.span(),
        }
    }

    pub fn function(
        &self,
        name: &str,
        parameters: Vec<Parameter>,
        returns: Vec<Parameter>,
        body: Block,
    ) -> CallableDecl {
        CallableDecl {
            kind: CallableKind::Function,
            name: self.atom(name),
            modifiers: Modifiers::empty(),
            lifetimes: Vec::new(),
            parameters,
            returns,
            requires: Vec::new(),
            ensures: Vec::new(),
            body: Some(body),
            span: self.span(),
        }
    }

    /// A plain type alias `type name is body`.
    pub fn type_alias(&self, name: &str, body: TypeExpr) -> TypeDecl {
        TypeDecl {
            name: self.atom(name),
            modifiers: Modifiers::empty(),
            var: self.fresh_var(),
            var_name: self.atom("$"),
            body,
            invariants: Vec::new(),
            span: self.span(),
        }
    }

    /// A refinement-bearing declaration `type name is (body var_name) where inv`.
    pub fn refined_type(
        &self,
        name: &str,
        var_name: &str,
        body: TypeExpr,
        mk_invariants: impl FnOnce(&Self, VarId) -> Vec<Expr>,
    ) -> TypeDecl {
        let var = self.fresh_var();
        let invariants = mk_invariants(self, var);
        TypeDecl {
            name: self.atom(name),
            modifiers: Modifiers::empty(),
            var,
            var_name: self.atom(var_name),
            body,
            invariants,
            span: self.span(),
        }
    }
}
