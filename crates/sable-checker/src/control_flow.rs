//! Condition checking with sign.
//!
//! `check_condition(expr, sign, env)` returns the environment refined under
//! the assumption that `expr` evaluates to `sign`. Logical negation flips
//! the sign; conjunction and disjunction split into cases via the De Morgan
//! duality; type tests refine the tested variable using the strict
//! emptiness oracle for dead-branch detection.
//!
//! A `Bottom` input short-circuits: the condition is unreachable and its
//! subexpressions are not visited.

use crate::context::CheckerState;
use crate::environment::Environment;
use sable_ast::{Expr, ExprKind, TypeExpr, Value};
use sable_common::ErrorCode;
use sable_solver::TypeId;
use tracing::trace;

impl<'a> CheckerState<'a> {
    pub(crate) fn check_condition(
        &mut self,
        expr: &'a Expr,
        sign: bool,
        env: Environment,
    ) -> Environment {
        if env.is_bottom() {
            return env;
        }
        match &expr.kind {
            ExprKind::LogicalNot(inner) => {
                self.annotations.record_expr_type(expr.id, TypeId::BOOL);
                self.check_condition(inner, !sign, env)
            }
            ExprKind::LogicalAnd(operands) => {
                self.annotations.record_expr_type(expr.id, TypeId::BOOL);
                if sign {
                    self.thread_operands(operands, true, env)
                } else {
                    // ¬(a ∧ b ∧ ...): some operand is false; for each case,
                    // the earlier operands are known true.
                    self.split_operands(operands, true, env)
                }
            }
            ExprKind::LogicalOr(operands) => {
                self.annotations.record_expr_type(expr.id, TypeId::BOOL);
                if sign {
                    // a ∨ b ∨ ...: some operand is true; for each case, the
                    // earlier operands are known false.
                    self.split_operands(operands, false, env)
                } else {
                    self.thread_operands(operands, false, env)
                }
            }
            ExprKind::LogicalImplication(lhs, rhs) => {
                self.annotations.record_expr_type(expr.id, TypeId::BOOL);
                if sign {
                    // a ⇒ b holds when ¬a, or when a and b.
                    let vacuous = self.check_condition(lhs, false, env.clone());
                    let premised = self.check_condition(lhs, true, env);
                    let satisfied = self.check_condition(rhs, true, premised);
                    vacuous.union(&satisfied, self.types)
                } else {
                    // ¬(a ⇒ b): a holds and b fails.
                    let premised = self.check_condition(lhs, true, env);
                    self.check_condition(rhs, false, premised)
                }
            }
            ExprKind::LogicalIff(lhs, rhs) => {
                // Conservative: assume both sides share the sign.
                self.annotations.record_expr_type(expr.id, TypeId::BOOL);
                let env = self.check_condition(lhs, sign, env);
                self.check_condition(rhs, sign, env)
            }
            ExprKind::Is { operand, test } => self.check_type_test(expr, operand, test, sign, env),
            ExprKind::Quantifier { params, body, .. } => {
                self.annotations.record_expr_type(expr.id, TypeId::BOOL);
                // Iteration variables and body refinements do not escape.
                if let Some(inner) = self.declare_quantified(params, &env) {
                    self.check_condition(body, true, inner);
                }
                env
            }
            ExprKind::Constant(Value::Bool(value)) => {
                self.annotations.record_expr_type(expr.id, TypeId::BOOL);
                if *value == sign {
                    env
                } else {
                    // The branch under this sign can never run.
                    Environment::Bottom
                }
            }
            _ => {
                // Any other expression: type it and require a boolean; no
                // refinement is possible.
                let ty = self.check_expr(expr, &env);
                let rel = env.lifetimes().clone();
                self.check_subtype(ty, Some(TypeId::BOOL), &rel, expr.span);
                env
            }
        }
    }

    /// Thread every operand at the same sign, left to right.
    fn thread_operands(
        &mut self,
        operands: &'a [Expr],
        sign: bool,
        mut env: Environment,
    ) -> Environment {
        for operand in operands {
            env = self.check_condition(operand, sign, env);
        }
        env
    }

    /// One case per operand carrying the flipped sign, with all earlier
    /// operands threaded at `prefix_sign`; the cases are joined.
    fn split_operands(
        &mut self,
        operands: &'a [Expr],
        prefix_sign: bool,
        env: Environment,
    ) -> Environment {
        let mut result = Environment::Bottom;
        let mut prefix = env;
        for operand in operands {
            if prefix.is_bottom() {
                break;
            }
            let case = self.check_condition(operand, !prefix_sign, prefix.clone());
            result = result.union(&case, self.types);
            prefix = self.check_condition(operand, prefix_sign, prefix);
        }
        result
    }

    /// `v is T`: refine the tested variable to `known ∧ T` (sign +) or
    /// `known ∧ ¬T` (sign −). An empty intersection means the true branch
    /// is dead; an empty difference means the false branch is dead. Only a
    /// bare variable access is refined; any other operand still types as a
    /// boolean test.
    fn check_type_test(
        &mut self,
        expr: &'a Expr,
        operand: &'a Expr,
        test: &'a TypeExpr,
        sign: bool,
        env: Environment,
    ) -> Environment {
        self.annotations.record_expr_type(expr.id, TypeId::BOOL);
        let Some(operand_ty) = self.check_expr(operand, &env) else {
            return env;
        };
        let test_ty = self.lower_type(test);

        // For a bare variable access the checked type is the current known
        // type; dead-branch detection applies to any operand.
        let known = operand_ty;
        let rel = env.lifetimes().clone();
        let intersect = self.types.intersection(vec![known, test_ty]);
        let difference = self.types.difference(known, test_ty);

        if self.options.dead_branch_checks {
            if self.subtypes.is_void_strict(intersect, &rel) {
                let known_name = self.type_name(known);
                let test_name = self.type_name(test_ty);
                self.error_at(
                    expr.span,
                    ErrorCode::IncomparableOperands,
                    &[&known_name, &test_name],
                );
            } else if self.subtypes.is_void_strict(difference, &rel) {
                self.error_at(expr.span, ErrorCode::BranchAlwaysTaken, &[]);
            }
        }

        // Only a bare variable access is refined; any other operand keeps
        // the environment unchanged.
        let Some(var) = operand.as_variable_access() else {
            return env;
        };
        let refined = if sign { intersect } else { difference };
        let concrete = self.concrete(refined, &rel);
        trace!(?var, sign, "type test refinement");
        env.refine(var, concrete)
    }
}
