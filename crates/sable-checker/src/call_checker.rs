//! Callable candidate resolution.
//!
//! Name resolution leaves a non-empty candidate set on every direct
//! invocation; this module binds it to a unique signature. Candidates are
//! filtered by arity, lifetime-variable binding, and argument subtyping
//! (relaxed), then the most specific survivor wins. Zero or several
//! remaining candidates is an ambiguity error.

use crate::context::CheckerState;
use crate::environment::Environment;
use rustc_hash::FxHashMap;
use sable_ast::{CalleeLink, DeclIndex, Expr, ExprKind};
use sable_common::{ErrorCode, Span};
use sable_solver::{bind_lifetimes, substitute_lifetimes, CallableShape, TypeId, TypeKey};
use tracing::trace;

impl<'a> CheckerState<'a> {
    /// Check a direct or indirect invocation, producing its return values.
    pub(crate) fn check_invocation(
        &mut self,
        expr: &'a Expr,
        env: &Environment,
    ) -> Option<Vec<TypeId>> {
        match &expr.kind {
            ExprKind::Invoke { link, args } => {
                let mut arg_types = Vec::with_capacity(args.len());
                for arg in args {
                    arg_types.push(self.check_expr(arg, env)?);
                }
                let (target, signature) = self.resolve_callable(link, &arg_types, env, expr.span)?;
                self.annotations.record_call_target(expr.id, target);
                let shape = self.callable_shape(signature);
                // Arguments fit the bound signature by construction; the
                // per-argument subtype check happened during filtering.
                self.record_invocation_type(expr, &shape, env);
                Some(shape.returns.to_vec())
            }
            ExprKind::IndirectInvoke { source, args } => {
                let source_ty = self.check_expr(source, env)?;
                let projected = sable_solver::extract(
                    self.types,
                    source_ty,
                    sable_solver::Projection::ReadableCallable,
                    env.lifetimes(),
                );
                let Some(projected) = projected else {
                    let name = self.type_name(source_ty);
                    self.error_at(source.span, ErrorCode::ExpectedLambda, &[&name]);
                    return None;
                };
                let shape = self.callable_shape(projected);
                if args.len() < shape.params.len() {
                    self.error_at(expr.span, ErrorCode::InsufficientArguments, &[]);
                }
                for (arg, &param) in args.iter().zip(shape.params.iter()) {
                    let arg_ty = self.check_expr(arg, env);
                    let rel = env.lifetimes().clone();
                    self.check_subtype(arg_ty, Some(param), &rel, arg.span);
                }
                self.record_invocation_type(expr, &shape, env);
                Some(shape.returns.to_vec())
            }
            _ => unreachable!("check_invocation on a non-invocation expression"),
        }
    }

    fn callable_shape(&self, signature: TypeId) -> CallableShape {
        match self.types.lookup(signature) {
            TypeKey::Callable(shape) => shape,
            other => unreachable!("callable signature resolved to {other:?}"),
        }
    }

    /// Single-return invocations get an expression type annotation; void
    /// and multi-return invocations only appear in statement and
    /// multi-assignment positions.
    fn record_invocation_type(&mut self, expr: &'a Expr, shape: &CallableShape, env: &Environment) {
        if let [ret] = shape.returns.as_slice() {
            let concrete = self.concrete(*ret, env.lifetimes());
            self.annotations.record_expr_type(expr.id, concrete);
        }
    }

    /// The type-inference oracle: reduce a candidate set to one signature.
    pub(crate) fn resolve_callable(
        &mut self,
        link: &CalleeLink,
        args: &[TypeId],
        env: &Environment,
        span: Span,
    ) -> Option<(DeclIndex, TypeId)> {
        let rel = env.lifetimes().clone();

        // Too few arguments for every candidate is its own diagnostic,
        // before ambiguity reporting.
        let signatures: Vec<TypeId> = link
            .candidates
            .iter()
            .filter_map(|&c| self.signature(c))
            .collect();
        let arities: Vec<usize> = signatures
            .iter()
            .map(|&sig| self.callable_shape(sig).params.len())
            .collect();
        if !arities.is_empty() && arities.iter().all(|&n| n > args.len()) {
            self.error_at(span, ErrorCode::InsufficientArguments, &[]);
            return None;
        }

        let mut survivors: Vec<(DeclIndex, TypeId)> = Vec::new();
        for &candidate in &link.candidates {
            let Some(signature) = self.signature(candidate) else {
                continue;
            };
            let shape = self.callable_shape(signature);
            if shape.params.len() != args.len() {
                continue;
            }
            // Bind lifetime variables by structural match, then check each
            // argument against the bound parameter.
            let bound_signature = if shape.lifetimes.is_empty() {
                signature
            } else {
                let mut binding = FxHashMap::default();
                for (&param, &arg) in shape.params.iter().zip(args.iter()) {
                    bind_lifetimes(self.types, param, arg, &shape.lifetimes, &mut binding);
                }
                substitute_lifetimes(self.types, signature, &binding)
            };
            let bound = self.callable_shape(bound_signature);
            let matches = bound
                .params
                .iter()
                .zip(args.iter())
                .all(|(&param, &arg)| self.subtypes.is_subtype(arg, param, &rel));
            if matches {
                survivors.push((candidate, bound_signature));
            } else {
                trace!(candidate = candidate.0, "candidate eliminated");
            }
        }

        match survivors.as_slice() {
            [] => {
                let name = self.atom_name(link.name);
                self.error_at(span, ErrorCode::AmbiguousCallable, &[&name]);
                None
            }
            [only] => Some(*only),
            _ => self.most_specific(&survivors, &rel, link, span),
        }
    }

    /// Among several matching candidates, prefer the one whose parameter
    /// tuple is a subtype of every other's. No unique winner means the call
    /// is ambiguous.
    fn most_specific(
        &mut self,
        survivors: &[(DeclIndex, TypeId)],
        rel: &sable_solver::LifetimeRel,
        link: &CalleeLink,
        span: Span,
    ) -> Option<(DeclIndex, TypeId)> {
        let shapes: Vec<CallableShape> = survivors
            .iter()
            .map(|&(_, sig)| self.callable_shape(sig))
            .collect();
        let mut winners = Vec::new();
        for (i, candidate) in shapes.iter().enumerate() {
            let beats_all = shapes.iter().enumerate().all(|(j, other)| {
                i == j
                    || candidate
                        .params
                        .iter()
                        .zip(other.params.iter())
                        .all(|(&mine, &theirs)| self.subtypes.is_subtype(mine, theirs, rel))
            });
            if beats_all {
                winners.push(survivors[i]);
            }
        }
        match winners.as_slice() {
            [winner] => Some(*winner),
            _ => {
                let name = self.atom_name(link.name);
                self.error_at(span, ErrorCode::AmbiguousCallable, &[&name]);
                None
            }
        }
    }
}
