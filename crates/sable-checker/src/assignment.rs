//! L-value checking.
//!
//! L-values type against *declared* types, never against the current
//! refinement: assignment is constrained only by the declaration, so a
//! refined variable can always be widened back by writing to it.

use crate::context::CheckerState;
use crate::environment::Environment;
use sable_ast::{Decl, Expr, ExprKind, VarId};
use sable_common::ErrorCode;
use sable_solver::{extract, Projection, TypeId, TypeKey};

/// What an l-value admits: the type a written value must fit, the root
/// variable whose refinement the write clobbers (none for heap writes), and
/// whether the write replaces the whole variable.
#[derive(Clone, Copy, Debug)]
pub(crate) struct LValInfo {
    pub ty: TypeId,
    pub root: Option<VarId>,
    pub direct: bool,
}

impl<'a> CheckerState<'a> {
    pub(crate) fn check_lval(&mut self, expr: &'a Expr, env: &Environment) -> Option<LValInfo> {
        let info = self.compute_lval(expr, env)?;
        self.annotations.record_lval_type(expr.id, info.ty);
        Some(info)
    }

    fn compute_lval(&mut self, expr: &'a Expr, env: &Environment) -> Option<LValInfo> {
        match &expr.kind {
            ExprKind::VariableAccess { var } => Some(LValInfo {
                ty: self.declared(*var),
                root: Some(*var),
                direct: true,
            }),
            ExprKind::StaticVariableAccess { decl } => {
                let Some(Decl::StaticVariable(static_var)) = self.unit.decls.get(decl.index())
                else {
                    panic!("static variable access links to a non-static declaration")
                };
                Some(LValInfo {
                    ty: self.lower_type(&static_var.declared),
                    root: None,
                    direct: false,
                })
            }
            ExprKind::RecordAccess { source, field } => {
                let base = self.compute_lval(source, env)?;
                let shape = extract(
                    self.types,
                    base.ty,
                    Projection::WriteableRecord,
                    env.lifetimes(),
                );
                let Some(shape) = shape else {
                    let name = self.type_name(base.ty);
                    self.error_at(source.span, ErrorCode::ExpectedRecord, &[&name]);
                    return None;
                };
                let TypeKey::Record(record) = self.types.lookup(shape) else {
                    unreachable!("writeable-record projection produced a non-record")
                };
                match record.field(*field) {
                    Some(field_ty) => Some(LValInfo {
                        ty: field_ty,
                        root: base.root,
                        direct: false,
                    }),
                    None => {
                        let name = self.atom_name(*field);
                        self.error_at(expr.span, ErrorCode::InvalidField, &[&name]);
                        None
                    }
                }
            }
            ExprKind::ArrayAccess { source, index } => {
                let base = self.compute_lval(source, env)?;
                self.check_index(index, env);
                let shape = extract(
                    self.types,
                    base.ty,
                    Projection::WriteableArray,
                    env.lifetimes(),
                );
                let Some(shape) = shape else {
                    let name = self.type_name(base.ty);
                    self.error_at(source.span, ErrorCode::ExpectedArray, &[&name]);
                    return None;
                };
                let TypeKey::Array(elem) = self.types.lookup(shape) else {
                    unreachable!("writeable-array projection produced a non-array")
                };
                Some(LValInfo {
                    ty: elem,
                    root: base.root,
                    direct: false,
                })
            }
            // `*e = v`: the reference is evaluated, so the operand types as
            // an ordinary expression; the write lands on the heap and no
            // variable refinement is clobbered.
            ExprKind::Dereference(operand) => {
                let operand_ty = self.check_expr(operand, env)?;
                let shape = extract(
                    self.types,
                    operand_ty,
                    Projection::WriteableReference,
                    env.lifetimes(),
                );
                let Some(shape) = shape else {
                    let name = self.type_name(operand_ty);
                    self.error_at(operand.span, ErrorCode::ExpectedReference, &[&name]);
                    return None;
                };
                let TypeKey::Reference(elem, _) = self.types.lookup(shape) else {
                    unreachable!("writeable-reference projection produced a non-reference")
                };
                Some(LValInfo {
                    ty: elem,
                    root: None,
                    direct: false,
                })
            }
            _ => unreachable!("invalid l-value shape"),
        }
    }

    fn check_index(&mut self, index: &'a Expr, env: &Environment) {
        let ty = self.check_expr(index, env);
        let rel = env.lifetimes().clone();
        self.check_subtype(ty, Some(TypeId::INT), &rel, index.span);
    }
}
