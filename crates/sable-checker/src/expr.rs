//! Expression checking.
//!
//! `check_expr` returns the inferred semantic type of an expression and
//! records its concrete rendition in the annotation tables. A `None` result
//! means an error was already reported somewhere below; callers skip their
//! own checks silently rather than cascading.

use crate::context::CheckerState;
use crate::environment::Environment;
use sable_ast::{Expr, ExprKind, LambdaDecl, QuantifiedVar, Value};
use sable_common::{ErrorCode, Lifetime};
use sable_solver::{extract, Projection, TypeId, TypeKey};

impl<'a> CheckerState<'a> {
    /// Check an expression in value position: exactly one value.
    pub(crate) fn check_expr(&mut self, expr: &'a Expr, env: &Environment) -> Option<TypeId> {
        if matches!(
            expr.kind,
            ExprKind::Invoke { .. } | ExprKind::IndirectInvoke { .. }
        ) {
            let values = self.check_invocation(expr, env)?;
            return match values.len() {
                1 => Some(values[0]),
                _ => {
                    self.error_at(expr.span, ErrorCode::InsufficientReturns, &[]);
                    None
                }
            };
        }
        let ty = self.compute_expr(expr, env)?;
        let concrete = self.concrete(ty, env.lifetimes());
        self.annotations.record_expr_type(expr.id, concrete);
        Some(ty)
    }

    /// Check an expression that may produce several values (a direct or
    /// indirect invocation of a multi-return callable).
    pub(crate) fn check_multi_expr(
        &mut self,
        expr: &'a Expr,
        env: &Environment,
    ) -> Option<Vec<TypeId>> {
        if matches!(
            expr.kind,
            ExprKind::Invoke { .. } | ExprKind::IndirectInvoke { .. }
        ) {
            self.check_invocation(expr, env)
        } else {
            self.check_expr(expr, env).map(|ty| vec![ty])
        }
    }

    /// Check an operand and require it to fit `expected`.
    fn check_operand(
        &mut self,
        expr: &'a Expr,
        env: &Environment,
        expected: TypeId,
    ) -> Option<TypeId> {
        let ty = self.check_expr(expr, env)?;
        let rel = env.lifetimes().clone();
        self.check_subtype(Some(ty), Some(expected), &rel, expr.span);
        Some(ty)
    }

    fn compute_expr(&mut self, expr: &'a Expr, env: &Environment) -> Option<TypeId> {
        match &expr.kind {
            ExprKind::Constant(value) => Some(self.constant_type(value)),
            ExprKind::VariableAccess { var } => Some(env.lookup(*var)),
            ExprKind::StaticVariableAccess { decl } => {
                let Some(sable_ast::Decl::StaticVariable(static_var)) =
                    self.unit.decls.get(decl.index())
                else {
                    panic!("static variable access links to a non-static declaration")
                };
                Some(self.lower_type(&static_var.declared))
            }
            ExprKind::Cast { target, operand } => {
                let operand_ty = self.check_expr(operand, env)?;
                let target_ty = self.lower_type(target);
                let overlap = self.types.intersection(vec![operand_ty, target_ty]);
                let rel = env.lifetimes().clone();
                if self.subtypes.is_void_strict(overlap, &rel) {
                    let from = self.type_name(operand_ty);
                    let to = self.type_name(target_ty);
                    self.error_at(expr.span, ErrorCode::IncomparableOperands, &[&from, &to]);
                    return None;
                }
                Some(target_ty)
            }
            ExprKind::Invoke { .. } | ExprKind::IndirectInvoke { .. } => {
                unreachable!("invocations are handled by check_expr")
            }

            // Logical operators outside condition position are plain
            // boolean expressions.
            ExprKind::LogicalNot(operand) => {
                self.check_operand(operand, env, TypeId::BOOL)?;
                Some(TypeId::BOOL)
            }
            ExprKind::LogicalAnd(operands) | ExprKind::LogicalOr(operands) => {
                for operand in operands {
                    self.check_operand(operand, env, TypeId::BOOL)?;
                }
                Some(TypeId::BOOL)
            }
            ExprKind::LogicalIff(lhs, rhs) | ExprKind::LogicalImplication(lhs, rhs) => {
                self.check_operand(lhs, env, TypeId::BOOL)?;
                self.check_operand(rhs, env, TypeId::BOOL)?;
                Some(TypeId::BOOL)
            }
            ExprKind::Is { operand, .. } => {
                self.check_expr(operand, env)?;
                Some(TypeId::BOOL)
            }
            ExprKind::Quantifier { params, body, .. } => {
                let inner = self.declare_quantified(params, env)?;
                self.check_operand(body, &inner, TypeId::BOOL)?;
                Some(TypeId::BOOL)
            }

            ExprKind::Equal(lhs, rhs) | ExprKind::NotEqual(lhs, rhs) => {
                let lhs_ty = self.check_expr(lhs, env)?;
                let rhs_ty = self.check_expr(rhs, env)?;
                let overlap = self.types.intersection(vec![lhs_ty, rhs_ty]);
                let rel = env.lifetimes().clone();
                if self.subtypes.is_void_strict(overlap, &rel) {
                    let left = self.type_name(lhs_ty);
                    let right = self.type_name(rhs_ty);
                    self.error_at(expr.span, ErrorCode::IncomparableOperands, &[&left, &right]);
                }
                Some(TypeId::BOOL)
            }

            ExprKind::IntegerLessThan(lhs, rhs)
            | ExprKind::IntegerLessOrEqual(lhs, rhs)
            | ExprKind::IntegerGreaterThan(lhs, rhs)
            | ExprKind::IntegerGreaterOrEqual(lhs, rhs) => {
                self.check_operand(lhs, env, TypeId::INT)?;
                self.check_operand(rhs, env, TypeId::INT)?;
                Some(TypeId::BOOL)
            }
            ExprKind::IntegerNegation(operand) => {
                self.check_operand(operand, env, TypeId::INT)?;
                Some(TypeId::INT)
            }
            ExprKind::IntegerAddition(lhs, rhs)
            | ExprKind::IntegerSubtraction(lhs, rhs)
            | ExprKind::IntegerMultiplication(lhs, rhs)
            | ExprKind::IntegerDivision(lhs, rhs)
            | ExprKind::IntegerRemainder(lhs, rhs) => {
                self.check_operand(lhs, env, TypeId::INT)?;
                self.check_operand(rhs, env, TypeId::INT)?;
                Some(TypeId::INT)
            }

            ExprKind::BitwiseComplement(operand) => {
                self.check_operand(operand, env, TypeId::BYTE)?;
                Some(TypeId::BYTE)
            }
            ExprKind::BitwiseAnd(operands)
            | ExprKind::BitwiseOr(operands)
            | ExprKind::BitwiseXor(operands) => {
                for operand in operands {
                    self.check_operand(operand, env, TypeId::BYTE)?;
                }
                Some(TypeId::BYTE)
            }
            ExprKind::BitwiseShiftLeft(lhs, rhs) | ExprKind::BitwiseShiftRight(lhs, rhs) => {
                self.check_operand(lhs, env, TypeId::BYTE)?;
                self.check_operand(rhs, env, TypeId::INT)?;
                Some(TypeId::BYTE)
            }

            ExprKind::RecordInitialiser { fields } => {
                let mut field_types = Vec::with_capacity(fields.len());
                for (name, field) in fields {
                    let ty = self.check_expr(field, env)?;
                    field_types.push((*name, ty));
                }
                Some(self.types.record(false, field_types))
            }
            ExprKind::RecordAccess { source, field } => {
                let source_ty = self.check_expr(source, env)?;
                let record = self.readable_record(source_ty, env, source)?;
                match record.field(*field) {
                    Some(field_ty) => Some(field_ty),
                    None => {
                        let name = self.atom_name(*field);
                        self.error_at(expr.span, ErrorCode::InvalidField, &[&name]);
                        None
                    }
                }
            }
            ExprKind::RecordBorrow { source, field } => {
                let source_ty = self.check_expr(source, env)?;
                let (elem, lifetime) = self.readable_reference(source_ty, env, source)?;
                let record = self.readable_record(elem, env, source)?;
                match record.field(*field) {
                    Some(field_ty) => Some(self.types.reference(field_ty, lifetime)),
                    None => {
                        let name = self.atom_name(*field);
                        self.error_at(expr.span, ErrorCode::InvalidField, &[&name]);
                        None
                    }
                }
            }
            ExprKind::RecordUpdate {
                source,
                field,
                value,
            } => {
                let source_ty = self.check_expr(source, env)?;
                let shape = extract(
                    self.types,
                    source_ty,
                    Projection::WriteableRecord,
                    env.lifetimes(),
                );
                let Some(shape) = shape else {
                    let name = self.type_name(source_ty);
                    self.error_at(source.span, ErrorCode::ExpectedRecord, &[&name]);
                    return None;
                };
                let TypeKey::Record(record) = self.types.lookup(shape) else {
                    unreachable!("writeable-record projection produced a non-record")
                };
                match record.field(*field) {
                    Some(field_ty) => {
                        self.check_operand(value, env, field_ty)?;
                        Some(source_ty)
                    }
                    None => {
                        let name = self.atom_name(*field);
                        self.error_at(expr.span, ErrorCode::InvalidField, &[&name]);
                        None
                    }
                }
            }

            ExprKind::ArrayLength(source) => {
                let source_ty = self.check_expr(source, env)?;
                self.readable_array(source_ty, env, source)?;
                Some(TypeId::INT)
            }
            ExprKind::ArrayInitialiser(elements) => {
                let mut element_types = Vec::with_capacity(elements.len());
                for element in elements {
                    element_types.push(self.check_expr(element, env)?);
                }
                Some(self.types.array(self.types.union(element_types)))
            }
            ExprKind::ArrayGenerator { value, length } => {
                let value_ty = self.check_expr(value, env)?;
                self.check_operand(length, env, TypeId::INT)?;
                Some(self.types.array(value_ty))
            }
            ExprKind::ArrayAccess { source, index } => {
                let source_ty = self.check_expr(source, env)?;
                self.check_operand(index, env, TypeId::INT)?;
                let elem = self.readable_array(source_ty, env, source)?;
                Some(elem)
            }
            ExprKind::ArrayBorrow { source, index } => {
                let source_ty = self.check_expr(source, env)?;
                self.check_operand(index, env, TypeId::INT)?;
                let (elem, lifetime) = self.readable_reference(source_ty, env, source)?;
                let elem = self.readable_array(elem, env, source)?;
                Some(self.types.reference(elem, lifetime))
            }
            ExprKind::ArrayRange { start, end } => {
                self.check_operand(start, env, TypeId::INT)?;
                self.check_operand(end, env, TypeId::INT)?;
                Some(self.types.array(TypeId::INT))
            }
            ExprKind::ArrayUpdate {
                source,
                index,
                value,
            } => {
                let source_ty = self.check_expr(source, env)?;
                self.check_operand(index, env, TypeId::INT)?;
                let shape = extract(
                    self.types,
                    source_ty,
                    Projection::WriteableArray,
                    env.lifetimes(),
                );
                let Some(shape) = shape else {
                    let name = self.type_name(source_ty);
                    self.error_at(source.span, ErrorCode::ExpectedArray, &[&name]);
                    return None;
                };
                let TypeKey::Array(elem) = self.types.lookup(shape) else {
                    unreachable!("writeable-array projection produced a non-array")
                };
                self.check_operand(value, env, elem)?;
                Some(source_ty)
            }

            ExprKind::Dereference(operand) => {
                let operand_ty = self.check_expr(operand, env)?;
                let (elem, _) = self.readable_reference(operand_ty, env, operand)?;
                Some(elem)
            }
            ExprKind::New { operand, lifetime } => {
                let operand_ty = self.check_expr(operand, env)?;
                Some(
                    self.types
                        .reference(operand_ty, lifetime.unwrap_or(Lifetime::Static)),
                )
            }

            ExprKind::LambdaAccess { link } => {
                let mut candidates = Vec::new();
                for &candidate in &link.candidates {
                    if let Some(signature) = self.signature(candidate) {
                        candidates.push((candidate, signature));
                    }
                }
                match candidates.as_slice() {
                    [(candidate, signature)] => {
                        self.annotations.record_call_target(expr.id, *candidate);
                        Some(*signature)
                    }
                    _ => {
                        let name = self.atom_name(link.name);
                        self.error_at(expr.span, ErrorCode::AmbiguousCallable, &[&name]);
                        None
                    }
                }
            }
            ExprKind::LambdaDecl(lambda) => self.check_lambda(expr, lambda, env),
        }
    }

    fn constant_type(&self, value: &Value) -> TypeId {
        match value {
            Value::Null => TypeId::NULL,
            Value::Bool(_) => TypeId::BOOL,
            Value::Byte(_) => TypeId::BYTE,
            // Character literals arrive as Int constants.
            Value::Int(_) => TypeId::INT,
            // String literals are arrays of code points.
            Value::String(_) => self.types.array(TypeId::INT),
        }
    }

    /// Declare quantifier iteration variables (integer ranges) in a copy of
    /// the environment.
    pub(crate) fn declare_quantified(
        &mut self,
        params: &'a [QuantifiedVar],
        env: &Environment,
    ) -> Option<Environment> {
        let mut inner = env.clone();
        for param in params {
            self.check_operand(&param.start, env, TypeId::INT)?;
            self.check_operand(&param.end, env, TypeId::INT)?;
            self.record_declared(param.var, TypeId::INT);
            inner.declare(param.var, TypeId::INT);
        }
        Some(inner)
    }

    /// An anonymous callable: parameters seed a child environment, the body
    /// is an expression, and the inferred signature is recorded.
    fn check_lambda(
        &mut self,
        expr: &'a Expr,
        lambda: &'a LambdaDecl,
        env: &Environment,
    ) -> Option<TypeId> {
        let mut inner = env.clone();
        let mut params = Vec::with_capacity(lambda.parameters.len());
        for param in &lambda.parameters {
            let ty = self.lower_type(&param.declared);
            self.record_declared(param.var, ty);
            inner.declare(param.var, ty);
            params.push(ty);
        }
        let body_ty = self.check_expr(&lambda.body, &inner)?;
        let signature = self
            .types
            .callable(lambda.kind, params, vec![body_ty], Vec::new());
        self.annotations.record_lambda_type(expr.id, signature);
        Some(signature)
    }

    // =========================================================================
    // Shape projections with diagnostics
    // =========================================================================

    fn readable_array(
        &mut self,
        ty: TypeId,
        env: &Environment,
        source: &Expr,
    ) -> Option<TypeId> {
        let shape = extract(self.types, ty, Projection::ReadableArray, env.lifetimes());
        let Some(shape) = shape else {
            let name = self.type_name(ty);
            self.error_at(source.span, ErrorCode::ExpectedArray, &[&name]);
            return None;
        };
        match self.types.lookup(shape) {
            TypeKey::Array(elem) => Some(elem),
            other => unreachable!("readable-array projection produced {other:?}"),
        }
    }

    fn readable_record(
        &mut self,
        ty: TypeId,
        env: &Environment,
        source: &Expr,
    ) -> Option<sable_solver::RecordShape> {
        let shape = extract(self.types, ty, Projection::ReadableRecord, env.lifetimes());
        let Some(shape) = shape else {
            let name = self.type_name(ty);
            self.error_at(source.span, ErrorCode::ExpectedRecord, &[&name]);
            return None;
        };
        match self.types.lookup(shape) {
            TypeKey::Record(record) => Some(record),
            other => unreachable!("readable-record projection produced {other:?}"),
        }
    }

    fn readable_reference(
        &mut self,
        ty: TypeId,
        env: &Environment,
        source: &Expr,
    ) -> Option<(TypeId, Lifetime)> {
        let shape = extract(
            self.types,
            ty,
            Projection::ReadableReference,
            env.lifetimes(),
        );
        let Some(shape) = shape else {
            let name = self.type_name(ty);
            self.error_at(source.span, ErrorCode::ExpectedReference, &[&name]);
            return None;
        };
        match self.types.lookup(shape) {
            TypeKey::Reference(elem, lifetime) => Some((elem, lifetime)),
            other => unreachable!("readable-reference projection produced {other:?}"),
        }
    }
}
