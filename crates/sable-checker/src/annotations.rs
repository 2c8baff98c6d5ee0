//! Inferred-type side tables.
//!
//! The checker does not mutate the AST; everything it infers lands here,
//! keyed by expression `NodeId`. Checking is deterministic, so re-running
//! the checker over the same unit reproduces these tables exactly.

use rustc_hash::FxHashMap;
use sable_ast::{DeclIndex, NodeId, VarId};
use sable_solver::TypeId;

/// Everything the checker inferred for one unit.
#[derive(Debug, Default)]
pub struct Annotations {
    /// Concrete type of every successfully checked expression.
    expr_types: FxHashMap<NodeId, TypeId>,
    /// Declared-based type of each checked l-value expression.
    lval_types: FxHashMap<NodeId, TypeId>,
    /// Inferred callable signature of each lambda declaration.
    lambda_types: FxHashMap<NodeId, TypeId>,
    /// Selected candidate for each direct invocation and lambda access.
    call_targets: FxHashMap<NodeId, DeclIndex>,
    /// Variables assigned inside each while/do-while body, keyed by the
    /// loop condition's node id.
    loop_modified: FxHashMap<NodeId, Vec<VarId>>,
}

impl Annotations {
    pub(crate) fn record_expr_type(&mut self, id: NodeId, ty: TypeId) {
        self.expr_types.insert(id, ty);
    }

    pub(crate) fn record_lval_type(&mut self, id: NodeId, ty: TypeId) {
        self.lval_types.insert(id, ty);
    }

    pub(crate) fn record_lambda_type(&mut self, id: NodeId, ty: TypeId) {
        self.lambda_types.insert(id, ty);
    }

    pub(crate) fn record_call_target(&mut self, id: NodeId, decl: DeclIndex) {
        self.call_targets.insert(id, decl);
    }

    pub(crate) fn record_loop_modified(&mut self, condition: NodeId, vars: Vec<VarId>) {
        self.loop_modified.insert(condition, vars);
    }

    pub fn expr_type(&self, id: NodeId) -> Option<TypeId> {
        self.expr_types.get(&id).copied()
    }

    pub fn lval_type(&self, id: NodeId) -> Option<TypeId> {
        self.lval_types.get(&id).copied()
    }

    pub fn lambda_type(&self, id: NodeId) -> Option<TypeId> {
        self.lambda_types.get(&id).copied()
    }

    pub fn call_target(&self, id: NodeId) -> Option<DeclIndex> {
        self.call_targets.get(&id).copied()
    }

    pub fn loop_modified(&self, condition: NodeId) -> Option<&[VarId]> {
        self.loop_modified.get(&condition).map(|v| v.as_slice())
    }

    pub fn expr_types(&self) -> impl Iterator<Item = (NodeId, TypeId)> + '_ {
        self.expr_types.iter().map(|(&id, &ty)| (id, ty))
    }

    /// Equality of the full annotation set; checking is idempotent, so two
    /// passes over the same unit must agree.
    pub fn same_as(&self, other: &Annotations) -> bool {
        self.expr_types == other.expr_types
            && self.lval_types == other.lval_types
            && self.lambda_types == other.lambda_types
            && self.call_targets == other.call_targets
            && self.loop_modified == other.loop_modified
    }
}
