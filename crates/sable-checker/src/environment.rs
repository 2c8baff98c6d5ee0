//! The refinement environment.
//!
//! An environment maps each live variable to its current known type (always
//! a subtype of its declared type) and carries the within-relation on
//! lifetimes. `Bottom` marks unreachable program points; it is the identity
//! of the join and absorbs sequential composition.
//!
//! Environments are value-like: refinement clones, so branch environments
//! never alias.

use rustc_hash::FxHashMap;
use sable_ast::VarId;
use sable_solver::{LifetimeRel, TypeId, TypeInterner};

/// The live part of an environment.
#[derive(Clone, Debug, Default)]
pub struct FlowState {
    vars: FxHashMap<VarId, TypeId>,
    lifetimes: LifetimeRel,
}

/// A per-variable refinement map, or `Bottom` for unreachable points.
#[derive(Clone, Debug)]
pub enum Environment {
    Bottom,
    Live(FlowState),
}

impl Environment {
    /// A fresh environment with no variables and an empty lifetime relation.
    pub fn new() -> Self {
        Environment::Live(FlowState::default())
    }

    pub fn is_bottom(&self) -> bool {
        matches!(self, Environment::Bottom)
    }

    fn state(&self) -> &FlowState {
        match self {
            Environment::Live(state) => state,
            Environment::Bottom => panic!("lookup against BOTTOM environment"),
        }
    }

    fn state_mut(&mut self) -> &mut FlowState {
        match self {
            Environment::Live(state) => state,
            Environment::Bottom => panic!("mutation of BOTTOM environment"),
        }
    }

    /// The current known type of a variable.
    ///
    /// Panics on `Bottom` or on a variable that was never declared; both are
    /// checker bugs, not user errors.
    pub fn lookup(&self, var: VarId) -> TypeId {
        *self
            .state()
            .vars
            .get(&var)
            .unwrap_or_else(|| panic!("variable {var:?} not declared in environment"))
    }

    pub fn is_declared(&self, var: VarId) -> bool {
        match self {
            Environment::Live(state) => state.vars.contains_key(&var),
            Environment::Bottom => false,
        }
    }

    /// Bind a newly declared variable.
    pub fn declare(&mut self, var: VarId, ty: TypeId) {
        self.state_mut().vars.insert(var, ty);
    }

    /// A copy of this environment with `var`'s known type replaced.
    pub fn refine(&self, var: VarId, ty: TypeId) -> Environment {
        let mut state = self.state().clone();
        state.vars.insert(var, ty);
        Environment::Live(state)
    }

    pub fn lifetimes(&self) -> &LifetimeRel {
        &self.state().lifetimes
    }

    pub fn lifetimes_mut(&mut self) -> &mut LifetimeRel {
        &mut self.state_mut().lifetimes
    }

    /// Join at a merge point: variable-wise union of known types. `Bottom`
    /// is the identity.
    pub fn union(&self, other: &Environment, types: &TypeInterner) -> Environment {
        match (self, other) {
            (Environment::Bottom, _) => other.clone(),
            (_, Environment::Bottom) => self.clone(),
            (Environment::Live(left), Environment::Live(right)) => {
                let mut vars = FxHashMap::default();
                for (&var, &left_ty) in &left.vars {
                    // Variables declared in only one branch go out of scope
                    // at the join.
                    if let Some(&right_ty) = right.vars.get(&var) {
                        vars.insert(var, types.union(vec![left_ty, right_ty]));
                    }
                }
                Environment::Live(FlowState {
                    vars,
                    lifetimes: left.lifetimes.clone(),
                })
            }
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Environment::new()
    }
}
