//! The subtype operator and the contractiveness check.
//!
//! `S <: T` reduces to emptiness of `S ∧ ¬T`. The checker bundles both
//! oracle modes: relaxed answers user-facing subtype questions (refinement
//! types stay inhabited), strict drives dead-branch detection.

use crate::emptiness::{EmptinessChecker, Mode};
use crate::intern::{NominalId, TypeId, TypeInterner, TypeKey};
use crate::lifetimes::LifetimeRel;
use rustc_hash::FxHashSet;

/// Answers subtype and emptiness queries in both oracle modes.
pub struct SubtypeChecker<'a> {
    types: &'a TypeInterner,
    strict: EmptinessChecker<'a>,
    relaxed: EmptinessChecker<'a>,
}

impl<'a> SubtypeChecker<'a> {
    pub fn new(types: &'a TypeInterner) -> Self {
        SubtypeChecker {
            types,
            strict: EmptinessChecker::new(types, Mode::Strict),
            relaxed: EmptinessChecker::new(types, Mode::Relaxed),
        }
    }

    pub fn types(&self) -> &'a TypeInterner {
        self.types
    }

    /// User-facing subtyping (relaxed oracle).
    pub fn is_subtype(&mut self, sub: TypeId, sup: TypeId, rel: &LifetimeRel) -> bool {
        self.relaxed.is_subtype(sub, sup, rel)
    }

    /// Structural subtyping with refinements unfolded (strict oracle).
    pub fn is_subtype_strict(&mut self, sub: TypeId, sup: TypeId, rel: &LifetimeRel) -> bool {
        self.strict.is_subtype(sub, sup, rel)
    }

    /// Strict emptiness; drives dead-branch detection on type tests.
    pub fn is_void_strict(&mut self, ty: TypeId, rel: &LifetimeRel) -> bool {
        self.strict.is_void(ty, rel)
    }

    /// Relaxed emptiness.
    pub fn is_void_relaxed(&mut self, ty: TypeId, rel: &LifetimeRel) -> bool {
        self.relaxed.is_void(ty, rel)
    }

    /// Mutable access to the strict oracle (used by the concrete extractor).
    pub fn strict_oracle(&mut self) -> &mut EmptinessChecker<'a> {
        &mut self.strict
    }

    /// True if every cycle from `nominal` back to itself passes through a
    /// non-nominal constructor. Non-contractive declarations (`type cyc is
    /// cyc`) denote no values and are rejected with `EMPTY_TYPE`.
    pub fn is_contractive(&self, nominal: NominalId) -> bool {
        let mut visited = FxHashSet::default();
        self.contractive_walk(self.types.nominal_body(nominal), nominal, &mut visited)
    }

    fn contractive_walk(
        &self,
        ty: TypeId,
        target: NominalId,
        visited: &mut FxHashSet<NominalId>,
    ) -> bool {
        // Unions, intersections, negations, and nominal links are
        // transparent; any constructor (atom, array, record, reference,
        // callable) grounds the path.
        match self.types.lookup(ty) {
            TypeKey::Nominal(n) => {
                if n == target {
                    return false;
                }
                if !visited.insert(n) {
                    return true;
                }
                self.contractive_walk(self.types.nominal_body(n), target, visited)
            }
            TypeKey::Union(children) | TypeKey::Intersection(children) => children
                .iter()
                .all(|&child| self.contractive_walk(child, target, visited)),
            TypeKey::Negation(inner) => self.contractive_walk(inner, target, visited),
            _ => true,
        }
    }
}
