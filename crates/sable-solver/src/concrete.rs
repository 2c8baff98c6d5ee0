//! Reduction of semantic terms to concrete types.
//!
//! A concrete type is the surface-visible representation: unions of atoms,
//! nominals, and structural constructors, with no residual intersections or
//! differences. The checker records one for every expression it visits.
//!
//! Procedure: normalize to a disjunction with the strict oracle, drop empty
//! disjuncts, drop each disjunct's negative literals (an over-approximation
//! in the safe direction for annotations), collapse dominated positives,
//! and rebuild as a union. `void` comes back only when nothing remains,
//! which upstream treats as an error signal.

use crate::emptiness::Conjunct;
use crate::intern::{TypeId, TypeKey};
use crate::lifetimes::LifetimeRel;
use crate::subtype::SubtypeChecker;

/// Reduce `ty` to a concrete type. Nominals are kept symbolic; they are
/// already surface syntax.
pub fn to_concrete(subtypes: &mut SubtypeChecker<'_>, ty: TypeId, rel: &LifetimeRel) -> TypeId {
    let types = subtypes.types();
    let clauses = match subtypes.strict_oracle().dnf(ty, true) {
        Some(clauses) => clauses,
        // Normalization blew the clause limit; hand the term back unreduced.
        None => return ty,
    };
    let mut disjuncts: Vec<TypeId> = Vec::with_capacity(clauses.len());
    for clause in &clauses {
        if subtypes.strict_oracle().conjunct_is_void(clause, rel) {
            continue;
        }
        disjuncts.push(rebuild_clause(subtypes, clause, rel));
    }
    if disjuncts.is_empty() {
        return TypeId::VOID;
    }
    types.union(disjuncts)
}

/// Rebuild one non-empty conjunction as a single concrete term.
fn rebuild_clause(subtypes: &mut SubtypeChecker<'_>, clause: &Conjunct, rel: &LifetimeRel) -> TypeId {
    let types = subtypes.types();
    if clause.pos.is_empty() {
        return TypeId::ANY;
    }
    // Drop any positive literal subsumed by another: `nat ∧ int` is just
    // `nat`. Mutually equivalent literals keep the first.
    let mut kept: Vec<TypeId> = Vec::with_capacity(clause.pos.len());
    for &candidate in &clause.pos {
        if kept.contains(&candidate) {
            continue;
        }
        if kept
            .iter()
            .any(|&k| subtypes.is_subtype(k, candidate, rel))
        {
            continue;
        }
        kept.retain(|&k| !subtypes.is_subtype(candidate, k, rel));
        kept.push(candidate);
    }
    if kept.len() == 1 {
        return kept[0];
    }
    // Same-kind structural literals fold into a single constructor.
    let mut acc = kept[0];
    for &next in &kept[1..] {
        acc = match (types.lookup(acc), types.lookup(next)) {
            (TypeKey::Array(e1), TypeKey::Array(e2)) => {
                let elem = types.intersection(vec![e1, e2]);
                types.array(to_concrete(subtypes, elem, rel))
            }
            (TypeKey::Record(r1), TypeKey::Record(r2)) => match types.record_meet(&r1, &r2) {
                Some(shape) => types.record(shape.open, shape.fields.into_vec()),
                None => return TypeId::VOID,
            },
            // Incomparable leftovers (kept conservative by the oracle):
            // fall back to the raw intersection rather than inventing a
            // shape.
            _ => types.intersection(vec![acc, next]),
        };
    }
    acc
}
