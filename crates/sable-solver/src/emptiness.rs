//! The emptiness oracle: decides whether a semantic type is uninhabited.
//!
//! Subtyping reduces to emptiness (`S <: T` iff `S ∧ ¬T` is empty), so this
//! module is where all structural decisions live. The algorithm normalizes
//! the queried type to a disjunction of conjunctions of signed literals,
//! then decides each conjunction by combining its positive literals into a
//! single shape and testing each negative literal against it.
//!
//! The oracle is conservative: it never answers "empty" for an inhabited
//! type. Under resource pressure (clause explosion, extreme depth) it
//! answers "not empty" and logs a warning.
//!
//! Recursive nominal types terminate through an in-progress memo table
//! keyed by the conjunction currently being decided: re-encountering the
//! same conjunction on the same path discharges it coinductively.

use crate::intern::{CallableShape, RecordShape, TypeId, TypeInterner, TypeKey};
use crate::lifetimes::LifetimeRel;
use rustc_hash::FxHashSet;
use sable_common::{limits, Lifetime};
use tracing::warn;

/// Oracle mode.
///
/// `Strict` unfolds refinement-bearing nominals into their bodies, treating
/// `nat` structurally as `int`; it is used for dead-branch detection.
/// `Relaxed` keeps a negated refinement-bearing nominal potentially
/// inhabited, so that `int ∧ ¬nat` does not collapse to empty; it is used
/// for user-facing subtype checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Strict,
    Relaxed,
}

/// A conjunction of signed literals.
///
/// Literals are atoms, nominals, arrays, records, references, or callables;
/// union/intersection/negation structure has been normalized away.
#[derive(Clone, Debug, Default)]
pub(crate) struct Conjunct {
    pub pos: Vec<TypeId>,
    pub neg: Vec<TypeId>,
}

impl Conjunct {
    fn merge(&self, other: &Conjunct) -> Conjunct {
        let mut pos = self.pos.clone();
        pos.extend_from_slice(&other.pos);
        let mut neg = self.neg.clone();
        neg.extend_from_slice(&other.neg);
        Conjunct { pos, neg }
    }

    fn signature(&self) -> (Box<[TypeId]>, Box<[TypeId]>) {
        let mut pos = self.pos.clone();
        let mut neg = self.neg.clone();
        pos.sort_unstable();
        pos.dedup();
        neg.sort_unstable();
        neg.dedup();
        (pos.into_boxed_slice(), neg.into_boxed_slice())
    }
}

/// The combined positive part of a conjunction.
enum PosShape {
    /// No positive literal: implicitly `any`.
    Top,
    Atom(TypeId),
    Array(TypeId),
    Record(RecordShape),
    Reference(TypeId, Lifetime),
    Callable(CallableShape),
}

/// Decides `⊥(T)` under a lifetime relation.
pub struct EmptinessChecker<'a> {
    types: &'a TypeInterner,
    mode: Mode,
    in_progress: FxHashSet<(Box<[TypeId]>, Box<[TypeId]>)>,
    depth: u32,
}

impl<'a> EmptinessChecker<'a> {
    pub fn new(types: &'a TypeInterner, mode: Mode) -> Self {
        EmptinessChecker {
            types,
            mode,
            in_progress: FxHashSet::default(),
            depth: 0,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn types(&self) -> &'a TypeInterner {
        self.types
    }

    /// True if no value inhabits `ty`.
    pub fn is_void(&mut self, ty: TypeId, rel: &LifetimeRel) -> bool {
        self.depth = 0;
        self.is_void_rec(ty, rel)
    }

    /// Subtyping via emptiness: `sub <: sup` iff `sub ∧ ¬sup` is empty.
    pub fn is_subtype(&mut self, sub: TypeId, sup: TypeId, rel: &LifetimeRel) -> bool {
        let gap = self.types.difference(sub, sup);
        self.depth = 0;
        self.is_void_rec(gap, rel)
    }

    pub(crate) fn is_void_rec(&mut self, ty: TypeId, rel: &LifetimeRel) -> bool {
        if self.depth >= limits::MAX_EMPTINESS_DEPTH {
            warn!(depth = self.depth, "emptiness depth limit hit; answering conservatively");
            return false;
        }
        self.depth += 1;
        let result = match self.dnf(ty, true) {
            None => false,
            Some(clauses) => clauses.iter().all(|c| self.conjunct_is_void(c, rel)),
        };
        self.depth -= 1;
        result
    }

    fn subtype_rec(&mut self, sub: TypeId, sup: TypeId, rel: &LifetimeRel) -> bool {
        let gap = self.types.difference(sub, sup);
        self.is_void_rec(gap, rel)
    }

    // =========================================================================
    // Disjunctive normal form
    // =========================================================================

    /// Normalize `ty` (or `¬ty` when `positive` is false) into clauses.
    /// Returns `None` if the clause count explodes past the limit.
    pub(crate) fn dnf(&self, ty: TypeId, positive: bool) -> Option<Vec<Conjunct>> {
        match self.types.lookup(ty) {
            TypeKey::Union(children) => {
                if positive {
                    self.dnf_concat(&children, true)
                } else {
                    self.dnf_cross(&children, false)
                }
            }
            TypeKey::Intersection(children) => {
                if positive {
                    self.dnf_cross(&children, true)
                } else {
                    self.dnf_concat(&children, false)
                }
            }
            TypeKey::Negation(inner) => self.dnf(inner, !positive),
            _ => Some(vec![if positive {
                Conjunct {
                    pos: vec![ty],
                    neg: Vec::new(),
                }
            } else {
                Conjunct {
                    pos: Vec::new(),
                    neg: vec![ty],
                }
            }]),
        }
    }

    fn dnf_concat(&self, children: &[TypeId], positive: bool) -> Option<Vec<Conjunct>> {
        let mut clauses = Vec::new();
        for &child in children {
            clauses.extend(self.dnf(child, positive)?);
            if clauses.len() > limits::MAX_DNF_CLAUSES {
                warn!("clause limit hit while normalizing; answering conservatively");
                return None;
            }
        }
        Some(clauses)
    }

    fn dnf_cross(&self, children: &[TypeId], positive: bool) -> Option<Vec<Conjunct>> {
        let mut acc = vec![Conjunct::default()];
        for &child in children {
            let rhs = self.dnf(child, positive)?;
            let mut next = Vec::with_capacity(acc.len() * rhs.len());
            for left in &acc {
                for right in &rhs {
                    next.push(left.merge(right));
                }
            }
            if next.len() > limits::MAX_DNF_CLAUSES {
                warn!("clause limit hit while normalizing; answering conservatively");
                return None;
            }
            acc = next;
        }
        Some(acc)
    }

    // =========================================================================
    // Per-conjunction emptiness
    // =========================================================================

    pub(crate) fn conjunct_is_void(&mut self, conj: &Conjunct, rel: &LifetimeRel) -> bool {
        // Trivial literals first.
        if conj.pos.contains(&TypeId::VOID) || conj.neg.contains(&TypeId::ANY) {
            return true;
        }
        // An exact positive/negative contradiction: t ∧ ¬t. This fires
        // before nominal unfolding, which is what keeps `nat <: nat`
        // reflexive in both oracle modes.
        if conj.pos.iter().any(|p| conj.neg.contains(p)) {
            return true;
        }

        let key = conj.signature();
        if self.in_progress.contains(&key) {
            // Coinductive assumption: the conjunction under test is assumed
            // empty on the path that re-derived it.
            return true;
        }
        self.in_progress.insert(key.clone());
        let result = self.conjunct_is_void_inner(conj, rel);
        self.in_progress.remove(&key);
        result
    }

    fn conjunct_is_void_inner(&mut self, conj: &Conjunct, rel: &LifetimeRel) -> bool {
        // Unfold nominal literals, then re-normalize. The in-progress entry
        // for this conjunction stays live across the recursion, breaking
        // cycles through recursive nominals.
        if let Some(rebuilt) = self.unfold_step(conj) {
            return self.is_void_rec(rebuilt, rel);
        }

        // Combine positive literals into a single shape.
        let mut shape = PosShape::Top;
        for &p in &conj.pos {
            match self.combine_positive(shape, p, rel) {
                Some(next) => shape = next,
                None => return true,
            }
        }

        // A combined shape can be empty on its own: records demand a value
        // per field and references demand an inhabited referent. Arrays do
        // not - the empty array inhabits even `void[]`.
        match &shape {
            PosShape::Record(record) => {
                let fields: Vec<TypeId> = record.fields.iter().map(|(_, t)| *t).collect();
                for field_ty in fields {
                    if self.is_void_rec(field_ty, rel) {
                        return true;
                    }
                }
            }
            PosShape::Reference(elem, _) => {
                let elem = *elem;
                if self.is_void_rec(elem, rel) {
                    return true;
                }
            }
            _ => {}
        }

        // Each negative literal can individually annihilate the positive
        // shape. Checking them one at a time is conservative (a union of
        // negatives could jointly cover the shape without any single one
        // doing so), which is the sound direction.
        for &n in &conj.neg {
            if self.negative_annihilates(&shape, n, rel) {
                return true;
            }
        }

        false
    }

    /// Replace nominal literals per the oracle mode. Returns the rebuilt
    /// term if anything changed, `None` when the conjunction is nominal-free.
    fn unfold_step(&self, conj: &Conjunct) -> Option<TypeId> {
        let mut changed = false;
        let mut parts: Vec<TypeId> = Vec::with_capacity(conj.pos.len() + conj.neg.len());
        for &p in &conj.pos {
            if let TypeKey::Nominal(n) = self.types.lookup(p) {
                // Positive nominals unfold to their body in both modes; the
                // body over-approximates the refined type, so any emptiness
                // proven for it holds for the nominal too.
                parts.push(self.types.nominal_body(n));
                changed = true;
            } else {
                parts.push(p);
            }
        }
        for &n_lit in &conj.neg {
            if let TypeKey::Nominal(n) = self.types.lookup(n_lit) {
                changed = true;
                let unfold = match self.mode {
                    Mode::Strict => true,
                    Mode::Relaxed => !self.types.nominal_has_invariant(n),
                };
                if unfold {
                    parts.push(self.types.negation(self.types.nominal_body(n)));
                }
                // Relaxed mode drops a negated refinement-bearing nominal:
                // dropping a negative literal only enlarges the conjunction,
                // so emptiness claims stay sound, and `int ∧ ¬nat` stops
                // collapsing to empty.
            } else {
                parts.push(self.types.negation(n_lit));
            }
        }
        changed.then(|| self.types.intersection(parts))
    }

    // =========================================================================
    // Positive combination
    // =========================================================================

    fn combine_positive(
        &mut self,
        shape: PosShape,
        lit: TypeId,
        rel: &LifetimeRel,
    ) -> Option<PosShape> {
        let key = self.types.lookup(lit);
        let incoming = match key {
            TypeKey::Any => return Some(shape),
            TypeKey::Null | TypeKey::Bool | TypeKey::Byte | TypeKey::Int => PosShape::Atom(lit),
            TypeKey::Array(elem) => PosShape::Array(elem),
            TypeKey::Record(record) => PosShape::Record(record),
            TypeKey::Reference(elem, lt) => PosShape::Reference(elem, lt),
            TypeKey::Callable(callable) => PosShape::Callable(callable),
            TypeKey::Void
            | TypeKey::Nominal(_)
            | TypeKey::Union(_)
            | TypeKey::Intersection(_)
            | TypeKey::Negation(_) => {
                unreachable!("non-literal survived normalization: {key:?}")
            }
        };
        match (shape, incoming) {
            (PosShape::Top, incoming) => Some(incoming),
            // Two distinct atomic kinds cannot overlap.
            (PosShape::Atom(a), PosShape::Atom(b)) => (a == b).then_some(PosShape::Atom(a)),
            (PosShape::Array(e1), PosShape::Array(e2)) => {
                Some(PosShape::Array(self.types.intersection(vec![e1, e2])))
            }
            (PosShape::Record(r1), PosShape::Record(r2)) => {
                self.types.record_meet(&r1, &r2).map(PosShape::Record)
            }
            (PosShape::Reference(e1, l1), PosShape::Reference(e2, l2)) => {
                let elem = self.types.intersection(vec![e1, e2]);
                // Keep the outer lifetime when comparable; either component
                // is sound for the later negative checks.
                let lt = if l1 == l2 || rel.is_within(l1, l2) {
                    l1
                } else {
                    l2
                };
                Some(PosShape::Reference(elem, lt))
            }
            (PosShape::Callable(c1), PosShape::Callable(c2)) => self.callable_meet(&c1, &c2),
            // Mixed constructor kinds never overlap.
            _ => None,
        }
    }

    fn callable_meet(&self, a: &CallableShape, b: &CallableShape) -> Option<PosShape> {
        // A single callable value has one arity.
        if a.params.len() != b.params.len() || a.returns.len() != b.returns.len() {
            return None;
        }
        let params = a
            .params
            .iter()
            .zip(b.params.iter())
            .map(|(&p1, &p2)| self.types.union(vec![p1, p2]))
            .collect();
        let returns = a
            .returns
            .iter()
            .zip(b.returns.iter())
            .map(|(&r1, &r2)| self.types.intersection(vec![r1, r2]))
            .collect();
        let mut lifetimes = a.lifetimes.clone();
        for &lt in &b.lifetimes {
            if !lifetimes.contains(&lt) {
                lifetimes.push(lt);
            }
        }
        Some(PosShape::Callable(CallableShape {
            kind: a.kind.meet(b.kind),
            params,
            returns,
            lifetimes,
        }))
    }

    // =========================================================================
    // Negative literals
    // =========================================================================

    fn negative_annihilates(&mut self, shape: &PosShape, neg: TypeId, rel: &LifetimeRel) -> bool {
        match (shape, self.types.lookup(neg)) {
            (_, TypeKey::Void) => false,
            (PosShape::Atom(a), TypeKey::Null | TypeKey::Bool | TypeKey::Byte | TypeKey::Int) => {
                *a == neg
            }
            (PosShape::Array(e1), TypeKey::Array(e2)) => self.subtype_rec(*e1, e2, rel),
            (PosShape::Record(r1), TypeKey::Record(r2)) => {
                let r1 = r1.clone();
                self.record_subtype(&r1, &r2, rel)
            }
            (PosShape::Reference(e1, l1), TypeKey::Reference(e2, l2)) => {
                // References are invariant in their element; the target
                // lifetime must be within the source lifetime.
                let (e1, l1) = (*e1, *l1);
                rel.is_within(l2, l1)
                    && self.subtype_rec(e1, e2, rel)
                    && self.subtype_rec(e2, e1, rel)
            }
            (PosShape::Callable(c1), TypeKey::Callable(c2)) => {
                let c1 = c1.clone();
                self.callable_subtype(&c1, &c2, rel)
            }
            _ => false,
        }
    }

    pub(crate) fn record_subtype(
        &mut self,
        sub: &RecordShape,
        sup: &RecordShape,
        rel: &LifetimeRel,
    ) -> bool {
        // Every field the supertype demands must be present and subtyped.
        for &(name, sup_ty) in sup.fields.iter() {
            match sub.field(name) {
                Some(sub_ty) => {
                    if !self.subtype_rec(sub_ty, sup_ty, rel) {
                        return false;
                    }
                }
                None => return false,
            }
        }
        if !sup.open {
            // A closed supertype admits no extra fields, known or unknown.
            if sub.open {
                return false;
            }
            for &(name, _) in sub.fields.iter() {
                if !sup.has_field(name) {
                    return false;
                }
            }
        }
        true
    }

    fn callable_subtype(
        &mut self,
        sub: &CallableShape,
        sup: &CallableShape,
        rel: &LifetimeRel,
    ) -> bool {
        if sub.kind != sup.kind
            || sub.params.len() != sup.params.len()
            || sub.returns.len() != sup.returns.len()
        {
            return false;
        }
        // Parameters contravariant, returns covariant.
        for (&sub_p, &sup_p) in sub.params.iter().zip(sup.params.iter()) {
            if !self.subtype_rec(sup_p, sub_p, rel) {
                return false;
            }
        }
        for (&sub_r, &sup_r) in sub.returns.iter().zip(sup.returns.iter()) {
            if !self.subtype_rec(sub_r, sup_r, rel) {
                return false;
            }
        }
        true
    }
}
