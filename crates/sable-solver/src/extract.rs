//! Readable and writeable shape projection.
//!
//! Given an arbitrary composite type, project it onto an array, record,
//! reference, or callable shape. Readable projections produce the most
//! specific shape every variant can be read at (a common super-shape);
//! writeable projections produce the shape whose values can be written into
//! every variant (a common sub-shape). That asymmetry is the point: reads
//! accept whatever the value turns out to be, writes must preserve every
//! possible branch.
//!
//! Unions combine readable shapes by join and writeable shapes by meet, and
//! fail if any branch lacks the shape. Intersections are the dual: the
//! combiners swap, and shapeless branches are skipped rather than fatal.

use crate::intern::{CallableShape, RecordShape, TypeId, TypeInterner, TypeKey};
use crate::lifetimes::LifetimeRel;
use indexmap::IndexMap;
use rustc_hash::FxHashSet;
use sable_common::{Atom, Lifetime};

/// The shape being requested. There is no writeable-callable projection:
/// invocation only ever reads the callee.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Projection {
    ReadableArray,
    WriteableArray,
    ReadableRecord,
    WriteableRecord,
    ReadableReference,
    WriteableReference,
    ReadableCallable,
}

impl Projection {
    pub const fn is_readable(self) -> bool {
        matches!(
            self,
            Projection::ReadableArray
                | Projection::ReadableRecord
                | Projection::ReadableReference
                | Projection::ReadableCallable
        )
    }

    fn matches(self, key: &TypeKey) -> bool {
        matches!(
            (self, key),
            (
                Projection::ReadableArray | Projection::WriteableArray,
                TypeKey::Array(_)
            ) | (
                Projection::ReadableRecord | Projection::WriteableRecord,
                TypeKey::Record(_)
            ) | (
                Projection::ReadableReference | Projection::WriteableReference,
                TypeKey::Reference(..)
            ) | (Projection::ReadableCallable, TypeKey::Callable(_))
        )
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Combine {
    Join,
    Meet,
}

impl Combine {
    fn dual(self) -> Combine {
        match self {
            Combine::Join => Combine::Meet,
            Combine::Meet => Combine::Join,
        }
    }
}

/// Project `ty` onto the requested shape, or `None` if it has no such shape.
pub fn extract(
    types: &TypeInterner,
    ty: TypeId,
    projection: Projection,
    rel: &LifetimeRel,
) -> Option<TypeId> {
    let mut extractor = Extractor {
        types,
        rel,
        visiting: FxHashSet::default(),
    };
    extractor.extract(ty, projection)
}

struct Extractor<'a> {
    types: &'a TypeInterner,
    rel: &'a LifetimeRel,
    visiting: FxHashSet<TypeId>,
}

impl<'a> Extractor<'a> {
    fn extract(&mut self, ty: TypeId, projection: Projection) -> Option<TypeId> {
        let key = self.types.lookup(ty);
        if projection.matches(&key) {
            return Some(ty);
        }
        match key {
            TypeKey::Nominal(n) => {
                // Guard against non-contractive links that slipped past
                // declaration checking.
                if !self.visiting.insert(ty) {
                    return None;
                }
                let result = self.extract(self.types.nominal_body(n), projection);
                self.visiting.remove(&ty);
                result
            }
            TypeKey::Union(children) => {
                let op = if projection.is_readable() {
                    Combine::Join
                } else {
                    Combine::Meet
                };
                let mut combined: Option<TypeId> = None;
                for &child in children.iter() {
                    // A branch without the shape sinks the whole union.
                    let shape = self.extract(child, projection)?;
                    combined = Some(match combined {
                        None => shape,
                        Some(acc) => self.combine(acc, shape, op, projection)?,
                    });
                }
                combined
            }
            TypeKey::Intersection(children) => {
                let op = if projection.is_readable() {
                    Combine::Meet
                } else {
                    Combine::Join
                };
                let mut combined: Option<TypeId> = None;
                for &child in children.iter() {
                    // Dual to unions: shapeless branches are skipped.
                    let Some(shape) = self.extract(child, projection) else {
                        continue;
                    };
                    combined = Some(match combined {
                        None => shape,
                        Some(acc) => self.combine(acc, shape, op, projection)?,
                    });
                }
                combined
            }
            _ => None,
        }
    }

    fn combine(
        &mut self,
        a: TypeId,
        b: TypeId,
        op: Combine,
        projection: Projection,
    ) -> Option<TypeId> {
        match (self.types.lookup(a), self.types.lookup(b)) {
            (TypeKey::Array(e1), TypeKey::Array(e2)) => {
                let elem = self.combine_elem(e1, e2, op);
                Some(self.types.array(elem))
            }
            (TypeKey::Record(r1), TypeKey::Record(r2)) => {
                self.combine_records(&r1, &r2, op, projection)
            }
            (TypeKey::Reference(e1, l1), TypeKey::Reference(e2, l2)) => {
                let elem = self.combine_elem(e1, e2, op);
                let lifetime = self.combine_lifetimes(l1, l2, op)?;
                Some(self.types.reference(elem, lifetime))
            }
            (TypeKey::Callable(c1), TypeKey::Callable(c2)) => self.combine_callables(&c1, &c2, op),
            _ => None,
        }
    }

    fn combine_elem(&self, a: TypeId, b: TypeId, op: Combine) -> TypeId {
        match op {
            Combine::Join => self.types.union(vec![a, b]),
            Combine::Meet => self.types.intersection(vec![a, b]),
        }
    }

    fn combine_records(
        &self,
        a: &RecordShape,
        b: &RecordShape,
        op: Combine,
        projection: Projection,
    ) -> Option<TypeId> {
        match op {
            Combine::Join => {
                // Only fields present in every branch survive; a dropped
                // field means the shape no longer covers the whole value.
                let mut fields: IndexMap<Atom, TypeId> = IndexMap::new();
                let mut dropped = false;
                for &(name, ty) in a.fields.iter() {
                    match b.field(name) {
                        Some(other) => {
                            fields.insert(name, self.types.union(vec![ty, other]));
                        }
                        None => dropped = true,
                    }
                }
                dropped |= b.fields.iter().any(|(name, _)| !a.has_field(*name));
                let open = a.open || b.open || dropped;
                Some(self.types.record(open, fields.into_iter().collect()))
            }
            Combine::Meet if projection == Projection::WriteableRecord => {
                // Writes across a union: the field must exist in every
                // branch and the written value must fit each branch's type.
                let mut fields: IndexMap<Atom, TypeId> = IndexMap::new();
                for &(name, ty) in a.fields.iter() {
                    if let Some(other) = b.field(name) {
                        fields.insert(name, self.types.intersection(vec![ty, other]));
                    }
                }
                Some(
                    self.types
                        .record(a.open && b.open, fields.into_iter().collect()),
                )
            }
            Combine::Meet => {
                // Intersection read: the true field-wise meet.
                let shape = self.types.record_meet(a, b)?;
                Some(
                    self.types
                        .record(shape.open, shape.fields.into_vec()),
                )
            }
        }
    }

    fn combine_lifetimes(&self, a: Lifetime, b: Lifetime, op: Combine) -> Option<Lifetime> {
        if a == b {
            return Some(a);
        }
        let (inner, outer) = if self.rel.is_within(a, b) {
            (a, b)
        } else if self.rel.is_within(b, a) {
            (b, a)
        } else {
            return None;
        };
        // A joined reference must satisfy both originals, so it keeps the
        // inner (shorter) lifetime; a met reference keeps the outer one.
        Some(match op {
            Combine::Join => inner,
            Combine::Meet => outer,
        })
    }

    fn combine_callables(
        &self,
        a: &CallableShape,
        b: &CallableShape,
        op: Combine,
    ) -> Option<TypeId> {
        if a.params.len() != b.params.len() || a.returns.len() != b.returns.len() {
            return None;
        }
        // Parameters are contravariant: they combine with the dual of the
        // requested operation. Returns combine covariantly.
        let params = a
            .params
            .iter()
            .zip(b.params.iter())
            .map(|(&p1, &p2)| self.combine_elem(p1, p2, op.dual()))
            .collect();
        let returns = a
            .returns
            .iter()
            .zip(b.returns.iter())
            .map(|(&r1, &r2)| self.combine_elem(r1, r2, op))
            .collect();
        let kind = match op {
            Combine::Join => a.kind.join(b.kind),
            Combine::Meet => a.kind.meet(b.kind),
        };
        let mut lifetimes = a.lifetimes.to_vec();
        for &lt in &b.lifetimes {
            if !lifetimes.contains(&lt) {
                lifetimes.push(lt);
            }
        }
        Some(self.types.callable(kind, params, returns, lifetimes))
    }
}
