//! Term representation and hash-consing for semantic types.
//!
//! A `TypeId` is a handle into the `TypeInterner`; structurally equal types
//! always receive the same id, so equality of handles is cheap and the
//! emptiness oracle can memoize on ids alone.
//!
//! Constructors normalize as they intern:
//! - unions and intersections are flat, sorted, and idempotent
//! - `void` absorbs in intersections and is the identity in unions; `any`
//!   is the dual
//! - double negation cancels
//!
//! Normalization here is purely syntactic; semantic questions (emptiness,
//! subtyping) are answered by the oracle, never by the interner.

use rustc_hash::FxHashMap;
use sable_common::{Atom, CallableKind, Lifetime};
use smallvec::SmallVec;
use std::cell::RefCell;

/// A handle to an interned semantic type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(u32);

impl TypeId {
    pub const VOID: TypeId = TypeId(0);
    pub const ANY: TypeId = TypeId(1);
    pub const NULL: TypeId = TypeId(2);
    pub const BOOL: TypeId = TypeId(3);
    pub const BYTE: TypeId = TypeId(4);
    pub const INT: TypeId = TypeId(5);

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A handle to a registered nominal (declared) type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NominalId(u32);

impl NominalId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// The fields of a record type, in declaration order.
///
/// Order is preserved for initialisers but must never influence subtyping;
/// the oracle compares records as unordered finite maps.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RecordShape {
    pub open: bool,
    pub fields: Box<[(Atom, TypeId)]>,
}

impl RecordShape {
    pub fn field(&self, name: Atom) -> Option<TypeId> {
        self.fields
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, t)| *t)
    }

    pub fn has_field(&self, name: Atom) -> bool {
        self.fields.iter().any(|(n, _)| *n == name)
    }
}

/// The shape of a callable type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CallableShape {
    pub kind: CallableKind,
    pub params: SmallVec<[TypeId; 4]>,
    pub returns: SmallVec<[TypeId; 2]>,
    /// Declared lifetime parameters (methods).
    pub lifetimes: SmallVec<[Atom; 1]>,
}

/// The structure of an interned type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeKey {
    Void,
    Any,
    Null,
    Bool,
    Byte,
    Int,
    /// A link to a declared type; unfolded (memoized) by the oracle.
    Nominal(NominalId),
    Array(TypeId),
    Reference(TypeId, Lifetime),
    Record(RecordShape),
    Callable(CallableShape),
    /// Flat, sorted, deduplicated; always at least two children.
    Union(Box<[TypeId]>),
    /// Flat, sorted, deduplicated; always at least two children.
    Intersection(Box<[TypeId]>),
    Negation(TypeId),
}

struct NominalInfo {
    name: Atom,
    /// `any` until resolved; unknown nominal kinds behave as `any`.
    body: TypeId,
    /// True when the declaration carries refinement (`where`) clauses.
    has_invariant: bool,
}

#[derive(Default)]
struct InternerState {
    keys: Vec<TypeKey>,
    ids: FxHashMap<TypeKey, TypeId>,
    nominals: Vec<NominalInfo>,
}

/// The hash-consing arena for semantic types.
///
/// Methods take `&self`; the interner is shared by reference between the
/// oracle, the extractors, and the checker.
pub struct TypeInterner {
    state: RefCell<InternerState>,
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeInterner {
    pub fn new() -> Self {
        let interner = TypeInterner {
            state: RefCell::new(InternerState::default()),
        };
        // Pre-register the atoms in TypeId constant order.
        let atoms = [
            TypeKey::Void,
            TypeKey::Any,
            TypeKey::Null,
            TypeKey::Bool,
            TypeKey::Byte,
            TypeKey::Int,
        ];
        for key in atoms {
            interner.intern(key);
        }
        interner
    }

    fn intern(&self, key: TypeKey) -> TypeId {
        let mut state = self.state.borrow_mut();
        if let Some(&id) = state.ids.get(&key) {
            return id;
        }
        let id = TypeId(state.keys.len() as u32);
        state.keys.push(key.clone());
        state.ids.insert(key, id);
        id
    }

    /// Look up the structure of an interned type.
    pub fn lookup(&self, id: TypeId) -> TypeKey {
        self.state.borrow().keys[id.index()].clone()
    }

    // =========================================================================
    // Nominal registration
    // =========================================================================

    /// Register a nominal type. The body starts as `any` and is filled in
    /// once the declaration's type expression has been lowered.
    pub fn register_nominal(&self, name: Atom, has_invariant: bool) -> NominalId {
        let mut state = self.state.borrow_mut();
        let id = NominalId(state.nominals.len() as u32);
        state.nominals.push(NominalInfo {
            name,
            body: TypeId::ANY,
            has_invariant,
        });
        id
    }

    pub fn set_nominal_body(&self, id: NominalId, body: TypeId) {
        self.state.borrow_mut().nominals[id.index()].body = body;
    }

    pub fn nominal_body(&self, id: NominalId) -> TypeId {
        self.state.borrow().nominals[id.index()].body
    }

    pub fn nominal_name(&self, id: NominalId) -> Atom {
        self.state.borrow().nominals[id.index()].name
    }

    pub fn nominal_has_invariant(&self, id: NominalId) -> bool {
        self.state.borrow().nominals[id.index()].has_invariant
    }

    /// The type term referring to a registered nominal.
    pub fn nominal(&self, id: NominalId) -> TypeId {
        self.intern(TypeKey::Nominal(id))
    }

    // =========================================================================
    // Constructors
    // =========================================================================

    pub fn array(&self, elem: TypeId) -> TypeId {
        self.intern(TypeKey::Array(elem))
    }

    pub fn reference(&self, elem: TypeId, lifetime: Lifetime) -> TypeId {
        self.intern(TypeKey::Reference(elem, lifetime))
    }

    pub fn record(&self, open: bool, fields: Vec<(Atom, TypeId)>) -> TypeId {
        self.intern(TypeKey::Record(RecordShape {
            open,
            fields: fields.into_boxed_slice(),
        }))
    }

    pub fn callable(
        &self,
        kind: CallableKind,
        params: Vec<TypeId>,
        returns: Vec<TypeId>,
        lifetimes: Vec<Atom>,
    ) -> TypeId {
        self.intern(TypeKey::Callable(CallableShape {
            kind,
            params: SmallVec::from_vec(params),
            returns: SmallVec::from_vec(returns),
            lifetimes: SmallVec::from_vec(lifetimes),
        }))
    }

    /// Union of the given types: flattened, deduplicated, `void` dropped,
    /// `any` absorbing. An empty union is `void`.
    pub fn union(&self, children: Vec<TypeId>) -> TypeId {
        let mut flat: Vec<TypeId> = Vec::with_capacity(children.len());
        for child in children {
            match self.lookup(child) {
                TypeKey::Union(nested) => flat.extend(nested.iter().copied()),
                TypeKey::Void => {}
                TypeKey::Any => return TypeId::ANY,
                _ => flat.push(child),
            }
        }
        flat.sort_unstable();
        flat.dedup();
        match flat.len() {
            0 => TypeId::VOID,
            1 => flat[0],
            _ => self.intern(TypeKey::Union(flat.into_boxed_slice())),
        }
    }

    /// Intersection of the given types: flattened, deduplicated, `any`
    /// dropped, `void` absorbing. An empty intersection is `any`.
    pub fn intersection(&self, children: Vec<TypeId>) -> TypeId {
        let mut flat: Vec<TypeId> = Vec::with_capacity(children.len());
        for child in children {
            match self.lookup(child) {
                TypeKey::Intersection(nested) => flat.extend(nested.iter().copied()),
                TypeKey::Any => {}
                TypeKey::Void => return TypeId::VOID,
                _ => flat.push(child),
            }
        }
        flat.sort_unstable();
        flat.dedup();
        match flat.len() {
            0 => TypeId::ANY,
            1 => flat[0],
            _ => self.intern(TypeKey::Intersection(flat.into_boxed_slice())),
        }
    }

    /// Negation: double negation cancels; `¬any = void`, `¬void = any`.
    pub fn negation(&self, ty: TypeId) -> TypeId {
        match self.lookup(ty) {
            TypeKey::Negation(inner) => inner,
            TypeKey::Any => TypeId::VOID,
            TypeKey::Void => TypeId::ANY,
            _ => self.intern(TypeKey::Negation(ty)),
        }
    }

    /// `a - b`, i.e. `a ∧ ¬b`.
    pub fn difference(&self, a: TypeId, b: TypeId) -> TypeId {
        self.intersection(vec![a, self.negation(b)])
    }

    /// Field-wise intersection of two record shapes. `None` means the
    /// intersection is uninhabited: a field present in one is ruled out by
    /// the closedness of the other. Openness combines conjunctively.
    pub fn record_meet(&self, a: &RecordShape, b: &RecordShape) -> Option<RecordShape> {
        let mut fields: Vec<(Atom, TypeId)> = Vec::with_capacity(a.fields.len());
        for &(name, ty) in a.fields.iter() {
            match b.field(name) {
                Some(other) => fields.push((name, self.intersection(vec![ty, other]))),
                None if b.open => fields.push((name, ty)),
                None => return None,
            }
        }
        for &(name, ty) in b.fields.iter() {
            if a.has_field(name) {
                continue;
            }
            if !a.open {
                return None;
            }
            fields.push((name, ty));
        }
        Some(RecordShape {
            open: a.open && b.open,
            fields: fields.into_boxed_slice(),
        })
    }

    /// Number of distinct interned types.
    pub fn len(&self) -> usize {
        self.state.borrow().keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
