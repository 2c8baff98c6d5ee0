//! String interning for identifier deduplication.
//!
//! Field names, lifetime names, and declaration names are repeated many times
//! across a compilation unit. Interning them once gives copyable `Atom`
//! handles that compare and hash as integers.

use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::fmt;

/// A handle to an interned string.
///
/// Atoms are only meaningful relative to the `Interner` that produced them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Atom(u32);

impl Atom {
    /// The raw index of this atom.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Default)]
struct InternerState {
    map: FxHashMap<Box<str>, Atom>,
    strings: Vec<Box<str>>,
}

/// A single-threaded string interner.
///
/// Interning takes `&self`; the interner is shared by reference between the
/// solver and the checker, so lookups must not require exclusive access.
#[derive(Default)]
pub struct Interner {
    state: RefCell<InternerState>,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern a string, returning its atom. Repeated calls with the same
    /// string return the same atom.
    pub fn intern(&self, s: &str) -> Atom {
        let mut state = self.state.borrow_mut();
        if let Some(&atom) = state.map.get(s) {
            return atom;
        }
        let atom = Atom(state.strings.len() as u32);
        let boxed: Box<str> = s.into();
        state.strings.push(boxed.clone());
        state.map.insert(boxed, atom);
        atom
    }

    /// Resolve an atom back to its string.
    ///
    /// Panics if the atom was produced by a different interner.
    pub fn resolve(&self, atom: Atom) -> String {
        self.state.borrow().strings[atom.index()].to_string()
    }

    /// Number of distinct strings interned.
    pub fn len(&self) -> usize {
        self.state.borrow().strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for Interner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interner")
            .field("len", &self.len())
            .finish()
    }
}
