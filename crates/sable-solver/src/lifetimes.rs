//! The within-relation on lifetimes.
//!
//! The environment carries a relation expressing lifetime nesting:
//! `within(inner, outer)` holds when `inner`'s extent is contained in
//! `outer`'s. It is reflexive, transitive, and every lifetime is within `*`.
//! Named blocks and method lifetime parameters extend it.

use rustc_hash::{FxHashMap, FxHashSet};
use sable_common::Lifetime;

/// A reflexive, transitively-queried nesting relation on lifetimes.
#[derive(Clone, Debug, Default)]
pub struct LifetimeRel {
    /// Direct edges: inner lifetime -> lifetimes it is immediately within.
    outer: FxHashMap<Lifetime, FxHashSet<Lifetime>>,
}

impl LifetimeRel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `inner` is within `outer`.
    pub fn insert(&mut self, inner: Lifetime, outer: Lifetime) {
        self.outer.entry(inner).or_default().insert(outer);
    }

    /// True if `inner`'s extent is contained in `outer`'s.
    pub fn is_within(&self, inner: Lifetime, outer: Lifetime) -> bool {
        if inner == outer || outer == Lifetime::Static {
            return true;
        }
        // Walk the direct edges transitively.
        let mut seen: FxHashSet<Lifetime> = FxHashSet::default();
        let mut stack = vec![inner];
        while let Some(current) = stack.pop() {
            if !seen.insert(current) {
                continue;
            }
            if let Some(outers) = self.outer.get(&current) {
                if outers.contains(&outer) {
                    return true;
                }
                stack.extend(outers.iter().copied());
            }
        }
        false
    }

    /// All lifetimes known to this relation (edge endpoints).
    pub fn known(&self) -> FxHashSet<Lifetime> {
        let mut all: FxHashSet<Lifetime> = FxHashSet::default();
        for (inner, outers) in &self.outer {
            all.insert(*inner);
            all.extend(outers.iter().copied());
        }
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sable_common::Interner;

    #[test]
    fn test_reflexive_and_static() {
        let rel = LifetimeRel::new();
        assert!(rel.is_within(Lifetime::This, Lifetime::This));
        assert!(rel.is_within(Lifetime::This, Lifetime::Static));
        assert!(!rel.is_within(Lifetime::Static, Lifetime::This));
    }

    #[test]
    fn test_transitive_walk() {
        let strings = Interner::new();
        let a = Lifetime::Named(strings.intern("a"));
        let b = Lifetime::Named(strings.intern("b"));
        let mut rel = LifetimeRel::new();
        rel.insert(a, b);
        rel.insert(b, Lifetime::This);
        assert!(rel.is_within(a, b));
        assert!(rel.is_within(a, Lifetime::This));
        assert!(!rel.is_within(Lifetime::This, a));
    }
}
