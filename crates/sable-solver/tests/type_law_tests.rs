//! Laws the subtype operator must satisfy: reflexivity, transitivity,
//! top/bottom, and the union/intersection orderings, across a zoo of types.

use sable_common::{CallableKind, Interner, Lifetime};
use sable_solver::{LifetimeRel, SubtypeChecker, TypeId, TypeInterner};

fn type_zoo(types: &TypeInterner, strings: &Interner) -> Vec<TypeId> {
    let f = strings.intern("f");
    let g = strings.intern("g");
    let int_or_null = types.union(vec![TypeId::INT, TypeId::NULL]);
    let nat = types.register_nominal(strings.intern("nat"), true);
    types.set_nominal_body(nat, TypeId::INT);
    vec![
        TypeId::VOID,
        TypeId::ANY,
        TypeId::NULL,
        TypeId::BOOL,
        TypeId::BYTE,
        TypeId::INT,
        int_or_null,
        types.array(TypeId::INT),
        types.array(int_or_null),
        types.record(false, vec![(f, TypeId::INT)]),
        types.record(true, vec![(f, TypeId::INT)]),
        types.record(false, vec![(f, TypeId::INT), (g, TypeId::BOOL)]),
        types.reference(TypeId::INT, Lifetime::Static),
        types.reference(TypeId::INT, Lifetime::This),
        types.callable(CallableKind::Function, vec![TypeId::INT], vec![TypeId::INT], vec![]),
        types.callable(CallableKind::Method, vec![TypeId::INT], vec![TypeId::INT], vec![]),
        types.nominal(nat),
        types.difference(TypeId::INT, types.nominal(nat)),
    ]
}

#[test]
fn test_law_reflexivity() {
    let types = TypeInterner::new();
    let strings = Interner::new();
    let rel = LifetimeRel::new();
    let mut checker = SubtypeChecker::new(&types);
    for ty in type_zoo(&types, &strings) {
        assert!(
            checker.is_subtype(ty, ty, &rel),
            "reflexivity failed for {ty:?}"
        );
        assert!(
            checker.is_subtype_strict(ty, ty, &rel),
            "strict reflexivity failed for {ty:?}"
        );
    }
}

#[test]
fn test_law_top_and_bottom() {
    let types = TypeInterner::new();
    let strings = Interner::new();
    let rel = LifetimeRel::new();
    let mut checker = SubtypeChecker::new(&types);
    for ty in type_zoo(&types, &strings) {
        assert!(checker.is_subtype(ty, TypeId::ANY, &rel), "{ty:?} <: any");
        assert!(checker.is_subtype(TypeId::VOID, ty, &rel), "void <: {ty:?}");
    }
}

#[test]
fn test_law_transitivity_samples() {
    let types = TypeInterner::new();
    let strings = Interner::new();
    let rel = LifetimeRel::new();
    let mut checker = SubtypeChecker::new(&types);
    let zoo = type_zoo(&types, &strings);
    // The oracle is conservative, so we check transitivity only where the
    // two premises actually hold.
    for &a in &zoo {
        for &b in &zoo {
            if !checker.is_subtype(a, b, &rel) {
                continue;
            }
            for &c in &zoo {
                if checker.is_subtype(b, c, &rel) {
                    assert!(
                        checker.is_subtype(a, c, &rel),
                        "transitivity failed: {a:?} <: {b:?} <: {c:?}"
                    );
                }
            }
        }
    }
}

#[test]
fn test_union_bounds_its_members() {
    let types = TypeInterner::new();
    let rel = LifetimeRel::new();
    let mut checker = SubtypeChecker::new(&types);
    let union = types.union(vec![TypeId::INT, TypeId::NULL]);
    assert!(checker.is_subtype(TypeId::INT, union, &rel));
    assert!(checker.is_subtype(TypeId::NULL, union, &rel));
    assert!(!checker.is_subtype(union, TypeId::INT, &rel));
    assert!(!checker.is_subtype(TypeId::BOOL, union, &rel));
}

#[test]
fn test_intersection_bounded_by_members() {
    let types = TypeInterner::new();
    let strings = Interner::new();
    let rel = LifetimeRel::new();
    let mut checker = SubtypeChecker::new(&types);
    let f = strings.intern("f");
    let g = strings.intern("g");
    let with_f = types.record(true, vec![(f, TypeId::INT)]);
    let with_g = types.record(true, vec![(g, TypeId::BOOL)]);
    let both = types.intersection(vec![with_f, with_g]);
    assert!(checker.is_subtype(both, with_f, &rel));
    assert!(checker.is_subtype(both, with_g, &rel));
    assert!(!checker.is_subtype(with_f, both, &rel));
}

#[test]
fn test_difference_subtype_of_minuend() {
    let types = TypeInterner::new();
    let rel = LifetimeRel::new();
    let mut checker = SubtypeChecker::new(&types);
    let int_or_null = types.union(vec![TypeId::INT, TypeId::NULL]);
    let diff = types.difference(int_or_null, TypeId::NULL);
    assert!(checker.is_subtype(diff, int_or_null, &rel));
    assert!(checker.is_subtype(diff, TypeId::INT, &rel));
    assert!(!checker.is_subtype(int_or_null, diff, &rel));
}

#[test]
fn test_contractiveness() {
    let types = TypeInterner::new();
    let strings = Interner::new();
    let checker = SubtypeChecker::new(&types);

    // type cyc is cyc
    let cyc = types.register_nominal(strings.intern("cyc"), false);
    types.set_nominal_body(cyc, types.nominal(cyc));
    assert!(!checker.is_contractive(cyc));

    // type cyc2 is cyc2 | int - still no constructor on the cycle
    let cyc2 = types.register_nominal(strings.intern("cyc2"), false);
    types.set_nominal_body(cyc2, types.union(vec![types.nominal(cyc2), TypeId::INT]));
    assert!(!checker.is_contractive(cyc2));

    // type list is null | {list next} - the record grounds the cycle
    let list = types.register_nominal(strings.intern("list"), false);
    let next = strings.intern("next");
    let node = types.record(false, vec![(next, types.nominal(list))]);
    types.set_nominal_body(list, types.union(vec![TypeId::NULL, node]));
    assert!(checker.is_contractive(list));

    // Mutual recursion through a constructor is fine.
    let even = types.register_nominal(strings.intern("even"), false);
    let odd = types.register_nominal(strings.intern("odd"), false);
    types.set_nominal_body(even, types.union(vec![TypeId::NULL, types.array(types.nominal(odd))]));
    types.set_nominal_body(odd, types.array(types.nominal(even)));
    assert!(checker.is_contractive(even));
    assert!(checker.is_contractive(odd));
}

#[test]
fn test_concrete_extraction() {
    let types = TypeInterner::new();
    let rel = LifetimeRel::new();
    let mut checker = SubtypeChecker::new(&types);
    let int_or_null = types.union(vec![TypeId::INT, TypeId::NULL]);

    // (int|null) - null reduces to int
    let diff = types.difference(int_or_null, TypeId::NULL);
    assert_eq!(sable_solver::to_concrete(&mut checker, diff, &rel), TypeId::INT);

    // (int|null) & int reduces to int
    let meet = types.intersection(vec![int_or_null, TypeId::INT]);
    assert_eq!(sable_solver::to_concrete(&mut checker, meet, &rel), TypeId::INT);

    // int & null is empty
    let dead = types.intersection(vec![TypeId::INT, TypeId::NULL]);
    assert_eq!(sable_solver::to_concrete(&mut checker, dead, &rel), TypeId::VOID);

    // Concrete types pass through unchanged.
    assert_eq!(
        sable_solver::to_concrete(&mut checker, int_or_null, &rel),
        int_or_null
    );
}

#[test]
fn test_concrete_extraction_prefers_nominals() {
    let types = TypeInterner::new();
    let strings = Interner::new();
    let rel = LifetimeRel::new();
    let mut checker = SubtypeChecker::new(&types);
    let nat = types.register_nominal(strings.intern("nat"), true);
    types.set_nominal_body(nat, TypeId::INT);
    let nominal = types.nominal(nat);

    // nat & int is concretely just nat.
    let meet = types.intersection(vec![nominal, TypeId::INT]);
    assert_eq!(sable_solver::to_concrete(&mut checker, meet, &rel), nominal);
}
