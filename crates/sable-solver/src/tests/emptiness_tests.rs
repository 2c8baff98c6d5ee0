use crate::emptiness::{EmptinessChecker, Mode};
use crate::intern::{TypeId, TypeInterner};
use crate::lifetimes::LifetimeRel;
use sable_common::{CallableKind, Interner, Lifetime};

fn strict(types: &TypeInterner) -> EmptinessChecker<'_> {
    EmptinessChecker::new(types, Mode::Strict)
}

fn relaxed(types: &TypeInterner) -> EmptinessChecker<'_> {
    EmptinessChecker::new(types, Mode::Relaxed)
}

#[test]
fn test_void_is_empty_any_is_not() {
    let types = TypeInterner::new();
    let rel = LifetimeRel::new();
    let mut oracle = strict(&types);
    assert!(oracle.is_void(TypeId::VOID, &rel));
    assert!(!oracle.is_void(TypeId::ANY, &rel));
    assert!(!oracle.is_void(TypeId::INT, &rel));
}

#[test]
fn test_distinct_atoms_are_disjoint() {
    let types = TypeInterner::new();
    let rel = LifetimeRel::new();
    let mut oracle = strict(&types);
    let int_and_bool = types.intersection(vec![TypeId::INT, TypeId::BOOL]);
    let int_and_null = types.intersection(vec![TypeId::INT, TypeId::NULL]);
    let byte_and_int = types.intersection(vec![TypeId::BYTE, TypeId::INT]);
    assert!(oracle.is_void(int_and_bool, &rel));
    assert!(oracle.is_void(int_and_null, &rel));
    assert!(oracle.is_void(byte_and_int, &rel));
}

#[test]
fn test_atom_minus_itself_is_empty() {
    let types = TypeInterner::new();
    let rel = LifetimeRel::new();
    let mut oracle = strict(&types);
    let gap = types.difference(TypeId::INT, TypeId::INT);
    assert!(oracle.is_void(gap, &rel));
    let residue = types.difference(TypeId::INT, TypeId::NULL);
    assert!(!oracle.is_void(residue, &rel));
}

#[test]
fn test_union_empty_iff_all_branches_empty() {
    let types = TypeInterner::new();
    let rel = LifetimeRel::new();
    let mut oracle = strict(&types);
    let both_empty = types.union(vec![
        types.intersection(vec![TypeId::INT, TypeId::BOOL]),
        types.intersection(vec![TypeId::NULL, TypeId::BYTE]),
    ]);
    assert!(oracle.is_void(both_empty, &rel));
    let one_live = types.union(vec![
        types.intersection(vec![TypeId::INT, TypeId::BOOL]),
        TypeId::NULL,
    ]);
    assert!(!oracle.is_void(one_live, &rel));
}

#[test]
fn test_array_intersection_never_empty_on_its_own() {
    // The empty array inhabits even void[], so two positive arrays can
    // always coexist.
    let types = TypeInterner::new();
    let rel = LifetimeRel::new();
    let mut oracle = strict(&types);
    let arrays = types.intersection(vec![types.array(TypeId::INT), types.array(TypeId::BOOL)]);
    assert!(!oracle.is_void(arrays, &rel));
}

#[test]
fn test_array_minus_wider_array_is_empty() {
    let types = TypeInterner::new();
    let rel = LifetimeRel::new();
    let mut oracle = strict(&types);
    let int_array = types.array(TypeId::INT);
    let wider = types.array(types.union(vec![TypeId::INT, TypeId::NULL]));
    assert!(oracle.is_void(types.difference(int_array, wider), &rel));
    assert!(!oracle.is_void(types.difference(wider, int_array), &rel));
}

#[test]
fn test_array_and_non_array_disjoint() {
    let types = TypeInterner::new();
    let rel = LifetimeRel::new();
    let mut oracle = strict(&types);
    let mixed = types.intersection(vec![types.array(TypeId::INT), TypeId::INT]);
    assert!(oracle.is_void(mixed, &rel));
}

#[test]
fn test_record_empty_when_field_empty() {
    let types = TypeInterner::new();
    let strings = Interner::new();
    let rel = LifetimeRel::new();
    let mut oracle = strict(&types);
    let f = strings.intern("f");
    let dead_field = types.record(
        false,
        vec![(f, types.intersection(vec![TypeId::INT, TypeId::BOOL]))],
    );
    assert!(oracle.is_void(dead_field, &rel));
    let live = types.record(false, vec![(f, TypeId::INT)]);
    assert!(!oracle.is_void(live, &rel));
}

#[test]
fn test_closed_records_with_different_fields_disjoint() {
    let types = TypeInterner::new();
    let strings = Interner::new();
    let rel = LifetimeRel::new();
    let mut oracle = strict(&types);
    let f = strings.intern("f");
    let g = strings.intern("g");
    let just_f = types.record(false, vec![(f, TypeId::INT)]);
    let f_and_g = types.record(false, vec![(f, TypeId::INT), (g, TypeId::INT)]);
    assert!(oracle.is_void(types.intersection(vec![just_f, f_and_g]), &rel));

    // An open record tolerates the extra field.
    let open_f = types.record(true, vec![(f, TypeId::INT)]);
    assert!(!oracle.is_void(types.intersection(vec![open_f, f_and_g]), &rel));
}

#[test]
fn test_record_subtyping_via_difference() {
    let types = TypeInterner::new();
    let strings = Interner::new();
    let rel = LifetimeRel::new();
    let mut oracle = strict(&types);
    let f = strings.intern("f");
    let closed = types.record(false, vec![(f, TypeId::INT)]);
    let open = types.record(true, vec![(f, TypeId::INT)]);
    // {int f} <: {int f, ...}
    assert!(oracle.is_void(types.difference(closed, open), &rel));
    // {int f, ...} has unknown extra fields, so not <: {int f}
    assert!(!oracle.is_void(types.difference(open, closed), &rel));
}

#[test]
fn test_field_order_does_not_leak_into_subtyping() {
    let types = TypeInterner::new();
    let strings = Interner::new();
    let rel = LifetimeRel::new();
    let mut oracle = strict(&types);
    let f = strings.intern("f");
    let g = strings.intern("g");
    let fg = types.record(false, vec![(f, TypeId::INT), (g, TypeId::BOOL)]);
    let gf = types.record(false, vec![(g, TypeId::BOOL), (f, TypeId::INT)]);
    assert!(oracle.is_void(types.difference(fg, gf), &rel));
    assert!(oracle.is_void(types.difference(gf, fg), &rel));
}

#[test]
fn test_plain_alias_unfolds_in_both_modes() {
    let types = TypeInterner::new();
    let strings = Interner::new();
    let rel = LifetimeRel::new();
    let ilist = types.register_nominal(strings.intern("ilist"), false);
    types.set_nominal_body(ilist, types.array(TypeId::INT));
    let nominal = types.nominal(ilist);
    let int_array = types.array(TypeId::INT);

    for mut oracle in [strict(&types), relaxed(&types)] {
        assert!(oracle.is_void(types.difference(nominal, int_array), &rel));
        assert!(oracle.is_void(types.difference(int_array, nominal), &rel));
    }
}

#[test]
fn test_refined_nominal_strict_vs_relaxed() {
    let types = TypeInterner::new();
    let strings = Interner::new();
    let rel = LifetimeRel::new();
    let nat = types.register_nominal(strings.intern("nat"), true);
    types.set_nominal_body(nat, TypeId::INT);
    let nominal = types.nominal(nat);

    // nat <: nat in both modes (exact contradiction, no unfolding needed).
    assert!(strict(&types).is_void(types.difference(nominal, nominal), &rel));
    assert!(relaxed(&types).is_void(types.difference(nominal, nominal), &rel));

    // nat <: int in both modes.
    assert!(strict(&types).is_void(types.difference(nominal, TypeId::INT), &rel));
    assert!(relaxed(&types).is_void(types.difference(nominal, TypeId::INT), &rel));

    // int <: nat only under the strict oracle, which drops the invariant.
    assert!(strict(&types).is_void(types.difference(TypeId::INT, nominal), &rel));
    assert!(!relaxed(&types).is_void(types.difference(TypeId::INT, nominal), &rel));
}

#[test]
fn test_recursive_nominal_terminates() {
    // type LinkedList is null | {LinkedList next}
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let types = TypeInterner::new();
    let strings = Interner::new();
    let rel = LifetimeRel::new();
    let list = types.register_nominal(strings.intern("LinkedList"), false);
    let nominal = types.nominal(list);
    let next = strings.intern("next");
    let node = types.record(false, vec![(next, nominal)]);
    types.set_nominal_body(list, types.union(vec![TypeId::NULL, node]));

    let mut oracle = strict(&types);
    assert!(!oracle.is_void(nominal, &rel));
    // {LinkedList next} <: LinkedList
    assert!(oracle.is_void(types.difference(node, nominal), &rel));
    // LinkedList is not a subtype of the node record (null is in the way).
    assert!(!oracle.is_void(types.difference(nominal, node), &rel));
}

#[test]
fn test_reference_lifetime_subtyping() {
    let types = TypeInterner::new();
    let strings = Interner::new();
    let mut rel = LifetimeRel::new();
    let a = Lifetime::Named(strings.intern("a"));
    rel.insert(a, Lifetime::This);

    let ref_a = types.reference(TypeId::INT, a);
    let ref_this = types.reference(TypeId::INT, Lifetime::This);

    let mut oracle = strict(&types);
    // &this:int <: &a:int since a is within this.
    assert!(oracle.is_void(types.difference(ref_this, ref_a), &rel));
    // Not the other way around.
    assert!(!oracle.is_void(types.difference(ref_a, ref_this), &rel));
}

#[test]
fn test_reference_elements_invariant() {
    let types = TypeInterner::new();
    let rel = LifetimeRel::new();
    let mut oracle = strict(&types);
    let ref_int = types.reference(TypeId::INT, Lifetime::Static);
    let ref_wide = types.reference(types.union(vec![TypeId::INT, TypeId::NULL]), Lifetime::Static);
    assert!(!oracle.is_void(types.difference(ref_int, ref_wide), &rel));
    assert!(!oracle.is_void(types.difference(ref_wide, ref_int), &rel));
    assert!(oracle.is_void(types.difference(ref_int, ref_int), &rel));
}

#[test]
fn test_callable_variance() {
    let types = TypeInterner::new();
    let rel = LifetimeRel::new();
    let mut oracle = strict(&types);
    let int_or_null = types.union(vec![TypeId::INT, TypeId::NULL]);
    let wide_params = types.callable(
        CallableKind::Function,
        vec![int_or_null],
        vec![TypeId::INT],
        vec![],
    );
    let narrow = types.callable(
        CallableKind::Function,
        vec![TypeId::INT],
        vec![int_or_null],
        vec![],
    );
    // (int|null)->(int) <: (int)->(int|null): params contravariant,
    // returns covariant.
    assert!(oracle.is_void(types.difference(wide_params, narrow), &rel));
    assert!(!oracle.is_void(types.difference(narrow, wide_params), &rel));
}

#[test]
fn test_callable_kinds_do_not_mix() {
    let types = TypeInterner::new();
    let rel = LifetimeRel::new();
    let mut oracle = strict(&types);
    let func = types.callable(CallableKind::Function, vec![TypeId::INT], vec![TypeId::INT], vec![]);
    let meth = types.callable(CallableKind::Method, vec![TypeId::INT], vec![TypeId::INT], vec![]);
    assert!(!oracle.is_void(types.difference(func, meth), &rel));
    assert!(!oracle.is_void(types.difference(meth, func), &rel));
}
