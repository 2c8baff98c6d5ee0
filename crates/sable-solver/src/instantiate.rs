//! Lifetime variable binding and substitution.
//!
//! Callable declarations may be parameterized over lifetimes. When a call
//! is resolved, each declared lifetime variable is bound by structurally
//! matching parameter types against concrete argument types, then the bound
//! signature is checked by ordinary subtyping.

use crate::intern::{TypeId, TypeInterner, TypeKey};
use rustc_hash::FxHashMap;
use sable_common::{Atom, Lifetime};

/// Bind the lifetime variables `vars` occurring in `param` by matching its
/// structure against `arg`. First binding wins; any residual mismatch is
/// left for the subtype check that follows binding.
pub fn bind_lifetimes(
    types: &TypeInterner,
    param: TypeId,
    arg: TypeId,
    vars: &[Atom],
    binding: &mut FxHashMap<Atom, Lifetime>,
) {
    match (types.lookup(param), types.lookup(arg)) {
        (TypeKey::Reference(p_elem, p_lt), TypeKey::Reference(a_elem, a_lt)) => {
            if let Lifetime::Named(name) = p_lt {
                if vars.contains(&name) {
                    binding.entry(name).or_insert(a_lt);
                }
            }
            bind_lifetimes(types, p_elem, a_elem, vars, binding);
        }
        (TypeKey::Array(p_elem), TypeKey::Array(a_elem)) => {
            bind_lifetimes(types, p_elem, a_elem, vars, binding);
        }
        (TypeKey::Record(p_rec), TypeKey::Record(a_rec)) => {
            for &(name, p_field) in p_rec.fields.iter() {
                if let Some(a_field) = a_rec.field(name) {
                    bind_lifetimes(types, p_field, a_field, vars, binding);
                }
            }
        }
        (TypeKey::Callable(p_call), TypeKey::Callable(a_call)) => {
            // Lifetimes declared by the callable itself shadow the outer
            // variables.
            let shadowed: Vec<Atom> = vars
                .iter()
                .copied()
                .filter(|v| !p_call.lifetimes.contains(v))
                .collect();
            for (&p, &a) in p_call.params.iter().zip(a_call.params.iter()) {
                bind_lifetimes(types, p, a, &shadowed, binding);
            }
            for (&p, &a) in p_call.returns.iter().zip(a_call.returns.iter()) {
                bind_lifetimes(types, p, a, &shadowed, binding);
            }
        }
        (TypeKey::Union(p_children), _) | (TypeKey::Intersection(p_children), _) => {
            for &child in p_children.iter() {
                bind_lifetimes(types, child, arg, vars, binding);
            }
        }
        (TypeKey::Negation(inner), _) => bind_lifetimes(types, inner, arg, vars, binding),
        _ => {}
    }
}

/// Substitute bound lifetimes through `ty`. Nominal links stay symbolic.
pub fn substitute_lifetimes(
    types: &TypeInterner,
    ty: TypeId,
    binding: &FxHashMap<Atom, Lifetime>,
) -> TypeId {
    if binding.is_empty() {
        return ty;
    }
    match types.lookup(ty) {
        TypeKey::Reference(elem, lt) => {
            let elem = substitute_lifetimes(types, elem, binding);
            let lt = match lt {
                Lifetime::Named(name) => binding.get(&name).copied().unwrap_or(lt),
                _ => lt,
            };
            types.reference(elem, lt)
        }
        TypeKey::Array(elem) => types.array(substitute_lifetimes(types, elem, binding)),
        TypeKey::Record(record) => {
            let fields = record
                .fields
                .iter()
                .map(|&(name, field)| (name, substitute_lifetimes(types, field, binding)))
                .collect();
            types.record(record.open, fields)
        }
        TypeKey::Callable(callable) => {
            // Declared lifetimes shadow the binding inside the callable.
            let mut inner = binding.clone();
            for lt in &callable.lifetimes {
                inner.remove(lt);
            }
            let params = callable
                .params
                .iter()
                .map(|&p| substitute_lifetimes(types, p, &inner))
                .collect();
            let returns = callable
                .returns
                .iter()
                .map(|&r| substitute_lifetimes(types, r, &inner))
                .collect();
            types.callable(callable.kind, params, returns, callable.lifetimes.to_vec())
        }
        TypeKey::Union(children) => {
            let children = children
                .iter()
                .map(|&c| substitute_lifetimes(types, c, binding))
                .collect();
            types.union(children)
        }
        TypeKey::Intersection(children) => {
            let children = children
                .iter()
                .map(|&c| substitute_lifetimes(types, c, binding))
                .collect();
            types.intersection(children)
        }
        TypeKey::Negation(inner) => types.negation(substitute_lifetimes(types, inner, binding)),
        _ => ty,
    }
}
