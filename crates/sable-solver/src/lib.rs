//! Semantic type algebra for the sable compiler.
//!
//! Types are immutable, hash-consed terms (`TypeId` handles into a
//! `TypeInterner`). All structural reasoning funnels through an emptiness
//! test: `S` is a subtype of `T` exactly when `S ∧ ¬T` is uninhabited. The
//! crate provides:
//!
//! - `intern` - term representation and normalizing constructors
//! - `lifetimes` - the within-relation on lifetime names
//! - `emptiness` - the emptiness oracle (strict and relaxed modes)
//! - `subtype` - the subtype operator and contractiveness check
//! - `extract` - readable/writeable shape projection
//! - `concrete` - reduction to concrete (surface-visible) types
//! - `instantiate` - lifetime variable binding and substitution
//! - `display` - source-syntax rendering for diagnostics

pub mod concrete;
pub mod display;
pub mod emptiness;
pub mod extract;
pub mod instantiate;
pub mod intern;
pub mod lifetimes;
pub mod subtype;

pub use concrete::to_concrete;
pub use display::TypeDisplay;
pub use emptiness::{EmptinessChecker, Mode};
pub use extract::{extract, Projection};
pub use instantiate::{bind_lifetimes, substitute_lifetimes};
pub use intern::{CallableShape, NominalId, RecordShape, TypeId, TypeInterner, TypeKey};
pub use lifetimes::LifetimeRel;
pub use subtype::SubtypeChecker;

#[cfg(test)]
mod tests;
