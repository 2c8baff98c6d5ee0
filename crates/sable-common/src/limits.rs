//! Centralized limits and thresholds for the sable front-end.
//!
//! This module provides shared constants for recursion depths and clause
//! counts used by the semantic type algebra. Centralizing these values:
//! - Prevents duplicate definitions with inconsistent values
//! - Documents the rationale for each limit
//!
//! The emptiness oracle must stay conservative under resource pressure: when
//! a limit is hit it answers "not empty" (never claiming emptiness it did not
//! prove) and logs at `warn` level.

/// Maximum structural recursion depth inside the emptiness oracle.
///
/// Cyclic nominal types are handled by the oracle's in-progress memo table,
/// so this bound only triggers on pathologically deep non-cyclic structure
/// (arrays of arrays of records of ...). At the limit the oracle answers
/// conservatively.
pub const MAX_EMPTINESS_DEPTH: u32 = 256;

/// Maximum number of conjunctive clauses produced while normalizing a type
/// to disjunctive normal form.
///
/// Negated intersections multiply clauses; a handful of nested negations can
/// explode combinatorially. Past this bound the oracle stops expanding and
/// answers conservatively.
pub const MAX_DNF_CLAUSES: usize = 2048;

/// Maximum depth when rendering a type for a diagnostic message.
///
/// Recursive nominals would otherwise render forever; past this depth the
/// printer emits `...`.
pub const MAX_TYPE_DISPLAY_DEPTH: u32 = 16;
