//! Common types and utilities for the sable compiler front-end.
//!
//! This crate provides foundational types used across all sable crates:
//! - String interning (`Atom`, `Interner`)
//! - Shared enums (`CallableKind`, `Lifetime`)
//! - Source spans (`Span`)
//! - Diagnostics (`Diagnostic`, `ErrorCode`, `DiagnosticSink`)
//! - Checker configuration (`CheckerOptions`)
//! - Centralized limits and thresholds

// String interning for identifier deduplication
pub mod interner;
pub use interner::{Atom, Interner};

// Common enums - shared between sable-ast and sable-solver
pub mod common;
pub use common::{CallableKind, Lifetime};

// Span - Source location tracking (byte offsets)
pub mod span;
pub use span::Span;

// Diagnostics - error codes and collection
pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticSink, ErrorCode};

// Checker configuration
pub mod checker_options;
pub use checker_options::CheckerOptions;

// Centralized limits and thresholds
pub mod limits;
