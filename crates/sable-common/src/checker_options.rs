//! Compiler options for type checking.
//!
//! This module lives in sable-common so that both the solver and checker can
//! reference `CheckerOptions` without creating a circular dependency.

/// Options controlling the flow type checker.
#[derive(Debug, Clone)]
pub struct CheckerOptions {
    /// When false, disable error reporting for unreachable code.
    pub check_unreachable: bool,
    /// When false, type tests never report dead branches
    /// (INCOMPARABLE_OPERANDS / BRANCH_ALWAYS_TAKEN).
    pub dead_branch_checks: bool,
    /// When true, loop invariants are checked both on entry and as
    /// preservation obligations. Semantic verification itself is performed by
    /// a downstream pass; this only affects how often the invariant
    /// conditions are type-checked.
    pub verification: bool,
}

impl Default for CheckerOptions {
    fn default() -> Self {
        CheckerOptions {
            check_unreachable: true,
            dead_branch_checks: true,
            verification: false,
        }
    }
}
