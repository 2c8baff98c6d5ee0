//! Flow-sensitive type checker for the sable language.
//!
//! The checker walks each declaration of a unit once, threading a
//! per-variable refinement environment through statements, refining variable
//! types at type-test-bearing conditions, and joining environments at merge
//! points. All structural questions route through the semantic subtype
//! operator in `sable-solver`.
//!
//! Checking is fail-soft: user errors are collected in a diagnostic sink and
//! the walk continues, with `Option`-propagation suppressing dependent
//! checks once a subexpression has failed. Impossible AST shapes panic; they
//! are compiler bugs, not diagnostics.
//!
//! Module layout:
//! - `context` - `CheckerState`, type lowering, error emission
//! - `environment` - the refinement environment and its join
//! - `scope` - the enclosing scope stack
//! - `annotations` - inferred-type side tables written during checking
//! - `declarations` - declaration checking
//! - `statements` - statement checking
//! - `expr` - expression checking
//! - `assignment` - l-value checking
//! - `control_flow` - condition checking with sign
//! - `call_checker` - callable candidate resolution

pub mod annotations;
pub mod assignment;
pub mod call_checker;
pub mod context;
pub mod control_flow;
pub mod declarations;
pub mod environment;
pub mod expr;
pub mod scope;
pub mod statements;

pub use annotations::Annotations;
pub use context::{check_unit, CheckResult, CheckerState};
pub use environment::Environment;
