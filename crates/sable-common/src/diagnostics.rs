//! Diagnostics for the sable type checker.
//!
//! User errors are values: a `Diagnostic` carries an `ErrorCode`, a span, and
//! a rendered message. They are pushed into a `DiagnosticSink` and checking
//! continues (the checker is fail-soft). Internal inconsistencies are not
//! diagnostics; they panic, because they represent compiler bugs.

use crate::span::Span;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Error codes emitted by the type checker.
///
/// The names are emitted verbatim for round-trip compatibility with upstream
/// error-message catalogues; the numeric values are stable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum ErrorCode {
    SubtypeError = 400,
    EmptyType = 401,
    ExpectedArray = 402,
    ExpectedRecord = 403,
    ExpectedReference = 404,
    ExpectedLambda = 405,
    InvalidField = 406,
    IncomparableOperands = 407,
    BranchAlwaysTaken = 408,
    AmbiguousCallable = 409,
    InsufficientReturns = 410,
    TooManyReturns = 411,
    InsufficientArguments = 412,
    MissingReturnStatement = 413,
    UnreachableCode = 414,
}

impl ErrorCode {
    /// The catalogue name of this code.
    pub const fn name(self) -> &'static str {
        match self {
            ErrorCode::SubtypeError => "SUBTYPE_ERROR",
            ErrorCode::EmptyType => "EMPTY_TYPE",
            ErrorCode::ExpectedArray => "EXPECTED_ARRAY",
            ErrorCode::ExpectedRecord => "EXPECTED_RECORD",
            ErrorCode::ExpectedReference => "EXPECTED_REFERENCE",
            ErrorCode::ExpectedLambda => "EXPECTED_LAMBDA",
            ErrorCode::InvalidField => "INVALID_FIELD",
            ErrorCode::IncomparableOperands => "INCOMPARABLE_OPERANDS",
            ErrorCode::BranchAlwaysTaken => "BRANCH_ALWAYS_TAKEN",
            ErrorCode::AmbiguousCallable => "AMBIGUOUS_CALLABLE",
            ErrorCode::InsufficientReturns => "INSUFFICIENT_RETURNS",
            ErrorCode::TooManyReturns => "TOO_MANY_RETURNS",
            ErrorCode::InsufficientArguments => "INSUFFICIENT_ARGUMENTS",
            ErrorCode::MissingReturnStatement => "MISSING_RETURN_STATEMENT",
            ErrorCode::UnreachableCode => "UNREACHABLE_CODE",
        }
    }

    /// The message template for this code. `{N}` placeholders are filled by
    /// `format_message`.
    pub const fn template(self) -> &'static str {
        match self {
            ErrorCode::SubtypeError => "expected type {0}, found {1}",
            ErrorCode::EmptyType => "empty type encountered",
            ErrorCode::ExpectedArray => "expected array type, found {0}",
            ErrorCode::ExpectedRecord => "expected record type, found {0}",
            ErrorCode::ExpectedReference => "expected reference type, found {0}",
            ErrorCode::ExpectedLambda => "expected lambda type, found {0}",
            ErrorCode::InvalidField => "record has no field {0}",
            ErrorCode::IncomparableOperands => "incomparable operands: {0} and {1}",
            ErrorCode::BranchAlwaysTaken => "branch always taken",
            ErrorCode::AmbiguousCallable => "unable to resolve callable: {0}",
            ErrorCode::InsufficientReturns => "not enough return values",
            ErrorCode::TooManyReturns => "too many return values",
            ErrorCode::InsufficientArguments => "insufficient arguments for invocation",
            ErrorCode::MissingReturnStatement => "missing return statement",
            ErrorCode::UnreachableCode => "unreachable code",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Substitute `{0}`, `{1}`, ... placeholders in a message template.
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{i}}}"), arg);
    }
    result
}

/// A single reported error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: ErrorCode,
    pub span: Span,
    pub message: String,
}

impl Diagnostic {
    pub fn new(code: ErrorCode, span: Span, args: &[&str]) -> Self {
        Diagnostic {
            code,
            span,
            message: format_message(code.template(), args),
        }
    }
}

/// Collects diagnostics during a checking pass.
///
/// Deduplicates by `(span.start, code)` so that null-propagation through an
/// already-failed subexpression does not produce cascades of the same error.
#[derive(Debug, Default)]
pub struct DiagnosticSink {
    diagnostics: Vec<Diagnostic>,
    seen: FxHashSet<(u32, ErrorCode)>,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic. Returns true if it was newly recorded.
    pub fn report(&mut self, code: ErrorCode, span: Span, args: &[&str]) -> bool {
        if !self.seen.insert((span.start, code)) {
            return false;
        }
        self.diagnostics.push(Diagnostic::new(code, span, args));
        true
    }

    /// True if no errors were reported.
    pub fn is_ok(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// True if a diagnostic with the given code was reported.
    pub fn has_code(&self, code: ErrorCode) -> bool {
        self.diagnostics.iter().any(|d| d.code == code)
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_names_round_trip() {
        assert_eq!(ErrorCode::SubtypeError.name(), "SUBTYPE_ERROR");
        assert_eq!(ErrorCode::UnreachableCode.to_string(), "UNREACHABLE_CODE");
    }

    #[test]
    fn test_format_message() {
        let msg = format_message("expected type {0}, found {1}", &["int", "int|null"]);
        assert_eq!(msg, "expected type int, found int|null");
    }

    #[test]
    fn test_sink_dedups_by_span_and_code() {
        let mut sink = DiagnosticSink::new();
        let span = Span::new(3, 7);
        assert!(sink.report(ErrorCode::SubtypeError, span, &["int", "bool"]));
        assert!(!sink.report(ErrorCode::SubtypeError, span, &["int", "bool"]));
        assert!(sink.report(ErrorCode::InvalidField, span, &["g"]));
        assert_eq!(sink.len(), 2);
        assert!(!sink.is_ok());
    }
}
