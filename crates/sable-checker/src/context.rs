//! Checker state: shared context for one unit's checking pass.

use crate::annotations::Annotations;
use crate::scope::ScopeStack;
use rustc_hash::FxHashMap;
use sable_ast::{Decl, DeclIndex, TypeExpr, Unit, VarId};
use sable_common::{
    Atom, CheckerOptions, Diagnostic, DiagnosticSink, ErrorCode, Interner, Lifetime, Span,
};
use sable_solver::{
    to_concrete, LifetimeRel, NominalId, SubtypeChecker, TypeDisplay, TypeId, TypeInterner,
};
use tracing::debug;

/// The outcome of checking one unit.
#[derive(Debug)]
pub struct CheckResult {
    /// True if no errors were seen.
    pub ok: bool,
    pub diagnostics: Vec<Diagnostic>,
    pub annotations: Annotations,
}

/// Check every declaration of a unit. The AST is read-only; inferred types
/// land in the returned annotation tables.
pub fn check_unit(
    unit: &Unit,
    types: &TypeInterner,
    strings: &Interner,
    options: CheckerOptions,
) -> CheckResult {
    let mut state = CheckerState::new(unit, types, strings, options);
    state.register_nominals();
    for (index, decl) in unit.decls.iter().enumerate() {
        state.check_declaration(DeclIndex(index as u32), decl);
    }
    let CheckerState {
        sink, annotations, ..
    } = state;
    CheckResult {
        ok: sink.is_ok(),
        diagnostics: sink.into_diagnostics(),
        annotations,
    }
}

/// All state threaded through one unit's checking pass.
pub struct CheckerState<'a> {
    pub(crate) unit: &'a Unit,
    pub(crate) types: &'a TypeInterner,
    pub(crate) strings: &'a Interner,
    pub(crate) options: CheckerOptions,
    pub(crate) subtypes: SubtypeChecker<'a>,
    pub(crate) sink: DiagnosticSink,
    pub(crate) annotations: Annotations,
    pub(crate) scopes: ScopeStack<'a>,
    /// Nominal handles for this unit's type declarations.
    nominal_ids: FxHashMap<DeclIndex, NominalId>,
    /// Declared (never refined) type of every variable declaration seen.
    declared_types: FxHashMap<VarId, TypeId>,
    /// Lowered callable signatures, by declaration.
    signatures: FxHashMap<DeclIndex, TypeId>,
}

impl<'a> CheckerState<'a> {
    pub fn new(
        unit: &'a Unit,
        types: &'a TypeInterner,
        strings: &'a Interner,
        options: CheckerOptions,
    ) -> Self {
        CheckerState {
            unit,
            types,
            strings,
            options,
            subtypes: SubtypeChecker::new(types),
            sink: DiagnosticSink::new(),
            annotations: Annotations::default(),
            scopes: ScopeStack::new(),
            nominal_ids: FxHashMap::default(),
            declared_types: FxHashMap::default(),
            signatures: FxHashMap::default(),
        }
    }

    /// Register every type declaration's nominal handle, then lower the
    /// bodies. Two passes, so mutually recursive nominals resolve.
    pub(crate) fn register_nominals(&mut self) {
        for (index, decl) in self.unit.decls.iter().enumerate() {
            if let Decl::Type(type_decl) = decl {
                let id = self
                    .types
                    .register_nominal(type_decl.name, type_decl.has_invariant());
                self.nominal_ids.insert(DeclIndex(index as u32), id);
            }
        }
        for (index, decl) in self.unit.decls.iter().enumerate() {
            if let Decl::Type(type_decl) = decl {
                let body = self.lower_type(&type_decl.body);
                let id = self.nominal_ids[&DeclIndex(index as u32)];
                self.types.set_nominal_body(id, body);
                debug!(name = %self.strings.resolve(type_decl.name), "registered nominal");
            }
        }
    }

    pub(crate) fn nominal_id(&self, decl: DeclIndex) -> Option<NominalId> {
        self.nominal_ids.get(&decl).copied()
    }

    // =========================================================================
    // Type lowering
    // =========================================================================

    /// Lower a syntactic type expression into the semantic algebra.
    pub(crate) fn lower_type(&self, ty: &TypeExpr) -> TypeId {
        match ty {
            TypeExpr::Void => TypeId::VOID,
            TypeExpr::Any => TypeId::ANY,
            TypeExpr::Null => TypeId::NULL,
            TypeExpr::Bool => TypeId::BOOL,
            TypeExpr::Byte => TypeId::BYTE,
            TypeExpr::Int => TypeId::INT,
            TypeExpr::Nominal(decl) => match self.nominal_ids.get(decl) {
                Some(&id) => self.types.nominal(id),
                // A link to something that is not a type declaration; an
                // unknown nominal kind behaves as `any`.
                None => TypeId::ANY,
            },
            TypeExpr::Array(elem) => self.types.array(self.lower_type(elem)),
            TypeExpr::Reference { elem, lifetime } => self
                .types
                .reference(self.lower_type(elem), lifetime.unwrap_or(Lifetime::Static)),
            TypeExpr::Record { open, fields } => {
                let fields = fields
                    .iter()
                    .map(|(name, field)| (*name, self.lower_type(field)))
                    .collect();
                self.types.record(*open, fields)
            }
            TypeExpr::Callable {
                kind,
                params,
                returns,
                lifetimes,
            } => {
                let params = params.iter().map(|p| self.lower_type(p)).collect();
                let returns = returns.iter().map(|r| self.lower_type(r)).collect();
                self.types.callable(*kind, params, returns, lifetimes.clone())
            }
            TypeExpr::Union(children) => {
                let children = children.iter().map(|c| self.lower_type(c)).collect();
                self.types.union(children)
            }
            TypeExpr::Intersection(children) => {
                let children = children.iter().map(|c| self.lower_type(c)).collect();
                self.types.intersection(children)
            }
            TypeExpr::Negation(inner) => self.types.negation(self.lower_type(inner)),
        }
    }

    // =========================================================================
    // Declared variable types
    // =========================================================================

    pub(crate) fn record_declared(&mut self, var: VarId, ty: TypeId) {
        self.declared_types.insert(var, ty);
    }

    /// The declared (never refined) type of a variable.
    pub(crate) fn declared(&self, var: VarId) -> TypeId {
        *self
            .declared_types
            .get(&var)
            .unwrap_or_else(|| panic!("variable {var:?} has no declared type"))
    }

    /// Lazily lowered callable signature of a declaration. `None` for
    /// declarations that are not callable.
    pub(crate) fn signature(&mut self, index: DeclIndex) -> Option<TypeId> {
        if let Some(&sig) = self.signatures.get(&index) {
            return Some(sig);
        }
        let decl = self.unit.decls.get(index.index())?;
        let sig = match decl {
            Decl::FunctionOrMethod(callable) => {
                let params = callable
                    .parameters
                    .iter()
                    .map(|p| self.lower_type(&p.declared))
                    .collect();
                let returns = callable
                    .returns
                    .iter()
                    .map(|r| self.lower_type(&r.declared))
                    .collect();
                self.types
                    .callable(callable.kind, params, returns, callable.lifetimes.clone())
            }
            Decl::Property(property) => {
                let params = property
                    .parameters
                    .iter()
                    .map(|p| self.lower_type(&p.declared))
                    .collect();
                self.types.callable(
                    sable_common::CallableKind::Function,
                    params,
                    vec![TypeId::BOOL],
                    Vec::new(),
                )
            }
            _ => return None,
        };
        self.signatures.insert(index, sig);
        Some(sig)
    }

    // =========================================================================
    // Error emission
    // =========================================================================

    pub(crate) fn error_at(&mut self, span: Span, code: ErrorCode, args: &[&str]) {
        self.sink.report(code, span, args);
    }

    /// Render a type in source syntax for a diagnostic.
    pub(crate) fn type_name(&self, ty: TypeId) -> String {
        TypeDisplay::new(self.types, self.strings, ty).to_string()
    }

    pub(crate) fn atom_name(&self, atom: Atom) -> String {
        self.strings.resolve(atom)
    }

    /// Relaxed subtype check with null-propagation: a missing side means an
    /// error was already reported upstream, so the check succeeds silently.
    pub(crate) fn check_subtype(
        &mut self,
        found: Option<TypeId>,
        expected: Option<TypeId>,
        rel: &LifetimeRel,
        span: Span,
    ) -> bool {
        let (Some(found), Some(expected)) = (found, expected) else {
            return true;
        };
        if self.subtypes.is_subtype(found, expected, rel) {
            return true;
        }
        let expected_name = self.type_name(expected);
        let found_name = self.type_name(found);
        self.error_at(span, ErrorCode::SubtypeError, &[&expected_name, &found_name]);
        false
    }

    /// The concrete rendition of a semantic type (strict normalization).
    pub(crate) fn concrete(&mut self, ty: TypeId, rel: &LifetimeRel) -> TypeId {
        to_concrete(&mut self.subtypes, ty, rel)
    }
}
