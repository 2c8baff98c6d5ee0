//! Declaration checking.

use crate::context::CheckerState;
use crate::environment::Environment;
use sable_ast::{
    CallableDecl, Decl, DeclIndex, PropertyDecl, StaticVarDecl, TypeDecl,
};
use sable_common::ErrorCode;
use sable_solver::TypeId;
use tracing::instrument;

impl<'a> CheckerState<'a> {
    /// Check one top-level declaration. Each declaration starts from a
    /// fresh environment; errors in one declaration never leak into the
    /// next.
    #[instrument(level = "debug", skip(self, decl), fields(index = index.0))]
    pub(crate) fn check_declaration(&mut self, index: DeclIndex, decl: &'a Decl) {
        match decl {
            Decl::Import(_) => {}
            Decl::StaticVariable(static_var) => self.check_static_variable(static_var),
            Decl::Type(type_decl) => self.check_type_decl(index, type_decl),
            Decl::FunctionOrMethod(callable) => self.check_callable(callable),
            Decl::Property(property) => self.check_property(property),
        }
    }

    /// `int counter = 0` at unit level: the initialiser must fit the
    /// declared type.
    fn check_static_variable(&mut self, decl: &'a StaticVarDecl) {
        let declared = self.lower_type(&decl.declared);
        let env = Environment::new();
        let init_ty = self.check_expr(&decl.initialiser, &env);
        let rel = env.lifetimes().clone();
        self.check_subtype(init_ty, Some(declared), &rel, decl.initialiser.span);
    }

    /// `type nat is (int n) where n >= 0`: the declaration must be
    /// contractive and its invariant clauses must be boolean over the bound
    /// variable.
    fn check_type_decl(&mut self, index: DeclIndex, decl: &'a TypeDecl) {
        if let Some(nominal) = self.nominal_id(index) {
            if !self.subtypes.is_contractive(nominal) {
                self.error_at(decl.span, ErrorCode::EmptyType, &[]);
                return;
            }
        }
        let body = self.lower_type(&decl.body);
        self.record_declared(decl.var, body);
        let mut env = Environment::new();
        env.declare(decl.var, body);
        for clause in &decl.invariants {
            env = self.check_condition(clause, true, env);
        }
    }

    /// `property nonEmpty(int[] xs) where |xs| > 0`: clauses are boolean
    /// conditions over the parameters.
    fn check_property(&mut self, decl: &'a PropertyDecl) {
        let mut env = Environment::new();
        for param in &decl.parameters {
            let ty = self.lower_type(&param.declared);
            self.record_declared(param.var, ty);
            env.declare(param.var, ty);
        }
        for clause in &decl.clauses {
            env = self.check_condition(clause, true, env);
        }
    }

    /// A function or method: parameters seed the environment, preconditions
    /// refine it, the body threads it, and a live exit from a body with
    /// declared returns is a missing return statement.
    fn check_callable(&mut self, decl: &'a CallableDecl) {
        let mut env = Environment::new();
        for param in &decl.parameters {
            let ty = self.lower_type(&param.declared);
            self.record_declared(param.var, ty);
            env.declare(param.var, ty);
        }
        // Return parameters are visible to postconditions only.
        let mut return_types: Vec<TypeId> = Vec::with_capacity(decl.returns.len());
        for ret in &decl.returns {
            let ty = self.lower_type(&ret.declared);
            self.record_declared(ret.var, ty);
            return_types.push(ty);
        }

        self.scopes.push_callable(decl);

        for clause in &decl.requires {
            env = self.check_condition(clause, true, env);
        }
        if !decl.ensures.is_empty() {
            let mut spec_env = env.clone();
            for ret in &decl.returns {
                spec_env.declare(ret.var, self.declared(ret.var));
            }
            for clause in &decl.ensures {
                spec_env = self.check_condition(clause, true, spec_env);
            }
        }

        if let Some(body) = &decl.body {
            let exit = self.check_block(body, env);
            if !exit.is_bottom() && !return_types.is_empty() && !decl.is_native() {
                self.error_at(decl.span, ErrorCode::MissingReturnStatement, &[]);
            }
        }

        self.scopes.pop();
    }
}
