//! Statement checking.
//!
//! Statements thread the environment: each check takes the incoming
//! environment by value and returns the environment after the statement.
//! `Bottom` flags unreachable code; a block reports the first unreachable
//! statement and skips the rest rather than cascading.

use crate::context::CheckerState;
use crate::environment::Environment;
use sable_ast::{
    AssignStmt, Block, DebugStmt, DoWhileStmt, Expr, ExprKind, IfElseStmt, NamedBlockStmt,
    ReturnStmt, Stmt, SwitchStmt, VarId, VariableDecl, WhileStmt,
};
use sable_common::{ErrorCode, Lifetime, Span};
use sable_solver::TypeId;

impl<'a> CheckerState<'a> {
    pub(crate) fn check_block(&mut self, block: &'a Block, mut env: Environment) -> Environment {
        for stmt in &block.stmts {
            if env.is_bottom() {
                if self.options.check_unreachable {
                    self.error_at(stmt.span(), ErrorCode::UnreachableCode, &[]);
                }
                return Environment::Bottom;
            }
            env = self.check_stmt(stmt, env);
        }
        env
    }

    fn check_stmt(&mut self, stmt: &'a Stmt, env: Environment) -> Environment {
        match stmt {
            Stmt::VariableDecl(decl) => self.check_variable_decl(decl, env),
            Stmt::Assign(assign) => self.check_assign(assign, env),
            Stmt::Return(ret) => self.check_return(ret, env),
            Stmt::IfElse(if_else) => self.check_if_else(if_else, env),
            Stmt::NamedBlock(block) => self.check_named_block(block, env),
            Stmt::While(while_stmt) => self.check_while(while_stmt, env),
            Stmt::DoWhile(do_while) => self.check_do_while(do_while, env),
            Stmt::Switch(switch) => self.check_switch(switch, env),
            Stmt::Break(_) | Stmt::Continue(_) | Stmt::Fail(_) => Environment::Bottom,
            Stmt::Skip(_) => env,
            Stmt::Assert(assert) | Stmt::Assume(assert) => {
                self.check_condition(&assert.condition, true, env)
            }
            Stmt::Debug(debug) => self.check_debug(debug, env),
            Stmt::Expr(expr) => self.check_invocation_stmt(expr, env),
        }
    }

    /// Variable declaration: the initialiser must fit the declared type;
    /// the known type starts at the declaration, not the initialiser.
    fn check_variable_decl(&mut self, decl: &'a VariableDecl, mut env: Environment) -> Environment {
        let declared = self.lower_type(&decl.declared);
        self.record_declared(decl.var, declared);
        if let Some(init) = &decl.initialiser {
            let init_ty = self.check_expr(init, &env);
            let rel = env.lifetimes().clone();
            self.check_subtype(init_ty, Some(declared), &rel, init.span);
        }
        env.declare(decl.var, declared);
        env
    }

    /// Assignment: right-hand sides are evaluated against the pre-state and
    /// matched component-wise against l-value declared types. Assignment
    /// clobbers refinements on the written variables.
    fn check_assign(&mut self, assign: &'a AssignStmt, env: Environment) -> Environment {
        let mut values: Vec<(Option<TypeId>, Span)> = Vec::with_capacity(assign.rhs.len());
        let mut failed = false;
        for rhs in &assign.rhs {
            match self.check_multi_expr(rhs, &env) {
                Some(types) => values.extend(types.into_iter().map(|t| (Some(t), rhs.span))),
                None => {
                    failed = true;
                    values.push((None, rhs.span));
                }
            }
        }
        if !failed {
            if values.len() < assign.lhs.len() {
                self.error_at(assign.span, ErrorCode::InsufficientReturns, &[]);
            } else if values.len() > assign.lhs.len() {
                self.error_at(assign.span, ErrorCode::TooManyReturns, &[]);
            }
        }

        let rel = env.lifetimes().clone();
        let mut env = env;
        for (lval, &(value, value_span)) in assign.lhs.iter().zip(values.iter()) {
            let Some(info) = self.check_lval(lval, &env) else {
                continue;
            };
            self.check_subtype(value, Some(info.ty), &rel, value_span);
            let Some(root) = info.root else { continue };
            if !env.is_declared(root) {
                continue;
            }
            let declared = self.declared(root);
            // A whole-variable write may keep the assigned value's type
            // (bounded by the declaration); a component write resets the
            // root to its declared type.
            let known = if info.direct {
                match value {
                    Some(value_ty) => {
                        let meet = self.types.intersection(vec![declared, value_ty]);
                        self.concrete(meet, &rel)
                    }
                    None => declared,
                }
            } else {
                declared
            };
            env = env.refine(root, known);
        }
        env
    }

    fn check_return(&mut self, ret: &'a ReturnStmt, env: Environment) -> Environment {
        let callable = self
            .scopes
            .enclosing_callable()
            .unwrap_or_else(|| panic!("return statement outside a callable"));
        let expected: Vec<TypeId> = callable
            .returns
            .iter()
            .map(|r| self.lower_type(&r.declared))
            .collect();

        let mut values: Vec<(Option<TypeId>, Span)> = Vec::with_capacity(ret.values.len());
        let mut failed = false;
        for value in &ret.values {
            match self.check_multi_expr(value, &env) {
                Some(types) => values.extend(types.into_iter().map(|t| (Some(t), value.span))),
                None => {
                    failed = true;
                    values.push((None, value.span));
                }
            }
        }
        if !failed {
            if values.len() < expected.len() {
                self.error_at(ret.span, ErrorCode::InsufficientReturns, &[]);
            } else if values.len() > expected.len() {
                self.error_at(ret.span, ErrorCode::TooManyReturns, &[]);
            }
        }
        let rel = env.lifetimes().clone();
        for (&(value, value_span), &expected_ty) in values.iter().zip(expected.iter()) {
            self.check_subtype(value, Some(expected_ty), &rel, value_span);
        }
        Environment::Bottom
    }

    fn check_if_else(&mut self, if_else: &'a IfElseStmt, env: Environment) -> Environment {
        let env_true = self.check_condition(&if_else.condition, true, env.clone());
        let env_false = self.check_condition(&if_else.condition, false, env);
        let true_exit = self.check_block(&if_else.true_branch, env_true);
        let false_exit = match &if_else.false_branch {
            Some(false_branch) => self.check_block(false_branch, env_false),
            None => env_false,
        };
        true_exit.union(&false_exit, self.types)
    }

    /// A named block introduces one lifetime, within every lifetime
    /// currently declared.
    fn check_named_block(&mut self, block: &'a NamedBlockStmt, mut env: Environment) -> Environment {
        let covered = self.scopes.declared_lifetimes();
        self.scopes.push_named_block(block.name);
        {
            let rel = env.lifetimes_mut();
            for outer in covered {
                rel.insert(Lifetime::Named(block.name), outer);
            }
        }
        let exit = self.check_block(&block.body, env);
        self.scopes.pop();
        exit
    }

    /// No fixed point: the body is checked in the condition's true
    /// environment with modified variables reset to their declared types,
    /// its refinements are discarded, and the post-state is the condition's
    /// false environment.
    fn check_while(&mut self, while_stmt: &'a WhileStmt, env: Environment) -> Environment {
        let mut entry = env;
        for invariant in &while_stmt.invariants {
            entry = self.check_condition(invariant, true, entry);
        }

        let modified = collect_modified(&while_stmt.body);
        self.annotations
            .record_loop_modified(while_stmt.condition.id, modified.clone());
        let mut loop_env = entry;
        for &var in &modified {
            if loop_env.is_declared(var) {
                let declared = self.declared(var);
                loop_env = loop_env.refine(var, declared);
            }
        }
        if self.options.verification {
            // Preservation obligation: invariants must also type-check in
            // the havocked loop environment.
            let mut havoc = loop_env.clone();
            for invariant in &while_stmt.invariants {
                havoc = self.check_condition(invariant, true, havoc);
            }
        }

        let env_true = self.check_condition(&while_stmt.condition, true, loop_env.clone());
        self.check_block(&while_stmt.body, env_true);
        self.check_condition(&while_stmt.condition, false, loop_env)
    }

    /// The body runs at least once; it is checked with modified variables
    /// reset (later iterations see arbitrary modified values), then the
    /// condition's false environment of the body's exit is the post-state.
    fn check_do_while(&mut self, do_while: &'a DoWhileStmt, env: Environment) -> Environment {
        let modified = collect_modified(&do_while.body);
        self.annotations
            .record_loop_modified(do_while.condition.id, modified.clone());
        let mut loop_env = env;
        for &var in &modified {
            if loop_env.is_declared(var) {
                let declared = self.declared(var);
                loop_env = loop_env.refine(var, declared);
            }
        }

        let mut exit = self.check_block(&do_while.body, loop_env);
        for invariant in &do_while.invariants {
            exit = self.check_condition(invariant, true, exit);
        }
        self.check_condition(&do_while.condition, false, exit)
    }

    /// Case arms are checked against the incoming environment and their
    /// exits joined; without a default, fall-through past the switch is
    /// possible, so the incoming environment joins too.
    fn check_switch(&mut self, switch: &'a SwitchStmt, env: Environment) -> Environment {
        let cond_ty = self.check_expr(&switch.condition, &env);
        let rel = env.lifetimes().clone();
        let mut result = Environment::Bottom;
        let mut has_default = false;
        for case in &switch.cases {
            if case.is_default() {
                has_default = true;
            }
            for value in &case.values {
                let value_ty = self.check_expr(value, &env);
                if let (Some(value_ty), Some(cond_ty)) = (value_ty, cond_ty) {
                    let overlap = self.types.intersection(vec![value_ty, cond_ty]);
                    if self.subtypes.is_void_strict(overlap, &rel) {
                        let expected = self.type_name(cond_ty);
                        let found = self.type_name(value_ty);
                        self.error_at(value.span, ErrorCode::SubtypeError, &[&expected, &found]);
                    }
                }
            }
            let exit = self.check_block(&case.body, env.clone());
            result = result.union(&exit, self.types);
        }
        if !has_default {
            result = result.union(&env, self.types);
        }
        result
    }

    /// `debug e`: the operand is a byte string, `int[]`.
    fn check_debug(&mut self, debug: &'a DebugStmt, env: Environment) -> Environment {
        let ty = self.check_expr(&debug.operand, &env);
        let expected = self.types.array(TypeId::INT);
        let rel = env.lifetimes().clone();
        self.check_subtype(ty, Some(expected), &rel, debug.operand.span);
        env
    }

    /// An expression statement must be an invocation; its values, if any,
    /// are discarded.
    fn check_invocation_stmt(&mut self, expr: &'a Expr, env: Environment) -> Environment {
        match &expr.kind {
            ExprKind::Invoke { .. } | ExprKind::IndirectInvoke { .. } => {
                self.check_multi_expr(expr, &env);
            }
            _ => unreachable!("expression statement must be an invocation"),
        }
        env
    }
}

/// Variables assigned anywhere inside a block, through any l-value rooted
/// at a variable. Heap writes (dereference l-values) touch no variable.
pub(crate) fn collect_modified(block: &Block) -> Vec<VarId> {
    let mut vars = Vec::new();
    collect_block(block, &mut vars);
    vars.sort_unstable();
    vars.dedup();
    vars
}

fn collect_block(block: &Block, vars: &mut Vec<VarId>) {
    for stmt in &block.stmts {
        collect_stmt(stmt, vars);
    }
}

fn collect_stmt(stmt: &Stmt, vars: &mut Vec<VarId>) {
    match stmt {
        Stmt::Assign(assign) => {
            for lval in &assign.lhs {
                if let Some(root) = lval_root(lval) {
                    vars.push(root);
                }
            }
        }
        Stmt::IfElse(if_else) => {
            collect_block(&if_else.true_branch, vars);
            if let Some(false_branch) = &if_else.false_branch {
                collect_block(false_branch, vars);
            }
        }
        Stmt::NamedBlock(block) => collect_block(&block.body, vars),
        Stmt::While(while_stmt) => collect_block(&while_stmt.body, vars),
        Stmt::DoWhile(do_while) => collect_block(&do_while.body, vars),
        Stmt::Switch(switch) => {
            for case in &switch.cases {
                collect_block(&case.body, vars);
            }
        }
        _ => {}
    }
}

fn lval_root(expr: &Expr) -> Option<VarId> {
    match &expr.kind {
        ExprKind::VariableAccess { var } => Some(*var),
        ExprKind::RecordAccess { source, .. } | ExprKind::ArrayAccess { source, .. } => {
            lval_root(source)
        }
        _ => None,
    }
}
