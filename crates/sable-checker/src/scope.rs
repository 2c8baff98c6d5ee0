//! The enclosing scope stack.
//!
//! A stack of scope records threaded through declaration and statement
//! checking. Function/method scopes carry the enclosing declaration (and
//! implicitly declare the lifetime `this`); named-block scopes add one
//! lifetime each. Lookup walks outward by kind.

use sable_ast::CallableDecl;
use sable_common::{Atom, Lifetime};

/// One enclosing scope.
#[derive(Debug)]
pub enum Scope<'a> {
    FunctionOrMethod { decl: &'a CallableDecl },
    NamedBlock { name: Atom },
}

/// A stack of scopes, innermost last.
#[derive(Debug, Default)]
pub struct ScopeStack<'a> {
    scopes: Vec<Scope<'a>>,
}

impl<'a> ScopeStack<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_callable(&mut self, decl: &'a CallableDecl) {
        self.scopes.push(Scope::FunctionOrMethod { decl });
    }

    pub fn push_named_block(&mut self, name: Atom) {
        self.scopes.push(Scope::NamedBlock { name });
    }

    pub fn pop(&mut self) {
        self.scopes.pop();
    }

    /// The innermost enclosing function or method declaration.
    pub fn enclosing_callable(&self) -> Option<&'a CallableDecl> {
        self.scopes.iter().rev().find_map(|scope| match scope {
            Scope::FunctionOrMethod { decl } => Some(*decl),
            Scope::NamedBlock { .. } => None,
        })
    }

    /// Every lifetime currently declared: `this` and lifetime parameters
    /// from the enclosing callable, plus one per named block.
    pub fn declared_lifetimes(&self) -> Vec<Lifetime> {
        let mut lifetimes = Vec::new();
        for scope in &self.scopes {
            match scope {
                Scope::FunctionOrMethod { decl } => {
                    lifetimes.push(Lifetime::This);
                    lifetimes.extend(decl.lifetimes.iter().map(|&name| Lifetime::Named(name)));
                }
                Scope::NamedBlock { name } => lifetimes.push(Lifetime::Named(*name)),
            }
        }
        lifetimes
    }
}
