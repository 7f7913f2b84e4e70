//! Runtime support for the Quill interpreter.
//!
//! Evaluation itself lives outside this crate. What is defined here is the
//! scope type the AST's evaluation hooks receive.

use indexmap::IndexMap;

use crate::ast::Expression;

/// Name bindings in definition order, chained to an enclosing scope
#[derive(Debug, Clone, Default)]
pub struct Scope {
    bindings: IndexMap<String, Expression>,
    parent: Option<Box<Scope>>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// A child scope whose lookups fall back to `parent`
    pub fn with_parent(parent: Scope) -> Self {
        Self {
            bindings: IndexMap::new(),
            parent: Some(Box::new(parent)),
        }
    }

    /// Bind `name`, returning the previous value bound in this scope
    pub fn define(&mut self, name: impl Into<String>, value: Expression) -> Option<Expression> {
        self.bindings.insert(name.into(), value)
    }

    pub fn lookup(&self, name: &str) -> Option<&Expression> {
        self.bindings
            .get(name)
            .or_else(|| self.parent.as_ref().and_then(|p| p.lookup(name)))
    }

    /// Names bound directly in this scope, oldest first
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    pub fn into_parent(self) -> Option<Scope> {
        self.parent.map(|p| *p)
    }
}
