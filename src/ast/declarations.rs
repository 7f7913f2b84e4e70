//! Function definitions

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{ExprKind, Expression};
use crate::error::{QuillResult, RuntimeError};
use crate::runtime::Scope;

/// Placeholder printed for anonymous functions
pub const ANONYMOUS_NAME: &str = "<fn>";

/// An argument with an optional declared type; `None` means untyped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypedArg {
    pub name: String,
    pub ty: Option<ExprKind>,
}

/// A named or anonymous function: argument list plus one body expression.
///
/// Built incrementally by the parser: created empty, arguments appended as
/// they are read, body attached last. Duplicate argument names are not
/// rejected here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FnNode {
    pub name: Option<String>,
    pub args: Vec<TypedArg>,
    pub body: Option<Box<Expression>>,
}

impl FnNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn add_argument(&mut self, name: &str, ty: Option<ExprKind>) {
        self.args.push(TypedArg {
            name: name.to_string(),
            ty,
        });
    }

    pub fn nargs(&self) -> usize {
        self.args.len()
    }

    pub fn set_body(&mut self, body: Expression) {
        self.body = Some(Box::new(body));
    }

    pub fn is_anonymous(&self) -> bool {
        self.name.is_none()
    }

    /// Evaluation belongs to the interpreter, which this crate does not provide.
    pub fn evaluate(&self, _scope: &Scope) -> QuillResult<Expression> {
        Err(RuntimeError::Unimplemented {
            feature: format!(
                "evaluation of function {}",
                self.name.as_deref().unwrap_or(ANONYMOUS_NAME)
            ),
        }
        .into())
    }

    /// Debug rendering. Same shape as `Display`, with the body inspected.
    pub fn inspect(&self) -> String {
        let mut out = self.signature();
        if let Some(body) = &self.body {
            out.push(' ');
            out.push_str(&body.inspect());
        }
        out
    }

    fn signature(&self) -> String {
        let args = self
            .args
            .iter()
            .map(|arg| match arg.ty {
                Some(ty) => format!("{}:{}", arg.name, ty),
                None => arg.name.clone(),
            })
            .collect::<Vec<_>>()
            .join(" ");

        format!(
            "fn {} ({})",
            self.name.as_deref().unwrap_or(ANONYMOUS_NAME),
            args
        )
    }
}

impl fmt::Display for FnNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.signature())?;
        match &self.body {
            Some(body) => write!(f, " {}", body),
            None => Ok(()),
        }
    }
}
