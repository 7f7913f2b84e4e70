//! Abstract Syntax Tree (AST) definitions for the Quill language.
//!
//! Every node exclusively owns its children; dropping a node releases the
//! whole subtree. Two renderings are provided: `Display` gives the canonical
//! surface syntax, `inspect()` a debug form that names node kinds.

mod declarations;
mod expressions;
mod types;

pub use declarations::{FnNode, TypedArg, ANONYMOUS_NAME};
pub use expressions::{
    AssignExpr, BinaryExpr, BinaryOp, Expression, IfExpr, UnaryExpr, UnaryOp, WhileExpr,
};
pub use types::ExprKind;

/// Span information for source location tracking (byte offsets)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn dummy() -> Self {
        Self { start: 0, end: 0 }
    }
}

impl From<std::ops::Range<usize>> for Span {
    fn from(range: std::ops::Range<usize>) -> Self {
        Self {
            start: range.start,
            end: range.end,
        }
    }
}
