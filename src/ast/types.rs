//! Expression kinds, which double as argument type tags

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of an expression node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExprKind {
    Real,
    String,
    Block,
    Identifier,
    Assign,
    Binary,
    Unary,
    Function,
    If,
    While,
}

impl ExprKind {
    pub const ALL: [ExprKind; 10] = [
        ExprKind::Real,
        ExprKind::String,
        ExprKind::Block,
        ExprKind::Identifier,
        ExprKind::Assign,
        ExprKind::Binary,
        ExprKind::Unary,
        ExprKind::Function,
        ExprKind::If,
        ExprKind::While,
    ];

    /// Spelling used in type annotations and the debug rendering
    pub fn name(self) -> &'static str {
        match self {
            ExprKind::Real => "real",
            ExprKind::String => "string",
            ExprKind::Block => "block",
            ExprKind::Identifier => "id",
            ExprKind::Assign => "assign",
            ExprKind::Binary => "binary",
            ExprKind::Unary => "unary",
            ExprKind::Function => "function",
            ExprKind::If => "conditional",
            ExprKind::While => "loop",
        }
    }

    pub fn from_name(name: &str) -> Option<ExprKind> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for ExprKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for kind in ExprKind::ALL {
            assert_eq!(ExprKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(ExprKind::from_name("integer"), None);
    }
}
