//! Expression nodes

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{ExprKind, FnNode};
use crate::lexer::{escape_string, Token};

/// Expression node. A program, like a function body, is one `Block`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    Real(f64),
    String(String),
    Block(Vec<Expression>),
    Identifier(String),
    Assign(AssignExpr),
    Binary(BinaryExpr),
    Unary(UnaryExpr),
    Function(FnNode),
    If(IfExpr),
    While(WhileExpr),
}

/// `target <- value`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignExpr {
    pub target: String,
    pub value: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryExpr {
    pub op: BinaryOp,
    pub left: Box<Expression>,
    pub right: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub operand: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfExpr {
    pub condition: Box<Expression>,
    pub then_branch: Box<Expression>,
    pub else_branch: Option<Box<Expression>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhileExpr {
    pub condition: Box<Expression>,
    pub body: Box<Expression>,
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    // Boolean
    Or,
    Xor,
    And,
    // Comparison
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
    // String concatenation
    Concat,
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Or => "||",
            BinaryOp::Xor => "^",
            BinaryOp::And => "&&",
            BinaryOp::Eq => "=",
            BinaryOp::Neq => "/=",
            BinaryOp::Lt => "<",
            BinaryOp::Lte => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Gte => ">=",
            BinaryOp::Concat => "..",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
        }
    }

    /// Binding strength; higher binds tighter. All operators are left associative.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Or => 1,
            BinaryOp::Xor => 2,
            BinaryOp::And => 3,
            BinaryOp::Eq
            | BinaryOp::Neq
            | BinaryOp::Lt
            | BinaryOp::Lte
            | BinaryOp::Gt
            | BinaryOp::Gte => 4,
            BinaryOp::Concat => 5,
            BinaryOp::Add | BinaryOp::Sub => 6,
            BinaryOp::Mul | BinaryOp::Div => 7,
        }
    }

    pub fn from_token(token: &Token) -> Option<BinaryOp> {
        let op = match token {
            Token::Or => BinaryOp::Or,
            Token::Xor => BinaryOp::Xor,
            Token::And => BinaryOp::And,
            Token::Equals => BinaryOp::Eq,
            Token::NotEqual => BinaryOp::Neq,
            Token::Less => BinaryOp::Lt,
            Token::LessEqual => BinaryOp::Lte,
            Token::Greater => BinaryOp::Gt,
            Token::GreaterEqual => BinaryOp::Gte,
            Token::Concat => BinaryOp::Concat,
            Token::Plus => BinaryOp::Add,
            Token::Minus => BinaryOp::Sub,
            Token::Star => BinaryOp::Mul,
            Token::Slash => BinaryOp::Div,
            _ => return None,
        };
        Some(op)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    Not,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
        }
    }
}

impl Default for Expression {
    fn default() -> Self {
        Expression::Block(Vec::new())
    }
}

/// Subtrees are detached onto a worklist and freed one node at a time, so
/// dropping a tree takes constant stack whatever its depth.
impl Drop for Expression {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_children(&mut pending);
        while let Some(mut expr) = pending.pop() {
            expr.detach_children(&mut pending);
        }
    }
}

impl Expression {
    pub fn real(value: f64) -> Self {
        Expression::Real(value)
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expression::String(value.into())
    }

    pub fn identifier(name: impl Into<String>) -> Self {
        Expression::Identifier(name.into())
    }

    pub fn block(items: Vec<Expression>) -> Self {
        Expression::Block(items)
    }

    pub fn assign(target: impl Into<String>, value: Expression) -> Self {
        Expression::Assign(AssignExpr {
            target: target.into(),
            value: Box::new(value),
        })
    }

    pub fn binary(op: BinaryOp, left: Expression, right: Expression) -> Self {
        Expression::Binary(BinaryExpr {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn not(operand: Expression) -> Self {
        Expression::Unary(UnaryExpr {
            op: UnaryOp::Not,
            operand: Box::new(operand),
        })
    }

    pub fn if_else(
        condition: Expression,
        then_branch: Expression,
        else_branch: Option<Expression>,
    ) -> Self {
        Expression::If(IfExpr {
            condition: Box::new(condition),
            then_branch: Box::new(then_branch),
            else_branch: else_branch.map(Box::new),
        })
    }

    pub fn while_loop(condition: Expression, body: Expression) -> Self {
        Expression::While(WhileExpr {
            condition: Box::new(condition),
            body: Box::new(body),
        })
    }

    pub fn kind(&self) -> ExprKind {
        match self {
            Expression::Real(_) => ExprKind::Real,
            Expression::String(_) => ExprKind::String,
            Expression::Block(_) => ExprKind::Block,
            Expression::Identifier(_) => ExprKind::Identifier,
            Expression::Assign(_) => ExprKind::Assign,
            Expression::Binary(_) => ExprKind::Binary,
            Expression::Unary(_) => ExprKind::Unary,
            Expression::Function(_) => ExprKind::Function,
            Expression::If(_) => ExprKind::If,
            Expression::While(_) => ExprKind::While,
        }
    }

    /// Items of a block; any other expression is its own single item
    pub fn items(&self) -> &[Expression] {
        match self {
            Expression::Block(items) => items,
            other => std::slice::from_ref(other),
        }
    }

    /// Move every direct subexpression into `out`, leaving empty blocks behind
    fn detach_children(&mut self, out: &mut Vec<Expression>) {
        match self {
            Expression::Real(_) | Expression::String(_) | Expression::Identifier(_) => {}
            Expression::Block(items) => out.append(items),
            Expression::Assign(assign) => out.push(std::mem::take(&mut *assign.value)),
            Expression::Binary(binary) => {
                out.push(std::mem::take(&mut *binary.left));
                out.push(std::mem::take(&mut *binary.right));
            }
            Expression::Unary(unary) => out.push(std::mem::take(&mut *unary.operand)),
            Expression::Function(func) => out.extend(func.body.take().map(|body| *body)),
            Expression::If(cond) => {
                out.push(std::mem::take(&mut *cond.condition));
                out.push(std::mem::take(&mut *cond.then_branch));
                out.extend(cond.else_branch.take().map(|branch| *branch));
            }
            Expression::While(lp) => {
                out.push(std::mem::take(&mut *lp.condition));
                out.push(std::mem::take(&mut *lp.body));
            }
        }
    }

    /// Renders without parentheses wherever it appears
    fn is_atomic(&self) -> bool {
        matches!(
            self,
            Expression::Real(_)
                | Expression::String(_)
                | Expression::Block(_)
                | Expression::Identifier(_)
                | Expression::Unary(_)
        )
    }

    /// Debug rendering, an S-expression of node kinds
    pub fn inspect(&self) -> String {
        match self {
            Expression::Real(value) => format!("(real {})", value),
            Expression::String(value) => format!("(string {})", escape_string(value)),
            Expression::Block(items) => {
                let mut out = String::from("(block");
                for item in items {
                    out.push(' ');
                    out.push_str(&item.inspect());
                }
                out.push(')');
                out
            }
            Expression::Identifier(name) => format!("(id {})", name),
            Expression::Assign(assign) => {
                format!("(assign {} {})", assign.target, assign.value.inspect())
            }
            Expression::Binary(binary) => format!(
                "(binary {} {} {})",
                binary.op.symbol(),
                binary.left.inspect(),
                binary.right.inspect()
            ),
            Expression::Unary(unary) => {
                format!("(unary {} {})", unary.op.symbol(), unary.operand.inspect())
            }
            Expression::Function(func) => func.inspect(),
            Expression::If(cond) => match &cond.else_branch {
                Some(else_branch) => format!(
                    "(conditional {} {} {})",
                    cond.condition.inspect(),
                    cond.then_branch.inspect(),
                    else_branch.inspect()
                ),
                None => format!(
                    "(conditional {} {})",
                    cond.condition.inspect(),
                    cond.then_branch.inspect()
                ),
            },
            Expression::While(lp) => {
                format!("(loop {} {})", lp.condition.inspect(), lp.body.inspect())
            }
        }
    }
}

/// Write `expr` as an operand of an operator with precedence `parent`
fn fmt_operand(
    f: &mut fmt::Formatter<'_>,
    expr: &Expression,
    parent: u8,
    right: bool,
) -> fmt::Result {
    let bare = match expr {
        Expression::Binary(inner) => {
            let prec = inner.op.precedence();
            prec > parent || (prec == parent && !right)
        }
        other => other.is_atomic(),
    };

    if bare {
        write!(f, "{}", expr)
    } else {
        write!(f, "({})", expr)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Real(value) => write!(f, "{}", value),
            Expression::String(value) => f.write_str(&escape_string(value)),
            Expression::Block(items) => {
                f.write_str("{ ")?;
                for item in items {
                    write!(f, "{} ", item)?;
                }
                f.write_str("}")
            }
            Expression::Identifier(name) => f.write_str(name),
            Expression::Assign(assign) => write!(f, "{} <- {}", assign.target, assign.value),
            Expression::Binary(binary) => {
                let prec = binary.op.precedence();
                fmt_operand(f, &binary.left, prec, false)?;
                write!(f, " {} ", binary.op.symbol())?;
                fmt_operand(f, &binary.right, prec, true)
            }
            Expression::Unary(unary) => {
                f.write_str(unary.op.symbol())?;
                if unary.operand.is_atomic() {
                    write!(f, "{}", unary.operand)
                } else {
                    write!(f, "({})", unary.operand)
                }
            }
            Expression::Function(func) => write!(f, "{}", func),
            Expression::If(cond) => {
                write!(f, "if {} ", cond.condition)?;
                match &cond.else_branch {
                    Some(else_branch) => {
                        // an open-ended then branch would capture the else
                        let closed = cond.then_branch.is_atomic()
                            || matches!(*cond.then_branch, Expression::Binary(_));
                        if closed {
                            write!(f, "{}", cond.then_branch)?;
                        } else {
                            write!(f, "({})", cond.then_branch)?;
                        }
                        write!(f, " else {}", else_branch)
                    }
                    None => write!(f, "{}", cond.then_branch),
                }
            }
            Expression::While(lp) => write!(f, "while {} {}", lp.condition, lp.body),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_rendering() {
        assert_eq!(Expression::real(1.0).to_string(), "1");
        assert_eq!(Expression::real(2.5).to_string(), "2.5");
        assert_eq!(Expression::string("a\nb").to_string(), r#""a\nb""#);
        assert_eq!(Expression::block(vec![]).to_string(), "{ }");
    }

    #[test]
    fn test_precedence_parentheses() {
        // (a + b) * c
        let expr = Expression::binary(
            BinaryOp::Mul,
            Expression::binary(
                BinaryOp::Add,
                Expression::identifier("a"),
                Expression::identifier("b"),
            ),
            Expression::identifier("c"),
        );
        assert_eq!(expr.to_string(), "(a + b) * c");

        // a - (b - c)
        let expr = Expression::binary(
            BinaryOp::Sub,
            Expression::identifier("a"),
            Expression::binary(
                BinaryOp::Sub,
                Expression::identifier("b"),
                Expression::identifier("c"),
            ),
        );
        assert_eq!(expr.to_string(), "a - (b - c)");

        // (a - b) - c
        let expr = Expression::binary(
            BinaryOp::Sub,
            Expression::binary(
                BinaryOp::Sub,
                Expression::identifier("a"),
                Expression::identifier("b"),
            ),
            Expression::identifier("c"),
        );
        assert_eq!(expr.to_string(), "a - b - c");
    }

    #[test]
    fn test_inspect() {
        let expr = Expression::block(vec![Expression::assign(
            "x",
            Expression::not(Expression::identifier("y")),
        )]);
        assert_eq!(expr.inspect(), "(block (assign x (unary ! (id y))))");
        assert_eq!(expr.to_string(), "{ x <- !y }");
    }

    #[test]
    fn test_if_else_keeps_else_attached() {
        let inner = Expression::if_else(
            Expression::identifier("b"),
            Expression::identifier("c"),
            None,
        );
        let outer = Expression::if_else(
            Expression::identifier("a"),
            inner,
            Some(Expression::identifier("d")),
        );
        assert_eq!(outer.to_string(), "if a (if b c) else d");
    }

    #[test]
    fn test_kind() {
        assert_eq!(Expression::default().kind(), ExprKind::Block);
        let lp = Expression::while_loop(Expression::real(1.0), Expression::default());
        assert_eq!(lp.kind(), ExprKind::While);
    }

    #[test]
    fn test_items() {
        let block = Expression::block(vec![Expression::real(1.0), Expression::real(2.0)]);
        assert_eq!(block.items().len(), 2);
        assert_eq!(Expression::identifier("x").items(), &[Expression::identifier("x")]);
    }

    #[test]
    fn test_detach_children_leaves_leaves() {
        let mut expr = Expression::if_else(
            Expression::identifier("a"),
            Expression::real(1.0),
            Some(Expression::not(Expression::identifier("b"))),
        );
        let mut out = Vec::new();
        expr.detach_children(&mut out);

        assert_eq!(out.len(), 3);
        assert_eq!(out[2], Expression::not(Expression::identifier("b")));
        assert_eq!(expr.to_string(), "if { } { }");
    }
}
