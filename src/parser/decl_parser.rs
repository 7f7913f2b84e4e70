//! Function definition parsing

use crate::ast::*;
use crate::lexer::{Pull, Token};

use super::{ParseResult, Parser};

impl<S: Pull> Parser<S> {
    /// `fn name? ( arg* ) body` where `arg := IDENT (':' type)?`
    pub(super) fn parse_function(&mut self) -> ParseResult<Expression> {
        self.expect(&Token::Fn)?;

        let mut func = FnNode::new();
        if let Token::Identifier(name) = &self.current.token {
            func.name = Some(name.clone());
            self.advance()?;
        }

        self.expect(&Token::LeftParen)?;
        while !self.check(&Token::RightParen) {
            let name = self.expect_identifier()?;
            let ty = if self.match_token(&Token::Colon)? {
                Some(self.parse_type_tag()?)
            } else {
                None
            };
            func.add_argument(&name, ty);

            // commas between arguments are optional
            self.match_token(&Token::Comma)?;
        }
        self.expect(&Token::RightParen)?;

        let body = self.parse_expression_internal()?;
        func.set_body(body);

        Ok(Expression::Function(func))
    }

    fn parse_type_tag(&mut self) -> ParseResult<ExprKind> {
        match &self.current.token {
            Token::Identifier(name) => match ExprKind::from_name(name) {
                Some(kind) => {
                    self.advance()?;
                    Ok(kind)
                }
                None => Err(self.error(format!("unknown type '{}'", name))),
            },
            _ => Err(self.unexpected("a type name")),
        }
    }
}
