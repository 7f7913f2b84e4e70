//! Expression parsing

use crate::ast::*;
use crate::lexer::{Pull, Token};

use super::{ParseResult, Parser};

/// Lowest binary operator precedence
const MIN_PRECEDENCE: u8 = 1;

impl<S: Pull> Parser<S> {
    /// One block item; a trailing comma is a separator
    pub(super) fn parse_item(&mut self) -> ParseResult<Expression> {
        let expr = self.parse_expression_internal()?;
        self.match_token(&Token::Comma)?;
        Ok(expr)
    }

    pub(super) fn parse_expression_internal(&mut self) -> ParseResult<Expression> {
        self.descend()?;
        let result = self.parse_assignment();
        self.ascend();
        result
    }

    fn parse_assignment(&mut self) -> ParseResult<Expression> {
        // `name <- value` needs the token after the identifier to be told
        // apart from a plain identifier
        if matches!(self.current.token, Token::Identifier(_))
            && matches!(self.peek(), Token::Assign)
        {
            let target = self.expect_identifier()?;
            self.expect(&Token::Assign)?;
            let value = self.parse_expression_internal()?;
            return Ok(Expression::assign(target, value));
        }

        self.parse_binary(MIN_PRECEDENCE)
    }

    /// Precedence climbing over the binary operators, all left associative
    fn parse_binary(&mut self, min_precedence: u8) -> ParseResult<Expression> {
        let mut left = self.parse_unary()?;

        while let Some(op) = BinaryOp::from_token(&self.current.token) {
            let precedence = op.precedence();
            if precedence < min_precedence {
                break;
            }

            self.advance()?;
            let right = self.parse_binary(precedence + 1)?;
            left = Expression::binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> ParseResult<Expression> {
        if self.match_token(&Token::Not)? {
            self.descend()?;
            let operand = self.parse_unary();
            self.ascend();
            return Ok(Expression::not(operand?));
        }

        self.parse_primary()
    }

    fn parse_primary(&mut self) -> ParseResult<Expression> {
        match &self.current.token {
            Token::Number(value) => {
                let value = *value;
                self.advance()?;
                Ok(Expression::Real(value))
            }
            Token::String(value) | Token::LiteralString(value) => {
                let value = value.clone();
                self.advance()?;
                Ok(Expression::String(value))
            }
            Token::Identifier(name) => {
                let name = name.clone();
                self.advance()?;
                Ok(Expression::Identifier(name))
            }
            Token::LeftParen => {
                self.advance()?;
                let expr = self.parse_expression_internal()?;
                self.expect(&Token::RightParen)?;
                Ok(expr)
            }
            Token::LeftBrace => self.parse_block(),
            Token::Fn => self.parse_function(),
            Token::If => self.parse_if(),
            Token::While => self.parse_while(),
            _ => Err(self.unexpected("an expression")),
        }
    }

    /// `{ item* }`; errors inside are recovered without leaving the block
    pub(super) fn parse_block(&mut self) -> ParseResult<Expression> {
        self.expect(&Token::LeftBrace)?;

        let mut items = Vec::new();
        loop {
            match self.current.token {
                Token::RightBrace => {
                    self.advance()?;
                    break;
                }
                Token::EndOfStream => return Err(self.unexpected("'}'")),
                _ => match self.parse_item() {
                    Ok(item) => items.push(item),
                    Err(error) => self.recover(error, true)?,
                },
            }
        }

        Ok(Expression::Block(items))
    }

    fn parse_if(&mut self) -> ParseResult<Expression> {
        self.expect(&Token::If)?;
        let condition = self.parse_expression_internal()?;
        let then_branch = self.parse_expression_internal()?;

        let else_branch = if self.match_token(&Token::Else)? {
            Some(self.parse_expression_internal()?)
        } else {
            None
        };

        Ok(Expression::if_else(condition, then_branch, else_branch))
    }

    fn parse_while(&mut self) -> ParseResult<Expression> {
        self.expect(&Token::While)?;
        let condition = self.parse_expression_internal()?;
        let body = self.parse_expression_internal()?;
        Ok(Expression::while_loop(condition, body))
    }
}
