//! Parser state, token utilities and the error budget

use crate::ast::{Expression, Span};
use crate::error::{ParserError, QuillError};
use crate::lexer::{Lexer, Pull, StringSource, Token, TokenWithPosition};

use super::{ParseError, ParseResult, MAX_DEPTH, MAX_ERRORS};

/// Quill parser.
///
/// Drives a [`Lexer`] token by token. Syntax and lexical errors are recorded
/// and parsing continues with the next item until `MAX_ERRORS` have been
/// recorded, at which point the parse is abandoned.
pub struct Parser<S> {
    pub(super) lexer: Lexer<S>,
    pub(super) current: TokenWithPosition,
    errors: Vec<QuillError>,
    started: bool,
    depth: usize,
}

impl Parser<StringSource> {
    pub fn from_string(source: impl Into<String>) -> Self {
        Self::new(Lexer::from_string(source))
    }
}

impl<S: Pull> Parser<S> {
    pub fn new(lexer: Lexer<S>) -> Self {
        Self {
            lexer,
            current: TokenWithPosition::new(Token::EndOfStream, Span::dummy(), 1),
            errors: Vec::new(),
            started: false,
            depth: 0,
        }
    }

    /// Parse a whole program into one block.
    ///
    /// Recoverable errors do not fail the parse; they are available from
    /// [`errors`](Self::errors). Only reaching the error ceiling does.
    pub fn parse(&mut self) -> ParseResult<Expression> {
        self.start()?;

        let mut items = Vec::new();
        while !self.current.token.is_end() {
            match self.parse_item() {
                Ok(item) => items.push(item),
                Err(error) => self.recover(error, false)?,
            }
        }

        log::debug!(
            "parsed {} top-level expressions with {} errors",
            items.len(),
            self.error_count()
        );
        Ok(Expression::Block(items))
    }

    /// Parse a single expression (REPL use)
    pub fn parse_expression(&mut self) -> ParseResult<Expression> {
        self.start()?;
        self.parse_expression_internal()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// True once the error ceiling has been reached
    pub fn is_aborted(&self) -> bool {
        self.errors.len() >= MAX_ERRORS
    }

    pub fn errors(&self) -> &[QuillError] {
        &self.errors
    }

    pub fn take_errors(&mut self) -> Vec<QuillError> {
        std::mem::take(&mut self.errors)
    }

    /// Line of the token under examination
    pub fn line(&self) -> u32 {
        self.current.line
    }

    /// Record a syntax error at the current token.
    ///
    /// Fails with [`ParserError::TooManyErrors`] when this error reaches the ceiling.
    pub fn syntax_error(&mut self, message: impl Into<String>) -> ParseResult<()> {
        let error = self.error(message);
        self.record_error(error.into())
    }

    fn start(&mut self) -> ParseResult<()> {
        if self.is_aborted() {
            return Err(ParserError::TooManyErrors {
                count: self.error_count(),
            });
        }

        if !self.started {
            self.started = true;
            self.current = self.lexer.next_token();
            self.settle()?;
        }
        Ok(())
    }

    fn record_error(&mut self, error: QuillError) -> ParseResult<()> {
        log::debug!("error on line {:?}: {}", error.line(), error);
        self.errors.push(error);

        if self.is_aborted() {
            log::debug!("error limit of {} reached, abandoning parse", MAX_ERRORS);
            return Err(ParserError::TooManyErrors {
                count: self.error_count(),
            });
        }
        Ok(())
    }

    /// Record `error` and step over the offending token so the caller can
    /// continue with the next item. Closing braces inside a block and the end
    /// of stream are left for the enclosing loop.
    pub(super) fn recover(&mut self, error: ParseError, in_block: bool) -> ParseResult<()> {
        if let ParserError::TooManyErrors { .. } = error {
            return Err(error);
        }
        self.record_error(error.into())?;

        match self.current.token {
            Token::EndOfStream => Ok(()),
            Token::RightBrace if in_block => Ok(()),
            _ => self.advance(),
        }
    }

    /// Absorb error tokens, counting each lexical error against the budget
    fn settle(&mut self) -> ParseResult<()> {
        while matches!(self.current.token, Token::Error) {
            for error in self.lexer.take_errors() {
                self.record_error(error.into())?;
            }
            self.current = self.lexer.next_token();
        }
        Ok(())
    }

    /// Enter one level of expression nesting. Every successful call is
    /// paired with [`ascend`](Self::ascend).
    pub(super) fn descend(&mut self) -> ParseResult<()> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error(format!(
                "expression nested deeper than {} levels",
                MAX_DEPTH
            )));
        }
        self.depth += 1;
        Ok(())
    }

    pub(super) fn ascend(&mut self) {
        self.depth -= 1;
    }

    // ==================== Token utilities ====================

    /// Move to the next token
    pub(super) fn advance(&mut self) -> ParseResult<()> {
        self.current = self.lexer.next_token();
        self.settle()
    }

    /// The token after the current one, without consuming anything
    pub(super) fn peek(&mut self) -> &Token {
        &self.lexer.lookahead().token
    }

    /// Check the kind of the current token (payloads are ignored)
    pub(super) fn check(&self, token_type: &Token) -> bool {
        std::mem::discriminant(&self.current.token) == std::mem::discriminant(token_type)
    }

    /// Advance if the current token matches
    pub(super) fn match_token(&mut self, token_type: &Token) -> ParseResult<bool> {
        if self.check(token_type) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub(super) fn expect(&mut self, token_type: &Token) -> ParseResult<()> {
        if self.check(token_type) {
            self.advance()
        } else {
            Err(self.unexpected(&format!("'{}'", token_type.kind_name())))
        }
    }

    pub(super) fn expect_identifier(&mut self) -> ParseResult<String> {
        match &self.current.token {
            Token::Identifier(name) => {
                let name = name.clone();
                self.advance()?;
                Ok(name)
            }
            _ => Err(self.unexpected("an identifier")),
        }
    }

    /// Syntax error at the current token
    pub(super) fn error(&self, message: impl Into<String>) -> ParseError {
        ParserError::SyntaxError {
            message: message.into(),
            line: self.current.line,
            span: self.current.span,
        }
    }

    /// Error for finding the current token where `expected` should be
    pub(super) fn unexpected(&self, expected: &str) -> ParseError {
        match &self.current.token {
            Token::EndOfStream => ParserError::UnexpectedEof {
                expected: expected.to_string(),
                line: self.current.line,
                span: self.current.span,
            },
            token => ParserError::UnexpectedToken {
                expected: expected.to_string(),
                found: describe_token(token),
                line: self.current.line,
                span: self.current.span,
            },
        }
    }
}

fn describe_token(token: &Token) -> String {
    match token {
        Token::Identifier(name) => format!("identifier '{}'", name),
        Token::Number(value) => format!("number {}", value),
        Token::String(_) | Token::LiteralString(_) => "string".to_string(),
        other => format!("'{}'", other.kind_name()),
    }
}
