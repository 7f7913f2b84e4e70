//! Parser module.
//!
//! This module turns the lexer's token stream into an AST by recursive
//! descent. The parser pulls tokens on demand and uses one token of
//! lookahead to tell assignments (`name <- value`) from other expressions.
//!
//! ## Error budget
//!
//! A syntax error does not stop the parse. It is recorded, the offending
//! token is skipped and parsing resumes with the next expression. Lexical
//! errors reported by the lexer count against the same budget. Once
//! [`MAX_ERRORS`] errors have been recorded the parse is abandoned and
//! [`ParserError::TooManyErrors`] is returned.
//!
//! Nesting is bounded by [`MAX_DEPTH`]; a deeper expression is a syntax
//! error like any other.

mod decl_parser;
mod expr_parser;
mod parser_impl;

// Public API
pub use parser_impl::Parser;

use crate::error::ParserError;

/// Number of recorded errors after which a parse is abandoned
pub const MAX_ERRORS: usize = 20;

/// Deepest nesting of expressions the parser descends into
pub const MAX_DEPTH: usize = 128;

pub type ParseError = ParserError;
pub type ParseResult<T> = Result<T, ParseError>;
