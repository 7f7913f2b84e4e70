//! Lexical analysis module for the Quill language.
//!
//! Source bytes come from a pull-based [`Reader`]; the [`Lexer`] turns them
//! into [`Token`]s one call at a time. Scanning is hand written: comments,
//! escaped and triple-quoted strings, numbers, two-character operators and
//! reserved words are all recognised with one character of lookahead.
//!
//! A malformed token never stops the lexer. The failing scan yields
//! [`Token::Error`], the [`LexerError`](crate::error::LexerError) is kept for
//! the caller, and the next call resumes after the offending character.

mod buffer;
#[allow(clippy::module_inception)]
mod lexer;
mod reader;
mod token;

pub use buffer::StagingBuffer;
pub use lexer::Lexer;
pub use reader::{IoSource, Pull, Reader, StringSource, IO_CHUNK_SIZE};
pub use token::{
    escape_string, lookup_reserved, token_to_string, Token, TokenWithPosition, FIRST_NAMED,
    LAST_NAMED,
};

/// Tokenize a whole string, end of stream excluded
pub fn tokenize(input: &str) -> Vec<TokenWithPosition> {
    Lexer::from_string(input).collect_tokens()
}

/// Debug helper: render a token stream one token per line
pub fn format_tokens(tokens: &[TokenWithPosition]) -> String {
    tokens
        .iter()
        .map(|t| format!("{:>4}: {:<16} {}", t.line, t.token.kind_name(), t.token))
        .collect::<Vec<_>>()
        .join("\n")
}
