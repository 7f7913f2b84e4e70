//! Quill Language Front End Library
//!
//! This library provides the reader, lexer, AST and parser for the Quill
//! scripting language, plus a small pipeline that turns collected errors into
//! diagnostics.

pub mod ast;
pub mod error;
pub mod frontend;
pub mod lexer;
pub mod parser;
pub mod runtime;

// Re-export commonly used types
pub use ast::{Expression, FnNode, Span};
pub use error::{ErrorCollector, QuillError, QuillResult};
pub use frontend::{FrontendPipeline, SourceState};
pub use lexer::{Lexer, Reader, Token, TokenWithPosition};
pub use parser::{ParseError, ParseResult, Parser, MAX_ERRORS};
pub use runtime::Scope;
