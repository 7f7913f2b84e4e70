//! Unified error handling.
//!
//! This module provides the error types shared by the whole front end and
//! the diagnostic reporting built on top of them.

use crate::ast::Span;
use codespan_reporting::diagnostic::{Diagnostic, Label};
use thiserror::Error;

/// Umbrella error type for the Quill front end
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuillError {
    #[error("lexical error: {0}")]
    Lexer(#[from] LexerError),

    #[error("syntax error: {0}")]
    Parser(#[from] ParserError),

    #[error("runtime error: {0}")]
    Runtime(#[from] RuntimeError),

    #[error("file operation failed: {0}")]
    Io(String),

    #[error("{0}")]
    Other(String),
}

/// What went wrong while scanning a token
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LexerErrorKind {
    #[error("unrecognized symbol {symbol}")]
    UnrecognizedSymbol { symbol: String },

    #[error("unrecognized symbol: '{symbol}'")]
    MalformedOperator { symbol: String },

    #[error("unexpected eof in string")]
    UnterminatedString,

    #[error("unexpected new line in string")]
    NewlineInString,

    #[error("unrecognized escape sequence in string: {sequence}")]
    InvalidEscape { sequence: String },

    #[error("badly formatted number")]
    InvalidNumber,
}

/// A lexical error, located by line and byte span.
///
/// `context` holds whatever the lexer had staged for the token when it gave up.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{kind}")]
pub struct LexerError {
    pub kind: LexerErrorKind,
    pub line: u32,
    pub span: Span,
    pub context: String,
}

/// Syntax errors raised by the parser
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParserError {
    #[error("expected {expected}, found {found}")]
    UnexpectedToken {
        expected: String,
        found: String,
        line: u32,
        span: Span,
    },

    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEof {
        expected: String,
        line: u32,
        span: Span,
    },

    #[error("{message}")]
    SyntaxError {
        message: String,
        line: u32,
        span: Span,
    },

    #[error("too many errors ({count}), parsing abandoned")]
    TooManyErrors { count: usize },
}

impl ParserError {
    pub fn line(&self) -> Option<u32> {
        match self {
            ParserError::UnexpectedToken { line, .. }
            | ParserError::UnexpectedEof { line, .. }
            | ParserError::SyntaxError { line, .. } => Some(*line),
            ParserError::TooManyErrors { .. } => None,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            ParserError::UnexpectedToken { span, .. }
            | ParserError::UnexpectedEof { span, .. }
            | ParserError::SyntaxError { span, .. } => Some(*span),
            ParserError::TooManyErrors { .. } => None,
        }
    }
}

/// Errors from the evaluator extension points
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    #[error("not yet defined: {feature}")]
    Unimplemented { feature: String },
}

impl QuillError {
    pub fn line(&self) -> Option<u32> {
        match self {
            QuillError::Lexer(e) => Some(e.line),
            QuillError::Parser(e) => e.line(),
            _ => None,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            QuillError::Lexer(e) => Some(e.span),
            QuillError::Parser(e) => e.span(),
            _ => None,
        }
    }
}

impl From<std::io::Error> for QuillError {
    fn from(e: std::io::Error) -> Self {
        QuillError::Io(e.to_string())
    }
}

/// An error bound to a file of the diagnostic database
#[derive(Debug, Clone)]
pub struct DiagnosticError {
    pub error: QuillError,
    pub file_id: usize,
}

impl DiagnosticError {
    pub fn new(error: QuillError, file_id: usize) -> Self {
        Self { error, file_id }
    }

    /// Convert to a codespan-reporting diagnostic
    pub fn to_diagnostic(&self) -> Diagnostic<usize> {
        let (message, label) = match &self.error {
            QuillError::Lexer(e) => {
                let mut label = Label::primary(self.file_id, e.span.start..e.span.end);
                if !e.context.is_empty() {
                    label = label.with_message(format!("while reading '{}'", e.context));
                }
                (format!("lexical error: {}", e.kind), Some(label))
            }
            QuillError::Parser(e) => (
                format!("syntax error: {}", e),
                e.span()
                    .map(|span| Label::primary(self.file_id, span.start..span.end)),
            ),
            other => (other.to_string(), None),
        };

        let mut diagnostic = Diagnostic::error()
            .with_message(message)
            .with_labels(label.into_iter().collect());
        if let Some(line) = self.error.line() {
            diagnostic = diagnostic.with_notes(vec![format!("on line {}", line)]);
        }
        diagnostic
    }
}

/// Collects errors for one source file
#[derive(Debug, Default)]
pub struct ErrorCollector {
    errors: Vec<DiagnosticError>,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, error: QuillError, file_id: usize) {
        self.errors.push(DiagnosticError::new(error, file_id));
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[DiagnosticError] {
        &self.errors
    }
}

/// Result alias
pub type QuillResult<T> = Result<T, QuillError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexer_error_message() {
        let error = LexerError {
            kind: LexerErrorKind::InvalidNumber,
            line: 3,
            span: Span::new(4, 8),
            context: "12ab".to_string(),
        };
        assert_eq!(error.to_string(), "badly formatted number");

        let wrapped = QuillError::from(error);
        assert_eq!(wrapped.line(), Some(3));
        assert_eq!(wrapped.span(), Some(Span::new(4, 8)));
    }

    #[test]
    fn test_diagnostic_carries_line_note() {
        let error = QuillError::Parser(ParserError::SyntaxError {
            message: "unexpected ')'".to_string(),
            line: 7,
            span: Span::new(10, 11),
        });
        let diagnostic = DiagnosticError::new(error, 0).to_diagnostic();

        assert_eq!(diagnostic.message, "syntax error: unexpected ')'");
        assert_eq!(diagnostic.notes, vec!["on line 7".to_string()]);
        assert_eq!(diagnostic.labels.len(), 1);
    }

    #[test]
    fn test_too_many_errors_has_no_location() {
        let error = ParserError::TooManyErrors { count: 20 };
        assert_eq!(error.line(), None);
        assert!(DiagnosticError::new(error.into(), 0)
            .to_diagnostic()
            .labels
            .is_empty());
    }

    #[test]
    fn test_collector() {
        let mut collector = ErrorCollector::new();
        assert!(!collector.has_errors());

        collector.add_error(QuillError::Other("boom".to_string()), 0);
        assert_eq!(collector.error_count(), 1);
        assert_eq!(
            collector.errors().first().map(|e| e.error.to_string()),
            Some("boom".to_string())
        );
    }
}
