//! Front-end pipeline.
//!
//! Runs the lexer and the parser over one source file, collecting every
//! error on the way, and renders the collected errors as diagnostics.

use crate::ast::Expression;
use crate::error::{ErrorCollector, QuillError, QuillResult};
use crate::lexer::{Lexer, TokenWithPosition};
use crate::parser::Parser;
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream, WriteColor};
use std::fs;
use std::ops::Range;
use std::path::Path;

/// One source file and the errors found in it
pub struct SourceState {
    pub source_file: String,
    pub source: String,
    pub files: SimpleFiles<String, String>,
    pub file_id: usize,
    pub error_collector: ErrorCollector,
}

impl SourceState {
    pub fn new<P: AsRef<Path>>(source_file: P) -> QuillResult<Self> {
        let name = source_file.as_ref().display().to_string();
        let source = fs::read_to_string(source_file.as_ref())
            .map_err(|e| QuillError::Io(format!("failed to read {}: {}", name, e)))?;
        Ok(Self::new_from_string(&name, source))
    }

    pub fn new_from_string(filename: &str, source: String) -> Self {
        let mut files = SimpleFiles::new();
        let file_id = files.add(filename.to_string(), source.clone());

        Self {
            source_file: filename.to_string(),
            source,
            files,
            file_id,
            error_collector: ErrorCollector::new(),
        }
    }

    pub fn add_error(&mut self, error: QuillError) {
        self.error_collector.add_error(error, self.file_id);
    }

    pub fn has_errors(&self) -> bool {
        self.error_collector.has_errors()
    }

    pub fn error_count(&self) -> usize {
        self.error_collector.error_count()
    }

    /// Write every collected error to `writer`
    pub fn emit_diagnostics(&self, writer: &mut dyn WriteColor) -> QuillResult<()> {
        let config = codespan_reporting::term::Config::default();
        for error in self.error_collector.errors() {
            let mut diagnostic = error.to_diagnostic();
            for label in &mut diagnostic.labels {
                label.range = self.char_range(label.range.clone());
            }
            codespan_reporting::term::emit(writer, &config, &self.files, &diagnostic)
                .map_err(|e| QuillError::Io(format!("failed to emit diagnostic: {}", e)))?;
        }
        Ok(())
    }

    /// Widen a byte range to char boundaries inside the source
    fn char_range(&self, range: Range<usize>) -> Range<usize> {
        let len = self.source.len();
        let mut start = range.start.min(len);
        let mut end = range.end.clamp(start, len);
        while !self.source.is_char_boundary(start) {
            start -= 1;
        }
        while !self.source.is_char_boundary(end) {
            end += 1;
        }
        start..end
    }
}

/// Lexing and parsing stages over a [`SourceState`]
pub struct FrontendPipeline {
    state: SourceState,
}

impl FrontendPipeline {
    pub fn new(state: SourceState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &SourceState {
        &self.state
    }

    /// Lex the whole source, recording lexical errors
    pub fn tokenize(&mut self) -> Vec<TokenWithPosition> {
        log::debug!("starting lexical analysis of {}", self.state.source_file);

        let mut lexer = Lexer::from_string(self.state.source.as_str());
        let tokens: Vec<_> = lexer.by_ref().collect();
        for error in lexer.take_errors() {
            self.state.add_error(error.into());
        }

        tokens
    }

    /// Parse the source. `None` when any error was found.
    pub fn parse(&mut self) -> Option<Expression> {
        log::debug!("starting parsing of {}", self.state.source_file);

        let mut parser = Parser::from_string(self.state.source.as_str());
        let result = parser.parse();
        for error in parser.take_errors() {
            self.state.add_error(error);
        }

        match result {
            Ok(program) if !self.state.has_errors() => Some(program),
            Ok(_) => None,
            // the ceiling is not a diagnostic of its own
            Err(e) => {
                log::debug!("{}", e);
                None
            }
        }
    }

    /// Print collected diagnostics to stderr
    pub fn report_errors(&self) -> QuillResult<()> {
        let writer = StandardStream::stderr(ColorChoice::Auto);
        self.state.emit_diagnostics(&mut writer.lock())?;

        if self.state.has_errors() {
            eprintln!("\n{} error(s) found", self.state.error_count());
        }
        Ok(())
    }
}
