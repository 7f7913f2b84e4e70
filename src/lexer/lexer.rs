//! The lexer state machine

use crate::ast::Span;
use crate::error::{LexerError, LexerErrorKind};

use super::buffer::StagingBuffer;
use super::reader::{Pull, Reader, StringSource};
use super::token::{lookup_reserved, Token, TokenWithPosition};

fn is_ident_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_'
}

fn is_ident_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_'
}

fn is_newline(c: Option<u8>) -> bool {
    matches!(c, Some(b'\n') | Some(b'\r'))
}

fn describe(c: Option<u8>) -> String {
    match c {
        Some(c) if c.is_ascii() => (c as char).to_string(),
        Some(c) => format!("\\x{:02x}", c),
        None => String::new(),
    }
}

/// Quill lexer.
///
/// Pulls bytes from a [`Reader`] and produces one token per call, with a
/// single token of lookahead.
pub struct Lexer<S> {
    reader: Reader<S>,
    current: Option<u8>,
    /// byte offset of `current`
    pos: usize,
    line: u32,
    buffer: StagingBuffer,
    lookahead: Option<TokenWithPosition>,
    token_start: usize,
    token_line: u32,
    errors: Vec<LexerError>,
}

impl Lexer<StringSource> {
    /// Lexer over an in-memory string
    pub fn from_string(source: impl Into<String>) -> Self {
        Self::new(Reader::from_string(source))
    }
}

impl<S: Pull> Lexer<S> {
    pub fn new(mut reader: Reader<S>) -> Self {
        let current = reader.get_char();
        Self {
            reader,
            current,
            pos: 0,
            line: 1,
            buffer: StagingBuffer::new(),
            lookahead: None,
            token_start: 0,
            token_line: 1,
            errors: Vec::new(),
        }
    }

    /// Consume and return the next token. A pending lookahead token is
    /// returned first, without scanning.
    pub fn next_token(&mut self) -> TokenWithPosition {
        match self.lookahead.take() {
            Some(token) => token,
            None => self.produce(),
        }
    }

    /// Peek at the token after the current one. Repeated calls return the
    /// same token until `next_token` consumes it.
    pub fn lookahead(&mut self) -> &TokenWithPosition {
        let token = match self.lookahead.take() {
            Some(token) => token,
            None => self.produce(),
        };
        self.lookahead.insert(token)
    }

    /// Current line number (1-based)
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Lexical errors reported so far and not yet taken
    pub fn errors(&self) -> &[LexerError] {
        &self.errors
    }

    pub fn take_errors(&mut self) -> Vec<LexerError> {
        std::mem::take(&mut self.errors)
    }

    /// Collect every token up to, not including, the end of stream
    pub fn collect_tokens(self) -> Vec<TokenWithPosition> {
        self.collect()
    }

    fn produce(&mut self) -> TokenWithPosition {
        let token = match self.scan() {
            Ok(token) => token,
            Err(error) => {
                self.errors.push(error);
                Token::Error
            }
        };

        let token =
            TokenWithPosition::new(token, Span::new(self.token_start, self.pos), self.token_line);
        log::trace!("token {:?} on line {}", token.token, token.line);
        token
    }

    fn advance(&mut self) -> Option<u8> {
        if self.current.is_some() {
            self.pos += 1;
        }
        self.current = self.reader.get_char();
        self.current
    }

    fn save(&mut self, c: u8) {
        self.buffer.push(c);
    }

    fn save_and_next(&mut self) {
        if let Some(c) = self.current {
            self.save(c);
        }
        self.advance();
    }

    /// `\n`, `\r`, `\r\n` and `\n\r` each count as one line
    fn inc_line(&mut self) {
        let first = self.current;
        self.advance();
        if is_newline(self.current) && self.current != first {
            self.advance();
        }
        self.line += 1;
    }

    /// Build an error for the token being scanned without moving
    fn report(&self, kind: LexerErrorKind) -> LexerError {
        let end = match self.current {
            Some(_) => self.pos + 1,
            None => self.pos,
        };
        let error = LexerError {
            kind,
            line: self.line,
            span: Span::new(self.token_start, end.max(self.token_start)),
            context: self.buffer.to_text(),
        };
        log::debug!(
            "lexical error on line {} at '{}': {}",
            error.line,
            error.context,
            error.kind
        );
        error
    }

    /// Report an error and step past the offending character
    fn error(&mut self, kind: LexerErrorKind) -> LexerError {
        let error = self.report(kind);
        if is_newline(self.current) {
            self.inc_line();
        } else {
            self.advance();
        }
        error
    }

    fn scan(&mut self) -> Result<Token, LexerError> {
        self.buffer.reset();

        loop {
            self.token_start = self.pos;
            self.token_line = self.line;

            let Some(c) = self.current else {
                return Ok(Token::EndOfStream);
            };

            match c {
                b'\n' | b'\r' => self.inc_line(),

                b' ' | b'\t' => {
                    self.advance();
                }

                b'!' => {
                    self.advance();
                    return Ok(Token::Not);
                }

                b'&' => return self.doubled(b'&', Token::And),
                b'|' => return self.doubled(b'|', Token::Or),

                b'^' => {
                    self.advance();
                    return Ok(Token::Xor);
                }

                b'-' => {
                    if self.advance() != Some(b'-') {
                        return Ok(Token::Minus);
                    }
                    self.skip_comment();
                }

                b'+' => return Ok(self.either(b'+', Token::Increment, Token::Plus)),
                b'.' => return Ok(self.either(b'.', Token::Concat, Token::Dot)),
                b'=' => return Ok(self.either(b'>', Token::Arrow, Token::Equals)),
                b'>' => return Ok(self.either(b'=', Token::GreaterEqual, Token::Greater)),
                b'/' => return Ok(self.either(b'=', Token::NotEqual, Token::Slash)),

                b'<' => {
                    let token = match self.advance() {
                        Some(b'=') => Token::LessEqual,
                        Some(b'-') => Token::Assign,
                        _ => return Ok(Token::Less),
                    };
                    self.advance();
                    return Ok(token);
                }

                b'"' => return self.read_quoted(),

                c if c.is_ascii_digit() => return self.read_numeric(),

                c if is_ident_start(c) => return Ok(self.read_id_or_reserved()),

                c => {
                    return match Token::from_single(c) {
                        Some(token) => {
                            self.advance();
                            Ok(token)
                        }
                        None => Err(self.error(LexerErrorKind::UnrecognizedSymbol {
                            symbol: describe(Some(c)),
                        })),
                    };
                }
            }
        }
    }

    /// Two-character operator whose second character must repeat the first
    fn doubled(&mut self, c: u8, token: Token) -> Result<Token, LexerError> {
        if self.advance() != Some(c) {
            let symbol = format!("{}{}", c as char, describe(self.current));
            return Err(self.error(LexerErrorKind::MalformedOperator { symbol }));
        }
        self.advance();
        Ok(token)
    }

    /// `long` if the next character is `second`, otherwise `short`
    fn either(&mut self, second: u8, long: Token, short: Token) -> Token {
        if self.advance() != Some(second) {
            return short;
        }
        self.advance();
        long
    }

    /// Skip a `--` comment up to, not including, the end of line
    fn skip_comment(&mut self) {
        loop {
            let c = self.advance();
            if c.is_none() || is_newline(c) {
                break;
            }
        }
    }

    fn read_quoted(&mut self) -> Result<Token, LexerError> {
        if self.advance() != Some(b'"') {
            return self.read_string();
        }

        if self.advance() == Some(b'"') {
            return self.read_literal_string();
        }

        Ok(Token::String(String::new()))
    }

    fn read_string(&mut self) -> Result<Token, LexerError> {
        loop {
            match self.current {
                None => return Err(self.error(LexerErrorKind::UnterminatedString)),
                Some(b'\n') | Some(b'\r') => {
                    return Err(self.error(LexerErrorKind::NewlineInString))
                }
                Some(b'\\') => {
                    let escaped = match self.advance() {
                        Some(b'b') => 0x08,
                        Some(b't') => b'\t',
                        Some(b'n') => b'\n',
                        Some(b'r') => b'\r',
                        Some(b'\\') => b'\\',
                        Some(b'"') => b'"',
                        None => return Err(self.error(LexerErrorKind::UnterminatedString)),
                        other => {
                            let sequence = format!("\\{}", describe(other));
                            return Err(self.error(LexerErrorKind::InvalidEscape { sequence }));
                        }
                    };
                    self.save(escaped);
                    self.advance();
                }
                Some(b'"') => break,
                Some(_) => self.save_and_next(),
            }
        }

        let value = self.buffer.to_text();
        // closing quote
        self.advance();
        Ok(Token::String(value))
    }

    /// Triple-quoted string; `current` is the third opening quote
    fn read_literal_string(&mut self) -> Result<Token, LexerError> {
        self.advance();

        loop {
            match self.current {
                None => return Err(self.error(LexerErrorKind::UnterminatedString)),
                Some(b'"') => {
                    if self.advance() == Some(b'"') {
                        if self.advance() == Some(b'"') {
                            break;
                        }
                        self.save(b'"');
                    }
                    self.save(b'"');
                }
                // kept verbatim, counted like any other line break
                Some(c) if is_newline(Some(c)) => {
                    self.save_and_next();
                    if is_newline(self.current) && self.current != Some(c) {
                        self.save_and_next();
                    }
                    self.line += 1;
                }
                Some(_) => self.save_and_next(),
            }
        }

        let value = self.buffer.to_text();
        self.advance();
        Ok(Token::LiteralString(value))
    }

    fn read_numeric(&mut self) -> Result<Token, LexerError> {
        let mut seen_dot = false;

        loop {
            match self.current {
                Some(b'.') => {
                    if seen_dot {
                        break;
                    }
                    seen_dot = true;
                }
                Some(c) if c.is_ascii_digit() => {}
                Some(c) if is_ident_start(c) => {
                    while matches!(self.current, Some(c) if is_ident_char(c)) {
                        self.save_and_next();
                    }
                    return Err(self.error(LexerErrorKind::InvalidNumber));
                }
                _ => break,
            }
            self.save_and_next();
        }

        self.buffer
            .as_str()
            .parse::<f64>()
            .map(Token::Number)
            .map_err(|_| self.report(LexerErrorKind::InvalidNumber))
    }

    fn read_id_or_reserved(&mut self) -> Token {
        while matches!(self.current, Some(c) if is_ident_char(c)) {
            self.save_and_next();
        }

        let word = self.buffer.as_str();
        lookup_reserved(&word).unwrap_or_else(|| Token::Identifier(word.into_owned()))
    }
}

impl<S: Pull> Iterator for Lexer<S> {
    type Item = TokenWithPosition;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        if token.token.is_end() {
            None
        } else {
            Some(token)
        }
    }
}
