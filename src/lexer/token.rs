//! Token definitions and the token-kind code space

use std::fmt;

use crate::ast::Span;

/// First code used by named (multi-character and reserved) tokens.
/// Codes below it are single characters, encoded as their byte value.
pub const FIRST_NAMED: u32 = 257;

/// Display spellings of the named tokens, in code order
const NAMED_TOKENS: [&str; 21] = [
    "&&",
    "||",
    "^",
    "!",
    "++",
    "..",
    "=>",
    "<=",
    ">=",
    "/=",
    "<-",
    "fn",
    "if",
    "else",
    "while",
    "identifier",
    "number",
    "string",
    "literal string",
    "end of stream",
    "error",
];

/// One past the last named token code
pub const LAST_NAMED: u32 = FIRST_NAMED + NAMED_TOKENS.len() as u32;

/// Tokens of the Quill language
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Single characters
    Plus,
    Minus,
    Star,
    Slash,
    Greater,
    Less,
    Equals,
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,
    Colon,
    Dot,
    Comma,
    Hash,

    // Operators
    And,
    Or,
    Xor,
    Not,
    Increment,
    Concat,
    Arrow,
    LessEqual,
    GreaterEqual,
    NotEqual,
    Assign,

    // Reserved words
    Fn,
    If,
    Else,
    While,

    // Payload carrying tokens
    Identifier(String),
    Number(f64),
    String(String),
    LiteralString(String),

    // Markers
    EndOfStream,
    Error,
}

impl Token {
    /// Numeric kind code: the byte value for single characters,
    /// `FIRST_NAMED..LAST_NAMED` for everything else.
    pub fn code(&self) -> u32 {
        let index = match self {
            Token::Plus => return u32::from(b'+'),
            Token::Minus => return u32::from(b'-'),
            Token::Star => return u32::from(b'*'),
            Token::Slash => return u32::from(b'/'),
            Token::Greater => return u32::from(b'>'),
            Token::Less => return u32::from(b'<'),
            Token::Equals => return u32::from(b'='),
            Token::LeftParen => return u32::from(b'('),
            Token::RightParen => return u32::from(b')'),
            Token::LeftBracket => return u32::from(b'['),
            Token::RightBracket => return u32::from(b']'),
            Token::LeftBrace => return u32::from(b'{'),
            Token::RightBrace => return u32::from(b'}'),
            Token::Colon => return u32::from(b':'),
            Token::Dot => return u32::from(b'.'),
            Token::Comma => return u32::from(b','),
            Token::Hash => return u32::from(b'#'),
            Token::And => 0,
            Token::Or => 1,
            Token::Xor => 2,
            Token::Not => 3,
            Token::Increment => 4,
            Token::Concat => 5,
            Token::Arrow => 6,
            Token::LessEqual => 7,
            Token::GreaterEqual => 8,
            Token::NotEqual => 9,
            Token::Assign => 10,
            Token::Fn => 11,
            Token::If => 12,
            Token::Else => 13,
            Token::While => 14,
            Token::Identifier(_) => 15,
            Token::Number(_) => 16,
            Token::String(_) => 17,
            Token::LiteralString(_) => 18,
            Token::EndOfStream => 19,
            Token::Error => 20,
        };
        FIRST_NAMED + index
    }

    /// Single character token for `byte`, if it belongs to the punctuation set
    pub fn from_single(byte: u8) -> Option<Token> {
        let token = match byte {
            b'+' => Token::Plus,
            b'-' => Token::Minus,
            b'*' => Token::Star,
            b'/' => Token::Slash,
            b'>' => Token::Greater,
            b'<' => Token::Less,
            b'=' => Token::Equals,
            b'(' => Token::LeftParen,
            b')' => Token::RightParen,
            b'[' => Token::LeftBracket,
            b']' => Token::RightBracket,
            b'{' => Token::LeftBrace,
            b'}' => Token::RightBrace,
            b':' => Token::Colon,
            b'.' => Token::Dot,
            b',' => Token::Comma,
            b'#' => Token::Hash,
            _ => return None,
        };
        Some(token)
    }

    /// Kind name as shown in diagnostics (`+`, `fn`, `identifier`, ...)
    pub fn kind_name(&self) -> String {
        token_to_string(self.code())
    }

    pub fn is_end(&self) -> bool {
        matches!(self, Token::EndOfStream)
    }
}

/// Reserved word lookup for an identifier-shaped run
pub fn lookup_reserved(word: &str) -> Option<Token> {
    match word {
        "fn" => Some(Token::Fn),
        "if" => Some(Token::If),
        "else" => Some(Token::Else),
        "while" => Some(Token::While),
        _ => None,
    }
}

/// Display string for a token kind code. Never fails: codes outside the
/// known ranges render as `unknown token`.
pub fn token_to_string(code: u32) -> String {
    if code < FIRST_NAMED {
        return char::from_u32(code)
            .map(String::from)
            .unwrap_or_else(|| "unknown token".to_string());
    }

    if code < LAST_NAMED {
        return NAMED_TOKENS[(code - FIRST_NAMED) as usize].to_string();
    }

    "unknown token".to_string()
}

/// Escape a string so it lexes back as the same standard string literal
pub fn escape_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '\u{8}' => out.push_str("\\b"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Identifier(name) => write!(f, "{}", name),
            Token::Number(value) => write!(f, "{}", value),
            Token::String(value) => write!(f, "{}", escape_string(value)),
            Token::LiteralString(value) => write!(f, "\"\"\"{}\"\"\"", value),
            Token::EndOfStream => write!(f, "<eos>"),
            Token::Error => write!(f, "<error>"),
            other => write!(f, "{}", other.kind_name()),
        }
    }
}

/// Token with its source location
#[derive(Debug, Clone, PartialEq)]
pub struct TokenWithPosition {
    pub token: Token,
    pub span: Span,
    pub line: u32,
}

impl TokenWithPosition {
    pub fn new(token: Token, span: Span, line: u32) -> Self {
        Self { token, span, line }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_char_codes() {
        assert_eq!(Token::Plus.code(), u32::from(b'+'));
        assert_eq!(Token::Hash.code(), u32::from(b'#'));
        assert_eq!(token_to_string(u32::from(b'(')), "(");
    }

    #[test]
    fn test_named_codes_are_contiguous() {
        assert_eq!(Token::And.code(), FIRST_NAMED);
        assert_eq!(Token::Error.code(), LAST_NAMED - 1);
        assert_eq!(Token::Assign.kind_name(), "<-");
        assert_eq!(Token::Identifier("x".into()).kind_name(), "identifier");
        assert_eq!(Token::EndOfStream.kind_name(), "end of stream");
    }

    #[test]
    fn test_out_of_range_code() {
        assert_eq!(token_to_string(LAST_NAMED), "unknown token");
        assert_eq!(token_to_string(u32::MAX), "unknown token");
    }

    #[test]
    fn test_from_single_round_trips_code() {
        for byte in b"+-*/><=()[]{}:.,#" {
            let token = Token::from_single(*byte).unwrap();
            assert_eq!(token.code(), u32::from(*byte));
        }
        assert_eq!(Token::from_single(b'@'), None);
    }

    #[test]
    fn test_reserved_lookup() {
        assert_eq!(lookup_reserved("while"), Some(Token::While));
        assert_eq!(lookup_reserved("fnord"), None);
    }

    #[test]
    fn test_escape_string() {
        assert_eq!(escape_string("a\"b\\\n"), r#""a\"b\\\n""#);
    }
}
