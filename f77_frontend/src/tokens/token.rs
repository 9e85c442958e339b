//! Classified tokens produced by the lexer
//!
//! A token records its category, canonical kind, the exact lexeme and where
//! it starts. Decoded literal values travel with the token so parsers and
//! reports never re-parse lexemes.
use crate::utils::{Position, Span};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lexical category of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Keyword,
    Ident,
    LitInt,
    LitReal,
    LitString,
    Operator,
    Punct,
    Label,
    Eof,
    Error,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Keyword,
        Category::Ident,
        Category::LitInt,
        Category::LitReal,
        Category::LitString,
        Category::Operator,
        Category::Punct,
        Category::Label,
        Category::Eof,
        Category::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Keyword => "KEYWORD",
            Category::Ident => "IDENT",
            Category::LitInt => "LIT_INT",
            Category::LitReal => "LIT_REAL",
            Category::LitString => "LIT_STRING",
            Category::Operator => "OPERATOR",
            Category::Punct => "PUNCT",
            Category::Label => "LABEL",
            Category::Eof => "EOF",
            Category::Error => "ERROR",
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            Category::LitInt | Category::LitReal | Category::LitString
        )
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical kinds that are not taken from the registry
pub mod kinds {
    pub const ID: &str = "ID";
    pub const INT: &str = "INT";
    pub const REAL: &str = "REAL";
    pub const STRING: &str = "STRING";
    pub const LABEL: &str = "LABEL";
    pub const EOF: &str = "EOF";
    pub const UNKNOWN_CHAR: &str = "UNKNOWN_CHAR";
    pub const INT_OUT_OF_RANGE: &str = "INT_OUT_OF_RANGE";
}

/// Decoded literal value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TokenValue {
    Int(i64),
    Real(f64),
    Str(String),
}

impl fmt::Display for TokenValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenValue::Int(i) => write!(f, "{}", i),
            TokenValue::Real(r) => write!(f, "{:?}", r),
            TokenValue::Str(s) => write!(f, "'{}'", s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub category: Category,
    pub kind: String,
    pub lexeme: String,
    pub span: Span,
    pub value: Option<TokenValue>,
}

impl Token {
    pub fn new(
        category: Category,
        kind: impl Into<String>,
        lexeme: impl Into<String>,
        span: Span,
        value: Option<TokenValue>,
    ) -> Self {
        Self {
            category,
            kind: kind.into(),
            lexeme: lexeme.into(),
            span,
            value,
        }
    }

    /// End marker with an empty lexeme at `pos`
    pub fn eof(pos: Position) -> Self {
        Self::new(Category::Eof, kinds::EOF, "", Span::point(pos), None)
    }

    /// EOF substituted by cursors once their stream is exhausted
    pub fn synthetic_eof() -> Self {
        Self::eof(Position::synthetic())
    }

    /// 1-based line of the first character
    pub fn line(&self) -> u32 {
        self.span.start.line
    }

    /// 1-based column of the first character
    pub fn col(&self) -> u32 {
        self.span.start.column
    }

    pub fn position(&self) -> Position {
        self.span.start
    }

    pub fn is_eof(&self) -> bool {
        self.category == Category::Eof
    }

    pub fn is_error(&self) -> bool {
        self.category == Category::Error
    }

    /// Matches on both category and canonical kind
    pub fn is(&self, category: Category, kind: &str) -> bool {
        self.category == category && self.kind == kind
    }

    pub fn int_value(&self) -> Option<i64> {
        match self.value {
            Some(TokenValue::Int(i)) => Some(i),
            _ => None,
        }
    }

    pub fn real_value(&self) -> Option<f64> {
        match self.value {
            Some(TokenValue::Real(r)) => Some(r),
            _ => None,
        }
    }

    pub fn str_value(&self) -> Option<&str> {
        match &self.value {
            Some(TokenValue::Str(s)) => Some(s),
            _ => None,
        }
    }
}

/// Listing format: `[line:col] CATEGORY KIND 'lexeme' = value`
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}:{}] {:<14} {:<10} '{}'",
            self.line(),
            self.col(),
            self.category.as_str(),
            self.kind,
            self.lexeme
        )?;
        if let Some(value) = &self.value {
            write!(f, " = {}", value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(line: u32, column: u32, lexeme: &str) -> Span {
        let start = Position::new(0, line, column);
        Span::new(start, start.advance_str(lexeme))
    }

    #[test]
    fn test_display_with_value() {
        let token = Token::new(
            Category::LitInt,
            kinds::INT,
            "42",
            at(3, 7, "42"),
            Some(TokenValue::Int(42)),
        );
        assert_eq!(
            token.to_string(),
            "[3:7] LIT_INT        INT        '42' = 42"
        );
    }

    #[test]
    fn test_display_without_value() {
        let token = Token::new(Category::Ident, kinds::ID, "X", at(1, 1, "X"), None);
        assert_eq!(token.to_string(), "[1:1] IDENT          ID         'X'");
    }

    #[test]
    fn test_real_value_keeps_decimal_point() {
        assert_eq!(TokenValue::Real(2.0).to_string(), "2.0");
        assert_eq!(TokenValue::Str("it's".into()).to_string(), "'it's'");
    }

    #[test]
    fn test_eof_has_empty_lexeme() {
        let eof = Token::eof(Position::new(10, 2, 4));
        assert!(eof.is_eof());
        assert!(eof.lexeme.is_empty());
        assert_eq!((eof.line(), eof.col()), (2, 4));

        let synthetic = Token::synthetic_eof();
        assert_eq!((synthetic.line(), synthetic.col()), (0, 0));
    }

    #[test]
    fn test_category_and_kind_matching() {
        let keyword = Token::new(Category::Keyword, "REAL", "real", at(1, 1, "real"), None);
        assert!(keyword.is(Category::Keyword, "REAL"));
        assert!(!keyword.is(Category::LitReal, "REAL"));
    }

    #[test]
    fn test_serializes_category_names() {
        let token = Token::new(
            Category::LitString,
            kinds::STRING,
            "'ab'",
            at(1, 1, "'ab'"),
            Some(TokenValue::Str("ab".into())),
        );
        let json = serde_json::to_value(&token).unwrap();
        assert_eq!(json["category"], "LIT_STRING");
        assert_eq!(json["value"], "ab");
    }
}
