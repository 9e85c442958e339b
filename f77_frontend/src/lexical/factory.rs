//! Token construction from matched lexemes
//!
//! The factory turns a (category, lexeme, span) triple into a `Token`,
//! resolving the canonical kind and decoding literal values.

use super::pattern::TokenPattern;
use crate::logging::codes;
use crate::tokens::{kinds, Category, Token, TokenValue};
use crate::utils::Span;

pub struct TokenFactory<'p> {
    pattern: &'p TokenPattern,
}

impl<'p> TokenFactory<'p> {
    pub fn new(pattern: &'p TokenPattern) -> Self {
        Self { pattern }
    }

    pub fn create(&self, category: Category, lexeme: &str, span: Span) -> Token {
        match category {
            Category::Keyword => match self.pattern.keyword_kind(lexeme) {
                Some(kind) => Token::new(category, kind, lexeme, span, None),
                None => self.create(Category::Ident, lexeme, span),
            },
            Category::Ident => Token::new(category, kinds::ID, lexeme, span, None),
            Category::LitInt => match lexeme.parse::<i64>() {
                Ok(value) => {
                    Token::new(category, kinds::INT, lexeme, span, Some(TokenValue::Int(value)))
                }
                // Surfaces through bulk lexical reporting instead of a wrong value
                Err(_) => Token::new(Category::Error, kinds::INT_OUT_OF_RANGE, lexeme, span, None),
            },
            Category::LitReal => {
                let value = decode_real(lexeme, span);
                Token::new(category, kinds::REAL, lexeme, span, Some(TokenValue::Real(value)))
            }
            Category::LitString => {
                let value = decode_string(lexeme);
                Token::new(category, kinds::STRING, lexeme, span, Some(TokenValue::Str(value)))
            }
            Category::Operator => match self.pattern.operator_kind(lexeme) {
                Some(kind) => Token::new(category, kind, lexeme, span, None),
                None => self.create(Category::Error, lexeme, span),
            },
            Category::Punct => match self.pattern.punctuation_kind(lexeme) {
                Some(kind) => Token::new(category, kind, lexeme, span, None),
                None => self.create(Category::Error, lexeme, span),
            },
            Category::Label => {
                let value = lexeme.parse::<i64>().ok().map(TokenValue::Int);
                Token::new(category, kinds::LABEL, lexeme, span, value)
            }
            Category::Eof => Token::eof(span.start),
            Category::Error => Token::new(category, kinds::UNKNOWN_CHAR, lexeme, span, None),
        }
    }
}

/// `d`/`D` exponents fold to `e`; a bare trailing `d`/`D` is dropped
pub fn decode_real(lexeme: &str, span: Span) -> f64 {
    let mut normalized: String = lexeme
        .chars()
        .map(|c| match c {
            'd' | 'D' | 'E' => 'e',
            other => other,
        })
        .collect();
    if normalized.ends_with('e') {
        normalized.pop();
    }

    match normalized.parse::<f64>() {
        Ok(value) => value,
        Err(_) => {
            crate::log_warning!(
                code = codes::lexical::INVALID_REAL_LITERAL,
                "Real literal could not be decoded, using 0.0",
                span = span,
                "lexeme" => lexeme
            );
            0.0
        }
    }
}

/// Strip the surrounding quotes and collapse `''` to `'`
pub fn decode_string(lexeme: &str) -> String {
    let inner = lexeme
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .unwrap_or(lexeme);
    inner.replace("''", "'")
}
