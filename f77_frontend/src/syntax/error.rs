//! Syntax errors shared by both parsers
//!
//! Parsing stops at the first error. Every variant that refers to a token
//! carries its span so reports can point at the source.

use crate::logging::{codes, Code};
use crate::tokens::Token;
use crate::utils::Span;
use std::fmt;

pub type SyntaxResult<T> = Result<T, SyntaxError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SyntaxError {
    #[error("Expected '{expected}' but found '{found}' ('{lexeme}') at [{}]", .span.start)]
    UnexpectedToken {
        expected: String,
        found: String,
        lexeme: String,
        span: Span,
    },

    #[error("No production for M[{nonterminal}, {found}] ('{lexeme}') at [{}]", .span.start)]
    NoProduction {
        nonterminal: String,
        found: String,
        lexeme: String,
        span: Span,
    },

    #[error("Maximum parse depth {limit} exceeded at [{}]", .span.start)]
    MaxRecursionDepth { limit: usize, span: Span },

    #[error("Parser stack exceeded {limit} symbols at [{}]", .span.start)]
    StackLimitExceeded { limit: usize, span: Span },

    #[error("Internal parser error: {message}")]
    Internal { message: String },
}

impl SyntaxError {
    pub fn unexpected(expected: impl fmt::Display, found: &Token) -> Self {
        Self::UnexpectedToken {
            expected: expected.to_string(),
            found: found.kind.clone(),
            lexeme: found.lexeme.clone(),
            span: found.span,
        }
    }

    pub fn no_production(nonterminal: impl fmt::Display, found: &Token) -> Self {
        Self::NoProduction {
            nonterminal: nonterminal.to_string(),
            found: found.kind.clone(),
            lexeme: found.lexeme.clone(),
            span: found.span,
        }
    }

    pub fn internal(message: &str) -> Self {
        Self::Internal {
            message: message.to_string(),
        }
    }

    pub fn error_code(&self) -> Code {
        match self {
            Self::UnexpectedToken { .. } => codes::syntax::UNEXPECTED_TOKEN,
            Self::NoProduction { .. } => codes::syntax::NO_PRODUCTION,
            Self::MaxRecursionDepth { .. } => codes::syntax::MAX_RECURSION_DEPTH,
            Self::StackLimitExceeded { .. } => codes::syntax::STACK_LIMIT_EXCEEDED,
            Self::Internal { .. } => codes::syntax::INTERNAL_PARSER_ERROR,
        }
    }

    /// Location of the offending token
    pub fn span(&self) -> Option<Span> {
        match self {
            Self::UnexpectedToken { span, .. }
            | Self::NoProduction { span, .. }
            | Self::MaxRecursionDepth { span, .. }
            | Self::StackLimitExceeded { span, .. } => Some(*span),
            Self::Internal { .. } => None,
        }
    }

    /// Kind of the token the parser stopped at
    pub fn found_kind(&self) -> Option<&str> {
        match self {
            Self::UnexpectedToken { found, .. } | Self::NoProduction { found, .. } => Some(found),
            _ => None,
        }
    }

    pub fn expected(&self) -> Option<&str> {
        match self {
            Self::UnexpectedToken { expected, .. } => Some(expected),
            _ => None,
        }
    }

    /// Short variant name for reports and JSON output
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::UnexpectedToken { .. } => "unexpected_token",
            Self::NoProduction { .. } => "no_production",
            Self::MaxRecursionDepth { .. } => "max_recursion_depth",
            Self::StackLimitExceeded { .. } => "stack_limit_exceeded",
            Self::Internal { .. } => "internal",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::{kinds, Category};
    use crate::utils::Position;

    #[test]
    fn test_unexpected_token_message() {
        let found = Token::eof(Position::new(120, 12, 1));
        let err = SyntaxError::unexpected("END", &found);

        assert_eq!(err.to_string(), "Expected 'END' but found 'EOF' ('') at [12:1]");
        assert_eq!(err.expected(), Some("END"));
        assert_eq!(err.found_kind(), Some(kinds::EOF));
        assert_eq!(err.error_code(), codes::syntax::UNEXPECTED_TOKEN);
        assert_eq!(err.span().map(|s| s.start.line), Some(12));
    }

    #[test]
    fn test_no_production_message() {
        let start = Position::new(4, 1, 5);
        let found = Token::new(
            Category::Operator,
            "PLUS",
            "+",
            Span::new(start, start.advance('+')),
            None,
        );
        let err = SyntaxError::no_production("<term>", &found);
        assert_eq!(err.to_string(), "No production for M[<term>, PLUS] ('+') at [1:5]");
        assert_eq!(err.kind_name(), "no_production");
    }

    #[test]
    fn test_internal_error_has_no_span() {
        let err = SyntaxError::internal("stack emptied");
        assert!(err.span().is_none());
        assert_eq!(err.error_code(), codes::syntax::INTERNAL_PARSER_ERROR);
    }
}
