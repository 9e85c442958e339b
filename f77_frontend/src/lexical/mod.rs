//! Lexical analysis for the Fortran 77 subset
//!
//! The registry owns the recognized surface forms, `build_pattern` turns them
//! into a prioritized matcher, the factory builds tokens from matches and the
//! tokenizer drives the whole thing lazily over a source string.

pub mod analyzer;
pub mod factory;
pub mod pattern;
pub mod registry;

use crate::tokens::{Category, Token, TokenStream};
use std::collections::BTreeMap;

pub use analyzer::{LexicalMetrics, Tokenizer};
pub use factory::TokenFactory;
pub use pattern::{Rule, RuleMatch, TokenPattern};
pub use registry::{LexicalRegistry, RegistryError, Section};

/// Tokenize with the default registry
pub fn tokenize(source: &str) -> TokenStream {
    Tokenizer::new(source).collect()
}

pub fn tokenize_with_registry(source: &str, registry: LexicalRegistry) -> TokenStream {
    Tokenizer::with_registry(source, registry).collect()
}

/// Token totals per category, for listings and summaries
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenCounts {
    pub total: usize,
    pub by_category: BTreeMap<Category, usize>,
    /// ERROR tokens in source order, for bulk reporting
    pub error_tokens: Vec<Token>,
}

impl TokenCounts {
    pub fn get(&self, category: Category) -> usize {
        self.by_category.get(&category).copied().unwrap_or(0)
    }

    pub fn error_count(&self) -> usize {
        self.error_tokens.len()
    }
}

pub fn count_tokens(tokens: &[Token]) -> TokenCounts {
    let mut counts = TokenCounts::default();
    for token in tokens {
        counts.total += 1;
        *counts.by_category.entry(token.category).or_insert(0) += 1;
        if token.is_error() {
            counts.error_tokens.push(token.clone());
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_by_category() {
        let stream = tokenize("      IF (Z .GT. 15) THEN");
        let counts = count_tokens(stream.tokens());
        assert_eq!(counts.total, 8);
        assert_eq!(counts.get(Category::Keyword), 2);
        assert_eq!(counts.get(Category::Punct), 2);
        assert_eq!(counts.get(Category::Eof), 1);
        assert_eq!(counts.error_count(), 0);
    }

    #[test]
    fn test_tokenizing_is_repeatable() {
        let source = "  PROGRAM P\n  X = 1.5D0 ** 2\n  END\n";
        assert_eq!(tokenize(source), tokenize(source));
    }

    #[test]
    fn test_custom_registry() {
        let mut registry = LexicalRegistry::default();
        registry.add_punctuation(",", "COMMA").unwrap();
        let stream = tokenize_with_registry("X, Y", registry);
        assert!(stream.tokens()[1].is(Category::Punct, "COMMA"));
        assert_eq!(stream.errors().count(), 0);
    }

    #[test]
    fn test_error_tokens_are_collected() {
        let stream = tokenize("X = 1 # 2 $");
        let counts = count_tokens(stream.tokens());
        let lexemes: Vec<&str> = counts.error_tokens.iter().map(|t| t.lexeme.as_str()).collect();
        assert_eq!(lexemes, ["#", "$"]);
    }
}
