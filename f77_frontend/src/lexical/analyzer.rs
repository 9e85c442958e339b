//! Tokenizer: lazy token production over a source string
//!
//! `Tokenizer` is an iterator. It never fails: text that no rule accepts
//! becomes a one-character ERROR token and scanning resumes right after it.
//! The sequence always ends with exactly one EOF token.

use super::factory::TokenFactory;
use super::pattern::TokenPattern;
use super::registry::LexicalRegistry;
use crate::tokens::{Category, Token};
use crate::utils::{Position, Span};

/// Counters kept while tokenizing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LexicalMetrics {
    pub tokens_produced: usize,
    pub error_tokens: usize,
    pub comments_skipped: usize,
    pub labels: usize,
    pub lines: u32,
}

#[derive(Debug)]
pub struct Tokenizer<'s> {
    source: &'s str,
    registry: LexicalRegistry,
    pattern: TokenPattern,
    position: Position,
    line_start: usize,
    finished: bool,
    metrics: LexicalMetrics,
}

impl<'s> Tokenizer<'s> {
    pub fn new(source: &'s str) -> Self {
        Self::with_registry(source, LexicalRegistry::default())
    }

    pub fn with_registry(source: &'s str, registry: LexicalRegistry) -> Self {
        let pattern = registry.build_pattern();
        Self {
            source,
            registry,
            pattern,
            position: Position::start(),
            line_start: 0,
            finished: false,
            metrics: LexicalMetrics::default(),
        }
    }

    pub fn registry(&self) -> &LexicalRegistry {
        &self.registry
    }

    /// Registry changes take effect after `recompile_pattern`
    pub fn registry_mut(&mut self) -> &mut LexicalRegistry {
        &mut self.registry
    }

    /// Rebuild the matcher from the registry. Tokens produced afterwards use
    /// the new tables; tokens already produced are unaffected.
    pub fn recompile_pattern(&mut self) {
        self.pattern = self.registry.build_pattern();
        crate::log_debug!("Token pattern recompiled",
            "keywords" => self.registry.keywords().count(),
            "operators" => self.registry.operators().count(),
            "offset" => self.position.offset
        );
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn metrics(&self) -> &LexicalMetrics {
        &self.metrics
    }

    /// Advance over `text`, tracking where the current line starts
    fn consume(&mut self, text: &str) -> Span {
        let start = self.position;
        self.position = start.advance_str(text);
        if let Some(newline) = text.rfind('\n') {
            self.line_start = start.offset + newline + 1;
        }
        Span::new(start, self.position)
    }

    fn next_token(&mut self) -> Option<Token> {
        loop {
            if self.finished {
                return None;
            }

            let offset = self.position.offset;
            if offset >= self.source.len() {
                self.finished = true;
                self.metrics.lines = self.position.line;
                return Some(Token::eof(self.position));
            }

            let source = self.source;
            let (category, lexeme) = match self.pattern.match_at(source, offset, self.line_start) {
                Some(m) => {
                    let lexeme = &source[offset..offset + m.len];
                    match m.rule.category() {
                        Some(category) => (category, lexeme),
                        None => {
                            if m.rule == super::pattern::Rule::Comment {
                                self.metrics.comments_skipped += 1;
                            }
                            self.consume(lexeme);
                            continue;
                        }
                    }
                }
                None => {
                    let width = source[offset..].chars().next().map_or(1, char::len_utf8);
                    (Category::Error, &source[offset..offset + width])
                }
            };

            let span = self.consume(lexeme);
            let token = TokenFactory::new(&self.pattern).create(category, lexeme, span);

            self.metrics.tokens_produced += 1;
            match token.category {
                Category::Error => self.metrics.error_tokens += 1,
                Category::Label => self.metrics.labels += 1,
                _ => {}
            }
            return Some(token);
        }
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token()
    }
}

impl std::iter::FusedIterator for Tokenizer<'_> {}
