//! Pull cursors over token sequences
//!
//! Both parsers read tokens through `TokenCursor`, which wraps any token
//! iterator and keeps exactly one token of lookahead. Once the underlying
//! iterator is exhausted the cursor keeps answering with a synthetic EOF.

use crate::tokens::token::{kinds, Category, Token, TokenValue};
use crate::utils::{Position, Span};

/// One-token lookahead over a token iterator
#[derive(Debug)]
pub struct TokenCursor<I: Iterator<Item = Token>> {
    tokens: I,
    current: Token,
    consumed: usize,
}

impl<I: Iterator<Item = Token>> TokenCursor<I> {
    pub fn new(tokens: impl IntoIterator<IntoIter = I, Item = Token>) -> Self {
        let mut tokens = tokens.into_iter();
        let current = tokens.next().unwrap_or_else(Token::synthetic_eof);
        Self {
            tokens,
            current,
            consumed: 0,
        }
    }

    /// The lookahead token
    pub fn current(&self) -> &Token {
        &self.current
    }

    /// Move past the lookahead and return it
    pub fn advance(&mut self) -> Token {
        let next = self.tokens.next().unwrap_or_else(Token::synthetic_eof);
        self.consumed += 1;
        std::mem::replace(&mut self.current, next)
    }

    /// Tokens consumed so far
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    pub fn at_eof(&self) -> bool {
        self.current.is_eof()
    }
}

/// Owned token sequence, as collected from a lexer run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn has_eof(&self) -> bool {
        self.tokens.last().is_some_and(Token::is_eof)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter().filter(|t| t.is_error())
    }

    /// Fresh cursor over a copy of the tokens
    pub fn cursor(&self) -> TokenCursor<std::vec::IntoIter<Token>> {
        TokenCursor::new(self.tokens.clone())
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }
}

impl IntoIterator for TokenStream {
    type Item = Token;
    type IntoIter = std::vec::IntoIter<Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.into_iter()
    }
}

impl FromIterator<Token> for TokenStream {
    fn from_iter<T: IntoIterator<Item = Token>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Builds token sequences by hand, laying them out on one line separated by
/// single spaces. Used to drive parsers without a lexer.
#[derive(Debug)]
pub struct TokenStreamBuilder {
    tokens: Vec<Token>,
    current_position: Position,
}

impl TokenStreamBuilder {
    pub fn new() -> Self {
        Self {
            tokens: Vec::new(),
            current_position: Position::start(),
        }
    }

    pub fn push_token(
        mut self,
        category: Category,
        kind: &str,
        lexeme: &str,
        value: Option<TokenValue>,
    ) -> Self {
        let start = self.current_position;
        let end = start.advance_str(lexeme);
        self.tokens
            .push(Token::new(category, kind, lexeme, Span::new(start, end), value));
        self.current_position = end.advance(' ');
        self
    }

    /// Keyword whose kind is the upper-cased lexeme
    pub fn keyword(self, lexeme: &str) -> Self {
        let kind = lexeme.to_ascii_uppercase();
        self.push_token(Category::Keyword, &kind, lexeme, None)
    }

    pub fn ident(self, name: &str) -> Self {
        self.push_token(Category::Ident, kinds::ID, name, None)
    }

    pub fn int(self, value: i64) -> Self {
        let lexeme = value.to_string();
        self.push_token(Category::LitInt, kinds::INT, &lexeme, Some(TokenValue::Int(value)))
    }

    pub fn real(self, lexeme: &str, value: f64) -> Self {
        self.push_token(Category::LitReal, kinds::REAL, lexeme, Some(TokenValue::Real(value)))
    }

    pub fn operator(self, kind: &str, lexeme: &str) -> Self {
        self.push_token(Category::Operator, kind, lexeme, None)
    }

    pub fn punct(self, kind: &str, lexeme: &str) -> Self {
        self.push_token(Category::Punct, kind, lexeme, None)
    }

    pub fn newline(mut self) -> Self {
        self.current_position = self.current_position.advance('\n');
        self
    }

    /// Finish with an EOF at the current position
    pub fn build(mut self) -> TokenStream {
        self.tokens.push(Token::eof(self.current_position));
        TokenStream::new(self.tokens)
    }

    /// Finish without an EOF, for exercising cursor substitution
    pub fn build_without_eof(self) -> TokenStream {
        TokenStream::new(self.tokens)
    }
}

impl Default for TokenStreamBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Positions must strictly increase through a token sequence
pub fn validate_span_order(tokens: &[Token]) -> Result<(), String> {
    for window in tokens.windows(2) {
        let (current, next) = (&window[0], &window[1]);
        if current.span.end.offset > next.span.start.offset {
            return Err(format!(
                "Span order violation: '{}' at {} overlaps '{}' at {}",
                current.lexeme,
                current.position(),
                next.lexeme,
                next.position()
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_substitutes_synthetic_eof() {
        let stream = TokenStreamBuilder::new().ident("X").build_without_eof();
        let mut cursor = stream.cursor();

        assert_eq!(cursor.current().lexeme, "X");
        let taken = cursor.advance();
        assert_eq!(taken.lexeme, "X");

        assert!(cursor.at_eof());
        assert_eq!(cursor.current().line(), 0);
        cursor.advance();
        assert!(cursor.at_eof());
        assert_eq!(cursor.consumed(), 2);
    }

    #[test]
    fn test_empty_cursor_starts_at_eof() {
        let cursor = TokenCursor::new(Vec::<Token>::new());
        assert!(cursor.at_eof());
    }

    #[test]
    fn test_builder_positions() {
        let stream = TokenStreamBuilder::new()
            .keyword("PROGRAM")
            .ident("CALC")
            .newline()
            .keyword("END")
            .build();

        let tokens = stream.tokens();
        assert_eq!((tokens[1].line(), tokens[1].col()), (1, 9));
        assert_eq!((tokens[2].line(), tokens[2].col()), (2, 1));
        assert!(stream.has_eof());
        assert!(validate_span_order(tokens).is_ok());
    }

    #[test]
    fn test_span_order_violation_detected() {
        let stream = TokenStreamBuilder::new().ident("A").ident("B").build();
        let mut tokens = stream.into_tokens();
        tokens.swap(0, 1);
        assert!(validate_span_order(&tokens).is_err());
    }
}
