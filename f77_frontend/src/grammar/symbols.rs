//! Grammar symbols
//!
//! Terminals are identified by token category *and* kind. The `REAL` keyword
//! and a real literal share the kind `REAL`, so kind alone is ambiguous.

use crate::tokens::{kinds, Category, Token};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Terminal {
    pub category: Category,
    pub kind: String,
}

impl Terminal {
    pub fn new(category: Category, kind: impl Into<String>) -> Self {
        Self {
            category,
            kind: kind.into(),
        }
    }

    pub fn keyword(kind: &str) -> Self {
        Self::new(Category::Keyword, kind)
    }

    pub fn operator(kind: &str) -> Self {
        Self::new(Category::Operator, kind)
    }

    pub fn punct(kind: &str) -> Self {
        Self::new(Category::Punct, kind)
    }

    pub fn ident() -> Self {
        Self::new(Category::Ident, kinds::ID)
    }

    pub fn int_literal() -> Self {
        Self::new(Category::LitInt, kinds::INT)
    }

    pub fn real_literal() -> Self {
        Self::new(Category::LitReal, kinds::REAL)
    }

    pub fn eof() -> Self {
        Self::new(Category::Eof, kinds::EOF)
    }

    /// The terminal a token stands for
    pub fn of(token: &Token) -> Self {
        Self::new(token.category, token.kind.clone())
    }

    pub fn matches(&self, token: &Token) -> bool {
        token.is(self.category, &self.kind)
    }

    pub fn is_eof(&self) -> bool {
        self.category == Category::Eof
    }
}

/// Printed as the bare kind, except literals which get a suffix so that
/// `REAL` (keyword) and `REAL literal` stay distinguishable in messages
impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.category.is_literal() {
            write!(f, "{} literal", self.kind)
        } else {
            f.write_str(&self.kind)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NonTerminal {
    Program,
    Declarations,
    Declaration,
    Type,
    Executable,
    Statement,
    Assignment,
    Conditional,
    LogicalExpr,
    RelOp,
    Expr,
    ExprTail,
    ArithOp,
    Term,
}

impl NonTerminal {
    pub fn name(&self) -> &'static str {
        match self {
            NonTerminal::Program => "program",
            NonTerminal::Declarations => "declarations",
            NonTerminal::Declaration => "declaration",
            NonTerminal::Type => "type",
            NonTerminal::Executable => "executable",
            NonTerminal::Statement => "statement",
            NonTerminal::Assignment => "assignment",
            NonTerminal::Conditional => "conditional",
            NonTerminal::LogicalExpr => "logical_expr",
            NonTerminal::RelOp => "relop",
            NonTerminal::Expr => "expr",
            NonTerminal::ExprTail => "expr_tail",
            NonTerminal::ArithOp => "arithop",
            NonTerminal::Term => "term",
        }
    }
}

impl fmt::Display for NonTerminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Symbol {
    Terminal(Terminal),
    NonTerminal(NonTerminal),
}

impl Symbol {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Symbol::Terminal(_))
    }
}

impl From<Terminal> for Symbol {
    fn from(terminal: Terminal) -> Self {
        Symbol::Terminal(terminal)
    }
}

impl From<NonTerminal> for Symbol {
    fn from(nonterminal: NonTerminal) -> Self {
        Symbol::NonTerminal(nonterminal)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Terminal(t) => write!(f, "{}", t),
            Symbol::NonTerminal(n) => write!(f, "{}", n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{Position, Span};

    #[test]
    fn test_real_keyword_and_literal_differ() {
        let keyword = Terminal::keyword("REAL");
        let literal = Terminal::real_literal();
        assert_ne!(keyword, literal);
        assert_eq!(keyword.to_string(), "REAL");
        assert_eq!(literal.to_string(), "REAL literal");

        let token = Token::new(
            Category::LitReal,
            kinds::REAL,
            "2.5",
            Span::point(Position::start()),
            None,
        );
        assert!(literal.matches(&token));
        assert!(!keyword.matches(&token));
        assert_eq!(Terminal::of(&token), literal);
    }

    #[test]
    fn test_nonterminal_display() {
        assert_eq!(NonTerminal::ExprTail.to_string(), "<expr_tail>");
        assert_eq!(Symbol::from(Terminal::operator("ASSIGN")).to_string(), "ASSIGN");
    }
}
