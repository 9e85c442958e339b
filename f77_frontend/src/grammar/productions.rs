//! Productions and the Fortran subset grammar in BNF form

use super::symbols::{NonTerminal, Symbol, Terminal};
use super::TableError;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Production {
    pub lhs: NonTerminal,
    pub rhs: Vec<Symbol>,
}

impl Production {
    pub fn new(lhs: NonTerminal, rhs: Vec<Symbol>) -> Self {
        Self { lhs, rhs }
    }

    pub fn epsilon(lhs: NonTerminal) -> Self {
        Self::new(lhs, Vec::new())
    }

    pub fn is_epsilon(&self) -> bool {
        self.rhs.is_empty()
    }

    /// Right-hand side alone, `ε` when empty
    pub fn rhs_string(&self) -> String {
        if self.rhs.is_empty() {
            "ε".to_string()
        } else {
            self.rhs
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" ")
        }
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.lhs, self.rhs_string())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Grammar {
    start: NonTerminal,
    productions: Vec<Production>,
}

impl Grammar {
    /// Every nonterminal used on a right-hand side must have a production
    pub fn new(start: NonTerminal, productions: Vec<Production>) -> Result<Self, TableError> {
        let defined: BTreeSet<NonTerminal> = productions.iter().map(|p| p.lhs).collect();

        if !defined.contains(&start) {
            return Err(TableError::UndefinedNonTerminal { nonterminal: start });
        }

        for production in &productions {
            for symbol in &production.rhs {
                if let Symbol::NonTerminal(n) = symbol {
                    if !defined.contains(n) {
                        return Err(TableError::UndefinedNonTerminal { nonterminal: *n });
                    }
                }
            }
        }

        Ok(Self { start, productions })
    }

    /// The left-factored BNF grammar of the subset. Repetition becomes right
    /// recursion with an epsilon alternative.
    pub fn fortran_subset() -> Self {
        use NonTerminal::*;

        let kw = |k: &str| Symbol::from(Terminal::keyword(k));
        let op = |k: &str| Symbol::from(Terminal::operator(k));
        let punct = |k: &str| Symbol::from(Terminal::punct(k));
        let nt = |n: NonTerminal| Symbol::from(n);
        let id = || Symbol::from(Terminal::ident());

        let mut productions = vec![
            Production::new(
                Program,
                vec![kw("PROGRAM"), id(), nt(Declarations), nt(Executable), kw("END")],
            ),
            Production::new(Declarations, vec![nt(Declaration), nt(Declarations)]),
            Production::epsilon(Declarations),
            Production::new(Declaration, vec![nt(Type), id()]),
            Production::new(Type, vec![kw("INTEGER")]),
            Production::new(Type, vec![kw("REAL")]),
            Production::new(Executable, vec![nt(Statement), nt(Executable)]),
            Production::epsilon(Executable),
            Production::new(Statement, vec![nt(Assignment)]),
            Production::new(Statement, vec![nt(Conditional)]),
            Production::new(Assignment, vec![id(), op("ASSIGN"), nt(Expr)]),
            Production::new(
                Conditional,
                vec![
                    kw("IF"),
                    punct("LPAREN"),
                    nt(LogicalExpr),
                    punct("RPAREN"),
                    kw("THEN"),
                    nt(Executable),
                    kw("ENDIF"),
                ],
            ),
            Production::new(LogicalExpr, vec![nt(Expr), nt(RelOp), nt(Expr)]),
            Production::new(Expr, vec![nt(Term), nt(ExprTail)]),
            Production::new(ExprTail, vec![nt(ArithOp), nt(Expr)]),
            Production::epsilon(ExprTail),
            Production::new(Term, vec![id()]),
            Production::new(Term, vec![Terminal::int_literal().into()]),
            Production::new(Term, vec![Terminal::real_literal().into()]),
        ];

        for kind in RELATIONAL_OPERATORS {
            productions.push(Production::new(RelOp, vec![op(kind)]));
        }
        for kind in ARITHMETIC_OPERATORS {
            productions.push(Production::new(ArithOp, vec![op(kind)]));
        }

        Self {
            start: Program,
            productions,
        }
    }

    pub fn start(&self) -> NonTerminal {
        self.start
    }

    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    pub fn productions_for(&self, lhs: NonTerminal) -> impl Iterator<Item = &Production> {
        self.productions.iter().filter(move |p| p.lhs == lhs)
    }

    pub fn nonterminals(&self) -> BTreeSet<NonTerminal> {
        self.productions.iter().map(|p| p.lhs).collect()
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for production in &self.productions {
            writeln!(f, "{}", production)?;
        }
        Ok(())
    }
}

pub const RELATIONAL_OPERATORS: [&str; 6] = ["EQ", "NE", "LT", "LE", "GT", "GE"];
pub const ARITHMETIC_OPERATORS: [&str; 4] = ["PLUS", "MINUS", "MULT", "DIV"];

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_subset_grammar_is_closed() {
        let grammar = Grammar::fortran_subset();
        let rebuilt = Grammar::new(grammar.start(), grammar.productions().to_vec());
        assert!(rebuilt.is_ok());
        assert_eq!(grammar.nonterminals().len(), 14);
        assert_eq!(grammar.productions_for(NonTerminal::RelOp).count(), 6);
    }

    #[test]
    fn test_undefined_nonterminal_rejected() {
        let result = Grammar::new(
            NonTerminal::Program,
            vec![Production::new(
                NonTerminal::Program,
                vec![NonTerminal::Expr.into()],
            )],
        );
        assert_matches!(
            result,
            Err(TableError::UndefinedNonTerminal {
                nonterminal: NonTerminal::Expr
            })
        );
    }

    #[test]
    fn test_production_display() {
        assert_eq!(
            Production::epsilon(NonTerminal::ExprTail).to_string(),
            "<expr_tail> -> ε"
        );
        let assignment = Grammar::fortran_subset()
            .productions_for(NonTerminal::Assignment)
            .next()
            .cloned()
            .unwrap();
        assert_eq!(assignment.to_string(), "<assignment> -> ID ASSIGN <expr>");
    }
}
