//! LL(1) parsing table
//!
//! An immutable map (nonterminal, terminal) -> production. A cell claimed by
//! two different productions means the grammar is not LL(1) and construction
//! fails.

use super::analysis::GrammarAnalysis;
use super::productions::{Grammar, Production};
use super::symbols::{NonTerminal, Symbol, Terminal};
use crate::logging::codes::{self, Code};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TableError {
    #[error("LL(1) conflict at M[{nonterminal}, {terminal}]: '{existing}' vs '{incoming}'")]
    Conflict {
        nonterminal: NonTerminal,
        terminal: Terminal,
        existing: String,
        incoming: String,
    },

    #[error("Nonterminal {nonterminal} has no productions")]
    UndefinedNonTerminal { nonterminal: NonTerminal },
}

impl TableError {
    pub fn error_code(&self) -> Code {
        match self {
            TableError::Conflict { .. } => codes::grammar::TABLE_CONFLICT,
            TableError::UndefinedNonTerminal { .. } => codes::grammar::UNDEFINED_NONTERMINAL,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsingTable {
    start: NonTerminal,
    cells: BTreeMap<NonTerminal, BTreeMap<Terminal, Production>>,
}

impl ParsingTable {
    /// Derive the table from FIRST/FOLLOW: `A -> α` goes into every
    /// `M[A, a]` with `a` in FIRST(α), and into `M[A, b]` for every `b` in
    /// FOLLOW(A) when α is nullable.
    pub fn build(grammar: &Grammar) -> Result<Self, TableError> {
        let analysis = GrammarAnalysis::compute(grammar);
        let mut table = Self::empty(grammar.start());

        for production in grammar.productions() {
            let first = analysis.first_of_sequence(&production.rhs);
            for terminal in &first.terminals {
                table.insert(terminal.clone(), production.clone())?;
            }
            if first.nullable {
                if let Some(follow) = analysis.follow(production.lhs) {
                    for terminal in follow {
                        table.insert(terminal.clone(), production.clone())?;
                    }
                }
            }
        }

        Ok(table)
    }

    /// Table for the built-in Fortran subset grammar
    pub fn fortran_subset() -> Result<Self, TableError> {
        Self::build(&Grammar::fortran_subset())
    }

    /// Hand-written table. Cells are checked for determinism the same way as
    /// derived ones.
    pub fn from_entries<I>(start: NonTerminal, entries: I) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = (NonTerminal, Terminal, Vec<Symbol>)>,
    {
        let mut table = Self::empty(start);
        for (lhs, terminal, rhs) in entries {
            table.insert(terminal, Production::new(lhs, rhs))?;
        }
        Ok(table)
    }

    fn empty(start: NonTerminal) -> Self {
        Self {
            start,
            cells: BTreeMap::new(),
        }
    }

    fn insert(&mut self, terminal: Terminal, production: Production) -> Result<(), TableError> {
        let row = self.cells.entry(production.lhs).or_default();
        match row.get(&terminal) {
            Some(existing) if *existing != production => Err(TableError::Conflict {
                nonterminal: production.lhs,
                terminal,
                existing: existing.to_string(),
                incoming: production.to_string(),
            }),
            Some(_) => Ok(()),
            None => {
                row.insert(terminal, production);
                Ok(())
            }
        }
    }

    pub fn start(&self) -> NonTerminal {
        self.start
    }

    pub fn get(&self, nonterminal: NonTerminal, terminal: &Terminal) -> Option<&Production> {
        self.cells.get(&nonterminal)?.get(terminal)
    }

    pub fn has_row(&self, nonterminal: NonTerminal) -> bool {
        self.cells.contains_key(&nonterminal)
    }

    /// Terminals with an entry in the row of `nonterminal`
    pub fn expected(&self, nonterminal: NonTerminal) -> Vec<&Terminal> {
        self.cells
            .get(&nonterminal)
            .map(|row| row.keys().collect())
            .unwrap_or_default()
    }

    /// Number of filled cells
    pub fn len(&self) -> usize {
        self.cells.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for ParsingTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (nonterminal, row) in &self.cells {
            for (terminal, production) in row {
                writeln!(
                    f,
                    "M[{}, {}] = {}",
                    nonterminal,
                    terminal,
                    production.rhs_string()
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_subset_table_is_deterministic() {
        let table = ParsingTable::fortran_subset().unwrap();
        assert_eq!(table.start(), NonTerminal::Program);

        let program = table
            .get(NonTerminal::Program, &Terminal::keyword("PROGRAM"))
            .unwrap();
        assert_eq!(program.rhs.len(), 5);

        let end_of_declarations = table
            .get(NonTerminal::Declarations, &Terminal::keyword("END"))
            .unwrap();
        assert!(end_of_declarations.is_epsilon());

        assert!(table
            .get(NonTerminal::Term, &Terminal::keyword("REAL"))
            .is_none());
        assert!(table
            .get(NonTerminal::Term, &Terminal::real_literal())
            .is_some());
    }

    #[test]
    fn test_epsilon_cells_follow_follow_sets() {
        let table = ParsingTable::fortran_subset().unwrap();
        for terminal in [
            Terminal::operator("GT"),
            Terminal::punct("RPAREN"),
            Terminal::keyword("ENDIF"),
            Terminal::keyword("END"),
            Terminal::ident(),
        ] {
            let production = table.get(NonTerminal::ExprTail, &terminal).unwrap();
            assert!(production.is_epsilon(), "ExprTail on {}", terminal);
        }
        assert!(table.get(NonTerminal::ExprTail, &Terminal::eof()).is_none());
    }

    #[test]
    fn test_non_left_factored_grammar_conflicts() {
        let id = || Symbol::from(Terminal::ident());
        let grammar = Grammar::new(
            NonTerminal::Expr,
            vec![
                Production::new(NonTerminal::Expr, vec![id()]),
                Production::new(
                    NonTerminal::Expr,
                    vec![id(), Terminal::operator("PLUS").into(), NonTerminal::Expr.into()],
                ),
            ],
        )
        .unwrap();

        let err = ParsingTable::build(&grammar).unwrap_err();
        assert_matches!(err, TableError::Conflict { nonterminal: NonTerminal::Expr, .. });
        assert_eq!(err.error_code(), codes::grammar::TABLE_CONFLICT);
    }

    #[test]
    fn test_hand_written_entries() {
        let table = ParsingTable::from_entries(
            NonTerminal::Type,
            [
                (NonTerminal::Type, Terminal::keyword("INTEGER"), vec![Terminal::keyword("INTEGER").into()]),
                (NonTerminal::Type, Terminal::keyword("REAL"), vec![Terminal::keyword("REAL").into()]),
            ],
        )
        .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.expected(NonTerminal::Type).len(), 2);

        let duplicate = ParsingTable::from_entries(
            NonTerminal::Type,
            [
                (NonTerminal::Type, Terminal::keyword("REAL"), vec![Terminal::keyword("REAL").into()]),
                (NonTerminal::Type, Terminal::keyword("REAL"), vec![]),
            ],
        );
        assert_matches!(duplicate, Err(TableError::Conflict { .. }));
    }
}
