//! Table-driven LL(1) predictive parser
//!
//! The parser owns an explicit symbol stack seeded with `[EOF, start]` and
//! borrows an immutable `ParsingTable`. It accepts when EOF on the stack
//! meets the EOF token. Open IF blocks (pending `ENDIF` symbols) are bounded
//! by the same nesting limit the recursive-descent parser uses.

use super::error::{SyntaxError, SyntaxResult};
use super::trace::{Ll1Step, Ll1Trace};
use crate::config::compile_time::syntax::{MAX_PARSE_DEPTH, MAX_STACK_DEPTH};
use crate::grammar::{NonTerminal, ParsingTable, Symbol, Terminal};
use crate::tokens::{Token, TokenCursor};
use crate::{log_debug, log_error};

pub struct Ll1Parser<'t, I: Iterator<Item = Token>> {
    table: &'t ParsingTable,
    cursor: TokenCursor<I>,
    stack: Vec<Symbol>,
    max_stack: usize,
    open_blocks: usize,
    max_depth: usize,
    trace: Ll1Trace,
}

impl<'t, I: Iterator<Item = Token>> Ll1Parser<'t, I> {
    pub fn new(
        table: &'t ParsingTable,
        tokens: impl IntoIterator<IntoIter = I, Item = Token>,
    ) -> Self {
        Self {
            table,
            cursor: TokenCursor::new(tokens),
            stack: vec![Terminal::eof().into(), table.start().into()],
            max_stack: MAX_STACK_DEPTH,
            open_blocks: 0,
            max_depth: MAX_PARSE_DEPTH,
            trace: Ll1Trace::new(),
        }
    }

    /// Lower the stack limit
    pub fn with_max_stack(mut self, max_stack: usize) -> Self {
        self.max_stack = max_stack.min(MAX_STACK_DEPTH);
        self
    }

    /// Lower the IF nesting limit
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.min(MAX_PARSE_DEPTH);
        self
    }

    pub fn trace(&self) -> &Ll1Trace {
        &self.trace
    }

    pub fn into_trace(self) -> Ll1Trace {
        self.trace
    }

    /// Symbols still on the stack, bottom first
    pub fn stack(&self) -> &[Symbol] {
        &self.stack
    }

    pub fn parse(&mut self) -> SyntaxResult<()> {
        let result = self.run();
        match &result {
            Ok(()) => log_debug!("LL(1) parser accepted input",
                "tokens" => self.cursor.consumed(),
                "steps" => self.trace.len()
            ),
            Err(e) => log_error!(e.error_code(), &e.to_string(), span = e.span().unwrap_or_default(),
                "parser" => "ll1"
            ),
        }
        result
    }

    fn run(&mut self) -> SyntaxResult<()> {
        let table = self.table;
        loop {
            let top = self
                .stack
                .last()
                .cloned()
                .ok_or_else(|| SyntaxError::internal("parser stack emptied before accept"))?;
            let lookahead = self.cursor.current();

            match top {
                Symbol::Terminal(ref terminal) if terminal.is_eof() && lookahead.is_eof() => {
                    self.trace.record(Ll1Step::Accept);
                    return Ok(());
                }

                Symbol::NonTerminal(nonterminal) => {
                    let a = Terminal::of(lookahead);
                    let production = table
                        .get(nonterminal, &a)
                        .ok_or_else(|| SyntaxError::no_production(nonterminal, lookahead))?;

                    if nonterminal == NonTerminal::Conditional {
                        if self.open_blocks >= self.max_depth {
                            return Err(SyntaxError::MaxRecursionDepth {
                                limit: self.max_depth,
                                span: lookahead.span,
                            });
                        }
                        self.open_blocks += 1;
                    }

                    self.stack.pop();
                    self.stack.extend(production.rhs.iter().rev().cloned());
                    if self.stack.len() > self.max_stack {
                        return Err(SyntaxError::StackLimitExceeded {
                            limit: self.max_stack,
                            span: lookahead.span,
                        });
                    }

                    self.trace.record(Ll1Step::Apply {
                        nonterminal,
                        lookahead: a,
                        production: production.clone(),
                    });
                }

                Symbol::Terminal(terminal) => {
                    if !terminal.matches(lookahead) {
                        return Err(SyntaxError::unexpected(&terminal, lookahead));
                    }
                    self.stack.pop();
                    if terminal == Terminal::keyword("ENDIF") {
                        self.open_blocks = self.open_blocks.saturating_sub(1);
                    }
                    let matched = self.cursor.advance();
                    self.trace.record(Ll1Step::Match {
                        terminal,
                        lexeme: matched.lexeme,
                    });
                }
            }
        }
    }
}

/// Parse `tokens` against `table` with a fresh parser
pub fn parse_with_table(
    table: &ParsingTable,
    tokens: impl IntoIterator<Item = Token>,
) -> SyntaxResult<()> {
    Ll1Parser::new(table, tokens).parse()
}
