//! Parse traces
//!
//! Both parsers record what they recognized, in order. Traces are bounded;
//! entries past the limit are counted but not stored.

use crate::config::compile_time::syntax::MAX_TRACE_ENTRIES;
use crate::grammar::{NonTerminal, Production, Terminal};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace<E> {
    entries: Vec<E>,
    dropped: usize,
    #[serde(skip)]
    limit: usize,
}

impl<E> Trace<E> {
    pub fn new() -> Self {
        Self::with_limit(MAX_TRACE_ENTRIES)
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            dropped: 0,
            limit,
        }
    }

    pub fn record(&mut self, entry: E) {
        if self.entries.len() < self.limit {
            self.entries.push(entry);
        } else {
            self.dropped += 1;
        }
    }

    pub fn entries(&self) -> &[E] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries not stored because the limit was reached
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

impl<E> Default for Trace<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: fmt::Display> fmt::Display for Trace<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{}", entry)?;
        }
        if self.dropped > 0 {
            writeln!(f, "... {} more", self.dropped)?;
        }
        Ok(())
    }
}

/// Constructs recognized by the recursive-descent parser
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ParseEvent {
    ProgramStart { name: String },
    Declaration { type_name: String, name: String },
    Assignment { target: String },
    IfBegin { line: u32 },
    RelationalOperator { lexeme: String },
    IfEnd,
    ProgramEnd { name: String },
}

impl fmt::Display for ParseEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseEvent::ProgramStart { name } => write!(f, "program {}", name),
            ParseEvent::Declaration { type_name, name } => {
                write!(f, "  declaration: {} {}", type_name, name)
            }
            ParseEvent::Assignment { target } => write!(f, "  assignment: {} = ...", target),
            ParseEvent::IfBegin { line } => write!(f, "  if (line {})", line),
            ParseEvent::RelationalOperator { lexeme } => write!(f, "  relational operator: {}", lexeme),
            ParseEvent::IfEnd => write!(f, "  endif"),
            ParseEvent::ProgramEnd { name } => write!(f, "end {}", name),
        }
    }
}

pub type ParseTrace = Trace<ParseEvent>;

/// One step of the table-driven parser
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Ll1Step {
    Apply {
        nonterminal: NonTerminal,
        lookahead: Terminal,
        production: Production,
    },
    Match { terminal: Terminal, lexeme: String },
    Accept,
}

impl fmt::Display for Ll1Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ll1Step::Apply {
                nonterminal,
                lookahead,
                production,
            } => write!(
                f,
                "apply M[{}, {}] = {}",
                nonterminal,
                lookahead,
                production.rhs_string()
            ),
            Ll1Step::Match { terminal, lexeme } => write!(f, "match {} '{}'", terminal, lexeme),
            Ll1Step::Accept => write!(f, "accept"),
        }
    }
}

pub type Ll1Trace = Trace<Ll1Step>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_limit_counts_dropped() {
        let mut trace = Trace::with_limit(2);
        trace.record(ParseEvent::IfEnd);
        trace.record(ParseEvent::IfEnd);
        trace.record(ParseEvent::IfEnd);

        assert_eq!(trace.len(), 2);
        assert_eq!(trace.dropped(), 1);
        assert!(trace.to_string().ends_with("... 1 more\n"));
    }

    #[test]
    fn test_event_serialization() {
        let event = ParseEvent::Declaration {
            type_name: "INTEGER".into(),
            name: "X".into(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "declaration");
        assert_eq!(json["name"], "X");
    }

    #[test]
    fn test_step_display() {
        let step = Ll1Step::Match {
            terminal: Terminal::keyword("END"),
            lexeme: "end".into(),
        };
        assert_eq!(step.to_string(), "match END 'end'");
    }

    #[test]
    fn test_step_serialization() {
        let step = Ll1Step::Apply {
            nonterminal: NonTerminal::ExprTail,
            lookahead: Terminal::operator("PLUS"),
            production: Production::new(
                NonTerminal::ExprTail,
                vec![NonTerminal::ArithOp.into(), NonTerminal::Expr.into()],
            ),
        };
        let json = serde_json::to_value(&step).unwrap();
        assert_eq!(json["step"], "apply");
        assert_eq!(json["nonterminal"], "expr_tail");
        assert_eq!(json["lookahead"]["kind"], "PLUS");
        assert_eq!(json["production"]["rhs"][0]["non_terminal"], "arith_op");

        let accept = serde_json::to_value(&Ll1Step::Accept).unwrap();
        assert_eq!(accept["step"], "accept");
    }
}
