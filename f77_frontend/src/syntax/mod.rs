//! Syntax analysis
//!
//! Two independent parsers over the same token contract: a recursive-descent
//! parser with one method per rule, and a table-driven LL(1) parser with an
//! explicit stack. Both stop at the first error.

mod error;
pub mod ll1;
pub mod parser;
pub mod trace;

pub use error::{SyntaxError, SyntaxResult};
pub use ll1::{parse_with_table, Ll1Parser};
pub use parser::{parse_program, RecursiveDescentParser};
pub use trace::{Ll1Step, Ll1Trace, ParseEvent, ParseTrace, Trace};

use crate::grammar::ParsingTable;
use crate::logging::codes;
use crate::tokens::Token;
use crate::{log_debug, log_success};

/// Outcome of one recursive-descent run, trace included
#[derive(Debug, Clone)]
pub struct RdOutcome {
    pub result: SyntaxResult<String>,
    pub trace: ParseTrace,
}

/// Outcome of one LL(1) run, trace included
#[derive(Debug, Clone)]
pub struct Ll1Outcome {
    pub result: SyntaxResult<()>,
    pub trace: Ll1Trace,
}

pub fn run_recursive_descent(tokens: impl IntoIterator<Item = Token>, log_trace: bool) -> RdOutcome {
    let mut parser = RecursiveDescentParser::new(tokens);
    let result = parser.parse();
    let trace = parser.into_trace();

    if let Ok(message) = &result {
        log_success!(codes::success::SYNTAX_VALIDATION_PASSED, message,
            "parser" => "recursive_descent"
        );
    }
    if log_trace {
        for event in trace.entries() {
            log_debug!("rd trace", "event" => event);
        }
    }

    RdOutcome { result, trace }
}

pub fn run_ll1(
    table: &ParsingTable,
    tokens: impl IntoIterator<Item = Token>,
    log_trace: bool,
) -> Ll1Outcome {
    let mut parser = Ll1Parser::new(table, tokens);
    let result = parser.parse();
    let trace = parser.into_trace();

    if result.is_ok() {
        log_success!(codes::success::SYNTAX_VALIDATION_PASSED, "LL(1) analysis completed",
            "steps" => trace.len()
        );
    }
    if log_trace {
        for step in trace.entries() {
            log_debug!("ll1 trace", "step" => step);
        }
    }

    Ll1Outcome { result, trace }
}
