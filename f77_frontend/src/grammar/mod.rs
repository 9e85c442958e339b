//! Grammar of the Fortran subset and LL(1) table construction
//!
//! The recursive-descent parser encodes the grammar in its procedures; the
//! table-driven parser consumes a `ParsingTable` derived here from the same
//! grammar in BNF form.

pub mod analysis;
pub mod productions;
pub mod symbols;
pub mod table;

pub use analysis::{FirstSet, GrammarAnalysis};
pub use productions::{Grammar, Production, ARITHMETIC_OPERATORS, RELATIONAL_OPERATORS};
pub use symbols::{NonTerminal, Symbol, Terminal};
pub use table::{ParsingTable, TableError};

/// Build the subset table and log the outcome
pub fn build_subset_table() -> Result<ParsingTable, TableError> {
    match ParsingTable::fortran_subset() {
        Ok(table) => {
            crate::log_success!(
                crate::logging::codes::success::TABLE_CONSTRUCTION_COMPLETE,
                "LL(1) parsing table constructed",
                "cells" => table.len()
            );
            Ok(table)
        }
        Err(e) => {
            crate::log_error!(e.error_code(), &e.to_string());
            Err(e)
        }
    }
}
