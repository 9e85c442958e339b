//! Token model for the Fortran 77 subset
//!
//! ## Key Components
//!
//! - **[`Token`]** - category, canonical kind, lexeme, span and decoded value
//! - **[`Category`]** - the closed set of lexical categories
//! - **[`TokenCursor`]** - one-token lookahead shared by both parsers
//! - **[`TokenStream`]** - an owned token sequence collected from a lexer run
//!
//! Keywords, operators and punctuation carry the canonical kind assigned by
//! the lexical registry (`PROGRAM`, `ASSIGN`, `LPAREN`, ...). Other categories
//! use the fixed kinds in [`kinds`]. A token is identified for parsing by its
//! (category, kind) pair, so the `REAL` keyword and a real literal of kind
//! `REAL` are never confused.

pub mod token;
pub mod token_stream;

pub use token::{kinds, Category, Token, TokenValue};
pub use token_stream::{validate_span_order, TokenCursor, TokenStream, TokenStreamBuilder};
