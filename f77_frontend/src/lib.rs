// Internal modules
pub mod config;
pub mod grammar;
pub mod lexical;
#[macro_use]
pub mod logging;
pub mod pipeline;
pub mod syntax;
pub mod tokens;
pub mod utils;

// Re-export key types for library consumers
pub use lexical::{tokenize, LexicalRegistry, Tokenizer};
pub use pipeline::{
    analyze_source, analyze_source_with_options, AnalysisOptions, ParserStrategy, PipelineError,
    PipelineResult,
};
pub use tokens::{Category, Token, TokenStream};

// Re-export pipeline output for JSON consumers
pub use pipeline::output::PipelineOutput;
