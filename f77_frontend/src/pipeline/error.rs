use crate::config::ConfigError;
use crate::grammar::TableError;
use crate::lexical::RegistryError;
use crate::logging::codes::{self, Code};
use std::path::PathBuf;

/// Failures that stop a run before or instead of parsing. Syntax errors are
/// not among them: they are reported in the parser outcomes.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Failed to read source file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Lexical registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Parsing table construction failed: {0}")]
    Table(#[from] TableError),

    #[error("Source produced more than {limit} tokens")]
    TooManyTokens { limit: usize },

    #[error("{count} lexical error(s), parsing skipped")]
    LexicalErrors { count: usize },
}

impl PipelineError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::Io { .. } => codes::system::IO_ERROR,
            Self::Config(e) => e.error_code(),
            Self::Registry(e) => e.error_code(),
            Self::Table(e) => e.error_code(),
            Self::TooManyTokens { .. } => codes::lexical::TOO_MANY_TOKENS,
            Self::LexicalErrors { .. } => codes::lexical::UNKNOWN_CHARACTER,
        }
    }
}
