// RUNTIME PREFERENCES (User Experience)
//
// Preferences never change what the front end accepts; limits live in the
// generated compile-time constants.

use crate::logging::codes::{self, Code};
use crate::pipeline::ParserStrategy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LexicalPreferences {
    /// Report ERROR tokens through the diagnostic collector
    pub report_lexical_errors: bool,

    /// Print the token listing before parsing
    pub show_token_listing: bool,

    /// Abort parsing when the token stream contains ERROR tokens
    pub stop_on_lexical_errors: bool,
}

impl Default for LexicalPreferences {
    fn default() -> Self {
        Self {
            report_lexical_errors: env_or(env_vars::LEXICAL_REPORT_ERRORS, true),
            show_token_listing: env_or(env_vars::LEXICAL_SHOW_TOKENS, false),
            stop_on_lexical_errors: env_or(env_vars::LEXICAL_STOP_ON_ERRORS, false),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserPreferences {
    /// Parser(s) run when none is requested explicitly
    pub strategy: ParserStrategy,

    /// Log the parse trace at debug level after a parse
    pub log_parse_trace: bool,
}

impl Default for ParserPreferences {
    fn default() -> Self {
        Self {
            strategy: env::var(env_vars::PARSER_STRATEGY)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(ParserStrategy::RecursiveDescent),
            log_parse_trace: env_or(env_vars::PARSER_LOG_TRACE, false),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    /// JSON lines instead of plain text
    pub use_structured_logging: bool,

    pub enable_console_logging: bool,

    /// Preferred minimum level, bounded by the compile-time floor
    pub min_log_level: LogLevel,

    /// Print collected diagnostics in cargo style after analysis
    pub enable_cargo_style_output: bool,

    /// Attach the source name to every event
    pub include_source_context: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env_or(env_vars::LOGGING_USE_STRUCTURED, false),
            enable_console_logging: env_or(env_vars::LOGGING_ENABLE_CONSOLE, true),
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Warning),
            enable_cargo_style_output: env_or(env_vars::LOGGING_CARGO_STYLE, true),
            include_source_context: env_or(env_vars::LOGGING_INCLUDE_SOURCE_CONTEXT, true),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }

    pub fn to_events_log_level(&self) -> crate::logging::events::LogLevel {
        match self {
            LogLevel::Error => crate::logging::events::LogLevel::Error,
            LogLevel::Warning => crate::logging::events::LogLevel::Warning,
            LogLevel::Info => crate::logging::events::LogLevel::Info,
            LogLevel::Debug => crate::logging::events::LogLevel::Debug,
        }
    }
}

/// Parse log level from string (used for environment variables and CLI flags)
pub fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

impl ConfigError {
    pub fn error_code(&self) -> Code {
        match self {
            ConfigError::Io { .. } => codes::system::IO_ERROR,
            ConfigError::Parse(_) => codes::system::CONFIGURATION_ERROR,
        }
    }
}

/// All runtime preferences. Sections missing from a TOML file fall back to
/// their environment-aware defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub lexical: LexicalPreferences,
    pub parser: ParserPreferences,
    pub logging: LoggingPreferences,
}

impl RuntimeConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    // Lexical
    pub const LEXICAL_REPORT_ERRORS: &str = "F77_LEXICAL_REPORT_ERRORS";
    pub const LEXICAL_SHOW_TOKENS: &str = "F77_LEXICAL_SHOW_TOKENS";
    pub const LEXICAL_STOP_ON_ERRORS: &str = "F77_LEXICAL_STOP_ON_ERRORS";

    // Parser
    pub const PARSER_STRATEGY: &str = "F77_PARSER_STRATEGY";
    pub const PARSER_LOG_TRACE: &str = "F77_PARSER_LOG_TRACE";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "F77_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "F77_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "F77_LOGGING_MIN_LEVEL";
    pub const LOGGING_CARGO_STYLE: &str = "F77_LOGGING_CARGO_STYLE";
    pub const LOGGING_INCLUDE_SOURCE_CONTEXT: &str = "F77_LOGGING_INCLUDE_SOURCE_CONTEXT";
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(parse_log_level("error"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("ERROR"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("warn"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("2"), Some(LogLevel::Info));
        assert_eq!(parse_log_level("debug"), Some(LogLevel::Debug));
        assert_eq!(parse_log_level("verbose"), None);
    }

    #[test]
    fn test_partial_toml_keeps_other_defaults() {
        let config = RuntimeConfig::from_toml_str(
            r#"
            [parser]
            strategy = "both"

            [logging]
            min_log_level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.parser.strategy, ParserStrategy::Both);
        assert_eq!(config.logging.min_log_level, LogLevel::Debug);
        assert_eq!(config.lexical, LexicalPreferences::default());
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        let err = RuntimeConfig::from_toml_str("[parser\nstrategy = 1").unwrap_err();
        assert_matches!(err, ConfigError::Parse(_));
        assert_eq!(err.error_code(), codes::system::CONFIGURATION_ERROR);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = RuntimeConfig::load(Path::new("/nonexistent/f77.toml")).unwrap_err();
        assert_matches!(err, ConfigError::Io { .. });
    }

    #[test]
    fn test_env_var_names_are_prefixed() {
        for name in [
            env_vars::LEXICAL_REPORT_ERRORS,
            env_vars::PARSER_STRATEGY,
            env_vars::LOGGING_MIN_LEVEL,
        ] {
            assert!(name.starts_with("F77_"));
        }
    }
}
