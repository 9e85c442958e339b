//! Diagnostic codes and their classification metadata
//!
//! Every error raised by the front end maps to one code here. The metadata
//! registry is built once and shared by the event formatter and the collector.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Wrapper shared by error, warning and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// CLASSIFICATION TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for a diagnostic code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

// ============================================================================
// ERROR CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
    pub const CONFIGURATION_ERROR: Code = Code::new("ERR003");
    pub const IO_ERROR: Code = Code::new("ERR004");
}

/// Lexical registry construction and mutation
pub mod registry {
    use super::Code;

    pub const CONFLICTING_SURFACE_FORM: Code = Code::new("R001");
    pub const EMPTY_SURFACE_FORM: Code = Code::new("R002");
}

/// Lexical analysis codes
pub mod lexical {
    use super::Code;

    pub const UNKNOWN_CHARACTER: Code = Code::new("E020");
    pub const UNTERMINATED_STRING: Code = Code::new("E021");
    pub const INVALID_REAL_LITERAL: Code = Code::new("E022");
    pub const INTEGER_OUT_OF_RANGE: Code = Code::new("E023");
    pub const TOO_MANY_TOKENS: Code = Code::new("E027");
}

/// Syntax analysis codes
pub mod syntax {
    use super::Code;

    pub const UNEXPECTED_TOKEN: Code = Code::new("E050");
    pub const NO_PRODUCTION: Code = Code::new("E051");
    pub const PARSER_DISAGREEMENT: Code = Code::new("E052");
    pub const INTERNAL_PARSER_ERROR: Code = Code::new("E086");
    pub const MAX_RECURSION_DEPTH: Code = Code::new("E087");
    pub const STACK_LIMIT_EXCEEDED: Code = Code::new("E088");
}

/// Grammar analysis and parsing table construction
pub mod grammar {
    use super::Code;

    pub const TABLE_CONFLICT: Code = Code::new("G001");
    pub const UNDEFINED_NONTERMINAL: Code = Code::new("G002");
}

// ============================================================================
// SUCCESS CODE CONSTANTS
// ============================================================================

pub mod success {
    use super::Code;

    pub const ANALYSIS_COMPLETED: Code = Code::new("I001");
    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I004");
    pub const TOKENIZATION_COMPLETE: Code = Code::new("I020");
    pub const TABLE_CONSTRUCTION_COMPLETE: Code = Code::new("I030");
    pub const SYNTAX_VALIDATION_PASSED: Code = Code::new("I041");
    pub const PARSERS_AGREE: Code = Code::new("I042");
}

// ============================================================================
// METADATA REGISTRY
// ============================================================================

static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

#[rustfmt::skip]
const METADATA: &[(&str, &str, Severity, bool, bool, &str, &str)] = &[
    // code, category, severity, recoverable, requires_halt, description, action
    ("ERR001", "System", Severity::Critical, false, true,
        "Critical internal error", "File a bug report with the offending source"),
    ("ERR002", "System", Severity::Critical, false, true,
        "Logging or runtime initialization failed", "Check runtime configuration"),
    ("ERR003", "System", Severity::High, false, true,
        "Runtime configuration could not be loaded", "Fix the configuration file syntax"),
    ("ERR004", "System", Severity::High, false, true,
        "Source file could not be read", "Check the path and file permissions"),
    ("R001", "Registry", Severity::High, false, true,
        "Surface form registered in more than one lexical category", "Remove the duplicate entry"),
    ("R002", "Registry", Severity::High, false, true,
        "Empty surface form in lexical registry", "Provide a non-empty lexeme"),
    ("E020", "Lexical", Severity::Medium, true, false,
        "Character does not start any token", "Remove or replace the character"),
    ("E021", "Lexical", Severity::Medium, true, false,
        "String literal is missing its closing quote", "Close the literal with a single quote"),
    ("E022", "Lexical", Severity::Low, true, false,
        "Real literal could not be decoded, value defaulted to zero", "Check the literal format"),
    ("E023", "Lexical", Severity::Medium, true, false,
        "Integer literal does not fit in 64 bits", "Use a smaller constant"),
    ("E027", "Lexical", Severity::High, false, true,
        "Source produced more tokens than the configured limit", "Split the program or raise max_token_count"),
    ("E050", "Syntax", Severity::High, false, true,
        "Token does not match the expected terminal", "Check the statement at the reported position"),
    ("E051", "Syntax", Severity::High, false, true,
        "No parsing table entry for the lookahead", "Check the statement at the reported position"),
    ("E052", "Syntax", Severity::Critical, false, true,
        "Recursive-descent and LL(1) parsers disagree on acceptance", "File a bug report with the source"),
    ("E086", "Syntax", Severity::Critical, false, true,
        "Internal parser error", "File a bug report with the source"),
    ("E087", "Syntax", Severity::High, false, true,
        "Maximum recursion depth exceeded", "Reduce nesting of IF blocks or expressions"),
    ("E088", "Syntax", Severity::High, false, true,
        "Parser stack limit exceeded", "Reduce nesting of IF blocks or expressions"),
    ("G001", "Grammar", Severity::Critical, false, true,
        "Grammar is not LL(1): parsing table cell claimed twice", "Left-factor the conflicting productions"),
    ("G002", "Grammar", Severity::Critical, false, true,
        "Production references an undefined nonterminal", "Add productions for the nonterminal"),
];

fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        METADATA
            .iter()
            .map(
                |&(code, category, severity, recoverable, requires_halt, description, action)| {
                    (
                        code,
                        ErrorMetadata {
                            code,
                            category,
                            severity,
                            recoverable,
                            requires_halt,
                            description,
                            recommended_action: action,
                        },
                    )
                },
            )
            .collect()
    })
}

// ============================================================================
// CLASSIFICATION HELPERS
// ============================================================================

pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

pub fn get_severity(code: &str) -> Severity {
    get_error_metadata(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

pub fn is_recoverable(code: &str) -> bool {
    get_error_metadata(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

pub fn requires_halt(code: &str) -> bool {
    get_error_metadata(code)
        .map(|metadata| metadata.requires_halt)
        .unwrap_or(false)
}

/// Human-readable description, "Unknown error" when unregistered
pub fn get_description(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

pub fn get_action(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

pub fn get_category(code: &str) -> &'static str {
    get_error_metadata(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_error_constant_has_metadata() {
        let codes = [
            system::INTERNAL_ERROR,
            system::INITIALIZATION_FAILURE,
            system::CONFIGURATION_ERROR,
            system::IO_ERROR,
            registry::CONFLICTING_SURFACE_FORM,
            registry::EMPTY_SURFACE_FORM,
            lexical::UNKNOWN_CHARACTER,
            lexical::UNTERMINATED_STRING,
            lexical::INVALID_REAL_LITERAL,
            lexical::TOO_MANY_TOKENS,
            syntax::UNEXPECTED_TOKEN,
            syntax::NO_PRODUCTION,
            syntax::PARSER_DISAGREEMENT,
            syntax::INTERNAL_PARSER_ERROR,
            syntax::MAX_RECURSION_DEPTH,
            syntax::STACK_LIMIT_EXCEEDED,
            grammar::TABLE_CONFLICT,
            grammar::UNDEFINED_NONTERMINAL,
        ];

        for code in codes {
            assert!(
                get_error_metadata(code.as_str()).is_some(),
                "missing metadata for {}",
                code
            );
        }
    }

    #[test]
    fn test_lexical_errors_are_recoverable() {
        assert!(is_recoverable(lexical::UNKNOWN_CHARACTER.as_str()));
        assert!(!requires_halt(lexical::UNKNOWN_CHARACTER.as_str()));
        assert!(requires_halt(syntax::UNEXPECTED_TOKEN.as_str()));
    }

    #[test]
    fn test_unknown_code_fallbacks() {
        assert_eq!(get_description("Z999"), "Unknown error");
        assert_eq!(get_category("Z999"), "Unknown");
        assert_eq!(get_severity("Z999"), Severity::Medium);
    }
}
