//! Source analysis pipeline: tokenize, report lexical errors, parse
//!
//! Runs inside a logging source context so every diagnostic raised along the
//! way is collected under the source name.

mod error;
pub mod output;
mod result;
mod strategy;
mod validation;

pub use error::PipelineError;
pub use output::{ErrorReport, ParserReport, PipelineOutput};
pub use result::PipelineResult;
pub use strategy::ParserStrategy;
pub use validation::validate_pipeline;

use crate::config::compile_time::lexical::MAX_TOKEN_COUNT;
use crate::config::RuntimeConfig;
use crate::lexical::{count_tokens, LexicalRegistry, Tokenizer};
use crate::logging::{self, codes};
use crate::tokens::{kinds, Token, TokenStream};
use crate::{log_error, log_info, log_success};
use std::path::Path;
use std::time::Instant;

/// Per-run settings
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    pub strategy: ParserStrategy,
    pub registry: LexicalRegistry,
    pub report_lexical_errors: bool,
    pub stop_on_lexical_errors: bool,
    pub log_parse_trace: bool,
}

impl AnalysisOptions {
    pub fn new(strategy: ParserStrategy) -> Self {
        Self {
            strategy,
            registry: LexicalRegistry::default(),
            report_lexical_errors: true,
            stop_on_lexical_errors: false,
            log_parse_trace: false,
        }
    }

    pub fn from_config(config: &RuntimeConfig) -> Self {
        Self {
            strategy: config.parser.strategy,
            registry: LexicalRegistry::default(),
            report_lexical_errors: config.lexical.report_lexical_errors,
            stop_on_lexical_errors: config.lexical.stop_on_lexical_errors,
            log_parse_trace: config.parser.log_parse_trace,
        }
    }
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self::new(ParserStrategy::default())
    }
}

/// Analyze `text` with the default registry
pub fn analyze_source(
    name: &str,
    text: &str,
    strategy: ParserStrategy,
) -> Result<PipelineResult, PipelineError> {
    analyze_source_with_options(name, text, &AnalysisOptions::new(strategy))
}

pub fn analyze_source_with_options(
    name: &str,
    text: &str,
    options: &AnalysisOptions,
) -> Result<PipelineResult, PipelineError> {
    logging::with_source_context(name, || run(name, text, options))
}

fn run(name: &str, text: &str, options: &AnalysisOptions) -> Result<PipelineResult, PipelineError> {
    let start_time = Instant::now();
    log_info!("Starting analysis", "source" => name, "strategy" => options.strategy);

    let tokens = collect_tokens(text, options.registry.clone())?;
    let counts = count_tokens(tokens.tokens());
    log_success!(codes::success::TOKENIZATION_COMPLETE, "Tokenization completed",
        "tokens" => counts.total,
        "errors" => counts.error_count()
    );

    if options.report_lexical_errors {
        report_lexical_errors(&counts.error_tokens);
    }
    if options.stop_on_lexical_errors && counts.error_count() > 0 {
        return Err(PipelineError::LexicalErrors {
            count: counts.error_count(),
        });
    }

    let recursive_descent = options
        .strategy
        .runs_recursive_descent()
        .then(|| crate::syntax::run_recursive_descent(tokens.clone(), options.log_parse_trace));

    let ll1 = if options.strategy.runs_ll1() {
        let table = crate::grammar::build_subset_table()?;
        Some(crate::syntax::run_ll1(&table, tokens.clone(), options.log_parse_trace))
    } else {
        None
    };

    let result = PipelineResult {
        source_name: name.to_string(),
        strategy: options.strategy,
        tokens,
        counts,
        recursive_descent,
        ll1,
        processing_duration: start_time.elapsed(),
    };

    match result.parsers_agree() {
        Some(true) => log_success!(codes::success::PARSERS_AGREE, "Both parsers agree",
            "accepted" => result.accepted()
        ),
        Some(false) => log_error!(codes::syntax::PARSER_DISAGREEMENT,
            "Recursive-descent and LL(1) parsers disagree"
        ),
        None => {}
    }

    if result.accepted() {
        result.log_success();
    }
    Ok(result)
}

/// Drain a tokenizer, refusing sources past the token limit
fn collect_tokens(text: &str, registry: LexicalRegistry) -> Result<TokenStream, PipelineError> {
    let mut tokens: Vec<Token> = Vec::new();
    for token in Tokenizer::with_registry(text, registry) {
        if tokens.len() >= MAX_TOKEN_COUNT {
            log_error!(codes::lexical::TOO_MANY_TOKENS, "Token limit exceeded",
                "limit" => MAX_TOKEN_COUNT
            );
            return Err(PipelineError::TooManyTokens {
                limit: MAX_TOKEN_COUNT,
            });
        }
        tokens.push(token);
    }
    Ok(TokenStream::new(tokens))
}

fn report_lexical_errors(errors: &[Token]) {
    for token in errors {
        let (code, message) = if token.kind == kinds::INT_OUT_OF_RANGE {
            (codes::lexical::INTEGER_OUT_OF_RANGE, "Integer literal out of range")
        } else if token.lexeme == "'" {
            (codes::lexical::UNTERMINATED_STRING, "Unterminated string literal")
        } else {
            (codes::lexical::UNKNOWN_CHARACTER, "Unknown character")
        };
        log_error!(code, message, span = token.span,
            "lexeme" => &token.lexeme
        );
    }
}

/// Read a source file for analysis
pub fn read_source(path: &Path) -> Result<String, PipelineError> {
    std::fs::read_to_string(path).map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    const CALC: &str = "\
      PROGRAM CALC
      INTEGER X
      REAL Z
      X = 10
      Z = X + 2.5
      IF (Z .GT. 15) THEN
          X = X + 1
      ENDIF
      END
";

    #[test]
    fn test_both_parsers_agree_on_valid_source() {
        let result = analyze_source("calc.f", CALC, ParserStrategy::Both).unwrap();
        assert!(result.accepted());
        assert_eq!(result.parsers_agree(), Some(true));
        assert_eq!(result.confirmation(), Some("Program 'CALC' parsed successfully"));
        assert!(!result.has_lexical_errors());
    }

    #[test]
    fn test_single_strategy_runs_one_parser() {
        let result = analyze_source("calc.f", CALC, ParserStrategy::Ll1).unwrap();
        assert!(result.recursive_descent.is_none());
        assert!(result.ll1.is_some());
        assert_eq!(result.parsers_agree(), None);
    }

    #[test]
    fn test_syntax_error_is_in_outcome() {
        let broken = CALC.replace("      END\n", "");
        let result = analyze_source("broken.f", &broken, ParserStrategy::Both).unwrap();
        assert!(!result.accepted());
        assert_eq!(result.parsers_agree(), Some(true));
        assert_eq!(result.first_syntax_error().and_then(|e| e.found_kind()), Some("EOF"));
    }

    #[test]
    fn test_stop_on_lexical_errors() {
        let mut options = AnalysisOptions::new(ParserStrategy::RecursiveDescent);
        options.stop_on_lexical_errors = true;

        let err = analyze_source_with_options("bad.f", "  PROGRAM P\n  X = 1 # 2\n  END", &options)
            .unwrap_err();
        assert_matches!(err, PipelineError::LexicalErrors { count: 1 });
        assert_eq!(err.error_code(), codes::lexical::UNKNOWN_CHARACTER);
    }

    #[test]
    fn test_integer_overflow_is_a_lexical_error() {
        let source = "  PROGRAM P\n  X = 99999999999999999999\n  END\n";
        let result = analyze_source("big.f", source, ParserStrategy::Both).unwrap();

        assert!(result.has_lexical_errors());
        assert_eq!(result.counts.error_tokens[0].kind, kinds::INT_OUT_OF_RANGE);
        assert!(!result.accepted());
        assert_eq!(result.parsers_agree(), Some(true));
    }

    #[test]
    fn test_options_follow_runtime_config() {
        let config = RuntimeConfig::from_toml_str("[parser]\nstrategy = \"ll1\"\n").unwrap();
        let options = AnalysisOptions::from_config(&config);
        assert_eq!(options.strategy, ParserStrategy::Ll1);
    }

    #[test]
    fn test_missing_file() {
        let err = read_source(Path::new("/nonexistent/calc.f")).unwrap_err();
        assert_eq!(err.error_code(), codes::system::IO_ERROR);
    }

    #[test]
    fn test_validate_pipeline() {
        assert!(validate_pipeline().is_ok());
    }
}
