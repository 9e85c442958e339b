use super::result::PipelineResult;
use crate::syntax::SyntaxError;
use crate::tokens::Token;
use serde::Serialize;
use std::collections::BTreeMap;

/// Machine-readable report of a run, written by `f77c --json`
#[derive(Debug, Serialize)]
pub struct PipelineOutput {
    pub source: String,
    pub strategy: String,
    pub accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parsers_agree: Option<bool>,
    pub token_counts: BTreeMap<String, usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tokens: Vec<Token>,
    pub parsers: Vec<ParserReport>,
}

#[derive(Debug, Serialize)]
pub struct ParserReport {
    pub parser: &'static str,
    pub accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorReport>,
    pub trace_entries: usize,
}

#[derive(Debug, Serialize)]
pub struct ErrorReport {
    pub code: &'static str,
    pub kind: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
}

impl From<&SyntaxError> for ErrorReport {
    fn from(error: &SyntaxError) -> Self {
        let start = error.span().map(|s| s.start);
        Self {
            code: error.error_code().as_str(),
            kind: error.kind_name(),
            message: error.to_string(),
            line: start.map(|p| p.line),
            column: start.map(|p| p.column),
        }
    }
}

impl PipelineOutput {
    pub fn new(result: &PipelineResult, include_tokens: bool) -> Self {
        let mut parsers = Vec::new();

        if let Some(rd) = &result.recursive_descent {
            parsers.push(ParserReport {
                parser: "recursive_descent",
                accepted: rd.result.is_ok(),
                message: rd.result.as_ref().ok().cloned(),
                error: rd.result.as_ref().err().map(ErrorReport::from),
                trace_entries: rd.trace.len(),
            });
        }
        if let Some(ll1) = &result.ll1 {
            parsers.push(ParserReport {
                parser: "ll1",
                accepted: ll1.result.is_ok(),
                message: None,
                error: ll1.result.as_ref().err().map(ErrorReport::from),
                trace_entries: ll1.trace.len(),
            });
        }

        Self {
            source: result.source_name.clone(),
            strategy: result.strategy.to_string(),
            accepted: result.accepted(),
            parsers_agree: result.parsers_agree(),
            token_counts: result
                .counts
                .by_category
                .iter()
                .map(|(category, count)| (category.as_str().to_string(), *count))
                .collect(),
            tokens: if include_tokens {
                result.tokens.tokens().to_vec()
            } else {
                Vec::new()
            },
            parsers,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
