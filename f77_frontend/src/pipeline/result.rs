use super::strategy::ParserStrategy;
use crate::lexical::TokenCounts;
use crate::syntax::{Ll1Outcome, RdOutcome, SyntaxError};
use crate::tokens::TokenStream;
use std::time::Duration;

/// Everything one run over a source produced
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub source_name: String,
    pub strategy: ParserStrategy,
    pub tokens: TokenStream,
    pub counts: TokenCounts,
    pub recursive_descent: Option<RdOutcome>,
    pub ll1: Option<Ll1Outcome>,
    pub processing_duration: Duration,
}

impl PipelineResult {
    pub fn has_lexical_errors(&self) -> bool {
        self.counts.error_count() > 0
    }

    /// Every parser that ran accepted the input
    pub fn accepted(&self) -> bool {
        let rd_ok = self
            .recursive_descent
            .as_ref()
            .map_or(true, |o| o.result.is_ok());
        let ll1_ok = self.ll1.as_ref().map_or(true, |o| o.result.is_ok());
        rd_ok && ll1_ok && (self.recursive_descent.is_some() || self.ll1.is_some())
    }

    /// `Some` only when both parsers ran
    pub fn parsers_agree(&self) -> Option<bool> {
        match (&self.recursive_descent, &self.ll1) {
            (Some(rd), Some(ll1)) => Some(rd.result.is_ok() == ll1.result.is_ok()),
            _ => None,
        }
    }

    /// First syntax error, recursive descent checked first
    pub fn first_syntax_error(&self) -> Option<&SyntaxError> {
        let rd = self
            .recursive_descent
            .as_ref()
            .and_then(|o| o.result.as_ref().err());
        rd.or_else(|| self.ll1.as_ref().and_then(|o| o.result.as_ref().err()))
    }

    /// Recursive-descent confirmation, if it ran and succeeded
    pub fn confirmation(&self) -> Option<&str> {
        self.recursive_descent
            .as_ref()
            .and_then(|o| o.result.as_deref().ok())
    }

    pub fn log_success(&self) {
        crate::log_success!(
            crate::logging::codes::success::ANALYSIS_COMPLETED,
            "Source analysis completed",
            "source" => &self.source_name,
            "strategy" => self.strategy,
            "tokens" => self.counts.total,
            "duration_ms" => format!("{:.2}", self.processing_duration.as_secs_f64() * 1000.0)
        );
    }
}
