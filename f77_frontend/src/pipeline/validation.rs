use crate::grammar::ParsingTable;
use crate::lexical::LexicalRegistry;
use crate::logging::codes;

const PIPELINE_CODES: &[codes::Code] = &[
    codes::system::IO_ERROR,
    codes::system::CONFIGURATION_ERROR,
    codes::registry::CONFLICTING_SURFACE_FORM,
    codes::lexical::UNKNOWN_CHARACTER,
    codes::lexical::UNTERMINATED_STRING,
    codes::lexical::INVALID_REAL_LITERAL,
    codes::lexical::INTEGER_OUT_OF_RANGE,
    codes::lexical::TOO_MANY_TOKENS,
    codes::syntax::UNEXPECTED_TOKEN,
    codes::syntax::NO_PRODUCTION,
    codes::syntax::PARSER_DISAGREEMENT,
    codes::syntax::MAX_RECURSION_DEPTH,
    codes::syntax::STACK_LIMIT_EXCEEDED,
    codes::grammar::TABLE_CONFLICT,
];

/// Check that every error code the pipeline raises has metadata, and that the
/// default registry and parsing table can be built
pub fn validate_pipeline() -> Result<(), String> {
    crate::log_debug!("Validating pipeline configuration");

    for code in PIPELINE_CODES {
        if codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!("Error code {} not found in metadata registry", code));
        }
    }

    let pattern = LexicalRegistry::default().build_pattern();
    if pattern.operators().next().is_none() {
        return Err("Default lexical registry has no operators".to_string());
    }

    let table = ParsingTable::fortran_subset()
        .map_err(|e| format!("Parsing table construction failed: {}", e))?;

    crate::log_success!(
        codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Pipeline validation succeeded",
        "codes_checked" => PIPELINE_CODES.len(),
        "table_cells" => table.len()
    );

    Ok(())
}
