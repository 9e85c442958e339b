use assert_matches::assert_matches;
use f77_frontend::config::RuntimeConfig;
use f77_frontend::pipeline::{
    analyze_source_with_options, read_source, AnalysisOptions, ParserStrategy, PipelineError,
    PipelineOutput,
};
use std::fs;
use tempfile::tempdir;

const PROGRAM: &str = "      PROGRAM AREA\n      REAL R\n      R = 2.5\n      END\n";

#[test]
fn analyze_file_from_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("area.f");
    fs::write(&path, PROGRAM).unwrap();

    let text = read_source(&path).unwrap();
    let options = AnalysisOptions::new(ParserStrategy::Both);
    let result = analyze_source_with_options("area.f", &text, &options).unwrap();

    assert!(result.accepted());
    assert_eq!(result.confirmation(), Some("Program 'AREA' parsed successfully"));
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempdir().unwrap();
    let err = read_source(&dir.path().join("absent.f")).unwrap_err();
    assert_matches!(err, PipelineError::Io { .. });
}

#[test]
fn runtime_config_file_selects_strategy() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("f77.toml");
    fs::write(
        &config_path,
        "[parser]\nstrategy = \"ll1\"\n\n[lexical]\nstop_on_lexical_errors = true\n",
    )
    .unwrap();

    let config = RuntimeConfig::load(&config_path).unwrap();
    let options = AnalysisOptions::from_config(&config);
    assert_eq!(options.strategy, ParserStrategy::Ll1);

    let err = analyze_source_with_options("bad.f", "  PROGRAM P\n  X = 1 ! 2\n  END\n", &options)
        .unwrap_err();
    assert_matches!(err, PipelineError::LexicalErrors { count: 1 });
}

#[test]
fn json_report_lists_both_parsers() {
    let options = AnalysisOptions::new(ParserStrategy::Both);
    let result = analyze_source_with_options("area.f", PROGRAM, &options).unwrap();

    let json = PipelineOutput::new(&result, true).to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["accepted"], serde_json::Value::Bool(true));
    assert_eq!(value["parsers"].as_array().map(Vec::len), Some(2));
    assert_eq!(value["token_counts"]["KEYWORD"], serde_json::json!(3));
    assert!(value["tokens"].as_array().is_some_and(|t| !t.is_empty()));
}
