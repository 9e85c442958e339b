use f77_frontend::config::RuntimeConfig;
use f77_frontend::pipeline::{self, AnalysisOptions, ParserStrategy, PipelineResult};
use f77_frontend::syntax::SyntaxError;
use f77_frontend::utils::SourceMap;
use f77_frontend::{logging, PipelineOutput};
use std::env;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, PartialEq)]
struct CliOptions {
    input: Option<PathBuf>,
    show_tokens: bool,
    strategy: Option<ParserStrategy>,
    config_path: Option<PathBuf>,
    json: bool,
    help: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();
    let program_name = args.first().map(String::as_str).unwrap_or("f77c");

    let options = match parse_cli_options(args.get(1..).unwrap_or(&[])) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("Error: {}", message);
            eprintln!("Usage: {} <file.f> [options]", program_name);
            eprintln!("       {} --help", program_name);
            std::process::exit(2);
        }
    };

    if options.help {
        print_help(program_name);
        return Ok(());
    }

    let Some(input_path) = options.input.as_deref() else {
        eprintln!("Usage: {} <file.f> [options]", program_name);
        eprintln!("       {} --help", program_name);
        std::process::exit(2);
    };

    let config = match &options.config_path {
        Some(path) => RuntimeConfig::load(path)?,
        None => RuntimeConfig::default(),
    };

    // Preferences must be installed before the global logger reads them
    logging::config::init_runtime_preferences(config.logging.clone())?;
    logging::init_global_logging()?;
    pipeline::validate_pipeline()?;

    let mut analysis = AnalysisOptions::from_config(&config);
    if let Some(strategy) = options.strategy {
        analysis.strategy = strategy;
    }
    let show_tokens = options.show_tokens || config.lexical.show_token_listing;

    let accepted = process_file(input_path, &analysis, show_tokens, options.json);

    if !options.json && logging::config::use_cargo_style_output() {
        print_cargo_style_summary();
    }

    if !accepted {
        std::process::exit(1);
    }
    Ok(())
}

fn print_help(program_name: &str) {
    println!("f77c v{}", env!("CARGO_PKG_VERSION"));
    println!("Fortran 77 subset front end: tokenizer and syntax checker");
    println!();
    println!("USAGE:");
    println!("    {} <file.f> [options]", program_name);
    println!();
    println!("OPTIONS:");
    println!("    --help              Show this help message");
    println!("    --tokens            Print the token listing before parsing");
    println!("    --parser <name>     Parser to run: rd, ll1 or both (default: rd)");
    println!("    --config <path>     Load runtime preferences from a TOML file");
    println!("    --json              Print a JSON report instead of text");
    println!();
    println!("EXIT STATUS:");
    println!("    0  source tokenized cleanly and every parser accepted it");
    println!("    1  lexical or syntax errors, or the file could not be read");
    println!("    2  invalid command line");
    println!();
    println!("EXAMPLES:");
    println!("    {} calc.f                    # Recursive descent", program_name);
    println!("    {} calc.f --parser both      # Cross-check both parsers", program_name);
    println!("    {} calc.f --tokens --json    # Report with tokens", program_name);
}

fn parse_cli_options(args: &[String]) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => options.help = true,
            "--tokens" => options.show_tokens = true,
            "--json" => options.json = true,
            "--parser" => {
                let value = args
                    .get(i + 1)
                    .ok_or_else(|| "--parser requires rd, ll1 or both".to_string())?;
                options.strategy = Some(value.parse()?);
                i += 1;
            }
            "--config" => {
                let value = args
                    .get(i + 1)
                    .ok_or_else(|| "--config requires a path".to_string())?;
                options.config_path = Some(PathBuf::from(value));
                i += 1;
            }
            flag if flag.starts_with("--") => {
                eprintln!("Warning: Unknown option '{}'", flag);
            }
            path => {
                if options.input.is_some() {
                    return Err(format!("Unexpected extra argument '{}'", path));
                }
                options.input = Some(PathBuf::from(path));
            }
        }
        i += 1;
    }

    Ok(options)
}

/// Analyze one file and print the outcome. Returns whether it was clean.
fn process_file(path: &Path, options: &AnalysisOptions, show_tokens: bool, json: bool) -> bool {
    let text = match pipeline::read_source(path) {
        Ok(text) => text,
        Err(error) => {
            eprintln!("FAILED: {} [{}]", error, error.error_code());
            return false;
        }
    };

    let name = path.display().to_string();
    let result = match pipeline::analyze_source_with_options(&name, &text, options) {
        Ok(result) => result,
        Err(error) => {
            eprintln!("FAILED: {} [{}]", error, error.error_code());
            return false;
        }
    };

    if json {
        print_json(&result, show_tokens);
    } else {
        if show_tokens {
            print_token_listing(&result);
        }
        print_parse_results(&result, &SourceMap::new(text));
    }

    result.accepted() && !result.has_lexical_errors()
}

fn print_json(result: &PipelineResult, include_tokens: bool) {
    match PipelineOutput::new(result, include_tokens).to_json() {
        Ok(json) => println!("{}", json),
        Err(error) => eprintln!("Failed to serialize report: {}", error),
    }
}

fn print_token_listing(result: &PipelineResult) {
    println!("Tokens for {}:", result.source_name);
    for token in result.tokens.tokens() {
        println!("  {}", token);
    }
    println!();
    println!("Tokens per category:");
    for (category, count) in &result.counts.by_category {
        println!("  {:<14} {}", category.as_str(), count);
    }
    println!("  {:<14} {}", "TOTAL", result.counts.total);
    println!();
}

fn print_parse_results(result: &PipelineResult, source_map: &SourceMap) {
    if let Some(rd) = &result.recursive_descent {
        match &rd.result {
            Ok(message) => println!("recursive descent: {}", message),
            Err(error) => {
                println!("recursive descent: rejected");
                print_syntax_error(error, source_map);
            }
        }
    }

    if let Some(ll1) = &result.ll1 {
        match &ll1.result {
            Ok(()) => println!("ll(1): accepted in {} steps", ll1.trace.len()),
            Err(error) => {
                println!("ll(1): rejected");
                print_syntax_error(error, source_map);
            }
        }
    }

    match result.parsers_agree() {
        Some(true) => println!("parsers agree"),
        Some(false) => println!("WARNING: parsers disagree"),
        None => {}
    }

    if result.has_lexical_errors() {
        println!(
            "{} lexical error token(s) found",
            result.counts.error_count()
        );
    }
}

fn print_syntax_error(error: &SyntaxError, source_map: &SourceMap) {
    let message = format!("[{}] {}", error.error_code(), error);
    match error.span() {
        Some(span) => eprint!("{}", source_map.format_error(span.start, span.len(), &message)),
        None => eprintln!("error: {}", message),
    }
}

fn print_cargo_style_summary() {
    if let Some(summary) = logging::cargo_style_summary() {
        if !summary.trim().is_empty() {
            eprintln!("{}", summary);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_cli_options() {
        let options =
            parse_cli_options(&args(&["calc.f", "--tokens", "--parser", "both", "--json"]))
                .unwrap();

        assert_eq!(options.input, Some(PathBuf::from("calc.f")));
        assert!(options.show_tokens);
        assert!(options.json);
        assert_eq!(options.strategy, Some(ParserStrategy::Both));
        assert!(options.config_path.is_none());
    }

    #[test]
    fn test_parse_cli_options_invalid() {
        assert!(parse_cli_options(&args(&["calc.f", "--parser", "lalr"])).is_err());
        assert!(parse_cli_options(&args(&["calc.f", "--parser"])).is_err());
        assert!(parse_cli_options(&args(&["a.f", "b.f"])).is_err());
    }

    #[test]
    fn test_unknown_option_is_ignored() {
        let options = parse_cli_options(&args(&["--verbose", "calc.f"])).unwrap();
        assert_eq!(options.input, Some(PathBuf::from("calc.f")));
    }

    #[test]
    fn test_config_path_option() {
        let options = parse_cli_options(&args(&["calc.f", "--config", "f77.toml"])).unwrap();
        assert_eq!(options.config_path, Some(PathBuf::from("f77.toml")));
    }
}
