// build.rs - TOML-driven constant generation
use std::env;
use std::fs;
use std::path::Path;

#[derive(serde::Deserialize)]
struct CompileTimeConfig {
    lexical: LexicalLimits,
    syntax: SyntaxLimits,
    logging: LoggingLimits,
}

#[derive(serde::Deserialize)]
struct LexicalLimits {
    max_label_digits: usize,
    max_token_count: usize,
}

#[derive(serde::Deserialize)]
struct SyntaxLimits {
    max_parse_depth: usize,
    max_stack_depth: usize,
    max_trace_entries: usize,
}

#[derive(serde::Deserialize)]
struct LoggingLimits {
    log_buffer_size: usize,
    max_log_message_length: usize,
    max_log_events_per_source: usize,
    security_min_log_level: u8,
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=F77_BUILD_PROFILE");
    println!("cargo:rerun-if-env-changed=F77_CONFIG_DIR");

    let profile = env::var("F77_BUILD_PROFILE").unwrap_or_else(|_| "development".to_string());
    let config_dir = env::var("F77_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

    // Find workspace root (parent of f77_frontend directory)
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let workspace_root = Path::new(&manifest_dir)
        .parent()
        .expect("Could not find workspace root (parent directory)");

    let config_path = workspace_root
        .join(&config_dir)
        .join(format!("{}.toml", profile));

    println!("cargo:rerun-if-changed={}", config_path.display());

    if !config_path.exists() {
        panic!(
            "Configuration file not found: {}\nWorkspace root: {}\nLooking for: {}/{}/{}.toml",
            config_path.display(),
            workspace_root.display(),
            workspace_root.display(),
            config_dir,
            profile
        );
    }

    let config_content = fs::read_to_string(&config_path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", config_path.display(), e));

    let config: CompileTimeConfig = toml::from_str(&config_content)
        .unwrap_or_else(|e| panic!("Invalid TOML in {}: {}", config_path.display(), e));

    validate_constraints(&config, &profile);
    generate_constants(&config, &profile);
}

fn validate_constraints(config: &CompileTimeConfig, profile: &str) {
    // Fixed-form labels occupy columns 1-5
    if config.lexical.max_label_digits == 0 || config.lexical.max_label_digits > 5 {
        panic!("CONFIG: max_label_digits must be between 1 and 5");
    }

    if config.syntax.max_parse_depth == 0 {
        panic!("CONFIG: max_parse_depth cannot be zero");
    }

    if config.syntax.max_stack_depth < 2 {
        panic!("CONFIG: max_stack_depth must hold at least the EOF marker and start symbol");
    }

    if config.logging.security_min_log_level > 2 {
        panic!("SECURITY: security_min_log_level too high (max: 2)");
    }

    if config.logging.max_log_events_per_source > config.logging.log_buffer_size {
        panic!("CONFIG: max_log_events_per_source exceeds log_buffer_size");
    }

    if profile == "production" && config.syntax.max_parse_depth > 10_000 {
        panic!("PRODUCTION: max_parse_depth too high for production");
    }
}

fn generate_constants(config: &CompileTimeConfig, profile: &str) {
    let out_dir = env::var("OUT_DIR").unwrap();
    let output_path = Path::new(&out_dir).join("constants.rs");

    let constants_code = format!(
        r#"
// Generated compile-time constants from TOML configuration
// Profile: {}
// DO NOT EDIT - Generated by build.rs

pub mod compile_time {{
    pub mod lexical {{
        pub const MAX_LABEL_DIGITS: usize = {};
        pub const MAX_TOKEN_COUNT: usize = {};
    }}

    pub mod syntax {{
        pub const MAX_PARSE_DEPTH: usize = {};
        pub const MAX_STACK_DEPTH: usize = {};
        pub const MAX_TRACE_ENTRIES: usize = {};
    }}

    pub mod logging {{
        pub const LOG_BUFFER_SIZE: usize = {};
        pub const MAX_LOG_MESSAGE_LENGTH: usize = {};
        pub const MAX_LOG_EVENTS_PER_SOURCE: usize = {};
        pub const SECURITY_MIN_LOG_LEVEL: u8 = {};
    }}
}}
"#,
        profile,
        // Lexical
        config.lexical.max_label_digits,
        config.lexical.max_token_count,
        // Syntax
        config.syntax.max_parse_depth,
        config.syntax.max_stack_depth,
        config.syntax.max_trace_entries,
        // Logging
        config.logging.log_buffer_size,
        config.logging.max_log_message_length,
        config.logging.max_log_events_per_source,
        config.logging.security_min_log_level,
    );

    fs::write(output_path, constants_code).unwrap();
}
