//! Configuration module for the Fortran 77 front end
//! Automatically uses generated constants from TOML configuration

// Include generated constants from build.rs
// This file is generated at compile time from the TOML profile
include!(concat!(env!("OUT_DIR"), "/constants.rs"));

pub mod runtime;

pub use runtime::{ConfigError, RuntimeConfig};

/// Build information and configuration metadata
pub mod build_info {
    /// Returns the configuration profile used during build
    pub fn profile() -> &'static str {
        option_env!("F77_BUILD_PROFILE").unwrap_or("development")
    }

    /// Returns the configuration directory used during build
    pub fn config_dir() -> &'static str {
        option_env!("F77_CONFIG_DIR").unwrap_or("config")
    }

    /// Returns configuration source information
    pub fn source_info() -> String {
        format!("Generated from {}/{}.toml", config_dir(), profile())
    }
}

#[cfg(test)]
mod tests {
    use super::compile_time;

    #[test]
    fn test_generated_limits_are_sane() {
        assert!(compile_time::lexical::MAX_LABEL_DIGITS >= 1);
        assert!(compile_time::lexical::MAX_LABEL_DIGITS <= 5);
        assert!(compile_time::syntax::MAX_PARSE_DEPTH > 0);
        assert!(compile_time::syntax::MAX_STACK_DEPTH >= 2);
        assert!(
            compile_time::logging::MAX_LOG_EVENTS_PER_SOURCE
                <= compile_time::logging::LOG_BUFFER_SIZE
        );
    }

    #[test]
    fn test_source_info_mentions_profile() {
        let info = super::build_info::source_info();
        assert!(info.contains(super::build_info::profile()));
    }
}
