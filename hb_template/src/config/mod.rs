//! Configuration for the template engine
//!
//! Compile-time limits are generated by build.rs from the profile TOML under
//! `config/`. Runtime preferences live in [`runtime`].

include!(concat!(env!("OUT_DIR"), "/constants.rs"));

pub mod runtime;

pub use runtime::{ConfigError, RuntimeConfig};

/// Build information and configuration metadata
pub mod build_info {
    /// Returns the configuration profile used during build
    pub fn profile() -> &'static str {
        option_env!("HB_BUILD_PROFILE").unwrap_or("development")
    }

    /// Returns the configuration directory used during build
    pub fn config_dir() -> &'static str {
        option_env!("HB_CONFIG_DIR").unwrap_or("config")
    }

    pub fn source_info() -> String {
        format!("Generated from {}/{}.toml", config_dir(), profile())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scanner_limits_support_markers() {
        assert!(compile_time::scanner::PEEK_LENGTH >= 2);
        assert!(compile_time::scanner::CHAR_BUFFER_CAPACITY > compile_time::scanner::PEEK_LENGTH);
        assert!(compile_time::scanner::TOKEN_BUFFER_CAPACITY >= 2);
    }

    #[test]
    fn test_limits_admit_largest_source() {
        let max_source_size = compile_time::source::MAX_SOURCE_SIZE;
        assert!(compile_time::scanner::MAX_TEXT_LENGTH as u64 >= max_source_size);
        assert!(compile_time::scanner::MAX_TOKEN_COUNT as u64 > max_source_size);
        assert!(compile_time::syntax::MAX_COMPONENTS as u64 >= max_source_size / 2);
        assert!(compile_time::render::MAX_OUTPUT_SIZE as u64 >= max_source_size);
    }

    #[test]
    fn test_build_info() {
        assert!(build_info::source_info().ends_with(".toml"));
        assert!(!build_info::profile().is_empty());
    }
}
