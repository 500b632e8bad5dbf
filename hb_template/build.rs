// build.rs - TOML-driven compile-time limit generation
use std::env;
use std::fs;
use std::path::Path;

#[derive(serde::Deserialize)]
struct CompileTimeConfig {
    source: SourceLimits,
    scanner: ScannerLimits,
    syntax: SyntaxLimits,
    render: RenderLimits,
    logging: LoggingLimits,
}

#[derive(serde::Deserialize)]
struct SourceLimits {
    max_source_size: u64,
}

#[derive(serde::Deserialize)]
struct ScannerLimits {
    char_buffer_capacity: usize,
    token_buffer_capacity: usize,
    peek_length: usize,
    max_text_length: usize,
    max_token_count: usize,
}

#[derive(serde::Deserialize)]
struct SyntaxLimits {
    max_expression_arguments: usize,
    max_components: usize,
}

#[derive(serde::Deserialize)]
struct RenderLimits {
    max_output_size: usize,
}

#[derive(serde::Deserialize)]
struct LoggingLimits {
    log_buffer_size: usize,
    max_log_message_length: usize,
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=HB_BUILD_PROFILE");
    println!("cargo:rerun-if-env-changed=HB_CONFIG_DIR");

    let profile = env::var("HB_BUILD_PROFILE").unwrap_or_else(|_| "development".to_string());
    let config_dir = env::var("HB_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

    // Workspace root is the parent of the hb_template directory
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

    validate_limits(&config, &profile);
    generate_constants(&config, &profile);
}

fn validate_limits(config: &CompileTimeConfig, profile: &str) {
    const ABSOLUTE_MAX_SOURCE_SIZE: u64 = 1_000_000_000;

    if config.source.max_source_size > ABSOLUTE_MAX_SOURCE_SIZE {
        panic!("LIMITS: max_source_size exceeds absolute maximum");
    }

    // Two-byte markers are only visible through a peek window of at least two
    if config.scanner.peek_length < 2 {
        panic!("LIMITS: peek_length must be at least 2");
    }

    if config.scanner.char_buffer_capacity <= config.scanner.peek_length {
        panic!("LIMITS: char_buffer_capacity must exceed peek_length");
    }

    // A flushed text token plus the token that ended it
    if config.scanner.token_buffer_capacity < 2 {
        panic!("LIMITS: token_buffer_capacity must be at least 2");
    }

    // Any source accepted at open time must also scan, parse and render
    let max_source_size = config.source.max_source_size;
    if (config.scanner.max_text_length as u64) < max_source_size {
        panic!("LIMITS: max_text_length must be at least max_source_size");
    }

    // At most one token per source byte, plus end of stream
    if (config.scanner.max_token_count as u64) <= max_source_size {
        panic!("LIMITS: max_token_count must exceed max_source_size");
    }

    // A component spans at least two source bytes
    if (config.syntax.max_components as u64) < max_source_size / 2 {
        panic!("LIMITS: max_components must be at least half of max_source_size");
    }

    if (config.render.max_output_size as u64) < max_source_size {
        panic!("LIMITS: max_output_size must be at least max_source_size");
    }

    if config.syntax.max_expression_arguments == 0 {
        panic!("LIMITS: max_expression_arguments cannot be zero");
    }

    if config.logging.log_buffer_size == 0 {
        panic!("LIMITS: log_buffer_size cannot be zero");
    }

    if profile == "production" && config.source.max_source_size > 50_000_000 {
        panic!("PRODUCTION: max_source_size too high for production");
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
    pub mod source {{
        pub const MAX_SOURCE_SIZE: u64 = {};
    }}

    pub mod scanner {{
        pub const CHAR_BUFFER_CAPACITY: usize = {};
        pub const TOKEN_BUFFER_CAPACITY: usize = {};
        pub const PEEK_LENGTH: usize = {};
        pub const MAX_TEXT_LENGTH: usize = {};
        pub const MAX_TOKEN_COUNT: usize = {};
    }}

    pub mod syntax {{
        pub const MAX_EXPRESSION_ARGUMENTS: usize = {};
        pub const MAX_COMPONENTS: usize = {};
    }}

    pub mod render {{
        pub const MAX_OUTPUT_SIZE: usize = {};
    }}

    pub mod logging {{
        pub const LOG_BUFFER_SIZE: usize = {};
        pub const MAX_LOG_MESSAGE_LENGTH: usize = {};
    }}
}}
"#,
        profile,
        config.source.max_source_size,
        config.scanner.char_buffer_capacity,
        config.scanner.token_buffer_capacity,
        config.scanner.peek_length,
        config.scanner.max_text_length,
        config.scanner.max_token_count,
        config.syntax.max_expression_arguments,
        config.syntax.max_components,
        config.render.max_output_size,
        config.logging.log_buffer_size,
        config.logging.max_log_message_length,
    );

    fs::write(output_path, constants_code).unwrap();
}
