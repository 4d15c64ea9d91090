// build.rs - TOML-driven compile-time limit generation
use std::env;
use std::fs;
use std::path::Path;

#[derive(serde::Deserialize)]
struct CompileTimeConfig {
    lexical: LexicalLimits,
    syntax: SyntaxLimits,
    semantic: SemanticLimits,
    code_actions: CodeActionLimits,
    session: SessionLimits,
    logging: LoggingLimits,
}

#[derive(serde::Deserialize)]
struct LexicalLimits {
    max_source_size: usize,
    max_string_size: usize,
    max_identifier_length: usize,
    max_comment_length: usize,
    max_token_count: usize,
}

#[derive(serde::Deserialize)]
struct SyntaxLimits {
    max_parse_depth: usize,
    max_error_history: usize,
    max_context_stack_depth: usize,
    max_recovery_scan_tokens: usize,
    max_lookahead_tokens: usize,
    max_syntax_diagnostics: usize,
}

#[derive(serde::Deserialize)]
struct SemanticLimits {
    max_semantic_diagnostics: usize,
    max_line_length: usize,
    max_call_extraction: usize,
    max_inference_depth: usize,
}

#[derive(serde::Deserialize)]
struct CodeActionLimits {
    max_actions_per_request: usize,
}

#[derive(serde::Deserialize)]
struct SessionLimits {
    max_open_documents: usize,
    max_pending_tickets: usize,
}

#[derive(serde::Deserialize)]
struct LoggingLimits {
    log_buffer_size: usize,
    max_log_message_length: usize,
    security_min_log_level: u8,
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=EVAL_BUILD_PROFILE");
    println!("cargo:rerun-if-env-changed=EVAL_CONFIG_DIR");

    let profile = env::var("EVAL_BUILD_PROFILE").unwrap_or_else(|_| "development".to_string());
    let config_dir = env::var("EVAL_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

    // Workspace root is the parent of the crate directory
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
    const ABSOLUTE_MAX_SOURCE_SIZE: usize = 100_000_000;
    const ABSOLUTE_MAX_PARSE_DEPTH: usize = 10_000;

    if config.lexical.max_source_size > ABSOLUTE_MAX_SOURCE_SIZE {
        panic!("LIMITS: max_source_size exceeds absolute maximum");
    }

    if config.lexical.max_string_size > config.lexical.max_source_size {
        panic!("LIMITS: max_string_size cannot exceed max_source_size");
    }

    if config.syntax.max_parse_depth == 0 || config.syntax.max_parse_depth > ABSOLUTE_MAX_PARSE_DEPTH
    {
        panic!("LIMITS: max_parse_depth must be between 1 and {}", ABSOLUTE_MAX_PARSE_DEPTH);
    }

    if config.syntax.max_lookahead_tokens == 0 {
        panic!("LIMITS: max_lookahead_tokens must be at least 1");
    }

    if config.semantic.max_inference_depth == 0 {
        panic!("LIMITS: max_inference_depth must be at least 1");
    }

    if config.session.max_open_documents == 0 {
        panic!("LIMITS: max_open_documents must be at least 1");
    }

    if config.logging.security_min_log_level > 2 {
        panic!("LIMITS: security_min_log_level too high (max: 2)");
    }

    if profile == "production" && config.lexical.max_source_size > 10_000_000 {
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
    pub mod lexical {{
        pub const MAX_SOURCE_SIZE: usize = {};
        pub const MAX_STRING_SIZE: usize = {};
        pub const MAX_IDENTIFIER_LENGTH: usize = {};
        pub const MAX_COMMENT_LENGTH: usize = {};
        pub const MAX_TOKEN_COUNT: usize = {};
    }}

    pub mod syntax {{
        pub const MAX_PARSE_DEPTH: usize = {};
        pub const MAX_ERROR_HISTORY: usize = {};
        pub const MAX_CONTEXT_STACK_DEPTH: usize = {};
        pub const MAX_RECOVERY_SCAN_TOKENS: usize = {};
        pub const MAX_LOOKAHEAD_TOKENS: usize = {};
        pub const MAX_SYNTAX_DIAGNOSTICS: usize = {};
    }}

    pub mod semantic {{
        pub const MAX_SEMANTIC_DIAGNOSTICS: usize = {};
        pub const MAX_LINE_LENGTH: usize = {};
        pub const MAX_CALL_EXTRACTION: usize = {};
        pub const MAX_INFERENCE_DEPTH: usize = {};
    }}

    pub mod code_actions {{
        pub const MAX_ACTIONS_PER_REQUEST: usize = {};
    }}

    pub mod session {{
        pub const MAX_OPEN_DOCUMENTS: usize = {};
        pub const MAX_PENDING_TICKETS: usize = {};
    }}

    pub mod logging {{
        pub const LOG_BUFFER_SIZE: usize = {};
        pub const MAX_LOG_MESSAGE_LENGTH: usize = {};
        pub const SECURITY_MIN_LOG_LEVEL: u8 = {};
    }}
}}
"#,
        profile,
        // Lexical
        config.lexical.max_source_size,
        config.lexical.max_string_size,
        config.lexical.max_identifier_length,
        config.lexical.max_comment_length,
        config.lexical.max_token_count,
        // Syntax
        config.syntax.max_parse_depth,
        config.syntax.max_error_history,
        config.syntax.max_context_stack_depth,
        config.syntax.max_recovery_scan_tokens,
        config.syntax.max_lookahead_tokens,
        config.syntax.max_syntax_diagnostics,
        // Semantic
        config.semantic.max_semantic_diagnostics,
        config.semantic.max_line_length,
        config.semantic.max_call_extraction,
        config.semantic.max_inference_depth,
        // Code actions
        config.code_actions.max_actions_per_request,
        // Session
        config.session.max_open_documents,
        config.session.max_pending_tickets,
        // Logging
        config.logging.log_buffer_size,
        config.logging.max_log_message_length,
        config.logging.security_min_log_level,
    );

    fs::write(output_path, constants_code).unwrap();
}
