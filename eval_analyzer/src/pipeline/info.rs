use crate::config::compile_time::{code_actions, lexical, semantic, syntax};
use crate::config::{build_info, constants};

/// Information about pipeline capabilities and the limits it was built with
#[derive(Debug, Clone)]
pub struct PipelineInfo {
    pub stages: Vec<&'static str>,
    pub language_id: &'static str,
    pub source_extension: &'static str,
    pub max_source_size: usize,
    pub max_parse_depth: usize,
    pub max_semantic_diagnostics: usize,
    pub max_actions_per_request: usize,
    pub config_source: String,
}

impl PipelineInfo {
    pub fn report(&self) -> String {
        format!(
            "EVAL Analysis Pipeline:\n\
             - Stages: {}\n\
             - Language: {} (.{})\n\
             - Max Source Size: {} KB\n\
             - Max Parse Depth: {}\n\
             - Max Semantic Diagnostics: {}\n\
             - Max Code Actions: {}\n\
             - Configuration: {}",
            self.stages.join(" -> "),
            self.language_id,
            self.source_extension,
            self.max_source_size / 1024,
            self.max_parse_depth,
            self.max_semantic_diagnostics,
            self.max_actions_per_request,
            self.config_source
        )
    }
}

pub fn get_pipeline_info() -> PipelineInfo {
    PipelineInfo {
        stages: vec!["lex", "parse", "validate"],
        language_id: constants::LANGUAGE_ID,
        source_extension: constants::SOURCE_EXTENSION,
        max_source_size: lexical::MAX_SOURCE_SIZE,
        max_parse_depth: syntax::MAX_PARSE_DEPTH,
        max_semantic_diagnostics: semantic::MAX_SEMANTIC_DIAGNOSTICS,
        max_actions_per_request: code_actions::MAX_ACTIONS_PER_REQUEST,
        config_source: build_info::source_info(),
    }
}
