use crate::logging::{codes, Code};

/// Failures around the analysis run itself; findings in the source are never errors
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Failed to read '{path}': {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("'{path}' is not an EVAL source file (expected .{expected})")]
    UnsupportedExtension { path: String, expected: &'static str },

    #[error("Pipeline error: {message}")]
    Pipeline { message: String },
}

impl PipelineError {
    pub fn pipeline_error(message: &str) -> Self {
        Self::Pipeline {
            message: message.to_string(),
        }
    }

    pub fn file_read(path: &str, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.to_string(),
            source,
        }
    }

    /// Get error code for global logging system
    pub fn error_code(&self) -> Code {
        match self {
            Self::FileRead { .. } => codes::pipeline::FILE_READ_FAILED,
            Self::UnsupportedExtension { .. } => codes::pipeline::UNSUPPORTED_SOURCE,
            Self::Pipeline { .. } => codes::system::INTERNAL_ERROR,
        }
    }
}
