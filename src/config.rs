use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::language::Language;
use crate::processor::Pipeline;
use crate::tokenizer::{AnnotatedTokenizer, tokenizer_for};
use crate::whitespace::WhitespaceNormalizer;

/// Errors loading a pipeline configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Pipeline settings, loadable from a JSON file
///
/// ```json
/// { "language": "hu", "normalize_whitespace": true }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Language of the input; selects the tokenizer
    pub language: Language,
    /// Run the whitespace normalizer stage
    pub normalize_whitespace: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            language: Language::default(),
            normalize_whitespace: true,
        }
    }
}

impl PipelineConfig {
    /// Stages in execution order
    pub fn build_pipeline(&self) -> Pipeline {
        let pipeline = Pipeline::new();
        if self.normalize_whitespace {
            pipeline.with_stage(WhitespaceNormalizer)
        } else {
            pipeline
        }
    }

    pub fn tokenizer(&self) -> AnnotatedTokenizer {
        tokenizer_for(self.language)
    }
}

/// Read a [`PipelineConfig`] from a JSON file; missing fields take defaults
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<PipelineConfig, ConfigError> {
    let path = path.as_ref();
    let display = path.display().to_string();

    let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: display.clone(),
        source,
    })?;
    serde_json::from_str(&json).map_err(|source| ConfigError::Parse {
        path: display,
        source,
    })
}
