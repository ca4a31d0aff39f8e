use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::language::Language;
use crate::offset_map::Segment;
use crate::position::{LineIndex, Position, Span};
use crate::processed_string::ProcessedString;
use crate::session::SessionId;
use crate::tokenizer::Token;

/// A token as reported by the CLI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenJson {
    pub text: String,
    /// Span in the normalized text
    pub current: Span,
    /// Span in the raw input
    pub original: Span,
    /// Where the token starts in the raw input
    pub position: Position,
}

impl TokenJson {
    /// Convert tokens, locating each one in `original_text`
    pub fn from_tokens(tokens: Vec<Token>, original_text: &str) -> Vec<TokenJson> {
        let index = LineIndex::new(original_text);
        tokens
            .into_iter()
            .map(|token| TokenJson {
                position: index.position(token.original.start),
                text: token.text,
                current: token.current,
                original: token.original,
            })
            .collect()
    }
}

/// Result of one preprocessing run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeResponse {
    pub execution_id: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<SessionId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_checksum: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_checksum: Option<String>,
    /// Revision of the final snapshot (number of commits)
    pub version: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub stages: Vec<String>,
    pub tokens: Vec<TokenJson>,
    pub segments: Vec<Segment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Inputs of a successful run
#[derive(Debug)]
pub struct RunSummary<'a> {
    pub session_id: SessionId,
    pub language: Language,
    pub input_checksum: String,
    pub stages: Vec<String>,
    pub result: &'a ProcessedString,
    pub tokens: Vec<TokenJson>,
}

impl NormalizeResponse {
    pub fn success(execution_id: String, summary: RunSummary<'_>) -> Self {
        Self {
            execution_id,
            success: true,
            session_id: Some(summary.session_id),
            language: Some(summary.language),
            input_checksum: Some(summary.input_checksum),
            final_checksum: Some(summary.result.checksum()),
            version: summary.result.version(),
            text: Some(summary.result.text().to_string()),
            stages: summary.stages,
            tokens: summary.tokens,
            segments: summary.result.offset_map().segments().to_vec(),
            error: None,
        }
    }

    pub fn failure(execution_id: String, error: String) -> Self {
        Self {
            execution_id,
            success: false,
            session_id: None,
            language: None,
            input_checksum: None,
            final_checksum: None,
            version: 0,
            text: None,
            stages: Vec::new(),
            tokens: Vec::new(),
            segments: Vec::new(),
            error: Some(error),
        }
    }
}

/// Generate a unique execution id for a CLI run
pub fn generate_execution_id() -> String {
    Uuid::new_v4().to_string()
}
