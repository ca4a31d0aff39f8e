// Character spans and line/column positions
pub mod position;

// Current-to-original offset mapping
pub mod offset_map;

// Immutable text snapshots
pub mod processed_string;

// Edit sessions
pub mod edit;

// Error types
pub mod error;

// Pipeline stages
pub mod processor;

// Whitespace normalization stage
pub mod whitespace;

// Supported languages
pub mod language;

// Token boundary detection
pub mod tokenizer;

// Translation session identity
pub mod session;

// Pipeline configuration
pub mod config;

// File operations module
pub mod file;

// JSON output module
pub mod json;

// Re-exports
pub use position::{Position, Span, LineIndex, char_to_position};
pub use offset_map::{OffsetMap, Segment, SegmentKind};
pub use processed_string::ProcessedString;
pub use edit::{Edit, StringEditor};
pub use error::EditError;
pub use processor::{TextProcessor, Pipeline};
pub use whitespace::{WhitespaceNormalizer, is_whitespace, scan_whitespace};
pub use language::Language;
pub use tokenizer::{
    Tokenizer, TokenAnnotator, Annotation, AnnotatedTokenizer, Token,
    PunctuationAnnotator, TermAnnotator, HungarianAnnotator,
    tokenizer_for, tokenize_with_provenance,
};
pub use session::{
    SessionId, SessionSequence, SessionBroadcaster, LocalBroadcaster, TranslationSession,
    next_session_id,
};
pub use config::{PipelineConfig, ConfigError, load_config};
pub use file::{FileContent, read_file, FileError};
pub use json::{NormalizeResponse, RunSummary, TokenJson, generate_execution_id};
