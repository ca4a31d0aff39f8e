use thiserror::Error;

use crate::position::Span;

/// Errors raised while editing a snapshot or querying its offset map.
///
/// None of these is expected under correct pipeline construction; every
/// variant is an invariant violation and aborts the stage that hit it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EditError {
    /// Edit range out of bounds, overflowing, or overlapping/preceding a queued edit
    #[error("invalid edit range {span}: {reason}")]
    Range { span: Span, reason: String },

    /// Edit queued after commit, or commit called twice
    #[error("editor state error: {0}")]
    State(String),

    /// Offset map query outside the current text
    #[error("position {position} out of bounds (current length: {len})")]
    Bounds { position: usize, len: usize },
}

impl EditError {
    pub(crate) fn range(span: Span, reason: impl Into<String>) -> Self {
        EditError::Range {
            span,
            reason: reason.into(),
        }
    }
}
