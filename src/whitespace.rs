//! Whitespace normalization stage.
//!
//! Runs of whitespace between words collapse to a single ASCII space. A run
//! at the start of the text is deleted, and so is a run at the end, since
//! nothing follows it.
//!
//! The work is split in two passes: [`scan_whitespace`] only classifies the
//! text and returns edit intents, then [`WhitespaceNormalizer`] queues them
//! on an editor and commits.

use tracing::debug;

use crate::edit::Edit;
use crate::error::EditError;
use crate::processed_string::ProcessedString;
use crate::processor::TextProcessor;

/// Whitespace predicate used by the normalizer
///
/// A fixed code-point set, independent of locale: U+0009..=U+000D, space,
/// no-break space, Ogham space mark, U+2000..=U+200A, narrow no-break space,
/// medium mathematical space and ideographic space. Unlike
/// [`char::is_whitespace`] it leaves U+0085, U+2028 and U+2029 alone.
pub fn is_whitespace(c: char) -> bool {
    matches!(
        c,
        '\u{0009}'..='\u{000D}'
            | '\u{0020}'
            | '\u{00A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
    )
}

/// Compute the whitespace edits for `text`, in character coordinates.
///
/// The returned edits are sorted and non-overlapping. An interior run that
/// already is a single ASCII space needs no edit and is skipped, so
/// normalized text scans to nothing.
pub fn scan_whitespace(text: &str) -> Vec<Edit> {
    let mut edits = Vec::new();
    let mut sentence_begin = true;
    // Start of the open run and its first char
    let mut whitespace_start: Option<(usize, char)> = None;
    let mut len = 0;

    for (i, c) in text.chars().enumerate() {
        len = i + 1;

        if is_whitespace(c) {
            if whitespace_start.is_none() {
                whitespace_start = Some((i, c));
            }
            continue;
        }

        if let Some((start, first)) = whitespace_start.take() {
            let length = i - start;
            if sentence_begin {
                edits.push(Edit::Delete { start, length });
            // A lone ASCII space is already normalized; leave it verbatim
            } else if length > 1 || first != ' ' {
                edits.push(Edit::Replace {
                    start,
                    length,
                    text: " ".to_string(),
                });
            }
        }
        sentence_begin = false;
    }

    if let Some((start, _)) = whitespace_start {
        edits.push(Edit::Delete {
            start,
            length: len - start,
        });
    }

    edits
}

/// Collapses interior whitespace runs and trims both ends
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceNormalizer;

impl TextProcessor for WhitespaceNormalizer {
    fn name(&self) -> &str {
        "whitespace"
    }

    fn process(&self, string: ProcessedString) -> Result<ProcessedString, EditError> {
        let edits = scan_whitespace(string.text());
        debug!(edits = edits.len(), "whitespace scan");

        let mut editor = string.open_editor();
        for edit in edits {
            editor.queue(edit)?;
        }
        editor.commit()
    }
}
