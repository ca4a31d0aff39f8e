use tracing::debug;

use crate::error::EditError;
use crate::position::Span;
use crate::processed_string::ProcessedString;

/// A positional edit in base-snapshot character coordinates
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    /// Remove `length` characters starting at `start`
    Delete { start: usize, length: usize },
    /// Replace `length` characters starting at `start` with `text`
    Replace {
        start: usize,
        length: usize,
        text: String,
    },
}

impl Edit {
    pub fn start(&self) -> usize {
        match self {
            Edit::Delete { start, .. } | Edit::Replace { start, .. } => *start,
        }
    }

    pub fn length(&self) -> usize {
        match self {
            Edit::Delete { length, .. } | Edit::Replace { length, .. } => *length,
        }
    }

    /// Text inserted in place of the range (empty for deletions)
    pub fn replacement(&self) -> &str {
        match self {
            Edit::Delete { .. } => "",
            Edit::Replace { text, .. } => text,
        }
    }

    /// Base range covered by this edit; fails if `start + length` overflows
    fn checked_span(&self) -> Result<Span, EditError> {
        let start = self.start();
        start
            .checked_add(self.length())
            .map(|end| Span::new(start, end))
            .ok_or_else(|| EditError::range(Span::empty(start), "length overflows"))
    }
}

/// Single-use edit session against one [`ProcessedString`]
///
/// Edits are queued in base coordinates, in non-decreasing start order and
/// without overlap, then applied together by [`StringEditor::commit`] in one
/// left-to-right pass. Queuing never touches the text, so every position
/// stays valid until the commit.
///
/// # Example
/// ```
/// use textprep::{ProcessedString, Span};
/// let mut editor = ProcessedString::wrap("Hello,  world").open_editor();
/// editor.replace(6, 2, " ").unwrap();
/// let string = editor.commit().unwrap();
/// assert_eq!(string.text(), "Hello, world");
/// assert_eq!(string.original_span_of(Span::new(6, 7)).unwrap(), Span::new(6, 8));
/// ```
#[derive(Debug)]
pub struct StringEditor {
    base: Option<ProcessedString>,
    edits: Vec<(Span, Edit)>,
}

impl StringEditor {
    pub(crate) fn new(base: ProcessedString) -> Self {
        Self {
            base: Some(base),
            edits: Vec::new(),
        }
    }

    /// Snapshot this editor was opened against; `None` once committed
    pub fn base(&self) -> Option<&ProcessedString> {
        self.base.as_ref()
    }

    pub fn is_committed(&self) -> bool {
        self.base.is_none()
    }

    /// Edits queued so far, in queue order
    pub fn pending(&self) -> impl Iterator<Item = &Edit> {
        self.edits.iter().map(|(_, edit)| edit)
    }

    /// Mark `[start, start + length)` for removal
    pub fn delete(&mut self, start: usize, length: usize) -> Result<(), EditError> {
        self.queue(Edit::Delete { start, length })
    }

    /// Replace `[start, start + length)` with `text` (any length, including zero)
    pub fn replace(
        &mut self,
        start: usize,
        length: usize,
        text: impl Into<String>,
    ) -> Result<(), EditError> {
        self.queue(Edit::Replace {
            start,
            length,
            text: text.into(),
        })
    }

    /// Queue an edit after validating it against the base and the queue.
    /// A rejected edit leaves the queue untouched.
    pub fn queue(&mut self, edit: Edit) -> Result<(), EditError> {
        let base = self
            .base
            .as_ref()
            .ok_or_else(|| EditError::State("edit queued after commit".to_string()))?;

        let span = edit.checked_span()?;
        if span.end > base.char_len() {
            return Err(EditError::range(
                span,
                format!("outside base text of length {}", base.char_len()),
            ));
        }
        if let Some((last, _)) = self.edits.last() {
            if span.start < last.end {
                return Err(EditError::range(
                    span,
                    format!("overlaps or precedes queued edit {last}"),
                ));
            }
        }

        self.edits.push((span, edit));
        Ok(())
    }

    /// Apply every queued edit and return the successor snapshot
    ///
    /// Unedited runs are copied verbatim and each edit contributes its
    /// replacement, in queue order. The offset map is derived in the same
    /// call. The editor is dead afterwards: further edits or a second commit
    /// fail with [`EditError::State`].
    pub fn commit(&mut self) -> Result<ProcessedString, EditError> {
        let base = self
            .base
            .take()
            .ok_or_else(|| EditError::State("editor already committed".to_string()))?;
        let edits = std::mem::take(&mut self.edits);

        let mut text = String::with_capacity(base.text().len());
        let mut chars = base.text().chars();
        let mut position = 0;
        let mut remap = Vec::with_capacity(edits.len());

        for (span, edit) in &edits {
            text.extend(chars.by_ref().take(span.start - position));
            if span.len() > 0 {
                chars.by_ref().nth(span.len() - 1);
            }
            position = span.end;

            let replacement = edit.replacement();
            text.push_str(replacement);
            remap.push((*span, replacement.chars().count()));
        }
        text.extend(chars);

        let map = base.offset_map().remap(&remap)?;
        let version = base.version() + 1;

        debug!(
            version,
            edits = edits.len(),
            old_len = base.char_len(),
            new_len = map.current_len(),
            "committed edits"
        );

        Ok(ProcessedString::from_parts(
            text,
            map.current_len(),
            map,
            version,
        ))
    }
}
