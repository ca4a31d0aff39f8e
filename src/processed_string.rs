use crate::edit::StringEditor;
use crate::error::EditError;
use crate::offset_map::OffsetMap;
use crate::position::Span;

/// Immutable snapshot of text moving through the pipeline
///
/// Holds the current text, the map back to the raw input and a revision
/// number. The only way to derive a successor is [`ProcessedString::open_editor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessedString {
    text: String,
    char_len: usize,
    map: OffsetMap,
    version: u64,
}

impl ProcessedString {
    /// Wrap raw input as revision 0 with an identity offset map
    ///
    /// # Example
    /// ```
    /// use textprep::{ProcessedString, Span};
    /// let string = ProcessedString::wrap("héllo");
    /// assert_eq!(string.version(), 0);
    /// assert_eq!(string.char_len(), 5);
    /// assert_eq!(string.original_span_of(Span::new(1, 3)).unwrap(), Span::new(1, 3));
    /// ```
    pub fn wrap(text: impl Into<String>) -> Self {
        let text = text.into();
        let char_len = text.chars().count();
        Self {
            text,
            char_len,
            map: OffsetMap::identity(char_len),
            version: 0,
        }
    }

    pub(crate) fn from_parts(text: String, char_len: usize, map: OffsetMap, version: u64) -> Self {
        debug_assert_eq!(char_len, map.current_len());
        Self {
            text,
            char_len,
            map,
            version,
        }
    }

    /// Current text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Take ownership of the current text
    pub fn into_text(self) -> String {
        self.text
    }

    /// Length of the current text in characters
    pub fn char_len(&self) -> usize {
        self.char_len
    }

    pub fn is_empty(&self) -> bool {
        self.char_len == 0
    }

    /// Revision number; 0 for freshly wrapped input, +1 per commit
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn offset_map(&self) -> &OffsetMap {
        &self.map
    }

    /// Span of the original input that the current range derives from
    pub fn original_span_of(&self, span: Span) -> Result<Span, EditError> {
        self.map.span_for(span)
    }

    /// BLAKE3 hash of the current text (hex-encoded)
    pub fn checksum(&self) -> String {
        blake3::hash(self.text.as_bytes()).to_hex().to_string()
    }

    /// Start an edit session; the editor owns this snapshot until it commits
    pub fn open_editor(self) -> StringEditor {
        StringEditor::new(self)
    }
}
