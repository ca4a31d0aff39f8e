//! Provenance bookkeeping between a snapshot's current text and the raw input.
//!
//! An [`OffsetMap`] is an ordered list of [`Segment`]s whose current spans tile
//! the current text exactly once. Verbatim segments are aligned char by char
//! with the original; edited segments map their whole current span to their
//! whole original span. Deletions survive as edited segments with an empty
//! current span, insertions as edited segments with an empty original span.
//!
//! Maps are never mutated: [`OffsetMap::remap`] derives a successor.

use serde::{Deserialize, Serialize};

use crate::error::EditError;
use crate::position::Span;

/// How a segment's current text relates to its original text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    /// Untouched text, aligned 1:1 with the original
    Verbatim,
    /// Replacement, insertion or deletion; maps as a single unit
    Edited,
}

/// One (current span, original span) pair of an offset map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Segment {
    pub current: Span,
    pub original: Span,
    pub kind: SegmentKind,
}

impl Segment {
    /// Text removed from the original, kept for diagnostics
    pub fn is_deletion(&self) -> bool {
        self.current.is_empty() && !self.original.is_empty()
    }

    /// Text with no original source
    pub fn is_insertion(&self) -> bool {
        self.original.is_empty() && !self.current.is_empty()
    }

    /// Original span backing the current sub-range `[from, to)` of this segment
    fn original_slice(&self, from: usize, to: usize) -> Span {
        match self.kind {
            SegmentKind::Verbatim => Span::new(
                self.original.start + (from - self.current.start),
                self.original.start + (to - self.current.start),
            ),
            SegmentKind::Edited => self.original,
        }
    }
}

/// Mapping from current-text character positions to original-text spans.
///
/// Only built by [`OffsetMap::identity`] and [`OffsetMap::remap`], so the
/// segments always tile `0..current_len`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetMap {
    segments: Vec<Segment>,
    current_len: usize,
    original_len: usize,
}

impl OffsetMap {
    /// Map of an unedited text of `len` characters onto itself
    pub fn identity(len: usize) -> Self {
        let segments = if len == 0 {
            Vec::new()
        } else {
            vec![Segment {
                current: Span::new(0, len),
                original: Span::new(0, len),
                kind: SegmentKind::Verbatim,
            }]
        };

        Self {
            segments,
            current_len: len,
            original_len: len,
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Total length covered by the current spans
    pub fn current_len(&self) -> usize {
        self.current_len
    }

    pub fn original_len(&self) -> usize {
        self.original_len
    }

    /// Index of the non-empty segment containing `pos`; requires `pos < current_len`
    fn segment_index(&self, pos: usize) -> usize {
        self.segments.partition_point(|s| s.current.end <= pos)
    }

    /// Original position of the character at current position `pos`
    pub fn translate(&self, pos: usize) -> Result<usize, EditError> {
        if pos >= self.current_len {
            return Err(EditError::Bounds {
                position: pos,
                len: self.current_len,
            });
        }

        let segment = &self.segments[self.segment_index(pos)];
        Ok(segment.original_slice(pos, pos + 1).start)
    }

    /// Original span the current range `span` derives from
    pub fn span_for(&self, span: Span) -> Result<Span, EditError> {
        if span.start > span.end || span.end > self.current_len {
            let position = if span.start > self.current_len {
                span.start
            } else {
                span.end
            };
            return Err(EditError::Bounds {
                position,
                len: self.current_len,
            });
        }

        if span.is_empty() {
            return Ok(Span::empty(self.boundary(span.start)));
        }

        let first = &self.segments[self.segment_index(span.start)];
        let last = &self.segments[self.segment_index(span.end - 1)];
        let start = first.original_slice(span.start, span.start + 1).start;
        let end = last.original_slice(span.end - 1, span.end).end;

        Ok(Span::new(start, end.max(start)))
    }

    /// Original position of the boundary before current position `pos`
    fn boundary(&self, pos: usize) -> usize {
        if pos >= self.current_len {
            return self.original_len;
        }
        let segment = &self.segments[self.segment_index(pos)];
        segment.original_slice(pos, pos + 1).start
    }

    /// Derive the map that results from applying `edits` to the current text.
    ///
    /// Each edit is a current range plus the character length of its
    /// replacement. Edits must be sorted, non-overlapping and in bounds.
    pub fn remap(&self, edits: &[(Span, usize)]) -> Result<OffsetMap, EditError> {
        let mut previous_end = 0;
        for &(span, _) in edits {
            if span.start > span.end || span.end > self.current_len {
                return Err(EditError::range(span, "outside current text"));
            }
            if span.start < previous_end {
                return Err(EditError::range(
                    span,
                    "overlaps or precedes a previous edit",
                ));
            }
            previous_end = span.end;
        }

        let mut builder = MapBuilder::default();
        let mut cursor = SegmentCursor::new(&self.segments);

        for &(span, replacement_len) in edits {
            cursor.take_until(span.start, |piece| builder.push_shifted(piece));

            let boundary = cursor.original_boundary(self.original_len);
            let mut original: Option<Span> = None;
            cursor.take_until(span.end, |piece| {
                original = Some(match original {
                    None => piece.original,
                    Some(acc) => Span::new(acc.start, acc.end.max(piece.original.end)),
                });
            });
            let original = original.unwrap_or(Span::empty(boundary));

            if replacement_len == 0 && original.is_empty() {
                continue;
            }
            builder.push_edited(replacement_len, original);
        }
        cursor.take_until(self.current_len, |piece| builder.push_shifted(piece));

        Ok(OffsetMap {
            segments: builder.segments,
            current_len: builder.position,
            original_len: self.original_len,
        })
    }
}

/// Walks the segments of a map in current order, handing out clipped pieces
struct SegmentCursor<'a> {
    segments: &'a [Segment],
    index: usize,
    offset: usize,
}

impl<'a> SegmentCursor<'a> {
    fn new(segments: &'a [Segment]) -> Self {
        Self {
            segments,
            index: 0,
            offset: 0,
        }
    }

    /// Emit every piece up to current position `to`.
    /// Empty segments sitting at `to` are emitted too (they belong to the left).
    fn take_until(&mut self, to: usize, mut emit: impl FnMut(Segment)) {
        while let Some(segment) = self.segments.get(self.index) {
            if segment.current.is_empty() {
                if segment.current.start > to {
                    break;
                }
                emit(*segment);
                self.index += 1;
                continue;
            }

            if self.offset >= to {
                break;
            }

            let from = self.offset.max(segment.current.start);
            let until = segment.current.end.min(to);
            emit(Segment {
                current: Span::new(from, until),
                original: segment.original_slice(from, until),
                kind: segment.kind,
            });

            self.offset = until;
            if until == segment.current.end {
                self.index += 1;
            } else {
                break;
            }
        }
    }

    fn original_boundary(&self, original_len: usize) -> usize {
        match self.segments.get(self.index) {
            Some(segment) if !segment.current.is_empty() => segment
                .original_slice(self.offset, self.offset + 1)
                .start,
            Some(segment) => segment.original.start,
            None => original_len,
        }
    }
}

#[derive(Default)]
struct MapBuilder {
    segments: Vec<Segment>,
    position: usize,
}

impl MapBuilder {
    fn push_shifted(&mut self, piece: Segment) {
        let current = Span::new(self.position, self.position + piece.current.len());
        self.position = current.end;
        self.push(Segment { current, ..piece });
    }

    fn push_edited(&mut self, len: usize, original: Span) {
        let current = Span::new(self.position, self.position + len);
        self.position = current.end;
        self.push(Segment {
            current,
            original,
            kind: SegmentKind::Edited,
        });
    }

    fn push(&mut self, segment: Segment) {
        if let Some(last) = self.segments.last_mut() {
            if last.kind == SegmentKind::Verbatim
                && segment.kind == SegmentKind::Verbatim
                && last.current.end == segment.current.start
                && last.original.end == segment.original.start
            {
                last.current.end = segment.current.end;
                last.original.end = segment.original.end;
                return;
            }
        }
        self.segments.push(segment);
    }
}
