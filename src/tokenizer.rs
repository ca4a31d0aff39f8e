//! Token boundary detection for prepared text.
//!
//! A [`Tokenizer`] only reports current-position spans. Provenance in the raw
//! input comes from the snapshot's offset map, see [`tokenize_with_provenance`].
//!
//! [`AnnotatedTokenizer`] composes an ordered list of independent
//! [`TokenAnnotator`]s. Each annotator marks split points or protects ranges
//! on a shared [`Annotation`]; a boundary splits a word when some annotator
//! asked for it and none protected it. Whitespace never belongs to a token.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::EditError;
use crate::language::Language;
use crate::position::Span;
use crate::processed_string::ProcessedString;
use crate::whitespace::is_whitespace;

/// Produces token boundaries for prepared text
pub trait Tokenizer {
    /// Ordered, non-overlapping token spans in character positions
    fn tokenize(&self, text: &str) -> Vec<Span>;
}

/// Split points and protected boundaries over a text's characters
///
/// Boundary `i` sits before character `i`; there are `len + 1` of them.
#[derive(Debug, Clone)]
pub struct Annotation {
    chars: Vec<char>,
    splits: Vec<bool>,
    protected: Vec<bool>,
}

impl Annotation {
    pub fn new(text: &str) -> Self {
        let chars: Vec<char> = text.chars().collect();
        let boundaries = chars.len() + 1;
        Self {
            chars,
            splits: vec![false; boundaries],
            protected: vec![false; boundaries],
        }
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Request a split at boundary `pos`
    pub fn split(&mut self, pos: usize) {
        if let Some(flag) = self.splits.get_mut(pos) {
            *flag = true;
        }
    }

    /// Forbid splits strictly inside `span`
    pub fn protect(&mut self, span: Span) {
        for pos in span.start + 1..span.end {
            if let Some(flag) = self.protected.get_mut(pos) {
                *flag = true;
            }
        }
    }

    /// Maximal runs of non-whitespace characters
    pub fn words(&self) -> Vec<Span> {
        let mut words = Vec::new();
        let mut start = None;
        for (i, c) in self.chars.iter().enumerate() {
            match (is_whitespace(*c), start) {
                (true, Some(s)) => {
                    words.push(Span::new(s, i));
                    start = None;
                }
                (false, None) => start = Some(i),
                _ => {}
            }
        }
        if let Some(s) = start {
            words.push(Span::new(s, self.chars.len()));
        }
        words
    }

    /// Final token spans
    pub fn tokens(&self) -> Vec<Span> {
        let mut tokens = Vec::new();
        for word in self.words() {
            let mut start = word.start;
            for pos in word.start + 1..word.end {
                if self.splits[pos] && !self.protected[pos] {
                    tokens.push(Span::new(start, pos));
                    start = pos;
                }
            }
            tokens.push(Span::new(start, word.end));
        }
        tokens
    }
}

/// One independent matcher contributing to tokenization
pub trait TokenAnnotator: Send + Sync {
    fn name(&self) -> &str;

    fn annotate(&self, annotation: &mut Annotation);
}

fn is_punctuation(c: char) -> bool {
    c.is_ascii_punctuation()
        || matches!(
            c,
            '«' | '»' | '“' | '”' | '„' | '‘' | '’' | '…' | '¿' | '¡' | '–' | '—'
        )
}

/// Splits punctuation off words
///
/// Decimal and thousands separators between digits ("3.14", "1,000") and
/// apostrophes between letters ("don't") stay inside the word.
#[derive(Debug, Clone, Copy, Default)]
pub struct PunctuationAnnotator;

impl TokenAnnotator for PunctuationAnnotator {
    fn name(&self) -> &str {
        "punctuation"
    }

    fn annotate(&self, annotation: &mut Annotation) {
        let chars = annotation.chars().to_vec();
        for (i, &c) in chars.iter().enumerate() {
            if !is_punctuation(c) {
                continue;
            }

            let prev = i.checked_sub(1).and_then(|p| chars.get(p)).copied();
            let next = chars.get(i + 1).copied();
            let between = |test: fn(&char) -> bool| {
                prev.as_ref().is_some_and(test) && next.as_ref().is_some_and(test)
            };

            let internal = match c {
                '.' | ',' | ':' => between(char::is_ascii_digit),
                '\'' | '’' => between(|c| c.is_alphabetic()),
                _ => false,
            };
            if !internal {
                annotation.split(i);
                annotation.split(i + 1);
            }
        }
    }
}

/// Keeps listed terms whole when a word starts with one of them
///
/// A term matches a whole word, or a word prefix followed by closing
/// punctuation ("etc.," keeps "etc." whole).
#[derive(Debug, Clone)]
pub struct TermAnnotator {
    name: &'static str,
    terms: Vec<Vec<char>>,
    ignore_case: bool,
}

const CLOSING: &[char] = &[',', ';', ':', '!', '?', ')', ']', '"', '»', '”', '’'];

impl TermAnnotator {
    pub fn new(name: &'static str, terms: &[&str], ignore_case: bool) -> Self {
        let terms = terms
            .iter()
            .map(|t| {
                if ignore_case {
                    t.to_lowercase().chars().collect()
                } else {
                    t.chars().collect()
                }
            })
            .collect();
        Self {
            name,
            terms,
            ignore_case,
        }
    }

    /// Abbreviations shared by the supported languages
    pub fn common_terms() -> Self {
        Self::new(
            "common-terms",
            &[
                "e.g.", "i.e.", "etc.", "vs.", "Mr.", "Mrs.", "Ms.", "Dr.", "Prof.", "St.",
                "U.S.", "U.K.", "a.m.", "p.m.", "No.",
            ],
            false,
        )
    }

    fn matches_at(&self, word: &[char], term: &[char]) -> bool {
        if word.len() < term.len() {
            return false;
        }
        let prefix_matches = word.iter().zip(term).all(|(w, t)| {
            if self.ignore_case {
                w.to_lowercase().eq(std::iter::once(*t))
            } else {
                w == t
            }
        });
        prefix_matches && word.get(term.len()).is_none_or(|c| CLOSING.contains(c))
    }
}

impl TokenAnnotator for TermAnnotator {
    fn name(&self) -> &str {
        self.name
    }

    fn annotate(&self, annotation: &mut Annotation) {
        for word in annotation.words() {
            let chars = &annotation.chars()[word.start..word.end];
            let matched = self
                .terms
                .iter()
                .find(|term| self.matches_at(chars, term))
                .map(|term| term.len());
            if let Some(len) = matched {
                annotation.protect(Span::new(word.start, word.start + len));
                annotation.split(word.start + len);
            }
        }
    }
}

/// Hungarian ordinals ("3." means "third") and abbreviations
#[derive(Debug, Clone)]
pub struct HungarianAnnotator {
    abbreviations: TermAnnotator,
}

impl Default for HungarianAnnotator {
    fn default() -> Self {
        Self {
            abbreviations: TermAnnotator::new(
                "hungarian-abbreviations",
                &["pl.", "stb.", "kb.", "ill.", "ún.", "vö.", "sz.", "dr.", "ld."],
                true,
            ),
        }
    }
}

impl TokenAnnotator for HungarianAnnotator {
    fn name(&self) -> &str {
        "hungarian"
    }

    fn annotate(&self, annotation: &mut Annotation) {
        for word in annotation.words() {
            let chars = &annotation.chars()[word.start..word.end];
            let digits = chars.iter().take_while(|c| c.is_ascii_digit()).count();
            if digits > 0 && chars.get(digits) == Some(&'.') {
                let end = word.start + digits + 1;
                if chars.get(digits + 1).is_none_or(|c| CLOSING.contains(c)) {
                    annotation.protect(Span::new(word.start, end));
                    annotation.split(end);
                }
            }
        }
        self.abbreviations.annotate(annotation);
    }
}

/// Tokenizer built from an ordered list of annotators
pub struct AnnotatedTokenizer {
    language: Language,
    annotators: Vec<Box<dyn TokenAnnotator>>,
}

impl AnnotatedTokenizer {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            annotators: Vec::new(),
        }
    }

    pub fn with_annotator(mut self, annotator: impl TokenAnnotator + 'static) -> Self {
        self.annotators.push(Box::new(annotator));
        self
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn annotator_names(&self) -> Vec<&str> {
        self.annotators.iter().map(|a| a.name()).collect()
    }
}

impl Tokenizer for AnnotatedTokenizer {
    fn tokenize(&self, text: &str) -> Vec<Span> {
        let mut annotation = Annotation::new(text);
        for annotator in &self.annotators {
            annotator.annotate(&mut annotation);
        }
        annotation.tokens()
    }
}

impl std::fmt::Debug for AnnotatedTokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnnotatedTokenizer")
            .field("language", &self.language)
            .field("annotators", &self.annotator_names())
            .finish()
    }
}

/// Tokenizer configured for `language`
pub fn tokenizer_for(language: Language) -> AnnotatedTokenizer {
    let tokenizer = AnnotatedTokenizer::new(language);
    let tokenizer = match language {
        Language::Hungarian => tokenizer.with_annotator(HungarianAnnotator::default()),
        _ => tokenizer,
    };
    tokenizer
        .with_annotator(TermAnnotator::common_terms())
        .with_annotator(PunctuationAnnotator)
}

/// A token with its position in the current text and in the raw input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub current: Span,
    pub original: Span,
}

/// Tokenize a snapshot and trace every token back to the raw input
pub fn tokenize_with_provenance(
    tokenizer: &dyn Tokenizer,
    string: &ProcessedString,
) -> Result<Vec<Token>, EditError> {
    let text = string.text();
    let byte_offsets: Vec<usize> = text
        .char_indices()
        .map(|(b, _)| b)
        .chain(std::iter::once(text.len()))
        .collect();

    let tokens = tokenizer
        .tokenize(text)
        .into_iter()
        .map(|span| {
            let original = string.original_span_of(span)?;
            Ok(Token {
                text: text[byte_offsets[span.start]..byte_offsets[span.end]].to_string(),
                current: span,
                original,
            })
        })
        .collect::<Result<Vec<_>, EditError>>()?;

    debug!(tokens = tokens.len(), version = string.version(), "tokenized");
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::TextProcessor;
    use crate::whitespace::WhitespaceNormalizer;

    fn words(language: Language, text: &str) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        tokenizer_for(language)
            .tokenize(text)
            .into_iter()
            .map(|s| chars[s.start..s.end].iter().collect())
            .collect()
    }

    #[test]
    fn test_punctuation_split() {
        assert_eq!(
            words(Language::English, "Hello, world!"),
            vec!["Hello", ",", "world", "!"]
        );
    }

    #[test]
    fn test_numbers_and_contractions_stay_whole() {
        assert_eq!(
            words(Language::English, "don't pay 1,000.50 (now)"),
            vec!["don't", "pay", "1,000.50", "(", "now", ")"]
        );
    }

    #[test]
    fn test_common_terms() {
        assert_eq!(
            words(Language::Italian, "e.g. Dr. Rossi, etc., fine."),
            vec!["e.g.", "Dr.", "Rossi", ",", "etc.", ",", "fine", "."]
        );
    }

    #[test]
    fn test_hungarian_ordinals_and_abbreviations() {
        assert_eq!(
            words(Language::Hungarian, "A 3. fejezet, pl. ez."),
            vec!["A", "3.", "fejezet", ",", "pl.", "ez", "."]
        );
        // Other languages split the ordinal dot
        assert_eq!(words(Language::English, "the 3. item"), vec!["the", "3", ".", "item"]);
    }

    #[test]
    fn test_annotator_order() {
        assert_eq!(
            tokenizer_for(Language::Hungarian).annotator_names(),
            vec!["hungarian", "common-terms", "punctuation"]
        );
        assert_eq!(
            tokenizer_for(Language::French).annotator_names(),
            vec!["common-terms", "punctuation"]
        );
    }

    #[test]
    fn test_empty_and_blank_text() {
        assert!(tokenizer_for(Language::English).tokenize("").is_empty());
        assert!(tokenizer_for(Language::English).tokenize(" \t ").is_empty());
    }

    #[test]
    fn test_tokens_trace_to_raw_input() {
        let raw = "  Hello,\u{00A0}\u{00A0}wörld! ";
        let string = WhitespaceNormalizer.process(ProcessedString::wrap(raw)).unwrap();
        assert_eq!(string.text(), "Hello, wörld!");

        let tokens = tokenize_with_provenance(&tokenizer_for(Language::English), &string).unwrap();
        let summary: Vec<(&str, Span)> = tokens.iter().map(|t| (t.text.as_str(), t.original)).collect();

        assert_eq!(
            summary,
            vec![
                ("Hello", Span::new(2, 7)),
                (",", Span::new(7, 8)),
                ("wörld", Span::new(10, 15)),
                ("!", Span::new(15, 16)),
            ]
        );
    }

    /// Reports a span past the end of the text
    struct BrokenTokenizer;

    impl Tokenizer for BrokenTokenizer {
        fn tokenize(&self, _text: &str) -> Vec<Span> {
            vec![Span::new(0, 100)]
        }
    }

    #[test]
    fn test_out_of_bounds_token_is_an_error() {
        let string = ProcessedString::wrap("short");
        let result = tokenize_with_provenance(&BrokenTokenizer, &string);

        assert!(matches!(result, Err(EditError::Bounds { .. })));
    }
}
