//! Span location for evidence sentences
//!
//! Locates evidence sentences inside the abstract they were taken from so
//! the page can highlight them.
//!
//! # Offsets
//!
//! - **Exact match only**: a sentence is located by exact substring search
//! - **First occurrence**: repeated sentences resolve to their first match
//! - **Character offsets**: all offsets count `char`s, not UTF-8 bytes, so they
//!   line up with `text.chars().enumerate()` in the highlighter
//! - **Silent drop**: a sentence that is not in the abstract yields no span

use serde::{Deserialize, Serialize};

/// A half-open character range `[start, end)` into an abstract
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Length in characters
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Find the first exact occurrence of `sentence` and return it as a span
///
/// Returns `None` when the sentence does not occur in `text`.
pub fn find_sentence(text: &str, sentence: &str) -> Option<Span> {
    let byte_offset = text.find(sentence)?;
    let start = text[..byte_offset].chars().count();
    Some(Span::new(start, start + sentence.chars().count()))
}

/// Locate evidence sentences and return sorted start and end offsets
///
/// Each found sentence contributes one start and one end. The two lists are
/// sorted independently, so they only pair up correctly when the matches do
/// not overlap. Use [`locate_spans`] when pairing matters.
///
/// # Arguments
/// * `sentences` - Evidence sentences in report order
/// * `abstract_text` - The abstract the sentences were taken from
///
/// # Returns
/// * `(starts, ends)`, each ascending
pub fn locate<S: AsRef<str>>(sentences: &[S], abstract_text: &str) -> (Vec<usize>, Vec<usize>) {
    let mut starts = Vec::with_capacity(sentences.len());
    let mut ends = Vec::with_capacity(sentences.len());

    for span in sentences
        .iter()
        .filter_map(|sentence| locate_one(abstract_text, sentence.as_ref()))
    {
        starts.push(span.start);
        ends.push(span.end);
    }

    starts.sort_unstable();
    ends.sort_unstable();
    (starts, ends)
}

/// Locate evidence sentences keeping each match as a paired span
///
/// Spans are ordered by start offset (then end offset).
pub fn locate_spans<S: AsRef<str>>(sentences: &[S], abstract_text: &str) -> Vec<Span> {
    let mut spans: Vec<Span> = sentences
        .iter()
        .filter_map(|sentence| locate_one(abstract_text, sentence.as_ref()))
        .collect();
    spans.sort_unstable();
    spans
}

fn locate_one(abstract_text: &str, sentence: &str) -> Option<Span> {
    let span = find_sentence(abstract_text, sentence);
    if span.is_none() {
        tracing::debug!(
            sentence_chars = sentence.chars().count(),
            "Evidence sentence not found in abstract"
        );
    }
    span
}
