use std::ops::Range;

use crate::tokenizer::Offsets;

/// A `NormalizedString` carries a piece of text along with a parallel offsets
/// array mapping every code point back to the range of the ORIGINAL input it
/// originated from. Offsets are expressed in code points of the original
/// input, so a token produced much later in the pipeline can still be located
/// in the text the user provided.
///
/// Invariant: `offsets.len() == normalized.chars().count()` at all times.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedString {
    normalized: String,
    offsets: Vec<Offsets>,
    pre_normalized: bool,
}

impl NormalizedString {
    pub fn new(normalized: String, offsets: Vec<Offsets>, pre_normalized: bool) -> Self {
        debug_assert_eq!(normalized.chars().count(), offsets.len());
        NormalizedString {
            normalized,
            offsets,
            pre_normalized,
        }
    }

    /// The current normalized text
    pub fn get(&self) -> &str {
        &self.normalized
    }

    /// The per-code-point offsets into the original input
    pub fn offsets(&self) -> &[Offsets] {
        &self.offsets
    }

    /// The length in code points
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Whether this fragment was produced by added-vocabulary matching and
    /// must not be normalized again
    pub fn pre_normalized(&self) -> bool {
        self.pre_normalized
    }

    /// Replace the content with the given code points and their offsets. This
    /// is how normalizers rewrite the string while keeping the offsets array
    /// in sync: deletions drop the entry, insertions repeat it.
    pub fn transform<I>(&mut self, dest: I)
    where
        I: IntoIterator<Item = (char, Offsets)>,
    {
        let mut normalized = String::with_capacity(self.normalized.len());
        let mut offsets = Vec::with_capacity(self.offsets.len());
        for (c, offset) in dest {
            normalized.push(c);
            offsets.push(offset);
        }
        self.normalized = normalized;
        self.offsets = offsets;
    }

    /// Extract the given code point range as a new `NormalizedString`
    pub fn slice(&self, range: Range<usize>, pre_normalized: bool) -> NormalizedString {
        let text = self
            .normalized
            .chars()
            .skip(range.start)
            .take(range.end - range.start)
            .collect();
        NormalizedString::new(text, self.offsets[range].to_vec(), pre_normalized)
    }

    pub(crate) fn into_parts(self) -> (String, Vec<Offsets>) {
        (self.normalized, self.offsets)
    }
}

impl From<&str> for NormalizedString {
    fn from(s: &str) -> Self {
        let offsets = (0..s.chars().count()).map(|i| (i, i + 1)).collect();
        NormalizedString::new(s.to_owned(), offsets, false)
    }
}

impl From<String> for NormalizedString {
    fn from(s: String) -> Self {
        let offsets = (0..s.chars().count()).map(|i| (i, i + 1)).collect();
        NormalizedString::new(s, offsets, false)
    }
}
