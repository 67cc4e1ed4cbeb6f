use std::mem;

use serde::{Deserialize, Serialize};

use crate::tokenizer::{NormalizedString, Offsets};

/// What to do with a delimiter character when splitting.
///
/// When splitting on `'-'` with the input `"the-final--countdown"`:
///   - `Removed` => `[ "the", "final", "countdown" ]`
///   - `Isolated` => `[ "the", "-", "final", "-", "-", "countdown" ]`
///   - `MergedWithPrevious` => `[ "the-", "final-", "-", "countdown" ]`
///   - `MergedWithNext` => `[ "the", "-final", "-", "-countdown" ]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SplitDelimiterBehavior {
    Removed,
    Isolated,
    MergedWithPrevious,
    MergedWithNext,
}

/// One word-like piece of a `PreTokenizedString`, with the per-code-point
/// offsets inherited from the `NormalizedString` it was cut from.
#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    text: String,
    char_offsets: Vec<Offsets>,
}

impl Split {
    pub fn new(text: String, char_offsets: Vec<Offsets>) -> Self {
        debug_assert_eq!(text.chars().count(), char_offsets.len());
        Split { text, char_offsets }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn char_offsets(&self) -> &[Offsets] {
        &self.char_offsets
    }

    /// Offsets of the whole piece in the original input
    pub fn offsets(&self) -> Offsets {
        match (self.char_offsets.first(), self.char_offsets.last()) {
            (Some(first), Some(last)) => (first.0, last.1),
            _ => (0, 0),
        }
    }
}

/// The in-progress result of pre-tokenization: an ordered sequence of pieces,
/// each still carrying its per-code-point offsets so that further splitting
/// keeps the mapping to the original input intact.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreTokenizedString {
    splits: Vec<Split>,
}

impl PreTokenizedString {
    pub fn splits(&self) -> &[Split] {
        &self.splits
    }

    /// Split every piece on the characters matched by `should_split`,
    /// handling the delimiters as dictated by `behavior`. Empty pieces are
    /// never produced.
    pub fn split<F>(&mut self, should_split: F, behavior: SplitDelimiterBehavior)
    where
        F: Fn(char) -> bool,
    {
        let mut result = Vec::with_capacity(self.splits.len() * 2);
        for split in self.splits.drain(..) {
            let mut text = String::with_capacity(split.text.len());
            let mut offsets: Vec<Offsets> = Vec::with_capacity(split.char_offsets.len());
            for (c, offset) in split.text.chars().zip(split.char_offsets.iter().copied()) {
                if should_split(c) {
                    match behavior {
                        SplitDelimiterBehavior::Removed => {
                            flush(&mut result, &mut text, &mut offsets);
                        }
                        SplitDelimiterBehavior::Isolated => {
                            flush(&mut result, &mut text, &mut offsets);
                            result.push(Split::new(c.to_string(), vec![offset]));
                        }
                        SplitDelimiterBehavior::MergedWithPrevious => {
                            text.push(c);
                            offsets.push(offset);
                            flush(&mut result, &mut text, &mut offsets);
                        }
                        SplitDelimiterBehavior::MergedWithNext => {
                            flush(&mut result, &mut text, &mut offsets);
                            text.push(c);
                            offsets.push(offset);
                        }
                    }
                } else {
                    text.push(c);
                    offsets.push(offset);
                }
            }
            flush(&mut result, &mut text, &mut offsets);
        }
        self.splits = result;
    }
}

fn flush(result: &mut Vec<Split>, text: &mut String, offsets: &mut Vec<Offsets>) {
    if !text.is_empty() {
        result.push(Split::new(mem::take(text), mem::take(offsets)));
    }
}

impl From<NormalizedString> for PreTokenizedString {
    fn from(normalized: NormalizedString) -> Self {
        PreTokenizedString::from(vec![normalized])
    }
}

impl From<Vec<NormalizedString>> for PreTokenizedString {
    fn from(normalized: Vec<NormalizedString>) -> Self {
        PreTokenizedString {
            splits: normalized
                .into_iter()
                .filter(|n| !n.is_empty())
                .map(|n| {
                    let (text, offsets) = n.into_parts();
                    Split::new(text, offsets)
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pre_tokenized(s: &str) -> PreTokenizedString {
        PreTokenizedString::from(NormalizedString::from(s))
    }

    fn pieces(p: &PreTokenizedString) -> Vec<(&str, Offsets)> {
        p.splits().iter().map(|s| (s.text(), s.offsets())).collect()
    }

    #[test]
    fn split_removed() {
        let mut input = pre_tokenized("the-final--countdown");
        input.split(|c| c == '-', SplitDelimiterBehavior::Removed);
        assert_eq!(
            pieces(&input),
            vec![("the", (0, 3)), ("final", (4, 9)), ("countdown", (11, 20))]
        );
    }

    #[test]
    fn split_isolated() {
        let mut input = pre_tokenized("the-final--countdown");
        input.split(|c| c == '-', SplitDelimiterBehavior::Isolated);
        assert_eq!(
            pieces(&input),
            vec![
                ("the", (0, 3)),
                ("-", (3, 4)),
                ("final", (4, 9)),
                ("-", (9, 10)),
                ("-", (10, 11)),
                ("countdown", (11, 20)),
            ]
        );
    }

    #[test]
    fn split_merged_with_previous() {
        let mut input = pre_tokenized("the-final--countdown");
        input.split(|c| c == '-', SplitDelimiterBehavior::MergedWithPrevious);
        assert_eq!(
            pieces(&input),
            vec![
                ("the-", (0, 4)),
                ("final-", (4, 10)),
                ("-", (10, 11)),
                ("countdown", (11, 20)),
            ]
        );
    }

    #[test]
    fn split_merged_with_next() {
        let mut input = pre_tokenized("the-final--countdown");
        input.split(|c| c == '-', SplitDelimiterBehavior::MergedWithNext);
        assert_eq!(
            pieces(&input),
            vec![
                ("the", (0, 3)),
                ("-final", (3, 9)),
                ("-", (9, 10)),
                ("-countdown", (10, 20)),
            ]
        );
    }

    #[test]
    fn empty_input_has_no_pieces() {
        let mut input = pre_tokenized("");
        input.split(char::is_whitespace, SplitDelimiterBehavior::Removed);
        assert!(input.splits().is_empty());
    }

    #[test]
    fn split_across_multiple_pieces() {
        let mut input = PreTokenizedString::from(vec![
            NormalizedString::from("a b"),
            NormalizedString::from("c d"),
        ]);
        input.split(char::is_whitespace, SplitDelimiterBehavior::Removed);
        let texts: Vec<_> = input.splits().iter().map(|s| s.text()).collect();
        assert_eq!(texts, vec!["a", "b", "c", "d"]);
    }
}
