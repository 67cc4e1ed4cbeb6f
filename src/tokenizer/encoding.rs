use crate::tokenizer::{Offsets, Token};
use crate::utils::padding::PaddingDirection;
use crate::utils::truncation::TruncationDirection;

/// The full output of tokenizing one (or two) input sequences: seven parallel
/// arrays of identical length, plus the fragments removed by truncation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Encoding {
    ids: Vec<u32>,
    type_ids: Vec<u32>,
    tokens: Vec<String>,
    offsets: Vec<Offsets>,
    word_ids: Vec<Option<u32>>,
    special_tokens_mask: Vec<u32>,
    attention_mask: Vec<u32>,
    overflowing: Vec<Encoding>,
}

impl Encoding {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        ids: Vec<u32>,
        type_ids: Vec<u32>,
        tokens: Vec<String>,
        offsets: Vec<Offsets>,
        word_ids: Vec<Option<u32>>,
        special_tokens_mask: Vec<u32>,
        attention_mask: Vec<u32>,
        overflowing: Vec<Encoding>,
    ) -> Self {
        Encoding {
            ids,
            type_ids,
            tokens,
            offsets,
            word_ids,
            special_tokens_mask,
            attention_mask,
            overflowing,
        }
    }

    /// Build an `Encoding` from the model output for one sequence. Word ids
    /// are assigned here: every token starting a new pre-tokenized piece
    /// increments the counter, continuing subwords share their piece's id.
    pub fn from_tokens(tokens: Vec<Token>, type_id: u32) -> Self {
        let length = tokens.len();
        let mut encoding = Encoding {
            ids: Vec::with_capacity(length),
            type_ids: vec![type_id; length],
            tokens: Vec::with_capacity(length),
            offsets: Vec::with_capacity(length),
            word_ids: Vec::with_capacity(length),
            special_tokens_mask: vec![0; length],
            attention_mask: vec![1; length],
            overflowing: vec![],
        };

        let mut next_word: u32 = 0;
        let mut current_word = None;
        for token in tokens {
            if !token.is_continuing_subword {
                current_word = Some(next_word);
                next_word += 1;
            }
            encoding.ids.push(token.id);
            encoding.tokens.push(token.value);
            encoding.offsets.push(token.offsets);
            encoding.word_ids.push(current_word);
        }

        encoding
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn get_ids(&self) -> &[u32] {
        &self.ids
    }

    pub fn get_type_ids(&self) -> &[u32] {
        &self.type_ids
    }

    pub fn get_tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn get_offsets(&self) -> &[Offsets] {
        &self.offsets
    }

    pub fn get_word_ids(&self) -> &[Option<u32>] {
        &self.word_ids
    }

    pub fn get_special_tokens_mask(&self) -> &[u32] {
        &self.special_tokens_mask
    }

    pub fn get_attention_mask(&self) -> &[u32] {
        &self.attention_mask
    }

    pub fn get_overflowing(&self) -> &[Encoding] {
        &self.overflowing
    }

    /// Overwrite every type id with the given one
    pub fn set_type_id(&mut self, type_id: u32) {
        for t in self.type_ids.iter_mut() {
            *t = type_id;
        }
    }

    /// Copy of the `[start, stop)` slice of the seven parallel arrays
    fn slice(&self, start: usize, stop: usize) -> Encoding {
        Encoding {
            ids: self.ids[start..stop].to_vec(),
            type_ids: self.type_ids[start..stop].to_vec(),
            tokens: self.tokens[start..stop].to_vec(),
            offsets: self.offsets[start..stop].to_vec(),
            word_ids: self.word_ids[start..stop].to_vec(),
            special_tokens_mask: self.special_tokens_mask[start..stop].to_vec(),
            attention_mask: self.attention_mask[start..stop].to_vec(),
            overflowing: vec![],
        }
    }

    /// Truncate to `max_length` tokens. The removed portion is preserved as a
    /// list of overflowing encodings, each window overlapping the previous one
    /// by `stride` tokens. With `max_length == 0` the whole encoding moves
    /// into a single overflowing entry. Requires `stride < max_length` when
    /// `max_length > 0`.
    pub fn truncate(&mut self, max_length: usize, stride: usize, direction: TruncationDirection) {
        let length = self.len();
        if max_length >= length {
            return;
        }

        if max_length == 0 {
            let removed = std::mem::take(self);
            self.overflowing.push(removed);
            return;
        }

        debug_assert!(stride < max_length);
        let step = max_length - stride;
        let mut ranges = vec![];
        match direction {
            TruncationDirection::Right => {
                let mut start = 0;
                loop {
                    let stop = usize::min(start + max_length, length);
                    ranges.push((start, stop));
                    if stop == length {
                        break;
                    }
                    start += step;
                }
            }
            TruncationDirection::Left => {
                let mut stop = length;
                loop {
                    let start = stop.saturating_sub(max_length);
                    ranges.push((start, stop));
                    if start == 0 {
                        break;
                    }
                    stop -= step;
                }
            }
        }

        let mut truncated = self.slice(ranges[0].0, ranges[0].1);
        truncated.overflowing = ranges[1..]
            .iter()
            .map(|&(start, stop)| self.slice(start, stop))
            .collect();
        *self = truncated;
    }

    /// Pad to `target_length` tokens on the given side, recursing into the
    /// overflowing encodings. No-op when already long enough.
    pub fn pad(
        &mut self,
        target_length: usize,
        pad_id: u32,
        pad_type_id: u32,
        pad_token: &str,
        direction: PaddingDirection,
    ) {
        for encoding in self.overflowing.iter_mut() {
            encoding.pad(target_length, pad_id, pad_type_id, pad_token, direction);
        }

        if self.len() >= target_length {
            return;
        }
        let pad_length = target_length - self.len();

        match direction {
            PaddingDirection::Left => {
                self.ids.splice(0..0, std::iter::repeat(pad_id).take(pad_length));
                self.type_ids
                    .splice(0..0, std::iter::repeat(pad_type_id).take(pad_length));
                self.tokens
                    .splice(0..0, std::iter::repeat(pad_token.to_owned()).take(pad_length));
                self.offsets
                    .splice(0..0, std::iter::repeat((0, 0)).take(pad_length));
                self.word_ids
                    .splice(0..0, std::iter::repeat(None).take(pad_length));
                self.special_tokens_mask
                    .splice(0..0, std::iter::repeat(1).take(pad_length));
                self.attention_mask
                    .splice(0..0, std::iter::repeat(0).take(pad_length));
            }
            PaddingDirection::Right => {
                self.ids.extend(std::iter::repeat(pad_id).take(pad_length));
                self.type_ids
                    .extend(std::iter::repeat(pad_type_id).take(pad_length));
                self.tokens
                    .extend(std::iter::repeat(pad_token.to_owned()).take(pad_length));
                self.offsets.extend(std::iter::repeat((0, 0)).take(pad_length));
                self.word_ids.extend(std::iter::repeat(None).take(pad_length));
                self.special_tokens_mask
                    .extend(std::iter::repeat(1).take(pad_length));
                self.attention_mask
                    .extend(std::iter::repeat(0).take(pad_length));
            }
        }
    }

    /// Append `other` to this encoding, accumulating its overflowing entries
    pub fn merge_with(&mut self, other: Encoding) {
        self.ids.extend(other.ids);
        self.type_ids.extend(other.type_ids);
        self.tokens.extend(other.tokens);
        self.offsets.extend(other.offsets);
        self.word_ids.extend(other.word_ids);
        self.special_tokens_mask.extend(other.special_tokens_mask);
        self.attention_mask.extend(other.attention_mask);
        self.overflowing.extend(other.overflowing);
    }

    /// Flatten a list of encodings into one by concatenating the seven
    /// parallel arrays in order
    pub fn merge<I>(encodings: I) -> Encoding
    where
        I: IntoIterator<Item = Encoding>,
    {
        let mut merged = Encoding::default();
        for encoding in encodings {
            merged.merge_with(encoding);
        }
        merged
    }
}
