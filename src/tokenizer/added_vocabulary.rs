use std::collections::{HashMap, HashSet};

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::tokenizer::NormalizedString;

fn default_special() -> bool {
    true
}

/// A token registered on top of the model vocabulary. Added tokens are
/// matched literally in the raw input, before normalization gets a chance to
/// mangle them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddedToken {
    pub id: u32,
    pub content: String,
    /// Only match when surrounded by word boundaries
    #[serde(default)]
    pub single_word: bool,
    /// Absorb whitespace on the left of a match
    #[serde(default)]
    pub lstrip: bool,
    /// Absorb whitespace on the right of a match
    #[serde(default)]
    pub rstrip: bool,
    #[serde(default)]
    pub normalized: bool,
    #[serde(default = "default_special")]
    pub special_token: bool,
}

impl AddedToken {
    pub fn new<S: Into<String>>(id: u32, content: S, special_token: bool) -> Self {
        AddedToken {
            id,
            content: content.into(),
            single_word: false,
            lstrip: false,
            rstrip: false,
            normalized: false,
            special_token,
        }
    }

    pub fn single_word(mut self, single_word: bool) -> Self {
        self.single_word = single_word;
        self
    }

    pub fn lstrip(mut self, lstrip: bool) -> Self {
        self.lstrip = lstrip;
        self
    }

    pub fn rstrip(mut self, rstrip: bool) -> Self {
        self.rstrip = rstrip;
        self
    }

    pub fn normalized(mut self, normalized: bool) -> Self {
        self.normalized = normalized;
        self
    }
}

/// The set of added tokens, with the machinery to recognize their literal
/// occurrences in an incoming string and carve them out before the rest of
/// the pipeline runs.
#[derive(Debug, Clone)]
pub struct AddedVocabulary {
    added_tokens: Vec<AddedToken>,
    added_tokens_map: HashMap<String, u32>,
    added_tokens_map_r: HashMap<u32, String>,
    tokens_by_content: HashMap<String, AddedToken>,
    special_tokens: HashSet<String>,
    split_re: Option<Regex>,
}

impl AddedVocabulary {
    pub fn new(tokens: Vec<AddedToken>) -> Self {
        let mut added_tokens_map = HashMap::with_capacity(tokens.len());
        let mut added_tokens_map_r = HashMap::with_capacity(tokens.len());
        let mut tokens_by_content = HashMap::with_capacity(tokens.len());
        let mut special_tokens = HashSet::new();
        for token in &tokens {
            added_tokens_map.insert(token.content.clone(), token.id);
            added_tokens_map_r.insert(token.id, token.content.clone());
            tokens_by_content.insert(token.content.clone(), token.clone());
            if token.special_token {
                special_tokens.insert(token.content.clone());
            }
        }

        // Longer contents first so the alternation prefers the longest match
        // at any given position.
        let mut patterns: Vec<&str> = tokens
            .iter()
            .map(|t| t.content.as_str())
            .filter(|c| !c.is_empty())
            .collect();
        patterns.sort_by_key(|c| std::cmp::Reverse(c.chars().count()));
        let split_re = if patterns.is_empty() {
            None
        } else {
            let pattern = patterns
                .iter()
                .map(|c| regex::escape(c))
                .collect::<Vec<_>>()
                .join("|");
            Regex::new(&pattern).ok()
        };

        AddedVocabulary {
            added_tokens: tokens,
            added_tokens_map,
            added_tokens_map_r,
            tokens_by_content,
            special_tokens,
            split_re,
        }
    }

    pub fn len(&self) -> usize {
        self.added_tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.added_tokens.is_empty()
    }

    pub fn get_tokens(&self) -> &[AddedToken] {
        &self.added_tokens
    }

    /// The added token -> id mapping
    pub fn get_vocab(&self) -> &HashMap<String, u32> {
        &self.added_tokens_map
    }

    pub fn token_to_id(&self, token: &str) -> Option<u32> {
        self.added_tokens_map.get(token).copied()
    }

    pub fn id_to_token(&self, id: u32) -> Option<&str> {
        self.added_tokens_map_r.get(&id).map(String::as_str)
    }

    /// Whether the given content belongs to a token flagged as special
    pub fn is_special_token(&self, token: &str) -> bool {
        self.special_tokens.contains(token)
    }

    /// Partition the input at the literal occurrences of the added tokens.
    /// The returned fragments alternate between plain spans, to be normalized
    /// downstream, and matched spans flagged `pre_normalized` so the
    /// normalizer leaves them untouched. Matching is left to right, longest
    /// content first at equal positions.
    pub fn find_splits(&self, input: NormalizedString) -> Vec<NormalizedString> {
        let split_re = match &self.split_re {
            Some(re) if !input.is_empty() => re,
            _ => return vec![input],
        };

        let chars: Vec<char> = input.get().chars().collect();
        let mut char_index = HashMap::with_capacity(chars.len() + 1);
        for (char_pos, (byte_pos, _)) in input.get().char_indices().enumerate() {
            char_index.insert(byte_pos, char_pos);
        }
        char_index.insert(input.get().len(), chars.len());

        let mut ranges: Vec<(usize, usize)> = vec![];
        for m in split_re.find_iter(input.get()) {
            let token = &self.tokens_by_content[m.as_str()];
            let mut start = char_index[&m.start()];
            let mut stop = char_index[&m.end()];

            if token.single_word {
                let starts_word = start == 0 || chars[start - 1] == ' ';
                let ends_word = stop == chars.len() || chars[stop] == ' ';
                if !starts_word || !ends_word {
                    continue;
                }
            }

            // Whitespace stripping never crosses into a previous match.
            let floor = ranges.last().map_or(0, |&(_, prev_stop)| prev_stop);
            if token.lstrip {
                while start > floor && chars[start - 1].is_whitespace() {
                    start -= 1;
                }
            }
            if token.rstrip {
                while stop < chars.len() && chars[stop].is_whitespace() {
                    stop += 1;
                }
            }
            let start = usize::max(start, floor);
            if start < stop {
                ranges.push((start, stop));
            }
        }

        if ranges.is_empty() {
            return vec![input];
        }

        let mut splits = Vec::with_capacity(ranges.len() * 2 + 1);
        let mut cursor = 0;
        for (start, stop) in ranges {
            if start > cursor {
                splits.push(input.slice(cursor..start, false));
            }
            splits.push(input.slice(start..stop, true));
            cursor = stop;
        }
        if cursor < input.len() {
            splits.push(input.slice(cursor..input.len(), false));
        }
        splits
    }
}

impl Default for AddedVocabulary {
    fn default() -> Self {
        AddedVocabulary::new(vec![])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn splits_of(vocabulary: &AddedVocabulary, input: &str) -> Vec<(String, bool)> {
        vocabulary
            .find_splits(NormalizedString::from(input))
            .into_iter()
            .map(|s| (s.get().to_owned(), s.pre_normalized()))
            .collect()
    }

    #[test]
    fn special_token_membership() {
        let vocabulary = AddedVocabulary::new(vec![AddedToken::new(0, "[UNK]", true)]);
        assert!(vocabulary.is_special_token("[UNK]"));
        assert!(!vocabulary.is_special_token("[CLS]"));
    }

    #[test]
    fn finds_special_token() {
        let vocabulary = AddedVocabulary::new(vec![AddedToken::new(0, "[MASK]", true)]);
        let splits = vocabulary.find_splits(NormalizedString::from("Capital of India is [MASK]"));
        assert_eq!(splits.len(), 2);
        assert_eq!(splits[0].get(), "Capital of India is ");
        assert!(!splits[0].pre_normalized());
        assert_eq!(splits[1].get(), "[MASK]");
        assert!(splits[1].pre_normalized());
        assert_eq!(splits[1].offsets()[0], (20, 21));
        assert_eq!(splits[1].offsets()[5], (25, 26));
    }

    #[test]
    fn single_word_boundaries() {
        let vocabulary =
            AddedVocabulary::new(vec![AddedToken::new(0, "India", false).single_word(true)]);
        assert_eq!(
            splits_of(&vocabulary, "Capital of India is [MASK]"),
            vec![
                ("Capital of ".to_owned(), false),
                ("India".to_owned(), true),
                (" is [MASK]".to_owned(), false),
            ]
        );
        // A preceding letter disqualifies the match entirely
        assert_eq!(
            splits_of(&vocabulary, "Capital of MyIndia is [MASK]"),
            vec![("Capital of MyIndia is [MASK]".to_owned(), false)]
        );
        // So does a following one
        assert_eq!(
            splits_of(&vocabulary, "Capital of Indias is [MASK]"),
            vec![("Capital of Indias is [MASK]".to_owned(), false)]
        );
    }

    #[test]
    fn lstrip_absorbs_left_whitespace() {
        let vocabulary =
            AddedVocabulary::new(vec![AddedToken::new(0, "India", false).lstrip(true)]);
        assert_eq!(
            splits_of(&vocabulary, "Capital of India is [MASK]"),
            vec![
                ("Capital of".to_owned(), false),
                (" India".to_owned(), true),
                (" is [MASK]".to_owned(), false),
            ]
        );
    }

    #[test]
    fn rstrip_absorbs_right_whitespace() {
        let vocabulary =
            AddedVocabulary::new(vec![AddedToken::new(0, "India", false).rstrip(true)]);
        assert_eq!(
            splits_of(&vocabulary, "Capital of India is [MASK]"),
            vec![
                ("Capital of ".to_owned(), false),
                ("India ".to_owned(), true),
                ("is [MASK]".to_owned(), false),
            ]
        );
    }

    #[test]
    fn lstrip_and_rstrip() {
        let vocabulary = AddedVocabulary::new(vec![AddedToken::new(0, "India", false)
            .lstrip(true)
            .rstrip(true)]);
        assert_eq!(
            splits_of(&vocabulary, "Capital of India is [MASK]"),
            vec![
                ("Capital of".to_owned(), false),
                (" India ".to_owned(), true),
                ("is [MASK]".to_owned(), false),
            ]
        );
    }

    #[test]
    fn longest_content_wins() {
        let vocabulary = AddedVocabulary::new(vec![
            AddedToken::new(0, "[MASK]", true),
            AddedToken::new(1, "[MASK]S", true),
        ]);
        assert_eq!(
            splits_of(&vocabulary, "a [MASK]S b"),
            vec![
                ("a ".to_owned(), false),
                ("[MASK]S".to_owned(), true),
                (" b".to_owned(), false),
            ]
        );
    }

    #[test]
    fn no_added_tokens_passes_through() {
        let vocabulary = AddedVocabulary::default();
        assert_eq!(
            splits_of(&vocabulary, "nothing to see"),
            vec![("nothing to see".to_owned(), false)]
        );
    }

    #[test]
    fn adjacent_matches() {
        let vocabulary = AddedVocabulary::new(vec![AddedToken::new(0, "[SEP]", true)]);
        assert_eq!(
            splits_of(&vocabulary, "[SEP][SEP]"),
            vec![("[SEP]".to_owned(), true), ("[SEP]".to_owned(), true)]
        );
    }
}
