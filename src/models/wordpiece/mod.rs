//! [WordPiece](https://static.googleusercontent.com/media/research.google.com/en//pubs/archive/37842.pdf)
//! model.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::models::OrderedVocabIter;
use crate::tokenizer::{Model, Offsets, Result, Token};

#[derive(Debug)]
pub enum Error {
    MissingUnkToken,
}
impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::MissingUnkToken => write!(
                fmt,
                "WordPiece error: Missing [UNK] token from the vocabulary"
            ),
        }
    }
}

type Vocab = HashMap<String, u32>;
type VocabR = HashMap<u32, String>;

struct Config {
    vocab: Vocab,
    unk_token: String,
    continuing_subword_prefix: String,
    max_input_chars_per_word: usize,
}

/// A `WordPieceBuilder` can be used to create a `WordPiece` model with a custom configuration.
pub struct WordPieceBuilder {
    config: Config,
}

impl Default for WordPieceBuilder {
    fn default() -> Self {
        Self {
            config: Config {
                vocab: HashMap::new(),
                unk_token: String::from("[UNK]"),
                continuing_subword_prefix: String::from("##"),
                max_input_chars_per_word: 100,
            },
        }
    }
}

impl WordPieceBuilder {
    /// Construct a new `WordPieceBuilder`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the vocab (token -> ID) mapping.
    pub fn vocab(mut self, vocab: Vocab) -> Self {
        self.config.vocab = vocab;
        self
    }

    /// The the `UNK` token for the vocab.
    pub fn unk_token(mut self, unk_token: String) -> Self {
        self.config.unk_token = unk_token;
        self
    }

    /// Set the prefix for continuing subwords.
    pub fn continuing_subword_prefix(mut self, continuing_subword_prefix: String) -> Self {
        self.config.continuing_subword_prefix = continuing_subword_prefix;
        self
    }

    /// Set the maximum number of input characters per word.
    pub fn max_input_chars_per_word(mut self, max_input_chars_per_word: usize) -> Self {
        self.config.max_input_chars_per_word = max_input_chars_per_word;
        self
    }

    /// Contructs a `WordPiece` model that uses the `WordPieceBuilder`'s configuration.
    pub fn build(self) -> WordPiece {
        let vocab_r = self
            .config
            .vocab
            .iter()
            .map(|(key, val)| (*val, key.to_owned()))
            .collect();

        WordPiece {
            vocab: self.config.vocab,
            vocab_r,
            unk_token: self.config.unk_token,
            continuing_subword_prefix: self.config.continuing_subword_prefix,
            max_input_chars_per_word: self.config.max_input_chars_per_word,
        }
    }
}

/// A
/// [WordPiece](https://static.googleusercontent.com/media/research.google.com/en//pubs/archive/37842.pdf)
/// model, performing greedy longest-prefix matching against the vocabulary.
#[derive(Clone, PartialEq, Deserialize)]
#[serde(from = "WordPieceRepr")]
pub struct WordPiece {
    vocab: Vocab,
    vocab_r: VocabR,
    unk_token: String,
    continuing_subword_prefix: String,
    max_input_chars_per_word: usize,
}

impl fmt::Debug for WordPiece {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_struct("WordPiece")
            .field("unk_token", &self.unk_token)
            .field("continuing_subword_prefix", &self.continuing_subword_prefix)
            .field("max_input_chars_per_word", &self.max_input_chars_per_word)
            .field("vocab", &self.vocab.len())
            .finish()
    }
}

impl Default for WordPiece {
    fn default() -> Self {
        WordPieceBuilder::default().build()
    }
}

impl WordPiece {
    /// Get a `WordPieceBuilder`.
    pub fn builder() -> WordPieceBuilder {
        WordPieceBuilder::new()
    }

    pub fn get_unk_token(&self) -> &str {
        &self.unk_token
    }

    pub fn get_continuing_subword_prefix(&self) -> &str {
        &self.continuing_subword_prefix
    }

    fn unk_id(&self) -> Result<u32> {
        Ok(*self.vocab.get(&self.unk_token).ok_or(Error::MissingUnkToken)?)
    }
}

impl Model for WordPiece {
    fn get_vocab(&self) -> &HashMap<String, u32> {
        &self.vocab
    }

    fn get_vocab_size(&self) -> usize {
        self.vocab.len()
    }

    fn tokenize(&self, piece: &str, offsets: Offsets) -> Result<Vec<Token>> {
        let char_len = piece.chars().count();
        if char_len > self.max_input_chars_per_word {
            return Ok(vec![Token::new(
                self.unk_id()?,
                self.unk_token.clone(),
                offsets,
                false,
            )]);
        }

        // Byte position of every code point boundary, so candidates can be
        // sliced while offsets stay in code points
        let boundaries: Vec<usize> = piece
            .char_indices()
            .map(|(i, _)| i)
            .chain(Some(piece.len()))
            .collect();

        let mut tokens = Vec::with_capacity(1);
        let mut start = 0;
        let mut is_bad = false;

        while start < char_len {
            let mut matched = None;
            for end in (start + 1..=char_len).rev() {
                let substr = &piece[boundaries[start]..boundaries[end]];
                let candidate: Cow<str> = if start > 0 {
                    format!("{}{}", self.continuing_subword_prefix, substr).into()
                } else {
                    substr.into()
                };
                if let Some(&id) = self.vocab.get(candidate.as_ref()) {
                    matched = Some((end, candidate.into_owned(), id));
                    break;
                }
            }

            match matched {
                Some((end, value, id)) => {
                    tokens.push(Token::new(
                        id,
                        value,
                        (offsets.0 + start, offsets.0 + end),
                        start > 0,
                    ));
                    start = end;
                }
                None => {
                    is_bad = true;
                    break;
                }
            }
        }

        if is_bad {
            // No prefix of the remainder is in the vocabulary: drop whatever
            // matched so far and cover the unmatched tail with a single unk
            tokens.clear();
            tokens.push(Token::new(
                self.unk_id()?,
                self.unk_token.clone(),
                (offsets.0 + start, offsets.0 + char_len),
                false,
            ));
        }

        Ok(tokens)
    }

    fn token_to_id(&self, token: &str) -> Option<u32> {
        self.vocab.get(token).copied()
    }

    fn id_to_token(&self, id: u32) -> Option<&str> {
        self.vocab_r.get(&id).map(String::as_ref)
    }
}

fn default_unk() -> String {
    String::from("[UNK]")
}

fn default_prefix() -> String {
    String::from("##")
}

fn default_max_input_chars_per_word() -> usize {
    100
}

#[derive(Deserialize)]
struct WordPieceRepr {
    #[serde(default)]
    vocab: Vocab,
    #[serde(default = "default_unk")]
    unk_token: String,
    #[serde(default = "default_prefix")]
    continuing_subword_prefix: String,
    #[serde(default = "default_max_input_chars_per_word")]
    max_input_chars_per_word: usize,
}

impl From<WordPieceRepr> for WordPiece {
    fn from(repr: WordPieceRepr) -> Self {
        WordPiece::builder()
            .vocab(repr.vocab)
            .unk_token(repr.unk_token)
            .continuing_subword_prefix(repr.continuing_subword_prefix)
            .max_input_chars_per_word(repr.max_input_chars_per_word)
            .build()
    }
}

impl Serialize for WordPiece {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut model = serializer.serialize_struct("WordPiece", 4)?;
        model.serialize_field("unk_token", &self.unk_token)?;
        model.serialize_field("continuing_subword_prefix", &self.continuing_subword_prefix)?;
        model.serialize_field("max_input_chars_per_word", &self.max_input_chars_per_word)?;
        model.serialize_field("vocab", &OrderedVocabIter::new(&self.vocab))?;
        model.end()
    }
}
