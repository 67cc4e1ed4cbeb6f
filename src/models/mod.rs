//! Subword tokenization models.

pub mod wordpiece;

use std::collections::HashMap;

use serde::{Deserialize, Serialize, Serializer};

use crate::{Model, Offsets, Token};

/// Wraps a vocab mapping (token -> ID) to a struct that will be serialized in
/// order of token ID, smallest to largest.
pub(crate) struct OrderedVocabIter<'a> {
    vocab: &'a HashMap<String, u32>,
}

impl<'a> OrderedVocabIter<'a> {
    pub(crate) fn new(vocab: &'a HashMap<String, u32>) -> Self {
        Self { vocab }
    }
}

impl<'a> Serialize for OrderedVocabIter<'a> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut entries: Vec<(&String, u32)> =
            self.vocab.iter().map(|(token, &id)| (token, id)).collect();
        entries.sort_unstable_by_key(|&(_, id)| id);
        serializer.collect_map(entries)
    }
}

/// Wrapper for known Models.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type")]
pub enum ModelWrapper {
    WordPiece(wordpiece::WordPiece),
}

impl_enum_from!(wordpiece::WordPiece, ModelWrapper, WordPiece);

impl Model for ModelWrapper {
    fn tokenize(&self, piece: &str, offsets: Offsets) -> crate::Result<Vec<Token>> {
        use ModelWrapper::*;
        match self {
            WordPiece(t) => t.tokenize(piece, offsets),
        }
    }

    fn token_to_id(&self, token: &str) -> Option<u32> {
        use ModelWrapper::*;
        match self {
            WordPiece(t) => t.token_to_id(token),
        }
    }

    fn id_to_token(&self, id: u32) -> Option<&str> {
        use ModelWrapper::*;
        match self {
            WordPiece(t) => t.id_to_token(id),
        }
    }

    fn get_vocab(&self) -> &HashMap<String, u32> {
        use ModelWrapper::*;
        match self {
            WordPiece(t) => t.get_vocab(),
        }
    }

    fn get_vocab_size(&self) -> usize {
        use ModelWrapper::*;
        match self {
            WordPiece(t) => t.get_vocab_size(),
        }
    }
}
