pub mod wordpiece;

use serde::{Deserialize, Serialize};

use crate::Decoder;

/// Wrapper for known Decoders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DecoderWrapper {
    WordPiece(wordpiece::WordPiece),
}

impl Decoder for DecoderWrapper {
    fn decode_chain(&self, tokens: Vec<String>) -> crate::Result<Vec<String>> {
        match self {
            DecoderWrapper::WordPiece(wp) => wp.decode_chain(tokens),
        }
    }
}

impl_enum_from!(wordpiece::WordPiece, DecoderWrapper, WordPiece);
