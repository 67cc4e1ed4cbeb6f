//! A WordPiece tokenization pipeline.
//!
//! A [`Tokenizer`](struct.Tokenizer.html) turns text into the integer token
//! sequences consumed by transformer-style models, and back. It is composed of
//! some of the following parts.
//!   - [`AddedVocabulary`](struct.AddedVocabulary.html): Carves literal added
//!   tokens out of the input before anything else touches it.
//!   - [`Normalizer`](trait.Normalizer.html): Takes care of the text
//!   normalization (like unicode cleanup or lowercasing).
//!   - [`PreTokenizer`](trait.PreTokenizer.html): Takes care of the pre
//!   tokenization (ie. How to split the input into word-like pieces).
//!   - [`Model`](trait.Model.html): The tokenization algorithm mapping pieces
//!   to subword token ids (WordPiece).
//!   - [`PostProcessor`](trait.PostProcessor.html): Takes care of the
//!   processing after tokenization (like adding special tokens from a
//!   template).
//!   - [`Decoder`](trait.Decoder.html): Maps a token sequence back to a
//!   readable string.
//!
//! Every token of an [`Encoding`](struct.Encoding.html) keeps offsets pointing
//! back into the original input, expressed in code points, through every
//! transformation of the pipeline.

macro_rules! impl_enum_from {
    ($from_ty:ty, $enum:ident, $variant:ident) => {
        impl From<$from_ty> for $enum {
            fn from(from: $from_ty) -> Self {
                $enum::$variant(from)
            }
        }
    };
}

pub mod decoders;
pub mod models;
pub mod normalizers;
pub mod pre_tokenizers;
pub mod processors;
pub mod tokenizer;
pub mod utils;

pub use tokenizer::*;
