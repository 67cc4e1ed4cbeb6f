//! Represents a tokenization pipeline.
//!
//! A [`Tokenizer`](struct.Tokenizer.html) is composed of some of the following parts.
//!   - [`Normalizer`](trait.Normalizer.html): Takes care of the text normalization (like unicode cleanup).
//!   - [`PreTokenizer`](trait.PreTokenizer.html): Takes care of the pre tokenization (ie. How to split
//!   the input into word-like pieces).
//!   - [`Model`](trait.Model.html): A model encapsulates the subword tokenization algorithm
//!   (like WordPiece).
//!   - [`PostProcessor`](trait.PostProcessor.html): Takes care of the processing after tokenization (like
//!   inserting special tokens from a template).
//!   - [`Decoder`](trait.Decoder.html): Merges a token sequence back into a readable string.

use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::prelude::*;
use std::path::Path;

use serde::Deserialize;

use crate::decoders::DecoderWrapper;
use crate::models::ModelWrapper;
use crate::normalizers::NormalizerWrapper;
use crate::pre_tokenizers::PreTokenizerWrapper;
use crate::processors::PostProcessorWrapper;
use crate::utils::parallelism::*;

mod added_vocabulary;
mod encoding;
mod normalizer;
mod pre_tokenized;
mod serialization;

pub use crate::utils::padding::{pad_encodings, PaddingDirection, PaddingParams, PaddingStrategy};
pub use crate::utils::truncation::{
    truncate_encodings, TruncationDirection, TruncationParams, TruncationStrategy,
};
pub use added_vocabulary::*;
pub use encoding::*;
pub use normalizer::*;
pub use pre_tokenized::*;
pub(crate) use serialization::TokenizerConfig;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Result<T> = std::result::Result<T, Error>;
/// A `(start, end)` range of code point positions in the original input
pub type Offsets = (usize, usize);

/// Takes care of pre-processing strings.
pub trait Normalizer: Send + Sync {
    fn normalize(&self, normalized: &mut NormalizedString) -> Result<()>;
}

/// The `PreTokenizer` is in charge of doing the pre-segmentation step. It splits the given
/// `PreTokenizedString` into multiple word-like pieces, keeping track of the per-code-point
/// offsets carried over from the `NormalizedString`.
pub trait PreTokenizer: Send + Sync {
    fn pre_tokenize(&self, pre_tokenized: &mut PreTokenizedString) -> Result<()>;
}

/// Represents a model used during Tokenization (like WordPiece).
pub trait Model: Send + Sync {
    /// Tokenize one pre-tokenized piece, whose position in the original input
    /// is given by `offsets`
    fn tokenize(&self, piece: &str, offsets: Offsets) -> Result<Vec<Token>>;
    fn token_to_id(&self, token: &str) -> Option<u32>;
    fn id_to_token(&self, id: u32) -> Option<&str>;
    fn get_vocab(&self) -> &HashMap<String, u32>;
    fn get_vocab_size(&self) -> usize;
}

/// A `PostProcessor` has the responsibility to post process the encoded output of the
/// `Tokenizer`. It adds any special tokens that a language model would require.
pub trait PostProcessor: Send + Sync {
    /// Expand the sequence encodings (one or two of them) into the final list
    /// of encodings, special tokens included
    fn process_encodings(&self, encodings: Vec<Encoding>) -> Result<Vec<Encoding>>;
}

/// A `Decoder` has the responsibility to merge a `Vec<String>` of tokens back into a `String`.
pub trait Decoder: Send + Sync {
    fn decode_chain(&self, tokens: Vec<String>) -> Result<Vec<String>>;

    fn decode(&self, tokens: Vec<String>) -> Result<String> {
        Ok(self.decode_chain(tokens)?.concat())
    }
}

/// A single token produced by the model, positioned in the original input
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub id: u32,
    pub value: String,
    pub offsets: Offsets,
    pub is_continuing_subword: bool,
}

impl Token {
    pub fn new(id: u32, value: String, offsets: Offsets, is_continuing_subword: bool) -> Self {
        Token {
            id,
            value,
            offsets,
            is_continuing_subword,
        }
    }
}

#[derive(Debug, Clone)]
pub enum EncodeInput {
    Single(String),
    Dual(String, String),
}

impl From<String> for EncodeInput {
    fn from(input: String) -> Self {
        EncodeInput::Single(input)
    }
}

impl From<&str> for EncodeInput {
    fn from(input: &str) -> Self {
        EncodeInput::Single(input.to_owned())
    }
}

impl<I1: Into<String>, I2: Into<String>> From<(I1, I2)> for EncodeInput {
    fn from(input: (I1, I2)) -> Self {
        EncodeInput::Dual(input.0.into(), input.1.into())
    }
}

#[derive(Debug)]
pub struct ConfigError(String);

impl std::error::Error for ConfigError {}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A `Tokenizer` is capable of encoding/decoding any text.
///
/// All the parts are immutable once configured: a `Tokenizer` can be shared
/// across threads and used concurrently.
#[derive(Deserialize)]
#[serde(from = "TokenizerConfig")]
pub struct Tokenizer {
    // Tokenizer parts
    normalizer: Option<NormalizerWrapper>,
    pre_tokenizer: Option<PreTokenizerWrapper>,
    model: Option<ModelWrapper>,
    post_processor: Option<PostProcessorWrapper>,
    decoder: Option<DecoderWrapper>,

    // Added Vocabulary capabilities
    added_vocabulary: AddedVocabulary,

    // General processing parameters
    truncation: Option<TruncationParams>,
    padding: Option<PaddingParams>,

    // The `version` carried by the configuration this was built from
    version: String,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer {
    /// Instantiate a new empty Tokenizer
    pub fn new() -> Self {
        Tokenizer {
            normalizer: None,
            pre_tokenizer: None,
            model: None,
            post_processor: None,
            decoder: None,

            added_vocabulary: AddedVocabulary::default(),

            truncation: None,
            padding: None,

            version: String::new(),
        }
    }

    /// Instantiate a new Tokenizer from the given JSON configuration
    pub fn from_config(config: &str) -> Result<Self> {
        if config.trim().is_empty() {
            return Err(Box::new(ConfigError(
                "a json config is required to initialize a tokenizer".into(),
            )));
        }
        Ok(serde_json::from_str(config)?)
    }

    /// Instantiate a new Tokenizer from a configuration file
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        let config = std::fs::read_to_string(file)?;
        Self::from_config(&config)
    }

    /// Set the normalizer
    pub fn with_normalizer<N: Into<NormalizerWrapper>>(&mut self, normalizer: N) -> &mut Self {
        self.normalizer = Some(normalizer.into());
        self
    }

    /// Get the normalizer
    pub fn get_normalizer(&self) -> Option<&NormalizerWrapper> {
        self.normalizer.as_ref()
    }

    /// Set the pre tokenizer
    pub fn with_pre_tokenizer<PT: Into<PreTokenizerWrapper>>(
        &mut self,
        pre_tokenizer: PT,
    ) -> &mut Self {
        self.pre_tokenizer = Some(pre_tokenizer.into());
        self
    }

    /// Get the pre tokenizer
    pub fn get_pre_tokenizer(&self) -> Option<&PreTokenizerWrapper> {
        self.pre_tokenizer.as_ref()
    }

    /// Set the model
    pub fn with_model<M: Into<ModelWrapper>>(&mut self, model: M) -> &mut Self {
        self.model = Some(model.into());
        self
    }

    /// Get the model
    pub fn get_model(&self) -> Option<&ModelWrapper> {
        self.model.as_ref()
    }

    /// Set the post processor
    pub fn with_post_processor<PP: Into<PostProcessorWrapper>>(
        &mut self,
        post_processor: PP,
    ) -> &mut Self {
        self.post_processor = Some(post_processor.into());
        self
    }

    /// Get the post processor
    pub fn get_post_processor(&self) -> Option<&PostProcessorWrapper> {
        self.post_processor.as_ref()
    }

    /// Set the decoder
    pub fn with_decoder<D: Into<DecoderWrapper>>(&mut self, decoder: D) -> &mut Self {
        self.decoder = Some(decoder.into());
        self
    }

    /// Get the decoder
    pub fn get_decoder(&self) -> Option<&DecoderWrapper> {
        self.decoder.as_ref()
    }

    /// Replace the added vocabulary
    pub fn with_added_vocabulary(&mut self, added_vocabulary: AddedVocabulary) -> &mut Self {
        self.added_vocabulary = added_vocabulary;
        self
    }

    /// Get the added vocabulary
    pub fn get_added_vocabulary(&self) -> &AddedVocabulary {
        &self.added_vocabulary
    }

    /// Set the truncation parameters
    pub fn with_truncation(&mut self, truncation: Option<TruncationParams>) -> &mut Self {
        self.truncation = truncation;
        self
    }

    /// Get the currently set truncation parameters
    pub fn get_truncation(&self) -> Option<&TruncationParams> {
        self.truncation.as_ref()
    }

    /// Set the padding parameters
    pub fn with_padding(&mut self, padding: Option<PaddingParams>) -> &mut Self {
        self.padding = padding;
        self
    }

    /// Get the currently set padding parameters
    pub fn get_padding(&self) -> Option<&PaddingParams> {
        self.padding.as_ref()
    }

    pub(crate) fn set_version(&mut self, version: String) {
        self.version = version;
    }

    /// The `version` string of the configuration this tokenizer was built from
    pub fn get_version(&self) -> &str {
        &self.version
    }

    /// Get the vocabulary
    pub fn get_vocab(&self, with_added_tokens: bool) -> HashMap<String, u32> {
        let mut final_vocab = self
            .model
            .as_ref()
            .map(|model| model.get_vocab().clone())
            .unwrap_or_default();

        if with_added_tokens {
            let added_vocab = self.added_vocabulary.get_vocab();
            if !added_vocab.is_empty() {
                final_vocab.reserve(added_vocab.len());
                for (token, id) in added_vocab {
                    final_vocab.insert(token.clone(), *id);
                }
            }
        }

        final_vocab
    }

    /// Get the size of the vocabulary
    pub fn get_vocab_size(&self, with_added_tokens: bool) -> usize {
        self.model.as_ref().map_or(0, |model| model.get_vocab_size())
            + if with_added_tokens {
                self.added_vocabulary.len()
            } else {
                0
            }
    }

    /// Converts a token to the corresponding id
    pub fn token_to_id(&self, token: &str) -> Option<u32> {
        self.added_vocabulary
            .token_to_id(token)
            .or_else(|| self.model.as_ref().and_then(|model| model.token_to_id(token)))
    }

    /// Converts an id to the corresponding token
    pub fn id_to_token(&self, id: u32) -> Option<&str> {
        self.added_vocabulary
            .id_to_token(id)
            .or_else(|| self.model.as_ref().and_then(|model| model.id_to_token(id)))
    }

    /// Encode a single sequence
    fn encode_single_sequence(&self, sequence: &str, type_id: u32) -> Result<Encoding> {
        // 1. Carve out the added tokens
        let splits = self
            .added_vocabulary
            .find_splits(NormalizedString::from(sequence));

        // 2. Normalization, skipping the fragments matched above
        let mut normalized = Vec::with_capacity(splits.len());
        for mut split in splits {
            if !split.pre_normalized() {
                if let Some(normalizer) = &self.normalizer {
                    normalizer.normalize(&mut split)?;
                }
            }
            normalized.push(split);
        }

        // 3. Pre tokenization
        let mut pre_tokenized = PreTokenizedString::from(normalized);
        if let Some(pre_tokenizer) = &self.pre_tokenizer {
            pre_tokenizer.pre_tokenize(&mut pre_tokenized)?;
        }

        // 4. Model
        let model = match &self.model {
            Some(model) => model,
            None => return Ok(Encoding::default()),
        };
        let mut tokens = Vec::new();
        for split in pre_tokenized.splits() {
            tokens.extend(model.tokenize(split.text(), split.offsets())?);
        }

        Ok(Encoding::from_tokens(tokens, type_id))
    }

    /// Encode the given input. This method accepts both single sequences, as well as pair
    /// sequences:
    ///
    /// ```
    /// # use wordpiece_tokenizers::Tokenizer;
    /// # let tokenizer = Tokenizer::new();
    /// tokenizer.encode("Single sequence", false);
    /// tokenizer.encode(("Sequence A", "Sequence B"), false);
    /// ```
    pub fn encode<E: Into<EncodeInput>>(
        &self,
        input: E,
        add_special_tokens: bool,
    ) -> Result<Encoding> {
        let mut encodings = match input.into() {
            EncodeInput::Single(sequence) => vec![self.encode_single_sequence(&sequence, 0)?],
            EncodeInput::Dual(first, second) => vec![
                self.encode_single_sequence(&first, 0)?,
                self.encode_single_sequence(&second, 1)?,
            ],
        };

        // 1. First we truncate if needed
        if let Some(params) = &self.truncation {
            truncate_encodings(&mut encodings, params)?;
        }

        // 2. Then we post process, which may insert special tokens
        if add_special_tokens {
            if let Some(processor) = &self.post_processor {
                encodings = processor.process_encodings(encodings)?;
            }
        }

        // 3. Then we pad if needed
        if let Some(params) = &self.padding {
            pad_encodings(&mut encodings, params)?;
        }

        Ok(Encoding::merge(encodings))
    }

    /// Encode all the sentences in parallel, using multiple threads
    pub fn encode_batch<E: Into<EncodeInput> + Send>(
        &self,
        inputs: Vec<E>,
        add_special_tokens: bool,
    ) -> Result<Vec<Encoding>> {
        let mut encodings = inputs
            .into_maybe_par_iter()
            .map(|input| self.encode(input, add_special_tokens))
            .collect::<Result<Vec<Encoding>>>()?;

        if let Some(params) = &self.padding {
            // We do the padding here again to make sure we handle the batch padding
            pad_encodings(&mut encodings, params)?;
        }

        Ok(encodings)
    }

    /// Decode the given ids, back to a String. Unknown ids are skipped
    /// silently.
    pub fn decode(&self, ids: Vec<u32>, skip_special_tokens: bool) -> Result<String> {
        let tokens = ids
            .into_iter()
            .filter_map(|id| {
                self.id_to_token(id)
                    .filter(|token| {
                        !skip_special_tokens || !self.added_vocabulary.is_special_token(token)
                    })
                    .map(|t| t.to_owned())
            })
            .collect::<Vec<_>>();

        if let Some(decoder) = &self.decoder {
            decoder.decode(tokens)
        } else {
            Ok(tokens.join(" "))
        }
    }

    /// Decode all sentences in parallel
    pub fn decode_batch(
        &self,
        sentences: Vec<Vec<u32>>,
        skip_special_tokens: bool,
    ) -> Result<Vec<String>> {
        sentences
            .into_maybe_par_iter()
            .map(|sentence| self.decode(sentence, skip_special_tokens))
            .collect()
    }

    /// Serialize the current tokenizer as a String
    pub fn to_string(&self, pretty: bool) -> Result<String> {
        Ok(if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        })
    }

    /// Save the current tokenizer at the given path
    pub fn save<P: AsRef<Path>>(&self, path: P, pretty: bool) -> Result<()> {
        let serialized = self.to_string(pretty)?;

        let mut file = File::create(path)?;
        file.write_all(serialized.as_bytes())?;

        Ok(())
    }
}

impl std::str::FromStr for Tokenizer {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Tokenizer::from_config(s)
    }
}
