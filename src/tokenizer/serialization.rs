use serde::de::DeserializeOwned;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

use super::{AddedToken, AddedVocabulary, Tokenizer};

static SERIALIZATION_VERSION: &str = "1.0";

impl Serialize for Tokenizer {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut tokenizer = serializer.serialize_struct("Tokenizer", 9)?;

        // Start by adding the current version
        let version = if self.version.is_empty() {
            SERIALIZATION_VERSION
        } else {
            self.version.as_str()
        };
        tokenizer.serialize_field("version", version)?;

        // Params
        tokenizer.serialize_field("truncation", &self.truncation)?;
        tokenizer.serialize_field("padding", &self.padding)?;

        // Added tokens
        tokenizer.serialize_field("added_tokens", self.added_vocabulary.get_tokens())?;

        // Then add our parts
        tokenizer.serialize_field("normalizer", &self.normalizer)?;
        tokenizer.serialize_field("pre_tokenizer", &self.pre_tokenizer)?;
        tokenizer.serialize_field("post_processor", &self.post_processor)?;
        tokenizer.serialize_field("decoder", &self.decoder)?;
        tokenizer.serialize_field("model", &self.model)?;

        tokenizer.end()
    }
}

/// The raw shape of a configuration document. Every stage is kept as an
/// untyped value first: a missing or null stage, an unknown `type`, or a
/// malformed stage object all resolve to a disabled stage instead of failing
/// the whole document.
#[derive(Deserialize)]
pub(crate) struct TokenizerConfig {
    #[serde(default)]
    version: String,
    #[serde(default)]
    added_tokens: Option<Vec<AddedToken>>,
    #[serde(default)]
    normalizer: Option<Value>,
    #[serde(default)]
    pre_tokenizer: Option<Value>,
    #[serde(default)]
    model: Option<Value>,
    #[serde(default)]
    post_processor: Option<Value>,
    #[serde(default)]
    decoder: Option<Value>,
    #[serde(default)]
    truncation: Option<Value>,
    #[serde(default)]
    padding: Option<Value>,
}

fn stage<T: DeserializeOwned>(value: Option<Value>) -> Option<T> {
    value.and_then(|value| serde_json::from_value(value).ok())
}

impl From<TokenizerConfig> for Tokenizer {
    fn from(config: TokenizerConfig) -> Self {
        let mut tokenizer = Tokenizer::new();
        tokenizer.set_version(config.version);
        tokenizer.with_added_vocabulary(AddedVocabulary::new(
            config.added_tokens.unwrap_or_default(),
        ));
        if let Some(normalizer) = stage::<crate::normalizers::NormalizerWrapper>(config.normalizer)
        {
            tokenizer.with_normalizer(normalizer);
        }
        if let Some(pre_tokenizer) =
            stage::<crate::pre_tokenizers::PreTokenizerWrapper>(config.pre_tokenizer)
        {
            tokenizer.with_pre_tokenizer(pre_tokenizer);
        }
        if let Some(model) = stage::<crate::models::ModelWrapper>(config.model) {
            tokenizer.with_model(model);
        }
        if let Some(post_processor) =
            stage::<crate::processors::PostProcessorWrapper>(config.post_processor)
        {
            tokenizer.with_post_processor(post_processor);
        }
        if let Some(decoder) = stage::<crate::decoders::DecoderWrapper>(config.decoder) {
            tokenizer.with_decoder(decoder);
        }
        tokenizer.with_truncation(stage(config.truncation));
        tokenizer.with_padding(stage(config.padding));
        tokenizer
    }
}

#[cfg(test)]
mod tests {
    use crate::tokenizer::Tokenizer;

    #[test]
    fn unknown_stage_type_is_disabled() {
        let tokenizer = Tokenizer::from_config(
            r#"{
                "version": "1.0",
                "normalizer": {"type": "NoSuchNormalizer"},
                "pre_tokenizer": {"type": "BertPreTokenizer"}
            }"#,
        )
        .unwrap();
        assert!(tokenizer.get_normalizer().is_none());
        assert!(tokenizer.get_pre_tokenizer().is_some());
        assert_eq!(tokenizer.get_version(), "1.0");
    }

    #[test]
    fn null_stages_are_disabled() {
        let tokenizer = Tokenizer::from_config(
            r#"{"version": "1.0", "normalizer": null, "model": null, "decoder": null}"#,
        )
        .unwrap();
        assert!(tokenizer.get_normalizer().is_none());
        assert!(tokenizer.get_model().is_none());
        assert!(tokenizer.get_decoder().is_none());
    }

    #[test]
    fn empty_config_is_an_error() {
        assert!(Tokenizer::from_config("").is_err());
        assert!(Tokenizer::from_config("   ").is_err());
    }

    #[test]
    fn malformed_config_is_an_error() {
        assert!(Tokenizer::from_config("{not json").is_err());
    }
}
