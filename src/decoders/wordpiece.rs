use serde::{Deserialize, Serialize};

use crate::tokenizer::{Decoder, Result};

fn default_prefix() -> String {
    String::from("##")
}

fn default_cleanup() -> bool {
    true
}

/// The WordPiece decoder glues subwords back together: a continuing subword
/// loses its prefix, any other token gets a space in front. `cleanup` undoes
/// the most common tokenization artefacts around punctuation and contractions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordPiece {
    #[serde(default = "default_prefix")]
    pub prefix: String,
    #[serde(default = "default_cleanup")]
    pub cleanup: bool,
}

impl WordPiece {
    pub fn new(prefix: String, cleanup: bool) -> Self {
        WordPiece { prefix, cleanup }
    }
}

impl Default for WordPiece {
    fn default() -> Self {
        WordPiece::new(String::from("##"), true)
    }
}

fn cleanup(token: &str) -> String {
    token
        .replace(" .", ".")
        .replace(" ?", "?")
        .replace(" !", "!")
        .replace(" ,", ",")
        .replace(" ' ", "'")
        .replace(" n't", "n't")
        .replace(" 'm", "'m")
        .replace(" do not", "don't")
        .replace(" 's", "'s")
        .replace(" 've", "'ve")
        .replace(" 're", "'re")
}

impl Decoder for WordPiece {
    fn decode_chain(&self, mut tokens: Vec<String>) -> Result<Vec<String>> {
        for (i, token) in tokens.iter_mut().enumerate() {
            if i != 0 {
                if token.starts_with(&self.prefix) {
                    *token = token[self.prefix.len()..].to_owned();
                } else {
                    *token = format!(" {}", token);
                }
            }
            if self.cleanup {
                *token = cleanup(token);
            }
        }
        Ok(tokens)
    }
}
