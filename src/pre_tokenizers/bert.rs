use serde::{Deserialize, Serialize};
use unicode_categories::UnicodeCategories;

use crate::tokenizer::{PreTokenizedString, PreTokenizer, Result, SplitDelimiterBehavior};

fn is_bert_punc(x: char) -> bool {
    char::is_ascii_punctuation(&x) || x.is_punctuation()
}

/// The BERT pre tokenizer: splits on any whitespace, dropping it, then
/// isolates every punctuation character as its own piece.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BertPreTokenizer {}

impl PreTokenizer for BertPreTokenizer {
    fn pre_tokenize(&self, pre_tokenized: &mut PreTokenizedString) -> Result<()> {
        pre_tokenized.split(char::is_whitespace, SplitDelimiterBehavior::Removed);
        pre_tokenized.split(is_bert_punc, SplitDelimiterBehavior::Isolated);
        Ok(())
    }
}
