use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::tokenizer::{Encoding, PostProcessor, Result};

/// One directive of a processing template: either a special token to insert,
/// or the next input sequence in order. The `id` of a `Sequence` directive
/// ("A", "B") is purely descriptive, sequences are consumed in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TemplatePiece {
    SpecialToken { id: String, type_id: u32 },
    Sequence { id: String, type_id: u32 },
}

/// The ids a special token maps to. Only the first one is used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialTokenIds {
    pub ids: Vec<u32>,
}

/// Inserts special tokens around the encoded sequences, following one
/// template for single inputs and another one for pairs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateProcessing {
    #[serde(default)]
    single: Vec<TemplatePiece>,
    #[serde(default)]
    pair: Vec<TemplatePiece>,
    #[serde(default)]
    special_tokens: HashMap<String, SpecialTokenIds>,
}

impl TemplateProcessing {
    pub fn new(
        single: Vec<TemplatePiece>,
        pair: Vec<TemplatePiece>,
        special_tokens: HashMap<String, u32>,
    ) -> Self {
        TemplateProcessing {
            single,
            pair,
            special_tokens: special_tokens
                .into_iter()
                .map(|(token, id)| (token, SpecialTokenIds { ids: vec![id] }))
                .collect(),
        }
    }

    fn special_token_id(&self, token: &str) -> Option<u32> {
        self.special_tokens
            .get(token)
            .and_then(|special| special.ids.first().copied())
    }
}

impl PostProcessor for TemplateProcessing {
    fn process_encodings(&self, encodings: Vec<Encoding>) -> Result<Vec<Encoding>> {
        let template = if encodings.len() == 1 {
            &self.single
        } else {
            &self.pair
        };

        let mut sequences = encodings.into_iter();
        let mut result = Vec::with_capacity(template.len());
        for piece in template {
            match piece {
                TemplatePiece::SpecialToken { id, type_id } => {
                    // A special token missing from the map is skipped
                    if let Some(token_id) = self.special_token_id(id) {
                        result.push(Encoding::new(
                            vec![token_id],
                            vec![*type_id],
                            vec![id.clone()],
                            vec![(0, 0)],
                            vec![None],
                            vec![1],
                            vec![1],
                            vec![],
                        ));
                    }
                }
                TemplatePiece::Sequence { type_id, .. } => {
                    if let Some(mut encoding) = sequences.next() {
                        encoding.set_type_id(*type_id);
                        result.push(encoding);
                    }
                }
            }
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn processor() -> TemplateProcessing {
        TemplateProcessing::new(
            vec![
                TemplatePiece::SpecialToken {
                    id: "[CLS]".into(),
                    type_id: 0,
                },
                TemplatePiece::Sequence {
                    id: "A".into(),
                    type_id: 0,
                },
                TemplatePiece::SpecialToken {
                    id: "[SEP]".into(),
                    type_id: 0,
                },
            ],
            vec![
                TemplatePiece::SpecialToken {
                    id: "[CLS]".into(),
                    type_id: 0,
                },
                TemplatePiece::Sequence {
                    id: "A".into(),
                    type_id: 0,
                },
                TemplatePiece::SpecialToken {
                    id: "[SEP]".into(),
                    type_id: 0,
                },
                TemplatePiece::Sequence {
                    id: "B".into(),
                    type_id: 1,
                },
                TemplatePiece::SpecialToken {
                    id: "[SEP]".into(),
                    type_id: 1,
                },
            ],
            vec![("[CLS]".to_owned(), 100), ("[SEP]".to_owned(), 101)]
                .into_iter()
                .collect(),
        )
    }

    fn sequence(ids: &[u32], tokens: &[&str], type_id: u32) -> Encoding {
        Encoding::new(
            ids.to_vec(),
            vec![type_id; ids.len()],
            tokens.iter().map(|t| t.to_string()).collect(),
            vec![(0, 0); ids.len()],
            vec![None; ids.len()],
            vec![0; ids.len()],
            vec![1; ids.len()],
            vec![],
        )
    }

    #[test]
    fn single() {
        let result = processor()
            .process_encodings(vec![sequence(&[200, 201], &["hello", "world"], 0)])
            .unwrap();
        assert_eq!(result.len(), 3);
        assert_eq!(result[0].get_ids(), &[100]);
        assert_eq!(result[0].get_tokens(), &["[CLS]".to_owned()]);
        assert_eq!(result[0].get_special_tokens_mask(), &[1]);
        assert_eq!(result[1].get_ids(), &[200, 201]);
        assert_eq!(result[2].get_ids(), &[101]);

        let merged = Encoding::merge(result);
        assert_eq!(merged.get_ids(), &[100, 200, 201, 101]);
        assert_eq!(merged.get_type_ids(), &[0, 0, 0, 0]);
        assert_eq!(merged.get_special_tokens_mask(), &[1, 0, 0, 1]);
    }

    #[test]
    fn pair() {
        let result = processor()
            .process_encodings(vec![
                sequence(&[200, 201], &["hello", "world"], 0),
                sequence(&[300, 301], &["martin", "garrix"], 1),
            ])
            .unwrap();
        assert_eq!(result.len(), 5);

        let merged = Encoding::merge(result);
        assert_eq!(merged.get_ids(), &[100, 200, 201, 101, 300, 301, 101]);
        assert_eq!(merged.get_type_ids(), &[0, 0, 0, 0, 1, 1, 1]);
        assert_eq!(merged.get_special_tokens_mask(), &[1, 0, 0, 1, 0, 0, 1]);
        assert_eq!(merged.get_offsets()[0], (0, 0));
        assert_eq!(merged.get_word_ids()[0], None);
    }

    #[test]
    fn sequence_type_ids_are_rewritten() {
        let result = processor()
            .process_encodings(vec![
                sequence(&[200], &["hello"], 9),
                sequence(&[300], &["world"], 9),
            ])
            .unwrap();
        let merged = Encoding::merge(result);
        assert_eq!(merged.get_type_ids(), &[0, 0, 0, 1, 1]);
    }

    #[test]
    fn unknown_special_token_is_skipped() {
        let processor = TemplateProcessing::new(
            vec![
                TemplatePiece::SpecialToken {
                    id: "[BOS]".into(),
                    type_id: 0,
                },
                TemplatePiece::Sequence {
                    id: "A".into(),
                    type_id: 0,
                },
            ],
            vec![],
            HashMap::new(),
        );
        let result = processor
            .process_encodings(vec![sequence(&[200], &["hello"], 0)])
            .unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].get_ids(), &[200]);
    }

    #[test]
    fn template_config_shape() {
        let processor: TemplateProcessing = serde_json::from_str(
            r#"{
                "single": [
                    {"SpecialToken": {"id": "[CLS]", "type_id": 0}},
                    {"Sequence": {"id": "A", "type_id": 0}},
                    {"SpecialToken": {"id": "[SEP]", "type_id": 0}}
                ],
                "pair": [],
                "special_tokens": {
                    "[CLS]": {"ids": [101]},
                    "[SEP]": {"ids": [102]}
                }
            }"#,
        )
        .unwrap();
        assert_eq!(processor.special_token_id("[CLS]"), Some(101));
        assert_eq!(processor.special_token_id("[SEP]"), Some(102));
        assert_eq!(processor.single.len(), 3);
    }
}
