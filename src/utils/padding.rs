use serde::{Deserialize, Serialize};

use crate::tokenizer::{Encoding, Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PaddingDirection {
    Left,
    Right,
}

/// How to pick the length every encoding of a batch gets padded to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PaddingStrategy {
    /// The length of the longest encoding in the batch
    BatchLongest,
    /// A fixed length
    Fixed(usize),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaddingParams {
    pub strategy: PaddingStrategy,
    pub direction: PaddingDirection,
    #[serde(default)]
    pub pad_to_multiple_of: Option<usize>,
    pub pad_id: u32,
    pub pad_type_id: u32,
    pub pad_token: String,
}

impl Default for PaddingParams {
    fn default() -> Self {
        PaddingParams {
            strategy: PaddingStrategy::BatchLongest,
            direction: PaddingDirection::Right,
            pad_to_multiple_of: None,
            pad_id: 0,
            pad_type_id: 0,
            pad_token: String::from("[PAD]"),
        }
    }
}

/// Pad every encoding (and, recursively, its overflowing parts) to the target
/// length picked by the strategy
pub fn pad_encodings(encodings: &mut [Encoding], params: &PaddingParams) -> Result<()> {
    if encodings.is_empty() {
        return Ok(());
    }

    let mut pad_length = match params.strategy {
        PaddingStrategy::Fixed(size) => size,
        PaddingStrategy::BatchLongest => encodings
            .iter()
            .map(Encoding::len)
            .max()
            .unwrap_or_default(),
    };

    if let Some(multiple) = params.pad_to_multiple_of {
        if multiple > 0 && pad_length % multiple > 0 {
            pad_length += multiple - pad_length % multiple;
        }
    }

    for encoding in encodings.iter_mut() {
        encoding.pad(
            pad_length,
            params.pad_id,
            params.pad_type_id,
            &params.pad_token,
            params.direction,
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoding(ids: &[u32]) -> Encoding {
        let tokens = ids.iter().map(|id| format!("t{}", id)).collect();
        let word_ids = (0..ids.len() as u32).map(Some).collect();
        Encoding::new(
            ids.to_vec(),
            vec![0; ids.len()],
            tokens,
            vec![(0, 1); ids.len()],
            word_ids,
            vec![0; ids.len()],
            vec![1; ids.len()],
            vec![],
        )
    }

    fn params(strategy: PaddingStrategy) -> PaddingParams {
        PaddingParams {
            strategy,
            ..PaddingParams::default()
        }
    }

    #[test]
    fn batch_longest() {
        let mut encodings = vec![encoding(&[1, 2]), encoding(&[3, 4, 5, 6]), encoding(&[7])];
        pad_encodings(&mut encodings, &params(PaddingStrategy::BatchLongest)).unwrap();
        assert!(encodings.iter().all(|e| e.len() == 4));
        assert_eq!(encodings[0].get_ids(), &[1, 2, 0, 0]);
        assert_eq!(encodings[0].get_tokens()[2], "[PAD]");
        assert_eq!(encodings[0].get_attention_mask(), &[1, 1, 0, 0]);
        assert_eq!(encodings[0].get_special_tokens_mask(), &[0, 0, 1, 1]);
    }

    #[test]
    fn fixed_size() {
        let mut encodings = vec![encoding(&[1, 2])];
        pad_encodings(&mut encodings, &params(PaddingStrategy::Fixed(5))).unwrap();
        assert_eq!(encodings[0].len(), 5);
        assert_eq!(encodings[0].get_word_ids()[4], None);
        assert_eq!(encodings[0].get_offsets()[4], (0, 0));
    }

    #[test]
    fn fixed_size_shorter_than_content_is_a_noop() {
        let mut encodings = vec![encoding(&[1, 2, 3, 4])];
        pad_encodings(&mut encodings, &params(PaddingStrategy::Fixed(2))).unwrap();
        assert_eq!(encodings[0].get_ids(), &[1, 2, 3, 4]);
    }

    #[test]
    fn multiple_of_rounds_up() {
        let mut encodings = vec![encoding(&[1, 2, 3])];
        let params = PaddingParams {
            strategy: PaddingStrategy::BatchLongest,
            pad_to_multiple_of: Some(8),
            ..PaddingParams::default()
        };
        pad_encodings(&mut encodings, &params).unwrap();
        assert_eq!(encodings[0].len(), 8);
    }

    #[test]
    fn multiple_of_exact_is_untouched() {
        let mut encodings = vec![encoding(&[1, 2, 3, 4])];
        let params = PaddingParams {
            strategy: PaddingStrategy::BatchLongest,
            pad_to_multiple_of: Some(4),
            ..PaddingParams::default()
        };
        pad_encodings(&mut encodings, &params).unwrap();
        assert_eq!(encodings[0].len(), 4);
    }

    #[test]
    fn pad_left() {
        let mut encodings = vec![encoding(&[1, 2])];
        let params = PaddingParams {
            strategy: PaddingStrategy::Fixed(4),
            direction: PaddingDirection::Left,
            pad_id: 9,
            pad_type_id: 1,
            ..PaddingParams::default()
        };
        pad_encodings(&mut encodings, &params).unwrap();
        assert_eq!(encodings[0].get_ids(), &[9, 9, 1, 2]);
        assert_eq!(encodings[0].get_type_ids(), &[1, 1, 0, 0]);
        assert_eq!(encodings[0].get_attention_mask(), &[0, 0, 1, 1]);
    }

    #[test]
    fn padding_is_idempotent() {
        let mut encodings = vec![encoding(&[1, 2])];
        let params = params(PaddingStrategy::Fixed(6));
        pad_encodings(&mut encodings, &params).unwrap();
        let once = encodings.clone();
        pad_encodings(&mut encodings, &params).unwrap();
        assert_eq!(encodings, once);
    }

    #[test]
    fn attention_zero_entries_are_padding() {
        let mut encodings = vec![encoding(&[1, 2])];
        let params = params(PaddingStrategy::Fixed(5));
        pad_encodings(&mut encodings, &params).unwrap();
        let encoding = &encodings[0];
        for i in 0..encoding.len() {
            if encoding.get_attention_mask()[i] == 0 {
                assert_eq!(encoding.get_ids()[i], params.pad_id);
                assert_eq!(encoding.get_special_tokens_mask()[i], 1);
            }
        }
    }
}
