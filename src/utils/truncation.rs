use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tokenizer::{Encoding, Result};

#[derive(Debug)]
pub enum Error {
    SecondSequenceNotProvided,
}
impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::SecondSequenceNotProvided => write!(
                fmt,
                "Truncation error: Second sequence not provided"
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TruncationDirection {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TruncationStrategy {
    LongestFirst,
    OnlyFirst,
    OnlySecond,
}

fn default_right() -> TruncationDirection {
    TruncationDirection::Right
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TruncationParams {
    #[serde(default = "default_right")]
    pub direction: TruncationDirection,
    pub strategy: TruncationStrategy,
    pub max_length: usize,
    #[serde(default)]
    pub stride: usize,
}

impl Default for TruncationParams {
    fn default() -> Self {
        TruncationParams {
            direction: TruncationDirection::Right,
            strategy: TruncationStrategy::LongestFirst,
            max_length: 512,
            stride: 0,
        }
    }
}

/// Truncate the given sequence encodings (one, or the two of a pair) so their
/// total length fits `params.max_length`. Only single and pair inputs are
/// supported.
pub fn truncate_encodings(encodings: &mut [Encoding], params: &TruncationParams) -> Result<()> {
    if encodings.is_empty() {
        return Ok(());
    }

    if params.max_length == 0 {
        for encoding in encodings.iter_mut() {
            encoding.truncate(0, params.stride, params.direction);
        }
        return Ok(());
    }

    let n1 = encodings[0].len();
    let n2 = encodings.get(1).map_or(0, Encoding::len);
    let total_length = n1 + n2;
    if total_length <= params.max_length {
        return Ok(());
    }
    let to_remove = total_length - params.max_length;

    match params.strategy {
        TruncationStrategy::LongestFirst => {
            if encodings.len() > 1 {
                // Shrink the longest one first, then split the budget evenly
                let swap = n1 > n2;
                let (mut n1, mut n2) = if swap { (n2, n1) } else { (n1, n2) };
                if n1 > params.max_length {
                    n2 = n1;
                } else {
                    n2 = usize::max(n1, params.max_length - n1);
                }
                if n1 + n2 > params.max_length {
                    n1 = params.max_length / 2;
                    n2 = n1 + params.max_length % 2;
                }
                let (n1, n2) = if swap { (n2, n1) } else { (n1, n2) };
                encodings[0].truncate(n1, params.stride, params.direction);
                encodings[1].truncate(n2, params.stride, params.direction);
            } else {
                encodings[0].truncate(total_length - to_remove, params.stride, params.direction);
            }
        }
        TruncationStrategy::OnlyFirst | TruncationStrategy::OnlySecond => {
            let target = if params.strategy == TruncationStrategy::OnlyFirst {
                0
            } else if encodings.len() > 1 {
                1
            } else {
                return Err(Box::new(Error::SecondSequenceNotProvided));
            };
            let target_length = encodings[target].len();
            if target_length > to_remove {
                encodings[target].truncate(
                    target_length - to_remove,
                    params.stride,
                    params.direction,
                );
            }
        }
    }

    Ok(())
}
