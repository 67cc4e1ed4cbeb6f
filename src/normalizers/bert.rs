use serde::{Deserialize, Serialize};
use unicode_categories::UnicodeCategories;
use unicode_normalization_alignments::UnicodeNormalization;

use crate::tokenizer::{NormalizedString, Normalizer, Offsets, Result};

/// Checks whether a character is a control character. Tab, newline and
/// carriage return count as whitespace here, not as controls.
fn is_control(c: char) -> bool {
    match c {
        '\t' | '\n' | '\r' => false,
        // Covers the whole C category: Cc, Cf, Cn and Co
        _ => c.is_other(),
    }
}

/// Checks whether a character is a CJK Unified Ideograph, including the
/// extension blocks A through G
fn is_chinese_char(c: char) -> bool {
    matches!(c as u32,
        0x4E00..=0x9FFF
        | 0x3400..=0x4DBF
        | 0x20000..=0x2A6DF
        | 0x2A700..=0x2B73F
        | 0x2B740..=0x2B81F
        | 0x2B820..=0x2CEAF
        | 0x2CEB0..=0x2EBEF
        | 0x30000..=0x3134F)
}

fn default_true() -> bool {
    true
}

/// The BERT text normalizer: unicode cleanup, ideograph isolation, accent
/// stripping and lowercasing, each keeping the offsets array in sync with the
/// rewritten text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BertNormalizer {
    /// Whether to remove control characters and replace all sorts of
    /// whitespace by the classic one
    #[serde(default)]
    pub clean_text: bool,
    /// Whether to put spaces around chinese characters so they get split
    #[serde(default)]
    pub handle_chinese_chars: bool,
    /// Whether to strip accents
    #[serde(default = "default_true")]
    pub strip_accents: bool,
    /// Whether to lowercase the input
    #[serde(default)]
    pub lowercase: bool,
}

impl Default for BertNormalizer {
    fn default() -> Self {
        BertNormalizer {
            clean_text: true,
            handle_chinese_chars: true,
            strip_accents: true,
            lowercase: true,
        }
    }
}

impl BertNormalizer {
    pub fn new(
        clean_text: bool,
        handle_chinese_chars: bool,
        strip_accents: bool,
        lowercase: bool,
    ) -> Self {
        BertNormalizer {
            clean_text,
            handle_chinese_chars,
            strip_accents,
            lowercase,
        }
    }

    fn do_clean_text(&self, normalized: &mut NormalizedString) {
        let cleaned: Vec<(char, Offsets)> = normalized
            .get()
            .chars()
            .zip(normalized.offsets().iter().copied())
            .filter(|(c, _)| *c != '\0' && *c != '\u{FFFD}' && !is_control(*c))
            .map(|(c, offset)| (if c.is_whitespace() { ' ' } else { c }, offset))
            .collect();
        normalized.transform(cleaned);
    }

    fn do_handle_chinese_chars(&self, normalized: &mut NormalizedString) {
        let mut spaced = Vec::with_capacity(normalized.len());
        for (c, offset) in normalized.get().chars().zip(normalized.offsets().iter().copied()) {
            if is_chinese_char(c) {
                // Both synthetic spaces map back to the ideograph itself
                spaced.push((' ', offset));
                spaced.push((c, offset));
                spaced.push((' ', offset));
            } else {
                spaced.push((c, offset));
            }
        }
        normalized.transform(spaced);
    }

    fn do_strip_accents(&self, normalized: &mut NormalizedString) {
        let mut stripped = Vec::with_capacity(normalized.len());
        let mut buffer = [0u8; 4];
        for (c, offset) in normalized.get().chars().zip(normalized.offsets().iter().copied()) {
            // NFD-decompose one code point at a time; everything a code point
            // decomposes into keeps that code point's offsets
            for (decomposed, _) in c.encode_utf8(&mut buffer).nfd() {
                if !decomposed.is_mark_nonspacing() {
                    stripped.push((decomposed, offset));
                }
            }
        }
        normalized.transform(stripped);
    }

    fn do_lowercase(&self, normalized: &mut NormalizedString) {
        let mut lowercased = Vec::with_capacity(normalized.len());
        for (c, offset) in normalized.get().chars().zip(normalized.offsets().iter().copied()) {
            for lower in c.to_lowercase() {
                lowercased.push((lower, offset));
            }
        }
        normalized.transform(lowercased);
    }
}

impl Normalizer for BertNormalizer {
    fn normalize(&self, normalized: &mut NormalizedString) -> Result<()> {
        if self.clean_text {
            self.do_clean_text(normalized);
        }
        if self.handle_chinese_chars {
            self.do_handle_chinese_chars(normalized);
        }
        if self.strip_accents {
            self.do_strip_accents(normalized);
        }
        if self.lowercase {
            self.do_lowercase(normalized);
        }
        Ok(())
    }
}
