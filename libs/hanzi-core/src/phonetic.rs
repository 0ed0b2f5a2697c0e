//! Phonetic codes for near-homophone matching.
//!
//! Speech recognition often returns a homophone of a rare component name
//! ("hoarse" for "horse"). Comparing Double Metaphone codes instead of
//! spellings accepts those answers. Only the primary code is used.

use crate::matching::normalize;
use rphonetic::DoubleMetaphone;

/// Maps words to their primary Double Metaphone code.
pub struct PhoneticEncoder {
    encoder: DoubleMetaphone,
}

impl Default for PhoneticEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for PhoneticEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhoneticEncoder").finish_non_exhaustive()
    }
}

impl PhoneticEncoder {
    pub fn new() -> Self {
        Self {
            encoder: DoubleMetaphone::default(),
        }
    }

    /// Primary code of a single word.
    ///
    /// Double Metaphone only handles ASCII; other words, and words that
    /// encode to nothing, keep their normalized spelling.
    pub fn word_code(&self, word: &str) -> String {
        let normalized = normalize(word);
        if normalized.is_empty() || !normalized.is_ascii() {
            return normalized;
        }
        let code = self.encoder.double_metaphone(&normalized).primary().to_string();
        if code.is_empty() {
            normalized
        } else {
            code
        }
    }

    /// Code of a possibly multi-word name, word by word, space separated.
    pub fn phrase_code(&self, phrase: &str) -> String {
        normalize(phrase)
            .split(' ')
            .filter(|word| !word.is_empty())
            .map(|word| self.word_code(word))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Codes of a word sequence, dropping words with no code.
    pub fn encode_all<S: AsRef<str>>(&self, words: &[S]) -> Vec<String> {
        words
            .iter()
            .map(|word| self.phrase_code(word.as_ref()))
            .filter(|code| !code.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn homophones_share_a_code() {
        let encoder = PhoneticEncoder::new();
        assert_eq!(encoder.word_code("horse"), encoder.word_code("hoarse"));
        assert_eq!(encoder.word_code("Horse,"), encoder.word_code("horse"));
    }

    #[test]
    fn different_words_differ() {
        let encoder = PhoneticEncoder::new();
        assert_ne!(encoder.word_code("horse"), encoder.word_code("mouth"));
        assert_ne!(encoder.word_code("tree"), encoder.word_code("sun"));
    }

    #[test]
    fn non_ascii_keeps_spelling() {
        let encoder = PhoneticEncoder::new();
        assert_eq!(encoder.word_code("马"), "马");
        assert_eq!(encoder.word_code("..."), "");
    }

    #[test]
    fn phrases_are_coded_word_by_word() {
        let encoder = PhoneticEncoder::new();
        let code = encoder.phrase_code("walking stick");
        assert_eq!(code.split(' ').count(), 2);
        assert_eq!(
            code,
            format!("{} {}", encoder.word_code("walking"), encoder.word_code("stick"))
        );
    }

    #[test]
    fn encode_all_drops_empty_words() {
        let encoder = PhoneticEncoder::new();
        assert_eq!(encoder.encode_all(&["horse", "--", "sun"]).len(), 2);
    }
}
