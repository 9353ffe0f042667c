//! Tokenization into a fixed-length integer sequence.

use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::artifacts::{Vocabulary, PAD_ID};
use crate::config::PreprocessConfig;

static NON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]").expect("Invalid regex: non-word pattern"));

// ---------------------------------------------------------------------------
// TokenSequence
// ---------------------------------------------------------------------------

/// Token ids of exactly the configured width, right-padded with [`PAD_ID`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSequence(Vec<u32>);

impl TokenSequence {
    /// Keep the first `max_len` ids and pad the remainder with [`PAD_ID`].
    pub fn from_ids(ids: impl IntoIterator<Item = u32>, max_len: usize) -> Self {
        let mut tokens: Vec<u32> = ids.into_iter().take(max_len).collect();
        tokens.resize(max_len, PAD_ID);
        Self(tokens)
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of leading non-padding positions.
    pub fn word_count(&self) -> usize {
        self.0.iter().take_while(|&&id| id != PAD_ID).count()
    }
}

// ---------------------------------------------------------------------------
// TextPreprocessor
// ---------------------------------------------------------------------------

/// Converts raw post/comment text into a [`TokenSequence`].
#[derive(Debug, Clone)]
pub struct TextPreprocessor {
    vocabulary: Arc<Vocabulary>,
    max_len: usize,
    strip_punctuation: bool,
}

impl TextPreprocessor {
    pub fn new(vocabulary: Arc<Vocabulary>, config: &PreprocessConfig) -> Self {
        Self {
            vocabulary,
            max_len: config.max_len,
            strip_punctuation: config.strip_punctuation,
        }
    }

    /// Lowercase, split on whitespace, look every word up, fit to width.
    ///
    /// Punctuation stays attached to its word unless `strip_punctuation` is
    /// enabled, so `"lusaka!"` is a different (usually unknown) word from
    /// `"lusaka"`.
    pub fn tokenize(&self, text: &str) -> TokenSequence {
        let mut normalized = text.to_lowercase();
        if self.strip_punctuation {
            normalized = NON_WORD.replace_all(&normalized, " ").into_owned();
        }

        let ids = normalized
            .split_whitespace()
            .map(|word| self.vocabulary.id_of(word));

        TokenSequence::from_ids(ids, self.max_len)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const MAX_LEN: usize = 30;

    fn vocabulary() -> Arc<Vocabulary> {
        let words: HashMap<String, u32> = [
            ("<OOV>", 1),
            ("i", 2),
            ("need", 3),
            ("a", 4),
            ("bed", 5),
            ("space", 6),
            ("in", 7),
            ("lusaka", 8),
            ("word", 9),
        ]
        .into_iter()
        .map(|(w, id)| (w.to_string(), id))
        .collect();
        Arc::new(Vocabulary::new(words))
    }

    fn preprocessor() -> TextPreprocessor {
        TextPreprocessor::new(vocabulary(), &PreprocessConfig::default())
    }

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    #[test]
    fn length_is_always_max_len() {
        let p = preprocessor();
        for n in [0, 1, 29, 30, 1000] {
            assert_eq!(p.tokenize(&words(n)).len(), MAX_LEN, "input of {n} words");
        }
    }

    #[test]
    fn empty_text_is_all_padding() {
        let seq = preprocessor().tokenize("");
        assert!(seq.as_slice().iter().all(|&id| id == PAD_ID));
        assert_eq!(seq.word_count(), 0);
    }

    #[test]
    fn whitespace_only_text_is_all_padding() {
        let seq = preprocessor().tokenize("   \t\n ");
        assert!(seq.as_slice().iter().all(|&id| id == PAD_ID));
    }

    #[test]
    fn single_word_occupies_position_zero() {
        let seq = preprocessor().tokenize("bed");
        assert_eq!(seq.as_slice()[0], 5);
        assert!(seq.as_slice()[1..].iter().all(|&id| id == PAD_ID));
    }

    #[test]
    fn text_is_lowercased() {
        let seq = preprocessor().tokenize("I NEED A Bed");
        assert_eq!(&seq.as_slice()[..4], &[2, 3, 4, 5]);
    }

    #[test]
    fn trailing_positions_are_padding() {
        let seq = preprocessor().tokenize("i need a bed space");
        assert_eq!(seq.word_count(), 5);
        assert!(seq.as_slice()[5..].iter().all(|&id| id == PAD_ID));
    }

    #[test]
    fn words_beyond_max_len_never_influence_result() {
        let p = preprocessor();
        let head = words(MAX_LEN);
        let a = p.tokenize(&format!("{head} bed space lusaka"));
        let b = p.tokenize(&format!("{head} totally different tail"));
        assert_eq!(a, b);
        assert!(a.as_slice().iter().all(|&id| id == 9));
    }

    #[test]
    fn unknown_word_maps_to_oov_not_padding() {
        let seq = preprocessor().tokenize("need castle");
        assert_eq!(seq.as_slice()[0], 3);
        assert_eq!(seq.as_slice()[1], 1);
        assert_ne!(seq.as_slice()[1], PAD_ID);
    }

    #[test]
    fn punctuation_is_kept_by_default() {
        let seq = preprocessor().tokenize("lusaka!");
        assert_eq!(seq.as_slice()[0], 1);
    }

    #[test]
    fn punctuation_can_be_stripped() {
        let config = PreprocessConfig {
            strip_punctuation: true,
            ..PreprocessConfig::default()
        };
        let p = TextPreprocessor::new(vocabulary(), &config);
        let seq = p.tokenize("Bed-space, Lusaka!");
        assert_eq!(&seq.as_slice()[..3], &[5, 6, 8]);
    }

    #[test]
    fn from_ids_truncates_and_pads() {
        assert_eq!(TokenSequence::from_ids([4, 5, 6], 2).as_slice(), &[4, 5]);
        assert_eq!(TokenSequence::from_ids([4], 3).as_slice(), &[4, 0, 0]);
    }
}
