//! Token vocabulary exported by the tokenizer used at training time.

use std::collections::HashMap;
use std::path::Path;

use super::{read_json, ArtifactError};

/// Key under which the tokenizer stores the out-of-vocabulary id.
pub const OOV_TOKEN: &str = "<OOV>";
/// OOV id used when the vocabulary file has no [`OOV_TOKEN`] entry.
pub const DEFAULT_OOV_ID: u32 = 1;
/// Padding id; never assigned to a word.
pub const PAD_ID: u32 = 0;

/// Lowercase word → integer id mapping.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    words: HashMap<String, u32>,
    oov_id: u32,
}

impl Vocabulary {
    /// Build from an in-memory map.  The OOV id is taken from the map.
    pub fn new(words: HashMap<String, u32>) -> Self {
        let oov_id = words.get(OOV_TOKEN).copied().unwrap_or(DEFAULT_OOV_ID);
        Self { words, oov_id }
    }

    /// Load the JSON object `{ "word": id, ... }` at `path`.
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let words: HashMap<String, u32> = read_json(path)?;
        if words.is_empty() {
            return Err(ArtifactError::invalid(path, "vocabulary is empty"));
        }
        if words.iter().any(|(w, id)| *id == PAD_ID && w != OOV_TOKEN) {
            log::warn!("vocabulary maps a word to the padding id {PAD_ID}");
        }
        Ok(Self::new(words))
    }

    /// Id for `word`, or the OOV id when the word is unknown.
    pub fn id_of(&self, word: &str) -> u32 {
        self.words.get(word).copied().unwrap_or(self.oov_id)
    }

    pub fn oov_id(&self) -> u32 {
        self.oov_id
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn vocab(pairs: &[(&str, u32)]) -> Vocabulary {
        Vocabulary::new(pairs.iter().map(|(w, i)| (w.to_string(), *i)).collect())
    }

    #[test]
    fn known_word_maps_to_its_id() {
        let v = vocab(&[("<OOV>", 1), ("bed", 7)]);
        assert_eq!(v.id_of("bed"), 7);
    }

    #[test]
    fn unknown_word_maps_to_file_oov_id() {
        let v = vocab(&[("<OOV>", 3), ("bed", 7)]);
        assert_eq!(v.id_of("castle"), 3);
    }

    #[test]
    fn oov_defaults_to_one_when_key_absent() {
        let v = vocab(&[("bed", 7)]);
        assert_eq!(v.oov_id(), DEFAULT_OOV_ID);
        assert_eq!(v.id_of("castle"), 1);
    }

    #[test]
    fn load_rejects_non_integer_ids() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("vocab.json");
        std::fs::write(&path, r#"{"bed": "seven"}"#).unwrap();

        assert!(matches!(
            Vocabulary::load(&path),
            Err(ArtifactError::Json { .. })
        ));
    }

    #[test]
    fn load_rejects_empty_object() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("vocab.json");
        std::fs::write(&path, "{}").unwrap();

        assert!(matches!(
            Vocabulary::load(&path),
            Err(ArtifactError::Invalid { .. })
        ));
    }
}
