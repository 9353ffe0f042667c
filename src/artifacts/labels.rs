//! Ordered intent labels; position `i` names model output slot `i`.

use std::path::Path;

use super::{read_json, ArtifactError};

#[derive(Debug, Clone, PartialEq)]
pub struct IntentLabelSet {
    labels: Vec<String>,
}

impl IntentLabelSet {
    pub fn new(labels: Vec<String>) -> Self {
        Self { labels }
    }

    /// Load the JSON array of label strings at `path`.
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let labels: Vec<String> = read_json(path)?;
        if labels.is_empty() {
            return Err(ArtifactError::invalid(path, "intent label list is empty"));
        }
        Ok(Self::new(labels))
    }

    /// Label for output slot `index`.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn preserves_file_order() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("labels.json");
        std::fs::write(&path, r#"["greeting", "looking_for_bedspace", "selling"]"#).unwrap();

        let labels = IntentLabelSet::load(&path).expect("load");
        assert_eq!(labels.get(0), Some("greeting"));
        assert_eq!(labels.get(1), Some("looking_for_bedspace"));
        assert_eq!(labels.get(2), Some("selling"));
        assert_eq!(labels.get(3), None);
    }

    #[test]
    fn empty_list_is_invalid() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("labels.json");
        std::fs::write(&path, "[]").unwrap();

        assert!(matches!(
            IntentLabelSet::load(&path),
            Err(ArtifactError::Invalid { .. })
        ));
    }
}
