//! Static model artifacts: token vocabulary, intent labels, province map.
//!
//! All three are exported alongside the classifier and loaded once at
//! startup.  Loading validates their structure and fails fast with an
//! [`ArtifactError`]; afterwards they are immutable and shared read-only.

pub mod labels;
pub mod province;
pub mod vocabulary;

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::ArtifactConfig;

pub use labels::IntentLabelSet;
pub use province::{ProvinceId, ProvinceMap, REVERSE_KEY, UNKNOWN_PROVINCE};
pub use vocabulary::{Vocabulary, DEFAULT_OOV_ID, OOV_TOKEN, PAD_ID};

// ---------------------------------------------------------------------------
// ArtifactError
// ---------------------------------------------------------------------------

/// Errors raised while loading an artifact file.  All of them are fatal.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// The file could not be read.
    #[error("cannot read artifact {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON of the expected shape.
    #[error("malformed artifact {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The JSON parsed but violates a structural requirement.
    #[error("invalid artifact {}: {reason}", path.display())]
    Invalid { path: PathBuf, reason: String },
}

impl ArtifactError {
    pub(crate) fn invalid(path: &Path, reason: impl Into<String>) -> Self {
        ArtifactError::Invalid {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}

/// Read and parse a JSON artifact, attaching the path to any error.
pub(crate) fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let data = std::fs::read_to_string(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&data).map_err(|source| ArtifactError::Json {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Artifacts
// ---------------------------------------------------------------------------

/// The three lookup tables the pipeline needs, loaded together.
#[derive(Debug, Clone)]
pub struct Artifacts {
    pub vocabulary: Vocabulary,
    pub labels: IntentLabelSet,
    pub provinces: ProvinceMap,
}

impl Artifacts {
    /// Load every artifact named in `config`.
    pub fn load(config: &ArtifactConfig) -> Result<Self, ArtifactError> {
        let vocabulary = Vocabulary::load(&config.vocabulary)?;
        let labels = IntentLabelSet::load(&config.intent_labels)?;
        let provinces = ProvinceMap::load(&config.province_map)?;

        log::info!(
            "artifacts loaded: {} words, {} intents, {} provinces, {} aliases",
            vocabulary.len(),
            labels.len(),
            provinces.len(),
            provinces.alias_count()
        );

        Ok(Self {
            vocabulary,
            labels,
            provinces,
        })
    }
}
