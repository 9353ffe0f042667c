//! Intent classification.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                    IntentClassifier                       │
//! │                                                          │
//! │  (TokenSequence, ProvinceId)                             │
//! │            │                                             │
//! │            ▼                                             │
//! │   ┌──────────────────┐     ┌────────────────────────┐    │
//! │   │ Classifier(trait)│────▶│ ServingClassifier      │    │
//! │   │  scores()        │     │  POST /v1/models/…     │    │
//! │   └────────┬─────────┘     └────────────────────────┘    │
//! │            ▼                                             │
//! │   stable argmax → IntentLabelSet → ClassificationOutcome │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! The model itself is opaque; [`Classifier`] is the only seam, so tests
//! and alternative inference engines plug in without touching the rest of
//! the pipeline.

pub mod intent;
pub mod model;
pub mod serving;

// ── Public re-exports ──────────────────────────────────────────────────────

pub use intent::{stable_argmax, ClassificationOutcome, ClassificationResult, IntentClassifier};
pub use model::{Classifier, ClassifierError};
pub use serving::ServingClassifier;

#[cfg(test)]
pub use model::MockClassifier;
