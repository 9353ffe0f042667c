//! Score interpretation: argmax over the model output, mapped to a label.

use std::fmt;
use std::sync::Arc;

use crate::artifacts::{IntentLabelSet, ProvinceId};
use crate::classifier::model::Classifier;
use crate::text::TokenSequence;

// ---------------------------------------------------------------------------
// ClassificationResult / ClassificationOutcome
// ---------------------------------------------------------------------------

/// The top-ranked intent for one input text.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    /// Label of the winning output slot.
    pub label: String,
    /// Score of the winning slot; the maximum of the output vector.
    pub confidence: f32,
    /// Index of the winning slot.
    pub index: usize,
}

/// Per-item classification channel.  Never an `Err`: a failure is a value
/// the orchestrator inspects and moves past.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassificationOutcome {
    Classified(ClassificationResult),
    /// Inference failed or returned unusable scores.
    Failed(String),
}

impl ClassificationOutcome {
    pub fn result(&self) -> Option<&ClassificationResult> {
        match self {
            ClassificationOutcome::Classified(r) => Some(r),
            ClassificationOutcome::Failed(_) => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ClassificationOutcome::Failed(_))
    }
}

impl fmt::Display for ClassificationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassificationOutcome::Classified(r) => {
                write!(f, "{} ({:.2}%)", r.label, r.confidence * 100.0)
            }
            ClassificationOutcome::Failed(reason) => write!(f, "classification failed: {reason}"),
        }
    }
}

// ---------------------------------------------------------------------------
// stable_argmax
// ---------------------------------------------------------------------------

/// Index and value of the largest score.  Ties go to the lowest index and
/// NaN never wins.  `None` for an empty or all-NaN slice.
pub fn stable_argmax(scores: &[f32]) -> Option<(usize, f32)> {
    scores
        .iter()
        .copied()
        .enumerate()
        .filter(|(_, s)| !s.is_nan())
        .fold(None, |best, (i, s)| match best {
            Some((_, b)) if s <= b => best,
            _ => Some((i, s)),
        })
}

// ---------------------------------------------------------------------------
// IntentClassifier
// ---------------------------------------------------------------------------

/// Wraps a [`Classifier`] and turns its scores into a labelled outcome.
pub struct IntentClassifier {
    model: Arc<dyn Classifier>,
    labels: Arc<IntentLabelSet>,
}

impl IntentClassifier {
    pub fn new(model: Arc<dyn Classifier>, labels: Arc<IntentLabelSet>) -> Self {
        Self { model, labels }
    }

    /// Run the model once and pick the top intent.
    ///
    /// Backend errors and malformed score vectors are reported as
    /// [`ClassificationOutcome::Failed`]; nothing propagates.
    pub async fn classify(
        &self,
        tokens: &TokenSequence,
        province: ProvinceId,
    ) -> ClassificationOutcome {
        let scores = match self.model.scores(tokens, province).await {
            Ok(scores) => scores,
            Err(e) => return ClassificationOutcome::Failed(e.to_string()),
        };

        if scores.len() != self.labels.len() {
            return ClassificationOutcome::Failed(format!(
                "model returned {} scores for {} intent labels",
                scores.len(),
                self.labels.len()
            ));
        }

        let Some((index, confidence)) = stable_argmax(&scores) else {
            return ClassificationOutcome::Failed("model returned no usable scores".into());
        };

        match self.labels.get(index) {
            Some(label) => ClassificationOutcome::Classified(ClassificationResult {
                label: label.to_string(),
                confidence,
                index,
            }),
            None => ClassificationOutcome::Failed(format!("no label for output slot {index}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
