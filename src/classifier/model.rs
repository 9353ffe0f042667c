//! The [`Classifier`] capability: token sequence + province → raw scores.
//!
//! [`Classifier`] is object-safe and `Send + Sync` so it can be held behind
//! an `Arc<dyn Classifier>`.  [`MockClassifier`] (available under
//! `#[cfg(test)]`) returns a pre-configured score vector and counts calls.

use async_trait::async_trait;
use thiserror::Error;

use crate::artifacts::ProvinceId;
use crate::text::TokenSequence;

// ---------------------------------------------------------------------------
// ClassifierError
// ---------------------------------------------------------------------------

/// Errors raised by an inference backend.
#[derive(Debug, Clone, Error)]
pub enum ClassifierError {
    /// HTTP transport or connection error.
    #[error("model request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("model request timed out")]
    Timeout,

    /// The backend answered with a non-success status.
    #[error("model server returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The backend response did not contain a score vector.
    #[error("unexpected model response: {0}")]
    Parse(String),

    /// The backend failed while running the model.
    #[error("inference failed: {0}")]
    Inference(String),
}

impl From<reqwest::Error> for ClassifierError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ClassifierError::Timeout
        } else {
            ClassifierError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Classifier trait
// ---------------------------------------------------------------------------

/// A pre-trained two-input intent model.
///
/// # Contract
///
/// - Called with a batch of one: `tokens` has the model's fixed width and
///   `province` is a single scalar feature.
/// - Returns one score per intent label, in label order.  Scores are a
///   ranking signal and need not sum to one.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn scores(
        &self,
        tokens: &TokenSequence,
        province: ProvinceId,
    ) -> Result<Vec<f32>, ClassifierError>;
}

// Compile-time assertion: Box<dyn Classifier> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn Classifier>) {}
};

// ---------------------------------------------------------------------------
// MockClassifier  (test-only)
// ---------------------------------------------------------------------------

#[cfg(test)]
pub struct MockClassifier {
    response: Result<Vec<f32>, ClassifierError>,
    calls: std::sync::Mutex<Vec<(TokenSequence, ProvinceId)>>,
}

#[cfg(test)]
impl MockClassifier {
    /// A mock that always returns `Ok(scores)`.
    pub fn ok(scores: Vec<f32>) -> Self {
        Self {
            response: Ok(scores),
            calls: Default::default(),
        }
    }

    /// A mock that always returns `Err(error)`.
    pub fn err(error: ClassifierError) -> Self {
        Self {
            response: Err(error),
            calls: Default::default(),
        }
    }

    /// Inputs of every call so far.
    pub fn calls(&self) -> Vec<(TokenSequence, ProvinceId)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[cfg(test)]
#[async_trait]
impl Classifier for MockClassifier {
    async fn scores(
        &self,
        tokens: &TokenSequence,
        province: ProvinceId,
    ) -> Result<Vec<f32>, ClassifierError> {
        self.calls.lock().unwrap().push((tokens.clone(), province));
        self.response.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_records_inputs() {
        let mock = MockClassifier::ok(vec![0.2, 0.8]);
        let tokens = TokenSequence::from_ids([3, 4], 5);

        let scores = mock.scores(&tokens, ProvinceId(2)).await.unwrap();

        assert_eq!(scores, vec![0.2, 0.8]);
        assert_eq!(mock.calls(), vec![(tokens, ProvinceId(2))]);
    }

    #[tokio::test]
    async fn mock_err_returns_configured_error() {
        let mock = MockClassifier::err(ClassifierError::Inference("boom".into()));
        let tokens = TokenSequence::from_ids(std::iter::empty(), 5);

        let err = mock.scores(&tokens, ProvinceId(0)).await.unwrap_err();
        assert!(matches!(err, ClassifierError::Inference(_)));
        assert_eq!(mock.call_count(), 1);
    }

    #[test]
    fn box_dyn_classifier_compiles() {
        let _: Box<dyn Classifier> = Box::new(MockClassifier::ok(vec![1.0]));
    }

    #[test]
    fn status_error_display_includes_code() {
        let e = ClassifierError::Status {
            status: 503,
            body: "loading".into(),
        };
        assert!(e.to_string().contains("503"));
    }
}
