//! `ServingClassifier` — runs the exported model behind a model server.
//!
//! Speaks the TensorFlow-Serving REST predict API:
//!
//! ```text
//! POST {base_url}/v1/models/{model}:predict
//! { "inputs": { "text_input": [[t0, …, t29]], "prov_input": [[p]] } }
//!
//! 200 { "outputs": [[s0, …, sN]] }
//! ```
//!
//! Row-format responses (`"predictions"`) and unbatched vectors are accepted
//! as well.  All connection details come from [`ClassifierConfig`].

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::artifacts::ProvinceId;
use crate::classifier::model::{Classifier, ClassifierError};
use crate::config::ClassifierConfig;
use crate::text::TokenSequence;

pub struct ServingClassifier {
    client: reqwest::Client,
    config: ClassifierConfig,
}

impl ServingClassifier {
    /// Build a classifier from config without contacting the server.
    ///
    /// The HTTP client carries the per-request timeout from
    /// `config.timeout_secs`; a default client is the fallback if the
    /// builder fails.
    pub fn from_config(config: &ClassifierConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
        }
    }

    /// Build and verify the model is loaded.  Used at startup, where a
    /// failure is fatal.
    pub async fn connect(config: &ClassifierConfig) -> Result<Self, ClassifierError> {
        let classifier = Self::from_config(config);
        classifier.check_ready().await?;
        log::info!(
            "model `{}` available at {}",
            classifier.config.model,
            classifier.config.base_url
        );
        Ok(classifier)
    }

    /// Query the model status endpoint.
    pub async fn check_ready(&self) -> Result<(), ClassifierError> {
        let response = self.client.get(self.model_url()).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClassifierError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }

    fn model_url(&self) -> String {
        format!(
            "{}/v1/models/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    fn request_body(&self, tokens: &TokenSequence, province: ProvinceId) -> Value {
        let mut inputs = serde_json::Map::new();
        inputs.insert(
            self.config.text_input.clone(),
            serde_json::json!([tokens.as_slice()]),
        );
        inputs.insert(
            self.config.province_input.clone(),
            serde_json::json!([[province.0]]),
        );
        serde_json::json!({ "inputs": inputs })
    }
}

/// Pull the first score row out of a predict response.
fn parse_scores(json: &Value) -> Result<Vec<f32>, ClassifierError> {
    if let Some(err) = json.get("error").and_then(Value::as_str) {
        return Err(ClassifierError::Inference(err.to_string()));
    }

    let batch = json
        .get("outputs")
        .or_else(|| json.get("predictions"))
        .and_then(Value::as_array)
        .ok_or_else(|| ClassifierError::Parse("missing `outputs` array".into()))?;

    // Batched `[[…]]` or a bare `[…]` vector.
    let row = match batch.first() {
        Some(Value::Array(row)) => row,
        _ => batch,
    };

    row.iter()
        .map(|v| {
            v.as_f64()
                .map(|s| s as f32)
                .ok_or_else(|| ClassifierError::Parse(format!("non-numeric score: {v}")))
        })
        .collect()
}

#[async_trait]
impl Classifier for ServingClassifier {
    async fn scores(
        &self,
        tokens: &TokenSequence,
        province: ProvinceId,
    ) -> Result<Vec<f32>, ClassifierError> {
        let url = format!("{}:predict", self.model_url());
        let response = self
            .client
            .post(&url)
            .json(&self.request_body(tokens, province))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClassifierError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| ClassifierError::Parse(e.to_string()))?;

        parse_scores(&json)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
