//! Confidence/prefix policy and the reply template.
//!
//! An item is answered only when its intent label starts with one of the
//! "seeking" prefixes **and** its confidence is strictly above the
//! threshold.  Everything else is a normal no-op, not an error.

use crate::classifier::{ClassificationOutcome, ClassificationResult};
use crate::config::ReplyConfig;

// ---------------------------------------------------------------------------
// ReplyDecision
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum ReplyDecision {
    Reply { message: String },
    NoReply { reason: String },
}

impl ReplyDecision {
    pub fn should_reply(&self) -> bool {
        matches!(self, ReplyDecision::Reply { .. })
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            ReplyDecision::Reply { message } => Some(message.as_str()),
            ReplyDecision::NoReply { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// ReplyPolicy
// ---------------------------------------------------------------------------

/// Threshold, prefixes and template, taken from [`ReplyConfig`].
#[derive(Debug, Clone)]
pub struct ReplyPolicy {
    pub confidence_threshold: f32,
    pub intent_prefixes: Vec<String>,
    pub template: String,
    pub call_to_action: String,
}

impl ReplyPolicy {
    pub fn from_config(config: &ReplyConfig) -> Self {
        Self {
            confidence_threshold: config.confidence_threshold,
            intent_prefixes: config.intent_prefixes.clone(),
            template: config.template.clone(),
            call_to_action: config.call_to_action.clone(),
        }
    }

    fn is_seeking(&self, label: &str) -> bool {
        self.intent_prefixes
            .iter()
            .any(|p| !p.is_empty() && label.starts_with(p.as_str()))
    }
}

impl Default for ReplyPolicy {
    fn default() -> Self {
        Self::from_config(&ReplyConfig::default())
    }
}

// ---------------------------------------------------------------------------
// ReplyDecisionEngine
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct ReplyDecisionEngine {
    policy: ReplyPolicy,
}

impl ReplyDecisionEngine {
    pub fn new(policy: ReplyPolicy) -> Self {
        Self { policy }
    }

    pub fn decide(&self, result: &ClassificationResult) -> ReplyDecision {
        if !self.policy.is_seeking(&result.label) {
            return ReplyDecision::NoReply {
                reason: format!("intent `{}` is not reply-worthy", result.label),
            };
        }

        if result.confidence <= self.policy.confidence_threshold {
            return ReplyDecision::NoReply {
                reason: format!(
                    "confidence {:.4} not above threshold {}",
                    result.confidence, self.policy.confidence_threshold
                ),
            };
        }

        ReplyDecision::Reply {
            message: self.render(&result.label),
        }
    }

    /// A failed classification never triggers a reply.
    pub fn decide_outcome(&self, outcome: &ClassificationOutcome) -> ReplyDecision {
        match outcome {
            ClassificationOutcome::Classified(result) => self.decide(result),
            ClassificationOutcome::Failed(reason) => ReplyDecision::NoReply {
                reason: format!("classification failed: {reason}"),
            },
        }
    }

    /// Fill the template for `label` (`looking_for_house` → `looking for house`).
    pub fn render(&self, label: &str) -> String {
        self.policy
            .template
            .replace("{intent}", &label.replace('_', " "))
            .replace("{cta}", &self.policy.call_to_action)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
