//! Orchestrator — drives each fetched item through the decision pipeline.
//!
//! [`Orchestrator`] owns the seen registry and processes items one at a
//! time, in fetch order.  Every per-item problem (inference failure,
//! undelivered reply) is logged and contained; the loop always reaches the
//! end of the batch.
//!
//! # Item flow
//!
//! ```text
//! FetchedItem
//!   ├─ message.trim().is_empty()  → Skipped
//!   ├─ seen.has_seen(id)          → Seen
//!   └─ seen.mark_seen(id)
//!        └─ tokenize + resolve + classify
//!              ├─ Failed              → Ignored
//!              └─ decide
//!                   ├─ NoReply        → Ignored
//!                   └─ Reply          → sink.post_reply(id, msg) → Replied
//! ```

use std::sync::Arc;

use crate::artifacts::{Artifacts, ProvinceId};
use crate::classifier::{ClassificationOutcome, Classifier, IntentClassifier};
use crate::config::AppConfig;
use crate::dedup::SeenRegistry;
use crate::platform::{FetchedItem, ItemSource, ReplySink};
use crate::reply::{ReplyDecision, ReplyDecisionEngine, ReplyPolicy};
use crate::text::{ProvinceResolver, TextPreprocessor, TokenSequence};

use super::state::{ItemState, RunSummary};

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

/// Everything the pipeline derives from one text, without side effects.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub tokens: TokenSequence,
    pub province_name: String,
    pub province: ProvinceId,
    pub outcome: ClassificationOutcome,
    pub decision: ReplyDecision,
}

// ---------------------------------------------------------------------------
// Orchestrator
// ---------------------------------------------------------------------------

pub struct Orchestrator {
    preprocessor: TextPreprocessor,
    resolver: ProvinceResolver,
    classifier: IntentClassifier,
    decisions: ReplyDecisionEngine,
    seen: Box<dyn SeenRegistry>,
    sink: Arc<dyn ReplySink>,
}

impl Orchestrator {
    /// Create a new orchestrator from ready-made components.
    pub fn new(
        preprocessor: TextPreprocessor,
        resolver: ProvinceResolver,
        classifier: IntentClassifier,
        decisions: ReplyDecisionEngine,
        seen: Box<dyn SeenRegistry>,
        sink: Arc<dyn ReplySink>,
    ) -> Self {
        Self {
            preprocessor,
            resolver,
            classifier,
            decisions,
            seen,
            sink,
        }
    }

    /// Wire every component from loaded artifacts and config.
    pub fn build(
        artifacts: Artifacts,
        config: &AppConfig,
        model: Arc<dyn Classifier>,
        seen: Box<dyn SeenRegistry>,
        sink: Arc<dyn ReplySink>,
    ) -> Self {
        let Artifacts {
            vocabulary,
            labels,
            provinces,
        } = artifacts;

        Self::new(
            TextPreprocessor::new(Arc::new(vocabulary), &config.preprocess),
            ProvinceResolver::new(Arc::new(provinces)),
            IntentClassifier::new(model, Arc::new(labels)),
            ReplyDecisionEngine::new(ReplyPolicy::from_config(&config.reply)),
            seen,
            sink,
        )
    }

    pub fn seen(&self) -> &dyn SeenRegistry {
        self.seen.as_ref()
    }

    // -----------------------------------------------------------------------
    // Text analysis
    // -----------------------------------------------------------------------

    /// Tokenize, resolve, classify and decide for `text`.
    pub async fn analyze(&self, text: &str) -> Analysis {
        let tokens = self.preprocessor.tokenize(text);
        let (name, province) = self.resolver.locate(text);
        let province_name = name.to_string();

        log::debug!(
            "analyze: {} words, province {province_name} ({province})",
            tokens.word_count()
        );

        let outcome = self.classifier.classify(&tokens, province).await;
        let decision = self.decisions.decide_outcome(&outcome);

        Analysis {
            tokens,
            province_name,
            province,
            outcome,
            decision,
        }
    }

    // -----------------------------------------------------------------------
    // Batch processing
    // -----------------------------------------------------------------------

    /// Fetch from `source` and process the batch.  A failed fetch is logged
    /// and yields an empty summary.
    pub async fn run_source(&mut self, source: &dyn ItemSource) -> RunSummary {
        match source.fetch_items().await {
            Ok(items) => {
                log::info!("{}: fetched {} items", source.name(), items.len());
                self.process_items(&items).await
            }
            Err(e) => {
                log::error!("{}: fetch failed: {e}", source.name());
                RunSummary::default()
            }
        }
    }

    /// Process `items` in order.  Never stops early.
    pub async fn process_items(&mut self, items: &[FetchedItem]) -> RunSummary {
        let mut summary = RunSummary::default();
        for item in items {
            let state = self.process_item(item, &mut summary).await;
            debug_assert!(state.is_terminal());
            summary.record(state);
        }
        log::info!("run complete: {summary}");
        summary
    }

    async fn process_item(&mut self, item: &FetchedItem, summary: &mut RunSummary) -> ItemState {
        let short = short_id(&item.id);
        let state = ItemState::Fetched;

        if item.message.trim().is_empty() {
            log::info!("{} {short}…: no message, skipping", item.kind);
            return state.advance(ItemState::Skipped);
        }

        if self.seen.has_seen(&item.id) {
            log::debug!("{} {short}…: already seen", item.kind);
            return state.advance(ItemState::Seen);
        }
        self.seen.mark_seen(&item.id);

        let analysis = self.analyze(&item.message).await;
        let state = state.advance(ItemState::Classified);
        log::info!(
            "{} {short}… intent={} province={}",
            item.kind,
            analysis.outcome,
            analysis.province_name
        );

        if let ClassificationOutcome::Failed(reason) = &analysis.outcome {
            log::warn!("{} {short}…: {reason}; treating as ignored", item.kind);
            summary.classification_failures += 1;
            return state.advance(ItemState::Ignored);
        }

        match analysis.decision {
            ReplyDecision::Reply { message } => {
                let delivery = self.sink.post_reply(&item.id, &message).await;
                if delivery.delivered {
                    log::info!("replied to {}", item.id);
                } else {
                    summary.delivery_failures += 1;
                    log::warn!("reply failed {}: {}", item.id, delivery.detail);
                }
                state.advance(ItemState::Replied)
            }
            ReplyDecision::NoReply { reason } => {
                log::info!("no auto-reply for {short}…: {reason}");
                state.advance(ItemState::Ignored)
            }
        }
    }
}

/// First eight characters of an id, for log lines.
fn short_id(id: &str) -> String {
    id.chars().take(8).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
