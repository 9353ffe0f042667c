//! Orchestration: fetched items → classification → reply decision → sink.
//!
//! # Architecture
//!
//! ```text
//! ItemSource::fetch_items()
//!        │  Vec<FetchedItem>, fetch order
//!        ▼
//! Orchestrator::process_items()        ← strictly sequential
//!        │
//!        ├─ empty message          → Skipped
//!        ├─ SeenRegistry::has_seen → Seen
//!        ├─ mark_seen
//!        ├─ TextPreprocessor + ProvinceResolver + IntentClassifier
//!        ├─ ReplyDecisionEngine::decide_outcome
//!        │     ├─ Reply   → ReplySink::post_reply → Replied
//!        │     └─ NoReply → Ignored
//!        ▼
//! RunSummary
//! ```

pub mod runner;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use runner::{Analysis, Orchestrator};
pub use state::{ItemState, RunSummary};
