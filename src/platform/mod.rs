//! Social-platform collaborators: where items come from and where replies go.
//!
//! The pipeline only sees two traits:
//! * [`ItemSource`] — yields `(id, message)` items to evaluate.
//! * [`ReplySink`] — posts a reply addressed to an item id.
//!
//! [`GraphClient`] implements the Facebook Graph API calls behind both;
//! [`PageCommentsSource`] and [`KeywordSearchSource`] select which items a
//! run evaluates.  [`dump_items`] writes fetched items to JSON files.

pub mod dump;
pub mod graph;
pub mod sources;

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

pub use dump::dump_items;
pub use graph::GraphClient;
pub use sources::{KeywordSearchSource, PageCommentsSource};

// ---------------------------------------------------------------------------
// PlatformError
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Error)]
pub enum PlatformError {
    /// HTTP transport or connection error.
    #[error("platform request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("platform request timed out")]
    Timeout,

    /// The API answered with a non-success status.
    #[error("platform returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not the expected JSON.
    #[error("unexpected platform response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for PlatformError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            PlatformError::Timeout
        } else {
            PlatformError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Items and delivery
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Post,
    Comment,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::Post => write!(f, "post"),
            ItemKind::Comment => write!(f, "comment"),
        }
    }
}

/// One post or comment fetched from the platform.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedItem {
    pub id: String,
    /// Text body; empty when the platform returned none.
    pub message: String,
    pub kind: ItemKind,
}

impl FetchedItem {
    pub fn post(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            message: message.into(),
            kind: ItemKind::Post,
        }
    }

    pub fn comment(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            message: message.into(),
            kind: ItemKind::Comment,
        }
    }
}

/// Result of posting a reply.  Only logged; it never changes a decision.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryOutcome {
    pub delivered: bool,
    /// Response body or error text, for diagnostics.
    pub detail: String,
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Produces the batch of items a run evaluates, in processing order.
#[async_trait]
pub trait ItemSource: Send + Sync {
    /// Short name used in log lines.
    fn name(&self) -> &str;

    async fn fetch_items(&self) -> Result<Vec<FetchedItem>, PlatformError>;
}

/// Delivers a reply to the item with the given id.
#[async_trait]
pub trait ReplySink: Send + Sync {
    /// Never fails: transport and API errors are folded into
    /// `DeliveryOutcome { delivered: false, .. }`.
    async fn post_reply(&self, item_id: &str, message: &str) -> DeliveryOutcome;
}

// Compile-time assertion: both traits must be object-safe.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn ItemSource>, _: Box<dyn ReplySink>) {}
};
