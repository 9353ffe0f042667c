//! Per-item state machine and the run tally.

use std::fmt;

// ---------------------------------------------------------------------------
// ItemState
// ---------------------------------------------------------------------------

/// States an item passes through during one run.
///
/// ```text
/// Fetched ──empty message──▶ Skipped
///         ──already seen───▶ Seen
///         ──mark seen──────▶ Classified ──reply decided──▶ Replied
///                                       ──no reply───────▶ Ignored
/// ```
///
/// No transition returns to an earlier state.  A failed classification
/// goes straight to `Ignored`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemState {
    /// Received from the source, not yet inspected.
    Fetched,
    /// Message empty or whitespace-only; never classified.
    Skipped,
    /// Already evaluated earlier in this run (or a persisted earlier run).
    Seen,
    /// Marked seen and classified; awaiting the reply decision.
    Classified,
    /// A reply was handed to the sink (delivery may still have failed).
    Replied,
    /// Evaluated; no reply warranted or classification failed.
    Ignored,
}

impl ItemState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ItemState::Skipped | ItemState::Seen | ItemState::Replied | ItemState::Ignored
        )
    }

    /// Whether `next` is a legal successor of `self`.
    pub fn can_advance_to(&self, next: ItemState) -> bool {
        matches!(
            (*self, next),
            (
                ItemState::Fetched,
                ItemState::Skipped | ItemState::Seen | ItemState::Classified
            ) | (ItemState::Classified, ItemState::Replied | ItemState::Ignored)
        )
    }

    /// Move to `next`.  Illegal transitions are a bug in the caller.
    pub fn advance(self, next: ItemState) -> ItemState {
        debug_assert!(
            self.can_advance_to(next),
            "illegal item transition {self} -> {next}"
        );
        next
    }

    pub fn label(&self) -> &'static str {
        match self {
            ItemState::Fetched => "fetched",
            ItemState::Skipped => "skipped",
            ItemState::Seen => "seen",
            ItemState::Classified => "classified",
            ItemState::Replied => "replied",
            ItemState::Ignored => "ignored",
        }
    }
}

impl fmt::Display for ItemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// RunSummary
// ---------------------------------------------------------------------------

/// Counts of terminal states reached during one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub skipped: usize,
    pub seen: usize,
    pub replied: usize,
    pub ignored: usize,
    /// Replies the sink reported as not delivered.  Included in `replied`.
    pub delivery_failures: usize,
    /// Items whose classification failed.  Included in `ignored`.
    pub classification_failures: usize,
}

impl RunSummary {
    /// Count one terminal state.  Non-terminal states are ignored.
    pub fn record(&mut self, state: ItemState) {
        match state {
            ItemState::Skipped => self.skipped += 1,
            ItemState::Seen => self.seen += 1,
            ItemState::Replied => self.replied += 1,
            ItemState::Ignored => self.ignored += 1,
            ItemState::Fetched | ItemState::Classified => {}
        }
    }

    /// Items that reached a terminal state.
    pub fn total(&self) -> usize {
        self.skipped + self.seen + self.replied + self.ignored
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} items: {} replied ({} undelivered), {} ignored ({} failed), {} skipped, {} seen",
            self.total(),
            self.replied,
            self.delivery_failures,
            self.ignored,
            self.classification_failures,
            self.skipped,
            self.seen
        )
    }
}
