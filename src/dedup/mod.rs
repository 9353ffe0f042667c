//! Seen-item tracking so each post/comment is evaluated at most once.
//!
//! * [`SeenRegistry`] — the interface the orchestrator is given.
//! * [`InMemorySeenRegistry`] — process-lifetime set (the default).
//! * [`FileSeenRegistry`] — same semantics, persisted as JSON so ids
//!   survive across scheduled runs.

pub mod file;
pub mod memory;

pub use file::{FileSeenRegistry, SeenFileError};
pub use memory::InMemorySeenRegistry;

/// Set of processed item ids.  Ids are only ever added.
pub trait SeenRegistry: Send {
    fn has_seen(&self, id: &str) -> bool;

    /// Record `id`.  Marking an id twice is a no-op.
    fn mark_seen(&mut self, id: &str);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// Compile-time assertion: Box<dyn SeenRegistry> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn SeenRegistry>) {}
};
