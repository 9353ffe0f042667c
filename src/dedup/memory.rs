use std::collections::HashSet;

use super::SeenRegistry;

/// Seen ids held for the lifetime of the process.
#[derive(Debug, Default)]
pub struct InMemorySeenRegistry {
    ids: HashSet<String>,
}

impl InMemorySeenRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SeenRegistry for InMemorySeenRegistry {
    fn has_seen(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    fn mark_seen(&mut self, id: &str) {
        self.ids.insert(id.to_string());
    }

    fn len(&self) -> usize {
        self.ids.len()
    }
}
