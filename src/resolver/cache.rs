//! Cafe name → cafe id cache.
//!
//! Populated opportunistically from whichever page first reveals the
//! mapping; one instance per page session, owned by the session context
//! and discarded on navigation.

use std::collections::HashMap;

use parking_lot::RwLock;

/// First-writer-wins mapping from cafe name to numeric cafe id.
#[derive(Debug, Default)]
pub struct CafeIdCache {
    map: RwLock<HashMap<String, String>>,
}

impl CafeIdCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<String> {
        self.map.read().get(name).cloned()
    }

    /// Store a mapping unless the name is already known. The first
    /// discovered mapping is authoritative; later discoveries are
    /// ignored, even with a different id. Returns whether this call
    /// stored the mapping.
    pub fn insert_if_absent(&self, name: &str, id: &str) -> bool {
        let mut map = self.map.write();
        if map.contains_key(name) {
            log::trace!("cafe id for {name:?} already cached, keeping first mapping");
            return false;
        }
        map.insert(name.to_string(), id.to_string());
        true
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.read().is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.map.read().len()
    }
}
