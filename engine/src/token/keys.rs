//! Resolved key material and the process-wide key ring
//!
//! The engine only consumes already-resolved public keys; how the material
//! reaches the process (file, environment, key store) is the host's
//! responsibility. Keys are immutable once provisioned, so the ring may be
//! populated lazily - concurrent insertions of the same key id are
//! harmless.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// An already-resolved public key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedKey {
    key_id: String,
    material: Vec<u8>,
}

impl ResolvedKey {
    /// Wrap resolved key material under a key id
    pub fn new(key_id: impl Into<String>, material: Vec<u8>) -> Self {
        Self {
            key_id: key_id.into(),
            material,
        }
    }

    /// The key id tokens reference via their `kid` header
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Raw public key bytes in the algorithm's native encoding
    pub fn material(&self) -> &[u8] {
        &self.material
    }
}

/// Process-wide store of resolved public keys, indexed by key id
#[derive(Default)]
pub struct KeyRing {
    keys: RwLock<HashMap<String, Arc<ResolvedKey>>>,
}

impl KeyRing {
    /// Create an empty key ring
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key; re-inserting an existing id keeps the first key
    pub fn insert(&self, key: ResolvedKey) {
        let mut keys = self.keys.write();
        let id = key.key_id.clone();
        if keys.contains_key(&id) {
            debug!(key_id = %id, "key already present, keeping existing");
            return;
        }
        keys.insert(id, Arc::new(key));
    }

    /// Look up a key by id
    pub fn get(&self, key_id: &str) -> Option<Arc<ResolvedKey>> {
        self.keys.read().get(key_id).cloned()
    }

    /// Number of keys in the ring
    pub fn len(&self) -> usize {
        self.keys.read().len()
    }

    /// True if no keys are provisioned
    pub fn is_empty(&self) -> bool {
        self.keys.read().is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let ring = KeyRing::new();
        ring.insert(ResolvedKey::new("ops-1", vec![1, 2, 3]));

        let key = ring.get("ops-1").unwrap();
        assert_eq!(key.key_id(), "ops-1");
        assert_eq!(key.material(), &[1, 2, 3]);
        assert!(ring.get("ops-2").is_none());
    }

    #[test]
    fn test_reinsert_keeps_first() {
        let ring = KeyRing::new();
        ring.insert(ResolvedKey::new("ops-1", vec![1]));
        ring.insert(ResolvedKey::new("ops-1", vec![2]));

        assert_eq!(ring.len(), 1);
        assert_eq!(ring.get("ops-1").unwrap().material(), &[1]);
    }

    #[test]
    fn test_concurrent_population_is_idempotent() {
        let ring = Arc::new(KeyRing::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ring = Arc::clone(&ring);
                std::thread::spawn(move || {
                    ring.insert(ResolvedKey::new("shared", vec![42]));
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(ring.len(), 1);
        assert_eq!(ring.get("shared").unwrap().material(), &[42]);
    }
}
