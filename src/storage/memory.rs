use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use super::SessionStorage;
use crate::data::SessionData;
use crate::error::Result;

/// In-process session storage.
///
/// Clones share the same map. Nothing is ever evicted, so the map grows
/// with every distinct key for the lifetime of the process.
///
/// `load` stores an empty session for a key it has not seen, so a key is
/// kept even when the request that loaded it fails and never saves.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStorage {
    sessions: Arc<DashMap<String, SessionData>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a storage pre-seeded with `sessions`.
    pub fn with_sessions<I, K>(sessions: I) -> Self
    where
        I: IntoIterator<Item = (K, SessionData)>,
        K: Into<String>,
    {
        let map = DashMap::new();
        for (key, session) in sessions {
            map.insert(key.into(), session);
        }
        Self { sessions: Arc::new(map) }
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.sessions.contains_key(key)
    }

    pub fn clear(&self) {
        self.sessions.clear();
    }
}

#[async_trait]
impl SessionStorage for MemorySessionStorage {
    async fn load(&self, key: &str) -> Result<SessionData> {
        Ok(self
            .sessions
            .entry(key.to_string())
            .or_default()
            .value()
            .clone())
    }

    async fn save(&self, key: &str, session: SessionData) -> Result<()> {
        self.sessions.insert(key.to_string(), session);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let storage = MemorySessionStorage::new();
        let session: SessionData = [("user", json!("alice")), ("n", json!(2))].into_iter().collect();
        storage.save("k", session.clone()).await.unwrap();
        assert_eq!(storage.load("k").await.unwrap(), session);
    }

    #[tokio::test]
    async fn unknown_keys_load_empty_and_stay_isolated() {
        let storage = MemorySessionStorage::new();
        assert!(storage.load("k1").await.unwrap().is_empty());
        assert!(storage.load("k2").await.unwrap().is_empty());

        let mut session = SessionData::new();
        session.insert("x", 1);
        storage.save("k1", session).await.unwrap();
        assert!(storage.load("k2").await.unwrap().is_empty());
        assert_eq!(storage.load("k1").await.unwrap().get("x"), Some(&json!(1)));
    }

    #[tokio::test]
    async fn load_alone_registers_the_key() {
        let storage = MemorySessionStorage::new();
        assert!(!storage.contains("k"));
        storage.load("k").await.unwrap();
        assert!(storage.contains("k"));
        assert_eq!(storage.len(), 1);
    }

    #[tokio::test]
    async fn save_replaces_wholesale() {
        let storage = MemorySessionStorage::with_sessions([(
            "k",
            [("a", 1), ("b", 2)].into_iter().collect::<SessionData>(),
        )]);
        let replacement: SessionData = [("c", 3)].into_iter().collect();
        storage.save("k", replacement.clone()).await.unwrap();
        storage.save("k", replacement.clone()).await.unwrap();
        assert_eq!(storage.load("k").await.unwrap(), replacement);
        assert_eq!(storage.len(), 1);
    }

    #[tokio::test]
    async fn loaded_state_is_a_copy() {
        let storage = MemorySessionStorage::new();
        let mut session = storage.load("k").await.unwrap();
        session.insert("unsaved", true);
        assert!(storage.load("k").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn clones_share_sessions() {
        let storage = MemorySessionStorage::new();
        let other = storage.clone();
        other.save("k", [("a", 1)].into_iter().collect()).await.unwrap();
        assert!(storage.contains("k"));
        storage.clear();
        assert!(other.is_empty());
    }

    #[tokio::test]
    async fn usable_through_arc_dyn() {
        let storage: Arc<dyn SessionStorage> = Arc::new(MemorySessionStorage::new());
        storage.save("k", [("a", 1)].into_iter().collect()).await.unwrap();
        assert_eq!(storage.load("k").await.unwrap().get("a"), Some(&json!(1)));
    }
}
