//! Pluggable persistence for session state.

pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;

use crate::data::SessionData;
use crate::error::Result;

pub use memory::MemorySessionStorage;

/// A backend that owns the mapping from session key to session state.
///
/// One instance is created at startup and shared by every concurrent
/// request. The middleware does not serialize access per key: two requests
/// carrying the same key may both load before either saves, and the later
/// save wins. Backends that need stronger guarantees implement them here.
#[async_trait]
pub trait SessionStorage: Send + Sync + 'static {
    /// Returns the state stored under `key`, or a new empty state if there
    /// is none. Absence is never an error.
    async fn load(&self, key: &str) -> Result<SessionData>;

    /// Replaces the state stored under `key` with `session`.
    async fn save(&self, key: &str, session: SessionData) -> Result<()>;
}

#[async_trait]
impl<S: SessionStorage + ?Sized> SessionStorage for Arc<S> {
    async fn load(&self, key: &str) -> Result<SessionData> {
        (**self).load(key).await
    }

    async fn save(&self, key: &str, session: SessionData) -> Result<()> {
        (**self).save(key, session).await
    }
}
