//! In-memory metadata storage.

use std::fmt;

use async_trait::async_trait;
#[cfg(feature = "memory-store")]
use dashmap::DashMap;
use tower_expire_core::{
    store::{Error, MetaKey},
    ItemId, MetadataStore,
};

type Result<T, E = Error> = std::result::Result<T, E>;

/// An in-memory [`MetadataStore`].
///
/// Backs tests and examples; a real deployment implements
/// [`MetadataStore`] against the host platform's metadata table.
#[cfg(feature = "memory-store")]
pub struct MemoryStore {
    map: DashMap<(ItemId, MetaKey), String>,
}

#[cfg(feature = "memory-store")]
impl Default for MemoryStore {
    fn default() -> Self {
        MemoryStore {
            map: DashMap::new(),
        }
    }
}

#[cfg(feature = "memory-store")]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(feature = "memory-store")]
impl fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MemoryStore { .. }")
    }
}

#[cfg(feature = "memory-store")]
#[async_trait]
impl MetadataStore for MemoryStore {
    async fn get(&self, item: ItemId, key: MetaKey) -> Result<Option<String>> {
        Ok(self.map.get(&(item, key)).as_deref().cloned())
    }

    async fn set(&self, item: ItemId, key: MetaKey, value: &str) -> Result<()> {
        self.map.insert((item, key), value.to_owned());
        Ok(())
    }

    async fn delete(&self, item: ItemId, key: MetaKey) -> Result<()> {
        self.map.remove(&(item, key));
        Ok(())
    }
}
