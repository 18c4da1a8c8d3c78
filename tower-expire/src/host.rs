//! The content host capability.

use std::{error::Error as StdError, fmt};

use async_trait::async_trait;
use tower_expire_core::ItemId;

#[cfg(feature = "memory-store")]
use std::collections::HashMap;

#[cfg(feature = "memory-store")]
use parking_lot::Mutex;

/// Operations the host platform performs on behalf of the enforcer.
///
/// Implementations adapt the host's content storage and caching layer.
/// Both operations are fire-and-forget from the enforcer's point of view:
/// a failure is logged and the redirect proceeds regardless.
#[async_trait]
pub trait ContentHost: 'static + Send + Sync {
    /// Sets the publication status of `item`.
    async fn set_status(&self, item: ItemId, status: ContentStatus) -> Result<(), HostError>;

    /// Invalidates any response cache the host keeps, so an unpublished
    /// item stops being served from cache.
    async fn flush_cache(&self) -> Result<(), HostError>;
}

/// Publication status of a content item.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
#[non_exhaustive]
pub enum ContentStatus {
    Published,
    Draft,
    Pending,
    Private,
    Trashed,
}

impl fmt::Display for ContentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ContentStatus::Published => "published",
            ContentStatus::Draft => "draft",
            ContentStatus::Pending => "pending",
            ContentStatus::Private => "private",
            ContentStatus::Trashed => "trashed",
        })
    }
}

/// The error type returned by [`ContentHost`] operations.
#[derive(Debug, thiserror::Error)]
#[error("content host error")]
pub struct HostError {
    #[source]
    source: Box<dyn StdError + Send + Sync>,
}

impl HostError {
    pub fn new(err: impl Into<Box<dyn StdError + Send + Sync>>) -> HostError {
        HostError { source: err.into() }
    }
}

/// An in-memory [`ContentHost`] that records what was asked of it.
///
/// Intended for tests and examples; a real deployment implements
/// [`ContentHost`] against the host platform.
#[cfg(feature = "memory-store")]
#[derive(Default)]
pub struct MemoryHost {
    state: Mutex<HostState>,
}

#[cfg(feature = "memory-store")]
#[derive(Default)]
struct HostState {
    statuses: HashMap<ItemId, ContentStatus>,
    cache_flushes: usize,
}

#[cfg(feature = "memory-store")]
impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last status set for `item`, if any.
    pub fn status(&self, item: ItemId) -> Option<ContentStatus> {
        self.state.lock().statuses.get(&item).copied()
    }

    /// How many times the cache has been flushed.
    pub fn cache_flushes(&self) -> usize {
        self.state.lock().cache_flushes
    }
}

#[cfg(feature = "memory-store")]
impl fmt::Debug for MemoryHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MemoryHost { .. }")
    }
}

#[cfg(feature = "memory-store")]
#[async_trait]
impl ContentHost for MemoryHost {
    async fn set_status(&self, item: ItemId, status: ContentStatus) -> Result<(), HostError> {
        self.state.lock().statuses.insert(item, status);
        Ok(())
    }

    async fn flush_cache(&self) -> Result<(), HostError> {
        self.state.lock().cache_flushes += 1;
        Ok(())
    }
}
