//! The metadata store capability and record-level persistence.

use std::error::Error as StdError;

use async_trait::async_trait;

use crate::{
    record::{ExpirationRecord, ExpiryAction},
    time::DEFAULT_EXPIRY_TIME,
    ItemId,
};

type Result<T, E = Error> = std::result::Result<T, E>;

/// Per-item key-value metadata storage provided by the host platform.
///
/// The host guarantees atomic reads and writes per `(item, key)` pair;
/// nothing stronger is assumed. Multi-key consistency comes only from the
/// write ordering in [`save_record`] and [`clear_record`], which is the
/// same guarantee the host's own metadata API gives.
///
/// Values are plain strings: the store holds whatever the host's metadata
/// table holds, and the record layer is lenient when reading it back.
#[async_trait]
pub trait MetadataStore: 'static + Send + Sync {
    /// Returns the value stored for `key` on `item`, if any.
    async fn get(&self, item: ItemId, key: MetaKey) -> Result<Option<String>>;

    /// Stores `value` for `key` on `item`, replacing any previous value.
    async fn set(&self, item: ItemId, key: MetaKey, value: &str) -> Result<()>;

    /// Removes the value stored for `key` on `item`. Removing an absent
    /// key is not an error.
    async fn delete(&self, item: ItemId, key: MetaKey) -> Result<()>;
}

/// The four metadata keys holding one [`ExpirationRecord`].
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum MetaKey {
    Date,
    Time,
    Action,
    Url,
}

impl MetaKey {
    /// Every key of a record, in write order.
    pub const ALL: [MetaKey; 4] = [MetaKey::Date, MetaKey::Time, MetaKey::Action, MetaKey::Url];

    /// The key string used in the host's metadata table.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            MetaKey::Date => "expiration_date",
            MetaKey::Time => "expiration_time",
            MetaKey::Action => "expiration_action",
            MetaKey::Url => "expiration_url",
        }
    }
}

const ACTION_DRAFT: &str = "draft";
const ACTION_REDIRECT: &str = "redirect";

/// Loads the expiration record for `item`, if one is configured.
///
/// The date field is authoritative: when it is absent or empty, the item
/// has no expiration and `None` is returned without reading further.
///
/// The remaining fields are read leniently, mirroring how they may have
/// been written over time: an empty time falls back to `23:59`, an
/// unrecognized action reads as draft, and a redirect action with no
/// stored url yields an empty url (which [`resolve_action`] later treats
/// as draft).
///
/// [`resolve_action`]: ExpirationRecord::resolve_action
pub async fn load_record<S>(store: &S, item: ItemId) -> Result<Option<ExpirationRecord>>
where
    S: MetadataStore + ?Sized,
{
    let date = match store.get(item, MetaKey::Date).await? {
        Some(date) if !date.is_empty() => date,
        _ => return Ok(None),
    };

    let time = store
        .get(item, MetaKey::Time)
        .await?
        .filter(|time| !time.is_empty())
        .unwrap_or_else(|| DEFAULT_EXPIRY_TIME.to_owned());

    let action = match store.get(item, MetaKey::Action).await?.as_deref() {
        Some(ACTION_REDIRECT) => ExpiryAction::Redirect {
            url: store.get(item, MetaKey::Url).await?.unwrap_or_default(),
        },
        _ => ExpiryAction::Draft,
    };

    Ok(Some(ExpirationRecord { date, time, action }))
}

/// Persists `record` as the expiration configuration of `item`.
///
/// Writes all fields within this one call; for a draft action the url key
/// is deleted rather than left behind from a previous redirect
/// configuration.
pub async fn save_record<S>(store: &S, item: ItemId, record: &ExpirationRecord) -> Result<()>
where
    S: MetadataStore + ?Sized,
{
    store.set(item, MetaKey::Date, &record.date).await?;
    store.set(item, MetaKey::Time, &record.time).await?;
    match &record.action {
        ExpiryAction::Draft => {
            store.set(item, MetaKey::Action, ACTION_DRAFT).await?;
            store.delete(item, MetaKey::Url).await?;
        }
        ExpiryAction::Redirect { url } => {
            store.set(item, MetaKey::Action, ACTION_REDIRECT).await?;
            store.set(item, MetaKey::Url, url).await?;
        }
    }
    Ok(())
}

/// Removes every expiration field of `item`.
pub async fn clear_record<S>(store: &S, item: ItemId) -> Result<()>
where
    S: MetadataStore + ?Sized,
{
    for key in MetaKey::ALL {
        store.delete(item, key).await?;
    }
    Ok(())
}

/// The error type returned by [`MetadataStore`] operations.
///
/// Wraps whatever error the host's storage adapter produces.
#[derive(Debug, thiserror::Error)]
#[error("metadata store error")]
pub struct Error {
    #[source]
    source: Box<dyn StdError + Send + Sync>,
}

impl Error {
    pub fn new(err: impl Into<Box<dyn StdError + Send + Sync>>) -> Error {
        Error { source: err.into() }
    }
}

#[cfg(all(not(docsrs), test))]
#[test]
fn dyn_compatible() {
    use std::sync::Arc;

    const _: fn() = || {
        let _dyn_store: Arc<dyn MetadataStore> = todo!();
    };
}
