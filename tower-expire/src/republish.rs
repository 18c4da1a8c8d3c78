//! Clearing stale expiration data when content is republished.

use time::OffsetDateTime;
use tower_expire_core::{
    store::{self, clear_record, load_record, MetadataStore},
    ItemId,
};

use crate::host::ContentStatus;

/// What a status transition did to the item's expiration record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RepublishOutcome {
    /// The record described a moment already in the past; all four fields
    /// were deleted.
    Cleared,
    /// The record (if any) was left as it is.
    Untouched,
}

/// Handles a content status transition.
///
/// The host delivers this synchronously on every status change. Only a
/// transition *to* [`Published`] is of interest: republishing an item
/// whose expiration instant is already behind `now` is an editorial
/// decision to keep it live, so the stale record is forgotten rather than
/// left to re-expire the item on its next view. A record still in the
/// future keeps applying after the republish.
///
/// `old_status` is part of the host's event signature but does not affect
/// the outcome.
///
/// [`Published`]: ContentStatus::Published
pub async fn handle_status_transition<S>(
    store: &S,
    new_status: ContentStatus,
    _old_status: ContentStatus,
    item: ItemId,
    now: OffsetDateTime,
) -> Result<RepublishOutcome, store::Error>
where
    S: MetadataStore + ?Sized,
{
    if new_status != ContentStatus::Published {
        return Ok(RepublishOutcome::Untouched);
    }

    let Some(record) = load_record(store, item).await? else {
        return Ok(RepublishOutcome::Untouched);
    };

    if record.is_expired(now) {
        clear_record(store, item).await?;
        info!(item = %item, "expiration data cleared for republished item");
        return Ok(RepublishOutcome::Cleared);
    }

    Ok(RepublishOutcome::Untouched)
}
