//! Read-only expiration state for the admin list table.

use std::fmt;

use time::{format_description::BorrowedFormatItem, macros::format_description, OffsetDateTime};
use tower_expire_core::{
    store::{self, load_record, MetadataStore},
    ItemId,
};

const COLUMN_FORMAT: &[BorrowedFormatItem<'static>] = format_description!(
    "[month repr:short] [day padding:none], [year] [hour repr:12 padding:none]:[minute] [period]"
);

/// Derived expiration state of one item, for display.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExpirationStatus {
    /// No expiration configured, or the stored fields do not compose into
    /// an instant.
    Unset,
    /// Expiration lies in the future.
    Scheduled {
        at: OffsetDateTime,
        action: &'static str,
    },
    /// The expiration instant has passed; the action will run on the next
    /// view.
    Expired {
        at: OffsetDateTime,
        action: &'static str,
    },
}

/// Derives the list-table state of `item` at `now`.
///
/// Read-only: rendering the admin list never mutates the record, even for
/// items that are already expired.
pub async fn expiration_status<S>(
    store: &S,
    item: ItemId,
    now: OffsetDateTime,
) -> Result<ExpirationStatus, store::Error>
where
    S: MetadataStore + ?Sized,
{
    let Some(record) = load_record(store, item).await? else {
        return Ok(ExpirationStatus::Unset);
    };

    let Some(at) = record.expiration_instant(now.offset()) else {
        return Ok(ExpirationStatus::Unset);
    };

    let action = record.resolve_action().label();
    if record.is_expired(now) {
        Ok(ExpirationStatus::Expired { at, action })
    } else {
        Ok(ExpirationStatus::Scheduled { at, action })
    }
}

/// The short display string for the list-table column:
/// `—`, `Jan 1, 2099 11:59 PM (Draft)`, or
/// `Jan 1, 2020 11:59 PM (EXPIRED - Redirect)`.
impl fmt::Display for ExpirationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpirationStatus::Unset => f.write_str("\u{2014}"),
            ExpirationStatus::Scheduled { at, action } => match at.format(COLUMN_FORMAT) {
                Ok(formatted) => write!(f, "{formatted} ({action})"),
                Err(_) => f.write_str("\u{2014}"),
            },
            ExpirationStatus::Expired { at, action } => match at.format(COLUMN_FORMAT) {
                Ok(formatted) => write!(f, "{formatted} (EXPIRED - {action})"),
                Err(_) => f.write_str("\u{2014}"),
            },
        }
    }
}
