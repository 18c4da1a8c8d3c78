//! `ItemId` and related items.

use std::{
    fmt,
    num::{NonZeroU64, TryFromIntError},
};

/// The identifier of a content item in the host platform.
///
/// Content identifiers are assigned by the host's content storage; this
/// crate never generates them. They key the per-item expiration metadata
/// held by a [`MetadataStore`].
///
/// [`MetadataStore`]: crate::MetadataStore
// `NonZeroU64` is used so that `Option<ItemId>` has the same size as
// `ItemId`. Host platforms reserve `0` as "no item".
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct ItemId(NonZeroU64);

impl ItemId {
    /// Returns the raw numeric identifier.
    #[inline]
    #[must_use]
    pub fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<NonZeroU64> for ItemId {
    #[inline]
    fn from(value: NonZeroU64) -> Self {
        ItemId(value)
    }
}

impl TryFrom<u64> for ItemId {
    type Error = TryFromIntError;

    #[inline]
    fn try_from(value: u64) -> Result<Self, Self::Error> {
        NonZeroU64::try_from(value).map(ItemId::from)
    }
}

impl From<ItemId> for NonZeroU64 {
    #[inline]
    fn from(value: ItemId) -> Self {
        value.0
    }
}

impl From<ItemId> for u64 {
    #[inline]
    fn from(value: ItemId) -> Self {
        value.get()
    }
}
