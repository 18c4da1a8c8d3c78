//! The expiration record and the rules derived from it.

use ::time::{Date, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

use crate::time::DATE_FORMAT;

/// The expiration configuration attached to one content item.
///
/// A record is only ever present as a whole: an item either has all of its
/// expiration metadata or none of it. Absence means "never expires".
///
/// The `date` and `time` fields hold the storage representation
/// (`YYYY-MM-DD` / `HH:MM`). Their *shape* is guaranteed by the validator
/// before persistence, but shape does not imply a real calendar moment
/// (`2025-13-40` is shape-valid). Composition into an instant is therefore
/// fallible, and every rule in this module fails safe: data that does not
/// compose never expires anything.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpirationRecord {
    /// Expiration date, `YYYY-MM-DD`.
    pub date: String,
    /// Expiration time-of-day, `HH:MM` (24-hour).
    pub time: String,
    /// What happens when the item expires.
    pub action: ExpiryAction,
}

/// The configured post-expiration action.
///
/// A loaded record may carry a `Redirect` with an empty url if the backing
/// store was written by something other than the validator. Use
/// [`ExpirationRecord::resolve_action`] rather than matching on this
/// directly; it maps that state back to `Draft`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExpiryAction {
    /// Revert the item to draft and send the visitor to the site home.
    Draft,
    /// Send the visitor to `url`.
    Redirect {
        /// Absolute redirect target.
        url: String,
    },
}

/// The action that will actually be taken for an expired item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolvedAction<'a> {
    /// Revert to draft, then redirect to the site home.
    Draft,
    /// Redirect to the given url.
    Redirect(&'a str),
}

impl ResolvedAction<'_> {
    /// Short human-readable label, as shown in the admin list table.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            ResolvedAction::Draft => "Draft",
            ResolvedAction::Redirect(_) => "Redirect",
        }
    }
}

impl ExpirationRecord {
    pub fn new(date: impl Into<String>, time: impl Into<String>, action: ExpiryAction) -> Self {
        ExpirationRecord {
            date: date.into(),
            time: time.into(),
            action,
        }
    }

    /// Composes `date` and `time` into a single instant at `offset`.
    ///
    /// Returns `None` when the stored fields do not name a real calendar
    /// moment.
    pub fn expiration_instant(&self, offset: UtcOffset) -> Option<OffsetDateTime> {
        let date = Date::parse(&self.date, DATE_FORMAT).ok()?;
        let time = parse_time_of_day(&self.time)?;
        Some(PrimitiveDateTime::new(date, time).assume_offset(offset))
    }

    /// Whether this record's expiration instant has been reached at `now`.
    ///
    /// The boundary is inclusive: an instant exactly equal to `now` counts
    /// as expired. A record that does not compose ([`expiration_instant`]
    /// returns `None`) is never expired.
    ///
    /// The instant is composed in `now`'s offset, so a single captured
    /// `now` yields one consistent answer per request.
    ///
    /// [`expiration_instant`]: ExpirationRecord::expiration_instant
    ///
    /// # Examples
    ///
    /// ```
    /// use time::macros::datetime;
    /// use tower_expire_core::{ExpirationRecord, ExpiryAction};
    ///
    /// let record = ExpirationRecord::new("2025-01-01", "23:59", ExpiryAction::Draft);
    /// assert!(record.is_expired(datetime!(2025-06-01 12:00 UTC)));
    /// assert!(!record.is_expired(datetime!(2024-06-01 12:00 UTC)));
    /// ```
    #[must_use]
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        match self.expiration_instant(now.offset()) {
            Some(instant) => instant <= now,
            None => false,
        }
    }

    /// The action to take when this record has expired.
    ///
    /// `Redirect` with an empty url resolves to [`ResolvedAction::Draft`].
    /// The validator refuses to persist that state, but the store may hold
    /// records this crate did not write.
    #[must_use]
    pub fn resolve_action(&self) -> ResolvedAction<'_> {
        match &self.action {
            ExpiryAction::Redirect { url } if !url.is_empty() => ResolvedAction::Redirect(url),
            _ => ResolvedAction::Draft,
        }
    }
}

/// `HH:MM`, seconds fixed at zero. `Time::from_hms` rejects out-of-range
/// components, so a shape-valid `99:99` still composes to nothing.
fn parse_time_of_day(s: &str) -> Option<Time> {
    let (hour, minute) = s.split_once(':')?;
    Time::from_hms(hour.parse().ok()?, minute.parse().ok()?, 0).ok()
}

#[cfg(test)]
mod test {
    use ::time::macros::datetime;
    use quickcheck::quickcheck;

    use super::*;

    fn draft(date: &str, time: &str) -> ExpirationRecord {
        ExpirationRecord::new(date, time, ExpiryAction::Draft)
    }

    #[test]
    fn boundary_instant_is_expired() {
        let record = draft("2025-06-01", "12:00");
        assert!(record.is_expired(datetime!(2025-06-01 12:00 UTC)));
        assert!(!record.is_expired(datetime!(2025-06-01 11:59:59.999 UTC)));
    }

    #[test]
    fn unparsable_fields_never_expire() {
        // Shape-valid but not a calendar moment.
        for record in [draft("2025-13-40", "12:00"), draft("2025-06-01", "99:99")] {
            assert_eq!(record.expiration_instant(UtcOffset::UTC), None);
            assert!(!record.is_expired(datetime!(2099-01-01 00:00 UTC)));
        }
    }

    #[test]
    fn instant_uses_the_offset_of_now() {
        let record = draft("2025-06-01", "12:00");
        let instant = record.expiration_instant(UtcOffset::from_hms(2, 0, 0).unwrap());
        assert_eq!(instant, Some(datetime!(2025-06-01 12:00 +2)));
    }

    #[test]
    fn redirect_with_empty_url_resolves_to_draft() {
        let record = ExpirationRecord::new(
            "2020-01-01",
            "23:59",
            ExpiryAction::Redirect { url: String::new() },
        );
        assert_eq!(record.resolve_action(), ResolvedAction::Draft);
    }

    #[test]
    fn redirect_with_url_resolves_to_redirect() {
        let record = ExpirationRecord::new(
            "2020-01-01",
            "23:59",
            ExpiryAction::Redirect {
                url: "https://x.test".to_owned(),
            },
        );
        assert_eq!(
            record.resolve_action(),
            ResolvedAction::Redirect("https://x.test")
        );
        assert_eq!(record.resolve_action().label(), "Redirect");
    }

    quickcheck! {
        // Once expired, a record stays expired at every later instant.
        fn is_expired_is_monotonic(timestamp: i64, advance: u32) -> bool {
            let record = draft("2025-06-01", "12:00");
            let now = OffsetDateTime::from_unix_timestamp(timestamp.rem_euclid(4_000_000_000))
                .unwrap();
            let later = now + std::time::Duration::from_secs(u64::from(advance));
            !record.is_expired(now) || record.is_expired(later)
        }

        // Resolution is stable across repeated calls.
        fn resolve_action_is_deterministic(url: String) -> bool {
            let record = ExpirationRecord::new(
                "2025-06-01",
                "12:00",
                ExpiryAction::Redirect { url },
            );
            record.resolve_action() == record.resolve_action()
        }
    }
}
