//! Normalization of raw editor input into an [`ExpirationRecord`].

use http::Uri;
use tower_expire_core::{
    time::DEFAULT_EXPIRY_TIME,
    ExpirationRecord, ExpiryAction,
};

/// The four raw string fields submitted from the expiration form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExpirationForm {
    pub date: String,
    pub time: String,
    pub action: String,
    pub url: String,
}

impl ExpirationForm {
    /// Form field values to prefill the edit form with.
    ///
    /// An absent record prefills the defaults an editor starts from: time
    /// `23:59` and action `draft`.
    #[must_use]
    pub fn prefill(record: Option<&ExpirationRecord>) -> ExpirationForm {
        match record {
            None => ExpirationForm {
                time: DEFAULT_EXPIRY_TIME.to_owned(),
                action: "draft".to_owned(),
                ..ExpirationForm::default()
            },
            Some(record) => {
                let (action, url) = match &record.action {
                    ExpiryAction::Draft => ("draft", String::new()),
                    ExpiryAction::Redirect { url } => ("redirect", url.clone()),
                };
                ExpirationForm {
                    date: record.date.clone(),
                    time: record.time.clone(),
                    action: action.to_owned(),
                    url,
                }
            }
        }
    }
}

/// Result of validating an [`ExpirationForm`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Validation {
    /// Persist this record (write all four fields).
    Record(ExpirationRecord),
    /// Remove the whole record (delete all four fields).
    Cleared,
}

/// Validates raw form input.
///
/// Every malformed field has a defined fallback; nothing here fails:
///
/// - A date that is not `YYYY-MM-DD`-shaped (including an empty one) clears
///   the record regardless of the other fields. Date emptiness is the
///   authoritative "no expiration" signal.
/// - A time that is not `HH:MM`-shaped becomes `23:59`.
/// - An action other than `draft` or `redirect` becomes `draft`.
/// - A redirect whose url is empty or not an absolute `http(s)` url
///   becomes a draft action, and the url is not kept.
///
/// Validation is pure. Persisting the outcome is the caller's job; see
/// [`save_expiration`].
///
/// [`save_expiration`]: crate::save::save_expiration
///
/// # Examples
///
/// ```
/// use tower_expire::{validate, ExpirationForm, Validation};
/// use tower_expire_core::ExpiryAction;
///
/// let form = ExpirationForm {
///     date: "2025-01-01".to_owned(),
///     time: String::new(),
///     action: "redirect".to_owned(),
///     url: String::new(),
/// };
/// let Validation::Record(record) = validate(&form) else { unreachable!() };
/// assert_eq!(record.time, "23:59");
/// assert_eq!(record.action, ExpiryAction::Draft);
/// ```
#[must_use]
pub fn validate(form: &ExpirationForm) -> Validation {
    let date = form.date.trim();
    if !is_date_shaped(date) {
        return Validation::Cleared;
    }

    let time = form.time.trim();
    let time = if is_time_shaped(time) {
        time.to_owned()
    } else {
        DEFAULT_EXPIRY_TIME.to_owned()
    };

    let action = match form.action.trim() {
        "redirect" => match sanitize_url(&form.url) {
            Some(url) => ExpiryAction::Redirect { url },
            None => ExpiryAction::Draft,
        },
        _ => ExpiryAction::Draft,
    };

    Validation::Record(ExpirationRecord::new(date, time, action))
}

/// Shape check only: digits and separators in the right places. Whether
/// the digits name a real calendar moment is decided at composition time,
/// where failure means "not expired".
fn matches_shape(s: &str, shape: &str) -> bool {
    s.len() == shape.len()
        && s.bytes().zip(shape.bytes()).all(|(b, pat)| match pat {
            b'd' => b.is_ascii_digit(),
            lit => b == lit,
        })
}

fn is_date_shaped(s: &str) -> bool {
    matches_shape(s, "dddd-dd-dd")
}

fn is_time_shaped(s: &str) -> bool {
    matches_shape(s, "dd:dd")
}

/// Accepts only an absolute `http` or `https` url, trimmed. Anything else
/// is rejected, which coerces the action back to draft.
fn sanitize_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let uri = trimmed.parse::<Uri>().ok()?;
    match uri.scheme_str() {
        Some("http") | Some("https") => Some(trimmed.to_owned()),
        _ => None,
    }
}

#[cfg(test)]
mod test {
    use quickcheck::quickcheck;

    use super::*;

    fn form(date: &str, time: &str, action: &str, url: &str) -> ExpirationForm {
        ExpirationForm {
            date: date.to_owned(),
            time: time.to_owned(),
            action: action.to_owned(),
            url: url.to_owned(),
        }
    }

    #[test]
    fn empty_date_clears() {
        assert_eq!(validate(&form("", "12:00", "draft", "")), Validation::Cleared);
    }

    #[test]
    fn malformed_date_clears_regardless_of_other_fields() {
        for date in ["01-01-2025", "2025/01/01", "2025-1-1", "not a date"] {
            let form = form(date, "12:00", "redirect", "https://x.test");
            assert_eq!(validate(&form), Validation::Cleared, "date: {date:?}");
        }
    }

    #[test]
    fn date_is_trimmed_before_the_shape_check() {
        let Validation::Record(record) = validate(&form(" 2025-01-01 ", "12:00", "draft", ""))
        else {
            panic!("expected a record");
        };
        assert_eq!(record.date, "2025-01-01");
    }

    #[test]
    fn malformed_time_defaults() {
        for time in ["", "7:00", "0700", "late"] {
            let Validation::Record(record) = validate(&form("2025-01-01", time, "draft", ""))
            else {
                panic!("expected a record for time {time:?}");
            };
            assert_eq!(record.time, "23:59");
        }
    }

    #[test]
    fn well_formed_time_is_kept() {
        let Validation::Record(record) = validate(&form("2025-01-01", "08:30", "draft", ""))
        else {
            panic!("expected a record");
        };
        assert_eq!(record.time, "08:30");
    }

    #[test]
    fn unknown_action_defaults_to_draft() {
        let Validation::Record(record) = validate(&form("2025-01-01", "12:00", "unpublish", ""))
        else {
            panic!("expected a record");
        };
        assert_eq!(record.action, ExpiryAction::Draft);
    }

    #[test]
    fn redirect_without_url_becomes_draft() {
        for url in ["", "   ", "not a url with spaces", "javascript:alert(1)", "/relative"] {
            let Validation::Record(record) =
                validate(&form("2025-01-01", "12:00", "redirect", url))
            else {
                panic!("expected a record for url {url:?}");
            };
            assert_eq!(record.action, ExpiryAction::Draft, "url: {url:?}");
        }
    }

    #[test]
    fn redirect_with_url_is_kept() {
        let Validation::Record(record) = validate(&form(
            "2025-01-01",
            "12:00",
            "redirect",
            "  https://x.test/after ",
        )) else {
            panic!("expected a record");
        };
        assert_eq!(
            record.action,
            ExpiryAction::Redirect {
                url: "https://x.test/after".to_owned()
            }
        );
    }

    quickcheck! {
        // Any date that fails the shape check clears the record, no
        // matter what the remaining fields hold.
        fn unshaped_date_always_clears(date: String, time: String, url: String) -> bool {
            if is_date_shaped(date.trim()) {
                return true;
            }
            validate(&form(&date, &time, "redirect", &url)) == Validation::Cleared
        }

        // Validation never produces a redirect with an empty url.
        fn no_redirect_without_url(date: String, action: String, url: String) -> bool {
            match validate(&form(&date, "12:00", &action, &url)) {
                Validation::Record(record) => match record.action {
                    ExpiryAction::Redirect { url } => !url.is_empty(),
                    ExpiryAction::Draft => true,
                },
                Validation::Cleared => true,
            }
        }
    }
}
