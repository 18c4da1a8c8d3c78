//! The guarded form-save pipeline.

use tower_expire_core::{
    store::{self, clear_record, save_record, MetadataStore},
    ExpirationRecord, ItemId,
};

use crate::validate::{validate, ExpirationForm, Validation};

/// Authorization of a form submission before anything is written.
///
/// Covers everything the host checks ahead of a metadata write: the
/// forgery-protection token, the submitter's permission to edit `item`,
/// and host-generated submissions (autosaves) that must not touch
/// expiration metadata. A single `false` skips the save entirely.
pub trait SaveGuard: Send + Sync {
    fn verify(&self, item: ItemId, token: &str) -> bool;
}

/// What a call to [`save_expiration`] did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The record was validated and all four fields were written.
    Saved(ExpirationRecord),
    /// No usable date was submitted; all four fields were removed.
    Cleared,
    /// The guard rejected the submission; nothing was written.
    Skipped,
}

/// Validates and persists a submitted expiration form for `item`.
///
/// The guard runs first; a rejected submission performs no writes at all.
/// Otherwise the validator's outcome is applied atomically from the
/// request's point of view: either all four fields are written
/// ([`save_record`]) or all four are removed ([`clear_record`]).
pub async fn save_expiration<S, G>(
    store: &S,
    guard: &G,
    item: ItemId,
    token: &str,
    form: &ExpirationForm,
) -> Result<SaveOutcome, store::Error>
where
    S: MetadataStore + ?Sized,
    G: SaveGuard + ?Sized,
{
    if !guard.verify(item, token) {
        debug!(item = %item, "expiration save rejected by guard");
        return Ok(SaveOutcome::Skipped);
    }

    match validate(form) {
        Validation::Record(record) => {
            save_record(store, item, &record).await?;
            Ok(SaveOutcome::Saved(record))
        }
        Validation::Cleared => {
            clear_record(store, item).await?;
            Ok(SaveOutcome::Cleared)
        }
    }
}
