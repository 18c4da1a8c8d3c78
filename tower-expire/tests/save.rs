use tower_expire::{
    save::{save_expiration, SaveGuard, SaveOutcome},
    store::MemoryStore,
    ExpirationForm,
};
use tower_expire_core::{
    store::{load_record, save_record},
    ExpirationRecord, ExpiryAction, ItemId,
};

struct AllowAll;

impl SaveGuard for AllowAll {
    fn verify(&self, _item: ItemId, _token: &str) -> bool {
        true
    }
}

/// Accepts only one token, like a host nonce check.
struct TokenGuard(&'static str);

impl SaveGuard for TokenGuard {
    fn verify(&self, _item: ItemId, token: &str) -> bool {
        token == self.0
    }
}

fn item() -> ItemId {
    ItemId::try_from(1).unwrap()
}

fn form(date: &str, time: &str, action: &str, url: &str) -> ExpirationForm {
    ExpirationForm {
        date: date.to_owned(),
        time: time.to_owned(),
        action: action.to_owned(),
        url: url.to_owned(),
    }
}

#[tokio::test]
async fn redirect_without_url_is_stored_as_draft() {
    let store = MemoryStore::new();
    let form = form("2025-01-01", "", "redirect", "");

    let outcome = save_expiration(&store, &AllowAll, item(), "token", &form)
        .await
        .unwrap();

    let expected = ExpirationRecord::new("2025-01-01", "23:59", ExpiryAction::Draft);
    assert_eq!(outcome, SaveOutcome::Saved(expected.clone()));
    assert_eq!(load_record(&store, item()).await.unwrap(), Some(expected));
}

#[tokio::test]
async fn redirect_with_url_is_stored_as_redirect() {
    let store = MemoryStore::new();
    let form = form("2025-01-01", "08:30", "redirect", "https://x.test");

    let outcome = save_expiration(&store, &AllowAll, item(), "token", &form)
        .await
        .unwrap();

    let expected = ExpirationRecord::new(
        "2025-01-01",
        "08:30",
        ExpiryAction::Redirect {
            url: "https://x.test".to_owned(),
        },
    );
    assert_eq!(outcome, SaveOutcome::Saved(expected.clone()));
    assert_eq!(load_record(&store, item()).await.unwrap(), Some(expected));
}

#[tokio::test]
async fn empty_date_clears_an_existing_record() {
    let store = MemoryStore::new();
    let existing = ExpirationRecord::new("2025-01-01", "23:59", ExpiryAction::Draft);
    save_record(&store, item(), &existing).await.unwrap();

    let outcome = save_expiration(&store, &AllowAll, item(), "token", &form("", "", "draft", ""))
        .await
        .unwrap();

    assert_eq!(outcome, SaveOutcome::Cleared);
    assert_eq!(load_record(&store, item()).await.unwrap(), None);
}

#[tokio::test]
async fn rejected_submission_writes_nothing() {
    let store = MemoryStore::new();
    let existing = ExpirationRecord::new("2025-01-01", "23:59", ExpiryAction::Draft);
    save_record(&store, item(), &existing).await.unwrap();

    // A clearing form with a bad token must not clear anything.
    let outcome = save_expiration(
        &store,
        &TokenGuard("expected"),
        item(),
        "forged",
        &form("", "", "draft", ""),
    )
    .await
    .unwrap();

    assert_eq!(outcome, SaveOutcome::Skipped);
    assert_eq!(load_record(&store, item()).await.unwrap(), Some(existing));
}

#[tokio::test]
async fn accepted_token_saves() {
    let store = MemoryStore::new();

    let outcome = save_expiration(
        &store,
        &TokenGuard("expected"),
        item(),
        "expected",
        &form("2025-01-01", "12:00", "draft", ""),
    )
    .await
    .unwrap();

    assert!(matches!(outcome, SaveOutcome::Saved(_)));
}
