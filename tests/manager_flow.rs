//! End-to-end controller flows against the in-memory store.

use cookman::cookie::form::{CookieForm, SetParams};
use cookman::cookie::{CookieIdentity, CookieRecord, SameSite};
use cookman::error::{CookmanError, Result};
use cookman::manager::{Command, CookieManager, Outcome, Phase, SaveOutcome};
use cookman::store::memory::MemoryStore;
use cookman::store::{CookieFilter, CookieStore};

fn cookie(name: &str, domain: &str, path: &str) -> CookieRecord {
    CookieRecord {
        name: name.to_string(),
        value: format!("value-of-{name}"),
        domain: domain.to_string(),
        path: path.to_string(),
        secure: false,
        http_only: false,
        same_site: SameSite::Lax,
        session: true,
        expiration_date: None,
    }
}

fn form(name: &str, domain: &str) -> CookieForm {
    CookieForm {
        name: name.to_string(),
        value: format!("value-of-{name}"),
        domain: domain.to_string(),
        same_site: "lax".to_string(),
        session: true,
        ..CookieForm::default()
    }
}

#[tokio::test]
async fn activate_selects_parent_scope_and_loads_its_cookies() {
    let store = MemoryStore::with_cookies(vec![
        cookie("site", ".example.com", "/"),
        cookie("sub", "app.example.com", "/"),
        cookie("other", "example.org", "/"),
    ]);
    let mut manager = CookieManager::new(store);
    manager.activate("app.example.com").await.expect("activate");

    let snapshot = manager.snapshot();
    assert_eq!(snapshot.hostname.as_deref(), Some("app.example.com"));
    assert_eq!(snapshot.selected_scope.as_deref(), Some(".example.com"));
    let names: Vec<&str> = snapshot.cookies.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["site", "sub"]);
    assert_eq!(manager.phase(), Phase::Idle);
}

#[tokio::test]
async fn create_flow_via_command_dispatch() {
    let mut manager = CookieManager::new(MemoryStore::new());
    manager.activate("example.com").await.expect("activate");

    let outcome = manager
        .dispatch(Command::BeginCreate)
        .await
        .expect("begin create");
    assert_eq!(outcome, Outcome::Editing);

    let outcome = manager
        .dispatch(Command::Save(form("sid", "")))
        .await
        .expect("save");
    assert_eq!(outcome, Outcome::Saved(SaveOutcome::Created));

    // Blank domain defaulted to the selected scope; reload picked it up.
    let snapshot = manager.snapshot();
    assert_eq!(snapshot.cookies.len(), 1);
    assert_eq!(snapshot.cookies[0].domain, "example.com");
    assert!(manager.edit_session().is_none());
}

#[tokio::test]
async fn invalid_name_aborts_before_any_store_call() {
    let mut manager = CookieManager::new(MemoryStore::new());
    manager.activate("example.com").await.expect("activate");
    manager.begin_create().expect("begin create");

    let err = manager
        .save(form("bad name;", "example.com"))
        .await
        .expect_err("invalid name");
    assert!(matches!(err, CookmanError::Validation(_)));
    assert!(manager.store().is_empty());
    // The form stays open for correction.
    assert!(manager.edit_session().is_some());
    assert_eq!(manager.phase(), Phase::Editing);
}

#[tokio::test]
async fn editing_domain_moves_cookie_to_new_identity() {
    let store = MemoryStore::with_cookies(vec![cookie("sid", ".example.com", "/")]);
    let mut manager = CookieManager::new(store);
    manager.activate("app.example.com").await.expect("activate");

    let old_identity = CookieIdentity::new("sid", ".example.com", "/");
    manager.begin_edit(&old_identity).expect("begin edit");
    let outcome = manager
        .save(form("sid", "www.example.com"))
        .await
        .expect("save");
    assert_eq!(outcome, SaveOutcome::Updated);

    // The old identity must no longer appear in a full list fetch.
    let all = manager
        .store()
        .get_all(&CookieFilter::default())
        .await
        .expect("get_all");
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].domain, "www.example.com");
    assert!(!all.iter().any(|c| c.identity() == old_identity));
}

#[tokio::test]
async fn only_one_edit_session_at_a_time() {
    let store = MemoryStore::with_cookies(vec![cookie("sid", ".example.com", "/")]);
    let mut manager = CookieManager::new(store);
    manager.activate("example.com").await.expect("activate");

    manager.begin_create().expect("first session");
    let err = manager.begin_create().expect_err("second create");
    assert!(matches!(err, CookmanError::EditInProgress));
    let err = manager
        .begin_edit(&CookieIdentity::new("sid", ".example.com", "/"))
        .expect_err("second edit");
    assert!(matches!(err, CookmanError::EditInProgress));

    manager.cancel_edit();
    assert_eq!(manager.phase(), Phase::Idle);
    manager.begin_create().expect("session after cancel");
}

#[tokio::test]
async fn delete_reaches_secure_cookies_through_https_attempt() {
    let store = MemoryStore::with_cookies(vec![CookieRecord {
        secure: true,
        ..cookie("sid", "example.com", "/")
    }]);
    let mut manager = CookieManager::new(store);
    manager.activate("example.com").await.expect("activate");

    manager
        .delete(&CookieIdentity::new("sid", "example.com", "/"))
        .await
        .expect("delete");
    assert!(manager.store().is_empty());
    assert!(manager.snapshot().cookies.is_empty());
}

#[tokio::test]
async fn clear_all_reports_attempted_count_and_spares_other_domains() {
    let store = MemoryStore::with_cookies(vec![
        cookie("a", ".example.com", "/"),
        cookie("b", "example.com", "/"),
        cookie("c", "app.example.com", "/"),
        cookie("other", "example.org", "/"),
    ]);
    let mut manager = CookieManager::new(store);
    manager.activate("app.example.com").await.expect("activate");

    let outcome = manager.dispatch(Command::ClearAll).await.expect("clear");
    assert_eq!(outcome, Outcome::Cleared(3));
    assert!(manager.snapshot().cookies.is_empty());
    assert_eq!(manager.store().len(), 1);
}

#[tokio::test]
async fn filter_matches_name_and_value_case_insensitively() {
    let store = MemoryStore::with_cookies(vec![
        cookie("SessionId", "example.com", "/"),
        cookie("theme", "example.com", "/"),
    ]);
    let mut manager = CookieManager::new(store);
    manager.activate("example.com").await.expect("activate");

    let hits = manager.filter("SESSION");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "SessionId");

    // Value text matches too.
    let hits = manager.filter("of-theme");
    assert_eq!(hits.len(), 1);

    // Blank query shows everything; the snapshot itself is untouched.
    assert_eq!(manager.filter("  ").len(), 2);
    assert_eq!(manager.snapshot().cookies.len(), 2);
}

#[tokio::test]
async fn degraded_manager_keeps_running_without_a_scope() {
    let mut manager = CookieManager::new(MemoryStore::new());
    manager.degrade("active tab has no URL");

    let snapshot = manager.snapshot();
    assert!(snapshot.degraded.is_some());
    assert!(snapshot.scopes.is_empty());
    assert_eq!(snapshot.selected_scope, None);
    // A reload with nothing selected is a no-op, not a crash.
    manager.reload().await.expect("reload");
}

/// Store double whose set call always comes back empty.
struct RefusingStore;

impl CookieStore for RefusingStore {
    async fn get_all(&self, _filter: &CookieFilter) -> Result<Vec<CookieRecord>> {
        Ok(Vec::new())
    }

    async fn set(&self, _params: SetParams) -> Result<Option<CookieRecord>> {
        Ok(None)
    }

    async fn remove(&self, _url: &str, _name: &str) -> Result<CookieRecord> {
        Err(CookmanError::Store("nothing to remove".to_string()))
    }
}

#[tokio::test]
async fn store_failure_during_save_keeps_form_open() {
    let mut manager = CookieManager::new(RefusingStore);
    manager.activate("example.com").await.expect("activate");
    manager.begin_create().expect("begin create");

    let err = manager
        .save(form("sid", "example.com"))
        .await
        .expect_err("store refused the write");
    assert!(matches!(err, CookmanError::Store(_)));
    // The form stays open for a retry.
    assert!(manager.edit_session().is_some());
    assert_eq!(manager.phase(), Phase::Editing);
}

#[tokio::test]
async fn save_requires_an_open_session() {
    let mut manager = CookieManager::new(MemoryStore::new());
    manager.activate("example.com").await.expect("activate");
    let err = manager
        .save(form("sid", "example.com"))
        .await
        .expect_err("no session");
    assert!(matches!(err, CookmanError::Validation(_)));
}

#[tokio::test]
async fn select_scope_reloads_under_new_scope() {
    let store = MemoryStore::with_cookies(vec![
        cookie("site", ".example.com", "/"),
        cookie("sub", "app.example.com", "/"),
    ]);
    let mut manager = CookieManager::new(store);
    manager.activate("app.example.com").await.expect("activate");
    assert_eq!(manager.snapshot().cookies.len(), 2);

    manager
        .select_scope("app.example.com")
        .await
        .expect("select");
    let names: Vec<&str> = manager
        .snapshot()
        .cookies
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(names, ["sub"]);
}
