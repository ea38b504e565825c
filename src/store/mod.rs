//! Cookie store access
//!
//! The browser's cookie store is an external service with a fixed surface:
//! `get_all`, `set`, `remove`. The trait mirrors that surface; the free
//! functions layer the manager's calling conventions on top, including the
//! dual-scheme removal a logical cookie needs because it may have been
//! created under either http or https.

pub mod memory;

use futures_util::future::join;
use log::debug;

use crate::cookie::form::{set_params, SetParams};
use crate::cookie::{CookieIdentity, CookieRecord};
use crate::error::{CookmanError, Result};

/// Filter for a `get_all` call. A domain filter accepts both exact hosts
/// and dot-prefixed wildcard values; the store's own matching handles both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieFilter {
    pub domain: Option<String>,
}

impl CookieFilter {
    pub fn domain(value: &str) -> Self {
        Self {
            domain: Some(value.to_string()),
        }
    }
}

/// The external cookie store interface.
#[allow(async_fn_in_trait)]
pub trait CookieStore {
    /// List every cookie matching the filter.
    async fn get_all(&self, filter: &CookieFilter) -> Result<Vec<CookieRecord>>;

    /// Create or overwrite a cookie. `None` signals failure.
    async fn set(&self, params: SetParams) -> Result<Option<CookieRecord>>;

    /// Remove the cookie the URL and name resolve to.
    async fn remove(&self, url: &str, name: &str) -> Result<CookieRecord>;
}

/// Fetch every cookie visible under a scope value.
pub async fn fetch_scope<S: CookieStore>(store: &S, scope: &str) -> Result<Vec<CookieRecord>> {
    store.get_all(&CookieFilter::domain(scope)).await
}

/// Write a record, treating an empty store reply as a hard failure.
pub async fn write<S: CookieStore>(store: &S, record: &CookieRecord) -> Result<CookieRecord> {
    let params = set_params(record)?;
    debug!("setting cookie {:?} via {}", params.name, params.url);
    match store.set(params).await? {
        Some(stored) => Ok(stored),
        None => Err(CookmanError::Store(format!(
            "store returned no result for cookie {:?}",
            record.name
        ))),
    }
}

/// Remove a logical cookie under both schemes.
///
/// Each attempt is independent and allowed to fail: the store may hold no
/// entry under one of the two URLs. Removal is complete once both attempts
/// have settled, whatever their individual outcomes.
pub async fn remove_everywhere<S: CookieStore>(
    store: &S,
    identity: &CookieIdentity,
) -> Result<()> {
    let host = identity.host_domain();
    let http_url = format!("http://{host}{}", identity.path);
    let https_url = format!("https://{host}{}", identity.path);

    let (http_result, https_result) = join(
        store.remove(&http_url, &identity.name),
        store.remove(&https_url, &identity.name),
    )
    .await;

    if let Err(err) = http_result {
        debug!("http removal of {:?} failed: {err}", identity.name);
    }
    if let Err(err) = https_result {
        debug!("https removal of {:?} failed: {err}", identity.name);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{remove_everywhere, write, CookieFilter, CookieStore};
    use crate::cookie::form::SetParams;
    use crate::cookie::{CookieIdentity, CookieRecord, SameSite};
    use crate::error::{CookmanError, Result};
    use std::sync::Mutex;

    /// Store double that records remove URLs and refuses every call.
    #[derive(Default)]
    struct RecordingStore {
        removals: Mutex<Vec<String>>,
        set_replies_empty: bool,
    }

    impl CookieStore for RecordingStore {
        async fn get_all(&self, _filter: &CookieFilter) -> Result<Vec<CookieRecord>> {
            Ok(Vec::new())
        }

        async fn set(&self, _params: SetParams) -> Result<Option<CookieRecord>> {
            assert!(self.set_replies_empty);
            Ok(None)
        }

        async fn remove(&self, url: &str, name: &str) -> Result<CookieRecord> {
            self.removals
                .lock()
                .expect("removals lock")
                .push(url.to_string());
            Err(CookmanError::Store(format!("no cookie {name:?}")))
        }
    }

    fn record() -> CookieRecord {
        CookieRecord {
            name: "sid".to_string(),
            value: "abc".to_string(),
            domain: ".example.com".to_string(),
            path: "/".to_string(),
            secure: false,
            http_only: false,
            same_site: SameSite::Lax,
            session: true,
            expiration_date: None,
        }
    }

    #[tokio::test]
    async fn write_treats_empty_reply_as_failure() {
        let store = RecordingStore {
            set_replies_empty: true,
            ..RecordingStore::default()
        };
        let err = write(&store, &record()).await.expect_err("empty reply");
        assert!(matches!(err, CookmanError::Store(_)));
    }

    #[tokio::test]
    async fn remove_everywhere_attempts_both_schemes() {
        let store = RecordingStore::default();
        let identity = CookieIdentity::new("sid", ".example.com", "/app");
        remove_everywhere(&store, &identity)
            .await
            .expect("completes despite failures");

        let mut urls = store.removals.lock().expect("removals lock").clone();
        urls.sort();
        assert_eq!(
            urls,
            ["http://example.com/app", "https://example.com/app"]
        );
    }
}
