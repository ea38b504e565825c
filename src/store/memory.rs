//! In-memory cookie store
//!
//! Implements the external store surface with browser-like matching
//! semantics: the controller and the message relay run against it exactly
//! as they would against a real store.

use std::sync::Mutex;

use url::Url;

use super::{CookieFilter, CookieStore};
use crate::cookie::form::SetParams;
use crate::cookie::{strip_dot, CookieRecord};
use crate::error::{CookmanError, Result};

#[derive(Debug, Default)]
pub struct MemoryStore {
    cookies: Mutex<Vec<CookieRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with existing cookies.
    pub fn with_cookies(cookies: Vec<CookieRecord>) -> Self {
        Self {
            cookies: Mutex::new(cookies),
        }
    }

    pub fn len(&self) -> usize {
        self.cookies.lock().expect("store lock").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// True when a cookie set for `cookie_domain` is visible under a domain
/// filter: the filter matches its own host and every subdomain of it,
/// leading dots ignored on both sides.
fn domain_matches(cookie_domain: &str, filter: &str) -> bool {
    let cookie_host = strip_dot(cookie_domain);
    let filter_host = strip_dot(filter);
    cookie_host == filter_host || cookie_host.ends_with(&format!(".{filter_host}"))
}

/// True when a cookie with `cookie_domain` covers `host`: exact match for
/// host-only cookies, host or any subdomain for domain cookies.
fn host_covers(cookie_domain: &str, host: &str) -> bool {
    match cookie_domain.strip_prefix('.') {
        Some(stripped) => host == stripped || host.ends_with(&format!(".{stripped}")),
        None => host == cookie_domain,
    }
}

impl CookieStore for MemoryStore {
    async fn get_all(&self, filter: &CookieFilter) -> Result<Vec<CookieRecord>> {
        let cookies = self.cookies.lock().expect("store lock");
        Ok(cookies
            .iter()
            .filter(|cookie| match &filter.domain {
                Some(domain) => domain_matches(&cookie.domain, domain),
                None => true,
            })
            .cloned()
            .collect())
    }

    async fn set(&self, params: SetParams) -> Result<Option<CookieRecord>> {
        let url = Url::parse(&params.url)?;
        let host = url
            .host_str()
            .ok_or_else(|| CookmanError::Store(format!("set URL {} has no host", params.url)))?;

        // A Secure cookie cannot be created through an insecure URL.
        if params.secure && url.scheme() != "https" {
            return Ok(None);
        }

        let record = CookieRecord {
            name: params.name,
            value: params.value,
            domain: params.domain.unwrap_or_else(|| host.to_string()),
            path: params.path,
            secure: params.secure,
            http_only: params.http_only,
            same_site: params.same_site,
            session: params.expiration_date.is_none(),
            expiration_date: params.expiration_date,
        };

        let mut cookies = self.cookies.lock().expect("store lock");
        cookies.retain(|existing| {
            !(existing.name == record.name
                && existing.domain == record.domain
                && existing.path == record.path)
        });
        cookies.push(record.clone());
        Ok(Some(record))
    }

    async fn remove(&self, url: &str, name: &str) -> Result<CookieRecord> {
        let url = Url::parse(url)?;
        let host = url
            .host_str()
            .ok_or_else(|| CookmanError::Store(format!("remove URL {url} has no host")))?;

        let mut cookies = self.cookies.lock().expect("store lock");
        let index = cookies.iter().position(|cookie| {
            cookie.name == name
                && cookie.path == url.path()
                && host_covers(&cookie.domain, host)
                // Secure cookies are only reachable through https URLs.
                && (!cookie.secure || url.scheme() == "https")
        });
        match index {
            Some(index) => Ok(cookies.remove(index)),
            None => Err(CookmanError::Store(format!(
                "no cookie {name:?} under {url}"
            ))),
        }
    }
}
