//! Cookie data model
//!
//! Records mirror the browser cookie store's shape, field names included,
//! so they serialize straight onto the extension message channel.

pub mod form;

use serde::{Deserialize, Serialize};

/// SameSite attribute as the store reports it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SameSite {
    NoRestriction,
    #[default]
    Lax,
    Strict,
    Unspecified,
}

impl SameSite {
    /// Map a UI selector value onto a store value. `none` is a legacy alias
    /// for `no_restriction`; anything unrecognized falls back to `Lax`.
    pub fn from_ui(value: &str) -> Self {
        match value {
            "no_restriction" | "none" => SameSite::NoRestriction,
            "lax" => SameSite::Lax,
            "strict" => SameSite::Strict,
            "unspecified" => SameSite::Unspecified,
            _ => SameSite::Lax,
        }
    }

    /// The selector value for this attribute.
    pub fn ui_value(&self) -> &'static str {
        match self {
            SameSite::NoRestriction => "no_restriction",
            SameSite::Lax => "lax",
            SameSite::Strict => "strict",
            SameSite::Unspecified => "unspecified",
        }
    }
}

/// One cookie as held by the store.
///
/// A leading `.` on `domain` marks a domain cookie (host plus subdomains);
/// without it the cookie is host-only. A session cookie carries no
/// expiration date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookieRecord {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
    pub session: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<i64>,
}

impl CookieRecord {
    /// The store identity triple. Two same-named cookies under different
    /// domain/path pairs are distinct cookies.
    pub fn identity(&self) -> CookieIdentity {
        CookieIdentity {
            name: self.name.clone(),
            domain: self.domain.clone(),
            path: self.path.clone(),
        }
    }

    /// The bare host for URL construction, leading dot stripped.
    pub fn host_domain(&self) -> &str {
        strip_dot(&self.domain)
    }

    /// True when the domain carries the wildcard-subdomain prefix.
    pub fn is_domain_cookie(&self) -> bool {
        self.domain.starts_with('.')
    }
}

/// The `(name, domain, path)` triple that keys a cookie in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieIdentity {
    pub name: String,
    pub domain: String,
    pub path: String,
}

impl CookieIdentity {
    pub fn new(name: &str, domain: &str, path: &str) -> Self {
        Self {
            name: name.to_string(),
            domain: domain.to_string(),
            path: path.to_string(),
        }
    }

    /// The bare host for URL construction, leading dot stripped.
    pub fn host_domain(&self) -> &str {
        strip_dot(&self.domain)
    }
}

pub(crate) fn strip_dot(domain: &str) -> &str {
    domain.strip_prefix('.').unwrap_or(domain)
}

/// Truncate a cookie value for list display.
pub fn preview(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        value.to_string()
    } else {
        let truncated: String = value.chars().take(max).collect();
        format!("{truncated}...")
    }
}
