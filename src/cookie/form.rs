//! Edit-form normalization
//!
//! Maps raw form state into a store-ready [`CookieRecord`] and a record
//! into the parameter block the store's `set` call takes.

use chrono::{Local, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::cookie::{strip_dot, CookieRecord, SameSite};
use crate::error::{CookmanError, Result};

/// Raw edit-form state as the UI hands it over.
#[derive(Debug, Clone, Default)]
pub struct CookieForm {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: String,
    pub session: bool,
    /// `datetime-local` text, blank for no expiry.
    pub expires: String,
}

impl CookieForm {
    /// Normalize the form into a store-ready record.
    ///
    /// `selected_scope` fills a blank domain field and `/` fills a blank
    /// path. The session flag wins over any expiry text left behind in the
    /// disabled input.
    pub fn into_record(self, selected_scope: &str) -> Result<CookieRecord> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(CookmanError::Validation("cookie name is empty".to_string()));
        }
        if !name.bytes().all(is_name_byte) {
            return Err(CookmanError::Validation(format!(
                "cookie name {name:?} contains characters outside the token set"
            )));
        }

        let domain = match self.domain.trim() {
            "" => selected_scope.to_string(),
            trimmed => trimmed.to_string(),
        };
        let path = match self.path.trim() {
            "" => "/".to_string(),
            trimmed => trimmed.to_string(),
        };

        let expiration_date = if self.session {
            None
        } else {
            parse_expiry(self.expires.trim())?
        };

        Ok(CookieRecord {
            name,
            value: self.value,
            domain,
            path,
            secure: self.secure,
            http_only: self.http_only,
            same_site: SameSite::from_ui(&self.same_site),
            session: self.session,
            expiration_date,
        })
    }

    /// Prefill form state from an existing record for editing.
    pub fn from_record(record: &CookieRecord) -> Self {
        let expires = match record.expiration_date.filter(|_| !record.session) {
            Some(secs) => Local
                .timestamp_opt(secs, 0)
                .single()
                .map(|dt| dt.format("%Y-%m-%dT%H:%M").to_string())
                .unwrap_or_default(),
            None => String::new(),
        };
        Self {
            name: record.name.clone(),
            value: record.value.clone(),
            domain: record.domain.clone(),
            path: record.path.clone(),
            secure: record.secure,
            http_only: record.http_only,
            same_site: record.same_site.ui_value().to_string(),
            session: record.session,
            expires,
        }
    }
}

/// Cookie-name token set: ASCII alphanumerics plus `!#$&^_`|~-`.
fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"!#$&^_`|~-".contains(&b)
}

/// Parse `datetime-local` text into Unix seconds, floored.
fn parse_expiry(text: &str) -> Result<Option<i64>> {
    if text.is_empty() {
        return Ok(None);
    }
    let naive = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M"))
        .map_err(|e| CookmanError::Validation(format!("invalid expiry {text:?}: {e}")))?;
    let local = Local
        .from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| {
            CookmanError::Validation(format!("expiry {text:?} is not a valid local time"))
        })?;
    Ok(Some(local.timestamp()))
}

/// Parameter block for a store `set` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetParams {
    pub url: String,
    pub name: String,
    pub value: String,
    pub path: String,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<i64>,
}

/// Map a record onto the parameters the store's `set` call takes.
///
/// The URL is built from the dot-stripped domain under the scheme the
/// Secure flag implies. The `domain` field goes out only when the record
/// carried the wildcard-subdomain prefix; leaving it off keeps host-only
/// cookies host-only. A missing expiration marks a session cookie.
pub fn set_params(record: &CookieRecord) -> Result<SetParams> {
    let target_domain = strip_dot(&record.domain);
    let scheme = if record.secure { "https" } else { "http" };
    let url = format!("{scheme}://{target_domain}{}", record.path);
    Url::parse(&url)?;

    Ok(SetParams {
        url,
        name: record.name.clone(),
        value: record.value.clone(),
        path: record.path.clone(),
        secure: record.secure,
        http_only: record.http_only,
        same_site: record.same_site,
        domain: (record.domain != target_domain).then(|| record.domain.clone()),
        expiration_date: record.expiration_date,
    })
}
