//! Popup <-> background messaging
//!
//! The popup asks the background page for cookies in a single
//! request/response round trip, no retry. The background also observes
//! store change events and logs them without acting on them.

use log::info;
use serde::{Deserialize, Serialize};

use crate::cookie::CookieRecord;
use crate::error::Result;
use crate::store::{CookieFilter, CookieStore};

/// Message sent from the popup, tagged by action name on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Request {
    GetCookies { domain: String },
}

/// Reply to a [`Request::GetCookies`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub cookies: Vec<CookieRecord>,
}

/// Serve one popup request against the store.
pub async fn handle_request<S: CookieStore>(store: &S, request: Request) -> Result<Response> {
    match request {
        Request::GetCookies { domain } => {
            let cookies = store.get_all(&CookieFilter::domain(&domain)).await?;
            Ok(Response { cookies })
        }
    }
}

/// Why the store reported a cookie change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeCause {
    Evicted,
    Expired,
    Explicit,
    ExpiredOverwrite,
    Overwrite,
}

/// A store change notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeInfo {
    pub removed: bool,
    pub cookie: CookieRecord,
    pub cause: ChangeCause,
}

/// Log a change event the way the background script does: observed, never
/// acted on.
pub fn log_change(change: &ChangeInfo) {
    info!(
        "cookie {:?} on {} {}: {:?}",
        change.cookie.name,
        change.cookie.domain,
        if change.removed { "removed" } else { "set" },
        change.cause
    );
}
