//! Reconciliation controller
//!
//! Orchestrates load -> filter -> edit/delete -> reload against a cookie
//! store. Render state lives in an immutable snapshot that is replaced
//! wholesale on every reload; user actions arrive as [`Command`]s so no
//! rendering surface leaks in here.

use futures_util::future::join_all;
use log::{error, info};

use crate::cookie::form::CookieForm;
use crate::cookie::{CookieIdentity, CookieRecord};
use crate::error::{CookmanError, Result};
use crate::i18n;
use crate::scope::{self, DomainScope};
use crate::store::{self, CookieStore};

/// Controller lifecycle phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Editing,
    Saving,
    Deleting,
}

/// Immutable view of everything the popup renders.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub hostname: Option<String>,
    pub scopes: Vec<DomainScope>,
    pub selected_scope: Option<String>,
    pub cookies: Vec<CookieRecord>,
    /// Inline message shown when the active tab could not be read.
    pub degraded: Option<String>,
}

/// One open edit; `target` is `None` when creating a new cookie.
#[derive(Debug, Clone)]
pub struct EditSession {
    pub target: Option<CookieRecord>,
}

/// Whether a save updated an existing cookie or created one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Created,
    Updated,
}

/// A user action, decoupled from whatever surface emitted it.
#[derive(Debug, Clone)]
pub enum Command {
    Activate(String),
    SelectScope(String),
    Refresh,
    BeginCreate,
    BeginEdit(CookieIdentity),
    CancelEdit,
    Save(CookieForm),
    Delete(CookieIdentity),
    ClearAll,
}

/// What a dispatched command produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Reloaded,
    Editing,
    Cancelled,
    Saved(SaveOutcome),
    Deleted,
    Cleared(usize),
}

pub struct CookieManager<S: CookieStore> {
    store: S,
    phase: Phase,
    snapshot: Snapshot,
    edit: Option<EditSession>,
}

impl<S: CookieStore> CookieManager<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            phase: Phase::Idle,
            snapshot: Snapshot::default(),
            edit: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn edit_session(&self) -> Option<&EditSession> {
        self.edit.as_ref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Resolve scopes for the active tab's hostname, preselect the default
    /// scope, and load its cookies.
    pub async fn activate(&mut self, hostname: &str) -> Result<()> {
        let scopes = scope::resolve(hostname);
        let selected = scope::default_selection(&scopes, hostname);
        self.snapshot = Snapshot {
            hostname: Some(hostname.to_string()),
            scopes,
            selected_scope: Some(selected),
            cookies: Vec::new(),
            degraded: None,
        };
        self.reload().await
    }

    /// Active-tab lookup failed: disable the scope selector and keep
    /// running with an inline message instead of crashing.
    pub fn degrade(&mut self, reason: &str) {
        error!("active tab lookup failed: {reason}");
        self.snapshot = Snapshot {
            degraded: Some(i18n::scope_unavailable()),
            ..Snapshot::default()
        };
        self.phase = Phase::Idle;
        self.edit = None;
    }

    /// Fetch the authoritative cookie list for the selected scope.
    ///
    /// The in-memory list is replaced only on success; a failed fetch
    /// keeps the previous snapshot. Overlapping reloads are not guarded
    /// against, so a rapid double refresh may apply out of order.
    pub async fn reload(&mut self) -> Result<()> {
        let Some(selected) = self.snapshot.selected_scope.clone() else {
            return Ok(());
        };
        self.phase = Phase::Loading;
        let result = store::fetch_scope(&self.store, &selected).await;
        self.phase = Phase::Idle;
        match result {
            Ok(cookies) => {
                info!("loaded {} cookies for {selected}", cookies.len());
                self.snapshot = Snapshot {
                    cookies,
                    ..self.snapshot.clone()
                };
                Ok(())
            }
            Err(err) => {
                error!("loading cookies for {selected} failed: {err}");
                Err(err)
            }
        }
    }

    /// Switch the selected scope and reload under it.
    pub async fn select_scope(&mut self, value: &str) -> Result<()> {
        self.snapshot = Snapshot {
            selected_scope: Some(value.to_string()),
            ..self.snapshot.clone()
        };
        self.reload().await
    }

    /// Open an edit session for a new cookie.
    pub fn begin_create(&mut self) -> Result<()> {
        self.open_session(None)
    }

    /// Open an edit session for a loaded cookie.
    pub fn begin_edit(&mut self, identity: &CookieIdentity) -> Result<()> {
        let target = self
            .snapshot
            .cookies
            .iter()
            .find(|cookie| cookie.identity() == *identity)
            .cloned()
            .ok_or_else(|| {
                CookmanError::Store(format!("no loaded cookie named {:?}", identity.name))
            })?;
        self.open_session(Some(target))
    }

    fn open_session(&mut self, target: Option<CookieRecord>) -> Result<()> {
        if self.edit.is_some() {
            return Err(CookmanError::EditInProgress);
        }
        self.edit = Some(EditSession { target });
        self.phase = Phase::Editing;
        Ok(())
    }

    /// Close the open edit session without saving.
    pub fn cancel_edit(&mut self) {
        self.edit = None;
        if self.phase == Phase::Editing {
            self.phase = Phase::Idle;
        }
    }

    /// Validate the form and write it to the store.
    ///
    /// Editing replaces via delete-then-insert: attribute changes can move
    /// the cookie to a different store key, so the old identity is removed
    /// first, sequentially, before the new record is written. The list is
    /// then reloaded from the store rather than patched, since the store
    /// may normalize attributes the client cannot predict. Validation
    /// failures abort before any store call and leave the session open.
    pub async fn save(&mut self, form: CookieForm) -> Result<SaveOutcome> {
        let session = self
            .edit
            .clone()
            .ok_or_else(|| CookmanError::Validation("no edit session is open".to_string()))?;
        let selected = self.snapshot.selected_scope.clone().unwrap_or_default();
        let record = form.into_record(&selected)?;

        self.phase = Phase::Saving;
        match self.save_inner(&session, record).await {
            Ok(outcome) => {
                self.edit = None;
                self.phase = Phase::Idle;
                self.reload().await?;
                Ok(outcome)
            }
            Err(err) => {
                // The form stays open so the user can correct and retry.
                self.phase = Phase::Editing;
                Err(err)
            }
        }
    }

    async fn save_inner(&self, session: &EditSession, record: CookieRecord) -> Result<SaveOutcome> {
        if let Some(previous) = &session.target {
            // Sequential on purpose: a failed removal must not be masked
            // by writing a possibly conflicting key.
            store::remove_everywhere(&self.store, &previous.identity()).await?;
        }
        store::write(&self.store, &record).await?;
        Ok(match session.target {
            Some(_) => SaveOutcome::Updated,
            None => SaveOutcome::Created,
        })
    }

    /// Remove one cookie under both schemes, then reload.
    pub async fn delete(&mut self, identity: &CookieIdentity) -> Result<()> {
        self.phase = Phase::Deleting;
        let result = store::remove_everywhere(&self.store, identity).await;
        self.phase = Phase::Idle;
        result?;
        self.reload().await
    }

    /// Remove every loaded cookie concurrently, join on all, then reload.
    ///
    /// Returns the number of removals attempted.
    pub async fn clear_all(&mut self) -> Result<usize> {
        let identities: Vec<CookieIdentity> = self
            .snapshot
            .cookies
            .iter()
            .map(CookieRecord::identity)
            .collect();
        self.phase = Phase::Deleting;
        let attempts = identities
            .iter()
            .map(|identity| store::remove_everywhere(&self.store, identity));
        let results = join_all(attempts).await;
        self.phase = Phase::Idle;
        results.into_iter().collect::<Result<Vec<()>>>()?;
        self.reload().await?;
        Ok(identities.len())
    }

    /// Case-insensitive substring match over name and value.
    ///
    /// Purely a view over the loaded list; the snapshot is untouched and
    /// the store is never consulted.
    pub fn filter(&self, query: &str) -> Vec<&CookieRecord> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.snapshot.cookies.iter().collect();
        }
        self.snapshot
            .cookies
            .iter()
            .filter(|cookie| {
                cookie.name.to_lowercase().contains(&needle)
                    || cookie.value.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Route a surface-agnostic command to its handler.
    pub async fn dispatch(&mut self, command: Command) -> Result<Outcome> {
        match command {
            Command::Activate(hostname) => {
                self.activate(&hostname).await?;
                Ok(Outcome::Reloaded)
            }
            Command::SelectScope(value) => {
                self.select_scope(&value).await?;
                Ok(Outcome::Reloaded)
            }
            Command::Refresh => {
                self.reload().await?;
                Ok(Outcome::Reloaded)
            }
            Command::BeginCreate => {
                self.begin_create()?;
                Ok(Outcome::Editing)
            }
            Command::BeginEdit(identity) => {
                self.begin_edit(&identity)?;
                Ok(Outcome::Editing)
            }
            Command::CancelEdit => {
                self.cancel_edit();
                Ok(Outcome::Cancelled)
            }
            Command::Save(form) => Ok(Outcome::Saved(self.save(form).await?)),
            Command::Delete(identity) => {
                self.delete(&identity).await?;
                Ok(Outcome::Deleted)
            }
            Command::ClearAll => Ok(Outcome::Cleared(self.clear_all().await?)),
        }
    }
}
