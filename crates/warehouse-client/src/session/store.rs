//! Token Store
//!
//! Every medium persists the same two values: the raw credential and a JSON
//! profile record. The helpers here own the profile codec so browser stores
//! only move strings in and out of their medium.

use std::cell::{Cell, RefCell};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Session;
use crate::error::StoreError;
use crate::models::Subject;

/// Persistence for the current session.
///
/// `load` performs no network I/O. Writes are last-writer-wins.
pub trait TokenStore {
    fn save(&self, session: &Session) -> Result<(), StoreError>;
    fn load(&self) -> Option<Session>;
    fn clear(&self);
}

/// Profile record stored next to the credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredProfile {
    #[serde(default)]
    pub subject: Option<Subject>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

pub fn encode_profile(session: &Session) -> Result<String, StoreError> {
    let profile = StoredProfile {
        subject: session.subject.clone(),
        expires_at: session.expires_at,
    };
    serde_json::to_string(&profile).map_err(|e| StoreError::Encode(e.to_string()))
}

/// Accepts the profile record, or a bare `{username, role}` object as older
/// pages stored it.
pub fn decode_profile(raw: &str) -> Option<StoredProfile> {
    if let Ok(profile) = serde_json::from_str::<StoredProfile>(raw) {
        if profile.subject.is_some() || profile.expires_at.is_some() {
            return Some(profile);
        }
    }
    serde_json::from_str::<Subject>(raw)
        .ok()
        .map(|subject| StoredProfile { subject: Some(subject), expires_at: None })
}

/// Rebuild a session from stored strings. Claims fill whatever the profile lacks.
pub fn restore_session(credential: String, profile: Option<&str>) -> Option<Session> {
    if credential.trim().is_empty() {
        return None;
    }
    let mut session = Session::from_credential(credential);
    if let Some(profile) = profile.and_then(decode_profile) {
        if profile.subject.is_some() {
            session.subject = profile.subject;
        }
        if profile.expires_at.is_some() {
            session.expires_at = profile.expires_at;
        }
    }
    Some(session)
}

/// In-process store. Holds the encoded form so it behaves like the browser media.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    credential: RefCell<Option<String>>,
    profile: RefCell<Option<String>>,
    read_only: Cell<bool>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: &Session) -> Self {
        let store = Self::new();
        *store.credential.borrow_mut() = Some(session.credential.clone());
        *store.profile.borrow_mut() = encode_profile(session).ok();
        store
    }

    /// Make every later `save` fail, like a full or disabled storage area.
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.set(read_only);
    }

    /// Drop the profile record and keep the credential.
    pub fn forget_profile(&self) {
        self.profile.borrow_mut().take();
    }
}

impl TokenStore for MemoryTokenStore {
    fn save(&self, session: &Session) -> Result<(), StoreError> {
        if self.read_only.get() {
            return Err(StoreError::Unavailable("store is read-only".into()));
        }
        let profile = encode_profile(session)?;
        *self.credential.borrow_mut() = Some(session.credential.clone());
        *self.profile.borrow_mut() = Some(profile);
        Ok(())
    }

    fn load(&self) -> Option<Session> {
        let credential = self.credential.borrow().clone()?;
        let profile = self.profile.borrow().clone();
        restore_session(credential, profile.as_deref())
    }

    fn clear(&self) {
        self.credential.borrow_mut().take();
        self.profile.borrow_mut().take();
    }
}
