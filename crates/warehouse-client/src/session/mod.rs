//! Session Module
//!
//! The credential, who it belongs to and when it stops being usable.

mod claims;
mod guard;
mod store;

pub use claims::{decode_claims, Claims};
pub use guard::{classify, SessionGuard, SessionState};
pub use store::{decode_profile, encode_profile, restore_session, MemoryTokenStore, StoredProfile, TokenStore};

#[cfg(test)]
pub(crate) use claims::encode_token;

use chrono::{DateTime, Utc};

use crate::models::Subject;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Opaque to the client apart from the decoded claims.
    pub credential: String,
    /// `None` until resolved from the claims, the login answer or `/api/me`.
    pub subject: Option<Subject>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Build a session from a bare credential, filling what the claims carry.
    pub fn from_credential(credential: impl Into<String>) -> Self {
        let credential = credential.into();
        let claims = decode_claims(&credential).unwrap_or_default();
        Self {
            subject: claims.subject(),
            expires_at: claims.expires_at(),
            credential,
        }
    }

    pub fn with_subject(mut self, subject: Subject) -> Self {
        self.subject = Some(subject);
        self
    }

    /// Expired at or past the expiry instant. No expiry means the server decides.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| now >= expires_at)
    }
}
