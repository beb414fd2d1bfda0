//! JWT payload decoding.
//!
//! The signature is never checked here. The decoded claims only drive what the
//! page shows and when it gives up on a credential; the server re-verifies the
//! token on every call.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;

use crate::models::{Role, Subject};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub exp: Option<i64>,
    #[serde(default)]
    pub iat: Option<i64>,
}

impl Claims {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|exp| Utc.timestamp_opt(exp, 0).single())
    }

    /// Needs a parseable role; the username falls back to `sub`.
    pub fn subject(&self) -> Option<Subject> {
        let username = self.username.clone().or_else(|| self.sub.clone())?;
        let role: Role = self.role.as_deref()?.parse().ok()?;
        Some(Subject { username, role })
    }
}

/// Decode the payload segment of `header.payload.signature`.
///
/// Returns `None` for anything that is not a three-part token with a JSON
/// object payload. Such credentials are treated as opaque.
pub fn decode_claims(credential: &str) -> Option<Claims> {
    let mut parts = credential.split('.');
    let (_header, payload, _signature) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    serde_json::from_slice(&bytes).ok()
}

#[cfg(test)]
pub(crate) fn encode_token(payload: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(payload.to_string());
    format!("{header}.{body}.signature")
}
