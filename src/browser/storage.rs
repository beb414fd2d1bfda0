//! Browser Token Stores
//!
//! `localStorage` and cookie media for the session. Both keep the raw
//! credential and a JSON profile record; decoding lives in `warehouse-client`.

use std::rc::Rc;

use chrono::Utc;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use wasm_bindgen::JsCast;
use warehouse_client::session::encode_profile;
use warehouse_client::{restore_session, ClientConfig, Session, StorageMedium, StoreError, TokenStore};
use web_sys::{HtmlDocument, Storage};

/// Characters a cookie value may not carry verbatim. JWT characters pass through.
const COOKIE_VALUE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b',')
    .add(b';')
    .add(b'\\')
    .add(b'%');

pub fn token_store_for(config: &ClientConfig) -> Rc<dyn TokenStore> {
    match config.storage {
        StorageMedium::LocalStorage => Rc::new(LocalStorageTokenStore::new(config)),
        StorageMedium::Cookie => Rc::new(CookieTokenStore::new(config)),
    }
}

fn js_message(value: &wasm_bindgen::JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

// ========================
// localStorage
// ========================

pub struct LocalStorageTokenStore {
    token_key: String,
    profile_key: String,
}

impl LocalStorageTokenStore {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            token_key: config.token_key.clone(),
            profile_key: config.profile_key.clone(),
        }
    }

    fn storage() -> Result<Storage, StoreError> {
        let window = web_sys::window().ok_or_else(|| StoreError::Unavailable("window is unavailable".into()))?;
        window
            .local_storage()
            .map_err(|e| StoreError::Unavailable(js_message(&e)))?
            .ok_or_else(|| StoreError::Unavailable("localStorage is disabled".into()))
    }
}

impl TokenStore for LocalStorageTokenStore {
    fn save(&self, session: &Session) -> Result<(), StoreError> {
        let storage = Self::storage()?;
        let profile = encode_profile(session)?;
        storage
            .set_item(&self.token_key, &session.credential)
            .map_err(|e| StoreError::Write(js_message(&e)))?;
        storage
            .set_item(&self.profile_key, &profile)
            .map_err(|e| StoreError::Write(js_message(&e)))
    }

    fn load(&self) -> Option<Session> {
        let storage = Self::storage().ok()?;
        let credential = storage.get_item(&self.token_key).ok()??;
        let profile = storage.get_item(&self.profile_key).ok().flatten();
        restore_session(credential, profile.as_deref())
    }

    fn clear(&self) {
        let Ok(storage) = Self::storage() else {
            return;
        };
        remove_keys([&self.token_key, &self.profile_key], |key| {
            storage.remove_item(key).map_err(|e| js_message(&e))
        });
    }
}

/// Remove every key, logging failures. Returns the keys that could not be removed.
fn remove_keys<'a, E: std::fmt::Display>(
    keys: impl IntoIterator<Item = &'a String>,
    mut remove: impl FnMut(&str) -> Result<(), E>,
) -> Vec<&'a str> {
    let mut failed = Vec::new();
    for key in keys {
        if let Err(e) = remove(key) {
            log::warn!("failed to remove {key} from localStorage: {e}");
            failed.push(key.as_str());
        }
    }
    failed
}

// ========================
// Cookies
// ========================

pub struct CookieTokenStore {
    token_cookie: String,
    profile_cookie: String,
}

impl CookieTokenStore {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            token_cookie: config.cookie_name.clone(),
            profile_cookie: config.profile_cookie_name(),
        }
    }

    fn document() -> Result<HtmlDocument, StoreError> {
        web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.dyn_into::<HtmlDocument>().ok())
            .ok_or_else(|| StoreError::Unavailable("document is unavailable".into()))
    }

    fn read(&self) -> Option<String> {
        Self::document().ok()?.cookie().ok()
    }

    fn write(document: &HtmlDocument, cookie: &str) -> Result<(), StoreError> {
        document
            .set_cookie(cookie)
            .map_err(|e| StoreError::Write(js_message(&e)))
    }
}

impl TokenStore for CookieTokenStore {
    fn save(&self, session: &Session) -> Result<(), StoreError> {
        let document = Self::document()?;
        let profile = encode_profile(session)?;
        let max_age = session
            .expires_at
            .map(|expires_at| (expires_at - Utc::now()).num_seconds().max(0));

        Self::write(&document, &format_cookie(&self.token_cookie, &session.credential, max_age))?;
        Self::write(&document, &format_cookie(&self.profile_cookie, &profile, max_age))
    }

    fn load(&self) -> Option<Session> {
        let jar = self.read()?;
        let credential = parse_cookie(&jar, &self.token_cookie)?;
        let profile = parse_cookie(&jar, &self.profile_cookie);
        restore_session(credential, profile.as_deref())
    }

    fn clear(&self) {
        let Ok(document) = Self::document() else {
            return;
        };
        for name in [&self.token_cookie, &self.profile_cookie] {
            if let Err(e) = Self::write(&document, &expire_cookie(name)) {
                log::warn!("failed to expire cookie {name}: {e}");
            }
        }
    }
}

/// Find `name` in a `document.cookie` string and percent-decode its value.
pub fn parse_cookie(jar: &str, name: &str) -> Option<String> {
    jar.split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| percent_decode_str(value).decode_utf8_lossy().into_owned())
        .filter(|value| !value.is_empty())
}

/// `None` max-age writes a browser-session cookie.
pub fn format_cookie(name: &str, value: &str, max_age: Option<i64>) -> String {
    let value = utf8_percent_encode(value, COOKIE_VALUE);
    match max_age {
        Some(seconds) => format!("{name}={value}; path=/; max-age={seconds}; SameSite=Strict"),
        None => format!("{name}={value}; path=/; SameSite=Strict"),
    }
}

pub fn expire_cookie(name: &str) -> String {
    format!("{name}=; path=/; max-age=0; SameSite=Strict")
}
