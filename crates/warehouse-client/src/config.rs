//! Client Configuration
//!
//! Paths, storage medium and UI timings. Every field has a default, so an
//! empty object (or no object at all) is a valid configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::view::Surface;

/// Where the Token Store keeps the credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageMedium {
    #[default]
    LocalStorage,
    Cookie,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub api_base: String,
    pub login_path: String,
    pub register_path: String,
    pub main_path: String,
    pub logout_path: String,
    pub storage: StorageMedium,
    pub token_key: String,
    pub profile_key: String,
    pub cookie_name: String,
    pub alert_timeout_ms: u32,
    pub success_alert_timeout_ms: u32,
    pub login_redirect_delay_ms: u32,
    pub register_redirect_delay_ms: u32,
    pub history_page_size: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: "/api".to_string(),
            login_path: "/login".to_string(),
            register_path: "/register".to_string(),
            main_path: "/".to_string(),
            logout_path: "/logout".to_string(),
            storage: StorageMedium::LocalStorage,
            token_key: "authToken".to_string(),
            profile_key: "authUser".to_string(),
            cookie_name: "token".to_string(),
            alert_timeout_ms: 5000,
            success_alert_timeout_ms: 3000,
            login_redirect_delay_ms: 500,
            register_redirect_delay_ms: 2000,
            history_page_size: 100,
        }
    }
}

impl ClientConfig {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        if raw.trim().is_empty() {
            return Err(ConfigError::Invalid("empty document".into()));
        }
        let config: ClientConfig = serde_json::from_str(raw)?;
        config.normalized()
    }

    /// Trim the API base and validate. Used for every externally supplied config.
    pub fn normalized(mut self) -> Result<Self, ConfigError> {
        self.api_base = self.api_base.trim().trim_end_matches('/').to_string();
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_base(&self.api_base)?;

        for (name, path) in [
            ("login_path", &self.login_path),
            ("register_path", &self.register_path),
            ("main_path", &self.main_path),
            ("logout_path", &self.logout_path),
        ] {
            if !path.starts_with('/') {
                return Err(ConfigError::Invalid(format!("{name} must start with '/'")));
            }
        }

        if self.token_key.is_empty() || self.profile_key.is_empty() || self.cookie_name.is_empty() {
            return Err(ConfigError::Invalid("storage keys cannot be empty".into()));
        }
        if self.token_key == self.profile_key {
            return Err(ConfigError::Invalid("token_key and profile_key must differ".into()));
        }

        if self.alert_timeout_ms == 0 || self.success_alert_timeout_ms == 0 {
            return Err(ConfigError::Invalid("alert timeouts must be greater than 0".into()));
        }

        if self.history_page_size == 0 {
            return Err(ConfigError::Invalid("history_page_size must be greater than 0".into()));
        }

        Ok(())
    }

    /// `api_path("items/3")` -> `/api/items/3`.
    pub fn api_path(&self, segment: &str) -> String {
        format!(
            "{}/{}",
            self.api_base.trim_end_matches('/'),
            segment.trim_start_matches('/')
        )
    }

    pub fn surface_path(&self, surface: Surface) -> &str {
        match surface {
            Surface::Login => &self.login_path,
            Surface::Register => &self.register_path,
            Surface::Main => &self.main_path,
        }
    }

    /// Inverse of [`surface_path`](Self::surface_path); unknown paths are the main surface.
    pub fn surface_for_path(&self, path: &str) -> Surface {
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };
        if path == self.login_path.trim_end_matches('/') {
            Surface::Login
        } else if path == self.register_path.trim_end_matches('/') {
            Surface::Register
        } else {
            Surface::Main
        }
    }

    /// Name of the second cookie holding the cached profile.
    pub fn profile_cookie_name(&self) -> String {
        format!("{}_profile", self.cookie_name)
    }
}

fn validate_base(base: &str) -> Result<(), ConfigError> {
    if base.is_empty() {
        return Err(ConfigError::Invalid("api_base cannot be empty".into()));
    }
    if base.starts_with('/') {
        return Ok(());
    }
    let Some((scheme, remainder)) = base.split_once("://") else {
        return Err(ConfigError::Invalid("api_base must be a path or an http(s) url".into()));
    };
    if !(scheme == "http" || scheme == "https") || remainder.is_empty() || remainder.starts_with('/') {
        return Err(ConfigError::Invalid("api_base must be a path or an http(s) url".into()));
    }
    Ok(())
}
