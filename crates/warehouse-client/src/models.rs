//! Warehouse Models
//!
//! Data structures matching the API's JSON payloads.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User role as issued by the server.
///
/// Only used for presentation gating. The server re-checks every permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Viewer,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Manager, Role::Viewer];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Viewer => "viewer",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Administrator",
            Role::Manager => "Manager",
            Role::Viewer => "Viewer",
        }
    }

    pub fn can_create(&self) -> bool {
        matches!(self, Role::Admin | Role::Manager)
    }

    pub fn can_update(&self) -> bool {
        matches!(self, Role::Admin | Role::Manager)
    }

    pub fn can_delete(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "admin" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            "viewer" => Ok(Role::Viewer),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The authenticated user, as cached next to the credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub username: String,
    pub role: Role,
}

/// Inventory item (matches backend)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub quantity: i64,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Item {
    /// Description with the server's empty-string convention folded into `None`.
    pub fn description_text(&self) -> Option<&str> {
        self.description.as_deref().filter(|d| !d.trim().is_empty())
    }
}

/// Body of `POST /api/items` and `PUT /api/items/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemDraft {
    pub name: String,
    pub description: String,
    pub quantity: i64,
    pub price: f64,
}

/// Kind of change recorded in the item history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HistoryAction {
    #[serde(rename = "INSERT")]
    Insert,
    #[serde(rename = "UPDATE")]
    Update,
    #[serde(rename = "DELETE")]
    Delete,
}

impl HistoryAction {
    pub const ALL: [HistoryAction; 3] = [HistoryAction::Insert, HistoryAction::Update, HistoryAction::Delete];

    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryAction::Insert => "INSERT",
            HistoryAction::Update => "UPDATE",
            HistoryAction::Delete => "DELETE",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            HistoryAction::Insert => "Created",
            HistoryAction::Update => "Updated",
            HistoryAction::Delete => "Deleted",
        }
    }

    /// Lowercase CSS suffix (`action-insert`, ...).
    pub fn css_suffix(&self) -> &'static str {
        match self {
            HistoryAction::Insert => "insert",
            HistoryAction::Update => "update",
            HistoryAction::Delete => "delete",
        }
    }
}

impl FromStr for HistoryAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INSERT" => Ok(HistoryAction::Insert),
            "UPDATE" => Ok(HistoryAction::Update),
            "DELETE" => Ok(HistoryAction::Delete),
            _ => Err(s.to_string()),
        }
    }
}

/// One row of the change log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(default)]
    pub id: Option<i64>,
    pub action: HistoryAction,
    pub item_id: i64,
    pub username: String,
    pub changed_at: DateTime<Utc>,
    #[serde(default)]
    pub old_data: Option<Item>,
    #[serde(default)]
    pub new_data: Option<Item>,
}

impl HistoryEntry {
    /// INSERT carries only `new_data`, DELETE only `old_data`, UPDATE both.
    pub fn is_consistent(&self) -> bool {
        match self.action {
            HistoryAction::Insert => self.old_data.is_none() && self.new_data.is_some(),
            HistoryAction::Delete => self.old_data.is_some() && self.new_data.is_none(),
            HistoryAction::Update => self.old_data.is_some() && self.new_data.is_some(),
        }
    }
}

/// Response envelope shared by every API endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// `data` of a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginData {
    pub token: String,
    pub username: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub role: Role,
}
