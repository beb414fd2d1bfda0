//! Warehouse Client
//!
//! Platform-free core of the warehouse front end: session handling, the API
//! gateway, markup rendering and the controllers that tie them together.
//! Browser bindings plug in through [`TokenStore`], [`Transport`], [`View`]
//! and [`Navigator`].
//!
//! Role checks here only decide what the page shows. The server re-checks
//! every permission and every token.

pub mod api;
pub mod auth;
pub mod config;
pub mod controller;
pub mod error;
pub mod filter;
pub mod models;
pub mod render;
pub mod session;
pub mod validation;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{ApiGateway, HttpRequest, HttpResponse, Transport, WarehouseApi};
pub use auth::AuthFlow;
pub use config::{ClientConfig, StorageMedium};
pub use controller::{start_main_surface, Controller};
pub use error::{ApiError, ConfigError, StoreError, TransportError, ValidationError};
pub use filter::{HistoryFilterForm, HistoryQuery};
pub use models::{HistoryAction, HistoryEntry, Item, Role, Subject};
pub use session::{restore_session, Session, SessionGuard, SessionState, TokenStore};
pub use validation::{ItemForm, LoginForm, RegisterForm};
pub use view::{Alert, AlertKind, AlertSink, AlertSlot, DeletePrompt, HistoryPage, ItemEditorState, Navigator, Surface, Tab, View};
