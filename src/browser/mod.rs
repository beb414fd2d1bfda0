//! Browser Bindings
//!
//! Everything that touches `web-sys`: storage media, fetch, navigation,
//! console logging and runtime configuration.

mod config;
mod fetch;
mod logger;
mod navigation;
mod storage;

pub use config::load_config;
pub use fetch::FetchTransport;
pub use logger::init as init_logger;
pub use navigation::{current_surface, LocationNavigator};
pub use storage::token_store_for;
