//! UI Components
//!
//! Leptos components for the login, register and main pages.

mod alert_banner;
mod delete_confirm;
mod history_panel;
mod item_editor;
mod item_history_modal;
mod items_panel;
mod login_page;
mod main_page;
mod password_field;
mod register_page;
mod tab_bar;
mod user_badge;

pub use alert_banner::{AlertBanner, AlertBannerProps};
pub use delete_confirm::DeleteConfirm;
pub use history_panel::HistoryPanel;
pub use item_editor::ItemEditor;
pub use item_history_modal::ItemHistoryModal;
pub use items_panel::ItemsPanel;
pub use login_page::LoginPage;
pub use main_page::MainPage;
pub use password_field::PasswordField;
pub use register_page::RegisterPage;
pub use tab_bar::{panel_class, TabBar};
pub use user_badge::UserBadge;
