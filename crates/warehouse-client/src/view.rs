//! Render Target and Navigation Seams
//!
//! The controller never touches the DOM. It pushes markup and UI state through
//! [`View`] and leaves the page through [`Navigator`]; the browser crate
//! implements both on top of Leptos signals and `window.location`.

use crate::validation::ItemForm;

/// Top-level pages served by the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    Login,
    Register,
    Main,
}

/// Tabs of the main surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tab {
    #[default]
    Items,
    History,
}

impl Tab {
    pub fn label(&self) -> &'static str {
        match self {
            Tab::Items => "Items",
            Tab::History => "History",
        }
    }
}

/// Where an alert is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertSlot {
    Items,
    History,
    ItemEditor,
    Login,
    Register,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertKind {
    Success,
    Error,
}

impl AlertKind {
    pub fn css_class(&self) -> &'static str {
        match self {
            AlertKind::Success => "alert alert-success",
            AlertKind::Error => "alert alert-error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
    /// Auto-hide delay.
    pub timeout_ms: u32,
}

impl Alert {
    pub fn error(message: impl Into<String>, timeout_ms: u32) -> Self {
        Self { kind: AlertKind::Error, message: message.into(), timeout_ms }
    }

    pub fn success(message: impl Into<String>, timeout_ms: u32) -> Self {
        Self { kind: AlertKind::Success, message: message.into(), timeout_ms }
    }
}

/// State of the create/edit dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemEditorState {
    /// `None` creates a new item.
    pub item_id: Option<i64>,
    pub form: ItemForm,
}

impl ItemEditorState {
    pub fn title(&self) -> &'static str {
        if self.item_id.is_some() {
            "Edit item"
        } else {
            "Add item"
        }
    }
}

/// Inline confirmation shown before a delete is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletePrompt {
    pub item_id: i64,
    pub item_name: String,
}

/// Pager state of the history list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HistoryPage {
    pub offset: u32,
    pub limit: u32,
    /// Entries on the current page.
    pub count: usize,
}

impl HistoryPage {
    pub fn has_previous(&self) -> bool {
        self.offset > 0
    }

    /// A full page suggests there may be more.
    pub fn has_next(&self) -> bool {
        self.limit > 0 && self.count >= self.limit as usize
    }
}

/// Sink for inline alerts, the only thing the login and register pages need.
pub trait AlertSink {
    fn show_alert(&self, slot: AlertSlot, alert: Alert);
}

/// Render target of the main surface.
pub trait View: AlertSink {
    fn activate_tab(&self, tab: Tab);
    fn render_items(&self, markup: String);
    fn render_history(&self, markup: String, page: HistoryPage);
    fn show_item_history(&self, item_id: i64, markup: String);
    fn open_item_editor(&self, editor: ItemEditorState);
    fn close_item_editor(&self);
    fn prompt_delete(&self, prompt: Option<DeletePrompt>);
}

/// Page-level navigation.
pub trait Navigator {
    fn redirect(&self, surface: Surface);

    fn redirect_after(&self, surface: Surface, _delay_ms: u32) {
        self.redirect(surface);
    }
}
