//! Page State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity. The controller
//! writes here through [`StoreView`]; components only read.

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use reactive_stores::Store;
use warehouse_client::{
    Alert, AlertSink, AlertSlot, DeletePrompt, HistoryPage, ItemEditorState, Tab, View,
};

/// Alert currently on screen. `id` keeps an old hide timer off a newer alert.
#[derive(Clone, Debug, PartialEq)]
pub struct ShownAlert {
    pub id: u64,
    pub slot: AlertSlot,
    pub alert: Alert,
}

/// Everything the page renders, with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct PageState {
    pub active_tab: Tab,
    /// Pre-rendered, escaped markup of the items container
    pub items_html: String,
    /// Pre-rendered, escaped markup of the history container
    pub history_html: String,
    pub history_page: HistoryPage,
    /// Item id and markup of the open item-history modal
    pub item_history: Option<(i64, String)>,
    pub editor: Option<ItemEditorState>,
    pub delete_prompt: Option<DeletePrompt>,
    pub alerts: Vec<ShownAlert>,
    pub next_alert_id: u64,
}

/// Type alias for the store
pub type PageStore = Store<PageState>;

/// Get the page store from context
pub fn use_page_store() -> PageStore {
    expect_context::<PageStore>()
}

// ========================
// Store Helper Functions
// ========================

/// Replace the alert in `slot`, returning the new alert's id.
pub fn store_push_alert(store: PageStore, slot: AlertSlot, alert: Alert) -> u64 {
    let id = {
        let next_field = store.next_alert_id();
        let mut next = next_field.write();
        *next += 1;
        *next
    };
    let alerts_field = store.alerts();
    let mut alerts = alerts_field.write();
    alerts.retain(|shown| shown.slot != slot);
    alerts.push(ShownAlert { id, slot, alert });
    id
}

/// Replace the alert in `slot` and schedule its removal.
pub fn store_show_alert(store: PageStore, slot: AlertSlot, alert: Alert) {
    let timeout_ms = alert.timeout_ms;
    let id = store_push_alert(store, slot, alert);

    spawn_local(async move {
        TimeoutFuture::new(timeout_ms).await;
        store_dismiss_alert(store, id);
    });
}

pub fn store_dismiss_alert(store: PageStore, id: u64) {
    store.alerts().write().retain(|shown| shown.id != id);
}

/// [`View`] backed by the page store.
pub struct StoreView {
    store: PageStore,
}

impl StoreView {
    pub fn new(store: PageStore) -> Self {
        Self { store }
    }
}

impl AlertSink for StoreView {
    fn show_alert(&self, slot: AlertSlot, alert: Alert) {
        store_show_alert(self.store, slot, alert);
    }
}

impl View for StoreView {
    fn activate_tab(&self, tab: Tab) {
        *self.store.active_tab().write() = tab;
    }

    fn render_items(&self, markup: String) {
        *self.store.items_html().write() = markup;
    }

    fn render_history(&self, markup: String, page: HistoryPage) {
        *self.store.history_html().write() = markup;
        *self.store.history_page().write() = page;
    }

    fn show_item_history(&self, item_id: i64, markup: String) {
        *self.store.item_history().write() = Some((item_id, markup));
    }

    fn open_item_editor(&self, editor: ItemEditorState) {
        *self.store.editor().write() = Some(editor);
    }

    fn close_item_editor(&self) {
        *self.store.editor().write() = None;
    }

    fn prompt_delete(&self, prompt: Option<DeletePrompt>) {
        *self.store.delete_prompt().write() = prompt;
    }
}
