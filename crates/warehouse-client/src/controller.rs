//! Main Surface Controller
//!
//! Owns the cached item and history lists plus the UI state around them.
//! Every mutation goes to the server and is followed by a full reload; the
//! local lists are never patched.
//!
//! State lives in a `RefCell` that is never borrowed across an `.await`.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::{DateTime, Local, Utc};
use log::{debug, info, warn};

use crate::api::WarehouseApi;
use crate::error::ApiError;
use crate::filter::{filter_items, HistoryFilterForm, HistoryQuery};
use crate::models::{HistoryEntry, Item, Subject};
use crate::render;
use crate::session::SessionGuard;
use crate::validation::ItemForm;
use crate::view::{Alert, AlertSlot, DeletePrompt, HistoryPage, ItemEditorState, Tab, View};

#[derive(Debug, Default)]
struct State {
    items: Vec<Item>,
    history: Vec<HistoryEntry>,
    active_tab: Tab,
    search_term: String,
    history_query: HistoryQuery,
    history_offset: u32,
    pending_delete: Option<DeletePrompt>,
    items_generation: u64,
    history_generation: u64,
    submitting: bool,
}

pub struct Controller {
    api: Rc<WarehouseApi>,
    view: Rc<dyn View>,
    subject: Subject,
    state: RefCell<State>,
}

/// Run the main-surface session check and resolve the subject.
///
/// `None` means the page is being sent to the login surface and nothing else
/// may run.
pub async fn start_main_surface(
    api: Rc<WarehouseApi>,
    view: Rc<dyn View>,
    now: DateTime<Utc>,
) -> Option<Rc<Controller>> {
    let guard: Rc<SessionGuard> = api.gateway().guard().clone();
    let session = guard.require_session(now)?;

    let subject = match session.subject {
        Some(subject) => subject,
        None => match api.me().await {
            Ok(subject) => {
                guard.remember_subject(subject.clone());
                subject
            }
            Err(ApiError::SessionInvalidated) => return None,
            Err(e) => {
                warn!("profile lookup failed: {e}");
                guard.invalidate();
                return None;
            }
        },
    };

    info!("signed in as {} ({})", subject.username, subject.role);
    Some(Rc::new(Controller::new(api, view, subject)))
}

impl Controller {
    pub fn new(api: Rc<WarehouseApi>, view: Rc<dyn View>, subject: Subject) -> Self {
        Self {
            api,
            view,
            subject,
            state: RefCell::new(State::default()),
        }
    }

    pub fn subject(&self) -> &Subject {
        &self.subject
    }

    pub fn active_tab(&self) -> Tab {
        self.state.borrow().active_tab
    }

    pub fn items(&self) -> Vec<Item> {
        self.state.borrow().items.clone()
    }

    pub fn search_term(&self) -> String {
        self.state.borrow().search_term.clone()
    }

    pub fn history_offset(&self) -> u32 {
        self.state.borrow().history_offset
    }

    pub fn pending_delete(&self) -> Option<DeletePrompt> {
        self.state.borrow().pending_delete.clone()
    }

    pub fn is_submitting(&self) -> bool {
        self.state.borrow().submitting
    }

    fn alert_timeout(&self) -> u32 {
        self.api.config().alert_timeout_ms
    }

    fn page_size(&self) -> u32 {
        self.api.config().history_page_size
    }

    fn show_error(&self, slot: AlertSlot, error: &ApiError) {
        warn!("request failed: {error}");
        self.view
            .show_alert(slot, Alert::error(error.user_message(), self.alert_timeout()));
    }

    /// Initial render after the guard passed.
    pub async fn init(&self) {
        self.switch_tab(Tab::Items).await;
    }

    pub async fn switch_tab(&self, tab: Tab) {
        self.state.borrow_mut().active_tab = tab;
        self.view.activate_tab(tab);
        match tab {
            Tab::Items => {
                self.view.render_items(render::render_loading("Loading items..."));
                self.load_items().await;
            }
            Tab::History => {
                let page = self.current_page(0);
                self.view
                    .render_history(render::render_loading("Loading history..."), page);
                self.load_history().await;
            }
        }
    }

    pub async fn load_items(&self) {
        let generation = {
            let mut state = self.state.borrow_mut();
            state.items_generation += 1;
            state.items_generation
        };

        let result = self.api.list_items().await;

        {
            let state = self.state.borrow();
            if state.items_generation != generation || state.active_tab != Tab::Items {
                debug!("discarding stale items response (generation {generation})");
                return;
            }
        }

        match result {
            Ok(items) => {
                debug!("loaded {} items", items.len());
                self.state.borrow_mut().items = items;
                self.render_item_list();
            }
            Err(ApiError::SessionInvalidated) => {}
            Err(e) => {
                self.view
                    .render_items(render::render_error("Failed to load items"));
                self.show_error(AlertSlot::Items, &e);
            }
        }
    }

    fn render_item_list(&self) {
        let markup = {
            let state = self.state.borrow();
            let visible = filter_items(&state.items, &state.search_term);
            render::render_item_table(&visible, self.subject.role)
        };
        self.view.render_items(markup);
    }

    /// Local search over the loaded list. Later reloads keep the term.
    pub fn filter_items(&self, term: &str) {
        self.state.borrow_mut().search_term = term.to_string();
        self.render_item_list();
    }

    /// `None` opens an empty create form, `Some(id)` an edit form.
    pub async fn open_editor(&self, item_id: Option<i64>) {
        let Some(id) = item_id else {
            if !self.subject.role.can_create() {
                warn!("{} may not create items", self.subject.role);
                return;
            }
            self.view.open_item_editor(ItemEditorState { item_id: None, form: ItemForm::default() });
            return;
        };

        if !self.subject.role.can_update() {
            warn!("{} may not edit items", self.subject.role);
            return;
        }

        let cached = self.state.borrow().items.iter().find(|i| i.id == id).cloned();
        let item = match cached {
            Some(item) => item,
            None => match self.api.get_item(id).await {
                Ok(item) => item,
                Err(ApiError::SessionInvalidated) => return,
                Err(e) => {
                    self.show_error(AlertSlot::Items, &e);
                    return;
                }
            },
        };

        self.view.open_item_editor(ItemEditorState {
            item_id: Some(id),
            form: ItemForm::from_item(&item),
        });
    }

    /// Create when `item_id` is `None`, update otherwise.
    pub async fn submit_item(&self, form: ItemForm, item_id: Option<i64>) {
        if self.state.borrow().submitting {
            debug!("item submit ignored, previous request still in flight");
            return;
        }

        let draft = match form.validate() {
            Ok(draft) => draft,
            Err(e) => {
                self.view
                    .show_alert(AlertSlot::ItemEditor, Alert::error(e.to_string(), self.alert_timeout()));
                return;
            }
        };

        self.state.borrow_mut().submitting = true;
        let result = match item_id {
            Some(id) => self.api.update_item(id, &draft).await,
            None => self.api.create_item(&draft).await,
        };
        self.state.borrow_mut().submitting = false;

        match result {
            Ok(_) => {
                let message = if item_id.is_some() { "Item updated" } else { "Item created" };
                info!("{message}: {}", draft.name);
                self.view.close_item_editor();
                self.view
                    .show_alert(AlertSlot::Items, Alert::success(message, self.alert_timeout()));
                self.load_items().await;
            }
            Err(ApiError::SessionInvalidated) => {}
            Err(e) => self.show_error(AlertSlot::ItemEditor, &e),
        }
    }

    /// Ask for confirmation. Nothing is sent until `confirm_delete`.
    pub fn request_delete(&self, item_id: i64) {
        if !self.subject.role.can_delete() {
            warn!("{} may not delete items", self.subject.role);
            return;
        }
        let prompt = {
            let mut state = self.state.borrow_mut();
            let item_name = state
                .items
                .iter()
                .find(|i| i.id == item_id)
                .map(|i| i.name.clone())
                .unwrap_or_else(|| format!("#{item_id}"));
            let prompt = DeletePrompt { item_id, item_name };
            state.pending_delete = Some(prompt.clone());
            prompt
        };
        self.view.prompt_delete(Some(prompt));
    }

    pub fn cancel_delete(&self) {
        self.state.borrow_mut().pending_delete = None;
        self.view.prompt_delete(None);
    }

    pub async fn confirm_delete(&self) {
        let Some(prompt) = self.state.borrow_mut().pending_delete.take() else {
            return;
        };
        self.view.prompt_delete(None);

        match self.api.delete_item(prompt.item_id).await {
            Ok(()) => {
                info!("deleted item {}", prompt.item_id);
                self.view
                    .show_alert(AlertSlot::Items, Alert::success("Item deleted", self.alert_timeout()));
                self.load_items().await;
            }
            Err(ApiError::SessionInvalidated) => {}
            Err(e) => self.show_error(AlertSlot::Items, &e),
        }
    }

    fn current_page(&self, count: usize) -> HistoryPage {
        HistoryPage {
            offset: self.state.borrow().history_offset,
            limit: self.page_size(),
            count,
        }
    }

    pub async fn load_history(&self) {
        let (generation, query) = {
            let mut state = self.state.borrow_mut();
            state.history_generation += 1;
            let query = state
                .history_query
                .clone()
                .page(self.page_size(), state.history_offset);
            (state.history_generation, query)
        };

        let result = self.api.history(&query).await;

        {
            let state = self.state.borrow();
            if state.history_generation != generation || state.active_tab != Tab::History {
                debug!("discarding stale history response (generation {generation})");
                return;
            }
        }

        match result {
            Ok(entries) => {
                let page = self.current_page(entries.len());
                let markup = render::render_history_list(&entries);
                self.state.borrow_mut().history = entries;
                self.view.render_history(markup, page);
            }
            Err(ApiError::SessionInvalidated) => {}
            Err(e) => {
                self.state.borrow_mut().history.clear();
                let page = self.current_page(0);
                self.view
                    .render_history(render::render_error("Failed to load history"), page);
                self.show_error(AlertSlot::History, &e);
            }
        }
    }

    /// Dates are read in the browser's time zone.
    pub async fn apply_history_filters(&self, form: HistoryFilterForm) {
        let query = match form.normalize(&Local) {
            Ok(query) => query,
            Err(e) => {
                self.view
                    .show_alert(AlertSlot::History, Alert::error(e.to_string(), self.alert_timeout()));
                return;
            }
        };
        {
            let mut state = self.state.borrow_mut();
            state.history_query = query;
            state.history_offset = 0;
        }
        self.load_history().await;
    }

    pub async fn reset_history_filters(&self) {
        {
            let mut state = self.state.borrow_mut();
            state.history_query = HistoryQuery::default();
            state.history_offset = 0;
        }
        self.load_history().await;
    }

    pub async fn next_history_page(&self) {
        {
            let limit = self.page_size();
            let mut state = self.state.borrow_mut();
            let page = HistoryPage {
                offset: state.history_offset,
                limit,
                count: state.history.len(),
            };
            if !page.has_next() {
                return;
            }
            state.history_offset += limit;
        }
        self.load_history().await;
    }

    pub async fn previous_history_page(&self) {
        {
            let limit = self.page_size();
            let mut state = self.state.borrow_mut();
            if state.history_offset == 0 {
                return;
            }
            state.history_offset = state.history_offset.saturating_sub(limit);
        }
        self.load_history().await;
    }

    pub async fn view_item_history(&self, item_id: i64) {
        match self.api.item_history(item_id).await {
            Ok(entries) => {
                self.view
                    .show_item_history(item_id, render::render_item_history(&entries));
            }
            Err(ApiError::SessionInvalidated) => {}
            Err(e) => self.show_error(AlertSlot::Items, &e),
        }
    }

    /// Server teardown is best effort; the local session is always dropped.
    pub async fn logout(&self) {
        if let Err(e) = self.api.logout().await {
            warn!("logout request failed: {e}");
        }
        info!("{} signed out", self.subject.username);
        self.api.gateway().guard().invalidate();
    }
}
