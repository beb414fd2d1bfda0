//! Test doubles shared by the unit tests.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use http::header::AUTHORIZATION;
use http::StatusCode;
use serde_json::json;
use tokio::sync::oneshot;

use crate::api::{ApiGateway, HttpRequest, HttpResponse, Transport, WarehouseApi};
use crate::config::ClientConfig;
use crate::error::TransportError;
use crate::models::{HistoryAction, HistoryEntry, Item, ItemDraft, Role, Subject};
use crate::session::{MemoryTokenStore, Session, SessionGuard};
use crate::view::{
    Alert, AlertSink, AlertSlot, DeletePrompt, HistoryPage, ItemEditorState, Navigator, Surface, Tab, View,
};

/// Replays queued responses in order and records every request.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: RefCell<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn push_json(&self, status: u16, body: &str) {
        let status = StatusCode::from_u16(status).unwrap();
        self.responses
            .borrow_mut()
            .push_back(Ok(HttpResponse::new(status, body)));
    }

    pub fn push_error(&self, error: TransportError) {
        self.responses.borrow_mut().push_back(Err(error));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }
}

#[async_trait(?Send)]
impl Transport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.borrow_mut().push(request);
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Network("no scripted response".into())))
    }
}

/// Holds every request until the test answers it, in any order.
#[derive(Default)]
pub struct GatedTransport {
    pending: RefCell<Vec<(HttpRequest, oneshot::Sender<HttpResponse>)>>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl GatedTransport {
    pub fn pending(&self) -> usize {
        self.pending.borrow().len()
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    /// Answer the `index`-th request still waiting.
    pub fn release(&self, index: usize, status: u16, body: &str) {
        let (_, reply) = self.pending.borrow_mut().remove(index);
        let status = StatusCode::from_u16(status).unwrap();
        reply.send(HttpResponse::new(status, body)).unwrap();
    }

    /// Yield until `count` requests are waiting.
    pub async fn wait_for(&self, count: usize) {
        while self.pending() < count {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait(?Send)]
impl Transport for GatedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let (reply, answer) = oneshot::channel();
        self.requests.borrow_mut().push(request.clone());
        self.pending.borrow_mut().push((request, reply));
        answer
            .await
            .map_err(|_| TransportError::Network("gate dropped".into()))
    }
}

/// In-memory warehouse server speaking the JSON envelope.
pub struct FakeWarehouse {
    pub token: String,
    pub subject: Subject,
    items: RefCell<Vec<Item>>,
    history: RefCell<Vec<HistoryEntry>>,
    next_id: Cell<i64>,
    requests: RefCell<Vec<HttpRequest>>,
    offline: Cell<bool>,
}

impl FakeWarehouse {
    pub fn new(token: &str, role: Role) -> Self {
        Self {
            token: token.to_string(),
            subject: Subject { username: "alice".into(), role },
            items: RefCell::new(Vec::new()),
            history: RefCell::new(Vec::new()),
            next_id: Cell::new(1),
            requests: RefCell::new(Vec::new()),
            offline: Cell::new(false),
        }
    }

    pub fn seed(&self, name: &str, description: Option<&str>, quantity: i64, price: f64) -> Item {
        let draft = ItemDraft {
            name: name.to_string(),
            description: description.unwrap_or_default().to_string(),
            quantity,
            price,
        };
        self.insert(&draft)
    }

    pub fn items(&self) -> Vec<Item> {
        self.items.borrow().clone()
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        self.history.borrow().clone()
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.set(offline);
    }

    fn insert(&self, draft: &ItemDraft) -> Item {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        let item = Item {
            id,
            name: draft.name.clone(),
            description: Some(draft.description.clone()),
            quantity: draft.quantity,
            price: draft.price,
            created_at: None,
            updated_at: None,
        };
        self.items.borrow_mut().push(item.clone());
        self.record(HistoryAction::Insert, id, None, Some(item.clone()));
        item
    }

    fn record(&self, action: HistoryAction, item_id: i64, old: Option<Item>, new: Option<Item>) {
        let mut history = self.history.borrow_mut();
        let seq = history.len() as i64 + 1;
        history.push(HistoryEntry {
            id: Some(seq),
            action,
            item_id,
            username: self.subject.username.clone(),
            changed_at: Utc.timestamp_opt(1_700_000_000 + seq, 0).unwrap(),
            old_data: old,
            new_data: new,
        });
    }

    fn handle(&self, request: &HttpRequest) -> (u16, serde_json::Value) {
        let (path, query) = request.url.split_once('?').unwrap_or((request.url.as_str(), ""));
        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

        if segments.as_slice() == ["logout"] {
            return (302, json!(null));
        }

        let authorized = request
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == format!("Bearer {}", self.token));
        if !authorized {
            return (401, json!({"success": false, "error": "unauthorized"}));
        }

        match (request.method.as_str(), segments.as_slice()) {
            ("GET", ["api", "me"]) => ok(json!(self.subject)),
            ("GET", ["api", "items"]) => ok(json!(self.items())),
            ("GET", ["api", "items", id]) => match self.find(id) {
                Some(item) => ok(json!(item)),
                None => fail(404, "item not found"),
            },
            ("POST", ["api", "items"]) => {
                if !self.subject.role.can_create() {
                    return fail(403, "forbidden");
                }
                match parse_draft(request) {
                    Some(draft) => (201, json!({"success": true, "data": self.insert(&draft)})),
                    None => fail(400, "invalid request body"),
                }
            }
            ("PUT", ["api", "items", id]) => {
                let (Some(old), Some(draft)) = (self.find(id), parse_draft(request)) else {
                    return fail(404, "item not found");
                };
                let new = Item {
                    name: draft.name,
                    description: Some(draft.description),
                    quantity: draft.quantity,
                    price: draft.price,
                    ..old.clone()
                };
                if new != old {
                    self.replace(new.clone());
                    self.record(HistoryAction::Update, old.id, Some(old), Some(new.clone()));
                }
                ok(json!(new))
            }
            ("DELETE", ["api", "items", id]) => {
                if !self.subject.role.can_delete() {
                    return fail(403, "forbidden");
                }
                let Some(old) = self.find(id) else {
                    return fail(404, "item not found");
                };
                self.items.borrow_mut().retain(|i| i.id != old.id);
                self.record(HistoryAction::Delete, old.id, Some(old), None);
                (200, json!({"success": true, "data": {"message": "item deleted"}}))
            }
            ("GET", ["api", "history"]) => ok(json!(self.query_history(query))),
            ("GET", ["api", "history", "items", id]) => {
                let id: i64 = id.parse().unwrap_or_default();
                let entries: Vec<HistoryEntry> =
                    self.history().into_iter().filter(|h| h.item_id == id).collect();
                ok(json!(entries))
            }
            _ => fail(404, "not found"),
        }
    }

    fn find(&self, id: &str) -> Option<Item> {
        let id: i64 = id.parse().ok()?;
        self.items.borrow().iter().find(|i| i.id == id).cloned()
    }

    fn replace(&self, item: Item) {
        if let Some(slot) = self.items.borrow_mut().iter_mut().find(|i| i.id == item.id) {
            *slot = item;
        }
    }

    fn query_history(&self, query: &str) -> Vec<HistoryEntry> {
        let mut limit = 100usize;
        let mut offset = 0usize;
        let mut entries = self.history();
        entries.reverse();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "action" => entries.retain(|h| h.action.as_str() == value),
                "username" => entries.retain(|h| h.username == value),
                "item_id" => entries.retain(|h| h.item_id.to_string() == value),
                "limit" => limit = value.parse().unwrap_or(limit),
                "offset" => offset = value.parse().unwrap_or(offset),
                _ => {}
            }
        }
        entries.into_iter().skip(offset).take(limit).collect()
    }
}

fn ok(data: serde_json::Value) -> (u16, serde_json::Value) {
    (200, json!({"success": true, "data": data}))
}

fn fail(status: u16, message: &str) -> (u16, serde_json::Value) {
    (status, json!({"success": false, "error": message}))
}

fn parse_draft(request: &HttpRequest) -> Option<ItemDraft> {
    let body: serde_json::Value = serde_json::from_str(request.body.as_deref()?).ok()?;
    Some(ItemDraft {
        name: body["name"].as_str()?.to_string(),
        description: body["description"].as_str().unwrap_or_default().to_string(),
        quantity: body["quantity"].as_i64()?,
        price: body["price"].as_f64()?,
    })
}

#[async_trait(?Send)]
impl Transport for FakeWarehouse {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.borrow_mut().push(request.clone());
        if self.offline.get() {
            return Err(TransportError::Network("connection refused".into()));
        }
        let (status, body) = self.handle(&request);
        Ok(HttpResponse::new(StatusCode::from_u16(status).unwrap(), body.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    Tab(Tab),
    Items(String),
    History(String, HistoryPage),
    ItemHistory(i64, String),
    EditorOpened(ItemEditorState),
    EditorClosed,
    DeletePrompt(Option<DeletePrompt>),
    Alert(AlertSlot, Alert),
}

#[derive(Default)]
pub struct RecordingView {
    events: RefCell<Vec<ViewEvent>>,
}

impl RecordingView {
    pub fn events(&self) -> Vec<ViewEvent> {
        self.events.borrow().clone()
    }

    pub fn alerts(&self) -> Vec<(AlertSlot, Alert)> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                ViewEvent::Alert(slot, alert) => Some((*slot, alert.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn last_items(&self) -> Option<String> {
        self.events.borrow().iter().rev().find_map(|e| match e {
            ViewEvent::Items(markup) => Some(markup.clone()),
            _ => None,
        })
    }

    pub fn last_history(&self) -> Option<(String, HistoryPage)> {
        self.events.borrow().iter().rev().find_map(|e| match e {
            ViewEvent::History(markup, page) => Some((markup.clone(), *page)),
            _ => None,
        })
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }

    fn push(&self, event: ViewEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl AlertSink for RecordingView {
    fn show_alert(&self, slot: AlertSlot, alert: Alert) {
        self.push(ViewEvent::Alert(slot, alert));
    }
}

impl View for RecordingView {
    fn activate_tab(&self, tab: Tab) {
        self.push(ViewEvent::Tab(tab));
    }

    fn render_items(&self, markup: String) {
        self.push(ViewEvent::Items(markup));
    }

    fn render_history(&self, markup: String, page: HistoryPage) {
        self.push(ViewEvent::History(markup, page));
    }

    fn show_item_history(&self, item_id: i64, markup: String) {
        self.push(ViewEvent::ItemHistory(item_id, markup));
    }

    fn open_item_editor(&self, editor: ItemEditorState) {
        self.push(ViewEvent::EditorOpened(editor));
    }

    fn close_item_editor(&self) {
        self.push(ViewEvent::EditorClosed);
    }

    fn prompt_delete(&self, prompt: Option<DeletePrompt>) {
        self.push(ViewEvent::DeletePrompt(prompt));
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    redirects: RefCell<Vec<Surface>>,
    delays: RefCell<Vec<u32>>,
}

impl RecordingNavigator {
    pub fn redirects(&self) -> Vec<Surface> {
        self.redirects.borrow().clone()
    }

    pub fn delays(&self) -> Vec<u32> {
        self.delays.borrow().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, surface: Surface) {
        self.redirects.borrow_mut().push(surface);
    }

    fn redirect_after(&self, surface: Surface, delay_ms: u32) {
        self.delays.borrow_mut().push(delay_ms);
        self.redirect(surface);
    }
}

/// Everything a page needs, wired against one transport.
pub struct Harness<T: Transport + 'static> {
    pub transport: Rc<T>,
    pub store: Rc<MemoryTokenStore>,
    pub navigator: Rc<RecordingNavigator>,
    pub view: Rc<RecordingView>,
    pub guard: Rc<SessionGuard>,
    pub api: Rc<WarehouseApi>,
}

impl<T: Transport + 'static> Harness<T> {
    pub fn new(transport: T, session: Option<Session>) -> Self {
        let transport = Rc::new(transport);
        let store = Rc::new(match &session {
            Some(session) => MemoryTokenStore::with_session(session),
            None => MemoryTokenStore::new(),
        });
        let navigator = Rc::new(RecordingNavigator::default());
        let guard = Rc::new(SessionGuard::new(store.clone(), navigator.clone()));
        let gateway = ApiGateway::new(transport.clone(), guard.clone());
        let api = Rc::new(WarehouseApi::new(gateway, Rc::new(ClientConfig::default())));
        Self {
            transport,
            store,
            navigator,
            view: Rc::new(RecordingView::default()),
            guard,
            api,
        }
    }
}

pub fn session_for(token: &str, role: Role) -> Session {
    Session {
        credential: token.to_string(),
        subject: Some(Subject { username: "alice".into(), role }),
        expires_at: Some(Utc.timestamp_opt(i64::from(i32::MAX), 0).unwrap()),
    }
}
