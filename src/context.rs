//! Application Context
//!
//! Shared state provided via Leptos Context API.

use std::future::Future;
use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use warehouse_client::{Controller, Subject, WarehouseApi};

/// API handle for pages that run before (or without) a controller
pub type ApiHandle = StoredValue<Rc<WarehouseApi>, LocalStorage>;

/// Main-surface handles provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    /// Set once the session check has passed
    controller: StoredValue<Option<Rc<Controller>>, LocalStorage>,
    /// Signed-in user; `None` while the session is being checked
    pub subject: RwSignal<Option<Subject>>,
}

impl AppContext {
    pub fn new() -> Self {
        Self {
            controller: StoredValue::new_local(None),
            subject: RwSignal::new(None),
        }
    }

    /// Hand over the controller and reveal the page.
    pub fn attach(&self, controller: Rc<Controller>) {
        let subject = controller.subject().clone();
        self.controller.set_value(Some(controller));
        self.subject.set(Some(subject));
    }

    fn controller(&self) -> Option<Rc<Controller>> {
        self.controller.get_value()
    }

    /// Run an async controller operation.
    pub fn run<F, Fut>(&self, op: F)
    where
        F: FnOnce(Rc<Controller>) -> Fut,
        Fut: Future<Output = ()> + 'static,
    {
        if let Some(controller) = self.controller() {
            spawn_local(op(controller));
        }
    }

    /// Run a synchronous controller operation.
    pub fn with_controller(&self, op: impl FnOnce(&Controller)) {
        if let Some(controller) = self.controller() {
            op(&controller);
        }
    }
}

pub fn use_app_context() -> AppContext {
    expect_context::<AppContext>()
}
