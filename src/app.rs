//! Warehouse Frontend App
//!
//! Wires the browser services together and mounts the page for the
//! current surface.

use std::rc::Rc;

use leptos::prelude::*;
use warehouse_client::{ApiGateway, ClientConfig, SessionGuard, Surface, WarehouseApi};

use crate::browser::{token_store_for, FetchTransport, LocationNavigator};
use crate::components::{LoginPage, MainPage, RegisterPage};

fn build_api(config: ClientConfig) -> Rc<WarehouseApi> {
    let config = Rc::new(config);
    let store = token_store_for(&config);
    let navigator = Rc::new(LocationNavigator::new(config.clone()));
    let guard = Rc::new(SessionGuard::new(store, navigator));
    let gateway = ApiGateway::new(Rc::new(FetchTransport), guard);
    Rc::new(WarehouseApi::new(gateway, config))
}

#[component]
pub fn App(config: ClientConfig, surface: Surface) -> impl IntoView {
    let api = StoredValue::new_local(build_api(config));
    log::debug!("mounting {surface:?} surface");

    match surface {
        Surface::Login => view! { <LoginPage api=api /> }.into_any(),
        Surface::Register => view! { <RegisterPage api=api /> }.into_any(),
        Surface::Main => view! { <MainPage api=api /> }.into_any(),
    }
}
