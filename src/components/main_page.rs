//! Main Page Component
//!
//! Runs the session check, then hands the page to the controller.

use std::rc::Rc;

use chrono::Utc;
use leptos::prelude::*;
use leptos::task::spawn_local;
use reactive_stores::Store;
use warehouse_client::start_main_surface;

use super::{DeleteConfirm, HistoryPanel, ItemEditor, ItemHistoryModal, ItemsPanel, TabBar, UserBadge};
use crate::context::{ApiHandle, AppContext};
use crate::store::{PageState, StoreView};

#[component]
pub fn MainPage(api: ApiHandle) -> impl IntoView {
    let store = Store::new(PageState::default());
    provide_context(store);
    let ctx = AppContext::new();
    provide_context(ctx);

    spawn_local(async move {
        let view = Rc::new(StoreView::new(store));
        let Some(controller) = start_main_surface(api.get_value(), view, Utc::now()).await else {
            return;
        };
        ctx.attach(controller.clone());
        controller.init().await;
    });

    view! {
        <Show
            when=move || ctx.subject.with(|s| s.is_some())
            fallback=|| view! { <div class="loading">"Checking session..."</div> }
        >
            <div class="container">
                <header class="app-header">
                    <h1>"Warehouse"</h1>
                    <UserBadge />
                </header>
                <TabBar />
                <ItemsPanel />
                <HistoryPanel />
            </div>
            <ItemEditor />
            <DeleteConfirm />
            <ItemHistoryModal />
        </Show>
    }
}
