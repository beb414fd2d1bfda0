//! Items Panel Component
//!
//! Search box, add button and the rendered item table. Row buttons are
//! handled by one delegated click listener on the container.

use leptos::prelude::*;
use wasm_bindgen::JsCast;
use warehouse_client::render::{ACTION_DELETE, ACTION_EDIT, ACTION_HISTORY};
use warehouse_client::{AlertSlot, Tab};

use super::{panel_class, AlertBanner, AlertBannerProps};
use crate::context::use_app_context;
use crate::store::{use_page_store, PageStateStoreFields};

/// Row button decoded from its `data-action` / `data-id` attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemAction {
    Edit(i64),
    Delete(i64),
    History(i64),
}

impl ItemAction {
    pub fn parse(action: &str, id: &str) -> Option<Self> {
        let id = id.trim().parse::<i64>().ok()?;
        match action {
            ACTION_EDIT => Some(ItemAction::Edit(id)),
            ACTION_DELETE => Some(ItemAction::Delete(id)),
            ACTION_HISTORY => Some(ItemAction::History(id)),
            _ => None,
        }
    }
}

fn action_from_event(ev: &web_sys::MouseEvent) -> Option<ItemAction> {
    let target = ev.target()?.dyn_into::<web_sys::Element>().ok()?;
    let button = target.closest("[data-action]").ok()??;
    let action = button.get_attribute("data-action")?;
    let id = button.get_attribute("data-id")?;
    ItemAction::parse(&action, &id)
}

#[component]
pub fn ItemsPanel() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_page_store();
    let search = RwSignal::new(String::new());
    let can_create = move || ctx.subject.with(|s| s.as_ref().is_some_and(|s| s.role.can_create()));

    let on_search = move |ev: web_sys::Event| {
        let term = event_target_value(&ev);
        search.set(term.clone());
        ctx.with_controller(|c| c.filter_items(&term));
    };

    let on_table_click = move |ev: web_sys::MouseEvent| {
        let Some(action) = action_from_event(&ev) else {
            return;
        };
        match action {
            ItemAction::Edit(id) => ctx.run(move |c| async move { c.open_editor(Some(id)).await }),
            ItemAction::Delete(id) => ctx.with_controller(|c| c.request_delete(id)),
            ItemAction::History(id) => {
                ctx.run(move |c| async move { c.view_item_history(id).await })
            }
        }
    };

    view! {
        <div class=move || panel_class(store.active_tab().get() == Tab::Items)>
            <div class="toolbar">
                <input
                    type="search"
                    class="search-input"
                    placeholder="Search by name or description"
                    prop:value=move || search.get()
                    on:input=on_search
                />
                <Show when=can_create>
                    <button
                        class="btn btn-primary"
                        on:click=move |_| ctx.run(|c| async move { c.open_editor(None).await })
                    >
                        "Add item"
                    </button>
                </Show>
            </div>
            {AlertBanner(AlertBannerProps::builder().slot(AlertSlot::Items).build())}
            <div
                class="items-container"
                on:click=on_table_click
                inner_html=move || store.items_html().get()
            ></div>
        </div>
    }
}
