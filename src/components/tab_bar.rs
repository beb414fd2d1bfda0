//! Tab Bar Component
//!
//! Switches between the items and history panels.

use leptos::prelude::*;
use warehouse_client::Tab;

use crate::context::use_app_context;
use crate::store::{use_page_store, PageStateStoreFields};

const TABS: [Tab; 2] = [Tab::Items, Tab::History];

pub fn panel_class(active: bool) -> &'static str {
    if active {
        "tab-content active"
    } else {
        "tab-content"
    }
}

#[component]
pub fn TabBar() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_page_store();

    view! {
        <div class="tabs">
            {TABS
                .into_iter()
                .map(|tab| {
                    let tab_class = move || {
                        if store.active_tab().get() == tab { "tab active" } else { "tab" }
                    };
                    view! {
                        <button
                            class=tab_class
                            on:click=move |_| ctx.run(move |c| async move { c.switch_tab(tab).await })
                        >
                            {tab.label()}
                        </button>
                    }
                })
                .collect_view()}
        </div>
    }
}
