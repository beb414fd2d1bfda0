//! Alert Banner Component
//!
//! Shows the current alert of one slot with a dismiss button.

use leptos::prelude::*;
use warehouse_client::AlertSlot;

use crate::store::{store_dismiss_alert, use_page_store, PageStateStoreFields};

#[component]
pub fn AlertBanner(slot: AlertSlot) -> impl IntoView {
    let store = use_page_store();
    let current = move || {
        store
            .alerts()
            .with(|alerts| alerts.iter().find(|shown| shown.slot == slot).cloned())
    };

    move || {
        current().map(|shown| {
            let id = shown.id;
            view! {
                <div class=shown.alert.kind.css_class() role="alert">
                    <span>{shown.alert.message}</span>
                    <button
                        type="button"
                        class="alert-close"
                        on:click=move |_| store_dismiss_alert(store, id)
                    >
                        "×"
                    </button>
                </div>
            }
        })
    }
}
