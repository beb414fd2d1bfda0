//! Item History Modal Component

use leptos::prelude::*;

use crate::store::{use_page_store, PageStateStoreFields};

#[component]
pub fn ItemHistoryModal() -> impl IntoView {
    let store = use_page_store();

    view! {
        {move || {
            store.item_history().get().map(|(item_id, markup)| {
                view! {
                    <div class="modal-backdrop">
                        <div class="modal">
                            <h2>{format!("History of item #{item_id}")}</h2>
                            <div class="item-history" inner_html=markup></div>
                            <div class="modal-actions">
                                <button
                                    class="btn btn-secondary"
                                    on:click=move |_| *store.item_history().write() = None
                                >
                                    "Close"
                                </button>
                            </div>
                        </div>
                    </div>
                }
            })
        }}
    }
}
