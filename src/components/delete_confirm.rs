//! Delete Confirm Component
//!
//! Inline confirmation shown after a row's delete button is clicked.

use leptos::prelude::*;

use crate::context::use_app_context;
use crate::store::{use_page_store, PageStateStoreFields};

#[component]
pub fn DeleteConfirm() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_page_store();

    view! {
        {move || {
            store.delete_prompt().get().map(|prompt| {
                view! {
                    <div class="delete-confirm">
                        <span class="delete-confirm-text">
                            {format!("Delete \"{}\"?", prompt.item_name)}
                        </span>
                        <button
                            class="confirm-btn"
                            on:click=move |ev| {
                                ev.stop_propagation();
                                ctx.run(|c| async move { c.confirm_delete().await });
                            }
                        >
                            "✓"
                        </button>
                        <button
                            class="cancel-btn"
                            on:click=move |ev| {
                                ev.stop_propagation();
                                ctx.with_controller(|c| c.cancel_delete());
                            }
                        >
                            "✗"
                        </button>
                    </div>
                }
            })
        }}
    }
}
