//! Item Editor Component
//!
//! Modal form for creating and editing an item.

use leptos::prelude::*;
use warehouse_client::{AlertSlot, ItemForm};

use super::{AlertBanner, AlertBannerProps};
use crate::context::use_app_context;
use crate::store::{use_page_store, PageStateStoreFields};

#[component]
pub fn ItemEditor() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_page_store();

    let name = RwSignal::new(String::new());
    let description = RwSignal::new(String::new());
    let quantity = RwSignal::new(String::new());
    let price = RwSignal::new(String::new());

    // Refill the fields whenever the controller opens the editor
    Effect::new(move |_| {
        if let Some(editor) = store.editor().get() {
            name.set(editor.form.name);
            description.set(editor.form.description);
            quantity.set(editor.form.quantity);
            price.set(editor.form.price);
        }
    });

    let is_open = move || store.editor().with(|e| e.is_some());
    let title = move || store.editor().with(|e| e.as_ref().map(|e| e.title()).unwrap_or_default());

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(item_id) = store.editor().with_untracked(|e| e.as_ref().map(|e| e.item_id)) else {
            return;
        };
        let form = ItemForm {
            name: name.get_untracked(),
            description: description.get_untracked(),
            quantity: quantity.get_untracked(),
            price: price.get_untracked(),
        };
        ctx.run(move |c| async move { c.submit_item(form, item_id).await });
    };

    let on_cancel = move |_| *store.editor().write() = None;

    view! {
        <Show when=is_open>
            <div class="modal-backdrop">
                <div class="modal">
                    <h2>{title}</h2>
                    {AlertBanner(AlertBannerProps::builder().slot(AlertSlot::ItemEditor).build())}
                    <form class="item-form" on:submit=on_submit>
                        <label for="item-name">"Name"</label>
                        <input
                            id="item-name"
                            type="text"
                            prop:value=move || name.get()
                            on:input=move |ev| name.set(event_target_value(&ev))
                        />
                        <label for="item-description">"Description"</label>
                        <textarea
                            id="item-description"
                            prop:value=move || description.get()
                            on:input=move |ev| description.set(event_target_value(&ev))
                        ></textarea>
                        <label for="item-quantity">"Quantity"</label>
                        <input
                            id="item-quantity"
                            type="number"
                            min="0"
                            step="1"
                            prop:value=move || quantity.get()
                            on:input=move |ev| quantity.set(event_target_value(&ev))
                        />
                        <label for="item-price">"Price"</label>
                        <input
                            id="item-price"
                            type="text"
                            inputmode="decimal"
                            prop:value=move || price.get()
                            on:input=move |ev| price.set(event_target_value(&ev))
                        />
                        <div class="modal-actions">
                            <button type="submit" class="btn btn-primary">"Save"</button>
                            <button type="button" class="btn btn-secondary" on:click=on_cancel>
                                "Cancel"
                            </button>
                        </div>
                    </form>
                </div>
            </div>
        </Show>
    }
}
