//! History Panel Component
//!
//! Filter form, pager and the rendered change log.

use leptos::prelude::*;
use warehouse_client::{AlertSlot, HistoryAction, HistoryFilterForm, Tab};

use super::{panel_class, AlertBanner, AlertBannerProps};
use crate::context::use_app_context;
use crate::store::{use_page_store, PageStateStoreFields};

#[component]
pub fn HistoryPanel() -> impl IntoView {
    let ctx = use_app_context();
    let store = use_page_store();

    let action = RwSignal::new(String::new());
    let username = RwSignal::new(String::new());
    let item_id = RwSignal::new(String::new());
    let date_from = RwSignal::new(String::new());
    let date_to = RwSignal::new(String::new());

    let on_apply = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let form = HistoryFilterForm {
            action: action.get_untracked(),
            username: username.get_untracked(),
            item_id: item_id.get_untracked(),
            date_from: date_from.get_untracked(),
            date_to: date_to.get_untracked(),
        };
        ctx.run(move |c| async move { c.apply_history_filters(form).await });
    };

    let on_reset = move |_| {
        for field in [action, username, item_id, date_from, date_to] {
            field.set(String::new());
        }
        ctx.run(|c| async move { c.reset_history_filters().await });
    };

    let page = move || store.history_page().get();

    view! {
        <div class=move || panel_class(store.active_tab().get() == Tab::History)>
            <form class="history-filters" on:submit=on_apply>
                <select
                    prop:value=move || action.get()
                    on:change=move |ev| action.set(event_target_value(&ev))
                >
                    <option value="">"All actions"</option>
                    {HistoryAction::ALL
                        .iter()
                        .map(|a| view! { <option value=a.as_str()>{a.label()}</option> })
                        .collect_view()}
                </select>
                <input
                    type="text"
                    placeholder="Username"
                    prop:value=move || username.get()
                    on:input=move |ev| username.set(event_target_value(&ev))
                />
                <input
                    type="number"
                    min="1"
                    placeholder="Item ID"
                    prop:value=move || item_id.get()
                    on:input=move |ev| item_id.set(event_target_value(&ev))
                />
                <input
                    type="datetime-local"
                    prop:value=move || date_from.get()
                    on:input=move |ev| date_from.set(event_target_value(&ev))
                />
                <input
                    type="datetime-local"
                    prop:value=move || date_to.get()
                    on:input=move |ev| date_to.set(event_target_value(&ev))
                />
                <button type="submit" class="btn btn-primary">"Apply"</button>
                <button type="button" class="btn btn-secondary" on:click=on_reset>"Reset"</button>
            </form>
            {AlertBanner(AlertBannerProps::builder().slot(AlertSlot::History).build())}
            <div class="history-container" inner_html=move || store.history_html().get()></div>
            <div class="pager">
                <button
                    class="btn btn-secondary"
                    disabled=move || !page().has_previous()
                    on:click=move |_| ctx.run(|c| async move { c.previous_history_page().await })
                >
                    "Previous"
                </button>
                <span class="pager-info">
                    {move || {
                        let page = page();
                        if page.count == 0 {
                            String::new()
                        } else {
                            format!("{}-{}", page.offset + 1, page.offset as usize + page.count)
                        }
                    }}
                </span>
                <button
                    class="btn btn-secondary"
                    disabled=move || !page().has_next()
                    on:click=move |_| ctx.run(|c| async move { c.next_history_page().await })
                >
                    "Next"
                </button>
            </div>
        </div>
    }
}
