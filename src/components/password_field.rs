//! Password Field Component
//!
//! Password input with a show/hide toggle.

use leptos::prelude::*;

#[component]
pub fn PasswordField(
    value: RwSignal<String>,
    #[prop(into)] id: String,
    #[prop(into)] placeholder: String,
) -> impl IntoView {
    let (visible, set_visible) = signal(false);

    view! {
        <div class="password-field">
            <input
                id=id
                type=move || if visible.get() { "text" } else { "password" }
                placeholder=placeholder
                prop:value=move || value.get()
                on:input=move |ev| value.set(event_target_value(&ev))
            />
            <button
                type="button"
                class="password-toggle"
                on:click=move |_| set_visible.update(|v| *v = !*v)
            >
                {move || if visible.get() { "Hide" } else { "Show" }}
            </button>
        </div>
    }
}
