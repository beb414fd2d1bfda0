//! Login Page Component

use std::rc::Rc;

use chrono::Utc;
use leptos::prelude::*;
use leptos::task::spawn_local;
use reactive_stores::Store;
use warehouse_client::{AlertSlot, AuthFlow, LoginForm};

use super::{AlertBanner, AlertBannerProps, PasswordField};
use crate::context::ApiHandle;
use crate::store::{PageState, StoreView};

#[component]
pub fn LoginPage(api: ApiHandle) -> impl IntoView {
    let store = Store::new(PageState::default());
    provide_context(store);

    let flow = StoredValue::new_local(Rc::new(AuthFlow::new(
        api.get_value(),
        Rc::new(StoreView::new(store)),
    )));
    if !flow.with_value(|flow| flow.enter(Utc::now())) {
        return ().into_any();
    }

    let username = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let (pending, set_pending) = signal(false);
    let register_path = api.with_value(|api| api.config().register_path.clone());

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if pending.get_untracked() {
            return;
        }
        let form = LoginForm {
            username: username.get_untracked(),
            password: password.get_untracked(),
        };
        let flow = flow.get_value();
        set_pending.set(true);
        spawn_local(async move {
            // Stay disabled while the redirect is pending.
            if !flow.login(&form).await {
                set_pending.set(false);
            }
        });
    };

    view! {
        <div class="auth-container">
            <div class="auth-card">
                <h1>"Sign in"</h1>
                {AlertBanner(AlertBannerProps::builder().slot(AlertSlot::Login).build())}
                <form class="auth-form" on:submit=on_submit>
                    <label for="username">"Username"</label>
                    <input
                        id="username"
                        type="text"
                        autocomplete="username"
                        prop:value=move || username.get()
                        on:input=move |ev| username.set(event_target_value(&ev))
                    />
                    <label for="password">"Password"</label>
                    <PasswordField value=password id="password" placeholder="Password" />
                    <button type="submit" class="btn btn-primary" disabled=move || pending.get()>
                        {move || if pending.get() { "Signing in..." } else { "Sign in" }}
                    </button>
                </form>
                <p class="auth-switch">
                    "No account? " <a href=register_path>"Register"</a>
                </p>
            </div>
        </div>
    }
    .into_any()
}
