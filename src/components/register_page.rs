//! Register Page Component

use std::rc::Rc;

use chrono::Utc;
use leptos::prelude::*;
use leptos::task::spawn_local;
use reactive_stores::Store;
use warehouse_client::{AlertSlot, AuthFlow, RegisterForm, Role};

use super::{AlertBanner, AlertBannerProps, PasswordField};
use crate::context::ApiHandle;
use crate::store::{PageState, StoreView};

#[component]
pub fn RegisterPage(api: ApiHandle) -> impl IntoView {
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
    let password_confirm = RwSignal::new(String::new());
    let role = RwSignal::new(Role::Viewer.as_str().to_string());
    let (pending, set_pending) = signal(false);
    let login_path = api.with_value(|api| api.config().login_path.clone());

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if pending.get_untracked() {
            return;
        }
        let form = RegisterForm {
            username: username.get_untracked(),
            password: password.get_untracked(),
            password_confirm: password_confirm.get_untracked(),
            role: role.get_untracked(),
        };
        let flow = flow.get_value();
        set_pending.set(true);
        spawn_local(async move {
            if !flow.register(&form).await {
                set_pending.set(false);
            }
        });
    };

    view! {
        <div class="auth-container">
            <div class="auth-card">
                <h1>"Create account"</h1>
                {AlertBanner(AlertBannerProps::builder().slot(AlertSlot::Register).build())}
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
                    <PasswordField value=password id="password" placeholder="At least 6 characters" />
                    <label for="password-confirm">"Confirm password"</label>
                    <PasswordField value=password_confirm id="password-confirm" placeholder="Repeat the password" />
                    <label for="role">"Role"</label>
                    <select
                        id="role"
                        prop:value=move || role.get()
                        on:change=move |ev| role.set(event_target_value(&ev))
                    >
                        {Role::ALL
                            .iter()
                            .map(|r| view! { <option value=r.as_str()>{r.label()}</option> })
                            .collect_view()}
                    </select>
                    <button type="submit" class="btn btn-primary" disabled=move || pending.get()>
                        "Register"
                    </button>
                </form>
                <p class="auth-switch">
                    "Already registered? " <a href=login_path>"Sign in"</a>
                </p>
            </div>
        </div>
    }
    .into_any()
}
