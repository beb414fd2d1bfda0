//! User Badge Component

use leptos::prelude::*;

use crate::context::use_app_context;

#[component]
pub fn UserBadge() -> impl IntoView {
    let ctx = use_app_context();

    view! {
        <div class="user-info">
            {move || {
                ctx.subject.get().map(|subject| {
                    view! {
                        <span class="username">{subject.username}</span>
                        <span class=format!("role-badge role-{}", subject.role.as_str())>
                            {subject.role.label()}
                        </span>
                    }
                })
            }}
            <button
                class="btn btn-secondary"
                on:click=move |_| ctx.run(|c| async move { c.logout().await })
            >
                "Log out"
            </button>
        </div>
    }
}
