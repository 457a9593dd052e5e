//! Login page with email/password sign-in and a password-reset request.

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::app::AppSessionStore;
#[cfg(feature = "hydrate")]
use crate::net::provider::SessionProvider;

#[component]
pub fn LoginPage() -> impl IntoView {
    let store = expect_context::<AppSessionStore>();
    let navigate = use_navigate();
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let store_login = store.clone();
    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let email_value = email.get().trim().to_owned();
        let password_value = password.get();
        if email_value.is_empty() || password_value.is_empty() {
            info.set("Enter both email and password.".to_owned());
            return;
        }
        busy.set(true);
        info.set(String::new());

        #[cfg(feature = "hydrate")]
        {
            let store = store_login.clone();
            let navigate = navigate.clone();
            leptos::task::spawn_local(async move {
                match store.login(&email_value, &password_value).await {
                    Ok(()) => navigate("/recipes", leptos_router::NavigateOptions::default()),
                    Err(e) => {
                        info.set(e.to_string());
                        busy.set(false);
                    }
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (&store_login, &navigate, email_value, password_value);
        }
    };

    let store_reset = store.clone();
    let on_reset = move |_| {
        let email_value = email.get().trim().to_owned();
        if email_value.is_empty() {
            info.set("Enter your email first.".to_owned());
            return;
        }
        #[cfg(feature = "hydrate")]
        {
            let store = store_reset.clone();
            leptos::task::spawn_local(async move {
                match store.provider().reset_password(&email_value).await {
                    Ok(()) => info.set("Password reset email sent.".to_owned()),
                    Err(e) => info.set(crate::net::errors::normalize(&e).to_string()),
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (&store_reset, email_value);
        }
    };

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h1>"Potluck"</h1>
                <p class="auth-card__subtitle">"Sign in"</p>
                <form class="auth-form" on:submit=on_submit>
                    <input
                        class="auth-input"
                        type="email"
                        placeholder="you@example.com"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                    <input
                        class="auth-input"
                        type="password"
                        placeholder="password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <button class="auth-button" type="submit" disabled=move || busy.get()>
                        "Sign In"
                    </button>
                </form>
                <button class="auth-link" on:click=on_reset>
                    "Forgot password?"
                </button>
                <Show when=move || !info.get().is_empty()>
                    <p class="auth-message">{move || info.get()}</p>
                </Show>
                <a href="/register" class="auth-link">
                    "Need an account? Register"
                </a>
            </div>
        </div>
    }
}
