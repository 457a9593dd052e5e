//! Registration page.
//!
//! Sign-up has three distinct endings: full login (navigate away),
//! confirmation pending (stay and show the provider's instruction), and
//! failure (stay and show the normalized error).

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::app::AppSessionStore;
#[cfg(feature = "hydrate")]
use crate::state::auth::SignupStatus;

#[component]
pub fn RegisterPage() -> impl IntoView {
    let store = expect_context::<AppSessionStore>();
    let navigate = use_navigate();
    let name = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let name_value = name.get().trim().to_owned();
        let email_value = email.get().trim().to_owned();
        let password_value = password.get();
        if name_value.is_empty() || email_value.is_empty() || password_value.is_empty() {
            info.set("Fill in name, email, and password.".to_owned());
            return;
        }
        busy.set(true);
        info.set(String::new());

        #[cfg(feature = "hydrate")]
        {
            let store = store.clone();
            let navigate = navigate.clone();
            leptos::task::spawn_local(async move {
                match store.signup(&email_value, &password_value, &name_value).await {
                    Ok(SignupStatus::SignedIn) => {
                        navigate("/recipes", leptos_router::NavigateOptions::default());
                    }
                    Ok(SignupStatus::ConfirmationPending { message }) => {
                        info.set(message);
                        busy.set(false);
                    }
                    Err(e) => {
                        info.set(e.to_string());
                        busy.set(false);
                    }
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (&store, &navigate, name_value, email_value, password_value);
        }
    };

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h1>"Potluck"</h1>
                <p class="auth-card__subtitle">"Create an account"</p>
                <form class="auth-form" on:submit=on_submit>
                    <input
                        class="auth-input"
                        type="text"
                        placeholder="your name"
                        prop:value=move || name.get()
                        on:input=move |ev| name.set(event_target_value(&ev))
                    />
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
                        "Register"
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="auth-message">{move || info.get()}</p>
                </Show>
                <a href="/login" class="auth-link">
                    "Already registered? Sign in"
                </a>
            </div>
        </div>
    }
}
