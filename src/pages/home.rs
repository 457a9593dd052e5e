//! Landing page. Open route; renders sign-in state from the session store.

use leptos::prelude::*;

use crate::app::AppSessionStore;
use crate::state::auth::SessionPhase;

#[component]
pub fn HomePage() -> impl IntoView {
    let store = expect_context::<AppSessionStore>();
    let snapshot = store.signal();

    let is_authenticated =
        move || snapshot.with(|s| matches!(s.phase, SessionPhase::Authenticated(_)));

    view! {
        <div class="home-page">
            <h1>"Potluck"</h1>
            <p>"Share recipes with your groups"</p>
            <Show
                when=is_authenticated
                fallback=|| {
                    view! {
                        <nav class="home-nav">
                            <a href="/login">"Sign in"</a>
                            <a href="/register">"Register"</a>
                        </nav>
                    }
                }
            >
                <UserNav/>
            </Show>
        </div>
    }
}

/// Navigation strip for a signed-in user, with a sign-out action.
#[component]
fn UserNav() -> impl IntoView {
    let store = expect_context::<AppSessionStore>();
    let snapshot = store.signal();

    let display_name = move || {
        snapshot.with(|s| match &s.phase {
            SessionPhase::Authenticated(session) => session.user.name.clone(),
            SessionPhase::Uninitialized | SessionPhase::Anonymous => String::new(),
        })
    };

    let on_logout = move |_| {
        #[cfg(feature = "hydrate")]
        {
            let store = store.clone();
            leptos::task::spawn_local(async move {
                store.logout().await;
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = &store;
        }
    };

    view! {
        <nav class="home-nav">
            <span class="home-nav__user">{display_name}</span>
            <a href="/recipes">"Recipes"</a>
            <a href="/groups">"Groups"</a>
            <button class="home-nav__logout" on:click=on_logout>
                "Sign out"
            </button>
        </nav>
    }
}
