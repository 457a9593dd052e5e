//! Root application component with routing and context providers.

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use crate::config::AppConfig;
use crate::net::api::ApiClient;
use crate::net::provider::IdentityClient;
use crate::pages::{
    groups::GroupsPage, home::HomePage, login::LoginPage, recipes::RecipesPage,
    register::RegisterPage,
};
use crate::state::auth::SessionStore;
use crate::util::guard::RequireAuth;

/// The session store over the real identity client, as provided via context.
pub type AppSessionStore = SessionStore<IdentityClient>;
/// The API client over the real identity client, as provided via context.
pub type AppApiClient = ApiClient<IdentityClient>;

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Builds the session store and API client once, provides them via context
/// (no ambient singletons), and sets up client-side routing. Routes flagged
/// `requires_auth` in the route table are wrapped in [`RequireAuth`].
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let config = AppConfig::default();
    let store = SessionStore::new(IdentityClient::new(&config));
    let api = ApiClient::new(&config, store.clone());

    provide_context(store);
    provide_context(api);

    view! {
        <Stylesheet id="leptos" href="/pkg/potluck-client.css"/>
        <Title text="Potluck"/>

        <Router>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=StaticSegment("") view=HomePage/>
                <Route path=StaticSegment("login") view=LoginPage/>
                <Route path=StaticSegment("register") view=RegisterPage/>
                <Route
                    path=StaticSegment("recipes")
                    view=|| view! { <RequireAuth><RecipesPage/></RequireAuth> }
                />
                <Route
                    path=StaticSegment("groups")
                    view=|| view! { <RequireAuth><GroupsPage/></RequireAuth> }
                />
            </Routes>
        </Router>
    }
}
