//! Recipes page — the authenticated landing route. Lists the recipes
//! visible to the caller's groups.

use leptos::prelude::*;

use crate::app::AppApiClient;
use crate::net::types::Recipe;

#[component]
pub fn RecipesPage() -> impl IntoView {
    let api = expect_context::<AppApiClient>();
    let recipes = RwSignal::new(Vec::<Recipe>::new());
    let error = RwSignal::new(String::new());
    let loading = RwSignal::new(true);

    #[cfg(feature = "hydrate")]
    {
        let api = api.clone();
        leptos::task::spawn_local(async move {
            match api.recipes().await {
                Ok(items) => recipes.set(items),
                Err(e) => error.set(e.to_string()),
            }
            loading.set(false);
        });
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = &api;
    }

    view! {
        <div class="recipes-page">
            <h1>"Recipes"</h1>
            <Show when=move || loading.get()>
                <p class="recipes-loading">"Loading..."</p>
            </Show>
            <Show when=move || !error.get().is_empty()>
                <p class="recipes-error">{move || error.get()}</p>
            </Show>
            <ul class="recipes-list">
                {move || {
                    recipes
                        .get()
                        .into_iter()
                        .map(|recipe| {
                            view! {
                                <li class="recipes-list__item">
                                    <span class="recipes-list__title">{recipe.title}</span>
                                    <span class="recipes-list__count">
                                        {format!("{} ingredients", recipe.ingredients.len())}
                                    </span>
                                </li>
                            }
                        })
                        .collect_view()
                }}
            </ul>
        </div>
    }
}
