//! Groups page — lists the caller's recipe-sharing groups with a minimal
//! create flow.

use leptos::prelude::*;

use crate::app::AppApiClient;
use crate::net::types::Group;

#[component]
pub fn GroupsPage() -> impl IntoView {
    let api = expect_context::<AppApiClient>();
    let groups = RwSignal::new(Vec::<Group>::new());
    let error = RwSignal::new(String::new());
    let loading = RwSignal::new(true);
    let new_name = RwSignal::new(String::new());

    #[cfg(feature = "hydrate")]
    {
        let api = api.clone();
        leptos::task::spawn_local(async move {
            match api.groups().await {
                Ok(items) => groups.set(items),
                Err(e) => error.set(e.to_string()),
            }
            loading.set(false);
        });
    }

    let api_create = api.clone();
    let on_create = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let name = new_name.get().trim().to_owned();
        if name.is_empty() {
            return;
        }
        #[cfg(feature = "hydrate")]
        {
            let api = api_create.clone();
            leptos::task::spawn_local(async move {
                match api.create_group(&name).await {
                    Ok(group) => {
                        groups.update(|items| items.push(group));
                        new_name.set(String::new());
                    }
                    Err(e) => error.set(e.to_string()),
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (&api_create, name);
        }
    };

    view! {
        <div class="groups-page">
            <h1>"Groups"</h1>
            <Show when=move || loading.get()>
                <p class="groups-loading">"Loading..."</p>
            </Show>
            <Show when=move || !error.get().is_empty()>
                <p class="groups-error">{move || error.get()}</p>
            </Show>
            <ul class="groups-list">
                {move || {
                    groups
                        .get()
                        .into_iter()
                        .map(|group| {
                            view! { <li class="groups-list__item">{group.name}</li> }
                        })
                        .collect_view()
                }}
            </ul>
            <form class="groups-create" on:submit=on_create>
                <input
                    class="groups-create__input"
                    type="text"
                    placeholder="new group name"
                    prop:value=move || new_name.get()
                    on:input=move |ev| new_name.set(event_target_value(&ev))
                />
                <button class="groups-create__button" type="submit">
                    "Create group"
                </button>
            </form>
        </div>
    }
}
