use blog_client::router::{BRAND, LOGOUT_LABEL};
use blog_client::{NavItem, Route, nav_items};
use leptos::prelude::*;

use crate::components::RouteLink;
use crate::state::AppState;

#[component]
pub(crate) fn NavBar(state: AppState) -> impl IntoView {
    let items = move || state.session.with(|store| nav_items(store.session()));

    view! {
        <header class="header">
            <h1 class="brand">
                <RouteLink state=state route=Route::PostList label=BRAND />
            </h1>
            <nav class="nav">
                {move || {
                    items()
                        .into_iter()
                        .map(|item| match item {
                            NavItem::Link { label, route } => {
                                view! { <RouteLink state=state route=route label=label /> }
                                    .into_any()
                            }
                            NavItem::Welcome(text) => view! { <span class="welcome">{text}</span> }.into_any(),
                            NavItem::Logout => {
                                view! {
                                    <button class="logout" on:click=move |_| state.logout()>
                                        {LOGOUT_LABEL}
                                    </button>
                                }
                                    .into_any()
                            }
                        })
                        .collect_view()
                }}
            </nav>
        </header>
    }
}
