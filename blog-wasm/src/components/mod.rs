pub(crate) mod auth_page;
pub(crate) mod create_post;
pub(crate) mod nav_bar;
pub(crate) mod post_detail;
pub(crate) mod post_list;

use blog_client::Route;
use leptos::prelude::*;

use crate::state::AppState;

/// Ссылка на маршрут без перезагрузки страницы.
#[component]
pub(crate) fn RouteLink(
    state: AppState,
    route: Route,
    #[prop(into)] label: String,
) -> impl IntoView {
    view! {
        <a
            href=route.path()
            on:click=move |ev| {
                ev.prevent_default();
                state.navigate(route);
            }
        >
            {label}
        </a>
    }
}
