use blog_client::Route;
use leptos::prelude::*;

use crate::components::auth_page::AuthPage;
use crate::components::create_post::CreatePostPage;
use crate::components::nav_bar::NavBar;
use crate::components::post_detail::PostDetailPage;
use crate::components::post_list::PostListPage;
use crate::state::AppState;

/// Какой компонент смонтирован. Смена `id` поста компонент не пересоздаёт.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    PostList,
    Auth,
    PostDetail,
    CreatePost,
    NotFound,
}

impl From<Option<Route>> for Screen {
    fn from(route: Option<Route>) -> Self {
        match route {
            Some(Route::PostList) => Self::PostList,
            Some(Route::Auth) => Self::Auth,
            Some(Route::PostDetail(_)) => Self::PostDetail,
            Some(Route::CreatePost) => Self::CreatePost,
            None => Self::NotFound,
        }
    }
}

#[component]
pub fn App() -> impl IntoView {
    let state = AppState::new();

    let _ = window_event_listener(leptos::ev::popstate, move |_| state.sync_with_location());

    let screen = Memo::new(move |_| Screen::from(state.route()));
    let post_id = Memo::new(move |previous: Option<&i64>| match state.route() {
        Some(Route::PostDetail(id)) => id,
        _ => previous.copied().unwrap_or_default(),
    });

    view! {
        <main class="page">
            <NavBar state=state />

            <Show when=move || state.error.with(Option::is_some)>
                <div class="error-banner" on:click=move |_| state.clear_error()>
                    <strong>"Ошибка: "</strong>
                    {move || state.error.get().unwrap_or_default()}
                </div>
            </Show>

            <section class="container">
                {move || match screen.get() {
                    Screen::PostList => view! { <PostListPage state=state /> }.into_any(),
                    Screen::Auth => view! { <AuthPage state=state /> }.into_any(),
                    Screen::PostDetail => view! { <PostDetailPage state=state post_id=post_id /> }.into_any(),
                    Screen::CreatePost => view! { <CreatePostPage state=state /> }.into_any(),
                    Screen::NotFound => ().into_any(),
                }}
            </section>
        </main>
    }
}
