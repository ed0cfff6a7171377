use blog_client::views::PostListView;
use blog_client::views::post_detail::LOADING;
use blog_client::views::post_list::EMPTY_LIST;
use blog_client::{BlogApi, PostSummary, Route, display_date};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::BrowserApi;
use crate::components::RouteLink;
use crate::state::AppState;

#[component]
pub(crate) fn PostListPage(state: AppState) -> impl IntoView {
    let view = RwSignal::new(PostListView::new());

    if let Some(ticket) = view.try_update(PostListView::begin_load) {
        let session = state.snapshot();
        spawn_local(async move {
            let result = BrowserApi.list_posts(session.token()).await;
            view.try_update(|list| list.apply_load(ticket, result));
        });
    }

    view! {
        <section class="post-list">
            {move || {
                view.with(|list| {
                    if list.is_loading() {
                        return view! { <p class="loading">{LOADING}</p> }.into_any();
                    }
                    if list.is_empty() {
                        return view! { <p class="empty">{EMPTY_LIST}</p> }.into_any();
                    }
                    list.posts()
                        .iter()
                        .cloned()
                        .map(|post| view! { <PostCard state=state post=post /> })
                        .collect_view()
                        .into_any()
                })
            }}
        </section>
    }
}

#[component]
fn PostCard(state: AppState, post: PostSummary) -> impl IntoView {
    let route = Route::PostDetail(post.id);
    let meta = format!(
        "{} · {} · комментариев: {}",
        post.author.username,
        display_date(&post.created_at),
        post.comment_count
    );

    view! {
        <article class="post-card">
            {post.cover.map(|cover| view! { <img class="cover" src=cover alt="" /> })}
            <h2>
                <RouteLink state=state route=route label=post.title />
            </h2>
            <p class="meta">{meta}</p>
        </article>
    }
}
