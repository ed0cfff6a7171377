use blog_client::views::PostDetailView;
use blog_client::views::post_detail::LOADING;
use blog_client::{BlogApi, Comment, Post, display_date};
use leptos::ev::{MouseEvent, SubmitEvent};
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::BrowserApi;
use crate::state::AppState;

fn load_post(state: AppState, view: RwSignal<PostDetailView>) {
    let Some((ticket, post_id)) = view.try_update(PostDetailView::begin_load) else {
        return;
    };
    let session = state.snapshot();
    spawn_local(async move {
        let result = BrowserApi.get_post(session.token(), post_id).await;
        view.try_update(|detail| detail.apply_load(ticket, result));
    });
}

/// Экран поста. `post_id` меняется без пересоздания компонента, поэтому
/// ответы по предыдущему посту отбрасываются состоянием экрана.
#[component]
pub(crate) fn PostDetailPage(state: AppState, post_id: Memo<i64>) -> impl IntoView {
    let view = RwSignal::new(PostDetailView::new(post_id.get_untracked()));

    Effect::new(move |_| {
        let id = post_id.get();
        view.update(|detail| {
            detail.set_post_id(id);
        });
        load_post(state, view);
    });

    let on_comment = move |ev: SubmitEvent| {
        ev.prevent_default();
        let session = state.snapshot();
        let Some(ticket) = view.try_update(|detail| detail.begin_comment(&session)).flatten()
        else {
            return;
        };
        spawn_local(async move {
            let result = BrowserApi
                .add_comment(session.token(), ticket.post_id, &ticket.content)
                .await;
            let refetch = view
                .try_update(|detail| detail.finish_comment(&ticket, result))
                .unwrap_or(false);
            if refetch {
                load_post(state, view);
            }
        });
    };

    let on_delete = move |_: MouseEvent| {
        let session = state.snapshot();
        if !view.with_untracked(|detail| detail.can_delete(&session)) {
            return;
        }
        let ticket = view.with_untracked(PostDetailView::action_ticket);
        spawn_local(async move {
            let result = BrowserApi.delete_post(session.token(), ticket.post_id).await;
            let route = view
                .try_update(|detail| detail.finish_delete(ticket, result))
                .flatten();
            if let Some(route) = route {
                state.navigate(route);
            }
        });
    };

    let on_like = move |_: MouseEvent| {
        let session = state.snapshot();
        if session.user().is_none() {
            return;
        }
        let ticket = view.with_untracked(PostDetailView::action_ticket);
        spawn_local(async move {
            let result = BrowserApi.toggle_post_like(session.token(), ticket.post_id).await;
            view.try_update(|detail| detail.finish_like(ticket, result));
        });
    };

    let signed_in = move || state.session.with(|store| store.user().is_some());
    let can_delete = move || {
        state
            .session
            .with(|store| view.with(|detail| detail.can_delete(store.session())))
    };

    view! {
        <section class="post-detail">
            {move || match view.with(|detail| detail.post().cloned()) {
                None => view! { <p class="loading">{LOADING}</p> }.into_any(),
                Some(post) => {
                    view! {
                        <PostBody post=post view=view state=state />
                        <div class="actions">
                            <Show when=signed_in>
                                <button class="like" on:click=on_like>
                                    {move || like_label(view)}
                                </button>
                            </Show>
                            <Show when=can_delete>
                                <button class="delete" on:click=on_delete>"Удалить"</button>
                            </Show>
                        </div>
                        <Show when=move || view.with(|detail| detail.action_error().is_some())>
                            <p class="error">
                                {move || view.with(|detail| detail.action_error().unwrap_or_default().to_string())}
                            </p>
                        </Show>
                        <Show when=signed_in>
                            <form class="comment-form" on:submit=on_comment>
                                <textarea
                                    placeholder="Ваш комментарий"
                                    prop:value=move || view.with(|detail| detail.comment_draft.clone())
                                    on:input=move |ev| view.update(|detail| detail.comment_draft = event_target_value(&ev))
                                ></textarea>
                                <button
                                    type="submit"
                                    disabled=move || view.with(PostDetailView::is_submitting_comment)
                                >
                                    "Отправить"
                                </button>
                            </form>
                            <Show when=move || view.with(|detail| detail.comment_error().is_some())>
                                <p class="error">
                                    {move || view.with(|detail| detail.comment_error().unwrap_or_default().to_string())}
                                </p>
                            </Show>
                        </Show>
                    }
                        .into_any()
                }
            }}
        </section>
    }
}

fn like_label(view: RwSignal<PostDetailView>) -> String {
    match view.with(PostDetailView::like) {
        Some(status) if status.liked => format!("♥ {}", status.like_count),
        Some(status) => format!("♡ {}", status.like_count),
        None => "♡".to_string(),
    }
}

#[component]
fn PostBody(post: Post, view: RwSignal<PostDetailView>, state: AppState) -> impl IntoView {
    let meta = format!("{} · {}", post.author.username, display_date(&post.created_at));
    let count = post.comments.len();

    view! {
        <article>
            {post.cover.map(|cover| view! { <img class="cover" src=cover alt="" /> })}
            <h2>{post.title}</h2>
            <p class="meta">{meta}</p>
            <div class="content">
                {post
                    .content
                    .lines()
                    .map(|line| view! { <p>{line.to_string()}</p> })
                    .collect_view()}
            </div>
        </article>
        <section class="comments">
            <h3>{format!("Комментарии ({count})")}</h3>
            {post
                .comments
                .into_iter()
                .map(|comment| view! { <CommentItem comment=comment view=view state=state /> })
                .collect_view()}
        </section>
    }
}

#[component]
fn CommentItem(comment: Comment, view: RwSignal<PostDetailView>, state: AppState) -> impl IntoView {
    let comment_id = comment.id;
    let on_like = move |_: MouseEvent| {
        let session = state.snapshot();
        if session.user().is_none() {
            return;
        }
        let ticket = view.with_untracked(PostDetailView::action_ticket);
        spawn_local(async move {
            let result = BrowserApi.toggle_comment_like(session.token(), comment_id).await;
            view.try_update(|detail| detail.finish_comment_like(ticket, comment_id, result));
        });
    };
    let likes = move || match view.with(|detail| detail.comment_like(comment_id)) {
        Some(status) => format!("♥ {}", status.like_count),
        None => "♡".to_string(),
    };

    view! {
        <div class="comment">
            <p class="meta">
                {format!("{} · {}", comment.author.username, display_date(&comment.created_at))}
            </p>
            <p>{comment.content}</p>
            <Show when=move || state.session.with(|store| store.user().is_some())>
                <button class="like" on:click=on_like>{likes}</button>
            </Show>
        </div>
    }
}
