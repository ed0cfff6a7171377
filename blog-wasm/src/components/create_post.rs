use blog_client::views::CreatePostView;
use blog_client::views::create_post::SIGN_IN_REQUIRED;
use blog_client::{ApiError, BlogApi, ImageFile};
use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen_futures::JsFuture;

use crate::api::BrowserApi;
use crate::state::AppState;

async fn read_file(file: web_sys::File) -> Result<ImageFile, ApiError> {
    let buffer = JsFuture::from(file.array_buffer())
        .await
        .map_err(|err| ApiError::Request(format!("failed to read file: {err:?}")))?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();

    let mut image = ImageFile::new(file.name(), bytes);
    let content_type = file.type_();
    if !content_type.is_empty() {
        image.content_type = content_type;
    }
    Ok(image)
}

fn show_alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

#[component]
pub(crate) fn CreatePostPage(state: AppState) -> impl IntoView {
    let view = RwSignal::new(CreatePostView::new());

    let on_file = move |ev: leptos::ev::Event| {
        let input: web_sys::HtmlInputElement = event_target(&ev);
        let Some(file) = input.files().and_then(|files| files.get(0)) else {
            return;
        };
        let session = state.snapshot();
        let Some(ticket) = view.try_update(|create| create.begin_upload(&session)).flatten() else {
            return;
        };
        spawn_local(async move {
            let result = match read_file(file).await {
                Ok(image) => BrowserApi.upload_image(session.token(), &image).await,
                Err(err) => Err(err),
            };
            let alert = view
                .try_update(|create| {
                    create.finish_upload(ticket, result);
                    create.take_alert()
                })
                .flatten();
            if let Some(alert) = alert {
                show_alert(&alert);
            }
        });
    };

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let session = state.snapshot();
        let Some(post) = view.try_update(|create| create.begin_submit(&session)).flatten() else {
            return;
        };
        spawn_local(async move {
            let result = BrowserApi.create_post(session.token(), &post).await;
            let route = view
                .try_update(|create| create.finish_submit(result))
                .flatten();
            if let Some(route) = route {
                state.navigate(route);
            }
        });
    };

    let blocked = move || state.session.with(|store| store.user().is_none());
    let busy = move || view.with(|create| create.is_uploading() || create.is_submitting());

    view! {
        <section class="create-post">
            <Show
                when=move || !blocked()
                fallback=|| view! { <p class="blocked">{SIGN_IN_REQUIRED}</p> }
            >
                <h2>"Новый пост"</h2>
                <form on:submit=on_submit>
                    <input
                        placeholder="Заголовок"
                        prop:value=move || view.with(|create| create.form.title.clone())
                        on:input=move |ev| view.update(|create| create.form.title = event_target_value(&ev))
                    />
                    <textarea
                        placeholder="Текст поста"
                        prop:value=move || view.with(|create| create.form.content.clone())
                        on:input=move |ev| view.update(|create| create.form.content = event_target_value(&ev))
                    ></textarea>
                    <label>
                        "Обложка: "
                        <input type="file" accept="image/*" on:change=on_file />
                    </label>
                    {move || {
                        view.with(|create| create.form.cover.clone())
                            .map(|cover| view! { <img class="cover-preview" src=cover alt="" /> })
                    }}
                    <button type="submit" disabled=busy>"Опубликовать"</button>
                </form>
                <Show when=move || view.with(|create| create.error().is_some())>
                    <p class="error">
                        {move || view.with(|create| create.error().unwrap_or_default().to_string())}
                    </p>
                </Show>
            </Show>
        </section>
    }
}
