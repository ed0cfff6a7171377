use blog_client::views::{AuthMode, AuthView};
use leptos::ev::SubmitEvent;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::BrowserApi;
use crate::state::AppState;

#[component]
pub(crate) fn AuthPage(state: AppState) -> impl IntoView {
    let view = RwSignal::new(AuthView::new());

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let Some(request) = view.try_update(AuthView::begin_submit).flatten() else {
            return;
        };
        let token = state.snapshot().token().map(str::to_string);

        spawn_local(async move {
            let result = request.send(&BrowserApi, token.as_deref()).await;
            let route = state
                .session
                .try_update(|store| view.try_update(|auth| auth.finish_submit(result, store)))
                .flatten()
                .flatten();
            if let Some(route) = route {
                state.navigate(route);
            }
        });
    };

    let is_register = move || view.with(|auth| auth.mode() == AuthMode::Register);
    let busy = move || view.with(AuthView::is_submitting);

    view! {
        <section class="auth">
            <h2>{move || view.with(|auth| auth.mode().title())}</h2>
            <form on:submit=on_submit>
                <input
                    placeholder="Имя пользователя"
                    prop:value=move || view.with(|auth| auth.form.username.clone())
                    on:input=move |ev| view.update(|auth| auth.form.username = event_target_value(&ev))
                />
                <Show when=is_register>
                    <input
                        placeholder="Email"
                        type="email"
                        prop:value=move || view.with(|auth| auth.form.email.clone())
                        on:input=move |ev| view.update(|auth| auth.form.email = event_target_value(&ev))
                    />
                </Show>
                <input
                    placeholder="Пароль"
                    type="password"
                    prop:value=move || view.with(|auth| auth.form.password.clone())
                    on:input=move |ev| view.update(|auth| auth.form.password = event_target_value(&ev))
                />
                <button type="submit" disabled=busy>
                    {move || view.with(|auth| auth.mode().title())}
                </button>
            </form>

            <Show when=move || view.with(|auth| auth.error().is_some())>
                <p class="error">{move || view.with(|auth| auth.error().unwrap_or_default().to_string())}</p>
            </Show>

            <p class="toggle">
                {move || view.with(|auth| auth.mode().toggle_hint().0)}
                " "
                <a
                    href="#"
                    on:click=move |ev| {
                        ev.prevent_default();
                        view.update(AuthView::toggle_mode);
                    }
                >
                    {move || view.with(|auth| auth.mode().toggle_hint().1)}
                </a>
            </p>
        </section>
    }
}
