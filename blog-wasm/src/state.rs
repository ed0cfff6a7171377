use blog_client::{Route, Session, SessionStore, Shell};
use leptos::prelude::*;

use crate::storage::LocalStorage;

/// Общее состояние приложения: сессия и текущий экран.
#[derive(Debug, Clone, Copy)]
pub(crate) struct AppState {
    pub(crate) session: RwSignal<SessionStore<LocalStorage>>,
    pub(crate) shell: RwSignal<Shell>,
    pub(crate) error: RwSignal<Option<String>>,
}

impl AppState {
    pub(crate) fn new() -> Self {
        Self {
            session: RwSignal::new(SessionStore::load(LocalStorage)),
            shell: RwSignal::new(Shell::new(&current_path())),
            error: RwSignal::new(None),
        }
    }

    /// Снимок сессии для асинхронной задачи.
    pub(crate) fn snapshot(&self) -> Session {
        self.session.with_untracked(|store| store.session().clone())
    }

    pub(crate) fn route(&self) -> Option<Route> {
        self.shell.with(Shell::route)
    }

    /// Переход по ссылке: `pushState` + смена экрана.
    pub(crate) fn navigate(&self, route: Route) {
        let changed = self
            .shell
            .try_update(|shell| shell.navigate(route))
            .unwrap_or(false);
        if !changed {
            return;
        }
        if let Some(history) = web_sys::window().and_then(|window| window.history().ok()) {
            let path = route.path();
            if history
                .push_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(&path))
                .is_err()
            {
                self.set_error("не удалось изменить адрес страницы");
            }
        }
    }

    /// Кнопки браузера «назад/вперёд».
    pub(crate) fn sync_with_location(&self) {
        let path = current_path();
        self.shell.update(|shell| {
            shell.navigate_path(&path);
        });
    }

    pub(crate) fn logout(&self) {
        let result = self
            .session
            .try_update(|store| self.shell.with_untracked(|shell| shell.logout(store)));
        if let Some(Err(err)) = result {
            self.set_error(err.to_string());
        }
    }

    pub(crate) fn set_error(&self, message: impl Into<String>) {
        self.error.set(Some(message.into()));
    }

    pub(crate) fn clear_error(&self) {
        self.error.set(None);
    }
}

fn current_path() -> String {
    web_sys::window()
        .and_then(|window| window.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}
