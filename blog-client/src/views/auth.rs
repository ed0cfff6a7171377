use tracing::info;

use crate::api::BlogApi;
use crate::error::{ApiError, ApiResult};
use crate::models::{AuthResponse, LoginRequest, RegisterRequest};
use crate::router::Route;
use crate::session::{SessionStorage, SessionStore};

use super::validate_non_empty_fields;

/// Сообщение, если сервер не прислал своё.
pub const AUTH_FAILED: &str = "Не удалось выполнить операцию";
const LOGIN_FIELDS_REQUIRED: &str = "Заполните логин и пароль";
const REGISTER_FIELDS_REQUIRED: &str = "Заполните логин, email и пароль";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// Режим экрана авторизации.
pub enum AuthMode {
    /// Вход.
    #[default]
    Login,
    /// Регистрация.
    Register,
}

impl AuthMode {
    /// Заголовок и текст кнопки.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Login => "Вход",
            Self::Register => "Регистрация",
        }
    }

    /// Подсказка для переключателя режимов.
    pub fn toggle_hint(&self) -> (&'static str, &'static str) {
        match self {
            Self::Login => ("Нет аккаунта?", "Зарегистрироваться"),
            Self::Register => ("Уже есть аккаунт?", "Войти"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Поля формы авторизации.
pub struct AuthForm {
    /// Логин.
    pub username: String,
    /// Email, нужен только при регистрации.
    pub email: String,
    /// Пароль.
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Запрос, который должен уйти на сервер.
pub enum AuthRequest {
    /// `login`
    Login(LoginRequest),
    /// `register`
    Register(RegisterRequest),
}

impl AuthRequest {
    /// Выполняет запрос через транспорт.
    pub async fn send<A: BlogApi + ?Sized>(
        &self,
        api: &A,
        token: Option<&str>,
    ) -> ApiResult<AuthResponse> {
        match self {
            Self::Login(request) => api.login(token, request).await,
            Self::Register(request) => api.register(token, request).await,
        }
    }
}

#[derive(Debug, Clone, Default)]
/// Экран входа/регистрации.
pub struct AuthView {
    mode: AuthMode,
    /// Поля формы; фронтенд пишет в них напрямую.
    pub form: AuthForm,
    error: Option<String>,
    submitting: bool,
}

impl AuthView {
    /// Экран в режиме входа с пустой формой.
    pub fn new() -> Self {
        Self::default()
    }

    /// Текущий режим.
    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    /// Переключает вход/регистрацию. Поля формы сохраняются.
    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            AuthMode::Login => AuthMode::Register,
            AuthMode::Register => AuthMode::Login,
        };
    }

    /// Текст ошибки для отображения.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Идёт ли отправка.
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Проверяет форму и готовит запрос. При незаполненных полях выставляет
    /// ошибку и возвращает `None`: запрос не отправляется.
    pub fn begin_submit(&mut self) -> Option<AuthRequest> {
        self.error = None;

        let form = &self.form;
        let validation = match self.mode {
            AuthMode::Login => {
                validate_non_empty_fields(
                    &[form.username.as_str(), form.password.as_str()],
                    LOGIN_FIELDS_REQUIRED,
                )
            }
            AuthMode::Register => validate_non_empty_fields(
                &[
                    form.username.as_str(),
                    form.email.as_str(),
                    form.password.as_str(),
                ],
                REGISTER_FIELDS_REQUIRED,
            ),
        };
        if let Err(message) = validation {
            self.error = Some(message.to_string());
            return None;
        }

        let request = match self.mode {
            AuthMode::Login => AuthRequest::Login(LoginRequest {
                username: form.username.clone(),
                password: form.password.clone(),
            }),
            AuthMode::Register => AuthRequest::Register(RegisterRequest {
                username: form.username.clone(),
                email: form.email.clone(),
                password: form.password.clone(),
            }),
        };
        self.submitting = true;
        Some(request)
    }

    /// Обрабатывает ответ: при успехе сохраняет сессию и возвращает маршрут
    /// для перехода, при ошибке выставляет текст ошибки.
    pub fn finish_submit<S: SessionStorage>(
        &mut self,
        result: ApiResult<AuthResponse>,
        session: &mut SessionStore<S>,
    ) -> Option<Route> {
        self.submitting = false;

        let auth = match result {
            Ok(auth) => auth,
            Err(err) => {
                self.error = Some(failure_message(&err));
                return None;
            }
        };

        let username = auth.user.username.clone();
        if let Err(err) = session.set_session(auth.user, auth.token) {
            self.error = Some(err.to_string());
            return None;
        }

        info!(username = %username, "signed in");
        Some(Route::PostList)
    }

    /// Полный цикл отправки формы.
    pub async fn submit<A, S>(&mut self, api: &A, session: &mut SessionStore<S>) -> Option<Route>
    where
        A: BlogApi + ?Sized,
        S: SessionStorage,
    {
        let request = self.begin_submit()?;
        let result = request.send(api, session.token()).await;
        self.finish_submit(result, session)
    }
}

fn failure_message(err: &ApiError) -> String {
    err.server_message().unwrap_or(AUTH_FAILED).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{MemoryStorage, TOKEN_KEY, USER_KEY};
    use crate::testing::{FakeApi, api_error, token_for};

    fn login_view(username: &str, password: &str) -> AuthView {
        let mut view = AuthView::new();
        view.form.username = username.to_string();
        view.form.password = password.to_string();
        view
    }

    #[tokio::test]
    async fn login_stores_session_and_navigates_home() {
        let api = FakeApi::new().with_user("ann", "secret");
        let mut session = SessionStore::load(MemoryStorage::new());
        let mut view = login_view("ann", "secret");

        let route = view.submit(&api, &mut session).await;

        assert_eq!(route, Some(Route::PostList));
        let ann = api.user("ann");
        assert_eq!(session.user(), Some(&ann));
        assert_eq!(session.token(), Some(token_for(ann.id).as_str()));

        let persisted_token = session.storage().read(TOKEN_KEY).expect("read");
        assert_eq!(persisted_token, Some(token_for(ann.id)));
        let persisted_user = session.storage().read(USER_KEY).expect("read").expect("user");
        let persisted_user: crate::models::User =
            serde_json::from_str(&persisted_user).expect("user json");
        assert_eq!(persisted_user, ann);
        assert!(view.error().is_none());
    }

    #[tokio::test]
    async fn login_failure_shows_server_message() {
        let api = FakeApi::new().with_user("ann", "secret");
        let mut session = SessionStore::load(MemoryStorage::new());
        let mut view = login_view("ann", "wrong");

        let route = view.submit(&api, &mut session).await;

        assert_eq!(route, None);
        assert_eq!(view.error(), Some("invalid username or password"));
        assert!(!session.session().is_authenticated());
        assert!(!view.is_submitting());
    }

    #[tokio::test]
    async fn failure_without_server_message_uses_fallback() {
        let api = FakeApi::new();
        api.fail_next(ApiError::Network("connection refused".to_string()));
        let mut session = SessionStore::load(MemoryStorage::new());
        let mut view = login_view("ann", "secret");

        view.submit(&api, &mut session).await;
        assert_eq!(view.error(), Some(AUTH_FAILED));

        api.fail_next(ApiError::Api {
            status: 400,
            message: None,
        });
        view.submit(&api, &mut session).await;
        assert_eq!(view.error(), Some(AUTH_FAILED));
    }

    #[tokio::test]
    async fn missing_fields_never_hit_the_network() {
        let api = FakeApi::new();
        let mut session = SessionStore::load(MemoryStorage::new());
        let mut view = login_view("ann", "");

        let route = view.submit(&api, &mut session).await;

        assert_eq!(route, None);
        assert_eq!(view.error(), Some(LOGIN_FIELDS_REQUIRED));
        assert_eq!(api.call_count(), 0);
    }

    #[tokio::test]
    async fn register_requires_email_only_in_register_mode() {
        let api = FakeApi::new();
        let mut session = SessionStore::load(MemoryStorage::new());
        let mut view = login_view("bob", "pw");
        view.toggle_mode();
        assert_eq!(view.mode(), AuthMode::Register);

        assert_eq!(view.submit(&api, &mut session).await, None);
        assert_eq!(view.error(), Some(REGISTER_FIELDS_REQUIRED));
        assert_eq!(api.call_count(), 0);

        view.form.email = "bob@example.com".to_string();
        let route = view.submit(&api, &mut session).await;

        assert_eq!(route, Some(Route::PostList));
        assert_eq!(session.user().map(|u| u.username.as_str()), Some("bob"));
        assert_eq!(api.calls()[0].path, "/api/users/register/");
    }

    #[tokio::test]
    async fn duplicate_registration_reports_server_error() {
        let api = FakeApi::new().with_user("bob", "pw");
        let mut session = SessionStore::load(MemoryStorage::new());
        let mut view = login_view("bob", "pw");
        view.toggle_mode();
        view.form.email = "bob@example.com".to_string();

        assert_eq!(view.submit(&api, &mut session).await, None);
        assert_eq!(view.error(), Some("username already exists"));
    }

    #[test]
    fn toggle_mode_keeps_form_fields() {
        let mut view = login_view("ann", "secret");
        view.toggle_mode();
        view.toggle_mode();
        assert_eq!(view.mode(), AuthMode::Login);
        assert_eq!(view.form.username, "ann");
    }

    #[test]
    fn finish_submit_clears_submitting_flag() {
        let mut view = login_view("ann", "secret");
        let mut session = SessionStore::load(MemoryStorage::new());
        assert!(view.begin_submit().is_some());
        assert!(view.is_submitting());

        view.finish_submit(Err(api_error(500, "boom")), &mut session);
        assert!(!view.is_submitting());
        assert_eq!(view.error(), Some("boom"));
    }
}
