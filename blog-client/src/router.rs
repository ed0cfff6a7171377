//! Маршруты приложения и модель шапки с навигацией.

use std::fmt;

use crate::error::StorageError;
use crate::session::{Session, SessionStorage, SessionStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Один из четырёх экранов приложения.
pub enum Route {
    /// `/` — список постов.
    PostList,
    /// `/auth` — вход и регистрация.
    Auth,
    /// `/post/:id` — пост с комментариями.
    PostDetail(i64),
    /// `/create` — новый пост.
    CreatePost,
}

impl Route {
    /// Разбирает путь URL. Query и fragment отбрасываются, хвостовой слэш
    /// допускается. Для неизвестных путей возвращает `None`.
    pub fn parse(path: &str) -> Option<Self> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let path = path.trim_end_matches('/');

        match path {
            "" => Some(Self::PostList),
            "/auth" => Some(Self::Auth),
            "/create" => Some(Self::CreatePost),
            _ => {
                let id = path.strip_prefix("/post/")?;
                if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                id.parse::<i64>().ok().map(Self::PostDetail)
            }
        }
    }

    /// Канонический путь маршрута.
    pub fn path(&self) -> String {
        match self {
            Self::PostList => "/".to_string(),
            Self::Auth => "/auth".to_string(),
            Self::PostDetail(id) => format!("/post/{id}"),
            Self::CreatePost => "/create".to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Элемент навигационной панели.
pub enum NavItem {
    /// Ссылка на маршрут.
    Link {
        /// Текст ссылки.
        label: &'static str,
        /// Куда ведёт ссылка.
        route: Route,
    },
    /// Приветствие текущего пользователя.
    Welcome(String),
    /// Кнопка выхода.
    Logout,
}

/// Название блога в шапке; ссылка на `/`.
pub const BRAND: &str = "Rust Blog";
/// Текст ссылки на вход/регистрацию.
pub const AUTH_LABEL: &str = "Вход / Регистрация";
/// Текст ссылки на создание поста.
pub const CREATE_LABEL: &str = "Написать пост";
/// Текст кнопки выхода.
pub const LOGOUT_LABEL: &str = "Выйти";

/// Строит элементы навигации для текущей сессии.
pub fn nav_items(session: &Session) -> Vec<NavItem> {
    match session.user() {
        Some(user) => vec![
            NavItem::Welcome(format!("Привет, {}", user.username)),
            NavItem::Link {
                label: CREATE_LABEL,
                route: Route::CreatePost,
            },
            NavItem::Logout,
        ],
        None => vec![NavItem::Link {
            label: AUTH_LABEL,
            route: Route::Auth,
        }],
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Оболочка: текущий путь и сопоставленный ему маршрут.
pub struct Shell {
    path: String,
    route: Option<Route>,
}

impl Shell {
    /// Оболочка, открытая на пути `path`.
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            route: Route::parse(path),
        }
    }

    /// Текущий путь.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Активный маршрут; `None`, если путь ни с чем не совпал.
    pub fn route(&self) -> Option<Route> {
        self.route
    }

    /// Переходит на маршрут. Возвращает `true`, если маршрут сменился.
    pub fn navigate(&mut self, route: Route) -> bool {
        let changed = self.route != Some(route);
        self.path = route.path();
        self.route = Some(route);
        changed
    }

    /// Переходит по произвольному пути.
    pub fn navigate_path(&mut self, path: &str) -> bool {
        let route = Route::parse(path);
        let changed = self.route != route;
        self.path = path.to_string();
        self.route = route;
        changed
    }

    /// Выход: очищает сессию, маршрут остаётся прежним.
    pub fn logout<S: SessionStorage>(
        &self,
        store: &mut SessionStore<S>,
    ) -> Result<(), StorageError> {
        store.clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;
    use crate::session::MemoryStorage;

    #[test]
    fn parse_maps_exactly_four_routes() {
        assert_eq!(Route::parse("/"), Some(Route::PostList));
        assert_eq!(Route::parse("/auth"), Some(Route::Auth));
        assert_eq!(Route::parse("/post/42"), Some(Route::PostDetail(42)));
        assert_eq!(Route::parse("/create"), Some(Route::CreatePost));
    }

    #[test]
    fn parse_tolerates_trailing_slash_and_query() {
        assert_eq!(Route::parse("/auth/"), Some(Route::Auth));
        assert_eq!(Route::parse("/post/7?from=list"), Some(Route::PostDetail(7)));
        assert_eq!(Route::parse("/#top"), Some(Route::PostList));
    }

    #[test]
    fn parse_rejects_unknown_paths() {
        assert_eq!(Route::parse("/post/abc"), None);
        assert_eq!(Route::parse("/post/"), None);
        assert_eq!(Route::parse("/posts"), None);
        assert_eq!(Route::parse("/post/1/edit"), None);
    }

    #[test]
    fn parse_accepts_only_plain_digits_as_post_id() {
        assert_eq!(Route::parse("/post/+5"), None);
        assert_eq!(Route::parse("/post/-1"), None);
        assert_eq!(Route::parse("/post/ 5"), None);
        assert_eq!(Route::parse("/post/99999999999999999999"), None);
        assert_eq!(Route::parse("/post/007"), Some(Route::PostDetail(7)));
    }

    #[test]
    fn path_round_trips_through_parse() {
        for route in [
            Route::PostList,
            Route::Auth,
            Route::PostDetail(3),
            Route::CreatePost,
        ] {
            assert_eq!(Route::parse(&route.path()), Some(route));
        }
    }

    #[test]
    fn guest_nav_shows_only_auth_link() {
        let items = nav_items(&Session::anonymous());
        assert_eq!(
            items,
            vec![NavItem::Link {
                label: AUTH_LABEL,
                route: Route::Auth
            }]
        );
    }

    #[test]
    fn member_nav_shows_welcome_create_and_logout() {
        let mut store = SessionStore::load(MemoryStorage::new());
        store
            .set_session(
                User {
                    id: 1,
                    username: "ann".to_string(),
                    email: String::new(),
                },
                "tok".to_string(),
            )
            .expect("set_session");

        let items = nav_items(store.session());
        assert_eq!(items.len(), 3);
        assert_eq!(items[0], NavItem::Welcome("Привет, ann".to_string()));
        assert!(items.contains(&NavItem::Logout));
        assert!(!items.iter().any(|item| matches!(
            item,
            NavItem::Link {
                route: Route::Auth,
                ..
            }
        )));
    }

    #[test]
    fn logout_clears_session_and_keeps_route() {
        let mut store = SessionStore::load(MemoryStorage::new());
        store
            .set_session(
                User {
                    id: 1,
                    username: "ann".to_string(),
                    email: String::new(),
                },
                "tok".to_string(),
            )
            .expect("set_session");

        let shell = Shell::new("/post/5");
        shell.logout(&mut store).expect("logout");

        assert!(!store.session().is_authenticated());
        assert_eq!(shell.route(), Some(Route::PostDetail(5)));
        assert_eq!(nav_items(store.session()).len(), 1);
    }

    #[test]
    fn navigate_reports_route_change() {
        let mut shell = Shell::new("/");
        assert!(!shell.navigate(Route::PostList));
        assert!(shell.navigate(Route::PostDetail(1)));
        assert_eq!(shell.path(), "/post/1");
        assert!(shell.navigate_path("/nowhere"));
        assert_eq!(shell.route(), None);
    }
}
