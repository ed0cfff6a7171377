use tracing::debug;

use crate::api::BlogApi;
use crate::error::ApiResult;
use crate::models::PostSummary;
use crate::session::Session;

use super::{Generation, LoadTicket};

/// Текст для пустого списка.
pub const EMPTY_LIST: &str = "Постов пока нет";

#[derive(Debug, Clone, Default)]
/// Экран списка постов.
///
/// Список загружается один раз при открытии экрана. Если запрос упал,
/// экран так и остаётся в состоянии загрузки.
pub struct PostListView {
    posts: Option<Vec<PostSummary>>,
    generation: Generation,
}

impl PostListView {
    /// Экран до первой загрузки.
    pub fn new() -> Self {
        Self::default()
    }

    /// Список ещё не получен.
    pub fn is_loading(&self) -> bool {
        self.posts.is_none()
    }

    /// Полученные посты в порядке сервера; пусто, пока идёт загрузка.
    pub fn posts(&self) -> &[PostSummary] {
        self.posts.as_deref().unwrap_or_default()
    }

    /// Показывать ли сообщение о пустом списке.
    pub fn is_empty(&self) -> bool {
        self.posts.as_ref().is_some_and(Vec::is_empty)
    }

    /// Начинает загрузку.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation.next()
    }

    /// Применяет ответ. Возвращает `true`, если состояние изменилось.
    pub fn apply_load(&mut self, ticket: LoadTicket, result: ApiResult<Vec<PostSummary>>) -> bool {
        if !self.generation.is_current(ticket) {
            debug!("dropping stale post list response");
            return false;
        }

        match result {
            Ok(posts) => {
                self.posts = Some(posts);
                true
            }
            Err(err) => {
                debug!(error = %err, "post list fetch failed, keeping current state");
                false
            }
        }
    }

    /// Загружает список.
    pub async fn load<A: BlogApi + ?Sized>(&mut self, api: &A, session: &Session) {
        let ticket = self.begin_load();
        let result = api.list_posts(session.token()).await;
        self.apply_load(ticket, result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::models::User;
    use crate::session::{MemoryStorage, SessionStore};
    use crate::testing::{FakeApi, token_for};

    #[tokio::test]
    async fn load_fills_posts_in_server_order() {
        let api = FakeApi::new()
            .with_user("ann", "pw")
            .with_post(1, "first", "a")
            .with_post(1, "second", "b");
        let mut view = PostListView::new();
        assert!(view.is_loading());

        view.load(&api, &Session::anonymous()).await;

        assert!(!view.is_loading());
        let titles: Vec<_> = view.posts().iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["second", "first"]);
        assert!(!view.is_empty());
    }

    #[tokio::test]
    async fn empty_list_shows_empty_state() {
        let api = FakeApi::new();
        let mut view = PostListView::new();

        view.load(&api, &Session::anonymous()).await;

        assert!(view.is_empty());
        assert!(!view.is_loading());
    }

    #[tokio::test]
    async fn failed_fetch_stays_loading() {
        let api = FakeApi::new();
        api.fail_next(ApiError::Network("offline".to_string()));
        let mut view = PostListView::new();

        view.load(&api, &Session::anonymous()).await;

        assert!(view.is_loading());
        assert!(view.posts().is_empty());
        assert!(!view.is_empty());
    }

    #[tokio::test]
    async fn token_is_attached_when_present() {
        let api = FakeApi::new();
        let mut view = PostListView::new();
        let mut store = SessionStore::load(MemoryStorage::new());
        let user = User {
            id: 1,
            username: "ann".to_string(),
            email: String::new(),
        };
        store.set_session(user, token_for(1)).expect("set_session");

        view.load(&api, store.session()).await;
        view.load(&api, &Session::anonymous()).await;

        let calls = api.calls();
        assert_eq!(calls[0].token, Some(token_for(1)));
        assert_eq!(calls[1].token, None);
    }

    #[test]
    fn stale_response_is_dropped() {
        let mut view = PostListView::new();
        let old = view.begin_load();
        let fresh = view.begin_load();

        assert!(view.apply_load(fresh, Ok(Vec::new())));
        assert!(!view.apply_load(old, Err(ApiError::Network("late".to_string()))));
        assert!(view.is_empty());
    }
}
