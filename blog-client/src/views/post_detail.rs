use std::collections::HashMap;

use tracing::debug;

use crate::api::BlogApi;
use crate::error::{ApiError, ApiResult};
use crate::models::{Comment, LikeStatus, Post};
use crate::router::Route;
use crate::session::Session;

use super::{Generation, LoadTicket};

/// Текст, пока пост не загружен.
pub const LOADING: &str = "Загрузка...";
const COMMENT_FAILED: &str = "Не удалось отправить комментарий";
const DELETE_FAILED: &str = "Не удалось удалить пост";
const LIKE_FAILED: &str = "Не удалось поставить лайк";

#[derive(Debug, Clone, PartialEq, Eq)]
/// Отправляемый комментарий вместе с постом, к которому он относится.
pub struct CommentTicket {
    /// Пост, открытый в момент отправки.
    pub post_id: i64,
    /// Текст комментария.
    pub content: String,
    visit: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Метка удаления или лайка: пост и посещение экрана, в котором начато действие.
pub struct ActionTicket {
    /// Пост, открытый в момент действия.
    pub post_id: i64,
    visit: u64,
}

#[derive(Debug, Clone)]
/// Экран поста с комментариями.
pub struct PostDetailView {
    post_id: i64,
    visit: u64,
    post: Option<Post>,
    generation: Generation,
    /// Черновик комментария; фронтенд пишет в него напрямую.
    pub comment_draft: String,
    submitting_comment: bool,
    comment_error: Option<String>,
    like: Option<LikeStatus>,
    comment_likes: HashMap<i64, LikeStatus>,
    action_error: Option<String>,
}

impl PostDetailView {
    /// Экран для поста `post_id`, ещё не загруженный.
    pub fn new(post_id: i64) -> Self {
        Self {
            post_id,
            visit: 0,
            post: None,
            generation: Generation::default(),
            comment_draft: String::new(),
            submitting_comment: false,
            comment_error: None,
            like: None,
            comment_likes: HashMap::new(),
            action_error: None,
        }
    }

    /// Идентификатор поста из маршрута.
    pub fn post_id(&self) -> i64 {
        self.post_id
    }

    /// Загруженный пост.
    pub fn post(&self) -> Option<&Post> {
        self.post.as_ref()
    }

    /// Пост ещё не получен.
    pub fn is_loading(&self) -> bool {
        self.post.is_none()
    }

    /// Смена идентификатора в маршруте: состояние экрана сбрасывается,
    /// ответы на запросы по старому посту будут отброшены.
    pub fn set_post_id(&mut self, post_id: i64) -> bool {
        if post_id == self.post_id {
            return false;
        }
        *self = Self {
            generation: self.generation.clone(),
            visit: self.visit + 1,
            ..Self::new(post_id)
        };
        self.generation.next();
        true
    }

    /// Начинает загрузку поста.
    pub fn begin_load(&mut self) -> (LoadTicket, i64) {
        (self.generation.next(), self.post_id)
    }

    /// Применяет ответ. Устаревшие ответы и ошибки состояние не меняют.
    pub fn apply_load(&mut self, ticket: LoadTicket, result: ApiResult<Post>) -> bool {
        if !self.generation.is_current(ticket) {
            debug!(post_id = self.post_id, "dropping stale post response");
            return false;
        }

        match result {
            Ok(post) => {
                self.post = Some(post);
                true
            }
            Err(err) => {
                debug!(post_id = self.post_id, error = %err, "post fetch failed, keeping current state");
                false
            }
        }
    }

    /// Загружает пост вместе с комментариями.
    pub async fn load<A: BlogApi + ?Sized>(&mut self, api: &A, session: &Session) {
        let (ticket, post_id) = self.begin_load();
        let result = api.get_post(session.token(), post_id).await;
        self.apply_load(ticket, result);
    }

    /// Показывать ли форму комментария.
    pub fn can_comment(&self, session: &Session) -> bool {
        session.user().is_some()
    }

    /// Идёт ли отправка комментария.
    pub fn is_submitting_comment(&self) -> bool {
        self.submitting_comment
    }

    /// Ошибка отправки комментария.
    pub fn comment_error(&self) -> Option<&str> {
        self.comment_error.as_deref()
    }

    /// Готовит отправку комментария. Пустой или пробельный текст, как и
    /// отсутствие пользователя, запрос не порождают.
    pub fn begin_comment(&mut self, session: &Session) -> Option<CommentTicket> {
        if !self.can_comment(session) || self.comment_draft.trim().is_empty() {
            return None;
        }

        self.submitting_comment = true;
        self.comment_error = None;
        Some(CommentTicket {
            post_id: self.post_id,
            content: self.comment_draft.clone(),
            visit: self.visit,
        })
    }

    /// Обрабатывает ответ на комментарий. `true` означает, что пост нужно
    /// перезагрузить, чтобы увидеть новый список комментариев.
    pub fn finish_comment(&mut self, ticket: &CommentTicket, result: ApiResult<Comment>) -> bool {
        if ticket.post_id != self.post_id || ticket.visit != self.visit {
            debug!(post_id = ticket.post_id, "dropping comment response for a closed post");
            return false;
        }

        self.submitting_comment = false;
        match result {
            Ok(_) => {
                self.comment_draft.clear();
                true
            }
            Err(err) => {
                self.comment_error = Some(failure_message(&err, COMMENT_FAILED));
                false
            }
        }
    }

    /// Отправляет комментарий и перезагружает пост.
    pub async fn submit_comment<A: BlogApi + ?Sized>(&mut self, api: &A, session: &Session) {
        let Some(ticket) = self.begin_comment(session) else {
            return;
        };

        let result = api
            .add_comment(session.token(), ticket.post_id, &ticket.content)
            .await;
        if self.finish_comment(&ticket, result) {
            self.load(api, session).await;
        }
    }

    /// Метка для удаления или лайка в текущем посещении экрана.
    pub fn action_ticket(&self) -> ActionTicket {
        ActionTicket {
            post_id: self.post_id,
            visit: self.visit,
        }
    }

    fn is_current(&self, ticket: ActionTicket) -> bool {
        ticket == self.action_ticket()
    }

    /// Ошибка удаления или лайка.
    pub fn action_error(&self) -> Option<&str> {
        self.action_error.as_deref()
    }

    /// Может ли текущий пользователь удалить пост.
    pub fn can_delete(&self, session: &Session) -> bool {
        match (session.user(), self.post.as_ref()) {
            (Some(user), Some(post)) => user.id == post.author.id,
            _ => false,
        }
    }

    /// Удаляет пост. При успехе возвращает маршрут на список.
    pub async fn delete<A: BlogApi + ?Sized>(&mut self, api: &A, session: &Session) -> Option<Route> {
        if !self.can_delete(session) {
            return None;
        }

        let ticket = self.action_ticket();
        let result = api.delete_post(session.token(), ticket.post_id).await;
        self.finish_delete(ticket, result)
    }

    /// Обрабатывает ответ на удаление.
    pub fn finish_delete(&mut self, ticket: ActionTicket, result: ApiResult<()>) -> Option<Route> {
        if !self.is_current(ticket) {
            debug!(post_id = ticket.post_id, "dropping delete response for a closed post");
            return None;
        }
        match result {
            Ok(()) => Some(Route::PostList),
            Err(err) => {
                self.action_error = Some(failure_message(&err, DELETE_FAILED));
                None
            }
        }
    }

    /// Последнее известное состояние лайка поста.
    pub fn like(&self) -> Option<LikeStatus> {
        self.like
    }

    /// Последнее известное состояние лайка комментария.
    pub fn comment_like(&self, comment_id: i64) -> Option<LikeStatus> {
        self.comment_likes.get(&comment_id).copied()
    }

    /// Применяет ответ на переключение лайка поста.
    pub fn finish_like(&mut self, ticket: ActionTicket, result: ApiResult<LikeStatus>) {
        if !self.is_current(ticket) {
            return;
        }
        match result {
            Ok(status) => {
                self.like = Some(status);
                self.action_error = None;
            }
            Err(err) => self.action_error = Some(failure_message(&err, LIKE_FAILED)),
        }
    }

    /// Применяет ответ на переключение лайка комментария.
    pub fn finish_comment_like(
        &mut self,
        ticket: ActionTicket,
        comment_id: i64,
        result: ApiResult<LikeStatus>,
    ) {
        if !self.is_current(ticket) {
            return;
        }
        match result {
            Ok(status) => {
                self.comment_likes.insert(comment_id, status);
                self.action_error = None;
            }
            Err(err) => self.action_error = Some(failure_message(&err, LIKE_FAILED)),
        }
    }

    /// Переключает лайк поста. Пост не перезагружается.
    pub async fn toggle_like<A: BlogApi + ?Sized>(&mut self, api: &A, session: &Session) {
        if session.user().is_none() {
            return;
        }
        let ticket = self.action_ticket();
        let result = api.toggle_post_like(session.token(), ticket.post_id).await;
        self.finish_like(ticket, result);
    }

    /// Переключает лайк комментария.
    pub async fn toggle_comment_like<A: BlogApi + ?Sized>(
        &mut self,
        api: &A,
        session: &Session,
        comment_id: i64,
    ) {
        if session.user().is_none() {
            return;
        }
        let ticket = self.action_ticket();
        let result = api.toggle_comment_like(session.token(), comment_id).await;
        self.finish_comment_like(ticket, comment_id, result);
    }
}

fn failure_message(err: &ApiError, fallback: &str) -> String {
    match err.server_message() {
        Some(message) => format!("{fallback}: {message}"),
        None => fallback.to_string(),
    }
}
