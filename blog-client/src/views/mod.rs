//! Состояние четырёх экранов, независимое от способа отрисовки.
//!
//! Каждый экран разбит на синхронные шаги `begin_*`/`apply_*`/`finish_*`,
//! между которыми фронтенд сам выполняет запрос. Для последовательного
//! использования (CLI, тесты) есть async-обёртки, делающие всё сразу.

pub mod auth;
pub mod create_post;
pub mod post_detail;
pub mod post_list;

pub use auth::{AuthForm, AuthMode, AuthRequest, AuthView};
pub use create_post::{CreatePostForm, CreatePostView};
pub use post_detail::{ActionTicket, CommentTicket, PostDetailView};
pub use post_list::PostListView;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Метка запроса. Ответ применяется, только если метка всё ещё актуальна.
pub struct LoadTicket(u64);

#[derive(Debug, Clone, Default)]
/// Счётчик поколений запросов одного экрана.
pub(crate) struct Generation {
    current: u64,
}

impl Generation {
    /// Выдаёт новую метку; все выданные раньше становятся устаревшими.
    pub(crate) fn next(&mut self) -> LoadTicket {
        self.current += 1;
        LoadTicket(self.current)
    }

    pub(crate) fn is_current(&self, ticket: LoadTicket) -> bool {
        self.current == ticket.0
    }
}

fn validate_non_empty_fields(
    fields: &[&str],
    error_message: &'static str,
) -> Result<(), &'static str> {
    if fields.iter().any(|field| field.trim().is_empty()) {
        return Err(error_message);
    }
    Ok(())
}
