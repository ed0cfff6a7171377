use async_trait::async_trait;

use crate::error::ApiResult;
use crate::models::{
    AuthResponse, Comment, ImageFile, LikeStatus, LoginRequest, NewPost, Post, PostSummary,
    PostUpdate, RegisterRequest, UploadedImage, User,
};

/// Транспорт к REST API блога.
///
/// Каждый метод выполняет ровно один HTTP-запрос. `token` прикрепляется как
/// `Authorization: Bearer <token>`, если он есть; отсутствие токена запрос не
/// блокирует, решение принимает сервер.
///
/// Трейт объявлен без `Send`, чтобы его могли реализовать браузерные
/// транспорты (`gloo-net`), чьи futures не `Send`.
#[async_trait(?Send)]
pub trait BlogApi {
    /// `POST /api/users/register/`
    async fn register(
        &self,
        token: Option<&str>,
        request: &RegisterRequest,
    ) -> ApiResult<AuthResponse>;

    /// `POST /api/users/login/`
    async fn login(&self, token: Option<&str>, request: &LoginRequest) -> ApiResult<AuthResponse>;

    /// `GET /api/users/profile/`
    async fn get_profile(&self, token: Option<&str>) -> ApiResult<User>;

    /// `GET /api/posts/`
    async fn list_posts(&self, token: Option<&str>) -> ApiResult<Vec<PostSummary>>;

    /// `GET /api/posts/{id}/`
    async fn get_post(&self, token: Option<&str>, id: i64) -> ApiResult<Post>;

    /// `POST /api/posts/`
    async fn create_post(&self, token: Option<&str>, post: &NewPost) -> ApiResult<Post>;

    /// `PUT /api/posts/{id}/`
    async fn update_post(
        &self,
        token: Option<&str>,
        id: i64,
        update: &PostUpdate,
    ) -> ApiResult<Post>;

    /// `DELETE /api/posts/{id}/`
    async fn delete_post(&self, token: Option<&str>, id: i64) -> ApiResult<()>;

    /// `POST /api/posts/{id}/comments/`
    async fn add_comment(
        &self,
        token: Option<&str>,
        post_id: i64,
        content: &str,
    ) -> ApiResult<Comment>;

    /// `POST /api/posts/upload/` (multipart, поле `file`)
    async fn upload_image(&self, token: Option<&str>, file: &ImageFile)
    -> ApiResult<UploadedImage>;

    /// `POST /api/posts/{id}/like/`
    async fn toggle_post_like(&self, token: Option<&str>, id: i64) -> ApiResult<LikeStatus>;

    /// `POST /api/posts/comments/{id}/like/`
    async fn toggle_comment_like(
        &self,
        token: Option<&str>,
        comment_id: i64,
    ) -> ApiResult<LikeStatus>;
}

/// Пути REST API. Общие для всех транспортов.
pub mod paths {
    /// Регистрация.
    pub const REGISTER: &str = "/api/users/register/";
    /// Вход.
    pub const LOGIN: &str = "/api/users/login/";
    /// Профиль текущего пользователя.
    pub const PROFILE: &str = "/api/users/profile/";
    /// Список постов и создание поста.
    pub const POSTS: &str = "/api/posts/";
    /// Загрузка изображения.
    pub const UPLOAD: &str = "/api/posts/upload/";

    /// Конкретный пост.
    pub fn post(id: i64) -> String {
        format!("/api/posts/{id}/")
    }

    /// Комментарии поста.
    pub fn comments(post_id: i64) -> String {
        format!("/api/posts/{post_id}/comments/")
    }

    /// Лайк поста.
    pub fn post_like(id: i64) -> String {
        format!("/api/posts/{id}/like/")
    }

    /// Лайк комментария.
    pub fn comment_like(comment_id: i64) -> String {
        format!("/api/posts/comments/{comment_id}/like/")
    }
}

/// Склеивает базовый URL и путь без двойных слэшей.
pub fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_url_normalizes_slashes() {
        assert_eq!(
            join_url("http://localhost:8000/", paths::POSTS),
            "http://localhost:8000/api/posts/"
        );
        assert_eq!(
            join_url("http://localhost:8000", "api/posts/1/"),
            "http://localhost:8000/api/posts/1/"
        );
    }

    #[test]
    fn paths_keep_trailing_slash() {
        assert_eq!(paths::post(7), "/api/posts/7/");
        assert_eq!(paths::comments(7), "/api/posts/7/comments/");
        assert_eq!(paths::comment_like(9), "/api/posts/comments/9/like/");
    }
}
