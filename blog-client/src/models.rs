use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Публичная модель пользователя.
pub struct User {
    /// Идентификатор пользователя.
    pub id: i64,
    /// Логин.
    pub username: String,
    /// Email (может быть пустым: при регистрации он необязателен).
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Пост в списке: без комментариев и без текста.
pub struct PostSummary {
    /// Идентификатор поста.
    pub id: i64,
    /// Заголовок поста.
    pub title: String,
    /// URL обложки.
    #[serde(default)]
    pub cover: Option<String>,
    /// Автор поста.
    pub author: User,
    /// Дата и время создания поста (UTC).
    pub created_at: DateTime<Utc>,
    /// Количество комментариев.
    #[serde(default)]
    pub comment_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Полная модель поста вместе с комментариями.
pub struct Post {
    /// Идентификатор поста.
    pub id: i64,
    /// Заголовок поста.
    pub title: String,
    /// Текст поста, переводы строк сохраняются как есть.
    pub content: String,
    /// URL обложки.
    #[serde(default)]
    pub cover: Option<String>,
    /// Автор поста.
    pub author: User,
    /// Дата и время создания поста (UTC).
    pub created_at: DateTime<Utc>,
    /// Количество комментариев.
    #[serde(default)]
    pub comment_count: u64,
    /// Комментарии в порядке, в котором их вернул сервер.
    #[serde(default)]
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Комментарий к посту.
pub struct Comment {
    /// Идентификатор комментария.
    pub id: i64,
    /// Текст комментария.
    pub content: String,
    /// Автор комментария.
    pub author: User,
    /// Дата и время создания (UTC).
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Ответ после успешной регистрации или входа.
pub struct AuthResponse {
    /// Bearer-токен.
    pub token: String,
    /// Данные пользователя.
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Ответ загрузки изображения.
pub struct UploadedImage {
    /// URL, который сервер назначил файлу.
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Состояние лайка после переключения.
pub struct LikeStatus {
    /// Стоит ли лайк текущего пользователя.
    pub liked: bool,
    /// Сколько всего лайков.
    pub like_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
/// Данные для регистрации.
pub struct RegisterRequest {
    /// Логин.
    pub username: String,
    /// Email.
    pub email: String,
    /// Пароль.
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
/// Данные для входа.
pub struct LoginRequest {
    /// Логин.
    pub username: String,
    /// Пароль.
    pub password: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
/// Данные нового поста.
pub struct NewPost {
    /// Заголовок.
    pub title: String,
    /// Текст.
    pub content: String,
    /// URL обложки; не сериализуется, если не задан.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
/// Частичное обновление поста: отправляются только заданные поля.
pub struct PostUpdate {
    /// Новый заголовок.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Новый текст.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Новая обложка.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Файл изображения для загрузки.
pub struct ImageFile {
    /// Имя файла (по нему сервер берёт расширение).
    pub file_name: String,
    /// MIME-тип, например `image/png`.
    pub content_type: String,
    /// Содержимое файла.
    pub bytes: Vec<u8>,
}

impl ImageFile {
    /// Создаёт файл, угадывая MIME-тип по расширению имени.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = guess_image_type(&file_name).to_string();
        Self {
            file_name,
            content_type,
            bytes,
        }
    }
}

fn guess_image_type(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Форматирует дату для отображения (`YYYY-MM-DD`).
pub fn display_date(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn post_summary_parses_server_payload_with_offset() {
        let raw = r#"{
            "id": 3,
            "title": "hello",
            "cover": null,
            "author": {"id": 1, "username": "ann", "email": "ann@example.com"},
            "created_at": "2026-01-02T10:00:00.123456+08:00",
            "comment_count": 2
        }"#;

        let post: PostSummary = serde_json::from_str(raw).expect("summary should parse");
        assert_eq!(post.id, 3);
        assert!(post.cover.is_none());
        assert_eq!(post.author.username, "ann");
        assert_eq!(display_date(&post.created_at), "2026-01-02");
    }

    #[test]
    fn post_without_comments_field_defaults_to_empty() {
        let raw = r#"{
            "id": 1,
            "title": "t",
            "content": "line1\nline2",
            "author": {"id": 1, "username": "ann"},
            "created_at": "2026-01-01T00:00:00Z"
        }"#;

        let post: Post = serde_json::from_str(raw).expect("post should parse");
        assert!(post.comments.is_empty());
        assert_eq!(post.author.email, "");
        assert_eq!(post.content.lines().count(), 2);
    }

    #[test]
    fn new_post_skips_missing_cover() {
        let body = serde_json::to_value(NewPost {
            title: "T".to_string(),
            content: "C".to_string(),
            cover: None,
        })
        .expect("serialize");
        assert_eq!(body, serde_json::json!({"title": "T", "content": "C"}));
    }

    #[test]
    fn post_update_sends_only_given_fields() {
        let body = serde_json::to_value(PostUpdate {
            title: Some("new".to_string()),
            ..PostUpdate::default()
        })
        .expect("serialize");
        assert_eq!(body, serde_json::json!({"title": "new"}));
    }

    #[test]
    fn image_file_guesses_content_type() {
        assert_eq!(ImageFile::new("a.JPG", vec![]).content_type, "image/jpeg");
        assert_eq!(ImageFile::new("b.webp", vec![]).content_type, "image/webp");
        assert_eq!(
            ImageFile::new("noext", vec![]).content_type,
            "application/octet-stream"
        );
    }

    #[test]
    fn display_date_uses_utc_day() {
        let at = Utc.with_ymd_and_hms(2026, 3, 9, 23, 59, 0).single().expect("valid ts");
        assert_eq!(display_date(&at), "2026-03-09");
    }
}
