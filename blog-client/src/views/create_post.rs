use tracing::{debug, info};

use crate::api::BlogApi;
use crate::error::{ApiError, ApiResult};
use crate::models::{ImageFile, NewPost, Post, UploadedImage};
use crate::router::Route;
use crate::session::Session;

use super::{Generation, LoadTicket, validate_non_empty_fields};

/// Что показывается вместо формы без входа.
pub const SIGN_IN_REQUIRED: &str = "Сначала войдите в аккаунт";
/// Текст блокирующего уведомления о неудачной загрузке.
pub const UPLOAD_FAILED: &str = "Не удалось загрузить изображение";
const FIELDS_REQUIRED: &str = "Заполните заголовок и текст";
const PUBLISH_FAILED: &str = "Не удалось опубликовать пост";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Поля формы нового поста.
pub struct CreatePostForm {
    /// Заголовок.
    pub title: String,
    /// Текст.
    pub content: String,
    /// URL обложки; заполняется после загрузки файла.
    pub cover: Option<String>,
}

#[derive(Debug, Clone, Default)]
/// Экран публикации поста.
///
/// Загрузка обложки запускается сразу при выборе файла и не зависит от
/// отправки формы.
pub struct CreatePostView {
    /// Поля формы; фронтенд пишет в них напрямую.
    pub form: CreatePostForm,
    uploads: Generation,
    uploading: bool,
    alert: Option<String>,
    error: Option<String>,
    submitting: bool,
}

impl CreatePostView {
    /// Пустая форма.
    pub fn new() -> Self {
        Self::default()
    }

    /// Без входа экран показывает только сообщение, без формы.
    pub fn is_blocked(&self, session: &Session) -> bool {
        session.user().is_none()
    }

    /// Идёт ли загрузка обложки.
    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    /// Идёт ли публикация.
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Ошибка публикации.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Забирает блокирующее уведомление; фронтенд показывает его один раз.
    pub fn take_alert(&mut self) -> Option<String> {
        self.alert.take()
    }

    /// Начинает загрузку обложки. Более поздний выбор файла отменяет
    /// результат более раннего.
    pub fn begin_upload(&mut self, session: &Session) -> Option<LoadTicket> {
        if self.is_blocked(session) {
            return None;
        }
        self.uploading = true;
        Some(self.uploads.next())
    }

    /// Применяет результат загрузки. При ошибке поле обложки не меняется.
    pub fn finish_upload(&mut self, ticket: LoadTicket, result: ApiResult<UploadedImage>) {
        if !self.uploads.is_current(ticket) {
            debug!("dropping result of a superseded upload");
            return;
        }

        self.uploading = false;
        match result {
            Ok(image) => self.form.cover = Some(image.url),
            Err(err) => {
                debug!(error = %err, "cover upload failed");
                self.alert = Some(UPLOAD_FAILED.to_string());
            }
        }
    }

    /// Загружает обложку.
    pub async fn upload_cover<A: BlogApi + ?Sized>(
        &mut self,
        api: &A,
        session: &Session,
        file: &ImageFile,
    ) {
        let Some(ticket) = self.begin_upload(session) else {
            return;
        };
        let result = api.upload_image(session.token(), file).await;
        self.finish_upload(ticket, result);
    }

    /// Проверяет форму и готовит пост к отправке.
    pub fn begin_submit(&mut self, session: &Session) -> Option<NewPost> {
        if self.is_blocked(session) {
            return None;
        }

        self.error = None;
        if let Err(message) = validate_non_empty_fields(
            &[self.form.title.as_str(), self.form.content.as_str()],
            FIELDS_REQUIRED,
        ) {
            self.error = Some(message.to_string());
            return None;
        }

        self.submitting = true;
        Some(NewPost {
            title: self.form.title.clone(),
            content: self.form.content.clone(),
            cover: self.form.cover.clone().filter(|cover| !cover.is_empty()),
        })
    }

    /// Обрабатывает ответ. При успехе возвращает маршрут на список постов;
    /// при ошибке форма остаётся заполненной.
    pub fn finish_submit(&mut self, result: ApiResult<Post>) -> Option<Route> {
        self.submitting = false;
        match result {
            Ok(post) => {
                info!(post_id = post.id, "post published");
                Some(Route::PostList)
            }
            Err(err) => {
                self.error = Some(failure_message(&err));
                None
            }
        }
    }

    /// Публикует пост.
    pub async fn submit<A: BlogApi + ?Sized>(&mut self, api: &A, session: &Session) -> Option<Route> {
        let post = self.begin_submit(session)?;
        let result = api.create_post(session.token(), &post).await;
        self.finish_submit(result)
    }
}

fn failure_message(err: &ApiError) -> String {
    match err.server_message() {
        Some(message) => format!("{PUBLISH_FAILED}: {message}"),
        None => PUBLISH_FAILED.to_string(),
    }
}
