use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, multipart};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::debug;

use crate::api::{BlogApi, join_url, paths};
use crate::error::{ApiError, ApiResult};
use crate::models::{
    AuthResponse, Comment, ImageFile, LikeStatus, LoginRequest, NewPost, Post, PostSummary,
    PostUpdate, RegisterRequest, UploadedImage, User,
};

#[derive(Debug, Serialize)]
struct CommentRequestDto<'a> {
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorResponseDto {
    error: Option<String>,
}

#[derive(Debug, Clone)]
/// HTTP-клиент для REST API блога поверх `reqwest`.
pub struct HttpClient {
    base_url: String,
    client: Client,
}

impl HttpClient {
    /// Создаёт клиент с базовым URL сервера, например `http://localhost:8000`.
    ///
    /// Таймауты не задаются: используются значения транспорта по умолчанию.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: Client::new(),
        }
    }

    /// Базовый URL сервера.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        debug!(%method, path, authorized = token.is_some(), "api request");

        let request = self.client.request(method, join_url(&self.base_url, path));
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn decode_error(response: reqwest::Response) -> ApiError {
        let status = response.status().as_u16();
        let message = response
            .json::<ErrorResponseDto>()
            .await
            .ok()
            .and_then(|body| body.error);
        ApiError::Api { status, message }
    }

    async fn execute(request: RequestBuilder) -> ApiResult<reqwest::Response> {
        let response = request
            .send()
            .await
            .map_err(|err| ApiError::Network(err.to_string()))?;
        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }
        Ok(response)
    }

    async fn read_json<T: DeserializeOwned>(request: RequestBuilder) -> ApiResult<T> {
        Self::execute(request)
            .await?
            .json::<T>()
            .await
            .map_err(|err| ApiError::Decode(err.to_string()))
    }

    /// универсальный helper для отправки запросов с json-payload
    async fn send_json<TReq, TRes>(
        &self,
        method: Method,
        path: &str,
        body: &TReq,
        token: Option<&str>,
    ) -> ApiResult<TRes>
    where
        TReq: Serialize + ?Sized,
        TRes: DeserializeOwned,
    {
        Self::read_json(self.request(method, path, token).json(body)).await
    }
}

#[async_trait(?Send)]
impl BlogApi for HttpClient {
    async fn register(
        &self,
        token: Option<&str>,
        request: &RegisterRequest,
    ) -> ApiResult<AuthResponse> {
        self.send_json(Method::POST, paths::REGISTER, request, token)
            .await
    }

    async fn login(&self, token: Option<&str>, request: &LoginRequest) -> ApiResult<AuthResponse> {
        self.send_json(Method::POST, paths::LOGIN, request, token)
            .await
    }

    async fn get_profile(&self, token: Option<&str>) -> ApiResult<User> {
        Self::read_json(self.request(Method::GET, paths::PROFILE, token)).await
    }

    async fn list_posts(&self, token: Option<&str>) -> ApiResult<Vec<PostSummary>> {
        Self::read_json(self.request(Method::GET, paths::POSTS, token)).await
    }

    async fn get_post(&self, token: Option<&str>, id: i64) -> ApiResult<Post> {
        Self::read_json(self.request(Method::GET, &paths::post(id), token)).await
    }

    async fn create_post(&self, token: Option<&str>, post: &NewPost) -> ApiResult<Post> {
        self.send_json(Method::POST, paths::POSTS, post, token)
            .await
    }

    async fn update_post(
        &self,
        token: Option<&str>,
        id: i64,
        update: &PostUpdate,
    ) -> ApiResult<Post> {
        self.send_json(Method::PUT, &paths::post(id), update, token)
            .await
    }

    async fn delete_post(&self, token: Option<&str>, id: i64) -> ApiResult<()> {
        Self::execute(self.request(Method::DELETE, &paths::post(id), token)).await?;
        Ok(())
    }

    async fn add_comment(
        &self,
        token: Option<&str>,
        post_id: i64,
        content: &str,
    ) -> ApiResult<Comment> {
        let payload = CommentRequestDto { content };
        self.send_json(Method::POST, &paths::comments(post_id), &payload, token)
            .await
    }

    async fn upload_image(
        &self,
        token: Option<&str>,
        file: &ImageFile,
    ) -> ApiResult<UploadedImage> {
        let part = multipart::Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(&file.content_type)
            .map_err(|err| ApiError::Request(format!("invalid content type: {err}")))?;
        let form = multipart::Form::new().part("file", part);

        Self::read_json(
            self.request(Method::POST, paths::UPLOAD, token)
                .multipart(form),
        )
        .await
    }

    async fn toggle_post_like(&self, token: Option<&str>, id: i64) -> ApiResult<LikeStatus> {
        Self::read_json(self.request(Method::POST, &paths::post_like(id), token)).await
    }

    async fn toggle_comment_like(
        &self,
        token: Option<&str>,
        comment_id: i64,
    ) -> ApiResult<LikeStatus> {
        Self::read_json(self.request(Method::POST, &paths::comment_like(comment_id), token)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_kept_as_given() {
        let client = HttpClient::new("http://localhost:8000/");
        assert_eq!(client.base_url(), "http://localhost:8000/");
    }

    #[tokio::test]
    async fn invalid_content_type_fails_before_sending() {
        let client = HttpClient::new("http://127.0.0.1:9");
        let file = ImageFile {
            file_name: "cover.png".to_string(),
            content_type: "not a mime".to_string(),
            bytes: vec![1, 2, 3],
        };

        let err = client.upload_image(None, &file).await.expect_err("bad mime");

        assert!(matches!(err, ApiError::Request(_)), "unexpected error: {err:?}");
        assert_eq!(err.status(), None);
    }

    #[test]
    fn error_body_without_error_field_has_no_message() {
        let body: ErrorResponseDto =
            serde_json::from_str(r#"{"title": ["This field is required."]}"#).expect("parse");
        assert!(body.error.is_none());
    }
}
