use async_trait::async_trait;
use blog_client::{
    ApiError, ApiResult, AuthResponse, BlogApi, Comment, ImageFile, LikeStatus, LoginRequest,
    NewPost, Post, PostSummary, PostUpdate, RegisterRequest, UploadedImage, User, join_url, paths,
};
use gloo_net::http::{Method, Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use wasm_bindgen::JsValue;

const API_BASE_URL: &str = match option_env!("BLOG_API_URL") {
    Some(value) => value,
    None => "http://localhost:8000",
};

#[derive(Debug, Serialize)]
struct CommentRequest<'a> {
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// `BlogApi` поверх `fetch` браузера.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct BrowserApi;

fn request(method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
    let builder = RequestBuilder::new(&join_url(API_BASE_URL, path)).method(method);
    match token {
        Some(token) => builder.header("Authorization", &format!("Bearer {token}")),
        None => builder,
    }
}

async fn decode_error(response: Response) -> ApiError {
    let status = response.status();
    let message = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.error);
    ApiError::Api { status, message }
}

async fn check(response: Result<Response, gloo_net::Error>) -> ApiResult<Response> {
    let response = response.map_err(|err| ApiError::Network(err.to_string()))?;
    if !response.ok() {
        return Err(decode_error(response).await);
    }
    Ok(response)
}

async fn read_json<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    response
        .json::<T>()
        .await
        .map_err(|err| ApiError::Decode(err.to_string()))
}

async fn send(builder: RequestBuilder) -> ApiResult<Response> {
    check(builder.send().await).await
}

async fn send_request(request: Request) -> ApiResult<Response> {
    check(request.send().await).await
}

async fn send_json<TReq, TRes>(builder: RequestBuilder, body: &TReq) -> ApiResult<TRes>
where
    TReq: Serialize + ?Sized,
    TRes: DeserializeOwned,
{
    let request = builder
        .json(body)
        .map_err(|err| ApiError::Request(err.to_string()))?;
    read_json(send_request(request).await?).await
}

fn form_data(file: &ImageFile) -> Result<web_sys::FormData, JsValue> {
    let bytes = js_sys::Uint8Array::from(file.bytes.as_slice());
    let parts = js_sys::Array::of1(&bytes);
    let options = web_sys::BlobPropertyBag::new();
    options.set_type(&file.content_type);
    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;

    let form = web_sys::FormData::new()?;
    form.append_with_blob_and_filename("file", &blob, &file.file_name)?;
    Ok(form)
}

#[async_trait(?Send)]
impl BlogApi for BrowserApi {
    async fn register(
        &self,
        token: Option<&str>,
        request_body: &RegisterRequest,
    ) -> ApiResult<AuthResponse> {
        send_json(request(Method::POST, paths::REGISTER, token), request_body).await
    }

    async fn login(
        &self,
        token: Option<&str>,
        request_body: &LoginRequest,
    ) -> ApiResult<AuthResponse> {
        send_json(request(Method::POST, paths::LOGIN, token), request_body).await
    }

    async fn get_profile(&self, token: Option<&str>) -> ApiResult<User> {
        read_json(send(request(Method::GET, paths::PROFILE, token)).await?).await
    }

    async fn list_posts(&self, token: Option<&str>) -> ApiResult<Vec<PostSummary>> {
        read_json(send(request(Method::GET, paths::POSTS, token)).await?).await
    }

    async fn get_post(&self, token: Option<&str>, id: i64) -> ApiResult<Post> {
        read_json(send(request(Method::GET, &paths::post(id), token)).await?).await
    }

    async fn create_post(&self, token: Option<&str>, post: &NewPost) -> ApiResult<Post> {
        send_json(request(Method::POST, paths::POSTS, token), post).await
    }

    async fn update_post(
        &self,
        token: Option<&str>,
        id: i64,
        update: &PostUpdate,
    ) -> ApiResult<Post> {
        send_json(request(Method::PUT, &paths::post(id), token), update).await
    }

    async fn delete_post(&self, token: Option<&str>, id: i64) -> ApiResult<()> {
        send(request(Method::DELETE, &paths::post(id), token)).await?;
        Ok(())
    }

    async fn add_comment(
        &self,
        token: Option<&str>,
        post_id: i64,
        content: &str,
    ) -> ApiResult<Comment> {
        send_json(
            request(Method::POST, &paths::comments(post_id), token),
            &CommentRequest { content },
        )
        .await
    }

    async fn upload_image(
        &self,
        token: Option<&str>,
        file: &ImageFile,
    ) -> ApiResult<UploadedImage> {
        let form = form_data(file)
            .map_err(|err| ApiError::Request(format!("failed to build form: {err:?}")))?;
        let request = request(Method::POST, paths::UPLOAD, token)
            .body(form)
            .map_err(|err| ApiError::Request(err.to_string()))?;
        read_json(send_request(request).await?).await
    }

    async fn toggle_post_like(&self, token: Option<&str>, id: i64) -> ApiResult<LikeStatus> {
        read_json(send(request(Method::POST, &paths::post_like(id), token)).await?).await
    }

    async fn toggle_comment_like(
        &self,
        token: Option<&str>,
        comment_id: i64,
    ) -> ApiResult<LikeStatus> {
        read_json(send(request(Method::POST, &paths::comment_like(comment_id), token)).await?)
            .await
    }
}
