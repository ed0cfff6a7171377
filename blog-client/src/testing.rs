//! In-memory фейк REST API для тестов представлений.

use std::cell::RefCell;
use std::collections::VecDeque;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::api::{BlogApi, paths};
use crate::error::{ApiError, ApiResult};
use crate::models::{
    AuthResponse, Comment, ImageFile, LikeStatus, LoginRequest, NewPost, Post, PostSummary,
    PostUpdate, RegisterRequest, UploadedImage, User,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RecordedCall {
    pub(crate) method: &'static str,
    pub(crate) path: String,
    pub(crate) token: Option<String>,
}

#[derive(Debug, Default)]
struct Backend {
    users: Vec<(User, String)>,
    posts: Vec<Post>,
    next_id: i64,
    likes: Vec<(i64, i64)>,
}

#[derive(Debug, Default)]
pub(crate) struct FakeApi {
    backend: RefCell<Backend>,
    calls: RefCell<Vec<RecordedCall>>,
    failures: RefCell<VecDeque<ApiError>>,
}

pub(crate) fn token_for(user_id: i64) -> String {
    format!("token-{user_id}")
}

impl FakeApi {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Регистрирует пользователя напрямую в фейке.
    pub(crate) fn with_user(self, username: &str, password: &str) -> Self {
        {
            let mut backend = self.backend.borrow_mut();
            backend.next_id += 1;
            let user = User {
                id: backend.next_id,
                username: username.to_string(),
                email: format!("{username}@example.com"),
            };
            backend.users.push((user, password.to_string()));
        }
        self
    }

    /// Добавляет пост от имени пользователя `author_id`.
    pub(crate) fn with_post(self, author_id: i64, title: &str, content: &str) -> Self {
        {
            let mut backend = self.backend.borrow_mut();
            let author = backend
                .users
                .iter()
                .find(|(user, _)| user.id == author_id)
                .map(|(user, _)| user.clone())
                .expect("author must exist in fake backend");
            backend.next_id += 1;
            let id = backend.next_id;
            backend.posts.insert(
                0,
                Post {
                    id,
                    title: title.to_string(),
                    content: content.to_string(),
                    cover: None,
                    author,
                    created_at: fixed_time(),
                    comment_count: 0,
                    comments: Vec::new(),
                },
            );
        }
        self
    }

    /// Следующий вызов завершится указанной ошибкой.
    pub(crate) fn fail_next(&self, err: ApiError) {
        self.failures.borrow_mut().push_back(err);
    }

    pub(crate) fn calls(&self) -> Vec<RecordedCall> {
        self.calls.borrow().clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    pub(crate) fn user(&self, username: &str) -> User {
        self.backend
            .borrow()
            .users
            .iter()
            .find(|(user, _)| user.username == username)
            .map(|(user, _)| user.clone())
            .expect("user must exist in fake backend")
    }

    fn record(&self, method: &'static str, path: String, token: Option<&str>) -> ApiResult<()> {
        self.calls.borrow_mut().push(RecordedCall {
            method,
            path,
            token: token.map(str::to_string),
        });
        match self.failures.borrow_mut().pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn authenticate(&self, token: Option<&str>) -> ApiResult<User> {
        let backend = self.backend.borrow();
        token
            .and_then(|token| {
                backend
                    .users
                    .iter()
                    .find(|(user, _)| token_for(user.id) == token)
                    .map(|(user, _)| user.clone())
            })
            .ok_or_else(|| api_error(401, "Authentication credentials were not provided."))
    }

    fn find_post(&self, id: i64) -> ApiResult<Post> {
        self.backend
            .borrow()
            .posts
            .iter()
            .find(|post| post.id == id)
            .cloned()
            .ok_or_else(|| api_error(404, "post not found"))
    }
}

pub(crate) fn fixed_time() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 12, 0, 0)
        .single()
        .expect("valid ts")
}

pub(crate) fn api_error(status: u16, message: &str) -> ApiError {
    ApiError::Api {
        status,
        message: Some(message.to_string()),
    }
}

fn summary(post: &Post) -> PostSummary {
    PostSummary {
        id: post.id,
        title: post.title.clone(),
        cover: post.cover.clone(),
        author: post.author.clone(),
        created_at: post.created_at,
        comment_count: post.comment_count,
    }
}

#[async_trait(?Send)]
impl BlogApi for FakeApi {
    async fn register(
        &self,
        token: Option<&str>,
        request: &RegisterRequest,
    ) -> ApiResult<AuthResponse> {
        self.record("POST", paths::REGISTER.to_string(), token)?;
        let mut backend = self.backend.borrow_mut();
        if backend
            .users
            .iter()
            .any(|(user, _)| user.username == request.username)
        {
            return Err(api_error(400, "username already exists"));
        }
        backend.next_id += 1;
        let user = User {
            id: backend.next_id,
            username: request.username.clone(),
            email: request.email.clone(),
        };
        backend.users.push((user.clone(), request.password.clone()));
        Ok(AuthResponse {
            token: token_for(user.id),
            user,
        })
    }

    async fn login(&self, token: Option<&str>, request: &LoginRequest) -> ApiResult<AuthResponse> {
        self.record("POST", paths::LOGIN.to_string(), token)?;
        self.backend
            .borrow()
            .users
            .iter()
            .find(|(user, password)| {
                user.username == request.username && *password == request.password
            })
            .map(|(user, _)| AuthResponse {
                token: token_for(user.id),
                user: user.clone(),
            })
            .ok_or_else(|| api_error(400, "invalid username or password"))
    }

    async fn get_profile(&self, token: Option<&str>) -> ApiResult<User> {
        self.record("GET", paths::PROFILE.to_string(), token)?;
        self.authenticate(token)
    }

    async fn list_posts(&self, token: Option<&str>) -> ApiResult<Vec<PostSummary>> {
        self.record("GET", paths::POSTS.to_string(), token)?;
        Ok(self.backend.borrow().posts.iter().map(summary).collect())
    }

    async fn get_post(&self, token: Option<&str>, id: i64) -> ApiResult<Post> {
        self.record("GET", paths::post(id), token)?;
        self.find_post(id)
    }

    async fn create_post(&self, token: Option<&str>, post: &NewPost) -> ApiResult<Post> {
        self.record("POST", paths::POSTS.to_string(), token)?;
        let author = self.authenticate(token)?;
        let mut backend = self.backend.borrow_mut();
        backend.next_id += 1;
        let created = Post {
            id: backend.next_id,
            title: post.title.clone(),
            content: post.content.clone(),
            cover: post.cover.clone(),
            author,
            created_at: fixed_time(),
            comment_count: 0,
            comments: Vec::new(),
        };
        backend.posts.insert(0, created.clone());
        Ok(created)
    }

    async fn update_post(
        &self,
        token: Option<&str>,
        id: i64,
        update: &PostUpdate,
    ) -> ApiResult<Post> {
        self.record("PUT", paths::post(id), token)?;
        let author = self.authenticate(token)?;
        let mut backend = self.backend.borrow_mut();
        let post = backend
            .posts
            .iter_mut()
            .find(|post| post.id == id && post.author.id == author.id)
            .ok_or_else(|| api_error(404, "no permission or post not found"))?;
        if let Some(title) = &update.title {
            post.title = title.clone();
        }
        if let Some(content) = &update.content {
            post.content = content.clone();
        }
        if let Some(cover) = &update.cover {
            post.cover = Some(cover.clone());
        }
        Ok(post.clone())
    }

    async fn delete_post(&self, token: Option<&str>, id: i64) -> ApiResult<()> {
        self.record("DELETE", paths::post(id), token)?;
        let author = self.authenticate(token)?;
        let mut backend = self.backend.borrow_mut();
        let before = backend.posts.len();
        backend
            .posts
            .retain(|post| !(post.id == id && post.author.id == author.id));
        if backend.posts.len() == before {
            return Err(api_error(404, "no permission or post not found"));
        }
        Ok(())
    }

    async fn add_comment(
        &self,
        token: Option<&str>,
        post_id: i64,
        content: &str,
    ) -> ApiResult<Comment> {
        self.record("POST", paths::comments(post_id), token)?;
        let author = self.authenticate(token)?;
        let mut backend = self.backend.borrow_mut();
        backend.next_id += 1;
        let comment = Comment {
            id: backend.next_id,
            content: content.to_string(),
            author,
            created_at: fixed_time(),
        };
        let post = backend
            .posts
            .iter_mut()
            .find(|post| post.id == post_id)
            .ok_or_else(|| api_error(404, "post not found"))?;
        post.comments.push(comment.clone());
        post.comment_count += 1;
        Ok(comment)
    }

    async fn upload_image(
        &self,
        token: Option<&str>,
        file: &ImageFile,
    ) -> ApiResult<UploadedImage> {
        self.record("POST", paths::UPLOAD.to_string(), token)?;
        self.authenticate(token)?;
        Ok(UploadedImage {
            url: format!("https://cdn.example.com/blog/images/{}", file.file_name),
        })
    }

    async fn toggle_post_like(&self, token: Option<&str>, id: i64) -> ApiResult<LikeStatus> {
        self.record("POST", paths::post_like(id), token)?;
        let user = self.authenticate(token)?;
        self.find_post(id)?;
        let mut backend = self.backend.borrow_mut();
        let key = (user.id, id);
        let liked = if backend.likes.contains(&key) {
            backend.likes.retain(|like| *like != key);
            false
        } else {
            backend.likes.push(key);
            true
        };
        let like_count = backend.likes.iter().filter(|(_, post)| *post == id).count() as u64;
        Ok(LikeStatus { liked, like_count })
    }

    async fn toggle_comment_like(
        &self,
        token: Option<&str>,
        comment_id: i64,
    ) -> ApiResult<LikeStatus> {
        self.record("POST", paths::comment_like(comment_id), token)?;
        self.authenticate(token)?;
        Ok(LikeStatus {
            liked: true,
            like_count: 1,
        })
    }
}
