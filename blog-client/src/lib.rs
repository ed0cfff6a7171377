//! Клиентская библиотека блога.
//!
//! Содержит всё, что не зависит от способа отрисовки:
//! - модели и ошибки REST API;
//! - трейт транспорта `BlogApi` и его реализацию на `reqwest` (`HttpClient`,
//!   фича `http`);
//! - хранилище сессии с записью «насквозь» в постоянное хранилище;
//! - маршруты и навигацию;
//! - состояние четырёх экранов (`views`).
//!
//! Фронтенды (`blog-cli`, `blog-wasm`) только отрисовывают это состояние и
//! выполняют запросы.
#![warn(missing_docs)]

mod api;
mod error;
#[cfg(feature = "http")]
mod http_client;
mod models;
pub mod router;
pub mod session;
#[cfg(test)]
mod testing;
pub mod views;

pub use api::{BlogApi, join_url, paths};
pub use error::{ApiError, ApiResult, StorageError};
#[cfg(feature = "http")]
pub use http_client::HttpClient;
pub use models::{
    AuthResponse, Comment, ImageFile, LikeStatus, LoginRequest, NewPost, Post, PostSummary,
    PostUpdate, RegisterRequest, UploadedImage, User, display_date,
};
pub use router::{NavItem, Route, Shell, nav_items};
pub use session::{FileStorage, MemoryStorage, Session, SessionStorage, SessionStore};
