use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Ошибки обращения к REST API блога.
pub enum ApiError {
    /// Ответ не получен: сеть, DNS, CORS, обрыв соединения.
    #[error("network error: {0}")]
    Network(String),

    /// Сервер ответил не-2xx статусом.
    ///
    /// `message` берётся из поля `error` тела ответа, если оно есть.
    #[error("{}", api_error_text(.status, .message))]
    Api {
        /// HTTP-статус ответа.
        status: u16,
        /// Сообщение сервера.
        message: Option<String>,
    },

    /// Ответ получен, но тело не удалось разобрать.
    #[error("decode error: {0}")]
    Decode(String),

    /// Запрос не удалось собрать, на сервер ничего не отправлено.
    #[error("invalid request: {0}")]
    Request(String),
}

fn api_error_text(status: &u16, message: &Option<String>) -> String {
    match message {
        Some(message) => format!("http error {status}: {message}"),
        None => format!("http status {status}"),
    }
}

/// Результат операций API-клиента.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// HTTP-статус, если сервер вообще ответил.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Сообщение из поля `error` ответа сервера.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Сервер отклонил запрос из-за авторизации (401/403).
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401 | 403))
    }
}

#[derive(Debug, Error)]
/// Ошибки постоянного хранилища сессии.
pub enum StorageError {
    /// Ошибка файловой системы.
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    /// Не удалось сериализовать значение.
    #[error("failed to serialize session: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Хранилище недоступно (например, нет `localStorage`).
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Пустой токен: такую сессию нельзя сохранить.
    #[error("session token is empty")]
    EmptyToken,
}
