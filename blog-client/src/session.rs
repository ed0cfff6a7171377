//! Сессия клиента: пара «пользователь + токен» и её постоянное хранилище.
//!
//! Хранилище устроено как `localStorage`: строковые значения под
//! фиксированными ключами. Любая мутация сначала пишется в хранилище и
//! только потом становится видна в памяти.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use tracing::warn;

use crate::error::StorageError;
use crate::models::User;

/// Ключ, под которым хранится токен.
pub const TOKEN_KEY: &str = "token";
/// Ключ, под которым хранится пользователь (JSON).
pub const USER_KEY: &str = "user";

/// Постоянное key-value хранилище строк.
pub trait SessionStorage {
    /// Читает значение; `Ok(None)`, если ключа нет.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;
    /// Записывает значение.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
    /// Удаляет ключ; отсутствие ключа ошибкой не считается.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Аутентифицированный пользователь вместе с его токеном.
pub struct Session {
    auth: Option<(User, String)>,
}

impl Session {
    /// Пустая (анонимная) сессия.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Текущий пользователь.
    pub fn user(&self) -> Option<&User> {
        self.auth.as_ref().map(|(user, _)| user)
    }

    /// Текущий bearer-токен.
    pub fn token(&self) -> Option<&str> {
        self.auth.as_ref().map(|(_, token)| token.as_str())
    }

    /// Есть ли пользователь в сессии.
    pub fn is_authenticated(&self) -> bool {
        self.auth.is_some()
    }
}

#[derive(Debug, Clone)]
/// Хранилище сессии с write-through записью в `SessionStorage`.
pub struct SessionStore<S> {
    storage: S,
    session: Session,
}

impl<S: SessionStorage> SessionStore<S> {
    /// Читает сохранённую сессию.
    ///
    /// Если токена или пользователя нет, либо пользователь не разбирается,
    /// сессия считается пустой, а остатки в хранилище удаляются.
    pub fn load(storage: S) -> Self {
        let session = match read_session(&storage) {
            Ok(Some(auth)) => Session { auth: Some(auth) },
            Ok(None) => Session::anonymous(),
            Err(err) => {
                warn!(error = %err, "failed to read persisted session, starting anonymous");
                Session::anonymous()
            }
        };

        let store = Self { storage, session };
        if !store.session.is_authenticated() {
            store.purge_leftovers();
        }
        store
    }

    /// Текущая сессия.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Текущий пользователь.
    pub fn user(&self) -> Option<&User> {
        self.session.user()
    }

    /// Текущий токен.
    pub fn token(&self) -> Option<&str> {
        self.session.token()
    }

    /// Сохраняет пользователя и токен, затем делает их видимыми.
    ///
    /// Токен обрезается по краям так же, как при чтении; пустой токен
    /// отклоняется. При ошибке записи сессия в памяти не меняется, а
    /// частично записанное значение откатывается.
    pub fn set_session(&mut self, user: User, token: String) -> Result<(), StorageError> {
        let token = parse_token(&token).ok_or(StorageError::EmptyToken)?;
        let raw_user = serde_json::to_string(&user)?;

        self.storage.write(TOKEN_KEY, &token)?;
        if let Err(err) = self.storage.write(USER_KEY, &raw_user) {
            if let Err(rollback) = self.restore_persisted() {
                warn!(error = %rollback, "failed to roll back partially written session");
            }
            return Err(err);
        }

        self.session = Session {
            auth: Some((user, token)),
        };
        Ok(())
    }

    /// Удаляет сессию из хранилища и из памяти.
    ///
    /// Память очищается всегда; возвращается первая ошибка хранилища.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.session = Session::anonymous();

        let token_result = self.storage.remove(TOKEN_KEY);
        let user_result = self.storage.remove(USER_KEY);
        token_result.and(user_result)
    }

    /// Доступ к хранилищу.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn restore_persisted(&self) -> Result<(), StorageError> {
        match self.session.auth.as_ref() {
            Some((_, token)) => self.storage.write(TOKEN_KEY, token),
            None => self.storage.remove(TOKEN_KEY),
        }
    }

    fn purge_leftovers(&self) {
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(err) = self.storage.remove(key) {
                warn!(key, error = %err, "failed to remove stale session key");
            }
        }
    }
}

fn parse_token(raw: &str) -> Option<String> {
    let token = raw.trim().to_string();
    if token.is_empty() {
        return None;
    }
    Some(token)
}

fn parse_user(raw: &str) -> Option<User> {
    serde_json::from_str::<User>(raw).ok()
}

fn read_session<S: SessionStorage>(storage: &S) -> Result<Option<(User, String)>, StorageError> {
    let token = storage.read(TOKEN_KEY)?.as_deref().and_then(parse_token);
    let user = storage.read(USER_KEY)?;

    match (token, user) {
        (Some(token), Some(raw_user)) => match parse_user(&raw_user) {
            Some(user) => Ok(Some((user, token))),
            None => {
                warn!("persisted user is malformed, discarding session");
                Ok(None)
            }
        },
        (None, None) => Ok(None),
        _ => {
            warn!("persisted session is incomplete, discarding it");
            Ok(None)
        }
    }
}

#[derive(Debug, Default)]
/// Хранилище в памяти: для тестов и одноразовых запусков.
pub struct MemoryStorage {
    values: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Пустое хранилище.
    pub fn new() -> Self {
        Self::default()
    }

    /// Хранилище с заранее заданными значениями.
    pub fn with_values<'a>(values: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let values = values
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self {
            values: RefCell::new(values),
        }
    }
}

impl SessionStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.values.borrow_mut().remove(key);
        Ok(())
    }
}

#[derive(Debug, Clone)]
/// Хранилище в каталоге: один файл на ключ.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Хранилище в каталоге `dir`; каталог создаётся при первой записи.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl SessionStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path(key), value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
