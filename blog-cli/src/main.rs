use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result, anyhow, bail};
use blog_client::views::{AuthMode, AuthView, CreatePostView, PostDetailView, PostListView};
use blog_client::{
    ApiError, BlogApi, FileStorage, HttpClient, ImageFile, PostUpdate, Route, SessionStore, Shell,
};
use clap::{Parser, Subcommand};
use tracing::{debug, info};

mod logging;
mod render;
mod settings;

use logging::init_logging;
use settings::Settings;

#[derive(Debug, Parser)]
#[command(name = "blog-cli", version, about = "Терминальный клиент блога")]
struct Cli {
    /// Адрес REST API (перекрывает BLOG_API_URL).
    #[arg(long, global = true)]
    server: Option<String>,

    /// Каталог с сохранённой сессией (перекрывает BLOG_SESSION_DIR).
    #[arg(long, global = true)]
    session_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Регистрация пользователя.
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Вход пользователя.
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// Выход: сессия удаляется только локально.
    Logout,
    /// Профиль текущего пользователя.
    Whoami,
    /// Открывает страницу по пути: `/`, `/auth`, `/post/:id`, `/create`.
    Open { path: String },
    /// Список постов.
    List,
    /// Пост с комментариями.
    Show {
        #[arg(long)]
        id: i64,
    },
    /// Комментарий к посту (требует входа).
    Comment {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        content: String,
    },
    /// Публикация поста (требует входа).
    ///
    /// `--cover-file` сначала загружает файл и берёт обложку из ответа.
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long, conflicts_with = "cover_file")]
        cover: Option<String>,
        #[arg(long)]
        cover_file: Option<PathBuf>,
    },
    /// Частичное обновление поста (требует входа).
    Update {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        cover: Option<String>,
    },
    /// Удаление поста (только автор).
    Delete {
        #[arg(long)]
        id: i64,
    },
    /// Поставить или снять лайк поста.
    Like {
        #[arg(long)]
        id: i64,
    },
    /// Поставить или снять лайк комментария.
    LikeComment {
        #[arg(long)]
        id: i64,
    },
    /// Загрузка изображения; печатает URL.
    Upload {
        #[arg(long)]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Ошибка: {err}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let settings = Settings::from_env()?.with_overrides(cli.server, cli.session_dir);

    init_logging(&settings.log_level)?;

    debug!(
        api_url = %settings.api_url,
        session_dir = %settings.session_dir.display(),
        "settings loaded"
    );

    let api = HttpClient::new(settings.api_url.clone());
    let mut session = SessionStore::load(FileStorage::new(&settings.session_dir));

    match cli.command {
        Command::Register {
            username,
            email,
            password,
        } => {
            let mut view = AuthView::new();
            view.toggle_mode();
            view.form.username = username;
            view.form.email = email;
            view.form.password = password;
            authenticate(&mut view, &api, &mut session).await?;
            println!("Регистрация успешна");
            println!("{}", render::nav_bar(session.session()));
        }
        Command::Login { username, password } => {
            let mut view = AuthView::new();
            view.form.username = username;
            view.form.password = password;
            authenticate(&mut view, &api, &mut session).await?;
            println!("Вход выполнен");
            println!("{}", render::nav_bar(session.session()));
        }
        Command::Logout => {
            Shell::new("/")
                .logout(&mut session)
                .context("не удалось удалить сохранённую сессию")?;
            info!("session cleared");
            println!("Вы вышли");
            println!("{}", render::nav_bar(session.session()));
        }
        Command::Whoami => {
            let user = api
                .get_profile(session.token())
                .await
                .map_err(map_api_error)?;
            println!("id: {}", user.id);
            println!("username: {}", user.username);
            println!("email: {}", user.email);
        }
        Command::Open { path } => {
            let shell = Shell::new(&path);
            println!("{}", render::nav_bar(session.session()));
            println!();
            match shell.route() {
                Some(route) => println!("{}", render_route(route, &api, &session).await),
                None => println!("Страница не найдена: {}", shell.path()),
            }
        }
        Command::List => {
            println!("{}", render_route(Route::PostList, &api, &session).await);
        }
        Command::Show { id } => {
            println!("{}", render_route(Route::PostDetail(id), &api, &session).await);
        }
        Command::Comment { id, content } => {
            let mut view = PostDetailView::new(id);
            if !view.can_comment(session.session()) {
                bail!("комментировать могут только вошедшие пользователи: выполните `blog-cli login ...`");
            }
            view.comment_draft = content;
            if view.comment_draft.trim().is_empty() {
                bail!("комментарий не может быть пустым");
            }
            view.submit_comment(&api, session.session()).await;
            if let Some(error) = view.comment_error() {
                bail!("{error}");
            }
            println!("{}", render::post_detail(&view, session.session()));
        }
        Command::Create {
            title,
            content,
            cover,
            cover_file,
        } => {
            let mut view = CreatePostView::new();
            if view.is_blocked(session.session()) {
                bail!("{}", render::create_post(&view, session.session()));
            }
            view.form.cover = cover;
            if let Some(path) = cover_file {
                let file = read_image(&path)?;
                view.upload_cover(&api, session.session(), &file).await;
                if let Some(alert) = view.take_alert() {
                    bail!("{alert}");
                }
            }
            view.form.title = title;
            view.form.content = content;

            if view.submit(&api, session.session()).await.is_none() {
                bail!("{}", view.error().unwrap_or("не удалось опубликовать пост"));
            }
            info!(title = %view.form.title, "post published");
            println!("Пост опубликован");
            println!();
            println!("{}", render_route(Route::PostList, &api, &session).await);
        }
        Command::Update {
            id,
            title,
            content,
            cover,
        } => {
            let update = PostUpdate {
                title,
                content,
                cover,
            };
            if update == PostUpdate::default() {
                bail!("укажите хотя бы одно из --title, --content, --cover");
            }
            api.update_post(session.token(), id, &update)
                .await
                .map_err(map_api_error)?;
            println!("{}", render_route(Route::PostDetail(id), &api, &session).await);
        }
        Command::Delete { id } => {
            let mut view = PostDetailView::new(id);
            view.load(&api, session.session()).await;
            if view.is_loading() {
                bail!("пост {id} не удалось загрузить");
            }
            if !view.can_delete(session.session()) {
                bail!("удалить пост может только его автор");
            }
            match view.delete(&api, session.session()).await {
                Some(_) => {
                    info!(post_id = id, "post deleted");
                    println!("Пост удалён: id={id}");
                }
                None => bail!("{}", view.action_error().unwrap_or("не удалось удалить пост")),
            }
        }
        Command::Like { id } => {
            let status = api
                .toggle_post_like(session.token(), id)
                .await
                .map_err(map_api_error)?;
            print_like(status.liked, status.like_count);
        }
        Command::LikeComment { id } => {
            let status = api
                .toggle_comment_like(session.token(), id)
                .await
                .map_err(map_api_error)?;
            print_like(status.liked, status.like_count);
        }
        Command::Upload { file } => {
            let file = read_image(&file)?;
            let image = api
                .upload_image(session.token(), &file)
                .await
                .map_err(map_api_error)?;
            println!("{}", image.url);
        }
    }

    Ok(())
}

async fn authenticate(
    view: &mut AuthView,
    api: &HttpClient,
    session: &mut SessionStore<FileStorage>,
) -> Result<()> {
    if view.submit(api, session).await.is_none() {
        let action = match view.mode() {
            AuthMode::Login => "вход",
            AuthMode::Register => "регистрация",
        };
        return Err(anyhow!(
            "{action} не выполнен(а): {}",
            view.error().unwrap_or(blog_client::views::auth::AUTH_FAILED)
        ));
    }
    Ok(())
}

/// Загружает данные экрана и возвращает его текст.
///
/// Ошибки загрузки списка и поста не показываются: экран остаётся в
/// состоянии загрузки.
async fn render_route(
    route: Route,
    api: &HttpClient,
    session: &SessionStore<FileStorage>,
) -> String {
    match route {
        Route::PostList => {
            let mut view = PostListView::new();
            view.load(api, session.session()).await;
            render::post_list(&view)
        }
        Route::Auth => render::auth(&AuthView::new()),
        Route::PostDetail(id) => {
            let mut view = PostDetailView::new(id);
            view.load(api, session.session()).await;
            render::post_detail(&view, session.session())
        }
        Route::CreatePost => render::create_post(&CreatePostView::new(), session.session()),
    }
}

fn read_image(path: &Path) -> Result<ImageFile> {
    let bytes = fs::read(path).with_context(|| format!("не удалось прочитать {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| anyhow!("некорректное имя файла: {}", path.display()))?;
    Ok(ImageFile::new(file_name, bytes))
}

fn print_like(liked: bool, like_count: u64) {
    let state = if liked { "лайк поставлен" } else { "лайк снят" };
    println!("{state}, всего: {like_count}");
}

fn map_api_error(err: ApiError) -> anyhow::Error {
    let message = match &err {
        ApiError::Api { status, .. } if err.is_unauthorized() => format!(
            "требуется авторизация ({status}): выполните `blog-cli login ...` или `blog-cli register ...`"
        ),
        ApiError::Api {
            status: 404,
            message,
        } => format!(
            "ресурс не найден{}",
            message.as_deref().map(|m| format!(": {m}")).unwrap_or_default()
        ),
        ApiError::Api { status, message } => format!(
            "некорректный запрос ({status}): {}",
            message.as_deref().unwrap_or("без описания")
        ),
        ApiError::Network(err) => format!("сервер недоступен: {err}"),
        ApiError::Decode(err) => format!("непонятный ответ сервера: {err}"),
        ApiError::Request(err) => format!("запрос не отправлен: {err}"),
    };
    anyhow!(message)
}
