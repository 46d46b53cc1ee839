use bookstore_core::api::{
    BOOKS_BY_AUTHOR_FAILED, BOOKS_BY_TITLE_FAILED, BOOK_BY_ISBN_FAILED, BOOK_REVIEW_FAILED,
    DELETE_REVIEW_FAILED, LIST_BOOKS_FAILED, LOGIN_FAILED, REGISTER_FAILED, UPSERT_REVIEW_FAILED,
};
use bookstore_core::{BookstoreApi, LogFailure, NewUser, Transport};
use clap::Parser;
use serde_json::Value;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Walk through every bookstore endpoint and log the responses.
///
/// Reads run first, then user registration and login, then a review is
/// written and deleted. Finally the four reads are repeated in the background
/// and the program waits for them before exiting.
#[derive(Debug, Parser)]
#[command(name = "bookstore")]
#[command(version)]
#[command(about = "Exercise the bookstore REST API")]
struct Cli {
    /// Base URL of the bookstore service.
    #[arg(long, env = "BOOKSTORE_BASE_URL", default_value = "https://example.com")]
    base_url: String,

    /// ISBN used for lookups and reviews.
    #[arg(long, default_value = "978-3-16-148410-0")]
    isbn: String,

    #[arg(long, default_value = "J.K. Rowling")]
    author: String,

    #[arg(long, default_value = "Harry Potter")]
    title: String,

    #[arg(long, default_value = "john_doe")]
    username: String,

    #[arg(long, default_value = "password123")]
    password: String,

    /// User id attached to the review.
    #[arg(long, default_value_t = 1)]
    user_id: u64,

    #[arg(long, default_value = "Amazing book!")]
    review: String,

    /// Log request details. `RUST_LOG` takes precedence.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("background request panicked: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let api = BookstoreApi::connect(&cli.base_url);
    run_demo(&api, &cli).await
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .init();
}

async fn run_demo<T: Transport + 'static>(api: &BookstoreApi<T>, cli: &Cli) -> Result<(), CliError> {
    let books = api.list_books().await.or_log(LIST_BOOKS_FAILED);
    info!("Available books: {}", show(&books));

    let book = api.get_book_by_isbn(&cli.isbn).await.or_log(BOOK_BY_ISBN_FAILED);
    info!("Book by ISBN: {}", show(&book));

    let by_author = api.get_books_by_author(&cli.author).await.or_log(BOOKS_BY_AUTHOR_FAILED);
    info!("Books by author: {}", show(&by_author));

    let by_title = api.get_books_by_title(&cli.title).await.or_log(BOOKS_BY_TITLE_FAILED);
    info!("Books by title: {}", show(&by_title));

    let review = api.get_book_review(&cli.isbn).await.or_log(BOOK_REVIEW_FAILED);
    info!("Book review: {}", show(&review));

    let user = NewUser {
        username: cli.username.clone(),
        password: cli.password.clone(),
    };
    let registered = api.register_user(&user).await.or_log(REGISTER_FAILED);
    info!("New user registered: {}", show(&registered));

    let login = api
        .login_user(&cli.username, &cli.password)
        .await
        .or_log(LOGIN_FAILED);
    info!("Login response: {}", show(&login));

    let modified = api
        .add_or_modify_review(&cli.isbn, cli.user_id, &cli.review)
        .await
        .or_log(UPSERT_REVIEW_FAILED);
    info!("Modified review: {}", show(&modified));

    let deleted = api
        .delete_review(&cli.isbn, cli.user_id)
        .await
        .or_log(DELETE_REVIEW_FAILED);
    info!("Delete review response: {}", show(&deleted));

    let isbn = cli.isbn.clone();
    let author = cli.author.clone();
    let title = cli.title.clone();
    let handles = [
        api.detach("Books", |api| async move { api.list_books().await }),
        api.detach("Book details by ISBN", |api| async move {
            api.get_book_by_isbn(&isbn).await
        }),
        api.detach("Books by author", |api| async move {
            api.get_books_by_author(&author).await
        }),
        api.detach("Books by title", |api| async move {
            api.get_books_by_title(&title).await
        }),
    ];
    for handle in handles {
        handle.await?;
    }
    Ok(())
}

/// Render an optional payload for logging.
fn show(value: &Option<Value>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "none".to_string(),
    }
}
