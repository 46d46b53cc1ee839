//! In-memory bookstore server used by the client's tests and demo.

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub isbn: String,
    pub title: String,
    pub author: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct BookFilter {
    pub author: Option<String>,
    pub title: Option<String>,
}

#[derive(Deserialize)]
pub struct UserInput {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewInput {
    pub user_id: Value,
    pub review: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDeleteInput {
    pub user_id: Value,
}

/// Reviews for one book, keyed by user id.
pub type Reviews = BTreeMap<String, String>;

#[derive(Debug, Default)]
pub struct Store {
    pub books: BTreeMap<String, Book>,
    pub reviews: HashMap<String, Reviews>,
    pub users: HashMap<String, String>,
}

impl Store {
    /// Store pre-filled with a small catalogue.
    pub fn seeded() -> Self {
        let mut store = Store::default();
        for (isbn, title, author) in [
            ("978-3-16-148410-0", "Harry Potter", "J.K. Rowling"),
            (
                "978-0-7475-3269-9",
                "Harry Potter and the Philosopher's Stone",
                "J.K. Rowling",
            ),
            ("978-0-261-10235-4", "The Hobbit", "J.R.R. Tolkien"),
        ] {
            store.books.insert(
                isbn.to_string(),
                Book {
                    isbn: isbn.to_string(),
                    title: title.to_string(),
                    author: author.to_string(),
                },
            );
        }
        store
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    app_with(Store::seeded())
}

pub fn app_with(store: Store) -> Router {
    let db: Db = Arc::new(RwLock::new(store));
    Router::new()
        .route("/api/books", get(list_books))
        .route("/api/books/{isbn}", get(get_book))
        .route(
            "/api/books/{isbn}/review",
            get(get_reviews).put(put_review).delete(delete_review),
        )
        .route("/api/users/register", post(register_user))
        .route("/api/users/login", post(login_user))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock bookstore listening");
    }
    axum::serve(listener, app()).await
}

/// Stringify a user id the same way for numbers and strings.
fn user_key(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

async fn list_books(State(db): State<Db>, Query(filter): Query<BookFilter>) -> Json<Vec<Book>> {
    let store = db.read().await;
    let books = store
        .books
        .values()
        .filter(|b| filter.author.as_ref().map_or(true, |a| &b.author == a))
        .filter(|b| filter.title.as_ref().map_or(true, |t| &b.title == t))
        .cloned()
        .collect();
    Json(books)
}

async fn get_book(State(db): State<Db>, Path(isbn): Path<String>) -> Result<Json<Book>, StatusCode> {
    let store = db.read().await;
    store.books.get(&isbn).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn get_reviews(State(db): State<Db>, Path(isbn): Path<String>) -> Result<Json<Reviews>, StatusCode> {
    let store = db.read().await;
    if !store.books.contains_key(&isbn) {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(store.reviews.get(&isbn).cloned().unwrap_or_default()))
}

async fn put_review(
    State(db): State<Db>,
    Path(isbn): Path<String>,
    Json(input): Json<ReviewInput>,
) -> Result<Json<Reviews>, StatusCode> {
    let mut store = db.write().await;
    if !store.books.contains_key(&isbn) {
        return Err(StatusCode::NOT_FOUND);
    }
    let reviews = store.reviews.entry(isbn).or_default();
    reviews.insert(user_key(&input.user_id), input.review);
    Ok(Json(reviews.clone()))
}

async fn delete_review(
    State(db): State<Db>,
    Path(isbn): Path<String>,
    Json(input): Json<ReviewDeleteInput>,
) -> Result<Json<Value>, StatusCode> {
    let mut store = db.write().await;
    let user = user_key(&input.user_id);
    store
        .reviews
        .get_mut(&isbn)
        .and_then(|reviews| reviews.remove(&user))
        .ok_or(StatusCode::NOT_FOUND)?;
    debug!(%isbn, %user, "review deleted");
    Ok(Json(json!({
        "message": "Review deleted",
        "isbn": isbn,
        "userId": input.user_id,
    })))
}

async fn register_user(
    State(db): State<Db>,
    Json(input): Json<UserInput>,
) -> Result<(StatusCode, Json<Value>), StatusCode> {
    if input.username.is_empty() || input.password.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    let mut store = db.write().await;
    if store.users.contains_key(&input.username) {
        return Err(StatusCode::CONFLICT);
    }
    store.users.insert(input.username.clone(), input.password);
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User registered",
            "username": input.username,
        })),
    ))
}

async fn login_user(State(db): State<Db>, Json(input): Json<UserInput>) -> Result<Json<Value>, StatusCode> {
    let store = db.read().await;
    match store.users.get(&input.username) {
        Some(password) if *password == input.password => Ok(Json(json!({
            "message": "Login successful",
            "token": Uuid::new_v4(),
        }))),
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}
