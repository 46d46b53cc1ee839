//! Async bookstore API: one method per endpoint.
//!
//! # Design
//! `BookstoreApi` pairs the stateless `BookstoreClient` with a `Transport`.
//! Every method returns `Result<Value, ApiError>` and the caller picks the
//! policy: propagate with `?`, swallow with [`LogFailure::or_log`], or run the
//! call in the background with [`BookstoreApi::detach`].

use std::future::Future;
use std::sync::Arc;

use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, Instrument, Span};

use crate::client::BookstoreClient;
use crate::error::ApiError;
use crate::http::HttpRequest;
use crate::transport::{ReqwestTransport, Transport};
use crate::types::{NewUser, UserId};

pub const LIST_BOOKS_FAILED: &str = "Error fetching book list";
pub const BOOK_BY_ISBN_FAILED: &str = "Error fetching book by ISBN";
pub const BOOKS_BY_AUTHOR_FAILED: &str = "Error fetching books by author";
pub const BOOKS_BY_TITLE_FAILED: &str = "Error fetching books by title";
pub const BOOK_REVIEW_FAILED: &str = "Error fetching book review";
pub const REGISTER_FAILED: &str = "Error registering new user";
pub const LOGIN_FAILED: &str = "Error logging in";
pub const UPSERT_REVIEW_FAILED: &str = "Error adding or modifying review";
pub const DELETE_REVIEW_FAILED: &str = "Error deleting book review";

/// Bookstore API bound to a transport. Cloning shares the transport.
#[derive(Debug)]
pub struct BookstoreApi<T> {
    client: BookstoreClient,
    transport: Arc<T>,
}

impl<T> Clone for BookstoreApi<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            transport: Arc::clone(&self.transport),
        }
    }
}

impl BookstoreApi<ReqwestTransport> {
    /// API over HTTP using a fresh `reqwest::Client`.
    pub fn connect(base_url: &str) -> Self {
        Self::new(BookstoreClient::new(base_url), ReqwestTransport::new())
    }
}

impl<T: Transport> BookstoreApi<T> {
    pub fn new(client: BookstoreClient, transport: T) -> Self {
        Self {
            client,
            transport: Arc::new(transport),
        }
    }

    pub fn client(&self) -> &BookstoreClient {
        &self.client
    }

    pub async fn list_books(&self) -> Result<Value, ApiError> {
        self.call(self.client.build_list_books()).await
    }

    pub async fn get_book_by_isbn(&self, isbn: &str) -> Result<Value, ApiError> {
        self.call(self.client.build_get_book_by_isbn(isbn)).await
    }

    pub async fn get_books_by_author(&self, author: &str) -> Result<Value, ApiError> {
        self.call(self.client.build_get_books_by_author(author)).await
    }

    pub async fn get_books_by_title(&self, title: &str) -> Result<Value, ApiError> {
        self.call(self.client.build_get_books_by_title(title)).await
    }

    pub async fn get_book_review(&self, isbn: &str) -> Result<Value, ApiError> {
        self.call(self.client.build_get_book_review(isbn)).await
    }

    pub async fn register_user(&self, user: &NewUser) -> Result<Value, ApiError> {
        let request = self.client.build_register_user(user)?;
        self.call(request).await
    }

    pub async fn login_user(&self, username: &str, password: &str) -> Result<Value, ApiError> {
        let request = self.client.build_login_user(username, password)?;
        self.call(request).await
    }

    pub async fn add_or_modify_review(
        &self,
        isbn: &str,
        user_id: impl Into<UserId>,
        review: &str,
    ) -> Result<Value, ApiError> {
        let request = self.client.build_add_or_modify_review(isbn, user_id, review)?;
        self.call(request).await
    }

    pub async fn delete_review(&self, isbn: &str, user_id: impl Into<UserId>) -> Result<Value, ApiError> {
        let request = self.client.build_delete_review(isbn, user_id)?;
        self.call(request).await
    }

    /// Run a call on the tokio runtime without waiting for it.
    ///
    /// The outcome is logged under `label`: the payload at `info` on success,
    /// the error at `error` on failure. Must be called from within a tokio
    /// runtime. The spawned task stays inside the caller's current span.
    pub fn detach<F, Fut>(&self, label: &'static str, call: F) -> JoinHandle<()>
    where
        T: 'static,
        F: FnOnce(Self) -> Fut,
        Fut: Future<Output = Result<Value, ApiError>> + Send + 'static,
    {
        let fut = call(self.clone());
        tokio::spawn(
            async move {
                match fut.await {
                    Ok(value) => info!("{label}: {value}"),
                    Err(err) => error!("{label} failed: {err}"),
                }
            }
            .instrument(Span::current()),
        )
    }

    async fn call(&self, request: HttpRequest) -> Result<Value, ApiError> {
        let method = request.method;
        let url = request.path.clone();
        debug!(%method, %url, "sending request");

        let response = match self.transport.execute(request).await {
            Ok(response) => response,
            Err(err) => {
                debug!(%method, %url, error = %err, "transport failure");
                return Err(err);
            }
        };
        debug!(%method, %url, status = response.status, "response received");
        self.client.parse_response(response)
    }
}

/// Opt-in "log and discard" handling for API results.
pub trait LogFailure<T> {
    /// Returns the value on success. On failure emits one `error` event
    /// with `context` and returns `None`.
    fn or_log(self, context: &str) -> Option<T>;
}

impl<T> LogFailure<T> for Result<T, ApiError> {
    fn or_log(self, context: &str) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(err) => {
                error!(error = %err, "{context}");
                None
            }
        }
    }
}
