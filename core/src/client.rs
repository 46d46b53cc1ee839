//! Stateless HTTP request builder and response parser for the bookstore API.
//!
//! # Design
//! `BookstoreClient` holds only a `base_url` and carries no mutable state
//! between calls. Each operation has a `build_*` method that produces an
//! `HttpRequest`; every response is decoded by `parse_response`, since the
//! API's bodies are passed through as opaque JSON. The caller (or a
//! `Transport`) executes the round-trip in between.
//!
//! Path segments and query values are percent-encoded. Unreserved characters
//! (`A-Z a-z 0-9 - . _ ~`) are left as-is, so ISBNs appear verbatim.

use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Credentials, NewUser, ReviewDelete, ReviewUpsert, UserId};

const BOOKS: &str = "/api/books";
const REGISTER: &str = "/api/users/register";
const LOGIN: &str = "/api/users/login";

/// Synchronous, stateless client for the bookstore API.
#[derive(Debug, Clone)]
pub struct BookstoreClient {
    base_url: String,
}

impl BookstoreClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list_books(&self) -> HttpRequest {
        get(format!("{}{BOOKS}", self.base_url))
    }

    pub fn build_get_book_by_isbn(&self, isbn: &str) -> HttpRequest {
        get(format!("{}{BOOKS}/{}", self.base_url, urlencoding::encode(isbn)))
    }

    pub fn build_get_books_by_author(&self, author: &str) -> HttpRequest {
        get(format!(
            "{}{BOOKS}?author={}",
            self.base_url,
            urlencoding::encode(author)
        ))
    }

    pub fn build_get_books_by_title(&self, title: &str) -> HttpRequest {
        get(format!(
            "{}{BOOKS}?title={}",
            self.base_url,
            urlencoding::encode(title)
        ))
    }

    pub fn build_get_book_review(&self, isbn: &str) -> HttpRequest {
        get(self.review_path(isbn))
    }

    pub fn build_register_user(&self, user: &NewUser) -> Result<HttpRequest, ApiError> {
        with_json(HttpMethod::Post, format!("{}{REGISTER}", self.base_url), user)
    }

    pub fn build_login_user(&self, username: &str, password: &str) -> Result<HttpRequest, ApiError> {
        let credentials = Credentials {
            username: username.to_string(),
            password: password.to_string(),
        };
        with_json(HttpMethod::Post, format!("{}{LOGIN}", self.base_url), &credentials)
    }

    pub fn build_add_or_modify_review(
        &self,
        isbn: &str,
        user_id: impl Into<UserId>,
        review: &str,
    ) -> Result<HttpRequest, ApiError> {
        let body = ReviewUpsert {
            user_id: user_id.into(),
            review: review.to_string(),
        };
        with_json(HttpMethod::Put, self.review_path(isbn), &body)
    }

    pub fn build_delete_review(
        &self,
        isbn: &str,
        user_id: impl Into<UserId>,
    ) -> Result<HttpRequest, ApiError> {
        let body = ReviewDelete {
            user_id: user_id.into(),
        };
        with_json(HttpMethod::Delete, self.review_path(isbn), &body)
    }

    /// Decode a response body, passing any 2xx payload through unchanged.
    ///
    /// An empty 2xx body decodes to `Value::Null`.
    pub fn parse_response(&self, response: HttpResponse) -> Result<Value, ApiError> {
        check_status(&response)?;
        if response.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    fn review_path(&self, isbn: &str) -> String {
        format!("{}{BOOKS}/{}/review", self.base_url, urlencoding::encode(isbn))
    }
}

fn get(path: String) -> HttpRequest {
    HttpRequest {
        method: HttpMethod::Get,
        path,
        headers: Vec::new(),
        body: None,
    }
}

fn with_json<T: Serialize>(method: HttpMethod, path: String, input: &T) -> Result<HttpRequest, ApiError> {
    let body = serde_json::to_string(input).map_err(|e| ApiError::Serialization(e.to_string()))?;
    Ok(HttpRequest {
        method,
        path,
        headers: vec![("content-type".to_string(), "application/json".to_string())],
        body: Some(body),
    })
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    match response.status {
        404 => Err(ApiError::NotFound),
        status @ 400..=499 => Err(ApiError::Rejected {
            status,
            body: response.body.clone(),
        }),
        status => Err(ApiError::Server {
            status,
            body: response.body.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> BookstoreClient {
        BookstoreClient::new("http://localhost:3000")
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn build_list_books_produces_correct_request() {
        let req = client().build_list_books();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:3000/api/books");
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_get_book_by_isbn_keeps_isbn_verbatim() {
        let req = client().build_get_book_by_isbn("978-3-16-148410-0");
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:3000/api/books/978-3-16-148410-0");
    }

    #[test]
    fn build_get_book_by_isbn_encodes_separators() {
        let req = client().build_get_book_by_isbn("a/b?c");
        assert_eq!(req.path, "http://localhost:3000/api/books/a%2Fb%3Fc");
    }

    #[test]
    fn build_get_books_by_author_encodes_query() {
        let req = client().build_get_books_by_author("J.K. Rowling");
        assert_eq!(req.path, "http://localhost:3000/api/books?author=J.K.%20Rowling");
    }

    #[test]
    fn build_get_books_by_title_encodes_reserved_characters() {
        let req = client().build_get_books_by_title("Tom & Jerry");
        assert_eq!(req.path, "http://localhost:3000/api/books?title=Tom%20%26%20Jerry");
    }

    #[test]
    fn build_get_book_review_produces_correct_request() {
        let req = client().build_get_book_review("978-3-16-148410-0");
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(
            req.path,
            "http://localhost:3000/api/books/978-3-16-148410-0/review"
        );
    }

    #[test]
    fn build_register_user_sends_user_object() {
        let user = NewUser {
            username: "john_doe".to_string(),
            password: "password123".to_string(),
        };
        let req = client().build_register_user(&user).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:3000/api/users/register");
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["username"], "john_doe");
        assert_eq!(body["password"], "password123");
    }

    #[test]
    fn build_login_user_sends_credentials() {
        let req = client().build_login_user("john_doe", "password123").unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:3000/api/users/login");
        assert_eq!(
            req.body.as_deref(),
            Some(r#"{"username":"john_doe","password":"password123"}"#)
        );
    }

    #[test]
    fn build_add_or_modify_review_produces_put() {
        let req = client()
            .build_add_or_modify_review("978-3-16-148410-0", 1u64, "Amazing book!")
            .unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(
            req.path,
            "http://localhost:3000/api/books/978-3-16-148410-0/review"
        );
        assert_eq!(
            req.body.as_deref(),
            Some(r#"{"userId":1,"review":"Amazing book!"}"#)
        );
    }

    #[test]
    fn build_delete_review_carries_user_in_body() {
        let req = client().build_delete_review("978-3-16-148410-0", "abc").unwrap();
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.body.as_deref(), Some(r#"{"userId":"abc"}"#));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = BookstoreClient::new("http://localhost:3000/");
        let req = client.build_list_books();
        assert_eq!(req.path, "http://localhost:3000/api/books");
    }

    #[test]
    fn parse_response_passes_payload_through() {
        let body = r#"[{"isbn":"1","title":"T","author":"A","extra":{"nested":[1,2]}}]"#;
        let value = client().parse_response(response(200, body)).unwrap();
        assert_eq!(value, serde_json::from_str::<Value>(body).unwrap());
    }

    #[test]
    fn parse_response_accepts_any_2xx() {
        let value = client().parse_response(response(201, r#"{"ok":true}"#)).unwrap();
        assert_eq!(value["ok"], true);
    }

    #[test]
    fn parse_response_empty_body_is_null() {
        let value = client().parse_response(response(204, "")).unwrap();
        assert!(value.is_null());
    }

    #[test]
    fn parse_response_not_found() {
        let err = client().parse_response(response(404, "")).unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn parse_response_client_error_is_rejected() {
        let err = client().parse_response(response(401, "bad credentials")).unwrap_err();
        assert!(matches!(err, ApiError::Rejected { status: 401, .. }));
    }

    #[test]
    fn parse_response_server_error() {
        let err = client().parse_response(response(500, "internal error")).unwrap_err();
        assert!(matches!(err, ApiError::Server { status: 500, .. }));
    }

    #[test]
    fn parse_response_bad_json() {
        let err = client().parse_response(response(200, "not json")).unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }
}
