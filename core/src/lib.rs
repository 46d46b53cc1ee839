//! Async API client for the bookstore REST service.
//!
//! # Overview
//! Lists books, looks them up by ISBN, author or title, manages reviews, and
//! registers or logs in users. Response bodies are returned as opaque JSON.
//!
//! # Design
//! - `BookstoreClient` is stateless and does no I/O: `build_*` produces an
//!   `HttpRequest`, `parse_response` consumes an `HttpResponse`.
//! - `Transport` executes the round-trip; `ReqwestTransport` is the network
//!   implementation and tests substitute their own.
//! - `BookstoreApi` combines the two into one async method per endpoint.
//!   Failures are typed (`ApiError`); callers swallow them explicitly with
//!   `LogFailure::or_log` or run a call in the background with
//!   `BookstoreApi::detach`.

pub mod api;
pub mod client;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use api::{BookstoreApi, LogFailure};
pub use client::BookstoreClient;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{ReqwestTransport, Transport};
pub use types::{Credentials, NewUser, ReviewDelete, ReviewUpsert, UserId};
