//! Blocking HTTP client for the `users` / `posts` / `comments` resource API.
//!
//! # Overview
//! `ApiClient` is a thin transport: it joins the base URL and endpoint,
//! attaches the configured headers and timeout, dispatches the verb over one
//! persistent agent and hands back the raw `ApiResponse`. It never judges a
//! status code; the functional suites under `tests/` do all the asserting.
//!
//! # Design
//! - `Settings` resolves base URL, token, headers and timeout from the
//!   environment once, with defaults.
//! - `build_request` is pure, `request` performs the I/O, so URL and body
//!   handling are unit-testable without a server.
//! - Payloads are a tagged `RequestBody` (`Json | Form | Empty`).
//! - `ApiError` covers transport failures, JSON decode failures and use of a
//!   closed client. HTTP 4xx/5xx are not errors.

pub mod client;
pub mod config;
pub mod error;
pub mod http;

pub use client::ApiClient;
pub use config::Settings;
pub use error::ApiError;
pub use http::{ApiResponse, HttpMethod, HttpRequest, RequestBody, RequestOptions};
