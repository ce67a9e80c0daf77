//! HTTP transport types shared by the client and its callers.
//!
//! # Design
//! `HttpRequest` describes a request as plain data. `ApiClient::build_request`
//! produces it without any I/O, and `ApiClient::request` executes it over the
//! persistent agent. Keeping the build step pure lets URL joining, header
//! merging and body encoding be tested without a server.
//!
//! `ApiResponse` is returned exactly as received. Nothing in this module looks
//! at the status code.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;

pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// Payload attached to a `POST` or `PUT`.
///
/// Exactly one kind is chosen by construction, so there is no precedence rule
/// between a JSON body and a form body.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
    /// Serialized as JSON, sent with `Content-Type: application/json`.
    Json(Value),
    /// URL-encoded key/value pairs, sent as `application/x-www-form-urlencoded`.
    Form(Vec<(String, String)>),
    /// No body at all.
    #[default]
    Empty,
}

impl RequestBody {
    /// Form body from any iterator of string-ish pairs.
    pub fn form<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        RequestBody::Form(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl From<Value> for RequestBody {
    fn from(value: Value) -> Self {
        RequestBody::Json(value)
    }
}

/// Per-call knobs for `ApiClient::request`.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
    /// Overrides the client's timeout for this call only.
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    pub fn with_query<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// A fully resolved request: absolute URL, merged headers, encoded body.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    pub timeout: Duration,
}

impl HttpRequest {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// A response as received from the server, status unchecked.
///
/// The body is kept as raw bytes; nothing assumes it is text.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_slice(&self.body).map_err(ApiError::Decode)
    }

    /// The body as text, with invalid UTF-8 replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}
