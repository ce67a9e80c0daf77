//! Blocking HTTP client for the resource API.
//!
//! # Design
//! `ApiClient` owns one `ureq::Agent`, so every call reuses the same
//! connection pool for the lifetime of the client. Headers and timeout are
//! fixed at construction and never mutated afterwards, which makes a shared
//! `&ApiClient` safe to use from several test threads at once.
//!
//! Each call is split in two: `build_request` resolves URL, headers, timeout
//! and body into an `HttpRequest` without touching the network, and
//! `request` executes it. The agent is configured with
//! `http_status_as_error(false)`, so 4xx/5xx come back as `ApiResponse`
//! values. Only transport failures become errors.

use std::fmt;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use ureq::Agent;
use url::form_urlencoded;

use crate::config::{default_headers, Settings, DEFAULT_TIMEOUT};
use crate::error::ApiError;
use crate::http::{
    ApiResponse, HttpMethod, HttpRequest, RequestBody, RequestOptions, FORM_CONTENT_TYPE,
    JSON_CONTENT_TYPE,
};

const CONTENT_TYPE: &str = "Content-Type";

/// Synchronous client bound to a single base URL.
pub struct ApiClient {
    base_url: String,
    headers: Vec<(String, String)>,
    timeout: Duration,
    agent: Option<Agent>,
}

impl ApiClient {
    /// Client with the default headers and timeout. Trailing slashes on
    /// `base_url` are stripped.
    pub fn new(base_url: &str) -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            headers: default_headers(),
            timeout: DEFAULT_TIMEOUT,
            agent: Some(agent),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let mut client = Self::new(&settings.base_url);
        client.headers = settings.default_headers.clone();
        client.timeout = settings.default_timeout;
        client
    }

    /// Merge `headers` over the current set. Names compare case-insensitively;
    /// a supplied header replaces an existing one of the same name.
    pub fn with_headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in headers {
            set_header(&mut self.headers, name.into(), value.into());
        }
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Join the base URL and `endpoint` with exactly one `/`.
    pub fn url_for(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    /// Resolve a call into plain data without performing any I/O.
    pub fn build_request(
        &self,
        method: HttpMethod,
        endpoint: &str,
        options: &RequestOptions,
    ) -> Result<HttpRequest, ApiError> {
        let mut url = self.url_for(endpoint);
        if !options.query.is_empty() {
            let query = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(options.query.iter())
                .finish();
            url.push(if url.contains('?') { '&' } else { '?' });
            url.push_str(&query);
        }

        let mut headers = self.headers.clone();
        let body = match &options.body {
            RequestBody::Json(value) => {
                if !has_header(&headers, CONTENT_TYPE) {
                    set_header(&mut headers, CONTENT_TYPE.to_string(), JSON_CONTENT_TYPE.to_string());
                }
                Some(serde_json::to_string(value).map_err(ApiError::Encode)?)
            }
            RequestBody::Form(pairs) => {
                set_header(&mut headers, CONTENT_TYPE.to_string(), FORM_CONTENT_TYPE.to_string());
                Some(
                    form_urlencoded::Serializer::new(String::new())
                        .extend_pairs(pairs.iter())
                        .finish(),
                )
            }
            RequestBody::Empty => None,
        };

        Ok(HttpRequest {
            method,
            url,
            headers,
            body,
            timeout: options.timeout.unwrap_or(self.timeout),
        })
    }

    /// Execute a call and return the response as received.
    ///
    /// The status code is not inspected. Transport failures are logged and
    /// returned as `ApiError::Transport`.
    pub fn request(
        &self,
        method: HttpMethod,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<ApiResponse, ApiError> {
        let agent = self.agent.as_ref().ok_or(ApiError::Closed)?;
        let request = self.build_request(method, endpoint, &options)?;
        tracing::debug!(method = method.as_str(), url = %request.url, "dispatching request");

        match execute(agent, &request) {
            Ok(response) => {
                tracing::debug!(status = response.status, url = %request.url, "received response");
                Ok(response)
            }
            Err(err) => {
                tracing::error!(method = method.as_str(), url = %request.url, error = %err, "request failed");
                Err(ApiError::Transport(err))
            }
        }
    }

    pub fn get(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<ApiResponse, ApiError> {
        let options = params
            .iter()
            .fold(RequestOptions::default(), |options, (k, v)| options.with_query(*k, *v));
        self.request(HttpMethod::Get, endpoint, options)
    }

    pub fn post(&self, endpoint: &str, body: RequestBody) -> Result<ApiResponse, ApiError> {
        self.request(HttpMethod::Post, endpoint, RequestOptions::default().with_body(body))
    }

    pub fn put(&self, endpoint: &str, body: RequestBody) -> Result<ApiResponse, ApiError> {
        self.request(HttpMethod::Put, endpoint, RequestOptions::default().with_body(body))
    }

    pub fn delete(&self, endpoint: &str) -> Result<ApiResponse, ApiError> {
        self.request(HttpMethod::Delete, endpoint, RequestOptions::default())
    }

    /// `GET` and decode the body, whatever the status code.
    pub fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        self.get(endpoint, params)?.json()
    }

    /// `POST` a JSON payload and decode the body, whatever the status code.
    pub fn post_json<T: DeserializeOwned>(&self, endpoint: &str, payload: &Value) -> Result<T, ApiError> {
        self.post(endpoint, RequestBody::Json(payload.clone()))?.json()
    }

    /// Release the agent and its pooled connections. Safe to call repeatedly.
    pub fn close(&mut self) {
        if self.agent.take().is_some() {
            tracing::debug!(base_url = %self.base_url, "closed client");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.agent.is_none()
    }
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("headers", &self.headers)
            .field("timeout", &self.timeout)
            .field("closed", &self.is_closed())
            .finish()
    }
}

fn has_header(headers: &[(String, String)], name: &str) -> bool {
    headers.iter().any(|(k, _)| k.eq_ignore_ascii_case(name))
}

fn set_header(headers: &mut Vec<(String, String)>, name: String, value: String) {
    match headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(&name)) {
        Some(existing) => *existing = (name, value),
        None => headers.push((name, value)),
    }
}

fn execute(agent: &Agent, request: &HttpRequest) -> Result<ApiResponse, ureq::Error> {
    let url = request.url.as_str();
    let mut response = match (request.method, request.body.as_deref()) {
        (HttpMethod::Get, _) => prepare(agent.get(url), request).call(),
        (HttpMethod::Delete, _) => prepare(agent.delete(url), request).call(),
        (HttpMethod::Post, Some(body)) => prepare(agent.post(url), request).send(body.as_bytes()),
        (HttpMethod::Post, None) => prepare(agent.post(url), request).send_empty(),
        (HttpMethod::Put, Some(body)) => prepare(agent.put(url), request).send(body.as_bytes()),
        (HttpMethod::Put, None) => prepare(agent.put(url), request).send_empty(),
    }?;

    let status = response.status().as_u16();
    let headers = response
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_string(), value.to_string()))
        })
        .collect();
    let body = response.body_mut().read_to_vec()?;

    Ok(ApiResponse { status, headers, body })
}

fn prepare<B>(builder: ureq::RequestBuilder<B>, request: &HttpRequest) -> ureq::RequestBuilder<B> {
    let builder = request
        .headers
        .iter()
        .fold(builder, |builder, (name, value)| builder.header(name.as_str(), value.as_str()));
    builder.config().timeout_global(Some(request.timeout)).build()
}
