//! In-process stand-in for the public `users` / `posts` / `comments` fixture API.
//!
//! Reads are served from a seeded, immutable `Dataset`. Writes answer the way
//! the public service does (201 with the echoed payload and a fresh id, 200
//! for updates and deletes) but nothing is stored.

pub mod data;

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put, MethodRouter},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tokio::net::TcpListener;
use url::form_urlencoded;

pub use data::{Collection, Comment, Dataset, Post, User};

pub type Db = Arc<Dataset>;

pub fn app() -> Router {
    let db: Db = Arc::new(Dataset::seed());
    Router::new()
        .route("/users", get(list_users).merge(create_route(Collection::Users)))
        .route("/users/{id}", get(get_user).merge(item_writes(Collection::Users)))
        .route("/posts", get(list_posts).merge(create_route(Collection::Posts)))
        .route("/posts/{id}", get(get_post).merge(item_writes(Collection::Posts)))
        .route("/posts/{id}/comments", get(list_post_comments))
        .route("/comments", get(list_comments).merge(create_route(Collection::Comments)))
        .route("/comments/{id}", get(get_comment).merge(item_writes(Collection::Comments)))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "fixture server listening");
    }
    axum::serve(listener, app()).await
}

#[derive(Debug, Deserialize)]
pub struct CommentFilter {
    #[serde(rename = "postId")]
    pub post_id: Option<u64>,
}

/// Ids that do not fit a `u64`, or are not numbers at all, match nothing.
fn parse_id(raw: &str) -> Option<u64> {
    raw.parse().ok()
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({}))).into_response()
}

fn found<T: serde::Serialize>(item: Option<&T>) -> Response {
    match item {
        Some(item) => Json(item).into_response(),
        None => not_found(),
    }
}

async fn list_users(State(db): State<Db>) -> Json<Vec<User>> {
    Json(db.users.clone())
}

async fn get_user(State(db): State<Db>, Path(id): Path<String>) -> Response {
    found(parse_id(&id).and_then(|id| db.user(id)))
}

async fn list_posts(State(db): State<Db>) -> Json<Vec<Post>> {
    Json(db.posts.clone())
}

async fn get_post(State(db): State<Db>, Path(id): Path<String>) -> Response {
    found(parse_id(&id).and_then(|id| db.post(id)))
}

async fn list_post_comments(State(db): State<Db>, Path(id): Path<String>) -> Json<Vec<Comment>> {
    Json(parse_id(&id).map(|id| db.comments_for_post(id)).unwrap_or_default())
}

async fn list_comments(State(db): State<Db>, Query(filter): Query<CommentFilter>) -> Json<Vec<Comment>> {
    match filter.post_id {
        Some(post_id) => Json(db.comments_for_post(post_id)),
        None => Json(db.comments.clone()),
    }
}

async fn get_comment(State(db): State<Db>, Path(id): Path<String>) -> Response {
    found(parse_id(&id).and_then(|id| db.comment(id)))
}

fn create_route(collection: Collection) -> MethodRouter<Db> {
    post(move |State(db): State<Db>, headers: HeaderMap, body: Bytes| async move {
        create(collection, &db, &headers, &body)
    })
}

fn item_writes(collection: Collection) -> MethodRouter<Db> {
    put(
        move |State(db): State<Db>, Path(id): Path<String>, headers: HeaderMap, body: Bytes| async move {
            update(collection, &db, &id, &headers, &body)
        },
    )
    .delete(move |State(db): State<Db>, Path(id): Path<String>| async move {
        remove(collection, &db, &id)
    })
}

fn create(collection: Collection, db: &Dataset, headers: &HeaderMap, body: &[u8]) -> Response {
    let mut object = match parse_payload(headers, body) {
        Ok(object) => object,
        Err(reason) => return bad_request(collection, &reason),
    };
    let id = db.len(collection) as u64 + 1;
    object.insert("id".to_string(), json!(id));
    tracing::debug!(collection = collection.name(), id, "echoing created resource");
    (StatusCode::CREATED, Json(Value::Object(object))).into_response()
}

fn update(collection: Collection, db: &Dataset, id: &str, headers: &HeaderMap, body: &[u8]) -> Response {
    let Some(id) = parse_id(id).filter(|id| db.contains(collection, *id)) else {
        return not_found();
    };
    let mut object = match parse_payload(headers, body) {
        Ok(object) => object,
        Err(reason) => return bad_request(collection, &reason),
    };
    object.insert("id".to_string(), json!(id));
    tracing::debug!(collection = collection.name(), id, "echoing updated resource");
    Json(Value::Object(object)).into_response()
}

fn remove(collection: Collection, db: &Dataset, id: &str) -> Response {
    let Some(id) = parse_id(id).filter(|id| db.contains(collection, *id)) else {
        return not_found();
    };
    tracing::debug!(collection = collection.name(), id, "acknowledging delete");
    Json(json!({})).into_response()
}

fn bad_request(collection: Collection, reason: &str) -> Response {
    tracing::debug!(collection = collection.name(), reason, "rejected payload");
    (StatusCode::BAD_REQUEST, Json(json!({ "error": reason }))).into_response()
}

/// Accept a JSON object, a form-encoded body, or nothing at all.
fn parse_payload(headers: &HeaderMap, body: &[u8]) -> Result<Map<String, Value>, String> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }

    let is_form = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/x-www-form-urlencoded"));
    if is_form {
        return Ok(form_urlencoded::parse(body)
            .map(|(k, v)| (k.into_owned(), Value::String(v.into_owned())))
            .collect());
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(_) => Err("payload must be a JSON object".to_string()),
        Err(e) => Err(format!("malformed JSON: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(content_type: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_str(content_type).unwrap());
        headers
    }

    #[test]
    fn empty_body_is_an_empty_object() {
        let object = parse_payload(&HeaderMap::new(), b"  ").unwrap();
        assert!(object.is_empty());
    }

    #[test]
    fn json_object_is_accepted() {
        let object = parse_payload(&headers("application/json"), br#"{"title":"t","userId":1}"#).unwrap();
        assert_eq!(object["title"], "t");
        assert_eq!(object["userId"], 1);
    }

    #[test]
    fn json_without_content_type_is_accepted() {
        let object = parse_payload(&HeaderMap::new(), br#"{"postId":1}"#).unwrap();
        assert_eq!(object["postId"], 1);
    }

    #[test]
    fn form_body_becomes_string_fields() {
        let object = parse_payload(
            &headers("application/x-www-form-urlencoded"),
            b"name=John+Doe&userId=1",
        )
        .unwrap();
        assert_eq!(object["name"], "John Doe");
        assert_eq!(object["userId"], "1");
    }

    #[test]
    fn non_object_json_is_rejected() {
        let err = parse_payload(&headers("application/json"), b"[1,2,3]").unwrap_err();
        assert_eq!(err, "payload must be a JSON object");
    }

    #[test]
    fn malformed_json_is_rejected() {
        let err = parse_payload(&headers("application/json"), b"{not json").unwrap_err();
        assert!(err.starts_with("malformed JSON"));
    }

    #[test]
    fn unparseable_ids_match_nothing() {
        assert_eq!(parse_id("42"), Some(42));
        assert_eq!(parse_id("99999999999999999999"), None);
        assert_eq!(parse_id("abc"), None);
        assert_eq!(parse_id("-1"), None);
    }

    #[test]
    fn comment_filter_reads_camel_case_post_id() {
        let filter: CommentFilter = serde_json::from_str(r#"{"postId":3}"#).unwrap();
        assert_eq!(filter.post_id, Some(3));
        let filter: CommentFilter = serde_json::from_str("{}").unwrap();
        assert!(filter.post_id.is_none());
    }
}
