//! In-process stand-in for json-server with json-server-auth.
//!
//! Serves 100 seeded posts plus the `/users` registration and the
//! token-protected `/664/posts` routes on an ephemeral port.

use std::sync::{Arc, Mutex};

use axum::extract::{Path, RawQuery, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

/// Number of posts served initially.
pub const POST_COUNT: u64 = 100;

#[derive(Default)]
struct Store {
    posts: Vec<Value>,
    tokens: Vec<String>,
}

#[derive(Clone, Default)]
struct Db(Arc<Mutex<Store>>);

impl Db {
    fn seeded() -> Self {
        let posts = (1..=POST_COUNT)
            .map(|id| {
                json!({
                    "id": id,
                    "userId": (id - 1) / 10 + 1,
                    "title": format!("post {id}"),
                    "body": format!("body of post {id}"),
                })
            })
            .collect();
        Self(Arc::new(Mutex::new(Store {
            posts,
            tokens: Vec::new(),
        })))
    }
}

/// Starts the server and returns its base URL.
pub async fn spawn() -> String {
    let app = Router::new()
        .route("/posts", get(list_posts).post(create_post))
        .route(
            "/posts/{id}",
            get(read_post).put(replace_post).delete(delete_post),
        )
        .route("/users", post(register))
        .route("/664/posts", post(create_protected_post))
        .route("/664/posts/", post(create_protected_post))
        .route("/664/posts/{id}", get(read_post))
        .with_state(Db::seeded());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// json-server compares ids as text, so `?id=55` matches `55` and `"55"`.
fn id_key(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn post_id(post: &Value) -> String {
    post.get("id").map(id_key).unwrap_or_default()
}

async fn list_posts(State(db): State<Db>, RawQuery(query): RawQuery) -> Response {
    let mut ids = Vec::new();
    let mut page = None;
    let mut limit = None;
    for (key, value) in url::form_urlencoded::parse(query.unwrap_or_default().as_bytes()) {
        match key.as_ref() {
            "id" => ids.push(value.into_owned()),
            "_page" => page = value.parse::<usize>().ok(),
            "_limit" => limit = value.parse::<usize>().ok(),
            _ => {}
        }
    }

    let store = db.0.lock().unwrap();
    let matching: Vec<Value> = store
        .posts
        .iter()
        .filter(|post| ids.is_empty() || ids.contains(&post_id(post)))
        .cloned()
        .collect();
    let total = matching.len();

    let selected: Vec<Value> = match (page, limit) {
        (Some(page), Some(limit)) => matching
            .into_iter()
            .skip(page.saturating_sub(1) * limit)
            .take(limit)
            .collect(),
        (None, Some(limit)) => matching.into_iter().take(limit).collect(),
        _ => matching,
    };

    (
        StatusCode::OK,
        [("x-total-count", total.to_string())],
        Json(Value::Array(selected)),
    )
        .into_response()
}

async fn read_post(State(db): State<Db>, Path(id): Path<String>) -> Response {
    let store = db.0.lock().unwrap();
    match store.posts.iter().find(|post| post_id(post) == id) {
        Some(post) => Json(post.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({}))).into_response(),
    }
}

fn insert_post(db: &Db, mut body: Value) -> Response {
    let mut store = db.0.lock().unwrap();
    let Some(object) = body.as_object_mut() else {
        return (StatusCode::BAD_REQUEST, "body must be an object").into_response();
    };

    match object.get("id").map(id_key) {
        Some(id) if store.posts.iter().any(|post| post_id(post) == id) => {
            return (
                StatusCode::CONFLICT,
                Json(json!({"error": format!("duplicate id {id}")})),
            )
                .into_response();
        }
        Some(_) => {}
        None => {
            let next = store
                .posts
                .iter()
                .filter_map(|post| post.get("id").and_then(Value::as_u64))
                .max()
                .unwrap_or(0)
                + 1;
            object.insert("id".into(), json!(next));
        }
    }

    store.posts.push(body.clone());
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn create_post(State(db): State<Db>, Json(body): Json<Value>) -> Response {
    insert_post(&db, body)
}

async fn create_protected_post(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let Some(authorization) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    else {
        return (StatusCode::UNAUTHORIZED, "Missing authorization header").into_response();
    };

    let known = authorization.strip_prefix("Bearer ").is_some_and(|token| {
        db.0.lock()
            .unwrap()
            .tokens
            .iter()
            .any(|t| t == token)
    });
    if !known {
        return (StatusCode::UNAUTHORIZED, "jwt malformed").into_response();
    }

    insert_post(&db, body)
}

async fn replace_post(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(mut body): Json<Value>,
) -> Response {
    let mut store = db.0.lock().unwrap();
    let Some(existing) = store.posts.iter_mut().find(|post| post_id(post) == id) else {
        return (StatusCode::NOT_FOUND, Json(json!({}))).into_response();
    };

    if let (Some(object), Some(original_id)) = (body.as_object_mut(), existing.get("id")) {
        object.insert("id".into(), original_id.clone());
    }
    *existing = body.clone();
    Json(body).into_response()
}

async fn delete_post(State(db): State<Db>, Path(id): Path<String>) -> Response {
    let mut store = db.0.lock().unwrap();
    let before = store.posts.len();
    store.posts.retain(|post| post_id(post) != id);
    if store.posts.len() == before {
        (StatusCode::NOT_FOUND, Json(json!({}))).into_response()
    } else {
        Json(json!({})).into_response()
    }
}

async fn register(State(db): State<Db>, Json(body): Json<Value>) -> Response {
    let (Some(email), Some(_password)) = (
        body.get("email").and_then(Value::as_str),
        body.get("password").and_then(Value::as_str),
    ) else {
        return (StatusCode::BAD_REQUEST, "Email and password are required").into_response();
    };

    let mut store = db.0.lock().unwrap();
    let user_id = store.tokens.len() + 1;
    let token = format!("token-{user_id}-{email}");
    store.tokens.push(token.clone());

    (
        StatusCode::CREATED,
        Json(json!({"accessToken": token, "user": {"id": user_id, "email": email}})),
    )
        .into_response()
}
