//! In-memory emulation of the content backend.
//!
//! Serves the post collection and the signed-in user's profile under `/api`
//! with the same envelopes as the real backend: `{"data": ...}` for single
//! resources, `{"data": [...], "meta": {"pagination": ...}}` for lists, and
//! `{"data": null, "error": {...}}` for failures.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{rejection::JsonRejection, Path, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{info, warn};
use uuid::Uuid;

pub const PAGE_SIZE: u64 = 25;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: u64,
    pub attributes: PostAttributes,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostAttributes {
    pub title: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PostList {
    pub data: Vec<Post>,
    pub meta: Meta,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Meta {
    pub pagination: Pagination,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u64,
    pub page_count: u64,
    pub page_size: u64,
    pub total: u64,
}

#[derive(Debug, Deserialize)]
pub struct PostInput {
    pub title: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: u64,
    pub document_id: String,
    pub username: String,
    pub email: String,
    pub confirmed: bool,
    pub blocked: bool,
    pub professional: bool,
    pub created_at: String,
    pub updated_at: String,
    pub addresses: Vec<Address>,
    pub adverts: Vec<Advert>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: u64,
    pub document_id: String,
    pub first_name: String,
    pub last_name: String,
    pub first_line_address: String,
    pub second_line_address: String,
    pub post_code: String,
    pub city: String,
    pub country: String,
    pub phone_number: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Advert {
    pub id: u64,
    pub document_id: String,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub created_at: String,
    pub updated_at: String,
}

/// Partial address update; absent fields keep their value.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub first_line_address: Option<String>,
    pub second_line_address: Option<String>,
    pub post_code: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub phone_number: Option<String>,
}

struct Store {
    posts: BTreeMap<u64, Post>,
    next_post_id: u64,
    user: User,
}

impl Store {
    fn seeded() -> Self {
        Self {
            posts: BTreeMap::new(),
            next_post_id: 1,
            user: demo_user(),
        }
    }
}

#[derive(Clone)]
struct AppState {
    store: Arc<RwLock<Store>>,
    token: Option<Arc<str>>,
}

pub const DEMO_EMAIL: &str = "demo@goiaba.test";

/// The signed-in user every fresh server starts with.
pub fn demo_user() -> User {
    let created = now();
    User {
        id: 1,
        document_id: Uuid::new_v4().to_string(),
        username: "demo".to_string(),
        email: DEMO_EMAIL.to_string(),
        confirmed: true,
        blocked: false,
        professional: false,
        created_at: created.clone(),
        updated_at: created.clone(),
        addresses: vec![Address {
            id: 1,
            document_id: Uuid::new_v4().to_string(),
            first_name: "Demo".to_string(),
            last_name: "User".to_string(),
            first_line_address: "1 Rua das Flores".to_string(),
            second_line_address: String::new(),
            post_code: "4050-262".to_string(),
            city: "Porto".to_string(),
            country: "Portugal".to_string(),
            phone_number: "+351 220 000 000".to_string(),
        }],
        adverts: vec![Advert {
            id: 1,
            document_id: Uuid::new_v4().to_string(),
            title: "Bicycle".to_string(),
            description: "Barely used".to_string(),
            price: 120.0,
            created_at: created.clone(),
            updated_at: created,
        }],
    }
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Router with no token check.
pub fn app() -> Router {
    router(None)
}

/// Router that answers 401 unless `Authorization: Bearer <token>` matches.
pub fn app_with_token(token: &str) -> Router {
    router(Some(Arc::from(token)))
}

fn router(token: Option<Arc<str>>) -> Router {
    let state = AppState {
        store: Arc::new(RwLock::new(Store::seeded())),
        token,
    };
    Router::new()
        .route("/api/posts", get(list_posts).post(create_post))
        .route(
            "/api/posts/{id}",
            get(get_post).put(update_post).delete(delete_post),
        )
        .route("/api/users/me", get(users_me))
        .route(
            "/api/addresses/{document_id}",
            put(update_address).delete(delete_address),
        )
        .layer(middleware::from_fn_with_state(state.clone(), require_token))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with_token(listener: TcpListener, token: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_token(token)).await
}

/// Backend-style error body.
#[derive(Debug)]
pub struct Failure {
    status: StatusCode,
    name: &'static str,
    message: String,
}

impl Failure {
    fn not_found() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            name: "NotFoundError",
            message: "Not Found".to_string(),
        }
    }

    fn validation(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            name: "ValidationError",
            message: message.into(),
        }
    }

    fn unauthorized() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            name: "UnauthorizedError",
            message: "Missing or invalid credentials".to_string(),
        }
    }
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        let body = json!({
            "data": null,
            "error": {
                "status": self.status.as_u16(),
                "name": self.name,
                "message": self.message,
            }
        });
        (self.status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for Failure {
    fn from(rejection: JsonRejection) -> Self {
        Failure::validation(rejection.body_text())
    }
}

async fn require_token(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if let Some(expected) = &state.token {
        let presented = request
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "));
        if presented != Some(expected.as_ref()) {
            warn!(uri = %request.uri(), "rejected request without a valid token");
            return Failure::unauthorized().into_response();
        }
    }
    next.run(request).await
}

fn validated_title(
    input: Result<Json<Envelope<PostInput>>, JsonRejection>,
) -> Result<String, Failure> {
    let Json(Envelope { data }) = input?;
    let title = data.title.trim();
    if title.is_empty() {
        return Err(Failure::validation("title must not be empty"));
    }
    Ok(title.to_string())
}

async fn list_posts(State(state): State<AppState>) -> Json<PostList> {
    let store = state.store.read().await;
    let total = store.posts.len() as u64;
    Json(PostList {
        data: store.posts.values().cloned().collect(),
        meta: Meta {
            pagination: Pagination {
                page: 1,
                page_count: total.div_ceil(PAGE_SIZE),
                page_size: PAGE_SIZE,
                total,
            },
        },
    })
}

async fn create_post(
    State(state): State<AppState>,
    input: Result<Json<Envelope<PostInput>>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<Post>>), Failure> {
    let title = validated_title(input)?;
    let mut store = state.store.write().await;
    let id = store.next_post_id;
    store.next_post_id += 1;
    let stamp = now();
    let post = Post {
        id,
        attributes: PostAttributes {
            title,
            created_at: stamp.clone(),
            updated_at: stamp,
        },
    };
    store.posts.insert(id, post.clone());
    info!(id, "post created");
    Ok((StatusCode::CREATED, Json(Envelope { data: post })))
}

async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Envelope<Post>>, Failure> {
    let store = state.store.read().await;
    let post = store.posts.get(&id).cloned().ok_or_else(Failure::not_found)?;
    Ok(Json(Envelope { data: post }))
}

async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    input: Result<Json<Envelope<PostInput>>, JsonRejection>,
) -> Result<Json<Envelope<Post>>, Failure> {
    let mut store = state.store.write().await;
    let post = store.posts.get_mut(&id).ok_or_else(Failure::not_found)?;
    post.attributes.title = validated_title(input)?;
    post.attributes.updated_at = now();
    info!(id, "post updated");
    Ok(Json(Envelope { data: post.clone() }))
}

async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<StatusCode, Failure> {
    let mut store = state.store.write().await;
    store.posts.remove(&id).ok_or_else(Failure::not_found)?;
    info!(id, "post deleted");
    Ok(StatusCode::NO_CONTENT)
}

async fn users_me(State(state): State<AppState>) -> Json<User> {
    Json(state.store.read().await.user.clone())
}

async fn update_address(
    State(state): State<AppState>,
    Path(document_id): Path<String>,
    input: Result<Json<Envelope<AddressInput>>, JsonRejection>,
) -> Result<Json<Envelope<Address>>, Failure> {
    let Json(Envelope { data }) = input?;
    let mut store = state.store.write().await;
    let address = store
        .user
        .addresses
        .iter_mut()
        .find(|address| address.document_id == document_id)
        .ok_or_else(Failure::not_found)?;

    let fields = [
        (&mut address.first_name, data.first_name),
        (&mut address.last_name, data.last_name),
        (&mut address.first_line_address, data.first_line_address),
        (&mut address.second_line_address, data.second_line_address),
        (&mut address.post_code, data.post_code),
        (&mut address.city, data.city),
        (&mut address.country, data.country),
        (&mut address.phone_number, data.phone_number),
    ];
    for (field, value) in fields {
        if let Some(value) = value {
            *field = value;
        }
    }
    info!(%document_id, "address updated");
    Ok(Json(Envelope {
        data: address.clone(),
    }))
}

async fn delete_address(
    State(state): State<AppState>,
    Path(document_id): Path<String>,
) -> Result<StatusCode, Failure> {
    let mut store = state.store.write().await;
    let addresses = &mut store.user.addresses;
    let before = addresses.len();
    addresses.retain(|address| address.document_id != document_id);
    if addresses.len() == before {
        return Err(Failure::not_found());
    }
    info!(%document_id, "address deleted");
    Ok(StatusCode::NO_CONTENT)
}
