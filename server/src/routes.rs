//! REST routes over [`ItemStore`].
//!
//! | Method | Path          | Success                 |
//! |--------|---------------|-------------------------|
//! | GET    | `/items`      | 200, array of items     |
//! | POST   | `/items`      | 201, created item       |
//! | PUT    | `/items/{id}` | 200, `{message}`        |
//! | DELETE | `/items/{id}` | 200, `{message}`        |
//!
//! Update and delete answer 200 whether or not a row matched.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{AppError, ValidationError};
use crate::frontend;
use crate::store::{Item, ItemStore};

/// Body of `POST /items` and `PUT /items/{id}`. Both fields are optional at
/// the JSON level so that a missing field is reported as a validation error
/// instead of a deserialization failure.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ItemInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// An [`ItemInput`] whose fields are both present and non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidItem {
    pub name: String,
    pub description: String,
}

impl ItemInput {
    /// Absent, `null` and `""` are missing. Any other string, whitespace
    /// included, is kept as sent.
    pub fn validate(self) -> Result<ValidItem, ValidationError> {
        match (self.name, self.description) {
            (Some(name), Some(description)) if !name.is_empty() && !description.is_empty() => {
                Ok(ValidItem { name, description })
            }
            _ => Err(ValidationError),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub message: String,
}

impl Message {
    fn new(message: &str) -> Json<Self> {
        Json(Self {
            message: message.to_string(),
        })
    }
}

pub fn router() -> Router<ItemStore> {
    Router::new()
        .route("/", get(frontend::index))
        .route("/app.js", get(frontend::script))
        .route("/items", get(list_items).post(create_item))
        .route("/items/{id}", put(update_item).delete(delete_item))
}

fn read_body(payload: Result<Json<ItemInput>, JsonRejection>) -> Result<ValidItem, AppError> {
    let Json(input) = payload.map_err(|rejection| AppError::MalformedBody(rejection.body_text()))?;
    Ok(input.validate()?)
}

async fn list_items(
    State(store): State<ItemStore>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Item>>, AppError> {
    let items = store.list(query.name.as_deref()).await?;
    debug!(count = items.len(), filter = ?query.name, "listed items");
    Ok(Json(items))
}

async fn create_item(
    State(store): State<ItemStore>,
    payload: Result<Json<ItemInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Item>), AppError> {
    let input = read_body(payload)?;
    let item = store.insert(&input.name, &input.description).await?;
    info!(id = item.id, "item created");
    Ok((StatusCode::CREATED, Json(item)))
}

async fn update_item(
    State(store): State<ItemStore>,
    Path(id): Path<i64>,
    payload: Result<Json<ItemInput>, JsonRejection>,
) -> Result<Json<Message>, AppError> {
    let input = read_body(payload)?;
    let changed = store.update(id, &input.name, &input.description).await?;
    info!(id, changed, "item updated");
    Ok(Message::new("Item updated successfully"))
}

async fn delete_item(
    State(store): State<ItemStore>,
    Path(id): Path<i64>,
) -> Result<Json<Message>, AppError> {
    let removed = store.delete(id).await?;
    info!(id, removed, "item deleted");
    Ok(Message::new("Item deleted successfully"))
}
