//! Stateless HTTP request builder and response parser for the item API.
//!
//! # Design
//! `ItemClient` holds only a `base_url` and carries no mutable state between
//! calls. Each CRUD operation is split into a `build_*` method that produces
//! an `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{ErrorBody, Item, ItemInput, Message};

#[derive(Serialize)]
struct ListQuery<'a> {
    name: &'a str,
}

/// Synchronous, stateless client for the item API.
#[derive(Debug, Clone)]
pub struct ItemClient {
    base_url: String,
}

impl ItemClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// `GET /items`, optionally narrowed to names containing `filter`.
    /// An empty filter produces the unfiltered request.
    pub fn build_list_items(&self, filter: Option<&str>) -> Result<HttpRequest, ApiError> {
        let mut path = format!("{}/items", self.base_url);
        if let Some(name) = filter.filter(|f| !f.is_empty()) {
            let query = serde_urlencoded::to_string(ListQuery { name })
                .map_err(|e| ApiError::SerializationError(e.to_string()))?;
            path.push('?');
            path.push_str(&query);
        }
        Ok(HttpRequest {
            method: HttpMethod::Get,
            path,
            headers: Vec::new(),
            body: None,
        })
    }

    pub fn build_create_item(&self, input: &ItemInput) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Post, format!("{}/items", self.base_url), input)
    }

    pub fn build_update_item(&self, id: i64, input: &ItemInput) -> Result<HttpRequest, ApiError> {
        self.json_request(HttpMethod::Put, format!("{}/items/{id}", self.base_url), input)
    }

    pub fn build_delete_item(&self, id: i64) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: format!("{}/items/{id}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn parse_list_items(&self, response: HttpResponse) -> Result<Vec<Item>, ApiError> {
        check_status(&response, 200)?;
        decode(&response.body)
    }

    pub fn parse_create_item(&self, response: HttpResponse) -> Result<Item, ApiError> {
        check_status(&response, 201)?;
        decode(&response.body)
    }

    pub fn parse_update_item(&self, response: HttpResponse) -> Result<Message, ApiError> {
        check_status(&response, 200)?;
        decode(&response.body)
    }

    pub fn parse_delete_item(&self, response: HttpResponse) -> Result<Message, ApiError> {
        check_status(&response, 200)?;
        decode(&response.body)
    }

    fn json_request(
        &self,
        method: HttpMethod,
        path: String,
        input: &ItemInput,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method,
            path,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    if response.status == 400 {
        let message = serde_json::from_str::<ErrorBody>(&response.body)
            .map(|b| b.error)
            .unwrap_or_else(|_| response.body.clone());
        return Err(ApiError::Validation(message));
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}
