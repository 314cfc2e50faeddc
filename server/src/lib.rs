//! HTTP backend for the `items` table.
//!
//! # Overview
//! `ItemStore` wraps a bounded SQLite pool and exposes the four table
//! operations as parameterized statements. `app` maps the REST routes onto
//! the store and also serves the browser page that drives them.
//!
//! # Design
//! - The store is injected into the router as state; there is no global pool.
//! - Every mutating route runs exactly one statement.
//! - Store failures are logged with their cause and answered with a generic
//!   500 body.

use std::future::Future;

use axum::Router;
use tokio::net::TcpListener;

pub mod config;
pub mod error;
mod frontend;
pub mod routes;
pub mod store;

pub use config::{Config, DatabaseConfig};
pub use error::{AppError, ErrorBody, StoreError, ValidationError};
pub use routes::{ItemInput, ListQuery, Message, ValidItem};
pub use store::{Item, ItemStore};

pub fn app(store: ItemStore) -> Router {
    routes::router().with_state(store)
}

pub async fn run(listener: TcpListener, store: ItemStore) -> Result<(), std::io::Error> {
    axum::serve(listener, app(store)).await
}

/// Serve until `shutdown` resolves, letting in-flight requests finish.
pub async fn run_until<F>(
    listener: TcpListener,
    store: ItemStore,
    shutdown: F,
) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app(store))
        .with_graceful_shutdown(shutdown)
        .await
}
