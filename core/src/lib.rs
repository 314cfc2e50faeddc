//! Client-side core for the item service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). `ItemBrowser` layers the
//! page's behaviour on top: the rendered table, per-row viewing/editing
//! state, the name filter, and a full refresh after every mutation.
//!
//! # Design
//! - `ItemClient` is stateless; it holds only `base_url`.
//! - Each CRUD operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//! - `ItemBrowser` executes requests through a caller-supplied `Transport`.
//! - DTOs are defined independently from the server crate; integration
//!   tests catch schema drift.

pub mod browser;
pub mod client;
pub mod error;
pub mod http;
pub mod types;

pub use browser::{ItemBrowser, RowState, Transport, LOAD_FAILED, SAVE_FAILED};
pub use client::ItemClient;
pub use error::{ApiError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use types::{Item, ItemInput, Message};
