//! The item page as a state machine.
//!
//! # Design
//! `ItemBrowser` owns what the page shows: the rows from the last successful
//! list, a `RowState` per row id, and the name filter. Every completed add,
//! save or delete is followed by a full unfiltered refresh that replaces all
//! rows and returns each of them to `Viewing`; nothing is patched locally.
//! The filter never causes a request, it only decides which of the rendered
//! rows are visible.
//!
//! Failures do not propagate to the caller. They raise a single pending
//! alert that the host shows and clears with `take_alert`. Nothing is
//! retried.

use std::collections::HashMap;

use crate::client::ItemClient;
use crate::error::{ApiError, TransportError};
use crate::http::{HttpRequest, HttpResponse};
use crate::types::{Item, ItemInput};

pub const LOAD_FAILED: &str = "Failed to load data";
pub const SAVE_FAILED: &str = "Failed to save data";

/// Executes one HTTP round-trip on behalf of the browser. Any status code
/// is a successful round-trip; only a failure to get a response at all is a
/// `TransportError`.
pub trait Transport {
    fn execute(&mut self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<F> Transport for F
where
    F: FnMut(HttpRequest) -> Result<HttpResponse, TransportError>,
{
    fn execute(&mut self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self(request)
    }
}

/// Display state of one table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowState {
    Viewing,
    /// Editable fields holding the draft that `save` will send.
    Editing { name: String, description: String },
}

impl RowState {
    /// Label of the row's toggle control.
    pub fn control_label(&self) -> &'static str {
        match self {
            RowState::Viewing => "Modify",
            RowState::Editing { .. } => "Save",
        }
    }
}

pub struct ItemBrowser<T> {
    client: ItemClient,
    transport: T,
    rows: Vec<Item>,
    states: HashMap<i64, RowState>,
    filter: String,
    alert: Option<String>,
}

impl<T: Transport> ItemBrowser<T> {
    /// An empty page. Call [`ItemBrowser::refresh`] to load it.
    pub fn new(client: ItemClient, transport: T) -> Self {
        Self {
            client,
            transport,
            rows: Vec::new(),
            states: HashMap::new(),
            filter: String::new(),
            alert: None,
        }
    }

    /// Rows as last rendered, in server order, ignoring the filter.
    pub fn rows(&self) -> &[Item] {
        &self.rows
    }

    pub fn row_state(&self, id: i64) -> Option<&RowState> {
        self.states.get(&id)
    }

    pub fn control_label(&self, id: i64) -> Option<&'static str> {
        self.states.get(&id).map(RowState::control_label)
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: &str) {
        self.filter = filter.to_string();
    }

    /// Rendered rows whose name contains the filter, ignoring case.
    pub fn visible_rows(&self) -> Vec<&Item> {
        let needle = self.filter.to_lowercase();
        self.rows
            .iter()
            .filter(|item| item.name.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn take_alert(&mut self) -> Option<String> {
        self.alert.take()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Re-fetch the full list and re-render every row in `Viewing`.
    /// On failure the previous rows stay on screen and an alert is raised.
    /// Returns whether the list was replaced.
    pub fn refresh(&mut self) -> bool {
        let loaded = match self.client.build_list_items(None) {
            Ok(request) => match self.transport.execute(request) {
                Ok(response) => self.client.parse_list_items(response).ok(),
                Err(_) => None,
            },
            Err(_) => None,
        };

        match loaded {
            Some(items) => {
                self.states = items.iter().map(|item| (item.id, RowState::Viewing)).collect();
                self.rows = items;
                true
            }
            None => {
                self.raise(LOAD_FAILED);
                false
            }
        }
    }

    /// Submit a new item. Surrounding whitespace is trimmed first.
    pub fn add(&mut self, name: &str, description: &str) {
        let input = ItemInput::new(name.trim(), description.trim());
        let request = self.client.build_create_item(&input);
        self.mutate(request, ItemClient::parse_create_item);
    }

    /// `Viewing` enters `Editing` with the row's current values;
    /// `Editing` saves the draft.
    pub fn toggle(&mut self, id: i64) {
        match self.states.get(&id) {
            Some(RowState::Viewing) => {
                if let Some(item) = self.rows.iter().find(|item| item.id == id) {
                    let editing = RowState::Editing {
                        name: item.name.clone(),
                        description: item.description.clone(),
                    };
                    self.states.insert(id, editing);
                }
            }
            Some(RowState::Editing { .. }) => self.save(id),
            None => {}
        }
    }

    /// Replace the draft of an editing row. Returns false if the row is not
    /// being edited.
    pub fn edit(&mut self, id: i64, name: &str, description: &str) -> bool {
        match self.states.get_mut(&id) {
            Some(RowState::Editing {
                name: draft_name,
                description: draft_description,
            }) => {
                *draft_name = name.to_string();
                *draft_description = description.to_string();
                true
            }
            _ => false,
        }
    }

    /// Send the draft of an editing row. Rows that are not being edited are
    /// left alone.
    pub fn save(&mut self, id: i64) {
        let input = match self.states.get(&id) {
            Some(RowState::Editing { name, description }) => {
                ItemInput::new(name.clone(), description.clone())
            }
            _ => return,
        };
        let request = self.client.build_update_item(id, &input);
        self.mutate(request, ItemClient::parse_update_item);
    }

    pub fn delete(&mut self, id: i64) {
        let request = Ok(self.client.build_delete_item(id));
        self.mutate(request, ItemClient::parse_delete_item);
    }

    /// Run one mutating request. Once a response arrives, whatever its
    /// status, the page refreshes.
    fn mutate<R>(
        &mut self,
        request: Result<HttpRequest, ApiError>,
        parse: fn(&ItemClient, HttpResponse) -> Result<R, ApiError>,
    ) {
        let response = match request {
            Ok(request) => self.transport.execute(request),
            Err(_) => {
                self.raise(SAVE_FAILED);
                return;
            }
        };
        match response {
            Ok(response) => {
                if parse(&self.client, response).is_err() {
                    self.raise(SAVE_FAILED);
                }
                self.refresh();
            }
            Err(_) => self.raise(SAVE_FAILED),
        }
    }

    /// Only one alert is shown at a time; later failures while one is
    /// pending are dropped.
    fn raise(&mut self, message: &str) {
        if self.alert.is_none() {
            self.alert = Some(message.to_string());
        }
    }
}
