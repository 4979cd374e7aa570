// Search parameter store
// Holds the working flight search query that the search form edits before it is submitted

use std::{sync::Arc, time::Duration};

use chrono::NaiveDate;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::watch;

use crate::{
    config::CoreConfig,
    debounce::{debounce, DebounceError, Debounced},
};

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Invalid {field} date {value:?}: {source}")]
    InvalidDate {
        field: &'static str,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TripType {
    #[default]
    Roundtrip,
    Oneway,
    Multicity,
}

// adults >= 1 and infants <= adults are form conventions, nothing here enforces them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passengers {
    pub adults: u32,
    pub children: u32,
    pub infants: u32,
}

impl Default for Passengers {
    fn default() -> Self {
        Self {
            adults: 1,
            children: 0,
            infants: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub trip_type: TripType,
    pub origin: String,
    pub destination: String,
    // ISO-8601 dates, empty until the user picks one
    pub depart_date: String,
    pub return_date: String,
    pub passengers: Passengers,
}

impl SearchParams {
    pub fn depart_on(&self) -> Result<Option<NaiveDate>, SearchError> {
        parse_iso_date("depart", &self.depart_date)
    }

    // Still parsed for one-way trips: the value survives when the form disables the input
    pub fn return_on(&self) -> Result<Option<NaiveDate>, SearchError> {
        parse_iso_date("return", &self.return_date)
    }

    fn merge(&mut self, update: SearchParamsUpdate) {
        let SearchParamsUpdate {
            trip_type,
            origin,
            destination,
            depart_date,
            return_date,
            passengers,
        } = update;

        if let Some(trip_type) = trip_type {
            self.trip_type = trip_type;
        }
        if let Some(origin) = origin {
            self.origin = origin;
        }
        if let Some(destination) = destination {
            self.destination = destination;
        }
        if let Some(depart_date) = depart_date {
            self.depart_date = depart_date;
        }
        if let Some(return_date) = return_date {
            self.return_date = return_date;
        }
        if let Some(passengers) = passengers {
            self.passengers = passengers;
        }
    }
}

fn parse_iso_date(field: &'static str, value: &str) -> Result<Option<NaiveDate>, SearchError> {
    if value.is_empty() {
        return Ok(None);
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(Some)
        .map_err(|source| SearchError::InvalidDate {
            field,
            value: value.to_string(),
            source,
        })
}

/// Partial overlay for [`SearchParams`]. Fields left as `None` keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParamsUpdate {
    pub trip_type: Option<TripType>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub depart_date: Option<String>,
    pub return_date: Option<String>,
    pub passengers: Option<Passengers>,
}

impl SearchParamsUpdate {
    pub fn trip_type(mut self, trip_type: TripType) -> Self {
        self.trip_type = Some(trip_type);
        self
    }

    pub fn origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    pub fn depart_date(mut self, depart_date: impl Into<String>) -> Self {
        self.depart_date = Some(depart_date.into());
        self
    }

    pub fn return_date(mut self, return_date: impl Into<String>) -> Self {
        self.return_date = Some(return_date.into());
        self
    }

    pub fn passengers(mut self, passengers: Passengers) -> Self {
        self.passengers = Some(passengers);
        self
    }
}

/// Handle to the working search query.
///
/// Clones share the same state, so the caller builds one store and hands clones to
/// whichever views read or edit the query. The watch channel holds the only copy of
/// the params and every change is published to subscribers.
#[derive(Clone)]
pub struct SearchStore {
    tx: Arc<watch::Sender<SearchParams>>,
    last_executed: Arc<Mutex<Option<SearchParams>>>,
}

impl Default for SearchStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchStore {
    pub fn new() -> Self {
        Self::with_params(SearchParams::default())
    }

    pub fn with_config(config: &CoreConfig) -> Self {
        Self::with_params(SearchParams {
            passengers: config.default_passengers,
            ..Default::default()
        })
    }

    fn with_params(params: SearchParams) -> Self {
        let (tx, _rx) = watch::channel(params);
        Self {
            tx: Arc::new(tx),
            last_executed: Arc::new(Mutex::new(None)),
        }
    }

    pub fn snapshot(&self) -> SearchParams {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchParams> {
        self.tx.subscribe()
    }

    pub fn update_search_params(&self, update: SearchParamsUpdate) {
        tracing::debug!(?update, "updating search params");

        // merge and publish in one step; works with no receivers left
        self.tx.send_modify(|params| params.merge(update));
    }

    // Hook for the network layer. Keep it argument-less with no return value.
    pub fn execute_search(&self) {
        let params = self.snapshot();

        tracing::info!(
            trip_type = ?params.trip_type,
            origin = %params.origin,
            destination = %params.destination,
            depart_date = %params.depart_date,
            return_date = %params.return_date,
            adults = params.passengers.adults,
            children = params.passengers.children,
            infants = params.passengers.infants,
            "executing flight search"
        );

        *self.last_executed.lock() = Some(params);
    }

    pub fn last_executed(&self) -> Option<SearchParams> {
        self.last_executed.lock().clone()
    }

    /// Returns a trailing-edge debounced updater for rapid form input.
    ///
    /// Must be called from inside a tokio runtime.
    pub fn debounced_updater(
        &self,
        wait: Duration,
    ) -> Result<Debounced<SearchParamsUpdate>, DebounceError> {
        let store = self.clone();
        debounce(move |update| store.update_search_params(update), wait)
    }

    pub fn config_debounced_updater(
        &self,
        config: &CoreConfig,
    ) -> Result<Debounced<SearchParamsUpdate>, DebounceError> {
        self.debounced_updater(Duration::from_millis(config.search_debounce_ms))
    }
}
