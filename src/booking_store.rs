// Booking state store
// Records the selected flight, passenger data and the async status of committing a booking

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightDetails {
    pub id: String,
    pub origin: String,
    pub destination: String,
    pub departure_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_date: Option<String>,
    pub price: f64,
    pub airline: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassengerInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingState {
    pub flight_details: Option<FlightDetails>,
    pub passenger_info: Option<PassengerInfo>,
    // Derived from flight_details when they are set, never dispatched directly
    pub is_round_trip: bool,
    pub loading: bool,
    pub error: Option<String>,
}

// Informal status read off the flags, precedence Loading > Error > Ready > Idle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStatus {
    Idle,
    Loading,
    Error,
    Ready,
}

impl BookingState {
    pub fn status(&self) -> BookingStatus {
        if self.loading {
            BookingStatus::Loading
        } else if self.error.is_some() {
            BookingStatus::Error
        } else if self.flight_details.is_some() {
            BookingStatus::Ready
        } else {
            BookingStatus::Idle
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BookingAction {
    SetLoading(bool),
    SetFlightDetails(FlightDetails),
    SetPassengerInfo(PassengerInfo),
    SetError(String),
    ClearBooking,
}

/// Applies one action to a booking state.
///
/// Every action is accepted in every state; sequencing rules belong to the caller.
pub fn booking_reducer(state: BookingState, action: BookingAction) -> BookingState {
    match action {
        BookingAction::SetLoading(loading) => BookingState { loading, ..state },
        BookingAction::SetFlightDetails(details) => BookingState {
            is_round_trip: details.return_date.is_some(),
            flight_details: Some(details),
            ..state
        },
        BookingAction::SetPassengerInfo(info) => BookingState {
            passenger_info: Some(info),
            ..state
        },
        BookingAction::SetError(message) => BookingState {
            error: Some(message),
            loading: false,
            ..state
        },
        // is_round_trip and loading are left as they were
        BookingAction::ClearBooking => BookingState {
            flight_details: None,
            passenger_info: None,
            error: None,
            ..state
        },
    }
}

/// Shared handle over a [`BookingState`] driven through [`booking_reducer`].
///
/// The watch channel is the only copy of the state, so subscribers always end on
/// the same value `snapshot()` returns.
#[derive(Clone)]
pub struct BookingStore {
    tx: Arc<watch::Sender<BookingState>>,
}

impl Default for BookingStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BookingStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(BookingState::default());
        Self { tx: Arc::new(tx) }
    }

    pub fn snapshot(&self) -> BookingState {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<BookingState> {
        self.tx.subscribe()
    }

    pub fn dispatch(&self, action: BookingAction) {
        // reduce and publish under the channel's lock
        self.tx.send_modify(|state| {
            *state = booking_reducer(std::mem::take(state), action);
            tracing::debug!(status = ?state.status(), "booking state updated");
        });
    }

    pub fn set_loading(&self, loading: bool) {
        self.dispatch(BookingAction::SetLoading(loading));
    }

    pub fn set_flight_details(&self, details: FlightDetails) {
        self.dispatch(BookingAction::SetFlightDetails(details));
    }

    pub fn set_passenger_info(&self, info: PassengerInfo) {
        self.dispatch(BookingAction::SetPassengerInfo(info));
    }

    pub fn set_error(&self, message: impl Into<String>) {
        self.dispatch(BookingAction::SetError(message.into()));
    }

    pub fn clear_booking(&self) {
        self.dispatch(BookingAction::ClearBooking);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{seq::SliceRandom, Rng};

    fn flight(return_date: Option<&str>) -> FlightDetails {
        FlightDetails {
            id: "FL123".to_string(),
            origin: "JFK".to_string(),
            destination: "LAX".to_string(),
            departure_date: "2023-05-15".to_string(),
            return_date: return_date.map(str::to_string),
            price: 299.99,
            airline: "Delta".to_string(),
        }
    }

    fn passenger() -> PassengerInfo {
        PassengerInfo {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: None,
        }
    }

    #[test]
    fn test_initial_state() {
        let state = BookingState::default();

        assert!(state.flight_details.is_none());
        assert!(state.passenger_info.is_none());
        assert!(!state.is_round_trip);
        assert!(!state.loading);
        assert!(state.error.is_none());
        assert_eq!(state.status(), BookingStatus::Idle);
    }

    #[test]
    fn test_flight_details_derive_round_trip() {
        let state = booking_reducer(
            BookingState::default(),
            BookingAction::SetFlightDetails(flight(Some("2023-05-20"))),
        );
        assert!(state.is_round_trip);
        assert_eq!(state.status(), BookingStatus::Ready);

        // replacing the details recomputes the flag
        let state = booking_reducer(state, BookingAction::SetFlightDetails(flight(None)));
        assert!(!state.is_round_trip);
        assert_eq!(state.flight_details, Some(flight(None)));
    }

    #[test]
    fn test_error_forces_not_loading() {
        let mut rng = rand::thread_rng();
        let actions = [
            BookingAction::SetLoading(true),
            BookingAction::SetLoading(false),
            BookingAction::SetFlightDetails(flight(Some("2023-05-20"))),
            BookingAction::SetPassengerInfo(passenger()),
            BookingAction::ClearBooking,
        ];

        for i in 0..100 {
            let mut state = BookingState::default();
            for _ in 0..rng.gen_range(0..8) {
                let action = actions.choose(&mut rng).unwrap().clone();
                state = booking_reducer(state, action);
            }

            let message = format!("failure {i}");
            let state = booking_reducer(state, BookingAction::SetError(message.clone()));

            assert!(!state.loading);
            assert_eq!(state.error, Some(message));
            assert_eq!(state.status(), BookingStatus::Error);
        }
    }

    #[test]
    fn test_clear_booking_keeps_round_trip_and_loading() {
        let mut state = BookingState::default();
        state = booking_reducer(state, BookingAction::SetFlightDetails(flight(Some("2023-05-20"))));
        state = booking_reducer(state, BookingAction::SetPassengerInfo(passenger()));
        state = booking_reducer(state, BookingAction::SetError("card declined".to_string()));
        state = booking_reducer(state, BookingAction::SetLoading(true));

        let before = state.clone();
        let state = booking_reducer(state, BookingAction::ClearBooking);

        assert!(state.flight_details.is_none());
        assert!(state.passenger_info.is_none());
        assert!(state.error.is_none());
        assert_eq!(state.loading, before.loading);
        assert_eq!(state.is_round_trip, before.is_round_trip);
        assert!(state.is_round_trip);
    }

    #[test]
    fn test_passenger_without_flight() {
        let state = booking_reducer(
            BookingState::default(),
            BookingAction::SetPassengerInfo(passenger()),
        );

        assert_eq!(state.passenger_info, Some(passenger()));
        assert!(state.flight_details.is_none());
        assert_eq!(state.status(), BookingStatus::Idle);
    }

    #[test]
    fn test_loading_status() {
        let state = booking_reducer(BookingState::default(), BookingAction::SetLoading(true));
        assert_eq!(state.status(), BookingStatus::Loading);

        let state = booking_reducer(state, BookingAction::SetLoading(false));
        assert_eq!(state.status(), BookingStatus::Idle);
    }

    #[test]
    fn test_store_dispatch_and_subscribe() {
        let store = BookingStore::new();
        let view = store.clone();
        let mut rx = view.subscribe();

        store.set_loading(true);
        store.set_flight_details(flight(Some("2023-05-20")));
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().status(), BookingStatus::Loading);

        store.set_error("timeout");
        let state = view.snapshot();
        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some("timeout"));
        assert!(state.is_round_trip);

        store.set_passenger_info(passenger());
        store.clear_booking();
        let state = view.snapshot();
        assert!(state.flight_details.is_none());
        assert!(state.passenger_info.is_none());
        assert!(state.is_round_trip);
        assert_eq!(*rx.borrow(), state);
    }

    #[test]
    fn test_concurrent_dispatch_subscribers_match_snapshot() {
        let store = BookingStore::new();
        let mut rx = store.subscribe();

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for i in 0..500 {
                        match i % 4 {
                            0 => store.set_loading(true),
                            1 => store.set_flight_details(flight((t % 2 == 0).then_some("2023-05-20"))),
                            2 => store.set_error(format!("thread {t} failure {i}")),
                            _ => store.clear_booking(),
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), store.snapshot());
    }

    #[test]
    fn test_serde_shape() {
        let state = booking_reducer(
            BookingState::default(),
            BookingAction::SetFlightDetails(flight(None)),
        );
        let json = serde_json::to_value(&state).unwrap();

        assert_eq!(json["isRoundTrip"], false);
        assert_eq!(json["flightDetails"]["departureDate"], "2023-05-15");
        assert!(json["flightDetails"].get("returnDate").is_none());
        assert!(json["passengerInfo"].is_null());

        let back: BookingState = serde_json::from_value(json).unwrap();
        assert_eq!(back, state);
    }
}
