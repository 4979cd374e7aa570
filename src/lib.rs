// Client-side state core for the flight search and booking front end

// Stores consumed by the views
pub mod booking_store;
pub mod search_store;

// Pure helpers
pub mod date_utils;
pub mod debounce;
pub mod locale;

pub mod config;

// Re-export key types for convenience
pub use booking_store::{
    booking_reducer, BookingAction, BookingState, BookingStatus, BookingStore, FlightDetails,
    PassengerInfo,
};
pub use config::{ConfigError, CoreConfig};
pub use date_utils::{
    add_days, format_date, format_date_range, get_date_difference, is_date_in_past,
    is_date_in_past_on, local_date, DateFormatOptions,
};
pub use debounce::{debounce, DebounceError, Debounced};
pub use locale::{format_localized_date, format_number, format_price, to_arabic_numerals};
pub use search_store::{
    Passengers, SearchError, SearchParams, SearchParamsUpdate, SearchStore, TripType,
};
