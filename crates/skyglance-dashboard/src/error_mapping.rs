//! Maps weather lookup errors to skyglance_core::AppError for consistent
//! user-facing messages.

use skyglance_core::{AppError, LookupError};
use skyglance_weather::WeatherError;

pub trait WeatherErrorExt {
    fn into_app_error(self) -> AppError;
}

impl WeatherErrorExt for WeatherError {
    fn into_app_error(self) -> AppError {
        let lookup = match self {
            WeatherError::LocationNotFound(query) => LookupError::LocationNotFound(query),
            WeatherError::LookupFailed(e) => LookupError::LookupFailed(e.to_string()),
            // Every forecast failure reports as the fetch step, whatever the cause
            WeatherError::Status(status) => LookupError::ApiError(status.to_string()),
            WeatherError::Network(e) => LookupError::ApiError(e.to_string()),
            WeatherError::Parse(msg) => LookupError::ApiError(msg),
            WeatherError::Location(e) => LookupError::PositionUnavailable(e.to_string()),
            WeatherError::Cache(msg) => LookupError::CacheError(msg),
        };
        AppError::Lookup(lookup)
    }
}
