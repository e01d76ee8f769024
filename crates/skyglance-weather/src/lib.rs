//! Weather lookup for Skyglance
//!
//! Resolves place names through Open-Meteo geocoding and fetches current
//! conditions plus a 7-day forecast, with a short-lived cache in front.

pub mod cache;
pub mod geocode;
pub mod location;
pub mod provider;
pub mod types;

pub use cache::{CacheKey, CacheStorage, Clock, FileStorage, MemoryStorage, SystemClock, WeatherCache};
pub use geocode::LocationResolver;
pub use location::{FixedPosition, NoPosition, Position, PositionSource};
pub use provider::{build_client, WeatherProvider};
pub use types::*;
