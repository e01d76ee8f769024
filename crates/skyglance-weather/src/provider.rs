//! Forecast fetching with a cache in front of the Open-Meteo forecast API.

use reqwest::Client;
use std::time::Duration;
use tracing::instrument;

use crate::cache::{CacheKey, WeatherCache};
use crate::types::{WeatherError, WeatherSnapshot};

pub const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";
pub const FORECAST_DAYS: u8 = 7;

const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,weather_code,wind_speed_10m";
const DAILY_FIELDS: &str = "weather_code,temperature_2m_max,temperature_2m_min";
const USER_AGENT: &str = concat!("Skyglance/", env!("CARGO_PKG_VERSION"));

/// Build the HTTP client shared by the resolver and the provider.
///
/// # Errors
/// Fails if the TLS backend cannot be initialized.
pub fn build_client(timeout: Duration) -> Result<Client, WeatherError> {
    let client = Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Client,
    base_url: String,
    cache: WeatherCache,
}

impl WeatherProvider {
    pub fn new(client: Client, cache: WeatherCache) -> Self {
        Self::with_endpoint(client, FORECAST_URL, cache)
    }

    pub fn with_endpoint(client: Client, base_url: &str, cache: WeatherCache) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
            cache,
        }
    }

    pub fn cache(&self) -> &WeatherCache {
        &self.cache
    }

    /// Current conditions and the 7-day forecast, served from cache while fresh.
    ///
    /// # Errors
    /// `Status` for a non-success response, `Network` when the request cannot
    /// complete, `Parse` when the body is not a forecast.
    #[instrument(skip(self, key), fields(key = %key), level = "info")]
    pub async fn fetch(
        &self,
        latitude: f64,
        longitude: f64,
        key: &CacheKey,
    ) -> Result<WeatherSnapshot, WeatherError> {
        let storage_key = key.storage_key();
        if let Some(cached) = self.cache.get::<WeatherSnapshot>(&storage_key) {
            tracing::info!("Using cached weather data");
            return Ok(cached);
        }

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("current", CURRENT_FIELDS.to_string()),
                ("daily", DAILY_FIELDS.to_string()),
                ("forecast_days", FORECAST_DAYS.to_string()),
                ("timezone", "auto".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Forecast request returned status {}", status);
            return Err(WeatherError::Status(status));
        }

        let body = response.bytes().await?;
        let snapshot: WeatherSnapshot = serde_json::from_slice(&body)
            .map_err(|e| WeatherError::Parse(format!("forecast body: {}", e)))?;

        if let Err(e) = self.cache.put(&storage_key, &snapshot) {
            tracing::warn!("Failed to save weather cache: {}", e);
        }

        tracing::info!("Weather data fetched successfully");
        Ok(snapshot)
    }
}
