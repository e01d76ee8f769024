//! Forward geocoding: convert a free-text place name to coordinates.
//! Uses the Open-Meteo geocoding API - free, no API key required.

use reqwest::Client;
use serde::Deserialize;
use tracing::instrument;

use crate::types::{Coordinates, WeatherError};

pub const GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
pub const DEFAULT_LANGUAGE: &str = "ar";

/// Joins display-name components (Arabic comma)
pub const NAME_SEPARATOR: &str = "، ";

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    results: Option<Vec<GeocodingResult>>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResult {
    name: String,
    admin1: Option<String>,
    country: Option<String>,
    latitude: f64,
    longitude: f64,
}

/// Join the non-empty components with [`NAME_SEPARATOR`].
pub fn display_name(name: &str, admin1: Option<&str>, country: Option<&str>) -> String {
    [Some(name), admin1, country]
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(NAME_SEPARATOR)
}

/// Resolves place names through the geocoding API. Never cached.
#[derive(Debug, Clone)]
pub struct LocationResolver {
    client: Client,
    base_url: String,
    language: String,
}

impl LocationResolver {
    pub fn new(client: Client) -> Self {
        Self::with_endpoint(client, GEOCODING_URL, DEFAULT_LANGUAGE)
    }

    pub fn with_endpoint(client: Client, base_url: &str, language: &str) -> Self {
        Self {
            client,
            base_url: base_url.to_string(),
            language: language.to_string(),
        }
    }

    /// Resolve `query` to the best single match.
    ///
    /// # Errors
    /// `LocationNotFound` when there is no match or the service answers with a
    /// non-success status; `LookupFailed` when the request cannot complete.
    #[instrument(skip(self), level = "info")]
    pub async fn resolve(&self, query: &str) -> Result<Coordinates, WeatherError> {
        if query.trim().is_empty() {
            return Err(WeatherError::LocationNotFound(query.to_string()));
        }

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("name", query),
                ("count", "1"),
                ("language", self.language.as_str()),
            ])
            .send()
            .await
            .map_err(WeatherError::LookupFailed)?;

        if !response.status().is_success() {
            tracing::debug!("Geocoding returned status {}", response.status());
            return Err(WeatherError::LocationNotFound(query.to_string()));
        }

        let body: GeocodingResponse = response.json().await.map_err(WeatherError::LookupFailed)?;

        let first = body
            .results
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| WeatherError::LocationNotFound(query.to_string()))?;

        let coordinates = Coordinates {
            latitude: first.latitude,
            longitude: first.longitude,
            display_name: display_name(
                &first.name,
                first.admin1.as_deref(),
                first.country.as_deref(),
            ),
        };

        tracing::info!(
            "Resolved to {} ({}, {})",
            coordinates.display_name,
            coordinates.latitude,
            coordinates.longitude
        );
        Ok(coordinates)
    }
}
