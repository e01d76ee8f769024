use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Description and icon identifier for a WMO weather code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeatherCodeDescriptor {
    pub description: &'static str,
    pub icon: &'static str,
}

impl WeatherCodeDescriptor {
    /// Shown for unmapped or missing codes
    pub const UNKNOWN: Self = Self::new("Unknown weather", "01d");

    const fn new(description: &'static str, icon: &'static str) -> Self {
        Self { description, icon }
    }

    /// Look up a WMO weather code.
    /// See: https://open-meteo.com/en/docs#weathervariables
    ///
    /// Total over `i32`: unmapped codes fall back to "Unknown weather".
    pub fn from_wmo_code(code: i32) -> Self {
        match code {
            0 => Self::new("Clear sky", "01d"),
            1 => Self::new("Mostly clear", "02d"),
            2 => Self::new("Partly cloudy", "03d"),
            3 => Self::new("Overcast", "04d"),
            45 => Self::new("Fog", "50d"),
            48 => Self::new("Dense fog", "50d"),
            51 => Self::new("Light drizzle", "09d"),
            53 => Self::new("Moderate drizzle", "09d"),
            55 => Self::new("Dense drizzle", "09d"),
            61 => Self::new("Light rain", "10d"),
            63 => Self::new("Moderate rain", "10d"),
            65 => Self::new("Heavy rain", "10d"),
            71 => Self::new("Light snow", "13d"),
            73 => Self::new("Moderate snow", "13d"),
            75 => Self::new("Heavy snow", "13d"),
            80 => Self::new("Rain showers", "09d"),
            81 => Self::new("Moderate showers", "09d"),
            82 => Self::new("Heavy showers", "09d"),
            95 => Self::new("Thunderstorm", "11d"),
            99 => Self::new("Severe thunderstorm", "11d"),
            _ => Self::UNKNOWN,
        }
    }
}

/// Resolved place: coordinates plus the name shown to the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
    pub display_name: String,
}

/// Current conditions, stored with the upstream field names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(rename = "temperature_2m")]
    pub temperature: f64,
    #[serde(rename = "relative_humidity_2m")]
    pub humidity: f64,
    pub weather_code: i32,
    #[serde(rename = "wind_speed_10m")]
    pub wind_speed: f64,
}

/// Daily forecast as parallel arrays, the way the API returns it.
///
/// Values are `null` upstream when no model covers a day, so each element
/// is optional and passed through as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySeries {
    pub time: Vec<NaiveDate>,
    pub weather_code: Vec<Option<i32>>,
    pub temperature_2m_max: Vec<Option<f64>>,
    pub temperature_2m_min: Vec<Option<f64>>,
}

/// One day of the forecast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayForecast {
    pub date: NaiveDate,
    pub weather_code: Option<i32>,
    pub high: Option<f64>,
    pub low: Option<f64>,
}

impl DayForecast {
    pub fn condition(&self) -> WeatherCodeDescriptor {
        self.weather_code
            .map_or(WeatherCodeDescriptor::UNKNOWN, WeatherCodeDescriptor::from_wmo_code)
    }
}

impl DailySeries {
    /// Days in order; truncated to the shortest array if the series are ragged.
    pub fn days(&self) -> Vec<DayForecast> {
        self.time
            .iter()
            .zip(&self.weather_code)
            .zip(self.temperature_2m_max.iter().zip(&self.temperature_2m_min))
            .map(|((date, code), (high, low))| DayForecast {
                date: *date,
                weather_code: *code,
                high: *high,
                low: *low,
            })
            .collect()
    }
}

/// Current conditions plus the daily forecast for one location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub current: CurrentConditions,
    pub daily: DailySeries,
}

impl WeatherSnapshot {
    pub fn condition(&self) -> WeatherCodeDescriptor {
        WeatherCodeDescriptor::from_wmo_code(self.current.weather_code)
    }
}

/// Position capability errors
#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Location service unavailable")]
    ServiceUnavailable,
    #[error("Location request timed out")]
    Timeout,
    #[error("Location error: {0}")]
    Other(String),
}

/// Lookup and fetch errors
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("No location matches \"{0}\"")]
    LocationNotFound(String),
    #[error("Location lookup failed: {0}")]
    LookupFailed(#[source] reqwest::Error),
    #[error("Weather request failed with status {0}")]
    Status(reqwest::StatusCode),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Location error: {0}")]
    Location(#[from] LocationError),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Cache error: {0}")]
    Cache(String),
}
