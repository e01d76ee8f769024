//! Centralized error types for the Skyglance application.
//!
//! This module provides a typed error hierarchy that:
//! - Enables precise error handling at the dashboard boundary
//! - Provides user-friendly messages suitable for display
//! - Preserves full error context for logging

use thiserror::Error;

/// Top-level application error type.
///
/// Use `user_message()` to get a display-appropriate message.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Weather lookup error: {0}")]
    Lookup(#[from] LookupError),
}

impl AppError {
    /// Returns a user-friendly message suitable for display.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Config(e) => e.user_message(),
            AppError::Lookup(e) => e.user_message(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration directory not found: {0}")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),

    #[error("Configuration file error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::NotFound(_) => "No configuration directory. Pass --config.",
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
            ConfigError::ParseError(_) => "Configuration file is malformed. Check your settings.",
            ConfigError::Io(_) => "Unable to read or write the configuration file.",
        }
    }
}

/// Lookup failures as shown on the dashboard. Each variant names the step
/// that failed; the user message comes from that step.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Location not found: {0}")]
    LocationNotFound(String),

    #[error("Location lookup failed: {0}")]
    LookupFailed(String),

    #[error("Weather API error: {0}")]
    ApiError(String),

    #[error("Position unavailable: {0}")]
    PositionUnavailable(String),

    #[error("Cache error: {0}")]
    CacheError(String),
}

impl LookupError {
    pub fn user_message(&self) -> &'static str {
        match self {
            LookupError::LocationNotFound(_) => "City not found",
            LookupError::LookupFailed(_) => "Location lookup failed",
            LookupError::ApiError(_) => "Failed to fetch weather data",
            LookupError::PositionUnavailable(_) => "Unable to fetch weather for your location",
            LookupError::CacheError(_) => "Weather data may be outdated.",
        }
    }
}
