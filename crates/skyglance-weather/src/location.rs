//! Position capability used for the startup lookup.

use std::future::Future;

use crate::types::LocationError;

/// A position fix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

/// Something that can report where the user is.
pub trait PositionSource: Send + Sync {
    /// Whether the capability exists at all. Unavailable sources are never queried.
    fn is_available(&self) -> bool;

    fn current_position(&self) -> impl Future<Output = Result<Position, LocationError>> + Send;
}

/// A position fixed by configuration or the command line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedPosition(pub Position);

impl FixedPosition {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self(Position {
            latitude,
            longitude,
        })
    }
}

impl PositionSource for FixedPosition {
    fn is_available(&self) -> bool {
        true
    }

    async fn current_position(&self) -> Result<Position, LocationError> {
        Ok(self.0)
    }
}

/// No positioning capability
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPosition;

impl PositionSource for NoPosition {
    fn is_available(&self) -> bool {
        false
    }

    async fn current_position(&self) -> Result<Position, LocationError> {
        Err(LocationError::ServiceUnavailable)
    }
}

/// Parse textual coordinates the way they arrive from the command line.
///
/// # Errors
/// `LocationError::Other` when either value is not a finite number.
pub fn parse_position(latitude: &str, longitude: &str) -> Result<Position, LocationError> {
    let parse = |label: &str, raw: &str| -> Result<f64, LocationError> {
        raw.trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| LocationError::Other(format!("invalid {}: {:?}", label, raw)))
    };
    Ok(Position {
        latitude: parse("latitude", latitude)?,
        longitude: parse("longitude", longitude)?,
    })
}
