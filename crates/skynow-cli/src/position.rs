use std::time::Duration;

use thiserror::Error;

pub const POSITION_TIMEOUT_SECS: u64 = 10;
pub const POSITION_MAX_STALENESS_SECS: u64 = 300;

/// Bounds the positioning backend must honor: how long to wait for a fix
/// and how stale a previously acquired fix may be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    pub timeout: Duration,
    pub max_staleness: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(POSITION_TIMEOUT_SECS),
            max_staleness: Duration::from_secs(POSITION_MAX_STALENESS_SECS),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PositionError {
    #[error("location permission denied")]
    PermissionDenied,
    #[error("location service unavailable")]
    Unavailable,
    #[error("location request timed out")]
    Timeout,
    #[error("no positioning capability on this device")]
    Unsupported,
}

/// Device positioning seam. Platforms with a real location service implement
/// this; everything downstream only sees a coordinate pair or an error.
#[allow(async_fn_in_trait)]
pub trait PositionSource {
    async fn current_position(
        &self,
        options: &PositionOptions,
    ) -> Result<Position, PositionError>;
}

/// Default source for hosts without a location service.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedPositionSource;

impl PositionSource for UnsupportedPositionSource {
    async fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> Result<Position, PositionError> {
        Err(PositionError::Unsupported)
    }
}
