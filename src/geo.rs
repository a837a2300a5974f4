//! Device geolocation capability.
//!
//! The position request carries a hard 10-second cap, applied by the caller
//! with `tokio::time::timeout`. The resolved coordinates are currently
//! discarded by the app (see `app.rs`); the interface still reports them so
//! a real resolver can slot in later.

use std::time::Duration;

use thiserror::Error;

/// Hard cap on a position request.
pub const POSITION_TIMEOUT: Duration = Duration::from_secs(10);

/// A geographic position reported by the platform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

/// Why a position request produced nothing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GeoError {
    #[error("permission to read the device position was denied")]
    Denied,

    #[error("timed out waiting for a device position")]
    Timeout,

    #[error("no device position is available")]
    Unavailable,
}

/// Source of the device's current position.
///
/// Implementations should return promptly; the caller enforces
/// [`POSITION_TIMEOUT`] around the request.
pub trait Locator: Send + Sync {
    /// Whether this environment can produce a position at all.
    fn supported(&self) -> bool;

    /// Request the current position.
    fn current_position(&self) -> Result<Position, GeoError>;
}

/// The locator shipped with the terminal binary. A terminal session has no
/// geolocation service to ask, so the capability is reported as absent.
pub struct TerminalLocator;

impl Locator for TerminalLocator {
    fn supported(&self) -> bool {
        false
    }

    fn current_position(&self) -> Result<Position, GeoError> {
        Err(GeoError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_locator_reports_no_capability() {
        assert!(!TerminalLocator.supported());
        assert_eq!(
            TerminalLocator.current_position(),
            Err(GeoError::Unavailable)
        );
    }

    #[test]
    fn errors_render_distinct_messages() {
        let denied = GeoError::Denied.to_string();
        let timeout = GeoError::Timeout.to_string();
        assert_ne!(denied, timeout);
    }
}
