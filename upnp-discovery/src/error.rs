//! Error types for the discovery system.

use thiserror::Error;
use upnp_parser::ParseError;

/// Error type for discovery and description operations.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Socket creation, multicast membership or datagram I/O failed
    #[error("Network error: {0}")]
    NetworkError(String),

    /// The description document could not be retrieved
    #[error("Failed to fetch device description from {location}: {reason}")]
    DescriptionFetch { location: String, reason: String },

    /// The description document was retrieved but is not a valid device description
    #[error("Invalid device description: {0}")]
    DescriptionParse(#[from] ParseError),

    #[error("Invalid discovery configuration: {0}")]
    Configuration(String),

    /// `start()` was called on an engine whose receive loop is already running
    #[error("Discovery is already running")]
    AlreadyRunning,
}

/// Convenience Result type alias for discovery operations.
pub type Result<T> = std::result::Result<T, DiscoveryError>;
