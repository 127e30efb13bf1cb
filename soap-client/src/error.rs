//! Error types for the SOAP client

use thiserror::Error;

/// Errors that can occur while invoking a UPnP action
#[derive(Debug, Error)]
pub enum SoapError {
    /// Connection, timeout or HTTP-level failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// SOAP fault returned by the device
    #[error("SOAP fault {code}: {description}")]
    Fault {
        /// UPnP error code, 500 when the device did not supply one
        code: u16,
        /// Human readable description of the fault
        description: String,
    },

    /// The service's control URL could not be resolved against its base
    #[error("Invalid control URL {reference:?} relative to {base:?}: {reason}")]
    InvalidControlUrl {
        /// The description document location used as base URL
        base: String,
        /// The `controlURL` advertised by the service
        reference: String,
        /// Why resolution failed
        reason: String,
    },
}
