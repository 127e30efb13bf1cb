//! Error types for content directory browsing

use soap_client::SoapError;
use thiserror::Error;
use upnp_discovery::DiscoveryError;
use upnp_parser::ParseError;

/// Errors that can occur while expanding a node of the content tree
#[derive(Debug, Error)]
pub enum BrowseError {
    /// The Browse RPC failed in transport, returned a fault, or had no usable endpoint
    #[error("Browse request failed: {0}")]
    Rpc(#[from] SoapError),

    /// The Browse response or its embedded DIDL-Lite listing was invalid
    #[error("Invalid Browse response: {0}")]
    Parse(#[from] ParseError),

    /// The device description needed to expand a root device was unavailable
    #[error("Device description unavailable: {0}")]
    Description(#[from] DiscoveryError),
}

pub type Result<T> = std::result::Result<T, BrowseError>;
