//! Common utilities and data structures shared across UPnP services
//!
//! - [`xml_decode`]: namespace-aware element lookup
//! - [`attributes`]: mandatory/optional attribute access
//! - [`envelope`]: SOAP envelope unwrapping
//! - [`didl`]: DIDL-Lite listings

pub mod xml_decode;
pub mod attributes;
pub mod envelope;
pub mod didl;

pub use didl::{DidlContainer, DidlItem, DidlLite, DidlResource};
pub use envelope::{action_response, SoapFault};
