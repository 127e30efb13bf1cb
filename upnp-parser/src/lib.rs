//! # upnp-parser
//!
//! Namespace-aware XML decoding for the documents a UPnP AV control point
//! handles: device descriptions, SOAP response envelopes, and the DIDL-Lite
//! listings embedded in ContentDirectory `Browse` responses.
//!
//! Every lookup is qualified: an element only matches when both its local name
//! and its namespace are the ones the schema mandates.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use upnp_parser::{BrowseResponse, DeviceDescription};
//!
//! let device = DeviceDescription::from_xml(&description_xml)?;
//! let response = BrowseResponse::from_envelope(&soap_body, &service_type)?;
//! let listing = response.didl()?;
//! ```

pub mod error;
pub mod namespaces;
pub mod common;
pub mod description;
pub mod services;

pub use error::{ParseError, ParseResult};

pub use common::{DidlContainer, DidlItem, DidlLite, DidlResource, SoapFault};

pub use description::{DeviceDescription, ServiceDescription};

pub use services::content_directory::{BrowseResponse, BROWSE_ACTION};
