//! ContentDirectory `Browse` response parsing.
//!
//! The Browse result is delivered twice-encoded: the DIDL-Lite listing is an
//! XML document carried as escaped text inside the `Result` element of the
//! SOAP response. Parsing therefore happens in two passes, first the envelope,
//! then the decoded text of `Result`.

use crate::common::didl::DidlLite;
use crate::common::envelope::action_response;
use crate::common::xml_decode::{child, required_child, trimmed_text};
use crate::error::{ParseError, ParseResult};
use serde::Serialize;

/// Name of the directory browsing action
pub const BROWSE_ACTION: &str = "Browse";

/// Output arguments of a `Browse` action.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrowseResponse {
    /// The embedded DIDL-Lite document, already unescaped
    pub result: String,
    /// Number of objects in `result`
    pub number_returned: u32,
    /// Total number of children the server holds for the object, when reported
    pub total_matches: Option<u32>,
    /// Container update id, when reported
    pub update_id: Option<u32>,
}

impl BrowseResponse {
    /// Parse a SOAP response envelope for a Browse action on `service_type`.
    pub fn from_envelope(xml: &str, service_type: &str) -> ParseResult<Self> {
        let response = action_response(xml, service_type, BROWSE_ACTION)?;

        let result = trimmed_text(required_child(&response, None, "Result")?);
        let number_returned = parse_count(
            "NumberReturned",
            &trimmed_text(required_child(&response, None, "NumberReturned")?),
        )?;
        let total_matches = child(&response, None, "TotalMatches")
            .map(|el| parse_count("TotalMatches", &trimmed_text(el)))
            .transpose()?;
        let update_id = child(&response, None, "UpdateID")
            .map(|el| parse_count("UpdateID", &trimmed_text(el)))
            .transpose()?;

        Ok(Self {
            result,
            number_returned,
            total_matches,
            update_id,
        })
    }

    /// Decode the embedded DIDL-Lite listing.
    ///
    /// An empty `Result` is accepted as an empty listing.
    pub fn didl(&self) -> ParseResult<DidlLite> {
        if self.result.is_empty() {
            return Ok(DidlLite::default());
        }
        DidlLite::from_xml(&self.result)
    }
}

fn parse_count(field: &str, value: &str) -> ParseResult<u32> {
    value.parse().map_err(|_| ParseError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
    })
}
