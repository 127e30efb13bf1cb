//! SOAP 1.1 envelope unwrapping.

use crate::common::xml_decode::{self, child, optional_text, required_child};
use crate::error::{ParseError, ParseResult};
use crate::namespaces::{SOAP_ENVELOPE, UPNP_CONTROL};
use serde::Serialize;
use xmltree::Element;

/// Extract the `<action>Response` element from a SOAP response envelope.
///
/// The response element must be qualified with the service type the action
/// was invoked on, e.g. `{urn:schemas-upnp-org:service:ContentDirectory:1}BrowseResponse`.
pub fn action_response(xml: &str, service_type: &str, action: &str) -> ParseResult<Element> {
    let envelope = xml_decode::parse_document(xml)?;
    let body = envelope_body(&envelope)?;

    if let Some(fault) = child(body, Some(SOAP_ENVELOPE), "Fault") {
        let fault = SoapFault::from_element(fault);
        return Err(ParseError::InvalidXmlStructure(format!(
            "expected {}Response, found SOAP fault: {}",
            action, fault
        )));
    }

    let response_name = format!("{}Response", action);
    required_child(body, Some(service_type), &response_name).cloned()
}

fn envelope_body(envelope: &Element) -> ParseResult<&Element> {
    xml_decode::expect_element(envelope, SOAP_ENVELOPE, "Envelope")?;
    required_child(envelope, Some(SOAP_ENVELOPE), "Body")
}

/// A SOAP fault, with UPnP error details when the device supplied them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SoapFault {
    /// `faultcode`, typically `s:Client`
    pub fault_code: String,
    /// `faultstring`, typically `UPnPError`
    pub fault_string: String,
    /// `detail/UPnPError/errorCode`
    pub error_code: Option<u16>,
    /// `detail/UPnPError/errorDescription`
    pub error_description: Option<String>,
}

impl SoapFault {
    /// Look for a fault in a SOAP response body.
    ///
    /// Returns `None` for anything that is not a well-formed envelope holding a
    /// `Fault`, including successful responses.
    pub fn from_xml(xml: &str) -> Option<Self> {
        let envelope = xml_decode::parse_document(xml).ok()?;
        let body = envelope_body(&envelope).ok()?;
        child(body, Some(SOAP_ENVELOPE), "Fault").map(Self::from_element)
    }

    fn from_element(fault: &Element) -> Self {
        let upnp_error = child(fault, None, "detail")
            .and_then(|detail| child(detail, Some(UPNP_CONTROL), "UPnPError"));

        Self {
            fault_code: optional_text(fault, None, "faultcode").unwrap_or_default(),
            fault_string: optional_text(fault, None, "faultstring").unwrap_or_default(),
            error_code: upnp_error
                .and_then(|e| child(e, Some(UPNP_CONTROL), "errorCode"))
                .and_then(|code| xml_decode::trimmed_text(code).parse().ok()),
            error_description: upnp_error
                .and_then(|e| optional_text(e, Some(UPNP_CONTROL), "errorDescription")),
        }
    }
}

impl std::fmt::Display for SoapFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.error_code, &self.error_description) {
            (Some(code), Some(desc)) => write!(f, "{} ({})", desc, code),
            (Some(code), None) => write!(f, "{} ({})", self.fault_string, code),
            _ => write!(f, "{}: {}", self.fault_code, self.fault_string),
        }
    }
}
