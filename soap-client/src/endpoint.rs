//! Control endpoint resolution
//!
//! Services advertise their `controlURL` relative to the description
//! document that listed them, so the document's location is the base URL.

use crate::SoapError;
use url::Url;

/// Resolve a service's `controlURL` against the device description `location`.
///
/// Absolute control URLs are returned as-is. Resolution never guesses: an
/// unparsable base, an unresolvable reference, or a result that is not an
/// HTTP(S) URL is an [`SoapError::InvalidControlUrl`].
pub fn resolve_control_url(location: &str, control_url: &str) -> Result<Url, SoapError> {
    let invalid = |reason: String| SoapError::InvalidControlUrl {
        base: location.to_string(),
        reference: control_url.to_string(),
        reason,
    };

    let base = Url::parse(location).map_err(|e| invalid(format!("bad base URL: {}", e)))?;
    let resolved = base
        .join(control_url.trim())
        .map_err(|e| invalid(e.to_string()))?;

    match resolved.scheme() {
        "http" | "https" => Ok(resolved),
        other => Err(invalid(format!("unsupported scheme {:?}", other))),
    }
}
