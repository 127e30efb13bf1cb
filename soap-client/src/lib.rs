//! SOAP client for UPnP service control
//!
//! This crate provides a minimal SOAP 1.1 client for invoking actions on UPnP
//! services: it resolves the service's control endpoint, builds the request
//! envelope, POSTs it with the `SOAPACTION` header, and hands the raw response
//! body back to the caller for parsing. SOAP faults are recognised and
//! surfaced as [`SoapError::Fault`].

mod endpoint;
mod envelope;
mod error;

pub use endpoint::resolve_control_url;
pub use envelope::{build_envelope, BrowseRequest, BROWSE_DIRECT_CHILDREN, ROOT_OBJECT_ID};
pub use error::SoapError;
pub use url::Url;

use std::io::Read;
use std::time::Duration;
use tracing::debug;
use upnp_parser::SoapFault;

/// Default ceiling on a response body
pub const DEFAULT_MAX_RESPONSE_BYTES: u64 = 16 * 1024 * 1024;

/// Configuration for [`SoapClient`]
///
/// By default no timeouts are set, so requests are bounded only by the
/// transport's own defaults.
#[derive(Debug, Clone)]
pub struct SoapClientConfig {
    /// Timeout for establishing the TCP connection
    /// Default: none
    pub connect_timeout: Option<Duration>,

    /// Timeout for reading the response
    /// Default: none
    pub read_timeout: Option<Duration>,

    /// `User-Agent` header sent with every request
    pub user_agent: String,

    /// Largest response body accepted; a longer body is a transport error
    /// Default: 16 MiB
    pub max_response_bytes: u64,
}

impl Default for SoapClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: None,
            read_timeout: None,
            user_agent: format!("upnp-browser/{} UPnP/1.0", env!("CARGO_PKG_VERSION")),
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
        }
    }
}

impl SoapClientConfig {
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    pub fn with_max_response_bytes(mut self, limit: u64) -> Self {
        self.max_response_bytes = limit;
        self
    }
}

/// A minimal SOAP client for UPnP action invocation
#[derive(Debug, Clone)]
pub struct SoapClient {
    agent: ureq::Agent,
    max_response_bytes: u64,
}

impl SoapClient {
    /// Create a new SOAP client with default configuration
    pub fn new() -> Self {
        Self::with_config(&SoapClientConfig::default())
    }

    /// Create a SOAP client with custom timeouts and user agent
    pub fn with_config(config: &SoapClientConfig) -> Self {
        let mut builder = ureq::AgentBuilder::new().user_agent(&config.user_agent);
        if let Some(timeout) = config.connect_timeout {
            builder = builder.timeout_connect(timeout);
        }
        if let Some(timeout) = config.read_timeout {
            builder = builder.timeout_read(timeout);
        }

        Self {
            agent: builder.build(),
            max_response_bytes: config.max_response_bytes,
        }
    }

    /// Invoke `action` on the service of type `service_type` reachable at `control_url`.
    ///
    /// Returns the response body decoded as UTF-8. A response whose envelope
    /// carries a SOAP fault, whatever its HTTP status, is an error.
    pub fn call(
        &self,
        control_url: &Url,
        service_type: &str,
        action: &str,
        arguments: &[(&str, String)],
    ) -> Result<String, SoapError> {
        let body = build_envelope(service_type, action, arguments);
        let soap_action = format!("\"{}#{}\"", service_type, action);

        debug!(url = %control_url, action, "Sending SOAP request");

        let (status, text) = match self
            .agent
            .post(control_url.as_str())
            .set("Content-Type", "text/xml; charset=\"utf-8\"")
            .set("SOAPACTION", &soap_action)
            .send_string(&body)
        {
            Ok(response) => (response.status(), read_body(response, self.max_response_bytes)?),
            Err(ureq::Error::Status(status, response)) => {
                (status, read_body(response, self.max_response_bytes)?)
            }
            Err(ureq::Error::Transport(transport)) => {
                return Err(SoapError::Transport(transport.to_string()));
            }
        };

        debug!(url = %control_url, action, status, bytes = text.len(), "Received SOAP response");

        check_response(status, text)
    }

    /// Issue a ContentDirectory `Browse` for the direct children of an object
    pub fn browse(
        &self,
        control_url: &Url,
        service_type: &str,
        request: &BrowseRequest,
    ) -> Result<String, SoapError> {
        self.call(control_url, service_type, upnp_parser::BROWSE_ACTION, &request.arguments())
    }
}

impl Default for SoapClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Read at most `limit` bytes; one byte more means the body was too long.
fn read_body(response: ureq::Response, limit: u64) -> Result<String, SoapError> {
    let mut bytes = Vec::new();
    response
        .into_reader()
        .take(limit.saturating_add(1))
        .read_to_end(&mut bytes)
        .map_err(|e| SoapError::Transport(format!("Failed to read response body: {}", e)))?;

    if bytes.len() as u64 > limit {
        return Err(SoapError::Transport(format!(
            "Response exceeds {} bytes",
            limit
        )));
    }

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Classify a response by fault content first, HTTP status second.
fn check_response(status: u16, body: String) -> Result<String, SoapError> {
    if let Some(fault) = SoapFault::from_xml(&body) {
        return Err(SoapError::Fault {
            code: fault.error_code.unwrap_or(500),
            description: fault.to_string(),
        });
    }

    if !(200..300).contains(&status) {
        return Err(SoapError::Transport(format!("HTTP status {}", status)));
    }

    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAULT: &str = r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/">
        <s:Body>
            <s:Fault>
                <faultcode>s:Client</faultcode>
                <faultstring>UPnPError</faultstring>
                <detail>
                    <UPnPError xmlns="urn:schemas-upnp-org:control-1-0">
                        <errorCode>701</errorCode>
                        <errorDescription>No such object</errorDescription>
                    </UPnPError>
                </detail>
            </s:Fault>
        </s:Body>
    </s:Envelope>"#;

    #[test]
    fn test_soap_client_creation() {
        let _client = SoapClient::new();
        let _default_client = SoapClient::default();
        let _configured = SoapClient::with_config(
            &SoapClientConfig::default()
                .with_connect_timeout(Duration::from_secs(5))
                .with_read_timeout(Duration::from_secs(10)),
        );
    }

    #[test]
    fn test_default_config_sets_no_timeouts() {
        let config = SoapClientConfig::default();
        assert_eq!(config.connect_timeout, None);
        assert_eq!(config.read_timeout, None);
        assert!(config.user_agent.contains("UPnP/1.0"));
        assert_eq!(config.max_response_bytes, DEFAULT_MAX_RESPONSE_BYTES);
    }

    #[test]
    fn test_check_response_success() {
        let body = "<s:Envelope xmlns:s=\"http://schemas.xmlsoap.org/soap/envelope/\"><s:Body/></s:Envelope>".to_string();
        assert_eq!(check_response(200, body.clone()).unwrap(), body);
    }

    #[test]
    fn test_check_response_fault_on_500() {
        match check_response(500, FAULT.to_string()) {
            Err(SoapError::Fault { code, description }) => {
                assert_eq!(code, 701);
                assert!(description.contains("No such object"));
            }
            other => panic!("Expected SoapError::Fault, got {:?}", other),
        }
    }

    #[test]
    fn test_check_response_fault_on_200() {
        assert!(matches!(
            check_response(200, FAULT.to_string()),
            Err(SoapError::Fault { code: 701, .. })
        ));
    }

    #[test]
    fn test_fault_without_upnp_error_defaults_to_500() {
        let body = r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/"><s:Body><s:Fault><faultcode>s:Server</faultcode><faultstring>Internal Error</faultstring></s:Fault></s:Body></s:Envelope>"#;
        assert!(matches!(
            check_response(500, body.to_string()),
            Err(SoapError::Fault { code: 500, .. })
        ));
    }

    #[test]
    fn test_http_error_without_fault_is_transport() {
        match check_response(404, "<html>Not Found</html>".to_string()) {
            Err(SoapError::Transport(msg)) => assert!(msg.contains("404")),
            other => panic!("Expected SoapError::Transport, got {:?}", other),
        }
    }
}
