//! SOAP request envelope construction

use quick_xml::escape::escape;

/// `BrowseFlag` value requesting the direct children of an object
pub const BROWSE_DIRECT_CHILDREN: &str = "BrowseDirectChildren";

/// Object id of the content root of every ContentDirectory service
pub const ROOT_OBJECT_ID: &str = "0";

/// Build a SOAP 1.1 request envelope for `action` on `service_type`.
///
/// Argument values are XML-escaped; argument names are emitted verbatim.
pub fn build_envelope(service_type: &str, action: &str, arguments: &[(&str, String)]) -> String {
    let payload: String = arguments
        .iter()
        .map(|(name, value)| format!("<{name}>{value}</{name}>", name = name, value = escape(value.as_str())))
        .collect();

    format!(
        r#"<?xml version="1.0"?>
<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/" s:encodingStyle="http://schemas.xmlsoap.org/soap/encoding/">
<s:Body>
<u:{action} xmlns:u="{service_type}">{payload}</u:{action}>
</s:Body>
</s:Envelope>"#,
        action = action,
        service_type = escape(service_type),
        payload = payload
    )
}

/// Input arguments of a ContentDirectory `Browse` request.
///
/// Only direct-children browsing is supported: the filter is always `*`, the
/// whole listing is requested in one page (`RequestedCount` 0 lets the server
/// decide) and no sort criteria are sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseRequest {
    pub object_id: String,
}

impl BrowseRequest {
    /// Request the direct children of `object_id`
    pub fn direct_children(object_id: impl Into<String>) -> Self {
        Self {
            object_id: object_id.into(),
        }
    }

    /// Request the children of the content root
    pub fn root() -> Self {
        Self::direct_children(ROOT_OBJECT_ID)
    }

    /// The six canonical Browse arguments, in schema order
    pub fn arguments(&self) -> Vec<(&'static str, String)> {
        vec![
            ("ObjectID", self.object_id.clone()),
            ("BrowseFlag", BROWSE_DIRECT_CHILDREN.to_string()),
            ("Filter", "*".to_string()),
            ("StartingIndex", "0".to_string()),
            ("RequestedCount", "0".to_string()),
            ("SortCriteria", String::new()),
        ]
    }
}
