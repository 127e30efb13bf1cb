//! Attribute helpers for UPnP XML elements.
//!
//! DIDL-Lite keeps most object identity (`id`, `parentID`, `restricted`, ...)
//! and all resource properties (`size`, `duration`, ...) in unqualified
//! attributes. Some are mandatory, others may be omitted by the server.

use crate::error::{ParseError, ParseResult};
use xmltree::Element;

/// Value of a mandatory attribute.
pub fn required_attr(element: &Element, name: &str) -> ParseResult<String> {
    element
        .attributes
        .get(name)
        .cloned()
        .ok_or_else(|| ParseError::MissingRequiredAttribute(format!("{} on <{}>", name, element.name)))
}

/// Value of an attribute that may be absent, `None` when it is.
pub fn optional_attr(element: &Element, name: &str) -> Option<String> {
    element.attributes.get(name).cloned()
}

/// Value of an optional attribute, resolving to an empty string when absent.
pub fn attr_or_empty(element: &Element, name: &str) -> String {
    optional_attr(element, name).unwrap_or_default()
}
