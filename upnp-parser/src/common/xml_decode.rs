//! Namespace-aware XML decoding helpers.
//!
//! UPnP documents are only meaningful when their elements carry the right
//! namespace: a `<device>` in the device-description namespace is not the same
//! thing as an unqualified `<device>`. These helpers wrap `xmltree` so that
//! every lookup names both the local name and the namespace it expects.

use crate::error::{ParseError, ParseResult};
use xmltree::Element;

/// Parse an XML document and return its root element.
pub fn parse_document(xml: &str) -> ParseResult<Element> {
    Element::parse(xml.as_bytes()).map_err(|e| ParseError::MalformedXml(e.to_string()))
}

/// Check that `element` has the given local name and namespace.
///
/// A matching name in a different (or missing) namespace is reported as a
/// [`ParseError::NamespaceMismatch`] rather than a missing element, which
/// makes unqualified documents much easier to diagnose.
pub fn expect_element(element: &Element, namespace: &str, name: &str) -> ParseResult<()> {
    if element.name != name {
        return Err(ParseError::InvalidXmlStructure(format!(
            "expected <{}>, found <{}>",
            name, element.name
        )));
    }
    if element.namespace.as_deref() != Some(namespace) {
        return Err(ParseError::NamespaceMismatch {
            element: name.to_string(),
            expected: namespace.to_string(),
            found: element.namespace.clone(),
        });
    }
    Ok(())
}

/// Iterate over the direct child elements of `parent` matching `name` in `namespace`.
///
/// `None` matches only unqualified elements.
pub fn children<'a>(
    parent: &'a Element,
    namespace: Option<&'a str>,
    name: &'a str,
) -> impl Iterator<Item = &'a Element> + 'a {
    parent
        .children
        .iter()
        .filter_map(|node| node.as_element())
        .filter(move |el| el.name == name && el.namespace.as_deref() == namespace)
}

/// First direct child element matching `name` in `namespace`.
pub fn child<'a>(parent: &'a Element, namespace: Option<&'a str>, name: &'a str) -> Option<&'a Element> {
    children(parent, namespace, name).next()
}

/// Like [`child`], but a missing element is an error.
///
/// When an element with the right local name exists in another namespace the
/// error is a namespace mismatch.
pub fn required_child<'a>(
    parent: &'a Element,
    namespace: Option<&'a str>,
    name: &'a str,
) -> ParseResult<&'a Element> {
    if let Some(found) = child(parent, namespace, name) {
        return Ok(found);
    }

    let misqualified = parent
        .children
        .iter()
        .filter_map(|node| node.as_element())
        .find(|el| el.name == name);

    match (misqualified, namespace) {
        (Some(el), Some(expected)) => Err(ParseError::NamespaceMismatch {
            element: name.to_string(),
            expected: expected.to_string(),
            found: el.namespace.clone(),
        }),
        _ => Err(ParseError::MissingRequiredElement(format!(
            "{} in <{}>",
            name, parent.name
        ))),
    }
}

/// Text content of an element, verbatim. Elements without text yield an empty string.
pub fn text(element: &Element) -> String {
    element
        .get_text()
        .map(|t| t.into_owned())
        .unwrap_or_default()
}

/// Text content with surrounding whitespace removed, for embedded documents,
/// numbers and URLs.
pub fn trimmed_text(element: &Element) -> String {
    element
        .get_text()
        .map(|t| t.trim().to_string())
        .unwrap_or_default()
}

/// Text of a required child element.
pub fn required_text(parent: &Element, namespace: Option<&str>, name: &str) -> ParseResult<String> {
    required_child(parent, namespace, name).map(text)
}

/// Text of an optional child element, `None` when the element is absent.
pub fn optional_text(parent: &Element, namespace: Option<&str>, name: &str) -> Option<String> {
    child(parent, namespace, name).map(text)
}
