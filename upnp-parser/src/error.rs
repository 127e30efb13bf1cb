//! Error types for XML parsing operations

use thiserror::Error;

/// Errors that can occur while decoding UPnP XML documents
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// The document is not well-formed XML
    #[error("Malformed XML: {0}")]
    MalformedXml(String),

    /// The document is well-formed but not shaped as expected
    #[error("Invalid XML structure: {0}")]
    InvalidXmlStructure(String),

    /// An element was found with the expected name but in the wrong namespace
    #[error("Namespace mismatch for <{element}>: expected {expected:?}, found {found:?}")]
    NamespaceMismatch {
        /// Local name of the offending element
        element: String,
        /// Namespace the element must be qualified with
        expected: String,
        /// Namespace the element actually carried, if any
        found: Option<String>,
    },

    /// Missing required element
    #[error("Missing required element: {0}")]
    MissingRequiredElement(String),

    /// Missing required attribute
    #[error("Missing required attribute: {0}")]
    MissingRequiredAttribute(String),

    /// An element or attribute held a value that could not be interpreted
    #[error("Invalid value for {field}: {value:?}")]
    InvalidValue {
        /// Name of the element or attribute
        field: String,
        /// The raw value
        value: String,
    },
}

/// Result type alias for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;
