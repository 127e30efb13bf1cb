//! Service-specific response parsers
//!
//! Each module turns the `<action>Response` element of one UPnP service into
//! typed records.

pub mod content_directory;
