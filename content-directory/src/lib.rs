//! # content-directory
//!
//! Browsing of UPnP ContentDirectory catalogs, one level at a time.
//!
//! [`ContentDirectory::list_children`] issues a `Browse` for the direct
//! children of an object and turns the DIDL-Lite listing into [`Container`]s
//! and [`Item`]s. The [`Node`] tree built on top of it links discovery,
//! description retrieval and browsing behind a single [`Expand`] operation.
//!
//! ```rust,no_run
//! use content_directory::{Browser, ContentDirectory, Expand, Node};
//! use upnp_discovery::{DescriptionFetcher, RootDevice};
//! use std::sync::Arc;
//!
//! # fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let browser = Browser::new(DescriptionFetcher::new()?, ContentDirectory::new());
//! let root = Arc::new(RootDevice::new(
//!     "192.168.1.5:1900".parse()?,
//!     "http://192.168.1.5:8200/rootDesc.xml",
//! ));
//!
//! for device in Node::from(root).children(&browser)? {
//!     for service in device.children(&browser)? {
//!         for child in service.children(&browser)? {
//!             println!("{}", child.label());
//!         }
//!     }
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod model;
mod tree;

pub use client::{ContentDirectory, Listing};
pub use error::{BrowseError, Result};
pub use model::{Container, Item};
pub use tree::{Browser, Expand, Node};
