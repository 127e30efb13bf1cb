//! Browse RPC against a device's content-directory service

use crate::error::Result;
use crate::model::{Container, Item};
use serde::Serialize;
use soap_client::{resolve_control_url, BrowseRequest, SoapClient};
use std::sync::Arc;
use tracing::debug;
use upnp_discovery::DeviceService;
use upnp_parser::{BrowseResponse, BROWSE_ACTION};

/// One level of the content tree
#[derive(Debug, Clone, Serialize)]
pub struct Listing {
    pub containers: Vec<Container>,
    pub items: Vec<Item>,
    /// `NumberReturned` as reported by the server
    pub number_returned: u32,
    /// `TotalMatches`, when reported
    pub total_matches: Option<u32>,
}

impl Listing {
    pub fn is_empty(&self) -> bool {
        self.containers.is_empty() && self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.containers.len() + self.items.len()
    }
}

/// Client for the ContentDirectory `Browse` action.
///
/// Every call is a fresh blocking round-trip; nothing is cached.
#[derive(Debug, Clone, Default)]
pub struct ContentDirectory {
    soap: SoapClient,
}

impl ContentDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(soap: SoapClient) -> Self {
        Self { soap }
    }

    /// Invoke `action` on `service` for `object_id` and return the raw response body.
    ///
    /// The control URL is resolved against the location of the root device
    /// the service was discovered through.
    pub fn invoke(&self, service: &DeviceService, action: &str, object_id: &str) -> Result<String> {
        let control_url =
            resolve_control_url(&service.root_device().location, &service.control_url)?;
        let request = BrowseRequest::direct_children(object_id);

        Ok(self
            .soap
            .call(&control_url, &service.service_type, action, &request.arguments())?)
    }

    /// List the direct children of `object_id` (`"0"` is the content root)
    pub fn list_children(&self, service: &Arc<DeviceService>, object_id: &str) -> Result<Listing> {
        let body = self.invoke(service, BROWSE_ACTION, object_id)?;
        let response = BrowseResponse::from_envelope(&body, &service.service_type)?;
        let didl = response.didl()?;

        let listing = Listing {
            containers: didl
                .containers
                .into_iter()
                .map(|record| Container::from_didl(Arc::clone(service), record))
                .collect(),
            items: didl
                .items
                .into_iter()
                .map(|record| Item::from_didl(Arc::clone(service), record))
                .collect(),
            number_returned: response.number_returned,
            total_matches: response.total_matches,
        };

        debug!(
            object_id,
            containers = listing.containers.len(),
            items = listing.items.len(),
            total_matches = ?listing.total_matches,
            "Browsed content directory"
        );

        Ok(listing)
    }
}
