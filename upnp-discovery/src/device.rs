//! Device description retrieval and the device/service graph.
//!
//! A [`RootDevice`] only knows where its description lives. Fetching that
//! document yields a [`Device`] that owns its [`DeviceService`]s; each service
//! links back to its device without owning it and keeps the root device alive
//! so its control endpoint can always be resolved.

use crate::error::{DiscoveryError, Result};
use crate::RootDevice;
use serde::Serialize;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tracing::debug;
use upnp_parser::{DeviceDescription, ServiceDescription};

/// A UPnP device built from its description document
#[derive(Debug, Serialize)]
pub struct Device {
    #[serde(skip)]
    root_device: Arc<RootDevice>,
    pub device_type: String,
    pub friendly_name: String,
    pub manufacturer: String,
    pub model_name: String,
    pub model_number: String,
    pub serial_number: String,
    pub udn: String,
    /// Empty when the device does not advertise one
    pub presentation_url: String,
    /// Services in description order
    pub services: Vec<Arc<DeviceService>>,
}

/// A service entry of a [`Device`]
#[derive(Debug, Serialize)]
pub struct DeviceService {
    #[serde(skip)]
    device: Weak<Device>,
    #[serde(skip)]
    root_device: Arc<RootDevice>,
    pub service_type: String,
    pub service_id: String,
    /// `SCPDURL`
    pub description_url: String,
    pub control_url: String,
    pub event_subscription_url: String,
}

impl Device {
    /// Build the device graph for `root_device` from its parsed description
    pub fn from_description(root_device: Arc<RootDevice>, description: DeviceDescription) -> Arc<Self> {
        let DeviceDescription {
            device_type,
            friendly_name,
            manufacturer,
            model_name,
            model_number,
            serial_number,
            udn,
            presentation_url,
            services,
        } = description;

        Arc::new_cyclic(|device| Self {
            services: services
                .into_iter()
                .map(|service| {
                    Arc::new(DeviceService::new(device.clone(), Arc::clone(&root_device), service))
                })
                .collect(),
            root_device,
            device_type,
            friendly_name,
            manufacturer,
            model_name,
            model_number,
            serial_number,
            udn,
            presentation_url,
        })
    }

    pub fn root_device(&self) -> &Arc<RootDevice> {
        &self.root_device
    }

    /// The content-directory service, if the device exposes one
    pub fn content_directory(&self) -> Option<&Arc<DeviceService>> {
        self.services.iter().find(|s| s.is_content_directory())
    }
}

impl DeviceService {
    fn new(device: Weak<Device>, root_device: Arc<RootDevice>, service: ServiceDescription) -> Self {
        Self {
            device,
            root_device,
            service_type: service.service_type,
            service_id: service.service_id,
            description_url: service.scpd_url,
            control_url: service.control_url,
            event_subscription_url: service.event_sub_url,
        }
    }

    /// The owning device, while it is still alive
    pub fn device(&self) -> Option<Arc<Device>> {
        self.device.upgrade()
    }

    pub fn root_device(&self) -> &Arc<RootDevice> {
        &self.root_device
    }

    pub fn is_content_directory(&self) -> bool {
        self.service_id == upnp_parser::namespaces::CONTENT_DIRECTORY_SERVICE_ID
    }
}

/// Retrieves description documents over HTTP.
///
/// Uses a blocking HTTP client: call it from a plain thread or through
/// `tokio::task::spawn_blocking`, never directly on an async task.
#[derive(Debug, Clone)]
pub struct DescriptionFetcher {
    http_client: reqwest::blocking::Client,
}

impl DescriptionFetcher {
    /// Create a fetcher without an explicit timeout
    pub fn new() -> Result<Self> {
        Self::build(reqwest::blocking::Client::builder().timeout(None))
    }

    /// Create a fetcher whose requests time out after `timeout`
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        Self::build(reqwest::blocking::Client::builder().timeout(timeout))
    }

    fn build(builder: reqwest::blocking::ClientBuilder) -> Result<Self> {
        let http_client = builder.build().map_err(|e| {
            DiscoveryError::NetworkError(format!("Failed to create HTTP client: {}", e))
        })?;
        Ok(Self { http_client })
    }

    /// Fetch and parse the description of `root_device`
    pub fn fetch(&self, root_device: &Arc<RootDevice>) -> Result<Arc<Device>> {
        let description = self.fetch_description(&root_device.location)?;
        Ok(Device::from_description(Arc::clone(root_device), description))
    }

    /// Fetch and parse the description document at `location`
    pub fn fetch_description(&self, location: &str) -> Result<DeviceDescription> {
        let fetch_error = |reason: String| DiscoveryError::DescriptionFetch {
            location: location.to_string(),
            reason,
        };

        debug!(%location, "Fetching device description");

        let response = self
            .http_client
            .get(location)
            .send()
            .map_err(|e| fetch_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(fetch_error(format!("HTTP status {}", status)));
        }

        let xml = response
            .text()
            .map_err(|e| fetch_error(format!("Failed to read response body: {}", e)))?;

        Ok(DeviceDescription::from_xml(&xml)?)
    }
}
