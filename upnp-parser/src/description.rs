//! UPnP device description documents.
//!
//! Only the root device is decoded; embedded `deviceList` sub-devices are
//! ignored.

use crate::common::xml_decode::{self, children, optional_text, required_child, required_text};
use crate::error::ParseResult;
use crate::namespaces::{CONTENT_DIRECTORY_SERVICE_ID, DEVICE};
use serde::Serialize;
use xmltree::Element;

/// The root `<device>` element of a description document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceDescription {
    pub device_type: String,
    pub friendly_name: String,
    pub manufacturer: String,
    pub model_name: String,
    pub model_number: String,
    pub serial_number: String,
    /// Unique device name, e.g. `uuid:4d696e69-444c-164e-9d41-b827eb54e4d7`
    pub udn: String,
    /// Empty when the device does not advertise one
    pub presentation_url: String,
    /// Services in document order
    pub services: Vec<ServiceDescription>,
}

/// A `<service>` entry of the device's `serviceList`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceDescription {
    pub service_type: String,
    pub service_id: String,
    /// `SCPDURL`
    pub scpd_url: String,
    /// `controlURL`
    pub control_url: String,
    /// `eventSubURL`
    pub event_sub_url: String,
}

impl DeviceDescription {
    /// Parse a device description document.
    ///
    /// Every element must be qualified with `urn:schemas-upnp-org:device-1-0`.
    /// `deviceType`, `friendlyName`, `manufacturer`, `modelName`, `modelNumber`,
    /// `serialNumber`, `UDN` and `serviceList` are required.
    pub fn from_xml(xml: &str) -> ParseResult<Self> {
        let root = xml_decode::parse_document(xml)?;
        xml_decode::expect_element(&root, DEVICE, "root")?;

        let device = required_child(&root, Some(DEVICE), "device")?;
        Self::from_element(device)
    }

    fn from_element(device: &Element) -> ParseResult<Self> {
        let field = |name: &str| required_text(device, Some(DEVICE), name);

        let service_list = required_child(device, Some(DEVICE), "serviceList")?;
        let services = children(service_list, Some(DEVICE), "service")
            .map(ServiceDescription::from_element)
            .collect::<ParseResult<Vec<_>>>()?;

        Ok(Self {
            device_type: field("deviceType")?,
            friendly_name: field("friendlyName")?,
            manufacturer: field("manufacturer")?,
            model_name: field("modelName")?,
            model_number: field("modelNumber")?,
            serial_number: field("serialNumber")?,
            udn: field("UDN")?,
            presentation_url: optional_text(device, Some(DEVICE), "presentationURL")
                .unwrap_or_default(),
            services,
        })
    }

    /// The content-directory service, if the device exposes one
    pub fn content_directory(&self) -> Option<&ServiceDescription> {
        self.services.iter().find(|s| s.is_content_directory())
    }
}

impl ServiceDescription {
    fn from_element(service: &Element) -> ParseResult<Self> {
        let field = |name: &str| required_text(service, Some(DEVICE), name);

        Ok(Self {
            service_type: field("serviceType")?,
            service_id: field("serviceId")?,
            scpd_url: field("SCPDURL")?,
            control_url: field("controlURL")?,
            event_sub_url: field("eventSubURL")?,
        })
    }

    pub fn is_content_directory(&self) -> bool {
        self.service_id == CONTENT_DIRECTORY_SERVICE_ID
    }
}
