//! Well-known XML namespaces and identifiers used by UPnP AV devices.

/// UPnP device description documents (`<root>`, `<device>`, `<service>`)
pub const DEVICE: &str = "urn:schemas-upnp-org:device-1-0";

/// SOAP 1.1 envelope
pub const SOAP_ENVELOPE: &str = "http://schemas.xmlsoap.org/soap/envelope/";

/// SOAP 1.1 encoding style, referenced by `s:encodingStyle`
pub const SOAP_ENCODING: &str = "http://schemas.xmlsoap.org/soap/encoding/";

/// UPnP control namespace carrying `UPnPError` fault details
pub const UPNP_CONTROL: &str = "urn:schemas-upnp-org:control-1-0";

/// DIDL-Lite root, `container`, `item` and `res` elements
pub const DIDL_LITE: &str = "urn:schemas-upnp-org:metadata-1-0/DIDL-Lite/";

/// Dublin Core metadata (`dc:title`, `dc:date`)
pub const DUBLIN_CORE: &str = "http://purl.org/dc/elements/1.1/";

/// UPnP metadata (`upnp:class`, `upnp:genre`, `upnp:album`, `upnp:albumArtURI`)
pub const UPNP_METADATA: &str = "urn:schemas-upnp-org:metadata-1-0/upnp/";

/// PacketVideo extensions (`pv:modificationTime`, `pv:addedTime`, ...)
pub const PACKET_VIDEO: &str = "http://www.pv.com/pvns/";

/// `serviceId` identifying the content-directory service of a device
pub const CONTENT_DIRECTORY_SERVICE_ID: &str = "urn:upnp-org:serviceId:ContentDirectory";

/// `serviceType` of version 1 of the content-directory service
pub const CONTENT_DIRECTORY_SERVICE_TYPE: &str = "urn:schemas-upnp-org:service:ContentDirectory:1";
