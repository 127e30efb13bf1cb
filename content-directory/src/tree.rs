//! The lazily expanded content tree.
//!
//! ```text
//! RootDevice ─▶ Device ─▶ DeviceService ─▶ Container ─▶ Container ...
//!                                                    └─▶ Item
//! ```
//!
//! Nothing below a node is fetched until that node is expanded, and
//! expanding the same node twice fetches twice.

use crate::client::ContentDirectory;
use crate::error::Result;
use crate::model::{Container, Item};
use soap_client::ROOT_OBJECT_ID;
use std::sync::Arc;
use upnp_discovery::{DescriptionFetcher, Device, DeviceService, RootDevice};

/// Any entity of the content tree
#[derive(Debug, Clone)]
pub enum Node {
    RootDevice(Arc<RootDevice>),
    Device(Arc<Device>),
    Service(Arc<DeviceService>),
    Container(Container),
    Item(Item),
}

/// Fetches the children of a node on demand
pub trait Expand {
    fn children(&self, browser: &Browser) -> Result<Vec<Node>>;
}

/// The collaborators needed to expand nodes: an HTTP description fetcher and
/// a Browse client
#[derive(Debug, Clone)]
pub struct Browser {
    fetcher: DescriptionFetcher,
    directory: ContentDirectory,
}

impl Browser {
    pub fn new(fetcher: DescriptionFetcher, directory: ContentDirectory) -> Self {
        Self { fetcher, directory }
    }

    pub fn fetcher(&self) -> &DescriptionFetcher {
        &self.fetcher
    }

    pub fn directory(&self) -> &ContentDirectory {
        &self.directory
    }
}

impl Node {
    /// Short display text for the node
    pub fn label(&self) -> String {
        match self {
            Node::RootDevice(root) => format!("{} ({})", root.origin, root.location),
            Node::Device(device) => device.friendly_name.clone(),
            Node::Service(service) => service.service_id.clone(),
            Node::Container(container) => match container.child_count() {
                Some(count) => format!("{} [{}]", container.title, count),
                None => container.title.clone(),
            },
            Node::Item(item) => item.title.clone(),
        }
    }

    /// Whether the node can never have children
    pub fn is_leaf(&self) -> bool {
        match self {
            Node::Item(_) => true,
            Node::Service(service) => !service.is_content_directory(),
            _ => false,
        }
    }
}

impl Expand for Node {
    fn children(&self, browser: &Browser) -> Result<Vec<Node>> {
        match self {
            Node::RootDevice(root) => {
                let device = browser.fetcher.fetch(root)?;
                Ok(vec![Node::Device(device)])
            }
            Node::Device(device) => Ok(device
                .services
                .iter()
                .cloned()
                .map(Node::Service)
                .collect()),
            Node::Service(service) if service.is_content_directory() => {
                let listing = browser.directory.list_children(service, ROOT_OBJECT_ID)?;
                Ok(listing_nodes(listing.containers, listing.items))
            }
            Node::Service(_) | Node::Item(_) => Ok(Vec::new()),
            Node::Container(container) => container.children(browser),
        }
    }
}

impl Expand for Container {
    fn children(&self, browser: &Browser) -> Result<Vec<Node>> {
        let listing = browser
            .directory
            .list_children(self.device_service(), &self.id)?;
        Ok(listing_nodes(listing.containers, listing.items))
    }
}

fn listing_nodes(containers: Vec<Container>, items: Vec<Item>) -> Vec<Node> {
    containers
        .into_iter()
        .map(Node::Container)
        .chain(items.into_iter().map(Node::Item))
        .collect()
}

impl From<Arc<RootDevice>> for Node {
    fn from(root: Arc<RootDevice>) -> Self {
        Node::RootDevice(root)
    }
}

impl From<Arc<Device>> for Node {
    fn from(device: Arc<Device>) -> Self {
        Node::Device(device)
    }
}

impl From<Arc<DeviceService>> for Node {
    fn from(service: Arc<DeviceService>) -> Self {
        Node::Service(service)
    }
}

impl From<Container> for Node {
    fn from(container: Container) -> Self {
        Node::Container(container)
    }
}

impl From<Item> for Node {
    fn from(item: Item) -> Self {
        Node::Item(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use upnp_parser::{DeviceDescription, ServiceDescription};

    fn service(service_type: &str, service_id: &str) -> ServiceDescription {
        ServiceDescription {
            service_type: service_type.to_string(),
            service_id: service_id.to_string(),
            scpd_url: "/scpd.xml".to_string(),
            control_url: "/ctl".to_string(),
            event_sub_url: "/evt".to_string(),
        }
    }

    fn device() -> Arc<Device> {
        let root = Arc::new(RootDevice::new(
            "192.168.1.5:1900".parse().unwrap(),
            "http://192.168.1.5:8200/rootDesc.xml",
        ));
        Device::from_description(
            root,
            DeviceDescription {
                device_type: "urn:schemas-upnp-org:device:MediaServer:1".to_string(),
                friendly_name: "NAS".to_string(),
                manufacturer: "Justin Maggard".to_string(),
                model_name: "MiniDLNA".to_string(),
                model_number: "1.2.1".to_string(),
                serial_number: "0".to_string(),
                udn: "uuid:nas".to_string(),
                presentation_url: String::new(),
                services: vec![
                    service(
                        "urn:schemas-upnp-org:service:ContentDirectory:1",
                        "urn:upnp-org:serviceId:ContentDirectory",
                    ),
                    service(
                        "urn:schemas-upnp-org:service:ConnectionManager:1",
                        "urn:upnp-org:serviceId:ConnectionManager",
                    ),
                ],
            },
        )
    }

    fn browser() -> Browser {
        Browser::new(DescriptionFetcher::new().unwrap(), ContentDirectory::new())
    }

    #[test]
    fn test_device_children_are_its_services_in_order() {
        let device = device();
        let children = Node::from(Arc::clone(&device)).children(&browser()).unwrap();

        assert_eq!(children.len(), 2);
        match (&children[0], &children[1]) {
            (Node::Service(first), Node::Service(second)) => {
                assert!(Arc::ptr_eq(first, &device.services[0]));
                assert!(Arc::ptr_eq(second, &device.services[1]));
            }
            other => panic!("Expected two services, got {:?}", other),
        }
    }

    #[test]
    fn test_non_content_directory_service_has_no_children() {
        let device = device();
        let node = Node::from(Arc::clone(&device.services[1]));

        assert!(node.is_leaf());
        // Expanding does not touch the network
        assert!(node.children(&browser()).unwrap().is_empty());
    }

    #[test]
    fn test_labels() {
        let device = device();
        assert_eq!(Node::from(Arc::clone(&device)).label(), "NAS");
        assert_eq!(
            Node::from(Arc::clone(&device.services[0])).label(),
            "urn:upnp-org:serviceId:ContentDirectory"
        );
        assert_eq!(
            Node::from(Arc::clone(device.root_device())).label(),
            "192.168.1.5:1900 (http://192.168.1.5:8200/rootDesc.xml)"
        );
        assert!(!Node::from(Arc::clone(&device.services[0])).is_leaf());
    }
}
