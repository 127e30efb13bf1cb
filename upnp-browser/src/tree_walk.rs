//! Depth-limited expansion of the content tree

use content_directory::{BrowseError, Browser, Expand, Node};
use serde::Serialize;

/// One expanded node, ready for printing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeEntry {
    pub kind: &'static str,
    pub label: String,
    /// Object id for containers and items
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Playable resource URL for items
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeEntry>,
}

impl TreeEntry {
    fn new(node: &Node, children: Vec<TreeEntry>) -> Self {
        let (kind, id, location) = match node {
            Node::RootDevice(_) => ("root-device", None, None),
            Node::Device(device) => ("device", Some(device.udn.clone()), None),
            Node::Service(service) => ("service", Some(service.service_id.clone()), None),
            Node::Container(container) => ("container", Some(container.id.clone()), None),
            Node::Item(item) => ("item", Some(item.id.clone()), Some(item.location.clone())),
        };

        Self {
            kind,
            label: node.label(),
            id,
            location,
            children,
        }
    }
}

/// Expand `nodes` down to `depth` levels; `depth` 1 keeps just the given nodes.
///
/// Fails on the first node that cannot be expanded.
pub fn walk(browser: &Browser, nodes: Vec<Node>, depth: u32) -> Result<Vec<TreeEntry>, BrowseError> {
    nodes
        .into_iter()
        .map(|node| {
            let children = if depth > 1 && !node.is_leaf() {
                walk(browser, node.children(browser)?, depth - 1)?
            } else {
                Vec::new()
            };
            Ok(TreeEntry::new(&node, children))
        })
        .collect()
}
