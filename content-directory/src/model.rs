//! Containers and items of a content directory.
//!
//! Both keep the service they were listed by, so a container can be expanded
//! and an item's resource located even when held apart from the tree.

use serde::Serialize;
use std::sync::Arc;
use upnp_discovery::DeviceService;
use upnp_parser::common::didl::is_true;
use upnp_parser::{DidlContainer, DidlItem};

/// A browsable directory of the catalog
#[derive(Debug, Clone, Serialize)]
pub struct Container {
    #[serde(skip)]
    device_service: Arc<DeviceService>,
    /// Opaque object id, the target of the next Browse
    pub id: String,
    pub parent_id: String,
    /// Raw `restricted` attribute; see [`Container::is_restricted`]
    pub restricted: String,
    /// Raw `childCount` attribute, empty when not reported
    pub child_count: String,
    /// Raw `searchable` attribute, empty when not reported
    pub searchable: String,
    pub title: String,
    /// Empty when not reported
    pub modification_time: String,
    pub class: String,
}

/// A leaf entry of the catalog backed by a playable resource
#[derive(Debug, Clone, Serialize)]
pub struct Item {
    #[serde(skip)]
    device_service: Arc<DeviceService>,
    pub id: String,
    /// Id of the item this one references, if any
    pub reference_id: Option<String>,
    pub parent_id: String,
    /// Raw `restricted` attribute; see [`Item::is_restricted`]
    pub restricted: String,
    pub title: String,
    pub date: String,
    pub genre: String,
    pub album: String,
    pub album_art_uri: String,
    pub extension: String,
    pub modification_time: String,
    pub added_time: String,
    pub last_updated: String,
    pub duration: String,
    pub size: String,
    pub resolution: String,
    pub bitrate: String,
    pub protocol_info: String,
    /// URL of the playable resource
    pub location: String,
    pub class: String,
}

impl Container {
    pub fn from_didl(device_service: Arc<DeviceService>, record: DidlContainer) -> Self {
        Self {
            device_service,
            id: record.id,
            parent_id: record.parent_id,
            restricted: record.restricted,
            child_count: record.child_count,
            searchable: record.searchable,
            title: record.title,
            modification_time: record.modification_time,
            class: record.class,
        }
    }

    /// The service this container was listed by
    pub fn device_service(&self) -> &Arc<DeviceService> {
        &self.device_service
    }

    /// Number of children, `None` when absent or not a number
    pub fn child_count(&self) -> Option<u32> {
        self.child_count.parse().ok()
    }

    pub fn is_restricted(&self) -> bool {
        is_true(&self.restricted)
    }

    pub fn is_searchable(&self) -> bool {
        is_true(&self.searchable)
    }
}

impl Item {
    pub fn from_didl(device_service: Arc<DeviceService>, record: DidlItem) -> Self {
        let res = record.res;

        Self {
            device_service,
            id: record.id,
            reference_id: record.ref_id,
            parent_id: record.parent_id,
            restricted: record.restricted,
            title: record.title,
            date: record.date,
            genre: record.genre,
            album: record.album,
            album_art_uri: record.album_art_uri,
            extension: record.extension,
            modification_time: record.modification_time,
            added_time: record.added_time,
            last_updated: record.last_updated,
            duration: res.duration,
            size: res.size,
            resolution: res.resolution,
            bitrate: res.bitrate,
            protocol_info: res.protocol_info,
            location: res.uri,
            class: record.class,
        }
    }

    /// The service this item was listed by
    pub fn device_service(&self) -> &Arc<DeviceService> {
        &self.device_service
    }

    pub fn is_restricted(&self) -> bool {
        is_true(&self.restricted)
    }

    /// Content type from the third field of `protocolInfo`, e.g. `audio/flac`
    pub fn mime_type(&self) -> Option<&str> {
        self.protocol_info
            .split(':')
            .nth(2)
            .filter(|mime| !mime.is_empty() && *mime != "*")
    }
}
