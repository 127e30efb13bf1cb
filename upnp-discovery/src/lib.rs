//! UPnP device discovery library
//!
//! This crate finds UPnP devices on the local network using SSDP (Simple
//! Service Discovery Protocol) and retrieves their device descriptions.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::time::Duration;
//!
//! # async fn run() -> upnp_discovery::Result<()> {
//! // Listen for announcements for five seconds
//! let devices = upnp_discovery::discover(Duration::from_secs(5)).await?;
//! for device in devices {
//!     println!("{} describes itself at {}", device.origin, device.location);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Event-based Discovery
//!
//! For long-running listeners, drive the [`DiscoveryEngine`] directly:
//!
//! ```no_run
//! use upnp_discovery::{DeviceEvent, DiscoveryConfig, DiscoveryEngine};
//!
//! # async fn run() -> upnp_discovery::Result<()> {
//! let mut engine = DiscoveryEngine::new(DiscoveryConfig::default())?;
//! let mut events = engine.start().await?;
//!
//! while let Some(DeviceEvent::Found(device)) = events.recv().await {
//!     println!("Found: {}", device.location);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Expanding a root device into its services is a blocking HTTP round-trip
//! performed by [`DescriptionFetcher`].

mod config;
pub mod device;
mod discovery;
mod error;
pub mod registry;
pub mod ssdp;

pub use config::{DiscoveryConfig, SSDP_MULTICAST_ADDR, SSDP_PORT};
pub use device::{DescriptionFetcher, Device, DeviceService};
pub use discovery::{DeviceCallback, DiscoveryEngine};
pub use error::{DiscoveryError, Result};
pub use registry::DeviceRegistry;

use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

/// A device seen on the network, before its description has been fetched.
///
/// One record exists per responding endpoint; the record never changes after
/// it is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RootDevice {
    /// Network endpoint the announcement came from
    pub origin: SocketAddr,
    /// URL of the device description document
    pub location: String,
    /// `USN` header, if announced
    pub usn: Option<String>,
    /// `NT` header of an announcement or `ST` header of a search reply
    pub notification_type: Option<String>,
    /// `SERVER` header, if announced
    pub server: Option<String>,
}

impl RootDevice {
    pub fn new(origin: SocketAddr, location: impl Into<String>) -> Self {
        Self {
            origin,
            location: location.into(),
            usn: None,
            notification_type: None,
            server: None,
        }
    }
}

/// Events emitted during device discovery.
#[derive(Debug, Clone)]
pub enum DeviceEvent {
    /// A device was seen from an origin not observed before
    Found(Arc<RootDevice>),
}

/// Listen with the default configuration for `window` and return every root
/// device observed.
pub async fn discover(window: Duration) -> Result<Vec<Arc<RootDevice>>> {
    discover_with_config(DiscoveryConfig::default(), window).await
}

/// Listen with `config` for `window` and return every root device observed.
pub async fn discover_with_config(
    config: DiscoveryConfig,
    window: Duration,
) -> Result<Vec<Arc<RootDevice>>> {
    let mut engine = DiscoveryEngine::new(config)?;

    // Only the registry snapshot is wanted; an undrained channel must not stall the loop
    drop(engine.start().await?);

    tokio::time::sleep(window).await;
    engine.stop().await;

    Ok(engine.devices())
}
