//! Discovery engine configuration

use crate::error::{DiscoveryError, Result};
use std::net::{Ipv4Addr, SocketAddrV4};

/// Standard SSDP multicast group
pub const SSDP_MULTICAST_ADDR: Ipv4Addr = Ipv4Addr::new(239, 255, 255, 250);

/// Standard SSDP port
pub const SSDP_PORT: u16 = 1900;

/// Configuration for the [`DiscoveryEngine`](crate::DiscoveryEngine)
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Destination of the search request and group to join
    /// Default: 239.255.255.250:1900
    pub multicast_addr: SocketAddrV4,

    /// Local address the listener binds to
    /// Default: 0.0.0.0:1900
    pub bind_addr: SocketAddrV4,

    /// `ST` header of the search request
    /// Default: "ssdp:all"
    pub search_target: String,

    /// `MX` header of the search request (response window hint, seconds)
    /// Default: 3
    pub mx: u8,

    /// Multicast time-to-live for outgoing datagrams
    /// Default: 5
    pub multicast_ttl: u32,

    /// Join the multicast group on the bound socket
    /// Default: true
    pub join_multicast: bool,

    /// Also treat `HTTP/1.1 200` search replies as device sightings
    /// Default: false (only `NOTIFY` announcements count)
    pub accept_search_responses: bool,

    /// Buffer size of the device event channel
    /// Default: 100
    pub event_buffer_size: usize,

    /// Largest datagram the listener reads in one piece
    /// Default: 8192
    pub max_datagram_size: usize,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            multicast_addr: SocketAddrV4::new(SSDP_MULTICAST_ADDR, SSDP_PORT),
            bind_addr: SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, SSDP_PORT),
            search_target: "ssdp:all".to_string(),
            mx: 3,
            multicast_ttl: 5,
            join_multicast: true,
            accept_search_responses: false,
            event_buffer_size: 100,
            max_datagram_size: 8192,
        }
    }
}

impl DiscoveryConfig {
    /// Create a new DiscoveryConfig with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Listen on an ephemeral port instead of the SSDP port.
    ///
    /// Announcements are only delivered to port 1900, so this configuration
    /// relies on unicast search replies and enables them as sightings. Useful
    /// when another SSDP stack already holds port 1900 exclusively.
    pub fn ephemeral_port() -> Self {
        Self {
            bind_addr: SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 0),
            accept_search_responses: true,
            ..Default::default()
        }
    }

    /// Validate the configuration and return any issues
    pub fn validate(&self) -> Result<()> {
        if self.search_target.trim().is_empty() {
            return Err(DiscoveryError::Configuration(
                "Search target must not be empty".to_string(),
            ));
        }

        if self.mx == 0 {
            return Err(DiscoveryError::Configuration(
                "MX must be at least 1 second".to_string(),
            ));
        }

        if self.join_multicast && !self.multicast_addr.ip().is_multicast() {
            return Err(DiscoveryError::Configuration(format!(
                "{} is not a multicast address",
                self.multicast_addr.ip()
            )));
        }

        if self.event_buffer_size == 0 {
            return Err(DiscoveryError::Configuration(
                "Event buffer size must be greater than 0".to_string(),
            ));
        }

        if self.max_datagram_size < 512 {
            return Err(DiscoveryError::Configuration(
                "Max datagram size must be at least 512 bytes".to_string(),
            ));
        }

        Ok(())
    }

    pub fn with_multicast_addr(mut self, addr: SocketAddrV4) -> Self {
        self.multicast_addr = addr;
        self
    }

    pub fn with_bind_addr(mut self, addr: SocketAddrV4) -> Self {
        self.bind_addr = addr;
        self
    }

    pub fn with_search_target(mut self, target: impl Into<String>) -> Self {
        self.search_target = target.into();
        self
    }

    pub fn with_mx(mut self, mx: u8) -> Self {
        self.mx = mx;
        self
    }

    pub fn with_join_multicast(mut self, join: bool) -> Self {
        self.join_multicast = join;
        self
    }

    pub fn with_search_responses(mut self, accept: bool) -> Self {
        self.accept_search_responses = accept;
        self
    }

    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = size;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DiscoveryConfig::default();
        assert_eq!(config.multicast_addr.to_string(), "239.255.255.250:1900");
        assert_eq!(config.bind_addr.to_string(), "0.0.0.0:1900");
        assert_eq!(config.search_target, "ssdp:all");
        assert_eq!(config.mx, 3);
        assert_eq!(config.multicast_ttl, 5);
        assert!(config.join_multicast);
        assert!(!config.accept_search_responses);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_ephemeral_port_preset() {
        let config = DiscoveryConfig::ephemeral_port();
        assert_eq!(config.bind_addr.port(), 0);
        assert!(config.accept_search_responses);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        assert!(DiscoveryConfig::new().with_mx(0).validate().is_err());
        assert!(DiscoveryConfig::new().with_search_target("  ").validate().is_err());
        assert!(DiscoveryConfig::new().with_buffer_size(0).validate().is_err());

        let unicast_group = DiscoveryConfig::new()
            .with_multicast_addr(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 1900));
        assert!(unicast_group.validate().is_err());
        assert!(unicast_group.with_join_multicast(false).validate().is_ok());

        let tiny = DiscoveryConfig {
            max_datagram_size: 64,
            ..Default::default()
        };
        assert!(tiny.validate().is_err());
    }
}
