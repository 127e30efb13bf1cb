//! Origin deduplication and malformed-datagram properties

mod helpers;

use helpers::{location_for, notify_alive};
use proptest::prelude::*;
use std::collections::HashSet;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use upnp_discovery::{DiscoveryConfig, DiscoveryEngine};

fn origin_strategy() -> impl Strategy<Value = SocketAddr> {
    // A small pool so sequences contain plenty of repeats
    (1u8..6, prop::sample::select(vec![1900u16, 50000, 50001]))
        .prop_map(|(host, port)| SocketAddr::new(IpAddr::V4(Ipv4Addr::new(192, 168, 1, host)), port))
}

proptest! {
    #[test]
    fn one_root_device_per_unique_origin(origins in prop::collection::vec(origin_strategy(), 0..40)) {
        let engine = DiscoveryEngine::new(DiscoveryConfig::default()).unwrap();

        let mut found = Vec::new();
        for origin in &origins {
            let datagram = notify_alive(&location_for(origin));
            if let Some(device) = engine.handle_datagram(datagram.as_bytes(), *origin) {
                found.push(device.origin);
            }
        }

        let unique: HashSet<SocketAddr> = origins.iter().copied().collect();
        prop_assert_eq!(found.len(), unique.len());
        prop_assert_eq!(engine.devices().len(), unique.len());

        // Devices are reported in order of first appearance
        let mut seen = HashSet::new();
        let first_appearance: Vec<SocketAddr> = origins
            .iter()
            .copied()
            .filter(|origin| seen.insert(*origin))
            .collect();
        prop_assert_eq!(found, first_appearance);
    }

    #[test]
    fn datagrams_without_blank_line_never_produce_devices(
        body in "[A-Za-z0-9:./ -]{0,200}",
        origin in origin_strategy(),
    ) {
        let engine = DiscoveryEngine::new(DiscoveryConfig::default()).unwrap();

        // No line break at all means the header block can never be terminated
        let datagram = format!("NOTIFY * HTTP/1.1 LOCATION: http://x/ {}", body);
        prop_assert!(engine.handle_datagram(datagram.as_bytes(), origin).is_none());
        prop_assert!(engine.devices().is_empty());
    }

    #[test]
    fn arbitrary_bytes_never_panic(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
        let engine = DiscoveryEngine::new(DiscoveryConfig::default()).unwrap();
        let origin: SocketAddr = "192.168.1.50:1900".parse().unwrap();

        let _ = engine.handle_datagram(&bytes, origin);
        prop_assert!(engine.devices().len() <= 1);
    }
}
