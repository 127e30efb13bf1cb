//! End-to-end receive loop tests over loopback sockets.
//!
//! The engine binds an ephemeral loopback port without joining the multicast
//! group, and its "multicast" destination points at a local socket standing in
//! for the network, so the search request can be observed.

mod helpers;

use helpers::{notify_alive, search_reply};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time::timeout;
use upnp_discovery::{DeviceEvent, DiscoveryConfig, DiscoveryEngine, DiscoveryError};

const WAIT: Duration = Duration::from_secs(2);

async fn network_stand_in() -> (UdpSocket, DiscoveryConfig) {
    let network = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let target = match network.local_addr().unwrap() {
        SocketAddr::V4(addr) => addr,
        SocketAddr::V6(_) => unreachable!("bound to an IPv4 address"),
    };

    let config = DiscoveryConfig::default()
        .with_bind_addr("127.0.0.1:0".parse().unwrap())
        .with_multicast_addr(target)
        .with_join_multicast(false);

    (network, config)
}

async fn recv_text(socket: &UdpSocket) -> String {
    let mut buffer = [0u8; 2048];
    let (len, _) = timeout(WAIT, socket.recv_from(&mut buffer))
        .await
        .expect("timed out waiting for datagram")
        .unwrap();
    String::from_utf8_lossy(&buffer[..len]).into_owned()
}

#[tokio::test]
async fn test_start_sends_search_request() {
    let (network, config) = network_stand_in().await;
    let mut engine = DiscoveryEngine::new(config).unwrap();

    let _events = engine.start().await.unwrap();
    assert!(engine.is_running());

    let request = recv_text(&network).await;
    assert!(request.starts_with("M-SEARCH * HTTP/1.1\r\n"));
    assert!(request.contains("ST: ssdp:all\r\n"));
    assert!(request.contains("MAN: \"ssdp:discover\"\r\n"));
    assert!(request.contains("MX: 3\r\n"));
    assert!(request.ends_with("\r\n\r\n"));

    engine.stop().await;
    assert!(!engine.is_running());
}

#[tokio::test]
async fn test_announcements_delivered_once_per_origin() {
    let (network, config) = network_stand_in().await;
    let mut engine = DiscoveryEngine::new(config).unwrap();

    let callback_hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&callback_hits);
    engine.on_device_found(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    let mut events = engine.start().await.unwrap();
    let engine_addr = engine.local_addr().unwrap();
    let _ = recv_text(&network).await;

    let device_socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let device_addr = device_socket.local_addr().unwrap();
    let announcement = notify_alive("http://127.0.0.1:8200/rootDesc.xml");

    // Garbage first: the loop must survive it
    device_socket.send_to(b"\x00\x01garbage", engine_addr).await.unwrap();
    device_socket.send_to(announcement.as_bytes(), engine_addr).await.unwrap();
    device_socket.send_to(announcement.as_bytes(), engine_addr).await.unwrap();

    let DeviceEvent::Found(device) = timeout(WAIT, events.recv()).await.unwrap().unwrap();
    assert_eq!(device.origin, device_addr);
    assert_eq!(device.location, "http://127.0.0.1:8200/rootDesc.xml");

    // The duplicate announcement never produces a second event
    assert!(timeout(Duration::from_millis(300), events.recv()).await.is_err());

    // A second responder is still picked up afterwards
    let other_socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    other_socket
        .send_to(notify_alive("http://127.0.0.1:9000/desc.xml").as_bytes(), engine_addr)
        .await
        .unwrap();
    let DeviceEvent::Found(second) = timeout(WAIT, events.recv()).await.unwrap().unwrap();
    assert_eq!(second.origin, other_socket.local_addr().unwrap());

    assert_eq!(engine.devices().len(), 2);
    assert_eq!(callback_hits.load(Ordering::SeqCst), 2);

    engine.stop().await;
}

#[tokio::test]
async fn test_search_replies_ignored_by_default() {
    let (network, config) = network_stand_in().await;
    let mut engine = DiscoveryEngine::new(config).unwrap();

    let mut events = engine.start().await.unwrap();
    let engine_addr = engine.local_addr().unwrap();
    let _ = recv_text(&network).await;

    network
        .send_to(search_reply("http://127.0.0.1:8200/rootDesc.xml").as_bytes(), engine_addr)
        .await
        .unwrap();

    assert!(timeout(Duration::from_millis(300), events.recv()).await.is_err());
    assert!(engine.devices().is_empty());

    engine.stop().await;
}

#[tokio::test]
async fn test_search_replies_accepted_when_enabled() {
    let (network, config) = network_stand_in().await;
    let mut engine = DiscoveryEngine::new(config.with_search_responses(true)).unwrap();

    let mut events = engine.start().await.unwrap();
    let engine_addr = engine.local_addr().unwrap();
    let _ = recv_text(&network).await;

    network
        .send_to(search_reply("http://127.0.0.1:8200/rootDesc.xml").as_bytes(), engine_addr)
        .await
        .unwrap();

    let DeviceEvent::Found(device) = timeout(WAIT, events.recv()).await.unwrap().unwrap();
    assert_eq!(device.notification_type.as_deref(), Some("upnp:rootdevice"));

    engine.stop().await;
}

#[tokio::test]
async fn test_loop_keeps_running_without_event_consumer() {
    let (network, config) = network_stand_in().await;
    let mut engine = DiscoveryEngine::new(config).unwrap();

    drop(engine.start().await.unwrap());
    let engine_addr = engine.local_addr().unwrap();
    let _ = recv_text(&network).await;

    let device_socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
    device_socket
        .send_to(notify_alive("http://127.0.0.1:8200/rootDesc.xml").as_bytes(), engine_addr)
        .await
        .unwrap();

    timeout(WAIT, async {
        while engine.devices().is_empty() {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .unwrap();

    assert!(engine.is_running());
    engine.stop().await;
}

#[tokio::test]
async fn test_double_start_rejected() {
    let (_network, config) = network_stand_in().await;
    let mut engine = DiscoveryEngine::new(config).unwrap();

    let _events = engine.start().await.unwrap();
    assert!(matches!(engine.start().await, Err(DiscoveryError::AlreadyRunning)));

    engine.stop().await;
}

#[tokio::test]
async fn test_discover_with_config_returns_snapshot() {
    let (_network, config) = network_stand_in().await;

    let devices = upnp_discovery::discover_with_config(config, Duration::from_millis(100))
        .await
        .unwrap();
    assert!(devices.is_empty());
}
