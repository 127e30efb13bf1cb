//! Shared helpers for integration tests

#![allow(dead_code)]

use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Load a fixture from the fixtures directory
pub fn fixture(filename: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests/fixtures");
    path.push(filename);

    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to load fixture {}: {}", filename, e))
}

/// An `ssdp:alive` announcement pointing at `location`
pub fn notify_alive(location: &str) -> String {
    format!(
        "NOTIFY * HTTP/1.1\r\n\
         HOST: 239.255.255.250:1900\r\n\
         CACHE-CONTROL: max-age=1810\r\n\
         LOCATION: {}\r\n\
         NT: upnp:rootdevice\r\n\
         NTS: ssdp:alive\r\n\
         SERVER: Linux/5.10 DLNADOC/1.50 UPnP/1.0 MiniDLNA/1.2.1\r\n\
         USN: uuid:4d696e69-444c-164e-9d41-b827eb54e4d7::upnp:rootdevice\r\n\
         \r\n",
        location
    )
}

/// A unicast reply to an `M-SEARCH`
pub fn search_reply(location: &str) -> String {
    format!(
        "HTTP/1.1 200 OK\r\n\
         CACHE-CONTROL: max-age=1800\r\n\
         EXT:\r\n\
         LOCATION: {}\r\n\
         ST: upnp:rootdevice\r\n\
         USN: uuid:4d696e69-444c-164e-9d41-b827eb54e4d7::upnp:rootdevice\r\n\
         \r\n",
        location
    )
}

/// Location a test device at `origin` would advertise
pub fn location_for(origin: &SocketAddr) -> String {
    format!("http://{}:8200/rootDesc.xml", origin.ip())
}
