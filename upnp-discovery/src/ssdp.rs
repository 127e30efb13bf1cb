//! SSDP (Simple Service Discovery Protocol) wire handling
//!
//! SSDP messages are HTTP-like datagrams: a start line followed by
//! colon-delimited headers and a terminating blank line. This module parses
//! them, builds the search request and sets up the listening socket.

use crate::config::DiscoveryConfig;
use crate::error::{DiscoveryError, Result};
use socket2::{Domain, Protocol, Socket, Type};
use std::net::{Ipv4Addr, SocketAddr, UdpSocket};

/// A parsed SSDP datagram
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SsdpMessage {
    /// The full first line, e.g. `NOTIFY * HTTP/1.1`
    pub start_line: String,
    /// Text of the start line before the first space
    pub verb: String,
    headers: Vec<(String, String)>,
}

impl SsdpMessage {
    /// Parse an SSDP datagram.
    ///
    /// Returns `None` when the start line carries no verb or the header block
    /// is not terminated by a blank line. A header line without a colon is kept
    /// with an empty value.
    pub fn parse(text: &str) -> Option<Self> {
        let mut lines = text.split('\n').map(|line| line.strip_suffix('\r').unwrap_or(line));

        let start_line = lines.next()?;
        let verb = start_line.split(' ').next().unwrap_or_default();
        if verb.is_empty() {
            return None;
        }

        let mut headers = Vec::new();
        let mut terminated = false;
        for line in lines {
            if line.trim().is_empty() {
                terminated = true;
                break;
            }
            let (name, value) = line.split_once(':').unwrap_or((line, ""));
            headers.push((name.trim().to_string(), value.trim().to_string()));
        }

        if !terminated {
            return None;
        }

        Some(Self {
            start_line: start_line.to_string(),
            verb: verb.to_string(),
            headers,
        })
    }

    /// Look up a header value by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Whether this is a multicast announcement
    pub fn is_notify(&self) -> bool {
        self.verb.eq_ignore_ascii_case("NOTIFY")
    }

    /// Whether this is a successful unicast reply to a search request
    pub fn is_search_response(&self) -> bool {
        let mut parts = self.start_line.split(' ');
        matches!(
            (parts.next(), parts.next()),
            (Some(version), Some("200")) if version.starts_with("HTTP/")
        )
    }

    /// The `Location` header, if present and non-empty
    pub fn location(&self) -> Option<&str> {
        self.header("LOCATION").filter(|value| !value.is_empty())
    }
}

/// Build the `M-SEARCH` request sent when discovery starts
pub(crate) fn search_request(config: &DiscoveryConfig) -> String {
    format!(
        "M-SEARCH * HTTP/1.1\r\n\
         HOST: {}\r\n\
         ST: {}\r\n\
         MAN: \"ssdp:discover\"\r\n\
         MX: {}\r\n\
         \r\n",
        config.multicast_addr, config.search_target, config.mx
    )
}

/// Create the listening socket: address reuse, bind, broadcast and group membership.
///
/// The socket is returned in non-blocking mode, ready to be handed to tokio.
pub(crate) fn bind_socket(config: &DiscoveryConfig) -> Result<UdpSocket> {
    let network = |what: &str, e: std::io::Error| {
        DiscoveryError::NetworkError(format!("Failed to {}: {}", what, e))
    };

    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))
        .map_err(|e| network("create UDP socket", e))?;

    socket
        .set_reuse_address(true)
        .map_err(|e| network("set SO_REUSEADDR", e))?;

    #[cfg(unix)]
    socket
        .set_reuse_port(true)
        .map_err(|e| network("set SO_REUSEPORT", e))?;

    socket
        .set_broadcast(true)
        .map_err(|e| network("enable broadcast", e))?;

    let bind_addr = SocketAddr::V4(config.bind_addr);
    socket
        .bind(&bind_addr.into())
        .map_err(|e| network(&format!("bind {}", bind_addr), e))?;

    if config.join_multicast {
        socket
            .join_multicast_v4(config.multicast_addr.ip(), &Ipv4Addr::UNSPECIFIED)
            .map_err(|e| network(&format!("join multicast group {}", config.multicast_addr.ip()), e))?;
        socket
            .set_multicast_ttl_v4(config.multicast_ttl)
            .map_err(|e| network("set multicast TTL", e))?;
    }

    socket
        .set_nonblocking(true)
        .map_err(|e| network("set non-blocking mode", e))?;

    Ok(socket.into())
}
