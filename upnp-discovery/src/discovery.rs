//! The discovery engine and its receive loop.
//!
//! The engine:
//! 1. Binds the SSDP socket and joins the multicast group
//! 2. Sends a single `M-SEARCH` request
//! 3. Listens until stopped, turning announcements into [`RootDevice`]s
//! 4. Deduplicates by origin and notifies callbacks and the event channel

use crate::config::DiscoveryConfig;
use crate::error::{DiscoveryError, Result};
use crate::registry::DeviceRegistry;
use crate::ssdp::{self, SsdpMessage};
use crate::{DeviceEvent, RootDevice};
use parking_lot::RwLock;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Pause after a failed receive before polling the socket again
const RECEIVE_ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// Handler invoked once per newly observed root device
pub type DeviceCallback = Arc<dyn Fn(&Arc<RootDevice>) + Send + Sync>;

/// State shared between the engine and its receive loop
struct Listener {
    registry: Arc<DeviceRegistry>,
    callbacks: RwLock<Vec<DeviceCallback>>,
    accept_search_responses: bool,
}

impl Listener {
    fn handle_datagram(&self, datagram: &[u8], origin: SocketAddr) -> Option<Arc<RootDevice>> {
        let text = String::from_utf8_lossy(datagram);

        let message = match SsdpMessage::parse(&text) {
            Some(message) => message,
            None => {
                debug!(%origin, bytes = datagram.len(), "Dropping malformed SSDP datagram");
                return None;
            }
        };

        let is_sighting = message.is_notify()
            || (self.accept_search_responses && message.is_search_response());
        if !is_sighting {
            return None;
        }

        // Cheap pre-check; the registry repeats it atomically on insert
        if self.registry.contains(&origin) {
            return None;
        }

        let location = match message.location() {
            Some(location) => location,
            None => {
                debug!(%origin, verb = %message.verb, "Ignoring announcement without LOCATION");
                return None;
            }
        };

        let device = RootDevice {
            origin,
            location: location.to_string(),
            usn: message.header("USN").map(str::to_string),
            notification_type: message
                .header("NT")
                .or_else(|| message.header("ST"))
                .map(str::to_string),
            server: message.header("SERVER").map(str::to_string),
        };

        let device = self.registry.register(device)?;
        info!(%origin, location = %device.location, "Discovered root device");

        let callbacks = self.callbacks.read().clone();
        for callback in callbacks {
            callback(&device);
        }

        Some(device)
    }
}

/// Listens for SSDP traffic and materializes root devices.
///
/// Dropping the engine aborts the receive loop; [`stop`](Self::stop) shuts it
/// down gracefully.
pub struct DiscoveryEngine {
    config: DiscoveryConfig,
    listener: Arc<Listener>,
    local_addr: Option<SocketAddr>,
    shutdown_tx: Option<mpsc::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl DiscoveryEngine {
    /// Create an engine; nothing touches the network until [`start`](Self::start)
    pub fn new(config: DiscoveryConfig) -> Result<Self> {
        config.validate()?;

        let listener = Arc::new(Listener {
            registry: Arc::new(DeviceRegistry::new()),
            callbacks: RwLock::new(Vec::new()),
            accept_search_responses: config.accept_search_responses,
        });

        Ok(Self {
            config,
            listener,
            local_addr: None,
            shutdown_tx: None,
            task: None,
        })
    }

    /// Register a handler invoked on the receive loop for every new root device
    pub fn on_device_found<F>(&self, callback: F)
    where
        F: Fn(&Arc<RootDevice>) + Send + Sync + 'static,
    {
        self.listener.callbacks.write().push(Arc::new(callback));
    }

    /// Bind the socket, send the search request and spawn the receive loop.
    ///
    /// Returns the channel on which every new root device is delivered. The
    /// loop keeps running if the receiver is dropped; callbacks and
    /// [`devices`](Self::devices) still observe new devices.
    pub async fn start(&mut self) -> Result<mpsc::Receiver<DeviceEvent>> {
        if self.task.is_some() {
            return Err(DiscoveryError::AlreadyRunning);
        }

        let socket = ssdp::bind_socket(&self.config)?;
        let socket = UdpSocket::from_std(socket).map_err(|e| {
            DiscoveryError::NetworkError(format!("Failed to register socket with runtime: {}", e))
        })?;
        let local_addr = socket.local_addr().map_err(|e| {
            DiscoveryError::NetworkError(format!("Failed to read local address: {}", e))
        })?;

        let request = ssdp::search_request(&self.config);
        socket
            .send_to(request.as_bytes(), SocketAddr::V4(self.config.multicast_addr))
            .await
            .map_err(|e| DiscoveryError::NetworkError(format!("Failed to send M-SEARCH: {}", e)))?;

        debug!(
            %local_addr,
            target = %self.config.multicast_addr,
            st = %self.config.search_target,
            "Sent M-SEARCH"
        );

        let (events_tx, events_rx) = mpsc::channel(self.config.event_buffer_size);
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>(1);

        let task = tokio::spawn(receive_loop(
            socket,
            Arc::clone(&self.listener),
            self.config.max_datagram_size,
            events_tx,
            shutdown_rx,
        ));

        self.local_addr = Some(local_addr);
        self.shutdown_tx = Some(shutdown_tx);
        self.task = Some(task);

        Ok(events_rx)
    }

    /// Signal the receive loop to stop and wait for it to finish
    pub async fn stop(&mut self) {
        if let Some(shutdown_tx) = self.shutdown_tx.take() {
            let _ = shutdown_tx.send(()).await;
        }

        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!(error = %e, "Discovery loop ended abnormally");
            }
        }
    }

    /// Process one datagram as if the loop had received it from `origin`.
    ///
    /// Returns the new root device, or `None` for malformed, non-sighting or
    /// duplicate datagrams. Callbacks fire exactly as they do on the loop.
    pub fn handle_datagram(&self, datagram: &[u8], origin: SocketAddr) -> Option<Arc<RootDevice>> {
        self.listener.handle_datagram(datagram, origin)
    }

    /// Every root device observed so far, in discovery order
    pub fn devices(&self) -> Vec<Arc<RootDevice>> {
        self.listener.registry.snapshot()
    }

    /// Address the listening socket is bound to, once started
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().map_or(false, |task| !task.is_finished())
    }

    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }
}

impl Drop for DiscoveryEngine {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn receive_loop(
    socket: UdpSocket,
    listener: Arc<Listener>,
    max_datagram_size: usize,
    events_tx: mpsc::Sender<DeviceEvent>,
    mut shutdown_rx: mpsc::Receiver<()>,
) {
    let mut buffer = vec![0u8; max_datagram_size];

    loop {
        let received = tokio::select! {
            _ = shutdown_rx.recv() => break,
            received = socket.recv_from(&mut buffer) => received,
        };

        let (len, origin) = match received {
            Ok(received) => received,
            Err(e) => {
                warn!(error = %e, "SSDP receive failed");
                if shutdown_during_backoff(&mut shutdown_rx).await {
                    break;
                }
                continue;
            }
        };

        let device = match listener.handle_datagram(&buffer[..len], origin) {
            Some(device) => device,
            None => continue,
        };

        if events_tx.is_closed() {
            continue;
        }

        // Backpressure from a slow consumer must not block shutdown
        tokio::select! {
            _ = shutdown_rx.recv() => break,
            _ = events_tx.send(DeviceEvent::Found(device)) => {}
        }
    }

    debug!("Discovery loop stopped");
}

/// Wait out [`RECEIVE_ERROR_BACKOFF`]; true if shutdown arrived first.
async fn shutdown_during_backoff(shutdown_rx: &mut mpsc::Receiver<()>) -> bool {
    tokio::select! {
        _ = shutdown_rx.recv() => true,
        _ = tokio::time::sleep(RECEIVE_ERROR_BACKOFF) => false,
    }
}
