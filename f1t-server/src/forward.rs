//! Raw datagram forwarding
//!
//! Relays every accepted datagram, unmodified, to a second UDP destination
//! so another tool (dashboards, overlays) can consume the same stream.
//! Strictly best-effort: a send failure is logged and decoding continues.

use crate::config::ForwardingConfig;
use anyhow::{anyhow, Result};
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};
use tracing::{info, warn};

pub struct Forwarder {
    socket: UdpSocket,
    dest: SocketAddr,
}

impl Forwarder {
    pub fn new(host: &str, port: u16) -> Result<Self> {
        let dest = (host, port)
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| anyhow!("Forwarding destination {host}:{port} did not resolve"))?;
        let socket = UdpSocket::bind("0.0.0.0:0")?;
        socket.set_nonblocking(true)?;
        Ok(Self { socket, dest })
    }

    /// Build a forwarder from configuration; None when disabled or when
    /// the destination cannot be set up (logged, not fatal).
    pub fn from_config(config: &ForwardingConfig) -> Option<Self> {
        if !config.enabled {
            return None;
        }
        match Self::new(&config.host, config.port) {
            Ok(forwarder) => {
                info!(
                    "UDP forwarding enabled to {}:{}",
                    config.host, config.port
                );
                Some(forwarder)
            }
            Err(e) => {
                warn!("Failed to set up UDP forwarding: {e}");
                None
            }
        }
    }

    /// Fire-and-forget relay of the full original datagram.
    pub fn send(&self, data: &[u8]) {
        if let Err(e) = self.socket.send_to(data, self.dest) {
            warn!("Failed to forward UDP packet: {e}");
        }
    }

    pub fn destination(&self) -> SocketAddr {
        self.dest
    }
}
