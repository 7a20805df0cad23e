//! UDP telemetry listener
//!
//! Owns the receiving socket and does nothing but move datagrams onto the
//! engine's channel. Each datagram is copied out whole so the engine sees
//! exactly the bytes that arrived, including any trailing slack a newer
//! game version might append.

use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Largest datagram the game is known to send is 1460 bytes; leave headroom
/// for future packet types.
const RECV_BUFFER_SIZE: usize = 2048;

/// Receive datagrams until cancelled or the engine side hangs up.
pub async fn run(
    socket: Arc<UdpSocket>,
    tx: mpsc::Sender<Vec<u8>>,
    cancel: CancellationToken,
) {
    let local = socket
        .local_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "<unknown>".to_string());
    info!("Listening for telemetry on {local}");

    let mut buf = vec![0u8; RECV_BUFFER_SIZE];
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            received = socket.recv_from(&mut buf) => match received {
                Ok((len, _peer)) => {
                    if tx.send(buf[..len].to_vec()).await.is_err() {
                        // Engine gone, nothing left to feed
                        break;
                    }
                }
                Err(e) => {
                    warn!("UDP receive error: {e}");
                }
            },
        }
    }
    info!("Telemetry listener stopped");
}
