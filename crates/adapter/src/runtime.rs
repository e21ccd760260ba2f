//! Adapter runtime integration.
//!
//! Bridges the sync session loop with the async TCP server. The server runs
//! on its own tokio runtime; the host talks to it over channels and never
//! touches async code.

use std::net::SocketAddr;

use anyhow::{anyhow, Context, Result};
use tokio::runtime::Runtime;
use tokio::sync::{mpsc, oneshot};

use crate::protocol::{AckMessage, ErrorMessage, ObservationMessage};
use crate::server::{run_server, ServerConfig, ServerState};

/// Command delivered to the session loop.
#[derive(Debug, Clone)]
pub struct InboundCommand {
    pub client_id: usize,
    pub seq: u64,
    pub payload: InboundPayload,
}

/// What the session loop should do with an inbound message.
#[derive(Debug, Clone)]
pub enum InboundPayload {
    /// A controller command to apply
    Command(ClientCommand),
    /// A freshly handshaken client wants an immediate observation
    SnapshotRequest,
}

/// Command payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCommand {
    Place { slot: usize, row: u8, col: u8 },
    Restart,
}

/// Outbound message to be delivered by the server.
#[derive(Debug, Clone)]
pub enum OutboundMessage {
    ToClientAck { client_id: usize, ack: AckMessage },
    ToClientError { client_id: usize, err: ErrorMessage },
    ToClientObservation {
        client_id: usize,
        obs: ObservationMessage,
    },
    BroadcastObservation { obs: ObservationMessage },
}

/// Running adapter instance.
pub struct Adapter {
    _rt: Runtime,
    cmd_rx: mpsc::Receiver<InboundCommand>,
    out_tx: mpsc::UnboundedSender<OutboundMessage>,
}

impl Adapter {
    /// Start the adapter from environment variables.
    ///
    /// Returns None if `BREEZE_DISABLED` is set or the server fails to come
    /// up; failures are logged rather than propagated so the host can keep
    /// running without remote control.
    pub fn start_from_env() -> Option<Self> {
        if ServerState::is_disabled() {
            println!("[Adapter] remote control disabled via BREEZE_DISABLED");
            return None;
        }

        match Self::start(ServerConfig::from_env()) {
            Ok((adapter, addr)) => {
                println!("[Adapter] remote control ready on {}", addr);
                Some(adapter)
            }
            Err(e) => {
                eprintln!("[Adapter] failed to start: {}", e);
                None
            }
        }
    }

    /// Start the adapter with an explicit config.
    ///
    /// Blocks until the listener is bound and returns the bound address, so
    /// callers (and tests) can use port 0 for an ephemeral port.
    pub fn start(config: ServerConfig) -> Result<(Self, SocketAddr)> {
        let max_pending = config.max_pending_commands.max(1);
        let (cmd_tx, cmd_rx) = mpsc::channel::<InboundCommand>(max_pending);
        let (out_tx, out_rx) = mpsc::unbounded_channel::<OutboundMessage>();
        let (ready_tx, ready_rx) = oneshot::channel();

        let rt = Runtime::new().context("creating tokio runtime")?;
        rt.spawn(async move {
            if let Err(e) = run_server(config, cmd_tx, out_rx, Some(ready_tx)).await {
                eprintln!("[Adapter] server stopped: {}", e);
            }
        });

        let addr = ready_rx
            .blocking_recv()
            .map_err(|_| anyhow!("server exited before binding"))?;

        Ok((
            Self {
                _rt: rt,
                cmd_rx,
                out_tx,
            },
            addr,
        ))
    }

    /// Non-blocking poll for the next inbound command.
    pub fn try_recv(&mut self) -> Option<InboundCommand> {
        self.cmd_rx.try_recv().ok()
    }

    /// Block until the next inbound command, or None when the server side
    /// has shut down.
    pub fn recv_blocking(&mut self) -> Option<InboundCommand> {
        self.cmd_rx.blocking_recv()
    }

    pub fn send(&self, msg: OutboundMessage) {
        let _ = self.out_tx.send(msg);
    }
}
