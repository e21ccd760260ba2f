//! Adapter crate - remote control via TCP socket with JSON protocol
//!
//! This crate lets external agents drive a game session through a TCP
//! socket connection. Everything an on-device UI would render is exposed as
//! observations, and everything a player could do arrives as commands.
//!
//! # Protocol Overview
//!
//! The adapter implements a **line-delimited JSON protocol** over TCP:
//!
//! 1. **Connection**: Client connects to TCP socket (default: 127.0.0.1:7878)
//! 2. **Handshake**: Client sends `hello`, server responds with `welcome`
//! 3. **Controller Assignment**: First client to hello becomes the controller
//! 4. **Observation Streaming**: Server sends a fresh observation whenever the
//!    game state changes
//! 5. **Commanding**: Controller sends commands to place pieces or restart
//!
//! # Message Types
//!
//! ## Client → Server
//!
//! - **hello**: Initial handshake with client info and requested capabilities
//! - **command**: Place a batch piece at a board position, or restart the game
//!
//! ## Server → Client
//!
//! - **welcome**: Response to hello with server capabilities and assigned role
//! - **observation**: Full game state snapshot (board, batch, score, streak)
//! - **ack**: Command acknowledgment, `ok` or `rejected` with a reason
//! - **error**: Protocol-level error with code and message
//!
//! # Command Modes
//!
//! The adapter supports two command modes:
//!
//! - **place**: Place the piece in batch slot `slot` with its top-left at
//!   `(row, col)`
//! - **restart**: Start a fresh episode on a cleared board
//!
//! # Environment Variables
//!
//! Configure the adapter using environment variables:
//!
//! - `BREEZE_HOST`: Bind address (default: "127.0.0.1")
//! - `BREEZE_PORT`: Port number (default: 7878)
//! - `BREEZE_DISABLED`: Set to "1" or "true" to disable the adapter entirely
//! - `BREEZE_MAX_PENDING`: Bound on queued commands before backpressure errors
//! - `BREEZE_BEST_PATH`: Path of the persisted best-score file
//!
//! # Example Protocol Flow
//!
//! ```text
//! Client -> Server: {"type":"hello","seq":1,"ts":1234567890,"client":{"name":"my-agent","version":"1.0.0"},"protocol_version":"1.0.0","formats":["json"],"requested":{"stream_observations":true,"command_mode":"place"}}
//! Server -> Client: {"type":"welcome","seq":1,"ts":1234567890,"protocol_version":"1.0.0","game_id":"block-breeze","role":"controller",...}
//! Server -> Client: {"type":"observation","seq":2,"ts":1234567891,"board":{...},"batch":[...],"score":0,...}
//! Client -> Server: {"type":"command","seq":2,"ts":1234567892,"mode":"place","place":{"slot":0,"row":3,"col":4}}
//! Server -> Client: {"type":"ack","seq":3,"ts":1234567892,"command_seq":2,"status":"ok"}
//! ```
//!
//! # Implementation
//!
//! - Uses **tokio** for async networking
//! - Multiple clients can connect (only one controller at a time)
//! - When the controller disconnects the longest-connected client is promoted
//! - See [`protocol`] for message structure definitions
//! - See [`server`] for TCP server implementation
//! - See [`store`] for best-score persistence
//!
//! # Testing
//!
//! Connect to the adapter using netcat for manual testing:
//!
//! ```bash
//! nc 127.0.0.1 7878
//! {"type":"hello","seq":1,"ts":1234567890,"client":{"name":"test","version":"1.0.0"},"protocol_version":"1.0.0","formats":["json"],"requested":{"stream_observations":true,"command_mode":"place"}}
//! ```

pub mod protocol;
pub mod runtime;
pub mod server;
pub mod store;

pub use block_breeze_core as core;
pub use block_breeze_types as types;

// Re-export protocol types for convenience
pub use protocol::*;
pub use runtime::{Adapter, ClientCommand, InboundCommand, InboundPayload, OutboundMessage};
pub use server::*;
pub use store::BestScoreStore;
