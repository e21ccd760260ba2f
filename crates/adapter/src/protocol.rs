//! Protocol module - JSON message types for remote control
//!
//! Implements the line-delimited JSON protocol spoken by external drivers.
//! All messages have: type, seq (sequence number), ts (timestamp in ms)

use serde::{Deserialize, Serialize};

use block_breeze_core::shapes::{ShapeId, CATALOG_SIZE};
use block_breeze_types::{PlacementReport, BOARD_SIZE, DEAL_SIZE};

/// Protocol version spoken by this build. Clients must send a matching
/// major version in their hello.
pub const PROTOCOL_VERSION: &str = "1.0.0";

// ============== Client -> Game Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HelloType {
    #[serde(rename = "hello")]
    Hello,
}

impl Default for HelloType {
    fn default() -> Self {
        Self::Hello
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandType {
    #[serde(rename = "command")]
    Command,
}

impl Default for CommandType {
    fn default() -> Self {
        Self::Command
    }
}

/// Client hello message (first message to establish connection)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelloMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: HelloType,
    pub seq: u64,
    pub ts: u64,
    pub client: ClientInfo,
    pub protocol_version: String,
    pub formats: FormatsList,
    pub requested: RequestedCapabilities,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatsList {
    pub json: bool,
}

impl<'de> Deserialize<'de> for FormatsList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct V;
        impl<'de> serde::de::Visitor<'de> for V {
            type Value = FormatsList;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                write!(f, "an array of format strings")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: serde::de::SeqAccess<'de>,
            {
                let mut json = false;
                while let Some(v) = seq.next_element::<&str>()? {
                    if v.eq_ignore_ascii_case("json") {
                        json = true;
                    }
                }
                Ok(FormatsList { json })
            }
        }

        deserializer.deserialize_seq(V)
    }
}

impl Serialize for FormatsList {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;
        let mut seq = serializer.serialize_seq(Some(if self.json { 1 } else { 0 }))?;
        if self.json {
            seq.serialize_element("json")?;
        }
        seq.end()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestedCapabilities {
    #[serde(rename = "stream_observations")]
    pub stream_observations: bool,
    #[serde(rename = "command_mode")]
    pub command_mode: CommandMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssignedRole {
    #[serde(rename = "controller")]
    Controller,
    #[serde(rename = "observer")]
    Observer,
}

/// Command message (controller only)
#[derive(Debug, Clone, Deserialize)]
pub struct CommandMessage {
    #[serde(rename = "type")]
    #[serde(default)]
    pub msg_type: CommandType,
    pub seq: u64,
    pub ts: u64,
    pub mode: CommandMode,
    #[serde(default)]
    pub place: Option<PlaceCommand>, // For place mode
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandMode {
    Place,
    Restart,
}

impl<'de> Deserialize<'de> for CommandMode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = <&str>::deserialize(deserializer)?;
        if s.eq_ignore_ascii_case("place") {
            Ok(Self::Place)
        } else if s.eq_ignore_ascii_case("restart") {
            Ok(Self::Restart)
        } else {
            Err(serde::de::Error::custom("invalid command mode"))
        }
    }
}

impl Serialize for CommandMode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            CommandMode::Place => serializer.serialize_str("place"),
            CommandMode::Restart => serializer.serialize_str("restart"),
        }
    }
}

/// Placement intent: batch slot plus top-left anchor on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PlaceCommand {
    pub slot: u8,
    pub row: u8,
    pub col: u8,
}

// ============== Game -> Client Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WelcomeType {
    #[serde(rename = "welcome")]
    Welcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AckType {
    #[serde(rename = "ack")]
    Ack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AckStatus {
    #[serde(rename = "ok")]
    Ok,
    #[serde(rename = "rejected")]
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorType {
    #[serde(rename = "error")]
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    #[serde(rename = "bad_json")]
    BadJson,
    #[serde(rename = "handshake_required")]
    HandshakeRequired,
    #[serde(rename = "protocol_mismatch")]
    ProtocolMismatch,
    #[serde(rename = "not_controller")]
    NotController,
    #[serde(rename = "invalid_command")]
    InvalidCommand,
    #[serde(rename = "backpressure")]
    Backpressure,
}

/// Welcome message (response to hello)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WelcomeMessage {
    #[serde(rename = "type")]
    pub msg_type: WelcomeType,
    pub seq: u64,
    pub ts: u64,
    pub protocol_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<AssignedRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub controller_id: Option<u64>,
    pub game_id: String,
    pub capabilities: ServerCapabilities,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerCapabilities {
    pub formats: [CapabilityFormat; 1],
    #[serde(rename = "command_modes")]
    pub command_modes: [CapabilityCommandMode; 2],
    #[serde(rename = "board_size")]
    pub board_size: u8,
    #[serde(rename = "deal_size")]
    pub deal_size: u8,
    #[serde(rename = "catalog_size")]
    pub catalog_size: u8,
    pub features: Vec<CapabilityFeature>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CapabilityFormat {
    #[serde(rename = "json")]
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CapabilityCommandMode {
    #[serde(rename = "place")]
    Place,
    #[serde(rename = "restart")]
    Restart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CapabilityFeature {
    #[serde(rename = "batch")]
    Batch,
    #[serde(rename = "score")]
    Score,
    #[serde(rename = "best")]
    Best,
    #[serde(rename = "streak")]
    Streak,
    #[serde(rename = "last_event")]
    LastEvent,
    #[serde(rename = "state_hash")]
    StateHash,
}

/// Acknowledgment for command receipt.
///
/// Carries the outcome of applying the command: `ok`, or `rejected` with a
/// stable code and a human-readable reason. Rejections are per-command and
/// do not disturb the connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckMessage {
    #[serde(rename = "type")]
    pub msg_type: AckType,
    pub seq: u64,
    pub ts: u64,
    #[serde(rename = "command_seq")]
    pub command_seq: u64,
    pub status: AckStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Error message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorMessage {
    #[serde(rename = "type")]
    pub msg_type: ErrorType,
    pub seq: u64,
    pub ts: u64,
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObservationType {
    #[serde(rename = "observation")]
    Observation,
}

/// Game state observation (sent to all streaming clients)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationMessage {
    #[serde(rename = "type")]
    pub msg_type: ObservationType,
    pub seq: u64,
    pub ts: u64,
    pub playable: bool,
    #[serde(rename = "game_over")]
    pub game_over: bool,
    #[serde(rename = "episode_id")]
    pub episode_id: u32,
    pub seed: u32,
    pub placements: u32,
    pub lines: u32,
    pub board: BoardSnapshot,
    pub batch: [Option<BatchEntry>; DEAL_SIZE],
    pub score: u32,
    pub best: u32,
    /// Streak multiplier in tenths (10 = 1.0x, 12 = 1.2x)
    #[serde(rename = "streak_tenths")]
    pub streak_tenths: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(rename = "last_event")]
    pub last_event: Option<LastEventWire>,
    #[serde(rename = "state_hash")]
    pub state_hash: StateHash,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub width: u8,
    pub height: u8,
    pub cells: [[u32; 8]; 8], // 0 = empty, otherwise the cell's RGB token
}

/// One batch slot: catalog shape geometry plus color token and placed flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchEntry {
    pub shape: u8,
    pub rows: u8,
    pub cols: u8,
    pub cells: Vec<[u8; 2]>,
    pub token: u32,
    pub placed: bool,
}

impl BatchEntry {
    /// Expand a catalog index and token into wire geometry
    pub fn from_parts(shape: u8, token: u32, placed: bool) -> Option<Self> {
        let id = ShapeId::new(shape as usize)?;
        let geometry = id.shape();
        Some(BatchEntry {
            shape,
            rows: geometry.rows(),
            cols: geometry.cols(),
            cells: geometry.cells().iter().map(|&(r, c)| [r, c]).collect(),
            token,
            placed,
        })
    }
}

/// Outcome of the most recent committed placement
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LastEventWire {
    #[serde(rename = "cleared_cells")]
    pub cleared_cells: u32,
    #[serde(rename = "lines_cleared")]
    pub lines_cleared: u32,
    #[serde(rename = "score_delta")]
    pub score_delta: u32,
    #[serde(rename = "new_score")]
    pub new_score: u32,
    #[serde(rename = "new_best")]
    pub new_best: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub praise: Option<String>,
    #[serde(rename = "batch_refreshed")]
    pub batch_refreshed: bool,
    #[serde(rename = "board_exhausted")]
    pub board_exhausted: bool,
}

impl From<PlacementReport> for LastEventWire {
    fn from(value: PlacementReport) -> Self {
        Self {
            cleared_cells: value.cleared_cells,
            lines_cleared: value.lines_cleared,
            score_delta: value.score_delta,
            new_score: value.new_score,
            new_best: value.new_best,
            praise: value.praise.map(|s| s.to_string()),
            batch_refreshed: value.batch_refreshed,
            board_exhausted: value.board_exhausted,
        }
    }
}

/// Deterministic state hash serialized as lowercase hex (without heap allocation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateHash(pub u64);

impl Serialize for StateHash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        const HEX: &[u8; 16] = b"0123456789abcdef";
        let mut buf = [0u8; 16];
        let mut v = self.0;
        for i in 0..16 {
            let nib = (v & 0x0f) as usize;
            buf[15 - i] = HEX[nib];
            v >>= 4;
        }
        let s = std::str::from_utf8(&buf).expect("hex is valid utf8");
        serializer.serialize_str(s)
    }
}

impl<'de> Deserialize<'de> for StateHash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = <&str>::deserialize(deserializer)?;
        let s = s.trim();
        let mut v: u64 = 0;
        for b in s.as_bytes() {
            let d = match b {
                b'0'..=b'9' => (b - b'0') as u64,
                b'a'..=b'f' => (b - b'a' + 10) as u64,
                b'A'..=b'F' => (b - b'A' + 10) as u64,
                _ => return Err(serde::de::Error::custom("invalid hex")),
            };
            v = (v << 4) | d;
        }
        Ok(StateHash(v))
    }
}

// ============== Message Parsing ==============

/// Parse a JSON message from a string
pub fn parse_message(json: &str) -> Result<ParsedMessage, serde_json::Error> {
    #[derive(Debug, Deserialize)]
    #[serde(tag = "type")]
    enum InboundMessage {
        #[serde(rename = "hello")]
        Hello(HelloMessage),
        #[serde(rename = "command")]
        Command(CommandMessage),
    }

    match serde_json::from_str::<InboundMessage>(json) {
        Ok(InboundMessage::Hello(m)) => Ok(ParsedMessage::Hello(m)),
        Ok(InboundMessage::Command(m)) => Ok(ParsedMessage::Command(m)),
        Err(e) => {
            // Unknown message type is not a hard parse error for the protocol.
            #[derive(Debug, Deserialize)]
            struct TypeOnly<'a> {
                #[serde(rename = "type")]
                msg_type: Option<&'a str>,
            }
            let msg_type = serde_json::from_str::<TypeOnly>(json)?
                .msg_type
                .unwrap_or("unknown");
            if msg_type != "hello" && msg_type != "command" {
                #[derive(Debug, Deserialize)]
                struct SeqOnly {
                    seq: Option<u64>,
                }
                let seq = serde_json::from_str::<SeqOnly>(json)?.seq.unwrap_or(0);
                return Ok(ParsedMessage::Unknown(UnknownMessage { seq }));
            }
            Err(e)
        }
    }
}

/// Parsed incoming message
#[derive(Debug, Clone)]
pub enum ParsedMessage {
    Hello(HelloMessage),
    Command(CommandMessage),
    Unknown(UnknownMessage),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownMessage {
    pub seq: u64,
}

// ============== Utility Functions ==============

/// Create a hello message
pub fn create_hello(seq: u64, client_name: &str, protocol_version: &str) -> HelloMessage {
    HelloMessage {
        msg_type: HelloType::Hello,
        seq,
        ts: current_timestamp_ms(),
        client: ClientInfo {
            name: client_name.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        protocol_version: protocol_version.to_string(),
        formats: FormatsList { json: true },
        requested: RequestedCapabilities {
            stream_observations: true,
            command_mode: CommandMode::Place,
        },
    }
}

/// Create a welcome message
pub fn create_welcome(
    seq: u64,
    protocol_version: &str,
    client_id: u64,
    role: AssignedRole,
    controller_id: Option<u64>,
) -> WelcomeMessage {
    WelcomeMessage {
        msg_type: WelcomeType::Welcome,
        seq,
        ts: current_timestamp_ms(),
        protocol_version: protocol_version.to_string(),
        client_id: Some(client_id),
        role: Some(role),
        controller_id,
        game_id: "block-breeze".to_string(),
        capabilities: ServerCapabilities {
            formats: [CapabilityFormat::Json],
            command_modes: [CapabilityCommandMode::Place, CapabilityCommandMode::Restart],
            board_size: BOARD_SIZE,
            deal_size: DEAL_SIZE as u8,
            catalog_size: CATALOG_SIZE as u8,
            features: vec![
                CapabilityFeature::Batch,
                CapabilityFeature::Score,
                CapabilityFeature::Best,
                CapabilityFeature::Streak,
                CapabilityFeature::LastEvent,
                CapabilityFeature::StateHash,
            ],
        },
    }
}

/// Create an ok acknowledgment
pub fn create_ack(seq: u64, command_seq: u64) -> AckMessage {
    AckMessage {
        msg_type: AckType::Ack,
        seq,
        ts: current_timestamp_ms(),
        command_seq,
        status: AckStatus::Ok,
        code: None,
        message: None,
    }
}

/// Create a rejected acknowledgment with a stable code
pub fn create_rejected_ack(seq: u64, command_seq: u64, code: &str, message: &str) -> AckMessage {
    AckMessage {
        msg_type: AckType::Ack,
        seq,
        ts: current_timestamp_ms(),
        command_seq,
        status: AckStatus::Rejected,
        code: Some(code.to_string()),
        message: Some(message.to_string()),
    }
}

/// Create an error message
pub fn create_error(seq: u64, code: ErrorCode, message: &str) -> ErrorMessage {
    ErrorMessage {
        msg_type: ErrorType::Error,
        seq,
        ts: current_timestamp_ms(),
        code,
        message: message.to_string(),
    }
}

/// Get current timestamp in milliseconds
pub(crate) fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hello() {
        let json = r#"{"type":"hello","seq":1,"ts":1234567890,"client":{"name":"test-ai","version":"1.0.0"},"protocol_version":"1.0.0","formats":["json"],"requested":{"stream_observations":true,"command_mode":"place"}}"#;

        let result = parse_message(json).unwrap();
        match result {
            ParsedMessage::Hello(msg) => {
                assert_eq!(msg.msg_type, HelloType::Hello);
                assert_eq!(msg.seq, 1);
                assert_eq!(msg.client.name, "test-ai");
                assert_eq!(msg.protocol_version, "1.0.0");
                assert!(msg.formats.json);
                assert_eq!(msg.requested.command_mode, CommandMode::Place);
            }
            _ => panic!("Expected Hello message"),
        }
    }

    #[test]
    fn test_parse_place_command() {
        let json = r#"{"type":"command","seq":2,"ts":1234567900,"mode":"place","place":{"slot":1,"row":3,"col":4}}"#;

        let result = parse_message(json).unwrap();
        match result {
            ParsedMessage::Command(msg) => {
                assert_eq!(msg.mode, CommandMode::Place);
                let place = msg.place.unwrap();
                assert_eq!(place.slot, 1);
                assert_eq!(place.row, 3);
                assert_eq!(place.col, 4);
            }
            _ => panic!("Expected Command message"),
        }
    }

    #[test]
    fn test_parse_restart_command() {
        let json = r#"{"type":"command","seq":3,"ts":1234567910,"mode":"restart"}"#;

        let result = parse_message(json).unwrap();
        match result {
            ParsedMessage::Command(msg) => {
                assert_eq!(msg.mode, CommandMode::Restart);
                assert!(msg.place.is_none());
            }
            _ => panic!("Expected Command message"),
        }
    }

    #[test]
    fn test_unknown_message_type_is_tolerated() {
        let json = r#"{"type":"ping","seq":9,"ts":1}"#;

        let result = parse_message(json).unwrap();
        match result {
            ParsedMessage::Unknown(msg) => assert_eq!(msg.seq, 9),
            _ => panic!("Expected Unknown message"),
        }
    }

    #[test]
    fn test_create_welcome() {
        let welcome = create_welcome(1, PROTOCOL_VERSION, 7, AssignedRole::Controller, Some(7));
        assert_eq!(welcome.msg_type, WelcomeType::Welcome);
        assert_eq!(welcome.seq, 1);
        assert_eq!(welcome.protocol_version, PROTOCOL_VERSION);
        assert_eq!(welcome.client_id, Some(7));
        assert_eq!(welcome.role, Some(AssignedRole::Controller));
        assert_eq!(welcome.controller_id, Some(7));
        assert_eq!(welcome.game_id, "block-breeze");
        assert_eq!(welcome.capabilities.board_size, 8);
        assert_eq!(welcome.capabilities.deal_size, 3);
        assert_eq!(welcome.capabilities.catalog_size, 17);
    }

    #[test]
    fn test_create_rejected_ack() {
        let ack = create_rejected_ack(4, 4, "invalid_place", "shape does not fit");
        assert_eq!(ack.status, AckStatus::Rejected);
        assert_eq!(ack.code.as_deref(), Some("invalid_place"));

        let json = serde_json::to_string(&ack).unwrap();
        let parsed: AckMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.status, AckStatus::Rejected);
        assert_eq!(parsed.code.as_deref(), Some("invalid_place"));
        assert_eq!(parsed.command_seq, 4);
    }

    #[test]
    fn test_serde_roundtrip_ack() {
        let ack = create_ack(10, 5);
        let json = serde_json::to_string(&ack).unwrap();
        let parsed: AckMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.seq, ack.seq);
        assert_eq!(parsed.command_seq, 5);
        assert_eq!(parsed.status, AckStatus::Ok);
        assert!(parsed.code.is_none());
    }

    #[test]
    fn test_batch_entry_carries_shape_geometry() {
        // Catalog entry 5 is the 2x2 square
        let entry = BatchEntry::from_parts(5, 0xf44336, false).unwrap();
        assert_eq!(entry.rows, 2);
        assert_eq!(entry.cols, 2);
        assert_eq!(entry.cells.len(), 4);
        assert!(entry.cells.contains(&[1, 1]));

        assert!(BatchEntry::from_parts(200, 0xf44336, false).is_none());
    }

    #[test]
    fn test_state_hash_hex_roundtrip() {
        let hash = StateHash(0xdead_beef_0123_4567);
        let json = serde_json::to_string(&hash).unwrap();
        assert_eq!(json, "\"deadbeef01234567\"");
        let parsed: StateHash = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, hash);
    }

    #[test]
    fn test_last_event_from_report_keeps_praise() {
        let report = PlacementReport {
            cleared_cells: 8,
            lines_cleared: 1,
            score_delta: 80,
            new_score: 80,
            new_best: 120,
            praise: Some("Nice"),
            batch_refreshed: false,
            board_exhausted: false,
        };

        let wire = LastEventWire::from(report);
        assert_eq!(wire.cleared_cells, 8);
        assert_eq!(wire.score_delta, 80);
        assert_eq!(wire.praise.as_deref(), Some("Nice"));
        assert!(!wire.board_exhausted);
    }
}
