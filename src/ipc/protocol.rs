//! Message kinds and wire framing for the compositor IPC protocol.
//!
//! This module defines the closed command/event kind enumerations and the
//! binary framing used on the compositor's Unix socket.
//!
//! ## Frame Format
//!
//! ```text
//! offset 0  : 6-byte ASCII magic marker ("i3-ipc")
//! offset 6  : 4-byte payload length
//! offset 10 : 4-byte payload type code
//! offset 14 : payload bytes (UTF-8 JSON)
//! ```
//!
//! Length and type code are host-native byte order. Both ends of the socket
//! run on the same host, so this is a fixed convention of the protocol, not
//! something that may be assumed portable across machines.
//!
//! The type code is overloaded: values in the command numbering space denote
//! a response to a command, while values with the high bit set denote an
//! event notification. Exactly one namespace owns any given code, and frames
//! are classified before they are interpreted.

use std::fmt;

use bytes::{Buf, BytesMut};
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::{Result, SwaylinkError};

/// Magic marker opening every frame.
pub const MAGIC: &[u8; 6] = b"i3-ipc";

/// Fixed frame header size: magic + payload length + payload type.
pub const HEADER_LEN: usize = 14;

/// Bit set on the payload type code of every event frame.
pub const EVENT_BIT: u32 = 1 << 31;

/// Maximum accepted payload size (16 MB) to guard against bogus length
/// fields desynchronizing the reader into huge allocations.
pub const MAX_PAYLOAD_SIZE: u32 = 16 * 1024 * 1024;

/// Commands that can be dispatched to the compositor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    RunCommand,
    GetWorkspaces,
    Subscribe,
    GetOutputs,
    GetTree,
    GetMarks,
    GetBarConfig,
    GetVersion,
    GetBindingModes,
    GetConfig,
    SendTick,
    Sync,
    GetBindingState,
    GetInputs,
    GetSeats,
}

impl CommandKind {
    /// Wire code for this command.
    pub fn code(self) -> u32 {
        match self {
            CommandKind::RunCommand => 0,
            CommandKind::GetWorkspaces => 1,
            CommandKind::Subscribe => 2,
            CommandKind::GetOutputs => 3,
            CommandKind::GetTree => 4,
            CommandKind::GetMarks => 5,
            CommandKind::GetBarConfig => 6,
            CommandKind::GetVersion => 7,
            CommandKind::GetBindingModes => 8,
            CommandKind::GetConfig => 9,
            CommandKind::SendTick => 10,
            CommandKind::Sync => 11,
            CommandKind::GetBindingState => 12,
            CommandKind::GetInputs => 100,
            CommandKind::GetSeats => 101,
        }
    }

    /// Look up a command by its wire code.
    pub fn from_code(code: u32) -> Option<Self> {
        Some(match code {
            0 => CommandKind::RunCommand,
            1 => CommandKind::GetWorkspaces,
            2 => CommandKind::Subscribe,
            3 => CommandKind::GetOutputs,
            4 => CommandKind::GetTree,
            5 => CommandKind::GetMarks,
            6 => CommandKind::GetBarConfig,
            7 => CommandKind::GetVersion,
            8 => CommandKind::GetBindingModes,
            9 => CommandKind::GetConfig,
            10 => CommandKind::SendTick,
            11 => CommandKind::Sync,
            12 => CommandKind::GetBindingState,
            100 => CommandKind::GetInputs,
            101 => CommandKind::GetSeats,
            _ => return None,
        })
    }

    /// All command kinds, in wire-code order.
    pub const ALL: [CommandKind; 15] = [
        CommandKind::RunCommand,
        CommandKind::GetWorkspaces,
        CommandKind::Subscribe,
        CommandKind::GetOutputs,
        CommandKind::GetTree,
        CommandKind::GetMarks,
        CommandKind::GetBarConfig,
        CommandKind::GetVersion,
        CommandKind::GetBindingModes,
        CommandKind::GetConfig,
        CommandKind::SendTick,
        CommandKind::Sync,
        CommandKind::GetBindingState,
        CommandKind::GetInputs,
        CommandKind::GetSeats,
    ];
}

/// Events that can be subscribed to.
///
/// Each event has a wire code (the event number with [`EVENT_BIT`] set) and a
/// canonical lowercase name used when constructing the SUBSCRIBE payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Workspace,
    Mode,
    Window,
    BarconfigUpdate,
    Binding,
    Shutdown,
    Tick,
    BarStateUpdate,
    Input,
}

impl EventKind {
    /// Wire code for this event (high bit set).
    pub fn code(self) -> u32 {
        EVENT_BIT
            | match self {
                EventKind::Workspace => 0x0,
                EventKind::Mode => 0x2,
                EventKind::Window => 0x3,
                EventKind::BarconfigUpdate => 0x4,
                EventKind::Binding => 0x5,
                EventKind::Shutdown => 0x6,
                EventKind::Tick => 0x7,
                EventKind::BarStateUpdate => 0x14,
                EventKind::Input => 0x15,
            }
    }

    /// Look up an event by its wire code.
    pub fn from_code(code: u32) -> Option<Self> {
        Some(match code {
            0x8000_0000 => EventKind::Workspace,
            0x8000_0002 => EventKind::Mode,
            0x8000_0003 => EventKind::Window,
            0x8000_0004 => EventKind::BarconfigUpdate,
            0x8000_0005 => EventKind::Binding,
            0x8000_0006 => EventKind::Shutdown,
            0x8000_0007 => EventKind::Tick,
            0x8000_0014 => EventKind::BarStateUpdate,
            0x8000_0015 => EventKind::Input,
            _ => return None,
        })
    }

    /// Canonical lowercase name, as used in the SUBSCRIBE payload.
    pub fn name(self) -> &'static str {
        match self {
            EventKind::Workspace => "workspace",
            EventKind::Mode => "mode",
            EventKind::Window => "window",
            EventKind::BarconfigUpdate => "barconfig_update",
            EventKind::Binding => "binding",
            EventKind::Shutdown => "shutdown",
            EventKind::Tick => "tick",
            EventKind::BarStateUpdate => "bar_state_update",
            EventKind::Input => "input",
        }
    }

    /// Look up an event by its canonical name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// All event kinds, in wire-code order.
    pub const ALL: [EventKind; 9] = [
        EventKind::Workspace,
        EventKind::Mode,
        EventKind::Window,
        EventKind::BarconfigUpdate,
        EventKind::Binding,
        EventKind::Shutdown,
        EventKind::Tick,
        EventKind::BarStateUpdate,
        EventKind::Input,
    ];
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A classified payload type code: either a command response or an event
/// notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Command(CommandKind),
    Event(EventKind),
}

impl MessageType {
    /// Classify a raw payload type code against the command and event code
    /// spaces. Returns `None` if neither namespace owns the code.
    pub fn classify(code: u32) -> Option<Self> {
        if code & EVENT_BIT != 0 {
            EventKind::from_code(code).map(MessageType::Event)
        } else {
            CommandKind::from_code(code).map(MessageType::Command)
        }
    }
}

/// A frame pulled off the wire but not yet interpreted.
///
/// Splitting frame I/O from interpretation lets the channel loops recover
/// from a frame with an unknown type code or a malformed payload: the frame
/// has already been consumed in full, so the stream is resynchronized for
/// the next read regardless of whether [`decode_payload`] succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame {
    pub code: u32,
    pub payload: Vec<u8>,
}

/// Encode one frame: magic, payload length, type code, payload bytes.
pub fn encode(kind_code: u32, payload: &str) -> Vec<u8> {
    let mut frame = Vec::with_capacity(HEADER_LEN + payload.len());
    frame.extend_from_slice(MAGIC);
    frame.extend_from_slice(&(payload.len() as u32).to_ne_bytes());
    frame.extend_from_slice(&kind_code.to_ne_bytes());
    frame.extend_from_slice(payload.as_bytes());
    frame
}

/// Encode and write one frame to an async writer.
pub async fn write_message<W: AsyncWrite + Unpin>(
    writer: &mut W,
    kind_code: u32,
    payload: &str,
) -> Result<()> {
    writer.write_all(&encode(kind_code, payload)).await?;
    writer.flush().await?;
    Ok(())
}

/// Parse and validate a frame header, returning the declared payload length
/// and type code.
///
/// # Errors
///
/// Returns `Protocol` if the magic marker does not match or the declared
/// length exceeds [`MAX_PAYLOAD_SIZE`]. Header-level failures mean the
/// stream is no longer frame-aligned and the connection cannot be reused.
fn decode_header(header: &[u8]) -> Result<(usize, u32)> {
    debug_assert_eq!(header.len(), HEADER_LEN);

    if &header[..6] != MAGIC {
        return Err(SwaylinkError::Protocol(
            "invalid magic marker in frame header".to_string(),
        ));
    }

    let len = u32::from_ne_bytes([header[6], header[7], header[8], header[9]]);
    let code = u32::from_ne_bytes([header[10], header[11], header[12], header[13]]);

    if len > MAX_PAYLOAD_SIZE {
        return Err(SwaylinkError::Protocol(format!(
            "declared payload too large: {} bytes (max {})",
            len, MAX_PAYLOAD_SIZE
        )));
    }

    Ok((len as usize, code))
}

/// Read exactly one frame from an async reader.
///
/// Reads the fixed-size header, then exactly the declared number of payload
/// bytes. The transport is a stream socket, so both reads loop internally on
/// partial data. A zero-length payload is read like any other.
///
/// # Errors
///
/// Returns `Connection` on I/O failure (including EOF mid-frame) and
/// `Protocol` on a corrupt header. Both are fatal to the connection.
pub async fn read_frame<R: AsyncRead + Unpin>(reader: &mut R) -> Result<RawFrame> {
    let mut header = [0u8; HEADER_LEN];
    reader.read_exact(&mut header).await?;

    let (len, code) = decode_header(&header)?;

    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload).await?;

    Ok(RawFrame { code, payload })
}

/// Try to pull one complete frame out of an accumulation buffer.
///
/// Returns `Ok(None)` when the buffer does not yet hold a full frame. On
/// success the frame's bytes are consumed from the buffer. This is the
/// cancel-safe counterpart of [`read_frame`] for loops that interleave
/// reads with a timeout: partial frame bytes stay in the buffer across
/// read attempts instead of being lost with an aborted read future.
pub fn try_read_frame(buf: &mut BytesMut) -> Result<Option<RawFrame>> {
    if buf.len() < HEADER_LEN {
        return Ok(None);
    }

    let (len, code) = decode_header(&buf[..HEADER_LEN])?;

    if buf.len() < HEADER_LEN + len {
        buf.reserve(HEADER_LEN + len - buf.len());
        return Ok(None);
    }

    buf.advance(HEADER_LEN);
    let payload = buf.split_to(len).to_vec();

    Ok(Some(RawFrame { code, payload }))
}

/// Classify a frame's type code and parse its payload as JSON.
///
/// # Errors
///
/// Returns `Protocol` if the code belongs to neither the command nor the
/// event namespace, or if the payload is not valid JSON. The frame has
/// already been consumed from the stream, so these failures are recoverable:
/// callers may drop the frame and keep reading.
pub fn decode_payload(frame: &RawFrame) -> Result<(MessageType, Value)> {
    let message_type = MessageType::classify(frame.code).ok_or_else(|| {
        SwaylinkError::Protocol(format!("unrecognized payload type {:#010x}", frame.code))
    })?;

    let value = serde_json::from_slice(&frame.payload)
        .map_err(|e| SwaylinkError::Protocol(format!("malformed JSON payload: {}", e)))?;

    Ok((message_type, value))
}

/// Read and fully decode one frame: [`read_frame`] + [`decode_payload`].
pub async fn read_message<R: AsyncRead + Unpin>(reader: &mut R) -> Result<(MessageType, Value)> {
    let frame = read_frame(reader).await?;
    decode_payload(&frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn command_codes_roundtrip() {
        for kind in CommandKind::ALL {
            assert_eq!(CommandKind::from_code(kind.code()), Some(kind));
        }
    }

    #[test]
    fn event_codes_roundtrip() {
        for kind in EventKind::ALL {
            assert_eq!(EventKind::from_code(kind.code()), Some(kind));
            assert_eq!(EventKind::from_name(kind.name()), Some(kind));
        }
    }

    #[test]
    fn namespaces_never_cross() {
        for kind in CommandKind::ALL {
            assert!(matches!(
                MessageType::classify(kind.code()),
                Some(MessageType::Command(k)) if k == kind
            ));
            assert_eq!(EventKind::from_code(kind.code()), None);
        }
        for kind in EventKind::ALL {
            assert!(matches!(
                MessageType::classify(kind.code()),
                Some(MessageType::Event(k)) if k == kind
            ));
            assert_eq!(CommandKind::from_code(kind.code()), None);
        }
    }

    #[test]
    fn event_codes_match_wire_values() {
        assert_eq!(EventKind::Workspace.code(), 0x8000_0000);
        assert_eq!(EventKind::Mode.code(), 0x8000_0002);
        assert_eq!(EventKind::BarStateUpdate.code(), 0x8000_0014);
        assert_eq!(EventKind::Input.code(), 0x8000_0015);
    }

    #[tokio::test]
    async fn encode_decode_roundtrip_all_commands() {
        let payload = serde_json::json!({"name": "2", "focused": true}).to_string();
        for kind in CommandKind::ALL {
            let mut reader = Cursor::new(encode(kind.code(), &payload));
            let (message_type, value) = read_message(&mut reader).await.unwrap();
            assert_eq!(message_type, MessageType::Command(kind));
            assert_eq!(value["name"], "2");
            assert_eq!(value["focused"], true);
        }
    }

    #[tokio::test]
    async fn decode_event_frame() {
        let payload = serde_json::json!({"change": "focus"}).to_string();
        let mut reader = Cursor::new(encode(EventKind::Workspace.code(), &payload));
        let (message_type, value) = read_message(&mut reader).await.unwrap();
        assert_eq!(message_type, MessageType::Event(EventKind::Workspace));
        assert_eq!(value["change"], "focus");
    }

    #[tokio::test]
    async fn zero_length_payload_reads_cleanly() {
        let mut reader = Cursor::new(encode(CommandKind::GetWorkspaces.code(), ""));
        let frame = read_frame(&mut reader).await.unwrap();
        assert_eq!(frame.code, CommandKind::GetWorkspaces.code());
        assert!(frame.payload.is_empty());
        // An empty payload is a valid frame but not valid JSON.
        assert!(matches!(
            decode_payload(&frame),
            Err(SwaylinkError::Protocol(_))
        ));
    }

    #[tokio::test]
    async fn unknown_code_fails_but_resynchronizes() {
        let mut data = encode(0x42, &serde_json::json!({"junk": 1}).to_string());
        data.extend_from_slice(&encode(
            CommandKind::GetVersion.code(),
            &serde_json::json!({"major": 1}).to_string(),
        ));
        let mut reader = Cursor::new(data);

        let frame = read_frame(&mut reader).await.unwrap();
        assert!(matches!(
            decode_payload(&frame),
            Err(SwaylinkError::Protocol(_))
        ));

        // The bad frame was consumed in full; the next read is aligned.
        let (message_type, value) = read_message(&mut reader).await.unwrap();
        assert_eq!(
            message_type,
            MessageType::Command(CommandKind::GetVersion)
        );
        assert_eq!(value["major"], 1);
    }

    #[tokio::test]
    async fn bad_magic_is_a_protocol_error() {
        let mut data = encode(CommandKind::Sync.code(), "{}");
        data[0] = b'x';
        let mut reader = Cursor::new(data);
        assert!(matches!(
            read_frame(&mut reader).await,
            Err(SwaylinkError::Protocol(_))
        ));
    }

    #[test]
    fn try_read_frame_handles_partial_input() {
        let payload = serde_json::json!(["workspace"]).to_string();
        let encoded = encode(CommandKind::Subscribe.code(), &payload);

        let mut buf = BytesMut::new();
        // Header alone is not enough.
        buf.extend_from_slice(&encoded[..HEADER_LEN]);
        assert!(try_read_frame(&mut buf).unwrap().is_none());

        // Remainder arrives; the frame decodes and is consumed.
        buf.extend_from_slice(&encoded[HEADER_LEN..]);
        let frame = try_read_frame(&mut buf).unwrap().unwrap();
        assert_eq!(frame.code, CommandKind::Subscribe.code());
        assert!(buf.is_empty());

        let (message_type, value) = decode_payload(&frame).unwrap();
        assert_eq!(message_type, MessageType::Command(CommandKind::Subscribe));
        assert_eq!(value[0], "workspace");
    }

    #[test]
    fn try_read_frame_consumes_back_to_back_frames() {
        let mut buf = BytesMut::new();
        buf.extend_from_slice(&encode(EventKind::Workspace.code(), r#"{"change":"init"}"#));
        buf.extend_from_slice(&encode(EventKind::Workspace.code(), r#"{"change":"empty"}"#));

        let first = try_read_frame(&mut buf).unwrap().unwrap();
        let second = try_read_frame(&mut buf).unwrap().unwrap();
        assert!(try_read_frame(&mut buf).unwrap().is_none());

        let (_, first_value) = decode_payload(&first).unwrap();
        let (_, second_value) = decode_payload(&second).unwrap();
        assert_eq!(first_value["change"], "init");
        assert_eq!(second_value["change"], "empty");
    }

    #[tokio::test]
    async fn oversized_length_is_rejected() {
        let mut data = Vec::new();
        data.extend_from_slice(MAGIC);
        data.extend_from_slice(&(MAX_PAYLOAD_SIZE + 1).to_ne_bytes());
        data.extend_from_slice(&CommandKind::GetTree.code().to_ne_bytes());
        let mut reader = Cursor::new(data);
        assert!(matches!(
            read_frame(&mut reader).await,
            Err(SwaylinkError::Protocol(_))
        ));
    }
}
