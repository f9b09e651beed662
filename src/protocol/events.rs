//! XCALIBRATE events
//!
//! The extension owns a single event code past its server-assigned event
//! base. Several extensions share one connection's event-code space, so the
//! codec must silently decline events outside its own range rather than
//! treat them as decode failures.

use super::types::{read_i16, read_u16, write_i16, write_u16, ByteOrder};
use crate::connection::ConnectionId;

/// Size of a wire event frame.
pub const WIRE_EVENT_SIZE: usize = 32;

/// Event subtypes, keyed by offset from the extension's first event code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum EventKind {
    RawTouchscreen = 0,
}

impl EventKind {
    /// Map an offset from the event base to a known subtype. Offsets outside
    /// the extension's range belong to some other extension.
    pub fn from_offset(offset: u8) -> Option<Self> {
        match offset {
            0 => Some(EventKind::RawTouchscreen),
            _ => None,
        }
    }
}

/// Generic 32-byte wire event, as handed over by the transport's
/// event-dispatch path before any extension has claimed it.
///
/// Byte 0 is the type code: the low 7 bits carry the event code, bit 0x80
/// marks an event delivered via SendEvent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireEvent {
    pub bytes: [u8; WIRE_EVENT_SIZE],
}

impl WireEvent {
    pub fn new(bytes: [u8; WIRE_EVENT_SIZE]) -> Self {
        WireEvent { bytes }
    }

    /// Raw type byte, synthetic-send bit included.
    pub fn type_code(&self) -> u8 {
        self.bytes[0]
    }
}

/// A decoded raw touchscreen sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawTouchscreenEvent {
    /// Event code (event base + RawTouchscreen offset), high bit stripped.
    pub kind: u8,
    /// Serial of the last request the server had processed when the event
    /// was decoded.
    pub serial: u32,
    /// Set when the event was delivered via SendEvent rather than generated
    /// by the server.
    pub send_event: bool,
    /// Connection the event arrived on.
    pub connection: ConnectionId,
    pub x: i16,
    pub y: i16,
    pub pressure: u16,
}

/// Outcome of translating an event on a connection whose event-code space
/// is multiplexed among several extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventMatch<T> {
    /// The event belongs to this extension.
    Matched(T),
    /// Not ours. The dispatcher should offer the event to other decoders;
    /// this is a routine decline, not a failure.
    NotMine,
}

/// Decode a RawTouchscreen wire event. The caller has already matched the
/// subtype against [`EventKind::RawTouchscreen`].
pub fn decode_raw_touchscreen(
    wire: &WireEvent,
    byte_order: ByteOrder,
    last_serial: u32,
    connection: ConnectionId,
) -> RawTouchscreenEvent {
    let sequence = read_u16(&wire.bytes[2..4], byte_order);
    RawTouchscreenEvent {
        kind: wire.type_code() & 0x7F,
        serial: widen_serial(sequence, last_serial),
        send_event: wire.type_code() & 0x80 != 0,
        connection,
        x: read_i16(&wire.bytes[4..6], byte_order),
        y: read_i16(&wire.bytes[6..8], byte_order),
        pressure: read_u16(&wire.bytes[8..10], byte_order),
    }
}

/// Encode a RawTouchscreen event into its wire frame, the exact inverse of
/// [`decode_raw_touchscreen`].
pub fn encode_raw_touchscreen(event: &RawTouchscreenEvent, byte_order: ByteOrder) -> WireEvent {
    let mut bytes = [0u8; WIRE_EVENT_SIZE];
    bytes[0] = (event.kind & 0x7F) | if event.send_event { 0x80 } else { 0 };
    write_u16(&mut bytes[2..4], event.serial as u16, byte_order);
    write_i16(&mut bytes[4..6], event.x, byte_order);
    write_i16(&mut bytes[6..8], event.y, byte_order);
    write_u16(&mut bytes[8..10], event.pressure, byte_order);
    WireEvent { bytes }
}

/// Widen the 16-bit sequence carried in the wire frame against the
/// connection's full serial counter, accounting for wraparound.
fn widen_serial(wire_sequence: u16, last_serial: u32) -> u32 {
    let serial = (last_serial & 0xFFFF_0000) | u32::from(wire_sequence);
    if serial < last_serial {
        serial + 0x1_0000
    } else {
        serial
    }
}
